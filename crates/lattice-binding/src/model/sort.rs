//! Sort descriptors.
//!
//! A [`SortDescriptor`] is an ordered list of `(property, direction)` keys.
//! The first key is the primary key; later keys only break ties.
//!
//! Descriptors have a compact text form so they can be kept in user settings:
//!
//! ```
//! use lattice_binding::model::{SortDescriptor, SortDirection};
//!
//! let sort: SortDescriptor = "Name, Age desc".parse().unwrap();
//! assert_eq!(sort.primary().unwrap().property, "Name");
//! assert_eq!(sort.keys()[1].direction, SortDirection::Descending);
//! assert_eq!(sort.to_string(), "Name ASC, Age DESC");
//! ```

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use lattice_binding_core::BindingError;

/// Direction of a single sort key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    /// Smallest value first.
    #[default]
    Ascending,
    /// Largest value first.
    Descending,
}

impl SortDirection {
    /// Applies this direction to an ascending comparison result.
    #[inline]
    pub fn apply(self, ordering: std::cmp::Ordering) -> std::cmp::Ordering {
        match self {
            SortDirection::Ascending => ordering,
            SortDirection::Descending => ordering.reverse(),
        }
    }
}

/// One `(property, direction)` pair of a sort descriptor.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SortKey {
    /// Name of the property to sort by.
    pub property: String,
    /// Sort direction.
    #[serde(default)]
    pub direction: SortDirection,
}

impl SortKey {
    /// Creates a sort key.
    pub fn new(property: impl Into<String>, direction: SortDirection) -> Self {
        Self {
            property: property.into(),
            direction,
        }
    }
}

/// An ordered list of sort keys.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SortDescriptor {
    keys: Vec<SortKey>,
}

impl SortDescriptor {
    /// Creates a descriptor from keys.
    pub fn new(keys: impl IntoIterator<Item = SortKey>) -> Self {
        Self {
            keys: keys.into_iter().collect(),
        }
    }

    /// A single ascending key.
    pub fn ascending(property: impl Into<String>) -> Self {
        Self::new([SortKey::new(property, SortDirection::Ascending)])
    }

    /// A single descending key.
    pub fn descending(property: impl Into<String>) -> Self {
        Self::new([SortKey::new(property, SortDirection::Descending)])
    }

    /// Appends an ascending tie-break key.
    pub fn then_ascending(mut self, property: impl Into<String>) -> Self {
        self.keys.push(SortKey::new(property, SortDirection::Ascending));
        self
    }

    /// Appends a descending tie-break key.
    pub fn then_descending(mut self, property: impl Into<String>) -> Self {
        self.keys.push(SortKey::new(property, SortDirection::Descending));
        self
    }

    /// The keys in priority order.
    pub fn keys(&self) -> &[SortKey] {
        &self.keys
    }

    /// The primary (first) key.
    pub fn primary(&self) -> Option<&SortKey> {
        self.keys.first()
    }

    /// Returns `true` if the descriptor has no keys.
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// Number of keys.
    pub fn len(&self) -> usize {
        self.keys.len()
    }
}

impl From<SortKey> for SortDescriptor {
    fn from(key: SortKey) -> Self {
        Self::new([key])
    }
}

impl From<(&str, SortDirection)> for SortDescriptor {
    fn from((property, direction): (&str, SortDirection)) -> Self {
        Self::new([SortKey::new(property, direction)])
    }
}

impl fmt::Display for SortDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, key) in self.keys.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            let dir = match key.direction {
                SortDirection::Ascending => "ASC",
                SortDirection::Descending => "DESC",
            };
            write!(f, "{} {}", key.property, dir)?;
        }
        Ok(())
    }
}

impl FromStr for SortDescriptor {
    type Err = BindingError;

    /// Parses `"Name, Age DESC"`. Directions are case-insensitive and default
    /// to ascending; `asc`/`ascending`/`desc`/`descending` are accepted.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut keys = Vec::new();

        for part in s.split(',') {
            let mut words = part.split_whitespace();
            let Some(property) = words.next() else {
                return Err(BindingError::InvalidSortDescriptor(format!(
                    "empty sort key in '{s}'"
                )));
            };

            let direction = match words.next().map(str::to_ascii_lowercase).as_deref() {
                None | Some("asc") | Some("ascending") => SortDirection::Ascending,
                Some("desc") | Some("descending") => SortDirection::Descending,
                Some(other) => {
                    return Err(BindingError::InvalidSortDescriptor(format!(
                        "unknown direction '{other}' for '{property}'"
                    )))
                }
            };

            if let Some(extra) = words.next() {
                return Err(BindingError::InvalidSortDescriptor(format!(
                    "unexpected '{extra}' after '{property}'"
                )));
            }

            keys.push(SortKey::new(property, direction));
        }

        Ok(Self { keys })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_and_display() {
        let sort: SortDescriptor = "Name ,Age descending".parse().unwrap();
        assert_eq!(
            sort,
            SortDescriptor::ascending("Name").then_descending("Age")
        );
        assert_eq!(sort.to_string(), "Name ASC, Age DESC");
        assert_eq!(sort.to_string().parse::<SortDescriptor>().unwrap(), sort);
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(matches!(
            "Name sideways".parse::<SortDescriptor>(),
            Err(BindingError::InvalidSortDescriptor(_))
        ));
        assert!(matches!(
            "Name,,Age".parse::<SortDescriptor>(),
            Err(BindingError::InvalidSortDescriptor(_))
        ));
        assert!(matches!(
            "Name asc extra".parse::<SortDescriptor>(),
            Err(BindingError::InvalidSortDescriptor(_))
        ));
    }

    #[test]
    fn test_serde_shape() {
        let sort = SortDescriptor::descending("Age").then_ascending("Name");
        let json = serde_json::to_string(&sort).unwrap();
        assert_eq!(
            json,
            r#"[{"property":"Age","direction":"descending"},{"property":"Name","direction":"ascending"}]"#
        );

        let parsed: SortDescriptor = serde_json::from_str(r#"[{"property":"Name"}]"#).unwrap();
        assert_eq!(parsed, SortDescriptor::ascending("Name"));
    }

    #[test]
    fn test_direction_apply() {
        use std::cmp::Ordering;
        assert_eq!(SortDirection::Ascending.apply(Ordering::Less), Ordering::Less);
        assert_eq!(SortDirection::Descending.apply(Ordering::Less), Ordering::Greater);
    }
}
