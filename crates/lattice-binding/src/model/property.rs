//! Named property access for list elements.
//!
//! Sorting and searching refer to element properties by name. Each element
//! type publishes a [`PropertyRegistry`] mapping those names to accessor
//! functions, usually generated with `#[derive(Properties)]`:
//!
//! ```ignore
//! use lattice_binding::Properties;
//!
//! #[derive(Properties, Clone, Default)]
//! struct Person {
//!     #[property(rename = "Name")]
//!     name: String,
//!     #[property(rename = "Age")]
//!     age: u32,
//!     #[property(skip)]
//!     cache: Vec<u8>,
//! }
//! ```
//!
//! Registries can also be assembled by hand, which is how computed or
//! fallible properties are exposed:
//!
//! ```
//! use lattice_binding::model::{PropertyRegistry, PropertyValue};
//! use lattice_binding::AccessorError;
//!
//! struct Download {
//!     size: Option<u64>,
//! }
//!
//! let registry = PropertyRegistry::<Download>::builder()
//!     .property("Known", |d| d.size.is_some())
//!     .fallible_property("Size", |d| {
//!         d.size
//!             .map(PropertyValue::from)
//!             .ok_or_else(|| AccessorError::new("Size", "size not reported yet"))
//!     })
//!     .build();
//!
//! assert_eq!(registry.names().collect::<Vec<_>>(), ["Known", "Size"]);
//! ```

use std::fmt;
use std::sync::Arc;

use lattice_binding_core::{AccessorError, BindingError, Result};

use super::value::PropertyValue;

/// Type alias for a property getter.
pub type Getter<T> =
    Arc<dyn Fn(&T) -> std::result::Result<PropertyValue, AccessorError> + Send + Sync>;

/// A named getter for one property of `T`.
pub struct PropertyAccessor<T> {
    name: Arc<str>,
    getter: Getter<T>,
}

impl<T> Clone for PropertyAccessor<T> {
    fn clone(&self) -> Self {
        Self {
            name: self.name.clone(),
            getter: self.getter.clone(),
        }
    }
}

impl<T> PropertyAccessor<T> {
    /// Creates an accessor whose getter cannot fail.
    pub fn new<V, F>(name: impl Into<Arc<str>>, getter: F) -> Self
    where
        V: Into<PropertyValue>,
        F: Fn(&T) -> V + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            getter: Arc::new(move |item| Ok(getter(item).into())),
        }
    }

    /// Creates an accessor whose getter may report an error.
    pub fn fallible<F>(name: impl Into<Arc<str>>, getter: F) -> Self
    where
        F: Fn(&T) -> std::result::Result<PropertyValue, AccessorError> + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            getter: Arc::new(getter),
        }
    }

    /// The property name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Reads the property from `item`.
    pub fn get(&self, item: &T) -> Result<PropertyValue> {
        (self.getter)(item).map_err(BindingError::from)
    }
}

impl<T> fmt::Debug for PropertyAccessor<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PropertyAccessor")
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

/// The set of named properties an element type exposes.
///
/// Names are matched exactly (case-sensitive). Registration order is kept and
/// reported by [`PropertyRegistry::names`].
pub struct PropertyRegistry<T> {
    accessors: Vec<PropertyAccessor<T>>,
}

impl<T> Clone for PropertyRegistry<T> {
    fn clone(&self) -> Self {
        Self {
            accessors: self.accessors.clone(),
        }
    }
}

impl<T> Default for PropertyRegistry<T> {
    fn default() -> Self {
        Self {
            accessors: Vec::new(),
        }
    }
}

impl<T> PropertyRegistry<T> {
    /// Starts building a registry.
    pub fn builder() -> PropertyRegistryBuilder<T> {
        PropertyRegistryBuilder {
            registry: Self::default(),
        }
    }

    /// Looks up an accessor by name.
    pub fn get(&self, name: &str) -> Option<&PropertyAccessor<T>> {
        self.accessors.iter().find(|a| a.name() == name)
    }

    /// Looks up an accessor by name, failing with `InvalidProperty`.
    pub fn resolve(&self, name: &str) -> Result<&PropertyAccessor<T>> {
        self.get(name)
            .ok_or_else(|| BindingError::invalid_property::<T>(name))
    }

    /// Returns `true` if a property with this name exists.
    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Property names in registration order.
    pub fn names(&self) -> impl Iterator<Item = &str> + '_ {
        self.accessors.iter().map(|a| a.name())
    }

    /// Number of registered properties.
    pub fn len(&self) -> usize {
        self.accessors.len()
    }

    /// Returns `true` if no properties are registered.
    pub fn is_empty(&self) -> bool {
        self.accessors.is_empty()
    }
}

impl<T> fmt::Debug for PropertyRegistry<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.names()).finish()
    }
}

/// Builder for [`PropertyRegistry`].
pub struct PropertyRegistryBuilder<T> {
    registry: PropertyRegistry<T>,
}

impl<T> PropertyRegistryBuilder<T> {
    /// Adds an infallible property. A later registration with the same name
    /// replaces the earlier one.
    pub fn property<V, F>(self, name: &str, getter: F) -> Self
    where
        V: Into<PropertyValue>,
        F: Fn(&T) -> V + Send + Sync + 'static,
    {
        self.accessor(PropertyAccessor::new(name, getter))
    }

    /// Adds a property whose getter may fail.
    pub fn fallible_property<F>(self, name: &str, getter: F) -> Self
    where
        F: Fn(&T) -> std::result::Result<PropertyValue, AccessorError> + Send + Sync + 'static,
    {
        self.accessor(PropertyAccessor::fallible(name, getter))
    }

    /// Adds a prepared accessor.
    pub fn accessor(mut self, accessor: PropertyAccessor<T>) -> Self {
        let accessors = &mut self.registry.accessors;
        match accessors.iter_mut().find(|a| a.name() == accessor.name()) {
            Some(existing) => *existing = accessor,
            None => accessors.push(accessor),
        }
        self
    }

    /// Finishes the registry.
    pub fn build(self) -> PropertyRegistry<T> {
        self.registry
    }
}

/// Element types that expose named properties.
///
/// Implemented by `#[derive(Properties)]`, or by hand for types that need
/// computed or fallible properties.
pub trait Properties: Sized + 'static {
    /// The registry describing this type's properties.
    fn property_registry() -> &'static PropertyRegistry<Self>;

    /// Reads a property by name.
    fn property_value(&self, name: &str) -> Result<PropertyValue> {
        Self::property_registry().resolve(name)?.get(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::OnceLock;

    struct Sample {
        label: &'static str,
        weight: Option<f32>,
    }

    impl Properties for Sample {
        fn property_registry() -> &'static PropertyRegistry<Self> {
            static REGISTRY: OnceLock<PropertyRegistry<Sample>> = OnceLock::new();
            REGISTRY.get_or_init(|| {
                PropertyRegistry::builder()
                    .property("Label", |s: &Sample| s.label)
                    .fallible_property("Weight", |s: &Sample| {
                        s.weight
                            .map(PropertyValue::from)
                            .ok_or_else(|| AccessorError::new("Weight", "not weighed"))
                    })
                    .build()
            })
        }
    }

    #[test]
    fn test_property_value_by_name() {
        let sample = Sample {
            label: "flask",
            weight: Some(1.5),
        };
        assert_eq!(
            sample.property_value("Label").unwrap(),
            PropertyValue::from("flask")
        );
        assert_eq!(
            sample.property_value("Weight").unwrap(),
            PropertyValue::Float(1.5)
        );
    }

    #[test]
    fn test_unknown_property_is_invalid() {
        let sample = Sample {
            label: "flask",
            weight: None,
        };
        let err = sample.property_value("label").unwrap_err();
        assert!(matches!(err, BindingError::InvalidProperty { ref property, .. } if property == "label"));
    }

    #[test]
    fn test_fallible_getter_error_surfaces() {
        let sample = Sample {
            label: "flask",
            weight: None,
        };
        let err = sample.property_value("Weight").unwrap_err();
        assert_eq!(
            err,
            BindingError::Accessor(AccessorError::new("Weight", "not weighed"))
        );
    }

    #[test]
    fn test_later_registration_replaces() {
        let registry = PropertyRegistry::<Sample>::builder()
            .property("Label", |s| s.label)
            .property("Label", |_| "fixed")
            .build();

        assert_eq!(registry.len(), 1);
        let sample = Sample {
            label: "flask",
            weight: None,
        };
        let value = registry.resolve("Label").unwrap().get(&sample).unwrap();
        assert_eq!(value.as_str(), Some("fixed"));
    }
}
