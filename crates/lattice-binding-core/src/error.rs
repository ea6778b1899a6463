//! Error types for Lattice Binding.

/// A specialized Result type for Lattice Binding operations.
pub type Result<T> = std::result::Result<T, BindingError>;

/// The main error type for binding list operations.
///
/// None of these errors leaves a list partially mutated: a failing call either
/// changes nothing, or (for [`BindingError::SortFailure`]) only drops the sort
/// descriptor it could not honor.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum BindingError {
    /// A named sort or search property does not exist on the element type.
    #[error("'{type_name}' has no property named '{property}'")]
    InvalidProperty {
        /// The requested property name.
        property: String,
        /// The element type that was searched.
        type_name: &'static str,
    },

    /// Reading a property failed while sorting; the sort was abandoned.
    #[error("sort on '{property}' failed: {message}")]
    SortFailure {
        /// The property whose accessor failed.
        property: String,
        /// What the accessor reported.
        message: String,
    },

    /// A property accessor reported an error outside of a sort.
    #[error(transparent)]
    Accessor(#[from] AccessorError),

    /// An index argument was outside the list bounds.
    #[error("index {index} is out of range for a list of length {len}")]
    IndexOutOfRange {
        /// The offending index.
        index: usize,
        /// The list length at the time of the call.
        len: usize,
    },

    /// The list configuration forbids this operation.
    #[error("operation not allowed: {0}")]
    NotAllowed(&'static str),

    /// A textual sort descriptor could not be parsed.
    #[error("invalid sort descriptor: {0}")]
    InvalidSortDescriptor(String),
}

impl BindingError {
    /// Create an invalid property error for element type `T`.
    pub fn invalid_property<T: ?Sized>(property: impl Into<String>) -> Self {
        Self::InvalidProperty {
            property: property.into(),
            type_name: std::any::type_name::<T>(),
        }
    }

    /// Create an out-of-range error.
    pub fn index_out_of_range(index: usize, len: usize) -> Self {
        Self::IndexOutOfRange { index, len }
    }

    /// Converts an accessor failure raised during a sort into a sort failure.
    pub fn into_sort_failure(self) -> Self {
        match self {
            Self::Accessor(err) => Self::SortFailure {
                property: err.property,
                message: err.message,
            },
            other => other,
        }
    }
}

/// Error returned by a fallible property accessor.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("reading property '{property}' failed: {message}")]
pub struct AccessorError {
    /// The property being read.
    pub property: String,
    /// Description of the failure.
    pub message: String,
}

impl AccessorError {
    /// Create an accessor error.
    pub fn new(property: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            property: property.into(),
            message: message.into(),
        }
    }
}

/// Error returned by a fallible filter predicate.
///
/// Filtered lists never surface this error; an element whose predicate fails
/// is treated as not matching.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("predicate failed: {0}")]
pub struct PredicateError(pub String);

impl PredicateError {
    /// Create a predicate error from any message.
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}

impl From<AccessorError> for PredicateError {
    fn from(err: AccessorError) -> Self {
        Self(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Person;

    #[test]
    fn test_invalid_property_names_type() {
        let err = BindingError::invalid_property::<Person>("Nmae");
        let text = err.to_string();
        assert!(text.contains("Nmae"));
        assert!(text.contains("Person"));
    }

    #[test]
    fn test_accessor_converts_to_sort_failure() {
        let err: BindingError = AccessorError::new("Age", "not loaded").into();
        assert_eq!(
            err.into_sort_failure(),
            BindingError::SortFailure {
                property: "Age".into(),
                message: "not loaded".into(),
            }
        );
    }

    #[test]
    fn test_other_errors_pass_through_sort_conversion() {
        let err = BindingError::index_out_of_range(4, 2);
        assert_eq!(err.clone().into_sort_failure(), err);
        assert_eq!(err.to_string(), "index 4 is out of range for a list of length 2");
    }
}
