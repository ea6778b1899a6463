//! Dynamic property values.
//!
//! `PropertyValue` is the type-erased value produced when an element's
//! property is read by name. Sorting, searching and change detection all work
//! on `PropertyValue`s rather than on the element's concrete field types.

use std::cmp::Ordering;
use std::fmt;

/// A property value read from an element by name.
///
/// # Ordering
///
/// [`PropertyValue::ordinal_cmp`] is a total order, the one the comparer uses:
///
/// - values of different kinds order by kind:
///   `None` < `Bool` < numbers < `Char` < `String`
/// - `Int`, `UInt` and `Float` are one kind and compare by exact numeric value
/// - floats order as IEEE total order, except that `-0.0` equals `0.0`
#[derive(Debug, Clone, Default, PartialEq)]
pub enum PropertyValue {
    /// No value (an unset optional, or a property with no data).
    #[default]
    None,
    /// Boolean value.
    Bool(bool),
    /// Signed integer value.
    Int(i64),
    /// Unsigned integer value too large for `Int`.
    UInt(u64),
    /// Floating point value.
    Float(f64),
    /// Single character.
    Char(char),
    /// Text value.
    String(String),
}

impl PropertyValue {
    /// Returns `true` if this is `PropertyValue::None`.
    pub fn is_none(&self) -> bool {
        matches!(self, PropertyValue::None)
    }

    /// Returns `true` if this contains some data.
    pub fn is_some(&self) -> bool {
        !self.is_none()
    }

    /// Attempts to get the value as a string slice.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            PropertyValue::String(s) => Some(s.as_str()),
            _ => None,
        }
    }

    /// Attempts to get the value as a signed integer.
    pub fn as_int(&self) -> Option<i64> {
        match self {
            PropertyValue::Int(n) => Some(*n),
            PropertyValue::UInt(n) => i64::try_from(*n).ok(),
            _ => None,
        }
    }

    /// Attempts to get the value as a float, widening integers.
    pub fn as_float(&self) -> Option<f64> {
        match self {
            PropertyValue::Float(n) => Some(*n),
            PropertyValue::Int(n) => Some(*n as f64),
            PropertyValue::UInt(n) => Some(*n as f64),
            _ => None,
        }
    }

    /// Attempts to get the value as a boolean.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            PropertyValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Compares two values in the order used for sorting.
    pub fn ordinal_cmp(&self, other: &Self) -> Ordering {
        use PropertyValue::*;

        match (self, other) {
            (Bool(a), Bool(b)) => a.cmp(b),
            (Char(a), Char(b)) => a.cmp(b),
            (String(a), String(b)) => a.cmp(b),
            _ => match (self.number(), other.number()) {
                (Some(a), Some(b)) => a.compare(b),
                _ => self.rank().cmp(&other.rank()),
            },
        }
    }

    /// Position of the value's kind in the cross-kind order.
    fn rank(&self) -> u8 {
        match self {
            PropertyValue::None => 0,
            PropertyValue::Bool(_) => 1,
            PropertyValue::Int(_) | PropertyValue::UInt(_) | PropertyValue::Float(_) => 2,
            PropertyValue::Char(_) => 3,
            PropertyValue::String(_) => 4,
        }
    }

    fn number(&self) -> Option<Number> {
        match self {
            PropertyValue::Int(n) => Some(Number::Int(i128::from(*n))),
            PropertyValue::UInt(n) => Some(Number::Int(i128::from(*n))),
            PropertyValue::Float(n) => Some(Number::Float(*n)),
            _ => None,
        }
    }

    /// Short name of the value's kind, for diagnostics.
    pub fn kind(&self) -> &'static str {
        match self {
            PropertyValue::None => "none",
            PropertyValue::Bool(_) => "bool",
            PropertyValue::Int(_) => "int",
            PropertyValue::UInt(_) => "uint",
            PropertyValue::Float(_) => "float",
            PropertyValue::Char(_) => "char",
            PropertyValue::String(_) => "string",
        }
    }
}

/// A numeric value widened so integers and floats compare exactly.
#[derive(Clone, Copy)]
enum Number {
    Int(i128),
    Float(f64),
}

impl Number {
    fn compare(self, other: Self) -> Ordering {
        match (self, other) {
            (Number::Int(a), Number::Int(b)) => a.cmp(&b),
            (Number::Float(a), Number::Float(b)) => cmp_floats(a, b),
            (Number::Int(a), Number::Float(b)) => cmp_int_float(a, b),
            (Number::Float(a), Number::Int(b)) => cmp_int_float(b, a).reverse(),
        }
    }
}

fn cmp_floats(a: f64, b: f64) -> Ordering {
    // partial_cmp already equates the zeros; only NaN needs total_cmp
    a.partial_cmp(&b).unwrap_or_else(|| a.total_cmp(&b))
}

/// Compares an integer with a float without rounding the integer.
fn cmp_int_float(int: i128, float: f64) -> Ordering {
    if float.is_nan() {
        // total order puts negative NaN below and positive NaN above everything
        return if float.is_sign_negative() {
            Ordering::Greater
        } else {
            Ordering::Less
        };
    }

    // every i64 and u64 lies strictly inside this range
    const LIMIT: f64 = 1.7e38;
    if float >= LIMIT {
        return Ordering::Less;
    }
    if float <= -LIMIT {
        return Ordering::Greater;
    }

    let floor = float.floor();
    match int.cmp(&(floor as i128)) {
        Ordering::Equal if float > floor => Ordering::Less,
        ordering => ordering,
    }
}

impl fmt::Display for PropertyValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PropertyValue::None => Ok(()),
            PropertyValue::Bool(b) => write!(f, "{b}"),
            PropertyValue::Int(n) => write!(f, "{n}"),
            PropertyValue::UInt(n) => write!(f, "{n}"),
            PropertyValue::Float(n) => write!(f, "{n}"),
            PropertyValue::Char(c) => write!(f, "{c}"),
            PropertyValue::String(s) => f.write_str(s),
        }
    }
}

impl From<String> for PropertyValue {
    fn from(s: String) -> Self {
        PropertyValue::String(s)
    }
}

impl From<&str> for PropertyValue {
    fn from(s: &str) -> Self {
        PropertyValue::String(s.to_string())
    }
}

impl From<&String> for PropertyValue {
    fn from(s: &String) -> Self {
        PropertyValue::String(s.clone())
    }
}

impl From<bool> for PropertyValue {
    fn from(b: bool) -> Self {
        PropertyValue::Bool(b)
    }
}

impl From<char> for PropertyValue {
    fn from(c: char) -> Self {
        PropertyValue::Char(c)
    }
}

macro_rules! from_int {
    ($($ty:ty),*) => {
        $(impl From<$ty> for PropertyValue {
            fn from(n: $ty) -> Self {
                PropertyValue::Int(n as i64)
            }
        })*
    };
}

from_int!(i8, i16, i32, i64, isize, u8, u16, u32);

impl From<u64> for PropertyValue {
    fn from(n: u64) -> Self {
        match i64::try_from(n) {
            Ok(n) => PropertyValue::Int(n),
            Err(_) => PropertyValue::UInt(n),
        }
    }
}

impl From<usize> for PropertyValue {
    fn from(n: usize) -> Self {
        PropertyValue::from(n as u64)
    }
}

impl From<f64> for PropertyValue {
    fn from(n: f64) -> Self {
        PropertyValue::Float(n)
    }
}

impl From<f32> for PropertyValue {
    fn from(n: f32) -> Self {
        PropertyValue::Float(n as f64)
    }
}

impl<V: Into<PropertyValue>> From<Option<V>> for PropertyValue {
    fn from(opt: Option<V>) -> Self {
        match opt {
            Some(v) => v.into(),
            None => PropertyValue::None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_none_sorts_first() {
        let none = PropertyValue::None;
        assert_eq!(none.ordinal_cmp(&PropertyValue::from("")), Ordering::Less);
        assert_eq!(PropertyValue::from(-5).ordinal_cmp(&none), Ordering::Greater);
        assert_eq!(none.ordinal_cmp(&PropertyValue::None), Ordering::Equal);
    }

    #[test]
    fn test_numeric_kinds_compare_numerically() {
        let int = PropertyValue::from(3);
        let float = PropertyValue::from(2.5);
        let big = PropertyValue::from(u64::MAX);

        assert_eq!(int.ordinal_cmp(&float), Ordering::Greater);
        assert_eq!(float.ordinal_cmp(&int), Ordering::Less);
        assert_eq!(int.ordinal_cmp(&big), Ordering::Less);
        assert_eq!(PropertyValue::from(-1).ordinal_cmp(&big), Ordering::Less);
        assert_eq!(big.ordinal_cmp(&PropertyValue::from(7)), Ordering::Greater);
    }

    #[test]
    fn test_unsigned_values_normalize_to_int() {
        assert_eq!(PropertyValue::from(7u32), PropertyValue::Int(7));
        assert_eq!(PropertyValue::from(7usize), PropertyValue::Int(7));
        assert_eq!(PropertyValue::from(u64::MAX), PropertyValue::UInt(u64::MAX));
    }

    #[test]
    fn test_kinds_order_by_rank() {
        let ordered = [
            PropertyValue::None,
            PropertyValue::from(true),
            PropertyValue::from(-3),
            PropertyValue::from(7.5),
            PropertyValue::from('a'),
            PropertyValue::from(""),
        ];
        for pair in ordered.windows(2) {
            assert_eq!(pair[0].ordinal_cmp(&pair[1]), Ordering::Less, "{pair:?}");
        }
        assert_eq!(
            PropertyValue::from(9).ordinal_cmp(&PropertyValue::from("10")),
            Ordering::Less
        );
    }

    #[test]
    fn test_ordering_is_transitive() {
        let values = [
            PropertyValue::None,
            PropertyValue::from(false),
            PropertyValue::from(true),
            PropertyValue::from(9),
            PropertyValue::from(10),
            PropertyValue::from(9.0),
            PropertyValue::from(9.5),
            PropertyValue::from(-0.0),
            PropertyValue::from(0),
            PropertyValue::from(0.0),
            PropertyValue::from(u64::MAX),
            PropertyValue::from(f64::NAN),
            PropertyValue::from(f64::NEG_INFINITY),
            PropertyValue::from('9'),
            PropertyValue::from("9"),
            PropertyValue::from("10"),
        ];

        let le = |x: &PropertyValue, y: &PropertyValue| x.ordinal_cmp(y) != Ordering::Greater;
        for a in &values {
            for b in &values {
                assert_eq!(a.ordinal_cmp(b), b.ordinal_cmp(a).reverse(), "{a:?} vs {b:?}");
                for c in &values {
                    if le(a, b) && le(b, c) {
                        assert!(le(a, c), "{a:?} <= {b:?} <= {c:?}");
                    }
                }
            }
        }
    }

    #[test]
    fn test_large_integers_compare_exactly_with_floats() {
        let two_53 = 9_007_199_254_740_992i64;
        let float = PropertyValue::from(two_53 as f64);

        assert_eq!(PropertyValue::from(two_53 + 1).ordinal_cmp(&float), Ordering::Greater);
        assert_eq!(PropertyValue::from(two_53).ordinal_cmp(&float), Ordering::Equal);
        assert_eq!(
            PropertyValue::from(u64::MAX).ordinal_cmp(&PropertyValue::from(u64::MAX as f64)),
            Ordering::Less
        );
        assert_eq!(
            PropertyValue::from(0).ordinal_cmp(&PropertyValue::from(-0.0)),
            Ordering::Equal
        );
        assert_eq!(
            PropertyValue::from(-1).ordinal_cmp(&PropertyValue::from(-0.5)),
            Ordering::Less
        );
    }

    #[test]
    fn test_option_conversion() {
        assert!(PropertyValue::from(None::<String>).is_none());
        assert_eq!(PropertyValue::from(Some("Ann")).as_str(), Some("Ann"));
    }

    #[test]
    fn test_nan_is_ordered() {
        let nan = PropertyValue::from(f64::NAN);
        let one = PropertyValue::from(1.0);
        assert_ne!(nan.ordinal_cmp(&one), Ordering::Equal);
    }
}
