//! Typed scalar values for parsed fields

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::hash::{Hash, Hasher};

/// A single typed field value
///
/// Values are one of integer, float, date, or string. Anything the
/// coercion chain cannot interpret stays as the original text,
/// surrounding quotes included.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum FieldValue {
    Int(i64),
    Float(f64),
    Date(NaiveDate),
    Text(String),
}

impl FieldValue {
    /// Returns the integer payload, if any
    pub fn as_int(&self) -> Option<i64> {
        match self {
            FieldValue::Int(n) => Some(*n),
            _ => None,
        }
    }

    /// Returns the value as a float if it is numeric (int or float)
    pub fn as_numeric(&self) -> Option<f64> {
        match self {
            FieldValue::Int(n) => Some(*n as f64),
            FieldValue::Float(f) => Some(*f),
            _ => None,
        }
    }

    /// Returns the text payload, if any
    pub fn as_text(&self) -> Option<&str> {
        match self {
            FieldValue::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Returns the date payload, if any
    pub fn as_date(&self) -> Option<NaiveDate> {
        match self {
            FieldValue::Date(d) => Some(*d),
            _ => None,
        }
    }

    /// Whether this value is already a native (non-text) type
    pub fn is_native(&self) -> bool {
        !matches!(self, FieldValue::Text(_))
    }
}

// Floats compare and hash by bit pattern so that values can key a map.
// The loader never produces NaN, so bit equality is value equality here.
impl PartialEq for FieldValue {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (FieldValue::Int(a), FieldValue::Int(b)) => a == b,
            (FieldValue::Float(a), FieldValue::Float(b)) => a.to_bits() == b.to_bits(),
            (FieldValue::Date(a), FieldValue::Date(b)) => a == b,
            (FieldValue::Text(a), FieldValue::Text(b)) => a == b,
            _ => false,
        }
    }
}

impl Eq for FieldValue {}

impl Hash for FieldValue {
    fn hash<H: Hasher>(&self, state: &mut H) {
        core::mem::discriminant(self).hash(state);
        match self {
            FieldValue::Int(n) => n.hash(state),
            FieldValue::Float(f) => f.to_bits().hash(state),
            FieldValue::Date(d) => d.hash(state),
            FieldValue::Text(s) => s.hash(state),
        }
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Int(n) => write!(f, "{}", n),
            FieldValue::Float(x) => write!(f, "{}", x),
            // Display convention for dates is day/month/year
            FieldValue::Date(d) => write!(f, "{}", d.format("%d/%m/%Y")),
            FieldValue::Text(s) => write!(f, "{}", s),
        }
    }
}

impl From<i64> for FieldValue {
    fn from(n: i64) -> Self {
        FieldValue::Int(n)
    }
}

impl From<f64> for FieldValue {
    fn from(x: f64) -> Self {
        FieldValue::Float(x)
    }
}

impl From<&str> for FieldValue {
    fn from(s: &str) -> Self {
        FieldValue::Text(s.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_numeric_accessors() {
        assert_eq!(FieldValue::Int(42).as_numeric(), Some(42.0));
        assert_eq!(FieldValue::Float(1.5).as_numeric(), Some(1.5));
        assert_eq!(FieldValue::Text("x".into()).as_numeric(), None);
        assert_eq!(FieldValue::Int(42).as_int(), Some(42));
        assert_eq!(FieldValue::Float(1.5).as_int(), None);
    }

    #[test]
    fn test_equality_across_variants() {
        // Int(1) and Float(1.0) are distinct values
        assert_ne!(FieldValue::Int(1), FieldValue::Float(1.0));
        assert_eq!(FieldValue::Float(0.25), FieldValue::Float(0.25));
        assert_eq!(
            FieldValue::Text("abc".into()),
            FieldValue::Text("abc".into())
        );
    }

    #[test]
    fn test_hash_map_keying() {
        use std::collections::HashMap;

        let mut map = HashMap::new();
        map.insert(FieldValue::Int(7), "a");
        map.insert(FieldValue::Text("7".into()), "b");

        assert_eq!(map.get(&FieldValue::Int(7)), Some(&"a"));
        assert_eq!(map.get(&FieldValue::Text("7".into())), Some(&"b"));
    }

    #[test]
    fn test_date_display() {
        let d = NaiveDate::from_ymd_opt(2018, 1, 7).unwrap();
        assert_eq!(FieldValue::Date(d).to_string(), "07/01/2018");
    }
}
