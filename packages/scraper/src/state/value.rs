//! Tagged value tree reconstructed from a hydration payload.
//!
//! This is the read-only intermediate representation the page parsers
//! consume. Objects preserve insertion order with unique keys.

use indexmap::IndexMap;

/// A value reconstructed from the restricted object-literal grammar.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Bool(bool),
    Number(f64),
    String(String),
    Array(Vec<Value>),
    Object(IndexMap<String, Value>),
}

impl Value {
    /// Look up a key on an object value.
    pub fn get(&self, key: &str) -> Option<&Value> {
        match self {
            Value::Object(map) => map.get(key),
            _ => None,
        }
    }

    /// Walk a chain of object keys.
    pub fn path(&self, keys: &[&str]) -> Option<&Value> {
        let mut current = self;
        for key in keys {
            current = current.get(key)?;
        }
        Some(current)
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// Integral, non-negative numbers only; anything else is `None`.
    pub fn as_u64(&self) -> Option<u64> {
        match self {
            Value::Number(n) if *n >= 0.0 && n.fract() == 0.0 && *n <= u64::MAX as f64 => {
                Some(*n as u64)
            }
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Number(n) if n.fract() == 0.0 && *n >= i64::MIN as f64 && *n <= i64::MAX as f64 => {
                Some(*n as i64)
            }
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&[Value]> {
        match self {
            Value::Array(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_object(&self) -> Option<&IndexMap<String, Value>> {
        match self {
            Value::Object(map) => Some(map),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_path_walks_nested_objects() {
        let mut inner = IndexMap::new();
        inner.insert("views".to_string(), Value::Number(42.0));
        let mut outer = IndexMap::new();
        outer.insert("video".to_string(), Value::Object(inner));
        let root = Value::Object(outer);

        assert_eq!(root.path(&["video", "views"]).and_then(Value::as_u64), Some(42));
        assert!(root.path(&["video", "missing"]).is_none());
    }

    #[test]
    fn test_numeric_coercions() {
        assert_eq!(Value::Number(3.0).as_u64(), Some(3));
        assert_eq!(Value::Number(-3.0).as_u64(), None);
        assert_eq!(Value::Number(-3.0).as_i64(), Some(-3));
        assert_eq!(Value::Number(3.5).as_u64(), None);
        assert_eq!(Value::String("3".into()).as_u64(), None);
    }
}
