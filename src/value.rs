use std::cmp::Ordering;

use indexmap::IndexMap;

/// Insertion-ordered map used for object values and scope frames.
pub type Map = IndexMap<String, Value>;

/// A dynamically typed value stored in a [`Context`](crate::Context).
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(untagged)
)]
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Value {
    #[default]
    Null,
    Bool(bool),
    Number(f64),
    String(String),
    Array(Vec<Value>),
    Object(Map),
}

impl Value {
    /// Builds an object value from key/value pairs, keeping their order.
    pub fn object<K, V, I>(entries: I) -> Self
    where
        K: Into<String>,
        V: Into<Self>,
        I: IntoIterator<Item = (K, V)>,
    {
        Self::Object(
            entries
                .into_iter()
                .map(|(key, value)| (key.into(), value.into()))
                .collect(),
        )
    }

    pub const fn type_name(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Bool(_) => "boolean",
            Self::Number(_) => "number",
            Self::String(_) => "string",
            Self::Array(_) => "array",
            Self::Object(_) => "object",
        }
    }

    /// Null, `false`, zero, NaN, the empty string and empty collections are
    /// falsy. Everything else is truthy.
    pub fn is_truthy(&self) -> bool {
        match self {
            Self::Null => false,
            Self::Bool(b) => *b,
            Self::Number(n) => *n != 0.0 && !n.is_nan(),
            Self::String(s) => !s.is_empty(),
            Self::Array(items) => !items.is_empty(),
            Self::Object(map) => !map.is_empty(),
        }
    }

    /// Looks up one segment of a dotted path: an object key, or an array index.
    pub fn get(&self, segment: &str) -> Option<&Self> {
        match self {
            Self::Object(map) => map.get(segment),
            Self::Array(items) => segment.parse::<usize>().ok().and_then(|i| items.get(i)),
            Self::Null | Self::Bool(_) | Self::Number(_) | Self::String(_) => None,
        }
    }

    fn as_number(&self) -> Option<f64> {
        match self {
            Self::Number(n) => Some(*n),
            Self::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
            Self::String(s) => parse_number(s.trim()),
            Self::Null | Self::Array(_) | Self::Object(_) => None,
        }
    }

    /// Ordering used by the `<`, `>`, `<=` and `>=` operators.
    ///
    /// Strings compare lexicographically, numbers numerically, and a number
    /// compared with a string compares numerically when the string holds a
    /// number. Booleans count as 0 and 1. Any other pairing is unordered.
    pub fn compare(&self, other: &Self) -> Option<Ordering> {
        match (self, other) {
            (Self::String(a), Self::String(b)) => Some(a.cmp(b)),
            _ => self.as_number()?.partial_cmp(&other.as_number()?),
        }
    }

    /// Membership used by the `in` operator, with `self` as the haystack.
    /// Null is never contained in anything.
    pub fn contains(&self, needle: &Self) -> bool {
        if *needle == Self::Null {
            return false;
        }
        match self {
            Self::Array(items) => items.contains(needle),
            Self::String(haystack) => haystack.contains(needle.to_string().as_str()),
            Self::Object(map) => map.contains_key(needle.to_string().as_str()),
            Self::Null | Self::Bool(_) | Self::Number(_) => false,
        }
    }
}

/// Reads a numeric literal. Infinities and NaN do not count as literals, so
/// names such as `inf` or `nan` stay usable as identifiers.
pub(crate) fn parse_number(raw: &str) -> Option<f64> {
    raw.parse::<f64>().ok().filter(|n| n.is_finite())
}

impl std::fmt::Display for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Null => Ok(()),
            Self::Bool(b) => write!(f, "{}", b),
            Self::Number(n) => write!(f, "{}", n),
            Self::String(s) => f.write_str(s),
            Self::Array(items) => {
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(",")?;
                    }
                    write!(f, "{}", item)?;
                }
                Ok(())
            }
            Self::Object(_) => f.write_str("[object]"),
        }
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

impl From<i32> for Value {
    fn from(value: i32) -> Self {
        Self::Number(f64::from(value))
    }
}

impl From<u32> for Value {
    fn from(value: u32) -> Self {
        Self::Number(f64::from(value))
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Self::Number(value as f64)
    }
}

impl From<usize> for Value {
    fn from(value: usize) -> Self {
        Self::Number(value as f64)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Self::String(value.to_owned())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

impl From<char> for Value {
    fn from(value: char) -> Self {
        Self::String(value.to_string())
    }
}

impl<T: Into<Self>> From<Vec<T>> for Value {
    fn from(values: Vec<T>) -> Self {
        Self::Array(values.into_iter().map(Into::into).collect())
    }
}

impl From<Map> for Value {
    fn from(map: Map) -> Self {
        Self::Object(map)
    }
}

impl<T: Into<Self>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Null, Into::into)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    #[ntest::timeout(100)]
    fn test_truthiness() {
        assert!(!Value::Null.is_truthy());
        assert!(!Value::from(0).is_truthy());
        assert!(!Value::from(f64::NAN).is_truthy());
        assert!(!Value::from("").is_truthy());
        assert!(!Value::Array(vec![]).is_truthy());
        assert!(!Value::object(Vec::<(&str, Value)>::new()).is_truthy());
        assert!(Value::from(-1).is_truthy());
        assert!(Value::from("0").is_truthy());
        assert!(Value::from(vec![0]).is_truthy());
    }

    #[test]
    #[ntest::timeout(100)]
    fn test_display_numbers_without_trailing_zero() {
        assert_eq!(Value::from(10).to_string(), "10");
        assert_eq!(Value::from(2.5).to_string(), "2.5");
        assert_eq!(Value::from(vec![1, 2, 3]).to_string(), "1,2,3");
        assert_eq!(Value::Null.to_string(), "");
    }

    #[test]
    #[ntest::timeout(100)]
    fn test_compare_mixed_kinds() {
        assert_eq!(Value::from(2).compare(&Value::from(10)), Some(Ordering::Less));
        // Lexicographic, not numeric, between two strings.
        assert_eq!(
            Value::from("2").compare(&Value::from("10")),
            Some(Ordering::Greater)
        );
        assert_eq!(Value::from("10").compare(&Value::from(9)), Some(Ordering::Greater));
        assert_eq!(Value::from("ten").compare(&Value::from(9)), None);
        assert_eq!(Value::Null.compare(&Value::Null), None);
        assert_eq!(Value::from(true).compare(&Value::from(0)), Some(Ordering::Greater));
        assert_eq!(Value::from(false).compare(&Value::from("0")), Some(Ordering::Equal));
    }

    #[test]
    #[ntest::timeout(100)]
    fn test_contains() {
        let list = Value::from(vec!["a", "b"]);
        assert!(list.contains(&Value::from("a")));
        assert!(!list.contains(&Value::from("c")));

        let text = Value::from("hello world");
        assert!(text.contains(&Value::from("lo w")));
        assert!(Value::from("abc123").contains(&Value::from(12)));

        let map = Value::object([("x", 1), ("y", 2)]);
        assert!(map.contains(&Value::from("y")));
        assert!(!map.contains(&Value::from(1)));

        assert!(!Value::from(5).contains(&Value::from(5)));

        // Null renders as "", which must not match every string or a "" key.
        assert!(!text.contains(&Value::Null));
        assert!(!Value::object([("", 1)]).contains(&Value::Null));
        assert!(!Value::from(vec![Value::Null]).contains(&Value::Null));
    }

    #[test]
    #[ntest::timeout(100)]
    fn test_get_segment() {
        let value = Value::object([("items", Value::from(vec!["zero", "one"]))]);
        let items = value.get("items").unwrap();
        assert_eq!(items.get("1"), Some(&Value::from("one")));
        assert_eq!(items.get("2"), None);
        assert_eq!(items.get("len"), None);
    }

    #[test]
    #[ntest::timeout(100)]
    fn test_parse_number_rejects_non_finite() {
        assert_eq!(parse_number("42"), Some(42.0));
        assert_eq!(parse_number("1.5"), Some(1.5));
        assert_eq!(parse_number("1e3"), Some(1000.0));
        assert_eq!(parse_number("inf"), None);
        assert_eq!(parse_number("NaN"), None);
        assert_eq!(parse_number("item"), None);
    }
}
