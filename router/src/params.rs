use crate::ParamError;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::{fmt::Debug, sync::Arc};

/// A decoded, typed param value.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ParamValue {
    /// An optional param that was not present.
    Null,
    Bool(bool),
    Int(i64),
    String(String),
    /// The values of a repeatable param, or of an array query param.
    List(Vec<ParamValue>),
}

impl ParamValue {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            ParamValue::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            ParamValue::Int(i) => Some(*i),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            ParamValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[ParamValue]> {
        match self {
            ParamValue::List(l) => Some(l),
            _ => None,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, ParamValue::Null)
    }

    /// Whether this value would produce nothing when built into a URL.
    pub(crate) fn is_empty(&self) -> bool {
        match self {
            ParamValue::Null => true,
            ParamValue::String(s) => s.is_empty(),
            ParamValue::List(l) => l.is_empty(),
            _ => false,
        }
    }
}

impl From<&str> for ParamValue {
    fn from(value: &str) -> Self {
        ParamValue::String(value.to_string())
    }
}

impl From<String> for ParamValue {
    fn from(value: String) -> Self {
        ParamValue::String(value)
    }
}

impl From<i64> for ParamValue {
    fn from(value: i64) -> Self {
        ParamValue::Int(value)
    }
}

impl From<bool> for ParamValue {
    fn from(value: bool) -> Self {
        ParamValue::Bool(value)
    }
}

impl<T: Into<ParamValue>> From<Option<T>> for ParamValue {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or(ParamValue::Null)
    }
}

impl<T: Into<ParamValue>> From<Vec<T>> for ParamValue {
    fn from(values: Vec<T>) -> Self {
        ParamValue::List(values.into_iter().map(Into::into).collect())
    }
}

/// Params gathered from the path, query and hash of a location.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Params(IndexMap<String, ParamValue>);

impl Params {
    /// Creates an empty map.
    #[inline(always)]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty map with the given capacity.
    #[inline(always)]
    pub fn with_capacity(capacity: usize) -> Self {
        Self(IndexMap::with_capacity(capacity))
    }

    /// Inserts a value, replacing any existing value for that key.
    pub fn insert(
        &mut self,
        key: impl Into<String>,
        value: impl Into<ParamValue>,
    ) -> Option<ParamValue> {
        self.0.insert(key.into(), value.into())
    }

    pub fn get(&self, key: &str) -> Option<&ParamValue> {
        self.0.get(key)
    }

    /// Gets a string param.
    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.0.get(key).and_then(ParamValue::as_str)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn remove(&mut self, key: &str) -> Option<ParamValue> {
        self.0.shift_remove(key)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ParamValue)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    /// Shallow-merges `other` over `self`: keys in `other` win.
    pub fn merge(&mut self, other: Params) {
        for (k, v) in other.0 {
            self.0.insert(k, v);
        }
    }
}

impl<K, V> FromIterator<(K, V)> for Params
where
    K: Into<String>,
    V: Into<ParamValue>,
{
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        let mut map = Self::new();
        for (key, value) in iter {
            map.insert(key, value);
        }
        map
    }
}

impl IntoIterator for Params {
    type Item = (String, ParamValue);
    type IntoIter = indexmap::map::IntoIter<String, ParamValue>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

/// Builds a [`Params`] map from `key => value` pairs.
///
/// ```rust
/// use route_resolver::{params, ParamValue};
///
/// let params = params! { "id" => "42", "page" => 2i64 };
/// assert_eq!(params.get_str("id"), Some("42"));
/// assert_eq!(params.get("page"), Some(&ParamValue::Int(2)));
/// ```
#[macro_export]
macro_rules! params {
    ($($key:expr => $val:expr),* $(,)?) => ({
        #[allow(unused_mut)]
        let mut map = $crate::Params::new();
        $( map.insert($key, $val); )*
        map
    });
}

/// Converts a single raw (already decoded) param value to and from its typed
/// form.
pub trait ParamCodec: Debug + Send + Sync {
    fn get(&self, raw: &str) -> Result<ParamValue, ParamError>;

    fn set(&self, value: &ParamValue) -> Result<String, ParamError>;
}

/// How a param's raw text maps to a [`ParamValue`].
#[derive(Debug, Clone, Default)]
pub enum ParamParser {
    /// Keeps the raw text.
    #[default]
    String,
    /// A base-10 `i64`.
    Int,
    /// `true` or `false`.
    Bool,
    Custom(Arc<dyn ParamCodec>),
}

impl ParamParser {
    pub fn custom(codec: impl ParamCodec + 'static) -> Self {
        ParamParser::Custom(Arc::new(codec))
    }

    /// Parses one raw value.
    pub fn get(&self, raw: &str) -> Result<ParamValue, ParamError> {
        match self {
            ParamParser::String => Ok(ParamValue::String(raw.to_string())),
            ParamParser::Int => raw
                .parse::<i64>()
                .map(ParamValue::Int)
                .map_err(|e| ParamError::new(format!("\"{raw}\": {e}"))),
            ParamParser::Bool => match raw {
                "true" => Ok(ParamValue::Bool(true)),
                "false" => Ok(ParamValue::Bool(false)),
                _ => Err(ParamError::new(format!(
                    "\"{raw}\" is not a boolean"
                ))),
            },
            ParamParser::Custom(codec) => codec.get(raw),
        }
    }

    /// Serializes one value back to raw (not yet encoded) text.
    pub fn set(&self, value: &ParamValue) -> Result<String, ParamError> {
        match (self, value) {
            (ParamParser::Custom(codec), value) => codec.set(value),
            (_, ParamValue::String(s)) => {
                // strings are accepted as long as they would parse back
                self.get(s).map(|_| s.clone())
            }
            (ParamParser::String | ParamParser::Int, ParamValue::Int(i)) => {
                Ok(i.to_string())
            }
            (ParamParser::String | ParamParser::Bool, ParamValue::Bool(b)) => {
                Ok(b.to_string())
            }
            (_, other) => Err(ParamError::new(format!(
                "cannot serialize {other:?} as a single value"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn int_parser_rejects_non_numbers() {
        assert_eq!(ParamParser::Int.get("42"), Ok(ParamValue::Int(42)));
        assert!(ParamParser::Int.get("4x2").is_err());
    }

    #[test]
    fn set_accepts_strings_that_parse_back() {
        assert_eq!(ParamParser::Int.set(&"7".into()), Ok("7".to_string()));
        assert!(ParamParser::Int.set(&"seven".into()).is_err());
        assert!(ParamParser::Bool.set(&ParamValue::Int(1)).is_err());
    }

    #[test]
    fn params_merge_overrides_existing_keys() {
        let mut params = params! { "a" => "a", "b" => "b" };
        params.merge(params! { "b" => "c" });
        assert_eq!(params, params! { "a" => "a", "b" => "c" });
    }
}
