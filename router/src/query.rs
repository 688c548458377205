use crate::encoding::{decode, encode_query_key, encode_query_value};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::borrow::Cow;

/// The value stored for one query key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum QueryValue {
    /// The key appeared without `=`, as in `?flag`.
    Null,
    Value(String),
    /// The key appeared more than once. `None` members are bare keys.
    List(Vec<Option<String>>),
}

impl QueryValue {
    /// The most recently added value, if it has one.
    pub fn last(&self) -> Option<&str> {
        match self {
            QueryValue::Null => None,
            QueryValue::Value(v) => Some(v),
            QueryValue::List(vs) => vs.last().and_then(|v| v.as_deref()),
        }
    }

    /// All values, with bare keys as `None`.
    pub fn all(&self) -> Vec<Option<&str>> {
        match self {
            QueryValue::Null => vec![None],
            QueryValue::Value(v) => vec![Some(v.as_str())],
            QueryValue::List(vs) => vs.iter().map(|v| v.as_deref()).collect(),
        }
    }

    fn push(&mut self, value: Option<String>) {
        match self {
            QueryValue::List(vs) => vs.push(value),
            QueryValue::Null => *self = QueryValue::List(vec![None, value]),
            QueryValue::Value(v) => {
                let prev = std::mem::take(v);
                *self = QueryValue::List(vec![Some(prev), value]);
            }
        }
    }
}

impl From<&str> for QueryValue {
    fn from(value: &str) -> Self {
        QueryValue::Value(value.to_string())
    }
}

impl From<String> for QueryValue {
    fn from(value: String) -> Self {
        QueryValue::Value(value)
    }
}

impl From<Option<String>> for QueryValue {
    fn from(value: Option<String>) -> Self {
        value.map(QueryValue::Value).unwrap_or(QueryValue::Null)
    }
}

impl<T: Into<String>> From<Vec<T>> for QueryValue {
    fn from(values: Vec<T>) -> Self {
        QueryValue::List(values.into_iter().map(|v| Some(v.into())).collect())
    }
}

/// A decoded query string, in the order keys were first seen.
///
/// A key that is absent from the map is not serialized at all, unlike
/// [`QueryValue::Null`] which serializes as a bare key.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct LocationQuery(IndexMap<String, QueryValue>);

impl LocationQuery {
    /// Creates an empty map.
    #[inline(always)]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a value for `key`.
    ///
    /// If the key already exists, its values become a list and the new value
    /// is added to the end. To replace the value instead, see
    /// [`replace`](Self::replace).
    pub fn append(&mut self, key: impl Into<String>, value: Option<String>) {
        let key = key.into();
        match self.0.get_mut(&key) {
            Some(prev) => prev.push(value),
            None => {
                self.0.insert(key, value.into());
            }
        }
    }

    /// Sets the value for `key`, replacing anything stored before.
    pub fn replace(&mut self, key: impl Into<String>, value: QueryValue) {
        self.0.insert(key.into(), value);
    }

    pub fn get(&self, key: &str) -> Option<&QueryValue> {
        self.0.get(key)
    }

    /// Gets the most-recently-added value for this key.
    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.0.get(key).and_then(QueryValue::last)
    }

    /// Removes a key, keeping the order of the others.
    pub fn remove(&mut self, key: &str) -> Option<QueryValue> {
        self.0.shift_remove(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &QueryValue)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Shallow-merges `other` over `self`: keys in `other` win.
    pub fn merge(&mut self, other: LocationQuery) {
        for (k, v) in other.0 {
            self.0.insert(k, v);
        }
    }

    /// Converts the map to a query string, including the leading `?`.
    ///
    /// Returns an empty string if nothing would be serialized.
    pub fn to_query_string(&self) -> String {
        let search = stringify_query(self);
        if search.is_empty() {
            search
        } else {
            format!("?{search}")
        }
    }
}

impl<K, V> FromIterator<(K, V)> for LocationQuery
where
    K: Into<String>,
    V: Into<QueryValue>,
{
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        let mut map = Self::new();
        for (key, value) in iter {
            map.replace(key, value.into());
        }
        map
    }
}

impl IntoIterator for LocationQuery {
    type Item = (String, QueryValue);
    type IntoIter = indexmap::map::IntoIter<String, QueryValue>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

/// Parses a query string into a [`LocationQuery`].
///
/// A single leading `?` is ignored. `+` is read as a space. Keys without `=`
/// map to [`QueryValue::Null`]; repeated keys accumulate into a list.
pub fn parse_query(search: &str) -> LocationQuery {
    let mut query = LocationQuery::new();
    let search = search.strip_prefix('?').unwrap_or(search);
    if search.is_empty() {
        return query;
    }

    for chunk in search.split('&') {
        let chunk: Cow<'_, str> = if chunk.contains('+') {
            chunk.replace('+', " ").into()
        } else {
            chunk.into()
        };
        let (key, value) = match chunk.split_once('=') {
            Some((key, value)) => (key, Some(decode(value).into_owned())),
            None => (chunk.as_ref(), None),
        };
        query.append(decode(key).into_owned(), value);
    }
    query
}

/// Serializes a [`LocationQuery`] without the leading `?`.
pub fn stringify_query(query: &LocationQuery) -> String {
    let mut search = String::new();
    let mut push = |key: &str, value: Option<&str>| {
        if !search.is_empty() {
            search.push('&');
        }
        search.push_str(key);
        if let Some(value) = value {
            search.push('=');
            search.push_str(&encode_query_value(value));
        }
    };

    for (key, value) in query.iter() {
        let key = encode_query_key(key);
        match value {
            QueryValue::Null => push(&key, None),
            QueryValue::Value(v) => push(&key, Some(v)),
            QueryValue::List(vs) => {
                for v in vs {
                    push(&key, v.as_deref());
                }
            }
        }
    }
    search
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn location_query_to_query_string() {
        let mut map = LocationQuery::new();
        map.append("param", Some("a".to_string()));
        map.append("param", Some("b".to_string()));
        assert_eq!(map.to_query_string(), "?param=a&param=b");
        assert_eq!(LocationQuery::new().to_query_string(), "");
    }

    #[test]
    fn append_turns_value_into_list() {
        let mut map = LocationQuery::new();
        map.append("a", None);
        assert_eq!(map.get("a"), Some(&QueryValue::Null));
        map.append("a", Some("".to_string()));
        assert_eq!(
            map.get("a"),
            Some(&QueryValue::List(vec![None, Some("".to_string())]))
        );
        assert_eq!(map.get_str("a"), Some(""));
    }
}
