use crate::{
    encoding::{decode, encode_hash},
    query::{parse_query, LocationQuery},
    resolve_relative_path,
};

/// A URL-shaped string split into its path, query and hash.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Url {
    path: String,
    search: String,
    query: LocationQuery,
    hash: String,
    raw_hash: String,
}

impl Url {
    /// The path, resolved against the current path and still encoded.
    pub fn path(&self) -> &str {
        &self.path
    }

    /// The raw query string, without its leading `?`.
    pub fn search(&self) -> &str {
        &self.search
    }

    pub fn query(&self) -> &LocationQuery {
        &self.query
    }

    /// The decoded hash, including its leading `#`, or empty.
    pub fn hash(&self) -> &str {
        &self.hash
    }

    pub fn into_parts(self) -> (String, LocationQuery, String) {
        (self.path, self.query, self.hash)
    }

    /// The resolved path, followed by the query string and hash as they
    /// were given.
    pub fn to_full_path(&self) -> String {
        let mut path = self.path.clone();
        if !self.search.is_empty() {
            path.push('?');
            path.push_str(&self.search);
        }
        path.push_str(&self.raw_hash);
        path
    }
}

/// Splits `location` into path, query and hash.
///
/// A `#` that comes before the first `?` starts the hash, so the `?` belongs
/// to the hash. An empty or relative path is resolved against `current_path`.
pub fn parse_url(location: &str, current_path: &str) -> Url {
    let hash_pos = location.find('#');
    let search_pos = match (location.find('?'), hash_pos) {
        (Some(search), Some(hash)) if hash < search => None,
        (search, _) => search,
    };

    let path_end = search_pos.or(hash_pos).unwrap_or(location.len());
    let search = match search_pos {
        Some(start) => &location[start + 1..hash_pos.unwrap_or(location.len())],
        None => "",
    };
    let raw_hash = hash_pos.map_or("", |start| &location[start..]);

    let path = resolve_relative_path(&location[..path_end], current_path);
    Url {
        path: path.into_owned(),
        search: search.to_string(),
        query: parse_query(search),
        hash: decode(raw_hash).into_owned(),
        raw_hash: raw_hash.to_string(),
    }
}

/// Joins an encoded path, an already-serialized query string and a decoded
/// hash into a full path.
pub fn stringify_url(path: &str, search: &str, hash: &str) -> String {
    let mut full = String::with_capacity(path.len() + search.len() + hash.len() + 1);
    full.push_str(path);
    if !search.is_empty() {
        full.push('?');
        full.push_str(search);
    }
    if !hash.is_empty() {
        full.push_str(&encode_hash(hash));
    }
    full
}

/// Makes sure a hash starts with `#`, leaving an empty hash empty.
pub(crate) fn normalize_hash(hash: &str) -> String {
    if hash.is_empty() || hash.starts_with('#') {
        hash.to_string()
    } else {
        format!("#{hash}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_before_search_keeps_question_mark_in_hash() {
        let url = parse_url("/foo#bar?baz", "/");
        assert_eq!(url.path(), "/foo");
        assert_eq!(url.search(), "");
        assert!(url.query().is_empty());
        assert_eq!(url.hash(), "#bar?baz");
    }

    #[test]
    fn full_path_keeps_raw_search() {
        let url = parse_url("/foo?a=1&b#top", "/");
        assert_eq!(url.to_full_path(), "/foo?a=1&b#top");
    }

    #[test]
    fn full_path_keeps_raw_hash() {
        let url = parse_url("/foo#%7Bx%7D", "/");
        assert_eq!(url.hash(), "#{x}");
        assert_eq!(url.to_full_path(), "/foo#%7Bx%7D");

        let url = parse_url("/foo#a b", "/");
        assert_eq!(url.hash(), "#a b");
        assert_eq!(url.to_full_path(), "/foo#a b");
    }

    #[test]
    fn normalize_hash_adds_marker() {
        assert_eq!(normalize_hash("top"), "#top");
        assert_eq!(normalize_hash("#top"), "#top");
        assert_eq!(normalize_hash(""), "");
    }
}
