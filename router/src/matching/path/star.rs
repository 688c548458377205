use super::MatchPath;
use crate::{
    encoding::{decode, encode_path},
    MatchMiss, ParamValue, Params, RouterError,
};

/// A catch-all: matches a fixed prefix and captures everything after it.
///
/// The prefix itself (with or without a trailing `/`) matches with an empty
/// remainder.
///
/// # Examples
/// ```rust
/// use route_resolver::{params, MatchPath, StarPath};
///
/// let docs = StarPath::new("/docs", "rest");
/// let params = docs.match_path("/docs/guide/intro").unwrap();
/// assert_eq!(params.get_str("rest"), Some("guide/intro"));
/// assert_eq!(docs.build_path(&params).unwrap(), "/docs/guide/intro");
/// assert_eq!(docs.build_path(&params! {}).unwrap(), "/docs");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct StarPath {
    /// The prefix, without a trailing `/`. Empty for a root catch-all.
    prefix: String,
    param: String,
}

impl StarPath {
    pub fn new(prefix: impl Into<String>, param: impl Into<String>) -> Self {
        let prefix: String = prefix.into();
        Self {
            prefix: prefix.trim_end_matches('/').to_string(),
            param: param.into(),
        }
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    pub fn param(&self) -> &str {
        &self.param
    }
}

impl MatchPath for StarPath {
    fn match_path(&self, path: &str) -> Result<Params, MatchMiss> {
        let rest = path.strip_prefix(self.prefix.as_str()).ok_or(MatchMiss)?;
        let rest = if rest.is_empty() {
            rest
        } else {
            rest.strip_prefix('/').ok_or(MatchMiss)?
        };
        let mut params = Params::with_capacity(1);
        params.insert(self.param.clone(), decode(rest).into_owned());
        Ok(params)
    }

    fn build_path(&self, params: &Params) -> Result<String, RouterError> {
        let rest = match params.get(&self.param) {
            None | Some(ParamValue::Null) => "",
            Some(ParamValue::String(rest)) => rest.as_str(),
            Some(other) => {
                return Err(RouterError::InvalidParam {
                    param: self.param.clone(),
                    reason: format!("expected a string, found {other:?}"),
                })
            }
        };
        let path = if rest.is_empty() {
            self.prefix.clone()
        } else {
            format!("{}/{}", self.prefix, encode_path(rest))
        };
        Ok(if path.is_empty() { "/".to_string() } else { path })
    }
}
