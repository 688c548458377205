use super::MatchPath;
use crate::{MatchMiss, Params, RouterError};

/// A path that matches exactly one string, case-sensitively.
///
/// # Examples
/// ```rust
/// use route_resolver::{MatchPath, Params, StaticPath};
///
/// let about = StaticPath::new("/about");
/// assert_eq!(about.match_path("/about"), Ok(Params::new()));
/// assert!(about.match_path("/About").is_err());
/// assert_eq!(about.build_path(&Params::new()).unwrap(), "/about");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct StaticPath(String);

impl StaticPath {
    pub fn new(path: impl Into<String>) -> Self {
        Self(path.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl MatchPath for StaticPath {
    fn match_path(&self, path: &str) -> Result<Params, MatchMiss> {
        if path == self.0 {
            Ok(Params::new())
        } else {
            Err(MatchMiss)
        }
    }

    fn build_path(&self, _params: &Params) -> Result<String, RouterError> {
        Ok(self.0.clone())
    }
}
