mod dynamic;
mod star;
mod static_path;

use super::tokenize_path;
use crate::{MatchMiss, ParamParser, Params, RouterError};
pub use dynamic::*;
use rustc_hash::FxHashMap;
pub use star::*;
pub use static_path::*;
use std::{fmt::Debug, sync::Arc};

/// Matches the path of a location and builds it back from params.
///
/// `build_path` must be the exact inverse of `match_path` for canonical
/// paths: `build_path(match_path(p)) == p`.
pub trait MatchPath: Debug + Send + Sync {
    fn match_path(&self, path: &str) -> Result<Params, MatchMiss>;

    fn build_path(&self, params: &Params) -> Result<String, RouterError>;
}

impl MatchPath for Box<dyn MatchPath> {
    fn match_path(&self, path: &str) -> Result<Params, MatchMiss> {
        (**self).match_path(path)
    }

    fn build_path(&self, params: &Params) -> Result<String, RouterError> {
        (**self).build_path(params)
    }
}

impl MatchPath for Arc<dyn MatchPath> {
    fn match_path(&self, path: &str) -> Result<Params, MatchMiss> {
        (**self).match_path(path)
    }

    fn build_path(&self, params: &Params) -> Result<String, RouterError> {
        (**self).build_path(params)
    }
}

/// How path strings are compiled into patterns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PathOptions {
    /// Case-sensitive matching.
    pub sensitive: bool,
    /// A trailing slash must match exactly.
    pub strict: bool,
}

impl Default for PathOptions {
    fn default() -> Self {
        Self {
            sensitive: true,
            strict: true,
        }
    }
}

/// The path half of a route record.
#[derive(Debug, Clone)]
pub enum PathPattern {
    Static(StaticPath),
    Star(StarPath),
    Dynamic(DynamicPath),
    Custom(Arc<dyn MatchPath>),
}

impl PathPattern {
    /// Compiles a path pattern with default options and string params.
    pub fn parse(pattern: &str) -> Result<Self, RouterError> {
        Self::compile(pattern, PathOptions::default(), &FxHashMap::default())
    }

    pub fn custom(matcher: impl MatchPath + 'static) -> Self {
        PathPattern::Custom(Arc::new(matcher))
    }

    /// Picks the simplest primitive able to match `pattern`.
    pub fn compile(
        pattern: &str,
        options: PathOptions,
        parsers: &FxHashMap<String, ParamParser>,
    ) -> Result<Self, RouterError> {
        let tokenized = tokenize_path(pattern)?;
        let exact = options.sensitive && options.strict;

        if exact && !tokenized.has_dynamic_parts() {
            let mut literal: String = tokenized
                .segments
                .iter()
                .filter_map(|s| s.as_static())
                .map(|s| format!("/{s}"))
                .collect();
            if literal.is_empty() || tokenized.trailing_slash {
                literal.push('/');
            }
            return Ok(PathPattern::Static(StaticPath::new(literal)));
        }

        if options.sensitive && tokenized.params().next().is_none() {
            if let Some((last, prefix)) = tokenized.segments.split_last() {
                if let (Some(name), true) =
                    (last.splat(), prefix.iter().all(|s| s.is_static()))
                {
                    let prefix = prefix
                        .iter()
                        .filter_map(|s| s.as_static())
                        .fold(String::new(), |acc, s| acc + "/" + &s);
                    return Ok(PathPattern::Star(StarPath::new(prefix, name)));
                }
            }
        }

        DynamicPath::from_tokens(pattern, &tokenized, options, parsers)
            .map(PathPattern::Dynamic)
    }
}

impl MatchPath for PathPattern {
    fn match_path(&self, path: &str) -> Result<Params, MatchMiss> {
        match self {
            PathPattern::Static(p) => p.match_path(path),
            PathPattern::Star(p) => p.match_path(path),
            PathPattern::Dynamic(p) => p.match_path(path),
            PathPattern::Custom(p) => p.match_path(path),
        }
    }

    fn build_path(&self, params: &Params) -> Result<String, RouterError> {
        match self {
            PathPattern::Static(p) => p.build_path(params),
            PathPattern::Star(p) => p.build_path(params),
            PathPattern::Dynamic(p) => p.build_path(params),
            PathPattern::Custom(p) => p.build_path(params),
        }
    }
}

impl From<StaticPath> for PathPattern {
    fn from(value: StaticPath) -> Self {
        PathPattern::Static(value)
    }
}

impl From<StarPath> for PathPattern {
    fn from(value: StarPath) -> Self {
        PathPattern::Star(value)
    }
}

impl From<DynamicPath> for PathPattern {
    fn from(value: DynamicPath) -> Self {
        PathPattern::Dynamic(value)
    }
}
