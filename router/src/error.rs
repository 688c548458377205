use crate::RouteName;
use thiserror::Error;

/// Signals that a pattern did not match its input.
///
/// This is not an error: the resolver recovers from it by trying the next
/// candidate record, or by returning the no-match location.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MatchMiss;

/// Errors surfaced by the compiler and by named or relative resolution.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RouterError {
    #[error("no route named {0}")]
    UnknownName(RouteName),
    #[error("cannot resolve a relative location without a current location")]
    MissingCurrentLocation,
    #[error(
        "cannot resolve a relative location against a location that matched \
         nothing"
    )]
    NoMatchCurrentLocation,
    #[error("route {0} only groups its children and cannot be resolved")]
    GroupRecord(RouteName),
    #[error("route {0} was detached when one of its ancestors was removed")]
    DetachedRecord(RouteName),
    #[error("could not find parameter {0}")]
    MissingParam(String),
    #[error("invalid value for param \"{param}\": {reason}")]
    InvalidParam { param: String, reason: String },
    #[error("invalid path pattern \"{pattern}\": {reason}")]
    InvalidPattern { pattern: String, reason: String },
    #[error("a route named {0} already exists")]
    DuplicateName(RouteName),
    #[error("the no-match name is reserved")]
    ReservedName,
    #[error("route with a custom path pattern cannot have relative children")]
    CannotNest,
    #[error("no parent route named {0}")]
    UnknownParent(RouteName),
    #[error("config error: {0}")]
    Config(String),
}

impl From<config::ConfigError> for RouterError {
    fn from(e: config::ConfigError) -> Self {
        Self::Config(e.to_string())
    }
}

/// A param parser rejected a value.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{0}")]
pub struct ParamError(pub String);

impl ParamError {
    pub fn new(reason: impl Into<String>) -> Self {
        Self(reason.into())
    }

    pub(crate) fn into_router_error(self, param: &str) -> RouterError {
        RouterError::InvalidParam {
            param: param.to_string(),
            reason: self.0,
        }
    }
}
