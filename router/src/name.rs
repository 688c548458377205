use std::{
    fmt,
    sync::{
        atomic::{AtomicU64, Ordering},
        Arc,
    },
};

static GENERATED_NAME: AtomicU64 = AtomicU64::new(1);

/// An opaque name handed to routes declared without one.
///
/// Generated names come from a process-wide counter, so they never collide
/// with each other or with explicit names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GeneratedName(u64);

impl GeneratedName {
    pub(crate) fn next() -> Self {
        Self(GENERATED_NAME.fetch_add(1, Ordering::Relaxed))
    }
}

/// The name of a route record.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum RouteName {
    /// A name chosen when declaring the route.
    Named(Arc<str>),
    /// A name generated for a route declared without one.
    Generated(GeneratedName),
    /// The name of a location that matched nothing.
    NoMatch,
}

/// The name reported by a location that matched no route.
pub const NO_MATCH: RouteName = RouteName::NoMatch;

impl RouteName {
    pub(crate) fn generate() -> Self {
        RouteName::Generated(GeneratedName::next())
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            RouteName::Named(name) => Some(name),
            _ => None,
        }
    }

    pub fn is_generated(&self) -> bool {
        matches!(self, RouteName::Generated(_))
    }

    pub fn is_no_match(&self) -> bool {
        matches!(self, RouteName::NoMatch)
    }
}

impl fmt::Display for RouteName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RouteName::Named(name) => write!(f, "\"{name}\""),
            RouteName::Generated(GeneratedName(id)) => write!(f, "<route #{id}>"),
            RouteName::NoMatch => f.write_str("<no match>"),
        }
    }
}

impl From<&str> for RouteName {
    fn from(value: &str) -> Self {
        RouteName::Named(value.into())
    }
}

impl From<String> for RouteName {
    fn from(value: String) -> Self {
        RouteName::Named(value.into())
    }
}

impl From<Arc<str>> for RouteName {
    fn from(value: Arc<str>) -> Self {
        RouteName::Named(value)
    }
}

impl From<&RouteName> for RouteName {
    fn from(value: &RouteName) -> Self {
        value.clone()
    }
}

impl PartialEq<str> for RouteName {
    fn eq(&self, other: &str) -> bool {
        self.as_str() == Some(other)
    }
}

impl PartialEq<&str> for RouteName {
    fn eq(&self, other: &&str) -> bool {
        self.as_str() == Some(*other)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generated_names_are_unique() {
        let a = RouteName::generate();
        let b = RouteName::generate();
        assert_ne!(a, b);
        assert!(a.is_generated());
        assert_eq!(a.as_str(), None);
    }

    #[test]
    fn no_match_never_equals_a_real_name() {
        assert_ne!(NO_MATCH, RouteName::from("<no match>"));
        assert_ne!(NO_MATCH, RouteName::generate());
        assert!(NO_MATCH.is_no_match());
    }

    #[test]
    fn compares_against_str() {
        assert_eq!(RouteName::from("user"), "user");
    }
}
