use super::{
    HashPattern, MatchHash, MatchPath, MatchQuery, PathPattern, QueryPattern,
    RecordKey,
};
use crate::{LocationQuery, MatchMiss, ParamParser, Params, RouteName, RouterError};
use rustc_hash::FxHashMap;
use std::{fmt, sync::Arc};

/// A route as declared by the application, before compilation.
///
/// `T` is the render target. The resolver never looks inside it, only
/// whether a route has one.
///
/// ```rust
/// use route_resolver::{ParamParser, QueryParam, RouteDef};
///
/// let users = RouteDef::<&str>::new("/users")
///     .query(QueryParam::new("sort"))
///     .child(
///         RouteDef::new(":id")
///             .name("user")
///             .target("UserPage")
///             .param("id", ParamParser::Int),
///     );
/// assert_eq!(users.children().len(), 1);
/// ```
pub struct RouteDef<T> {
    path: String,
    path_pattern: Option<PathPattern>,
    name: Option<RouteName>,
    target: Option<Arc<T>>,
    parsers: Vec<(String, ParamParser)>,
    query: Vec<QueryPattern>,
    hash: Option<HashPattern>,
    alias: Vec<String>,
    children: Vec<RouteDef<T>>,
}

impl<T> RouteDef<T> {
    /// Declares a route matching `path`, relative to its parent unless it
    /// starts with `/`.
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            path_pattern: None,
            name: None,
            target: None,
            parsers: Vec::new(),
            query: Vec::new(),
            hash: None,
            alias: Vec::new(),
            children: Vec::new(),
        }
    }

    /// Declares a route matched by a hand-written path pattern.
    ///
    /// Children of such a route must use absolute paths.
    pub fn with_pattern(pattern: impl Into<PathPattern>) -> Self {
        let mut def = Self::new(String::new());
        def.path_pattern = Some(pattern.into());
        def
    }

    pub fn name(mut self, name: impl Into<RouteName>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn target(mut self, target: impl Into<Arc<T>>) -> Self {
        self.target = Some(target.into());
        self
    }

    /// Sets the parser for a path param. Nested routes inherit it.
    pub fn param(mut self, param: impl Into<String>, parser: ParamParser) -> Self {
        self.parsers.push((param.into(), parser));
        self
    }

    pub fn query(mut self, pattern: impl Into<QueryPattern>) -> Self {
        self.query.push(pattern.into());
        self
    }

    pub fn hash(mut self, pattern: impl Into<HashPattern>) -> Self {
        self.hash = Some(pattern.into());
        self
    }

    /// Adds another path under which this route, and its children, match.
    pub fn alias(mut self, path: impl Into<String>) -> Self {
        self.alias.push(path.into());
        self
    }

    pub fn child(mut self, child: RouteDef<T>) -> Self {
        self.children.push(child);
        self
    }

    pub fn children(&self) -> &[RouteDef<T>] {
        &self.children
    }

    pub fn with_children(
        mut self,
        children: impl IntoIterator<Item = RouteDef<T>>,
    ) -> Self {
        self.children.extend(children);
        self
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub(crate) fn path_pattern(&self) -> Option<&PathPattern> {
        self.path_pattern.as_ref()
    }

    pub(crate) fn declared_name(&self) -> Option<&RouteName> {
        self.name.as_ref()
    }

    pub(crate) fn declared_target(&self) -> Option<&Arc<T>> {
        self.target.as_ref()
    }

    pub(crate) fn parsers(&self) -> &[(String, ParamParser)] {
        &self.parsers
    }

    pub(crate) fn query_patterns(&self) -> &[QueryPattern] {
        &self.query
    }

    pub(crate) fn hash_pattern(&self) -> Option<&HashPattern> {
        self.hash.as_ref()
    }

    pub(crate) fn aliases(&self) -> &[String] {
        &self.alias
    }
}

impl<T> fmt::Debug for RouteDef<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RouteDef")
            .field("path", &self.path)
            .field("name", &self.name)
            .field("alias", &self.alias)
            .field("children", &self.children)
            .finish_non_exhaustive()
    }
}

/// A compiled route: the unit the resolver matches against.
pub struct RouteRecord<T> {
    pub(crate) name: RouteName,
    pub(crate) path: PathPattern,
    /// The joined path string, when compiled from one.
    pub(crate) path_source: Option<String>,
    pub(crate) query: Vec<QueryPattern>,
    pub(crate) hash: Option<HashPattern>,
    pub(crate) parent: Option<RecordKey>,
    pub(crate) alias_of: Option<RecordKey>,
    pub(crate) group: bool,
    pub(crate) rank: u64,
    pub(crate) target: Option<Arc<T>>,
    pub(crate) parsers: FxHashMap<String, ParamParser>,
}

impl<T> RouteRecord<T> {
    /// The name of this record in the table. Alias records carry a
    /// generated name of their own.
    pub fn name(&self) -> &RouteName {
        &self.name
    }

    pub fn path_pattern(&self) -> &PathPattern {
        &self.path
    }

    /// The absolute path this record was compiled from, if any.
    pub fn path(&self) -> Option<&str> {
        self.path_source.as_deref()
    }

    pub fn parent(&self) -> Option<RecordKey> {
        self.parent
    }

    /// The record this one is an alias of.
    pub fn alias_of(&self) -> Option<RecordKey> {
        self.alias_of
    }

    /// Whether this record only hosts children.
    pub fn is_group(&self) -> bool {
        self.group
    }

    /// Lower ranks are tried first.
    pub fn rank(&self) -> u64 {
        self.rank
    }

    pub fn target(&self) -> Option<&T> {
        self.target.as_deref()
    }

    pub fn param_parser(&self, param: &str) -> Option<&ParamParser> {
        self.parsers.get(param)
    }

    pub(crate) fn match_own_query(
        &self,
        query: &LocationQuery,
    ) -> Result<Params, MatchMiss> {
        let mut params = Params::new();
        for pattern in &self.query {
            params.merge(pattern.match_query(query)?);
        }
        Ok(params)
    }

    pub(crate) fn build_own_query(
        &self,
        params: &Params,
    ) -> Result<LocationQuery, RouterError> {
        let mut query = LocationQuery::new();
        for pattern in &self.query {
            query.merge(pattern.build_query(params)?);
        }
        Ok(query)
    }

    /// The query keys owned by this record's own query patterns.
    pub(crate) fn own_query_keys(&self) -> impl Iterator<Item = &str> + '_ {
        self.query.iter().flat_map(|pattern| pattern.query_keys())
    }

    pub(crate) fn match_hash(&self, hash: &str) -> Result<Params, MatchMiss> {
        match &self.hash {
            Some(pattern) => pattern.match_hash(hash),
            None => Ok(Params::new()),
        }
    }

    pub(crate) fn match_path(&self, path: &str) -> Result<Params, MatchMiss> {
        self.path.match_path(path)
    }
}

impl<T> fmt::Debug for RouteRecord<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RouteRecord")
            .field("name", &self.name)
            .field("path", &self.path_source)
            .field("parent", &self.parent)
            .field("alias_of", &self.alias_of)
            .field("group", &self.group)
            .field("rank", &self.rank)
            .finish_non_exhaustive()
    }
}
