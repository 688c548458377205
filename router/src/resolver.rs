use crate::{
    location::{normalize_hash, parse_url, stringify_url},
    matching::{MatchHash, MatchPath, RouteDef, RouteRecord, RouteTable},
    query::stringify_query,
    LocationQuery, MatchMiss, Params, ResolverOptions, RouteName, RouterError,
    NO_MATCH,
};
use parking_lot::{RwLock, RwLockReadGuard, RwLockWriteGuard};
use std::{fmt, sync::Arc};

/// A location given as a path, possibly with a query and hash.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LocationAsPath {
    pub path: String,
    /// Replaces any query in `path`.
    pub query: Option<LocationQuery>,
    /// Replaces any hash in `path`.
    pub hash: Option<String>,
}

impl LocationAsPath {
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            ..Default::default()
        }
    }

    pub fn query(mut self, query: LocationQuery) -> Self {
        self.query = Some(query);
        self
    }

    pub fn hash(mut self, hash: impl Into<String>) -> Self {
        self.hash = Some(hash.into());
        self
    }
}

/// A location given by route name and params.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocationAsName {
    pub name: RouteName,
    pub params: Params,
    /// Wins over the query built from params.
    pub query: Option<LocationQuery>,
    /// Used when the route has no hash pattern, or it builds nothing.
    pub hash: Option<String>,
}

impl LocationAsName {
    pub fn new(name: impl Into<RouteName>) -> Self {
        Self {
            name: name.into(),
            params: Params::new(),
            query: None,
            hash: None,
        }
    }

    pub fn params(mut self, params: Params) -> Self {
        self.params = params;
        self
    }

    pub fn query(mut self, query: LocationQuery) -> Self {
        self.query = Some(query);
        self
    }

    pub fn hash(mut self, hash: impl Into<String>) -> Self {
        self.hash = Some(hash.into());
        self
    }
}

/// A location given as changes to the current location.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LocationAsRelative {
    /// Merged over the current params.
    pub params: Params,
    /// Merged over the current query.
    pub query: Option<LocationQuery>,
    /// Replaces the current hash.
    pub hash: Option<String>,
}

impl LocationAsRelative {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn params(mut self, params: Params) -> Self {
        self.params = params;
        self
    }

    pub fn query(mut self, query: LocationQuery) -> Self {
        self.query = Some(query);
        self
    }

    pub fn hash(mut self, hash: impl Into<String>) -> Self {
        self.hash = Some(hash.into());
        self
    }
}

/// Every shape of location [`Resolver::resolve`] accepts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RouteLocationRaw {
    /// A URL-like string: path, query and hash. Relative paths resolve
    /// against the current location.
    String(String),
    Path(LocationAsPath),
    Named(LocationAsName),
    Relative(LocationAsRelative),
}

impl From<&str> for RouteLocationRaw {
    fn from(value: &str) -> Self {
        RouteLocationRaw::String(value.to_string())
    }
}

impl From<String> for RouteLocationRaw {
    fn from(value: String) -> Self {
        RouteLocationRaw::String(value)
    }
}

impl From<LocationAsPath> for RouteLocationRaw {
    fn from(value: LocationAsPath) -> Self {
        RouteLocationRaw::Path(value)
    }
}

impl From<LocationAsName> for RouteLocationRaw {
    fn from(value: LocationAsName) -> Self {
        RouteLocationRaw::Named(value)
    }
}

impl From<LocationAsRelative> for RouteLocationRaw {
    fn from(value: LocationAsRelative) -> Self {
        RouteLocationRaw::Relative(value)
    }
}

/// The result of resolving a location.
pub struct ResolvedLocation<T> {
    /// The name of the matched route, or [`NO_MATCH`].
    pub name: RouteName,
    /// The encoded path.
    pub path: String,
    pub query: LocationQuery,
    /// The decoded hash, with its leading `#`, or empty.
    pub hash: String,
    /// Params read from the path, the query and the hash.
    pub params: Params,
    /// The matched records, from the root down. Empty for no match.
    pub matched: Vec<Arc<RouteRecord<T>>>,
    /// Path, query and encoded hash together.
    pub full_path: String,
}

impl<T> ResolvedLocation<T> {
    fn no_match(path: String, query: LocationQuery, hash: String) -> Self {
        let full_path = stringify_url(&path, &stringify_query(&query), &hash);
        Self {
            name: NO_MATCH,
            path,
            query,
            hash,
            params: Params::new(),
            matched: Vec::new(),
            full_path,
        }
    }

    /// Whether no route matched.
    pub fn is_no_match(&self) -> bool {
        self.name.is_no_match()
    }

    /// The deepest matched record.
    pub fn leaf(&self) -> Option<&Arc<RouteRecord<T>>> {
        self.matched.last()
    }
}

impl<T> Clone for ResolvedLocation<T> {
    fn clone(&self) -> Self {
        Self {
            name: self.name.clone(),
            path: self.path.clone(),
            query: self.query.clone(),
            hash: self.hash.clone(),
            params: self.params.clone(),
            matched: self.matched.clone(),
            full_path: self.full_path.clone(),
        }
    }
}

impl<T> fmt::Debug for ResolvedLocation<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResolvedLocation")
            .field("name", &self.name)
            .field("path", &self.path)
            .field("query", &self.query)
            .field("hash", &self.hash)
            .field("params", &self.params)
            .field("matched", &self.matched)
            .field("full_path", &self.full_path)
            .finish()
    }
}

/// Holds the compiled routes and resolves locations against them.
///
/// When several routes match the same path, the one with the lowest rank
/// wins: routes added first win over routes added later, and within one
/// added tree, nested routes win over the routes containing them.
///
/// ```rust
/// use route_resolver::{params, LocationAsName, RouteDef, Resolver};
///
/// let mut resolver = Resolver::<()>::new();
/// resolver
///     .add_matcher(RouteDef::new("/users/:id").name("user"))
///     .unwrap();
///
/// let location = resolver.resolve("/users/42?tab=info#top", None).unwrap();
/// assert_eq!(location.name, "user");
/// assert_eq!(location.params.get_str("id"), Some("42"));
/// assert_eq!(location.query.get_str("tab"), Some("info"));
/// assert_eq!(location.hash, "#top");
///
/// let named = resolver
///     .resolve(LocationAsName::new("user").params(params! { "id" => "7" }), None)
///     .unwrap();
/// assert_eq!(named.full_path, "/users/7");
/// ```
pub struct Resolver<T = ()> {
    table: RouteTable<T>,
    options: ResolverOptions,
}

impl<T> Default for Resolver<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> fmt::Debug for Resolver<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Resolver")
            .field("options", &self.options)
            .field("records", &self.table.len())
            .finish()
    }
}

impl<T> Resolver<T> {
    pub fn new() -> Self {
        Self::with_options(ResolverOptions::default())
    }

    pub fn with_options(options: ResolverOptions) -> Self {
        Self {
            table: RouteTable::default(),
            options,
        }
    }

    pub fn options(&self) -> &ResolverOptions {
        &self.options
    }

    /// Compiles a route tree and adds it. Returns the record of its root.
    pub fn add_matcher(
        &mut self,
        def: RouteDef<T>,
    ) -> Result<Arc<RouteRecord<T>>, RouterError> {
        self.table.insert(&def, None, self.options.path_options())
    }

    /// Compiles a route tree nested under the route named `parent`.
    pub fn add_child_matcher(
        &mut self,
        parent: impl Into<RouteName>,
        def: RouteDef<T>,
    ) -> Result<Arc<RouteRecord<T>>, RouterError> {
        let parent = parent.into();
        self.table
            .insert(&def, Some(&parent), self.options.path_options())
    }

    /// Removes the route named `name`, and its aliases.
    ///
    /// Routes nested under it are not removed. They stay in the table but
    /// no longer resolve until removed too.
    pub fn remove_matcher(
        &mut self,
        name: impl Into<RouteName>,
    ) -> Option<Arc<RouteRecord<T>>> {
        let name = name.into();
        let removed = self.table.remove(&name);
        if removed.is_some() {
            tracing::debug!("removed route {name}");
        }
        removed
    }

    pub fn clear_matchers(&mut self) {
        self.table.clear();
    }

    pub fn has_matcher(&self, name: impl Into<RouteName>) -> bool {
        self.table.key_of(&name.into()).is_some()
    }

    pub fn get_matcher(
        &self,
        name: impl Into<RouteName>,
    ) -> Option<Arc<RouteRecord<T>>> {
        self.table.get_by_name(&name.into()).cloned()
    }

    /// Every record, in the order they are tried.
    pub fn get_matchers(&self) -> Vec<Arc<RouteRecord<T>>> {
        self.table.iter().map(|(_, record)| Arc::clone(record)).collect()
    }

    /// Resolves a location.
    ///
    /// String and path locations that match nothing resolve to a location
    /// named [`NO_MATCH`]. Named and relative locations fail instead.
    #[tracing::instrument(level = "trace", skip_all)]
    pub fn resolve(
        &self,
        to: impl Into<RouteLocationRaw>,
        current: Option<&ResolvedLocation<T>>,
    ) -> Result<ResolvedLocation<T>, RouterError> {
        let current_path = current.map(|c| c.path.as_str()).unwrap_or("/");
        match to.into() {
            RouteLocationRaw::String(location) => {
                let (path, query, hash) =
                    parse_url(&location, current_path).into_parts();
                Ok(self.match_location(path, query, hash))
            }
            RouteLocationRaw::Path(to) => {
                let (path, mut query, mut hash) =
                    parse_url(&to.path, current_path).into_parts();
                if let Some(explicit) = to.query {
                    query = explicit;
                }
                if let Some(explicit) = to.hash {
                    hash = normalize_hash(&explicit);
                }
                Ok(self.match_location(path, query, hash))
            }
            RouteLocationRaw::Named(to) => self.build_location(
                &to.name,
                to.params,
                LocationQuery::new(),
                to.query.unwrap_or_default(),
                to.hash,
            ),
            RouteLocationRaw::Relative(to) => {
                let current = current.ok_or(RouterError::MissingCurrentLocation)?;
                if current.is_no_match() {
                    return Err(RouterError::NoMatchCurrentLocation);
                }
                let mut params = current.params.clone();
                params.merge(to.params);
                self.build_location(
                    &current.name,
                    params,
                    current.query.clone(),
                    to.query.unwrap_or_default(),
                    to.hash.or_else(|| Some(current.hash.clone())),
                )
            }
        }
    }

    fn match_location(
        &self,
        path: String,
        query: LocationQuery,
        hash: String,
    ) -> ResolvedLocation<T> {
        for (key, record) in self.table.iter() {
            if record.is_group() {
                continue;
            }
            let Ok(path_params) = record.match_path(&path) else {
                continue;
            };
            let Ok(hash_params) = record.match_hash(&hash) else {
                tracing::trace!("route {} missed on hash {hash:?}", record.name());
                continue;
            };
            let Some(matched) = self.table.chain(key) else {
                tracing::warn!(
                    "route {} matches {path:?} but one of its parents was \
                     removed",
                    record.name()
                );
                continue;
            };

            let Ok(query_params) = match_chain_query(&matched, &query) else {
                tracing::trace!("route {} missed on query", record.name());
                continue;
            };

            let mut params = path_params;
            params.merge(query_params);
            params.merge(hash_params);

            let name = self.table.public_name(record);
            tracing::debug!("{path:?} matched route {name}");
            let full_path = stringify_url(&path, &stringify_query(&query), &hash);
            return ResolvedLocation {
                name,
                path,
                query,
                hash,
                params,
                matched,
                full_path,
            };
        }

        tracing::debug!("{path:?} matched no route");
        ResolvedLocation::no_match(path, query, hash)
    }

    /// Builds the location of the route named `name`. `base_query` is
    /// overridden by the query built from params, which is overridden by
    /// `explicit_query`. Keys of the chain's query patterns that build
    /// nothing are dropped from `base_query`.
    ///
    /// The returned params are read back from the built location, so they
    /// are typed and defaulted exactly as if its full path was resolved.
    fn build_location(
        &self,
        name: &RouteName,
        params: Params,
        base_query: LocationQuery,
        explicit_query: LocationQuery,
        hash: Option<String>,
    ) -> Result<ResolvedLocation<T>, RouterError> {
        let key = self
            .table
            .key_of(name)
            .ok_or_else(|| RouterError::UnknownName(name.clone()))?;
        let record = self
            .table
            .get(key)
            .ok_or_else(|| RouterError::UnknownName(name.clone()))?;
        if record.is_group() {
            return Err(RouterError::GroupRecord(name.clone()));
        }
        let matched = self
            .table
            .chain(key)
            .ok_or_else(|| RouterError::DetachedRecord(name.clone()))?;

        let path = record.path_pattern().build_path(&params)?;
        let built_hash = match &record.hash {
            Some(pattern) => pattern.build_hash(&params)?,
            None => String::new(),
        };
        let hash = if built_hash.is_empty() {
            hash.as_deref().map(normalize_hash).unwrap_or_default()
        } else {
            built_hash
        };

        let mut built = LocationQuery::new();
        for r in &matched {
            built.merge(r.build_own_query(&params)?);
        }
        let mut query = base_query;
        for key in matched.iter().flat_map(|r| r.own_query_keys()) {
            if !built.contains_key(key) {
                query.remove(key);
            }
        }
        query.merge(built);
        query.merge(explicit_query);

        let full_path = stringify_url(&path, &stringify_query(&query), &hash);
        tracing::debug!("built {full_path:?} for route {name}");

        let read_back = record.match_path(&path).and_then(|mut read| {
            read.merge(match_chain_query(&matched, &query)?);
            read.merge(record.match_hash(&hash)?);
            Ok(read)
        });
        let params = match read_back {
            Ok(read) => read,
            Err(MatchMiss) => {
                tracing::warn!(
                    "route {name} does not match its own location {full_path:?}, \
                     keeping the given params"
                );
                params
            }
        };

        Ok(ResolvedLocation {
            name: self.table.public_name(record),
            path,
            query,
            hash,
            params,
            matched,
            full_path,
        })
    }

    /// The URL of `location`, with the configured base.
    pub fn href(&self, location: &ResolvedLocation<T>) -> String {
        let base = self.options.base.trim_end_matches('/');
        format!("{base}{}", location.full_path)
    }

    /// Removes the configured base from `pathname`, ignoring case.
    pub fn strip_base<'a>(&self, pathname: &'a str) -> &'a str {
        crate::strip_base(pathname, self.options.base.trim_end_matches('/'))
    }
}

/// Matches the query patterns of every record in `chain`, root first.
fn match_chain_query<T>(
    chain: &[Arc<RouteRecord<T>>],
    query: &LocationQuery,
) -> Result<Params, MatchMiss> {
    let mut params = Params::new();
    for record in chain {
        params.merge(record.match_own_query(query)?);
    }
    Ok(params)
}

/// A [`Resolver`] that can be shared between threads.
///
/// Resolution takes a read lock. Adding and removing routes takes the write
/// lock, so it never overlaps with a resolution.
pub struct SharedResolver<T = ()>(Arc<RwLock<Resolver<T>>>);

impl<T> Clone for SharedResolver<T> {
    fn clone(&self) -> Self {
        Self(Arc::clone(&self.0))
    }
}

impl<T> Default for SharedResolver<T> {
    fn default() -> Self {
        Self::new(Resolver::new())
    }
}

impl<T> fmt::Debug for SharedResolver<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("SharedResolver").field(&*self.0.read()).finish()
    }
}

impl<T> From<Resolver<T>> for SharedResolver<T> {
    fn from(value: Resolver<T>) -> Self {
        Self::new(value)
    }
}

impl<T> SharedResolver<T> {
    pub fn new(resolver: Resolver<T>) -> Self {
        Self(Arc::new(RwLock::new(resolver)))
    }

    pub fn read(&self) -> RwLockReadGuard<'_, Resolver<T>> {
        self.0.read()
    }

    pub fn write(&self) -> RwLockWriteGuard<'_, Resolver<T>> {
        self.0.write()
    }

    pub fn resolve(
        &self,
        to: impl Into<RouteLocationRaw>,
        current: Option<&ResolvedLocation<T>>,
    ) -> Result<ResolvedLocation<T>, RouterError> {
        self.0.read().resolve(to, current)
    }

    pub fn add_matcher(
        &self,
        def: RouteDef<T>,
    ) -> Result<Arc<RouteRecord<T>>, RouterError> {
        self.0.write().add_matcher(def)
    }

    pub fn add_child_matcher(
        &self,
        parent: impl Into<RouteName>,
        def: RouteDef<T>,
    ) -> Result<Arc<RouteRecord<T>>, RouterError> {
        self.0.write().add_child_matcher(parent, def)
    }

    pub fn remove_matcher(
        &self,
        name: impl Into<RouteName>,
    ) -> Option<Arc<RouteRecord<T>>> {
        self.0.write().remove_matcher(name)
    }

    pub fn clear_matchers(&self) {
        self.0.write().clear_matchers()
    }
}
