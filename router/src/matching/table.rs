use super::{
    join_paths, HashPattern, PathOptions, PathPattern, QueryPattern, RouteDef,
    RouteRecord,
};
use crate::{ParamParser, RouteName, RouterError};
use rustc_hash::{FxHashMap, FxHashSet};
use slotmap::SlotMap;
use std::sync::Arc;

slotmap::new_key_type! {
    /// Identifies a compiled record in its table. Keys of removed records
    /// never resolve again.
    pub struct RecordKey;
}

/// Owns every compiled record. Records refer to each other only by key.
pub(crate) struct RouteTable<T> {
    records: SlotMap<RecordKey, Arc<RouteRecord<T>>>,
    names: FxHashMap<RouteName, RecordKey>,
    /// Keys sorted by rank.
    order: Vec<RecordKey>,
    next_rank: u64,
}

impl<T> Default for RouteTable<T> {
    fn default() -> Self {
        Self {
            records: SlotMap::with_key(),
            names: FxHashMap::default(),
            order: Vec::new(),
            next_rank: 0,
        }
    }
}

impl<T> RouteTable<T> {
    /// Compiles `def` with all its children and aliases, and adds the
    /// records. Nothing is added if any of them fails to compile.
    #[tracing::instrument(level = "trace", skip_all)]
    pub fn insert(
        &mut self,
        def: &RouteDef<T>,
        parent: Option<&RouteName>,
        options: PathOptions,
    ) -> Result<Arc<RouteRecord<T>>, RouterError> {
        let parent = match parent {
            Some(name) => {
                let (key, record) = self
                    .key_of(name)
                    .and_then(|key| self.records.get(key).map(|r| (key, r)))
                    .ok_or_else(|| RouterError::UnknownParent(name.clone()))?;
                Some(Parent {
                    link: Link::Existing(key),
                    path: record.path_source.clone(),
                    parsers: record.parsers.clone(),
                })
            }
            None => None,
        };

        let mut compiler = Compiler {
            options,
            pending: Vec::new(),
            finished: Vec::new(),
        };
        let root = compiler.visit(def, parent.as_ref())?;
        self.check_names(&compiler.pending)?;

        let Compiler {
            pending, finished, ..
        } = compiler;
        let mut ranks = vec![0; pending.len()];
        for (position, idx) in finished.iter().enumerate() {
            ranks[*idx] = self.next_rank + position as u64;
        }
        self.next_rank += finished.len() as u64;

        // entries only link to earlier entries
        let mut keys: Vec<RecordKey> = Vec::with_capacity(pending.len());
        for (idx, entry) in pending.into_iter().enumerate() {
            let resolve = |link: Link| match link {
                Link::Pending(i) => keys[i],
                Link::Existing(key) => key,
            };
            let record = RouteRecord {
                parent: entry.parent.map(resolve),
                alias_of: entry.alias_of.map(|i| keys[i]),
                name: entry.name,
                path: entry.path,
                path_source: entry.path_source,
                query: entry.query,
                hash: entry.hash,
                group: entry.group,
                rank: ranks[idx],
                target: entry.target,
                parsers: entry.parsers,
            };
            tracing::trace!(
                "compiled route {} at {:?}",
                record.name,
                record.path_source
            );
            let name = record.name.clone();
            let key = self.records.insert(Arc::new(record));
            self.names.insert(name, key);
            keys.push(key);
        }
        self.order.extend(finished.into_iter().map(|idx| keys[idx]));

        Ok(Arc::clone(&self.records[keys[root]]))
    }

    fn check_names(&self, pending: &[Pending<T>]) -> Result<(), RouterError> {
        let mut seen = FxHashSet::default();
        for entry in pending {
            if entry.name.is_no_match() {
                return Err(RouterError::ReservedName);
            }
            if self.names.contains_key(&entry.name) || !seen.insert(&entry.name) {
                return Err(RouterError::DuplicateName(entry.name.clone()));
            }
        }
        Ok(())
    }

    pub fn key_of(&self, name: &RouteName) -> Option<RecordKey> {
        self.names.get(name).copied()
    }

    pub fn get(&self, key: RecordKey) -> Option<&Arc<RouteRecord<T>>> {
        self.records.get(key)
    }

    pub fn get_by_name(&self, name: &RouteName) -> Option<&Arc<RouteRecord<T>>> {
        self.key_of(name).and_then(|key| self.records.get(key))
    }

    /// Records in rank order.
    pub fn iter(&self) -> impl Iterator<Item = (RecordKey, &Arc<RouteRecord<T>>)> {
        self.order
            .iter()
            .filter_map(|key| self.records.get(*key).map(|record| (*key, record)))
    }

    /// Removes the record named `name` and the alias records of it.
    ///
    /// Records nested under it stay in the table, detached.
    pub fn remove(&mut self, name: &RouteName) -> Option<Arc<RouteRecord<T>>> {
        let key = self.names.remove(name)?;
        let record = self.records.remove(key)?;

        let aliases: Vec<RecordKey> = self
            .records
            .iter()
            .filter(|(_, r)| r.alias_of == Some(key))
            .map(|(k, _)| k)
            .collect();
        for alias in aliases {
            if let Some(removed) = self.records.remove(alias) {
                self.names.remove(&removed.name);
            }
        }

        self.order.retain(|k| self.records.contains_key(*k));
        Some(record)
    }

    pub fn clear(&mut self) {
        self.records.clear();
        self.names.clear();
        self.order.clear();
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// The records from the root down to `key`, or `None` if one of its
    /// ancestors was removed.
    pub fn chain(&self, key: RecordKey) -> Option<Vec<Arc<RouteRecord<T>>>> {
        let mut chain = Vec::new();
        let mut current = Some(key);
        while let Some(key) = current {
            let record = self.records.get(key)?;
            chain.push(Arc::clone(record));
            current = record.parent;
        }
        chain.reverse();
        Some(chain)
    }

    /// The name a location matching `record` reports: the original's name
    /// for an alias.
    pub fn public_name(&self, record: &RouteRecord<T>) -> RouteName {
        record
            .alias_of
            .and_then(|key| self.records.get(key))
            .map(|original| original.name.clone())
            .unwrap_or_else(|| record.name.clone())
    }
}

#[derive(Debug, Clone, Copy)]
enum Link {
    Pending(usize),
    Existing(RecordKey),
}

struct Parent {
    link: Link,
    /// `None` when the parent has a custom path pattern.
    path: Option<String>,
    parsers: FxHashMap<String, ParamParser>,
}

struct Pending<T> {
    name: RouteName,
    path: PathPattern,
    path_source: Option<String>,
    query: Vec<QueryPattern>,
    hash: Option<HashPattern>,
    parent: Option<Link>,
    alias_of: Option<usize>,
    group: bool,
    target: Option<Arc<T>>,
    parsers: FxHashMap<String, ParamParser>,
    /// Children compiled from the definition itself, not from aliases.
    children: Vec<usize>,
}

/// Flattens one declaration tree. Entries are pushed parents first;
/// `finished` lists them children first, which is their rank order.
struct Compiler<T> {
    options: PathOptions,
    pending: Vec<Pending<T>>,
    finished: Vec<usize>,
}

impl<T> Compiler<T> {
    fn visit(
        &mut self,
        def: &RouteDef<T>,
        parent: Option<&Parent>,
    ) -> Result<usize, RouterError> {
        let name = def.declared_name().cloned();
        let idx = self.push(def, def.path(), parent, None, name)?;
        let this = self.parent_of(idx);
        for child in def.children() {
            let child_idx = self.visit(child, Some(&this))?;
            self.pending[idx].children.push(child_idx);
        }
        self.finished.push(idx);

        for alias in def.aliases() {
            self.visit_alias(def, alias, parent, idx)?;
        }
        Ok(idx)
    }

    /// Compiles `def` again under `path`, as an alias of the entry
    /// `original`, together with copies of its children.
    fn visit_alias(
        &mut self,
        def: &RouteDef<T>,
        path: &str,
        parent: Option<&Parent>,
        original: usize,
    ) -> Result<usize, RouterError> {
        let idx = self.push(def, path, parent, Some(original), None)?;
        let this = self.parent_of(idx);
        let originals = self.pending[original].children.clone();
        for (child, child_original) in def.children().iter().zip(originals) {
            let child_idx =
                self.visit_alias(child, child.path(), Some(&this), child_original)?;
            self.pending[idx].children.push(child_idx);
            for alias in child.aliases() {
                self.visit_alias(child, alias, Some(&this), child_original)?;
            }
        }
        self.finished.push(idx);
        Ok(idx)
    }

    fn parent_of(&self, idx: usize) -> Parent {
        let entry = &self.pending[idx];
        Parent {
            link: Link::Pending(idx),
            path: entry.path_source.clone(),
            parsers: entry.parsers.clone(),
        }
    }

    fn push(
        &mut self,
        def: &RouteDef<T>,
        path: &str,
        parent: Option<&Parent>,
        alias_of: Option<usize>,
        name: Option<RouteName>,
    ) -> Result<usize, RouterError> {
        let mut parsers = parent.map(|p| p.parsers.clone()).unwrap_or_default();
        parsers.extend(def.parsers().iter().cloned());

        let (pattern, path_source) = match def.path_pattern() {
            Some(custom) => (custom.clone(), None),
            None => {
                let absolute = path.starts_with('/');
                let mut joined = match parent {
                    Some(Parent { path: None, .. }) if !absolute => {
                        return Err(RouterError::CannotNest)
                    }
                    Some(Parent {
                        path: Some(parent_path),
                        ..
                    }) if !absolute => join_paths(parent_path, path),
                    _ => join_paths("", path),
                };
                if path.len() > 1 && path.ends_with('/') && !joined.ends_with('/') {
                    joined.push('/');
                }
                let pattern = PathPattern::compile(&joined, self.options, &parsers)?;
                (pattern, Some(joined))
            }
        };

        let group = def.declared_target().is_none() && def.declared_name().is_none();
        self.pending.push(Pending {
            name: name.unwrap_or_else(RouteName::generate),
            path: pattern,
            path_source,
            query: def.query_patterns().to_vec(),
            hash: def.hash_pattern().cloned(),
            parent: parent.map(|p| p.link),
            alias_of,
            group,
            target: def.declared_target().cloned(),
            parsers,
            children: Vec::new(),
        });
        Ok(self.pending.len() - 1)
    }
}
