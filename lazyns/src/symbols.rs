//!
//! Symbol Table - Host Environment Namespaces
//!
//! This module models the host environment the loaders write into. It stores
//! a tree of scopes, each holding named members that are either nested
//! namespaces or plain values.
//!
//! Creating and looking up are separate operations:
//!
//! - `lookup_direct_member` only reads. It never materializes anything, never
//!   creates anything and only looks at the immediate scope, not its parents.
//! - `define_namespace` creates a namespace, or reopens it when a namespace of
//!   that name already exists in the scope.
//!
//! Lazy entries are owned by the loaders, not by the table, so anything the
//! table reports is already defined.
//!

use indexmap::IndexMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ScopeId(usize);

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Symbol {
    Namespace(ScopeId),
    Value(String),
}

impl Symbol {
    pub fn as_namespace(&self) -> Option<ScopeId> {
        match self {
            Symbol::Namespace(id) => Some(*id),
            Symbol::Value(_) => None,
        }
    }
}

#[derive(Debug, Clone)]
struct Scope {
    name: String,
    parent: Option<ScopeId>,
    members: IndexMap<String, Symbol>,
    payload: Option<String>,
}

impl Scope {
    fn new(name: &str, parent: Option<ScopeId>) -> Self {
        Self {
            name: name.to_string(),
            parent,
            members: IndexMap::new(),
            payload: None,
        }
    }
}

/// Scopes live in an arena indexed by `ScopeId`. Removing a namespace member
/// detaches its scope; the slot itself is never reused, so stale ids stay
/// harmless.
#[derive(Debug, Clone)]
pub struct SymbolTable {
    scopes: Vec<Scope>,
}

impl SymbolTable {
    pub fn new() -> Self {
        Self {
            scopes: vec![Scope::new("", None)],
        }
    }

    pub fn root(&self) -> ScopeId {
        ScopeId(0)
    }

    pub fn lookup_direct_member(&self, scope: ScopeId, name: &str) -> Option<&Symbol> {
        self.scopes.get(scope.0)?.members.get(name)
    }

    pub fn is_defined(&self, scope: ScopeId, name: &str) -> bool {
        self.lookup_direct_member(scope, name).is_some()
    }

    /// Defines `name` as a namespace in `parent`, reopening the existing one
    /// if there is one. Returns `None` when `name` is already bound to a value.
    pub fn define_namespace(&mut self, parent: ScopeId, name: &str) -> Option<ScopeId> {
        match self.lookup_direct_member(parent, name) {
            Some(Symbol::Namespace(id)) => return Some(*id),
            Some(Symbol::Value(_)) => return None,
            None => {}
        }

        let id = ScopeId(self.scopes.len());
        self.scopes.push(Scope::new(name, Some(parent)));
        self.scopes[parent.0]
            .members
            .insert(name.to_string(), Symbol::Namespace(id));
        Some(id)
    }

    pub fn define_value(&mut self, parent: ScopeId, name: &str, value: String) {
        self.scopes[parent.0]
            .members
            .insert(name.to_string(), Symbol::Value(value));
    }

    pub fn remove_member(&mut self, parent: ScopeId, name: &str) -> Option<Symbol> {
        self.scopes.get_mut(parent.0)?.members.shift_remove(name)
    }

    pub fn set_payload(&mut self, scope: ScopeId, payload: String) {
        if let Some(s) = self.scopes.get_mut(scope.0) {
            s.payload = Some(payload);
        }
    }

    pub fn payload(&self, scope: ScopeId) -> Option<&str> {
        self.scopes.get(scope.0)?.payload.as_deref()
    }

    pub fn members(&self, scope: ScopeId) -> impl Iterator<Item = (&str, &Symbol)> {
        self.scopes
            .get(scope.0)
            .into_iter()
            .flat_map(|s| s.members.iter().map(|(k, v)| (k.as_str(), v)))
    }

    /// Fully qualified path of a scope, `""` for the root.
    pub fn scope_path(&self, scope: ScopeId) -> String {
        let mut segments = Vec::new();
        let mut current = Some(scope);
        while let Some(id) = current {
            let Some(s) = self.scopes.get(id.0) else { break };
            if s.parent.is_some() {
                segments.push(s.name.as_str());
            }
            current = s.parent;
        }
        segments.reverse();
        segments.join("::")
    }

    /// Fully qualified path of `name` as a member of `scope`.
    pub fn cpath(&self, scope: ScopeId, name: &str) -> String {
        let prefix = self.scope_path(scope);
        if prefix.is_empty() {
            name.to_string()
        } else {
            format!("{}::{}", prefix, name)
        }
    }

    /// Read-only lookup of a `::` separated path starting at the root.
    pub fn resolve_path(&self, path: &str) -> Option<&Symbol> {
        let mut scope = self.root();
        let mut segments = path.split("::").peekable();
        while let Some(segment) = segments.next() {
            let symbol = self.lookup_direct_member(scope, segment)?;
            if segments.peek().is_none() {
                return Some(symbol);
            }
            scope = symbol.as_namespace()?;
        }
        None
    }

    /// Defines every segment of a `::` separated path as a namespace.
    pub fn define_namespace_path(&mut self, path: &str) -> Option<ScopeId> {
        let mut scope = self.root();
        for segment in path.split("::").filter(|s| !s.is_empty()) {
            scope = self.define_namespace(scope, segment)?;
        }
        Some(scope)
    }
}

impl Default for SymbolTable {
    fn default() -> Self {
        Self::new()
    }
}
