//!
//! Namespace validation for nested libraries.
//!
//! A library at `lib/ns1/ns2/my_lib.rb` extends `Ns1::Ns2`, which someone
//! else owns. Those namespaces have to exist before the loader is set up;
//! otherwise the loader would create `Ns1` itself and the real definition
//! loaded later would be a different, disconnected namespace.
//!

use std::path::Path;

use crate::error::LoaderError;
use crate::inflector::Inflect;
use crate::symbols::{ScopeId, Symbol, SymbolTable};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResolvedNamespace {
    scopes: Vec<ScopeId>,
    path: String,
}

impl ResolvedNamespace {
    pub fn scopes(&self) -> &[ScopeId] {
        &self.scopes
    }

    /// The namespace the library's own top-level symbol is defined in.
    pub fn innermost(&self) -> Option<ScopeId> {
        self.scopes.last().copied()
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn len(&self) -> usize {
        self.scopes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scopes.is_empty()
    }
}

pub fn ensure_namespaces_defined(
    table: &SymbolTable,
    root: &Path,
    namespaces: &[String],
    inflector: &impl Inflect,
) -> Result<ResolvedNamespace, LoaderError> {
    let mut dir = root.to_path_buf();
    let mut parent = table.root();
    let mut scopes = Vec::with_capacity(namespaces.len());

    for namespace in namespaces {
        dir.push(namespace);
        let name = inflector.camelize(namespace, &dir);

        match table.lookup_direct_member(parent, &name) {
            Some(Symbol::Namespace(id)) => {
                scopes.push(*id);
                parent = *id;
            }
            Some(Symbol::Value(_)) => {
                return Err(LoaderError::NotANamespace {
                    namespace: table.cpath(parent, &name),
                });
            }
            None => {
                return Err(LoaderError::NamespaceNotFound {
                    namespace: table.cpath(parent, &name),
                });
            }
        }
    }

    Ok(ResolvedNamespace {
        path: table.scope_path(parent),
        scopes,
    })
}
