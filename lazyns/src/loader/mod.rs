///
/// # Lazy-Loading Engine
///
/// A `Loader` owns one or more root directories. `setup` lists each root and
/// installs a lazy entry for every symbol the layout implies, without running
/// any source:
///
/// - `foo.rb` becomes a lazy `Foo` backed by that file,
/// - `foo/` becomes a lazy namespace `Foo` whose members come from the
///   directory (an implicit namespace),
/// - `foo.rb` next to `foo/` is an explicit namespace: the file runs when
///   `Foo` is materialized and the directory supplies its members.
///
/// When a directory maps onto a namespace the host has already defined, the
/// loader reopens it and descends right away instead of installing an entry.
///
/// `get` materializes a lazy entry the first time it is referenced and
/// records it, so `unload` removes exactly what this loader defined and
/// nothing the host owns. Every directory below a materialized namespace is
/// listed only when that namespace is materialized.
///

pub mod materialize;

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use indexmap::IndexMap;

use crate::error::LoaderError;
use crate::files::{self, EntryKind};
use crate::inflector::{is_valid_name, Inflect, Inflector};
use crate::sink::{TracingSink, WarningSink};
use crate::symbols::{ScopeId, Symbol, SymbolTable};

pub use materialize::{Materializer, ReadSource};

pub const DEFAULT_EXTENSION: &str = "rb";
pub const DEFAULT_TAG: &str = "loader";

#[derive(Debug, Clone, Default)]
struct LazyEntry {
    file: Option<PathBuf>,
    dirs: Vec<PathBuf>,
}

impl LazyEntry {
    fn source(&self) -> Option<&Path> {
        self.file.as_deref().or_else(|| self.dirs.first().map(PathBuf::as_path))
    }
}

pub struct Loader<I = Inflector> {
    tag: String,
    inflector: I,
    extension: String,
    roots: Vec<PathBuf>,
    ignored: HashSet<PathBuf>,
    reloading_enabled: bool,
    setup: bool,
    lazy: IndexMap<(ScopeId, String), LazyEntry>,
    defined: Vec<(ScopeId, String)>,
    sink: Box<dyn WarningSink>,
    materializer: Box<dyn Materializer>,
}

impl Loader<Inflector> {
    pub fn new() -> Self {
        Self::with_inflector(Inflector::new())
    }
}

impl Default for Loader<Inflector> {
    fn default() -> Self {
        Self::new()
    }
}

impl<I: Inflect> Loader<I> {
    pub fn with_inflector(inflector: I) -> Self {
        Self {
            tag: DEFAULT_TAG.to_string(),
            inflector,
            extension: DEFAULT_EXTENSION.to_string(),
            roots: Vec::new(),
            ignored: HashSet::new(),
            reloading_enabled: false,
            setup: false,
            lazy: IndexMap::new(),
            defined: Vec::new(),
            sink: Box::new(TracingSink),
            materializer: Box::new(ReadSource),
        }
    }

    pub fn tag(&self) -> &str {
        &self.tag
    }

    pub fn set_tag(&mut self, tag: impl Into<String>) {
        self.tag = tag.into();
    }

    pub fn inflector(&self) -> &I {
        &self.inflector
    }

    pub fn inflector_mut(&mut self) -> &mut I {
        &mut self.inflector
    }

    pub fn extension(&self) -> &str {
        &self.extension
    }

    pub fn set_extension(&mut self, extension: impl Into<String>) {
        self.extension = extension.into();
    }

    pub fn set_warning_sink(&mut self, sink: impl WarningSink + 'static) {
        self.sink = Box::new(sink);
    }

    pub fn set_materializer(&mut self, materializer: impl Materializer + 'static) {
        self.materializer = Box::new(materializer);
    }

    pub fn warn(&self, message: &str) {
        self.sink.warn(&self.tag, message);
    }

    pub fn push_root(&mut self, dir: impl AsRef<Path>) -> Result<(), LoaderError> {
        let dir = files::absolutize(dir.as_ref())?;
        if !self.roots.contains(&dir) {
            self.roots.push(dir);
        }
        Ok(())
    }

    pub fn roots(&self) -> &[PathBuf] {
        &self.roots
    }

    pub fn ignore(&mut self, path: impl AsRef<Path>) -> Result<(), LoaderError> {
        let path = files::absolutize(path.as_ref())?;
        tracing::debug!(loader = %self.tag, "ignoring {}", path.display());
        self.ignored.insert(path);
        Ok(())
    }

    pub fn is_ignored(&self, path: &Path) -> bool {
        self.ignored.contains(path)
    }

    pub fn enable_reloading(&mut self) {
        self.reloading_enabled = true;
    }

    pub fn reloading_enabled(&self) -> bool {
        self.reloading_enabled
    }

    pub fn is_setup(&self) -> bool {
        self.setup
    }

    pub fn setup(&mut self, table: &mut SymbolTable) -> Result<(), LoaderError> {
        if self.setup {
            return Ok(());
        }

        let root_scope = table.root();
        for root in self.roots.clone() {
            if let Err(e) = self.define_lazy_entries(table, &root, root_scope) {
                self.lazy.clear();
                return Err(e);
            }
        }

        self.setup = true;
        tracing::debug!(loader = %self.tag, "setup complete, {} lazy entries", self.lazy.len());
        Ok(())
    }

    pub fn is_lazy(&self, scope: ScopeId, name: &str) -> bool {
        self.lazy.contains_key(&(scope, name.to_string()))
    }

    /// Lazy entries of `scope` that have not been materialized yet, with the
    /// file or directory that backs each one.
    pub fn pending(&self, scope: ScopeId) -> Vec<(&str, &Path)> {
        self.lazy
            .iter()
            .filter(|((s, _), _)| *s == scope)
            .filter_map(|((_, name), entry)| Some((name.as_str(), entry.source()?)))
            .collect()
    }

    pub fn get(
        &mut self,
        table: &mut SymbolTable,
        scope: ScopeId,
        name: &str,
    ) -> Result<Option<Symbol>, LoaderError> {
        let key = (scope, name.to_string());

        if let Some(symbol) = table.lookup_direct_member(scope, name) {
            let symbol = symbol.clone();
            self.lazy.shift_remove(&key);
            return Ok(Some(symbol));
        }

        match self.lazy.shift_remove(&key) {
            Some(entry) => self.materialize(table, scope, name, entry).map(Some),
            None => Ok(None),
        }
    }

    pub fn get_path(
        &mut self,
        table: &mut SymbolTable,
        path: &str,
    ) -> Result<Option<Symbol>, LoaderError> {
        let mut scope = table.root();
        let mut segments = path.split("::").peekable();

        while let Some(segment) = segments.next() {
            let Some(symbol) = self.get(table, scope, segment)? else {
                return Ok(None);
            };
            if segments.peek().is_none() {
                return Ok(Some(symbol));
            }
            match symbol.as_namespace() {
                Some(child) => scope = child,
                None => return Ok(None),
            }
        }

        Ok(None)
    }

    pub fn eager_load(&mut self, table: &mut SymbolTable) -> Result<(), LoaderError> {
        tracing::debug!(loader = %self.tag, "eager load start");

        while let Some(((scope, name), entry)) = self.lazy.shift_remove_index(0) {
            if table.is_defined(scope, &name) {
                continue;
            }
            self.materialize(table, scope, &name, entry)?;
        }

        tracing::debug!(loader = %self.tag, "eager load end");
        Ok(())
    }

    pub fn unload(&mut self, table: &mut SymbolTable) -> Result<(), LoaderError> {
        if !self.reloading_enabled {
            return Err(LoaderError::ReloadingDisabled);
        }

        for (scope, name) in self.defined.drain(..).rev() {
            let cpath = table.cpath(scope, &name);
            if table.remove_member(scope, &name).is_some() {
                tracing::debug!(loader = %self.tag, "{} unloaded", cpath);
            }
        }

        self.lazy.clear();
        self.setup = false;
        Ok(())
    }

    pub fn reload(&mut self, table: &mut SymbolTable) -> Result<(), LoaderError> {
        self.unload(table)?;
        self.setup(table)
    }

    fn define_lazy_entries(
        &mut self,
        table: &SymbolTable,
        dir: &Path,
        scope: ScopeId,
    ) -> Result<(), LoaderError> {
        let entries = files::ls(dir, &self.extension, |p| self.is_ignored(p))?;

        for entry in entries {
            let basename = match entry.kind {
                EntryKind::File => files::strip_extension(&entry.basename, &self.extension),
                EntryKind::Directory => entry.basename.as_str(),
            };
            let name = self.inflector.camelize(basename, &entry.path);
            if !is_valid_name(&name) {
                return Err(LoaderError::InvalidName {
                    name,
                    path: entry.path,
                });
            }
            let cpath = table.cpath(scope, &name);

            match (entry.kind, table.lookup_direct_member(scope, &name)) {
                (EntryKind::File, Some(_)) => {
                    tracing::debug!(
                        loader = %self.tag,
                        "file {} is ignored because {} is already defined",
                        entry.path.display(),
                        cpath
                    );
                }
                (EntryKind::File, None) => {
                    tracing::debug!(
                        loader = %self.tag,
                        "lazy entry set for {}, to be loaded from {}",
                        cpath,
                        entry.path.display()
                    );
                    self.lazy.entry((scope, name)).or_default().file = Some(entry.path);
                }
                (EntryKind::Directory, Some(Symbol::Namespace(child))) => {
                    let child = *child;
                    tracing::debug!(
                        loader = %self.tag,
                        "namespace {} already defined, reopening it from {}",
                        cpath,
                        entry.path.display()
                    );
                    self.define_lazy_entries(table, &entry.path, child)?;
                }
                (EntryKind::Directory, Some(Symbol::Value(_))) => {
                    tracing::debug!(
                        loader = %self.tag,
                        "directory {} is ignored because {} is defined and is not a namespace",
                        entry.path.display(),
                        cpath
                    );
                }
                (EntryKind::Directory, None) => {
                    tracing::debug!(
                        loader = %self.tag,
                        "lazy namespace set for {}, with members in {}",
                        cpath,
                        entry.path.display()
                    );
                    self.lazy.entry((scope, name)).or_default().dirs.push(entry.path);
                }
            }
        }

        Ok(())
    }

    fn materialize(
        &mut self,
        table: &mut SymbolTable,
        scope: ScopeId,
        name: &str,
        entry: LazyEntry,
    ) -> Result<Symbol, LoaderError> {
        let cpath = table.cpath(scope, name);

        let result = entry
            .file
            .as_deref()
            .map(|file| self.materializer.materialize(file, &cpath))
            .transpose();
        let payload = match result {
            Ok(payload) => payload,
            Err(source) => {
                let path = entry.file.clone().unwrap_or_default();
                self.lazy.insert((scope, name.to_string()), entry);
                return Err(LoaderError::Materialize { cpath, path, source });
            }
        };

        if entry.dirs.is_empty() {
            let payload = payload.unwrap_or_default();
            table.define_value(scope, name, payload.clone());
            self.defined.push((scope, name.to_string()));
            if let Some(file) = &entry.file {
                tracing::debug!(loader = %self.tag, "{} loaded from file {}", cpath, file.display());
            }
            return Ok(Symbol::Value(payload));
        }

        let child = table
            .define_namespace(scope, name)
            .ok_or_else(|| LoaderError::NotANamespace {
                namespace: cpath.clone(),
            })?;
        self.defined.push((scope, name.to_string()));

        match (&entry.file, payload) {
            (Some(file), Some(payload)) => {
                table.set_payload(child, payload);
                tracing::debug!(loader = %self.tag, "namespace {} defined by {}", cpath, file.display());
            }
            _ => {
                tracing::debug!(loader = %self.tag, "namespace {} autovivified", cpath);
            }
        }

        let listed = entry
            .dirs
            .iter()
            .try_for_each(|dir| self.define_lazy_entries(table, dir, child));
        if let Err(e) = listed {
            self.lazy.retain(|(s, _), _| *s != child);
            table.remove_member(scope, name);
            self.defined.pop();
            self.lazy.insert((scope, name.to_string()), entry);
            tracing::debug!(loader = %self.tag, "namespace {} rolled back", cpath);
            return Err(e);
        }

        Ok(Symbol::Namespace(child))
    }
}
