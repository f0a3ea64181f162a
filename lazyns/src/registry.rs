///
/// Library loader registry.
///
/// Entry files can be evaluated more than once by a host (reloads, repeated
/// requires). The registry keeps one `LibraryLoader` per absolute entry file
/// so asking again returns the loader built the first time, with its state,
/// tag and setup status intact.
///

use std::path::{Path, PathBuf};

use indexmap::map::Entry;
use indexmap::IndexMap;

use crate::config::LibraryOptions;
use crate::error::LoaderError;
use crate::files;
use crate::library::LibraryLoader;
use crate::symbols::SymbolTable;

#[derive(Default)]
pub struct Registry {
    libraries: IndexMap<PathBuf, LibraryLoader>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the loader for `entry_point`, building it with `options` the
    /// first time. Later calls ignore `options`.
    pub fn for_library(
        &mut self,
        entry_point: impl AsRef<Path>,
        table: &SymbolTable,
        options: LibraryOptions,
    ) -> Result<&mut LibraryLoader, LoaderError> {
        let entry_point = files::absolutize(entry_point.as_ref())?;

        match self.libraries.entry(entry_point) {
            Entry::Occupied(entry) => Ok(entry.into_mut()),
            Entry::Vacant(entry) => {
                let library = LibraryLoader::with_options(entry.key(), table, options)?;
                Ok(entry.insert(library))
            }
        }
    }

    pub fn get(&self, entry_point: &Path) -> Option<&LibraryLoader> {
        self.libraries.get(entry_point)
    }

    /// The library whose root directory contains `path`, if any.
    pub fn owner_of(&self, path: &Path) -> Option<&LibraryLoader> {
        self.libraries
            .values()
            .find(|library| path.starts_with(library.root_dir()))
    }

    pub fn libraries(&self) -> impl Iterator<Item = &LibraryLoader> {
        self.libraries.values()
    }

    pub fn len(&self) -> usize {
        self.libraries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.libraries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn write(root: &Path, rel: &str) {
        let path = root.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, "").unwrap();
    }

    #[test]
    fn test_for_library_is_idempotent() {
        let temp_dir = TempDir::new().unwrap();
        let lib = temp_dir.path().join("lib");
        write(&lib, "my_lib.rb");

        let mut table = SymbolTable::new();
        let mut registry = Registry::new();

        let first = registry
            .for_library(lib.join("my_lib.rb"), &table, LibraryOptions::default())
            .unwrap();
        first.setup(&mut table).unwrap();
        let first_ptr = first as *const LibraryLoader;

        let second = registry
            .for_library(lib.join("my_lib.rb"), &table, LibraryOptions::default())
            .unwrap();

        assert_eq!(second as *const LibraryLoader, first_ptr);
        assert!(second.loader().is_setup());
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_failed_construction_is_not_registered() {
        let temp_dir = TempDir::new().unwrap();
        let lib = temp_dir.path().join("lib");
        write(&lib, "ns1/my_lib.rb");

        let table = SymbolTable::new();
        let mut registry = Registry::new();
        let result = registry.for_library(lib.join("ns1/my_lib.rb"), &table, LibraryOptions::default());

        assert!(matches!(result, Err(LoaderError::NamespaceNotFound { .. })));
        assert!(registry.is_empty());
    }

    #[test]
    fn test_owner_of() {
        let temp_dir = TempDir::new().unwrap();
        let first = temp_dir.path().join("first/lib");
        let second = temp_dir.path().join("second/lib");
        write(&first, "a.rb");
        write(&second, "b.rb");

        let table = SymbolTable::new();
        let mut registry = Registry::new();
        registry
            .for_library(first.join("a.rb"), &table, LibraryOptions::default())
            .unwrap();
        registry
            .for_library(second.join("b.rb"), &table, LibraryOptions::default())
            .unwrap();

        let owner = registry.owner_of(&second.join("b/thing.rb")).unwrap();
        assert_eq!(owner.tag(), "b");
        assert!(registry.owner_of(temp_dir.path()).is_none());
        assert!(registry.get(&first.join("a.rb")).is_some());
        assert_eq!(registry.libraries().count(), 2);
    }
}
