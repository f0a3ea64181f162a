///
/// Library inflector.
///
/// Libraries conventionally keep their version in `<name>/version.rb` next
/// to the entry file `<name>.rb`, and that file defines `VERSION`, not
/// `Version`. This inflector recognizes exactly that one file by absolute
/// path and hands every other path, including any other `version.rb` deeper
/// in the tree, to the generic `Inflector` it holds.
///

use std::path::{Path, PathBuf};

use indexmap::IndexMap;

use crate::files::strip_extension;
use crate::inflector::{Inflect, Inflector};

pub const VERSION_NAME: &str = "VERSION";

#[derive(Debug, Clone)]
pub struct LibraryInflector {
    version_file: PathBuf,
    inner: Inflector,
}

impl LibraryInflector {
    pub fn new(entry_point: &Path, extension: &str) -> Self {
        Self::with_inflector(entry_point, extension, Inflector::new())
    }

    pub fn with_inflector(entry_point: &Path, extension: &str, inner: Inflector) -> Self {
        let file_name = entry_point
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let namespace = strip_extension(&file_name, extension);
        let parent_dir = entry_point.parent().unwrap_or(Path::new(""));

        Self {
            version_file: parent_dir
                .join(namespace)
                .join(format!("version.{}", extension)),
            inner,
        }
    }

    pub fn version_file(&self) -> &Path {
        &self.version_file
    }

    pub fn inflect<K, V>(&mut self, overrides: impl IntoIterator<Item = (K, V)>)
    where
        K: Into<String>,
        V: Into<String>,
    {
        self.inner.inflect(overrides);
    }

    pub fn overrides(&self) -> &IndexMap<String, String> {
        self.inner.overrides()
    }
}

impl Inflect for LibraryInflector {
    fn camelize(&self, basename: &str, abspath: &Path) -> String {
        if abspath == self.version_file {
            VERSION_NAME.to_string()
        } else {
            self.inner.camelize(basename, abspath)
        }
    }
}
