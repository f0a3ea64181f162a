///
/// # Library Root Discovery
///
/// A library's symbols hang from the nearest `lib` directory above its entry
/// file. Every directory crossed on the way up, below `lib`, is a namespace
/// the library lives in:
///
/// ```text
/// /app/vendor/lib/ns1/ns2/my_lib.rb
///             ^^^ ^^^^^^^
///             root   namespaces = ["ns1", "ns2"]
/// ```
///
/// Discovery is pure path computation. Nothing is read from disk.
///

use std::path::{Path, PathBuf};

use crate::error::LoaderError;

pub const ROOT_DIR_NAME: &str = "lib";

pub fn find_root(entry_point: &Path) -> Result<(PathBuf, Vec<String>), LoaderError> {
    let mut namespaces = Vec::new();

    for dir in entry_point.parent().into_iter().flat_map(Path::ancestors) {
        let Some(basename) = dir.file_name() else {
            continue;
        };
        let basename = basename.to_string_lossy();
        if basename == ROOT_DIR_NAME {
            return Ok((dir.to_path_buf(), namespaces));
        }
        namespaces.insert(0, basename.into_owned());
    }

    Err(LoaderError::RootNotFound {
        entry_point: entry_point.to_path_buf(),
    })
}
