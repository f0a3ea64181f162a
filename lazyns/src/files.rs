///
/// # Directory Listing
///
/// The filesystem probes loaders rely on. `ls` lists the immediate entries
/// of a directory that can define symbols:
///
/// - hidden entries (leading `.`) are skipped,
/// - ignored paths are skipped,
/// - files are kept only if they carry the source extension,
/// - directories are kept only if some source file lives below them.
///
/// Entries come back sorted by basename so that symbols are installed, and
/// warnings emitted, in the same order on every platform.
///

use std::fmt;
use std::fs;
use std::io;
use std::path::{Component, Path, PathBuf};

use walkdir::WalkDir;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    File,
    Directory,
}

impl fmt::Display for EntryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntryKind::File => write!(f, "file"),
            EntryKind::Directory => write!(f, "directory"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    pub basename: String,
    pub path: PathBuf,
    pub kind: EntryKind,
}

pub fn ls(
    dir: &Path,
    extension: &str,
    is_ignored: impl Fn(&Path) -> bool,
) -> io::Result<Vec<Entry>> {
    let mut entries = Vec::new();

    for dir_entry in fs::read_dir(dir)? {
        let dir_entry = dir_entry?;
        let Some(basename) = dir_entry.file_name().to_str().map(str::to_string) else {
            continue;
        };
        if basename.starts_with('.') {
            continue;
        }

        let path = dir.join(&basename);
        if is_ignored(&path) {
            continue;
        }

        let metadata = match fs::metadata(&path) {
            Ok(m) => m,
            Err(e) => {
                tracing::debug!("skipping {}: {}", path.display(), e);
                continue;
            }
        };

        let kind = if metadata.is_dir() {
            if !has_source_files(&path, extension, &is_ignored) {
                continue;
            }
            EntryKind::Directory
        } else if is_source_file(&path, extension) {
            EntryKind::File
        } else {
            continue;
        };

        entries.push(Entry {
            basename,
            path,
            kind,
        });
    }

    entries.sort_by(|a, b| a.basename.cmp(&b.basename));
    Ok(entries)
}

pub fn has_source_files(dir: &Path, extension: &str, is_ignored: impl Fn(&Path) -> bool) -> bool {
    WalkDir::new(dir)
        .min_depth(1)
        .follow_links(true)
        .into_iter()
        .filter_entry(|e| !is_hidden(e.file_name()) && !is_ignored(e.path()))
        .filter_map(|e| e.ok())
        .any(|e| e.file_type().is_file() && is_source_file(e.path(), extension))
}

pub fn is_source_file(path: &Path, extension: &str) -> bool {
    path.extension().map(|e| e == extension).unwrap_or(false)
}

/// `foo.rb` becomes `foo` for extension `rb`; anything else is returned as is.
pub fn strip_extension<'a>(basename: &'a str, extension: &str) -> &'a str {
    basename
        .strip_suffix(extension)
        .and_then(|rest| rest.strip_suffix('.'))
        .unwrap_or(basename)
}

/// Makes `path` absolute against the current directory and folds `.` and
/// `..` lexically. The filesystem is not touched, so symlinks are preserved
/// as given. `..` at the filesystem root stays at the root.
pub fn absolutize(path: &Path) -> io::Result<PathBuf> {
    let absolute = std::path::absolute(path)?;

    let mut normalized = PathBuf::new();
    for component in absolute.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                normalized.pop();
            }
            other => normalized.push(other),
        }
    }
    Ok(normalized)
}

fn is_hidden(name: &std::ffi::OsStr) -> bool {
    name.to_str().map(|n| n.starts_with('.')).unwrap_or(false)
}
