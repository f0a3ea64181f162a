///
/// # Extra Files Under a Library Root
///
/// Everything directly under a library's `lib` directory defines a top-level
/// symbol. A library is expected to own exactly two entries there: its entry
/// file and the directory of its own namespace (`lib/my_lib.rb` and
/// `lib/my_lib/`, or `lib/ns1/` for a library nested in `Ns1`). Anything
/// else, say a stray `lib/tasks.rb`, would silently define `Tasks` and only
/// surface when something references it.
///
/// The check lists the root once, skips the two expected entries and the
/// ignored ones, and reports each remaining entry with the symbol name the
/// active inflector would give it. Only the immediate entries are listed, so
/// the directories of deeper namespace segments (`lib/ns1/ns2`) are never
/// reported.
///

use std::fmt;
use std::io;
use std::path::{Path, PathBuf};

use crate::files::{self, EntryKind};
use crate::inflector::Inflect;
use crate::loader::Loader;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtraEntry {
    pub name: String,
    pub kind: EntryKind,
    pub basename: String,
    pub path: PathBuf,
}

impl fmt::Display for ExtraEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "WARNING: lazyns defines the symbol {} after the {}",
            self.name, self.kind
        )?;
        writeln!(f)?;
        writeln!(f, "    {}", self.path.display())?;
        writeln!(f)?;
        writeln!(f, "To prevent that, please configure the loader to ignore it:")?;
        writeln!(f)?;
        writeln!(f, "    loader.ignore(\"{}\")", self.path.display())?;
        writeln!(f)?;
        writeln!(f, "or list it under [loader] in lazyns.toml:")?;
        writeln!(f)?;
        writeln!(f, "    ignore = [\"{}\"]", self.basename)?;
        writeln!(f)?;
        writeln!(f, "Otherwise, there is a flag to silence this warning:")?;
        writeln!(f)?;
        write!(f, "    warn_on_extra_files = false")
    }
}

/// The one entry besides the entry file a library root may hold: the first
/// namespace directory for nested libraries, the library's own directory
/// otherwise.
pub fn expected_namespace_entry(
    root: &Path,
    entry_point: &Path,
    namespaces: &[String],
    extension: &str,
) -> PathBuf {
    match namespaces.first() {
        Some(first) => root.join(first),
        None => {
            let file_name = entry_point
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default();
            let stem = files::strip_extension(&file_name, extension);
            entry_point.with_file_name(stem)
        }
    }
}

pub fn extra_entries<I: Inflect>(
    loader: &Loader<I>,
    root: &Path,
    entry_point: &Path,
    expected: &Path,
) -> io::Result<Vec<ExtraEntry>> {
    let extension = loader.extension();
    let entries = files::ls(root, extension, |p| loader.is_ignored(p))?;

    Ok(entries
        .into_iter()
        .filter(|entry| entry.path != entry_point && entry.path != expected)
        .map(|entry| {
            let basename = files::strip_extension(&entry.basename, extension);
            ExtraEntry {
                name: loader.inflector().camelize(basename, &entry.path),
                kind: entry.kind,
                basename: entry.basename.clone(),
                path: entry.path,
            }
        })
        .collect())
}

/// Emits one warning per extra entry through the loader's sink and returns
/// how many were emitted. Listing failures are logged and swallowed.
pub fn warn_on_extra_files<I: Inflect>(
    loader: &Loader<I>,
    root: &Path,
    entry_point: &Path,
    expected: &Path,
) -> usize {
    match extra_entries(loader, root, entry_point, expected) {
        Ok(entries) => {
            for entry in &entries {
                loader.warn(&entry.to_string());
            }
            entries.len()
        }
        Err(e) => {
            tracing::warn!(
                loader = %loader.tag(),
                "could not check {} for extra files: {}",
                root.display(),
                e
            );
            0
        }
    }
}
