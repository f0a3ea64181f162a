///
/// # Library Loader
///
/// A `LibraryLoader` is a `Loader` configured by convention from a single
/// entry file:
///
/// 1. The root is the nearest `lib` directory above the entry file, and the
///    directories in between are the namespaces the library is nested in.
/// 2. Those namespaces must already be defined in the host symbol table, so
///    the library reopens them instead of creating them.
/// 3. The tag is derived from the namespaces and the entry file name; a
///    top-level convenience file named after the tag is ignored.
/// 4. The library inflector maps `<name>/version.rb` to `VERSION`.
/// 5. After the first successful setup, the root is checked once for entries
///    that would define unexpected top-level symbols.
///
/// Construction either succeeds completely or fails with the first error.
///
/// ```rust,ignore
/// let mut table = SymbolTable::new();
/// table.define_namespace_path("Ns1::Ns2");
///
/// let mut library = LibraryLoader::new("lib/ns1/ns2/my_lib.rb", &table, true)?;
/// library.setup(&mut table)?;
/// assert_eq!(library.tag(), "ns1-ns2-my_lib");
/// ```
///

pub mod extra_files;
pub mod inflector;
pub mod namespaces;
pub mod root;
pub mod tag;

use std::path::{Path, PathBuf};

use crate::config::LibraryOptions;
use crate::error::LoaderError;
use crate::files;
use crate::loader::{Loader, Materializer};
use crate::sink::WarningSink;
use crate::symbols::{Symbol, SymbolTable};

use extra_files::{expected_namespace_entry, warn_on_extra_files};
use inflector::LibraryInflector;
use namespaces::{ensure_namespaces_defined, ResolvedNamespace};
use root::find_root;
use tag::derive_tag;

pub struct LibraryLoader {
    loader: Loader<LibraryInflector>,
    entry_point: PathBuf,
    root_dir: PathBuf,
    namespaces: Vec<String>,
    resolved: ResolvedNamespace,
    warn_on_extra_files: bool,
    extra_files_checked: bool,
}

impl LibraryLoader {
    pub fn new(
        entry_point: impl AsRef<Path>,
        table: &SymbolTable,
        warn_on_extra_files: bool,
    ) -> Result<Self, LoaderError> {
        let options = LibraryOptions {
            warn_on_extra_files,
            ..LibraryOptions::default()
        };
        Self::with_options(entry_point, table, options)
    }

    pub fn with_options(
        entry_point: impl AsRef<Path>,
        table: &SymbolTable,
        options: LibraryOptions,
    ) -> Result<Self, LoaderError> {
        options.validate()?;

        let entry_point = files::absolutize(entry_point.as_ref())?;
        let (root_dir, namespaces) = find_root(&entry_point)?;

        let mut inflector = LibraryInflector::new(&entry_point, &options.extension);
        inflector.inflect(options.inflections.clone());

        let file_name = entry_point
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let tag = derive_tag(
            &namespaces,
            files::strip_extension(&file_name, &options.extension),
        );

        let resolved = if namespaces.is_empty() {
            ResolvedNamespace::default()
        } else {
            ensure_namespaces_defined(table, &root_dir, &namespaces, &inflector)?
        };

        let mut loader = Loader::with_inflector(inflector);
        loader.set_tag(tag.as_str());
        loader.set_extension(options.extension.as_str());
        if options.enable_reloading {
            loader.enable_reloading();
        }
        for path in &options.ignore {
            loader.ignore(root_dir.join(path))?;
        }

        if !namespaces.is_empty() {
            let convenience_file = root_dir.join(format!("{}.{}", tag, options.extension));
            if convenience_file.is_file() {
                loader.ignore(&convenience_file)?;
            }
        }

        loader.push_root(&root_dir)?;

        tracing::debug!(
            loader = %tag,
            "library root {} for {}",
            root_dir.display(),
            entry_point.display()
        );

        Ok(Self {
            loader,
            entry_point,
            root_dir,
            namespaces,
            resolved,
            warn_on_extra_files: options.warn_on_extra_files,
            extra_files_checked: false,
        })
    }

    /// Sets the loader up and, the first time that succeeds, reports extra
    /// entries under the root. Calling it again while set up does nothing.
    pub fn setup(&mut self, table: &mut SymbolTable) -> Result<(), LoaderError> {
        if self.loader.is_setup() {
            return Ok(());
        }

        self.loader.setup(table)?;

        if self.warn_on_extra_files && !self.extra_files_checked {
            self.extra_files_checked = true;
            let expected = expected_namespace_entry(
                &self.root_dir,
                &self.entry_point,
                &self.namespaces,
                self.loader.extension(),
            );
            warn_on_extra_files(&self.loader, &self.root_dir, &self.entry_point, &expected);
        }

        Ok(())
    }

    pub fn tag(&self) -> &str {
        self.loader.tag()
    }

    pub fn inflector(&self) -> &LibraryInflector {
        self.loader.inflector()
    }

    pub fn inflector_mut(&mut self) -> &mut LibraryInflector {
        self.loader.inflector_mut()
    }

    pub fn entry_point(&self) -> &Path {
        &self.entry_point
    }

    pub fn root_dir(&self) -> &Path {
        &self.root_dir
    }

    pub fn namespaces(&self) -> &[String] {
        &self.namespaces
    }

    pub fn resolved_namespace(&self) -> &ResolvedNamespace {
        &self.resolved
    }

    pub fn warns_on_extra_files(&self) -> bool {
        self.warn_on_extra_files
    }

    pub fn loader(&self) -> &Loader<LibraryInflector> {
        &self.loader
    }

    pub fn loader_mut(&mut self) -> &mut Loader<LibraryInflector> {
        &mut self.loader
    }

    pub fn ignore(&mut self, path: impl AsRef<Path>) -> Result<(), LoaderError> {
        self.loader.ignore(path)
    }

    pub fn set_warning_sink(&mut self, sink: impl WarningSink + 'static) {
        self.loader.set_warning_sink(sink);
    }

    pub fn set_materializer(&mut self, materializer: impl Materializer + 'static) {
        self.loader.set_materializer(materializer);
    }

    pub fn enable_reloading(&mut self) {
        self.loader.enable_reloading();
    }

    pub fn get_path(
        &mut self,
        table: &mut SymbolTable,
        path: &str,
    ) -> Result<Option<Symbol>, LoaderError> {
        self.loader.get_path(table, path)
    }

    pub fn eager_load(&mut self, table: &mut SymbolTable) -> Result<(), LoaderError> {
        self.loader.eager_load(table)
    }

    pub fn unload(&mut self, table: &mut SymbolTable) -> Result<(), LoaderError> {
        self.loader.unload(table)
    }

    pub fn reload(&mut self, table: &mut SymbolTable) -> Result<(), LoaderError> {
        self.unload(table)?;
        self.setup(table)
    }
}
