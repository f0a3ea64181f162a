///
/// # lazyns - Convention-based, lazy-loading namespace manager
///
/// Scans root directories, derives a namespace tree from the file layout and
/// materializes each symbol the first time it is referenced.
///
/// ## Library Usage
///
/// ```rust,ignore
/// use lazyns::{LibraryLoader, SymbolTable};
///
/// let mut table = SymbolTable::new();
/// let mut library = LibraryLoader::new("vendor/my_lib/lib/my_lib.rb", &table, true)?;
/// library.setup(&mut table)?;
/// let foo = library.get_path(&mut table, "MyLib::Foo")?;
/// ```
///
/// ## CLI
///
/// ```sh
/// lazyns inspect lib/my_lib.rb            # root, namespaces, tag, extra files
/// lazyns tree lib/my_lib.rb --eager       # namespace tree after setup
/// ```
///

pub mod config;
pub mod error;
pub mod files;
pub mod inflector;
pub mod library;
pub mod loader;
pub mod registry;
pub mod sink;
pub mod symbols;

pub use config::{find_config_file, LibraryOptions};
pub use error::LoaderError;
pub use inflector::{Inflect, Inflector};
pub use library::extra_files::ExtraEntry;
pub use library::inflector::LibraryInflector;
pub use library::namespaces::ResolvedNamespace;
pub use library::LibraryLoader;
pub use loader::{Loader, Materializer, ReadSource};
pub use registry::Registry;
pub use sink::{CollectingSink, StderrSink, TracingSink, WarningSink};
pub use symbols::{ScopeId, Symbol, SymbolTable};
