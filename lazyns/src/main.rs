///
/// lazyns CLI - Inspect convention-based library loaders
///
/// Provides commands for checking how a library's layout maps to symbols:
/// - lazyns inspect <entry>: Root, namespaces, tag and extra-file warnings
/// - lazyns tree <entry>: The namespace tree after setup
///
/// `--namespace` pre-defines namespaces in the symbol table, standing in for
/// a host that has already loaded them.
///

use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};

use lazyns::{
    files, CollectingSink, LibraryLoader, LibraryOptions, LoaderError, ScopeId, StderrSink,
    Symbol, SymbolTable,
};

#[derive(Parser)]
#[command(name = "lazyns")]
#[command(author, version, about = "Inspect lazy-loading library roots", long_about = None)]
struct Cli {
    /// Log loader activity
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Resolve a library entry file and check its root for extra files
    Inspect {
        /// The library entry file
        entry: PathBuf,

        /// Namespace the host has already defined (repeatable, e.g. Ns1::Ns2)
        #[arg(long = "namespace", value_name = "PATH")]
        namespaces: Vec<String>,

        /// Loader configuration file (defaults to the nearest lazyns.toml)
        #[arg(long)]
        config: Option<PathBuf>,

        /// Do not check the library root for extra files
        #[arg(long)]
        no_warn_extra_files: bool,
    },

    /// Print the namespace tree a library defines
    Tree {
        /// The library entry file
        entry: PathBuf,

        /// Namespace the host has already defined (repeatable, e.g. Ns1::Ns2)
        #[arg(long = "namespace", value_name = "PATH")]
        namespaces: Vec<String>,

        /// Loader configuration file (defaults to the nearest lazyns.toml)
        #[arg(long)]
        config: Option<PathBuf>,

        /// Materialize every symbol before printing
        #[arg(long)]
        eager: bool,
    },
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result = match cli.command {
        Commands::Inspect {
            entry,
            namespaces,
            config,
            no_warn_extra_files,
        } => inspect(&entry, &namespaces, config.as_deref(), no_warn_extra_files),
        Commands::Tree {
            entry,
            namespaces,
            config,
            eager,
        } => tree(&entry, &namespaces, config.as_deref(), eager),
    };

    if let Err(e) = result {
        eprintln!("{:?}", miette::Report::new(e));
        std::process::exit(1);
    }
}

fn init_logging(verbose: bool) {
    let level = if verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .with_max_level(level)
        .init();
}

fn load_options(entry: &Path, config: Option<&Path>) -> Result<LibraryOptions, LoaderError> {
    match config {
        Some(path) => LibraryOptions::from_path(path),
        None => LibraryOptions::discover(&files::absolutize(entry)?),
    }
}

fn host_table(namespaces: &[String]) -> SymbolTable {
    let mut table = SymbolTable::new();
    for namespace in namespaces {
        if table.define_namespace_path(namespace).is_none() {
            eprintln!("warning: could not define namespace {}", namespace);
        }
    }
    table
}

fn inspect(
    entry: &Path,
    namespaces: &[String],
    config: Option<&Path>,
    no_warn_extra_files: bool,
) -> Result<(), LoaderError> {
    let mut options = load_options(entry, config)?;
    if no_warn_extra_files {
        options.warn_on_extra_files = false;
    }

    let mut table = host_table(namespaces);
    let mut library = LibraryLoader::with_options(entry, &table, options)?;
    let sink = CollectingSink::new();
    library.set_warning_sink(sink.clone());

    println!("entry point:  {}", library.entry_point().display());
    println!("root:         {}", library.root_dir().display());
    if library.namespaces().is_empty() {
        println!("namespaces:   (none)");
    } else {
        println!("namespaces:   {}", library.namespaces().join(", "));
        println!("resolved:     {}", library.resolved_namespace().path());
    }
    println!("tag:          {}", library.tag());
    println!("version file: {}", library.inflector().version_file().display());

    library.setup(&mut table)?;

    let messages = sink.messages();
    for message in &messages {
        eprintln!("{}\n", message);
    }

    if library.warns_on_extra_files() {
        println!("extra entries: {}", messages.len());
    } else {
        println!("extra entries: (check disabled)");
    }

    Ok(())
}

fn tree(
    entry: &Path,
    namespaces: &[String],
    config: Option<&Path>,
    eager: bool,
) -> Result<(), LoaderError> {
    let options = load_options(entry, config)?;
    let mut table = host_table(namespaces);
    let mut library = LibraryLoader::with_options(entry, &table, options)?;
    library.set_warning_sink(StderrSink);

    library.setup(&mut table)?;
    if eager {
        library.eager_load(&mut table)?;
    }

    print_scope(&table, &library, table.root(), 0);
    Ok(())
}

fn print_scope(table: &SymbolTable, library: &LibraryLoader, scope: ScopeId, depth: usize) {
    let indent = "  ".repeat(depth);

    for (name, symbol) in table.members(scope) {
        match symbol {
            Symbol::Namespace(child) => {
                println!("{}{}", indent, name);
                print_scope(table, library, *child, depth + 1);
            }
            Symbol::Value(_) => println!("{}{}", indent, name),
        }
    }

    for (name, path) in library.loader().pending(scope) {
        println!("{}{} (lazy, {})", indent, name, path.display());
    }
}
