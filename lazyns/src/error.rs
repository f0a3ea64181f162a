///
/// Loader error types.
///
/// Everything that can abort loader construction or setup: a library entry
/// file outside any `lib` directory, a namespace the library expects to
/// reopen that the host has not defined yet, invalid inflected names,
/// materialization failures and configuration problems.
///
/// Warnings about extra files under a library root are not errors. They go
/// through a `WarningSink` and never reach this type.
///

use std::path::PathBuf;

use miette::Diagnostic;
use thiserror::Error;

#[derive(Debug, Error, Diagnostic)]
pub enum LoaderError {
    #[error("library root directory not found for {}", entry_point.display())]
    #[diagnostic(
        code(lazyns::root_not_found),
        help("the entry file must live somewhere below a directory named `lib`")
    )]
    RootNotFound { entry_point: PathBuf },

    #[error(
        "The namespace {namespace} was not found. Please load it before setting up \
         the loader. That way we make sure the library reopens it, instead of creating it."
    )]
    #[diagnostic(
        code(lazyns::namespace_not_found),
        help("define the namespace in the host environment before constructing the library loader")
    )]
    NamespaceNotFound { namespace: String },

    #[error("{namespace} is defined, but it is not a namespace")]
    #[diagnostic(code(lazyns::not_a_namespace))]
    NotANamespace { namespace: String },

    #[error("can't reload, please call enable_reloading before setup")]
    #[diagnostic(code(lazyns::reloading_disabled))]
    ReloadingDisabled,

    #[error("wrong symbol name {name} inferred from {}", path.display())]
    #[diagnostic(
        code(lazyns::invalid_name),
        help("rename the entry, ignore it, or add an inflection override for it")
    )]
    InvalidName { name: String, path: PathBuf },

    #[error("failed to materialize {cpath} from {}", path.display())]
    #[diagnostic(code(lazyns::materialize))]
    Materialize {
        cpath: String,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse loader configuration at {}: {reason}", path.display())]
    #[diagnostic(code(lazyns::config_parse))]
    ConfigParse { path: PathBuf, reason: String },

    #[error("Invalid loader configuration: {0}")]
    #[diagnostic(code(lazyns::invalid_config))]
    InvalidConfig(String),

    #[error("{0}")]
    #[diagnostic(code(lazyns::io))]
    Io(#[from] std::io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_messages() {
        let err = LoaderError::RootNotFound {
            entry_point: PathBuf::from("/src/ns1/my_lib.rb"),
        };
        assert!(err.to_string().contains("library root directory not found"));
        assert!(err.to_string().contains("/src/ns1/my_lib.rb"));

        let err = LoaderError::NamespaceNotFound {
            namespace: "Ns1::Ns2".to_string(),
        };
        assert!(err.to_string().contains("The namespace Ns1::Ns2 was not found."));
        assert!(err.to_string().contains("reopens it, instead of creating it"));

        let err = LoaderError::NotANamespace {
            namespace: "Ns1".to_string(),
        };
        assert!(err.to_string().contains("Ns1"));
        assert!(err.to_string().contains("not a namespace"));

        let err = LoaderError::InvalidName {
            name: "2fa".to_string(),
            path: PathBuf::from("/lib/2fa.rb"),
        };
        assert!(err.to_string().contains("wrong symbol name 2fa"));
        assert!(err.to_string().contains("/lib/2fa.rb"));

        let err = LoaderError::InvalidConfig("unknown key".to_string());
        assert!(err.to_string().contains("Invalid loader configuration"));
        assert!(err.to_string().contains("unknown key"));

        assert!(LoaderError::ReloadingDisabled
            .to_string()
            .contains("enable_reloading"));
    }

    #[test]
    fn test_diagnostic_codes() {
        let err = LoaderError::NamespaceNotFound {
            namespace: "Outer".to_string(),
        };
        let code = err.code().map(|c| c.to_string());
        assert_eq!(code.as_deref(), Some("lazyns::namespace_not_found"));
        assert!(err.help().is_some());
    }
}
