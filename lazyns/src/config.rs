///
/// # Loader Configuration
///
/// Library loaders can be tuned from a `lazyns.toml` file, usually kept next
/// to the library's `lib` directory:
///
/// ```toml
/// [loader]
/// warn_on_extra_files = true
/// extension = "rb"
/// enable_reloading = false
/// ignore = ["tasks", "generators/templates.rb"]
///
/// [inflections]
/// html_parser = "HTMLParser"
/// ```
///
/// `ignore` entries are relative to the library root (the `lib` directory).
/// Inflections are basename overrides handed to the library inflector.
/// Every key is optional; unknown keys are rejected so typos do not pass
/// silently.
///

use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use serde::Deserialize;

use crate::error::LoaderError;
use crate::inflector::is_valid_name;
use crate::loader::DEFAULT_EXTENSION;

pub const CONFIG_FILE_NAME: &str = "lazyns.toml";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LibraryOptions {
    pub warn_on_extra_files: bool,
    pub extension: String,
    pub enable_reloading: bool,
    pub ignore: Vec<PathBuf>,
    pub inflections: IndexMap<String, String>,
}

impl Default for LibraryOptions {
    fn default() -> Self {
        Self {
            warn_on_extra_files: true,
            extension: DEFAULT_EXTENSION.to_string(),
            enable_reloading: false,
            ignore: Vec::new(),
            inflections: IndexMap::new(),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct ConfigFile {
    #[serde(default)]
    loader: LoaderSection,
    #[serde(default)]
    inflections: IndexMap<String, String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct LoaderSection {
    warn_on_extra_files: bool,
    extension: String,
    enable_reloading: bool,
    ignore: Vec<PathBuf>,
}

impl Default for LoaderSection {
    fn default() -> Self {
        let defaults = LibraryOptions::default();
        Self {
            warn_on_extra_files: defaults.warn_on_extra_files,
            extension: defaults.extension,
            enable_reloading: defaults.enable_reloading,
            ignore: defaults.ignore,
        }
    }
}

impl LibraryOptions {
    pub fn from_path(path: &Path) -> Result<Self, LoaderError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content).map_err(|e| LoaderError::ConfigParse {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })
    }

    pub fn from_toml_str(content: &str) -> Result<Self, LoaderError> {
        let file: ConfigFile =
            toml::from_str(content).map_err(|e| LoaderError::InvalidConfig(e.to_string()))?;

        let options = Self {
            warn_on_extra_files: file.loader.warn_on_extra_files,
            extension: file.loader.extension,
            enable_reloading: file.loader.enable_reloading,
            ignore: file.loader.ignore,
            inflections: file.inflections,
        };
        options.validate()?;
        Ok(options)
    }

    /// Options for the library whose entry file is `entry_point`: the nearest
    /// `lazyns.toml` above it, or the defaults when there is none.
    pub fn discover(entry_point: &Path) -> Result<Self, LoaderError> {
        match entry_point.parent().and_then(find_config_file) {
            Some(path) => {
                tracing::debug!("using loader configuration {}", path.display());
                Self::from_path(&path)
            }
            None => Ok(Self::default()),
        }
    }

    pub fn validate(&self) -> Result<(), LoaderError> {
        if self.extension.is_empty() || self.extension.starts_with('.') {
            return Err(LoaderError::InvalidConfig(format!(
                "extension must be non-empty and given without a leading dot, got '{}'",
                self.extension
            )));
        }

        for (basename, name) in &self.inflections {
            if !is_valid_name(name) {
                return Err(LoaderError::InvalidConfig(format!(
                    "inflection for '{}' is not a valid symbol name: '{}'",
                    basename, name
                )));
            }
        }

        Ok(())
    }
}

pub fn find_config_file(start: &Path) -> Option<PathBuf> {
    let mut current = start;

    loop {
        let config_path = current.join(CONFIG_FILE_NAME);
        if config_path.is_file() {
            return Some(config_path);
        }

        current = current.parent()?;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_parse_full_config() {
        let content = r#"
[loader]
warn_on_extra_files = false
extension = "nm"
enable_reloading = true
ignore = ["tasks", "generators/templates.nm"]

[inflections]
html_parser = "HTMLParser"
api = "API"
"#;

        let options = LibraryOptions::from_toml_str(content).expect("Failed to parse config");

        assert!(!options.warn_on_extra_files);
        assert_eq!(options.extension, "nm");
        assert!(options.enable_reloading);
        assert_eq!(
            options.ignore,
            vec![
                PathBuf::from("tasks"),
                PathBuf::from("generators/templates.nm")
            ]
        );
        assert_eq!(options.inflections.get("html_parser").unwrap(), "HTMLParser");
        assert_eq!(options.inflections.len(), 2);
    }

    #[test]
    fn test_empty_config_uses_defaults() {
        let options = LibraryOptions::from_toml_str("").expect("Failed to parse config");
        assert_eq!(options, LibraryOptions::default());
        assert!(options.warn_on_extra_files);
        assert_eq!(options.extension, "rb");
    }

    #[test]
    fn test_partial_loader_section() {
        let content = r#"
[loader]
enable_reloading = true
"#;

        let options = LibraryOptions::from_toml_str(content).expect("Failed to parse config");
        assert!(options.enable_reloading);
        assert!(options.warn_on_extra_files);
        assert_eq!(options.extension, "rb");
    }

    #[test]
    fn test_unknown_key_is_rejected() {
        let content = r#"
[loader]
warn_on_extra_file = false
"#;

        match LibraryOptions::from_toml_str(content) {
            Err(LoaderError::InvalidConfig(msg)) => {
                assert!(msg.contains("warn_on_extra_file"));
            }
            _ => panic!("Expected InvalidConfig error"),
        }
    }

    #[test]
    fn test_invalid_extension() {
        let content = r#"
[loader]
extension = ".rb"
"#;

        match LibraryOptions::from_toml_str(content) {
            Err(LoaderError::InvalidConfig(msg)) => assert!(msg.contains("leading dot")),
            _ => panic!("Expected InvalidConfig error"),
        }
    }

    #[test]
    fn test_invalid_inflection() {
        let content = r#"
[inflections]
foo = "not-a-name"
"#;

        match LibraryOptions::from_toml_str(content) {
            Err(LoaderError::InvalidConfig(msg)) => assert!(msg.contains("not-a-name")),
            _ => panic!("Expected InvalidConfig error"),
        }
    }

    #[test]
    fn test_from_path_reports_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join(CONFIG_FILE_NAME);
        fs::write(&path, "[loader]\nextension = 3\n").unwrap();

        match LibraryOptions::from_path(&path) {
            Err(LoaderError::ConfigParse { path: reported, .. }) => assert_eq!(reported, path),
            _ => panic!("Expected ConfigParse error"),
        }
    }

    #[test]
    fn test_find_config_file_walks_up() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join(CONFIG_FILE_NAME);
        fs::write(&config_path, "").unwrap();

        let nested = temp_dir.path().join("lib").join("ns1");
        fs::create_dir_all(&nested).unwrap();

        assert_eq!(find_config_file(&nested), Some(config_path));
    }

    #[test]
    fn test_discover_without_config() {
        let temp_dir = TempDir::new().unwrap();
        let nested = temp_dir.path().join("lib");
        fs::create_dir_all(&nested).unwrap();

        let options = LibraryOptions::discover(&nested.join("my_lib.rb")).unwrap();
        assert_eq!(options, LibraryOptions::default());
    }

    #[test]
    fn test_discover_with_config() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(
            temp_dir.path().join(CONFIG_FILE_NAME),
            "[loader]\nwarn_on_extra_files = false\n",
        )
        .unwrap();
        let lib = temp_dir.path().join("lib");
        fs::create_dir_all(&lib).unwrap();

        let options = LibraryOptions::discover(&lib.join("my_lib.rb")).unwrap();
        assert!(!options.warn_on_extra_files);
    }
}
