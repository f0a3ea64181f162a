///
/// # Inflection
///
/// Turns file and directory basenames into symbol names. The `Inflect` trait
/// is the single extension point every loader goes through: it receives the
/// basename without extension and the absolute path of the entry, so
/// implementations can special-case one particular file without touching
/// others that happen to share its basename.
///
/// The default `Inflector` capitalizes every `_` separated word and joins
/// them, `html_parser` becoming `HtmlParser`. Overrides registered with
/// `inflect` win over that rule, keyed by basename.
///

use std::path::Path;

use indexmap::IndexMap;

pub trait Inflect {
    fn camelize(&self, basename: &str, abspath: &Path) -> String;
}

#[derive(Debug, Clone, Default)]
pub struct Inflector {
    overrides: IndexMap<String, String>,
}

impl Inflector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn inflect<K, V>(&mut self, overrides: impl IntoIterator<Item = (K, V)>)
    where
        K: Into<String>,
        V: Into<String>,
    {
        for (basename, name) in overrides {
            self.overrides.insert(basename.into(), name.into());
        }
    }

    pub fn overrides(&self) -> &IndexMap<String, String> {
        &self.overrides
    }
}

impl Inflect for Inflector {
    fn camelize(&self, basename: &str, _abspath: &Path) -> String {
        if let Some(name) = self.overrides.get(basename) {
            return name.clone();
        }
        basename.split('_').map(capitalize).collect()
    }
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first
            .to_uppercase()
            .chain(chars.flat_map(char::to_lowercase))
            .collect(),
        None => String::new(),
    }
}

/// A symbol name must start with an ASCII uppercase letter followed by ASCII
/// alphanumerics or underscores.
pub fn is_valid_name(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_uppercase() => {
            chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
        }
        _ => false,
    }
}
