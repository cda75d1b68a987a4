//! Shortcut catalog.
//!
//! # Responsibilities
//! - Hold named regex fragments used to type dynamic segments
//! - Split the `alternatives->default` suffix into fragment and default
//! - Fall back to the word shortcut for unknown names
//!
//! # Design Decisions
//! - Owned by a router builder, never a process-wide table
//! - Entries can be overwritten but not removed
//! - Fragments are not validated here; a bad fragment fails when a
//!   route using it is compiled

use std::collections::BTreeMap;

/// Name of the shortcut used when a placeholder names none, or an unknown one.
pub const WORD: &str = "s";

/// Separator between a fragment and its default value.
const DEFAULT_SEPARATOR: &str = "->";

/// A resolved shortcut: regex fragment plus optional default value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Shortcut {
    pub fragment: String,
    pub default: Option<String>,
}

impl Shortcut {
    /// Parse a raw shortcut such as `(sk|en)->sk`.
    pub fn parse(raw: &str) -> Self {
        match raw.split_once(DEFAULT_SEPARATOR) {
            Some((fragment, default)) => Self {
                fragment: fragment.to_string(),
                default: (!default.is_empty()).then(|| default.to_string()),
            },
            None => Self {
                fragment: raw.to_string(),
                default: None,
            },
        }
    }
}

/// Named shortcuts available to the pattern compiler.
#[derive(Debug, Clone)]
pub struct ShortcutCatalog {
    entries: BTreeMap<String, Shortcut>,
}

impl ShortcutCatalog {
    /// Catalog containing only the built-in shortcuts.
    pub fn new() -> Self {
        let mut catalog = Self {
            entries: BTreeMap::new(),
        };
        catalog.register("i", r"(\d+)");
        catalog.register(WORD, r"(\w+)");
        catalog.register("locale", "(sk|en)->sk");
        catalog.register("paginator", r"(page-\d+)");
        catalog
    }

    /// Add a shortcut or overwrite an existing one.
    pub fn register(&mut self, name: impl Into<String>, raw: &str) {
        let name = name.into();
        tracing::debug!(shortcut = %name, raw = %raw, "Shortcut registered");
        self.entries.insert(name, Shortcut::parse(raw));
    }

    /// Look up a shortcut by exact name.
    pub fn get(&self, name: &str) -> Option<&Shortcut> {
        self.entries.get(name)
    }

    /// Resolve a placeholder's shortcut token.
    ///
    /// Unknown or missing tokens resolve to the word shortcut without a default.
    pub fn resolve(&self, token: Option<&str>) -> Shortcut {
        if let Some(shortcut) = token.and_then(|t| self.entries.get(t)) {
            return shortcut.clone();
        }
        if let Some(t) = token {
            tracing::debug!(shortcut = %t, "Unknown shortcut, falling back to word");
        }
        Shortcut {
            fragment: self.word_fragment(),
            default: None,
        }
    }

    /// Registered names in lexical order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    fn word_fragment(&self) -> String {
        self.entries
            .get(WORD)
            .map(|s| s.fragment.clone())
            .unwrap_or_else(|| r"(\w+)".to_string())
    }
}

impl Default for ShortcutCatalog {
    fn default() -> Self {
        Self::new()
    }
}
