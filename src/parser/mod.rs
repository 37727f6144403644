//! Metadata dialect parsers.
//!
//! This module provides the [`MetadataParser`] trait and one implementation
//! per metadata dialect found inside mod archives, plus the filename
//! fallback used when none of them produce anything.
//!
//! # Dialects
//!
//! | Parser | Entry match | Format |
//! |--------|-------------|--------|
//! | [`ModuleDescriptorParser`] | path ends with `fabric.mod.json` | JSON object or list of objects |
//! | [`StructuredTextParser`] | path contains `mods.toml` (any case) | `key = value` text, `"""` blocks |
//! | [`LegacyInfoParser`] | path contains `mcmod.info` (any case) | JSON list or properties text |
//!
//! [`all_parsers`] returns them in priority order; the extractor stops at
//! the first dialect that yields a usable record.
//!
//! # Example
//!
//! ```
//! use modcatalog::parser::{all_parsers, MetadataParser};
//!
//! let parser = all_parsers()
//!     .into_iter()
//!     .find(|p| p.matches("META-INF/mods.toml"))
//!     .unwrap();
//!
//! let candidates = parser.parse("modId=\"jei\"\nversion=\"15.2.0\"").unwrap();
//! assert_eq!(candidates[0].identifier.as_deref(), Some("jei"));
//! ```

mod fabric;
pub mod filename;
mod mcmod;
mod mods_toml;

pub use fabric::ModuleDescriptorParser;
pub use filename::derive_from_filename;
pub use mcmod::LegacyInfoParser;
pub use mods_toml::StructuredTextParser;

use crate::error::ParseError;
use crate::model::RawCandidate;
use serde::{Deserialize, Serialize};

/// The metadata formats a mod archive may carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Dialect {
    ModuleDescriptor,
    StructuredText,
    LegacyInfo,
}

impl Dialect {
    pub fn as_str(&self) -> &'static str {
        match self {
            Dialect::ModuleDescriptor => "module_descriptor",
            Dialect::StructuredText => "structured_text",
            Dialect::LegacyInfo => "legacy_info",
        }
    }
}

impl std::fmt::Display for Dialect {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Parses one metadata dialect.
///
/// `parse` is called once per matching entry. An `Err` means that entry was
/// malformed; callers treat it as zero candidates for that entry only.
pub trait MetadataParser: Send + Sync {
    /// Returns the dialect this parser handles.
    fn dialect(&self) -> Dialect;

    /// Returns true if the archive entry at `entry_path` holds this dialect.
    fn matches(&self, entry_path: &str) -> bool;

    /// Turns the entry's text into zero or more candidates.
    ///
    /// # Errors
    ///
    /// Returns a [`ParseError`] when the text cannot be interpreted.
    fn parse(&self, text: &str) -> Result<Vec<RawCandidate>, ParseError>;
}

/// Returns every dialect parser in priority order, highest first.
///
/// # Example
///
/// ```
/// use modcatalog::parser::{all_parsers, Dialect};
///
/// let order: Vec<Dialect> = all_parsers().iter().map(|p| p.dialect()).collect();
/// assert_eq!(
///     order,
///     [Dialect::ModuleDescriptor, Dialect::StructuredText, Dialect::LegacyInfo]
/// );
/// ```
pub fn all_parsers() -> Vec<Box<dyn MetadataParser>> {
    vec![
        Box::new(ModuleDescriptorParser),
        Box::new(StructuredTextParser),
        Box::new(LegacyInfoParser),
    ]
}

/// Returns the parser for a specific dialect.
pub fn get_parser(dialect: Dialect) -> Box<dyn MetadataParser> {
    match dialect {
        Dialect::ModuleDescriptor => Box::new(ModuleDescriptorParser),
        Dialect::StructuredText => Box::new(StructuredTextParser),
        Dialect::LegacyInfo => Box::new(LegacyInfoParser),
    }
}

/// Reads `key` from a JSON object as a string, treating other types as absent.
pub(crate) fn json_string(value: &serde_json::Value, key: &str) -> Option<String> {
    value.get(key)?.as_str().map(str::to_string)
}
