//! Best-effort metadata from an archive's file name.

use crate::model::{RawCandidate, UNKNOWN_VERSION};
use regex::Regex;
use std::path::Path;
use std::sync::LazyLock;

static NAME_VERSION_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^([a-z0-9_]+)-([0-9.]+)").expect("valid name-version regex"));

/// Derives a candidate from a file name. Always yields an identifier.
///
/// `examplemod-1.2.3.jar` becomes `examplemod` at version `1.2.3`. Names
/// without a leading `<id>-<version>` pattern lose their extension, are
/// lowercased and have spaces and hyphens replaced with underscores; their
/// version is [`UNKNOWN_VERSION`].
///
/// # Example
///
/// ```
/// use modcatalog::parser::derive_from_filename;
///
/// let candidate = derive_from_filename("My Cool Mod.jar");
/// assert_eq!(candidate.identifier.as_deref(), Some("my_cool_mod"));
/// assert_eq!(candidate.version.as_deref(), Some("unknown"));
/// ```
pub fn derive_from_filename(file_name: &str) -> RawCandidate {
    if let Some(caps) = NAME_VERSION_RE.captures(file_name) {
        // The version class also swallows the dot before the extension.
        let version = caps[2].trim_end_matches('.');
        if !version.is_empty() {
            let identifier = caps[1].to_string();
            return RawCandidate {
                display_name: Some(identifier.clone()),
                identifier: Some(identifier),
                version: Some(version.to_string()),
            };
        }
    }

    let stem = Path::new(file_name)
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| file_name.to_string());
    let identifier = stem.to_lowercase().replace([' ', '-'], "_");

    RawCandidate {
        display_name: Some(identifier.clone()),
        identifier: Some(identifier),
        version: Some(UNKNOWN_VERSION.to_string()),
    }
}
