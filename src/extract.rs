//! Per-archive metadata extraction.
//!
//! Dialect parsers are tried in priority order and the first dialect that
//! produces at least one record with an identifier wins; lower-priority
//! dialects are not consulted. When no dialect produces anything the
//! record is derived from the file name.

use crate::archive::ArchiveHandle;
use crate::model::{ModRecord, RawCandidate};
use crate::parser::{all_parsers, derive_from_filename, Dialect, MetadataParser};
use serde::Serialize;
use std::path::Path;
use tracing::{debug, warn};

/// Where an archive's records came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RecordOrigin {
    Dialect(Dialect),
    FileName,
}

/// Records extracted from one archive.
#[derive(Debug, Clone, Serialize)]
pub struct Extraction {
    pub origin: RecordOrigin,
    pub records: Vec<ModRecord>,
}

/// Runs the dialect parsers against archives.
///
/// Holds no per-archive state, so one extractor can be shared across
/// worker threads.
pub struct Extractor {
    parsers: Vec<Box<dyn MetadataParser>>,
}

impl Extractor {
    /// Creates an extractor using every dialect in default priority order.
    pub fn new() -> Self {
        Self::with_parsers(all_parsers())
    }

    /// Creates an extractor with a custom, already ordered, parser list.
    pub fn with_parsers(parsers: Vec<Box<dyn MetadataParser>>) -> Self {
        Self { parsers }
    }

    /// Extracts normalized records from the archive at `path`.
    ///
    /// Returns `None` when the archive cannot be opened at all.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use modcatalog::Extractor;
    /// use std::path::Path;
    ///
    /// let extractor = Extractor::new();
    /// if let Some(records) = extractor.extract(Path::new("mods/jei-15.2.0.jar")) {
    ///     for record in records {
    ///         println!("{} {}", record.identifier, record.version);
    ///     }
    /// }
    /// ```
    pub fn extract(&self, path: &Path) -> Option<Vec<ModRecord>> {
        self.inspect(path).map(|extraction| extraction.records)
    }

    /// Like [`extract`](Self::extract) but also reports which dialect, or the
    /// file name, the records came from.
    pub fn inspect(&self, path: &Path) -> Option<Extraction> {
        let mut handle = match ArchiveHandle::open(path) {
            Ok(handle) => handle,
            Err(e) => {
                warn!(error = %e, "Skipping archive that could not be opened");
                return None;
            }
        };

        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();

        Some(self.extract_from(&mut handle, &file_name))
    }

    /// Extracts records from an already opened archive.
    ///
    /// `file_name` is only used for the filename fallback.
    pub fn extract_from(&self, handle: &mut ArchiveHandle, file_name: &str) -> Extraction {
        for parser in &self.parsers {
            let records = run_dialect(parser.as_ref(), handle);
            if !records.is_empty() {
                debug!(
                    file = file_name,
                    dialect = %parser.dialect(),
                    count = records.len(),
                    "Metadata found"
                );
                return Extraction {
                    origin: RecordOrigin::Dialect(parser.dialect()),
                    records,
                };
            }
        }

        debug!(file = file_name, "No metadata entries, deriving from file name");
        Extraction {
            origin: RecordOrigin::FileName,
            records: derive_from_filename(file_name)
                .normalize()
                .into_iter()
                .collect(),
        }
    }
}

impl Default for Extractor {
    fn default() -> Self {
        Self::new()
    }
}

/// Parses every entry the dialect matches and concatenates the results.
///
/// Candidates without an identifier are dropped. A failure to read or parse
/// one entry only loses that entry.
fn run_dialect(parser: &dyn MetadataParser, handle: &mut ArchiveHandle) -> Vec<ModRecord> {
    let matching: Vec<String> = handle
        .entries()
        .iter()
        .filter(|name| parser.matches(name.as_str()))
        .cloned()
        .collect();

    let mut records = Vec::new();
    for entry in matching {
        let text = match handle.read_entry_text(&entry) {
            Ok(text) => text,
            Err(e) => {
                debug!(entry = %entry, error = %e, "Failed to read metadata entry");
                continue;
            }
        };

        match parser.parse(&text) {
            Ok(candidates) => {
                records.extend(candidates.into_iter().filter_map(RawCandidate::normalize));
            }
            Err(e) => {
                debug!(
                    entry = %entry,
                    dialect = %parser.dialect(),
                    error = %e,
                    "Failed to parse metadata entry"
                );
            }
        }
    }
    records
}
