use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Version written for records whose metadata carries none.
pub const UNKNOWN_VERSION: &str = "unknown";

/// A normalized catalog entry.
///
/// Serializes with the catalog field names `modid`, `name` and `version`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModRecord {
    #[serde(rename = "modid")]
    pub identifier: String,
    #[serde(rename = "name")]
    pub display_name: String,
    pub version: String,
}

impl ModRecord {
    pub fn new(
        identifier: impl Into<String>,
        display_name: impl Into<String>,
        version: impl Into<String>,
    ) -> Self {
        Self {
            identifier: identifier.into(),
            display_name: display_name.into(),
            version: version.into(),
        }
    }
}

/// Metadata as a dialect parser found it, before normalization.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawCandidate {
    pub identifier: Option<String>,
    pub display_name: Option<String>,
    pub version: Option<String>,
}

impl RawCandidate {
    pub fn new(
        identifier: Option<&str>,
        display_name: Option<&str>,
        version: Option<&str>,
    ) -> Self {
        Self {
            identifier: identifier.map(str::to_string),
            display_name: display_name.map(str::to_string),
            version: version.map(str::to_string),
        }
    }

    /// Returns true if the candidate carries a non-empty identifier.
    pub fn has_identifier(&self) -> bool {
        self.identifier.as_deref().is_some_and(|id| !id.is_empty())
    }

    /// Fills in missing fields and produces a [`ModRecord`].
    ///
    /// Returns `None` when the identifier is absent or empty. A missing
    /// display name falls back to the identifier and a missing version to
    /// [`UNKNOWN_VERSION`].
    pub fn normalize(self) -> Option<ModRecord> {
        let identifier = self.identifier.filter(|id| !id.is_empty())?;
        let display_name = self.display_name.unwrap_or_else(|| identifier.clone());
        let version = self
            .version
            .unwrap_or_else(|| UNKNOWN_VERSION.to_string());

        Some(ModRecord {
            identifier,
            display_name,
            version,
        })
    }
}

/// Outcome of scanning one directory tree.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanResult {
    pub records: Vec<ModRecord>,
    pub skipped: Vec<String>,
    /// Number of candidate archives visited.
    pub files_scanned: usize,
    pub scan_time: DateTime<Utc>,
}

impl ScanResult {
    pub fn new() -> Self {
        Self {
            records: Vec::new(),
            skipped: Vec::new(),
            files_scanned: 0,
            scan_time: Utc::now(),
        }
    }

    /// Folds the extraction outcome of one archive into the result.
    ///
    /// `None` or an empty record list marks the file as skipped.
    pub fn absorb(mut self, file_name: String, outcome: Option<Vec<ModRecord>>) -> Self {
        self.files_scanned += 1;
        match outcome {
            Some(records) if !records.is_empty() => self.records.extend(records),
            _ => self.skipped.push(file_name),
        }
        self
    }
}

impl Default for ScanResult {
    fn default() -> Self {
        Self::new()
    }
}
