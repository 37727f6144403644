use crate::error::CatalogError;
use crate::model::ModRecord;
use serde::Serialize;
use serde_json::ser::PrettyFormatter;
use std::fs;
use std::path::Path;

const INDENT: &[u8] = b"    ";

/// Serializes records as a JSON array indented with four spaces.
///
/// Non-ASCII text is written as UTF-8, never escaped.
pub fn to_catalog_bytes(records: &[ModRecord]) -> Result<Vec<u8>, CatalogError> {
    let mut buf = Vec::new();
    let mut serializer =
        serde_json::Serializer::with_formatter(&mut buf, PrettyFormatter::with_indent(INDENT));
    records.serialize(&mut serializer)?;
    Ok(buf)
}

/// Writes the catalog to `path`, replacing any previous file.
pub fn write_catalog(path: &Path, records: &[ModRecord]) -> Result<(), CatalogError> {
    let bytes = to_catalog_bytes(records)?;
    fs::write(path, bytes)?;
    Ok(())
}
