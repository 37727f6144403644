//! In-memory archive access.
//!
//! The whole file is read into a buffer before the zip container is parsed,
//! so container parsing never depends on seeking the file on disk and the
//! file handle is closed before any entry is touched.

use crate::error::ArchiveError;
use std::fs;
use std::io::{self, Cursor, Read};
use std::path::Path;
use zip::ZipArchive;

/// Largest entry [`ArchiveHandle::read_entry`] will load.
pub const MAX_ENTRY_BYTES: u64 = 16 * 1024 * 1024;

/// An opened archive.
///
/// Dropping the handle releases the buffer; no file handle outlives [`open`](Self::open).
pub struct ArchiveHandle {
    archive: ZipArchive<Cursor<Vec<u8>>>,
    names: Vec<String>,
}

impl ArchiveHandle {
    /// Reads `path` fully and opens it as a zip container.
    ///
    /// # Errors
    ///
    /// Returns [`ArchiveError::Io`] if the file cannot be read and
    /// [`ArchiveError::Open`] if the bytes are not a readable container.
    pub fn open(path: &Path) -> Result<Self, ArchiveError> {
        let bytes = fs::read(path).map_err(|source| ArchiveError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_bytes(bytes).map_err(|source| ArchiveError::Open {
            path: path.to_path_buf(),
            source,
        })
    }

    fn from_bytes(bytes: Vec<u8>) -> Result<Self, zip::result::ZipError> {
        let mut archive = ZipArchive::new(Cursor::new(bytes))?;

        // Raw access skips decompression setup, so entries using an
        // unsupported method still show up in the listing.
        let mut names = Vec::with_capacity(archive.len());
        for i in 0..archive.len() {
            match archive.by_index_raw(i) {
                Ok(entry) => names.push(entry.name().to_string()),
                Err(e) => {
                    tracing::debug!(index = i, error = %e, "Skipping unreadable entry header")
                }
            }
        }

        Ok(Self { archive, names })
    }

    /// Entry paths in the order they are stored in the container.
    pub fn entries(&self) -> &[String] {
        &self.names
    }

    /// Reads the full content of the entry named `name`.
    ///
    /// # Errors
    ///
    /// Returns [`ArchiveError::NotFound`] for unknown names and
    /// [`ArchiveError::Entry`] when the entry cannot be decompressed or
    /// holds more than [`MAX_ENTRY_BYTES`].
    pub fn read_entry(&mut self, name: &str) -> Result<Vec<u8>, ArchiveError> {
        let mut entry = self.archive.by_name(name).map_err(|e| match e {
            zip::result::ZipError::FileNotFound => ArchiveError::NotFound(name.to_string()),
            other => ArchiveError::Entry {
                name: name.to_string(),
                reason: other.to_string(),
            },
        })?;

        // The declared size comes from the archive itself and is not trusted.
        read_bounded(&mut entry, MAX_ENTRY_BYTES).map_err(|e| ArchiveError::Entry {
            name: name.to_string(),
            reason: e.to_string(),
        })
    }

    /// Reads an entry as text, dropping byte sequences that are not valid UTF-8.
    pub fn read_entry_text(&mut self, name: &str) -> Result<String, ArchiveError> {
        let bytes = self.read_entry(name)?;
        Ok(decode_lossy(&bytes))
    }
}

fn read_bounded(reader: impl Read, limit: u64) -> io::Result<Vec<u8>> {
    let mut content = Vec::new();
    reader.take(limit + 1).read_to_end(&mut content)?;
    if content.len() as u64 > limit {
        return Err(io::Error::new(
            io::ErrorKind::InvalidData,
            format!("entry is larger than {} bytes", limit),
        ));
    }
    Ok(content)
}

/// Decodes UTF-8, silently discarding invalid sequences and a leading BOM.
pub fn decode_lossy(bytes: &[u8]) -> String {
    let bytes = bytes.strip_prefix(b"\xef\xbb\xbf").unwrap_or(bytes);
    let mut text = String::with_capacity(bytes.len());
    for chunk in bytes.utf8_chunks() {
        text.push_str(chunk.valid());
    }
    text
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{create_test_zip, forge_declared_size, set_compression_method};
    use tempfile::TempDir;

    #[test]
    fn test_entries_keep_stored_order() {
        let dir = TempDir::new().unwrap();
        let path = create_test_zip(
            dir.path(),
            "mod.jar",
            &[
                ("META-INF/mods.toml", b"modId=\"a\""),
                ("assets/a/icon.png", b"png"),
                ("fabric.mod.json", b"{}"),
            ],
        );

        let handle = ArchiveHandle::open(&path).unwrap();
        assert_eq!(
            handle.entries(),
            ["META-INF/mods.toml", "assets/a/icon.png", "fabric.mod.json"]
        );
    }

    #[test]
    fn test_read_entry() {
        let dir = TempDir::new().unwrap();
        let path = create_test_zip(dir.path(), "mod.jar", &[("mcmod.info", b"modid=x")]);

        let mut handle = ArchiveHandle::open(&path).unwrap();
        assert_eq!(handle.read_entry("mcmod.info").unwrap(), b"modid=x");
        assert!(matches!(
            handle.read_entry("missing.txt"),
            Err(ArchiveError::NotFound(_))
        ));
    }

    #[test]
    fn test_read_entry_text_drops_invalid_bytes() {
        let dir = TempDir::new().unwrap();
        let path = create_test_zip(
            dir.path(),
            "mod.jar",
            &[("mcmod.info", b"modid=ab\xffc\nname=Caf\xc3\xa9")],
        );

        let mut handle = ArchiveHandle::open(&path).unwrap();
        assert_eq!(
            handle.read_entry_text("mcmod.info").unwrap(),
            "modid=abc\nname=Café"
        );
    }

    #[test]
    fn test_forged_declared_size_is_not_preallocated() {
        let dir = TempDir::new().unwrap();
        let path = create_test_zip(dir.path(), "forged.jar", &[("mcmod.info", b"modid=x")]);
        forge_declared_size(&path, 1 << 62);

        let mut handle = ArchiveHandle::open(&path).unwrap();
        assert_eq!(handle.entries(), ["mcmod.info"]);
        match handle.read_entry("mcmod.info") {
            Ok(content) => assert_eq!(content, b"modid=x"),
            Err(e) => assert!(matches!(e, ArchiveError::Entry { .. })),
        }
    }

    #[test]
    fn test_read_bounded_rejects_oversized_content() {
        assert_eq!(read_bounded(&b"12345"[..], 5).unwrap(), b"12345");

        let err = read_bounded(&b"123456"[..], 5).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::InvalidData);
    }

    #[test]
    fn test_unsupported_compression_is_listed_but_unreadable() {
        let dir = TempDir::new().unwrap();
        let path = create_test_zip(
            dir.path(),
            "mod.jar",
            &[("fabric.mod.json", br#"{"id": "a"}"#), ("mcmod.info", b"modid=b")],
        );
        set_compression_method(&path, "fabric.mod.json", 11);

        let mut handle = ArchiveHandle::open(&path).unwrap();
        assert_eq!(handle.entries(), ["fabric.mod.json", "mcmod.info"]);
        assert!(matches!(
            handle.read_entry("fabric.mod.json"),
            Err(ArchiveError::Entry { .. })
        ));
        assert_eq!(handle.read_entry("mcmod.info").unwrap(), b"modid=b");
    }

    #[test]
    fn test_decode_lossy_strips_bom() {
        assert_eq!(decode_lossy(b"\xef\xbb\xbf{\"id\": \"a\"}"), "{\"id\": \"a\"}");
    }

    #[test]
    fn test_open_corrupt_archive() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("broken.jar");
        fs::write(&path, b"this is not a zip file").unwrap();

        assert!(matches!(
            ArchiveHandle::open(&path),
            Err(ArchiveError::Open { .. })
        ));
    }

    #[test]
    fn test_open_missing_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("absent.jar");

        assert!(matches!(
            ArchiveHandle::open(&path),
            Err(ArchiveError::Io { .. })
        ));
    }
}
