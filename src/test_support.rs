use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Writes a stored (uncompressed) zip at `dir/name` holding `files`.
pub fn create_test_zip(dir: &Path, name: &str, files: &[(&str, &[u8])]) -> PathBuf {
    let zip_path = dir.join(name);
    let file = fs::File::create(&zip_path).unwrap();
    let mut writer = zip::ZipWriter::new(file);
    let options =
        zip::write::SimpleFileOptions::default().compression_method(zip::CompressionMethod::Stored);

    for (entry_name, content) in files {
        writer.start_file(entry_name.to_string(), options).unwrap();
        writer.write_all(content).unwrap();
    }
    writer.finish().unwrap();
    zip_path
}

fn find_signature(bytes: &[u8], signature: &[u8; 4]) -> usize {
    bytes
        .windows(4)
        .position(|w| w == signature)
        .expect("signature not found")
}

fn le_u16(bytes: &[u8], at: usize) -> usize {
    u16::from_le_bytes([bytes[at], bytes[at + 1]]) as usize
}

/// Rewrites the method field of `entry_name` in both its local and central headers.
pub fn set_compression_method(zip_path: &Path, entry_name: &str, method: u16) {
    let mut bytes = fs::read(zip_path).unwrap();
    let mut patched = 0;

    for i in 0..bytes.len().saturating_sub(4) {
        let (method_at, name_len_at, name_at) = match &bytes[i..i + 4] {
            b"PK\x03\x04" => (i + 8, i + 26, i + 30),
            b"PK\x01\x02" => (i + 10, i + 28, i + 46),
            _ => continue,
        };
        let name_len = le_u16(&bytes, name_len_at);
        if bytes.get(name_at..name_at + name_len) == Some(entry_name.as_bytes()) {
            bytes[method_at..method_at + 2].copy_from_slice(&method.to_le_bytes());
            patched += 1;
        }
    }

    assert_eq!(patched, 2, "expected one local and one central header");
    fs::write(zip_path, bytes).unwrap();
}

/// Rebuilds a single-entry archive so its central directory declares an
/// uncompressed size of `declared` through a zip64 extra field.
pub fn forge_declared_size(zip_path: &Path, declared: u64) {
    let bytes = fs::read(zip_path).unwrap();
    let cd_start = find_signature(&bytes, b"PK\x01\x02");
    let name_len = le_u16(&bytes, cd_start + 28);
    let name = &bytes[cd_start + 46..cd_start + 46 + name_len];

    let mut central = bytes[cd_start..cd_start + 46].to_vec();
    central[6..8].copy_from_slice(&45u16.to_le_bytes());
    central[24..28].copy_from_slice(&u32::MAX.to_le_bytes());
    central[30..32].copy_from_slice(&12u16.to_le_bytes());
    central[32..34].copy_from_slice(&0u16.to_le_bytes());
    central.extend_from_slice(name);
    central.extend_from_slice(&1u16.to_le_bytes());
    central.extend_from_slice(&8u16.to_le_bytes());
    central.extend_from_slice(&declared.to_le_bytes());

    let mut out = bytes[..cd_start].to_vec();
    out.extend_from_slice(&central);
    out.extend_from_slice(b"PK\x05\x06");
    out.extend_from_slice(&0u16.to_le_bytes());
    out.extend_from_slice(&0u16.to_le_bytes());
    out.extend_from_slice(&1u16.to_le_bytes());
    out.extend_from_slice(&1u16.to_le_bytes());
    out.extend_from_slice(&(central.len() as u32).to_le_bytes());
    out.extend_from_slice(&(cd_start as u32).to_le_bytes());
    out.extend_from_slice(&0u16.to_le_bytes());

    fs::write(zip_path, out).unwrap();
}
