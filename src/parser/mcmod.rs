use super::{json_string, Dialect, MetadataParser};
use crate::error::ParseError;
use crate::model::RawCandidate;
use serde_json::Value;

const INFO_FILE: &str = "mcmod.info";

/// Parses legacy `mcmod.info` files.
///
/// The text is classified by its first non-whitespace character: `[` is a
/// JSON list whose first element describes the mod, `{` is the versioned
/// `{"modList": [...]}` layout, and anything else is read as properties
/// text. Fields: `modid`, `name`, `version`.
pub struct LegacyInfoParser;

impl MetadataParser for LegacyInfoParser {
    fn dialect(&self) -> Dialect {
        Dialect::LegacyInfo
    }

    fn matches(&self, entry_path: &str) -> bool {
        entry_path.to_lowercase().contains(INFO_FILE)
    }

    fn parse(&self, text: &str) -> Result<Vec<RawCandidate>, ParseError> {
        let trimmed = text.trim_start();

        let candidate = if trimmed.starts_with('[') {
            let list: Value = serde_json::from_str(trimmed)?;
            first_listed_mod(&list)?
        } else if trimmed.starts_with('{') {
            let document: Value = serde_json::from_str(trimmed)?;
            let list = document
                .get("modList")
                .ok_or_else(|| ParseError::Shape("object without modList".to_string()))?;
            first_listed_mod(list)?
        } else {
            Some(parse_properties(trimmed)?)
        };

        Ok(candidate
            .filter(RawCandidate::has_identifier)
            .into_iter()
            .collect())
    }
}

fn first_listed_mod(list: &Value) -> Result<Option<RawCandidate>, ParseError> {
    let mods = list
        .as_array()
        .ok_or_else(|| ParseError::Shape("expected a list of mods".to_string()))?;

    Ok(mods.first().filter(|m| m.is_object()).map(|m| RawCandidate {
        identifier: json_string(m, "modid"),
        display_name: json_string(m, "name"),
        version: json_string(m, "version"),
    }))
}

/// Reads `key = value` / `key: value` text under an implicit default section.
///
/// Keys are matched case-insensitively. `#` and `;` start comment lines,
/// indented lines continue the previous value, and keys inside any named
/// section other than `[DEFAULT]` are ignored. Missing keys stay absent.
fn parse_properties(text: &str) -> Result<RawCandidate, ParseError> {
    let mut candidate = RawCandidate::default();
    let mut in_default = true;
    let mut current: Option<String> = None;

    for (index, raw) in text.lines().enumerate() {
        let line = raw.trim();
        if line.is_empty() {
            current = None;
            continue;
        }
        if line.starts_with('#') || line.starts_with(';') {
            continue;
        }

        let indented = raw.starts_with(|c: char| c.is_whitespace());
        if indented {
            if let Some(key) = current.as_deref() {
                if in_default {
                    if let Some(slot) = property_slot(&mut candidate, key) {
                        let value = slot.get_or_insert_with(String::new);
                        value.push('\n');
                        value.push_str(line);
                    }
                }
                continue;
            }
        }

        if let Some(section) = line.strip_prefix('[').and_then(|l| l.strip_suffix(']')) {
            in_default = section.trim() == "DEFAULT";
            current = None;
            continue;
        }

        let split_at = line.find(['=', ':']).ok_or_else(|| {
            ParseError::Shape(format!("line {} has no key/value delimiter", index + 1))
        })?;
        let key = line[..split_at].trim().to_lowercase();
        let value = line[split_at + 1..].trim().to_string();

        if in_default {
            if let Some(slot) = property_slot(&mut candidate, &key) {
                *slot = Some(value);
            }
        }
        current = Some(key);
    }

    Ok(candidate)
}

fn property_slot<'a>(
    candidate: &'a mut RawCandidate,
    key: &str,
) -> Option<&'a mut Option<String>> {
    match key {
        "modid" => Some(&mut candidate.identifier),
        "name" => Some(&mut candidate.display_name),
        "version" => Some(&mut candidate.version),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_json_list_takes_first_element() {
        let candidates = LegacyInfoParser
            .parse(r#"[{"modid":"x","name":"X","version":"1.0"}]"#)
            .unwrap();

        assert_eq!(
            candidates,
            vec![RawCandidate::new(Some("x"), Some("X"), Some("1.0"))]
        );
    }

    #[test]
    fn test_json_list_ignores_later_elements() {
        let text = r#"
        [
            {"modid": "first", "name": "First", "version": "1.7.10-1.0"},
            {"modid": "second"}
        ]"#;

        let candidates = LegacyInfoParser.parse(text).unwrap();
        assert_eq!(candidates.len(), 1);
        assert_eq!(candidates[0].identifier.as_deref(), Some("first"));
    }

    #[test]
    fn test_empty_json_list_yields_nothing() {
        assert!(LegacyInfoParser.parse("[]").unwrap().is_empty());
    }

    #[test]
    fn test_mod_list_object() {
        let text = r#"{"modListVersion": 2, "modList": [{"modid": "ic2", "name": "IndustrialCraft 2"}]}"#;
        let candidates = LegacyInfoParser.parse(text).unwrap();

        assert_eq!(candidates[0].identifier.as_deref(), Some("ic2"));
        assert_eq!(candidates[0].version, None);
    }

    #[test]
    fn test_properties_text() {
        let text = "; exported by the build\nmodid = oldmod\nName: Old Mod\n";
        let candidates = LegacyInfoParser.parse(text).unwrap();

        assert_eq!(
            candidates,
            vec![RawCandidate::new(Some("oldmod"), Some("Old Mod"), None)]
        );
    }

    #[test]
    fn test_properties_continuation_lines() {
        let text = "modid=multi\nname=Multi\n  Line\nversion=2";
        let candidates = LegacyInfoParser.parse(text).unwrap();

        assert_eq!(candidates[0].display_name.as_deref(), Some("Multi\nLine"));
        assert_eq!(candidates[0].version.as_deref(), Some("2"));
    }

    #[test]
    fn test_properties_named_section_is_ignored() {
        let text = "name=Top\n[other]\nmodid=hidden";
        assert!(LegacyInfoParser.parse(text).unwrap().is_empty());
    }

    #[test]
    fn test_malformed_input_is_an_error() {
        assert!(LegacyInfoParser.parse("[{\"modid\": ").is_err());
        assert!(LegacyInfoParser.parse("just some words").is_err());
    }

    #[test]
    fn test_object_without_mod_list_is_an_error() {
        assert!(matches!(
            LegacyInfoParser.parse(r#"{"modid": "loose"}"#),
            Err(ParseError::Shape(_))
        ));
    }
}
