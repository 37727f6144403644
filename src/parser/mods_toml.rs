use super::{Dialect, MetadataParser};
use crate::error::ParseError;
use crate::model::RawCandidate;
use regex::Regex;
use std::sync::LazyLock;

const DESCRIPTOR_FILE: &str = "mods.toml";
const TRIPLE_QUOTE: &str = "\"\"\"";

static MOD_ID_BLOCK_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"(?s)modId\s*=\s*"""(.*?)""""#).expect("valid modId regex"));
static DISPLAY_NAME_BLOCK_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?s)displayName\s*=\s*"""(.*?)""""#).expect("valid displayName regex")
});
static VERSION_BLOCK_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"(?s)version\s*=\s*"""(.*?)""""#).expect("valid version regex"));

/// Parses `mods.toml` style descriptors line by line.
///
/// This is deliberately not a TOML parser: real-world descriptors are often
/// invalid TOML, so only the `modId`, `displayName` and `version` keys are
/// picked out. Keys are case-sensitive. At most one candidate is produced.
pub struct StructuredTextParser;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Field {
    ModId,
    DisplayName,
    Version,
}

impl Field {
    const ALL: [Field; 3] = [Field::ModId, Field::DisplayName, Field::Version];

    fn key(self) -> &'static str {
        match self {
            Field::ModId => "modId",
            Field::DisplayName => "displayName",
            Field::Version => "version",
        }
    }

    fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|f| f.key() == key)
    }

    /// A triple-quoted assignment starts with the bare `key=` prefix and
    /// carries the `"""` marker on the same line.
    fn from_triple_quoted_line(line: &str) -> Option<Self> {
        if !line.contains(TRIPLE_QUOTE) {
            return None;
        }
        Self::ALL.into_iter().find(|f| {
            line.strip_prefix(f.key())
                .is_some_and(|rest| rest.starts_with('='))
        })
    }

    fn block_regex(self) -> &'static Regex {
        match self {
            Field::ModId => &MOD_ID_BLOCK_RE,
            Field::DisplayName => &DISPLAY_NAME_BLOCK_RE,
            Field::Version => &VERSION_BLOCK_RE,
        }
    }

    fn assign(self, candidate: &mut RawCandidate, value: String) {
        let slot = match self {
            Field::ModId => &mut candidate.identifier,
            Field::DisplayName => &mut candidate.display_name,
            Field::Version => &mut candidate.version,
        };
        *slot = Some(value);
    }
}

impl MetadataParser for StructuredTextParser {
    fn dialect(&self) -> Dialect {
        Dialect::StructuredText
    }

    fn matches(&self, entry_path: &str) -> bool {
        entry_path.to_lowercase().contains(DESCRIPTOR_FILE)
    }

    fn parse(&self, text: &str) -> Result<Vec<RawCandidate>, ParseError> {
        let mut candidate = RawCandidate::default();
        let mut in_dependencies = false;

        for line in text.lines() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            // Dependency tables repeat modId/version for other mods.
            if line.starts_with('[') {
                in_dependencies = is_dependency_header(line);
                continue;
            }
            if in_dependencies {
                continue;
            }

            if let Some(field) = Field::from_triple_quoted_line(line) {
                if let Some(caps) = field.block_regex().captures(text) {
                    field.assign(&mut candidate, caps[1].trim().to_string());
                }
                continue;
            }

            if let Some((key, value)) = line.split_once('=') {
                if let Some(field) = Field::from_key(key.trim()) {
                    field.assign(&mut candidate, single_line_value(value));
                }
            }
        }

        if candidate.has_identifier() {
            Ok(vec![candidate])
        } else {
            Ok(Vec::new())
        }
    }
}

fn is_dependency_header(line: &str) -> bool {
    line.trim_matches(|c| c == '[' || c == ']')
        .trim()
        .starts_with("dependencies")
}

/// Unquotes a single-line value.
///
/// A quoted value ends at its closing quote, which drops trailing comments
/// such as `"1.0" #mandatory`. Anything else has stray quote characters
/// trimmed from both ends.
fn single_line_value(raw: &str) -> String {
    let value = raw.trim();

    for quote in ['"', '\''] {
        if let Some(rest) = value.strip_prefix(quote) {
            if let Some(end) = rest.find(quote) {
                return rest[..end].to_string();
            }
        }
    }

    value.trim_matches('"').trim_matches('\'').to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    const FORGE_MODS_TOML: &str = r#"
modLoader="javafml" #mandatory
loaderVersion="[47,)"
license="MIT"

[[mods]]
modId="examplemod"
version="1.4.2" #mandatory
displayName='Example Mod'
description='''
A mod.
'''

[[dependencies.examplemod]]
    modId="forge"
    mandatory=true
    versionRange="[47,)"
"#;

    #[test]
    fn test_single_line_values() {
        let candidates = StructuredTextParser.parse(FORGE_MODS_TOML).unwrap();

        assert_eq!(
            candidates,
            vec![RawCandidate::new(
                Some("examplemod"),
                Some("Example Mod"),
                Some("1.4.2")
            )]
        );
    }

    #[test]
    fn test_triple_quoted_block() {
        let candidates = StructuredTextParser
            .parse("modId=\"\"\"\nfoo\n\"\"\"\nversion=\"2.0\"")
            .unwrap();

        assert_eq!(candidates.len(), 1);
        assert_eq!(candidates[0].identifier.as_deref(), Some("foo"));
        assert_eq!(candidates[0].version.as_deref(), Some("2.0"));
    }

    #[test]
    fn test_triple_quoted_display_name_spans_lines() {
        let text = "modId=\"bar\"\ndisplayName=\"\"\"Bar\n  Deluxe \"\"\"\n";
        let candidates = StructuredTextParser.parse(text).unwrap();

        assert_eq!(candidates[0].display_name.as_deref(), Some("Bar\n  Deluxe"));
    }

    #[test]
    fn test_spaced_triple_quote_falls_through_to_single_line() {
        // Only the bare `modId=` prefix is treated as a block opener.
        let candidates = StructuredTextParser
            .parse("modId = \"\"\"\nfoo\n\"\"\"")
            .unwrap();
        assert!(candidates.is_empty());
    }

    #[test]
    fn test_keys_are_case_sensitive() {
        let candidates = StructuredTextParser.parse("modid=\"lower\"").unwrap();
        assert!(candidates.is_empty());
    }

    #[test]
    fn test_comments_and_blank_lines_are_skipped() {
        let text = "# modId=\"commented\"\n\n   \nmodId=\"real\"";
        let candidates = StructuredTextParser.parse(text).unwrap();
        assert_eq!(candidates[0].identifier.as_deref(), Some("real"));
    }

    #[test]
    fn test_missing_mod_id_yields_nothing() {
        let candidates = StructuredTextParser
            .parse("displayName=\"Nameless\"\nversion=\"1.0\"")
            .unwrap();
        assert!(candidates.is_empty());
    }

    #[test]
    fn test_single_line_value_unquoting() {
        assert_eq!(single_line_value(" \"quoted\" "), "quoted");
        assert_eq!(single_line_value("'single'"), "single");
        assert_eq!(single_line_value("\"1.0\" #mandatory"), "1.0");
        assert_eq!(single_line_value("bare"), "bare");
        assert_eq!(single_line_value("\"unterminated"), "unterminated");
    }

    #[test]
    fn test_dependency_header_detection() {
        assert!(is_dependency_header("[[dependencies.examplemod]]"));
        assert!(is_dependency_header("[dependencies]"));
        assert!(!is_dependency_header("[[mods]]"));
    }
}
