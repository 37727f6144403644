use super::{json_string, Dialect, MetadataParser};
use crate::error::ParseError;
use crate::model::RawCandidate;
use serde_json::Value;

const DESCRIPTOR_FILE: &str = "fabric.mod.json";

/// Parses `fabric.mod.json` module descriptors.
///
/// A descriptor is either one object or a list of objects when several
/// modules ship in the same archive. Fields: `id`, `name`, `version`.
pub struct ModuleDescriptorParser;

impl MetadataParser for ModuleDescriptorParser {
    fn dialect(&self) -> Dialect {
        Dialect::ModuleDescriptor
    }

    fn matches(&self, entry_path: &str) -> bool {
        entry_path.ends_with(DESCRIPTOR_FILE)
    }

    fn parse(&self, text: &str) -> Result<Vec<RawCandidate>, ParseError> {
        let document: Value = serde_json::from_str(text)?;

        match document {
            Value::Array(modules) => Ok(modules
                .iter()
                .filter(|m| m.is_object())
                .map(descriptor_candidate)
                .collect()),
            Value::Object(_) => Ok(vec![descriptor_candidate(&document)]),
            other => Err(ParseError::Shape(format!(
                "expected object or list, found {}",
                json_kind(&other)
            ))),
        }
    }
}

fn descriptor_candidate(module: &Value) -> RawCandidate {
    RawCandidate {
        identifier: json_string(module, "id"),
        display_name: json_string(module, "name"),
        version: json_string(module, "version"),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "list",
        Value::Object(_) => "object",
    }
}
