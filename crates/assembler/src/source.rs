//! Program document ingestion.
//!
//! A program is a document with a single `program` key holding a list of
//! records, each naming an operation and its fields:
//!
//! ```yaml
//! program:
//!   - { op: LOAD_CONST, dst: 5, value: 748 }
//!   - { op: LOAD, dst: 6, addr_reg: 0 }
//! ```
//!
//! YAML is the native format; files ending in `.json` are read as JSON with
//! the same shape.

use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;

use serde::Deserialize;

/// Serialization format of a program document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceFormat {
    /// YAML (`.yaml`, `.yml`, or anything not recognized as JSON).
    Yaml,
    /// JSON (`.json`).
    Json,
}

impl SourceFormat {
    /// Picks the format from the file extension.
    #[must_use]
    pub fn from_path(path: &Path) -> Self {
        if path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"))
        {
            Self::Json
        } else {
            Self::Yaml
        }
    }
}

/// A raw field value as written in the source.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    /// Integer literal.
    Integer(i64),
    /// Anything else; resolved as a decimal or `0x` hex integer when encoding.
    Text(String),
}

impl FieldValue {
    /// Returns the integer this value denotes, if any.
    #[must_use]
    pub fn as_integer(&self) -> Option<i64> {
        match self {
            Self::Integer(value) => Some(*value),
            Self::Text(text) => parse_integer(text),
        }
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Integer(value) => write!(f, "{value}"),
            Self::Text(text) => write!(f, "{text:?}"),
        }
    }
}

/// One program record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceRecord {
    /// 1-based position in the program list.
    pub index: usize,
    /// Operation name as written.
    pub op: String,
    /// Remaining named fields.
    pub fields: BTreeMap<String, FieldValue>,
}

impl SourceRecord {
    /// Builds a record from `(name, value)` integer pairs.
    #[must_use]
    pub fn new(index: usize, op: &str, fields: &[(&str, i64)]) -> Self {
        Self {
            index,
            op: op.to_string(),
            fields: fields
                .iter()
                .map(|(name, value)| ((*name).to_string(), FieldValue::Integer(*value)))
                .collect(),
        }
    }

    /// Looks up a field by name.
    #[must_use]
    pub fn field(&self, name: &str) -> Option<&FieldValue> {
        self.fields.get(name)
    }
}

/// Failure to read a program document into records.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceError {
    /// The document is not valid YAML/JSON or a record is malformed.
    Syntax(String),
    /// The document has no `program` list.
    MissingProgram,
}

impl fmt::Display for SourceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Syntax(msg) => write!(f, "malformed program document: {msg}"),
            Self::MissingProgram => write!(f, "document has no `program` list"),
        }
    }
}

impl std::error::Error for SourceError {}

#[derive(Debug, Deserialize)]
struct ProgramDocument {
    program: Option<Vec<RawRecord>>,
}

#[derive(Debug, Deserialize)]
struct RawRecord {
    op: String,
    #[serde(flatten)]
    fields: BTreeMap<String, FieldValue>,
}

/// Parses a program document.
///
/// # Errors
///
/// Returns [`SourceError::Syntax`] for malformed input and
/// [`SourceError::MissingProgram`] when the `program` key is absent or null.
pub fn parse_program(content: &str, format: SourceFormat) -> Result<Vec<SourceRecord>, SourceError> {
    let document: ProgramDocument = match format {
        SourceFormat::Yaml => {
            serde_yaml::from_str(content).map_err(|e| SourceError::Syntax(e.to_string()))?
        }
        SourceFormat::Json => {
            serde_json::from_str(content).map_err(|e| SourceError::Syntax(e.to_string()))?
        }
    };

    let records = document.program.ok_or(SourceError::MissingProgram)?;
    Ok(records
        .into_iter()
        .enumerate()
        .map(|(idx, raw)| SourceRecord {
            index: idx + 1,
            op: raw.op,
            fields: raw.fields,
        })
        .collect())
}

fn parse_integer(text: &str) -> Option<i64> {
    let text = text.trim();
    let (negative, digits) = text
        .strip_prefix('-')
        .map_or((false, text), |rest| (true, rest));
    if digits.starts_with(['-', '+']) {
        return None;
    }

    let magnitude = if let Some(hex) = digits
        .strip_prefix("0x")
        .or_else(|| digits.strip_prefix("0X"))
    {
        if hex.starts_with(['-', '+']) {
            return None;
        }
        i64::from_str_radix(hex, 16).ok()?
    } else {
        digits.parse::<i64>().ok()?
    };

    Some(if negative { -magnitude } else { magnitude })
}

#[cfg(test)]
mod tests {
    use super::*;

    const YAML_PROGRAM: &str = "\
program:
  - op: LOAD_CONST
    dst: 5
    value: 748
  - { op: LOAD, dst: 6, addr_reg: 0 }
";

    #[test]
    fn yaml_records_are_numbered_from_one() {
        let records = parse_program(YAML_PROGRAM, SourceFormat::Yaml).expect("valid yaml");
        assert_eq!(
            records,
            vec![
                SourceRecord::new(1, "LOAD_CONST", &[("dst", 5), ("value", 748)]),
                SourceRecord::new(2, "LOAD", &[("dst", 6), ("addr_reg", 0)]),
            ]
        );
    }

    #[test]
    fn json_uses_same_shape() {
        let records = parse_program(
            r#"{"program": [{"op": "STORE", "src": 1, "addr_reg": 7}]}"#,
            SourceFormat::Json,
        )
        .expect("valid json");
        assert_eq!(
            records,
            vec![SourceRecord::new(1, "STORE", &[("src", 1), ("addr_reg", 7)])]
        );
    }

    #[test]
    fn string_fields_are_kept_for_later_resolution() {
        let records = parse_program(
            "program:\n  - { op: ror, dst: \"7\", mem_reg: r5 }\n",
            SourceFormat::Yaml,
        )
        .expect("valid yaml");
        assert_eq!(records[0].field("dst").and_then(FieldValue::as_integer), Some(7));
        assert_eq!(records[0].field("mem_reg").and_then(FieldValue::as_integer), None);
    }

    #[test]
    fn missing_program_key_is_reported() {
        assert_eq!(
            parse_program("other: 1\n", SourceFormat::Yaml),
            Err(SourceError::MissingProgram)
        );
        assert_eq!(
            parse_program("program:\n", SourceFormat::Yaml),
            Err(SourceError::MissingProgram)
        );
    }

    #[test]
    fn empty_program_is_valid() {
        assert_eq!(parse_program("program: []\n", SourceFormat::Yaml), Ok(Vec::new()));
    }

    #[test]
    fn record_without_op_is_a_syntax_error() {
        let err = parse_program("program:\n  - { dst: 1 }\n", SourceFormat::Yaml)
            .expect_err("op is required");
        assert!(matches!(err, SourceError::Syntax(_)));
    }

    #[test]
    fn format_follows_extension() {
        assert_eq!(SourceFormat::from_path(Path::new("p.json")), SourceFormat::Json);
        assert_eq!(SourceFormat::from_path(Path::new("p.JSON")), SourceFormat::Json);
        assert_eq!(SourceFormat::from_path(Path::new("p.yaml")), SourceFormat::Yaml);
        assert_eq!(SourceFormat::from_path(Path::new("p")), SourceFormat::Yaml);
    }

    #[test]
    fn integer_text_accepts_decimal_hex_and_sign() {
        assert_eq!(parse_integer(" 42 "), Some(42));
        assert_eq!(parse_integer("0x2EC"), Some(748));
        assert_eq!(parse_integer("-3"), Some(-3));
        assert_eq!(parse_integer("r5"), None);
        assert_eq!(parse_integer(""), None);
    }

    #[test]
    fn integer_text_takes_at_most_one_leading_sign() {
        for text in ["--5", "-+5", "+-5", "0x-5", "0x+5", "-0x-5"] {
            assert_eq!(parse_integer(text), None, "{text}");
        }
        assert_eq!(parse_integer("-0x10"), Some(-16));
    }
}
