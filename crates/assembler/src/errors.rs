//! Structured error and warning reporting for assembler phases.
//!
//! Every diagnostic carries a [`SourceLocation`] naming the source file and
//! the 1-based program record, when known, and formats for stderr as:
//!
//! ```text
//! program.yaml: record 3: error: UnknownOperation: JUMP
//! ```

use std::fmt;

use crate::encoder::EncodeError;
use crate::source::SourceError;

/// Where a diagnostic originated.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SourceLocation {
    /// Source file path, when assembling from a file.
    pub file: Option<String>,
    /// 1-based position of the record in the program list.
    pub record: Option<usize>,
}

impl SourceLocation {
    /// Location of one record, without a file.
    #[must_use]
    pub const fn record(record: usize) -> Self {
        Self {
            file: None,
            record: Some(record),
        }
    }

    /// Returns `true` when neither file nor record is known.
    #[must_use]
    pub const fn is_unknown(&self) -> bool {
        self.file.is_none() && self.record.is_none()
    }
}

impl fmt::Display for SourceLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (&self.file, self.record) {
            (Some(file), Some(record)) => write!(f, "{file}: record {record}"),
            (Some(file), None) => write!(f, "{file}"),
            (None, Some(record)) => write!(f, "record {record}"),
            (None, None) => Ok(()),
        }
    }
}

/// Fatal assembly error. No binary is produced when one is returned.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssembleError {
    /// Kind of error.
    pub kind: AssembleErrorKind,
    /// Source location.
    pub location: SourceLocation,
}

impl AssembleError {
    /// Creates an error with an unknown location.
    #[must_use]
    pub fn new(kind: AssembleErrorKind) -> Self {
        Self {
            kind,
            location: SourceLocation::default(),
        }
    }

    /// Attaches the source file path.
    #[must_use]
    pub fn with_file(mut self, file: impl Into<String>) -> Self {
        self.location.file = Some(file.into());
        self
    }

    /// Formats the error for stderr output.
    #[must_use]
    pub fn format_for_stderr(&self) -> String {
        if self.location.is_unknown() {
            format!("error: {}", self.kind)
        } else {
            format!("{}: error: {}", self.location, self.kind)
        }
    }
}

impl fmt::Display for AssembleError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.location.is_unknown() {
            write!(f, "{}", self.kind)
        } else {
            write!(f, "{}: {}", self.location, self.kind)
        }
    }
}

impl std::error::Error for AssembleError {}

impl From<SourceError> for AssembleError {
    fn from(e: SourceError) -> Self {
        Self::new(AssembleErrorKind::Source(e))
    }
}

impl From<EncodeError> for AssembleError {
    fn from(e: EncodeError) -> Self {
        Self {
            location: SourceLocation::record(e.record),
            kind: AssembleErrorKind::Encode(e),
        }
    }
}

/// Classification of assembly errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AssembleErrorKind {
    /// The program document could not be read into records.
    Source(SourceError),
    /// A record could not be resolved to an instruction.
    Encode(EncodeError),
    /// I/O error reading the source file.
    Io(String),
}

impl fmt::Display for AssembleErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Source(e) => write!(f, "{e}"),
            Self::Encode(e) => write!(f, "{e}"),
            Self::Io(msg) => write!(f, "I/O error: {msg}"),
        }
    }
}

/// Non-fatal assembly diagnostic; the binary is still produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssembleWarning {
    /// Kind of warning.
    pub kind: AssembleWarningKind,
    /// Source location.
    pub location: SourceLocation,
}

/// Classification of assembly warnings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AssembleWarningKind {
    /// A field value lost bits when masked to its encoded width.
    FieldTruncated {
        /// Operation name as written in the source.
        op: String,
        /// Field name.
        field: &'static str,
        /// Value from the source.
        value: i64,
        /// Value actually encoded.
        kept: u32,
    },
}

impl fmt::Display for AssembleWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if !self.location.is_unknown() {
            write!(f, "{}: ", self.location)?;
        }
        match &self.kind {
            AssembleWarningKind::FieldTruncated {
                op,
                field,
                value,
                kept,
            } => write!(
                f,
                "FieldTruncated: {op}.{field} = {value} does not fit its field, encoded as {kept}"
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::encoder::EncodeErrorKind;

    #[test]
    fn location_formats_file_and_record() {
        let loc = SourceLocation {
            file: Some("prog.yaml".to_string()),
            record: Some(3),
        };
        assert_eq!(loc.to_string(), "prog.yaml: record 3");
        assert_eq!(SourceLocation::record(2).to_string(), "record 2");
        assert!(SourceLocation::default().is_unknown());
    }

    #[test]
    fn encode_error_carries_record_into_location() {
        let err = AssembleError::from(EncodeError {
            kind: EncodeErrorKind::UnknownOperation("JUMP".to_string()),
            record: 3,
        })
        .with_file("prog.yaml");

        assert_eq!(
            err.format_for_stderr(),
            "prog.yaml: record 3: error: UnknownOperation: JUMP"
        );
    }

    #[test]
    fn error_without_location_has_plain_prefix() {
        let err = AssembleError::new(AssembleErrorKind::Io("denied".to_string()));
        assert_eq!(err.format_for_stderr(), "error: I/O error: denied");
    }

    #[test]
    fn warning_names_field_and_both_values() {
        let warning = AssembleWarning {
            kind: AssembleWarningKind::FieldTruncated {
                op: "LOAD".to_string(),
                field: "dst",
                value: 9,
                kept: 1,
            },
            location: SourceLocation::record(1),
        };
        assert_eq!(
            warning.to_string(),
            "record 1: FieldTruncated: LOAD.dst = 9 does not fit its field, encoded as 1"
        );
    }
}
