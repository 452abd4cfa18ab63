//! Renders a [`StateDump`] to XML or JSON and writes it to disk.
//!
//! The XML form is the canonical dump:
//!
//! ```xml
//! <?xml version="1.0" encoding="utf-8"?>
//! <uvm_dump>
//!   <memory start="0" end="1">
//!     <cell addr="0">94</cell>
//!     <cell addr="1">217</cell>
//!   </memory>
//!   <registers>
//!     <reg index="0">0</reg>
//!     ...
//!   </registers>
//! </uvm_dump>
//! ```

use std::fmt::Display;
use std::fs;
use std::path::Path;

use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;
use thiserror::Error;
use uvm_core::StateDump;

/// Output syntax for a dump file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DumpFormat {
    /// `<uvm_dump>` document.
    Xml,
    /// Serialized [`StateDump`] object.
    Json,
}

impl DumpFormat {
    /// Picks JSON for a `.json` extension and XML otherwise.
    #[must_use]
    pub fn from_path(path: &Path) -> Self {
        if path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"))
        {
            Self::Json
        } else {
            Self::Xml
        }
    }

    /// Renders `dump` in this format.
    ///
    /// # Errors
    ///
    /// Returns the renderer's error.
    pub fn render(self, dump: &StateDump) -> Result<String, DumpWriteError> {
        match self {
            Self::Xml => render_xml(dump),
            Self::Json => render_json(dump),
        }
    }
}

/// Failure to render or persist a dump.
#[derive(Debug, Error)]
pub enum DumpWriteError {
    /// XML serialization failed.
    #[error("failed to render XML dump: {0}")]
    Xml(String),
    /// JSON serialization failed.
    #[error("failed to render JSON dump: {0}")]
    Json(#[from] serde_json::Error),
    /// The dump file could not be written.
    #[error("failed to write dump to {path}: {source}")]
    Io {
        /// Destination path.
        path: String,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },
}

fn xml_error(e: impl Display) -> DumpWriteError {
    DumpWriteError::Xml(e.to_string())
}

/// Renders `dump` as a `<uvm_dump>` document with an XML declaration.
///
/// # Errors
///
/// Returns [`DumpWriteError::Xml`] if the writer fails.
pub fn render_xml(dump: &StateDump) -> Result<String, DumpWriteError> {
    let mut writer = Writer::new_with_indent(Vec::new(), b' ', 2);

    writer
        .write_event(Event::Decl(BytesDecl::new("1.0", Some("utf-8"), None)))
        .map_err(xml_error)?;
    writer
        .write_event(Event::Start(BytesStart::new("uvm_dump")))
        .map_err(xml_error)?;

    let start = dump.start.to_string();
    let end = dump.end.to_string();
    writer
        .write_event(Event::Start(
            BytesStart::new("memory")
                .with_attributes([("start", start.as_str()), ("end", end.as_str())]),
        ))
        .map_err(xml_error)?;
    for cell in &dump.cells {
        let addr = cell.addr.to_string();
        writer
            .create_element("cell")
            .with_attribute(("addr", addr.as_str()))
            .write_text_content(BytesText::new(&cell.value.to_string()))
            .map_err(xml_error)?;
    }
    writer
        .write_event(Event::End(BytesEnd::new("memory")))
        .map_err(xml_error)?;

    writer
        .write_event(Event::Start(BytesStart::new("registers")))
        .map_err(xml_error)?;
    for reg in &dump.registers {
        let index = reg.index.to_string();
        writer
            .create_element("reg")
            .with_attribute(("index", index.as_str()))
            .write_text_content(BytesText::new(&reg.value.to_string()))
            .map_err(xml_error)?;
    }
    writer
        .write_event(Event::End(BytesEnd::new("registers")))
        .map_err(xml_error)?;

    writer
        .write_event(Event::End(BytesEnd::new("uvm_dump")))
        .map_err(xml_error)?;

    let mut xml = String::from_utf8(writer.into_inner()).map_err(xml_error)?;
    xml.push('\n');
    Ok(xml)
}

/// Renders `dump` as pretty-printed JSON.
///
/// # Errors
///
/// Returns [`DumpWriteError::Json`] if serialization fails.
pub fn render_json(dump: &StateDump) -> Result<String, DumpWriteError> {
    let mut json = serde_json::to_string_pretty(dump)?;
    json.push('\n');
    Ok(json)
}

/// Renders `dump` in the format implied by `path` and writes it there.
///
/// Nothing is written if rendering fails.
///
/// # Errors
///
/// Returns a rendering error or [`DumpWriteError::Io`].
pub fn write_dump(path: &Path, dump: &StateDump) -> Result<DumpFormat, DumpWriteError> {
    let format = DumpFormat::from_path(path);
    let rendered = format.render(dump)?;
    fs::write(path, rendered).map_err(|source| DumpWriteError::Io {
        path: path.display().to_string(),
        source,
    })?;
    Ok(format)
}

#[cfg(test)]
mod tests {
    use super::*;
    use uvm_core::{capture_dump, Register, RegisterFile};

    fn sample_dump() -> StateDump {
        let memory = [0x5E, 0xD9, 0x05, 0x00];
        let mut registers = RegisterFile::default();
        registers.set(Register::R5, 748);
        capture_dump(&memory, &registers, 1, 2).expect("in range")
    }

    #[test]
    fn xml_lists_cells_then_registers_in_order() {
        let xml = render_xml(&sample_dump()).expect("renders");

        assert!(xml.starts_with("<?xml version=\"1.0\" encoding=\"utf-8\"?>"));
        assert!(xml.contains("<memory start=\"1\" end=\"2\">"));

        let first = xml.find("<cell addr=\"1\">217</cell>").expect("cell 1");
        let second = xml.find("<cell addr=\"2\">5</cell>").expect("cell 2");
        let registers = xml.find("<registers>").expect("registers");
        assert!(first < second && second < registers);

        assert!(xml.contains("<reg index=\"5\">748</reg>"));
        assert_eq!(xml.matches("<reg ").count(), 8);
        assert_eq!(xml.matches("<cell ").count(), 2);
        assert!(xml.trim_end().ends_with("</uvm_dump>"));
    }

    #[test]
    fn json_round_trips_the_dump() {
        let dump = sample_dump();
        let json = render_json(&dump).expect("renders");
        let parsed: StateDump = serde_json::from_str(&json).expect("valid json");
        assert_eq!(parsed, dump);
    }

    #[test]
    fn format_follows_extension() {
        assert_eq!(DumpFormat::from_path(Path::new("d.json")), DumpFormat::Json);
        assert_eq!(DumpFormat::from_path(Path::new("d.xml")), DumpFormat::Xml);
        assert_eq!(DumpFormat::from_path(Path::new("dump")), DumpFormat::Xml);
    }

    #[test]
    fn write_dump_reports_unwritable_path() {
        let err = write_dump(Path::new("/nonexistent-dir/dump.xml"), &sample_dump())
            .expect_err("directory does not exist");
        assert!(matches!(err, DumpWriteError::Io { .. }));
    }
}
