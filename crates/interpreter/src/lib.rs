//! Host-side support for running UVM programs: dump rendering and tracing.

/// State dump rendering and file output.
pub mod dump_writer;
/// Trace sinks for the command-line runner.
pub mod trace;

pub use dump_writer::{render_json, render_xml, write_dump, DumpFormat, DumpWriteError};
pub use trace::StderrTrace;

#[cfg(test)]
use assembler as _;
#[cfg(test)]
use tempfile as _;
