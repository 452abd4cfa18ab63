//! CLI entry point for the UVM assembler binary.

use std::env;
use std::ffi::OsString;
use std::fs;
use std::path::PathBuf;

use assembler::{assemble_file, AssembleResult};
use serde as _;
use serde_json as _;
use serde_yaml as _;
#[cfg(test)]
use tempfile as _;
use uvm_core as _;

const USAGE_TEXT: &str = "\
Usage: uvm-asm <source> <output> [options]

Arguments:
  <source>  Program document (.yaml/.yml, or .json)
  <output>  Binary file to write

Options:
  -t, --test     Print (A, B, C) fields and machine code to stderr
  -v, --verbose  Same as --test
  -h, --help     Show this help message

Examples:
  uvm-asm program.yaml program.bin
  uvm-asm program.yaml program.bin --test
";

#[derive(Debug, PartialEq, Eq)]
struct BuildArgs {
    input: PathBuf,
    output: PathBuf,
    listing: bool,
}

#[derive(Debug)]
enum ParseResult {
    Build(BuildArgs),
    Help,
}

fn parse_args(args: impl Iterator<Item = OsString>) -> Result<ParseResult, String> {
    let mut paths: Vec<PathBuf> = Vec::new();
    let mut listing = false;

    for arg in args {
        if arg == "--help" || arg == "-h" {
            return Ok(ParseResult::Help);
        }

        if arg == "--test" || arg == "-t" || arg == "--verbose" || arg == "-v" {
            listing = true;
            continue;
        }

        if arg.to_string_lossy().starts_with('-') {
            return Err(format!("unknown option: {}", arg.to_string_lossy()));
        }

        if paths.len() == 2 {
            return Err(format!(
                "unexpected argument: {}",
                arg.to_string_lossy()
            ));
        }
        paths.push(PathBuf::from(arg));
    }

    let mut paths = paths.into_iter();
    let input = paths
        .next()
        .ok_or_else(|| "missing source path".to_string())?;
    let output = paths
        .next()
        .ok_or_else(|| "missing output path".to_string())?;

    Ok(ParseResult::Build(BuildArgs {
        input,
        output,
        listing,
    }))
}

fn run_build(args: &BuildArgs) -> Result<(), i32> {
    let result = match assemble_file(&args.input) {
        Ok(r) => r,
        Err(e) => {
            eprintln!("{}", e.format_for_stderr());
            return Err(1);
        }
    };

    for warning in &result.warnings {
        eprintln!("warning: {warning}");
    }

    if let Err(e) = fs::write(&args.output, &result.binary) {
        eprintln!("error: failed to write output: {e}");
        return Err(1);
    }

    if args.listing {
        print_listing(&result);
    }

    println!(
        "Assembled {} ({} bytes) -> {}",
        args.input.display(),
        result.binary.len(),
        args.output.display()
    );

    Ok(())
}

fn print_listing(result: &AssembleResult) {
    for entry in &result.listing {
        let (a, b, c) = entry.fields;
        eprintln!(
            "{:04X}: A={a} B={b} C={c} ; {}",
            entry.offset, entry.instruction
        );
    }

    eprintln!("{}", format_machine_code(&result.binary));
}

fn format_machine_code(binary: &[u8]) -> String {
    binary
        .iter()
        .map(|b| format!("0x{b:02X}"))
        .collect::<Vec<_>>()
        .join(", ")
}

fn main() {
    let exit_code = match parse_args(env::args_os().skip(1)) {
        Ok(ParseResult::Help) => {
            println!("{USAGE_TEXT}");
            0
        }
        Ok(ParseResult::Build(args)) => match run_build(&args) {
            Ok(()) => 0,
            Err(code) => code,
        },
        Err(error) => {
            eprintln!("error: {error}");
            eprintln!("{USAGE_TEXT}");
            1
        }
    };

    std::process::exit(exit_code);
}
