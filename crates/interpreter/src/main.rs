//! CLI entry point for the UVM program runner.

use std::env;
use std::ffi::OsString;
use std::fs;
use std::path::PathBuf;

#[cfg(test)]
use assembler as _;
use interpreter::{write_dump, StderrTrace};
use quick_xml as _;
use serde_json as _;
#[cfg(test)]
use tempfile as _;
use thiserror as _;
use uvm_core::{run, MachineState, NullTrace, VmConfig, DEFAULT_MEMORY_SIZE, MAX_MEMORY_SIZE};

const USAGE_TEXT: &str = "\
Usage: uvm-run <program> <dump> <start> <end> [options]

Arguments:
  <program>  Binary program produced by uvm-asm
  <dump>     Dump file to write (.json for JSON, XML otherwise)
  <start>    First memory address to dump
  <end>      Last memory address to dump (inclusive)

Options:
  --trace              Print every executed instruction to stderr
  --memory-size <N>    Unified memory size in bytes (default 65536, max 4294967296)
  -h, --help           Show this help message

Examples:
  uvm-run program.bin dump.xml 0 31
  uvm-run program.bin dump.json 0x400 0x40F --trace
";

#[derive(Debug, PartialEq, Eq)]
struct RunArgs {
    program: PathBuf,
    dump: PathBuf,
    start: usize,
    end: usize,
    trace: bool,
    memory_size: usize,
}

#[derive(Debug)]
enum ParseResult {
    Run(RunArgs),
    Help,
}

#[allow(clippy::while_let_on_iterator)]
fn parse_args(mut args: impl Iterator<Item = OsString>) -> Result<ParseResult, String> {
    let mut positional: Vec<String> = Vec::new();
    let mut trace = false;
    let mut memory_size = DEFAULT_MEMORY_SIZE;

    while let Some(arg) = args.next() {
        if arg == "--help" || arg == "-h" {
            return Ok(ParseResult::Help);
        }

        if arg == "--trace" {
            trace = true;
            continue;
        }

        if arg == "--memory-size" {
            let value = args
                .next()
                .ok_or_else(|| "missing value for --memory-size".to_string())?;
            memory_size = parse_number("memory size", &value.to_string_lossy())?;
            if memory_size > MAX_MEMORY_SIZE {
                return Err(format!(
                    "memory size must be at most {MAX_MEMORY_SIZE} bytes, got {memory_size}"
                ));
            }
            continue;
        }

        let text = arg.to_string_lossy().to_string();
        if text.starts_with("--") || (text.starts_with('-') && text.parse::<i64>().is_err()) {
            return Err(format!("unknown option: {text}"));
        }

        if positional.len() == 4 {
            return Err(format!("unexpected argument: {text}"));
        }
        positional.push(text);
    }

    let [program, dump, start, end] = <[String; 4]>::try_from(positional).map_err(|given| {
        format!(
            "expected <program> <dump> <start> <end>, got {} argument(s)",
            given.len()
        )
    })?;

    let start = parse_number("start address", &start)?;
    let end = parse_number("end address", &end)?;
    if end < start {
        return Err(format!(
            "end address {end} is before start address {start}"
        ));
    }

    Ok(ParseResult::Run(RunArgs {
        program: PathBuf::from(program),
        dump: PathBuf::from(dump),
        start,
        end,
        trace,
        memory_size,
    }))
}

/// Parses a non-negative decimal or `0x` hex integer.
fn parse_number(what: &str, text: &str) -> Result<usize, String> {
    let parsed = text
        .strip_prefix("0x")
        .or_else(|| text.strip_prefix("0X"))
        .map_or_else(|| text.parse::<usize>(), |hex| usize::from_str_radix(hex, 16));

    parsed.map_err(|_| format!("{what} must be a non-negative integer, got `{text}`"))
}

fn run_program_file(args: &RunArgs) -> Result<(), i32> {
    let program = match fs::read(&args.program) {
        Ok(bytes) => bytes,
        Err(e) => {
            eprintln!(
                "error: failed to read program {}: {e}",
                args.program.display()
            );
            return Err(1);
        }
    };

    let config = VmConfig {
        memory_size: args.memory_size,
        tracing_enabled: args.trace,
    };

    let mut state = match MachineState::load(&program, &config) {
        Ok(state) => state,
        Err(fault) => {
            eprintln!("error: {fault}");
            return Err(1);
        }
    };

    let outcome = if config.tracing_enabled {
        run(&mut state, &mut StderrTrace)
    } else {
        run(&mut state, &mut NullTrace)
    };
    let outcome = match outcome {
        Ok(outcome) => outcome,
        Err(fault) => {
            eprintln!("error: {fault}");
            return Err(1);
        }
    };

    let dump = match state.dump(args.start, args.end) {
        Ok(dump) => dump,
        Err(fault) => {
            eprintln!("error: {fault}");
            return Err(1);
        }
    };

    if let Err(e) = write_dump(&args.dump, &dump) {
        eprintln!("error: {e}");
        return Err(1);
    }

    println!(
        "Executed {} instruction(s) from {} ({} bytes); dumped [{}, {}] -> {}",
        outcome.steps,
        args.program.display(),
        program.len(),
        args.start,
        args.end,
        args.dump.display()
    );

    Ok(())
}

fn main() {
    let exit_code = match parse_args(env::args_os().skip(1)) {
        Ok(ParseResult::Help) => {
            println!("{USAGE_TEXT}");
            0
        }
        Ok(ParseResult::Run(args)) => match run_program_file(&args) {
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
