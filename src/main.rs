//! sim8086 - an 8086/8088 instruction-level disassembler and simulator.
//!
//! Minimal entry point: reads a flat binary file and feeds it through the
//! decode/execute driver once. No argument-parsing dependency is pulled in
//! for four boolean/string flags; the loop over `std::env::args()` mirrors
//! this lineage's own hand-rolled CLI parsing.

use std::process::ExitCode;

use sim8086::cpu::SimulatorState;
use sim8086::driver::{self, RunConfig};

fn print_usage(program: &str) {
    eprintln!("Usage: {program} <path> [--exec] [--no-color] [--clocks]");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  --exec       Execute decoded instructions against a simulated CPU");
    eprintln!("  --no-color   Disable ANSI color decoration on the disassembly");
    eprintln!("  --clocks     Append a clock-cycle breakdown to each line");
}

fn main() -> ExitCode {
    let args: Vec<String> = std::env::args().collect();

    let mut path: Option<String> = None;
    let mut config = RunConfig {
        execute: false,
        decorate: true,
        report_clocks: false,
    };

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--exec" => config.execute = true,
            "--no-color" => config.decorate = false,
            "--clocks" => config.report_clocks = true,
            "--help" | "-h" => {
                print_usage(&args[0]);
                return ExitCode::SUCCESS;
            }
            arg if arg.starts_with('-') => {
                eprintln!("Error: unknown option '{arg}'");
                print_usage(&args[0]);
                return ExitCode::FAILURE;
            }
            arg => path = Some(arg.to_string()),
        }
        i += 1;
    }

    let Some(path) = path else {
        print_usage(&args[0]);
        return ExitCode::FAILURE;
    };

    let bytes = match std::fs::read(&path) {
        Ok(bytes) => bytes,
        Err(e) => {
            eprintln!("Failed to read '{path}': {e}");
            return ExitCode::FAILURE;
        }
    };

    let mut state = SimulatorState::new();
    let stdout = std::io::stdout();
    let mut out = stdout.lock();

    match driver::run(&bytes, &mut state, &config, &mut out) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{e}");
            ExitCode::FAILURE
        }
    }
}
