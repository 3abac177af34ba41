//! `rvm-run`: assemble, load, and run a program, printing its terminal value.

use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use register_vm::{assemble, load, Vm, DEFAULT_REGISTER_COUNT};
use std::rc::Rc;

/// Assemble, load, and run a register-vm program.
#[derive(Parser)]
struct Args {
    /// Assembly source file to run.
    input: PathBuf,
    /// Register file size.
    #[arg(long, default_value_t = DEFAULT_REGISTER_COUNT)]
    registers: usize,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt::init();
    let args = Args::parse();

    let src = match fs::read_to_string(&args.input) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("error: reading {}: {e}", args.input.display());
            return ExitCode::FAILURE;
        }
    };

    let bytes = match assemble(&src) {
        Ok(bytes) => bytes,
        Err(e) => {
            eprintln!("error: {e}");
            return ExitCode::FAILURE;
        }
    };

    let prog = match load(&bytes) {
        Ok(prog) => prog,
        Err(e) => {
            eprintln!("error: {e}");
            return ExitCode::FAILURE;
        }
    };

    let mut vm = Vm::new(args.registers);
    vm.load(Rc::from(prog));

    match vm.run() {
        Ok(val) => {
            println!("{val:?}");
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}
