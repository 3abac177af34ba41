//! `rvm-asm`: assemble a textual program into its byte-stream encoding.

use std::fs;
use std::io::{self, Read, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use register_vm::assemble;

/// Assemble register-vm textual assembly into its byte-stream encoding.
#[derive(Parser)]
struct Args {
    /// Input assembly file; reads stdin when omitted.
    input: Option<PathBuf>,
    /// Output file for the byte stream; writes stdout when omitted.
    #[arg(short, long)]
    output: Option<PathBuf>,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt::init();
    let args = Args::parse();

    let src = match &args.input {
        Some(path) => match fs::read_to_string(path) {
            Ok(s) => s,
            Err(e) => {
                eprintln!("error: reading {}: {e}", path.display());
                return ExitCode::FAILURE;
            }
        },
        None => {
            let mut buf = String::new();
            if let Err(e) = io::stdin().read_to_string(&mut buf) {
                eprintln!("error: reading stdin: {e}");
                return ExitCode::FAILURE;
            }
            buf
        }
    };

    let bytes = match assemble(&src) {
        Ok(bytes) => bytes,
        Err(e) => {
            eprintln!("error: {e}");
            return ExitCode::FAILURE;
        }
    };

    let write_result = match &args.output {
        Some(path) => fs::write(path, &bytes),
        None => io::stdout().write_all(&bytes),
    };
    if let Err(e) = write_result {
        eprintln!("error: writing output: {e}");
        return ExitCode::FAILURE;
    }

    eprintln!("{} bytes written", bytes.len());
    ExitCode::SUCCESS
}
