//! plugwire - plugin discovery and contract binding

use std::process::ExitCode;

fn main() -> ExitCode {
    if let Err(e) = plugwire::cli::run() {
        eprintln!("Error: {:#}", e);
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}
