//! # Seqren CLI
//!
//! The binary is intentionally thin: the CLI lives in `cli/`, while this file
//! only invokes `cli::run()` and handles process termination.
//!
//! - `cli/setup.rs`: clap definitions
//! - `cli/commands.rs`: context wiring, confirmation, dispatch
//! - `cli/print.rs`: terminal rendering of plans, results and history
//!
//! Everything below the CLI is UI agnostic; see the library docs.

mod cli;

fn main() {
    match cli::run() {
        Ok(code) => std::process::exit(code),
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    }
}
