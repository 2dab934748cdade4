//! # CLI Behavior
//!
//! This is **one possible UI client** for seqren, not the application itself.
//! The CLI is the only place that knows about terminal I/O, exit codes and
//! output formatting.
//!
//! ## Preview First
//!
//! `seqren rename` always builds and prints the plan before anything moves,
//! then asks for confirmation. `--yes` skips the question, which is what
//! scripts want. `seqren preview` stops after the plan.
//!
//! Naming flags that are left out fall back to the configuration of the last
//! rename, so `seqren rename *.jpg` repeats the previous scheme on a new batch.
//!
//! ## Exit Codes
//!
//! - `0`: done, nothing failed
//! - `1`: the command itself failed (bad history file location, unknown session, ...)
//! - `2`: the command ran but some entries failed or the plan was invalid
//!
//! ## Module Structure
//!
//! - `commands`: context setup and per-command handlers
//! - `print`: output formatting (plans, problems, sessions, progress)
//! - `setup`: argument parsing via clap

mod commands;
mod print;
pub mod setup;

pub use commands::run;
