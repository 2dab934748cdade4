//! # Seqren Architecture
//!
//! Seqren is a **UI-agnostic batch renaming library**. It renames a selection of
//! files to `base + separator + number + extension`, resolves name conflicts,
//! and keeps a history so that any session can be undone. The bundled binary
//! is one client of the library, not the application itself.
//!
//! ## Layers
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  CLI Layer (cli/, wired by main.rs)                         │
//! │  - Parses arguments, confirms, renders plans and results    │
//! │  - The ONLY place that knows about stdout/stderr/exit codes │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  API Layer (api.rs)                                         │
//! │  - Thin facade over commands, returns CmdResult             │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Command Layer (commands/*.rs)                              │
//! │  - Preview, rename, undo, history, origin, storage, config  │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Engine                                                     │
//! │  validate → plan → execute (worker thread) → history        │
//! │  undo = history + execute                                   │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Seams                                                      │
//! │  - FileSystem: OsFileSystem, MemoryFileSystem               │
//! │  - HistoryStore: JsonHistoryStore, InMemoryHistoryStore     │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Key Principle: No I/O Assumptions in Core
//!
//! From `api.rs` inward, code takes Rust values and returns Rust values. It
//! never prints and never exits. Progress is handed to the caller as
//! [`execute::ProgressEvent`]s; per-file problems are reported per entry and
//! never as an `Err`.
//!
//! ## Testing Strategy
//!
//! 1. **Engine and commands**: unit tests against `MemoryFileSystem` and
//!    `InMemoryHistoryStore`, where locked and protected files can be faked.
//! 2. **JSON history and OS filesystem**: `tempfile` directories.
//! 3. **Binary**: `assert_cmd` tests in `tests/`, with `SEQREN_HOME` pointing at
//!    a temporary directory.
//!
//! ## Module Overview
//!
//! - [`api`]: The API facade
//! - [`commands`]: One module per operation
//! - [`validate`]: Name rules
//! - [`plan`]: Sorting, numbering and conflict resolution
//! - [`execute`]: Applies a plan, classifies failures, streams progress
//! - [`history`]: Session log and lineage
//! - [`undo`]: Reverting a session
//! - [`fs`]: Filesystem seam
//! - [`settings`]: Persisted settings
//! - [`model`]: Core data types
//! - [`logging`]: tracing subscriber setup for clients
//! - [`error`]: Error types

pub mod api;
pub mod commands;
pub mod error;
pub mod execute;
pub mod fs;
pub mod history;
pub mod logging;
pub mod model;
pub mod plan;
pub mod settings;
pub mod undo;
pub mod validate;
