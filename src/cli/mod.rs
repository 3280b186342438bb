//! # Command-Line Interface
//!
//! Operator-facing commands over the discovery pipeline.
//!
//! | Command | Stages | Shows |
//! |---------|--------|-------|
//! | `scan <dir>` | discover | per-module load status, instantiable types |
//! | `bind <dir>` | discover, bind | contract table, conflicts |
//! | `resolve <dir> <contract>` | discover, bind, register, resolve | chosen implementation |
//!
//! ## Output Formats
//!
//! All commands support `--format`:
//! - `text` (default) - Human-readable output
//! - `json` - Machine-parseable JSON on stdout
//!
//! Logs go to stderr. `--verbose` raises the level to `debug`; `RUST_LOG`
//! overrides both.
//!
//! ## Entry Point
//!
//! Call [`run()`] to parse arguments and execute the appropriate command.

mod app;
mod bind_cmd;
mod output;
mod resolve;
mod scan;

pub use app::{run, Cli, Commands};
pub use output::{Output, OutputFormat};
