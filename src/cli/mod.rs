//! # Command-Line Interface
//!
//! The `gtd` command over the library.
//!
//! ## Commands
//!
//! | Command | Purpose |
//! |---------|---------|
//! | `check` | Build the database and summarize it |
//! | `list` | List items, filtered by `--kind` / `--active` |
//! | `show` | Show one item and, for projects, its items |
//! | `set-status` | Change a status and write it back to the source file |
//! | `add` | Append a new item to a file |
//!
//! ## Inputs
//!
//! Files are given as arguments, or taken from the `files` list in the
//! settings file. `--format` picks the record format; without it the format
//! follows the file extensions (`.org`, `.jsonl`).
//!
//! ## Output Formats
//!
//! All commands support the `--output` flag:
//! - `text` (default) - Human-readable output
//! - `json` - Machine-parseable JSON
//!
//! ## Verbose Mode
//!
//! Use `--verbose` (or `-v`) for debug output and debug-level logs:
//! ```bash
//! gtd --verbose check gtd.org
//! ```
//!
//! ## Entry Point
//!
//! Call [`run()`] to parse arguments and execute the appropriate command.

mod app;
mod item;
mod output;
mod query;

pub use app::{run, Cli, Commands};
pub use output::{Output, OutputFormat};
