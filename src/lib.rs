//! gtd-records - GTD items in Org or JSONL files
//!
//! Reads projects, next actions and waiting-for items from either format,
//! validates them against the configuration record found in the files, and
//! builds a typed in-memory [`Database`]. Single items can be written back
//! into their source file without disturbing the rest of it.

pub mod cli;
pub mod codec;
pub mod db;
pub mod domain;
pub mod error;
pub mod storage;

pub use db::{build_db_from_files, write_item_to_file, Database};
pub use domain::{Configuration, Context, Item, ItemKind, NextAction, Project, Status, WaitingFor};
pub use error::{GtdError, Result};
pub use storage::Format;
