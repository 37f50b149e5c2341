//! # Storage Layer
//!
//! Raw record stores for the two supported file formats, plus user settings.
//!
//! ## Storage Formats
//!
//! | Format | Record | Id key | Title |
//! |--------|--------|--------|-------|
//! | Org | Headline + property drawer | `:ID:` | headline text (`ITEM`) |
//! | JSONL | One JSON object per line | `"id"` | `"title"` |
//!
//! Stores know nothing about GTD semantics: they hand out [`RawRecord`]s and
//! upsert [`RawFields`] by id, leaving every other part of the file as it was.
//!
//! ## Concurrency Safety
//!
//! - [`JsonlStore`] reads under a shared `fs2` lock
//! - All writes are atomic (temp file + exclusive lock + rename)
//!
//! ## Key Types
//!
//! - [`Format`] - Selects a store and its wire keys
//! - [`RecordStore`] - Read/upsert interface both stores implement
//! - [`Settings`] - Command-line defaults from `config.toml`

mod atomic;
mod jsonl;
mod org;
mod record;
mod settings;

pub use jsonl::JsonlStore;
pub use org::OrgStore;
pub use record::{Format, RawFields, RawRecord, RawValue, RecordStore};
pub use settings::{Settings, SettingsError};
