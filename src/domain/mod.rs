//! Domain models for GTD records
//!
//! Contains the typed item model and its configuration, without any I/O concerns.

mod config;
mod id;
mod item;
mod status;
mod tag_pattern;

pub use config::{get_statuses_for_type, Configuration};
pub use id::{generate_id, is_valid_id};
pub use item::{
    get_status, is_active, Field, Item, ItemKind, NextAction, Project, WaitingFor,
    ABSTRACT_TYPE_NAME,
};
pub use status::{Context, Status};
pub use tag_pattern::{TagPattern, DEFAULT_CONTEXT_TAG_REGEX};
