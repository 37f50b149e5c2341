//! Status and context value types
//!
//! Both are plain values: they are produced by parsing a record or built
//! directly when writing items out, and are never mutated afterwards.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A status drawn from the configured list for an item type
///
/// Equality compares both the display string and the active flag, so
/// `ACTIVE/true` and `ACTIVE/false` are different statuses.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Status {
    /// Text shown for the status and stored in files (e.g. `NEXT`)
    pub display: String,

    /// Whether an item in this status still needs attention
    pub is_active: bool,
}

impl Status {
    pub fn new(display: impl Into<String>, is_active: bool) -> Self {
        Self {
            display: display.into(),
            is_active,
        }
    }

    /// Creates an active status
    pub fn active(display: impl Into<String>) -> Self {
        Self::new(display, true)
    }

    /// Creates an inactive (finished) status
    pub fn inactive(display: impl Into<String>) -> Self {
        Self::new(display, false)
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display)
    }
}

/// A GTD context (a place, tool or person an action needs)
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Context {
    pub name: String,
}

impl Context {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

impl fmt::Display for Context {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}
