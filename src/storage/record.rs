//! Format-neutral raw records
//!
//! A raw record is one entry of a file as a mapping from field name to an
//! unvalidated value. The Org store only produces strings; the JSONL store
//! produces whatever JSON the line holds.

use std::path::Path;

use serde::{Deserialize, Serialize};

use super::{JsonlStore, OrgStore};
use crate::error::Result;

/// An unvalidated field value
pub type RawValue = serde_json::Value;

/// Field name to raw value, in file order
pub type RawFields = serde_json::Map<String, RawValue>;

/// One record read from a file
#[derive(Debug, Clone, PartialEq)]
pub struct RawRecord {
    pub fields: RawFields,

    /// 1-based line where the record starts
    pub line: usize,
}

impl RawRecord {
    pub fn new(fields: RawFields, line: usize) -> Self {
        Self { fields, line }
    }

    /// Gets a field by its wire key
    pub fn get(&self, key: &str) -> Option<&RawValue> {
        self.fields.get(key)
    }
}

/// Reads and upserts raw records in one file format
///
/// Implementations hold a file open only for the duration of one call.
pub trait RecordStore {
    /// Reads every record in the file, in file order
    fn read_records(&self, path: &Path) -> Result<Vec<RawRecord>>;

    /// Updates the record with this id, or appends a new one
    ///
    /// Fields set to `null` are removed from the record. Everything else in
    /// the file is left as it was.
    fn write_record(&self, path: &Path, id: &str, fields: &RawFields) -> Result<()>;
}

/// Supported file formats
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum Format {
    /// Org-mode headlines with property drawers
    Org,
    /// JSON Lines, one object per record
    Jsonl,
}

impl Format {
    /// Every supported format
    pub const ALL: [Format; 2] = [Format::Org, Format::Jsonl];

    /// Returns the file extension for this format
    pub fn extension(&self) -> &'static str {
        match self {
            Format::Org => "org",
            Format::Jsonl => "jsonl",
        }
    }

    /// Guesses the format from a file extension
    pub fn from_path(path: &Path) -> Option<Format> {
        let ext = path.extension()?.to_str()?;
        Self::ALL.into_iter().find(|f| f.extension() == ext)
    }

    /// Returns the record store for this format
    pub fn store(&self) -> &'static dyn RecordStore {
        match self {
            Format::Org => &OrgStore,
            Format::Jsonl => &JsonlStore,
        }
    }
}

impl std::fmt::Display for Format {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.extension())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_from_extension() {
        assert_eq!(Format::from_path(Path::new("gtd.org")), Some(Format::Org));
        assert_eq!(Format::from_path(Path::new("a/b/tasks.jsonl")), Some(Format::Jsonl));
        assert_eq!(Format::from_path(Path::new("notes.md")), None);
        assert_eq!(Format::from_path(Path::new("README")), None);
    }

    #[test]
    fn record_get() {
        let mut fields = RawFields::new();
        fields.insert("ID".to_string(), RawValue::from("p-1"));
        let record = RawRecord::new(fields, 3);

        assert_eq!(record.get("ID"), Some(&RawValue::from("p-1")));
        assert_eq!(record.get("TYPE"), None);
    }
}
