//! Builds a [`Database`] from a set of files

use std::path::{Path, PathBuf};

use crate::codec::{is_config_record, type_tag};
use crate::domain::{Configuration, Item, ItemKind};
use crate::error::{GtdError, Result};
use crate::storage::{Format, RawRecord};

use super::Database;

/// Reads every file with the format's store and builds a validated database
///
/// Exactly one configuration governs the result: the last config record
/// found, in file order then record order. Records without a type tag are
/// not GTD items and are skipped. The first invalid record aborts the build.
pub fn build_db_from_files<P: AsRef<Path>>(format: Format, paths: &[P]) -> Result<Database> {
    let store = format.store();
    let mut pooled: Vec<(PathBuf, RawRecord)> = Vec::new();

    for path in paths {
        let path = path.as_ref();
        if !path.exists() {
            return Err(GtdError::NoSuchFile(path.to_path_buf()));
        }

        let records = store.read_records(path)?;
        tracing::debug!(path = %path.display(), %format, records = records.len(), "loaded records");
        pooled.extend(records.into_iter().map(|r| (path.to_path_buf(), r)));
    }

    let mut config: Option<(Configuration, String)> = None;
    let mut items: Vec<(&Path, &RawRecord)> = Vec::new();

    for (path, record) in &pooled {
        if is_config_record(format, record)? {
            let parsed = Configuration::from_record(format, record)?;
            let location = format!("{}:{}", path.display(), record.line);
            if let Some((_, previous)) = &config {
                tracing::warn!(
                    previous = %previous,
                    current = %location,
                    "multiple config records; using the last one"
                );
            }
            config = Some((parsed, location));
        } else {
            items.push((path.as_path(), record));
        }
    }

    let (config, _) = config.ok_or(GtdError::MissingConfig)?;
    let mut db = Database::new(config);
    let mut skipped = 0usize;

    for (path, record) in items {
        let Some(tag) = type_tag(format, record)? else {
            tracing::debug!(path = %path.display(), line = record.line, "skipping record without type");
            skipped += 1;
            continue;
        };

        let kind = ItemKind::from_type_name(&tag)?;
        let item = Item::from_record(format, kind, db.config(), record)?;
        let id = item.id().to_string();

        if let Some(previous) = db.insert(item, path) {
            tracing::warn!(
                id = %id,
                previous_type = previous.type_name(),
                path = %path.display(),
                line = record.line,
                "duplicate item id; using the last one"
            );
        }
    }

    tracing::info!(
        files = paths.len(),
        items = db.len(),
        skipped,
        "built database"
    );
    Ok(db)
}
