//! Writes a single item back into a file

use std::path::Path;

use crate::domain::{Configuration, Item};
use crate::error::Result;
use crate::storage::Format;

/// Upserts `item` into the file at `path`
///
/// Only the item's own record changes. The status is validated against
/// `config` before anything is written.
pub fn write_item_to_file(
    format: Format,
    path: &Path,
    item: &Item,
    config: &Configuration,
) -> Result<()> {
    let fields = item.to_fields(format, config)?;
    format.store().write_record(path, item.id(), &fields)?;

    tracing::debug!(path = %path.display(), id = item.id(), kind = %item.kind(), "wrote item");
    Ok(())
}
