//! Commands that write items (set-status, add)

use std::path::Path;

use anyhow::{Context as _, Result};
use chrono::Utc;

use super::app::Inputs;
use super::output::Output;
use super::query::{item_json, load};
use crate::db::write_item_to_file;
use crate::domain::{generate_id, is_valid_id, Context, Item, ItemKind, NextAction, Project, WaitingFor};
use crate::error::GtdError;

/// Arguments of `gtd add`
pub struct NewItem<'a> {
    pub kind: ItemKind,
    pub title: &'a str,
    pub status: &'a str,
    pub projects: &'a [String],
    pub contexts: &'a [String],
}

/// Change an item's status and write it back to its source file
pub fn set_status(output: &Output, inputs: &Inputs, id: &str, status: &str) -> Result<()> {
    let mut db = load(output, inputs)?;

    let mut item = db
        .get(id)
        .cloned()
        .ok_or_else(|| anyhow::anyhow!("Item not found: {}", id))?;
    let new_status = db
        .config()
        .find_status(item.kind(), status)
        .cloned()
        .ok_or_else(|| GtdError::UnknownStatus {
            kind: item.kind(),
            status: status.to_string(),
        })?;

    let previous = item.status().display.clone();
    item.set_status(new_status);
    output.verbose_ctx("set-status", &format!("{}: {} -> {}", id, previous, status));

    db.write_back(inputs.format, item)
        .with_context(|| format!("Failed to update item {}", id))?;

    let source = db
        .source_of(id)
        .map(|p| p.display().to_string())
        .unwrap_or_default();
    if output.is_json() {
        if let Some(item) = db.get(id) {
            output.data(&item_json(&db, item));
        }
    } else {
        output.success(&format!("{}: {} -> {} ({})", id, previous, status, source));
    }

    Ok(())
}

/// Create a new item and append it to `file`
pub fn add(output: &Output, inputs: &Inputs, file: &Path, new: NewItem<'_>) -> Result<()> {
    let db = load(output, inputs)?;
    let config = db.config();

    let status = config
        .find_status(new.kind, new.status)
        .cloned()
        .ok_or_else(|| GtdError::UnknownStatus {
            kind: new.kind,
            status: new.status.to_string(),
        })?;

    if new.kind == ItemKind::Project && (!new.projects.is_empty() || !new.contexts.is_empty()) {
        anyhow::bail!("Projects take no --project or --context");
    }
    if let Some(bad) = new.projects.iter().find(|p| !is_valid_id(p)) {
        anyhow::bail!("Invalid project ID: '{}'", bad);
    }

    let id = generate_id(new.kind, new.title, Utc::now());
    if db.get(&id).is_some() {
        anyhow::bail!("Generated ID {} is already taken; try again", id);
    }
    for project in new.projects {
        if db.get(project).map(Item::kind) != Some(ItemKind::Project) {
            tracing::warn!(project = %project, "superior project not found in the input files");
        }
    }

    let item: Item = match new.kind {
        ItemKind::Project => Project::new(&id, new.title, status).into(),
        ItemKind::NextAction => NextAction {
            id: id.clone(),
            title: new.title.to_string(),
            status,
            superior_projects: new.projects.to_vec(),
            contexts: new.contexts.iter().map(Context::new).collect(),
        }
        .into(),
        ItemKind::WaitingFor => WaitingFor {
            id: id.clone(),
            title: new.title.to_string(),
            status,
            superior_projects: new.projects.to_vec(),
            contexts: new.contexts.iter().map(Context::new).collect(),
        }
        .into(),
    };

    write_item_to_file(inputs.format, file, &item, config)
        .with_context(|| format!("Failed to write item to {}", file.display()))?;

    if output.is_json() {
        let mut value = serde_json::to_value(&item)?;
        if let Some(map) = value.as_object_mut() {
            map.insert("source".to_string(), file.display().to_string().into());
        }
        output.data(&value);
    } else {
        output.success(&format!("Created {}: {} - {}", item.type_name(), id, new.title));
    }

    Ok(())
}
