//! Read-only commands (check, list, show)

use anyhow::{Context, Result};

use super::app::Inputs;
use super::output::Output;
use crate::db::{build_db_from_files, Database};
use crate::domain::{Item, ItemKind};

/// Builds the database for a command, naming the inputs on failure
pub fn load(output: &Output, inputs: &Inputs) -> Result<Database> {
    let db = build_db_from_files(inputs.format, &inputs.files).with_context(|| {
        let names: Vec<String> = inputs.files.iter().map(|p| p.display().to_string()).collect();
        format!("Failed to load {} files: {}", inputs.format, names.join(", "))
    })?;
    output.verbose(&format!("Loaded {} item(s)", db.len()));
    Ok(db)
}

/// JSON view of an item, with the file it came from
pub fn item_json(db: &Database, item: &Item) -> serde_json::Value {
    let mut value = serde_json::to_value(item).unwrap_or(serde_json::Value::Null);
    if let Some(map) = value.as_object_mut() {
        map.insert("is_active".to_string(), item.is_active().into());
        map.insert(
            "source".to_string(),
            db.source_of(item.id())
                .map(|p| p.display().to_string())
                .into(),
        );
    }
    value
}

fn contexts_text(item: &Item) -> String {
    item.contexts()
        .map(|set| set.iter().map(|c| c.name.as_str()).collect::<Vec<_>>().join(", "))
        .unwrap_or_default()
}

/// Validate the files and print a summary
pub fn check(output: &Output, inputs: &Inputs) -> Result<()> {
    let db = load(output, inputs)?;

    let counts: Vec<(ItemKind, usize)> = ItemKind::ALL
        .into_iter()
        .map(|kind| (kind, db.items_of_kind(kind).count()))
        .collect();
    let active = db.active_items().count();
    let dangling = db.dangling_references();

    if output.is_json() {
        let mut by_kind = serde_json::Map::new();
        for (kind, count) in &counts {
            by_kind.insert(kind.type_name().to_string(), (*count).into());
        }
        output.data(&serde_json::json!({
            "valid": true,
            "items": db.len(),
            "active": active,
            "by_kind": by_kind,
            "dangling_references": dangling
                .iter()
                .map(|(item, project)| serde_json::json!({"item": item, "project": project}))
                .collect::<Vec<_>>(),
        }));
    } else {
        println!("OK: {} item(s), {} active", db.len(), active);
        for (kind, count) in &counts {
            println!("  {:<12} {}", kind.type_name(), count);
        }
        if !dangling.is_empty() {
            println!();
            println!("Unknown superior projects:");
            for (item, project) in &dangling {
                println!("  {} -> {}", item, project);
            }
        }
    }

    Ok(())
}

/// List items, optionally filtered by kind and activity
pub fn list(output: &Output, inputs: &Inputs, kind: Option<ItemKind>, active_only: bool) -> Result<()> {
    let db = load(output, inputs)?;

    let items: Vec<&Item> = db
        .items()
        .filter(|item| kind.map_or(true, |k| item.kind() == k))
        .filter(|item| !active_only || item.is_active())
        .collect();

    if output.is_json() {
        let values: Vec<_> = items.iter().map(|item| item_json(&db, item)).collect();
        output.data(&values);
    } else if items.is_empty() {
        println!("No items");
    } else {
        println!("{:<12} {:<12} {:<10} TITLE", "ID", "TYPE", "STATUS");
        println!("{}", "-".repeat(70));
        for item in items {
            println!(
                "{:<12} {:<12} {:<10} {}",
                item.id(),
                item.type_name(),
                item.status().display,
                item.title()
            );
        }
    }

    Ok(())
}

/// Show one item in detail
pub fn show(output: &Output, inputs: &Inputs, id: &str) -> Result<()> {
    let db = load(output, inputs)?;
    let item = db
        .get(id)
        .ok_or_else(|| anyhow::anyhow!("Item not found: {}", id))?;

    if output.is_json() {
        let mut value = item_json(&db, item);
        if item.kind() == ItemKind::Project {
            let children: Vec<&str> = db.children_of(id).map(Item::id).collect();
            if let Some(map) = value.as_object_mut() {
                map.insert("children".to_string(), children.into());
            }
        }
        output.data(&value);
        return Ok(());
    }

    println!("{}: {}", item.type_name(), item.id());
    println!("Title: {}", item.title());
    println!(
        "Status: {} ({})",
        item.status().display,
        if item.is_active() { "active" } else { "inactive" }
    );
    if !item.superior_projects().is_empty() {
        println!("Projects: {}", item.superior_projects().join(", "));
    }
    let contexts = contexts_text(item);
    if !contexts.is_empty() {
        println!("Contexts: {}", contexts);
    }
    if let Some(source) = db.source_of(id) {
        println!("Source: {}", source.display());
    }

    if item.kind() == ItemKind::Project {
        let children: Vec<&Item> = db.children_of(id).collect();
        if !children.is_empty() {
            println!("\nItems:");
            for child in children {
                println!("  {} [{}] {}", child.id(), child.status().display, child.title());
            }
        }
    }

    Ok(())
}
