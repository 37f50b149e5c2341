//! # Database
//!
//! The validated, in-memory view of a set of GTD files.
//!
//! A [`Database`] is built once per invocation by [`build_db_from_files`]
//! and never persisted. Besides the item table it remembers which file
//! each item came from, so [`Database::write_back`] can update the record
//! in place.

mod builder;
mod write;

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::domain::{Configuration, Item, ItemKind};
use crate::error::{GtdError, Result};
use crate::storage::Format;

pub use builder::build_db_from_files;
pub use write::write_item_to_file;

/// Items keyed by id, the configuration that validated them, and their origins
#[derive(Debug, Clone)]
pub struct Database {
    table: BTreeMap<String, Item>,
    global_config: Configuration,
    origins: BTreeMap<String, PathBuf>,
}

impl Database {
    /// Creates an empty database governed by `config`
    pub fn new(config: Configuration) -> Self {
        Self {
            table: BTreeMap::new(),
            global_config: config,
            origins: BTreeMap::new(),
        }
    }

    /// Inserts an item, returning the one it replaced
    pub fn insert(&mut self, item: Item, origin: impl Into<PathBuf>) -> Option<Item> {
        let id = item.id().to_string();
        self.origins.insert(id.clone(), origin.into());
        self.table.insert(id, item)
    }

    pub fn get(&self, id: &str) -> Option<&Item> {
        self.table.get(id)
    }

    pub fn len(&self) -> usize {
        self.table.len()
    }

    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    /// Returns the configuration every item was validated against
    pub fn config(&self) -> &Configuration {
        &self.global_config
    }

    /// Iterates over all items in id order
    pub fn items(&self) -> impl Iterator<Item = &Item> {
        self.table.values()
    }

    pub fn items_of_kind(&self, kind: ItemKind) -> impl Iterator<Item = &Item> {
        self.items().filter(move |item| item.kind() == kind)
    }

    pub fn active_items(&self) -> impl Iterator<Item = &Item> {
        self.items().filter(|item| item.is_active())
    }

    pub fn projects(&self) -> impl Iterator<Item = &Item> {
        self.items_of_kind(ItemKind::Project)
    }

    /// Returns the actions and waiting-for items that list `project_id` as superior
    pub fn children_of<'a>(&'a self, project_id: &'a str) -> impl Iterator<Item = &'a Item> {
        self.items()
            .filter(move |item| item.superior_projects().iter().any(|p| p == project_id))
    }

    /// Returns the file an item was read from
    pub fn source_of(&self, id: &str) -> Option<&Path> {
        self.origins.get(id).map(PathBuf::as_path)
    }

    /// Returns `(item id, project id)` pairs whose project is not in the database
    pub fn dangling_references(&self) -> Vec<(&str, &str)> {
        self.items()
            .flat_map(|item| {
                item.superior_projects()
                    .iter()
                    .filter(|p| !self.table.contains_key(p.as_str()))
                    .map(move |p| (item.id(), p.as_str()))
            })
            .collect()
    }

    /// Writes `item` to the file its id was read from and updates the table
    pub fn write_back(&mut self, format: Format, item: Item) -> Result<()> {
        let path = self
            .origins
            .get(item.id())
            .cloned()
            .ok_or_else(|| GtdError::UnknownItem(item.id().to_string()))?;

        write_item_to_file(format, &path, &item, &self.global_config)?;
        self.table.insert(item.id().to_string(), item);
        Ok(())
    }
}
