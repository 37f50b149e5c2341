//! GTD configuration carried by the config record
//!
//! One configuration governs a whole database: which statuses each item
//! type may take, and how context names are read from tags.

use std::collections::BTreeMap;

use super::tag_pattern::{TagPattern, DEFAULT_CONTEXT_TAG_REGEX};
use super::{ItemKind, Status};
use crate::error::Result;

/// Status lists per type name plus the context tag pattern
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Configuration {
    statuses: BTreeMap<String, Vec<Status>>,
    context_tag_pattern: TagPattern,
}

impl Configuration {
    /// Creates a configuration with no statuses and the default tag pattern
    pub fn new() -> Result<Self> {
        Self::with_pattern(DEFAULT_CONTEXT_TAG_REGEX)
    }

    /// Creates a configuration with no statuses and the given tag pattern
    pub fn with_pattern(context_tag_regex: &str) -> Result<Self> {
        Ok(Self {
            statuses: BTreeMap::new(),
            context_tag_pattern: TagPattern::new(context_tag_regex)?,
        })
    }

    /// Sets the ordered status list for a type name
    pub fn set_statuses(&mut self, type_name: impl Into<String>, statuses: Vec<Status>) {
        self.statuses.insert(type_name.into(), statuses);
    }

    /// Builder form of [`Configuration::set_statuses`]
    pub fn with_statuses(mut self, type_name: impl Into<String>, statuses: Vec<Status>) -> Self {
        self.set_statuses(type_name, statuses);
        self
    }

    /// Returns the statuses for a type name, in configured order
    ///
    /// An unconfigured type has no valid statuses.
    pub fn statuses_for_type(&self, type_name: &str) -> &[Status] {
        self.statuses.get(type_name).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Returns the statuses for an item kind
    pub fn statuses_for(&self, kind: ItemKind) -> &[Status] {
        self.statuses_for_type(kind.type_name())
    }

    /// Finds the status with this display string among the kind's statuses
    pub fn find_status(&self, kind: ItemKind, display: &str) -> Option<&Status> {
        self.statuses_for(kind).iter().find(|s| s.display == display)
    }

    /// Iterates over every configured type name and its statuses
    pub fn statuses(&self) -> impl Iterator<Item = (&str, &[Status])> {
        self.statuses.iter().map(|(k, v)| (k.as_str(), v.as_slice()))
    }

    pub fn context_tag_pattern(&self) -> &TagPattern {
        &self.context_tag_pattern
    }

    /// Returns the context tag regex as the user wrote it
    pub fn context_tag_regex(&self) -> &str {
        self.context_tag_pattern.as_str()
    }
}

/// Returns the ordered statuses configured for `type_name`
pub fn get_statuses_for_type<'c>(config: &'c Configuration, type_name: &str) -> &'c [Status] {
    config.statuses_for_type(type_name)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn project_statuses() -> Vec<Status> {
        vec![
            Status::active("ACTIVE"),
            Status::inactive("COMPLETE"),
            Status::inactive("CANCELLED"),
        ]
    }

    #[test]
    fn statuses_keep_configured_order() {
        let config = Configuration::new()
            .unwrap()
            .with_statuses("project", project_statuses());

        assert_eq!(get_statuses_for_type(&config, "project"), project_statuses().as_slice());
    }

    #[test]
    fn unconfigured_type_has_no_statuses() {
        let config = Configuration::new()
            .unwrap()
            .with_statuses("project", project_statuses());

        assert!(config.statuses_for(ItemKind::WaitingFor).is_empty());
        assert!(config.find_status(ItemKind::WaitingFor, "ACTIVE").is_none());
    }

    #[test]
    fn find_status_is_scoped_by_kind() {
        let config = Configuration::new()
            .unwrap()
            .with_statuses("next_action", vec![Status::active("NEXT")])
            .with_statuses("waiting_for", vec![Status::active("WAITING")]);

        assert!(config.find_status(ItemKind::NextAction, "NEXT").is_some());
        assert!(config.find_status(ItemKind::WaitingFor, "NEXT").is_none());
    }

    #[test]
    fn default_pattern() {
        let config = Configuration::new().unwrap();
        assert_eq!(config.context_tag_regex(), DEFAULT_CONTEXT_TAG_REGEX);
    }
}
