//! Wire keys per format

use crate::domain::Field;
use crate::storage::Format;

/// The keys one format uses for each logical field
#[derive(Debug)]
pub struct Keys {
    pub id: &'static str,
    pub title: &'static str,
    pub type_tag: &'static str,
    pub status: &'static str,
    pub superior_projects: &'static str,
    pub context: &'static str,
    pub is_config: &'static str,
    pub context_tag_regex: &'static str,
}

impl Keys {
    /// Returns the key for a schema field
    pub fn field(&self, field: Field) -> &'static str {
        match field {
            Field::Id => self.id,
            Field::Title => self.title,
            Field::Status => self.status,
            Field::SuperiorProjects => self.superior_projects,
            Field::Context => self.context,
        }
    }
}

/// Org property names; `ITEM` is the headline text
pub const ORG_KEYS: Keys = Keys {
    id: "ID",
    title: "ITEM",
    type_tag: "TYPE",
    status: "STATUS",
    superior_projects: "SUPERIOR_PROJECTS",
    context: "CONTEXT",
    is_config: "IS_CONFIG",
    context_tag_regex: "CONTEXT_TAG_REGEX",
};

pub const JSONL_KEYS: Keys = Keys {
    id: "id",
    title: "title",
    type_tag: "type",
    status: "status",
    superior_projects: "superior_projects",
    context: "context",
    is_config: "is_config",
    context_tag_regex: "context_tag_regex",
};

/// Suffix of the per-type status list properties in Org (`PROJECT_STATUSES`)
pub const ORG_STATUSES_SUFFIX: &str = "_STATUSES";

/// Key of the status list object in JSONL config records
pub const JSONL_STATUSES_KEY: &str = "statuses";

pub fn keys(format: Format) -> &'static Keys {
    match format {
        Format::Org => &ORG_KEYS,
        Format::Jsonl => &JSONL_KEYS,
    }
}
