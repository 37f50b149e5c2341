//! GTD item model
//!
//! Items come in three concrete kinds: projects, next actions and
//! waiting-for items. [`ItemKind`] is the tag that tells them apart on the
//! wire, and [`Item`] holds one value of any kind.
//!
//! There is no value for the abstract base: asking for it by name fails
//! with [`GtdError::AbstractType`].

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use super::{Context, Status};
use crate::error::GtdError;

/// Name of the abstract base type; never a valid record type
pub const ABSTRACT_TYPE_NAME: &str = "item";

/// A field of an item's schema
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    Id,
    Title,
    Status,
    SuperiorProjects,
    Context,
}

impl Field {
    /// Returns the format-independent field name
    pub fn name(&self) -> &'static str {
        match self {
            Field::Id => "id",
            Field::Title => "title",
            Field::Status => "status",
            Field::SuperiorProjects => "superior_projects",
            Field::Context => "context",
        }
    }
}

/// The concrete item types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemKind {
    Project,
    NextAction,
    WaitingFor,
}

impl ItemKind {
    /// Every concrete item kind
    pub const ALL: [ItemKind; 3] = [ItemKind::Project, ItemKind::NextAction, ItemKind::WaitingFor];

    /// Returns the tag stored in the type field of a record
    pub fn type_name(&self) -> &'static str {
        match self {
            ItemKind::Project => "project",
            ItemKind::NextAction => "next_action",
            ItemKind::WaitingFor => "waiting_for",
        }
    }

    /// Resolves a record's type tag to a concrete kind
    pub fn from_type_name(name: &str) -> Result<Self, GtdError> {
        if name == ABSTRACT_TYPE_NAME {
            return Err(GtdError::AbstractType(name.to_string()));
        }

        Self::ALL
            .into_iter()
            .find(|kind| kind.type_name() == name)
            .ok_or_else(|| GtdError::UnsupportedGtdType(name.to_string()))
    }

    /// Returns the fields every item of this kind carries
    pub fn fields(&self) -> &'static [Field] {
        match self {
            ItemKind::Project => &[Field::Id, Field::Title, Field::Status],
            ItemKind::NextAction | ItemKind::WaitingFor => &[
                Field::Id,
                Field::Title,
                Field::Status,
                Field::SuperiorProjects,
                Field::Context,
            ],
        }
    }
}

impl fmt::Display for ItemKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.type_name())
    }
}

impl FromStr for ItemKind {
    type Err = GtdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_type_name(s)
    }
}

/// A multi-step outcome
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {
    pub id: String,
    pub title: String,
    pub status: Status,
}

impl Project {
    pub fn new(id: impl Into<String>, title: impl Into<String>, status: Status) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            status,
        }
    }
}

/// A single physical, visible action
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NextAction {
    pub id: String,
    pub title: String,
    pub status: Status,

    /// Ids of the projects this action moves forward (not checked for existence)
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub superior_projects: Vec<String>,

    #[serde(default, skip_serializing_if = "BTreeSet::is_empty")]
    pub contexts: BTreeSet<Context>,
}

impl NextAction {
    pub fn new(id: impl Into<String>, title: impl Into<String>, status: Status) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            status,
            superior_projects: Vec::new(),
            contexts: BTreeSet::new(),
        }
    }

    pub fn with_superior_project(mut self, project_id: impl Into<String>) -> Self {
        self.superior_projects.push(project_id.into());
        self
    }

    pub fn with_context(mut self, context: Context) -> Self {
        self.contexts.insert(context);
        self
    }
}

/// Something delegated or blocked on someone else
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WaitingFor {
    pub id: String,
    pub title: String,
    pub status: Status,

    /// Ids of the projects this item belongs to (not checked for existence)
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub superior_projects: Vec<String>,

    #[serde(default, skip_serializing_if = "BTreeSet::is_empty")]
    pub contexts: BTreeSet<Context>,
}

impl WaitingFor {
    pub fn new(id: impl Into<String>, title: impl Into<String>, status: Status) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            status,
            superior_projects: Vec::new(),
            contexts: BTreeSet::new(),
        }
    }

    pub fn with_superior_project(mut self, project_id: impl Into<String>) -> Self {
        self.superior_projects.push(project_id.into());
        self
    }

    pub fn with_context(mut self, context: Context) -> Self {
        self.contexts.insert(context);
        self
    }
}

/// An item of any concrete kind
///
/// Items of different kinds never compare equal, even with identical fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Item {
    Project(Project),
    NextAction(NextAction),
    WaitingFor(WaitingFor),
}

impl Item {
    pub fn kind(&self) -> ItemKind {
        match self {
            Item::Project(_) => ItemKind::Project,
            Item::NextAction(_) => ItemKind::NextAction,
            Item::WaitingFor(_) => ItemKind::WaitingFor,
        }
    }

    pub fn type_name(&self) -> &'static str {
        self.kind().type_name()
    }

    pub fn id(&self) -> &str {
        match self {
            Item::Project(p) => &p.id,
            Item::NextAction(a) => &a.id,
            Item::WaitingFor(w) => &w.id,
        }
    }

    pub fn title(&self) -> &str {
        match self {
            Item::Project(p) => &p.title,
            Item::NextAction(a) => &a.title,
            Item::WaitingFor(w) => &w.title,
        }
    }

    pub fn status(&self) -> &Status {
        match self {
            Item::Project(p) => &p.status,
            Item::NextAction(a) => &a.status,
            Item::WaitingFor(w) => &w.status,
        }
    }

    /// Replaces the status without validating it; writing validates
    pub fn set_status(&mut self, status: Status) {
        match self {
            Item::Project(p) => p.status = status,
            Item::NextAction(a) => a.status = status,
            Item::WaitingFor(w) => w.status = status,
        }
    }

    /// Returns true if the item's status is active
    pub fn is_active(&self) -> bool {
        self.status().is_active
    }

    /// Returns the superior project ids (always empty for projects)
    pub fn superior_projects(&self) -> &[String] {
        match self {
            Item::Project(_) => &[],
            Item::NextAction(a) => &a.superior_projects,
            Item::WaitingFor(w) => &w.superior_projects,
        }
    }

    /// Returns the contexts, or `None` for kinds that have no context field
    pub fn contexts(&self) -> Option<&BTreeSet<Context>> {
        match self {
            Item::Project(_) => None,
            Item::NextAction(a) => Some(&a.contexts),
            Item::WaitingFor(w) => Some(&w.contexts),
        }
    }
}

impl From<Project> for Item {
    fn from(project: Project) -> Self {
        Item::Project(project)
    }
}

impl From<NextAction> for Item {
    fn from(action: NextAction) -> Self {
        Item::NextAction(action)
    }
}

impl From<WaitingFor> for Item {
    fn from(waiting: WaitingFor) -> Self {
        Item::WaitingFor(waiting)
    }
}

/// Returns the item's status
pub fn get_status(item: &Item) -> &Status {
    item.status()
}

/// Returns true if the item's status is active
pub fn is_active(item: &Item) -> bool {
    item.is_active()
}
