//! Record-level conversion between raw records and typed values

use std::collections::BTreeSet;

use super::keys::{keys, JSONL_STATUSES_KEY, ORG_STATUSES_SUFFIX};
use super::{parse_flag, parse_from_raw, parse_from_raw_for, parse_status_list, ToRaw, ToRawFor};
use crate::domain::{
    Configuration, Context, Field, Item, ItemKind, NextAction, Project, Status, WaitingFor,
    DEFAULT_CONTEXT_TAG_REGEX,
};
use crate::error::{GtdError, Result};
use crate::storage::{Format, RawFields, RawRecord, RawValue};

/// Returns the field's value, treating `null` as absent
fn present<'r>(record: &'r RawRecord, key: &str) -> Option<&'r RawValue> {
    record.get(key).filter(|v| !v.is_null())
}

fn required<'r>(format: Format, record: &'r RawRecord, field: Field) -> Result<&'r RawValue> {
    present(record, keys(format).field(field)).ok_or(GtdError::MissingField {
        field: field.name(),
        line: record.line,
    })
}

/// Returns true if the record's config marker is set
pub fn is_config_record(format: Format, record: &RawRecord) -> Result<bool> {
    let key = keys(format).is_config;
    match present(record, key) {
        Some(raw) => parse_flag(format, key, raw),
        None => Ok(false),
    }
}

/// Returns the record's type tag, if it has one
pub fn type_tag(format: Format, record: &RawRecord) -> Result<Option<String>> {
    let key = keys(format).type_tag;
    match present(record, key) {
        None => Ok(None),
        Some(RawValue::String(tag)) if tag.trim().is_empty() => Ok(None),
        Some(RawValue::String(tag)) => Ok(Some(tag.trim().to_string())),
        Some(other) => Err(GtdError::invalid(key, format!("expected a string, got {}", other))),
    }
}

impl Item {
    /// Builds an item of `kind` from a raw record
    ///
    /// Only the fields in the kind's schema are read; anything else in the
    /// record is left to the store.
    pub fn from_record(
        format: Format,
        kind: ItemKind,
        config: &Configuration,
        record: &RawRecord,
    ) -> Result<Item> {
        let id: String = parse_from_raw(format, config, required(format, record, Field::Id)?)?;
        let title: String = parse_from_raw(format, config, required(format, record, Field::Title)?)?;
        let status: Status =
            parse_from_raw_for(format, kind, config, required(format, record, Field::Status)?)?;

        let superior_projects: Vec<String> =
            match present(record, keys(format).field(Field::SuperiorProjects)) {
                Some(raw) if kind.fields().contains(&Field::SuperiorProjects) => {
                    parse_from_raw(format, config, raw)?
                }
                _ => Vec::new(),
            };
        let contexts: BTreeSet<Context> = match present(record, keys(format).field(Field::Context)) {
            Some(raw) if kind.fields().contains(&Field::Context) => parse_from_raw(format, config, raw)?,
            _ => BTreeSet::new(),
        };

        Ok(match kind {
            ItemKind::Project => Project::new(id, title, status).into(),
            ItemKind::NextAction => NextAction {
                id,
                title,
                status,
                superior_projects,
                contexts,
            }
            .into(),
            ItemKind::WaitingFor => WaitingFor {
                id,
                title,
                status,
                superior_projects,
                contexts,
            }
            .into(),
        })
    }

    /// Encodes the item as raw fields for write-back
    ///
    /// Empty optional fields are `null` so the store drops them.
    pub fn to_fields(&self, format: Format, config: &Configuration) -> Result<RawFields> {
        let k = keys(format);
        let kind = self.kind();
        let mut fields = RawFields::new();

        fields.insert(k.id.to_string(), RawValue::from(self.id()));
        fields.insert(k.title.to_string(), RawValue::from(self.title()));
        fields.insert(k.type_tag.to_string(), RawValue::from(self.type_name()));
        fields.insert(
            k.status.to_string(),
            self.status().to_raw_for(format, kind, config)?,
        );

        if kind.fields().contains(&Field::SuperiorProjects) {
            let projects = self.superior_projects().to_vec();
            fields.insert(k.superior_projects.to_string(), projects.to_raw(format, config)?);
        }
        if let Some(contexts) = self.contexts() {
            fields.insert(k.context.to_string(), contexts.to_raw(format, config)?);
        }

        Ok(fields)
    }
}

impl Configuration {
    /// Builds the configuration from a config record
    pub fn from_record(format: Format, record: &RawRecord) -> Result<Configuration> {
        let regex_key = keys(format).context_tag_regex;
        let pattern = match present(record, regex_key) {
            Some(RawValue::String(source)) => source.as_str(),
            Some(other) => {
                return Err(GtdError::invalid(
                    regex_key,
                    format!("expected a string, got {}", other),
                ))
            }
            None => DEFAULT_CONTEXT_TAG_REGEX,
        };
        let mut config = Configuration::with_pattern(pattern)?;

        match format {
            Format::Org => {
                for (key, raw) in &record.fields {
                    let Some(type_name) = key.strip_suffix(ORG_STATUSES_SUFFIX) else {
                        continue;
                    };
                    if type_name.is_empty() || raw.is_null() {
                        continue;
                    }
                    let statuses = parse_status_list(format, key, raw)?;
                    config.set_statuses(type_name.to_ascii_lowercase(), statuses);
                }
            }
            Format::Jsonl => {
                if let Some(raw) = present(record, JSONL_STATUSES_KEY) {
                    let table = raw.as_object().ok_or_else(|| {
                        GtdError::invalid(JSONL_STATUSES_KEY, format!("expected an object, got {}", raw))
                    })?;
                    for (type_name, list) in table {
                        let statuses = parse_status_list(format, type_name, list)?;
                        config.set_statuses(type_name.clone(), statuses);
                    }
                }
            }
        }

        Ok(config)
    }
}
