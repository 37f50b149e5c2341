//! # Field Codec
//!
//! Converts raw field values into typed values and back, per format.
//!
//! | Target | Org raw | JSONL raw |
//! |--------|---------|-----------|
//! | `String` | text | string |
//! | `bool` | `t`/`nil` (also `true`/`false`, `yes`/`no`) | boolean |
//! | `Context` | one tag | one tag string |
//! | `BTreeSet<Context>` | whitespace-separated tags | array of tags |
//! | `Vec<String>` (ids) | whitespace-separated ids | array of ids |
//! | `Vec<Status>` | `TODO NEXT \| DONE` | array of `{display, is_active}` |
//! | `Status` | display string, checked against the owner's list | same |
//!
//! Dispatch on the target type goes through the [`FromRaw`] / [`FromRawFor`]
//! impls; dispatch on the format happens inside each impl. The configuration
//! is always passed in explicitly.
//!
//! Writing ([`ToRaw`] / [`ToRawFor`]) is the left inverse of parsing: for any
//! value produced by parsing, writing it and parsing the result gives the
//! same value back. Empty collections are written as `null`, which removes
//! the field from the record.

mod keys;
mod record;

use std::collections::BTreeSet;

use crate::domain::{is_valid_id, Configuration, Context, ItemKind, Status};
use crate::error::{GtdError, Result};
use crate::storage::{Format, RawValue};

pub use keys::{keys, Keys, JSONL_KEYS, ORG_KEYS};
pub use record::{is_config_record, type_tag};

/// Values that can be parsed from a raw field on their own
pub trait FromRaw: Sized {
    fn from_raw(format: Format, config: &Configuration, raw: &RawValue) -> Result<Self>;
}

/// Values whose validity depends on the type of the item that owns them
pub trait FromRawFor: Sized {
    fn from_raw_for(
        format: Format,
        owner: ItemKind,
        config: &Configuration,
        raw: &RawValue,
    ) -> Result<Self>;
}

/// Values that can be written as a raw field on their own
pub trait ToRaw {
    fn to_raw(&self, format: Format, config: &Configuration) -> Result<RawValue>;
}

/// Values written relative to the type of the item that owns them
pub trait ToRawFor {
    fn to_raw_for(&self, format: Format, owner: ItemKind, config: &Configuration)
        -> Result<RawValue>;
}

/// Parses a raw value into `T`
pub fn parse_from_raw<T: FromRaw>(format: Format, config: &Configuration, raw: &RawValue) -> Result<T> {
    T::from_raw(format, config, raw)
}

/// Parses a raw value into `T` on behalf of an item of kind `owner`
pub fn parse_from_raw_for<T: FromRawFor>(
    format: Format,
    owner: ItemKind,
    config: &Configuration,
    raw: &RawValue,
) -> Result<T> {
    T::from_raw_for(format, owner, config, raw)
}

fn expect_str<'a>(target: &str, raw: &'a RawValue) -> Result<&'a str> {
    raw.as_str()
        .ok_or_else(|| GtdError::invalid(target, format!("expected a string, got {}", raw)))
}

/// Splits an Org list value, or reads a JSONL array of strings
fn string_list<'a>(format: Format, target: &str, raw: &'a RawValue) -> Result<Vec<&'a str>> {
    match format {
        Format::Org => Ok(expect_str(target, raw)?.split_whitespace().collect()),
        Format::Jsonl => {
            let items = raw
                .as_array()
                .ok_or_else(|| GtdError::invalid(target, format!("expected an array, got {}", raw)))?;
            items.iter().map(|item| expect_str(target, item)).collect()
        }
    }
}

/// Joins list elements for Org, or builds a JSONL array; empty lists become `null`
fn list_to_raw(format: Format, target: &str, items: Vec<String>) -> Result<RawValue> {
    if items.is_empty() {
        return Ok(RawValue::Null);
    }

    match format {
        Format::Org => {
            if let Some(bad) = items.iter().find(|i| i.is_empty() || i.contains(char::is_whitespace)) {
                return Err(GtdError::invalid(
                    target,
                    format!("'{}' cannot be stored in a whitespace-separated list", bad),
                ));
            }
            Ok(RawValue::String(items.join(" ")))
        }
        Format::Jsonl => Ok(RawValue::Array(items.into_iter().map(RawValue::String).collect())),
    }
}

/// Parses a config flag
pub(crate) fn parse_flag(format: Format, target: &str, raw: &RawValue) -> Result<bool> {
    match format {
        Format::Org => match expect_str(target, raw)?.to_ascii_lowercase().as_str() {
            "t" | "true" | "yes" => Ok(true),
            "nil" | "false" | "no" | "" => Ok(false),
            other => Err(GtdError::invalid(target, format!("expected t or nil, got '{}'", other))),
        },
        Format::Jsonl => raw
            .as_bool()
            .ok_or_else(|| GtdError::invalid(target, format!("expected a boolean, got {}", raw))),
    }
}

/// Parses an ordered status list
///
/// In Org this follows the TODO keyword convention: keywords before `|` are
/// active, keywords after it are not. Without a `|`, only the last keyword
/// is inactive.
pub(crate) fn parse_status_list(format: Format, target: &str, raw: &RawValue) -> Result<Vec<Status>> {
    match format {
        Format::Org => {
            let tokens: Vec<&str> = expect_str(target, raw)?.split_whitespace().collect();
            let bars = tokens.iter().filter(|t| **t == "|").count();
            if bars > 1 {
                return Err(GtdError::invalid(target, "more than one '|' separator"));
            }

            let mut statuses = Vec::with_capacity(tokens.len());
            if bars == 1 {
                let mut active = true;
                for token in tokens {
                    if token == "|" {
                        active = false;
                    } else {
                        statuses.push(Status::new(token, active));
                    }
                }
            } else {
                let last = tokens.len().saturating_sub(1);
                for (i, token) in tokens.into_iter().enumerate() {
                    statuses.push(Status::new(token, i != last));
                }
            }
            Ok(statuses)
        }
        Format::Jsonl => {
            let items = raw
                .as_array()
                .ok_or_else(|| GtdError::invalid(target, format!("expected an array, got {}", raw)))?;
            items
                .iter()
                .map(|item| {
                    serde_json::from_value::<Status>(item.clone())
                        .map_err(|e| GtdError::invalid(target, e.to_string()))
                })
                .collect()
        }
    }
}

impl FromRaw for String {
    fn from_raw(_format: Format, _config: &Configuration, raw: &RawValue) -> Result<Self> {
        expect_str("string", raw).map(str::to_string)
    }
}

impl ToRaw for String {
    fn to_raw(&self, _format: Format, _config: &Configuration) -> Result<RawValue> {
        Ok(RawValue::String(self.clone()))
    }
}

impl FromRaw for bool {
    fn from_raw(format: Format, _config: &Configuration, raw: &RawValue) -> Result<Self> {
        parse_flag(format, "flag", raw)
    }
}

impl ToRaw for bool {
    fn to_raw(&self, format: Format, _config: &Configuration) -> Result<RawValue> {
        Ok(match format {
            Format::Org => RawValue::from(if *self { "t" } else { "nil" }),
            Format::Jsonl => RawValue::Bool(*self),
        })
    }
}

impl FromRaw for Context {
    fn from_raw(_format: Format, config: &Configuration, raw: &RawValue) -> Result<Self> {
        config.context_tag_pattern().parse(expect_str("context", raw)?)
    }
}

impl ToRaw for Context {
    fn to_raw(&self, _format: Format, config: &Configuration) -> Result<RawValue> {
        config.context_tag_pattern().render(self).map(RawValue::String)
    }
}

impl FromRaw for BTreeSet<Context> {
    fn from_raw(format: Format, config: &Configuration, raw: &RawValue) -> Result<Self> {
        let pattern = config.context_tag_pattern();
        string_list(format, "context", raw)?
            .into_iter()
            .map(|tag| pattern.parse(tag))
            .collect()
    }
}

impl ToRaw for BTreeSet<Context> {
    fn to_raw(&self, format: Format, config: &Configuration) -> Result<RawValue> {
        let pattern = config.context_tag_pattern();
        let tags = self
            .iter()
            .map(|context| pattern.render(context))
            .collect::<Result<Vec<_>>>()?;
        list_to_raw(format, "context", tags)
    }
}

/// Superior project ids
impl FromRaw for Vec<String> {
    fn from_raw(format: Format, _config: &Configuration, raw: &RawValue) -> Result<Self> {
        string_list(format, "superior_projects", raw)?
            .into_iter()
            .map(|id| {
                if is_valid_id(id) {
                    Ok(id.to_string())
                } else {
                    Err(GtdError::invalid("superior_projects", format!("invalid id '{}'", id)))
                }
            })
            .collect()
    }
}

impl ToRaw for Vec<String> {
    fn to_raw(&self, format: Format, _config: &Configuration) -> Result<RawValue> {
        list_to_raw(format, "superior_projects", self.clone())
    }
}

impl FromRaw for Vec<Status> {
    fn from_raw(format: Format, _config: &Configuration, raw: &RawValue) -> Result<Self> {
        parse_status_list(format, "statuses", raw)
    }
}

impl FromRawFor for Status {
    fn from_raw_for(
        _format: Format,
        owner: ItemKind,
        config: &Configuration,
        raw: &RawValue,
    ) -> Result<Self> {
        let display = expect_str("status", raw)?;
        config
            .find_status(owner, display)
            .cloned()
            .ok_or_else(|| GtdError::UnknownStatus {
                kind: owner,
                status: display.to_string(),
            })
    }
}

impl ToRawFor for Status {
    fn to_raw_for(
        &self,
        _format: Format,
        owner: ItemKind,
        config: &Configuration,
    ) -> Result<RawValue> {
        if !config.statuses_for(owner).contains(self) {
            return Err(GtdError::UnknownStatus {
                kind: owner,
                status: self.display.clone(),
            });
        }
        Ok(RawValue::String(self.display.clone()))
    }
}
