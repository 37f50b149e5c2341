//! Org-mode storage
//!
//! A record is a headline followed by a property drawer:
//!
//! ```org
//! * Call the plumber
//! SCHEDULED: <2024-01-15 Mon>
//! :PROPERTIES:
//! :ID:       n-7f2b4c1
//! :TYPE:     next_action
//! :STATUS:   NEXT
//! :END:
//! Body text is never touched.
//! ```
//!
//! The headline text is exposed as the `ITEM` field, the way Org itself
//! exposes it. Property names are case-insensitive and are read in upper
//! case. Headlines without a drawer are ordinary notes, not records.

use std::path::Path;

use crate::error::{GtdError, Result};

use super::atomic;
use super::record::{RawFields, RawRecord, RawValue, RecordStore};

const PLANNING_PREFIXES: [&str; 3] = ["SCHEDULED:", "DEADLINE:", "CLOSED:"];

/// Store for records in Org files
#[derive(Debug, Clone, Copy, Default)]
pub struct OrgStore;

impl OrgStore {
    /// Field holding the headline text
    pub const HEADLINE_KEY: &'static str = "ITEM";

    /// Property holding the record id
    pub const ID_KEY: &'static str = "ID";
}

#[derive(Debug)]
struct Property {
    index: usize,
    key: String,
    value: String,
}

#[derive(Debug)]
struct Drawer {
    start: usize,
    end: usize,
    properties: Vec<Property>,
}

impl Drawer {
    fn get(&self, key: &str) -> Option<&str> {
        self.properties
            .iter()
            .rev()
            .find(|p| p.key == key)
            .map(|p| p.value.as_str())
    }
}

#[derive(Debug)]
struct Headline {
    index: usize,
    stars: usize,
    text: String,
    drawer: Option<Drawer>,
}

/// Strips the line ending
fn body(line: &str) -> &str {
    line.trim_end_matches(['\n', '\r'])
}

/// Returns the line ending of a line, if any
fn line_ending(line: &str) -> &str {
    &line[body(line).len()..]
}

/// Parses `*** Text` into the star count and trimmed text
fn parse_headline(line: &str) -> Option<(usize, &str)> {
    let line = body(line);
    let stars = line.chars().take_while(|&c| c == '*').count();
    if stars == 0 {
        return None;
    }

    let rest = &line[stars..];
    if !rest.is_empty() && !rest.starts_with([' ', '\t']) {
        return None;
    }

    Some((stars, rest.trim()))
}

/// Parses `:KEY: value` into the key and trimmed value
fn parse_property(line: &str) -> Option<(&str, &str)> {
    let rest = body(line).trim_start().strip_prefix(':')?;
    let end = rest.find(':')?;
    let key = &rest[..end];
    if key.is_empty() || key.contains(char::is_whitespace) {
        return None;
    }

    Some((key, rest[end + 1..].trim()))
}

fn is_marker(line: &str, marker: &str) -> bool {
    body(line).trim().eq_ignore_ascii_case(marker)
}

fn is_planning(line: &str) -> bool {
    let trimmed = body(line).trim_start();
    PLANNING_PREFIXES.iter().any(|p| trimmed.starts_with(p))
}

/// Finds every headline and its property drawer
fn parse_outline(lines: &[&str], path: &Path) -> Result<Vec<Headline>> {
    let mut headlines = Vec::new();
    let mut i = 0;

    while i < lines.len() {
        let Some((stars, text)) = parse_headline(lines[i]) else {
            i += 1;
            continue;
        };

        let index = i;
        let mut j = i + 1;
        while j < lines.len() && is_planning(lines[j]) {
            j += 1;
        }

        let mut drawer = None;
        if j < lines.len() && is_marker(lines[j], ":PROPERTIES:") {
            let start = j;
            let mut properties = Vec::new();
            let mut k = j + 1;

            loop {
                if k >= lines.len() || parse_headline(lines[k]).is_some() {
                    return Err(GtdError::Parse {
                        path: path.to_path_buf(),
                        line: start + 1,
                        message: "unterminated property drawer".to_string(),
                    });
                }
                if is_marker(lines[k], ":END:") {
                    break;
                }
                if let Some((key, value)) = parse_property(lines[k]) {
                    properties.push(Property {
                        index: k,
                        key: key.to_ascii_uppercase(),
                        value: value.to_string(),
                    });
                }
                k += 1;
            }

            drawer = Some(Drawer {
                start,
                end: k,
                properties,
            });
            j = k + 1;
        }

        headlines.push(Headline {
            index,
            stars,
            text: text.to_string(),
            drawer,
        });
        i = j;
    }

    Ok(headlines)
}

/// Converts a raw value to property text; `None` means remove
fn property_text(key: &str, value: &RawValue) -> Result<Option<String>> {
    let text = match value {
        RawValue::Null => return Ok(None),
        RawValue::String(s) => s.clone(),
        RawValue::Bool(true) => "t".to_string(),
        RawValue::Bool(false) => "nil".to_string(),
        RawValue::Number(n) => n.to_string(),
        RawValue::Array(_) | RawValue::Object(_) => {
            return Err(GtdError::invalid(key, "Org properties hold text only"))
        }
    };

    if text.contains(['\n', '\r']) {
        return Err(GtdError::invalid(key, "Org values cannot span lines"));
    }
    if text != text.trim() {
        return Err(GtdError::invalid(key, "Org values cannot start or end with whitespace"));
    }

    Ok(Some(text))
}

fn property_line(indent: &str, key: &str, value: &str, eol: &str) -> String {
    if value.is_empty() {
        format!("{}:{}:{}", indent, key, eol)
    } else {
        format!("{}:{}: {}{}", indent, key, value, eol)
    }
}

/// Replaces the value of a property line, keeping indentation, key spelling and alignment
fn replace_value(line: &str, text: &str) -> String {
    let content = body(line);
    let eol = line_ending(line);
    let indent = content.len() - content.trim_start().len();

    // Skip past ":KEY:" to where the value starts
    let key_end = content[indent + 1..]
        .find(':')
        .map(|i| indent + i + 2)
        .unwrap_or(content.len());
    let rest = &content[key_end..];
    let gap = rest.len() - rest.trim_start().len();

    if text.is_empty() {
        format!("{}{}", &content[..key_end], eol)
    } else if gap == 0 {
        format!("{} {}{}", &content[..key_end], text, eol)
    } else {
        format!("{}{}{}", &content[..key_end + gap], text, eol)
    }
}

fn headline_line(stars: usize, text: &str, eol: &str) -> String {
    format!("{} {}{}", "*".repeat(stars), text, eol)
}

/// Rewrites the headline and drawer of an existing record
fn update_record(
    lines: &mut Vec<String>,
    headline: &Headline,
    drawer: &Drawer,
    fields: &RawFields,
) -> Result<()> {
    let mut replaced = Vec::with_capacity(drawer.end - headline.index + 2);
    let mut handled: Vec<String> = Vec::new();

    let original = &lines[headline.index];
    match fields.get(OrgStore::HEADLINE_KEY) {
        Some(value) => {
            let text = property_text(OrgStore::HEADLINE_KEY, value)?.unwrap_or_default();
            if text == headline.text {
                replaced.push(original.clone());
            } else {
                replaced.push(headline_line(headline.stars, &text, line_ending(original)));
            }
        }
        None => replaced.push(original.clone()),
    }

    // Planning lines and the :PROPERTIES: marker
    replaced.extend(lines[headline.index + 1..=drawer.start].iter().cloned());

    let mut properties = drawer.properties.iter().peekable();
    for index in drawer.start + 1..drawer.end {
        let line = &lines[index];
        let property = properties.next_if(|p| p.index == index);

        let Some(property) = property else {
            replaced.push(line.clone());
            continue;
        };
        let Some((key, value)) = fields
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(&property.key))
        else {
            replaced.push(line.clone());
            continue;
        };

        handled.push(property.key.clone());
        match property_text(key, value)? {
            Some(text) if text == property.value => replaced.push(line.clone()),
            Some(text) => replaced.push(replace_value(line, &text)),
            None => {}
        }
    }

    let end_line = &lines[drawer.end];
    let indent = end_line[..end_line.len() - end_line.trim_start().len()].to_string();
    for (key, value) in fields {
        if key == OrgStore::HEADLINE_KEY || handled.iter().any(|h| h.eq_ignore_ascii_case(key)) {
            continue;
        }
        if let Some(text) = property_text(key, value)? {
            replaced.push(property_line(&indent, key, &text, "\n"));
        }
    }
    replaced.push(end_line.clone());

    lines.splice(headline.index..=drawer.end, replaced);
    Ok(())
}

/// Appends a new top-level headline for the record
fn append_record(lines: &mut Vec<String>, id: &str, fields: &RawFields) -> Result<()> {
    if let Some(last) = lines.last_mut() {
        if !last.ends_with('\n') {
            last.push('\n');
        }
    }

    let title = match fields.get(OrgStore::HEADLINE_KEY) {
        Some(value) => property_text(OrgStore::HEADLINE_KEY, value)?.unwrap_or_default(),
        None => id.to_string(),
    };

    lines.push(headline_line(1, &title, "\n"));
    lines.push(":PROPERTIES:\n".to_string());
    lines.push(property_line("", OrgStore::ID_KEY, id, "\n"));
    for (key, value) in fields {
        if key == OrgStore::HEADLINE_KEY || key.eq_ignore_ascii_case(OrgStore::ID_KEY) {
            continue;
        }
        if let Some(text) = property_text(key, value)? {
            lines.push(property_line("", key, &text, "\n"));
        }
    }
    lines.push(":END:\n".to_string());

    Ok(())
}

impl RecordStore for OrgStore {
    fn read_records(&self, path: &Path) -> Result<Vec<RawRecord>> {
        let content = std::fs::read_to_string(path).map_err(|e| GtdError::io(path, e))?;
        let lines: Vec<&str> = content.split_inclusive('\n').collect();

        let records: Vec<RawRecord> = parse_outline(&lines, path)?
            .into_iter()
            .filter_map(|headline| {
                let drawer = headline.drawer?;
                let mut fields = RawFields::new();
                fields.insert(OrgStore::HEADLINE_KEY.to_string(), RawValue::String(headline.text));
                for property in drawer.properties {
                    fields.insert(property.key, RawValue::String(property.value));
                }
                Some(RawRecord::new(fields, headline.index + 1))
            })
            .collect();

        tracing::debug!(path = %path.display(), records = records.len(), "read org file");
        Ok(records)
    }

    fn write_record(&self, path: &Path, id: &str, fields: &RawFields) -> Result<()> {
        let content = atomic::read_or_empty(path)?;
        let source: Vec<&str> = content.split_inclusive('\n').collect();
        let headlines = parse_outline(&source, path)?;
        let mut lines: Vec<String> = source.iter().map(|l| l.to_string()).collect();

        let targets: Vec<(&Headline, &Drawer)> = headlines
            .iter()
            .filter_map(|h| {
                let drawer = h.drawer.as_ref()?;
                (drawer.get(OrgStore::ID_KEY) == Some(id)).then_some((h, drawer))
            })
            .collect();

        if targets.is_empty() {
            tracing::debug!(path = %path.display(), id, "appending org record");
            append_record(&mut lines, id, fields)?;
        } else {
            // Every record with the id is updated; bottom-up so earlier indices stay valid
            for (headline, drawer) in targets.into_iter().rev() {
                tracing::debug!(path = %path.display(), id, line = headline.index + 1, "updating org record");
                update_record(&mut lines, headline, drawer, fields)?;
            }
        }

        atomic::replace_file(path, &lines.concat())
    }
}
