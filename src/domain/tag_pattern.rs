//! Context tag patterns
//!
//! The pattern that picks context names out of tags is written by the user
//! in Emacs regexp syntax, the dialect Org users already write. It is
//! translated once into `regex` syntax:
//!
//! | Emacs | regex |
//! |-------|-------|
//! | `\(` `\)` | `(` `)` |
//! | `\(?:` | `(?:` |
//! | `\|` `\{` `\}` | `\|` `{` `}` |
//! | `(` `)` `\|` `{` `}` | literal |
//! | `` \` `` `\'` | `\A` `\z` |
//! | `\<` `\>` | `\b{start}` `\b{end}` |
//! | `\s-` `\S-` | `\s` `\S` |
//!
//! If the pattern has a capture group, the context name is the text of the
//! first group; otherwise it is the whole match.

use std::fmt;

use regex::Regex;

use super::Context;
use crate::error::{GtdError, Result};

/// Pattern used when the config record does not name one
pub const DEFAULT_CONTEXT_TAG_REGEX: &str = r"@\(.*\)";

/// A compiled context tag pattern, remembered with its Emacs source
#[derive(Clone)]
pub struct TagPattern {
    source: String,
    regex: Regex,
}

impl TagPattern {
    /// Compiles an Emacs-syntax pattern
    pub fn new(source: impl Into<String>) -> Result<Self> {
        let source = source.into();
        let translated = translate(&source).map_err(|message| GtdError::InvalidContextPattern {
            pattern: source.clone(),
            message,
        })?;
        let regex = Regex::new(&translated).map_err(|e| GtdError::InvalidContextPattern {
            pattern: source.clone(),
            message: e.to_string(),
        })?;

        Ok(Self { source, regex })
    }

    /// Returns the pattern as the user wrote it
    pub fn as_str(&self) -> &str {
        &self.source
    }

    /// Returns the translated pattern
    pub fn regex(&self) -> &Regex {
        &self.regex
    }

    fn has_group(&self) -> bool {
        self.regex.captures_len() > 1
    }

    /// Extracts the context name from one tag, if the pattern matches
    pub fn extract<'t>(&self, tag: &'t str) -> Option<&'t str> {
        let caps = self.regex.captures(tag)?;
        let name = if self.has_group() { caps.get(1)? } else { caps.get(0)? };
        Some(name.as_str())
    }

    /// Parses one tag into a context
    pub fn parse(&self, tag: &str) -> Result<Context> {
        self.extract(tag)
            .map(Context::new)
            .ok_or_else(|| GtdError::UnmatchedContext {
                tag: tag.to_string(),
                pattern: self.source.clone(),
            })
    }

    /// Renders a context back into a tag that `parse` turns into the same context
    pub fn render(&self, context: &Context) -> Result<String> {
        let unrenderable = || GtdError::UnrenderableContext {
            name: context.name.clone(),
            pattern: self.source.clone(),
        };

        let tag = if self.has_group() {
            render_template(&self.source, &context.name).ok_or_else(unrenderable)?
        } else {
            context.name.clone()
        };

        match self.extract(&tag) {
            Some(name) if name == context.name => Ok(tag),
            _ => Err(unrenderable()),
        }
    }
}

impl PartialEq for TagPattern {
    fn eq(&self, other: &Self) -> bool {
        self.source == other.source
    }
}

impl Eq for TagPattern {}

impl fmt::Debug for TagPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("TagPattern").field(&self.source).finish()
    }
}

/// Translates Emacs regexp syntax into `regex` syntax
fn translate(pattern: &str) -> std::result::Result<String, String> {
    let chars: Vec<char> = pattern.chars().collect();
    let mut out = String::with_capacity(pattern.len() + 8);
    let mut i = 0;

    while i < chars.len() {
        let c = chars[i];
        match c {
            '\\' => {
                let next = *chars
                    .get(i + 1)
                    .ok_or_else(|| "trailing backslash".to_string())?;
                i += 2;
                match next {
                    '(' => {
                        if chars.get(i) == Some(&'?') && chars.get(i + 1) == Some(&':') {
                            out.push_str("(?:");
                            i += 2;
                        } else {
                            out.push('(');
                        }
                    }
                    ')' | '|' | '{' | '}' => out.push(next),
                    '`' => out.push_str(r"\A"),
                    '\'' => out.push_str(r"\z"),
                    '<' => out.push_str(r"\b{start}"),
                    '>' => out.push_str(r"\b{end}"),
                    'w' | 'W' | 'b' | 'B' => {
                        out.push('\\');
                        out.push(next);
                    }
                    's' | 'S' => match chars.get(i) {
                        Some('-') | Some(' ') => {
                            out.push('\\');
                            out.push(next);
                            i += 1;
                        }
                        Some(class) => {
                            return Err(format!("unsupported syntax class \\{}{}", next, class))
                        }
                        None => return Err(format!("incomplete syntax class \\{}", next)),
                    },
                    '1'..='9' => return Err("backreferences are not supported".to_string()),
                    other => out.push_str(&regex::escape(other.encode_utf8(&mut [0; 4]))),
                }
            }
            '(' | ')' | '|' | '{' | '}' => {
                out.push('\\');
                out.push(c);
                i += 1;
            }
            '[' => i = translate_bracket(&chars, i, &mut out)?,
            _ => {
                out.push(c);
                i += 1;
            }
        }
    }

    Ok(out)
}

/// Copies a bracket expression starting at `start`, returning the index after it
fn translate_bracket(
    chars: &[char],
    start: usize,
    out: &mut String,
) -> std::result::Result<usize, String> {
    let mut i = start + 1;
    out.push('[');

    if chars.get(i) == Some(&'^') {
        out.push('^');
        i += 1;
    }
    // A leading `]` is a literal in Emacs
    if chars.get(i) == Some(&']') {
        out.push_str(r"\]");
        i += 1;
    }

    loop {
        let c = *chars
            .get(i)
            .ok_or_else(|| "unterminated bracket expression".to_string())?;
        match c {
            ']' => {
                out.push(']');
                return Ok(i + 1);
            }
            '[' if chars.get(i + 1) == Some(&':') => {
                let end = (i + 2..chars.len().saturating_sub(1))
                    .find(|&j| chars[j] == ':' && chars[j + 1] == ']')
                    .ok_or_else(|| "unterminated character class".to_string())?;
                out.extend(&chars[i..end + 2]);
                i = end + 2;
            }
            '\\' | '[' | '&' | '~' => {
                out.push('\\');
                out.push(c);
                i += 1;
            }
            _ => {
                out.push(c);
                i += 1;
            }
        }
    }
}

/// Fills the first capture group of an Emacs pattern with `name`
///
/// Only works when everything outside the group is literal text, with an
/// optional leading `^` and trailing `$`.
fn render_template(pattern: &str, name: &str) -> Option<String> {
    let chars: Vec<char> = pattern.chars().collect();
    let mut out = String::new();
    let mut filled = false;
    let mut i = 0;

    while i < chars.len() {
        let c = chars[i];
        match c {
            '^' if i == 0 => i += 1,
            '$' if i + 1 == chars.len() => i += 1,
            '\\' => {
                let next = *chars.get(i + 1)?;
                match next {
                    '(' if !filled && chars.get(i + 2) != Some(&'?') => {
                        i = skip_group(&chars, i + 2)?;
                        out.push_str(name);
                        filled = true;
                    }
                    '`' if i == 0 => i += 2,
                    '\'' if i + 2 == chars.len() => i += 2,
                    '(' | ')' | '|' | '{' | '}' | '`' | '\'' | '<' | '>' | 'w' | 'W' | 'b'
                    | 'B' | 's' | 'S' | '0'..='9' => return None,
                    literal => {
                        out.push(literal);
                        i += 2;
                    }
                }
            }
            '.' | '*' | '+' | '?' | '[' | '^' | '$' => return None,
            _ => {
                out.push(c);
                i += 1;
            }
        }
    }

    filled.then_some(out)
}

/// Returns the index just past the `\)` closing a group whose body starts at `start`
fn skip_group(chars: &[char], start: usize) -> Option<usize> {
    let mut depth = 1;
    let mut i = start;

    while i < chars.len() {
        if chars[i] == '\\' {
            match chars.get(i + 1) {
                Some('(') => depth += 1,
                Some(')') => {
                    depth -= 1;
                    if depth == 0 {
                        return Some(i + 2);
                    }
                }
                _ => {}
            }
            i += 2;
        } else {
            i += 1;
        }
    }

    None
}
