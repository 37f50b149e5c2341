//! Item IDs
//!
//! IDs in files are free-form strings; the only rule is that they are
//! non-empty and contain no whitespace, so they can be listed in a
//! whitespace-separated `SUPERIOR_PROJECTS` property.
//!
//! New items get a generated ID of the form `{prefix}-{7-char-hash}`:
//! `p-` for projects, `n-` for next actions, `w-` for waiting-for items.
//! The hash is derived from title + creation timestamp, so the same title
//! entered twice still gets two IDs.

use chrono::{DateTime, Utc};

use super::ItemKind;

/// Generates a 7-character hash from title and timestamp
fn generate_hash(title: &str, timestamp: DateTime<Utc>) -> String {
    let input = format!("{}{}", title, timestamp.timestamp_nanos_opt().unwrap_or(0));
    let hash = blake3::hash(input.as_bytes());
    let hex = hash.to_hex();
    hex[..7].to_string()
}

fn prefix(kind: ItemKind) -> &'static str {
    match kind {
        ItemKind::Project => "p",
        ItemKind::NextAction => "n",
        ItemKind::WaitingFor => "w",
    }
}

/// Generates an ID for a new item
pub fn generate_id(kind: ItemKind, title: &str, timestamp: DateTime<Utc>) -> String {
    format!("{}-{}", prefix(kind), generate_hash(title, timestamp))
}

/// Returns true if `id` can be stored in both formats
pub fn is_valid_id(id: &str) -> bool {
    !id.is_empty() && !id.chars().any(char::is_whitespace)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn generated_id_format() {
        let ts = Utc.with_ymd_and_hms(2024, 1, 15, 10, 30, 0).unwrap();
        let id = generate_id(ItemKind::NextAction, "Call the plumber", ts);

        assert!(id.starts_with("n-"));
        assert_eq!(id.len(), 9);
        assert!(id[2..].chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn generated_id_is_deterministic() {
        let ts = Utc.with_ymd_and_hms(2024, 1, 15, 10, 30, 0).unwrap();
        assert_eq!(
            generate_id(ItemKind::Project, "Move house", ts),
            generate_id(ItemKind::Project, "Move house", ts)
        );
    }

    #[test]
    fn same_title_different_time() {
        let ts1 = Utc.with_ymd_and_hms(2024, 1, 15, 10, 30, 0).unwrap();
        let ts2 = Utc.with_ymd_and_hms(2024, 1, 15, 10, 30, 1).unwrap();
        assert_ne!(
            generate_id(ItemKind::Project, "Move house", ts1),
            generate_id(ItemKind::Project, "Move house", ts2)
        );
    }

    #[test]
    fn prefixes_differ_by_kind() {
        let ts = Utc.with_ymd_and_hms(2024, 1, 15, 10, 30, 0).unwrap();
        assert!(generate_id(ItemKind::Project, "x", ts).starts_with("p-"));
        assert!(generate_id(ItemKind::WaitingFor, "x", ts).starts_with("w-"));
    }

    #[test]
    fn id_validity() {
        assert!(is_valid_id("p-7f2b4c1"));
        assert!(is_valid_id("2b3c-uuid-like"));
        assert!(!is_valid_id(""));
        assert!(!is_valid_id("has space"));
    }
}
