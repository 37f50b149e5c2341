//! JSONL storage
//!
//! Records are stored one JSON object per line. The config record carries
//! `"is_config": true`; item records carry an `"id"` key. Blank lines are
//! ignored. Uses file locking for concurrent access safety.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use fs2::FileExt;

use crate::error::{GtdError, Result};

use super::atomic;
use super::record::{RawFields, RawRecord, RawValue, RecordStore};

/// Store for records in JSONL files
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonlStore;

impl JsonlStore {
    /// Key holding the record id
    pub const ID_KEY: &'static str = "id";
}

fn parse_line(line: &str, path: &Path, line_num: usize) -> Result<RawFields> {
    match serde_json::from_str::<RawValue>(line) {
        Ok(RawValue::Object(fields)) => Ok(fields),
        Ok(_) => Err(GtdError::Parse {
            path: path.to_path_buf(),
            line: line_num,
            message: "expected a JSON object".to_string(),
        }),
        Err(e) => Err(GtdError::Parse {
            path: path.to_path_buf(),
            line: line_num,
            message: e.to_string(),
        }),
    }
}

/// Applies an update: set given keys, drop `null` ones, keep the rest in place
fn merge_fields(target: &mut RawFields, fields: &RawFields) {
    for (key, value) in fields {
        if value.is_null() {
            target.shift_remove(key);
        } else {
            target.insert(key.clone(), value.clone());
        }
    }
}

impl RecordStore for JsonlStore {
    fn read_records(&self, path: &Path) -> Result<Vec<RawRecord>> {
        let file = File::open(path).map_err(|e| GtdError::io(path, e))?;

        // Acquire shared lock for reading
        file.lock_shared().map_err(|e| GtdError::io(path, e))?;

        let reader = BufReader::new(&file);
        let mut records = Vec::new();

        for (line_num, line) in reader.lines().enumerate() {
            let line = line.map_err(|e| GtdError::io(path, e))?;

            if line.trim().is_empty() {
                continue;
            }

            let fields = parse_line(&line, path, line_num + 1)?;
            records.push(RawRecord::new(fields, line_num + 1));
        }

        // Lock is released when file is dropped
        tracing::debug!(path = %path.display(), records = records.len(), "read jsonl file");
        Ok(records)
    }

    fn write_record(&self, path: &Path, id: &str, fields: &RawFields) -> Result<()> {
        let content = atomic::read_or_empty(path)?;
        let mut lines: Vec<String> = Vec::new();
        let mut found = false;

        for (line_num, line) in content.split_inclusive('\n').enumerate() {
            let text = line.trim_end_matches(['\n', '\r']);
            if text.trim().is_empty() {
                lines.push(line.to_string());
                continue;
            }

            let mut record = parse_line(text, path, line_num + 1)?;
            if record.get(JsonlStore::ID_KEY).and_then(RawValue::as_str) != Some(id) {
                lines.push(line.to_string());
                continue;
            }

            found = true;
            merge_fields(&mut record, fields);
            let eol = &line[text.len()..];
            let encoded = serde_json::to_string(&record).map_err(|e| GtdError::invalid(id, e.to_string()))?;
            lines.push(format!("{}{}", encoded, eol));
        }

        if found {
            tracing::debug!(path = %path.display(), id, "updated jsonl record");
        } else {
            let mut record = RawFields::new();
            record.insert(JsonlStore::ID_KEY.to_string(), RawValue::from(id));
            merge_fields(&mut record, fields);

            if let Some(last) = lines.last_mut() {
                if !last.ends_with('\n') {
                    last.push('\n');
                }
            }
            let encoded = serde_json::to_string(&record).map_err(|e| GtdError::invalid(id, e.to_string()))?;
            lines.push(format!("{}\n", encoded));
            tracing::debug!(path = %path.display(), id, "appended jsonl record");
        }

        atomic::replace_file(path, &lines.concat())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::fs;
    use tempfile::TempDir;

    const SAMPLE: &str = concat!(
        "{\"is_config\": true, \"context_tag_regex\": \"@\\\\(.*\\\\)\"}\n",
        "\n",
        "{\"id\": \"p-1\", \"type\": \"project\", \"title\": \"Move\", \"status\": \"ACTIVE\", \"note\": \"keep\"}\n",
        "{\"id\": \"n-1\", \"type\": \"next_action\", \"title\": \"Pack\", \"status\": \"NEXT\"}\n",
    );

    fn fields(value: serde_json::Value) -> RawFields {
        match value {
            RawValue::Object(map) => map,
            _ => panic!("expected object"),
        }
    }

    fn write_sample(dir: &TempDir) -> std::path::PathBuf {
        let path = dir.path().join("gtd.jsonl");
        fs::write(&path, SAMPLE).unwrap();
        path
    }

    #[test]
    fn reads_records_skipping_blank_lines() {
        let dir = TempDir::new().unwrap();
        let path = write_sample(&dir);

        let records = JsonlStore.read_records(&path).unwrap();
        assert_eq!(records.len(), 3);
        assert_eq!(records[0].get("is_config"), Some(&json!(true)));
        assert_eq!(records[1].line, 3);
        assert_eq!(records[2].get("title"), Some(&json!("Pack")));
    }

    #[test]
    fn non_object_line_is_an_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("gtd.jsonl");
        fs::write(&path, "{\"id\": \"a\"}\n[1, 2]\n").unwrap();

        let err = JsonlStore.read_records(&path).unwrap_err();
        assert!(matches!(err, GtdError::Parse { line: 2, .. }));
    }

    #[test]
    fn invalid_json_is_an_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("gtd.jsonl");
        fs::write(&path, "{not json}\n").unwrap();

        assert!(matches!(
            JsonlStore.read_records(&path).unwrap_err(),
            GtdError::Parse { line: 1, .. }
        ));
    }

    #[test]
    fn update_touches_only_the_matching_line() {
        let dir = TempDir::new().unwrap();
        let path = write_sample(&dir);

        JsonlStore
            .write_record(
                &path,
                "p-1",
                &fields(json!({"status": "COMPLETE", "title": null})),
            )
            .unwrap();

        let content = fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        let sample: Vec<&str> = SAMPLE.lines().collect();

        assert_eq!(lines.len(), 4);
        assert_eq!(lines[0], sample[0]);
        assert_eq!(lines[1], "");
        assert_eq!(
            lines[2],
            r#"{"id":"p-1","type":"project","status":"COMPLETE","note":"keep"}"#
        );
        assert_eq!(lines[3], sample[3]);
    }

    #[test]
    fn append_new_record() {
        let dir = TempDir::new().unwrap();
        let path = write_sample(&dir);

        JsonlStore
            .write_record(&path, "w-1", &fields(json!({"type": "waiting_for", "context": null})))
            .unwrap();

        let records = JsonlStore.read_records(&path).unwrap();
        assert_eq!(records.len(), 4);
        assert_eq!(records[3].fields, fields(json!({"id": "w-1", "type": "waiting_for"})));
    }

    #[test]
    fn write_creates_missing_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("gtd.jsonl");

        JsonlStore
            .write_record(&path, "a", &fields(json!({"title": "A"})))
            .unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), "{\"id\":\"a\",\"title\":\"A\"}\n");
    }

    #[test]
    fn atomic_write_leaves_no_temp_file() {
        let dir = TempDir::new().unwrap();
        let path = write_sample(&dir);

        JsonlStore
            .write_record(&path, "n-1", &fields(json!({"status": "DONE"})))
            .unwrap();

        assert!(!dir.path().join("gtd.jsonl.tmp").exists());
    }
}
