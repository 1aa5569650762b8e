use anyhow::{Context, Result, bail};
use fs2::FileExt;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::{Read, Seek, SeekFrom, Write};
use std::path::PathBuf;

const COUNTER_FILE: &str = "counter";
const LOG_FILE: &str = "messages.log";

/// One generated message, appended exactly once per run that reaches
/// logging. Never mutated or deleted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogRecord {
    pub id: u64,
    pub date: String,
    pub model: String,
    pub message: String,
}

/// Durable counter-and-append store. `next_id` must be atomic under
/// concurrent runs; `append` is write-once.
pub trait MessageStore {
    fn next_id(&self) -> Result<u64>;
    fn append(&self, record: &LogRecord) -> Result<()>;
}

/// File-backed store: a single counter file mutated under an exclusive lock
/// plus a JSONL message log, both under one directory.
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    pub fn new(dir: PathBuf) -> Self {
        Self { dir }
    }

    fn ensure_dir(&self) -> Result<()> {
        fs::create_dir_all(&self.dir)
            .with_context(|| format!("failed to create {}", self.dir.display()))
    }

    /// Highest id already present in the message log, 0 when there is none.
    /// Used to re-seed an empty counter file so ids never restart and
    /// collide with existing records.
    fn max_logged_id(&self) -> Result<u64> {
        let path = self.dir.join(LOG_FILE);
        if !path.exists() {
            return Ok(0);
        }
        let raw = fs::read_to_string(&path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        let mut max = 0u64;
        for line in raw.lines() {
            let trimmed = line.trim();
            if trimmed.is_empty() {
                continue;
            }
            let record: LogRecord = serde_json::from_str(trimmed)
                .with_context(|| format!("failed to parse record in {}", path.display()))?;
            max = max.max(record.id);
        }
        Ok(max)
    }
}

impl MessageStore for FileStore {
    fn next_id(&self) -> Result<u64> {
        self.ensure_dir()?;
        let path = self.dir.join(COUNTER_FILE);
        let mut file = fs::OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .open(&path)
            .with_context(|| format!("failed to open {}", path.display()))?;

        // The lock makes read-increment-write a single atomic step across
        // concurrent runs; it is released when the handle drops.
        file.lock_exclusive()
            .with_context(|| format!("failed to lock {}", path.display()))?;

        let mut raw = String::new();
        file.read_to_string(&mut raw)
            .with_context(|| format!("failed to read {}", path.display()))?;
        let current = if raw.trim().is_empty() {
            // Fresh deployment, or an earlier update was interrupted and left
            // the file empty. Re-seed from the log so ids never restart.
            self.max_logged_id()?
        } else {
            match raw.trim().parse::<u64>() {
                Ok(v) => v,
                // A corrupt counter must never silently reset to zero; reused
                // ids would collide with existing log records.
                Err(_) => bail!("counter file {} is corrupt: {raw:?}", path.display()),
            }
        };
        let next = current + 1;

        // The decimal form of an incrementing counter never shrinks, so write
        // the new value in place first and trim any excess afterwards; a
        // crash mid-update leaves a readable value, not an empty file.
        let encoded = next.to_string();
        file.seek(SeekFrom::Start(0))?;
        file.write_all(encoded.as_bytes())
            .with_context(|| format!("failed to write {}", path.display()))?;
        file.set_len(encoded.len() as u64)?;
        Ok(next)
    }

    fn append(&self, record: &LogRecord) -> Result<()> {
        self.ensure_dir()?;
        let path = self.dir.join(LOG_FILE);
        let line = format!("{}\n", serde_json::to_string(record)?);
        let mut file = fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .with_context(|| format!("failed to open {}", path.display()))?;
        file.write_all(line.as_bytes())
            .with_context(|| format!("failed to append to {}", path.display()))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::{FileStore, LogRecord, MessageStore};
    use std::fs;

    fn record(id: u64) -> LogRecord {
        LogRecord {
            id,
            date: "2026-08-29T07:00:00".to_string(),
            model: "Claude".to_string(),
            message: "este momento es suficiente".to_string(),
        }
    }

    #[test]
    fn next_id_starts_at_one_and_increments() {
        let tmp = tempfile::tempdir().expect("tempdir");
        let store = FileStore::new(tmp.path().join("store"));
        assert_eq!(store.next_id().expect("first id"), 1);
        assert_eq!(store.next_id().expect("second id"), 2);
        assert_eq!(store.next_id().expect("third id"), 3);
    }

    #[test]
    fn empty_counter_reseeds_from_the_log_instead_of_restarting() {
        let tmp = tempfile::tempdir().expect("tempdir");
        let store = FileStore::new(tmp.path().join("store"));
        for id in 1..=3 {
            assert_eq!(store.next_id().expect("next_id"), id);
            store.append(&record(id)).expect("append");
        }

        // An interrupted counter update leaves the file empty.
        let counter = tmp.path().join("store/counter");
        fs::write(&counter, "").expect("truncate counter");

        assert_eq!(store.next_id().expect("reseeded id"), 4);
        assert_eq!(store.next_id().expect("follow-up id"), 5);
    }

    #[test]
    fn empty_counter_without_a_log_starts_at_one() {
        let tmp = tempfile::tempdir().expect("tempdir");
        let dir = tmp.path().join("store");
        fs::create_dir_all(&dir).expect("mkdir");
        fs::write(dir.join("counter"), "").expect("write empty counter");

        let store = FileStore::new(dir);
        assert_eq!(store.next_id().expect("first id"), 1);
    }

    #[test]
    fn counter_file_is_never_left_shorter_than_its_value() {
        let tmp = tempfile::tempdir().expect("tempdir");
        let store = FileStore::new(tmp.path().join("store"));
        for _ in 0..12 {
            store.next_id().expect("next_id");
        }

        let raw = fs::read_to_string(tmp.path().join("store/counter")).expect("read counter");
        assert_eq!(raw, "12");
    }

    #[test]
    fn next_id_refuses_corrupt_counter() {
        let tmp = tempfile::tempdir().expect("tempdir");
        let dir = tmp.path().join("store");
        fs::create_dir_all(&dir).expect("mkdir");
        fs::write(dir.join("counter"), "not-a-number").expect("write counter");

        let store = FileStore::new(dir);
        let err = store.next_id().expect_err("corrupt counter must fail");
        assert!(err.to_string().contains("corrupt"));
    }

    #[test]
    fn append_writes_one_jsonl_line_per_record() {
        let tmp = tempfile::tempdir().expect("tempdir");
        let store = FileStore::new(tmp.path().join("store"));
        store.append(&record(1)).expect("append 1");
        store.append(&record(2)).expect("append 2");

        let raw = fs::read_to_string(tmp.path().join("store/messages.log")).expect("read log");
        let lines: Vec<&str> = raw.lines().collect();
        assert_eq!(lines.len(), 2);
        let parsed: LogRecord = serde_json::from_str(lines[1]).expect("parse record");
        assert_eq!(parsed.id, 2);
        assert_eq!(parsed.model, "Claude");
    }

    #[test]
    fn concurrent_next_id_yields_distinct_gap_free_values() {
        let tmp = tempfile::tempdir().expect("tempdir");
        let dir = tmp.path().join("store");

        let mut handles = Vec::new();
        for _ in 0..8 {
            let store = FileStore::new(dir.clone());
            handles.push(std::thread::spawn(move || {
                let mut ids = Vec::new();
                for _ in 0..5 {
                    ids.push(store.next_id().expect("next_id under contention"));
                }
                ids
            }));
        }

        let mut all: Vec<u64> = handles
            .into_iter()
            .flat_map(|h| h.join().expect("thread join"))
            .collect();
        all.sort_unstable();
        let expected: Vec<u64> = (1..=40).collect();
        assert_eq!(all, expected);
    }
}
