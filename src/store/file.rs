//! File-backed employee store
//!
//! Each collection lives in `<data_dir>/collections/<collection>.log`, an
//! append-only log with one entry per line:
//!
//! ```text
//! <crc32 as 8 hex digits> <entry json>
//! ```
//!
//! The checksum covers the JSON bytes exactly as written. Inserts and updates
//! append a full `put` of the document (latest entry for an `_id` wins);
//! deletes append a `del` tombstone. Every append is fsynced before the
//! operation is acknowledged. Opening the store replays the log; any line
//! that fails to parse or verify aborts the open.

use std::fs::{self, File, OpenOptions};
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};
use std::sync::RwLock;

use crc32fast::Hasher;
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use super::document::Document;
use super::errors::{StoreError, StoreResult};
use super::{DeleteOutcome, EmployeeStore, InsertOutcome, UpdateOutcome};
use crate::model::{Employee, EmployeeUpdate};

const COLLECTIONS_DIR: &str = "collections";

#[derive(Debug, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "lowercase")]
enum LogEntry {
    Put { doc: Document },
    Del {
        #[serde(rename = "_id")]
        object_id: Uuid,
    },
}

fn checksum(data: &[u8]) -> u32 {
    let mut hasher = Hasher::new();
    hasher.update(data);
    hasher.finalize()
}

fn encode_line(entry: &LogEntry) -> StoreResult<Vec<u8>> {
    let body = serde_json::to_vec(entry)?;
    let mut line = format!("{:08x} ", checksum(&body)).into_bytes();
    line.extend_from_slice(&body);
    line.push(b'\n');
    Ok(line)
}

fn decode_line(line_no: usize, line: &str) -> StoreResult<LogEntry> {
    let (crc_hex, body) = line
        .split_once(' ')
        .ok_or_else(|| StoreError::corruption(line_no, "missing checksum separator"))?;

    let expected = u32::from_str_radix(crc_hex, 16)
        .map_err(|_| StoreError::corruption(line_no, format!("invalid checksum '{}'", crc_hex)))?;

    if checksum(body.as_bytes()) != expected {
        return Err(StoreError::corruption(line_no, "checksum mismatch"));
    }

    serde_json::from_str(body)
        .map_err(|e| StoreError::corruption(line_no, format!("invalid entry: {}", e)))
}

struct Inner {
    log: File,
    documents: Vec<Document>,
    /// Set when a failed append could not be rolled back; the log tail is
    /// unknown and no further writes are accepted.
    failed: bool,
}

impl Inner {
    /// Append one entry and sync it.
    ///
    /// On any write or sync error the log is truncated back to its previous
    /// length, so an unacknowledged entry never survives into a replay.
    fn append(&mut self, entry: &LogEntry, path: &Path) -> StoreResult<()> {
        if self.failed {
            return Err(StoreError::Internal(format!(
                "{} is in a failed state after an unrecoverable write error",
                path.display()
            )));
        }

        let line = encode_line(entry)?;
        let len = self
            .log
            .metadata()
            .map_err(|e| StoreError::io(format!("Failed to stat {}", path.display()), e))?
            .len();

        let written = self
            .log
            .write_all(&line)
            .map_err(|e| StoreError::io(format!("Failed to append to {}", path.display()), e))
            .and_then(|_| {
                self.log
                    .sync_data()
                    .map_err(|e| StoreError::io(format!("Failed to sync {}", path.display()), e))
            });

        if let Err(err) = written {
            self.rollback(len, path);
            return Err(err);
        }
        Ok(())
    }

    fn rollback(&mut self, len: u64, path: &Path) {
        match self.log.set_len(len).and_then(|_| self.log.sync_data()) {
            Ok(()) => warn!(path = %path.display(), len, "rolled back failed append"),
            Err(e) => {
                error!(path = %path.display(), error = %e, "failed to roll back append; refusing further writes");
                self.failed = true;
            }
        }
    }
}

/// Employee store persisted to an append-only collection log.
pub struct FileStore {
    collection: String,
    path: PathBuf,
    inner: RwLock<Inner>,
}

impl FileStore {
    /// Path of the log file for `collection` under `data_dir`
    pub fn log_path(data_dir: &Path, collection: &str) -> PathBuf {
        data_dir
            .join(COLLECTIONS_DIR)
            .join(format!("{}.log", collection))
    }

    /// Open (or create) the collection log and replay it.
    ///
    /// # Errors
    ///
    /// `StoreError::Io` if the directory or file cannot be created or read,
    /// `StoreError::Corruption` if any entry fails verification.
    pub fn open(data_dir: &Path, collection: impl Into<String>) -> StoreResult<Self> {
        let collection = collection.into();
        let path = Self::log_path(data_dir, &collection);

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| {
                StoreError::io(format!("Failed to create {}", parent.display()), e)
            })?;
        }

        let documents = if path.exists() {
            Self::replay(&path)?
        } else {
            Vec::new()
        };

        let log = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .map_err(|e| StoreError::io(format!("Failed to open {}", path.display()), e))?;

        info!(
            collection = %collection,
            path = %path.display(),
            documents = documents.len(),
            "opened collection log"
        );

        Ok(Self {
            collection,
            path,
            inner: RwLock::new(Inner {
                log,
                documents,
                failed: false,
            }),
        })
    }

    fn replay(path: &Path) -> StoreResult<Vec<Document>> {
        let file = File::open(path)
            .map_err(|e| StoreError::io(format!("Failed to open {}", path.display()), e))?;

        let mut documents: Vec<Document> = Vec::new();
        for (index, line) in BufReader::new(file).lines().enumerate() {
            let line_no = index + 1;
            let line = line
                .map_err(|e| StoreError::io(format!("Failed to read {}", path.display()), e))?;
            if line.is_empty() {
                continue;
            }

            match decode_line(line_no, &line)? {
                LogEntry::Put { doc } => {
                    if documents
                        .iter()
                        .any(|d| d.object_id != doc.object_id && d.employee_id() == doc.employee_id())
                    {
                        return Err(StoreError::corruption(
                            line_no,
                            format!("employee id {} stored under two documents", doc.employee_id()),
                        ));
                    }
                    match documents.iter_mut().find(|d| d.object_id == doc.object_id) {
                        Some(existing) => *existing = doc,
                        None => documents.push(doc),
                    }
                }
                LogEntry::Del { object_id } => {
                    documents.retain(|d| d.object_id != object_id);
                }
            }
        }

        Ok(documents)
    }

    /// Path of this store's log file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Rewrite the log so it holds only one `put` per live document.
    ///
    /// The new log is written to a temporary file, synced, and renamed over
    /// the old one. The append handle is opened on the temporary file before
    /// the rename, so the store only switches logs once the rename succeeded.
    /// On failure the temporary file is removed and the old log stays live.
    pub fn compact(&self) -> StoreResult<()> {
        let mut inner = self.inner.write().map_err(|_| StoreError::lock_poisoned())?;
        let tmp_path = self.path.with_extension("log.tmp");

        let result = Self::write_compacted(&tmp_path, &inner.documents).and_then(|log| {
            fs::rename(&tmp_path, &self.path).map_err(|e| {
                StoreError::io(format!("Failed to replace {}", self.path.display()), e)
            })?;
            Ok(log)
        });

        match result {
            Ok(log) => {
                inner.log = log;
                inner.failed = false;
            }
            Err(err) => {
                let _ = fs::remove_file(&tmp_path);
                return Err(err);
            }
        }

        info!(collection = %self.collection, documents = inner.documents.len(), "compacted collection log");
        Ok(())
    }

    /// Write `documents` to `tmp_path`, sync, and return an append handle on it
    fn write_compacted(tmp_path: &Path, documents: &[Document]) -> StoreResult<File> {
        let mut tmp = File::create(tmp_path)
            .map_err(|e| StoreError::io(format!("Failed to create {}", tmp_path.display()), e))?;
        for doc in documents {
            let line = encode_line(&LogEntry::Put { doc: doc.clone() })?;
            tmp.write_all(&line)
                .map_err(|e| StoreError::io(format!("Failed to write {}", tmp_path.display()), e))?;
        }
        tmp.sync_all()
            .map_err(|e| StoreError::io(format!("Failed to sync {}", tmp_path.display()), e))?;

        OpenOptions::new()
            .append(true)
            .open(tmp_path)
            .map_err(|e| StoreError::io(format!("Failed to open {}", tmp_path.display()), e))
    }
}

impl EmployeeStore for FileStore {
    fn collection(&self) -> &str {
        &self.collection
    }

    fn fetch(&self, id: i64) -> StoreResult<Option<Employee>> {
        let inner = self.inner.read().map_err(|_| StoreError::lock_poisoned())?;
        Ok(inner
            .documents
            .iter()
            .find(|doc| doc.employee_id() == id)
            .map(Document::project))
    }

    fn insert(&self, employee: Employee) -> StoreResult<InsertOutcome> {
        let mut inner = self.inner.write().map_err(|_| StoreError::lock_poisoned())?;

        if inner.documents.iter().any(|doc| doc.employee_id() == employee.id) {
            return Err(StoreError::DuplicateId(employee.id));
        }

        let doc = Document::new(employee);
        inner.append(&LogEntry::Put { doc: doc.clone() }, &self.path)?;

        let outcome = InsertOutcome {
            acknowledged: true,
            inserted_id: doc.object_id,
        };
        debug!(collection = %self.collection, id = doc.employee_id(), "inserted document");
        inner.documents.push(doc);

        Ok(outcome)
    }

    fn update(&self, id: i64, changes: &EmployeeUpdate) -> StoreResult<UpdateOutcome> {
        let mut inner = self.inner.write().map_err(|_| StoreError::lock_poisoned())?;

        let Some(index) = inner.documents.iter().position(|doc| doc.employee_id() == id) else {
            return Ok(UpdateOutcome::no_match());
        };

        let mut doc = inner.documents[index].clone();
        let changed = changes.apply_to(&mut doc.employee);
        if changed {
            let entry = LogEntry::Put { doc: doc.clone() };
            inner.append(&entry, &self.path)?;
            inner.documents[index] = doc;
        }
        debug!(collection = %self.collection, id, changed, "updated document");

        Ok(UpdateOutcome {
            matched: 1,
            modified: u64::from(changed),
        })
    }

    fn delete(&self, id: i64) -> StoreResult<DeleteOutcome> {
        let mut inner = self.inner.write().map_err(|_| StoreError::lock_poisoned())?;

        let Some(index) = inner.documents.iter().position(|doc| doc.employee_id() == id) else {
            return Ok(DeleteOutcome { deleted: 0 });
        };

        let object_id = inner.documents[index].object_id;
        inner.append(&LogEntry::Del { object_id }, &self.path)?;
        inner.documents.remove(index);
        debug!(collection = %self.collection, id, "deleted document");

        Ok(DeleteOutcome { deleted: 1 })
    }
}
