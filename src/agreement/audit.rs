//! Append-only audit chain storage

use super::hash::is_audit_hash;
use std::fs::{File, OpenOptions};
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};
use thiserror::Error;

/// Audit log errors
#[derive(Debug, Error)]
pub enum AuditError {
    #[error("Audit log I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// Persisted entry is not a 64-char lowercase hex digest
    #[error("Malformed audit entry on line {line}: {entry:?}")]
    MalformedEntry { line: usize, entry: String },
    #[error("Refusing to append invalid audit hash: {0:?}")]
    InvalidHash(String),
}

/// Append-only sequence of audit hashes.
///
/// Implementations serialize appends internally; entries are never
/// reordered or removed.
pub trait AuditLog: Send + Sync {
    /// Append one hash to the end of the chain
    fn append(&self, hash: &str) -> Result<(), AuditError>;
    /// Snapshot of the chain, oldest first
    fn entries(&self) -> Vec<String>;
    /// Number of entries
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Chain held in memory for the life of the agreement
#[derive(Debug, Default)]
pub struct InMemoryAuditLog {
    entries: Mutex<Vec<String>>,
}

impl InMemoryAuditLog {
    pub fn new() -> Self {
        Self::default()
    }
}

impl AuditLog for InMemoryAuditLog {
    fn append(&self, hash: &str) -> Result<(), AuditError> {
        if !is_audit_hash(hash) {
            return Err(AuditError::InvalidHash(hash.to_string()));
        }
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(hash.to_string());
        Ok(())
    }

    fn entries(&self) -> Vec<String> {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn len(&self) -> usize {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }
}

struct FileState {
    file: File,
    entries: Vec<String>,
}

/// Chain persisted as one hash per line.
///
/// Existing entries are loaded and validated on open; new entries are
/// written and synced before they become visible in memory. A failed
/// write or sync truncates the file back to its last committed length.
pub struct FileAuditLog {
    path: PathBuf,
    state: Mutex<FileState>,
}

impl FileAuditLog {
    /// Open or create the log at `path`
    pub fn open(path: impl AsRef<Path>) -> Result<Self, AuditError> {
        let path = path.as_ref().to_path_buf();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let file = OpenOptions::new()
            .create(true)
            .read(true)
            .append(true)
            .open(&path)?;

        let mut entries = Vec::new();
        for (i, line) in BufReader::new(&file).lines().enumerate() {
            let line = line?;
            let entry = line.trim();
            if entry.is_empty() {
                continue;
            }
            if !is_audit_hash(entry) {
                return Err(AuditError::MalformedEntry {
                    line: i + 1,
                    entry: entry.to_string(),
                });
            }
            entries.push(entry.to_string());
        }

        tracing::info!(path = %path.display(), entries = entries.len(), "Audit log opened");

        Ok(Self {
            path,
            state: Mutex::new(FileState { file, entries }),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

fn write_entry(file: &mut File, hash: &str) -> std::io::Result<()> {
    writeln!(file, "{}", hash)?;
    file.sync_data()
}

impl AuditLog for FileAuditLog {
    fn append(&self, hash: &str) -> Result<(), AuditError> {
        if !is_audit_hash(hash) {
            return Err(AuditError::InvalidHash(hash.to_string()));
        }
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        let committed_len = state.file.metadata()?.len();
        if let Err(e) = write_entry(&mut state.file, hash) {
            // Drop any partial line so the file matches the in-memory chain
            if let Err(rollback) = state.file.set_len(committed_len) {
                tracing::error!(
                    path = %self.path.display(),
                    error = %rollback,
                    "Failed to roll back audit log after write error"
                );
            }
            tracing::warn!(path = %self.path.display(), error = %e, "Audit append failed");
            return Err(e.into());
        }
        state.entries.push(hash.to_string());
        Ok(())
    }

    fn entries(&self) -> Vec<String> {
        self.state
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .entries
            .clone()
    }

    fn len(&self) -> usize {
        self.state
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .entries
            .len()
    }
}
