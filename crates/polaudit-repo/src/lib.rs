//! Repository adapters: the JSON file record store.
//!
//! This crate is allowed to do filesystem IO. Everything above it sees records
//! only through `PolicyRepository`.

#![forbid(unsafe_code)]

mod layout;

use camino::{Utf8Path, Utf8PathBuf};
use polaudit_domain::PolicyRepository;
use polaudit_types::PolicyRecord;
use std::collections::BTreeMap;
use std::io;
use thiserror::Error;

pub use layout::{parse_store, render_store};

#[derive(Debug, Error)]
pub enum RepoError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: Utf8PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to write {path}: {source}")]
    Write {
        path: Utf8PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("invalid policy store: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("policy id already exists: {0}")]
    DuplicateId(String),
}

/// Records kept in one JSON file, keyed by id.
///
/// The whole file is loaded on open; every insert or remove writes it back.
#[derive(Debug)]
pub struct JsonFileRepository {
    path: Utf8PathBuf,
    records: BTreeMap<String, PolicyRecord>,
}

impl JsonFileRepository {
    /// Open a store. A missing file is an empty store; it is created on first write.
    pub fn open(path: impl Into<Utf8PathBuf>) -> Result<Self, RepoError> {
        let path = path.into();
        let records = match std::fs::read_to_string(&path) {
            Ok(text) => parse_store(&text)?,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                tracing::debug!(%path, "policy store not found, starting empty");
                BTreeMap::new()
            }
            Err(source) => return Err(RepoError::Read { path, source }),
        };
        tracing::debug!(%path, records = records.len(), "policy store loaded");
        Ok(Self { path, records })
    }

    pub fn path(&self) -> &Utf8Path {
        &self.path
    }

    /// Write `records` to disk, then adopt them. On failure the loaded
    /// records are left as they were.
    fn commit(&mut self, records: BTreeMap<String, PolicyRecord>) -> Result<(), RepoError> {
        self.write(&records)?;
        self.records = records;
        Ok(())
    }

    fn write(&self, records: &BTreeMap<String, PolicyRecord>) -> Result<(), RepoError> {
        let text = render_store(records)?;
        let write_err = |source| RepoError::Write {
            path: self.path.clone(),
            source,
        };
        if let Some(parent) = self.path.parent().filter(|p| !p.as_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(write_err)?;
        }
        std::fs::write(&self.path, text).map_err(write_err)
    }
}

impl PolicyRepository for JsonFileRepository {
    type Error = RepoError;

    fn get(&self, id: &str) -> Result<Option<PolicyRecord>, RepoError> {
        Ok(self.records.get(id).cloned())
    }

    fn list(&self) -> Result<Vec<PolicyRecord>, RepoError> {
        Ok(self.records.values().cloned().collect())
    }

    fn insert(&mut self, record: PolicyRecord) -> Result<(), RepoError> {
        if self.records.contains_key(&record.id) {
            return Err(RepoError::DuplicateId(record.id));
        }
        let mut next = self.records.clone();
        next.insert(record.id.clone(), record);
        self.commit(next)
    }

    fn remove(&mut self, id: &str) -> Result<Option<PolicyRecord>, RepoError> {
        let mut next = self.records.clone();
        let removed = next.remove(id);
        if removed.is_some() {
            self.commit(next)?;
        }
        Ok(removed)
    }
}
