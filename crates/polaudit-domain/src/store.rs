//! Record repository abstraction.
//!
//! Evaluation never reaches for ambient storage: callers pass an explicit
//! repository and hand the records it returns to the engine.

use polaudit_types::PolicyRecord;
use std::collections::BTreeMap;
use thiserror::Error;

pub trait PolicyRepository {
    type Error: std::error::Error + Send + Sync + 'static;

    fn get(&self, id: &str) -> Result<Option<PolicyRecord>, Self::Error>;

    /// All records, ordered by id.
    fn list(&self) -> Result<Vec<PolicyRecord>, Self::Error>;

    /// Insert a new record. Ids are unique; an existing id is an error.
    fn insert(&mut self, record: PolicyRecord) -> Result<(), Self::Error>;

    /// Remove a record, returning it if it existed.
    fn remove(&mut self, id: &str) -> Result<Option<PolicyRecord>, Self::Error>;
}

#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum StoreError {
    #[error("policy id already exists: {0}")]
    DuplicateId(String),
}

#[derive(Clone, Debug, Default)]
pub struct InMemoryRepository {
    records: BTreeMap<String, PolicyRecord>,
}

impl InMemoryRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl FromIterator<PolicyRecord> for InMemoryRepository {
    fn from_iter<I: IntoIterator<Item = PolicyRecord>>(iter: I) -> Self {
        Self {
            records: iter.into_iter().map(|r| (r.id.clone(), r)).collect(),
        }
    }
}

impl PolicyRepository for InMemoryRepository {
    type Error = StoreError;

    fn get(&self, id: &str) -> Result<Option<PolicyRecord>, StoreError> {
        Ok(self.records.get(id).cloned())
    }

    fn list(&self) -> Result<Vec<PolicyRecord>, StoreError> {
        Ok(self.records.values().cloned().collect())
    }

    fn insert(&mut self, record: PolicyRecord) -> Result<(), StoreError> {
        if self.records.contains_key(&record.id) {
            return Err(StoreError::DuplicateId(record.id));
        }
        self.records.insert(record.id.clone(), record);
        Ok(())
    }

    fn remove(&mut self, id: &str) -> Result<Option<PolicyRecord>, StoreError> {
        Ok(self.records.remove(id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{exam, sis};

    #[test]
    fn crud_roundtrip() {
        let mut repo = InMemoryRepository::new();
        repo.insert(sis("b", "admin", "view", false)).unwrap();
        repo.insert(exam("a", true, false, false)).unwrap();

        let ids: Vec<String> = repo.list().unwrap().into_iter().map(|r| r.id).collect();
        assert_eq!(ids, vec!["a", "b"]);

        assert_eq!(
            repo.insert(exam("a", false, false, false)),
            Err(StoreError::DuplicateId("a".to_string()))
        );

        assert!(repo.remove("a").unwrap().is_some());
        assert!(repo.remove("a").unwrap().is_none());
        assert!(repo.get("a").unwrap().is_none());
        assert_eq!(repo.len(), 1);
    }
}
