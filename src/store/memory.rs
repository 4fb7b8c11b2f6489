//! In-memory repository, for tests and short-lived tools.

use super::{sort_records, RepositoryError, RepositoryResult, SessionRecord, SessionRepository};
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

/// Shared, lock-guarded map of records. Clones see the same data.
#[derive(Clone, Default)]
pub struct InMemoryRepository {
    records: Arc<RwLock<HashMap<String, SessionRecord>>>,
}

impl InMemoryRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> RepositoryResult<usize> {
        Ok(self.records.read().map_err(poisoned)?.len())
    }

    pub fn is_empty(&self) -> RepositoryResult<bool> {
        Ok(self.len()? == 0)
    }
}

fn poisoned<T>(_: T) -> RepositoryError {
    RepositoryError::InternalError("session store lock poisoned".to_string())
}

impl SessionRepository for InMemoryRepository {
    fn save(&self, record: SessionRecord) -> RepositoryResult<()> {
        let mut records = self.records.write().map_err(poisoned)?;
        tracing::debug!("Storing session {} in memory", record.id);
        records.insert(record.id.clone(), record);
        Ok(())
    }

    fn get(&self, id: &str) -> RepositoryResult<SessionRecord> {
        let records = self.records.read().map_err(poisoned)?;
        records
            .get(id)
            .cloned()
            .ok_or_else(|| RepositoryError::NotFound(format!("session {}", id)))
    }

    fn list(&self) -> RepositoryResult<Vec<SessionRecord>> {
        let records = self.records.read().map_err(poisoned)?;
        let mut all: Vec<SessionRecord> = records.values().cloned().collect();
        sort_records(&mut all);
        Ok(all)
    }

    fn delete(&self, id: &str) -> RepositoryResult<()> {
        let mut records = self.records.write().map_err(poisoned)?;
        records
            .remove(id)
            .map(|_| ())
            .ok_or_else(|| RepositoryError::NotFound(format!("session {}", id)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[test]
    fn test_poisoned_lock_is_an_internal_error() {
        let repository = InMemoryRepository::new();
        assert_eq!(repository.len().unwrap(), 0);
        assert!(repository.is_empty().unwrap());

        let shared = repository.clone();
        let writer = thread::spawn(move || {
            let _guard = shared.records.write().unwrap();
            panic!("writer died holding the lock");
        });
        assert!(writer.join().is_err());

        assert!(matches!(repository.len(), Err(RepositoryError::InternalError(_))));
        assert!(matches!(repository.is_empty(), Err(RepositoryError::InternalError(_))));
        assert!(matches!(repository.list(), Err(RepositoryError::InternalError(_))));
    }
}
