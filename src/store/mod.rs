//! Persistence boundary for finished sessions.
//!
//! Analysis code never touches storage directly; callers hand a
//! [`SessionRecord`] to whichever [`SessionRepository`] they injected.

mod error;
mod json_dir;
mod memory;
mod record;

pub use error::{RepositoryError, RepositoryResult};
pub use json_dir::JsonDirRepository;
pub use memory::InMemoryRepository;
pub use record::SessionRecord;

/// Key-by-id store of session records
pub trait SessionRepository {
    /// Insert or replace the record with the same id
    fn save(&self, record: SessionRecord) -> RepositoryResult<()>;

    /// Fetch a record, `NotFound` if the id is unknown
    fn get(&self, id: &str) -> RepositoryResult<SessionRecord>;

    /// All records, oldest first
    fn list(&self) -> RepositoryResult<Vec<SessionRecord>>;

    /// Records of one student, oldest first
    fn list_for_student(&self, student_id: &str) -> RepositoryResult<Vec<SessionRecord>> {
        Ok(self
            .list()?
            .into_iter()
            .filter(|record| record.student_id.as_deref() == Some(student_id))
            .collect())
    }

    /// Remove a record, `NotFound` if the id is unknown
    fn delete(&self, id: &str) -> RepositoryResult<()>;
}

fn sort_records(records: &mut [SessionRecord]) {
    records.sort_by(|a, b| a.created_at.cmp(&b.created_at).then_with(|| a.id.cmp(&b.id)));
}
