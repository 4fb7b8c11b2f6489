use super::{sort_records, RepositoryError, RepositoryResult, SessionRecord, SessionRepository};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// Stores each record as `<id>.json` in one directory
#[derive(Debug, Clone)]
pub struct JsonDirRepository {
    dir: PathBuf,
}

impl JsonDirRepository {
    /// Open the store, creating the directory if needed
    pub fn open<P: AsRef<Path>>(dir: P) -> RepositoryResult<Self> {
        let dir = dir.as_ref().to_path_buf();
        fs::create_dir_all(&dir)?;
        tracing::debug!("Session store at {}", dir.display());
        Ok(Self { dir })
    }

    fn path_for(&self, id: &str) -> RepositoryResult<PathBuf> {
        let valid = !id.is_empty()
            && id != "."
            && id != ".."
            && !id.contains(['/', '\\'])
            && !id.contains('\0');
        if !valid {
            return Err(RepositoryError::ValidationError(format!("invalid session id '{}'", id)));
        }
        Ok(self.dir.join(format!("{}.json", id)))
    }
}

impl SessionRepository for JsonDirRepository {
    fn save(&self, record: SessionRecord) -> RepositoryResult<()> {
        let path = self.path_for(&record.id)?;
        let json = serde_json::to_string_pretty(&record)?;
        fs::write(&path, json)?;
        tracing::info!("Saved session {} to {}", record.id, path.display());
        Ok(())
    }

    fn get(&self, id: &str) -> RepositoryResult<SessionRecord> {
        let path = self.path_for(id)?;
        match fs::read_to_string(&path) {
            Ok(json) => Ok(serde_json::from_str(&json)?),
            Err(err) if err.kind() == ErrorKind::NotFound => {
                Err(RepositoryError::NotFound(format!("session {}", id)))
            }
            Err(err) => Err(err.into()),
        }
    }

    fn list(&self) -> RepositoryResult<Vec<SessionRecord>> {
        let mut records = Vec::new();
        for entry in fs::read_dir(&self.dir)? {
            let path = entry?.path();
            if path.extension().and_then(|ext| ext.to_str()) != Some("json") {
                continue;
            }
            let json = fs::read_to_string(&path)?;
            records.push(serde_json::from_str(&json)?);
        }
        sort_records(&mut records);
        Ok(records)
    }

    fn delete(&self, id: &str) -> RepositoryResult<()> {
        let path = self.path_for(id)?;
        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == ErrorKind::NotFound => {
                Err(RepositoryError::NotFound(format!("session {}", id)))
            }
            Err(err) => Err(err.into()),
        }
    }
}
