use super::error::RepositoryResult;
use crate::session::{Direction, Session, SessionSource, Statistics};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Flat persisted shape of a finished session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionRecord {
    pub id: String,
    pub student_id: Option<String>,
    pub source: SessionSource,
    pub video_uri: Option<String>,
    pub direction: Direction,
    /// JSON-encoded [`Statistics`]
    pub metrics_summary: String,
    pub report: String,
    pub thumbnail_uri: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl SessionRecord {
    pub fn from_session(
        session: &Session,
        statistics: &Statistics,
        report: String,
        thumbnail_uri: Option<String>,
    ) -> RepositoryResult<Self> {
        Ok(Self {
            id: session.id().to_string(),
            student_id: session.student_id().map(str::to_string),
            source: session.source(),
            video_uri: session.video_uri().map(str::to_string),
            direction: session.direction(),
            metrics_summary: serde_json::to_string(statistics)?,
            report,
            thumbnail_uri,
            created_at: session.started_at(),
            updated_at: session.ended_at().unwrap_or_else(|| session.started_at()),
        })
    }

    /// Decode the stored metrics summary
    pub fn statistics(&self) -> RepositoryResult<Statistics> {
        Ok(serde_json::from_str(&self.metrics_summary)?)
    }
}
