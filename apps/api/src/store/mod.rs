//! Persistence gateway: one interface over users, routines, tracking samples
//! and the cached protocol corpus.
//!
//! `AppState` carries the stores as `Arc<dyn _>`; `PgStore` is the production
//! backend, `MemoryStore` backs the handler tests.

#[cfg(test)]
pub mod memory;
pub mod postgres;

use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

use crate::models::metric::{MetricSample, NewMetricSample};
use crate::models::routine::{Routine, RoutineDraft};
use crate::models::section::ReferenceSection;
use crate::models::user::{NewUser, User};

/// Upper bound on samples returned by `list_metrics`.
pub const METRIC_HISTORY_LIMIT: i64 = 100;

#[derive(Debug, Error)]
pub enum StoreError {
    /// Referential integrity: the row points at a user that does not exist.
    #[error("User {0} does not exist")]
    UnknownUser(Uuid),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

#[async_trait]
pub trait RoutineStore: Send + Sync {
    async fn create_user(&self, user: &NewUser) -> Result<User, StoreError>;

    async fn get_user(&self, id: Uuid) -> Result<Option<User>, StoreError>;

    /// Fails with `UnknownUser` if `user_id` has no row.
    async fn create_routine(
        &self,
        user_id: Uuid,
        draft: &RoutineDraft,
    ) -> Result<Routine, StoreError>;

    /// Stores a questionnaire submission and its routine atomically: either both
    /// rows are written or neither is.
    async fn create_submission(
        &self,
        user: &NewUser,
        draft: &RoutineDraft,
    ) -> Result<(User, Routine), StoreError>;

    async fn get_routine(&self, id: Uuid) -> Result<Option<Routine>, StoreError>;

    async fn record_metric(
        &self,
        user_id: Uuid,
        sample: &NewMetricSample,
    ) -> Result<MetricSample, StoreError>;

    /// Newest first, at most `METRIC_HISTORY_LIMIT` samples.
    async fn list_metrics(&self, user_id: Uuid) -> Result<Vec<MetricSample>, StoreError>;
}

#[async_trait]
pub trait CorpusStore: Send + Sync {
    /// All cached sections in their original page order.
    async fn list_sections(&self) -> Result<Vec<ReferenceSection>, StoreError>;

    /// Inserts each section whose `section_id` is not stored yet.
    /// Returns how many rows were written.
    async fn insert_sections_if_absent(
        &self,
        sections: &[ReferenceSection],
    ) -> Result<u64, StoreError>;
}
