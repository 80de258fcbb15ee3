//! Repository seams between the services and PostgreSQL.
//!
//! Services never traverse relationships implicitly: every cross-entity lookup
//! goes through one of these traits by id or foreign key, and the service that
//! needs the join performs it. `AppState` carries an `Arc<dyn Store>`; the
//! production backend is `PgStore`, tests use `MemoryStore`.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use thiserror::Error;
use uuid::Uuid;

use crate::models::application::{ApplicationStatus, JobApplication};
use crate::models::file::StoredFile;
use crate::models::listing::JobListing;
use crate::models::resume::Resume;
use crate::models::screen::JobApplicationScreen;

#[cfg(test)]
pub mod memory;
pub mod postgres;

#[cfg(test)]
pub use memory::MemoryStore;
pub use postgres::PgStore;

#[derive(Debug, Error)]
pub enum StoreError {
    /// A unique constraint rejected the write. Carries the constraint name.
    #[error("unique constraint violated: {0}")]
    Conflict(String),

    /// A conditional write found the row gone or no longer in the state it
    /// was read in. Carries a description of the row.
    #[error("{0} was modified concurrently")]
    Stale(String),

    #[error("database error: {0}")]
    Database(sqlx::Error),
}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        if let sqlx::Error::Database(db) = &err {
            if db.is_unique_violation() {
                return StoreError::Conflict(
                    db.constraint().unwrap_or("unique constraint").to_string(),
                );
            }
        }
        StoreError::Database(err)
    }
}

/// Row scope for list queries, derived from the requester.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Visibility {
    All,
    /// Rows tied to listings owned by this company.
    Company(Uuid),
    /// Rows owned by this applicant (for listings: active listings only).
    Applicant(Uuid),
}

/// A screen write plus the application status side effect, committed atomically.
#[derive(Debug, Clone)]
pub struct ScreenCommit<'a> {
    pub screen: &'a JobApplicationScreen,
    /// `true` inserts the screen, `false` updates the existing row.
    pub is_new: bool,
    /// Status the application had when the caller read it. The commit fails
    /// with `StoreError::Stale` if it no longer matches.
    pub expected_status: ApplicationStatus,
    /// New application status, or `None` to leave it untouched.
    pub application_status: Option<ApplicationStatus>,
    pub at: DateTime<Utc>,
}

#[async_trait]
pub trait ListingRepository: Send + Sync {
    async fn insert_listing(&self, listing: &JobListing) -> Result<(), StoreError>;
    async fn find_listing(&self, id: Uuid) -> Result<Option<JobListing>, StoreError>;
    /// Newest first.
    async fn list_listings(&self, scope: Visibility) -> Result<Vec<JobListing>, StoreError>;
}

#[async_trait]
pub trait FileRepository: Send + Sync {
    async fn insert_file(&self, file: &StoredFile) -> Result<(), StoreError>;
    async fn find_file(&self, id: Uuid) -> Result<Option<StoredFile>, StoreError>;
    /// Returns `false` when no row matched.
    async fn delete_file(&self, id: Uuid) -> Result<bool, StoreError>;
}

#[async_trait]
pub trait ResumeRepository: Send + Sync {
    async fn insert_resume(&self, resume: &Resume) -> Result<(), StoreError>;
    async fn find_resume(&self, id: Uuid) -> Result<Option<Resume>, StoreError>;
    /// Newest first; `None` lists every resume.
    async fn list_resumes(&self, owner: Option<Uuid>) -> Result<Vec<Resume>, StoreError>;
    async fn delete_resume(&self, id: Uuid) -> Result<bool, StoreError>;
}

#[async_trait]
pub trait ApplicationRepository: Send + Sync {
    /// Fails with `StoreError::Conflict` when the (listing, applicant) pair exists.
    async fn insert_application(&self, application: &JobApplication) -> Result<(), StoreError>;
    async fn find_application(&self, id: Uuid) -> Result<Option<JobApplication>, StoreError>;
    /// Newest first.
    async fn list_applications(
        &self,
        scope: Visibility,
    ) -> Result<Vec<JobApplication>, StoreError>;
    /// Compare-and-set on the status column: writes `status` only while the
    /// row still holds `expected`, otherwise fails with `StoreError::Stale`.
    async fn update_application_status(
        &self,
        id: Uuid,
        expected: ApplicationStatus,
        status: ApplicationStatus,
        at: DateTime<Utc>,
    ) -> Result<JobApplication, StoreError>;
}

#[async_trait]
pub trait ScreenRepository: Send + Sync {
    async fn find_screen(&self, id: Uuid) -> Result<Option<JobApplicationScreen>, StoreError>;
    async fn find_screen_for_application(
        &self,
        application_id: Uuid,
    ) -> Result<Option<JobApplicationScreen>, StoreError>;
    /// Newest first.
    async fn list_screens(
        &self,
        scope: Visibility,
    ) -> Result<Vec<JobApplicationScreen>, StoreError>;
    /// Writes the screen and the status change in one transaction. A racing
    /// insert for the same application fails with `StoreError::Conflict`.
    async fn commit_screen(&self, commit: ScreenCommit<'_>) -> Result<(), StoreError>;
    async fn update_screen_score(
        &self,
        id: Uuid,
        score: f64,
        at: DateTime<Utc>,
    ) -> Result<(), StoreError>;
}

/// Everything the services need from persistence.
pub trait Store:
    ListingRepository + FileRepository + ResumeRepository + ApplicationRepository + ScreenRepository
{
}

impl<T> Store for T where
    T: ListingRepository
        + FileRepository
        + ResumeRepository
        + ApplicationRepository
        + ScreenRepository
{
}
