//! In-memory `Store` for tests. Enforces the same unique constraints as the
//! schema and can inject a failure into the next write of a given kind.

use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::models::application::{ApplicationStatus, JobApplication};
use crate::models::file::StoredFile;
use crate::models::listing::JobListing;
use crate::models::resume::Resume;
use crate::models::screen::JobApplicationScreen;
use crate::store::{
    ApplicationRepository, FileRepository, ListingRepository, ResumeRepository, ScreenCommit,
    ScreenRepository, StoreError, Visibility,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailingWrite {
    File,
    Resume,
    Screen,
}

#[derive(Default)]
struct Tables {
    listings: Vec<JobListing>,
    files: Vec<StoredFile>,
    resumes: Vec<Resume>,
    applications: Vec<JobApplication>,
    screens: Vec<JobApplicationScreen>,
    fail_next: Option<FailingWrite>,
}

impl Tables {
    fn take_failure(&mut self, kind: FailingWrite) -> Result<(), StoreError> {
        if self.fail_next == Some(kind) {
            self.fail_next = None;
            return Err(StoreError::Database(sqlx::Error::Protocol(format!(
                "injected {kind:?} write failure"
            ))));
        }
        Ok(())
    }

    // Mirrors ON DELETE SET NULL on job_applications.resume_id.
    fn remove_resume(&mut self, id: Uuid) -> bool {
        let before = self.resumes.len();
        self.resumes.retain(|r| r.id != id);
        for application in self.applications.iter_mut() {
            if application.resume_id == Some(id) {
                application.resume_id = None;
            }
        }
        self.resumes.len() < before
    }

    fn company_owns_application(&self, company_id: Uuid, application: &JobApplication) -> bool {
        self.listings
            .iter()
            .any(|l| l.id == application.listing_id && l.company_id == company_id)
    }
}

#[derive(Default)]
pub struct MemoryStore {
    tables: Mutex<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fail_next(&self, kind: FailingWrite) {
        self.lock().fail_next = Some(kind);
    }

    pub fn screen_count(&self) -> usize {
        self.lock().screens.len()
    }

    pub fn file_count(&self) -> usize {
        self.lock().files.len()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Tables> {
        self.tables.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

fn newest_first<T, F>(mut rows: Vec<T>, key: F) -> Vec<T>
where
    F: Fn(&T) -> DateTime<Utc>,
{
    rows.sort_by_key(|row| std::cmp::Reverse(key(row)));
    rows
}

#[async_trait]
impl ListingRepository for MemoryStore {
    async fn insert_listing(&self, listing: &JobListing) -> Result<(), StoreError> {
        self.lock().listings.push(listing.clone());
        Ok(())
    }

    async fn find_listing(&self, id: Uuid) -> Result<Option<JobListing>, StoreError> {
        Ok(self.lock().listings.iter().find(|l| l.id == id).cloned())
    }

    async fn list_listings(&self, scope: Visibility) -> Result<Vec<JobListing>, StoreError> {
        let rows: Vec<JobListing> = self
            .lock()
            .listings
            .iter()
            .filter(|l| match scope {
                Visibility::All => true,
                Visibility::Company(company_id) => l.company_id == company_id,
                Visibility::Applicant(_) => l.is_active,
            })
            .cloned()
            .collect();
        Ok(newest_first(rows, |l| l.posted_on))
    }
}

#[async_trait]
impl FileRepository for MemoryStore {
    async fn insert_file(&self, file: &StoredFile) -> Result<(), StoreError> {
        let mut tables = self.lock();
        tables.take_failure(FailingWrite::File)?;
        if tables.files.iter().any(|f| f.storage_key == file.storage_key) {
            return Err(StoreError::Conflict("stored_files_storage_key_key".into()));
        }
        tables.files.push(file.clone());
        Ok(())
    }

    async fn find_file(&self, id: Uuid) -> Result<Option<StoredFile>, StoreError> {
        Ok(self.lock().files.iter().find(|f| f.id == id).cloned())
    }

    async fn delete_file(&self, id: Uuid) -> Result<bool, StoreError> {
        let mut tables = self.lock();
        let before = tables.files.len();
        tables.files.retain(|f| f.id != id);
        let deleted = tables.files.len() < before;
        if deleted {
            let orphaned: Vec<Uuid> = tables
                .resumes
                .iter()
                .filter(|r| r.file_id == id)
                .map(|r| r.id)
                .collect();
            for resume_id in orphaned {
                tables.remove_resume(resume_id);
            }
        }
        Ok(deleted)
    }
}

#[async_trait]
impl ResumeRepository for MemoryStore {
    async fn insert_resume(&self, resume: &Resume) -> Result<(), StoreError> {
        let mut tables = self.lock();
        tables.take_failure(FailingWrite::Resume)?;
        if tables.resumes.iter().any(|r| r.file_id == resume.file_id) {
            return Err(StoreError::Conflict("resumes_file_id_key".into()));
        }
        tables.resumes.push(resume.clone());
        Ok(())
    }

    async fn find_resume(&self, id: Uuid) -> Result<Option<Resume>, StoreError> {
        Ok(self.lock().resumes.iter().find(|r| r.id == id).cloned())
    }

    async fn list_resumes(&self, owner: Option<Uuid>) -> Result<Vec<Resume>, StoreError> {
        let rows: Vec<Resume> = self
            .lock()
            .resumes
            .iter()
            .filter(|r| owner.map_or(true, |user_id| r.user_id == user_id))
            .cloned()
            .collect();
        Ok(newest_first(rows, |r| r.created_at))
    }

    async fn delete_resume(&self, id: Uuid) -> Result<bool, StoreError> {
        Ok(self.lock().remove_resume(id))
    }
}

#[async_trait]
impl ApplicationRepository for MemoryStore {
    async fn insert_application(&self, application: &JobApplication) -> Result<(), StoreError> {
        let mut tables = self.lock();
        let duplicate = tables.applications.iter().any(|a| {
            a.listing_id == application.listing_id && a.applicant_id == application.applicant_id
        });
        if duplicate {
            return Err(StoreError::Conflict(
                "uq_job_application_listing_applicant".into(),
            ));
        }
        tables.applications.push(application.clone());
        Ok(())
    }

    async fn find_application(&self, id: Uuid) -> Result<Option<JobApplication>, StoreError> {
        Ok(self.lock().applications.iter().find(|a| a.id == id).cloned())
    }

    async fn list_applications(
        &self,
        scope: Visibility,
    ) -> Result<Vec<JobApplication>, StoreError> {
        let tables = self.lock();
        let rows: Vec<JobApplication> = tables
            .applications
            .iter()
            .filter(|a| match scope {
                Visibility::All => true,
                Visibility::Company(company_id) => tables.company_owns_application(company_id, a),
                Visibility::Applicant(applicant_id) => a.applicant_id == applicant_id,
            })
            .cloned()
            .collect();
        Ok(newest_first(rows, |a| a.created_at))
    }

    async fn update_application_status(
        &self,
        id: Uuid,
        expected: ApplicationStatus,
        status: ApplicationStatus,
        at: DateTime<Utc>,
    ) -> Result<JobApplication, StoreError> {
        let mut tables = self.lock();
        let application = tables
            .applications
            .iter_mut()
            .find(|a| a.id == id && a.status == expected)
            .ok_or_else(|| StoreError::Stale(format!("Application {id}")))?;
        application.status = status;
        application.updated_at = at;
        Ok(application.clone())
    }
}

#[async_trait]
impl ScreenRepository for MemoryStore {
    async fn find_screen(&self, id: Uuid) -> Result<Option<JobApplicationScreen>, StoreError> {
        Ok(self.lock().screens.iter().find(|s| s.id == id).cloned())
    }

    async fn find_screen_for_application(
        &self,
        application_id: Uuid,
    ) -> Result<Option<JobApplicationScreen>, StoreError> {
        Ok(self
            .lock()
            .screens
            .iter()
            .find(|s| s.application_id == application_id)
            .cloned())
    }

    async fn list_screens(
        &self,
        scope: Visibility,
    ) -> Result<Vec<JobApplicationScreen>, StoreError> {
        let tables = self.lock();
        let rows: Vec<JobApplicationScreen> = tables
            .screens
            .iter()
            .filter(|s| {
                let application = tables.applications.iter().find(|a| a.id == s.application_id);
                match (scope, application) {
                    (Visibility::All, _) => true,
                    (Visibility::Company(company_id), Some(a)) => {
                        tables.company_owns_application(company_id, a)
                    }
                    (Visibility::Applicant(applicant_id), Some(a)) => {
                        a.applicant_id == applicant_id
                    }
                    (_, None) => false,
                }
            })
            .cloned()
            .collect();
        Ok(newest_first(rows, |s| s.created_at))
    }

    async fn commit_screen(&self, commit: ScreenCommit<'_>) -> Result<(), StoreError> {
        let mut tables = self.lock();
        // Validate every step before mutating so a failure leaves nothing behind.
        tables.take_failure(FailingWrite::Screen)?;

        let application = tables
            .applications
            .iter()
            .position(|a| {
                a.id == commit.screen.application_id && a.status == commit.expected_status
            })
            .ok_or_else(|| {
                StoreError::Stale(format!("Application {}", commit.screen.application_id))
            })?;

        let existing = tables
            .screens
            .iter()
            .position(|s| s.id == commit.screen.id);
        if commit.is_new {
            let duplicate = tables
                .screens
                .iter()
                .any(|s| s.application_id == commit.screen.application_id);
            if duplicate {
                return Err(StoreError::Conflict(
                    "uq_job_application_screen_application".into(),
                ));
            }
        } else if existing.is_none() {
            return Err(StoreError::Database(sqlx::Error::RowNotFound));
        }

        match existing {
            Some(index) if !commit.is_new => {
                let mut updated = commit.screen.clone();
                updated.updated_at = commit.at;
                tables.screens[index] = updated;
            }
            _ => tables.screens.push(commit.screen.clone()),
        }
        if let Some(status) = commit.application_status {
            tables.applications[application].status = status;
            tables.applications[application].updated_at = commit.at;
        }
        Ok(())
    }

    async fn update_screen_score(
        &self,
        id: Uuid,
        score: f64,
        at: DateTime<Utc>,
    ) -> Result<(), StoreError> {
        let mut tables = self.lock();
        let screen = tables
            .screens
            .iter_mut()
            .find(|s| s.id == id)
            .ok_or(StoreError::Database(sqlx::Error::RowNotFound))?;
        screen.score = score;
        screen.updated_at = at;
        Ok(())
    }
}
