use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::types::Json;
use sqlx::{FromRow, PgPool};
use tracing::debug;
use uuid::Uuid;

use crate::models::application::{ApplicationStatus, JobApplication};
use crate::models::file::StoredFile;
use crate::models::listing::JobListing;
use crate::models::resume::Resume;
use crate::models::screen::{JobApplicationScreen, ScreeningReason};
use crate::store::{
    ApplicationRepository, FileRepository, ListingRepository, ResumeRepository, ScreenCommit,
    ScreenRepository, StoreError, Visibility,
};

/// PostgreSQL-backed store. Cloning shares the underlying pool.
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Judgment lists live in JSONB columns.
#[derive(FromRow)]
struct ScreenRow {
    id: Uuid,
    application_id: Uuid,
    minimum_qualifications: Json<Vec<ScreeningReason>>,
    preferred_qualifications: Json<Vec<ScreeningReason>>,
    score: f64,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<ScreenRow> for JobApplicationScreen {
    fn from(row: ScreenRow) -> Self {
        JobApplicationScreen {
            id: row.id,
            application_id: row.application_id,
            minimum_qualifications: row.minimum_qualifications.0,
            preferred_qualifications: row.preferred_qualifications.0,
            score: row.score,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[async_trait]
impl ListingRepository for PgStore {
    async fn insert_listing(&self, listing: &JobListing) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            INSERT INTO job_listings
                (id, company_id, title, description, job_type, minimum_qualifications,
                 preferred_qualifications, company_name, location, is_remote,
                 salary_min, salary_max, expires_on, is_active, posted_on)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15)
            "#,
        )
        .bind(listing.id)
        .bind(listing.company_id)
        .bind(&listing.title)
        .bind(&listing.description)
        .bind(listing.job_type)
        .bind(&listing.minimum_qualifications)
        .bind(&listing.preferred_qualifications)
        .bind(&listing.company_name)
        .bind(&listing.location)
        .bind(listing.is_remote)
        .bind(listing.salary_min)
        .bind(listing.salary_max)
        .bind(listing.expires_on)
        .bind(listing.is_active)
        .bind(listing.posted_on)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn find_listing(&self, id: Uuid) -> Result<Option<JobListing>, StoreError> {
        Ok(
            sqlx::query_as::<_, JobListing>("SELECT * FROM job_listings WHERE id = $1")
                .bind(id)
                .fetch_optional(&self.pool)
                .await?,
        )
    }

    async fn list_listings(&self, scope: Visibility) -> Result<Vec<JobListing>, StoreError> {
        let listings = match scope {
            Visibility::All => {
                sqlx::query_as::<_, JobListing>(
                    "SELECT * FROM job_listings ORDER BY posted_on DESC",
                )
                .fetch_all(&self.pool)
                .await?
            }
            Visibility::Company(company_id) => {
                sqlx::query_as::<_, JobListing>(
                    "SELECT * FROM job_listings WHERE company_id = $1 ORDER BY posted_on DESC",
                )
                .bind(company_id)
                .fetch_all(&self.pool)
                .await?
            }
            Visibility::Applicant(_) => {
                sqlx::query_as::<_, JobListing>(
                    "SELECT * FROM job_listings WHERE is_active ORDER BY posted_on DESC",
                )
                .fetch_all(&self.pool)
                .await?
            }
        };
        Ok(listings)
    }
}

#[async_trait]
impl FileRepository for PgStore {
    async fn insert_file(&self, file: &StoredFile) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            INSERT INTO stored_files
                (id, owner_id, filename, content_type, size_bytes, storage_key, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            "#,
        )
        .bind(file.id)
        .bind(file.owner_id)
        .bind(&file.filename)
        .bind(&file.content_type)
        .bind(file.size_bytes)
        .bind(&file.storage_key)
        .bind(file.created_at)
        .bind(file.updated_at)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn find_file(&self, id: Uuid) -> Result<Option<StoredFile>, StoreError> {
        Ok(
            sqlx::query_as::<_, StoredFile>("SELECT * FROM stored_files WHERE id = $1")
                .bind(id)
                .fetch_optional(&self.pool)
                .await?,
        )
    }

    async fn delete_file(&self, id: Uuid) -> Result<bool, StoreError> {
        let result = sqlx::query("DELETE FROM stored_files WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

#[async_trait]
impl ResumeRepository for PgStore {
    async fn insert_resume(&self, resume: &Resume) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            INSERT INTO resumes (id, user_id, file_id, text_content, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(resume.id)
        .bind(resume.user_id)
        .bind(resume.file_id)
        .bind(&resume.text_content)
        .bind(resume.created_at)
        .bind(resume.updated_at)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn find_resume(&self, id: Uuid) -> Result<Option<Resume>, StoreError> {
        Ok(
            sqlx::query_as::<_, Resume>("SELECT * FROM resumes WHERE id = $1")
                .bind(id)
                .fetch_optional(&self.pool)
                .await?,
        )
    }

    async fn list_resumes(&self, owner: Option<Uuid>) -> Result<Vec<Resume>, StoreError> {
        let resumes = match owner {
            Some(user_id) => {
                sqlx::query_as::<_, Resume>(
                    "SELECT * FROM resumes WHERE user_id = $1 ORDER BY created_at DESC",
                )
                .bind(user_id)
                .fetch_all(&self.pool)
                .await?
            }
            None => {
                sqlx::query_as::<_, Resume>("SELECT * FROM resumes ORDER BY created_at DESC")
                    .fetch_all(&self.pool)
                    .await?
            }
        };
        Ok(resumes)
    }

    async fn delete_resume(&self, id: Uuid) -> Result<bool, StoreError> {
        let result = sqlx::query("DELETE FROM resumes WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

#[async_trait]
impl ApplicationRepository for PgStore {
    async fn insert_application(&self, application: &JobApplication) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            INSERT INTO job_applications
                (id, listing_id, applicant_id, resume_id, cover_letter, status, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            "#,
        )
        .bind(application.id)
        .bind(application.listing_id)
        .bind(application.applicant_id)
        .bind(application.resume_id)
        .bind(&application.cover_letter)
        .bind(application.status)
        .bind(application.created_at)
        .bind(application.updated_at)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn find_application(&self, id: Uuid) -> Result<Option<JobApplication>, StoreError> {
        Ok(
            sqlx::query_as::<_, JobApplication>("SELECT * FROM job_applications WHERE id = $1")
                .bind(id)
                .fetch_optional(&self.pool)
                .await?,
        )
    }

    async fn list_applications(
        &self,
        scope: Visibility,
    ) -> Result<Vec<JobApplication>, StoreError> {
        let applications = match scope {
            Visibility::All => {
                sqlx::query_as::<_, JobApplication>(
                    "SELECT * FROM job_applications ORDER BY created_at DESC",
                )
                .fetch_all(&self.pool)
                .await?
            }
            Visibility::Company(company_id) => {
                sqlx::query_as::<_, JobApplication>(
                    r#"
                    SELECT a.*
                    FROM job_applications a
                    JOIN job_listings l ON l.id = a.listing_id
                    WHERE l.company_id = $1
                    ORDER BY a.created_at DESC
                    "#,
                )
                .bind(company_id)
                .fetch_all(&self.pool)
                .await?
            }
            Visibility::Applicant(applicant_id) => {
                sqlx::query_as::<_, JobApplication>(
                    "SELECT * FROM job_applications WHERE applicant_id = $1 ORDER BY created_at DESC",
                )
                .bind(applicant_id)
                .fetch_all(&self.pool)
                .await?
            }
        };
        Ok(applications)
    }

    async fn update_application_status(
        &self,
        id: Uuid,
        expected: ApplicationStatus,
        status: ApplicationStatus,
        at: DateTime<Utc>,
    ) -> Result<JobApplication, StoreError> {
        sqlx::query_as::<_, JobApplication>(
            r#"
            UPDATE job_applications SET status = $1, updated_at = $2
            WHERE id = $3 AND status = $4
            RETURNING *
            "#,
        )
        .bind(status)
        .bind(at)
        .bind(id)
        .bind(expected)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| StoreError::Stale(format!("Application {id}")))
    }
}

#[async_trait]
impl ScreenRepository for PgStore {
    async fn find_screen(&self, id: Uuid) -> Result<Option<JobApplicationScreen>, StoreError> {
        let row = sqlx::query_as::<_, ScreenRow>(
            "SELECT * FROM job_application_screens WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.map(Into::into))
    }

    async fn find_screen_for_application(
        &self,
        application_id: Uuid,
    ) -> Result<Option<JobApplicationScreen>, StoreError> {
        let row = sqlx::query_as::<_, ScreenRow>(
            "SELECT * FROM job_application_screens WHERE application_id = $1",
        )
        .bind(application_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.map(Into::into))
    }

    async fn list_screens(
        &self,
        scope: Visibility,
    ) -> Result<Vec<JobApplicationScreen>, StoreError> {
        let rows = match scope {
            Visibility::All => {
                sqlx::query_as::<_, ScreenRow>(
                    "SELECT * FROM job_application_screens ORDER BY created_at DESC",
                )
                .fetch_all(&self.pool)
                .await?
            }
            Visibility::Company(company_id) => {
                sqlx::query_as::<_, ScreenRow>(
                    r#"
                    SELECT s.*
                    FROM job_application_screens s
                    JOIN job_applications a ON a.id = s.application_id
                    JOIN job_listings l ON l.id = a.listing_id
                    WHERE l.company_id = $1
                    ORDER BY s.created_at DESC
                    "#,
                )
                .bind(company_id)
                .fetch_all(&self.pool)
                .await?
            }
            Visibility::Applicant(applicant_id) => {
                sqlx::query_as::<_, ScreenRow>(
                    r#"
                    SELECT s.*
                    FROM job_application_screens s
                    JOIN job_applications a ON a.id = s.application_id
                    WHERE a.applicant_id = $1
                    ORDER BY s.created_at DESC
                    "#,
                )
                .bind(applicant_id)
                .fetch_all(&self.pool)
                .await?
            }
        };
        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn commit_screen(&self, commit: ScreenCommit<'_>) -> Result<(), StoreError> {
        let ScreenCommit {
            screen,
            is_new,
            expected_status,
            application_status,
            at,
        } = commit;

        // Dropping `tx` without commit rolls everything back.
        let mut tx = self.pool.begin().await?;

        // Row lock holds off concurrent status changes until commit.
        let current = sqlx::query_scalar::<_, ApplicationStatus>(
            "SELECT status FROM job_applications WHERE id = $1 FOR UPDATE",
        )
        .bind(screen.application_id)
        .fetch_optional(&mut *tx)
        .await?;
        if current != Some(expected_status) {
            return Err(StoreError::Stale(format!(
                "Application {}",
                screen.application_id
            )));
        }

        if is_new {
            sqlx::query(
                r#"
                INSERT INTO job_application_screens
                    (id, application_id, minimum_qualifications, preferred_qualifications,
                     score, created_at, updated_at)
                VALUES ($1, $2, $3, $4, $5, $6, $7)
                "#,
            )
            .bind(screen.id)
            .bind(screen.application_id)
            .bind(Json(&screen.minimum_qualifications))
            .bind(Json(&screen.preferred_qualifications))
            .bind(screen.score)
            .bind(screen.created_at)
            .bind(screen.updated_at)
            .execute(&mut *tx)
            .await?;
        } else {
            let updated = sqlx::query(
                r#"
                UPDATE job_application_screens
                SET minimum_qualifications = $1, preferred_qualifications = $2,
                    score = $3, updated_at = $4
                WHERE id = $5
                "#,
            )
            .bind(Json(&screen.minimum_qualifications))
            .bind(Json(&screen.preferred_qualifications))
            .bind(screen.score)
            .bind(at)
            .bind(screen.id)
            .execute(&mut *tx)
            .await?;
            if updated.rows_affected() == 0 {
                return Err(StoreError::Database(sqlx::Error::RowNotFound));
            }
        }

        if let Some(status) = application_status {
            sqlx::query("UPDATE job_applications SET status = $1, updated_at = $2 WHERE id = $3")
                .bind(status)
                .bind(at)
                .bind(screen.application_id)
                .execute(&mut *tx)
                .await?;
        }

        tx.commit().await?;
        debug!(
            "Committed screen {} for application {}",
            screen.id, screen.application_id
        );
        Ok(())
    }

    async fn update_screen_score(
        &self,
        id: Uuid,
        score: f64,
        at: DateTime<Utc>,
    ) -> Result<(), StoreError> {
        let updated = sqlx::query(
            "UPDATE job_application_screens SET score = $1, updated_at = $2 WHERE id = $3",
        )
        .bind(score)
        .bind(at)
        .bind(id)
        .execute(&self.pool)
        .await?;
        if updated.rows_affected() == 0 {
            return Err(StoreError::Database(sqlx::Error::RowNotFound));
        }
        Ok(())
    }
}
