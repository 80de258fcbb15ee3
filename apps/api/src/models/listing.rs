use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Employment type codes, stored as the `job_type` Postgres enum.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "job_type")]
pub enum JobType {
    #[default]
    #[serde(rename = "FT")]
    #[sqlx(rename = "FT")]
    FullTime,
    #[serde(rename = "PT")]
    #[sqlx(rename = "PT")]
    PartTime,
    #[serde(rename = "CO")]
    #[sqlx(rename = "CO")]
    Contract,
    #[serde(rename = "IN")]
    #[sqlx(rename = "IN")]
    Internship,
    #[serde(rename = "TE")]
    #[sqlx(rename = "TE")]
    Temporary,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct JobListing {
    pub id: Uuid,
    pub company_id: Uuid,
    pub title: String,
    pub description: String,
    pub job_type: JobType,
    pub minimum_qualifications: Vec<String>,
    pub preferred_qualifications: Vec<String>,
    pub company_name: String,
    pub location: String,
    pub is_remote: bool,
    pub salary_min: Option<f64>,
    pub salary_max: Option<f64>,
    pub expires_on: Option<NaiveDate>,
    pub is_active: bool,
    pub posted_on: DateTime<Utc>,
}

/// Request body for creating a listing. `company_id` comes from the requester.
#[derive(Debug, Clone, Deserialize)]
pub struct NewListing {
    pub title: String,
    pub description: String,
    #[serde(default)]
    pub job_type: JobType,
    #[serde(default)]
    pub minimum_qualifications: Vec<String>,
    #[serde(default)]
    pub preferred_qualifications: Vec<String>,
    pub company_name: String,
    pub location: String,
    #[serde(default)]
    pub is_remote: bool,
    pub salary_min: Option<f64>,
    pub salary_max: Option<f64>,
    pub expires_on: Option<NaiveDate>,
    #[serde(default = "default_active")]
    pub is_active: bool,
}

fn default_active() -> bool {
    true
}

/// Partially-filled listing extracted from free text. Every field is optional
/// because the source text may simply not mention it.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ListingDraft {
    pub title: Option<String>,
    pub description: Option<String>,
    pub job_type: Option<JobType>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub minimum_qualifications: Vec<String>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub preferred_qualifications: Vec<String>,
    pub company_name: Option<String>,
    pub location: Option<String>,
    pub is_remote: Option<bool>,
    pub salary_min: Option<f64>,
    pub salary_max: Option<f64>,
    pub expires_on: Option<NaiveDate>,
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Vec<String>>::deserialize(deserializer)?.unwrap_or_default())
}
