use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Resume {
    pub id: Uuid,
    pub user_id: Uuid,
    pub file_id: Uuid,
    pub text_content: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
