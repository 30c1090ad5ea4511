use sqlx::prelude::FromRow;
use uuid::Uuid;

/// Row shape of the `users` table. The three relationship columns and
/// `relationship_rev` belong to the relationship subsystem; everything else
/// is plain profile data.
#[allow(unused)]
#[derive(Debug, Clone, FromRow)]
pub struct UserEntity {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub hash_password: String,
    pub display_name: String,
    pub avatar_url: Option<String>,
    pub bio: Option<String>,
    pub phone: Option<String>,
    pub friends: Vec<Uuid>,
    pub outgoing_requests: Vec<Uuid>,
    pub incoming_requests: Vec<Uuid>,
    pub relationship_rev: i64,
    pub deleted_at: Option<chrono::DateTime<chrono::Utc>>,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}
