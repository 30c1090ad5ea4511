use serde::{Deserialize, Serialize};
use sqlx::prelude::{FromRow, Type};
use uuid::Uuid;

#[derive(Debug, PartialEq, Clone, Type, Serialize, Deserialize)]
#[sqlx(type_name = "post_visibility", rename_all = "UPPERCASE")]
#[serde(rename_all = "UPPERCASE")]
pub enum PostVisibility {
    #[sqlx(rename = "PUBLIC")]
    Public,
    #[sqlx(rename = "PRIVATE")]
    Private,
    #[sqlx(rename = "FRIEND")]
    Friend,
}

#[allow(unused)]
#[derive(Debug, Clone, FromRow)]
pub struct PostEntity {
    pub id: Uuid,
    pub user_id: Uuid,
    pub body: Option<String>,
    pub media: Option<String>,
    pub visibility: PostVisibility,
    pub likes: Vec<Uuid>,
    pub dislikes: Vec<Uuid>,
    pub created_at: chrono::DateTime<chrono::Utc>,
}
