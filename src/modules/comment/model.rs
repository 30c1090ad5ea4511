use serde::{Deserialize, Serialize};
use sqlx::prelude::FromRow;
use uuid::Uuid;
use validator::Validate;

#[derive(Deserialize, Validate)]
pub struct CreateCommentModel {
    #[validate(length(min = 1, max = 1000, message = "Comment body must be 1-1000 characters"))]
    pub body: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct CommentAuthor {
    pub id: Uuid,
    pub username: String,
    pub display_name: String,
    pub avatar_url: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CommentResponse {
    pub id: Uuid,
    pub post_id: Uuid,
    pub author: CommentAuthor,
    pub body: String,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

#[derive(FromRow)]
pub struct CommentUserRow {
    pub id: Uuid,
    pub post_id: Uuid,
    pub user_id: Uuid,
    pub username: String,
    pub display_name: String,
    pub avatar_url: Option<String>,
    pub body: String,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

impl From<CommentUserRow> for CommentResponse {
    fn from(row: CommentUserRow) -> Self {
        CommentResponse {
            id: row.id,
            post_id: row.post_id,
            author: CommentAuthor {
                id: row.user_id,
                username: row.username,
                display_name: row.display_name,
                avatar_url: row.avatar_url,
            },
            body: row.body,
            created_at: row.created_at,
        }
    }
}
