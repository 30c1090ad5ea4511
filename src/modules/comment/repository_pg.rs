use uuid::Uuid;

use crate::{
    api::error,
    modules::comment::{
        model::{CommentResponse, CommentUserRow},
        repository::CommentRepository,
    },
};

const COMMENT_COLUMNS: &str = r#"
    c.id, c.post_id, c.user_id, u.username, u.display_name, u.avatar_url,
    c.body, c.created_at
"#;

#[derive(Clone)]
pub struct CommentRepositoryPg {
    pool: sqlx::PgPool,
}

impl CommentRepositoryPg {
    pub fn new(pool: sqlx::PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait::async_trait]
impl CommentRepository for CommentRepositoryPg {
    async fn create(
        &self,
        user_id: &Uuid,
        post_id: &Uuid,
        body: &str,
    ) -> Result<Uuid, error::SystemError> {
        let id = Uuid::new_v7(uuid::Timestamp::now(uuid::NoContext));
        sqlx::query("INSERT INTO comments (id, user_id, post_id, body) VALUES ($1, $2, $3, $4)")
            .bind(id)
            .bind(user_id)
            .bind(post_id)
            .bind(body)
            .execute(&self.pool)
            .await?;
        Ok(id)
    }

    async fn find_response_by_id(
        &self,
        id: &Uuid,
    ) -> Result<Option<CommentResponse>, error::SystemError> {
        let row = sqlx::query_as::<_, CommentUserRow>(&format!(
            r#"
            SELECT {COMMENT_COLUMNS}
            FROM comments c
            JOIN users u ON u.id = c.user_id
            WHERE c.id = $1
            "#
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.map(CommentResponse::from))
    }

    async fn find_by_post(
        &self,
        post_id: &Uuid,
    ) -> Result<Vec<CommentResponse>, error::SystemError> {
        let rows = sqlx::query_as::<_, CommentUserRow>(&format!(
            r#"
            SELECT {COMMENT_COLUMNS}
            FROM comments c
            JOIN users u ON u.id = c.user_id
            WHERE c.post_id = $1
            ORDER BY c.created_at
            "#
        ))
        .bind(post_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.into_iter().map(CommentResponse::from).collect())
    }
}
