use std::collections::BTreeSet;

use uuid::Uuid;

use crate::{
    api::error,
    modules::post::{
        model::{InsertPost, PostResponse, PostUserRow, UpdatePost},
        repository::PostRepository,
        schema::PostEntity,
    },
};

const POST_COLUMNS: &str = r#"
    p.id, p.user_id, u.username, u.display_name, u.avatar_url,
    p.body, p.media, p.visibility, p.likes, p.dislikes, p.created_at
"#;

#[derive(Clone)]
pub struct PostRepositoryPg {
    pool: sqlx::PgPool,
}

impl PostRepositoryPg {
    pub fn new(pool: sqlx::PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait::async_trait]
impl PostRepository for PostRepositoryPg {
    async fn create(&self, post: &InsertPost) -> Result<Uuid, error::SystemError> {
        let id = Uuid::new_v7(uuid::Timestamp::now(uuid::NoContext));
        sqlx::query(
            "INSERT INTO posts (id, user_id, body, media, visibility) VALUES ($1, $2, $3, $4, $5)",
        )
        .bind(id)
        .bind(post.user_id)
        .bind(&post.body)
        .bind(&post.media)
        .bind(&post.visibility)
        .execute(&self.pool)
        .await?;
        Ok(id)
    }

    async fn find_by_id(&self, id: &Uuid) -> Result<Option<PostEntity>, error::SystemError> {
        let post = sqlx::query_as::<_, PostEntity>("SELECT * FROM posts WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(post)
    }

    async fn find_response_by_id(
        &self,
        id: &Uuid,
    ) -> Result<Option<PostResponse>, error::SystemError> {
        let row = sqlx::query_as::<_, PostUserRow>(&format!(
            r#"
            SELECT {POST_COLUMNS}
            FROM posts p
            JOIN users u ON u.id = p.user_id
            WHERE p.id = $1 AND u.deleted_at IS NULL
            "#
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.map(PostResponse::from))
    }

    async fn find_all(&self) -> Result<Vec<PostResponse>, error::SystemError> {
        let rows = sqlx::query_as::<_, PostUserRow>(&format!(
            r#"
            SELECT {POST_COLUMNS}
            FROM posts p
            JOIN users u ON u.id = p.user_id
            WHERE u.deleted_at IS NULL
            ORDER BY p.created_at DESC
            "#
        ))
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.into_iter().map(PostResponse::from).collect())
    }

    async fn update(&self, id: &Uuid, post: &UpdatePost) -> Result<PostEntity, error::SystemError> {
        let post = sqlx::query_as::<_, PostEntity>(
            r#"
            UPDATE posts
            SET
                body       = COALESCE($2, body),
                media      = COALESCE($3, media),
                visibility = COALESCE($4, visibility)
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(&post.body)
        .bind(&post.media)
        .bind(&post.visibility)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| error::SystemError::not_found("Post not found"))?;

        Ok(post)
    }

    async fn save_reactions(
        &self,
        id: &Uuid,
        likes: &BTreeSet<Uuid>,
        dislikes: &BTreeSet<Uuid>,
    ) -> Result<(), error::SystemError> {
        let likes = likes.iter().copied().collect::<Vec<_>>();
        let dislikes = dislikes.iter().copied().collect::<Vec<_>>();

        sqlx::query("UPDATE posts SET likes = $2, dislikes = $3 WHERE id = $1")
            .bind(id)
            .bind(&likes)
            .bind(&dislikes)
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}
