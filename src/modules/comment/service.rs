use std::sync::Arc;

use uuid::Uuid;

use crate::api::error;
use crate::modules::comment::{model::CommentResponse, repository::CommentRepository};
use crate::modules::post::repository::PostRepository;

#[derive(Clone)]
pub struct CommentService<C, P>
where
    C: CommentRepository + Send + Sync,
    P: PostRepository + Send + Sync,
{
    comment_repo: Arc<C>,
    post_repo: Arc<P>,
}

impl<C, P> CommentService<C, P>
where
    C: CommentRepository + Send + Sync,
    P: PostRepository + Send + Sync,
{
    pub fn with_dependencies(comment_repo: Arc<C>, post_repo: Arc<P>) -> Self {
        CommentService { comment_repo, post_repo }
    }

    pub async fn create_comment(
        &self,
        user_id: Uuid,
        post_id: Uuid,
        body: String,
    ) -> Result<CommentResponse, error::SystemError> {
        if self.post_repo.find_by_id(&post_id).await?.is_none() {
            return Err(error::SystemError::not_found("Post not found"));
        }

        let id = self.comment_repo.create(&user_id, &post_id, &body).await?;
        self.comment_repo
            .find_response_by_id(&id)
            .await?
            .ok_or_else(|| error::SystemError::not_found("Comment not found"))
    }

    pub async fn get_comments(
        &self,
        post_id: Uuid,
    ) -> Result<Vec<CommentResponse>, error::SystemError> {
        if self.post_repo.find_by_id(&post_id).await?.is_none() {
            return Err(error::SystemError::not_found("Post not found"));
        }

        self.comment_repo.find_by_post(&post_id).await
    }
}
