use std::sync::Arc;

use uuid::Uuid;

use crate::api::error;
use crate::modules::post::{
    model::{
        apply_reaction, CreatePostModel, InsertPost, PostResponse, ReactionKind, UpdatePost,
        UpdatePostModel,
    },
    repository::PostRepository,
    schema::PostVisibility,
};

#[derive(Clone)]
pub struct PostService<P>
where
    P: PostRepository + Send + Sync,
{
    repo: Arc<P>,
}

impl<P> PostService<P>
where
    P: PostRepository + Send + Sync,
{
    pub fn with_dependencies(repo: Arc<P>) -> Self {
        PostService { repo }
    }

    pub async fn create_post(
        &self,
        user_id: Uuid,
        post: CreatePostModel,
    ) -> Result<PostResponse, error::SystemError> {
        if post.body.is_none() && post.media.is_none() {
            return Err(error::SystemError::bad_request("Invalid data"));
        }

        let insert = InsertPost {
            user_id,
            body: post.body,
            media: post.media,
            visibility: post.visibility.unwrap_or(PostVisibility::Public),
        };

        let id = self.repo.create(&insert).await?;
        self.repo
            .find_response_by_id(&id)
            .await?
            .ok_or_else(|| error::SystemError::not_found("Post not found"))
    }

    pub async fn get_posts(&self) -> Result<Vec<PostResponse>, error::SystemError> {
        self.repo.find_all().await
    }

    pub async fn get_post(&self, id: Uuid) -> Result<PostResponse, error::SystemError> {
        self.repo
            .find_response_by_id(&id)
            .await?
            .ok_or_else(|| error::SystemError::not_found("Post not found"))
    }

    pub async fn update_post(
        &self,
        user_id: Uuid,
        post_id: Uuid,
        update: UpdatePostModel,
    ) -> Result<PostResponse, error::SystemError> {
        let post = self
            .repo
            .find_by_id(&post_id)
            .await?
            .ok_or_else(|| error::SystemError::not_found("Post not found"))?;

        if post.user_id != user_id {
            return Err(error::SystemError::forbidden("You can only update your own posts"));
        }

        self.repo
            .update(
                &post_id,
                &UpdatePost {
                    body: update.body,
                    media: update.media,
                    visibility: update.visibility,
                },
            )
            .await?;

        self.get_post(post_id).await
    }

    pub async fn react(
        &self,
        user_id: Uuid,
        post_id: Uuid,
        kind: ReactionKind,
    ) -> Result<PostResponse, error::SystemError> {
        let post = self
            .repo
            .find_by_id(&post_id)
            .await?
            .ok_or_else(|| error::SystemError::not_found("Post not found"))?;

        let mut likes = post.likes.into_iter().collect();
        let mut dislikes = post.dislikes.into_iter().collect();
        apply_reaction(&mut likes, &mut dislikes, &user_id, kind);

        self.repo.save_reactions(&post_id, &likes, &dislikes).await?;
        self.get_post(post_id).await
    }
}
