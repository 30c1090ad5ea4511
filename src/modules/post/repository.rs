use std::collections::BTreeSet;

use uuid::Uuid;

use crate::api::error;
use crate::modules::post::model::{InsertPost, PostResponse, UpdatePost};
use crate::modules::post::schema::PostEntity;

#[async_trait::async_trait]
pub trait PostRepository {
    async fn create(&self, post: &InsertPost) -> Result<Uuid, error::SystemError>;

    async fn find_by_id(&self, id: &Uuid) -> Result<Option<PostEntity>, error::SystemError>;

    /// Post joined with its author's public profile.
    async fn find_response_by_id(
        &self,
        id: &Uuid,
    ) -> Result<Option<PostResponse>, error::SystemError>;

    async fn find_all(&self) -> Result<Vec<PostResponse>, error::SystemError>;

    async fn update(&self, id: &Uuid, post: &UpdatePost) -> Result<PostEntity, error::SystemError>;

    async fn save_reactions(
        &self,
        id: &Uuid,
        likes: &BTreeSet<Uuid>,
        dislikes: &BTreeSet<Uuid>,
    ) -> Result<(), error::SystemError>;
}
