use uuid::Uuid;

use crate::api::error;
use crate::modules::comment::model::CommentResponse;

#[async_trait::async_trait]
pub trait CommentRepository {
    async fn create(
        &self,
        user_id: &Uuid,
        post_id: &Uuid,
        body: &str,
    ) -> Result<Uuid, error::SystemError>;

    async fn find_response_by_id(
        &self,
        id: &Uuid,
    ) -> Result<Option<CommentResponse>, error::SystemError>;

    async fn find_by_post(
        &self,
        post_id: &Uuid,
    ) -> Result<Vec<CommentResponse>, error::SystemError>;
}
