use actix_web::{get, post, web, HttpRequest};
use uuid::Uuid;

use crate::{
    api::{error, success},
    middlewares::get_extensions,
    modules::comment::{
        model::{CommentResponse, CreateCommentModel},
        repository_pg::CommentRepositoryPg,
        service::CommentService,
    },
    modules::post::repository_pg::PostRepositoryPg,
    utils::{Claims, ValidatedJson},
};

pub type CommentSvc = CommentService<CommentRepositoryPg, PostRepositoryPg>;

#[post("")]
pub async fn create_comment(
    comment_service: web::Data<CommentSvc>,
    post_id: web::Path<Uuid>,
    body: ValidatedJson<CreateCommentModel>,
    req: HttpRequest,
) -> Result<success::Success<CommentResponse>, error::Error> {
    let user_id = get_extensions::<Claims>(&req)?.sub;
    let comment = comment_service.create_comment(user_id, *post_id, body.0.body).await?;
    Ok(success::Success::created(Some(comment)).message("Commented successfully"))
}

#[get("")]
pub async fn get_comments(
    comment_service: web::Data<CommentSvc>,
    post_id: web::Path<Uuid>,
) -> Result<success::Success<Vec<CommentResponse>>, error::Error> {
    let comments = comment_service.get_comments(*post_id).await?;
    Ok(success::Success::ok(Some(comments)))
}
