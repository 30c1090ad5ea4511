use actix_web::{get, patch, post, web, HttpRequest};
use uuid::Uuid;

use crate::{
    api::{error, success},
    middlewares::get_extensions,
    modules::post::{
        model::{CreatePostModel, PostResponse, ReactionModel, UpdatePostModel},
        repository_pg::PostRepositoryPg,
        service::PostService,
    },
    utils::{Claims, ValidatedJson},
};

pub type PostSvc = PostService<PostRepositoryPg>;

#[post("")]
pub async fn create_post(
    post_service: web::Data<PostSvc>,
    body: ValidatedJson<CreatePostModel>,
    req: HttpRequest,
) -> Result<success::Success<PostResponse>, error::Error> {
    let user_id = get_extensions::<Claims>(&req)?.sub;
    let post = post_service.create_post(user_id, body.0).await?;
    Ok(success::Success::created(Some(post)).message("Uploaded successfully"))
}

#[get("")]
pub async fn get_posts(
    post_service: web::Data<PostSvc>,
) -> Result<success::Success<Vec<PostResponse>>, error::Error> {
    let posts = post_service.get_posts().await?;
    Ok(success::Success::ok(Some(posts)))
}

#[get("/{post_id}")]
pub async fn get_post(
    post_service: web::Data<PostSvc>,
    post_id: web::Path<Uuid>,
) -> Result<success::Success<PostResponse>, error::Error> {
    let post = post_service.get_post(*post_id).await?;
    Ok(success::Success::ok(Some(post)))
}

#[patch("/{post_id}")]
pub async fn update_post(
    post_service: web::Data<PostSvc>,
    post_id: web::Path<Uuid>,
    body: ValidatedJson<UpdatePostModel>,
    req: HttpRequest,
) -> Result<success::Success<PostResponse>, error::Error> {
    let user_id = get_extensions::<Claims>(&req)?.sub;
    let post = post_service.update_post(user_id, *post_id, body.0).await?;
    Ok(success::Success::ok(Some(post)).message("Post updated successfully"))
}

#[post("/{post_id}/reactions")]
pub async fn react_to_post(
    post_service: web::Data<PostSvc>,
    post_id: web::Path<Uuid>,
    body: ValidatedJson<ReactionModel>,
    req: HttpRequest,
) -> Result<success::Success<PostResponse>, error::Error> {
    let user_id = get_extensions::<Claims>(&req)?.sub;
    let post = post_service.react(user_id, *post_id, body.0.kind).await?;
    Ok(success::Success::ok(Some(post)))
}
