use actix_web::{delete, get, post, web, HttpRequest};
use uuid::Uuid;

use crate::{
    api::{error, success},
    middlewares::get_extensions,
    modules::relationship::{
        model::{PeerProfile, PendingRequestsResponse, RelationshipResponse},
        repository_pg::RelationshipRepositoryPg,
        service::RelationshipService,
    },
    utils::Claims,
};

pub type RelationshipSvc = RelationshipService<RelationshipRepositoryPg>;

#[post("/requests/{user_id}")]
pub async fn send_friend_request(
    relationship_service: web::Data<RelationshipSvc>,
    target_id: web::Path<Uuid>,
    req: HttpRequest,
) -> Result<success::Success<RelationshipResponse>, error::Error> {
    let user_id = get_extensions::<Claims>(&req)?.sub;
    let response = relationship_service.send_request(user_id, *target_id).await?;
    Ok(success::Success::created(Some(response)))
}

#[post("/requests/{user_id}/accept")]
pub async fn accept_friend_request(
    relationship_service: web::Data<RelationshipSvc>,
    requester_id: web::Path<Uuid>,
    req: HttpRequest,
) -> Result<success::Success<RelationshipResponse>, error::Error> {
    let user_id = get_extensions::<Claims>(&req)?.sub;
    let response = relationship_service.accept_request(user_id, *requester_id).await?;
    Ok(success::Success::ok(Some(response)))
}

#[post("/requests/{user_id}/reject")]
pub async fn reject_friend_request(
    relationship_service: web::Data<RelationshipSvc>,
    requester_id: web::Path<Uuid>,
    req: HttpRequest,
) -> Result<success::Success<RelationshipResponse>, error::Error> {
    let user_id = get_extensions::<Claims>(&req)?.sub;
    let response = relationship_service.reject_request(user_id, *requester_id).await?;
    Ok(success::Success::ok(Some(response)))
}

#[delete("/requests/{user_id}")]
pub async fn cancel_friend_request(
    relationship_service: web::Data<RelationshipSvc>,
    target_id: web::Path<Uuid>,
    req: HttpRequest,
) -> Result<success::Success<RelationshipResponse>, error::Error> {
    let user_id = get_extensions::<Claims>(&req)?.sub;
    let response = relationship_service.cancel_request(user_id, *target_id).await?;
    Ok(success::Success::ok(Some(response)))
}

#[get("/")]
pub async fn list_friends(
    relationship_service: web::Data<RelationshipSvc>,
    req: HttpRequest,
) -> Result<success::Success<Vec<PeerProfile>>, error::Error> {
    let user_id = get_extensions::<Claims>(&req)?.sub;
    let friends = relationship_service.list_friends(user_id).await?;
    Ok(success::Success::ok(Some(friends)).message("Friends retrieved successfully"))
}

#[get("/requests")]
pub async fn list_friend_requests(
    relationship_service: web::Data<RelationshipSvc>,
    req: HttpRequest,
) -> Result<success::Success<PendingRequestsResponse>, error::Error> {
    let user_id = get_extensions::<Claims>(&req)?.sub;
    let requests = relationship_service.list_requests(user_id).await?;
    Ok(success::Success::ok(Some(requests)).message("Friend requests retrieved successfully"))
}
