use crate::modules::relationship::handle::*;
use actix_web::web::{ServiceConfig, scope};

pub fn configure(cfg: &mut ServiceConfig) {
    cfg.service(
        scope("/friends")
            .service(send_friend_request)
            .service(accept_friend_request)
            .service(reject_friend_request)
            .service(cancel_friend_request)
            .service(list_friend_requests)
            .service(list_friends),
    );
}
