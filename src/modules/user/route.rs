use crate::modules::user::handle::*;
use actix_web::web::{ServiceConfig, scope};

pub fn public_api_configure(cfg: &mut ServiceConfig) {
    cfg.service(scope("/auth").service(sign_up).service(sign_in).service(refresh).service(sign_out));
}

pub fn configure(cfg: &mut ServiceConfig) {
    cfg.service(
        scope("/users")
            .service(get_profile)
            .service(search_users)
            .service(update_user)
            .service(delete_user)
            .service(get_user),
    );
}
