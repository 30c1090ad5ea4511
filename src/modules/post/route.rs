use crate::modules::{comment, post::handle::*};
use actix_web::web::{ServiceConfig, scope};

pub fn configure(cfg: &mut ServiceConfig) {
    cfg.service(
        scope("/posts")
            .service(create_post)
            .service(get_posts)
            .service(comment::route::configure())
            .service(react_to_post)
            .service(update_post)
            .service(get_post),
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::{App, http::StatusCode, test};
    use uuid::Uuid;

    fn uid() -> Uuid {
        Uuid::new_v7(uuid::Timestamp::now(uuid::NoContext))
    }

    // No app data is registered, so a matched route fails in extraction
    // (500) while an unmatched path falls through to 404. The comment
    // paths must resolve inside the posts scope instead of 404ing.
    #[actix_web::test]
    async fn comment_paths_resolve_under_the_posts_scope() {
        let app = test::init_service(App::new().configure(configure)).await;
        let id = uid();

        for path in [format!("/posts/{id}"), format!("/posts/{id}/comments")] {
            let req = test::TestRequest::get().uri(&path).to_request();
            let res = test::call_service(&app, req).await;
            assert_ne!(res.status(), StatusCode::NOT_FOUND, "{path} did not match a route");
        }

        let req = test::TestRequest::get().uri(&format!("/posts/{id}/unknown")).to_request();
        let res = test::call_service(&app, req).await;
        assert_eq!(res.status(), StatusCode::NOT_FOUND);
    }
}
