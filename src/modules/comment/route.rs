use crate::modules::comment::handle::*;
use actix_web::{Scope, web::scope};

// Mounted inside the `/posts` scope; a sibling scope sharing the `/posts`
// prefix would never be reached, actix resolves scopes without backtracking.
pub fn configure() -> Scope {
    scope("/{post_id}/comments").service(create_comment).service(get_comments)
}
