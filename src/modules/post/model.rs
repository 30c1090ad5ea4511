use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use sqlx::prelude::FromRow;
use uuid::Uuid;
use validator::Validate;

use crate::modules::post::schema::PostVisibility;

#[derive(Deserialize, Validate)]
pub struct CreatePostModel {
    #[validate(length(min = 1, max = 2000, message = "Post body must be 1-2000 characters"))]
    pub body: Option<String>,
    pub media: Option<String>,
    pub visibility: Option<PostVisibility>,
}

#[derive(Deserialize, Validate)]
pub struct UpdatePostModel {
    #[validate(length(min = 1, max = 2000, message = "Post body must be 1-2000 characters"))]
    pub body: Option<String>,
    pub media: Option<String>,
    pub visibility: Option<PostVisibility>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReactionKind {
    Like,
    Dislike,
}

#[derive(Deserialize, Validate)]
pub struct ReactionModel {
    #[serde(rename = "type")]
    pub kind: ReactionKind,
}

pub struct InsertPost {
    pub user_id: Uuid,
    pub body: Option<String>,
    pub media: Option<String>,
    pub visibility: PostVisibility,
}

pub struct UpdatePost {
    pub body: Option<String>,
    pub media: Option<String>,
    pub visibility: Option<PostVisibility>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostAuthor {
    pub id: Uuid,
    pub username: String,
    pub display_name: String,
    pub avatar_url: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct PostResponse {
    pub id: Uuid,
    pub author: PostAuthor,
    pub body: Option<String>,
    pub media: Option<String>,
    pub visibility: PostVisibility,
    pub likes: BTreeSet<Uuid>,
    pub dislikes: BTreeSet<Uuid>,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

#[derive(FromRow)]
pub struct PostUserRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub username: String,
    pub display_name: String,
    pub avatar_url: Option<String>,
    pub body: Option<String>,
    pub media: Option<String>,
    pub visibility: PostVisibility,
    pub likes: Vec<Uuid>,
    pub dislikes: Vec<Uuid>,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

impl From<PostUserRow> for PostResponse {
    fn from(row: PostUserRow) -> Self {
        PostResponse {
            id: row.id,
            author: PostAuthor {
                id: row.user_id,
                username: row.username,
                display_name: row.display_name,
                avatar_url: row.avatar_url,
            },
            body: row.body,
            media: row.media,
            visibility: row.visibility,
            likes: row.likes.into_iter().collect(),
            dislikes: row.dislikes.into_iter().collect(),
            created_at: row.created_at,
        }
    }
}

/// Reaction toggle: reacting again removes the reaction, reacting the other
/// way moves it. A user id never sits in both sets.
pub fn apply_reaction(
    likes: &mut BTreeSet<Uuid>,
    dislikes: &mut BTreeSet<Uuid>,
    user_id: &Uuid,
    kind: ReactionKind,
) {
    match kind {
        ReactionKind::Like => {
            if !likes.remove(user_id) {
                likes.insert(*user_id);
                dislikes.remove(user_id);
            }
        }
        ReactionKind::Dislike => {
            if !dislikes.remove(user_id) {
                dislikes.insert(*user_id);
                likes.remove(user_id);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn uid() -> Uuid {
        Uuid::new_v7(uuid::Timestamp::now(uuid::NoContext))
    }

    #[test]
    fn like_toggles_on_and_off() {
        let user = uid();
        let (mut likes, mut dislikes) = (BTreeSet::new(), BTreeSet::new());

        apply_reaction(&mut likes, &mut dislikes, &user, ReactionKind::Like);
        assert!(likes.contains(&user));

        apply_reaction(&mut likes, &mut dislikes, &user, ReactionKind::Like);
        assert!(likes.is_empty() && dislikes.is_empty());
    }

    #[test]
    fn opposite_reaction_moves_the_user() {
        let user = uid();
        let (mut likes, mut dislikes) = (BTreeSet::new(), BTreeSet::new());

        apply_reaction(&mut likes, &mut dislikes, &user, ReactionKind::Like);
        apply_reaction(&mut likes, &mut dislikes, &user, ReactionKind::Dislike);

        assert!(!likes.contains(&user));
        assert!(dislikes.contains(&user));
    }

    #[test]
    fn reactions_are_independent_per_user() {
        let (u1, u2) = (uid(), uid());
        let (mut likes, mut dislikes) = (BTreeSet::new(), BTreeSet::new());

        apply_reaction(&mut likes, &mut dislikes, &u1, ReactionKind::Like);
        apply_reaction(&mut likes, &mut dislikes, &u2, ReactionKind::Dislike);

        assert!(likes.contains(&u1));
        assert!(dislikes.contains(&u2));
    }
}
