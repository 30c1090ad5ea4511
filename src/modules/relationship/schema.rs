use std::collections::BTreeSet;

use uuid::Uuid;

use crate::modules::user::schema::UserEntity;

/// The three relationship-membership sets of one account. Every
/// relationship fact between two accounts lives in these sets on both
/// sides; there is no separate relationship record.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RelationshipSets {
    pub friends: BTreeSet<Uuid>,
    pub outgoing_requests: BTreeSet<Uuid>,
    pub incoming_requests: BTreeSet<Uuid>,
}

/// One side of a pair as loaded for a transition: identity and display
/// fields for the response payload, the membership sets the state machine
/// works on, and the revision guarding the write-back.
#[derive(Debug, Clone)]
pub struct AccountRecord {
    pub id: Uuid,
    pub username: String,
    pub display_name: String,
    pub avatar_url: Option<String>,
    pub sets: RelationshipSets,
    pub rev: i64,
}

impl From<UserEntity> for AccountRecord {
    fn from(user: UserEntity) -> Self {
        AccountRecord {
            id: user.id,
            username: user.username,
            display_name: user.display_name,
            avatar_url: user.avatar_url,
            sets: RelationshipSets {
                friends: user.friends.into_iter().collect(),
                outgoing_requests: user.outgoing_requests.into_iter().collect(),
                incoming_requests: user.incoming_requests.into_iter().collect(),
            },
            rev: user.relationship_rev,
        }
    }
}
