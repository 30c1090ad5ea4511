use std::borrow::Cow;
use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use sqlx::prelude::FromRow;
use uuid::Uuid;

use crate::modules::relationship::schema::AccountRecord;

/// Public-safe view of one participant after a committed transition.
/// Carries the fresh membership sets so the caller can update its UI
/// without a follow-up fetch. Never contains credential fields.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccountView {
    pub id: Uuid,
    pub username: String,
    pub display_name: String,
    pub avatar_url: Option<String>,
    pub friends: BTreeSet<Uuid>,
    pub outgoing_requests: BTreeSet<Uuid>,
    pub incoming_requests: BTreeSet<Uuid>,
}

impl From<AccountRecord> for AccountView {
    fn from(record: AccountRecord) -> Self {
        AccountView {
            id: record.id,
            username: record.username,
            display_name: record.display_name,
            avatar_url: record.avatar_url,
            friends: record.sets.friends,
            outgoing_requests: record.sets.outgoing_requests,
            incoming_requests: record.sets.incoming_requests,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct RelationshipResponse {
    pub message: Cow<'static, str>,
    pub user: AccountView,
    pub friend: AccountView,
}

/// Minimal profile used when listing a user's relations.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct PeerProfile {
    pub id: Uuid,
    pub username: String,
    pub display_name: String,
    pub avatar_url: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct PendingRequestsResponse {
    pub incoming: Vec<PeerProfile>,
    pub outgoing: Vec<PeerProfile>,
}
