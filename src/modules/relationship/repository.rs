use std::collections::BTreeSet;

use uuid::Uuid;

use crate::api::error;
use crate::modules::relationship::model::PeerProfile;
use crate::modules::relationship::schema::AccountRecord;

/// Storage boundary of the relationship subsystem: the only component that
/// reads or writes the relationship columns of the account store.
#[async_trait::async_trait]
pub trait RelationshipRepository: Send + Sync {
    /// Loads both sides of a pair. `NotFound` if either id does not
    /// resolve; a transition is never attempted against a partial pair.
    async fn load_pair(
        &self,
        user_id: &Uuid,
        peer_id: &Uuid,
    ) -> Result<(AccountRecord, AccountRecord), error::SystemError>;

    /// Persists both sides atomically. `StaleRevision` if either record
    /// was modified since it was loaded; nothing is written in that case.
    async fn save_pair(
        &self,
        user: &AccountRecord,
        peer: &AccountRecord,
    ) -> Result<(), error::SystemError>;

    async fn load(&self, id: &Uuid) -> Result<AccountRecord, error::SystemError>;

    async fn profiles(
        &self,
        ids: &BTreeSet<Uuid>,
    ) -> Result<Vec<PeerProfile>, error::SystemError>;
}
