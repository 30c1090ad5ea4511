//! In-memory repository used by the service tests. Honors the same
//! revision-guard contract as the Postgres implementation: a save against a
//! record whose revision moved fails without writing anything.

use std::collections::{BTreeSet, HashMap};
use std::sync::Mutex;

use uuid::Uuid;

use crate::api::error;
use crate::modules::relationship::{
    model::PeerProfile,
    repository::RelationshipRepository,
    schema::{AccountRecord, RelationshipSets},
};

#[derive(Default)]
pub struct RelationshipRepositoryMem {
    accounts: Mutex<HashMap<Uuid, AccountRecord>>,
}

impl RelationshipRepositoryMem {
    pub fn with_accounts(ids: &[Uuid]) -> Self {
        let accounts = ids
            .iter()
            .map(|id| {
                (
                    *id,
                    AccountRecord {
                        id: *id,
                        username: format!("user-{id}"),
                        display_name: format!("User {id}"),
                        avatar_url: None,
                        sets: RelationshipSets::default(),
                        rev: 0,
                    },
                )
            })
            .collect();
        Self { accounts: Mutex::new(accounts) }
    }

    pub fn snapshot(&self, id: &Uuid) -> AccountRecord {
        self.accounts.lock().unwrap().get(id).cloned().expect("account seeded")
    }
}

#[async_trait::async_trait]
impl RelationshipRepository for RelationshipRepositoryMem {
    async fn load_pair(
        &self,
        user_id: &Uuid,
        peer_id: &Uuid,
    ) -> Result<(AccountRecord, AccountRecord), error::SystemError> {
        let accounts = self.accounts.lock().unwrap();
        match (accounts.get(user_id), accounts.get(peer_id)) {
            (Some(user), Some(peer)) => Ok((user.clone(), peer.clone())),
            _ => Err(error::SystemError::not_found("User not found")),
        }
    }

    async fn save_pair(
        &self,
        user: &AccountRecord,
        peer: &AccountRecord,
    ) -> Result<(), error::SystemError> {
        let mut accounts = self.accounts.lock().unwrap();

        // Both revisions are checked before either record is replaced, so a
        // stale save leaves the store untouched.
        for record in [user, peer] {
            match accounts.get(&record.id) {
                Some(current) if current.rev == record.rev => {}
                Some(_) => return Err(error::SystemError::StaleRevision),
                None => return Err(error::SystemError::not_found("User not found")),
            }
        }

        for record in [user, peer] {
            let mut updated = record.clone();
            updated.rev += 1;
            accounts.insert(updated.id, updated);
        }

        Ok(())
    }

    async fn load(&self, id: &Uuid) -> Result<AccountRecord, error::SystemError> {
        self.accounts
            .lock()
            .unwrap()
            .get(id)
            .cloned()
            .ok_or_else(|| error::SystemError::not_found("User not found"))
    }

    async fn profiles(
        &self,
        ids: &BTreeSet<Uuid>,
    ) -> Result<Vec<PeerProfile>, error::SystemError> {
        let accounts = self.accounts.lock().unwrap();
        Ok(ids
            .iter()
            .filter_map(|id| accounts.get(id))
            .map(|a| PeerProfile {
                id: a.id,
                username: a.username.clone(),
                display_name: a.display_name.clone(),
                avatar_url: a.avatar_url.clone(),
            })
            .collect())
    }
}
