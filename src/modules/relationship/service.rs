use std::sync::Arc;

use uuid::Uuid;

use crate::api::error;
use crate::modules::relationship::{
    model::{PeerProfile, PendingRequestsResponse, RelationshipResponse},
    repository::RelationshipRepository,
    state::{self, Transition, TransitionError},
};

/// How many times a transition is re-run when its guarded write loses a
/// race. Each retry reloads the pair, so a request that became invalid in
/// the meantime is rejected instead of re-applied.
const MAX_SAVE_ATTEMPTS: u32 = 3;

pub struct RelationshipService<R>
where
    R: RelationshipRepository,
{
    repo: Arc<R>,
}

// Not derived: the repository is behind an Arc, so the service is cloneable
// whether or not `R` itself is.
impl<R> Clone for RelationshipService<R>
where
    R: RelationshipRepository,
{
    fn clone(&self) -> Self {
        Self { repo: self.repo.clone() }
    }
}

impl<R> RelationshipService<R>
where
    R: RelationshipRepository,
{
    pub fn with_dependencies(repo: Arc<R>) -> Self {
        RelationshipService { repo }
    }

    pub async fn send_request(
        &self,
        user_id: Uuid,
        target_id: Uuid,
    ) -> Result<RelationshipResponse, error::SystemError> {
        if user_id == target_id {
            return Err(TransitionError::SelfTarget.into());
        }
        self.transition(user_id, target_id, Transition::Send, "Friend request sent").await
    }

    pub async fn accept_request(
        &self,
        user_id: Uuid,
        requester_id: Uuid,
    ) -> Result<RelationshipResponse, error::SystemError> {
        self.transition(user_id, requester_id, Transition::Accept, "Friend request accepted").await
    }

    pub async fn reject_request(
        &self,
        user_id: Uuid,
        requester_id: Uuid,
    ) -> Result<RelationshipResponse, error::SystemError> {
        self.transition(user_id, requester_id, Transition::Reject, "Friend request rejected").await
    }

    pub async fn cancel_request(
        &self,
        user_id: Uuid,
        target_id: Uuid,
    ) -> Result<RelationshipResponse, error::SystemError> {
        self.transition(user_id, target_id, Transition::Cancel, "Friend request cancelled").await
    }

    pub async fn list_friends(
        &self,
        user_id: Uuid,
    ) -> Result<Vec<PeerProfile>, error::SystemError> {
        let account = self.repo.load(&user_id).await?;
        self.repo.profiles(&account.sets.friends).await
    }

    pub async fn list_requests(
        &self,
        user_id: Uuid,
    ) -> Result<PendingRequestsResponse, error::SystemError> {
        let account = self.repo.load(&user_id).await?;
        let (incoming, outgoing) = tokio::try_join!(
            self.repo.profiles(&account.sets.incoming_requests),
            self.repo.profiles(&account.sets.outgoing_requests),
        )?;
        Ok(PendingRequestsResponse { incoming, outgoing })
    }

    /// Read both, decide, write both. A rejected transition never reaches
    /// the write; a write that lost a revision race is retried from the
    /// read so no interleaving can persist an asymmetric pair.
    async fn transition(
        &self,
        user_id: Uuid,
        peer_id: Uuid,
        transition: Transition,
        message: &'static str,
    ) -> Result<RelationshipResponse, error::SystemError> {
        for attempt in 1..=MAX_SAVE_ATTEMPTS {
            let (mut user, mut peer) = self.repo.load_pair(&user_id, &peer_id).await?;

            state::apply(transition, &user_id, &mut user.sets, &peer_id, &mut peer.sets)?;

            match self.repo.save_pair(&user, &peer).await {
                Ok(()) => {
                    return Ok(RelationshipResponse {
                        message: message.into(),
                        user: user.into(),
                        friend: peer.into(),
                    });
                }
                Err(error::SystemError::StaleRevision) if attempt < MAX_SAVE_ATTEMPTS => {
                    log::warn!(
                        "relationship write for pair ({user_id}, {peer_id}) lost a race, retrying"
                    );
                }
                Err(e) => return Err(e),
            }
        }

        Err(error::SystemError::StaleRevision)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::modules::relationship::repository_mem::RelationshipRepositoryMem;
    use crate::modules::relationship::schema::AccountRecord;
    use crate::modules::relationship::state::pair_symmetric;

    fn uid() -> Uuid {
        Uuid::new_v7(uuid::Timestamp::now(uuid::NoContext))
    }

    fn service_with_users(
        ids: &[Uuid],
    ) -> (RelationshipService<RelationshipRepositoryMem>, Arc<RelationshipRepositoryMem>) {
        let repo = Arc::new(RelationshipRepositoryMem::with_accounts(ids));
        (RelationshipService::with_dependencies(repo.clone()), repo)
    }

    fn assert_pair_symmetric(a: &AccountRecord, b: &AccountRecord) {
        assert!(pair_symmetric(&a.id, &a.sets, &b.id, &b.sets));
    }

    fn message_of(err: error::SystemError) -> String {
        match err {
            error::SystemError::BadRequest(msg) => msg.into_owned(),
            other => panic!("expected BadRequest, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn send_persists_mirrored_pending_pair() {
        let (u1, u2) = (uid(), uid());
        let (service, repo) = service_with_users(&[u1, u2]);

        let response = service.send_request(u1, u2).await.unwrap();

        assert_eq!(response.message, "Friend request sent");
        assert!(response.user.outgoing_requests.contains(&u2));
        assert!(response.friend.incoming_requests.contains(&u1));

        let (a, b) = (repo.snapshot(&u1), repo.snapshot(&u2));
        assert!(a.sets.outgoing_requests.contains(&u2));
        assert!(b.sets.incoming_requests.contains(&u1));
        assert_pair_symmetric(&a, &b);
    }

    #[tokio::test]
    async fn send_to_self_is_rejected_before_any_read() {
        let u1 = uid();
        let (service, _) = service_with_users(&[u1]);

        let err = service.send_request(u1, u1).await.unwrap_err();
        assert_eq!(message_of(err), "You can't send a request to yourself!");
    }

    #[tokio::test]
    async fn send_to_unknown_account_is_not_found() {
        let u1 = uid();
        let (service, repo) = service_with_users(&[u1]);

        let err = service.send_request(u1, uid()).await.unwrap_err();
        assert!(matches!(err, error::SystemError::NotFound(_)));
        // Nothing was written for the half-resolved pair.
        assert_eq!(repo.snapshot(&u1).rev, 0);
    }

    #[tokio::test]
    async fn accept_flow_reaches_friends_on_both_sides() {
        let (u1, u2) = (uid(), uid());
        let (service, repo) = service_with_users(&[u1, u2]);

        service.send_request(u1, u2).await.unwrap();
        let response = service.accept_request(u2, u1).await.unwrap();

        assert_eq!(response.message, "Friend request accepted");
        let (a, b) = (repo.snapshot(&u1), repo.snapshot(&u2));
        assert!(a.sets.friends.contains(&u2) && b.sets.friends.contains(&u1));
        assert!(a.sets.outgoing_requests.is_empty() && b.sets.incoming_requests.is_empty());
        assert_pair_symmetric(&a, &b);

        let err = service.send_request(u1, u2).await.unwrap_err();
        assert_eq!(message_of(err), "Already friend!");
    }

    #[tokio::test]
    async fn second_accept_is_rejected_and_persists_nothing() {
        let (u1, u2) = (uid(), uid());
        let (service, repo) = service_with_users(&[u1, u2]);

        service.send_request(u1, u2).await.unwrap();
        service.accept_request(u2, u1).await.unwrap();
        let revs = (repo.snapshot(&u1).rev, repo.snapshot(&u2).rev);

        let err = service.accept_request(u2, u1).await.unwrap_err();
        assert_eq!(message_of(err), "No friend request found!");
        assert_eq!((repo.snapshot(&u1).rev, repo.snapshot(&u2).rev), revs);
    }

    #[tokio::test]
    async fn reject_clears_the_pair_without_error() {
        let (u1, u2) = (uid(), uid());
        let (service, repo) = service_with_users(&[u1, u2]);

        service.send_request(u1, u2).await.unwrap();
        let response = service.reject_request(u2, u1).await.unwrap();

        assert_eq!(response.message, "Friend request rejected");
        let (a, b) = (repo.snapshot(&u1), repo.snapshot(&u2));
        assert!(a.sets.friends.is_empty() && b.sets.friends.is_empty());
        assert!(a.sets.outgoing_requests.is_empty() && b.sets.incoming_requests.is_empty());
    }

    #[tokio::test]
    async fn send_then_cancel_leaves_no_residue() {
        let (u1, u2) = (uid(), uid());
        let (service, repo) = service_with_users(&[u1, u2]);
        let before = (repo.snapshot(&u1).sets.clone(), repo.snapshot(&u2).sets.clone());

        service.send_request(u1, u2).await.unwrap();
        service.cancel_request(u1, u2).await.unwrap();

        assert_eq!((repo.snapshot(&u1).sets, repo.snapshot(&u2).sets), before);
    }

    #[tokio::test]
    async fn cancel_without_outgoing_request_is_rejected() {
        let (u1, u2) = (uid(), uid());
        let (service, _) = service_with_users(&[u1, u2]);

        let err = service.cancel_request(u1, u2).await.unwrap_err();
        assert_eq!(message_of(err), "No friend request found!");
    }

    #[tokio::test]
    async fn stale_save_is_refused_by_the_repository() {
        let (u1, u2) = (uid(), uid());
        let (service, repo) = service_with_users(&[u1, u2]);

        // Snapshot the pair, let a real transition commit, then try to save
        // the outdated snapshot: the guard must reject it.
        let (stale_user, stale_peer) = repo.load_pair(&u1, &u2).await.unwrap();
        service.send_request(u1, u2).await.unwrap();

        let err = repo.save_pair(&stale_user, &stale_peer).await.unwrap_err();
        assert!(matches!(err, error::SystemError::StaleRevision));

        let (a, b) = (repo.snapshot(&u1), repo.snapshot(&u2));
        assert!(a.sets.outgoing_requests.contains(&u2));
        assert_pair_symmetric(&a, &b);
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn concurrent_sends_produce_exactly_one_pending_pair() {
        let (u1, u2) = (uid(), uid());
        let (service, repo) = service_with_users(&[u1, u2]);

        let s1 = service.clone();
        let s2 = service.clone();
        let first = tokio::spawn(async move { s1.send_request(u1, u2).await });
        let second = tokio::spawn(async move { s2.send_request(u1, u2).await });

        let results = [first.await.unwrap(), second.await.unwrap()];
        let successes = results.iter().filter(|r| r.is_ok()).count();
        assert_eq!(successes, 1, "exactly one of two racing sends must win");

        let (a, b) = (repo.snapshot(&u1), repo.snapshot(&u2));
        assert_eq!(a.sets.outgoing_requests.len(), 1);
        assert_eq!(b.sets.incoming_requests.len(), 1);
        assert_pair_symmetric(&a, &b);
    }

    #[tokio::test]
    async fn list_friends_and_requests_reflect_committed_state() {
        let (u1, u2, u3) = (uid(), uid(), uid());
        let (service, _) = service_with_users(&[u1, u2, u3]);

        service.send_request(u1, u2).await.unwrap();
        service.accept_request(u2, u1).await.unwrap();
        service.send_request(u3, u1).await.unwrap();

        let friends = service.list_friends(u1).await.unwrap();
        assert_eq!(friends.len(), 1);
        assert_eq!(friends[0].id, u2);

        let requests = service.list_requests(u1).await.unwrap();
        assert_eq!(requests.incoming.len(), 1);
        assert_eq!(requests.incoming[0].id, u3);
        assert!(requests.outgoing.is_empty());
    }
}
