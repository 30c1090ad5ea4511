//! Pure decision logic for the friend-relationship pair. No I/O: callers
//! load both accounts, apply a transition here, and persist the result.
//!
//! Send/accept/reject/cancel all funnel through one function so the
//! precondition checks and the mirrored-set bookkeeping exist exactly once.

use uuid::Uuid;

use crate::api::error;
use crate::modules::relationship::schema::RelationshipSets;

/// State of an ordered pair (viewer, peer), derived from the viewer's sets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PairState {
    None,
    PendingOut,
    PendingIn,
    Friends,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    Send,
    Accept,
    Reject,
    Cancel,
}

#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransitionError {
    #[error("You can't send a request to yourself!")]
    SelfTarget,
    #[error("Already friend!")]
    AlreadyFriends,
    #[error("Request already sent!")]
    RequestAlreadyPending,
    #[error("No friend request found!")]
    NoPendingRequest,
}

impl From<TransitionError> for error::SystemError {
    fn from(err: TransitionError) -> Self {
        error::SystemError::bad_request(err.to_string())
    }
}

pub fn pair_state(sets: &RelationshipSets, peer_id: &Uuid) -> PairState {
    if sets.friends.contains(peer_id) {
        PairState::Friends
    } else if sets.outgoing_requests.contains(peer_id) {
        PairState::PendingOut
    } else if sets.incoming_requests.contains(peer_id) {
        PairState::PendingIn
    } else {
        PairState::None
    }
}

/// Applies `transition` as initiated by `user` against `peer`, mutating
/// both sides' sets. Total over its inputs: when the precondition does not
/// hold, an error is returned and neither side has been touched.
pub fn apply(
    transition: Transition,
    user_id: &Uuid,
    user: &mut RelationshipSets,
    peer_id: &Uuid,
    peer: &mut RelationshipSets,
) -> Result<(), TransitionError> {
    if user_id == peer_id {
        return Err(TransitionError::SelfTarget);
    }

    match transition {
        Transition::Send => match pair_state(user, peer_id) {
            PairState::Friends => return Err(TransitionError::AlreadyFriends),
            PairState::PendingOut | PairState::PendingIn => {
                return Err(TransitionError::RequestAlreadyPending);
            }
            PairState::None => {
                user.outgoing_requests.insert(*peer_id);
                peer.incoming_requests.insert(*user_id);
            }
        },
        Transition::Accept => resolve(user_id, user, peer_id, peer, true)?,
        Transition::Reject => resolve(user_id, user, peer_id, peer, false)?,
        Transition::Cancel => {
            if !user.outgoing_requests.remove(peer_id) {
                return Err(TransitionError::NoPendingRequest);
            }
            peer.incoming_requests.remove(user_id);
        }
    }

    debug_assert!(pair_symmetric(user_id, user, peer_id, peer));
    Ok(())
}

/// Accept and reject share their precondition and clear the same pending
/// entries; the only difference is whether the friendship edge is written.
fn resolve(
    user_id: &Uuid,
    user: &mut RelationshipSets,
    peer_id: &Uuid,
    peer: &mut RelationshipSets,
    befriend: bool,
) -> Result<(), TransitionError> {
    if !user.incoming_requests.remove(peer_id) {
        return Err(TransitionError::NoPendingRequest);
    }
    peer.outgoing_requests.remove(user_id);

    if befriend {
        user.friends.insert(*peer_id);
        peer.friends.insert(*user_id);
    }

    Ok(())
}

/// Symmetry and exclusivity check for one pair: friendship agrees on both
/// sides, pending entries are mirrored duals, each side sees the peer in at
/// most one set, and neither side references itself.
pub fn pair_symmetric(
    a_id: &Uuid,
    a: &RelationshipSets,
    b_id: &Uuid,
    b: &RelationshipSets,
) -> bool {
    let friends_agree = a.friends.contains(b_id) == b.friends.contains(a_id);
    let out_mirrored = a.outgoing_requests.contains(b_id) == b.incoming_requests.contains(a_id);
    let in_mirrored = a.incoming_requests.contains(b_id) == b.outgoing_requests.contains(a_id);

    let exclusive = |sets: &RelationshipSets, peer: &Uuid| {
        [
            sets.friends.contains(peer),
            sets.outgoing_requests.contains(peer),
            sets.incoming_requests.contains(peer),
        ]
        .into_iter()
        .filter(|m| *m)
        .count()
            <= 1
    };

    let no_self = |sets: &RelationshipSets, own: &Uuid| {
        !sets.friends.contains(own)
            && !sets.outgoing_requests.contains(own)
            && !sets.incoming_requests.contains(own)
    };

    friends_agree
        && out_mirrored
        && in_mirrored
        && exclusive(a, b_id)
        && exclusive(b, a_id)
        && no_self(a, a_id)
        && no_self(b, b_id)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn uid() -> Uuid {
        Uuid::new_v7(uuid::Timestamp::now(uuid::NoContext))
    }

    fn ids() -> (Uuid, Uuid) {
        (uid(), uid())
    }

    fn assert_symmetric(a_id: &Uuid, a: &RelationshipSets, b_id: &Uuid, b: &RelationshipSets) {
        assert!(pair_symmetric(a_id, a, b_id, b), "pair invariants violated: {a:?} / {b:?}");
    }

    #[test]
    fn send_creates_mirrored_pending_entries() {
        let (u1, u2) = ids();
        let (mut a, mut b) = (RelationshipSets::default(), RelationshipSets::default());

        apply(Transition::Send, &u1, &mut a, &u2, &mut b).unwrap();

        assert!(a.outgoing_requests.contains(&u2));
        assert!(b.incoming_requests.contains(&u1));
        assert!(a.friends.is_empty() && b.friends.is_empty());
        assert_eq!(pair_state(&a, &u2), PairState::PendingOut);
        assert_eq!(pair_state(&b, &u1), PairState::PendingIn);
        assert_symmetric(&u1, &a, &u2, &b);
    }

    #[test]
    fn send_to_self_is_rejected() {
        let u = uid();
        let mut a = RelationshipSets::default();
        let mut b = RelationshipSets::default();

        let err = apply(Transition::Send, &u, &mut a, &u, &mut b).unwrap_err();
        assert_eq!(err, TransitionError::SelfTarget);
        assert_eq!(a, RelationshipSets::default());
    }

    #[test]
    fn duplicate_send_is_rejected_without_mutation() {
        let (u1, u2) = ids();
        let (mut a, mut b) = (RelationshipSets::default(), RelationshipSets::default());

        apply(Transition::Send, &u1, &mut a, &u2, &mut b).unwrap();
        let before = (a.clone(), b.clone());

        let err = apply(Transition::Send, &u1, &mut a, &u2, &mut b).unwrap_err();
        assert_eq!(err, TransitionError::RequestAlreadyPending);
        assert_eq!((a, b), before);
    }

    #[test]
    fn send_against_incoming_request_is_rejected() {
        // u2 already asked first; u1's send must not create a second edge.
        let (u1, u2) = ids();
        let (mut a, mut b) = (RelationshipSets::default(), RelationshipSets::default());
        apply(Transition::Send, &u2, &mut b, &u1, &mut a).unwrap();

        let err = apply(Transition::Send, &u1, &mut a, &u2, &mut b).unwrap_err();
        assert_eq!(err, TransitionError::RequestAlreadyPending);
    }

    #[test]
    fn accept_promotes_to_friends_and_clears_pending() {
        let (u1, u2) = ids();
        let (mut a, mut b) = (RelationshipSets::default(), RelationshipSets::default());

        apply(Transition::Send, &u1, &mut a, &u2, &mut b).unwrap();
        apply(Transition::Accept, &u2, &mut b, &u1, &mut a).unwrap();

        assert!(a.friends.contains(&u2) && b.friends.contains(&u1));
        assert!(a.outgoing_requests.is_empty() && a.incoming_requests.is_empty());
        assert!(b.outgoing_requests.is_empty() && b.incoming_requests.is_empty());
        assert_eq!(pair_state(&a, &u2), PairState::Friends);
        assert_symmetric(&u1, &a, &u2, &b);
    }

    #[test]
    fn send_after_friendship_is_rejected() {
        let (u1, u2) = ids();
        let (mut a, mut b) = (RelationshipSets::default(), RelationshipSets::default());
        apply(Transition::Send, &u1, &mut a, &u2, &mut b).unwrap();
        apply(Transition::Accept, &u2, &mut b, &u1, &mut a).unwrap();

        let err = apply(Transition::Send, &u1, &mut a, &u2, &mut b).unwrap_err();
        assert_eq!(err, TransitionError::AlreadyFriends);
    }

    #[test]
    fn second_accept_is_rejected() {
        let (u1, u2) = ids();
        let (mut a, mut b) = (RelationshipSets::default(), RelationshipSets::default());
        apply(Transition::Send, &u1, &mut a, &u2, &mut b).unwrap();
        apply(Transition::Accept, &u2, &mut b, &u1, &mut a).unwrap();

        let err = apply(Transition::Accept, &u2, &mut b, &u1, &mut a).unwrap_err();
        assert_eq!(err, TransitionError::NoPendingRequest);
    }

    #[test]
    fn accept_requires_an_incoming_request() {
        // The sender cannot accept their own outgoing request.
        let (u1, u2) = ids();
        let (mut a, mut b) = (RelationshipSets::default(), RelationshipSets::default());
        apply(Transition::Send, &u1, &mut a, &u2, &mut b).unwrap();

        let err = apply(Transition::Accept, &u1, &mut a, &u2, &mut b).unwrap_err();
        assert_eq!(err, TransitionError::NoPendingRequest);
        assert_eq!(pair_state(&a, &u2), PairState::PendingOut);
    }

    #[test]
    fn reject_clears_pending_without_friendship() {
        let (u1, u2) = ids();
        let (mut a, mut b) = (RelationshipSets::default(), RelationshipSets::default());
        apply(Transition::Send, &u1, &mut a, &u2, &mut b).unwrap();
        apply(Transition::Reject, &u2, &mut b, &u1, &mut a).unwrap();

        assert_eq!(a, RelationshipSets::default());
        assert_eq!(b, RelationshipSets::default());
    }

    #[test]
    fn cancel_round_trips_to_the_exact_prior_state() {
        let (u1, u2) = ids();
        let u3 = uid();

        // Pre-existing unrelated facts must survive the round trip.
        let mut a = RelationshipSets::default();
        a.friends.insert(u3);
        let mut b = RelationshipSets::default();
        b.incoming_requests.insert(u3);
        let before = (a.clone(), b.clone());

        apply(Transition::Send, &u1, &mut a, &u2, &mut b).unwrap();
        apply(Transition::Cancel, &u1, &mut a, &u2, &mut b).unwrap();

        assert_eq!((a, b), before);
    }

    #[test]
    fn cancel_requires_an_outgoing_request() {
        let (u1, u2) = ids();
        let (mut a, mut b) = (RelationshipSets::default(), RelationshipSets::default());
        apply(Transition::Send, &u1, &mut a, &u2, &mut b).unwrap();

        // The receiver cancels nothing; they can only accept or reject.
        let err = apply(Transition::Cancel, &u2, &mut b, &u1, &mut a).unwrap_err();
        assert_eq!(err, TransitionError::NoPendingRequest);
        assert_eq!(pair_state(&b, &u1), PairState::PendingIn);
    }

    #[test]
    fn reject_then_resend_is_allowed() {
        let (u1, u2) = ids();
        let (mut a, mut b) = (RelationshipSets::default(), RelationshipSets::default());
        apply(Transition::Send, &u1, &mut a, &u2, &mut b).unwrap();
        apply(Transition::Reject, &u2, &mut b, &u1, &mut a).unwrap();

        apply(Transition::Send, &u2, &mut b, &u1, &mut a).unwrap();
        assert_eq!(pair_state(&b, &u1), PairState::PendingOut);
        assert_symmetric(&u1, &a, &u2, &b);
    }
}
