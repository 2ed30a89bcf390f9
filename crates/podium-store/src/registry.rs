use indexmap::map::Entry;
use indexmap::IndexMap;

use crate::{
    audit::{AuditEmitter, AuditEvent, NoopEmitter},
    board::{CreateLeaderboardParams, Leaderboard},
    clock::{Clock, SystemClock},
    participant::Participant,
    ranking::{rank_top_n, RankedEntry},
    roles::RoleRegistry,
    Error, Identity, LeaderboardId, Score,
};

/// State of a single leaderboard: metadata plus the participant table.
///
/// The table's key order is the participant index: insertion order is join
/// order, and removal swap-removes, so the order of the survivors may change.
#[derive(Debug)]
struct BoardState {
    meta: Leaderboard,
    participants: IndexMap<Identity, Participant>,
}

impl BoardState {
    fn new(meta: Leaderboard) -> Self {
        Self {
            meta,
            participants: IndexMap::new(),
        }
    }
}

/// Owns every leaderboard, participant record and role assignment.
///
/// This is the single-writer mutation surface: the host applies operations
/// one at a time through `&mut self`, each either fully committing (state
/// write plus one audit record) or failing with no state change. Callers are
/// identified by an [`Identity`] already authenticated by the host; the
/// registry only authorizes.
pub struct LeaderboardRegistry<E = NoopEmitter, C = SystemClock> {
    roles: RoleRegistry,
    boards: Vec<BoardState>,
    emitter: E,
    clock: C,
    next_seq: u64,
}

impl<E, C> LeaderboardRegistry<E, C>
where
    E: AuditEmitter,
    C: Clock,
{
    /// Create an empty registry owned by `owner`.
    ///
    /// # Errors
    /// Fails with [`Error::InvalidArgument`] if `owner` is the zero identity.
    pub fn new(owner: Identity, emitter: E, clock: C) -> crate::Result<Self> {
        Ok(Self {
            roles: RoleRegistry::new(owner)?,
            boards: Vec::new(),
            emitter,
            clock,
            next_seq: 0,
        })
    }

    /// Create a leaderboard and return its id.
    ///
    /// Admin-or-owner only. Ids are assigned sequentially from zero and never
    /// reused; the new board starts active.
    pub fn create_leaderboard(
        &mut self,
        caller: &Identity,
        params: CreateLeaderboardParams,
    ) -> crate::Result<LeaderboardId> {
        self.require_admin(caller)?;
        let CreateLeaderboardParams { name, description } = params;
        let id = self.boards.len() as LeaderboardId;
        let created_at = self.clock.unix_timestamp();
        let meta = Leaderboard::new(id, name.clone(), description.clone(), created_at);
        self.boards.push(BoardState::new(meta));
        self.commit(AuditEvent::LeaderboardCreated {
            id,
            name,
            description,
            created_at,
        });
        Ok(id)
    }

    /// Write a leaderboard's activity flag.
    ///
    /// Admin-or-owner only. Writing the current value is a state no-op but
    /// still commits and is recorded.
    pub fn set_status(
        &mut self,
        caller: &Identity,
        id: LeaderboardId,
        active: bool,
    ) -> crate::Result<()> {
        self.require_admin(caller)?;
        self.board_mut(id)?.meta.set_active(active);
        self.commit(AuditEvent::LeaderboardStatusChanged { id, active });
        Ok(())
    }

    /// Self-service score upsert: the caller is the scored identity.
    ///
    /// No role is required. The leaderboard must exist and be active. The
    /// first write for an identity appends it to the participant index;
    /// subsequent writes overwrite username, score and timestamp in place.
    pub fn submit_score(
        &mut self,
        caller: &Identity,
        id: LeaderboardId,
        username: impl Into<String>,
        score: Score,
    ) -> crate::Result<()> {
        self.upsert_score(id, *caller, username.into(), score)
    }

    /// Admin score upsert on behalf of any identity.
    ///
    /// Same semantics and preconditions as [`submit_score`](Self::submit_score),
    /// gated on admin-or-owner.
    pub fn set_score(
        &mut self,
        caller: &Identity,
        id: LeaderboardId,
        identity: Identity,
        username: impl Into<String>,
        score: Score,
    ) -> crate::Result<()> {
        self.require_admin(caller)?;
        self.upsert_score(id, identity, username.into(), score)
    }

    /// Erase a participant record.
    ///
    /// Admin-or-owner only. The record is removed entirely: the identity
    /// drops out of the index via swap-remove (the last entry moves into the
    /// vacated slot) and may later rejoin with a fresh record.
    pub fn remove_participant(
        &mut self,
        caller: &Identity,
        id: LeaderboardId,
        identity: &Identity,
    ) -> crate::Result<()> {
        self.require_admin(caller)?;
        let board = self.board_mut(id)?;
        board
            .participants
            .swap_remove(identity)
            .ok_or(Error::ParticipantNotFound)?;
        self.commit(AuditEvent::UserRemoved {
            leaderboard_id: id,
            identity: *identity,
        });
        Ok(())
    }

    /// Rewrite a participant's username, leaving score and timestamp alone.
    ///
    /// Admin-or-owner only; the participant must exist.
    pub fn rename_participant(
        &mut self,
        caller: &Identity,
        id: LeaderboardId,
        identity: &Identity,
        new_username: impl Into<String>,
    ) -> crate::Result<()> {
        self.require_admin(caller)?;
        let new_username = new_username.into();
        let participant = self
            .board_mut(id)?
            .participants
            .get_mut(identity)
            .ok_or(Error::ParticipantNotFound)?;
        participant.rename(new_username.clone());
        self.commit(AuditEvent::UserRenamed {
            leaderboard_id: id,
            identity: *identity,
            new_username,
        });
        Ok(())
    }

    /// Grant the admin role.
    ///
    /// Owner only; fails with [`Error::AlreadyAdmin`] if already granted.
    pub fn add_admin(&mut self, caller: &Identity, identity: Identity) -> crate::Result<()> {
        self.require_owner(caller)?;
        self.roles.add_admin(identity)?;
        self.commit(AuditEvent::AdminAdded { identity });
        Ok(())
    }

    /// Revoke the admin role.
    ///
    /// Owner only; the owner itself cannot be revoked.
    pub fn remove_admin(&mut self, caller: &Identity, identity: &Identity) -> crate::Result<()> {
        self.require_owner(caller)?;
        self.roles.remove_admin(identity)?;
        self.commit(AuditEvent::AdminRemoved {
            identity: *identity,
        });
        Ok(())
    }

    /// Transfer ownership to a non-zero identity.
    ///
    /// Owner only. The new owner is granted admin atomically with the
    /// transfer if it does not hold the role yet; the previous owner keeps
    /// its admin role.
    pub fn transfer_ownership(
        &mut self,
        caller: &Identity,
        new_owner: Identity,
    ) -> crate::Result<()> {
        self.require_owner(caller)?;
        let previous_owner = *self.roles.owner();
        self.roles.transfer_ownership(new_owner)?;
        self.commit(AuditEvent::OwnershipTransferred {
            previous_owner,
            new_owner,
        });
        Ok(())
    }

    fn upsert_score(
        &mut self,
        id: LeaderboardId,
        identity: Identity,
        username: String,
        score: Score,
    ) -> crate::Result<()> {
        let now = self.clock.unix_timestamp();
        let board = self.board_mut(id)?;
        if !board.meta.is_active() {
            return Err(Error::InactiveLeaderboard(id));
        }
        match board.participants.entry(identity) {
            Entry::Occupied(mut entry) => entry.get_mut().update(username.clone(), score, now),
            Entry::Vacant(entry) => {
                entry.insert(Participant::new(username.clone(), score, now));
            }
        }
        self.commit(AuditEvent::ScoreUpdated {
            leaderboard_id: id,
            identity,
            username,
            score,
        });
        Ok(())
    }

    fn require_admin(&self, caller: &Identity) -> crate::Result<()> {
        if self.roles.is_admin_or_owner(caller) {
            Ok(())
        } else {
            Err(Error::Unauthorized)
        }
    }

    fn require_owner(&self, caller: &Identity) -> crate::Result<()> {
        if self.roles.is_owner(caller) {
            Ok(())
        } else {
            Err(Error::Unauthorized)
        }
    }

    fn commit(&mut self, event: AuditEvent) {
        let seq = self.next_seq;
        self.next_seq += 1;
        tracing::debug!(seq, kind = %event.kind(), "committed mutation");
        self.emitter.record(seq, event);
    }
}

impl<E, C> LeaderboardRegistry<E, C> {
    /// Number of leaderboards ever created.
    pub fn leaderboard_count(&self) -> u64 {
        self.boards.len() as u64
    }

    /// Get a leaderboard's metadata. Reads ignore the activity flag.
    pub fn leaderboard_info(&self, id: LeaderboardId) -> crate::Result<&Leaderboard> {
        Ok(&self.board(id)?.meta)
    }

    /// Number of current participants on the leaderboard.
    pub fn participant_count(&self, id: LeaderboardId) -> crate::Result<usize> {
        Ok(self.board(id)?.participants.len())
    }

    /// Get a participant record, or `None` if the identity never joined or
    /// was removed.
    pub fn user_info(
        &self,
        id: LeaderboardId,
        identity: &Identity,
    ) -> crate::Result<Option<&Participant>> {
        Ok(self.board(id)?.participants.get(identity))
    }

    /// All participant identities in raw index order.
    ///
    /// This is join order only until a removal occurs; swap-remove reorders
    /// the survivors.
    pub fn all_participants(
        &self,
        id: LeaderboardId,
    ) -> crate::Result<impl Iterator<Item = &Identity>> {
        Ok(self.board(id)?.participants.keys())
    }

    /// Rank the leaderboard and return the top `n` rows.
    ///
    /// Scores descend; equal scores keep index-order precedence. `n = 0`
    /// returns an empty ranking and an oversized `n` returns every
    /// participant. Reads ignore the activity flag.
    pub fn top_n(&self, id: LeaderboardId, n: usize) -> crate::Result<Vec<RankedEntry>> {
        Ok(rank_top_n(&self.board(id)?.participants, n))
    }

    /// Get the role registry for authorization queries.
    pub fn roles(&self) -> &RoleRegistry {
        &self.roles
    }

    fn board(&self, id: LeaderboardId) -> crate::Result<&BoardState> {
        usize::try_from(id)
            .ok()
            .and_then(|ix| self.boards.get(ix))
            .ok_or(Error::LeaderboardNotFound(id))
    }

    fn board_mut(&mut self, id: LeaderboardId) -> crate::Result<&mut BoardState> {
        usize::try_from(id)
            .ok()
            .and_then(|ix| self.boards.get_mut(ix))
            .ok_or(Error::LeaderboardNotFound(id))
    }
}
