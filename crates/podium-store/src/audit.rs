use crate::{Identity, LeaderboardId, Score, UnixTimestamp};

/// Kind of a committed mutation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum::Display, strum::EnumString)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum EventKind {
    /// A leaderboard was created.
    LeaderboardCreated,
    /// A participant record was written.
    ScoreUpdated,
    /// A leaderboard's activity flag was written.
    LeaderboardStatusChanged,
    /// An identity was granted the admin role.
    AdminAdded,
    /// An identity lost the admin role.
    AdminRemoved,
    /// A participant record was erased.
    UserRemoved,
    /// A participant's username was rewritten.
    UserRenamed,
    /// Ownership moved to a new identity.
    OwnershipTransferred,
}

/// Payload of a single committed mutation.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum AuditEvent {
    /// A leaderboard was created.
    LeaderboardCreated {
        /// Assigned id.
        id: LeaderboardId,
        /// Display name.
        name: String,
        /// Description.
        description: String,
        /// Creation timestamp.
        created_at: UnixTimestamp,
    },
    /// A participant record was written (first submission or overwrite).
    ScoreUpdated {
        /// Leaderboard the write targets.
        leaderboard_id: LeaderboardId,
        /// The scored identity.
        identity: Identity,
        /// Username as written.
        username: String,
        /// Score as written.
        score: Score,
    },
    /// A leaderboard's activity flag was written, possibly to its current
    /// value.
    LeaderboardStatusChanged {
        /// Leaderboard id.
        id: LeaderboardId,
        /// The flag as written.
        active: bool,
    },
    /// An identity was granted the admin role.
    AdminAdded {
        /// The granted identity.
        identity: Identity,
    },
    /// An identity lost the admin role.
    AdminRemoved {
        /// The revoked identity.
        identity: Identity,
    },
    /// A participant record was erased.
    UserRemoved {
        /// Leaderboard id.
        leaderboard_id: LeaderboardId,
        /// The erased identity.
        identity: Identity,
    },
    /// A participant's username was rewritten.
    UserRenamed {
        /// Leaderboard id.
        leaderboard_id: LeaderboardId,
        /// The renamed identity.
        identity: Identity,
        /// Username as written.
        new_username: String,
    },
    /// Ownership moved to a new identity. Covers the admin grant that may
    /// accompany the transfer; no separate [`AuditEvent::AdminAdded`] is
    /// recorded for it.
    OwnershipTransferred {
        /// The outgoing owner.
        previous_owner: Identity,
        /// The incoming owner.
        new_owner: Identity,
    },
}

impl AuditEvent {
    /// Get the kind of this event.
    pub fn kind(&self) -> EventKind {
        match self {
            Self::LeaderboardCreated { .. } => EventKind::LeaderboardCreated,
            Self::ScoreUpdated { .. } => EventKind::ScoreUpdated,
            Self::LeaderboardStatusChanged { .. } => EventKind::LeaderboardStatusChanged,
            Self::AdminAdded { .. } => EventKind::AdminAdded,
            Self::AdminRemoved { .. } => EventKind::AdminRemoved,
            Self::UserRemoved { .. } => EventKind::UserRemoved,
            Self::UserRenamed { .. } => EventKind::UserRenamed,
            Self::OwnershipTransferred { .. } => EventKind::OwnershipTransferred,
        }
    }
}

/// Sink for the registry's audit stream.
///
/// The registry calls [`record`](Self::record) synchronously after (never
/// before) a mutation commits, exactly once per committed mutation and never
/// for a failed operation. `seq` is the commit-order position, contiguous
/// from zero, so a consumer can detect gaps and reorderings.
pub trait AuditEmitter {
    /// Record one committed mutation.
    fn record(&mut self, seq: u64, event: AuditEvent);
}

/// Emitter that discards every event.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopEmitter;

impl AuditEmitter for NoopEmitter {
    fn record(&mut self, _seq: u64, _event: AuditEvent) {}
}

/// Emitter that keeps every event in memory.
///
/// Clones share the same log, so a test can hand one clone to the registry
/// and inspect the stream through another.
#[cfg(feature = "test")]
#[derive(Debug, Default, Clone)]
pub struct MemoryEmitter(std::sync::Arc<std::sync::Mutex<Vec<(u64, AuditEvent)>>>);

#[cfg(feature = "test")]
impl MemoryEmitter {
    /// Create an empty emitter.
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot the recorded stream in commit order.
    pub fn events(&self) -> Vec<(u64, AuditEvent)> {
        self.0.lock().expect("audit log poisoned").clone()
    }

    /// Number of recorded events.
    pub fn len(&self) -> usize {
        self.0.lock().expect("audit log poisoned").len()
    }

    /// Returns whether nothing has been recorded.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(feature = "test")]
impl AuditEmitter for MemoryEmitter {
    fn record(&mut self, seq: u64, event: AuditEvent) {
        self.0.lock().expect("audit log poisoned").push((seq, event));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_names_follow_the_event_variants() {
        let event = AuditEvent::AdminAdded {
            identity: Identity::new([3; 32]),
        };
        assert_eq!(event.kind(), EventKind::AdminAdded);
        assert_eq!(event.kind().to_string(), "AdminAdded");
        assert_eq!(
            "ScoreUpdated".parse::<EventKind>().unwrap(),
            EventKind::ScoreUpdated
        );
    }
}
