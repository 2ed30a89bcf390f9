#![deny(missing_docs)]
#![deny(unreachable_pub)]

//! # Podium Store
//!
//! The state-transition and ranking core of a multi-tenant leaderboard
//! store: independently-managed ranking tables, each holding per-participant
//! scores, governed by an owner/admin role hierarchy.
//!
//! The core is a pure, synchronous state machine. Every mutation is applied
//! atomically by a single logical writer and recorded, in commit order, to an
//! injected [`AuditEmitter`]. Time comes from an injected [`Clock`] and the
//! caller identity is an opaque token supplied by the host, so the core
//! itself is fully deterministic.

/// Error type.
pub mod error;

/// Caller identity.
pub mod identity;

/// Roles.
pub mod roles;

/// Leaderboard metadata.
pub mod board;

/// Participant records.
pub mod participant;

/// Ranking queries.
pub mod ranking;

/// Audit events.
pub mod audit;

/// Time source.
pub mod clock;

/// Leaderboard registry.
pub mod registry;

pub use crate::{
    audit::{AuditEmitter, AuditEvent, EventKind, NoopEmitter},
    board::{CreateLeaderboardParams, Leaderboard},
    clock::{Clock, ManualClock, SystemClock},
    error::Error,
    identity::Identity,
    participant::Participant,
    ranking::RankedEntry,
    registry::LeaderboardRegistry,
    roles::RoleRegistry,
};

#[cfg(feature = "test")]
pub use crate::audit::MemoryEmitter;

/// Result type.
pub type Result<T> = std::result::Result<T, Error>;

/// Leaderboard identifier. Assigned sequentially from zero and never reused.
pub type LeaderboardId = u64;

/// Participant score. A 256-bit unsigned integer.
pub type Score = ruint::aliases::U256;

/// Unix timestamp in seconds.
pub type UnixTimestamp = i64;
