use crate::LeaderboardId;

/// Error type.
///
/// Every failure is a precondition violation detected before any state is
/// written, so an operation that returns an error leaves the registry
/// unchanged. None of these are transient.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// The caller lacks the role required by the operation.
    #[error("unauthorized: caller lacks the required role")]
    Unauthorized,
    /// The leaderboard id has not been assigned.
    #[error("leaderboard {0} not found")]
    LeaderboardNotFound(LeaderboardId),
    /// The participant does not exist on the leaderboard.
    #[error("participant not found")]
    ParticipantNotFound,
    /// A score write was attempted on a deactivated leaderboard.
    #[error("leaderboard {0} is inactive")]
    InactiveLeaderboard(LeaderboardId),
    /// Invalid argument.
    #[error("invalid argument: {0}")]
    InvalidArgument(&'static str),
    /// The identity already holds the admin role.
    #[error("identity is already an admin")]
    AlreadyAdmin,
    /// The identity does not hold the admin role.
    #[error("identity is not an admin")]
    NotAdmin,
    /// The current owner cannot be removed from the admin set.
    #[error("cannot remove the current owner from the admin set")]
    CannotRemoveOwner,
}
