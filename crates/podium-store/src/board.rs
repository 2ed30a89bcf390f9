use typed_builder::TypedBuilder;

use crate::{LeaderboardId, UnixTimestamp};

/// Metadata for a single leaderboard.
///
/// Everything but the `active` flag is fixed at creation. Leaderboards are
/// never deleted and their ids are never reused; a retired board is simply
/// deactivated.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Leaderboard {
    id: LeaderboardId,
    name: String,
    description: String,
    created_at: UnixTimestamp,
    active: bool,
}

impl Leaderboard {
    pub(crate) fn new(
        id: LeaderboardId,
        name: String,
        description: String,
        created_at: UnixTimestamp,
    ) -> Self {
        Self {
            id,
            name,
            description,
            created_at,
            active: true,
        }
    }

    /// Get the id.
    pub fn id(&self) -> LeaderboardId {
        self.id
    }

    /// Get the display name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Get the description.
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Get the creation timestamp.
    pub fn created_at(&self) -> UnixTimestamp {
        self.created_at
    }

    /// Returns whether the leaderboard currently accepts score writes.
    pub fn is_active(&self) -> bool {
        self.active
    }

    pub(crate) fn set_active(&mut self, active: bool) {
        self.active = active;
    }
}

/// Parameters for creating a leaderboard.
#[derive(Debug, Clone, TypedBuilder)]
pub struct CreateLeaderboardParams {
    /// Display name.
    #[builder(setter(into))]
    pub name: String,
    /// Free-form description.
    #[builder(default, setter(into))]
    pub description: String,
}
