use podium_store::{
    CreateLeaderboardParams, Identity, Leaderboard, LeaderboardId, Participant, RankedEntry, Score,
};
use tokio::sync::oneshot;

/// Reply channel carrying the registry's own result.
pub(crate) type Reply<T> = oneshot::Sender<podium_store::Result<T>>;

/// One queued operation. Mutations and queries travel the same queue, so
/// every command observes only fully-committed state.
#[derive(strum::IntoStaticStr)]
pub(crate) enum Command {
    CreateLeaderboard {
        caller: Identity,
        params: CreateLeaderboardParams,
        reply: Reply<LeaderboardId>,
    },
    SetStatus {
        caller: Identity,
        id: LeaderboardId,
        active: bool,
        reply: Reply<()>,
    },
    SubmitScore {
        caller: Identity,
        id: LeaderboardId,
        username: String,
        score: Score,
        reply: Reply<()>,
    },
    SetScore {
        caller: Identity,
        id: LeaderboardId,
        identity: Identity,
        username: String,
        score: Score,
        reply: Reply<()>,
    },
    RemoveParticipant {
        caller: Identity,
        id: LeaderboardId,
        identity: Identity,
        reply: Reply<()>,
    },
    RenameParticipant {
        caller: Identity,
        id: LeaderboardId,
        identity: Identity,
        new_username: String,
        reply: Reply<()>,
    },
    AddAdmin {
        caller: Identity,
        identity: Identity,
        reply: Reply<()>,
    },
    RemoveAdmin {
        caller: Identity,
        identity: Identity,
        reply: Reply<()>,
    },
    TransferOwnership {
        caller: Identity,
        new_owner: Identity,
        reply: Reply<()>,
    },
    LeaderboardCount {
        reply: oneshot::Sender<u64>,
    },
    LeaderboardInfo {
        id: LeaderboardId,
        reply: Reply<Leaderboard>,
    },
    ParticipantCount {
        id: LeaderboardId,
        reply: Reply<usize>,
    },
    UserInfo {
        id: LeaderboardId,
        identity: Identity,
        reply: Reply<Option<Participant>>,
    },
    AllParticipants {
        id: LeaderboardId,
        reply: Reply<Vec<Identity>>,
    },
    TopN {
        id: LeaderboardId,
        n: usize,
        reply: Reply<Vec<RankedEntry>>,
    },
    Owner {
        reply: oneshot::Sender<Identity>,
    },
    Admins {
        reply: oneshot::Sender<Vec<Identity>>,
    },
}
