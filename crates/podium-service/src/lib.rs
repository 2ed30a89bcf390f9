#![deny(missing_docs)]
#![deny(unreachable_pub)]

//! # Podium Service
//!
//! Single-writer execution front-end for a [`LeaderboardRegistry`]. A worker
//! task exclusively owns the registry and drains a bounded command queue, so
//! every mutation is applied atomically in a total order and readers only
//! ever observe fully-committed state. [`ServiceHandle`]s are cheap to clone
//! and safe to share across tasks.
//!
//! ```no_run
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! use podium_service::{Service, ServiceConfig};
//! use podium_store::{
//!     CreateLeaderboardParams, Identity, LeaderboardRegistry, NoopEmitter, Score, SystemClock,
//! };
//!
//! let owner = Identity::new([1; 32]);
//! let registry = LeaderboardRegistry::new(owner, NoopEmitter, SystemClock)?;
//! let (service, handle) = Service::new(registry, ServiceConfig::default());
//! let _worker = service.spawn();
//!
//! let id = handle
//!     .create_leaderboard(owner, CreateLeaderboardParams::builder().name("Sprint1").build())
//!     .await?;
//! handle.submit_score(owner, id, "alice", Score::from(100u64)).await?;
//! # Ok(())
//! # }
//! ```

/// Error type.
pub mod error;

mod command;

use command::{Command, Reply};
use podium_store::{
    AuditEmitter, Clock, CreateLeaderboardParams, Identity, Leaderboard, LeaderboardId,
    LeaderboardRegistry, NoopEmitter, Participant, RankedEntry, Score, SystemClock,
};
use tokio::sync::{mpsc, oneshot};
use typed_builder::TypedBuilder;

pub use crate::error::ServiceError;

/// Result type.
pub type Result<T> = std::result::Result<T, ServiceError>;

/// Configuration for the command queue.
#[derive(Debug, Clone, Copy, TypedBuilder)]
pub struct ServiceConfig {
    /// Capacity of the bounded command queue. Submitters back-pressure once
    /// this many commands are in flight.
    #[builder(default = ServiceConfig::DEFAULT_CAPACITY)]
    pub capacity: usize,
}

impl ServiceConfig {
    /// Default queue capacity.
    pub const DEFAULT_CAPACITY: usize = 256;
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self::builder().build()
    }
}

/// Worker that exclusively owns a [`LeaderboardRegistry`] and applies queued
/// commands one at a time, to completion, in arrival order.
pub struct Service<E = NoopEmitter, C = SystemClock> {
    registry: LeaderboardRegistry<E, C>,
    rx: mpsc::Receiver<Command>,
}

impl<E, C> Service<E, C>
where
    E: AuditEmitter,
    C: Clock,
{
    /// Wrap a registry and return the worker together with a handle to it.
    pub fn new(registry: LeaderboardRegistry<E, C>, config: ServiceConfig) -> (Self, ServiceHandle) {
        let (tx, rx) = mpsc::channel(config.capacity);
        (Self { registry, rx }, ServiceHandle { tx })
    }

    /// Drain commands until every handle has been dropped, then return the
    /// registry for inspection or persistence.
    pub async fn run(mut self) -> LeaderboardRegistry<E, C> {
        tracing::info!("leaderboard service started");
        while let Some(command) = self.rx.recv().await {
            self.handle(command);
        }
        tracing::info!("leaderboard service stopped");
        self.registry
    }

    /// Spawn [`run`](Self::run) onto the current tokio runtime.
    pub fn spawn(self) -> tokio::task::JoinHandle<LeaderboardRegistry<E, C>>
    where
        E: Send + 'static,
        C: Send + 'static,
    {
        tokio::spawn(self.run())
    }

    fn handle(&mut self, command: Command) {
        let name: &'static str = (&command).into();
        tracing::trace!(command = name, "processing command");
        // A dropped reply receiver means the submitter went away; the
        // mutation still commits, only the reply is discarded.
        match command {
            Command::CreateLeaderboard {
                caller,
                params,
                reply,
            } => send(reply, self.registry.create_leaderboard(&caller, params)),
            Command::SetStatus {
                caller,
                id,
                active,
                reply,
            } => send(reply, self.registry.set_status(&caller, id, active)),
            Command::SubmitScore {
                caller,
                id,
                username,
                score,
                reply,
            } => send(reply, self.registry.submit_score(&caller, id, username, score)),
            Command::SetScore {
                caller,
                id,
                identity,
                username,
                score,
                reply,
            } => send(
                reply,
                self.registry.set_score(&caller, id, identity, username, score),
            ),
            Command::RemoveParticipant {
                caller,
                id,
                identity,
                reply,
            } => send(reply, self.registry.remove_participant(&caller, id, &identity)),
            Command::RenameParticipant {
                caller,
                id,
                identity,
                new_username,
                reply,
            } => send(
                reply,
                self.registry
                    .rename_participant(&caller, id, &identity, new_username),
            ),
            Command::AddAdmin {
                caller,
                identity,
                reply,
            } => send(reply, self.registry.add_admin(&caller, identity)),
            Command::RemoveAdmin {
                caller,
                identity,
                reply,
            } => send(reply, self.registry.remove_admin(&caller, &identity)),
            Command::TransferOwnership {
                caller,
                new_owner,
                reply,
            } => send(reply, self.registry.transfer_ownership(&caller, new_owner)),
            Command::LeaderboardCount { reply } => {
                let _ = reply.send(self.registry.leaderboard_count());
            }
            Command::LeaderboardInfo { id, reply } => send(
                reply,
                self.registry.leaderboard_info(id).map(Clone::clone),
            ),
            Command::ParticipantCount { id, reply } => {
                send(reply, self.registry.participant_count(id))
            }
            Command::UserInfo {
                id,
                identity,
                reply,
            } => send(
                reply,
                self.registry
                    .user_info(id, &identity)
                    .map(|record| record.cloned()),
            ),
            Command::AllParticipants { id, reply } => send(
                reply,
                self.registry
                    .all_participants(id)
                    .map(|identities| identities.copied().collect()),
            ),
            Command::TopN { id, n, reply } => send(reply, self.registry.top_n(id, n)),
            Command::Owner { reply } => {
                let _ = reply.send(*self.registry.roles().owner());
            }
            Command::Admins { reply } => {
                let _ = reply.send(self.registry.roles().admins().copied().collect());
            }
        }
    }
}

fn send<T>(reply: Reply<T>, result: podium_store::Result<T>) {
    let _ = reply.send(result);
}

/// Cloneable handle submitting commands to a [`Service`] worker.
///
/// Every method fails with [`ServiceError::Closed`] once the worker has
/// stopped.
#[derive(Debug, Clone)]
pub struct ServiceHandle {
    tx: mpsc::Sender<Command>,
}

impl ServiceHandle {
    /// Create a leaderboard and return its id.
    pub async fn create_leaderboard(
        &self,
        caller: Identity,
        params: CreateLeaderboardParams,
    ) -> crate::Result<LeaderboardId> {
        let (reply, rx) = oneshot::channel();
        self.submit(Command::CreateLeaderboard {
            caller,
            params,
            reply,
        })
        .await?;
        recv(rx).await
    }

    /// Write a leaderboard's activity flag.
    pub async fn set_status(
        &self,
        caller: Identity,
        id: LeaderboardId,
        active: bool,
    ) -> crate::Result<()> {
        let (reply, rx) = oneshot::channel();
        self.submit(Command::SetStatus {
            caller,
            id,
            active,
            reply,
        })
        .await?;
        recv(rx).await
    }

    /// Self-service score upsert for the calling identity.
    pub async fn submit_score(
        &self,
        caller: Identity,
        id: LeaderboardId,
        username: impl Into<String>,
        score: Score,
    ) -> crate::Result<()> {
        let (reply, rx) = oneshot::channel();
        self.submit(Command::SubmitScore {
            caller,
            id,
            username: username.into(),
            score,
            reply,
        })
        .await?;
        recv(rx).await
    }

    /// Admin score upsert on behalf of any identity.
    pub async fn set_score(
        &self,
        caller: Identity,
        id: LeaderboardId,
        identity: Identity,
        username: impl Into<String>,
        score: Score,
    ) -> crate::Result<()> {
        let (reply, rx) = oneshot::channel();
        self.submit(Command::SetScore {
            caller,
            id,
            identity,
            username: username.into(),
            score,
            reply,
        })
        .await?;
        recv(rx).await
    }

    /// Erase a participant record.
    pub async fn remove_participant(
        &self,
        caller: Identity,
        id: LeaderboardId,
        identity: Identity,
    ) -> crate::Result<()> {
        let (reply, rx) = oneshot::channel();
        self.submit(Command::RemoveParticipant {
            caller,
            id,
            identity,
            reply,
        })
        .await?;
        recv(rx).await
    }

    /// Rewrite a participant's username.
    pub async fn rename_participant(
        &self,
        caller: Identity,
        id: LeaderboardId,
        identity: Identity,
        new_username: impl Into<String>,
    ) -> crate::Result<()> {
        let (reply, rx) = oneshot::channel();
        self.submit(Command::RenameParticipant {
            caller,
            id,
            identity,
            new_username: new_username.into(),
            reply,
        })
        .await?;
        recv(rx).await
    }

    /// Grant the admin role.
    pub async fn add_admin(&self, caller: Identity, identity: Identity) -> crate::Result<()> {
        let (reply, rx) = oneshot::channel();
        self.submit(Command::AddAdmin {
            caller,
            identity,
            reply,
        })
        .await?;
        recv(rx).await
    }

    /// Revoke the admin role.
    pub async fn remove_admin(&self, caller: Identity, identity: Identity) -> crate::Result<()> {
        let (reply, rx) = oneshot::channel();
        self.submit(Command::RemoveAdmin {
            caller,
            identity,
            reply,
        })
        .await?;
        recv(rx).await
    }

    /// Transfer ownership to a non-zero identity.
    pub async fn transfer_ownership(
        &self,
        caller: Identity,
        new_owner: Identity,
    ) -> crate::Result<()> {
        let (reply, rx) = oneshot::channel();
        self.submit(Command::TransferOwnership {
            caller,
            new_owner,
            reply,
        })
        .await?;
        recv(rx).await
    }

    /// Number of leaderboards ever created.
    pub async fn leaderboard_count(&self) -> crate::Result<u64> {
        let (reply, rx) = oneshot::channel();
        self.submit(Command::LeaderboardCount { reply }).await?;
        rx.await.map_err(|_| ServiceError::Closed)
    }

    /// Get a leaderboard's metadata.
    pub async fn leaderboard_info(&self, id: LeaderboardId) -> crate::Result<Leaderboard> {
        let (reply, rx) = oneshot::channel();
        self.submit(Command::LeaderboardInfo { id, reply }).await?;
        recv(rx).await
    }

    /// Number of current participants on the leaderboard.
    pub async fn participant_count(&self, id: LeaderboardId) -> crate::Result<usize> {
        let (reply, rx) = oneshot::channel();
        self.submit(Command::ParticipantCount { id, reply }).await?;
        recv(rx).await
    }

    /// Get a participant record, or `None` if the identity never joined or
    /// was removed.
    pub async fn user_info(
        &self,
        id: LeaderboardId,
        identity: Identity,
    ) -> crate::Result<Option<Participant>> {
        let (reply, rx) = oneshot::channel();
        self.submit(Command::UserInfo {
            id,
            identity,
            reply,
        })
        .await?;
        recv(rx).await
    }

    /// All participant identities in raw index order.
    pub async fn all_participants(&self, id: LeaderboardId) -> crate::Result<Vec<Identity>> {
        let (reply, rx) = oneshot::channel();
        self.submit(Command::AllParticipants { id, reply }).await?;
        recv(rx).await
    }

    /// Rank the leaderboard and return the top `n` rows.
    pub async fn top_n(&self, id: LeaderboardId, n: usize) -> crate::Result<Vec<RankedEntry>> {
        let (reply, rx) = oneshot::channel();
        self.submit(Command::TopN { id, n, reply }).await?;
        recv(rx).await
    }

    /// Get the current owner.
    pub async fn owner(&self) -> crate::Result<Identity> {
        let (reply, rx) = oneshot::channel();
        self.submit(Command::Owner { reply }).await?;
        rx.await.map_err(|_| ServiceError::Closed)
    }

    /// Get all admins, owner included.
    pub async fn admins(&self) -> crate::Result<Vec<Identity>> {
        let (reply, rx) = oneshot::channel();
        self.submit(Command::Admins { reply }).await?;
        rx.await.map_err(|_| ServiceError::Closed)
    }

    async fn submit(&self, command: Command) -> crate::Result<()> {
        self.tx
            .send(command)
            .await
            .map_err(|_| ServiceError::Closed)
    }
}

async fn recv<T>(rx: oneshot::Receiver<podium_store::Result<T>>) -> crate::Result<T> {
    rx.await
        .map_err(|_| ServiceError::Closed)?
        .map_err(ServiceError::from)
}
