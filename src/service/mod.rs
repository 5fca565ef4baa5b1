//! Room operations.
//!
//! Every mutation is a read-validate-commit cycle against the store: the
//! current room is read with its version, a pure transition computes the
//! change, and the change is committed only if nobody else committed in the
//! meantime. A lost race reruns the cycle on fresh state, so rules such as
//! "one open round per room" hold under concurrent requests. Committed
//! changes are then fanned out to live viewers.


use crate::access::{self, Credentials};
use crate::broadcaster::{Broadcaster, ViewerId};
use crate::config::ServiceConfig;
use crate::connection::{SinkAdapter, StreamAdapter};
use crate::error::{PokerError, StoreError};
use crate::history::{self, CurrentRound, RosterEntry};
use crate::message::ViewerMessage;
use crate::model::{Event, Move, Organizer, Room, RoomHash, RoomView, Round, SubjectId};
use crate::report::{self, Report};
use crate::response::Response;
use crate::round;
use crate::store::{RoomChange, RoomStore};
use crate::subject::SubjectCatalog;
use crate::utils::now_millis;
use std::sync::Arc;
use tracing::{debug, info, warn};

pub struct PokerService {
    store: Arc<dyn RoomStore>,
    broadcaster: Broadcaster,
    subjects: SubjectCatalog,
    config: ServiceConfig,
}

impl PokerService {
    pub fn new(store: Arc<dyn RoomStore>, subjects: SubjectCatalog, config: ServiceConfig) -> Self {
        PokerService {
            store,
            broadcaster: Broadcaster::new(config.viewer_buffer),
            subjects,
            config,
        }
    }

    pub fn subjects(&self) -> &SubjectCatalog {
        &self.subjects
    }

    pub fn broadcaster(&self) -> &Broadcaster {
        &self.broadcaster
    }

    pub async fn create_room(
        &self,
        organizer_name: &str,
        profile: &str,
        password: &str,
    ) -> Result<RoomHash, PokerError> {
        access::validate_player_name(organizer_name)?;

        let hash = RoomHash::generate();
        let mut room = Room::new(Organizer {
            name: organizer_name.to_string(),
            profile: profile.to_string(),
            password: password.to_string(),
        });
        let organizer = room.players[0].clone();
        room.history.push(Event::Player {
            player: organizer,
            timestamp: now_millis(),
        });

        self.store.create(&hash, room).await?;
        info!(room = %hash, organizer = organizer_name, "room created");
        Ok(hash)
    }

    pub async fn join_room(
        &self,
        hash: &RoomHash,
        player_name: &str,
        profile: &str,
        password: &str,
    ) -> Result<(), PokerError> {
        let policy = self.config.join_policy;
        self.mutate(hash, Some(player_name), |room| {
            access::join(room, policy, player_name, profile, password, now_millis()).map(Some)
        })
        .await?;
        info!(room = %hash, player = player_name, "player joined");
        Ok(())
    }

    /// Marks a player disconnected. Leaving twice is a no-op.
    pub async fn leave_room(&self, hash: &RoomHash, player_name: &str) -> Result<(), PokerError> {
        let committed = self
            .mutate(hash, Some(player_name), |room| {
                access::leave(room, player_name, now_millis())
            })
            .await?;
        if committed.is_some() {
            info!(room = %hash, player = player_name, "player left");
        }
        Ok(())
    }

    pub async fn start_round(
        &self,
        hash: &RoomHash,
        subject_id: SubjectId,
        credentials: &Credentials,
    ) -> Result<Round, PokerError> {
        let committed = self
            .mutate(hash, Some(&credentials.name), |room| {
                round::start_round(room, subject_id, credentials, &self.subjects, now_millis())
                    .map(Some)
            })
            .await?;
        info!(room = %hash, subject_id, "round started");
        round_of(committed)
    }

    pub async fn submit_move(
        &self,
        hash: &RoomHash,
        subject_id: SubjectId,
        player_name: &str,
        future: &str,
        mood: &str,
    ) -> Result<Move, PokerError> {
        let committed = self
            .mutate(hash, Some(player_name), |room| {
                round::submit_move(room, subject_id, player_name, future, mood, now_millis())
                    .map(Some)
            })
            .await?;
        debug!(room = %hash, subject_id, player = player_name, "move recorded");

        match committed {
            Some(Event::Movement { played, .. }) => Ok(played),
            _ => Err(PokerError::Internal("move was not recorded".to_string())),
        }
    }

    pub async fn close_round(
        &self,
        hash: &RoomHash,
        subject_id: SubjectId,
        credentials: &Credentials,
    ) -> Result<Round, PokerError> {
        let committed = self
            .mutate(hash, Some(&credentials.name), |room| {
                round::close_round(room, subject_id, credentials, now_millis()).map(Some)
            })
            .await?;
        info!(room = %hash, subject_id, "round closed");
        round_of(committed)
    }

    /// Most recent round record for the subject.
    pub async fn get_round(
        &self,
        hash: &RoomHash,
        subject_id: SubjectId,
    ) -> Result<Round, PokerError> {
        let room = self.store.get(hash).await?.value;
        room.latest_round(subject_id)
            .cloned()
            .ok_or(PokerError::RoundNotFound(subject_id))
    }

    pub async fn get_room(&self, hash: &RoomHash) -> Result<RoomView, PokerError> {
        Ok(self.store.get(hash).await?.value.view(hash))
    }

    pub async fn report(&self, hash: &RoomHash) -> Result<Report, PokerError> {
        let room = self.store.get(hash).await?.value;
        Ok(report::aggregate(&room.history, &self.subjects))
    }

    pub async fn current_round(&self, hash: &RoomHash) -> Result<Option<CurrentRound>, PokerError> {
        let room = self.store.get(hash).await?.value;
        Ok(history::current_round(&room.history))
    }

    pub async fn roster(&self, hash: &RoomHash) -> Result<Vec<RosterEntry>, PokerError> {
        let room = self.store.get(hash).await?.value;
        Ok(history::roster(&room.history))
    }

    /// Registers a live viewer and queues the current snapshot for it.
    pub async fn subscribe<S>(
        &self,
        hash: &RoomHash,
        player: Option<String>,
        sink: S,
    ) -> Result<ViewerId, PokerError>
    where
        S: SinkAdapter + Send + 'static,
    {
        self.broadcaster
            .subscribe(hash, player, sink, async {
                let room = self.store.get(hash).await?;
                Ok::<_, PokerError>(Response::Snapshot(room.value.view(hash)))
            })
            .await
    }

    /// Drops a live viewer. When it was the last connection of its player,
    /// the player is marked disconnected.
    pub async fn unsubscribe(&self, hash: &RoomHash, viewer: ViewerId) {
        let Some(player) = self.broadcaster.unsubscribe(hash, viewer).await else {
            return;
        };
        match self.leave_room(hash, &player).await {
            Ok(()) | Err(PokerError::PlayerNotFound(_)) | Err(PokerError::RoomNotFound) => {}
            Err(e) => {
                warn!(room = %hash, player = %player, error = %e, "failed to disconnect player")
            }
        }
    }

    /// Serves one live viewer until its connection ends.
    pub async fn handle_stream<St, Si>(
        &self,
        hash: &RoomHash,
        player: Option<String>,
        stream: &mut St,
        sink: Si,
    ) -> Result<(), PokerError>
    where
        St: StreamAdapter + Send,
        Si: SinkAdapter + Send + 'static,
    {
        let viewer = self.subscribe(hash, player.clone(), sink).await?;

        loop {
            match stream.next().await {
                Ok(Some(message)) => {
                    let handled = self
                        .handle_message(hash, viewer, player.as_deref(), message)
                        .await;
                    if let Err(e) = handled {
                        self.broadcaster
                            .send_to(hash, viewer, Response::from_error(&e))
                            .await;
                    }
                }
                Ok(None) => break,
                Err(e) => {
                    debug!(room = %hash, viewer, error = %e, "viewer stream failed");
                    break;
                }
            }
        }

        self.unsubscribe(hash, viewer).await;
        Ok(())
    }

    async fn handle_message(
        &self,
        hash: &RoomHash,
        viewer: ViewerId,
        player: Option<&str>,
        message: ViewerMessage,
    ) -> Result<(), PokerError> {
        match message {
            ViewerMessage::Snapshot => {
                let view = self.get_room(hash).await?;
                self.broadcaster
                    .send_to(hash, viewer, Response::Snapshot(view))
                    .await;
                Ok(())
            }
            ViewerMessage::Leave => match player {
                Some(name) => self.leave_room(hash, name).await,
                None => Err(PokerError::InvalidRequest(
                    "anonymous viewers have no player to disconnect".to_string(),
                )),
            },
        }
    }

    /// Runs `transition` against fresh room state until its change commits,
    /// then returns the recorded event. `Ok(None)` from `transition` means
    /// there is nothing to record.
    async fn mutate<F>(
        &self,
        hash: &RoomHash,
        actor: Option<&str>,
        transition: F,
    ) -> Result<Option<Event>, PokerError>
    where
        F: Fn(&Room) -> Result<Option<RoomChange>, PokerError>,
    {
        for attempt in 0..=self.config.commit_retries {
            let current = self.store.get(hash).await?;
            let Some(change) = transition(&current.value)? else {
                return Ok(None);
            };
            let event = change.event.clone();

            match self.store.commit(hash, current.version, change).await {
                Ok(updated) => {
                    self.publish(hash, &updated.value, event.clone(), actor).await;
                    return Ok(Some(event));
                }
                Err(StoreError::VersionConflict { expected, found }) => {
                    debug!(
                        room = %hash,
                        attempt,
                        expected,
                        found,
                        "lost concurrent write, retrying"
                    );
                }
                Err(e) => return Err(e.into()),
            }
        }

        warn!(room = %hash, "giving up after repeated concurrent writes");
        Err(PokerError::Internal("room is busy, try again".to_string()))
    }

    async fn publish(&self, hash: &RoomHash, room: &Room, event: Event, actor: Option<&str>) {
        let skip = if self.config.skip_actor_echo { actor } else { None };
        let kind = event.kind();
        let delivered = self
            .broadcaster
            .broadcast(hash, room, Response::update(event, room.view(hash)), skip)
            .await;
        debug!(room = %hash, event = kind, delivered, "change published");
    }
}

fn round_of(committed: Option<Event>) -> Result<Round, PokerError> {
    match committed {
        Some(Event::RoundStarted { round, .. } | Event::RoundClosed { round, .. }) => Ok(round),
        _ => Err(PokerError::Internal("round change was not recorded".to_string())),
    }
}
