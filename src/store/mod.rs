//! Room persistence.
//!
//! Every stored room carries a version counter. A mutation is a `RoomChange`
//! committed against the version it was computed from, so replacing rounds
//! or players and appending the matching history event happen as one step,
//! and a change computed from a stale read is refused.


use crate::error::StoreError;
use crate::model::{Event, Player, Room, RoomHash, Round};
use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;

/// A room as read from the store, tagged with the version it was read at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Versioned<T> {
    pub version: u64,
    pub value: T,
}

/// One atomic mutation of a room document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoomChange {
    /// Replacement player list, when the roster changed.
    pub players: Option<Vec<Player>>,
    /// Replacement round list, when a round was created or mutated.
    pub rounds: Option<Vec<Round>>,
    /// Event appended to the room history.
    pub event: Event,
}

impl RoomChange {
    pub fn event_only(event: Event) -> Self {
        RoomChange {
            players: None,
            rounds: None,
            event,
        }
    }

    pub fn with_players(players: Vec<Player>, event: Event) -> Self {
        RoomChange {
            players: Some(players),
            rounds: None,
            event,
        }
    }

    pub fn with_rounds(rounds: Vec<Round>, event: Event) -> Self {
        RoomChange {
            players: None,
            rounds: Some(rounds),
            event,
        }
    }

    pub fn apply(&self, room: &mut Room) {
        if let Some(players) = &self.players {
            room.players = players.clone();
        }
        if let Some(rounds) = &self.rounds {
            room.rounds = rounds.clone();
        }
        room.history.push(self.event.clone());
    }
}

#[async_trait]
pub trait RoomStore: Send + Sync {
    /// Reads a room and its current version.
    async fn get(&self, hash: &RoomHash) -> Result<Versioned<Room>, StoreError>;

    /// Stores a new room at version 1.
    async fn create(&self, hash: &RoomHash, room: Room) -> Result<(), StoreError>;

    /// Applies `change` if the room is still at `expected_version` and
    /// returns the updated room.
    async fn commit(
        &self,
        hash: &RoomHash,
        expected_version: u64,
        change: RoomChange,
    ) -> Result<Versioned<Room>, StoreError>;
}

/// In-process store backed by a map of room documents.
#[derive(Default)]
pub struct MemoryRoomStore {
    rooms: RwLock<HashMap<RoomHash, Versioned<Room>>>,
}

impl MemoryRoomStore {
    pub fn new() -> Self {
        MemoryRoomStore {
            rooms: RwLock::new(HashMap::new()),
        }
    }

    #[cfg(test)]
    pub async fn len(&self) -> usize {
        self.rooms.read().await.len()
    }

    #[cfg(test)]
    pub async fn is_empty(&self) -> bool {
        self.rooms.read().await.is_empty()
    }
}

#[async_trait]
impl RoomStore for MemoryRoomStore {
    async fn get(&self, hash: &RoomHash) -> Result<Versioned<Room>, StoreError> {
        self.rooms
            .read()
            .await
            .get(hash)
            .cloned()
            .ok_or(StoreError::NotFound)
    }

    async fn create(&self, hash: &RoomHash, room: Room) -> Result<(), StoreError> {
        let mut rooms = self.rooms.write().await;
        if rooms.contains_key(hash) {
            return Err(StoreError::AlreadyExists);
        }
        rooms.insert(
            hash.clone(),
            Versioned {
                version: 1,
                value: room,
            },
        );
        Ok(())
    }

    async fn commit(
        &self,
        hash: &RoomHash,
        expected_version: u64,
        change: RoomChange,
    ) -> Result<Versioned<Room>, StoreError> {
        let mut rooms = self.rooms.write().await;
        let stored = rooms.get_mut(hash).ok_or(StoreError::NotFound)?;

        if stored.version != expected_version {
            return Err(StoreError::VersionConflict {
                expected: expected_version,
                found: stored.version,
            });
        }

        change.apply(&mut stored.value);
        stored.version += 1;
        Ok(stored.clone())
    }
}
