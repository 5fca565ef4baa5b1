//! Room documents and everything stored inside them.
//!
//! A `Room` owns its players, its rounds and its `history`, the append-only
//! event log every derived view is folded from.

mod test;

use crate::error::PokerError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Subjects are numbered 1 to 20.
pub type SubjectId = u8;

/// Opaque room token handed out on room creation.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RoomHash(String);

impl RoomHash {
    /// Generates a fresh, unique token.
    pub fn generate() -> Self {
        RoomHash(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for RoomHash {
    fn from(value: String) -> Self {
        RoomHash(value)
    }
}

impl From<&str> for RoomHash {
    fn from(value: &str) -> Self {
        RoomHash(value.to_string())
    }
}

impl fmt::Display for RoomHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A player's outlook for the subject.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Future {
    Up,
    Neutral,
    Down,
}

impl Future {
    /// Enumeration order, also used to break ties in reports.
    pub const ALL: [Future; 3] = [Future::Up, Future::Neutral, Future::Down];

    pub fn as_str(&self) -> &'static str {
        match self {
            Future::Up => "up",
            Future::Neutral => "neutral",
            Future::Down => "down",
        }
    }
}

impl FromStr for Future {
    type Err = PokerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "up" => Ok(Future::Up),
            "neutral" => Ok(Future::Neutral),
            "down" => Ok(Future::Down),
            other => Err(PokerError::InvalidMove(format!("unknown future '{}'", other))),
        }
    }
}

/// A player's current mood about the subject.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mood {
    Happy,
    Neutral,
    Sad,
}

impl Mood {
    /// Enumeration order, also used to break ties in reports.
    pub const ALL: [Mood; 3] = [Mood::Happy, Mood::Neutral, Mood::Sad];

    pub fn as_str(&self) -> &'static str {
        match self {
            Mood::Happy => "happy",
            Mood::Neutral => "neutral",
            Mood::Sad => "sad",
        }
    }
}

impl FromStr for Mood {
    type Err = PokerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "happy" => Ok(Mood::Happy),
            "neutral" => Ok(Mood::Neutral),
            "sad" => Ok(Mood::Sad),
            other => Err(PokerError::InvalidMove(format!("unknown mood '{}'", other))),
        }
    }
}

/// One vote inside a round.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Move {
    pub player_name: String,
    pub future: Future,
    pub mood: Mood,
}

impl Move {
    pub fn new(player_name: impl Into<String>, future: Future, mood: Mood) -> Self {
        Move {
            player_name: player_name.into(),
            future,
            mood,
        }
    }
}

/// A discussion window for one subject.
///
/// Moves are appended as they arrive; a player may vote several times and
/// only the last vote counts when the round is read.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Round {
    pub subject_id: SubjectId,
    pub moves: Vec<Move>,
    pub closed: bool,
}

impl Round {
    pub fn open(subject_id: SubjectId) -> Self {
        Round {
            subject_id,
            moves: Vec::new(),
            closed: false,
        }
    }

    pub fn is_open(&self) -> bool {
        !self.closed
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlayerStatus {
    Connected,
    Disconnected,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Player {
    pub name: String,
    pub profile: String,
    pub status: PlayerStatus,
    #[serde(default)]
    pub organizer: bool,
}

impl Player {
    pub fn connected(name: impl Into<String>, profile: impl Into<String>) -> Self {
        Player {
            name: name.into(),
            profile: profile.into(),
            status: PlayerStatus::Connected,
            organizer: false,
        }
    }

    pub fn is_connected(&self) -> bool {
        self.status == PlayerStatus::Connected
    }
}

/// Name-only reference to a player, as carried by `movement` events.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerRef {
    pub name: String,
}

/// The room owner. The password is a plaintext secret compared by value.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Organizer {
    pub name: String,
    pub profile: String,
    pub password: String,
}

/// One entry of the room history. Immutable once appended.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case", rename_all_fields = "camelCase")]
pub enum Event {
    Player {
        player: Player,
        timestamp: i64,
    },
    RoundStarted {
        round: Round,
        timestamp: i64,
    },
    RoundClosed {
        round: Round,
        timestamp: i64,
    },
    Movement {
        subject_id: SubjectId,
        player: PlayerRef,
        #[serde(rename = "move")]
        played: Move,
        timestamp: i64,
    },
    PlayerDisconnected {
        player: Player,
        timestamp: i64,
    },
}

impl Event {
    pub fn timestamp(&self) -> i64 {
        match self {
            Event::Player { timestamp, .. }
            | Event::RoundStarted { timestamp, .. }
            | Event::RoundClosed { timestamp, .. }
            | Event::Movement { timestamp, .. }
            | Event::PlayerDisconnected { timestamp, .. } => *timestamp,
        }
    }

    /// Wire name of the event, used in logs.
    pub fn kind(&self) -> &'static str {
        match self {
            Event::Player { .. } => "player",
            Event::RoundStarted { .. } => "round-started",
            Event::RoundClosed { .. } => "round-closed",
            Event::Movement { .. } => "movement",
            Event::PlayerDisconnected { .. } => "player-disconnected",
        }
    }
}

/// The stored room document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Room {
    pub organizer: Organizer,
    pub players: Vec<Player>,
    pub rounds: Vec<Round>,
    pub history: Vec<Event>,
}

impl Room {
    /// A room holding only its organizer, who is also its first player.
    pub fn new(organizer: Organizer) -> Self {
        let player = Player {
            name: organizer.name.clone(),
            profile: organizer.profile.clone(),
            status: PlayerStatus::Connected,
            organizer: true,
        };
        Room {
            organizer,
            players: vec![player],
            rounds: Vec::new(),
            history: Vec::new(),
        }
    }

    pub fn player(&self, name: &str) -> Option<&Player> {
        self.players.iter().find(|p| p.name == name)
    }

    pub fn open_round(&self) -> Option<&Round> {
        self.rounds.iter().find(|r| r.is_open())
    }

    /// Most recent round record for a subject, open or closed.
    pub fn latest_round(&self, subject_id: SubjectId) -> Option<&Round> {
        self.rounds.iter().rev().find(|r| r.subject_id == subject_id)
    }

    pub fn view(&self, room_hash: &RoomHash) -> RoomView {
        RoomView {
            room_hash: room_hash.clone(),
            organizer: OrganizerView {
                name: self.organizer.name.clone(),
                profile: self.organizer.profile.clone(),
            },
            players: self.players.clone(),
            rounds: self.rounds.clone(),
            history: self.history.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrganizerView {
    pub name: String,
    pub profile: String,
}

/// What clients get to see of a room: everything but the organizer password.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoomView {
    pub room_hash: RoomHash,
    pub organizer: OrganizerView,
    pub players: Vec<Player>,
    pub rounds: Vec<Round>,
    pub history: Vec<Event>,
}
