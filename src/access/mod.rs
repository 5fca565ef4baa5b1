//! Organizer authentication and room admission.


use crate::error::PokerError;
use crate::model::{Event, Player, PlayerStatus, Room};
use crate::store::RoomChange;
use serde::Deserialize;
use std::str::FromStr;

/// Organizer name and password as presented by a request.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Credentials {
    pub name: String,
    pub password: String,
}

impl Credentials {
    pub fn new(name: impl Into<String>, password: impl Into<String>) -> Self {
        Credentials {
            name: name.into(),
            password: password.into(),
        }
    }
}

/// Who has to present the room password when joining.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum JoinPolicy {
    /// Only a join under the organizer's name is checked; anyone else walks in.
    #[default]
    OrganizerOnly,
    /// Every joiner must present the organizer's password.
    Everyone,
}

impl FromStr for JoinPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "organizer-only" => Ok(JoinPolicy::OrganizerOnly),
            "everyone" => Ok(JoinPolicy::Everyone),
            other => Err(format!("unknown join policy '{}'", other)),
        }
    }
}

/// Checks that `credentials` match the stored organizer exactly.
pub fn authenticate_organizer(room: &Room, credentials: &Credentials) -> Result<(), PokerError> {
    if room.organizer.name == credentials.name && room.organizer.password == credentials.password
    {
        Ok(())
    } else {
        Err(PokerError::Unauthorized)
    }
}

pub fn validate_player_name(name: &str) -> Result<(), PokerError> {
    if name.trim().is_empty() {
        return Err(PokerError::EmptyPlayerName);
    }
    Ok(())
}

/// Admits `player_name` into the room.
///
/// A new name is added to the roster as connected. A known name is never
/// duplicated: a disconnected player is flipped back to connected and a
/// connected one is left untouched. Either way a `player` event is recorded.
pub fn join(
    room: &Room,
    policy: JoinPolicy,
    player_name: &str,
    profile: &str,
    password: &str,
    now: i64,
) -> Result<RoomChange, PokerError> {
    validate_player_name(player_name)?;

    let claims_organizer = room.organizer.name == player_name;
    let needs_password = claims_organizer || policy == JoinPolicy::Everyone;
    if needs_password && room.organizer.password != password {
        return Err(PokerError::Unauthorized);
    }

    match room.players.iter().position(|p| p.name == player_name) {
        Some(index) => {
            let mut player = room.players[index].clone();
            if player.is_connected() {
                return Ok(RoomChange::event_only(Event::Player {
                    player,
                    timestamp: now,
                }));
            }

            player.status = PlayerStatus::Connected;
            let mut players = room.players.clone();
            players[index] = player.clone();
            Ok(RoomChange::with_players(
                players,
                Event::Player {
                    player,
                    timestamp: now,
                },
            ))
        }
        None => {
            let player = Player::connected(player_name, profile);
            let mut players = room.players.clone();
            players.push(player.clone());
            Ok(RoomChange::with_players(
                players,
                Event::Player {
                    player,
                    timestamp: now,
                },
            ))
        }
    }
}

/// Marks a player disconnected. Returns `None` when the player already is.
pub fn leave(room: &Room, player_name: &str, now: i64) -> Result<Option<RoomChange>, PokerError> {
    let index = room
        .players
        .iter()
        .position(|p| p.name == player_name)
        .ok_or_else(|| PokerError::PlayerNotFound(player_name.to_string()))?;

    if !room.players[index].is_connected() {
        return Ok(None);
    }

    let mut players = room.players.clone();
    players[index].status = PlayerStatus::Disconnected;
    let player = players[index].clone();
    Ok(Some(RoomChange::with_players(
        players,
        Event::PlayerDisconnected {
            player,
            timestamp: now,
        },
    )))
}
