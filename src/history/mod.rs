//! Views folded from a room's event history.
//!
//! The history is the source of truth; nothing here caches derived state.

mod test;

use crate::model::{Event, Future, Mood, Move, PlayerStatus, Round, SubjectId};
use serde::Serialize;
use std::collections::BTreeMap;

/// The round the room is currently looking at.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CurrentRound {
    pub subject_id: SubjectId,
    pub closed: bool,
    /// When the round was opened, if it still is. Clients run their timer from here.
    pub started_at: Option<i64>,
}

/// Subject of the most recent round event, if any round ever started.
pub fn current_round(history: &[Event]) -> Option<CurrentRound> {
    history.iter().rev().find_map(|event| match event {
        Event::RoundStarted { round, timestamp } => Some(CurrentRound {
            subject_id: round.subject_id,
            closed: round.closed,
            started_at: (!round.closed).then_some(*timestamp),
        }),
        Event::RoundClosed { round, .. } => Some(CurrentRound {
            subject_id: round.subject_id,
            closed: true,
            started_at: None,
        }),
        _ => None,
    })
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LastMove {
    pub subject_id: SubjectId,
    pub future: Future,
    pub mood: Mood,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RosterEntry {
    pub name: String,
    pub profile: Option<String>,
    pub status: PlayerStatus,
    pub organizer: bool,
    pub last_move: Option<LastMove>,
}

impl RosterEntry {
    fn unseen(name: &str) -> Self {
        RosterEntry {
            name: name.to_string(),
            profile: None,
            status: PlayerStatus::Disconnected,
            organizer: false,
            last_move: None,
        }
    }
}

/// Every player mentioned in the history, in order of first appearance.
pub fn roster(history: &[Event]) -> Vec<RosterEntry> {
    let mut entries: Vec<RosterEntry> = Vec::new();

    fn entry<'a>(entries: &'a mut Vec<RosterEntry>, name: &str) -> &'a mut RosterEntry {
        let index = match entries.iter().position(|e| e.name == name) {
            Some(index) => index,
            None => {
                entries.push(RosterEntry::unseen(name));
                entries.len() - 1
            }
        };
        &mut entries[index]
    }

    for event in history {
        match event {
            Event::Player { player, .. } => {
                let e = entry(&mut entries, &player.name);
                e.profile = Some(player.profile.clone());
                e.status = PlayerStatus::Connected;
                e.organizer |= player.organizer;
            }
            Event::PlayerDisconnected { player, .. } => {
                entry(&mut entries, &player.name).status = PlayerStatus::Disconnected;
            }
            Event::Movement {
                subject_id,
                player,
                played,
                ..
            } => {
                entry(&mut entries, &player.name).last_move = Some(LastMove {
                    subject_id: *subject_id,
                    future: played.future,
                    mood: played.mood,
                });
            }
            Event::RoundStarted { .. } | Event::RoundClosed { .. } => {}
        }
    }

    entries
}

/// The last move of every player in a round.
pub fn latest_moves(round: &Round) -> BTreeMap<String, Move> {
    let mut moves = BTreeMap::new();
    record_moves(&mut moves, &round.moves);
    moves
}

/// Overwrites `into` with `moves` in order, so later moves win.
pub(crate) fn record_moves(into: &mut BTreeMap<String, Move>, moves: &[Move]) {
    for played in moves {
        into.insert(played.player_name.clone(), played.clone());
    }
}
