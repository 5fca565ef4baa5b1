//! Round lifecycle: a round is opened by the organizer, collects moves while
//! open and is closed once. At most one round per room is open at a time.
//!
//! Each transition is a pure function from the current room to the
//! `RoomChange` that records it.


use crate::access::{authenticate_organizer, validate_player_name, Credentials};
use crate::error::PokerError;
use crate::model::{Event, Future, Mood, Move, PlayerRef, Room, Round, SubjectId};
use crate::store::RoomChange;
use crate::subject::SubjectCatalog;

pub fn start_round(
    room: &Room,
    subject_id: SubjectId,
    credentials: &Credentials,
    catalog: &SubjectCatalog,
    now: i64,
) -> Result<RoomChange, PokerError> {
    authenticate_organizer(room, credentials)?;

    if !catalog.contains(subject_id) {
        return Err(PokerError::InvalidSubject(subject_id.into()));
    }
    if room.open_round().is_some() {
        return Err(PokerError::RoundConflict);
    }

    let round = Round::open(subject_id);
    let mut rounds = room.rounds.clone();
    rounds.push(round.clone());

    Ok(RoomChange::with_rounds(
        rounds,
        Event::RoundStarted {
            round,
            timestamp: now,
        },
    ))
}

/// Records a vote in the open round for `subject_id`.
///
/// `future` and `mood` arrive as raw strings and are validated here so a
/// bad value is reported as an invalid move, never as a malformed request.
pub fn submit_move(
    room: &Room,
    subject_id: SubjectId,
    player_name: &str,
    future: &str,
    mood: &str,
    now: i64,
) -> Result<RoomChange, PokerError> {
    let index = open_round_index(room, subject_id)?;

    let future: Future = future.parse()?;
    let mood: Mood = mood.parse()?;
    validate_player_name(player_name)?;

    let played = Move::new(player_name, future, mood);
    let mut rounds = room.rounds.clone();
    rounds[index].moves.push(played.clone());

    Ok(RoomChange::with_rounds(
        rounds,
        Event::Movement {
            subject_id,
            player: PlayerRef {
                name: player_name.to_string(),
            },
            played,
            timestamp: now,
        },
    ))
}

pub fn close_round(
    room: &Room,
    subject_id: SubjectId,
    credentials: &Credentials,
    now: i64,
) -> Result<RoomChange, PokerError> {
    authenticate_organizer(room, credentials)?;
    let index = open_round_index(room, subject_id)?;

    let mut rounds = room.rounds.clone();
    rounds[index].closed = true;
    let round = rounds[index].clone();

    Ok(RoomChange::with_rounds(
        rounds,
        Event::RoundClosed {
            round,
            timestamp: now,
        },
    ))
}

fn open_round_index(room: &Room, subject_id: SubjectId) -> Result<usize, PokerError> {
    room.rounds
        .iter()
        .position(|r| r.subject_id == subject_id && r.is_open())
        .ok_or(PokerError::InvalidRound(subject_id))
}
