//! Envelope pushed to live viewers.
//!
//! Every payload serializes as `{"status": <ResponseStatus>, "message": <payload>}`.

mod test;

use crate::error::{ErrorKind, PokerError};
use crate::model::{Event, RoomView};
use serde::ser::SerializeStruct;
use serde::Serialize;
use std::fmt::Debug;

#[derive(Debug, Serialize)]
pub enum ResponseStatus {
    Snapshot,
    Update,
    ServerError,
    ClientError,
    NotFound,
}

/// A committed change together with the room it produced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Update {
    pub event: Event,
    pub room: RoomView,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Response {
    /// Full room state, sent on subscribe and on request.
    Snapshot(RoomView),
    /// Sent to every viewer after each committed change.
    Update(Box<Update>),
    ServerError(String),
    ClientError(String),
    NotFound(String),
}

impl Response {
    pub fn update(event: Event, room: RoomView) -> Self {
        Response::Update(Box::new(Update { event, room }))
    }

    /// Error reply for a live viewer, classified like the HTTP statuses.
    pub fn from_error(error: &PokerError) -> Self {
        match error.kind() {
            ErrorKind::NotFound => Response::NotFound(error.to_string()),
            ErrorKind::Internal => Response::ServerError("Internal server error".to_string()),
            ErrorKind::Unauthorized | ErrorKind::Conflict | ErrorKind::InvalidInput => {
                Response::ClientError(error.to_string())
            }
        }
    }

    pub fn status(&self) -> ResponseStatus {
        match self {
            Response::Snapshot(_) => ResponseStatus::Snapshot,
            Response::Update(_) => ResponseStatus::Update,
            Response::ServerError(_) => ResponseStatus::ServerError,
            Response::ClientError(_) => ResponseStatus::ClientError,
            Response::NotFound(_) => ResponseStatus::NotFound,
        }
    }
}

const RESPONSE_STR: &str = "response";
const STATUS_STR: &str = "status";
const MESSAGE_STR: &str = "message";

impl serde::ser::Serialize for Response {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::ser::Serializer,
    {
        let mut s = serializer.serialize_struct(RESPONSE_STR, 2)?;
        s.serialize_field(STATUS_STR, &self.status())?;
        match self {
            Response::Snapshot(room) => s.serialize_field(MESSAGE_STR, room)?,
            Response::Update(update) => s.serialize_field(MESSAGE_STR, update.as_ref())?,
            Response::ServerError(message)
            | Response::ClientError(message)
            | Response::NotFound(message) => s.serialize_field(MESSAGE_STR, message)?,
        }
        s.end()
    }
}
