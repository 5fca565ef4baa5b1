//! Backend for Agile Team Poker: rooms where an organizer opens one subject
//! at a time, players vote a future outlook and a mood, and a report
//! summarizes the outcome once rounds are closed.
//!
//! Every change to a room is an event appended to the room's history; all
//! derived views are folds over that history. Changes are pushed to live
//! viewers through the [`broadcaster`].

pub mod access;
pub mod broadcaster;
pub mod config;
pub mod connection;
pub mod error;
pub mod history;
pub mod http;
pub mod message;
pub mod model;
pub mod report;
pub mod response;
pub mod round;
pub mod service;
pub mod store;
pub mod subject;
pub mod utils;
