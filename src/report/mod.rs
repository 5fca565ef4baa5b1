//! End-of-session report, folded from the room history.
//!
//! Round snapshots carried by `round-started` and `round-closed` events are
//! replayed in order; for every subject each player's last move wins. Subjects
//! nobody voted on are left out.


use crate::history::record_moves;
use crate::model::{Event, Future, Mood, Move, SubjectId};
use crate::subject::SubjectCatalog;
use serde::Serialize;
use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Vote {
    pub future: Future,
    pub mood: Mood,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MoodPercentages {
    pub happy: f64,
    pub neutral: f64,
    pub sad: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FuturePercentages {
    pub up: f64,
    pub neutral: f64,
    pub down: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubjectReport {
    pub subject_id: SubjectId,
    pub subject_name: String,
    pub moves_by_player: BTreeMap<String, Vote>,
    pub mood_percentages: MoodPercentages,
    pub future_percentages: FuturePercentages,
    pub dominant_mood: Mood,
    pub dominant_future: Future,
    /// The team does not expect this subject to improve.
    pub at_risk: bool,
}

pub type Report = BTreeMap<SubjectId, SubjectReport>;

pub fn aggregate(history: &[Event], catalog: &SubjectCatalog) -> Report {
    let mut by_subject: BTreeMap<SubjectId, BTreeMap<String, Move>> = BTreeMap::new();

    for event in history {
        if let Event::RoundStarted { round, .. } | Event::RoundClosed { round, .. } = event {
            let moves = by_subject.entry(round.subject_id).or_default();
            record_moves(moves, &round.moves);
        }
    }

    by_subject
        .into_iter()
        .filter(|(_, moves)| !moves.is_empty())
        .map(|(subject_id, moves)| {
            let report = summarize(subject_id, catalog.name_of(subject_id), &moves);
            (subject_id, report)
        })
        .collect()
}

fn summarize(
    subject_id: SubjectId,
    subject_name: String,
    moves: &BTreeMap<String, Move>,
) -> SubjectReport {
    let total = moves.len();
    let moods = |mood: Mood| moves.values().filter(|m| m.mood == mood).count();
    let futures = |future: Future| moves.values().filter(|m| m.future == future).count();

    let dominant_future = dominant(&Future::ALL, futures);

    SubjectReport {
        subject_id,
        subject_name,
        moves_by_player: moves
            .iter()
            .map(|(name, m)| {
                (
                    name.clone(),
                    Vote {
                        future: m.future,
                        mood: m.mood,
                    },
                )
            })
            .collect(),
        mood_percentages: MoodPercentages {
            happy: percent(moods(Mood::Happy), total),
            neutral: percent(moods(Mood::Neutral), total),
            sad: percent(moods(Mood::Sad), total),
        },
        future_percentages: FuturePercentages {
            up: percent(futures(Future::Up), total),
            neutral: percent(futures(Future::Neutral), total),
            down: percent(futures(Future::Down), total),
        },
        dominant_mood: dominant(&Mood::ALL, moods),
        dominant_future,
        at_risk: dominant_future != Future::Up,
    }
}

fn percent(count: usize, total: usize) -> f64 {
    if total == 0 {
        return 0.0;
    }
    count as f64 / total as f64 * 100.0
}

/// Category with the strictly greatest count; the earliest category wins ties.
fn dominant<T: Copy>(categories: &[T; 3], count: impl Fn(T) -> usize) -> T {
    let mut best = categories[0];
    let mut best_count = count(best);
    for &category in &categories[1..] {
        let c = count(category);
        if c > best_count {
            best = category;
            best_count = c;
        }
    }
    best
}
