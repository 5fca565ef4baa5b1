#[cfg(test)]
mod tests {
    use crate::history::{current_round, latest_moves, roster, CurrentRound, LastMove};
    use crate::model::{Event, Future, Mood, Move, Player, PlayerRef, PlayerStatus, Round};

    fn join(name: &str, timestamp: i64) -> Event {
        Event::Player {
            player: Player::connected(name, "owl"),
            timestamp,
        }
    }

    fn started(subject_id: u8, timestamp: i64) -> Event {
        Event::RoundStarted {
            round: Round::open(subject_id),
            timestamp,
        }
    }

    fn closed(subject_id: u8, moves: Vec<Move>, timestamp: i64) -> Event {
        Event::RoundClosed {
            round: Round {
                subject_id,
                moves,
                closed: true,
            },
            timestamp,
        }
    }

    fn movement(subject_id: u8, name: &str, future: Future, mood: Mood) -> Event {
        Event::Movement {
            subject_id,
            player: PlayerRef {
                name: name.to_string(),
            },
            played: Move::new(name, future, mood),
            timestamp: 0,
        }
    }

    #[test]
    fn test_no_round_yet() {
        assert_eq!(current_round(&[join("Alice", 1)]), None);
    }

    #[test]
    fn test_current_round_open() {
        let history = vec![
            join("Alice", 1),
            started(4, 100),
            movement(4, "Alice", Future::Up, Mood::Happy),
        ];

        assert_eq!(
            current_round(&history),
            Some(CurrentRound {
                subject_id: 4,
                closed: false,
                started_at: Some(100)
            })
        );
    }

    #[test]
    fn test_current_round_closed() {
        let history = vec![started(4, 100), closed(4, vec![], 200), join("Bob", 300)];

        assert_eq!(
            current_round(&history),
            Some(CurrentRound {
                subject_id: 4,
                closed: true,
                started_at: None
            })
        );
    }

    #[test]
    fn test_roster_tracks_status_and_last_move() {
        let history = vec![
            join("Alice", 1),
            join("Bob", 2),
            started(1, 3),
            movement(1, "Bob", Future::Up, Mood::Happy),
            movement(1, "Bob", Future::Down, Mood::Sad),
            Event::PlayerDisconnected {
                player: Player::connected("Bob", "owl"),
                timestamp: 4,
            },
        ];

        let roster = roster(&history);
        assert_eq!(roster.len(), 2);
        assert_eq!(roster[0].name, "Alice");
        assert_eq!(roster[0].status, PlayerStatus::Connected);
        assert_eq!(roster[1].status, PlayerStatus::Disconnected);
        assert_eq!(
            roster[1].last_move,
            Some(LastMove {
                subject_id: 1,
                future: Future::Down,
                mood: Mood::Sad
            })
        );
    }

    #[test]
    fn test_roster_includes_unjoined_voters() {
        let history = vec![movement(2, "Ghost", Future::Neutral, Mood::Neutral)];

        let roster = roster(&history);
        assert_eq!(roster.len(), 1);
        assert_eq!(roster[0].status, PlayerStatus::Disconnected);
        assert_eq!(roster[0].profile, None);
    }

    #[test]
    fn test_latest_moves_last_wins() {
        let round = Round {
            subject_id: 1,
            moves: vec![
                Move::new("Bob", Future::Up, Mood::Happy),
                Move::new("Carol", Future::Neutral, Mood::Sad),
                Move::new("Bob", Future::Down, Mood::Sad),
            ],
            closed: false,
        };

        let moves = latest_moves(&round);
        assert_eq!(moves.len(), 2);
        assert_eq!(moves["Bob"], Move::new("Bob", Future::Down, Mood::Sad));
        assert_eq!(moves["Carol"].future, Future::Neutral);
    }
}
