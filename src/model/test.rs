#[cfg(test)]
mod tests {
    use crate::error::PokerError;
    use crate::model::{
        Event, Future, Mood, Move, Organizer, Player, PlayerRef, PlayerStatus, Room, RoomHash,
        Round,
    };
    use serde_json::json;

    fn organizer() -> Organizer {
        Organizer {
            name: "Alice".to_string(),
            profile: "cat".to_string(),
            password: "p1".to_string(),
        }
    }

    #[test]
    fn test_new_room_has_organizer_as_connected_player() {
        let room = Room::new(organizer());

        assert_eq!(room.players.len(), 1);
        let alice = room.player("Alice").unwrap();
        assert!(alice.organizer);
        assert_eq!(alice.status, PlayerStatus::Connected);
        assert!(room.rounds.is_empty());
        assert!(room.history.is_empty());
    }

    #[test]
    fn test_room_hashes_are_unique() {
        assert_ne!(RoomHash::generate(), RoomHash::generate());
    }

    #[test]
    fn test_parse_move_values() {
        assert_eq!("up".parse::<Future>().unwrap(), Future::Up);
        assert_eq!("down".parse::<Future>().unwrap(), Future::Down);
        assert_eq!("sad".parse::<Mood>().unwrap(), Mood::Sad);
        assert!(matches!(
            "sideways".parse::<Future>(),
            Err(PokerError::InvalidMove(_))
        ));
        assert!(matches!("Happy".parse::<Mood>(), Err(PokerError::InvalidMove(_))));
    }

    #[test]
    fn test_movement_event_wire_format() {
        let event = Event::Movement {
            subject_id: 3,
            player: PlayerRef {
                name: "Bob".to_string(),
            },
            played: Move::new("Bob", Future::Up, Mood::Happy),
            timestamp: 42,
        };

        let value = serde_json::to_value(&event).unwrap();
        assert_eq!(
            value,
            json!({
                "type": "movement",
                "subjectId": 3,
                "player": { "name": "Bob" },
                "move": { "playerName": "Bob", "future": "up", "mood": "happy" },
                "timestamp": 42
            })
        );

        let back: Event = serde_json::from_value(value).unwrap();
        assert_eq!(back, event);
    }

    #[test]
    fn test_round_event_type_tags() {
        let started = Event::RoundStarted {
            round: Round::open(7),
            timestamp: 1,
        };
        let value = serde_json::to_value(&started).unwrap();
        assert_eq!(value["type"], "round-started");
        assert_eq!(value["round"]["subjectId"], 7);
        assert_eq!(value["round"]["closed"], false);

        let left = Event::PlayerDisconnected {
            player: Player::connected("Bob", "dog"),
            timestamp: 2,
        };
        assert_eq!(serde_json::to_value(&left).unwrap()["type"], "player-disconnected");
        assert_eq!(left.kind(), "player-disconnected");
        assert_eq!(left.timestamp(), 2);
    }

    #[test]
    fn test_view_hides_password() {
        let room = Room::new(organizer());
        let view = room.view(&RoomHash::from("abc"));

        let json = serde_json::to_string(&view).unwrap();
        assert!(!json.contains("p1"));
        assert!(json.contains("\"roomHash\":\"abc\""));
    }

    #[test]
    fn test_latest_round_prefers_most_recent_record() {
        let mut room = Room::new(organizer());
        let mut first = Round::open(1);
        first.closed = true;
        room.rounds.push(first);
        room.rounds.push(Round::open(1));

        let latest = room.latest_round(1).unwrap();
        assert!(latest.is_open());
        assert!(room.open_round().is_some());
        assert!(room.latest_round(2).is_none());
    }
}
