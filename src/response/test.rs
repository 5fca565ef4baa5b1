#[cfg(test)]
mod tests {
    use crate::error::PokerError;
    use crate::model::{Event, Organizer, Player, Room, RoomHash};
    use crate::response::Response;
    use serde_json::{json, Value};

    fn room() -> Room {
        Room::new(Organizer {
            name: "Alice".to_string(),
            profile: "cat".to_string(),
            password: "secret".to_string(),
        })
    }

    #[test]
    fn test_snapshot_serialization() {
        let response = Response::Snapshot(room().view(&RoomHash::from("r1")));
        let value: Value = serde_json::to_value(&response).unwrap();

        assert_eq!(value["status"], "Snapshot");
        assert_eq!(value["message"]["roomHash"], "r1");
        assert_eq!(value["message"]["organizer"], json!({"name": "Alice", "profile": "cat"}));
        assert!(!value.to_string().contains("secret"));
    }

    #[test]
    fn test_update_serialization() {
        let event = Event::Player {
            player: Player::connected("Bob", "dog"),
            timestamp: 9,
        };
        let response = Response::update(event, room().view(&RoomHash::from("r1")));
        let value: Value = serde_json::to_value(&response).unwrap();

        assert_eq!(value["status"], "Update");
        assert_eq!(value["message"]["event"]["type"], "player");
        assert_eq!(value["message"]["event"]["player"]["name"], "Bob");
        assert_eq!(value["message"]["room"]["players"][0]["name"], "Alice");
    }

    #[test]
    fn test_error_serialization() {
        let cases = vec![
            (Response::ServerError("boom".into()), "ServerError"),
            (Response::ClientError("bad".into()), "ClientError"),
            (Response::NotFound("Room not found".into()), "NotFound"),
        ];

        for (response, status) in cases {
            let value: Value = serde_json::to_value(&response).unwrap();
            assert_eq!(value["status"], status);
            assert!(value["message"].is_string());
        }
    }

    #[test]
    fn test_errors_map_to_live_kinds() {
        assert_eq!(
            Response::from_error(&PokerError::RoomNotFound),
            Response::NotFound("Room not found".into())
        );
        assert_eq!(
            Response::from_error(&PokerError::PlayerNotFound("Zoe".into())),
            Response::NotFound("Player 'Zoe' not found".into())
        );
        assert_eq!(
            Response::from_error(&PokerError::Internal("disk on fire".into())),
            Response::ServerError("Internal server error".into())
        );
        assert_eq!(
            Response::from_error(&PokerError::RoundConflict),
            Response::ClientError("Another round is still open".into())
        );
        assert!(matches!(
            Response::from_error(&PokerError::Unauthorized),
            Response::ClientError(_)
        ));
    }
}
