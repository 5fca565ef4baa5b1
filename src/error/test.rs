#[cfg(test)]
mod tests {
    use crate::error::{ErrorKind, PokerError, StoreError};

    #[test]
    fn test_error_kinds() {
        assert_eq!(PokerError::RoomNotFound.kind(), ErrorKind::NotFound);
        assert_eq!(PokerError::RoundNotFound(1).kind(), ErrorKind::NotFound);
        assert_eq!(PokerError::Unauthorized.kind(), ErrorKind::Unauthorized);
        assert_eq!(PokerError::RoundConflict.kind(), ErrorKind::Conflict);
        assert_eq!(PokerError::InvalidRound(2).kind(), ErrorKind::Conflict);
        assert_eq!(
            PokerError::InvalidMove("x".into()).kind(),
            ErrorKind::InvalidInput
        );
        assert_eq!(PokerError::InvalidSubject(300).kind(), ErrorKind::InvalidInput);
        assert_eq!(
            PokerError::InvalidRequest("x".into()).kind(),
            ErrorKind::InvalidInput
        );
        assert_eq!(PokerError::Internal("x".into()).kind(), ErrorKind::Internal);
    }

    #[test]
    fn test_store_errors_convert() {
        assert_eq!(PokerError::from(StoreError::NotFound), PokerError::RoomNotFound);

        let converted = PokerError::from(StoreError::VersionConflict {
            expected: 1,
            found: 2,
        });
        assert_eq!(converted.kind(), ErrorKind::Internal);
    }

    #[test]
    fn test_messages_are_human_readable() {
        assert_eq!(
            PokerError::Unauthorized.to_string(),
            "Organizer authentication failed"
        );
        assert_eq!(
            PokerError::RoundConflict.to_string(),
            "Another round is still open"
        );
    }
}
