#[cfg(test)]
mod tests {
    use crate::message::ViewerMessage;
    use serde_json::{json, Value};

    #[test]
    fn test_viewer_message_serialization() {
        let value: Value = serde_json::to_value(ViewerMessage::Leave).unwrap();
        assert_eq!(value, json!({ "type": "Leave" }));

        let value: Value = serde_json::to_value(ViewerMessage::Snapshot).unwrap();
        assert_eq!(value, json!({ "type": "Snapshot" }));
    }

    #[test]
    fn test_viewer_message_deserialization() {
        let message: ViewerMessage = serde_json::from_str(r#"{"type":"Leave"}"#).unwrap();
        assert_eq!(message, ViewerMessage::Leave);

        let message: ViewerMessage = serde_json::from_str(r#"{"type":"Snapshot"}"#).unwrap();
        assert_eq!(message, ViewerMessage::Snapshot);
    }

    #[test]
    fn test_unknown_viewer_message_is_rejected() {
        let result = serde_json::from_str::<ViewerMessage>(r#"{"type":"Vote","data":1}"#);
        assert!(result.is_err());

        let result = serde_json::from_str::<ViewerMessage>("not json");
        assert!(result.is_err());
    }
}
