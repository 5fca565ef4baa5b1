
use chrono::Utc;
use rand::Rng;

/// Random identifier for a live viewer connection.
pub fn new_viewer_id() -> u64 {
    rand::rng().random::<u64>()
}

/// Current time as Unix epoch milliseconds, the timestamp unit of room events.
pub fn now_millis() -> i64 {
    Utc::now().timestamp_millis()
}
