//! Messages a live viewer may send over its connection.

mod test;

use serde::{Deserialize, Serialize};
use std::fmt::Debug;

/// Inbound viewer message.
///
/// Serialized as `{"type": "...", "data": ...}`; neither variant carries data.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
#[serde(tag = "type", content = "data")]
pub enum ViewerMessage {
    /// Resend the full room snapshot (triggering a Snapshot response)
    Snapshot,
    /// Mark the viewer's player as disconnected (triggering an Update broadcast)
    Leave,
}
