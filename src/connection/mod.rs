//! Transport-neutral ends of a live viewer connection.
//!
//! The websocket handler and the in-process channel pair both implement
//! these traits, so the fan-out logic never sees a concrete transport.


use crate::message::ViewerMessage;
use crate::response::Response;
use async_trait::async_trait;
use std::sync::Arc;
use tokio::io;
use tokio::sync::mpsc::{self, Receiver, Sender};

pub type ConnectionError = Box<dyn std::error::Error + Send + Sync>;

/// Outbound half: pushes responses to one viewer.
#[async_trait]
pub trait SinkAdapter {
    async fn send(&mut self, response: Arc<Response>) -> Result<(), ConnectionError>;
}

/// Inbound half: yields the viewer's messages until the connection ends.
#[async_trait]
pub trait StreamAdapter {
    /// `Ok(None)` means the viewer went away cleanly.
    async fn next(&mut self) -> Result<Option<ViewerMessage>, ConnectionError>;
}

/// A [`SinkAdapter`] over a `tokio::sync::mpsc::Sender`.
#[derive(Clone)]
pub struct MPSCSink {
    sender: Sender<Arc<Response>>,
}

#[async_trait]
impl SinkAdapter for MPSCSink {
    async fn send(&mut self, response: Arc<Response>) -> Result<(), ConnectionError> {
        self.sender.send(response).await.map_err(|e| {
            Box::new(io::Error::new(
                io::ErrorKind::BrokenPipe,
                format!("Failed to send response: {}", e),
            )) as _
        })
    }
}

/// A [`StreamAdapter`] over a `tokio::sync::mpsc::Receiver`.
pub struct MPSCStream {
    receiver: Receiver<ViewerMessage>,
}

#[async_trait]
impl StreamAdapter for MPSCStream {
    async fn next(&mut self) -> Result<Option<ViewerMessage>, ConnectionError> {
        Ok(self.receiver.recv().await)
    }
}

/// An in-process viewer connection.
///
/// Returns the server-side ends (`MPSCStream`, `MPSCSink`) together with the
/// client-side ends used to send messages and read responses.
pub fn mpsc_pair(
    buffer_size: usize,
) -> (
    (MPSCStream, MPSCSink),
    (Sender<ViewerMessage>, Receiver<Arc<Response>>),
) {
    let (msg_tx, msg_rx) = mpsc::channel(buffer_size);
    let (resp_tx, resp_rx) = mpsc::channel(buffer_size);

    (
        (
            MPSCStream { receiver: msg_rx },
            MPSCSink { sender: resp_tx },
        ),
        (msg_tx, resp_rx),
    )
}
