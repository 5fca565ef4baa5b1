use crate::connection::{ConnectionError, SinkAdapter, StreamAdapter};
use crate::error::PokerError;
use crate::http::{ApiPath, AppState};
use crate::message::ViewerMessage;
use crate::model::RoomHash;
use crate::response::Response;
use async_trait::async_trait;
use axum::extract::ws::{Message, Utf8Bytes, WebSocket};
use axum::extract::{Query, State, WebSocketUpgrade};
use axum::response::IntoResponse;
use futures_util::stream::{SplitSink, SplitStream};
use futures_util::{SinkExt, StreamExt};
use serde::Deserialize;
use std::sync::Arc;
use tracing::{debug, warn};

pub struct AxumWSSink {
    sink: SplitSink<WebSocket, Message>,
}

#[async_trait]
impl SinkAdapter for AxumWSSink {
    async fn send(&mut self, response: Arc<Response>) -> Result<(), ConnectionError> {
        let message = Message::Text(Utf8Bytes::from(serde_json::to_string(response.as_ref())?));
        self.sink.send(message).await.map_err(|e| Box::new(e) as _)
    }
}

pub struct AxumWSStream {
    stream: SplitStream<WebSocket>,
}

#[async_trait]
impl StreamAdapter for AxumWSStream {
    /// Skips control frames and payloads that are not a `ViewerMessage`.
    async fn next(&mut self) -> Result<Option<ViewerMessage>, ConnectionError> {
        while let Some(message) = self.stream.next().await {
            match message? {
                Message::Text(text) => match serde_json::from_str(text.as_str()) {
                    Ok(parsed) => return Ok(Some(parsed)),
                    Err(e) => debug!(error = %e, "ignoring malformed viewer message"),
                },
                Message::Close(_) => return Ok(None),
                _ => {}
            }
        }
        Ok(None)
    }
}

#[derive(Debug, Deserialize)]
pub struct LiveParams {
    /// Player the viewer identifies as; anonymous viewers omit it.
    pub player: Option<String>,
}

pub async fn live_handler(
    ws: WebSocketUpgrade,
    State(state): State<AppState>,
    ApiPath(room_hash): ApiPath<String>,
    Query(params): Query<LiveParams>,
) -> Result<impl IntoResponse, PokerError> {
    let hash = RoomHash::from(room_hash);
    // Unknown rooms are refused before the upgrade
    state.service.get_room(&hash).await?;

    let service = state.service.clone();
    Ok(ws.on_upgrade(move |socket| async move {
        let (sender, receiver) = socket.split();
        let mut stream = AxumWSStream { stream: receiver };
        let sink = AxumWSSink { sink: sender };

        if let Err(e) = service
            .handle_stream(&hash, params.player, &mut stream, sink)
            .await
        {
            warn!(room = %hash, error = %e, "live connection ended with error");
        }
    }))
}
