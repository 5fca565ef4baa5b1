//! Live fan-out of room changes to the viewers subscribed to each room.
//!
//! Every viewer owns a bounded queue drained by its own writer task, so a
//! slow or broken connection never holds up delivery to the others or the
//! request that triggered the change.


use crate::connection::SinkAdapter;
use crate::model::{Room, RoomHash};
use crate::response::Response;
use crate::utils::new_viewer_id;
use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;
use tokio::sync::mpsc::{self, error::TrySendError};
use tokio::sync::Mutex;
use tracing::{debug, warn};

pub type ViewerId = u64;

struct Viewer {
    /// Player the viewer identified as, if any.
    player: Option<String>,
    sender: mpsc::Sender<Arc<Response>>,
}

/// Viewers of one room, locked independently of every other room.
type RoomViewers = Arc<Mutex<HashMap<ViewerId, Viewer>>>;

pub struct Broadcaster {
    rooms: Mutex<HashMap<RoomHash, RoomViewers>>,
    buffer: usize,
}

impl Broadcaster {
    pub fn new(buffer: usize) -> Broadcaster {
        Broadcaster {
            rooms: Mutex::new(HashMap::new()),
            buffer: buffer.max(1),
        }
    }

    /// Registers a viewer and queues `initial` as its first message.
    ///
    /// `initial` is awaited while the room's viewers are locked, so no
    /// broadcast to that room can land between the snapshot being read and
    /// the viewer being registered. Other rooms are not held up. If `initial`
    /// fails, nothing is registered.
    pub async fn subscribe<S, F, E>(
        &self,
        room: &RoomHash,
        player: Option<String>,
        sink: S,
        initial: F,
    ) -> Result<ViewerId, E>
    where
        S: SinkAdapter + Send + 'static,
        F: Future<Output = Result<Response, E>>,
    {
        let room_viewers = self
            .rooms
            .lock()
            .await
            .entry(room.clone())
            .or_default()
            .clone();
        let mut viewers = room_viewers.lock().await;

        let first = match initial.await {
            Ok(first) => first,
            Err(e) => {
                drop(viewers);
                drop(room_viewers);
                self.prune(room).await;
                return Err(e);
            }
        };

        let (sender, receiver) = mpsc::channel(self.buffer);
        let id = new_viewer_id();
        // A fresh channel always has room for one message
        let _ = sender.try_send(Arc::new(first));

        spawn_writer(room.clone(), id, receiver, sink);
        viewers.insert(id, Viewer { player, sender });
        debug!(room = %room, viewer = id, "viewer subscribed");
        Ok(id)
    }

    /// Removes a viewer. Returns the viewer's player name when no other
    /// viewer of that room is still identified as the same player.
    pub async fn unsubscribe(&self, room: &RoomHash, viewer: ViewerId) -> Option<String> {
        let room_viewers = self.room(room).await?;
        let player = {
            let mut viewers = room_viewers.lock().await;
            let removed = viewers.remove(&viewer)?;
            debug!(room = %room, viewer, "viewer unsubscribed");

            let still_watching = removed.player.as_deref().is_some_and(|name| {
                viewers
                    .values()
                    .any(|v| v.player.as_deref() == Some(name))
            });
            removed.player.filter(|_| !still_watching)
        };

        drop(room_viewers);
        self.prune(room).await;
        player
    }

    /// Queues a message for a single viewer.
    pub async fn send_to(&self, room: &RoomHash, viewer: ViewerId, response: Response) -> bool {
        let Some(room_viewers) = self.room(room).await else {
            return false;
        };
        let viewers = room_viewers.lock().await;
        match viewers.get(&viewer) {
            Some(v) => v.sender.try_send(Arc::new(response)).is_ok(),
            None => false,
        }
    }

    /// Queues `response` for every viewer of the room, except viewers
    /// identified as `skip` and viewers whose player is disconnected in
    /// `state`. Returns the number of viewers it was queued for.
    pub async fn broadcast(
        &self,
        room: &RoomHash,
        state: &Room,
        response: Response,
        skip: Option<&str>,
    ) -> usize {
        let Some(room_viewers) = self.room(room).await else {
            return 0;
        };
        let mut viewers = room_viewers.lock().await;

        let response = Arc::new(response);
        let mut delivered = 0;
        let mut gone = Vec::new();

        for (id, viewer) in viewers.iter() {
            if let Some(name) = viewer.player.as_deref() {
                if skip == Some(name) {
                    continue;
                }
                if state.player(name).is_some_and(|p| !p.is_connected()) {
                    continue;
                }
            }

            match viewer.sender.try_send(response.clone()) {
                Ok(()) => delivered += 1,
                Err(TrySendError::Full(_)) => {
                    warn!(room = %room, viewer = id, "viewer queue full, dropping message");
                }
                Err(TrySendError::Closed(_)) => gone.push(*id),
            }
        }

        for id in gone {
            viewers.remove(&id);
            debug!(room = %room, viewer = id, "dropped closed viewer");
        }
        delivered
    }

    #[cfg(test)]
    pub async fn viewer_count(&self, room: &RoomHash) -> usize {
        match self.room(room).await {
            Some(room_viewers) => room_viewers.lock().await.len(),
            None => 0,
        }
    }

    #[cfg(test)]
    pub async fn room_count(&self) -> usize {
        self.rooms.lock().await.len()
    }

    async fn room(&self, room: &RoomHash) -> Option<RoomViewers> {
        self.rooms.lock().await.get(room).cloned()
    }

    /// Drops the room's entry once it has no viewers and nobody else holds it.
    async fn prune(&self, room: &RoomHash) {
        let mut rooms = self.rooms.lock().await;
        let idle = rooms.get(room).is_some_and(|room_viewers| {
            Arc::strong_count(room_viewers) == 1
                && room_viewers
                    .try_lock()
                    .is_ok_and(|viewers| viewers.is_empty())
        });
        if idle {
            rooms.remove(room);
        }
    }
}

fn spawn_writer<S>(
    room: RoomHash,
    viewer: ViewerId,
    mut receiver: mpsc::Receiver<Arc<Response>>,
    mut sink: S,
) where
    S: SinkAdapter + Send + 'static,
{
    tokio::spawn(async move {
        while let Some(response) = receiver.recv().await {
            if let Err(e) = sink.send(response).await {
                warn!(room = %room, viewer, error = %e, "failed to deliver to viewer");
                break;
            }
        }
    });
}
