use axum::response::sse::Event;
use futures::stream::{Stream, StreamExt};
use std::convert::Infallible;
use tokio::sync::broadcast;
use tracing::{info, warn};

use crate::modules::conversation::model::ConversationRecord;

pub const NEW_DATA_EVENT: &str = "newData";

/// Fan-out channel for newly ingested conversation records. Subscribers
/// only see records published while they are connected; there is no
/// buffering or replay across connections.
#[derive(Clone)]
pub struct EventBroadcaster {
    tx: broadcast::Sender<ConversationRecord>,
}

impl EventBroadcaster {
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity);
        Self { tx }
    }

    /// Best-effort publish; a send error only means nobody is listening.
    pub fn publish(&self, record: ConversationRecord) {
        let _ = self.tx.send(record);
    }

    pub fn client_count(&self) -> usize {
        self.tx.receiver_count()
    }

    pub fn subscribe(&self) -> broadcast::Receiver<ConversationRecord> {
        self.tx.subscribe()
    }

    /// SSE event stream for one client connection. Each published record
    /// becomes one `newData` event.
    pub fn subscribe_stream(&self) -> impl Stream<Item = Result<Event, Infallible>> {
        let guard = ConnectionGuard;
        let stream = tokio_stream::wrappers::BroadcastStream::new(self.tx.subscribe());

        stream.filter_map(move |result| {
            let _ = &guard;
            async move {
                match result {
                    Ok(record) => Event::default()
                        .event(NEW_DATA_EVENT)
                        .json_data(&record)
                        .ok()
                        .map(Ok),
                    Err(e) => {
                        warn!("Realtime client lagged: {:?}", e);
                        None
                    }
                }
            }
        })
    }
}

/// Dropped when the client's stream is torn down.
struct ConnectionGuard;

impl Drop for ConnectionGuard {
    fn drop(&mut self) {
        info!("Realtime client disconnected");
    }
}
