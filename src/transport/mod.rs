//! Message-channel collaborator seam. The real broker client (connect,
//! reconnect, subscribe mechanics) lives outside this crate; the runtime only
//! consumes this contract. `LocalBus` is the in-process implementation used
//! by tests and the demo wiring.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;
use tokio::sync::mpsc;
use tracing::{debug, warn};

use crate::errors::{ClientError, ClientResult};
use crate::protocol::{MiniGameResult, Topics};

#[async_trait]
pub trait Transport: Send + Sync {
    /// Publishes a payload to a destination; resolves when handed off.
    async fn publish(&self, destination: &str, body: String) -> ClientResult<()>;

    /// Subscribes to a topic. Every payload published to it after this call
    /// is delivered in publish order.
    fn subscribe(&self, topic: &str) -> mpsc::UnboundedReceiver<String>;
}

/// In-process topic bus with per-topic fan-out.
#[derive(Default)]
pub struct LocalBus {
    subscribers: Mutex<HashMap<String, Vec<mpsc::UnboundedSender<String>>>>,
}

impl LocalBus {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl Transport for LocalBus {
    async fn publish(&self, destination: &str, body: String) -> ClientResult<()> {
        let mut subscribers = self.subscribers.lock();
        match subscribers.get_mut(destination) {
            Some(senders) => {
                senders.retain(|tx| tx.send(body.clone()).is_ok());
                debug!(
                    "published to {} ({} subscriber(s))",
                    destination,
                    senders.len()
                );
                Ok(())
            }
            None => {
                // Destinations without subscribers are routine for outbound
                // app channels in tests.
                debug!("published to {} (no subscribers)", destination);
                Ok(())
            }
        }
    }

    fn subscribe(&self, topic: &str) -> mpsc::UnboundedReceiver<String> {
        let (tx, rx) = mpsc::unbounded_channel();
        self.subscribers
            .lock()
            .entry(topic.to_string())
            .or_default()
            .push(tx);
        rx
    }
}

/// Outbound publish actions of the runtime, bound to one room's destinations.
#[derive(Clone)]
pub struct GamePublisher {
    transport: Arc<dyn Transport>,
    topics: Topics,
}

impl GamePublisher {
    pub fn new(transport: Arc<dyn Transport>, topics: Topics) -> Self {
        Self { transport, topics }
    }

    /// Requests a dice roll. Empty body; the server identifies the acting
    /// player from the session.
    pub async fn roll_dice(&self) -> ClientResult<()> {
        self.transport
            .publish(&self.topics.roll, "{}".to_string())
            .await
    }

    pub async fn report_result(&self, result: &MiniGameResult) -> ClientResult<()> {
        let body = serde_json::to_string(result)?;
        self.transport.publish(&self.topics.result, body).await
    }

    /// Asks the server to re-send the current snapshot.
    pub async fn ping(&self) -> ClientResult<()> {
        self.transport
            .publish(&self.topics.ping, "{}".to_string())
            .await
    }
}

/// Convenience for fire-and-forget publishes from synchronous scene code.
pub fn spawn_publish<F>(label: &'static str, fut: F)
where
    F: std::future::Future<Output = ClientResult<()>> + Send + 'static,
{
    tokio::spawn(async move {
        if let Err(e) = fut.await {
            warn!("outbound publish '{}' failed: {}", label, e);
        }
    });
}

impl From<mpsc::error::SendError<String>> for ClientError {
    fn from(_: mpsc::error::SendError<String>) -> Self {
        ClientError::channel_send("local bus")
    }
}
