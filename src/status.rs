use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;
use tracing::info;
use uuid::Uuid;

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum StatusKind {
    Turn,
    Score,
    MiniGame,
    Match,
    Spectator,
    Error,
}

/// One user-facing notice. The UI collaborator renders these in arrival
/// order; the runtime only produces them.
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct StatusNote {
    /// Stable id so the panel collaborator can dismiss/replace notices.
    pub id: Uuid,
    pub kind: StatusKind,
    pub timestamp: DateTime<Utc>,
    pub text: String,
}

/// Fan-out feed of status notices. Publishing never blocks and never fails
/// the caller; a feed nobody listens to is still valid.
#[derive(Clone)]
pub struct StatusFeed {
    tx: broadcast::Sender<StatusNote>,
}

impl StatusFeed {
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity);
        Self { tx }
    }

    pub fn publish(&self, kind: StatusKind, text: impl Into<String>) {
        let note = StatusNote {
            id: Uuid::new_v4(),
            kind,
            timestamp: Utc::now(),
            text: text.into(),
        };
        info!("status [{:?}] {}", note.kind, note.text);
        let _ = self.tx.send(note);
    }

    pub fn subscribe(&self) -> broadcast::Receiver<StatusNote> {
        self.tx.subscribe()
    }
}

impl Default for StatusFeed {
    fn default() -> Self {
        Self::new(64)
    }
}
