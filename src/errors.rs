use thiserror::Error;

/// Unified error types for the client runtime
#[derive(Error, Debug)]
pub enum ClientError {
    #[error("board tile data missing from snapshot; cannot animate movement")]
    MissingBoardData,

    #[error("snapshot rejected at channel boundary: {reason}")]
    SnapshotRejected { reason: String },

    #[error("no scene registered under name: {name}")]
    UnknownScene { name: String },

    #[error("channel send failed for destination {destination}")]
    ChannelSend { destination: String },

    #[error("JSON serialization/deserialization failed: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Actor mailbox error: {0}")]
    Mailbox(#[from] actix::MailboxError),

    #[error("Internal error: {message}")]
    Internal { message: String },
}

/// Result type alias for runtime operations
pub type ClientResult<T> = Result<T, ClientError>;

/// Helper functions for common error scenarios
impl ClientError {
    pub fn rejected(reason: impl Into<String>) -> Self {
        Self::SnapshotRejected {
            reason: reason.into(),
        }
    }

    pub fn unknown_scene(name: impl Into<String>) -> Self {
        Self::UnknownScene { name: name.into() }
    }

    pub fn channel_send(destination: impl Into<String>) -> Self {
        Self::ChannelSend {
            destination: destination.into(),
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }
}
