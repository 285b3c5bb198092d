//! Entity and effect collaborator seams. The pipeline awaits these; each
//! call resolves when its visual effect has completed. Mesh construction and
//! asset loading stay behind the rendering collaborator; the impls here own
//! piece/camera state and pacing only.

pub mod board;
pub mod dice;

use async_trait::async_trait;

use crate::errors::ClientResult;
use crate::protocol::TileKind;

#[async_trait]
pub trait PieceAnimator: Send + Sync {
    /// Loads (or reloads) the tile definitions. Idempotent; called before
    /// any placement from a snapshot that carries board data.
    async fn sync_board(&self, tiles: &[TileKind]) -> ClientResult<()>;

    /// Instant placement, no tween.
    async fn set_positions(&self, positions: &[usize]) -> ClientResult<()>;

    /// Tweened forward movement, hop by hop, wrapping past the last tile.
    async fn move_piece(&self, player: usize, steps: usize) -> ClientResult<()>;

    /// Camera ease toward a player's piece.
    async fn pan_camera_to(&self, player: usize) -> ClientResult<()>;
}

#[async_trait]
pub trait DiceVisual: Send + Sync {
    async fn show(&self) -> ClientResult<()>;
    async fn roll(&self, value: u8) -> ClientResult<()>;
    async fn hide(&self) -> ClientResult<()>;
}
