use async_trait::async_trait;
use parking_lot::Mutex;
use tracing::{debug, info};

use crate::env::PacingSettings;
use crate::errors::{ClientError, ClientResult};
use crate::protocol::TileKind;
use crate::stage::PieceAnimator;

#[derive(Default)]
struct BoardState {
    tiles: Vec<TileKind>,
    /// Current tile index per player piece.
    indices: Vec<usize>,
}

/// Tween-paced board controller. Tracks piece tile indices, advances them hop
/// by hop with wrap-around, and paces every effect from settings. Piece state
/// is only ever mutated by the currently executing pipeline job; the lock
/// satisfies the compiler, not a concurrency need.
pub struct TweenBoard {
    pacing: PacingSettings,
    state: Mutex<BoardState>,
}

impl TweenBoard {
    pub fn new(pacing: PacingSettings) -> Self {
        Self {
            pacing,
            state: Mutex::new(BoardState::default()),
        }
    }

    pub fn piece_index(&self, player: usize) -> Option<usize> {
        self.state.lock().indices.get(player).copied()
    }

    fn board_len(&self) -> ClientResult<usize> {
        let len = self.state.lock().tiles.len();
        if len == 0 {
            return Err(ClientError::MissingBoardData);
        }
        Ok(len)
    }

    /// Players sharing a tile get spread out; alone on a tile means centered.
    fn tile_group(&self, tile: usize) -> Vec<usize> {
        self.state
            .lock()
            .indices
            .iter()
            .enumerate()
            .filter(|(_, &idx)| idx == tile)
            .map(|(player, _)| player)
            .collect()
    }
}

#[async_trait]
impl PieceAnimator for TweenBoard {
    async fn sync_board(&self, tiles: &[TileKind]) -> ClientResult<()> {
        let mut state = self.state.lock();
        if state.tiles == tiles {
            return Ok(());
        }
        info!("board loaded: {} tiles", tiles.len());
        state.tiles = tiles.to_vec();
        Ok(())
    }

    async fn set_positions(&self, positions: &[usize]) -> ClientResult<()> {
        {
            let mut state = self.state.lock();
            state.indices = positions.to_vec();
        }
        debug!("pieces placed at {:?}", positions);
        Ok(())
    }

    async fn move_piece(&self, player: usize, steps: usize) -> ClientResult<()> {
        let board_len = self.board_len()?;
        for _ in 0..steps {
            let landed = {
                let mut state = self.state.lock();
                let idx = state
                    .indices
                    .get_mut(player)
                    .ok_or_else(|| ClientError::internal(format!("no piece for player {}", player)))?;
                *idx = (*idx + 1) % board_len;
                *idx
            };
            tokio::time::sleep(self.pacing.hop()).await;
            debug!("player {} hopped to tile {}", player, landed);
        }
        let arrived = self.piece_index(player).unwrap_or(0);
        let group = self.tile_group(arrived);
        if group.len() > 1 {
            debug!("tile {} shared by players {:?}", arrived, group);
        }
        Ok(())
    }

    async fn pan_camera_to(&self, player: usize) -> ClientResult<()> {
        debug!("camera easing toward player {}", player);
        tokio::time::sleep(self.pacing.camera_pan()).await;
        Ok(())
    }
}
