//! Pure snapshot diffing. Compares two authoritative snapshots and produces
//! the ordered list of visual operations that transitions the view from one
//! to the other. Never mutates a snapshot, never touches a collaborator.

use crate::errors::{ClientError, ClientResult};
use crate::protocol::GameSnapshot;

/// One visual operation. The pipeline executes a snapshot's operations
/// strictly in the order this module emits them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VisualOp {
    /// Match is over; switch to the end scene for the winning player.
    EnterEnd { winner: usize },
    /// Instant placement of every piece, no tween. First snapshot and resync.
    PlaceAll { positions: Vec<usize> },
    /// Dice tumble settling on `value`.
    RollDice { value: u8 },
    /// Tweened forward movement of one piece, hop by hop.
    MovePiece { player: usize, steps: usize },
    /// Camera ease toward the piece that just moved.
    PanCamera { player: usize },
    /// Non-blocking score notice; positive delta means stars gained.
    ScoreNote { player: usize, delta: i64 },
}

/// Forward step count from `prev` to `next` on a circular board of
/// `board_len` tiles. A raw decrease is a lap past the last tile.
pub fn wrapped_steps(prev: usize, next: usize, board_len: usize) -> usize {
    if next >= prev {
        next - prev
    } else {
        next + board_len - prev
    }
}

/// Diffs `previous` against `current` into the ordered operation list.
///
/// Emission order is fixed: win check, first-snapshot bootstrap, dice,
/// per-player movement (index order, each move followed by its camera pan),
/// score notices. Movement with absent board data is a hard error; the board
/// cannot be rendered without tile definitions.
pub fn reconcile(
    previous: Option<&GameSnapshot>,
    current: &GameSnapshot,
) -> ClientResult<Vec<VisualOp>> {
    // Match over: nothing else from this snapshot is worth animating.
    if current.winner.is_some() {
        let winner = current
            .winner_index()
            .ok_or_else(|| ClientError::rejected("winner not present in player list"))?;
        return Ok(vec![VisualOp::EnterEnd { winner }]);
    }

    // First snapshot: place pieces instantly so they do not visibly jump
    // from tile 0 on load.
    let previous = match previous {
        Some(previous) => previous,
        None => {
            return Ok(vec![VisualOp::PlaceAll {
                positions: current.positions.clone(),
            }])
        }
    };

    let mut ops = Vec::new();

    if let Some(value) = current.last_dice_roll {
        if previous.last_dice_roll != Some(value) {
            ops.push(VisualOp::RollDice { value });
        }
    }

    let moved = current
        .positions
        .iter()
        .zip(previous.positions.iter())
        .any(|(next, prev)| next != prev);
    if moved {
        let board_len = current.board_len().ok_or(ClientError::MissingBoardData)?;
        for (player, (&prev, &next)) in previous
            .positions
            .iter()
            .zip(current.positions.iter())
            .enumerate()
        {
            let steps = wrapped_steps(prev, next, board_len);
            if steps > 0 {
                ops.push(VisualOp::MovePiece { player, steps });
                ops.push(VisualOp::PanCamera { player });
            }
        }
    }

    for (player, (&prev, &next)) in previous
        .scores
        .iter()
        .zip(current.scores.iter())
        .enumerate()
    {
        let delta = next - prev;
        if delta != 0 {
            ops.push(VisualOp::ScoreNote { player, delta });
        }
    }

    Ok(ops)
}
