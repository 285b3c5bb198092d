//! Executes one snapshot's operation list against the stage collaborators,
//! in emission order, inside a single pipeline job. Every await here is a
//! suspension point of that job; the frame loop keeps rendering meanwhile.

use std::sync::Arc;
use std::time::Duration;

use actix::Addr;
use tracing::debug;

use crate::errors::ClientResult;
use crate::protocol::GameSnapshot;
use crate::reconcile::VisualOp;
use crate::scene::messages::{CreateScene, SwitchTo};
use crate::scene::{builder, SceneHub, SceneServices, SCENE_END};
use crate::scenes::end::EndScene;
use crate::stage::{DiceVisual, PieceAnimator};
use crate::status::{StatusFeed, StatusKind};

/// Collaborator bundle one snapshot job plays against.
#[derive(Clone)]
pub struct Stage {
    pub board: Arc<dyn PieceAnimator>,
    pub dice: Arc<dyn DiceVisual>,
    pub hub: Addr<SceneHub>,
    pub status: StatusFeed,
    pub services: SceneServices,
    /// Dramatic beat between blocking operations.
    pub beat: Duration,
}

pub async fn apply_ops(
    stage: &Stage,
    snapshot: &GameSnapshot,
    ops: Vec<VisualOp>,
) -> ClientResult<()> {
    if let Some(tiles) = &snapshot.board_types {
        stage.board.sync_board(tiles).await?;
    }

    for op in ops {
        debug!("applying {:?}", op);
        match op {
            VisualOp::PlaceAll { positions } => {
                stage.board.set_positions(&positions).await?;
            }
            VisualOp::RollDice { value } => {
                stage.dice.show().await?;
                stage.dice.roll(value).await?;
                stage.dice.hide().await?;
                pause(stage.beat).await;
            }
            VisualOp::MovePiece { player, steps } => {
                stage.board.move_piece(player, steps).await?;
            }
            VisualOp::PanCamera { player } => {
                stage.board.pan_camera_to(player).await?;
                pause(stage.beat).await;
            }
            VisualOp::ScoreNote { player, delta } => {
                // Side-effect only; never blocks the rest of the list.
                stage
                    .status
                    .publish(StatusKind::Score, score_text(snapshot, player, delta));
            }
            VisualOp::EnterEnd { winner } => {
                let nickname = snapshot
                    .players
                    .get(winner)
                    .map(|p| p.nickname.clone())
                    .unwrap_or_else(|| "?".to_string());
                let services = stage.services.clone();
                stage
                    .hub
                    .send(CreateScene {
                        name: SCENE_END.to_string(),
                        build: builder(move || EndScene::new(services, nickname)),
                    })
                    .await??;
                stage
                    .hub
                    .send(SwitchTo {
                        name: SCENE_END.to_string(),
                    })
                    .await??;
            }
        }
    }
    Ok(())
}

async fn pause(beat: Duration) {
    if !beat.is_zero() {
        tokio::time::sleep(beat).await;
    }
}

fn score_text(snapshot: &GameSnapshot, player: usize, delta: i64) -> String {
    let name = snapshot
        .players
        .get(player)
        .map(|p| p.nickname.as_str())
        .unwrap_or("?");
    let amount = delta.unsigned_abs();
    let unit = if amount == 1 { "star" } else { "stars" };
    if delta > 0 {
        format!("{} gained {} {}", name, amount, unit)
    } else {
        format!("{} lost {} {}", name, amount, unit)
    }
}
