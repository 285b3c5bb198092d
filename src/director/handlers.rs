use std::sync::atomic::Ordering;

use actix::{ActorFutureExt, Context, ContextFutureSpawner, Handler, WrapFuture};
use tracing::{debug, info, warn};

use crate::apply::apply_ops;
use crate::director::messages::{
    ChannelReconnected, GetPhase, InstructionReceived, OutcomeReceived, RoundFinished,
    SnapshotReceived,
};
use crate::director::{GameDirector, MiniGamePhase};
use crate::errors::ClientError;
use crate::protocol::MiniGameResult;
use crate::reconcile::reconcile;
use crate::scene::messages::{CreateScene, SwitchTo};
use crate::scene::SCENE_MAIN;
use crate::status::StatusKind;

impl Handler<SnapshotReceived> for GameDirector {
    type Result = ();

    fn handle(&mut self, msg: SnapshotReceived, _ctx: &mut Context<Self>) {
        if self.pending.lock().replace(msg.0).is_some() {
            // Latest wins: the skipped snapshot's dice/score beats are
            // subsumed by the diff against the newest one.
            debug!("unapplied snapshot collapsed by a newer one");
        }

        if self.scheduled.swap(true, Ordering::SeqCst) {
            return;
        }
        let Some(stage) = self.stage.clone() else {
            warn!("snapshot before director setup finished; dropped");
            self.scheduled.store(false, Ordering::SeqCst);
            return;
        };
        let store = self.store.clone();
        let pending = self.pending.clone();
        let scheduled = self.scheduled.clone();
        self.pipeline.enqueue("snapshot", move || async move {
            scheduled.store(false, Ordering::SeqCst);
            let Some(snapshot) = pending.lock().take() else {
                // A predecessor job already played this slot.
                return Ok(());
            };
            let previous = if store.take_resync() {
                info!("resync: applying snapshot as initial truth");
                None
            } else {
                store.last_applied()
            };
            let ops = match reconcile(previous.as_ref(), &snapshot) {
                Ok(ops) => ops,
                Err(e) => {
                    // The board cannot be rendered correctly without this
                    // data; tell the user instead of animating nonsense.
                    stage
                        .status
                        .publish(StatusKind::Error, format!("state update unusable: {}", e));
                    return Err(e);
                }
            };
            if let Err(e) = apply_ops(&stage, &snapshot, ops).await {
                // Pieces may have moved partway; force instant placement on
                // the next snapshot instead of diffing against drifted state.
                store.mark_resync();
                return Err(e);
            }
            store.commit(snapshot);
            Ok(())
        });
    }
}

impl Handler<InstructionReceived> for GameDirector {
    type Result = ();

    fn handle(&mut self, msg: InstructionReceived, ctx: &mut Context<Self>) {
        let instruction = msg.0;
        if !instruction.targets(&self.local_nickname) {
            let player = instruction.player_nickname.as_deref().unwrap_or("?");
            self.status.publish(
                StatusKind::Spectator,
                format!("{} is playing {}", player, instruction.mini_game_name),
            );
            return;
        }

        self.phase = MiniGamePhase::AwaitingEntry;
        let name = instruction.mini_game_name;
        let pipeline = self.pipeline.clone();
        let hub = self.hub.clone();
        let catalog = self.catalog.clone();
        let Some(services) = self.stage.as_ref().map(|s| s.services.clone()) else {
            warn!("instruction before director setup finished; dropped");
            self.phase = MiniGamePhase::OnBoard;
            return;
        };
        let entered = name.clone();
        async move {
            // The instruction raced the dice/movement of the roll that
            // triggered it; entering now would cut that animation mid-flight.
            pipeline.wait_idle().await;
            if let Some(build) = catalog.builder(&name, services) {
                hub.send(CreateScene {
                    name: name.clone(),
                    build,
                })
                .await??;
            }
            hub.send(SwitchTo { name }).await?
        }
        .into_actor(self)
        .map(move |res: Result<(), ClientError>, act, _ctx| match res {
            Ok(()) => act.phase = MiniGamePhase::InMiniGame(entered),
            Err(e) => {
                act.phase = MiniGamePhase::OnBoard;
                act.status.publish(
                    StatusKind::Error,
                    format!("cannot enter mini-game '{}': {}", entered, e),
                );
            }
        })
        .spawn(ctx);
    }
}

impl Handler<RoundFinished> for GameDirector {
    type Result = ();

    fn handle(&mut self, msg: RoundFinished, ctx: &mut Context<Self>) {
        self.phase = MiniGamePhase::ReportingOutcome;
        let publisher = self.publisher.clone();
        let hub = self.hub.clone();
        let result = MiniGameResult {
            mini_game_name: msg.mini_game_name,
            score: msg.score,
        };
        async move {
            publisher.report_result(&result).await?;
            hub.send(SwitchTo {
                name: SCENE_MAIN.to_string(),
            })
            .await?
        }
        .into_actor(self)
        .map(|res: Result<(), ClientError>, act, _ctx| {
            act.phase = MiniGamePhase::OnBoard;
            if let Err(e) = res {
                act.status
                    .publish(StatusKind::Error, format!("round teardown failed: {}", e));
            }
        })
        .spawn(ctx);
    }
}

impl Handler<OutcomeReceived> for GameDirector {
    type Result = ();

    fn handle(&mut self, msg: OutcomeReceived, _ctx: &mut Context<Self>) {
        let outcome = msg.0;
        let unit = if outcome.winner_score == 1 {
            "point"
        } else {
            "points"
        };
        // No scene switch here; the next snapshot's score delta is what the
        // reconciler reacts to.
        self.status.publish(
            StatusKind::MiniGame,
            format!(
                "{} won {} with {} {}",
                outcome.winner_nickname, outcome.mini_game_name, outcome.winner_score, unit
            ),
        );
    }
}

impl Handler<ChannelReconnected> for GameDirector {
    type Result = ();

    fn handle(&mut self, _msg: ChannelReconnected, _ctx: &mut Context<Self>) {
        info!("channel reconnected; next snapshot will be applied without diffing");
        self.store.mark_resync();
    }
}

impl Handler<GetPhase> for GameDirector {
    type Result = MiniGamePhase;

    fn handle(&mut self, _msg: GetPhase, _ctx: &mut Context<Self>) -> Self::Result {
        self.phase.clone()
    }
}
