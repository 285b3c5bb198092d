//! Inbound event routing and the mini-game lifecycle. The director turns
//! validated channel events into pipeline jobs and scene switches; it is the
//! only producer of snapshot jobs, which keeps the latest-wins coalescing a
//! local property.

pub mod channel;
pub mod handlers;
pub mod messages;

use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use std::time::Duration;

use actix::{
    Actor, ActorFutureExt, Addr, AsyncContext, Context, ContextFutureSpawner, MessageResponse,
    WrapFuture,
};
use parking_lot::Mutex;
use tracing::{error, info};

use crate::apply::Stage;
use crate::errors::ClientError;
use crate::pipeline::AnimationPipeline;
use crate::protocol::GameSnapshot;
use crate::scene::messages::{CreateScene, SwitchTo};
use crate::scene::{builder, SceneHub, SceneServices, SCENE_MAIN};
use crate::scenes::board::BoardScene;
use crate::scenes::rounds::MiniGameCatalog;
use crate::stage::{DiceVisual, PieceAnimator};
use crate::state::StateStore;
use crate::status::StatusFeed;
use crate::transport::GamePublisher;

#[derive(Debug, Clone, PartialEq, Eq, MessageResponse)]
pub enum MiniGamePhase {
    OnBoard,
    AwaitingEntry,
    InMiniGame(String),
    ReportingOutcome,
}

pub struct GameDirector {
    pub(crate) store: Arc<StateStore>,
    pub(crate) pipeline: AnimationPipeline,
    pub(crate) board: Arc<dyn PieceAnimator>,
    pub(crate) dice: Arc<dyn DiceVisual>,
    pub(crate) hub: Addr<SceneHub>,
    pub(crate) publisher: GamePublisher,
    pub(crate) status: StatusFeed,
    pub(crate) catalog: Arc<MiniGameCatalog>,
    pub(crate) local_nickname: String,
    pub(crate) beat: Duration,
    pub(crate) phase: MiniGamePhase,
    /// Latest snapshot not yet picked up by a pipeline job. Replacing an
    /// unapplied snapshot here is the backpressure policy: queue depth from
    /// snapshots is bounded at one.
    pub(crate) pending: Arc<Mutex<Option<GameSnapshot>>>,
    pub(crate) scheduled: Arc<AtomicBool>,
    pub(crate) stage: Option<Stage>,
}

pub struct GameDirectorDeps {
    pub store: Arc<StateStore>,
    pub pipeline: AnimationPipeline,
    pub board: Arc<dyn PieceAnimator>,
    pub dice: Arc<dyn DiceVisual>,
    pub hub: Addr<SceneHub>,
    pub publisher: GamePublisher,
    pub status: StatusFeed,
    pub catalog: Arc<MiniGameCatalog>,
    pub local_nickname: String,
    pub beat: Duration,
}

impl GameDirector {
    pub fn new(deps: GameDirectorDeps) -> Self {
        Self {
            store: deps.store,
            pipeline: deps.pipeline,
            board: deps.board,
            dice: deps.dice,
            hub: deps.hub,
            publisher: deps.publisher,
            status: deps.status,
            catalog: deps.catalog,
            local_nickname: deps.local_nickname,
            beat: deps.beat,
            phase: MiniGamePhase::OnBoard,
            pending: Arc::new(Mutex::new(None)),
            scheduled: Arc::new(AtomicBool::new(false)),
            stage: None,
        }
    }

    fn services(&self, ctx: &mut Context<Self>) -> SceneServices {
        SceneServices {
            hub: self.hub.clone(),
            director: ctx.address(),
            store: self.store.clone(),
            status: self.status.clone(),
            publisher: self.publisher.clone(),
            local_nickname: self.local_nickname.clone(),
        }
    }
}

impl Actor for GameDirector {
    type Context = Context<Self>;

    fn started(&mut self, ctx: &mut Self::Context) {
        info!("game director started (local player '{}')", self.local_nickname);
        let services = self.services(ctx);
        self.stage = Some(Stage {
            board: self.board.clone(),
            dice: self.dice.clone(),
            hub: self.hub.clone(),
            status: self.status.clone(),
            services: services.clone(),
            beat: self.beat,
        });

        // Register and activate the board scene before any event arrives;
        // the mailbox holds events until this completes.
        let hub = self.hub.clone();
        let board_services = services;
        async move {
            hub.send(CreateScene {
                name: SCENE_MAIN.to_string(),
                build: builder(move || BoardScene::new(board_services)),
            })
            .await??;
            hub.send(SwitchTo {
                name: SCENE_MAIN.to_string(),
            })
            .await??;
            Ok::<(), ClientError>(())
        }
        .into_actor(self)
        .map(|res, _act, _ctx| {
            if let Err(e) = res {
                error!("board scene setup failed: {}", e);
            }
        })
        .wait(ctx);
    }
}
