//! Scene orchestration. A registry of named, mutually exclusive scenes with
//! exactly one active; the frame tick renders only the active one. Owned as
//! an explicit actor whose address is handed to every collaborator that needs
//! to request a switch, with construction and teardown tied to the session.

pub mod handlers;
pub mod input;
pub mod messages;

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use actix::{Actor, Addr, AsyncContext, Context};
use futures::future::LocalBoxFuture;
use futures::FutureExt;
use tracing::{info, warn};

use crate::scene::input::{InputBindings, InputEvent, InputRouter};
use crate::state::StateStore;
use crate::status::StatusFeed;
use crate::transport::GamePublisher;

pub const SCENE_MAIN: &str = "main";
pub const SCENE_END: &str = "end";

/// Everything a scene needs to act on the world: the registry for switch
/// requests, the director for lifecycle reports, shared state, the status
/// feed and the outbound publisher.
#[derive(Clone)]
pub struct SceneServices {
    pub hub: Addr<SceneHub>,
    pub director: Addr<crate::director::GameDirector>,
    pub store: Arc<StateStore>,
    pub status: StatusFeed,
    pub publisher: GamePublisher,
    pub local_nickname: String,
}

/// A self-contained renderable context. Input bindings are attached on
/// activation and detached on deactivation by the hub.
pub trait SceneBehavior {
    fn bindings(&self) -> InputBindings {
        InputBindings::default()
    }
    fn on_enter(&mut self) {}
    fn on_exit(&mut self) {}
    fn on_input(&mut self, _event: &InputEvent) {}
    fn render(&mut self, dt: Duration);
}

/// Deferred scene construction; may await asset loading before yielding the
/// behavior. Runs on the hub's arbiter without blocking other creations.
pub type SceneBuilder =
    Box<dyn FnOnce() -> LocalBoxFuture<'static, Box<dyn SceneBehavior>> + Send>;

/// Wraps a plain constructor into a `SceneBuilder`.
pub fn builder<F, B>(construct: F) -> SceneBuilder
where
    F: FnOnce() -> B + Send + 'static,
    B: SceneBehavior + 'static,
{
    Box::new(move || {
        async move { Box::new(construct()) as Box<dyn SceneBehavior> }.boxed_local()
    })
}

pub struct SceneHub {
    scenes: HashMap<String, Box<dyn SceneBehavior>>,
    active: Option<String>,
    router: InputRouter,
    frame_interval: Duration,
    last_frame: Option<Instant>,
    status: StatusFeed,
}

impl SceneHub {
    pub fn new(frame_interval: Duration, status: StatusFeed) -> Self {
        Self {
            scenes: HashMap::new(),
            active: None,
            router: InputRouter::default(),
            frame_interval,
            last_frame: None,
            status,
        }
    }

    fn install(&mut self, name: String, behavior: Box<dyn SceneBehavior>) {
        if self.scenes.contains_key(&name) {
            // Duplicate creation races resolve in favor of the first; the
            // existing scene owns input bindings and possibly a running round.
            warn!("scene '{}' already registered; keeping the existing one", name);
            return;
        }
        info!("scene '{}' registered", name);
        self.scenes.insert(name, behavior);
    }

    /// Renders exactly one scene per tick: the active one.
    fn frame(&mut self) {
        let now = Instant::now();
        let dt = self
            .last_frame
            .map(|last| now - last)
            .unwrap_or(self.frame_interval);
        self.last_frame = Some(now);

        if let Some(name) = &self.active {
            if let Some(scene) = self.scenes.get_mut(name) {
                scene.render(dt);
            }
        }
    }
}

impl Actor for SceneHub {
    type Context = Context<Self>;

    fn started(&mut self, ctx: &mut Self::Context) {
        info!(
            "scene hub started; frame loop at {:?} intervals",
            self.frame_interval
        );
        ctx.run_interval(self.frame_interval, |act, _ctx| act.frame());
    }
}
