use actix::{ActorFutureExt, Context, Handler, ResponseActFuture, WrapFuture};
use tracing::{debug, info, warn};

use crate::errors::{ClientError, ClientResult};
use crate::scene::messages::{ActiveScene, CreateScene, InputReceived, SwitchTo};
use crate::scene::SceneHub;
use crate::status::StatusKind;

impl Handler<CreateScene> for SceneHub {
    type Result = ResponseActFuture<Self, ClientResult<()>>;

    fn handle(&mut self, msg: CreateScene, _ctx: &mut Context<Self>) -> Self::Result {
        let CreateScene { name, build } = msg;
        if self.scenes.contains_key(&name) {
            warn!("duplicate create for scene '{}'; ignored", name);
            return Box::pin(actix::fut::ready(Ok(())));
        }
        // Construction may await asset loading; the hub keeps serving other
        // messages (and other creations) meanwhile.
        Box::pin(build().into_actor(self).map(|behavior, act, _ctx| {
            act.install(name, behavior);
            Ok(())
        }))
    }
}

impl Handler<SwitchTo> for SceneHub {
    type Result = ClientResult<()>;

    fn handle(&mut self, msg: SwitchTo, _ctx: &mut Context<Self>) -> Self::Result {
        if !self.scenes.contains_key(&msg.name) {
            self.status.publish(
                StatusKind::Error,
                format!("cannot switch to unknown scene '{}'", msg.name),
            );
            return Err(ClientError::unknown_scene(&msg.name));
        }
        if self.active.as_deref() == Some(msg.name.as_str()) {
            debug!("scene '{}' already active", msg.name);
            return Ok(());
        }

        if let Some(old) = self.active.take() {
            if let Some(scene) = self.scenes.get_mut(&old) {
                scene.on_exit();
            }
            self.router.detach(&old);
        }

        if let Some(scene) = self.scenes.get_mut(&msg.name) {
            scene.on_enter();
            self.router.attach(msg.name.clone(), scene.bindings());
        }
        info!("active scene -> '{}'", msg.name);
        self.active = Some(msg.name);
        Ok(())
    }
}

impl Handler<InputReceived> for SceneHub {
    type Result = ();

    fn handle(&mut self, msg: InputReceived, _ctx: &mut Context<Self>) {
        let Some(active) = self.active.clone() else {
            return;
        };
        if !self.router.accepts(&active, &msg.0.key) {
            return;
        }
        if let Some(scene) = self.scenes.get_mut(&active) {
            scene.on_input(&msg.0);
        }
    }
}

impl Handler<ActiveScene> for SceneHub {
    type Result = Option<String>;

    fn handle(&mut self, _msg: ActiveScene, _ctx: &mut Context<Self>) -> Self::Result {
        self.active.clone()
    }
}