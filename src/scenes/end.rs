use std::time::Duration;

use crate::scene::{SceneBehavior, SceneServices};
use crate::status::StatusKind;

/// Terminal scene: crowned winner model, slow camera orbit, exit control.
/// Once entered the match is over; nothing switches away from here.
pub struct EndScene {
    services: SceneServices,
    winner_nickname: String,
}

impl EndScene {
    pub fn new(services: SceneServices, winner_nickname: String) -> Self {
        Self {
            services,
            winner_nickname,
        }
    }
}

impl SceneBehavior for EndScene {
    fn on_enter(&mut self) {
        self.services.status.publish(
            StatusKind::Match,
            format!("{} wins the match!", self.winner_nickname),
        );
    }

    fn render(&mut self, _dt: Duration) {
        // Camera orbit is owned by the rendering collaborator.
    }
}
