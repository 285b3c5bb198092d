use std::time::Duration;

use tracing::debug;

use crate::scene::input::{InputBindings, InputEvent};
use crate::scene::{SceneBehavior, SceneServices};
use crate::state::{is_local_players_turn, scoreboard_lines, turn_banner};
use crate::status::StatusKind;
use crate::transport::spawn_publish;

pub const ROLL_KEY: &str = "Space";

/// The board view. Derives the turn banner and roll-action visibility from
/// the latest applied snapshot; a bound key press publishes the roll request
/// when it is the local player's turn.
pub struct BoardScene {
    services: SceneServices,
    announced_turn: Option<usize>,
    my_turn: bool,
}

impl BoardScene {
    pub fn new(services: SceneServices) -> Self {
        Self {
            services,
            announced_turn: None,
            my_turn: false,
        }
    }
}

impl SceneBehavior for BoardScene {
    fn bindings(&self) -> InputBindings {
        InputBindings::new().bind(ROLL_KEY)
    }

    fn on_enter(&mut self) {
        // Re-announce the turn after coming back from a mini-game.
        self.announced_turn = None;
    }

    fn on_input(&mut self, event: &InputEvent) {
        if event.key == ROLL_KEY && self.my_turn {
            let publisher = self.services.publisher.clone();
            spawn_publish("roll_dice", async move { publisher.roll_dice().await });
        }
    }

    fn render(&mut self, _dt: Duration) {
        let Some(snapshot) = self.services.store.last_applied() else {
            return;
        };
        if self.announced_turn == Some(snapshot.current_player) {
            return;
        }
        self.announced_turn = Some(snapshot.current_player);
        self.my_turn = is_local_players_turn(&snapshot, &self.services.local_nickname);
        self.services.status.publish(
            StatusKind::Turn,
            turn_banner(&snapshot, &self.services.local_nickname),
        );
        debug!("scoreboard: {:?}", scoreboard_lines(&snapshot));
    }
}
