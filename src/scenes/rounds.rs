use std::collections::HashMap;
use std::time::Duration;

use tracing::info;

use crate::director::messages::RoundFinished;
use crate::scene::input::{InputBindings, InputEvent};
use crate::scene::{builder, SceneBehavior, SceneBuilder, SceneServices};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RoundProgress {
    Running,
    Finished { score: i64 },
}

/// Rule seam for one mini-game round: consume input, advance with the frame
/// delta, report when done. Content stays behind this trait.
pub trait RoundRules: Send {
    fn bindings(&self) -> InputBindings;
    fn on_input(&mut self, key: &str);
    fn tick(&mut self, dt: Duration) -> RoundProgress;
    fn reset(&mut self);
}

/// Scene wrapper shared by every mini-game: runs the rules, reports the
/// locally computed result to the director exactly once per entry.
pub struct MiniGameRound {
    name: String,
    rules: Box<dyn RoundRules>,
    services: SceneServices,
    reported: bool,
}

impl MiniGameRound {
    pub fn new(name: String, rules: Box<dyn RoundRules>, services: SceneServices) -> Self {
        Self {
            name,
            rules,
            services,
            reported: false,
        }
    }
}

impl SceneBehavior for MiniGameRound {
    fn bindings(&self) -> InputBindings {
        self.rules.bindings()
    }

    fn on_enter(&mut self) {
        info!("mini-game '{}' round starting", self.name);
        self.rules.reset();
        self.reported = false;
    }

    fn on_input(&mut self, event: &InputEvent) {
        if !self.reported {
            self.rules.on_input(&event.key);
        }
    }

    fn render(&mut self, dt: Duration) {
        if self.reported {
            return;
        }
        if let RoundProgress::Finished { score } = self.rules.tick(dt) {
            self.reported = true;
            info!("mini-game '{}' finished with score {}", self.name, score);
            self.services.director.do_send(RoundFinished {
                mini_game_name: self.name.clone(),
                score,
            });
        }
    }
}

// --- Concrete rule sets ---

/// Count taps until the timer runs out.
pub struct ClickerRules {
    duration: Duration,
    elapsed: Duration,
    clicks: i64,
}

impl ClickerRules {
    pub fn new(duration: Duration) -> Self {
        Self {
            duration,
            elapsed: Duration::ZERO,
            clicks: 0,
        }
    }
}

impl RoundRules for ClickerRules {
    fn bindings(&self) -> InputBindings {
        InputBindings::new().bind("Space")
    }

    fn on_input(&mut self, key: &str) {
        if key == "Space" {
            self.clicks += 1;
        }
    }

    fn tick(&mut self, dt: Duration) -> RoundProgress {
        self.elapsed += dt;
        if self.elapsed >= self.duration {
            RoundProgress::Finished { score: self.clicks }
        } else {
            RoundProgress::Running
        }
    }

    fn reset(&mut self) {
        self.elapsed = Duration::ZERO;
        self.clicks = 0;
    }
}

/// Catch falling drops: one drop at a time cycles through three lanes and is
/// catchable for a short window; the matching arrow key scores.
pub struct FallingCatchRules {
    duration: Duration,
    drop_interval: Duration,
    catch_window: Duration,
    elapsed: Duration,
    since_drop: Duration,
    lane: usize,
    caught_current: bool,
    score: i64,
}

const LANE_KEYS: [&str; 3] = ["ArrowLeft", "ArrowDown", "ArrowRight"];

impl FallingCatchRules {
    pub fn new(duration: Duration, drop_interval: Duration, catch_window: Duration) -> Self {
        Self {
            duration,
            drop_interval,
            catch_window,
            elapsed: Duration::ZERO,
            since_drop: Duration::ZERO,
            lane: 0,
            caught_current: false,
            score: 0,
        }
    }
}

impl RoundRules for FallingCatchRules {
    fn bindings(&self) -> InputBindings {
        LANE_KEYS
            .iter()
            .fold(InputBindings::new(), |b, key| b.bind(*key))
    }

    fn on_input(&mut self, key: &str) {
        if self.caught_current || self.since_drop > self.catch_window {
            return;
        }
        if key == LANE_KEYS[self.lane] {
            self.caught_current = true;
            self.score += 1;
        }
    }

    fn tick(&mut self, dt: Duration) -> RoundProgress {
        self.elapsed += dt;
        self.since_drop += dt;
        if self.since_drop >= self.drop_interval {
            self.since_drop = Duration::ZERO;
            self.lane = (self.lane + 1) % LANE_KEYS.len();
            self.caught_current = false;
        }
        if self.elapsed >= self.duration {
            RoundProgress::Finished { score: self.score }
        } else {
            RoundProgress::Running
        }
    }

    fn reset(&mut self) {
        self.elapsed = Duration::ZERO;
        self.since_drop = Duration::ZERO;
        self.lane = 0;
        self.caught_current = false;
        self.score = 0;
    }
}

// --- Catalog ---

type RulesFactory = Box<dyn Fn() -> Box<dyn RoundRules> + Send + Sync>;

/// Maps mini-game names to rule factories. Scenes are created lazily from
/// here on the first instruction naming them.
#[derive(Default)]
pub struct MiniGameCatalog {
    factories: HashMap<String, RulesFactory>,
}

impl MiniGameCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// The rounds shipped with the game.
    pub fn standard() -> Self {
        let mut catalog = Self::new();
        catalog.register("ClickerGame", || {
            Box::new(ClickerRules::new(Duration::from_secs(8)))
        });
        catalog.register("rainingGame", || {
            Box::new(FallingCatchRules::new(
                Duration::from_secs(10),
                Duration::from_millis(900),
                Duration::from_millis(600),
            ))
        });
        catalog.register("StarGame", || {
            Box::new(ClickerRules::new(Duration::from_secs(5)))
        });
        catalog
    }

    pub fn register<F>(&mut self, name: impl Into<String>, factory: F)
    where
        F: Fn() -> Box<dyn RoundRules> + Send + Sync + 'static,
    {
        self.factories.insert(name.into(), Box::new(factory));
    }

    pub fn contains(&self, name: &str) -> bool {
        self.factories.contains_key(name)
    }

    /// Builds the scene for `name`, or `None` when the game is unknown here
    /// (the switch will then fail with an unknown-scene error).
    pub fn builder(&self, name: &str, services: SceneServices) -> Option<SceneBuilder> {
        let factory = self.factories.get(name)?;
        let rules = factory();
        let name = name.to_string();
        Some(builder(move || MiniGameRound::new(name, rules, services)))
    }
}
