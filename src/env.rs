use std::time::Duration;

use config::{Config, ConfigError, Environment, File, FileFormat};
use serde::Deserialize;

#[derive(Debug, Deserialize, Clone)]
pub struct Settings {
    pub logging: LoggingSettings,
    pub client: ClientSettings,
    pub pacing: PacingSettings,
    pub channel: ChannelSettings,
}

impl Settings {
    pub fn new() -> Result<Self, ConfigError> {
        let run_mode = std::env::var("RUN_MODE").unwrap_or_else(|_| "development".into());

        let s = Config::builder()
            // Load environment-specific file (e.g., development.toml, production.toml)
            .add_source(
                File::with_name(&format!("config/{}", run_mode))
                    .format(FileFormat::Toml)
                    .required(true),
            )
            // Add environment variables (e.g., APP_CLIENT__NICKNAME=Alice)
            .add_source(Environment::with_prefix("APP").separator("__"))
            .build()?;

        s.try_deserialize()
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct LoggingSettings {
    pub directory: String,
    pub filename: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ClientSettings {
    pub log_level: String,
    /// Identity of the local player within the room.
    pub nickname: String,
    pub room_id: String,
}

/// Visual pacing in milliseconds. Every animation await in the pipeline
/// derives its duration from here.
#[derive(Debug, Deserialize, Clone)]
pub struct PacingSettings {
    pub frame_interval_ms: u64,
    pub hop_ms: u64,
    pub camera_pan_ms: u64,
    pub dice_show_ms: u64,
    pub dice_roll_ms: u64,
    pub dice_hide_ms: u64,
    /// Dramatic beat between operations of one snapshot.
    pub beat_ms: u64,
}

impl PacingSettings {
    pub fn frame_interval(&self) -> Duration {
        Duration::from_millis(self.frame_interval_ms)
    }
    pub fn hop(&self) -> Duration {
        Duration::from_millis(self.hop_ms)
    }
    pub fn camera_pan(&self) -> Duration {
        Duration::from_millis(self.camera_pan_ms)
    }
    pub fn dice_show(&self) -> Duration {
        Duration::from_millis(self.dice_show_ms)
    }
    pub fn dice_roll(&self) -> Duration {
        Duration::from_millis(self.dice_roll_ms)
    }
    pub fn dice_hide(&self) -> Duration {
        Duration::from_millis(self.dice_hide_ms)
    }
    pub fn beat(&self) -> Duration {
        Duration::from_millis(self.beat_ms)
    }

    /// Zero-delay pacing for tests and headless runs.
    pub fn instant() -> Self {
        Self {
            frame_interval_ms: 1,
            hop_ms: 0,
            camera_pan_ms: 0,
            dice_show_ms: 0,
            dice_roll_ms: 0,
            dice_hide_ms: 0,
            beat_ms: 0,
        }
    }
}

/// Topic and destination name patterns; `{room}` is replaced with the room id.
#[derive(Debug, Deserialize, Clone)]
pub struct ChannelSettings {
    pub state_topic: String,
    pub init_topic: String,
    pub instruction_topic: String,
    pub outcome_topic: String,
    pub roll_destination: String,
    pub result_destination: String,
    pub ping_destination: String,
}

impl Default for ChannelSettings {
    fn default() -> Self {
        Self {
            state_topic: "/topic/game/{room}".into(),
            init_topic: "/topic/game/{room}/init".into(),
            instruction_topic: "/topic/game/{room}/minigame/instruction".into(),
            outcome_topic: "/topic/game/{room}/minigame/outcome".into(),
            roll_destination: "/app/game/{room}/roll".into(),
            result_destination: "/app/game/{room}/minigame/result".into(),
            ping_destination: "/app/game/{room}/ping".into(),
        }
    }
}
