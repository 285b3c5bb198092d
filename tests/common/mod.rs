use std::sync::Arc;
use std::time::Duration;

use actix::{Actor, Addr};
use async_trait::async_trait;
use parking_lot::Mutex;

use arena_client::director::{GameDirector, GameDirectorDeps};
use arena_client::env::ChannelSettings;
use arena_client::errors::ClientResult;
use arena_client::pipeline::AnimationPipeline;
use arena_client::protocol::{GameSnapshot, PlayerRef, TileKind, Topics};
use arena_client::scene::SceneHub;
use arena_client::scenes::rounds::{ClickerRules, MiniGameCatalog};
use arena_client::stage::{DiceVisual, PieceAnimator};
use arena_client::state::StateStore;
use arena_client::status::StatusFeed;
use arena_client::transport::{GamePublisher, LocalBus, Transport};

pub const BOARD_LEN: usize = 8;

/// Board fake that records every effect in execution order and paces moves
/// so tests can race events against a running animation.
pub struct RecordingBoard {
    pub log: Arc<Mutex<Vec<String>>>,
    pub hop_delay: Duration,
}

#[async_trait]
impl PieceAnimator for RecordingBoard {
    async fn sync_board(&self, _tiles: &[TileKind]) -> ClientResult<()> {
        Ok(())
    }

    async fn set_positions(&self, positions: &[usize]) -> ClientResult<()> {
        self.log.lock().push(format!("place:{:?}", positions));
        Ok(())
    }

    async fn move_piece(&self, player: usize, steps: usize) -> ClientResult<()> {
        self.log.lock().push(format!("move:{}:{}", player, steps));
        tokio::time::sleep(self.hop_delay * steps as u32).await;
        Ok(())
    }

    async fn pan_camera_to(&self, player: usize) -> ClientResult<()> {
        self.log.lock().push(format!("pan:{}", player));
        Ok(())
    }
}

pub struct RecordingDice {
    pub log: Arc<Mutex<Vec<String>>>,
}

#[async_trait]
impl DiceVisual for RecordingDice {
    async fn show(&self) -> ClientResult<()> {
        self.log.lock().push("dice:show".into());
        Ok(())
    }

    async fn roll(&self, value: u8) -> ClientResult<()> {
        self.log.lock().push(format!("dice:roll:{}", value));
        Ok(())
    }

    async fn hide(&self) -> ClientResult<()> {
        self.log.lock().push("dice:hide".into());
        Ok(())
    }
}

pub struct Harness {
    pub bus: Arc<LocalBus>,
    pub topics: Topics,
    pub store: Arc<StateStore>,
    pub status: StatusFeed,
    pub pipeline: AnimationPipeline,
    pub log: Arc<Mutex<Vec<String>>>,
    pub hub: Addr<SceneHub>,
    pub director: Addr<GameDirector>,
}

impl Harness {
    pub fn effects(&self) -> Vec<String> {
        self.log.lock().clone()
    }
}

/// Full runtime wired to an in-process bus, recording fakes and a fast test
/// round ("TestRound", 40ms clicker) on top of the standard catalog.
pub fn start_harness(local_nickname: &str, hop_delay: Duration) -> Harness {
    let bus = Arc::new(LocalBus::new());
    let transport: Arc<dyn Transport> = bus.clone();
    let topics = Topics::for_room(&ChannelSettings::default(), "room-t");
    let publisher = GamePublisher::new(transport.clone(), topics.clone());

    let store = Arc::new(StateStore::new());
    let status = StatusFeed::default();
    let log: Arc<Mutex<Vec<String>>> = Arc::new(Mutex::new(Vec::new()));

    let board = Arc::new(RecordingBoard {
        log: log.clone(),
        hop_delay,
    });
    let dice = Arc::new(RecordingDice { log: log.clone() });

    let (pipeline, _consumer) = AnimationPipeline::start();
    let hub = SceneHub::new(Duration::from_millis(1), status.clone()).start();

    let mut catalog = MiniGameCatalog::standard();
    catalog.register("TestRound", || {
        Box::new(ClickerRules::new(Duration::from_millis(40)))
    });

    let director = GameDirector::new(GameDirectorDeps {
        store: store.clone(),
        pipeline: pipeline.clone(),
        board,
        dice,
        hub: hub.clone(),
        publisher,
        status: status.clone(),
        catalog: Arc::new(catalog),
        local_nickname: local_nickname.to_string(),
        beat: Duration::ZERO,
    })
    .start();

    spawn_pumps(&bus, &topics, &director);

    Harness {
        bus,
        topics,
        store,
        status,
        pipeline,
        log,
        hub,
        director,
    }
}

fn spawn_pumps(bus: &Arc<LocalBus>, topics: &Topics, director: &Addr<GameDirector>) {
    let transport: Arc<dyn Transport> = bus.clone();
    arena_client::director::channel::spawn_channel_pumps(transport, topics, director.clone());
}

pub fn snapshot(positions: &[usize], scores: &[i64], dice: Option<u8>) -> GameSnapshot {
    GameSnapshot {
        room_id: "room-t".into(),
        players: vec![
            PlayerRef {
                nickname: "Alice".into(),
            },
            PlayerRef {
                nickname: "Bob".into(),
            },
        ],
        current_player: 0,
        positions: positions.to_vec(),
        scores: scores.to_vec(),
        last_dice_roll: dice,
        board_types: Some(vec![TileKind::Solo; BOARD_LEN]),
        winner: None,
    }
}

/// Sleep long enough for mailbox + pipeline handoffs to settle.
pub async fn breathe() {
    tokio::time::sleep(Duration::from_millis(20)).await;
}

/// Polls until `entry` shows up in the effect log; used to race an event
/// against an animation that is guaranteed to be running.
pub async fn wait_for_effect(h: &Harness, entry: &str) {
    for _ in 0..500 {
        if h.effects().iter().any(|e| e == entry) {
            return;
        }
        tokio::time::sleep(Duration::from_millis(1)).await;
    }
    panic!("effect '{}' never appeared: {:?}", entry, h.effects());
}
