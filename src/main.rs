use std::sync::Arc;

use actix::{Actor, System};
use tracing::info;

use arena_client::director::channel::spawn_channel_pumps;
use arena_client::director::{GameDirector, GameDirectorDeps};
use arena_client::env::Settings;
use arena_client::pipeline::AnimationPipeline;
use arena_client::protocol::Topics;
use arena_client::scene::SceneHub;
use arena_client::scenes::rounds::MiniGameCatalog;
use arena_client::stage::{board::TweenBoard, dice::TweenDice};
use arena_client::state::StateStore;
use arena_client::status::StatusFeed;
use arena_client::transport::{GamePublisher, LocalBus, Transport};
use arena_client::LoggerManager;

#[actix_rt::main]
async fn main() -> anyhow::Result<()> {
    // 1. Environment variables
    dotenv::dotenv().ok();

    // 2. Settings file
    let settings = Settings::new().expect("Failed to load settings");

    // 3. Logger
    let _logger_manager = LoggerManager::setup(&settings);
    info!("Logger initialized");

    // 4. Transport. The broker client is a collaborator; the in-process bus
    //    stands in for it here and in tests.
    let transport: Arc<dyn Transport> = Arc::new(LocalBus::new());
    let topics = Topics::for_room(&settings.channel, &settings.client.room_id);
    let publisher = GamePublisher::new(transport.clone(), topics.clone());

    // 5. Shared runtime state
    let store = Arc::new(StateStore::new());
    let status = StatusFeed::default();

    // 6. Stage collaborators
    let board = Arc::new(TweenBoard::new(settings.pacing.clone()));
    let dice = Arc::new(TweenDice::new(settings.pacing.clone()));

    // 7. Animation pipeline
    let (pipeline, _pipeline_handle) = AnimationPipeline::start();
    info!("Animation pipeline running");

    // 8. Scene hub
    let hub = SceneHub::new(settings.pacing.frame_interval(), status.clone()).start();
    info!("Scene hub actor started");

    // 9. Game director
    let director = GameDirector::new(GameDirectorDeps {
        store,
        pipeline,
        board,
        dice,
        hub,
        publisher: publisher.clone(),
        status: status.clone(),
        catalog: Arc::new(MiniGameCatalog::standard()),
        local_nickname: settings.client.nickname.clone(),
        beat: settings.pacing.beat(),
    })
    .start();
    info!("Game director actor started");

    // 10. Channel pumps
    spawn_channel_pumps(transport, &topics, director);
    info!("Subscribed to room {}", settings.client.room_id);

    // 11. Status notes to the console until a UI collaborator takes over
    let mut notes = status.subscribe();
    tokio::spawn(async move {
        while let Ok(note) = notes.recv().await {
            info!("[{:?}] {}", note.kind, note.text);
        }
    });

    // 12. Ask the server for the current snapshot
    publisher.ping().await.expect("initial ping failed");

    // 13. Run until Ctrl+C
    tokio::signal::ctrl_c().await?;
    info!("Ctrl+C received. Shutting down...");
    System::current().stop();

    Ok(())
}
