mod common;

use std::time::Duration;

use arena_client::director::messages::{ChannelReconnected, SnapshotReceived};
use arena_client::scene::messages::ActiveScene;
use arena_client::scene::SCENE_END;
use arena_client::status::StatusKind;
use arena_client::transport::Transport;

use common::{breathe, snapshot, start_harness, wait_for_effect};

// ============================================================
// Snapshot application order
// ============================================================

#[actix_rt::test]
async fn first_snapshot_places_without_animation() {
    let h = start_harness("Alice", Duration::ZERO);
    breathe().await;

    h.director
        .do_send(SnapshotReceived(snapshot(&[2, 5], &[0, 0], None)));
    breathe().await;
    h.pipeline.wait_idle().await;

    assert_eq!(h.effects(), vec!["place:[2, 5]"]);
    assert_eq!(h.store.last_applied().unwrap().positions, vec![2, 5]);
}

#[actix_rt::test]
async fn snapshot_ops_execute_in_required_order() {
    let h = start_harness("Alice", Duration::ZERO);
    breathe().await;

    h.director
        .do_send(SnapshotReceived(snapshot(&[0, 0], &[0, 0], None)));
    breathe().await;
    h.pipeline.wait_idle().await;
    h.log.lock().clear();

    // Dice first, then movement in player-index order with camera pans,
    // score notes never block.
    let mut next = snapshot(&[3, 1], &[1, 0], Some(3));
    next.current_player = 1;
    h.director.do_send(SnapshotReceived(next));
    breathe().await;
    h.pipeline.wait_idle().await;

    assert_eq!(
        h.effects(),
        vec![
            "dice:show",
            "dice:roll:3",
            "dice:hide",
            "move:0:3",
            "pan:0",
            "move:1:1",
            "pan:1",
        ]
    );
}

#[actix_rt::test]
async fn later_snapshot_never_overtakes_a_running_animation() {
    let h = start_harness("Alice", Duration::from_millis(15));
    breathe().await;

    h.director
        .do_send(SnapshotReceived(snapshot(&[0, 0], &[0, 0], None)));
    breathe().await;
    h.pipeline.wait_idle().await;

    // Snapshot N: 3 slow hops. Snapshot N+1 arrives mid-flight.
    h.director
        .do_send(SnapshotReceived(snapshot(&[3, 0], &[0, 0], Some(3))));
    wait_for_effect(&h, "move:0:3").await;
    h.director
        .do_send(SnapshotReceived(snapshot(&[5, 0], &[0, 0], Some(2))));
    h.pipeline.wait_idle().await;

    let effects = h.effects();
    let n_end = effects.iter().position(|e| e == "pan:0").unwrap();
    let n1_move = effects.iter().position(|e| e == "move:0:2").unwrap();
    assert!(
        n_end < n1_move,
        "snapshot N+1 started before N finished: {:?}",
        effects
    );
}

// ============================================================
// Backpressure: latest-wins coalescing
// ============================================================

#[actix_rt::test]
async fn queued_snapshots_collapse_to_the_latest() {
    let h = start_harness("Alice", Duration::from_millis(25));
    breathe().await;

    h.director
        .do_send(SnapshotReceived(snapshot(&[0, 0], &[0, 0], None)));
    breathe().await;
    h.pipeline.wait_idle().await;
    h.log.lock().clear();

    // A starts animating; B and C arrive while it runs. C must win; B's
    // movement is folded into one diff.
    h.director
        .do_send(SnapshotReceived(snapshot(&[1, 0], &[0, 0], None)));
    wait_for_effect(&h, "move:0:1").await;
    h.director
        .do_send(SnapshotReceived(snapshot(&[2, 0], &[0, 0], None)));
    h.director
        .do_send(SnapshotReceived(snapshot(&[3, 0], &[0, 0], None)));
    h.pipeline.wait_idle().await;

    let effects = h.effects();
    let move_entries: Vec<&str> = effects
        .iter()
        .filter(|e| e.starts_with("move:"))
        .map(|s| s.as_str())
        .collect();
    assert_eq!(move_entries, vec!["move:0:1", "move:0:2"]);
    assert_eq!(h.store.last_applied().unwrap().positions, vec![3, 0]);
}

// ============================================================
// Win and resync
// ============================================================

#[actix_rt::test]
async fn winner_snapshot_enters_end_scene_only() {
    let h = start_harness("Alice", Duration::ZERO);
    breathe().await;

    h.director
        .do_send(SnapshotReceived(snapshot(&[0, 0], &[0, 0], None)));
    breathe().await;
    h.pipeline.wait_idle().await;
    h.log.lock().clear();

    let mut notes = h.status.subscribe();
    let mut final_snap = snapshot(&[4, 0], &[5, 1], Some(6));
    final_snap.winner = Some("Alice".into());
    h.director.do_send(SnapshotReceived(final_snap));
    breathe().await;
    h.pipeline.wait_idle().await;
    breathe().await;

    // No dice, no movement; only the scene switch.
    assert!(h.effects().is_empty(), "unexpected effects: {:?}", h.effects());
    let active = h.hub.send(ActiveScene).await.unwrap();
    assert_eq!(active.as_deref(), Some(SCENE_END));

    let mut saw_win_note = false;
    while let Ok(note) = notes.try_recv() {
        if note.kind == StatusKind::Match && note.text.contains("Alice wins") {
            saw_win_note = true;
        }
    }
    assert!(saw_win_note);
}

#[actix_rt::test]
async fn post_reconnect_snapshot_is_applied_as_initial_truth() {
    let h = start_harness("Alice", Duration::ZERO);
    breathe().await;

    h.director
        .do_send(SnapshotReceived(snapshot(&[0, 0], &[0, 0], None)));
    breathe().await;
    h.pipeline.wait_idle().await;

    h.director
        .do_send(SnapshotReceived(snapshot(&[3, 2], &[0, 0], Some(3))));
    breathe().await;
    h.pipeline.wait_idle().await;
    h.log.lock().clear();

    h.director.do_send(ChannelReconnected);
    breathe().await;
    // Position regressed; without the resync flag this would animate a
    // spurious near-lap.
    h.director
        .do_send(SnapshotReceived(snapshot(&[1, 2], &[0, 0], Some(3))));
    breathe().await;
    h.pipeline.wait_idle().await;

    assert_eq!(h.effects(), vec!["place:[1, 2]"]);
}

// ============================================================
// Boundary validation
// ============================================================

#[actix_rt::test]
async fn malformed_snapshot_payload_never_reaches_the_store() {
    let h = start_harness("Alice", Duration::ZERO);
    breathe().await;

    // Mismatched array lengths: rejected at the pump.
    let bad = serde_json::json!({
        "roomId": "room-t",
        "players": [{"nickname": "Alice"}, {"nickname": "Bob"}],
        "currentPlayer": 0,
        "positions": [0],
        "scores": [0, 0]
    });
    h.bus
        .publish(&h.topics.state, bad.to_string())
        .await
        .unwrap();
    breathe().await;
    h.pipeline.wait_idle().await;

    assert!(h.store.last_applied().is_none());
    assert!(h.effects().is_empty());
}

#[actix_rt::test]
async fn valid_payload_via_channel_reaches_the_reconciler() {
    let h = start_harness("Alice", Duration::ZERO);
    breathe().await;

    let body = serde_json::to_string(&snapshot(&[1, 1], &[0, 0], None)).unwrap();
    h.bus.publish(&h.topics.init, body).await.unwrap();
    breathe().await;
    h.pipeline.wait_idle().await;

    assert_eq!(h.effects(), vec!["place:[1, 1]"]);
    assert!(h.store.last_applied().is_some());
}
