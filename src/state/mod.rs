use std::sync::atomic::{AtomicBool, Ordering};

use parking_lot::RwLock;

use crate::protocol::GameSnapshot;

#[derive(Default)]
struct Retained {
    previous: Option<GameSnapshot>,
    current: Option<GameSnapshot>,
}

/// Holds the last-applied authoritative snapshot and the one before it.
/// Single writer (the pipeline task committing an applied snapshot), many
/// readers (reconciler, turn derivation, UI status).
#[derive(Default)]
pub struct StateStore {
    retained: RwLock<Retained>,
    resync: AtomicBool,
}

impl StateStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records `snapshot` as applied, demoting the old current to previous.
    pub fn commit(&self, snapshot: GameSnapshot) {
        let mut retained = self.retained.write();
        retained.previous = retained.current.take();
        retained.current = Some(snapshot);
    }

    pub fn last_applied(&self) -> Option<GameSnapshot> {
        self.retained.read().current.clone()
    }

    pub fn previous(&self) -> Option<GameSnapshot> {
        self.retained.read().previous.clone()
    }

    /// Marks that continuity with the applied state is lost (transport
    /// reconnect). The next snapshot is then applied as if it were the first.
    pub fn mark_resync(&self) {
        self.resync.store(true, Ordering::SeqCst);
    }

    pub fn take_resync(&self) -> bool {
        self.resync.swap(false, Ordering::SeqCst)
    }
}

/// True when the latest snapshot says it is the local player's turn.
/// No hidden state; always derivable from the snapshot alone.
pub fn is_local_players_turn(snapshot: &GameSnapshot, local_nickname: &str) -> bool {
    snapshot
        .players
        .get(snapshot.current_player)
        .map(|p| p.nickname == local_nickname)
        .unwrap_or(false)
}

pub fn turn_banner(snapshot: &GameSnapshot, local_nickname: &str) -> String {
    let name = snapshot
        .players
        .get(snapshot.current_player)
        .map(|p| p.nickname.as_str())
        .unwrap_or("?");
    if is_local_players_turn(snapshot, local_nickname) {
        format!("{}'s turn (you)", name)
    } else {
        format!("{}'s turn", name)
    }
}

pub fn scoreboard_lines(snapshot: &GameSnapshot) -> Vec<String> {
    snapshot
        .players
        .iter()
        .zip(snapshot.scores.iter())
        .map(|(player, score)| {
            let unit = if *score == 1 { "star" } else { "stars" };
            format!("{}: {} {}", player.nickname, score, unit)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::PlayerRef;

    fn snapshot(current_player: usize) -> GameSnapshot {
        GameSnapshot {
            room_id: "room-1".into(),
            players: vec![
                PlayerRef {
                    nickname: "Alice".into(),
                },
                PlayerRef {
                    nickname: "Bob".into(),
                },
            ],
            current_player,
            positions: vec![0, 0],
            scores: vec![0, 1],
            last_dice_roll: None,
            board_types: None,
            winner: None,
        }
    }

    #[test]
    fn turn_is_derived_from_current_player_index() {
        assert!(is_local_players_turn(&snapshot(0), "Alice"));
        assert!(!is_local_players_turn(&snapshot(0), "Bob"));
        assert!(is_local_players_turn(&snapshot(1), "Bob"));
    }

    #[test]
    fn banner_marks_local_turn() {
        assert_eq!(turn_banner(&snapshot(0), "Alice"), "Alice's turn (you)");
        assert_eq!(turn_banner(&snapshot(0), "Bob"), "Alice's turn");
    }

    #[test]
    fn scoreboard_pluralizes() {
        let lines = scoreboard_lines(&snapshot(0));
        assert_eq!(lines, vec!["Alice: 0 stars", "Bob: 1 star"]);
    }

    #[test]
    fn commit_retains_exactly_two() {
        let store = StateStore::new();
        assert!(store.last_applied().is_none());

        store.commit(snapshot(0));
        store.commit(snapshot(1));
        assert_eq!(store.previous().unwrap().current_player, 0);
        assert_eq!(store.last_applied().unwrap().current_player, 1);

        store.commit(snapshot(0));
        assert_eq!(store.previous().unwrap().current_player, 1);
    }

    #[test]
    fn resync_flag_is_one_shot() {
        let store = StateStore::new();
        assert!(!store.take_resync());
        store.mark_resync();
        assert!(store.take_resync());
        assert!(!store.take_resync());
    }
}
