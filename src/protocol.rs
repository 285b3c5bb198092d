use serde::{Deserialize, Serialize};

use crate::errors::{ClientError, ClientResult};

pub const DICE_MIN: u8 = 1;
pub const DICE_MAX: u8 = 6;

// --- Server to Client Payloads ---

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct PlayerRef {
    pub nickname: String,
}

/// Per-tile category tag. Defines which effect zone a tile belongs to.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum TileKind {
    Multi,
    Solo,
    Bonus,
    Malus,
}

/// One complete authoritative description of game state, replaced wholesale
/// on every push. Index `i` of `positions`/`scores` belongs to `players[i]`.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct GameSnapshot {
    pub room_id: String,
    pub players: Vec<PlayerRef>,
    pub current_player: usize,
    pub positions: Vec<usize>,
    pub scores: Vec<i64>,
    #[serde(default)]
    pub last_dice_roll: Option<u8>,
    #[serde(default)]
    pub board_types: Option<Vec<TileKind>>,
    #[serde(default)]
    pub winner: Option<String>,
}

impl GameSnapshot {
    /// Parses and validates a raw channel payload. Payloads that violate the
    /// structural invariants never reach the reconciler.
    pub fn parse(raw: &str) -> ClientResult<Self> {
        let snapshot: GameSnapshot = serde_json::from_str(raw)?;
        snapshot.validate()?;
        Ok(snapshot)
    }

    pub fn validate(&self) -> ClientResult<()> {
        let n = self.players.len();
        if n == 0 {
            return Err(ClientError::rejected("empty player list"));
        }
        if self.positions.len() != n || self.scores.len() != n {
            return Err(ClientError::rejected(format!(
                "array length mismatch: {} players, {} positions, {} scores",
                n,
                self.positions.len(),
                self.scores.len()
            )));
        }
        if self.current_player >= n {
            return Err(ClientError::rejected(format!(
                "currentPlayer {} out of range for {} players",
                self.current_player, n
            )));
        }
        if let Some(roll) = self.last_dice_roll {
            if !(DICE_MIN..=DICE_MAX).contains(&roll) {
                return Err(ClientError::rejected(format!(
                    "lastDiceRoll {} outside [{}, {}]",
                    roll, DICE_MIN, DICE_MAX
                )));
            }
        }
        if let Some(board) = &self.board_types {
            if let Some(&pos) = self.positions.iter().find(|&&p| p >= board.len()) {
                return Err(ClientError::rejected(format!(
                    "position {} outside board of {} tiles",
                    pos,
                    board.len()
                )));
            }
        }
        if let Some(winner) = &self.winner {
            if self.winner_index().is_none() {
                return Err(ClientError::rejected(format!(
                    "winner '{}' is not a known player",
                    winner
                )));
            }
        }
        Ok(())
    }

    pub fn board_len(&self) -> Option<usize> {
        self.board_types.as_ref().map(|b| b.len())
    }

    pub fn winner_index(&self) -> Option<usize> {
        let winner = self.winner.as_deref()?;
        self.players.iter().position(|p| p.nickname == winner)
    }

    pub fn nickname_index(&self, nickname: &str) -> Option<usize> {
        self.players.iter().position(|p| p.nickname == nickname)
    }
}

/// Server instruction to start a mini-game round. A missing nickname means a
/// group round every connected client must enter; a concrete nickname means
/// only that client plays while the rest spectate.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MiniGameInstruction {
    #[serde(default)]
    pub player_nickname: Option<String>,
    pub mini_game_name: String,
}

impl MiniGameInstruction {
    pub fn parse(raw: &str) -> ClientResult<Self> {
        let instruction: MiniGameInstruction = serde_json::from_str(raw)?;
        if instruction.mini_game_name.is_empty() {
            return Err(ClientError::rejected("empty miniGameName in instruction"));
        }
        Ok(instruction)
    }

    /// True if this client must enter the round itself.
    pub fn targets(&self, local_nickname: &str) -> bool {
        match &self.player_nickname {
            None => true,
            Some(nick) => nick == local_nickname,
        }
    }
}

/// Terminal broadcast for a mini-game round. Always followed eventually by a
/// fresh snapshot carrying the updated scores.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MiniGameOutcome {
    pub mini_game_name: String,
    pub winner_nickname: String,
    pub winner_score: i64,
}

impl MiniGameOutcome {
    pub fn parse(raw: &str) -> ClientResult<Self> {
        Ok(serde_json::from_str(raw)?)
    }
}

// --- Client to Server Payloads ---

/// Locally computed result of a mini-game round, reported back to the server.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MiniGameResult {
    pub mini_game_name: String,
    pub score: i64,
}

// --- Channel Topics ---

/// Resolved per-room topic and destination names.
#[derive(Clone, Debug)]
pub struct Topics {
    pub state: String,
    pub init: String,
    pub instruction: String,
    pub outcome: String,
    pub roll: String,
    pub result: String,
    pub ping: String,
}

impl Topics {
    pub fn for_room(channel: &crate::env::ChannelSettings, room_id: &str) -> Self {
        let fill = |pattern: &str| pattern.replace("{room}", room_id);
        Self {
            state: fill(&channel.state_topic),
            init: fill(&channel.init_topic),
            instruction: fill(&channel.instruction_topic),
            outcome: fill(&channel.outcome_topic),
            roll: fill(&channel.roll_destination),
            result: fill(&channel.result_destination),
            ping: fill(&channel.ping_destination),
        }
    }
}
