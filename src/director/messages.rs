use actix::Message;

use crate::director::MiniGamePhase;
use crate::protocol::{GameSnapshot, MiniGameInstruction, MiniGameOutcome};

/// A validated snapshot from the state or init topic.
#[derive(Message)]
#[rtype(result = "()")]
pub struct SnapshotReceived(pub GameSnapshot);

/// A validated mini-game instruction.
#[derive(Message)]
#[rtype(result = "()")]
pub struct InstructionReceived(pub MiniGameInstruction);

/// A validated mini-game outcome broadcast.
#[derive(Message)]
#[rtype(result = "()")]
pub struct OutcomeReceived(pub MiniGameOutcome);

/// Locally computed result of the round the active scene just finished.
#[derive(Message)]
#[rtype(result = "()")]
pub struct RoundFinished {
    pub mini_game_name: String,
    pub score: i64,
}

/// The transport re-established its connection; continuity with the applied
/// state is gone and the next snapshot must be treated as initial truth.
#[derive(Message)]
#[rtype(result = "()")]
pub struct ChannelReconnected;

/// Current lifecycle phase, for inspection.
#[derive(Message)]
#[rtype(result = "MiniGamePhase")]
pub struct GetPhase;
