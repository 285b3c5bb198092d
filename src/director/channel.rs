//! Pumps between the transport collaborator and the director. One task per
//! topic: receive raw payloads, parse and validate, forward typed messages.
//! Invalid payloads are rejected here and never reach the reconciler.

use std::sync::Arc;

use actix::dev::ToEnvelope;
use actix::{Actor, Addr, Handler, Message};
use tokio::sync::mpsc;
use tracing::{debug, warn};

use crate::director::messages::{InstructionReceived, OutcomeReceived, SnapshotReceived};
use crate::director::GameDirector;
use crate::errors::ClientResult;
use crate::protocol::{GameSnapshot, MiniGameInstruction, MiniGameOutcome, Topics};
use crate::transport::Transport;

pub fn spawn_channel_pumps(
    transport: Arc<dyn Transport>,
    topics: &Topics,
    director: Addr<GameDirector>,
) {
    // The init topic delivers the first snapshot; it goes through the same
    // path, the reconciler recognizes it by the empty store.
    for topic in [&topics.state, &topics.init] {
        pump(
            topic.clone(),
            transport.subscribe(topic),
            director.clone(),
            |raw| GameSnapshot::parse(raw).map(SnapshotReceived),
        );
    }
    pump(
        topics.instruction.clone(),
        transport.subscribe(&topics.instruction),
        director.clone(),
        |raw| MiniGameInstruction::parse(raw).map(InstructionReceived),
    );
    pump(
        topics.outcome.clone(),
        transport.subscribe(&topics.outcome),
        director,
        |raw| MiniGameOutcome::parse(raw).map(OutcomeReceived),
    );
}

fn pump<M, F>(
    topic: String,
    mut rx: mpsc::UnboundedReceiver<String>,
    director: Addr<GameDirector>,
    parse: F,
) where
    M: Message<Result = ()> + Send + 'static,
    GameDirector: Handler<M>,
    <GameDirector as Actor>::Context: ToEnvelope<GameDirector, M>,
    F: Fn(&str) -> ClientResult<M> + Send + 'static,
{
    tokio::spawn(async move {
        while let Some(raw) = rx.recv().await {
            match parse(&raw) {
                Ok(message) => director.do_send(message),
                Err(e) => warn!("rejected payload on {}: {}", topic, e),
            }
        }
        debug!("channel pump for {} ended", topic);
    });
}
