use actix::Message;

use crate::errors::ClientResult;
use crate::scene::input::InputEvent;
use crate::scene::SceneBuilder;

/// Registers a scene under a unique name. Idempotent: a second creation for
/// the same name is ignored and the existing scene kept.
#[derive(Message)]
#[rtype(result = "ClientResult<()>")]
pub struct CreateScene {
    pub name: String,
    pub build: SceneBuilder,
}

/// Makes `name` the active (and only rendered) scene. Unknown names are an
/// error, surfaced on the status feed.
#[derive(Message)]
#[rtype(result = "ClientResult<()>")]
pub struct SwitchTo {
    pub name: String,
}

/// Input from the windowing collaborator; routed to the active scene only.
#[derive(Message)]
#[rtype(result = "()")]
pub struct InputReceived(pub InputEvent);

/// Name of the currently active scene.
#[derive(Message)]
#[rtype(result = "Option<String>")]
pub struct ActiveScene;
