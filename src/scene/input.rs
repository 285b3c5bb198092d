use std::collections::HashSet;

use tracing::warn;

/// One input occurrence from the windowing collaborator. Pointer taps arrive
/// as synthesized key events, same as the mobile control overlay produces.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct InputEvent {
    pub key: String,
}

impl InputEvent {
    pub fn key(key: impl Into<String>) -> Self {
        Self { key: key.into() }
    }
}

/// Keys a scene listens to while it is active.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct InputBindings {
    keys: HashSet<String>,
}

impl InputBindings {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn bind(mut self, key: impl Into<String>) -> Self {
        self.keys.insert(key.into());
        self
    }

    pub fn is_bound(&self, key: &str) -> bool {
        self.keys.contains(key)
    }
}

/// Scoped listener registry: at most one owning scene attached at a time.
/// Attached on scene activation, detached on deactivation, so a stale
/// handler can never fire into the wrong scene.
#[derive(Default)]
pub struct InputRouter {
    attached: Option<(String, InputBindings)>,
}

impl InputRouter {
    pub fn attach(&mut self, owner: impl Into<String>, bindings: InputBindings) {
        let owner = owner.into();
        if let Some((previous, _)) = &self.attached {
            warn!(
                "input bindings of '{}' replaced without detach; '{}' now owns input",
                previous, owner
            );
        }
        self.attached = Some((owner, bindings));
    }

    pub fn detach(&mut self, owner: &str) {
        match &self.attached {
            Some((current, _)) if current == owner => self.attached = None,
            Some((current, _)) => warn!(
                "'{}' tried to detach input owned by '{}'",
                owner, current
            ),
            None => {}
        }
    }

    /// True only when `owner` holds the bindings and listens to `key`.
    pub fn accepts(&self, owner: &str, key: &str) -> bool {
        match &self.attached {
            Some((current, bindings)) => current == owner && bindings.is_bound(key),
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_the_attached_owner_receives_input() {
        let mut router = InputRouter::default();
        router.attach("main", InputBindings::new().bind("Space"));

        assert!(router.accepts("main", "Space"));
        assert!(!router.accepts("main", "ArrowLeft"));
        assert!(!router.accepts("ClickerGame", "Space"));
    }

    #[test]
    fn detached_bindings_never_fire() {
        let mut router = InputRouter::default();
        router.attach("main", InputBindings::new().bind("Space"));
        router.detach("main");
        assert!(!router.accepts("main", "Space"));
    }

    #[test]
    fn stale_owner_cannot_detach_the_active_scene() {
        let mut router = InputRouter::default();
        router.attach("main", InputBindings::new().bind("Space"));
        router.attach("ClickerGame", InputBindings::new().bind("Space"));

        // The board scene is long gone; its detach must not strip the
        // mini-game's bindings.
        router.detach("main");
        assert!(router.accepts("ClickerGame", "Space"));
    }
}
