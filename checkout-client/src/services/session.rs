//! Current-identity storage.

use std::sync::RwLock;

use crate::models::Identity;

/// Where the signed-in identity lives between screens. Implementations may be
/// memory, browser storage, a keychain...
pub trait SessionRepository: Send + Sync {
    fn current(&self) -> Option<Identity>;
    fn set(&self, identity: Identity);
    fn clear(&self);
}

#[derive(Default)]
pub struct InMemorySessionRepository {
    identity: RwLock<Option<Identity>>,
}

impl InMemorySessionRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SessionRepository for InMemorySessionRepository {
    fn current(&self) -> Option<Identity> {
        self.identity
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    fn set(&self, identity: Identity) {
        *self
            .identity
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner()) = Some(identity);
    }

    fn clear(&self) {
        *self
            .identity
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner()) = None;
    }
}
