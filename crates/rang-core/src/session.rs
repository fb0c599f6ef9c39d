//! Session provider seam
//!
//! The workflow needs to know who is logged in but must not depend on any
//! concrete auth backend. A host application implements [`SessionProvider`]
//! over its own session state; the bundled implementations cover the CLI
//! (static identity from flags/env) and anonymous use.

use std::sync::RwLock;

use crate::models::UserIdentity;

/// Callback invoked when the session changes (login/logout).
pub type SessionChangeFn = Box<dyn Fn(Option<UserIdentity>) + Send + Sync>;

/// Process-wide source of the current user identity.
pub trait SessionProvider: Send + Sync {
    /// The currently logged-in user, if any.
    fn current_user(&self) -> Option<UserIdentity>;

    /// Register a callback for session changes. Providers with immutable
    /// sessions may ignore the registration.
    fn on_change(&self, _callback: SessionChangeFn) {}
}

/// Provider with a fixed identity, set once at startup.
pub struct StaticSession {
    user: Option<UserIdentity>,
}

impl StaticSession {
    pub fn new(user: Option<UserIdentity>) -> Self {
        Self { user }
    }
}

impl SessionProvider for StaticSession {
    fn current_user(&self) -> Option<UserIdentity> {
        self.user.clone()
    }
}

/// Provider for anonymous use; never yields an identity.
pub struct NoSession;

impl SessionProvider for NoSession {
    fn current_user(&self) -> Option<UserIdentity> {
        None
    }
}

/// Mutable provider for hosts that log users in and out at runtime.
/// Notifies registered callbacks on every change.
#[derive(Default)]
pub struct SharedSession {
    user: RwLock<Option<UserIdentity>>,
    callbacks: RwLock<Vec<SessionChangeFn>>,
}

impl SharedSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_user(&self, user: Option<UserIdentity>) {
        *self.user.write().unwrap_or_else(|e| e.into_inner()) = user.clone();
        let callbacks = self.callbacks.read().unwrap_or_else(|e| e.into_inner());
        for callback in callbacks.iter() {
            callback(user.clone());
        }
    }
}

impl SessionProvider for SharedSession {
    fn current_user(&self) -> Option<UserIdentity> {
        self.user
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    fn on_change(&self, callback: SessionChangeFn) {
        self.callbacks
            .write()
            .unwrap_or_else(|e| e.into_inner())
            .push(callback);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use uuid::Uuid;

    #[test]
    fn static_session_returns_fixed_identity() {
        let identity = UserIdentity::new(Uuid::new_v4(), "a@b.c");
        let session = StaticSession::new(Some(identity.clone()));
        assert_eq!(session.current_user(), Some(identity));
        assert!(NoSession.current_user().is_none());
    }

    #[test]
    fn shared_session_notifies_on_change() {
        let session = SharedSession::new();
        let calls = Arc::new(AtomicUsize::new(0));
        let calls_clone = calls.clone();
        session.on_change(Box::new(move |_| {
            calls_clone.fetch_add(1, Ordering::SeqCst);
        }));

        session.set_user(Some(UserIdentity::new(Uuid::new_v4(), "a@b.c")));
        assert!(session.current_user().is_some());
        session.set_user(None);
        assert!(session.current_user().is_none());
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }
}
