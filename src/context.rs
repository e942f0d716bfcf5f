use std::fmt;

use tokio::sync::watch;
use uuid::Uuid;

/// Opaque credentials of the signed-in user.
#[derive(Clone, PartialEq, Eq)]
pub struct Session {
    pub access_token: String,
    pub user_id: Option<String>,
}

impl Session {
    pub fn new(access_token: impl Into<String>) -> Self {
        Self {
            access_token: access_token.into(),
            user_id: None,
        }
    }

    pub fn with_user_id(mut self, user_id: impl Into<String>) -> Self {
        self.user_id = Some(user_id.into());
        self
    }
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("access_token", &"<redacted>")
            .field("user_id", &self.user_id)
            .finish()
    }
}

/// Application-wide values shared between components.
///
/// Each value lives in a `watch` channel, so readers get the latest value and
/// subscribers are woken on every change. Built once at startup and handed
/// out behind an `Arc`.
#[derive(Debug)]
pub struct AppContext {
    session: watch::Sender<Option<Session>>,
    selected_company: watch::Sender<Option<Uuid>>,
}

impl AppContext {
    pub fn new() -> Self {
        Self {
            session: watch::Sender::new(None),
            selected_company: watch::Sender::new(None),
        }
    }

    pub fn session(&self) -> Option<Session> {
        self.session.borrow().clone()
    }

    pub fn is_signed_in(&self) -> bool {
        self.session.borrow().is_some()
    }

    /// Replace the session. Subscribers are only notified on an actual change.
    pub fn set_session(&self, session: Option<Session>) {
        self.session.send_if_modified(|current| {
            if *current == session {
                return false;
            }
            *current = session;
            true
        });
    }

    pub fn subscribe_session(&self) -> watch::Receiver<Option<Session>> {
        self.session.subscribe()
    }

    pub fn selected_company(&self) -> Option<Uuid> {
        *self.selected_company.borrow()
    }

    pub fn select_company(&self, company_id: Option<Uuid>) {
        self.selected_company.send_if_modified(|current| {
            if *current == company_id {
                return false;
            }
            *current = company_id;
            true
        });
    }

    pub fn subscribe_company(&self) -> watch::Receiver<Option<Uuid>> {
        self.selected_company.subscribe()
    }
}

impl Default for AppContext {
    fn default() -> Self {
        Self::new()
    }
}
