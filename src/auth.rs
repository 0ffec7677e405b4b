//! Authentication state for a board.
//!
//! This module provides:
//! - `UserDirectory` - the registered users, with credentials
//! - `Session` - the SignedOut/SignedIn state machine plus the last auth error
//! - `LoadingFlag` - a shareable flag raised while a login or registration runs
//!
//! Persistence of the directory and the session entry is driven by
//! [`Board`](crate::board::Board); nothing here touches storage.

use crate::models::{User, UserRecord};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use thiserror::Error;

/// Errors surfaced by login and registration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthError {
    /// No directory entry matches both email and password
    #[error("Invalid email or password")]
    InvalidCredentials,

    /// Registration attempted with an email already in the directory
    #[error("Email already registered")]
    EmailTaken,
}

/// Registered users, in registration order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserDirectory {
    records: Vec<UserRecord>,
}

impl UserDirectory {
    pub fn new(records: Vec<UserRecord>) -> Self {
        Self { records }
    }

    pub fn records(&self) -> &[UserRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Credential-stripped copies of every registered user.
    pub fn users(&self) -> Vec<User> {
        self.records.iter().map(UserRecord::to_user).collect()
    }

    /// Exact, case-sensitive email lookup.
    pub fn contains_email(&self, email: &str) -> bool {
        self.records.iter().any(|r| r.user.email == email)
    }

    pub fn find(&self, id: &str) -> Option<&UserRecord> {
        self.records.iter().find(|r| r.user.id == id)
    }

    /// The session-facing user for a matching email/password pair.
    pub fn authenticate(&self, email: &str, password: &str) -> Result<User, AuthError> {
        self.records
            .iter()
            .find(|r| r.matches(email, password))
            .map(UserRecord::to_user)
            .ok_or(AuthError::InvalidCredentials)
    }

    /// Append a new record. Fails without modifying the directory on a duplicate email.
    pub fn register(&mut self, record: UserRecord) -> Result<User, AuthError> {
        if self.contains_email(&record.user.email) {
            return Err(AuthError::EmailTaken);
        }
        let user = record.to_user();
        self.records.push(record);
        Ok(user)
    }
}

/// Session state machine.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum SessionState {
    #[default]
    SignedOut,
    SignedIn(User),
}

/// Flag raised for the duration of a login or registration.
///
/// Clones share the same flag, so a presentation layer on another thread can
/// watch it while the board waits out the simulated latency.
#[derive(Debug, Clone, Default)]
pub struct LoadingFlag(Arc<AtomicBool>);

impl LoadingFlag {
    pub fn is_loading(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }

    fn set(&self, loading: bool) {
        self.0.store(loading, Ordering::SeqCst);
    }
}

/// Lowers the loading flag when dropped, including on early return.
pub(crate) struct LoadingGuard {
    flag: LoadingFlag,
}

impl Drop for LoadingGuard {
    fn drop(&mut self) {
        self.flag.set(false);
    }
}

/// The current session and its last auth error.
#[derive(Debug, Default)]
pub struct Session {
    state: SessionState,
    error: Option<String>,
    loading: LoadingFlag,
}

impl Session {
    /// Start from a hydrated user, if any.
    pub fn restore(user: Option<User>) -> Self {
        Self {
            state: user.map_or(SessionState::SignedOut, SessionState::SignedIn),
            ..Self::default()
        }
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn current_user(&self) -> Option<&User> {
        match &self.state {
            SessionState::SignedIn(user) => Some(user),
            SessionState::SignedOut => None,
        }
    }

    pub fn is_signed_in(&self) -> bool {
        matches!(self.state, SessionState::SignedIn(_))
    }

    /// Human-readable message from the last failed login or registration.
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn loading_flag(&self) -> LoadingFlag {
        self.loading.clone()
    }

    /// Raise the loading flag and clear any prior error.
    pub(crate) fn begin_attempt(&mut self) -> LoadingGuard {
        self.error = None;
        self.loading.set(true);
        LoadingGuard {
            flag: self.loading.clone(),
        }
    }

    pub(crate) fn sign_in(&mut self, user: User) {
        self.error = None;
        self.state = SessionState::SignedIn(user);
    }

    pub(crate) fn record_failure(&mut self, error: &AuthError) {
        self.record_message(error.to_string());
    }

    pub(crate) fn record_message(&mut self, message: String) {
        self.error = Some(message);
    }

    pub(crate) fn sign_out(&mut self) {
        self.state = SessionState::SignedOut;
    }
}
