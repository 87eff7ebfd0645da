//! Panel display state.
//!
//! A [`Presenter`] turns poll outcomes into a [`ViewState`]:
//!
//! - `Loading` until the first outcome arrives
//! - `Error` when a poll failed and nothing good has been seen yet
//! - `Ready` once any poll succeeded
//!
//! A failure after a success keeps the last good value and attaches the
//! failure as a stale indicator. The next success clears it. Renderers
//! follow changes through a `tokio::sync::watch` receiver.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tokio::sync::watch;
use tracing::{debug, warn};

use crate::source::{SourceError, SourceResult};

/// Why the latest poll produced no data.
#[derive(Debug, Clone, PartialEq)]
pub struct PollFailure {
    pub message: String,
    pub at: DateTime<Utc>,
    /// False when asking again cannot help, e.g. a 404 or a payload mismatch.
    pub retryable: bool,
}

impl PollFailure {
    pub fn new(message: impl Into<String>, retryable: bool) -> Self {
        Self {
            message: message.into(),
            at: Utc::now(),
            retryable,
        }
    }
}

impl From<&SourceError> for PollFailure {
    fn from(err: &SourceError) -> Self {
        Self::new(format!("Data unavailable: {}", err), err.is_retryable())
    }
}

/// Last good value plus an optional stale indicator.
#[derive(Debug)]
pub struct Ready<T> {
    pub value: Arc<T>,
    pub updated_at: DateTime<Utc>,
    /// Set when a later poll failed; the value is then out of date.
    pub stale_error: Option<PollFailure>,
}

impl<T> Clone for Ready<T> {
    fn clone(&self) -> Self {
        Self {
            value: Arc::clone(&self.value),
            updated_at: self.updated_at,
            stale_error: self.stale_error.clone(),
        }
    }
}

impl<T> Ready<T> {
    pub fn is_stale(&self) -> bool {
        self.stale_error.is_some()
    }
}

/// What a panel shows.
#[derive(Debug)]
pub enum ViewState<T> {
    Loading,
    Error(PollFailure),
    Ready(Ready<T>),
}

impl<T> Clone for ViewState<T> {
    fn clone(&self) -> Self {
        match self {
            ViewState::Loading => ViewState::Loading,
            ViewState::Error(failure) => ViewState::Error(failure.clone()),
            ViewState::Ready(ready) => ViewState::Ready(ready.clone()),
        }
    }
}

impl<T> ViewState<T> {
    pub fn is_loading(&self) -> bool {
        matches!(self, ViewState::Loading)
    }

    pub fn is_error(&self) -> bool {
        matches!(self, ViewState::Error(_))
    }

    pub fn is_ready(&self) -> bool {
        matches!(self, ViewState::Ready(_))
    }

    /// Displayed value, stale or not.
    pub fn value(&self) -> Option<&T> {
        match self {
            ViewState::Ready(ready) => Some(ready.value.as_ref()),
            _ => None,
        }
    }

    /// The blocking error, or the stale indicator of a ready panel.
    pub fn failure(&self) -> Option<&PollFailure> {
        match self {
            ViewState::Loading => None,
            ViewState::Error(failure) => Some(failure),
            ViewState::Ready(ready) => ready.stale_error.as_ref(),
        }
    }

    /// Short label for status lines.
    pub fn label(&self) -> &'static str {
        match self {
            ViewState::Loading => "loading",
            ViewState::Error(_) => "error",
            ViewState::Ready(ready) if ready.is_stale() => "stale",
            ViewState::Ready(_) => "ready",
        }
    }
}

/// Owns one panel's state and publishes every change.
pub struct Presenter<T> {
    name: String,
    tx: watch::Sender<ViewState<T>>,
}

impl<T> Presenter<T>
where
    T: Send + Sync + 'static,
{
    pub fn new(name: impl Into<String>) -> Self {
        let (tx, _rx) = watch::channel(ViewState::Loading);
        Self {
            name: name.into(),
            tx,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Receiver that sees every later state change.
    pub fn subscribe(&self) -> watch::Receiver<ViewState<T>> {
        self.tx.subscribe()
    }

    /// Snapshot of the current state.
    pub fn current(&self) -> ViewState<T> {
        self.tx.borrow().clone()
    }

    /// Fold one poll outcome into the state.
    pub fn apply(&self, result: SourceResult<T>) {
        match result {
            Ok(value) => {
                debug!(panel = %self.name, "Panel updated");
                self.tx.send_replace(ViewState::Ready(Ready {
                    value: Arc::new(value),
                    updated_at: Utc::now(),
                    stale_error: None,
                }));
            }
            Err(err) => {
                warn!(panel = %self.name, error = %err, "Poll failed");
                let failure = PollFailure::from(&err);
                self.tx.send_modify(|state| match state {
                    ViewState::Ready(ready) => ready.stale_error = Some(failure),
                    _ => *state = ViewState::Error(failure),
                });
            }
        }
    }
}
