//! Per-view controllers.
//!
//! Each controller owns its state. Fetch results reach that state only
//! through the controller's `apply` path; a late response simply overwrites
//! whatever is there.

mod composer;
mod dashboard;
mod integrations;

pub use composer::{ComposerController, ComposerState, PostDraft};
pub use dashboard::{DashboardController, DashboardState, DashboardUpdate};
pub use integrations::{IntegrationsController, IntegrationsState};

use crate::error::{BackendError, BackendResult};

#[derive(Debug, Clone, PartialEq)]
pub enum Slot<T> {
    Idle,
    Loading,
    Ready(T),
    Failed(String),
}

impl<T> Default for Slot<T> {
    fn default() -> Self {
        Slot::Idle
    }
}

impl<T> Slot<T> {
    pub fn ready(&self) -> Option<&T> {
        match self {
            Slot::Ready(value) => Some(value),
            _ => None,
        }
    }

    pub fn ready_mut(&mut self) -> Option<&mut T> {
        match self {
            Slot::Ready(value) => Some(value),
            _ => None,
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, Slot::Loading)
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            Slot::Failed(message) => Some(message),
            _ => None,
        }
    }
}

/// Splits a fetch result into the slot value to store and the error to hand back.
fn settle<T: Clone>(result: BackendResult<T>) -> (Slot<T>, BackendResult<T>) {
    match result {
        Ok(value) => (Slot::Ready(value.clone()), Ok(value)),
        Err(err) => (Slot::Failed(err.to_string()), Err(err)),
    }
}

fn invalid(message: impl Into<String>) -> BackendError {
    BackendError::InvalidRequest(message.into())
}
