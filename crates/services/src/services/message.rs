//! User-facing status reporting for API calls.

use std::sync::{Mutex, PoisonError};

/// Receives the outcome of a request: a message for the user and loading transitions.
pub trait StatusReporter: Send + Sync {
    fn set_message(&self, _text: &str, _is_success: bool) {}

    fn set_loading(&self, _loading: bool) {}
}

/// Drops every message.
#[derive(Debug, Default, Clone, Copy)]
pub struct Silent;

impl StatusReporter for Silent {}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusMessage {
    pub text: String,
    pub is_success: bool,
}

/// Keeps every message and loading transition it receives.
#[derive(Debug, Default)]
pub struct MessageLog {
    messages: Mutex<Vec<StatusMessage>>,
    loading: Mutex<Vec<bool>>,
}

impl MessageLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn messages(&self) -> Vec<StatusMessage> {
        self.messages
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn last(&self) -> Option<StatusMessage> {
        self.messages
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .last()
            .cloned()
    }

    /// Loading flags in the order they were set.
    pub fn loading_transitions(&self) -> Vec<bool> {
        self.loading
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn is_loading(&self) -> bool {
        self.loading_transitions().last().copied().unwrap_or(false)
    }

    pub fn take(&self) -> Vec<StatusMessage> {
        std::mem::take(&mut *self.messages.lock().unwrap_or_else(PoisonError::into_inner))
    }
}

impl StatusReporter for MessageLog {
    fn set_message(&self, text: &str, is_success: bool) {
        self.messages
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(StatusMessage {
                text: text.to_string(),
                is_success,
            });
    }

    fn set_loading(&self, loading: bool) {
        self.loading
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(loading);
    }
}
