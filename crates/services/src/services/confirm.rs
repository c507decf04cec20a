//! "Are you sure?" gate for destructive actions.
//!
//! A caller parks the action it wants to run, shows the prompt, and only gets
//! the action back once the user confirms.

use domain::Record;
use reqwest::Method;

use super::{
    api_client::{ApiRequest, RequestBody},
    list_store::{ListStore, StoreError},
    message::StatusReporter,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PendingAction {
    Delete { path: String, label: String },
    MassDelete { path: String, ids: Vec<String> },
    Suspend { path: String, label: String },
}

impl PendingAction {
    pub fn delete<T: Record>(record: &T) -> Self {
        Self::Delete {
            path: record.path(),
            label: record.label(),
        }
    }

    pub fn mass_delete<T: Record>(ids: Vec<String>) -> Self {
        Self::MassDelete {
            path: format!("{}/mass-delete", T::RESOURCE),
            ids,
        }
    }

    pub fn suspend<T: Record>(record: &T) -> Self {
        Self::Suspend {
            path: format!("{}/suspend/{}", T::RESOURCE, record.id()),
            label: record.label(),
        }
    }

    pub fn prompt(&self) -> String {
        match self {
            Self::Delete { label, .. } => format!("Are you sure you want to delete {label}?"),
            Self::MassDelete { ids, .. } if ids.len() == 1 => {
                "Are you sure you want to delete the selected item?".to_string()
            }
            Self::MassDelete { ids, .. } => {
                format!("Are you sure you want to delete {} items?", ids.len())
            }
            Self::Suspend { label, .. } => format!("Are you sure you want to suspend {label}?"),
        }
    }
}

#[derive(Debug, Default)]
pub struct ConfirmGate {
    pending: Option<PendingAction>,
}

impl ConfirmGate {
    pub fn new() -> Self {
        Self::default()
    }

    /// Park `action`, replacing anything already pending. Returns the prompt to show.
    pub fn request(&mut self, action: PendingAction) -> String {
        let prompt = action.prompt();
        self.pending = Some(action);
        prompt
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    pub fn prompt(&self) -> Option<String> {
        self.pending.as_ref().map(PendingAction::prompt)
    }

    /// Hand the pending action over. Each request can be confirmed once.
    pub fn confirm(&mut self) -> Option<PendingAction> {
        self.pending.take()
    }

    pub fn cancel(&mut self) {
        self.pending = None;
    }
}

impl<T: Record> ListStore<T> {
    /// Run an action the user has confirmed.
    pub async fn run_confirmed(
        &mut self,
        action: PendingAction,
        reporter: &dyn StatusReporter,
    ) -> Result<(), StoreError> {
        match action {
            PendingAction::Delete { path, .. } => self.delete_one(&path, reporter).await,
            PendingAction::MassDelete { path, ids } => {
                self.mass_delete(&path, &ids, reporter).await
            }
            PendingAction::Suspend { path, .. } => {
                let request = ApiRequest::new(Method::PATCH, path).body(RequestBody::empty());
                self.send_and_resync(request, reporter).await
            }
        }
    }
}
