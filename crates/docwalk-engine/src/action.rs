//! The action-dispatch contract behind [`Walker::act`](crate::Walker::act).

use serde::Serialize;

/// Something the host can do at a cursor position.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum Action {
    FollowLink { destination: String, title: String },
    OpenImage { source: String },
    ToggleTask { checked: bool },
}

impl Action {
    /// Short label for menus and announcements.
    pub fn label(&self) -> String {
        match self {
            Action::FollowLink { destination, .. } => format!("Follow link to {destination}"),
            Action::OpenImage { source } => format!("Open image {source}"),
            Action::ToggleTask { checked: true } => "Uncheck task".to_string(),
            Action::ToggleTask { checked: false } => "Check task".to_string(),
        }
    }
}

/// The host side of [`Walker::act`](crate::Walker::act).
///
/// A single candidate is handed to [`perform`](Self::perform). Several
/// candidates go to [`disambiguate`](Self::disambiguate), which may ask the
/// user right away or later; the walker does not wait for the outcome.
pub trait ActionHost {
    fn perform(&mut self, action: Action);

    fn disambiguate(&mut self, actions: Vec<Action>);
}

/// Host that records every call, for tests and dry runs.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct RecordingHost {
    pub performed: Vec<Action>,
    pub disambiguations: Vec<Vec<Action>>,
}

impl RecordingHost {
    pub fn new() -> Self {
        Self::default()
    }

    /// True if neither entry point was ever called.
    pub fn is_untouched(&self) -> bool {
        self.performed.is_empty() && self.disambiguations.is_empty()
    }
}

impl ActionHost for RecordingHost {
    fn perform(&mut self, action: Action) {
        self.performed.push(action);
    }

    fn disambiguate(&mut self, actions: Vec<Action>) {
        self.disambiguations.push(actions);
    }
}
