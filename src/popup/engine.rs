use std::str::FromStr;

use crate::dom::element::ElementHandle;
use crate::error::{DriverError, Result};
use crate::transport::request::HttpMethod;

pub const BUTTON_OK: &str = "OK";
pub const BUTTON_CANCEL: &str = "CANCEL";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PopupButton {
    Ok,
    Cancel,
}

impl FromStr for PopupButton {
    type Err = DriverError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            BUTTON_OK => Ok(PopupButton::Ok),
            BUTTON_CANCEL => Ok(PopupButton::Cancel),
            other => Err(DriverError::UnknownButton(other.to_string())),
        }
    }
}

/// What to do once a confirmation is accepted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResumeAction {
    /// Click the link again, this time past the `confirm()` guard
    ClickLink {
        link: ElementHandle,
        method: HttpMethod,
    },

    /// Submit the form, optionally through the button that triggered it
    SubmitForm {
        form: ElementHandle,
        button: Option<ElementHandle>,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingConfirmation {
    pub message: String,
    pub action: ResumeAction,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum PopupState {
    #[default]
    Idle,
    Blocked(PendingConfirmation),
}

/// Holds the single `confirm()` dialog a page can have open.
///
/// While blocked the deferred request sits in the `Blocked` arm; pressing a
/// button is the only way out, apart from abandoning it on navigation.
#[derive(Debug, Default)]
pub struct PopupEngine {
    state: PopupState,
}

impl PopupEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &PopupState {
        &self.state
    }

    pub fn is_blocked(&self) -> bool {
        matches!(self.state, PopupState::Blocked(_))
    }

    pub fn message(&self) -> Option<&str> {
        match &self.state {
            PopupState::Blocked(pending) => Some(&pending.message),
            PopupState::Idle => None,
        }
    }

    pub fn block(&mut self, pending: PendingConfirmation) -> Result<()> {
        if let PopupState::Blocked(current) = &self.state {
            return Err(DriverError::IllegalState(format!(
                "a confirmation is already pending ({:?})",
                current.message
            )));
        }
        self.state = PopupState::Blocked(pending);
        Ok(())
    }

    /// Answer the pending confirmation.
    ///
    /// Returns the action to resume for `OK`, `None` for `CANCEL`. An unknown
    /// button leaves the confirmation pending.
    pub fn press_button(&mut self, button: &str) -> Result<Option<ResumeAction>> {
        if !self.is_blocked() {
            return Err(DriverError::IllegalState("no pending confirmation".into()));
        }

        let button: PopupButton = button.parse()?;
        let PopupState::Blocked(pending) = std::mem::take(&mut self.state) else {
            return Err(DriverError::IllegalState("no pending confirmation".into()));
        };

        match button {
            PopupButton::Ok => Ok(Some(pending.action)),
            PopupButton::Cancel => Ok(None),
        }
    }

    /// Drop the pending confirmation without answering it.
    pub fn abandon(&mut self) -> Option<PendingConfirmation> {
        match std::mem::take(&mut self.state) {
            PopupState::Blocked(pending) => Some(pending),
            PopupState::Idle => None,
        }
    }
}
