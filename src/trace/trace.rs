use serde::Serialize;
use std::time::{SystemTime, UNIX_EPOCH};

use crate::transport::request::RequestIntent;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TraceKind {
    Request,
    PopupBlocked,
    PopupAccepted,
    PopupCancelled,
    PopupAbandoned,
    Snapshot,
}

/// One line of the session trace file.
#[derive(Debug, Serialize)]
pub struct TraceEvent {
    pub timestamp_ms: u128,
    pub step: u64,
    pub kind: TraceKind,

    pub method: Option<String>,
    pub url: Option<String>,
    pub status: Option<u16>,

    pub message: Option<String>,
}

impl TraceEvent {
    pub fn now(step: u64, kind: TraceKind) -> Self {
        Self {
            timestamp_ms: SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .map(|d| d.as_millis())
                .unwrap_or_default(),
            step,
            kind,
            method: None,
            url: None,
            status: None,
            message: None,
        }
    }

    pub fn with_request(mut self, intent: &RequestIntent) -> Self {
        self.method = Some(intent.method.to_string());
        self.url = Some(intent.url.clone());
        self
    }

    pub fn with_status(mut self, status: u16) -> Self {
        self.status = Some(status);
        self
    }

    pub fn with_message(mut self, message: impl ToString) -> Self {
        self.message = Some(message.to_string());
        self
    }
}
