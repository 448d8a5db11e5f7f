use std::{fs::OpenOptions, io::Write};

use tracing::warn;

use crate::trace::trace::TraceEvent;

/// Appends `TraceEvent`s as JSON lines. A logger without a file is a no-op.
#[derive(Debug, Default)]
pub struct TraceLogger {
    file: Option<std::fs::File>,
}

impl TraceLogger {
    pub fn new(path: &str) -> Self {
        match OpenOptions::new().create(true).append(true).open(path) {
            Ok(f) => Self { file: Some(f) },
            Err(e) => {
                warn!("could not open trace file '{}': {}", path, e);
                Self { file: None }
            }
        }
    }

    pub fn disabled() -> Self {
        Self { file: None }
    }

    pub fn from_path(path: Option<&str>) -> Self {
        path.map(Self::new).unwrap_or_default()
    }

    pub fn is_enabled(&self) -> bool {
        self.file.is_some()
    }

    pub fn log(&mut self, event: &TraceEvent) {
        let Some(file) = self.file.as_mut() else {
            return;
        };

        let json = match serde_json::to_string(event) {
            Ok(j) => j,
            Err(e) => {
                warn!("failed to serialize trace event: {}", e);
                return;
            }
        };

        if let Err(e) = writeln!(file, "{}", json) {
            warn!("failed to write trace event: {}", e);
        }
    }
}
