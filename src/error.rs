use thiserror::Error;

use crate::transport::request::HttpMethod;

pub type Result<T> = std::result::Result<T, DriverError>;

#[derive(Debug, Error)]
pub enum DriverError {
    /// Link, field, button or form could not be located on the page
    #[error("{0}")]
    Lookup(String),

    /// An onclick handler matched a known idiom but carried an unknown verb
    #[error("No HTTP method for {idiom} in {onclick:?}")]
    MethodInference { idiom: &'static str, onclick: String },

    /// Popup engine used outside its valid state
    #[error("Illegal popup state: {0}")]
    IllegalState(String),

    /// A popup was dismissed with a button it does not have
    #[error("Cannot find that button: {0:?}")]
    UnknownButton(String),

    /// Structural access before any response was loaded
    #[error("You must visit a path before working with the page.")]
    NoPageLoaded,

    /// A handle from a previous document generation was dereferenced
    #[error("Stale element handle (generation {handle_generation}, page is at {current_generation})")]
    StaleHandle {
        handle_generation: u64,
        current_generation: u64,
    },

    /// The application answered with a non-success status
    #[error("{method} {url} was not successful (status {status})")]
    RequestFailed {
        method: HttpMethod,
        url: String,
        status: u16,
    },

    /// The request never produced a response
    #[error("Transport error: {0}")]
    Transport(String),

    /// Invalid configuration (base URL, config file)
    #[error("Configuration error: {0}")]
    Config(String),
}

impl From<reqwest::Error> for DriverError {
    fn from(e: reqwest::Error) -> Self {
        DriverError::Transport(e.to_string())
    }
}
