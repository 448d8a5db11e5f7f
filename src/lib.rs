//! Drive a server-rendered web application the way a user would: find links
//! and forms by their visible text, work out the request an onclick handler
//! would really send, and hold back requests guarded by `confirm()` until
//! the test answers the dialog.

pub mod cli;
pub mod dom;
pub mod error;
pub mod form;
pub mod interact;
pub mod page;
pub mod popup;
pub mod report;
pub mod spec;
pub mod trace;
pub mod transport;

pub use error::{DriverError, Result};
pub use page::config::SessionConfig;
pub use page::page::Page;
pub use transport::Transport;
pub use transport::request::{HttpMethod, RequestIntent, Response};
