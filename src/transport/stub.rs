use std::collections::VecDeque;

use crate::error::Result;
use crate::transport::Transport;
use crate::transport::request::{RequestIntent, Response};

const DEFAULT_BODY: &str = "<html><body><p>ok</p></body></html>";

/// In-memory transport: answers from a queue of canned responses and records
/// every request it receives.
///
/// When the queue runs dry it answers `200` with a small placeholder page, so
/// tests only need to queue the responses they care about.
#[derive(Debug, Default)]
pub struct StubTransport {
    responses: VecDeque<Response>,
    requests: Vec<RequestIntent>,
}

impl StubTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a `200` response with the given body.
    pub fn with_page(mut self, body: &str) -> Self {
        self.responses.push_back(Response::ok(body));
        self
    }

    pub fn with_response(mut self, response: Response) -> Self {
        self.responses.push_back(response);
        self
    }

    pub fn push_response(&mut self, response: Response) {
        self.responses.push_back(response);
    }

    /// Every request seen so far, oldest first.
    pub fn requests(&self) -> &[RequestIntent] {
        &self.requests
    }

    pub fn request_count(&self) -> usize {
        self.requests.len()
    }

    pub fn last_request(&self) -> Option<&RequestIntent> {
        self.requests.last()
    }
}

impl Transport for StubTransport {
    fn request(&mut self, intent: &RequestIntent) -> Result<Response> {
        self.requests.push(intent.clone());
        let mut response = self
            .responses
            .pop_front()
            .unwrap_or_else(|| Response::ok(DEFAULT_BODY));
        if response.url.is_none() {
            response.url = Some(intent.url.clone());
        }
        Ok(response)
    }
}
