use reqwest::blocking::Client;
use reqwest::redirect::Policy;
use url::Url;

use crate::error::{DriverError, Result};
use crate::transport::Transport;
use crate::transport::request::{HttpMethod, RequestIntent, Response};

const MAX_REDIRECTS: usize = 10;

/// A transport backed by a blocking reqwest client.
///
/// Relative request URLs are joined onto `base_url`. Cookies persist for the
/// lifetime of the transport so login flows carry their session across
/// requests, and redirects are followed before the response is returned.
pub struct HttpTransport {
    client: Client,
    base_url: Url,
}

impl HttpTransport {
    pub fn new(base_url: &str) -> Result<Self> {
        let base_url = Url::parse(base_url)
            .map_err(|e| DriverError::Config(format!("Invalid base URL '{}': {}", base_url, e)))?;

        let client = Client::builder()
            .cookie_store(true)
            .redirect(Policy::limited(MAX_REDIRECTS))
            .build()
            .map_err(|e| DriverError::Transport(format!("Failed to build HTTP client: {}", e)))?;

        Ok(HttpTransport { client, base_url })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn resolve(&self, path: &str) -> Result<Url> {
        self.base_url
            .join(path)
            .map_err(|e| DriverError::Transport(format!("Cannot resolve '{}': {}", path, e)))
    }

    /// Path and query of `url` when it lives on the base origin, else the full URL.
    fn relative_to_base(&self, url: &Url) -> String {
        if url.origin() != self.base_url.origin() {
            return url.to_string();
        }
        match url.query() {
            Some(q) => format!("{}?{}", url.path(), q),
            None => url.path().to_string(),
        }
    }
}

impl Transport for HttpTransport {
    fn request(&mut self, intent: &RequestIntent) -> Result<Response> {
        let url = self.resolve(&intent.url)?;
        let pairs = intent.payload.to_pairs();

        let builder = match intent.method {
            HttpMethod::Get => self.client.get(url).query(&pairs),
            HttpMethod::Post => self.client.post(url).form(&pairs),
            HttpMethod::Put => self.client.put(url).form(&pairs),
            HttpMethod::Delete => self.client.delete(url).form(&pairs),
        };

        let response = builder.send().map_err(|e| {
            DriverError::Transport(format!("{} {} failed: {}", intent.method, intent.url, e))
        })?;

        let status = response.status().as_u16();
        let final_url = self.relative_to_base(response.url());
        let body = response.text().map_err(|e| {
            DriverError::Transport(format!("Failed to read body of {}: {}", intent.url, e))
        })?;

        Ok(Response {
            status,
            url: Some(final_url),
            body,
        })
    }
}
