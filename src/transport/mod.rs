pub mod http;
pub mod params;
pub mod request;
pub mod stub;

use crate::error::Result;
use crate::transport::request::{RequestIntent, Response};

/// The boundary between the page and the application under test.
///
/// Implementations perform one blocking round trip per call and follow
/// redirects themselves, so the returned `Response` is the final page.
pub trait Transport {
    fn request(&mut self, intent: &RequestIntent) -> Result<Response>;
}

impl<T: Transport + ?Sized> Transport for Box<T> {
    fn request(&mut self, intent: &RequestIntent) -> Result<Response> {
        (**self).request(intent)
    }
}
