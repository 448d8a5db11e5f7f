use std::cell::OnceCell;

use crate::dom::document::Document;
use crate::error::{DriverError, Result};

/// Lazily parsed document for the current response body.
///
/// Every invalidation bumps the generation, so handles minted by an earlier
/// parse can be told apart from the current one.
#[derive(Debug, Default)]
pub struct DomCache {
    generation: u64,
    document: OnceCell<Document>,
}

impl DomCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn is_parsed(&self) -> bool {
        self.document.get().is_some()
    }

    /// Drop the parsed document; the next access re-parses.
    pub fn invalidate(&mut self) {
        self.generation += 1;
        self.document = OnceCell::new();
    }

    /// The parsed document, parsing `body` on first access.
    pub fn document(&self, body: Option<&str>) -> Result<&Document> {
        if let Some(doc) = self.document.get() {
            return Ok(doc);
        }
        let body = body.ok_or(DriverError::NoPageLoaded)?;
        Ok(self
            .document
            .get_or_init(|| Document::parse(body, self.generation)))
    }

    pub fn document_mut(&mut self, body: Option<&str>) -> Result<&mut Document> {
        if self.document.get().is_none() {
            let body = body.ok_or(DriverError::NoPageLoaded)?;
            let parsed = Document::parse(body, self.generation);
            let _ = self.document.set(parsed);
        }
        self.document.get_mut().ok_or(DriverError::NoPageLoaded)
    }
}
