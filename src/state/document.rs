use serde::{Deserialize, Serialize};

/// The text of one successfully fetched page
///
/// Serialized as `{"url": ..., "text": ...}`, which is also the record shape
/// of the raw corpus file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CrawlDocument {
    /// The URL that was requested
    pub url: String,

    /// Text extracted from the page
    pub text: String,
}

impl CrawlDocument {
    pub fn new(url: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            text: text.into(),
        }
    }
}
