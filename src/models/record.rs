// file: src/models/record.rs
// description: source and cleaned record models with serialization
// reference: internal data structures

use serde::{Deserialize, Serialize};

/// A record as it arrives from the source dataset. Fields that are missing
/// in the upstream row deserialize as `None` rather than failing the page.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SourceRecord {
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub document_type: Option<String>,
}

impl SourceRecord {
    /// The raw text body: `content` wins, `text` is the legacy fallback,
    /// a record carrying neither yields the empty string.
    pub fn body(&self) -> &str {
        self.content
            .as_deref()
            .or(self.text.as_deref())
            .unwrap_or("")
    }
}

/// A cleaned record ready for shard serialization. Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CleanRecord {
    pub url: Option<String>,
    pub content: String,
    pub source: String,
}

impl CleanRecord {
    pub fn new(url: Option<String>, content: String, source: impl Into<String>) -> Self {
        Self {
            url,
            content,
            source: source.into(),
        }
    }

    /// One JSON object per line, trailing newline included. serde_json keeps
    /// non-ASCII characters verbatim, which is what the shard format requires.
    pub fn to_jsonl_line(&self) -> serde_json::Result<String> {
        let mut line = serde_json::to_string(self)?;
        line.push('\n');
        Ok(line)
    }
}
