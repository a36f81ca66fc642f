use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Free-form provenance metadata attached to documents and chunks.
pub type Metadata = BTreeMap<String, serde_json::Value>;

/// Ordered vector produced by an embedding provider.
pub type EmbeddingVector = Vec<f32>;

pub const SOURCE_KEY: &str = "source";
pub const PAGE_KEY: &str = "page";
pub const TOTAL_PAGES_KEY: &str = "total_pages";
pub const ROW_KEY: &str = "row";

/// Unsplit text extracted from a source file: one page, one row or the whole file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawDocument {
    pub text: String,
    pub metadata: Metadata,
}

/// Bounded-length segment of a [`RawDocument`], the unit of embedding and storage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Chunk {
    pub text: String,
    pub metadata: Metadata,
}

impl RawDocument {
    pub fn new(text: impl Into<String>, source: impl Into<String>) -> Self {
        let mut metadata = Metadata::new();
        metadata.insert(
            SOURCE_KEY.to_string(),
            serde_json::Value::String(source.into()),
        );
        Self {
            text: text.into(),
            metadata,
        }
    }

    pub fn with_metadata(mut self, key: &str, value: impl Into<serde_json::Value>) -> Self {
        self.metadata.insert(key.to_string(), value.into());
        self
    }

    pub fn source(&self) -> Option<&str> {
        self.metadata.get(SOURCE_KEY).and_then(|v| v.as_str())
    }

    pub fn set_source(&mut self, source: impl Into<String>) {
        self.metadata.insert(
            SOURCE_KEY.to_string(),
            serde_json::Value::String(source.into()),
        );
    }
}

impl Chunk {
    /// Build a chunk that inherits a copy of its parent's metadata.
    pub fn from_parent(parent: &RawDocument, text: String) -> Self {
        Self {
            text,
            metadata: parent.metadata.clone(),
        }
    }

    pub fn source(&self) -> Option<&str> {
        self.metadata.get(SOURCE_KEY).and_then(|v| v.as_str())
    }

    pub fn char_count(&self) -> usize {
        self.text.chars().count()
    }
}

impl From<Chunk> for RawDocument {
    fn from(chunk: Chunk) -> Self {
        Self {
            text: chunk.text,
            metadata: chunk.metadata,
        }
    }
}
