//! JSON document format used by the `cblf` command line tool.
use crate::bloom::{BloomError, BloomFilter, BloomResult, FilterSnapshot};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::{SystemTime, UNIX_EPOCH};
use tracing::{debug, info};

pub const DOCUMENT_VERSION: u32 = 1;

/// Bookkeeping stored next to the filter bits. None of it affects
/// membership answers.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DocumentMetadata {
    /// Values handed to `insert` over the document's lifetime, duplicates
    /// across sessions included
    #[serde(default)]
    pub insert_count: u64,
    #[serde(default)]
    pub target_error: Option<f64>,
    #[serde(default)]
    pub expected_count: Option<usize>,
}

impl DocumentMetadata {
    /// Metadata for a filter combined from two documents.
    ///
    /// A union received every insert of both inputs, so the counts add up.
    /// An intersection keeps at most the smaller count. Target settings are
    /// carried only when both inputs agree on them.
    pub fn merged(left: &Self, right: &Self, intersection: bool) -> Self {
        let insert_count = if intersection {
            left.insert_count.min(right.insert_count)
        } else {
            left.insert_count.saturating_add(right.insert_count)
        };
        Self {
            insert_count,
            target_error: left
                .target_error
                .filter(|_| left.target_error == right.target_error),
            expected_count: left
                .expected_count
                .filter(|_| left.expected_count == right.expected_count),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilterDocument {
    pub version: u32,
    /// Unix seconds
    pub created_at: u64,
    /// Unix seconds
    pub saved_at: u64,
    pub bloom: FilterSnapshot,
    #[serde(default)]
    pub metadata: DocumentMetadata,
}

fn unix_now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or_default()
}

impl FilterDocument {
    pub fn new(filter: &BloomFilter, metadata: DocumentMetadata) -> Self {
        let now = unix_now();
        Self {
            version: DOCUMENT_VERSION,
            created_at: now,
            saved_at: now,
            bloom: filter.to_snapshot(),
            metadata,
        }
    }

    /// Rebuilds the filter, validating the stored shape and words.
    pub fn to_filter(&self) -> BloomResult<BloomFilter> {
        BloomFilter::from_snapshot(self.bloom.clone())
    }

    /// Replaces the stored bits with `filter`'s and bumps `saved_at`.
    pub fn update(&mut self, filter: &BloomFilter, inserted: u64) {
        self.bloom = filter.to_snapshot();
        self.metadata.insert_count += inserted;
        self.saved_at = unix_now();
    }

    pub fn to_json(&self) -> BloomResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn from_json(json: &str) -> BloomResult<Self> {
        let document: Self = serde_json::from_str(json)?;
        if document.version != DOCUMENT_VERSION {
            return Err(BloomError::InvalidParameter(format!(
                "Unsupported document version {}, expected {}",
                document.version, DOCUMENT_VERSION
            )));
        }
        Ok(document)
    }

    pub fn save(&self, path: &Path) -> BloomResult<()> {
        let json = self.to_json()?;
        fs::write(path, &json)?;
        info!(path = %path.display(), bytes = json.len(), "Saved filter document");
        Ok(())
    }

    pub fn load(path: &Path) -> BloomResult<Self> {
        let json = fs::read_to_string(path)?;
        let document = Self::from_json(&json)?;
        debug!(
            path = %path.display(),
            m = document.bloom.bit_vector_size,
            k = document.bloom.num_hashes,
            "Loaded filter document"
        );
        Ok(document)
    }
}
