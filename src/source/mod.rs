//! Keyword sources
//!
//! The external source-of-truth for the keyword table. Consumed only by the
//! refresh scheduler; the row shape `(keyword, reply)` is the only
//! structural contract the core depends on.

pub mod sheet;

pub use sheet::SheetCsvSource;

use async_trait::async_trait;

/// Errors from fetching keyword rows. Always recovered by the scheduler,
/// which keeps serving the last good table.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("source unreachable: {0}")]
    Transport(String),

    #[error("source authentication failed: {0}")]
    Auth(String),

    #[error("source returned malformed data: {0}")]
    Malformed(String),
}

/// A source of keyword/reply rows
#[async_trait]
pub trait KeywordSource: Send + Sync {
    /// Fetch the full current row set, header row included if the source
    /// carries one.
    async fn fetch_rows(&self) -> Result<Vec<(String, String)>, FetchError>;
}

/// Fixed in-memory source, for tests and offline operation
#[derive(Debug, Clone, Default)]
pub struct StaticSource {
    rows: Vec<(String, String)>,
}

impl StaticSource {
    /// Create a source that always returns `rows`
    pub fn new(rows: Vec<(String, String)>) -> Self {
        Self { rows }
    }
}

#[async_trait]
impl KeywordSource for StaticSource {
    async fn fetch_rows(&self) -> Result<Vec<(String, String)>, FetchError> {
        Ok(self.rows.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_static_source_returns_rows() {
        let source = StaticSource::new(vec![("hi".to_string(), "hello".to_string())]);
        let rows = source.fetch_rows().await.unwrap();
        assert_eq!(rows, vec![("hi".to_string(), "hello".to_string())]);
    }

    #[test]
    fn test_fetch_error_display() {
        let e = FetchError::Transport("timed out".to_string());
        assert_eq!(e.to_string(), "source unreachable: timed out");
    }
}
