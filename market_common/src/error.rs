//! Error types shared by the catalog crates

use std::path::PathBuf;
use thiserror::Error;

/// Unified error type for catalog crawl, sync and market operations
#[derive(Debug, Error)]
pub enum CatalogError {
    /// HTTP request could not complete (connection refused, DNS, TLS, ...)
    #[error("Network error fetching {url}: {source}")]
    Network {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    /// HTTP request exceeded the configured timeout
    #[error("Request to {url} timed out")]
    Timeout { url: String },
    /// HTTP error status code
    #[error("HTTP error {status} from {url}")]
    HttpStatus {
        url: String,
        status: reqwest::StatusCode,
    },
    /// Response body did not have the expected structure
    #[error("Parse error in {context}: {reason}")]
    Parse { context: String, reason: String },
    /// Reconciliation reference slot was never written or cannot be read
    #[error("Snapshot slot '{slot}' is missing or unreadable")]
    MissingSnapshot { slot: String },
    /// Crawl would follow more next-page links than allowed
    #[error("Pagination limit of {limit} pages reached before {url}")]
    PaginationLimit { limit: usize, url: String },
    /// A next-page link points back to a page that was already fetched
    #[error("Pagination cycle: {url} was already visited")]
    PaginationCycle { url: String },
    /// Snapshot file I/O failed
    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// Invalid configuration value
    #[error("Configuration error: {0}")]
    Config(String),
}

impl CatalogError {
    /// Classifies a reqwest failure for `url` into timeout vs. other network errors
    pub fn from_request(url: impl Into<String>, err: reqwest::Error) -> Self {
        let url = url.into();
        if err.is_timeout() {
            CatalogError::Timeout { url }
        } else {
            CatalogError::Network { url, source: err }
        }
    }

    pub fn parse(context: impl Into<String>, reason: impl ToString) -> Self {
        CatalogError::Parse {
            context: context.into(),
            reason: reason.to_string(),
        }
    }

    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        CatalogError::Io {
            path: path.into(),
            source,
        }
    }
}

impl From<serde_json::Error> for CatalogError {
    fn from(err: serde_json::Error) -> Self {
        CatalogError::parse("JSON payload", err)
    }
}

/// Result alias for catalog operations
pub type Result<T> = std::result::Result<T, CatalogError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_snapshot_names_slot() {
        let err = CatalogError::MissingSnapshot {
            slot: "items_en".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Snapshot slot 'items_en' is missing or unreadable"
        );
    }

    #[test]
    fn test_json_error_converts_to_parse() {
        let err: CatalogError = serde_json::from_str::<u32>("not json").unwrap_err().into();
        match err {
            CatalogError::Parse { context, .. } => assert_eq!(context, "JSON payload"),
            other => panic!("Expected CatalogError::Parse, got: {other:?}"),
        }
    }

    #[test]
    fn test_io_error_display_includes_path() {
        let err = CatalogError::io(
            "/tmp/slots/mods_en",
            std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        );
        assert!(err.to_string().contains("/tmp/slots/mods_en"));
    }
}
