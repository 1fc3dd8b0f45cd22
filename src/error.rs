//! Error types for trazado operations.
//!
//! Only the typed input boundary can fail; the pipeline itself degrades
//! to partial or empty output instead of erroring.

use thiserror::Error;

/// Result type alias using [`Error`].
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur when interpreting caller-supplied documents.
#[derive(Error, Debug)]
pub enum Error {
    /// Chart kind string does not name a supported chart family.
    #[error("unknown chart kind: {0}")]
    UnknownChartKind(String),

    /// Chart spec document does not deserialize.
    #[error("invalid chart spec: {0}")]
    Spec(#[source] serde_json::Error),

    /// Encodings document does not deserialize.
    #[error("invalid encodings: {0}")]
    Encodings(#[source] serde_json::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_chart_kind_display() {
        let err = Error::UnknownChartKind("pie".into());
        assert!(err.to_string().contains("pie"));
    }

    #[test]
    fn test_spec_error_display() {
        let json_err = serde_json::from_value::<u32>(serde_json::json!("x")).unwrap_err();
        let err = Error::Spec(json_err);
        assert!(err.to_string().starts_with("invalid chart spec"));
    }
}
