//! Error types for dashboard operations

use thiserror::Error;

/// Dashboard specific errors
#[derive(Debug, Error)]
pub enum DashboardError {
    /// Market data provider failed
    #[error("Provider error: {0}")]
    Provider(String),

    /// Symbol is not part of the ticker universe
    #[error("Invalid symbol: {0}")]
    InvalidSymbol(String),

    /// Control selection violates a selection rule
    #[error("Invalid selection: {0}")]
    InvalidSelection(String),

    /// Date could not be parsed
    #[error("Invalid date: {0}")]
    InvalidDate(String),

    /// Fetched data does not have the expected shape
    #[error("Unexpected data shape: {0}")]
    ShapeMismatch(String),

    /// Indicator parameters are invalid
    #[error("Indicator error: {0}")]
    Indicator(String),

    /// Control command could not be parsed
    #[error("Command error: {0}")]
    Command(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Chart export failed
    #[error("Export error: {0}")]
    Export(String),

    /// Filesystem error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type alias for dashboard operations
pub type Result<T> = std::result::Result<T, DashboardError>;

impl From<minijinja::Error> for DashboardError {
    fn from(err: minijinja::Error) -> Self {
        DashboardError::Export(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = DashboardError::InvalidSymbol("XYZ".to_string());
        assert_eq!(err.to_string(), "Invalid symbol: XYZ");

        let err = DashboardError::ShapeMismatch("missing Close for AAPL".to_string());
        assert_eq!(err.to_string(), "Unexpected data shape: missing Close for AAPL");
    }

    #[test]
    fn test_error_conversion() {
        let template = minijinja::Environment::new().render_str("{{ x", ());
        let err: DashboardError = template.unwrap_err().into();
        assert!(matches!(err, DashboardError::Export(_)));

        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let err: DashboardError = io.into();
        assert!(err.to_string().starts_with("IO error"));
    }
}
