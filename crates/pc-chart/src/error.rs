use std::path::PathBuf;

/// Result type for rendering.
pub type ChartResult<T> = Result<T, ChartError>;

/// Errors raised while rendering or writing a chart.
#[derive(Debug, thiserror::Error)]
pub enum ChartError {
    /// The chart could not be serialized.
    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    /// Formatting the chart text failed.
    #[error("chart formatting error: {0}")]
    Format(#[from] std::fmt::Error),

    /// The rendered chart could not be written.
    #[error("cannot write to {}: {source}", path.display())]
    Write {
        /// Destination path.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_error_converts() {
        let err = ChartError::from(std::fmt::Error);
        assert!(matches!(err, ChartError::Format(_)));
        assert!(err.to_string().starts_with("chart formatting error"));
    }
}
