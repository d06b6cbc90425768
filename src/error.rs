use std::path::PathBuf;
use thiserror::Error;

/// Errors raised by table construction and chart rendering.
#[derive(Debug, Error)]
pub enum ChartError {
    /// No graphical environment to show the chart in.
    #[error("display unavailable: {0}")]
    DisplayUnavailable(String),

    #[error("unsupported output format: {} (expected .svg or .png)", .0.display())]
    UnsupportedFormat(PathBuf),

    /// A column whose length differs from the index length.
    #[error("column '{column}' has {actual} values, expected {expected}")]
    ShapeMismatch {
        column: String,
        expected: usize,
        actual: usize,
    },

    #[error("duplicate label '{0}'")]
    DuplicateLabel(String),

    #[error("table has no rows or no columns")]
    EmptyTable,
}
