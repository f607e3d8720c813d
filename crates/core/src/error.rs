/// Result alias that carries the custom [`GraphamaticsError`] type.
pub type Result<T> = std::result::Result<T, GraphamaticsError>;

/// Common error type for the core crate.
#[derive(Debug, thiserror::Error)]
pub enum GraphamaticsError {
    /// No descriptor in the registry is enabled, so there is nothing to show.
    /// This is a build or configuration mistake and is never retried.
    #[error("no visualization is enabled; enable exactly one in the registry")]
    NoEnabledVisualization,
    /// A visualization was requested by a name the registry does not know.
    #[error("unknown visualization `{0}`")]
    UnknownVisualization(String),
    /// Windowing or presentation failure reported by the host window.
    #[error("window error: {0}")]
    Window(String),
    /// Malformed configuration file.
    #[error("invalid configuration: {0}")]
    Config(#[from] serde_json::Error),
    /// Wrapper around standard IO errors.
    #[error("{0}")]
    Io(#[from] std::io::Error),
}

impl GraphamaticsError {
    /// Creates a window error from anything displayable.
    pub fn window<T: std::fmt::Display>(err: T) -> Self {
        Self::Window(err.to_string())
    }
}
