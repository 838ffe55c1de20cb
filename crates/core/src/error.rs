/// Result alias that carries the custom [`EyesError`] type.
pub type Result<T> = std::result::Result<T, EyesError>;

/// Common error type for the core crate.
#[derive(Debug, thiserror::Error)]
pub enum EyesError {
    /// The configuration cannot produce a working component: bad dimensions,
    /// negative emotion weights or a missing display reference. Always
    /// surfaced before the component reaches the running state.
    #[error("configuration error: {0}")]
    Config(String),
    /// A display backend failed to accept a drawing primitive or a flush.
    #[error("render error: {0}")]
    Render(String),
    /// A lifecycle operation was invoked in a state that does not allow it.
    #[error("invalid component state: {0}")]
    State(String),
    /// Malformed JSON configuration document.
    #[error("{0}")]
    Json(#[from] serde_json::Error),
    /// Wrapper around standard IO errors.
    #[error("{0}")]
    Io(#[from] std::io::Error),
}

impl EyesError {
    pub fn config<T: Into<String>>(msg: T) -> Self {
        Self::Config(msg.into())
    }

    pub fn render<T: Into<String>>(msg: T) -> Self {
        Self::Render(msg.into())
    }

    pub fn state<T: Into<String>>(msg: T) -> Self {
        Self::State(msg.into())
    }

    /// Returns `true` for errors that are fatal at startup.
    pub fn is_config(&self) -> bool {
        matches!(self, Self::Config(_) | Self::Json(_))
    }
}
