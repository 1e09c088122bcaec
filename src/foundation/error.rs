/// Convenience result type used across flamecraft.
pub type FlameResult<T> = Result<T, FlameError>;

/// Top-level error taxonomy used by model and codec APIs.
#[derive(thiserror::Error, Debug)]
pub enum FlameError {
    /// An argument was outside its declared range. Raised before any state change.
    #[error("validation error: {0}")]
    Validation(String),

    /// A document could not be interpreted as a flame.
    #[error("format error: {0}")]
    Format(String),

    /// Errors when serializing or deserializing configuration.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl FlameError {
    /// Build a [`FlameError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`FlameError::Format`] value.
    pub fn format(msg: impl Into<String>) -> Self {
        Self::Format(msg.into())
    }

    /// Build a [`FlameError::Serde`] value.
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }

    /// True for [`FlameError::Format`].
    pub fn is_format(&self) -> bool {
        matches!(self, Self::Format(_))
    }

    /// True for [`FlameError::Validation`].
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
