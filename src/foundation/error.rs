/// Convenience result type used across frostpane.
pub type FrostpaneResult<T> = Result<T, FrostpaneError>;

/// Top-level error taxonomy used by kernel APIs.
#[derive(thiserror::Error, Debug)]
pub enum FrostpaneError {
    /// Bad surface geometry or mismatched auxiliary maps, caught before any pixel write.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// Vectorized kernel invoked on hardware without the required lanes.
    #[error("capability error: {0}")]
    Capability(String),

    /// Scratch allocation failure; the destination buffer is left untouched.
    #[error("resource error: {0}")]
    Resource(String),

    /// Wrapped lower-level error from dependencies or hosts.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl FrostpaneError {
    /// Build a [`FrostpaneError::InvalidArgument`] value.
    pub fn invalid_argument(msg: impl Into<String>) -> Self {
        Self::InvalidArgument(msg.into())
    }

    /// Build a [`FrostpaneError::Capability`] value.
    pub fn capability(msg: impl Into<String>) -> Self {
        Self::Capability(msg.into())
    }

    /// Build a [`FrostpaneError::Resource`] value.
    pub fn resource(msg: impl Into<String>) -> Self {
        Self::Resource(msg.into())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
