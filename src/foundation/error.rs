/// Convenience result type used across framepass.
pub type FramepassResult<T> = Result<T, FramepassError>;

/// Top-level error taxonomy used by engine APIs.
///
/// Validation problems found while compiling passes are *not* errors; they are collected as
/// [`crate::Diagnostic`] values and the offending pass is skipped.
#[derive(thiserror::Error, Debug)]
pub enum FramepassError {
    /// A record layout exceeds the per-record hardware stride limit.
    #[error("layout too wide: record stride is {stride_bytes} bytes (max {max_bytes})")]
    LayoutTooWide {
        /// Requested stride in bytes.
        stride_bytes: usize,
        /// Hardware-imposed maximum stride in bytes.
        max_bytes: usize,
    },

    /// Two fields of one layout share a name.
    #[error("duplicate layout field `{0}`")]
    DuplicateField(String),

    /// A record field was addressed by a name the layout does not declare.
    #[error("unknown layout field `{0}`")]
    UnknownField(String),

    /// A field write carried the wrong number of elements.
    #[error("field `{field}` holds {expected} elements, got {actual}")]
    FieldShape {
        /// Field name.
        field: String,
        /// Element count declared by the layout.
        expected: usize,
        /// Element count supplied by the caller.
        actual: usize,
    },

    /// Rejected configuration value.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// Backing storage could not grow.
    #[error("allocation error: {0}")]
    Allocation(String),

    /// Invalid user-provided data.
    #[error("validation error: {0}")]
    Validation(String),

    /// A compiled sequence referenced a name its environment does not hold.
    #[error("replay error: {0}")]
    Replay(String),

    /// Errors when serializing or deserializing data structures.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Wrapped lower-level error from dependencies or collaborators.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl FramepassError {
    /// Build a [`FramepassError::InvalidConfig`] value.
    pub fn invalid_config(msg: impl Into<String>) -> Self {
        Self::InvalidConfig(msg.into())
    }

    /// Build a [`FramepassError::Allocation`] value.
    pub fn allocation(msg: impl Into<String>) -> Self {
        Self::Allocation(msg.into())
    }

    /// Build a [`FramepassError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`FramepassError::Replay`] value.
    pub fn replay(msg: impl Into<String>) -> Self {
        Self::Replay(msg.into())
    }

    /// Build a [`FramepassError::Serde`] value.
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }
}

impl From<serde_json::Error> for FramepassError {
    fn from(err: serde_json::Error) -> Self {
        Self::serde(err.to_string())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
