/// Result alias used across the crate.
pub type RaceResult<T> = Result<T, RaceError>;

/// Errors surfaced by keyframe building, configuration, and playback.
#[derive(thiserror::Error, Debug)]
pub enum RaceError {
    /// Empty or malformed input handed to the keyframe engine or a normalizer.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// A frame index outside `[0, len)`.
    #[error("frame index {index} is out of range for {len} keyframes")]
    OutOfRange {
        /// Requested index.
        index: usize,
        /// Number of keyframes in the track.
        len: usize,
    },

    /// Configuration or argument validation failure.
    #[error("validation error: {0}")]
    Validation(String),

    /// JSON (de)serialization failure.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Anything else, with its source preserved.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl RaceError {
    /// Build an [`RaceError::InvalidInput`].
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }

    /// Build an [`RaceError::Validation`].
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build an [`RaceError::Serde`].
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }

    /// Build an [`RaceError::OutOfRange`].
    pub fn out_of_range(index: usize, len: usize) -> Self {
        Self::OutOfRange { index, len }
    }
}

impl From<serde_json::Error> for RaceError {
    fn from(err: serde_json::Error) -> Self {
        Self::serde(err.to_string())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
