//! Error types for the Vani voice translation system

use thiserror::Error;

/// Result type alias for voice translation operations
pub type VaniResult<T> = Result<T, VaniError>;

/// Errors that can occur in the voice translation session
#[derive(Error, Debug)]
pub enum VaniError {
    /// The platform has no speech recognition capability at all.
    #[error("speech recognition is not supported on this platform")]
    RecognitionUnsupported,

    #[error("speech recognition error: {0}")]
    Recognition(String),

    #[error("translation failed: {0}")]
    Translation(String),

    #[error("speech playback error: {0}")]
    Playback(String),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("channel send error: {0}")]
    ChannelSend(String),
}
