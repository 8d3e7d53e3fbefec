//! Error types for playback management

use thiserror::Error;

/// Playback errors
///
/// Track transitions never fail: a dead end is a no-op. These errors cover
/// the few operations that can be rejected outright.
#[derive(Debug, Error)]
pub enum PlaybackError {
    /// No track is currently loaded
    #[error("No track loaded")]
    NoTrackLoaded,

    /// Invalid seek position
    #[error("Invalid seek position: {0}")]
    InvalidSeekPosition(f64),

    /// Index out of bounds
    #[error("Index out of bounds: {0}")]
    IndexOutOfBounds(usize),

    /// The controller task has stopped
    #[error("Player controller is no longer running")]
    ControllerClosed,

    /// Remote music service error
    #[error(transparent)]
    Api(#[from] encore_core::EncoreError),
}

/// Result type for playback operations
pub type Result<T> = std::result::Result<T, PlaybackError>;
