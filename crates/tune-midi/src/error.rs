//! MIDI backend error types.

use std::path::PathBuf;
use thiserror::Error;

/// Errors from serializing or playing a tune.
#[derive(Debug, Error)]
pub enum MidiError {
    /// A note is too long to encode as a single MIDI delta time.
    #[error("note of {ticks} ticks exceeds the longest MIDI delta time ({max} ticks)")]
    DeltaTooLarge { ticks: u64, max: u32 },

    /// The track grew past what a chunk length can describe.
    #[error("track of {0} bytes is too large for a MIDI file")]
    TrackTooLarge(usize),

    #[error("cannot write '{}': {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("file not found: {}", .0.display())]
    FileNotFound(PathBuf),

    #[error("player '{0}' not found on PATH")]
    PlayerNotFound(String),

    #[error("failed to start player '{program}': {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("player '{program}' exited with {status}")]
    PlayerFailed { program: String, status: String },

    /// Playback needs a POSIX host.
    #[error("playback is not supported on this platform")]
    Unsupported,
}

/// MIDI result type alias.
pub type MidiResult<T> = Result<T, MidiError>;
