//! Tune MIDI backend.
//!
//! Serializes a [`Tune`](tune_types::Tune) into a Standard MIDI File (see
//! [`smf`] for the fixed tempo, velocity and pitch mapping) and plays files
//! through an external [`Player`].

pub mod error;
pub mod player;
pub mod smf;

pub use error::{MidiError, MidiResult};
pub use player::{Player, DEFAULT_PLAYER};
pub use smf::{encode, write_file};
