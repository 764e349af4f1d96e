//! Standard MIDI File encoding.
//!
//! A tune becomes a format-0 file: one track, one channel, fixed tempo and
//! velocity. Notes follow one another with no overlap. A rest emits no
//! event but still advances time by its duration.
//!
//! ```text
//! MThd  len=6  format=0  tracks=1  division=TICKS_PER_BEAT
//! MTrk  len    [0 tempo-meta]  {Δ note-on  Δ note-off}*  Δ end-of-track
//! ```

use std::path::Path;

use tracing::debug;
use tune_types::{Pitch, Tune};

use crate::error::{MidiError, MidiResult};

pub const TEMPO_BPM: u32 = 250;
pub const VELOCITY: u8 = 100;
pub const CHANNEL: u8 = 0;
/// MIDI note number of `C`; the other pitches follow in half steps.
pub const REFERENCE_PITCH: u8 = 60;
pub const TICKS_PER_BEAT: u16 = 960;

/// Largest value a variable-length quantity can hold (four bytes).
pub const MAX_DELTA: u32 = 0x0FFF_FFFF;

const NOTE_OFF: u8 = 0x80;
const NOTE_ON: u8 = 0x90;
const META: u8 = 0xFF;
const META_TEMPO: u8 = 0x51;
const META_END_OF_TRACK: u8 = 0x2F;

/// MIDI note number for a pitch, `None` for a rest.
pub fn note_number(pitch: Pitch) -> Option<u8> {
    let index = pitch.chromatic_index()?;
    u8::try_from(index).ok().map(|i| REFERENCE_PITCH + i)
}

/// Encode `tune` as the bytes of a Standard MIDI File.
pub fn encode(tune: &Tune) -> MidiResult<Vec<u8>> {
    let track = encode_track(tune)?;
    let track_len =
        u32::try_from(track.len()).map_err(|_| MidiError::TrackTooLarge(track.len()))?;

    let mut out = Vec::with_capacity(22 + track.len());
    out.extend_from_slice(b"MThd");
    out.extend_from_slice(&6u32.to_be_bytes());
    out.extend_from_slice(&0u16.to_be_bytes()); // format 0
    out.extend_from_slice(&1u16.to_be_bytes()); // one track
    out.extend_from_slice(&TICKS_PER_BEAT.to_be_bytes());
    out.extend_from_slice(b"MTrk");
    out.extend_from_slice(&track_len.to_be_bytes());
    out.extend_from_slice(&track);
    Ok(out)
}

/// Encode `tune` and write it to `path`, replacing any existing file.
pub fn write_file(tune: &Tune, path: &Path) -> MidiResult<()> {
    let bytes = encode(tune)?;
    std::fs::write(path, &bytes).map_err(|source| MidiError::Write {
        path: path.to_path_buf(),
        source,
    })?;
    debug!(
        path = %path.display(),
        bytes = bytes.len(),
        notes = tune.len(),
        "midi file written"
    );
    Ok(())
}

fn encode_track(tune: &Tune) -> MidiResult<Vec<u8>> {
    let mut track = Vec::new();

    let micros_per_beat = 60_000_000 / TEMPO_BPM;
    write_vlq(&mut track, 0);
    track.extend_from_slice(&[META, META_TEMPO, 3]);
    track.extend_from_slice(&micros_per_beat.to_be_bytes()[1..]);

    // Silence accumulated since the last event.
    let mut pending: u64 = 0;
    for note in tune.notes() {
        let ticks = u64::from(note.duration) * u64::from(TICKS_PER_BEAT);
        let Some(key) = note_number(note.pitch) else {
            pending += ticks;
            continue;
        };
        write_vlq(&mut track, delta(pending)?);
        track.extend_from_slice(&[NOTE_ON | CHANNEL, key, VELOCITY]);
        write_vlq(&mut track, delta(ticks)?);
        track.extend_from_slice(&[NOTE_OFF | CHANNEL, key, 0]);
        pending = 0;
    }

    write_vlq(&mut track, delta(pending)?);
    track.extend_from_slice(&[META, META_END_OF_TRACK, 0]);
    Ok(track)
}

fn delta(ticks: u64) -> MidiResult<u32> {
    u32::try_from(ticks)
        .ok()
        .filter(|&t| t <= MAX_DELTA)
        .ok_or(MidiError::DeltaTooLarge {
            ticks,
            max: MAX_DELTA,
        })
}

/// Append `value` as a MIDI variable-length quantity (7 bits per byte,
/// high bit set on all but the last).
fn write_vlq(out: &mut Vec<u8>, value: u32) {
    let mut groups = [0u8; 4];
    let mut n = 0;
    let mut v = value;
    loop {
        groups[n] = (v & 0x7F) as u8;
        n += 1;
        v >>= 7;
        if v == 0 {
            break;
        }
    }
    for (i, group) in groups[..n].iter().enumerate().rev() {
        let continuation = if i > 0 { 0x80 } else { 0 };
        out.push(group | continuation);
    }
}
