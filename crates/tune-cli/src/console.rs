//! The console [`Host`]: line input, printed output and diagnostics, with
//! tunes rendered and played through `tune-midi`.

use std::io::{self, Cursor, Stderr, Stdin, Stdout, Write};
use std::path::Path;

use colored::Colorize;
use tracing::{debug, warn};
use tune_eval::{Host, HostError};
use tune_midi::{MidiError, Player};
use tune_types::Tune;

use crate::config::Config;

/// Where `read` gets its lines from.
///
/// Standard input is read through the process-wide handle, never through a
/// private buffer, so the interactive editor and `read` see the same stream.
pub trait LineSource {
    /// Append one line, terminator included, to `buf`. Returns the number of
    /// bytes read; zero at end of input.
    fn read_line(&mut self, buf: &mut String) -> io::Result<usize>;
}

impl LineSource for Stdin {
    fn read_line(&mut self, buf: &mut String) -> io::Result<usize> {
        Stdin::read_line(self, buf)
    }
}

impl<T: AsRef<[u8]>> LineSource for Cursor<T> {
    fn read_line(&mut self, buf: &mut String) -> io::Result<usize> {
        io::BufRead::read_line(self, buf)
    }
}

pub struct ConsoleHost<R, W, E> {
    input: R,
    out: W,
    err: E,
    player: Player,
    play: bool,
    color: bool,
}

impl ConsoleHost<Stdin, Stdout, Stderr> {
    /// A host on the process's standard streams. Diagnostics are colored.
    pub fn stdio(config: &Config) -> Self {
        let mut host = Self::new(io::stdin(), io::stdout(), io::stderr(), config);
        host.color = true;
        host
    }
}

impl<R: LineSource, W: Write, E: Write> ConsoleHost<R, W, E> {
    pub fn new(input: R, out: W, err: E, config: &Config) -> Self {
        Self {
            input,
            out,
            err,
            player: Player::new(config.player.clone()),
            play: config.play,
            color: false,
        }
    }

    /// Everything printed so far.
    pub fn output(&self) -> &W {
        &self.out
    }

    /// Everything reported as a diagnostic so far.
    pub fn errors(&self) -> &E {
        &self.err
    }
}

fn midi_error(err: MidiError) -> HostError {
    HostError::new(err.to_string())
}

impl<R: LineSource, W: Write, E: Write> Host for ConsoleHost<R, W, E> {
    fn read_line(&mut self, prompt: &str) -> Result<Option<String>, HostError> {
        write!(self.out, "{prompt}")?;
        self.out.flush()?;
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        let trimmed = line.trim_end_matches(['\n', '\r']).len();
        line.truncate(trimmed);
        Ok(Some(line))
    }

    fn print(&mut self, text: &str) {
        if let Err(err) = writeln!(self.out, "{text}") {
            warn!(error = %err, "failed to write output");
        }
    }

    fn diagnostic(&mut self, text: &str) {
        let result = if self.color {
            writeln!(self.err, "{}", text.red())
        } else {
            writeln!(self.err, "{text}")
        };
        if let Err(err) = result {
            warn!(error = %err, "failed to write diagnostic");
        }
    }

    fn play(&mut self, tune: &Tune) -> Result<(), HostError> {
        if !self.play {
            debug!(notes = tune.len(), "playback disabled");
            return Ok(());
        }
        self.player.play_tune(tune).map_err(midi_error)
    }

    fn write_tune(&mut self, tune: &Tune, path: &Path) -> Result<(), HostError> {
        tune_midi::write_file(tune, path).map_err(midi_error)
    }

    fn run_file(&mut self, path: &Path) -> Result<(), HostError> {
        self.player.play_file(path).map_err(midi_error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn host(input: &str) -> ConsoleHost<Cursor<Vec<u8>>, Vec<u8>, Vec<u8>> {
        let config = Config {
            play: false,
            ..Config::default()
        };
        ConsoleHost::new(Cursor::new(input.as_bytes().to_vec()), Vec::new(), Vec::new(), &config)
    }

    #[test]
    fn read_line_prompts_and_strips_terminator() {
        let mut h = host("42\r\nrest");
        assert_eq!(h.read_line("? ").unwrap().as_deref(), Some("42"));
        assert_eq!(h.read_line("? ").unwrap().as_deref(), Some("rest"));
        assert_eq!(h.read_line("? ").unwrap(), None);
        assert_eq!(String::from_utf8_lossy(h.output()), "? ? ? ");
    }

    #[test]
    fn disabled_playback_succeeds_without_a_player() {
        let mut h = host("");
        assert!(h.play(&Tune::empty()).is_ok());
    }

    #[test]
    fn diagnostics_are_plain_off_the_terminal() {
        let mut h = host("");
        h.diagnostic("TypeError: boom");
        assert_eq!(String::from_utf8_lossy(h.errors()), "TypeError: boom\n");
    }
}
