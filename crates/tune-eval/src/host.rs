//! The boundary between the evaluator and the outside world.
//!
//! Every effect form (`read`, `show`, `write`, `run`) goes through a
//! [`Host`]. The command-line driver supplies a console host; tests use
//! [`ScriptedHost`].

use std::collections::{BTreeSet, VecDeque};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tune_types::Tune;

/// A failure reported by the host while performing an effect.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct HostError {
    message: String,
}

impl HostError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl From<std::io::Error> for HostError {
    fn from(err: std::io::Error) -> Self {
        Self::new(err.to_string())
    }
}

pub trait Host {
    /// Read one line of input, without its terminator. `Ok(None)` at end of input.
    fn read_line(&mut self, prompt: &str) -> Result<Option<String>, HostError>;

    /// Program output (`show`).
    fn print(&mut self, text: &str);

    /// A non-fatal problem the user should see, such as failed playback.
    fn diagnostic(&mut self, text: &str);

    /// Render and play a tune. Best effort: callers never fail on an error here.
    fn play(&mut self, tune: &Tune) -> Result<(), HostError>;

    /// Serialize a tune to `path`.
    fn write_tune(&mut self, tune: &Tune, path: &Path) -> Result<(), HostError>;

    /// Play an existing file with the external player.
    fn run_file(&mut self, path: &Path) -> Result<(), HostError>;
}

impl<H: Host + ?Sized> Host for &mut H {
    fn read_line(&mut self, prompt: &str) -> Result<Option<String>, HostError> {
        (**self).read_line(prompt)
    }

    fn print(&mut self, text: &str) {
        (**self).print(text)
    }

    fn diagnostic(&mut self, text: &str) {
        (**self).diagnostic(text)
    }

    fn play(&mut self, tune: &Tune) -> Result<(), HostError> {
        (**self).play(tune)
    }

    fn write_tune(&mut self, tune: &Tune, path: &Path) -> Result<(), HostError> {
        (**self).write_tune(tune, path)
    }

    fn run_file(&mut self, path: &Path) -> Result<(), HostError> {
        (**self).run_file(path)
    }
}

// ══════════════════════════════════════════════════════════════════════════════
// ScriptedHost
// ══════════════════════════════════════════════════════════════════════════════

/// An in-memory host: canned input lines, recorded output and effects.
///
/// `write_tune` records the tune instead of touching the filesystem, and
/// `run_file` succeeds only for paths written earlier or registered with
/// [`ScriptedHost::with_file`].
#[derive(Debug, Default)]
pub struct ScriptedHost {
    input: VecDeque<String>,
    /// Number of `read_line` calls made.
    pub reads: usize,
    pub printed: Vec<String>,
    pub diagnostics: Vec<String>,
    pub played: Vec<Tune>,
    pub written: Vec<(PathBuf, Tune)>,
    pub ran: Vec<PathBuf>,
    files: BTreeSet<PathBuf>,
    playback_error: Option<String>,
}

impl ScriptedHost {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue lines to be returned by `read_line`, in order.
    pub fn with_input<I, S>(mut self, lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.input.extend(lines.into_iter().map(Into::into));
        self
    }

    /// Make `path` look like an existing file for `run_file`.
    pub fn with_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.files.insert(path.into());
        self
    }

    /// Make every `play` call fail with `message`.
    pub fn with_failing_playback(mut self, message: impl Into<String>) -> Self {
        self.playback_error = Some(message.into());
        self
    }
}

impl Host for ScriptedHost {
    fn read_line(&mut self, _prompt: &str) -> Result<Option<String>, HostError> {
        self.reads += 1;
        Ok(self.input.pop_front())
    }

    fn print(&mut self, text: &str) {
        self.printed.push(text.to_string());
    }

    fn diagnostic(&mut self, text: &str) {
        self.diagnostics.push(text.to_string());
    }

    fn play(&mut self, tune: &Tune) -> Result<(), HostError> {
        if let Some(message) = &self.playback_error {
            return Err(HostError::new(message.clone()));
        }
        self.played.push(tune.clone());
        Ok(())
    }

    fn write_tune(&mut self, tune: &Tune, path: &Path) -> Result<(), HostError> {
        self.files.insert(path.to_path_buf());
        self.written.push((path.to_path_buf(), tune.clone()));
        Ok(())
    }

    fn run_file(&mut self, path: &Path) -> Result<(), HostError> {
        if !self.files.contains(path) {
            return Err(HostError::new(format!(
                "file not found: {}",
                path.display()
            )));
        }
        self.ran.push(path.to_path_buf());
        Ok(())
    }
}
