//! External player invocation.
//!
//! Playback hands a MIDI file to a media player binary (`timidity` by
//! default) and waits for it to finish. Only POSIX hosts are supported.

use std::path::{Path, PathBuf};

use tracing::debug;
use tune_types::Tune;

use crate::error::{MidiError, MidiResult};
use crate::smf;

pub const DEFAULT_PLAYER: &str = "timidity";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Player {
    program: String,
}

impl Default for Player {
    fn default() -> Self {
        Self::new(DEFAULT_PLAYER)
    }
}

impl Player {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    /// Locate the player binary. A program containing a path separator is
    /// used as given; otherwise each `PATH` entry is searched.
    pub fn resolve(&self) -> MidiResult<PathBuf> {
        let given = Path::new(&self.program);
        if given.components().count() > 1 {
            return if is_executable(given) {
                Ok(given.to_path_buf())
            } else {
                Err(MidiError::PlayerNotFound(self.program.clone()))
            };
        }
        let path_var = std::env::var_os("PATH").unwrap_or_default();
        std::env::split_paths(&path_var)
            .map(|dir| dir.join(&self.program))
            .find(|candidate| is_executable(candidate))
            .ok_or_else(|| MidiError::PlayerNotFound(self.program.clone()))
    }

    /// Play an existing MIDI file, blocking until the player exits.
    pub fn play_file(&self, path: &Path) -> MidiResult<()> {
        if !path.is_file() {
            return Err(MidiError::FileNotFound(path.to_path_buf()));
        }
        let binary = self.resolve()?;
        self.spawn(&binary, path)
    }

    /// Render `tune` to a temporary file and play it.
    pub fn play_tune(&self, tune: &Tune) -> MidiResult<()> {
        let binary = self.resolve()?;
        let file = tempfile::Builder::new()
            .prefix("tune-")
            .suffix(".mid")
            .tempfile()
            .map_err(|source| MidiError::Write {
                path: std::env::temp_dir(),
                source,
            })?;
        smf::write_file(tune, file.path())?;
        self.spawn(&binary, file.path())
    }

    #[cfg(unix)]
    fn spawn(&self, binary: &Path, file: &Path) -> MidiResult<()> {
        use std::process::{Command, Stdio};

        debug!(player = %binary.display(), file = %file.display(), "spawning player");
        let status = Command::new(binary)
            .arg(file)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .status()
            .map_err(|source| MidiError::Spawn {
                program: self.program.clone(),
                source,
            })?;
        if status.success() {
            Ok(())
        } else {
            Err(MidiError::PlayerFailed {
                program: self.program.clone(),
                status: status.to_string(),
            })
        }
    }

    #[cfg(not(unix))]
    fn spawn(&self, _binary: &Path, _file: &Path) -> MidiResult<()> {
        Err(MidiError::Unsupported)
    }
}

#[cfg(unix)]
fn is_executable(path: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt;
    path.metadata()
        .map(|m| m.is_file() && m.permissions().mode() & 0o111 != 0)
        .unwrap_or(false)
}

#[cfg(not(unix))]
fn is_executable(path: &Path) -> bool {
    path.is_file()
}
