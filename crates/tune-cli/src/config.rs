//! Interpreter settings shared by the binary, the REPL and the tests.

use tune_midi::DEFAULT_PLAYER;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// External MIDI player binary.
    pub player: String,
    /// When false, `show` prints tunes but never spawns the player.
    pub play: bool,
    /// Echo `running <expr>` before evaluating.
    pub echo: bool,
    /// Print the parsed tree as JSON before evaluating.
    pub show_ast: bool,
    pub parse_only: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            player: DEFAULT_PLAYER.to_string(),
            play: true,
            echo: true,
            show_ast: false,
            parse_only: false,
        }
    }
}
