//! Interactive driver.
//!
//! One logical line is one top-level expression. A physical line ending in
//! `\` continues on the next one, and `dofile <path>` evaluates the contents
//! of a file in place of the line.

use std::path::PathBuf;

use colored::Colorize;
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;
use tune_eval::Host;

use crate::error::{read_source, CliError, CliResult};
use crate::session::{Outcome, Session};

pub const PROMPT: &str = "> ";
pub const CONTINUATION_PROMPT: &str = ">> ";

/// Joins physical lines ending in `\` into one logical line.
#[derive(Debug, Default)]
pub struct LineBuffer {
    pending: String,
}

impl LineBuffer {
    /// Feed one physical line. Returns the logical line once it is complete.
    pub fn push(&mut self, line: &str) -> Option<String> {
        if let Some(head) = line.strip_suffix('\\') {
            self.pending.push_str(head);
            self.pending.push('\n');
            return None;
        }
        self.pending.push_str(line);
        Some(std::mem::take(&mut self.pending))
    }

    pub fn is_continuing(&self) -> bool {
        !self.pending.is_empty()
    }

    pub fn clear(&mut self) {
        self.pending.clear();
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Input {
    Blank,
    Source(String),
    Dofile(PathBuf),
}

/// Recognise the `dofile` directive; anything else is source text.
pub fn classify(line: &str) -> CliResult<Input> {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return Ok(Input::Blank);
    }
    match trimmed.strip_prefix("dofile") {
        Some(rest) if rest.is_empty() || rest.starts_with(char::is_whitespace) => {
            let path = rest.trim().trim_matches('"');
            if path.is_empty() {
                return Err(CliError::MissingDofilePath);
            }
            Ok(Input::Dofile(PathBuf::from(path)))
        }
        _ => Ok(Input::Source(line.to_string())),
    }
}

/// Evaluate one logical line. `None` for a blank line.
pub fn eval_line<H: Host>(session: &mut Session<H>, line: &str) -> Option<Outcome> {
    match classify(line) {
        Ok(Input::Blank) => None,
        Ok(Input::Source(source)) => Some(session.run_source("<repl>", &source)),
        Ok(Input::Dofile(path)) => match read_source(&path) {
            Ok(source) => Some(session.run_source(&path.display().to_string(), &source)),
            Err(err) => {
                session.report(&err.to_string());
                Some(Outcome::Unreadable)
            }
        },
        Err(err) => {
            session.report(&err.to_string());
            Some(Outcome::Unreadable)
        }
    }
}

/// Run the read-eval-print loop until end of input.
pub fn run_repl<H: Host>(session: &mut Session<H>) -> rustyline::Result<()> {
    let mut rl = DefaultEditor::new()?;
    let mut buffer = LineBuffer::default();

    println!(
        "{} {}",
        "Tune".cyan().bold(),
        format!("v{} (ctrl-d to exit)", env!("CARGO_PKG_VERSION")).dimmed()
    );

    loop {
        let prompt = if buffer.is_continuing() {
            CONTINUATION_PROMPT
        } else {
            PROMPT
        };
        match rl.readline(prompt) {
            Ok(line) => {
                let Some(logical) = buffer.push(&line) else {
                    continue;
                };
                if !logical.trim().is_empty() {
                    let _ = rl.add_history_entry(logical.as_str());
                }
                eval_line(session, &logical);
            }
            Err(ReadlineError::Interrupted) => {
                buffer.clear();
                println!("{}", "ctrl-d to exit".yellow());
            }
            Err(ReadlineError::Eof) => break,
            Err(err) => return Err(err),
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn backslash_continues_the_line() {
        let mut buffer = LineBuffer::default();
        assert_eq!(buffer.push("let x = 1 in\\"), None);
        assert!(buffer.is_continuing());
        assert_eq!(buffer.push("x end").as_deref(), Some("let x = 1 in\nx end"));
        assert!(!buffer.is_continuing());
    }

    #[test]
    fn dofile_takes_a_path() {
        assert_eq!(
            classify("dofile songs/a.tune").unwrap(),
            Input::Dofile(PathBuf::from("songs/a.tune"))
        );
        assert_eq!(
            classify("  dofile \"b.tune\" ").unwrap(),
            Input::Dofile(PathBuf::from("b.tune"))
        );
        assert!(matches!(classify("dofile"), Err(CliError::MissingDofilePath)));
    }

    #[test]
    fn names_starting_with_dofile_are_source() {
        assert_eq!(
            classify("dofiles := 1").unwrap(),
            Input::Source("dofiles := 1".into())
        );
        assert_eq!(classify("   ").unwrap(), Input::Blank);
    }
}
