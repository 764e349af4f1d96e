//! One interpreter session: source text in, diagnostics and values out.

use std::path::Path;

use tracing::debug;
use tune_eval::{Evaluator, Host, Value};
use tune_parser::parse_source;
use tune_types::{SourceFile, SyntaxErrors};

use crate::config::Config;
use crate::error::read_source;

/// What happened to one top-level expression.
#[derive(Debug)]
pub enum Outcome {
    /// Evaluated to a value.
    Value(Value),
    /// Parsed successfully; evaluation was skipped (`--parse-only`).
    Parsed,
    /// The source could not be read.
    Unreadable,
    ParseFailed,
    EvalFailed,
}

impl Outcome {
    pub fn is_success(&self) -> bool {
        matches!(self, Outcome::Value(_) | Outcome::Parsed)
    }
}

/// Runs top-level expressions one after another.
///
/// Each expression is evaluated in a fresh empty environment; a failure
/// is reported through the host and never stops the session.
pub struct Session<H: Host> {
    config: Config,
    evaluator: Evaluator<H>,
}

impl<H: Host> Session<H> {
    pub fn new(config: Config, host: H) -> Self {
        Self {
            config,
            evaluator: Evaluator::new(host),
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn host(&self) -> &H {
        self.evaluator.host()
    }

    pub fn into_host(self) -> H {
        self.evaluator.into_host()
    }

    /// Parse and evaluate one top-level expression. `name` labels the
    /// source in diagnostics.
    pub fn run_source(&mut self, name: &str, source: &str) -> Outcome {
        let source_file = SourceFile::new(name, source);
        let parsed = parse_source(&source_file);
        let Some(expr) = parsed.expr else {
            self.report_syntax_errors(&parsed.errors);
            return Outcome::ParseFailed;
        };

        let host = self.evaluator.host_mut();
        if self.config.show_ast {
            match serde_json::to_string_pretty(&expr) {
                Ok(json) => host.print(&json),
                Err(err) => host.diagnostic(&format!("cannot render tree: {err}")),
            }
        }
        if self.config.parse_only {
            return Outcome::Parsed;
        }
        if self.config.echo {
            host.print(&format!("running {expr}"));
        }

        debug!(source = name, "evaluating");
        match self.evaluator.run(&expr) {
            Ok(value) => {
                self.evaluator.host_mut().print(&format!("result: {value}"));
                Outcome::Value(value)
            }
            Err(err) => {
                let message = format!("{}: {err}", err.kind());
                self.evaluator.host_mut().diagnostic(&message);
                Outcome::EvalFailed
            }
        }
    }

    /// Run a whole file as one top-level expression.
    pub fn run_file(&mut self, path: &Path) -> Outcome {
        match read_source(path) {
            Ok(source) => self.run_source(&path.display().to_string(), &source),
            Err(err) => {
                self.evaluator.host_mut().diagnostic(&err.to_string());
                Outcome::Unreadable
            }
        }
    }

    pub(crate) fn report(&mut self, message: &str) {
        self.evaluator.host_mut().diagnostic(message);
    }

    fn report_syntax_errors(&mut self, errors: &SyntaxErrors) {
        let host = self.evaluator.host_mut();
        for error in &errors.errors {
            let line = match &error.suggestion {
                Some(suggestion) => {
                    format!("parse error: {}:{error} (help: {suggestion})", error.file)
                }
                None => format!("parse error: {}:{error}", error.file),
            };
            host.diagnostic(&line);
        }
        let hidden = errors.total_errors.saturating_sub(errors.errors.len());
        if hidden > 0 {
            host.diagnostic(&format!("parse error: {hidden} more errors not shown"));
        }
    }
}
