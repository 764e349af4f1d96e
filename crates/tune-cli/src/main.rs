//! Tune command-line interpreter.
//!
//! Usage:
//!   tune                 - start the REPL
//!   tune FILE...         - run each file as one top-level expression
//!   tune -e EXPR         - evaluate one expression

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use colored::Colorize;
use tracing::debug;
use tune_cli::{init_tracing, repl, Config, ConsoleHost, Session};

#[derive(Parser, Debug)]
#[command(name = "tune")]
#[command(version)]
#[command(about = "An interpreter for Tune, a small language for writing melodies", long_about = None)]
struct Args {
    /// Source files to run, in order
    #[arg()]
    files: Vec<PathBuf>,

    /// Evaluate an expression
    #[arg(short, long, conflicts_with = "files")]
    eval: Option<String>,

    /// MIDI player used by `show` and `run`
    #[arg(long, env = "TUNE_PLAYER", default_value = tune_midi::DEFAULT_PLAYER)]
    player: String,

    /// Print tunes without playing them
    #[arg(long)]
    no_play: bool,

    /// Do not echo each expression before evaluating it
    #[arg(short, long)]
    quiet: bool,

    /// Print the parsed tree as JSON
    #[arg(long)]
    ast: bool,

    /// Parse only (don't evaluate)
    #[arg(short, long)]
    parse_only: bool,
}

impl Args {
    fn config(&self) -> Config {
        Config {
            player: self.player.clone(),
            play: !self.no_play,
            echo: !self.quiet,
            show_ast: self.ast,
            parse_only: self.parse_only,
        }
    }
}

fn main() -> ExitCode {
    init_tracing();
    let args = Args::parse();
    let config = args.config();
    debug!(?config, "starting");

    let host = ConsoleHost::stdio(&config);
    let mut session = Session::new(config, host);

    if let Some(source) = &args.eval {
        return exit_code(session.run_source("<expr>", source).is_success());
    }

    if !args.files.is_empty() {
        let mut failed = 0usize;
        for file in &args.files {
            if !session.run_file(file).is_success() {
                failed += 1;
            }
        }
        if failed > 0 {
            debug!(failed, total = args.files.len(), "batch finished with failures");
        }
        return exit_code(failed == 0);
    }

    match repl::run_repl(&mut session) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("{}: {err}", "Error".red().bold());
            ExitCode::FAILURE
        }
    }
}

fn exit_code(success: bool) -> ExitCode {
    if success {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}
