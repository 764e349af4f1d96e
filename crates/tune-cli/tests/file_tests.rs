//! Filesystem-backed tests: batch files, `dofile`, and MIDI output through
//! the console host.

use std::io::Cursor;
use std::path::Path;

use tune_cli::repl::eval_line;
use tune_cli::{Config, ConsoleHost, Outcome, Session};
use tune_eval::{ScriptedHost, Value};

type TestHost = ConsoleHost<Cursor<Vec<u8>>, Vec<u8>, Vec<u8>>;

fn config() -> Config {
    Config {
        echo: false,
        play: false,
        player: "definitely-not-a-midi-player-7f3a".into(),
        ..Config::default()
    }
}

fn console_session(input: &str) -> Session<TestHost> {
    let config = config();
    let host = ConsoleHost::new(
        Cursor::new(input.as_bytes().to_vec()),
        Vec::new(),
        Vec::new(),
        &config,
    );
    Session::new(config, host)
}

fn stdout_of(session: &Session<TestHost>) -> String {
    String::from_utf8_lossy(session.host().output()).into_owned()
}

fn stderr_of(session: &Session<TestHost>) -> String {
    String::from_utf8_lossy(session.host().errors()).into_owned()
}

fn write_source(dir: &Path, name: &str, source: &str) -> std::path::PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, source).unwrap();
    path
}

#[test]
fn file_runs_as_one_expression() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_source(
        dir.path(),
        "song.tune",
        "// a short phrase\nlet t = (A, 1) | (B, 1) in\n  reverse(t)\nend\n",
    );
    let mut s = Session::new(config(), ScriptedHost::new());
    assert!(s.run_file(&path).is_success());
    assert_eq!(s.host().printed, vec!["result: [(B, 1), (A, 1)]"]);
}

#[test]
fn unreadable_file_fails_and_next_file_still_runs() {
    let dir = tempfile::tempdir().unwrap();
    let good = write_source(dir.path(), "good.tune", "1 + 1");
    let mut s = Session::new(config(), ScriptedHost::new());
    let outcomes = [s.run_file(&dir.path().join("missing.tune")), s.run_file(&good)];
    assert!(matches!(outcomes[0], Outcome::Unreadable));
    assert!(outcomes[1].is_success());
    assert_eq!(s.host().printed, vec!["result: 2"]);
}

#[test]
fn dofile_evaluates_file_contents() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_source(dir.path(), "calc.tune", "6 / 4");
    let mut s = Session::new(config(), ScriptedHost::new());
    let outcome = eval_line(&mut s, &format!("dofile {}", path.display())).unwrap();
    assert!(matches!(outcome, Outcome::Value(Value::Int(1))));
}

#[test]
fn write_produces_a_midi_file() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("out.mid");
    let mut s = console_session("");
    let source = format!("write((C, 1) | (R, 1) | (E, 2), \"{}\")", out.display());
    let outcome = s.run_source("<test>", &source);
    assert!(matches!(outcome, Outcome::Value(Value::Bool(true))), "{}", stderr_of(&s));
    let bytes = std::fs::read(&out).unwrap();
    assert_eq!(&bytes[0..4], b"MThd");
    assert_eq!(stdout_of(&s), "result: true\n");
}

#[test]
fn write_of_non_tune_is_a_runtime_error() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("out.mid");
    let mut s = console_session("");
    s.run_source("<test>", &format!("write(3, \"{}\")", out.display()));
    assert!(stderr_of(&s).starts_with("RuntimeError: expected Tune"));
    assert!(!out.exists());
}

#[test]
fn run_without_player_is_a_runtime_error() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("out.mid");
    let mut s = console_session("");
    let source = format!(
        "write((A, 1), \"{path}\"); run(\"{path}\")",
        path = out.display()
    );
    assert!(matches!(s.run_source("<test>", &source), Outcome::EvalFailed));
    assert!(stderr_of(&s).starts_with("RuntimeError: "));
    assert!(out.exists());
}

#[test]
fn read_prompts_on_stdout() {
    let mut s = console_session("41\n");
    let outcome = s.run_source("<test>", "read + 1");
    assert!(matches!(outcome, Outcome::Value(Value::Int(42))));
    assert_eq!(stdout_of(&s), "enter Integer: result: 42\n");
}

#[test]
fn show_without_playback_still_prints() {
    let mut s = console_session("");
    s.run_source("<test>", "show (G, 3)");
    assert_eq!(stdout_of(&s), "[(G, 3)]\nresult: [(G, 3)]\n");
    assert_eq!(stderr_of(&s), "");
}
