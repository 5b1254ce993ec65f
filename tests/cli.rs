mod common;

use common::{NOTES_MD, write_deck};
use deckscribe::ooxml::pptx::{Deck, ShapeSummary};
use std::path::Path;
use std::process::{Command, Output};

fn deckscribe(args: &[&std::ffi::OsStr], cwd: &Path) -> Output {
    Command::new(env!("CARGO_BIN_EXE_deckscribe"))
        .args(args)
        .current_dir(cwd)
        .env_remove("RUST_LOG")
        .output()
        .unwrap()
}

fn write_config(dir: &Path) -> std::path::PathBuf {
    let path = dir.join("deckscribe.yaml");
    let yaml = format!(
        "output_dir: \"{}\"\nrender:\n  enabled: false\n  cache_dir: \"{}\"\n",
        dir.join("out").display(),
        dir.join("cache").display()
    );
    std::fs::write(&path, yaml).unwrap();
    path
}

#[test]
fn annotates_deck_with_explicit_output() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_deck(dir.path(), "talk.pptx", 3);
    let notes = dir.path().join("talk_notes.md");
    std::fs::write(&notes, NOTES_MD).unwrap();
    let config = write_config(dir.path());
    let output = dir.path().join("annotated.pptx");

    let result = deckscribe(
        &[
            input.as_os_str(),
            output.as_os_str(),
            "--notes".as_ref(),
            notes.as_os_str(),
            "--config".as_ref(),
            config.as_os_str(),
            "--no-pdf".as_ref(),
        ],
        dir.path(),
    );
    assert!(
        result.status.success(),
        "stderr: {}",
        String::from_utf8_lossy(&result.stderr)
    );
    assert!(String::from_utf8_lossy(&result.stdout).contains("Saved:"));

    let deck = Deck::open(&output).unwrap();
    assert_eq!(deck.slide_count(), 6);
    let notes_box = deck
        .shapes(1)
        .unwrap()
        .into_iter()
        .find_map(|shape| match shape {
            ShapeSummary::TextBox { name, body, .. } if name == "Notes" => Some(body),
            _ => None,
        })
        .unwrap();
    assert_eq!(notes_box.plain_text(), "Hello");
    assert!(dir.path().join("cache/placeholders/placeholder-1.png").is_file());
}

#[test]
fn default_output_goes_to_output_dir() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_deck(dir.path(), "talk.pptx", 1);
    let config = write_config(dir.path());

    let result = deckscribe(
        &[
            input.as_os_str(),
            "--config".as_ref(),
            config.as_os_str(),
            "--no-pdf".as_ref(),
        ],
        dir.path(),
    );
    assert!(result.status.success());

    let written: Vec<_> = std::fs::read_dir(dir.path().join("out"))
        .unwrap()
        .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    assert_eq!(written.len(), 1);
    assert!(written[0].starts_with("talk_output_"));
    assert!(written[0].ends_with(".pptx"));
}

#[test]
fn unsupported_notes_format_is_not_fatal() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_deck(dir.path(), "talk.pptx", 2);
    let notes = dir.path().join("notes.txt");
    std::fs::write(&notes, NOTES_MD).unwrap();
    let config = write_config(dir.path());
    let output = dir.path().join("annotated.pptx");

    let result = deckscribe(
        &[
            input.as_os_str(),
            output.as_os_str(),
            "--notes".as_ref(),
            notes.as_os_str(),
            "--config".as_ref(),
            config.as_os_str(),
            "--no-pdf".as_ref(),
        ],
        dir.path(),
    );
    assert!(result.status.success());
    assert_eq!(Deck::open(&output).unwrap().slide_count(), 4);
}

#[test]
fn missing_input_fails() {
    let dir = tempfile::tempdir().unwrap();
    let config = write_config(dir.path());
    let missing = dir.path().join("missing.pptx");

    let result = deckscribe(
        &[
            missing.as_os_str(),
            "--config".as_ref(),
            config.as_os_str(),
            "--no-pdf".as_ref(),
        ],
        dir.path(),
    );
    assert!(!result.status.success());
    assert!(String::from_utf8_lossy(&result.stderr).contains("deckscribe:"));
    assert!(!dir.path().join("out").exists());
}
