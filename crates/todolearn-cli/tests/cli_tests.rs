//! CLI integration tests using assert_cmd.

use std::path::Path;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

/// A `todolearn` command isolated from the user's config and environment.
fn todolearn(dir: &Path) -> Command {
    #[allow(deprecated)]
    let mut cmd = Command::cargo_bin("todolearn").unwrap();
    cmd.current_dir(dir)
        .env("HOME", dir)
        .env_remove("TODOLEARN_DECK")
        .env_remove("TODOLEARN_MODES")
        .env_remove("RUST_LOG");
    cmd
}

fn init_dir() -> TempDir {
    let dir = TempDir::new().unwrap();
    todolearn(dir.path()).arg("init").assert().success();
    dir
}

fn read_deck(path: &Path) -> serde_json::Value {
    serde_json::from_str(&std::fs::read_to_string(path).unwrap()).unwrap()
}

#[test]
fn modes_lists_builtin_modes() {
    let dir = TempDir::new().unwrap();
    todolearn(dir.path())
        .arg("modes")
        .assert()
        .success()
        .stdout(predicate::str::contains("full-answer"));
}

#[test]
fn init_creates_files() {
    let dir = TempDir::new().unwrap();

    todolearn(dir.path())
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("Created todolearn.toml"))
        .stdout(predicate::str::contains("Created deck.json with 3 cards"));

    assert!(dir.path().join("todolearn.toml").exists());
    let deck = read_deck(&dir.path().join("deck.json"));
    assert_eq!(deck["cards"].as_array().unwrap().len(), 3);
    assert_eq!(deck["cards"][0]["question"], "card");
    assert_eq!(deck["cards"][0]["answer"], "die Karte");
}

#[test]
fn init_skips_existing() {
    let dir = init_dir();

    todolearn(dir.path())
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("already exists"));
}

#[test]
fn review_session_grades_and_saves() {
    let dir = init_dir();

    todolearn(dir.path())
        .arg("review")
        .write_stdin("die Karte\nlehren\nq\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Front: card"))
        .stdout(predicate::str::contains("🎉"))
        .stdout(predicate::str::contains("Front: learn"))
        .stdout(predicate::str::contains("❌ (Correct: lernen)"))
        .stdout(predicate::str::contains("Reviewed 2 card(s), 1 correct, 3 new."));

    let deck = read_deck(&dir.path().join("deck.json"));
    let mode_cards = deck["mode_cards"].as_array().unwrap();
    assert_eq!(mode_cards.len(), 3);
    assert!(mode_cards
        .iter()
        .all(|m| m["mode"] == "full-answer" && m["due"].is_string()));
}

#[test]
fn review_stops_at_end_of_input() {
    let dir = init_dir();

    todolearn(dir.path())
        .arg("review")
        .write_stdin("")
        .assert()
        .success()
        .stdout(predicate::str::contains("Front: card"))
        .stdout(predicate::str::contains("Reviewed 0 card(s)"));
}

#[test]
fn review_with_explicit_deck_path() {
    let dir = TempDir::new().unwrap();
    let cards = dir.path().join("cards.toml");
    std::fs::write(
        &cards,
        "[[cards]]\nquestion = \"correct\"\nanswer = \"richtig\"\n",
    )
    .unwrap();

    todolearn(dir.path())
        .args(["import", "--file", "cards.toml", "--deck", "decks/german.json"])
        .assert()
        .success();

    todolearn(dir.path())
        .args(["review", "--deck", "decks/german.json", "--modes", "full-answer"])
        .write_stdin("richtig\nq\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Front: correct"))
        .stdout(predicate::str::contains("Reviewed 1 card(s), 1 correct, 1 new."));
}

#[test]
fn review_with_unknown_mode_fails() {
    let dir = init_dir();

    todolearn(dir.path())
        .args(["review", "--modes", "cloze"])
        .write_stdin("q\n")
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown review mode: cloze"));
}

/// A deck with one new card and a mode card whose root card was deleted.
fn write_deck_with_orphan(dir: &Path) {
    let due = (chrono::Utc::now() + chrono::Duration::seconds(30)).to_rfc3339();
    let deck = serde_json::json!({
        "cards": [{ "id": "c1", "question": "card", "answer": "die Karte" }],
        "mode_cards": [{
            "id": "orphan",
            "mode": "full-answer",
            "related_to": "gone",
            "due": due,
            "progress": 0
        }]
    });
    std::fs::write(dir.join("deck.json"), deck.to_string()).unwrap();
}

#[test]
fn review_survives_mode_card_of_deleted_card() {
    let dir = TempDir::new().unwrap();
    write_deck_with_orphan(dir.path());

    todolearn(dir.path())
        .arg("review")
        .write_stdin("die Karte\nq\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("🎉"))
        .stdout(predicate::str::contains("Reviewed 1 card(s), 1 correct, 1 new."))
        .stderr(predicate::str::contains("todolearn validate"));

    let deck = read_deck(&dir.path().join("deck.json"));
    let mode_cards = deck["mode_cards"].as_array().unwrap();
    assert_eq!(mode_cards.len(), 2);
    assert!(mode_cards.iter().any(|m| m["related_to"] == "c1"));
}

#[test]
fn list_marks_mode_card_of_deleted_card() {
    let dir = TempDir::new().unwrap();
    write_deck_with_orphan(dir.path());

    todolearn(dir.path())
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("(missing card)"))
        .stdout(predicate::str::contains("1 unlearned card(s)"));
}

#[test]
fn import_adds_new_cards_only() {
    let dir = init_dir();
    std::fs::write(
        dir.path().join("more.toml"),
        r#"
[[cards]]
question = "card"
answer = "die Karte"

[[cards]]
question = "word"
answer = "das Wort"
priority = 5
"#,
    )
    .unwrap();

    todolearn(dir.path())
        .args(["import", "--file", "more.toml"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Imported 1 card(s)"))
        .stdout(predicate::str::contains("1 skipped"));

    // Higher priority is introduced first.
    todolearn(dir.path())
        .arg("review")
        .write_stdin("q\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Front: word"));
}

#[test]
fn import_malformed_file_fails() {
    let dir = init_dir();
    std::fs::write(dir.path().join("bad.toml"), "this is not [valid toml }{").unwrap();

    todolearn(dir.path())
        .args(["import", "--file", "bad.toml"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Error"));
}

#[test]
fn validate_fresh_deck() {
    let dir = init_dir();

    todolearn(dir.path())
        .arg("validate")
        .assert()
        .success()
        .stdout(predicate::str::contains("3 cards"))
        .stdout(predicate::str::contains("Deck valid."));
}

#[test]
fn validate_reports_unknown_modes() {
    let dir = TempDir::new().unwrap();
    std::fs::write(
        dir.path().join("deck.json"),
        r#"{
  "cards": [{ "id": "c1", "question": "card", "answer": "die Karte" }],
  "mode_cards": [{ "id": "m1", "mode": "cloze", "related_to": "c1", "due": null }]
}"#,
    )
    .unwrap();

    todolearn(dir.path())
        .arg("validate")
        .assert()
        .success()
        .stdout(predicate::str::contains("[m1] WARNING: unknown review mode: cloze"))
        .stdout(predicate::str::contains("1 warning(s) found."));
}

#[test]
fn validate_nonexistent_deck() {
    let dir = TempDir::new().unwrap();

    todolearn(dir.path())
        .args(["validate", "--deck", "nonexistent.json"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Error"));
}

#[test]
fn list_shows_scheduled_cards() {
    let dir = init_dir();

    todolearn(dir.path())
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("3 unlearned card(s)"));

    todolearn(dir.path())
        .arg("review")
        .write_stdin("die Karte\nq\n")
        .assert()
        .success();

    todolearn(dir.path())
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("full-answer"))
        .stdout(predicate::str::contains("die Karte").not())
        .stdout(predicate::str::contains("0 unlearned card(s)"));
}

#[test]
fn config_file_sets_quit_command() {
    let dir = init_dir();
    std::fs::write(dir.path().join("custom.toml"), "quit_command = \":q\"\n").unwrap();

    todolearn(dir.path())
        .args(["--config", "custom.toml", "review"])
        .write_stdin("q\n:q\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("❌ (Correct: die Karte)"))
        .stdout(predicate::str::contains("Reviewed 1 card(s), 0 correct"));
}

#[test]
fn missing_config_file_fails() {
    let dir = TempDir::new().unwrap();

    todolearn(dir.path())
        .args(["--config", "absent.toml", "modes"])
        .assert()
        .success();

    todolearn(dir.path())
        .args(["--config", "absent.toml", "list"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("config file not found"));
}
