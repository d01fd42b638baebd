//! CLI integration tests using assert_cmd.

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn learnify() -> Command {
    #[allow(deprecated)]
    Command::cargo_bin("learnify").unwrap()
}

#[test]
fn init_creates_config() {
    let dir = TempDir::new().unwrap();

    learnify()
        .current_dir(dir.path())
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("Created learnify.toml"));

    assert!(dir.path().join("learnify.toml").exists());
}

#[test]
fn init_skips_existing() {
    let dir = TempDir::new().unwrap();

    learnify().current_dir(dir.path()).arg("init").assert().success();
    learnify()
        .current_dir(dir.path())
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("already exists"));
}

#[test]
fn learners_add_and_list_round_trip() {
    let dir = TempDir::new().unwrap();
    let store = dir.path().join("roster.json");

    learnify()
        .current_dir(dir.path())
        .args(["learners", "add", "--name", "Noa", "--grade", "2"])
        .arg("--store")
        .arg(&store)
        .assert()
        .success()
        .stdout(predicate::str::contains("Added Noa (grade 2)"));

    learnify()
        .current_dir(dir.path())
        .args(["learners", "list"])
        .arg("--store")
        .arg(&store)
        .assert()
        .success()
        .stdout(predicate::str::contains("Noa"))
        .stdout(predicate::str::contains("0%"));
}

#[test]
fn learners_add_rejects_bad_grade() {
    let dir = TempDir::new().unwrap();
    let store = dir.path().join("roster.json");

    learnify()
        .current_dir(dir.path())
        .args(["learners", "add", "--name", "Noa", "--grade", "9"])
        .arg("--store")
        .arg(&store)
        .assert()
        .failure()
        .stderr(predicate::str::contains("grade"));
}

#[test]
fn learners_add_rejects_duplicates() {
    let dir = TempDir::new().unwrap();
    let store = dir.path().join("roster.json");

    learnify()
        .current_dir(dir.path())
        .args(["learners", "add", "--name", "Noa", "--grade", "2"])
        .arg("--store")
        .arg(&store)
        .assert()
        .success();

    learnify()
        .current_dir(dir.path())
        .args(["learners", "add", "--name", "noa", "--grade", "3"])
        .arg("--store")
        .arg(&store)
        .assert()
        .failure()
        .stderr(predicate::str::contains("already exists"));
}

#[test]
fn practice_requires_api_key() {
    let dir = TempDir::new().unwrap();
    let store = dir.path().join("roster.json");

    learnify()
        .current_dir(dir.path())
        .env_remove("LEARNIFY_API_KEY")
        .args([
            "practice", "--learner", "Noa", "--subject", "math", "--category", "addition",
        ])
        .arg("--store")
        .arg(&store)
        .assert()
        .failure()
        .stderr(predicate::str::contains("no API key configured"));
}

#[test]
fn practice_requires_known_learner() {
    let dir = TempDir::new().unwrap();
    let store = dir.path().join("roster.json");

    learnify()
        .current_dir(dir.path())
        .env("LEARNIFY_API_KEY", "test-key")
        .args([
            "practice", "--learner", "Ghost", "--subject", "math", "--category", "addition",
        ])
        .arg("--store")
        .arg(&store)
        .assert()
        .failure()
        .stderr(predicate::str::contains("no learner named Ghost"));
}

#[test]
fn practice_requires_category_for_math() {
    let dir = TempDir::new().unwrap();
    let store = dir.path().join("roster.json");

    learnify()
        .current_dir(dir.path())
        .env("LEARNIFY_API_KEY", "test-key")
        .args(["practice", "--learner", "Noa", "--subject", "math"])
        .arg("--store")
        .arg(&store)
        .assert()
        .failure()
        .stderr(predicate::str::contains("--category is required"));
}
