use assert_cmd::Command;
use figure10::generator::KeywordBucket;
use figure10::models::{ProgressSnapshot, SessionResult};
use figure10::PracticeStore;
use tempfile::tempdir;

fn figure10(config_dir: &std::path::Path) -> Command {
    let mut cmd = Command::cargo_bin("figure10").unwrap();
    cmd.env_remove("GEMINI_API_KEY")
        .env("RUST_LOG", "off")
        .arg("--config")
        .arg(config_dir.join("config.json"));
    cmd
}

#[test]
fn generate_offline_keyword_text() {
    let dir = tempdir().unwrap();
    let output = figure10(dir.path())
        .args(["generate", "--prompt", "write me a poem"])
        .output()
        .unwrap();

    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).unwrap();
    assert_eq!(stdout.trim_end(), KeywordBucket::Poetry.reference_text());
}

#[test]
fn generate_with_seed_is_reproducible() {
    let dir = tempdir().unwrap();
    let run = || {
        let output = figure10(dir.path())
            .args(["generate", "--prompt", "Practice: cat, dog", "--seed", "9"])
            .output()
            .unwrap();
        assert!(output.status.success());
        String::from_utf8(output.stdout).unwrap()
    };

    let first = run();
    assert_eq!(first, run());
    assert!(first.matches("cat").count() >= 3);
}

#[test]
fn check_prints_snapshot_json() {
    let dir = tempdir().unwrap();
    let output = figure10(dir.path())
        .args(["check", "hello world", "helxo", "--elapsed", "5"])
        .output()
        .unwrap();

    assert!(output.status.success());
    let snapshot: ProgressSnapshot = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(snapshot.position, 5);
    assert_eq!(snapshot.error_count, 1);
    assert!((snapshot.current_wpm - 12.0).abs() < 1e-9);
}

#[test]
fn history_lists_stored_sessions_as_csv() {
    let dir = tempdir().unwrap();
    let db = dir.path().join("typing.db");
    {
        let store = PracticeStore::open(&db).unwrap();
        let text_id = store.save_text("abc", "Practice: abc").unwrap();
        store
            .save_result(&SessionResult {
                text_id,
                wpm: 33.0,
                accuracy: 100.0,
                error_count: 0,
                mismatches: vec![],
            })
            .unwrap();
    }

    let output = figure10(dir.path())
        .args(["history", "--csv", "--database"])
        .arg(&db)
        .output()
        .unwrap();

    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).unwrap();
    let mut lines = stdout.lines();
    assert_eq!(
        lines.next(),
        Some("id,text_id,wpm,accuracy,errors,completed_at,prompt")
    );
    let row = lines.next().unwrap();
    assert!(row.starts_with("1,1,33.0,100.0,0,"), "{row}");
    assert!(row.ends_with("Practice: abc"));
}

#[test]
fn history_on_empty_database() {
    let dir = tempdir().unwrap();
    figure10(dir.path())
        .args(["history", "--database"])
        .arg(dir.path().join("empty.db"))
        .assert()
        .success()
        .stdout("No sessions recorded yet.\n");
}
