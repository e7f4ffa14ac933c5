use std::fs;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn workspace() -> TempDir {
    let dir = tempfile::tempdir().expect("temp dir");
    fs::create_dir_all(dir.path().join(".git")).unwrap();
    fs::create_dir_all(dir.path().join("src")).unwrap();
    fs::write(dir.path().join("src/main.rs"), "a\nb\nc\n").unwrap();
    dir
}

fn embedcode(dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("embedcode").expect("binary exists");
    cmd.current_dir(dir.path())
        .env_remove("EMBEDCODE_ROOT")
        .env_remove("EMBEDCODE_LANGUAGES")
        .arg("--root")
        .arg(dir.path());
    cmd
}

#[test]
fn help_displays_usage() {
    Command::cargo_bin("embedcode")
        .expect("binary exists")
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Usage"));
}

#[test]
fn lines_prints_canonical_form() {
    let dir = workspace();
    embedcode(&dir)
        .args(["lines", "5,3-4,4"])
        .assert()
        .success()
        .stdout("3-5\n3 4 5\n");
}

#[test]
fn lines_rejects_inverted_range() {
    let dir = workspace();
    embedcode(&dir)
        .args(["lines", "5-2"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid line range '5-2'"));
}

#[test]
fn snippet_prints_fenced_block() {
    let dir = workspace();
    embedcode(&dir)
        .args(["--template", "plain", "snippet", "vault://src/main.rs", "--lines", "2"])
        .assert()
        .success()
        .stdout("**vault://src/main.rs**\n\n```text\nb\n```\n");
}

#[test]
fn snippet_json_carries_title_and_text() {
    let dir = workspace();
    embedcode(&dir)
        .args([
            "snippet",
            "vault://src/main.rs",
            "--lines",
            "1,3",
            "--title",
            "main",
            "--lang",
            "rust",
            "--json",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains(r#""text": "a\nc""#))
        .stdout(predicate::str::contains(r#""title": "main""#));
}

#[test]
fn snippet_reports_missing_source() {
    let dir = workspace();
    embedcode(&dir)
        .args(["snippet", "vault://src/nope.rs"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("couldn't read file 'src/nope.rs'"));
}

#[test]
fn render_writes_output_file() {
    let dir = workspace();
    fs::write(
        dir.path().join("doc.md"),
        "# Doc\n\n```embed-rust\nPATH: vault://src/main.rs\nLINES: 2-3\n```\n",
    )
    .unwrap();

    embedcode(&dir)
        .args(["render", "doc.md", "--output", "out/doc.md"])
        .assert()
        .success();

    let rendered = fs::read_to_string(dir.path().join("out/doc.md")).unwrap();
    assert!(rendered.contains("```rust\nb\nc\n```"));
    assert!(rendered.contains(">vault://src/main.rs</pre>"));
}

#[test]
fn render_reads_stdin() {
    let dir = workspace();
    embedcode(&dir)
        .args(["render", "-"])
        .write_stdin("```embed-rust\nLINES: 1\n```\n")
        .assert()
        .success()
        .stdout("`ERROR: invalid source path`\n");
}
