// tests/cli_exit.rs
// Drives the built binary offline and checks its exit status.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use tempfile::TempDir;

const LEXICON: &str = "good\t1.9\t0.9\t[2, 2, 1, 2, 2, 2, 2, 2, 2, 2]\n\
                       bad\t-2.5\t0.7\t[-3, -2, -3, -2, -3, -2, -3, -2, -3, -2]\n";

struct Workspace {
    dir: TempDir,
}

impl Workspace {
    fn new() -> Self {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("lexicon.txt"), LEXICON).unwrap();
        fs::write(
            dir.path().join("brands.json"),
            r#"{"cpu": ["AMD", "Intel"], "gpu": ["Nvidia"]}"#,
        )
        .unwrap();
        Self { dir }
    }

    fn path(&self, name: &str) -> PathBuf {
        self.dir.path().join(name)
    }

    fn fixture(&self, name: &str, json: &str) -> PathBuf {
        let p = self.path(name);
        fs::write(&p, json).unwrap();
        p
    }

    fn run(&self, brands: &Path, fixture: &Path) -> Output {
        Command::new(env!("CARGO_BIN_EXE_brand-sentiment-analyzer"))
            .current_dir(self.dir.path())
            .env("LEXICON_PATH", self.path("lexicon.txt"))
            .env("LEXICON_URL", "http://127.0.0.1:9/vader_lexicon.txt")
            .env("RUST_LOG", "off")
            .arg("--brands")
            .arg(brands)
            .arg("--fixture")
            .arg(fixture)
            .arg("--delay")
            .arg("0")
            .output()
            .unwrap()
    }
}

#[test]
fn mentions_found_exits_zero() {
    let ws = Workspace::new();
    let fixture = ws.fixture(
        "posts.json",
        r#"[{"id":"a","title":"AMD is good","comments":[{"body":"Intel is bad"}]}]"#,
    );

    let out = ws.run(&ws.path("brands.json"), &fixture);
    let stdout = String::from_utf8_lossy(&out.stdout);
    assert_eq!(out.status.code(), Some(0), "stdout: {stdout}");
    assert!(stdout.contains("Amd"));
    assert!(stdout.contains("Intel"));
}

#[test]
fn no_mentions_is_still_success() {
    let ws = Workspace::new();
    let fixture = ws.fixture(
        "none.json",
        r#"[{"id":"a","title":"Which case fans are quiet?","body":"Asking for a friend"}]"#,
    );

    let out = ws.run(&ws.path("brands.json"), &fixture);
    let stdout = String::from_utf8_lossy(&out.stdout);
    assert_eq!(out.status.code(), Some(0));
    assert!(stdout.contains("No brand mentions found"), "stdout: {stdout}");
}

#[test]
fn no_posts_exits_one() {
    let ws = Workspace::new();
    let fixture = ws.fixture("empty.json", "[]");

    let out = ws.run(&ws.path("brands.json"), &fixture);
    assert_eq!(out.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&out.stderr).contains("no posts found"));
}

#[test]
fn missing_catalog_exits_one() {
    let ws = Workspace::new();
    let fixture = ws.fixture("posts.json", r#"[{"id":"a","title":"AMD is good"}]"#);

    let out = ws.run(&ws.path("missing.json"), &fixture);
    assert_eq!(out.status.code(), Some(1));
    assert!(!String::from_utf8_lossy(&out.stdout).contains("RESULTS"));
}

#[test]
fn unavailable_lexicon_exits_one() {
    let ws = Workspace::new();
    fs::remove_file(ws.path("lexicon.txt")).unwrap();
    let fixture = ws.fixture("posts.json", r#"[{"id":"a","title":"AMD is good"}]"#);

    let out = ws.run(&ws.path("brands.json"), &fixture);
    assert_eq!(out.status.code(), Some(1));
    assert!(!ws.path("lexicon.txt").exists());
}
