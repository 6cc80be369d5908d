//! End-to-end CLI workflows.
//!
//! Each test runs the `scope42` binary as a subprocess in an isolated temp
//! directory, with the user config directory pointed at an empty location.

use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::Value;
use std::path::Path;
use tempfile::TempDir;

// ---------------------------------------------------------------------------
// Test Harness
// ---------------------------------------------------------------------------

struct Env {
    workspace: TempDir,
    config_home: TempDir,
}

impl Env {
    fn new() -> Self {
        Self {
            workspace: TempDir::new().expect("temp workspace"),
            config_home: TempDir::new().expect("temp config home"),
        }
    }

    fn root(&self) -> &Path {
        self.workspace.path()
    }

    fn cmd(&self) -> Command {
        self.cmd_in(self.root())
    }

    fn cmd_in(&self, dir: &Path) -> Command {
        let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("scope42"));
        cmd.current_dir(dir);
        cmd.env("SCOPE42_LOG", "error");
        cmd.env("SCOPE42_AUTHOR", "Test Author");
        cmd.env("XDG_CONFIG_HOME", self.config_home.path());
        cmd.env_remove("FORMAT");
        cmd
    }

    fn init(&self) {
        self.cmd().arg("init").assert().success();
    }

    fn json(&self, args: &[&str]) -> Value {
        let output = self
            .cmd()
            .args(args)
            .arg("--json")
            .output()
            .expect("command should not crash");
        assert!(
            output.status.success(),
            "{args:?} failed: {}",
            String::from_utf8_lossy(&output.stderr)
        );
        serde_json::from_slice(&output.stdout).expect("valid JSON on stdout")
    }

    fn create(&self, kind: &str, title: &str, extra: &[&str]) -> String {
        let mut args = vec!["create", kind, "--title", title];
        args.extend_from_slice(extra);
        let json = self.json(&args);
        json["id"].as_str().expect("id field").to_string()
    }
}

fn demo() -> (Env, Command) {
    let env = Env::new();
    let mut cmd = env.cmd();
    cmd.arg("--demo");
    (env, cmd)
}

// ---------------------------------------------------------------------------
// Workspace
// ---------------------------------------------------------------------------

#[test]
fn init_creates_config_and_readme() {
    let env = Env::new();
    env.init();

    assert!(env.root().join("scope42.yml").is_file());
    let readme = std::fs::read_to_string(env.root().join("README.md")).expect("readme");
    assert!(!readme.trim().is_empty());
}

#[test]
fn init_refuses_existing_workspace_without_force() {
    let env = Env::new();
    env.init();

    env.cmd()
        .args(["init", "--format", "text"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("E1004"))
        .stderr(predicate::str::contains("--force"));

    env.cmd().args(["init", "--force"]).assert().success();
}

#[test]
fn commands_outside_a_workspace_fail_with_code() {
    let env = Env::new();
    env.cmd()
        .args(["list", "--format", "text"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("E1001"))
        .stderr(predicate::str::contains("scope42 init"));
}

#[test]
fn workspace_is_found_from_a_subdirectory() {
    let env = Env::new();
    env.init();
    env.create("issue", "Slow checkout", &[]);

    let nested = env.root().join("docs/adr");
    std::fs::create_dir_all(&nested).expect("mkdir");
    env.cmd_in(&nested)
        .args(["list", "--format", "text"])
        .assert()
        .success()
        .stdout(predicate::str::contains("issue-1\tcurrent\tSlow checkout"));
}

#[test]
fn explicit_workspace_flag() {
    let env = Env::new();
    let target = env.root().join("arch");
    env.cmd()
        .args(["init", "arch"])
        .assert()
        .success();
    env.cmd()
        .args(["--workspace", "arch", "create", "risk", "--title", "Single region"])
        .assert()
        .success();
    assert!(target.join("items/risks/risk-1.yml").is_file());
}

// ---------------------------------------------------------------------------
// Items
// ---------------------------------------------------------------------------

#[test]
fn create_assigns_serials_per_kind_and_writes_files() {
    let env = Env::new();
    env.init();

    assert_eq!(env.create("issue", "Slow checkout", &[]), "issue-1");
    assert_eq!(env.create("issue", "No integration tests", &[]), "issue-2");
    assert_eq!(env.create("risk", "Cart abandonment", &[]), "risk-1");

    let file = env.root().join("items/issues/issue-2.yml");
    let yaml = std::fs::read_to_string(file).expect("item file");
    assert!(yaml.contains("id: issue-2"));
    assert!(yaml.contains("type: issue"));
    assert!(yaml.contains("title: No integration tests"));
}

#[test]
fn link_and_show_report_both_directions() {
    let env = Env::new();
    env.init();
    env.create("issue", "Slow checkout", &[]);
    env.create("risk", "Cart abandonment", &[]);
    env.create("improvement", "Cache prices", &["--ref", "issue-1"]);

    let link = env.json(&["link", "issue-1", "risk-1"]);
    assert_eq!(link["relation"], "causes");

    let shown = env.json(&["show", "issue-1"]);
    assert_eq!(shown["outgoing"][0]["label"], "causes");
    assert_eq!(shown["outgoing"][0]["id"], "risk-1");
    assert_eq!(shown["incoming"][0]["label"], "solved by");
    assert_eq!(shown["incoming"][0]["id"], "improvement-1");

    let risk = env.json(&["show", "risk-1"]);
    assert_eq!(risk["incoming"][0]["label"], "caused by");
}

#[test]
fn link_rejects_unsupported_kind_pair() {
    let env = Env::new();
    env.init();
    env.create("decision", "Use PostgreSQL", &[]);
    env.create("issue", "Slow reports", &[]);

    env.cmd()
        .args(["link", "decision-1", "issue-1", "--format", "text"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("E2004"));
}

#[test]
fn create_with_missing_reference_fails() {
    let env = Env::new();
    env.init();

    env.cmd()
        .args(["create", "improvement", "--title", "Cache", "--ref", "issue-9", "--json"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("\"error_code\": \"E2001\""));
    assert!(!env.root().join("items/improvements/improvement-1.yml").exists());
}

#[test]
fn update_changes_status_and_tags() {
    let env = Env::new();
    env.init();
    env.create("issue", "Slow checkout", &["--tag", "performance"]);

    let updated = env.json(&[
        "update",
        "issue-1",
        "--status",
        "resolved",
        "--add-tag",
        "frontend",
    ]);
    assert_eq!(updated["status"], "resolved");
    assert_eq!(updated["tags"], serde_json::json!(["performance", "frontend"]));

    env.cmd()
        .args(["list", "--status", "resolved", "--format", "text"])
        .assert()
        .success()
        .stdout(predicate::str::contains("issue-1"));
    env.cmd()
        .args(["list", "--status", "current", "--format", "text"])
        .assert()
        .success()
        .stdout(predicate::str::is_empty());
}

#[test]
fn update_rejects_status_of_other_kind() {
    let env = Env::new();
    env.init();
    env.create("issue", "Slow checkout", &[]);

    env.cmd()
        .args(["update", "issue-1", "--status", "superseded", "--format", "text"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("E2005"));
}

#[test]
fn comments_record_author_and_feed_people() {
    let env = Env::new();
    env.init();
    env.create(
        "decision",
        "Store sessions in Redis",
        &["--decider", "Alice"],
    );

    let comment = env.json(&["comment", "decision-1", "Benchmarked failover"]);
    assert_eq!(comment["author"], "Test Author");
    assert_eq!(comment["comments"], 1);

    env.cmd()
        .args(["--author", "Bob", "comment", "decision-1", "Agreed"])
        .assert()
        .success();

    let people = env.json(&["people"]);
    assert_eq!(people, serde_json::json!(["Alice", "Bob", "Test Author"]));
}

#[test]
fn malformed_id_is_reported() {
    let env = Env::new();
    env.init();
    env.cmd()
        .args(["show", "bug-1", "--format", "text"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("E2002"));
}

#[test]
fn broken_item_file_fails_to_load() {
    let env = Env::new();
    env.init();
    env.create("risk", "Cart abandonment", &[]);
    std::fs::write(env.root().join("items/risks/risk-1.yml"), "id: [broken").expect("write");

    env.cmd()
        .args(["list", "--format", "text"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("E3001"))
        .stderr(predicate::str::contains("risk-1.yml"));
}

// ---------------------------------------------------------------------------
// Demo, graph, search
// ---------------------------------------------------------------------------

#[test]
fn demo_lists_decisions_as_text() {
    let (_env, mut cmd) = demo();
    cmd.args(["list", "--kind", "decision", "--format", "text"])
        .assert()
        .success()
        .stdout(predicate::str::contains("decision-1\tdeprecated"))
        .stdout(predicate::str::contains("decision-3\taccepted\tStore sessions in Redis"));
}

#[test]
fn demo_changes_are_not_persisted() {
    let (env, mut cmd) = demo();
    cmd.args(["create", "issue", "--title", "Temporary"])
        .assert()
        .success();
    assert!(!env.root().join("items").exists());

    env.cmd()
        .args(["--demo", "show", "issue-4", "--format", "text"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("E2001"));
}

#[test]
fn demo_tags_are_sorted_and_distinct() {
    let (_env, mut cmd) = demo();
    let output = cmd.args(["tags", "--json"]).output().expect("run");
    assert!(output.status.success());
    let tags: Vec<String> = serde_json::from_slice(&output.stdout).expect("json");
    let mut sorted = tags.clone();
    sorted.sort();
    sorted.dedup();
    assert_eq!(tags, sorted);
    assert!(tags.contains(&"scalability".to_string()));
}

#[test]
fn graph_json_with_related_items_and_positions() {
    let (_env, mut cmd) = demo();
    let output = cmd
        .args(["graph", "improvement-1", "--related", "--layout", "radial", "--json"])
        .output()
        .expect("run");
    assert!(output.status.success());
    let graph: Value = serde_json::from_slice(&output.stdout).expect("json");

    let nodes: Vec<&str> = graph["nodes"]
        .as_array()
        .expect("nodes")
        .iter()
        .filter_map(|n| n["id"].as_str())
        .collect();
    assert_eq!(
        nodes,
        [
            "improvement:improvement-1",
            "issue:issue-1",
            "risk:risk-1",
            "decision:decision-1"
        ]
    );
    assert_eq!(graph["edges"].as_array().expect("edges").len(), 4);

    let positions = graph["positions"].as_array().expect("positions");
    assert_eq!(positions.len(), nodes.len());
    assert_eq!(positions[0]["id"], "improvement:improvement-1");
    assert_eq!(positions[0]["x"], 0.0);
}

#[test]
fn graph_dot_output() {
    let (_env, mut cmd) = demo();
    cmd.args(["graph", "decision-3", "--related", "--dot"])
        .assert()
        .success()
        .stdout(predicate::str::starts_with("digraph {"))
        .stdout(predicate::str::contains("supersedes"));
}

#[test]
fn search_finds_demo_items_by_prefix() {
    let (_env, mut cmd) = demo();
    let output = cmd
        .args(["search", "sessi", "--json"])
        .output()
        .expect("run");
    assert!(output.status.success());
    let result: Value = serde_json::from_slice(&output.stdout).expect("json");
    let ids: Vec<&str> = result["hits"]
        .as_array()
        .expect("hits")
        .iter()
        .filter_map(|h| h["id"].as_str())
        .collect();
    assert!(ids.contains(&"decision-3"), "{ids:?}");
    assert!(ids.contains(&"issue-3"), "{ids:?}");
}

#[test]
fn search_respects_disabled_config() {
    let env = Env::new();
    env.init();
    std::fs::write(env.root().join("scope42.yml"), "search:\n  enabled: false\n").expect("write");

    env.cmd()
        .args(["search", "anything", "--format", "text"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("E6001"));
}

#[test]
fn completions_generate_for_bash() {
    let env = Env::new();
    env.cmd()
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("scope42"));
}
