#![cfg(unix)]
#![allow(deprecated)]
use assert_cmd::Command;
use predicates::prelude::*;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

const TEXT_DELTA: &str = r#"{"type":"stream_event","event":{"type":"content_block_delta","index":0,"delta":{"type":"text_delta","text":"working on task"}}}"#;

fn ukko(dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("ukko").unwrap();
    cmd.current_dir(dir.path())
        .env("UKKO_ROOT", dir.path())
        .env("NO_COLOR", "1")
        .env_remove("RUST_LOG");
    cmd
}

/// `ukko` with a fake `claude` first on PATH.
fn ukko_with_claude(dir: &TempDir) -> Command {
    let mut cmd = ukko(dir);
    let path = format!(
        "{}:{}",
        bin_dir(dir).display(),
        std::env::var("PATH").unwrap_or_default()
    );
    cmd.env("PATH", path);
    cmd
}

fn bin_dir(dir: &TempDir) -> PathBuf {
    dir.path().join("bin")
}

fn log_path(dir: &TempDir) -> PathBuf {
    dir.path().join("claude.log")
}

/// Install a fake `claude` that logs its arguments, one line per launch,
/// then runs `body`.
fn install_claude(dir: &TempDir, body: &str) {
    let bin = bin_dir(dir);
    std::fs::create_dir_all(&bin).unwrap();
    let script = format!(
        "#!/bin/sh\necho \"$@\" >> '{}'\n{body}\n",
        log_path(dir).display()
    );
    let exe = bin.join("claude");
    std::fs::write(&exe, script).unwrap();
    std::fs::set_permissions(&exe, std::fs::Permissions::from_mode(0o755)).unwrap();
}

fn launches(dir: &TempDir) -> Vec<String> {
    std::fs::read_to_string(log_path(dir))
        .map(|s| s.lines().map(str::to_string).collect())
        .unwrap_or_default()
}

fn init_project(dir: &TempDir, prd: &str) {
    std::fs::create_dir_all(dir.path().join(".ukko")).unwrap();
    std::fs::write(dir.path().join(".ukko/PRD.md"), prd).unwrap();
}

fn write(dir: &TempDir, rel: &str, content: &str) {
    let path = dir.path().join(rel);
    if let Some(parent) = Path::new(&path).parent() {
        std::fs::create_dir_all(parent).unwrap();
    }
    std::fs::write(path, content).unwrap();
}

// ---------------------------------------------------------------------------
// Setup checks
// ---------------------------------------------------------------------------

#[test]
fn missing_ukko_dir_exits_1() {
    let dir = TempDir::new().unwrap();
    for args in [vec!["status"], vec!["run"], vec!["plan"], vec![]] {
        ukko(&dir)
            .args(&args)
            .assert()
            .code(1)
            .stderr(predicate::str::contains("No .ukko directory found"));
    }
}

#[test]
fn missing_claude_exits_1_without_launching() {
    let dir = TempDir::new().unwrap();
    init_project(&dir, "- [ ] a\n");
    std::fs::create_dir_all(bin_dir(&dir)).unwrap();

    ukko(&dir)
        .env("PATH", bin_dir(&dir))
        .arg("run")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("'claude' command not found"));
}

// ---------------------------------------------------------------------------
// ukko status
// ---------------------------------------------------------------------------

#[test]
fn status_shows_progress_and_mode() {
    let dir = TempDir::new().unwrap();
    init_project(&dir, "- [x] a\n- [ ] b\n");
    write(&dir, ".ukko/config.yaml", "mode: testing\n");

    ukko(&dir)
        .arg("status")
        .assert()
        .success()
        .stdout(predicate::str::contains("Phase: EXECUTION"))
        .stdout(predicate::str::contains("Progress: 1/2 tasks complete"))
        .stdout(predicate::str::contains("Mode: testing"));
}

#[test]
fn status_reports_planning_and_conflict() {
    let dir = TempDir::new().unwrap();
    init_project(&dir, "");
    write(&dir, ".ukko/planning/planning-guide.md", "# guide\n");
    write(&dir, ".ukko/CONFLICT.md", "schema\n");

    ukko(&dir)
        .arg("status")
        .assert()
        .success()
        .stdout(predicate::str::contains("Phase: PLANNING"))
        .stdout(predicate::str::contains("CONFLICT: Review .ukko/CONFLICT.md"))
        .stdout(predicate::str::contains("Mode: auto"));
}

#[test]
fn status_json() {
    let dir = TempDir::new().unwrap();
    init_project(&dir, "- [x] a\n- [x] b\n");

    ukko(&dir)
        .args(["status", "--json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"phase\": \"execution\""))
        .stdout(predicate::str::contains("\"completed\": 2"))
        .stdout(predicate::str::contains("\"all_complete\": true"))
        .stdout(predicate::str::contains("\"conflict\": false"));
}

// ---------------------------------------------------------------------------
// ukko run
// ---------------------------------------------------------------------------

#[test]
fn run_streams_output_and_succeeds() {
    let dir = TempDir::new().unwrap();
    init_project(&dir, "- [ ] a\n");
    write(&dir, ".ukko/config.yaml", "ukko_model: \"opus\"\n");
    install_claude(&dir, &format!("echo '{TEXT_DELTA}'\nexit 0"));

    ukko_with_claude(&dir)
        .arg("run")
        .assert()
        .success()
        .stdout(predicate::str::contains("Starting Ukko generation..."))
        .stdout(predicate::str::contains("working on task"))
        .stdout(predicate::str::contains("Generation complete."));

    let launches = launches(&dir);
    assert_eq!(launches.len(), 1);
    assert!(launches[0].starts_with("--model opus --print"));
    assert!(launches[0].contains("--output-format stream-json"));
    assert!(launches[0].ends_with("You are Ukko. Read CLAUDE.md and proceed with your phase."));
}

#[test]
fn run_failure_exits_1_after_one_launch() {
    let dir = TempDir::new().unwrap();
    init_project(&dir, "- [ ] a\n");
    install_claude(&dir, "exit 1");

    ukko_with_claude(&dir)
        .arg("run")
        .assert()
        .code(1)
        .stdout(predicate::str::contains("Generation failed (exit code 1)."));

    assert_eq!(launches(&dir).len(), 1);
}

#[test]
fn run_refuses_while_conflict_is_pending() {
    let dir = TempDir::new().unwrap();
    init_project(&dir, "- [ ] a\n");
    write(&dir, ".ukko/CONFLICT.md", "disagreement on schema\n");
    install_claude(&dir, "exit 0");

    ukko_with_claude(&dir)
        .arg("run")
        .assert()
        .code(1)
        .stdout(predicate::str::contains("CONFLICT DETECTED"))
        .stdout(predicate::str::contains("disagreement on schema"));

    assert!(launches(&dir).is_empty());
}

#[test]
fn run_in_planning_phase_exits_1() {
    let dir = TempDir::new().unwrap();
    init_project(&dir, "");
    write(&dir, ".ukko/planning/planning-guide.md", "# guide\n");

    ukko(&dir)
        .arg("run")
        .assert()
        .code(1)
        .stdout(predicate::str::contains("Still in planning phase"));
}

// ---------------------------------------------------------------------------
// ukko (no command)
// ---------------------------------------------------------------------------

#[test]
fn auto_mode_pauses_on_conflict_before_launching() {
    let dir = TempDir::new().unwrap();
    init_project(&dir, "- [ ] a\n");
    write(&dir, ".ukko/CONFLICT.md", "disagreement on schema\n");
    install_claude(&dir, "exit 0");

    ukko_with_claude(&dir)
        .assert()
        .success()
        .stdout(predicate::str::contains("disagreement on schema"))
        .stdout(predicate::str::contains("Pausing for human review"));

    assert!(launches(&dir).is_empty());
}

#[test]
fn auto_mode_runs_until_all_tasks_complete() {
    let dir = TempDir::new().unwrap();
    init_project(&dir, "- [ ] a\n");
    install_claude(&dir, "printf -- '- [x] a\\n' > .ukko/PRD.md\nexit 0");

    ukko_with_claude(&dir)
        .assert()
        .success()
        .stdout(predicate::str::contains("Progress: 0/1"))
        .stdout(predicate::str::contains("All tasks complete! Exiting."));

    assert_eq!(launches(&dir).len(), 1);
}

#[test]
fn auto_mode_stops_on_failure() {
    let dir = TempDir::new().unwrap();
    init_project(&dir, "- [ ] a\n");
    install_claude(&dir, "exit 2");

    ukko_with_claude(&dir)
        .assert()
        .code(1)
        .stdout(predicate::str::contains("Stopping due to error"));

    assert_eq!(launches(&dir).len(), 1);
}

#[test]
fn testing_mode_shows_status_instead_of_running() {
    let dir = TempDir::new().unwrap();
    init_project(&dir, "- [ ] a\n");
    write(&dir, ".ukko/config.yaml", "mode: testing\n");
    install_claude(&dir, "exit 0");

    ukko_with_claude(&dir)
        .assert()
        .success()
        .stdout(predicate::str::contains("Testing mode"))
        .stdout(predicate::str::contains("Progress: 0/1 tasks complete"));

    assert!(launches(&dir).is_empty());
}

#[test]
fn planning_phase_without_command_is_a_no_op() {
    let dir = TempDir::new().unwrap();
    init_project(&dir, "");
    write(&dir, ".ukko/planning/planning-guide.md", "# guide\n");

    ukko(&dir)
        .assert()
        .success()
        .stdout(predicate::str::contains("Planning phase not complete."));
}

// ---------------------------------------------------------------------------
// ukko plan
// ---------------------------------------------------------------------------

#[test]
fn plan_launches_interactive_session() {
    let dir = TempDir::new().unwrap();
    init_project(&dir, "");
    write(&dir, ".ukko/planning/planning-guide.md", "# guide\n");
    install_claude(&dir, "exit 0");

    ukko_with_claude(&dir)
        .arg("plan")
        .assert()
        .success()
        .stdout(predicate::str::contains("Starting planning phase..."));

    assert_eq!(
        launches(&dir),
        vec!["You are the Planning Ukko. Read CLAUDE.md and begin planning.".to_string()]
    );
}

#[test]
fn plan_after_planning_is_a_no_op() {
    let dir = TempDir::new().unwrap();
    init_project(&dir, "- [ ] a\n");

    ukko(&dir)
        .arg("plan")
        .assert()
        .success()
        .stdout(predicate::str::contains("Planning already complete"));
}

#[test]
fn plan_interrupted_exits_130() {
    use std::process::Stdio;
    use std::time::{Duration, Instant};

    let dir = TempDir::new().unwrap();
    init_project(&dir, "");
    write(&dir, ".ukko/planning/planning-guide.md", "# guide\n");
    install_claude(&dir, "exec sleep 30");

    let path = format!(
        "{}:{}",
        bin_dir(&dir).display(),
        std::env::var("PATH").unwrap_or_default()
    );
    let mut child = std::process::Command::new(assert_cmd::cargo::cargo_bin("ukko"))
        .arg("plan")
        .current_dir(dir.path())
        .env("UKKO_ROOT", dir.path())
        .env("NO_COLOR", "1")
        .env("PATH", path)
        .env_remove("RUST_LOG")
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .spawn()
        .unwrap();

    let deadline = Instant::now() + Duration::from_secs(10);
    while launches(&dir).is_empty() {
        assert!(Instant::now() < deadline, "claude was never launched");
        std::thread::sleep(Duration::from_millis(50));
    }

    let sent = std::process::Command::new("kill")
        .args(["-INT", &child.id().to_string()])
        .status()
        .unwrap();
    assert!(sent.success());

    let deadline = Instant::now() + Duration::from_secs(15);
    let status = loop {
        if let Some(status) = child.try_wait().unwrap() {
            break status;
        }
        if Instant::now() > deadline {
            child.kill().unwrap();
            panic!("ukko plan kept running after SIGINT");
        }
        std::thread::sleep(Duration::from_millis(50));
    };
    assert_eq!(status.code(), Some(130));

    let output = child.wait_with_output().unwrap();
    assert!(String::from_utf8_lossy(&output.stdout).contains("Stopped by user."));
}

// ---------------------------------------------------------------------------
// ukko setup
// ---------------------------------------------------------------------------

const CLAUDE_MD: &str = "\
When uncertain, launch 3 parallel agents.
Target: 2-5 swarm launches per task.

Launch parallel agents when you encounter:
- Architecture choices

<parameter name=\"model\">[haiku|sonnet|opus]</parameter>
";

#[test]
fn setup_templates_claude_md() {
    let dir = TempDir::new().unwrap();
    write(
        &dir,
        ".ukko/config.yaml",
        "ukko_model: opus\nagents_per_swarm: 4\ndefault_agent_model: haiku\ndecision_triggers:\n  - \"naming\"\n  - api shape\n",
    );
    write(&dir, "CLAUDE.md", CLAUDE_MD);

    ukko(&dir)
        .arg("setup")
        .assert()
        .success()
        .stdout(predicate::str::contains("Decision triggers: 2 items"))
        .stdout(predicate::str::contains("Setup complete!"))
        .stdout(predicate::str::contains("Note: ukko will use --model opus"))
        .stdout(predicate::str::contains("A backup was saved to CLAUDE.md.bak"));

    let content = std::fs::read_to_string(dir.path().join("CLAUDE.md")).unwrap();
    assert!(content.contains("launch 4 parallel agents"));
    assert!(content.contains("- Naming\n- Api shape\n"));
    assert!(content.contains(r#"<parameter name="model">haiku</parameter>"#));
    assert_eq!(
        std::fs::read_to_string(dir.path().join("CLAUDE.md.bak")).unwrap(),
        CLAUDE_MD
    );
}

#[test]
fn setup_without_config_fails() {
    let dir = TempDir::new().unwrap();
    write(&dir, "CLAUDE.md", CLAUDE_MD);

    ukko(&dir)
        .arg("setup")
        .assert()
        .code(1)
        .stderr(predicate::str::contains(".ukko/config.yaml"));
}
