//! End-to-end runs against a scratch git repository.

use std::fs;
use std::path::Path;
use std::process::Command as StdCommand;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn git_available() -> bool {
    StdCommand::new("git")
        .arg("--version")
        .output()
        .map(|output| output.status.success())
        .unwrap_or(false)
}

fn git(dir: &Path, args: &[&str]) {
    let status = StdCommand::new("git")
        .args(args)
        .current_dir(dir)
        .status()
        .expect("spawn git");
    assert!(status.success(), "git {args:?} failed");
}

/// Repository on an unborn `trunk` branch with `origin` pointing at `remote`.
fn scratch_repo(remote: &str) -> TempDir {
    let temp = tempfile::tempdir().unwrap();
    let root = temp.path();
    git(root, &["init", "--quiet"]);
    git(root, &["symbolic-ref", "HEAD", "refs/heads/trunk"]);
    git(root, &["remote", "add", "origin", remote]);
    fs::create_dir_all(root.join("src")).unwrap();
    fs::write(root.join("src/lib.rs"), "pub fn answer() -> u32 {\n    42\n}\n").unwrap();
    temp
}

fn gitlink(repo: &Path) -> Command {
    let mut cmd = Command::cargo_bin("gitlink").expect("binary exists");
    cmd.current_dir(repo)
        .env("XDG_CONFIG_HOME", repo.join(".scratch-config"))
        .env_remove("GITLINK_DEFAULT_BRANCH")
        .env_remove("GITLINK_REMOTE");
    cmd
}

#[test]
fn selection_on_nested_gitlab_group() {
    if !git_available() {
        eprintln!("skipping: git not available");
        return;
    }
    let repo = scratch_repo("git@gitlab.com:group/sub/proj.git");

    gitlink(repo.path())
        .args(["selection", "src/lib.rs", "--lines", "1-3", "--print"])
        .assert()
        .success()
        .stdout("https://gitlab.com/group/sub/proj/-/blob/trunk/src/lib.rs#L1-3\n");
}

#[test]
fn file_from_subdirectory_with_branch_override() {
    if !git_available() {
        eprintln!("skipping: git not available");
        return;
    }
    let repo = scratch_repo("https://github.com/microsoft/vscode.git");

    gitlink(&repo.path().join("src"))
        .args(["file", "lib.rs", "--branch", "release/1.0", "--print"])
        .assert()
        .success()
        .stdout("https://github.com/microsoft/vscode/blob/release/1.0/src/lib.rs#L1-L1\n");
}

#[test]
fn workspace_config_adds_self_hosted_provider() {
    if !git_available() {
        eprintln!("skipping: git not available");
        return;
    }
    let repo = scratch_repo("ssh://git@git.example.com/platform/api.git");
    fs::create_dir_all(repo.path().join(".gitlink")).unwrap();
    fs::write(
        repo.path().join(".gitlink/config.toml"),
        r#"
[[custom_providers]]
name = "Gitea"
domain = "git.example.com"
url_template = "https://{domain}/{owner}/{repo}/src/branch/{branch}/{filePath}#L{startLine}-L{endLine}"
"#,
    )
    .unwrap();

    gitlink(repo.path())
        .args(["selection", "src/lib.rs", "-l", "2", "--print"])
        .assert()
        .success()
        .stdout("https://git.example.com/platform/api/src/branch/trunk/src/lib.rs#L2-L2\n");
}

#[test]
fn unknown_host_without_provider_fails() {
    if !git_available() {
        eprintln!("skipping: git not available");
        return;
    }
    let repo = scratch_repo("https://git.example.com/platform/api.git");

    gitlink(repo.path())
        .args(["file", "src/lib.rs", "--print"])
        .assert()
        .failure()
        .stderr(predicate::str::contains(
            "Unsupported Git provider: git.example.com",
        ));
}

#[test]
fn missing_remote_fails() {
    if !git_available() {
        eprintln!("skipping: git not available");
        return;
    }
    let repo = scratch_repo("git@github.com:o/r.git");

    gitlink(repo.path())
        .args(["file", "src/lib.rs", "--remote", "upstream", "--print"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unable to determine remote URL"));
}
