//! Git integration: work tree discovery, remote lookup, and branch detection.

use std::path::{Path, PathBuf};
use std::process::Command;

use anyhow::{Context, Result, anyhow};
use tracing::debug;

use crate::domain::model::RemoteInfo;
use crate::domain::remote::parse_remote_url;

/// Runs a git subcommand in a directory and returns its trimmed stdout.
pub trait GitCommand {
    fn run(&self, dir: &Path, args: &[&str]) -> Result<String>;
}

/// Spawns the `git` binary found on `PATH`.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemGit;

impl GitCommand for SystemGit {
    fn run(&self, dir: &Path, args: &[&str]) -> Result<String> {
        debug!(dir = %dir.display(), ?args, "running git");
        let output = Command::new("git")
            .args(args)
            .current_dir(dir)
            .output()
            .with_context(|| format!("failed to spawn git {}", args.join(" ")))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(anyhow!(
                "git {} exited with {}: {}",
                args.join(" "),
                output.status,
                stderr.trim()
            ));
        }

        Ok(String::from_utf8_lossy(&output.stdout).trim().to_owned())
    }
}

/// Git queries needed to build a permalink.
#[derive(Debug, Default, Clone)]
pub struct GitClient<G = SystemGit> {
    runner: G,
}

impl GitClient<SystemGit> {
    pub fn new() -> Self {
        Self::default()
    }
}

impl<G: GitCommand> GitClient<G> {
    pub fn with_runner(runner: G) -> Self {
        Self { runner }
    }

    /// Raw URL of `remote` as configured in the repository at `dir`.
    pub fn remote_url(&self, dir: &Path, remote: &str) -> Result<String> {
        self.runner.run(dir, &["remote", "get-url", remote])
    }

    /// Parsed remote, or `None` when the remote is missing or its URL has an
    /// unsupported shape.
    pub fn remote_info(&self, dir: &Path, remote: &str) -> Option<RemoteInfo> {
        let url = match self.remote_url(dir, remote) {
            Ok(url) => url,
            Err(err) => {
                debug!(remote, error = %err, "unable to read remote URL");
                return None;
            }
        };

        let info = parse_remote_url(&url);
        if info.is_none() {
            debug!(remote, url = %url, "remote URL has an unsupported shape");
        }
        info
    }

    /// Checked-out branch, falling back to `HEAD`'s abbreviated ref and then
    /// to `default_branch`. Never fails.
    pub fn current_branch(&self, dir: &Path, default_branch: &str) -> String {
        let queries: [&[&str]; 2] = [
            &["branch", "--show-current"],
            &["rev-parse", "--abbrev-ref", "HEAD"],
        ];

        for args in queries {
            match self.runner.run(dir, args) {
                Ok(branch) if !branch.is_empty() => return branch,
                Ok(_) => debug!(?args, "branch query returned nothing"),
                Err(err) => {
                    debug!(error = %err, "branch detection failed");
                    break;
                }
            }
        }

        debug!(default_branch, "using configured default branch");
        default_branch.to_owned()
    }
}

/// Root of the work tree containing `path`, if any.
pub fn discover_work_dir(path: &Path) -> Option<PathBuf> {
    let start = if path.is_dir() { path } else { path.parent()? };
    let repo = gix::discover(start).ok()?;
    let root = repo
        .work_dir()
        .map(Path::to_path_buf)
        .or_else(|| repo.path().parent().map(Path::to_path_buf))?;
    Some(canonical_or_self(&root))
}

fn canonical_or_self(path: &Path) -> PathBuf {
    path.canonicalize().unwrap_or_else(|_| path.to_path_buf())
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::collections::VecDeque;

    use super::*;

    /// Replays canned responses in order and records the commands it saw.
    #[derive(Default)]
    struct ScriptedGit {
        responses: RefCell<VecDeque<Result<String>>>,
        calls: RefCell<Vec<String>>,
    }

    impl ScriptedGit {
        fn new(responses: Vec<Result<String>>) -> Self {
            Self {
                responses: RefCell::new(responses.into()),
                calls: RefCell::default(),
            }
        }
    }

    impl GitCommand for &ScriptedGit {
        fn run(&self, _dir: &Path, args: &[&str]) -> Result<String> {
            self.calls.borrow_mut().push(args.join(" "));
            self.responses
                .borrow_mut()
                .pop_front()
                .unwrap_or_else(|| Err(anyhow!("unexpected git call")))
        }
    }

    fn ok(value: &str) -> Result<String> {
        Ok(value.to_owned())
    }

    #[test]
    fn branch_from_show_current() {
        let git = ScriptedGit::new(vec![ok("feature/login")]);
        let client = GitClient::with_runner(&git);
        assert_eq!(client.current_branch(Path::new("."), "main"), "feature/login");
        assert_eq!(*git.calls.borrow(), vec!["branch --show-current"]);
    }

    #[test]
    fn branch_falls_back_to_rev_parse() {
        let git = ScriptedGit::new(vec![ok(""), ok("HEAD")]);
        let client = GitClient::with_runner(&git);
        assert_eq!(client.current_branch(Path::new("."), "main"), "HEAD");
        assert_eq!(
            *git.calls.borrow(),
            vec!["branch --show-current", "rev-parse --abbrev-ref HEAD"]
        );
    }

    #[test]
    fn branch_uses_default_when_both_queries_are_empty() {
        let git = ScriptedGit::new(vec![ok(""), ok("")]);
        let client = GitClient::with_runner(&git);
        assert_eq!(client.current_branch(Path::new("."), "develop"), "develop");
    }

    #[test]
    fn branch_uses_default_when_git_fails() {
        let git = ScriptedGit::new(vec![Err(anyhow!("git not found"))]);
        let client = GitClient::with_runner(&git);
        assert_eq!(client.current_branch(Path::new("."), "main"), "main");
        assert_eq!(git.calls.borrow().len(), 1);
    }

    #[test]
    fn remote_info_parses_origin() {
        let git = ScriptedGit::new(vec![ok("git@github.com:microsoft/vscode.git")]);
        let client = GitClient::with_runner(&git);
        let info = client.remote_info(Path::new("."), "origin").unwrap();
        assert_eq!(info, RemoteInfo::new("github.com", "microsoft", "vscode"));
        assert_eq!(*git.calls.borrow(), vec!["remote get-url origin"]);
    }

    #[test]
    fn remote_info_is_none_for_missing_or_odd_remote() {
        let git = ScriptedGit::new(vec![Err(anyhow!("no such remote")), ok("/srv/git/repo")]);
        let client = GitClient::with_runner(&git);
        assert!(client.remote_info(Path::new("."), "upstream").is_none());
        assert!(client.remote_info(Path::new("."), "origin").is_none());
    }

    #[test]
    fn discover_outside_repository_is_none() -> Result<()> {
        let temp = tempfile::tempdir()?;
        // A tempdir may itself live inside a checkout on some CI hosts.
        if gix::discover(temp.path()).is_err() {
            assert!(discover_work_dir(temp.path()).is_none());
        }
        Ok(())
    }
}
