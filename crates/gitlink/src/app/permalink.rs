//! Turning a file inside a workspace into a hosted permalink.

use std::fs;
use std::io;
use std::path::{Component, Path, PathBuf};

use anyhow::{Context, Result};
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, info};

use crate::domain::errors::DomainError;
use crate::domain::model::{LineRange, RemoteInfo};
use crate::domain::url::build_url;
use crate::infra::config::Config;
use crate::infra::git::{self, GitClient, GitCommand, SystemGit};

/// Failures reported to the user when no permalink can be produced.
#[derive(Debug, Error)]
pub enum PermalinkError {
    #[error("No file selected or active")]
    NoFileContext,
    #[error("File is not in a workspace: {}", path.display())]
    NotInWorkspace { path: PathBuf },
    #[error("Not a git repository or unable to determine remote URL (remote '{remote}')")]
    RemoteUnavailable { remote: String },
    #[error(transparent)]
    Domain(#[from] DomainError),
}

/// A file located inside a workspace root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Workspace {
    root: PathBuf,
    file: PathBuf,
}

impl Workspace {
    /// Resolve `file` against `root`, or against the git work tree containing
    /// `file` when no root is given.
    ///
    /// Directories on the way are resolved, but a symlinked file keeps its own
    /// name, since git tracks the link and not its target.
    pub fn locate(file: Option<&Path>, root: Option<&Path>) -> Result<Self> {
        let file = file.ok_or(PermalinkError::NoFileContext)?;
        let file = resolve_keeping_link(file)
            .with_context(|| format!("file not found: {}", file.display()))?;

        let root = match root {
            Some(root) => root
                .canonicalize()
                .with_context(|| format!("workspace not found: {}", root.display()))?,
            None => git::discover_work_dir(&file)
                .ok_or_else(|| PermalinkError::NotInWorkspace { path: file.clone() })?,
        };

        if !file.starts_with(&root) {
            return Err(PermalinkError::NotInWorkspace { path: file }.into());
        }

        debug!(root = %root.display(), file = %file.display(), "located workspace");
        Ok(Self { root, file })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Path of the file relative to the root, `/`-separated on every platform.
    pub fn relative_path(&self) -> String {
        relative_url_path(&self.root, &self.file).unwrap_or_default()
    }
}

/// Canonicalize the parent directory and re-attach the final component as-is.
fn resolve_keeping_link(path: &Path) -> io::Result<PathBuf> {
    fs::symlink_metadata(path)?;
    match (path.parent(), path.file_name()) {
        (Some(parent), Some(name)) => {
            let parent = if parent.as_os_str().is_empty() {
                Path::new(".")
            } else {
                parent
            };
            Ok(parent.canonicalize()?.join(name))
        }
        _ => path.canonicalize(),
    }
}

fn relative_url_path(root: &Path, file: &Path) -> Option<String> {
    let relative = file.strip_prefix(root).ok()?;
    let segments: Vec<_> = relative
        .components()
        .filter_map(|component| match component {
            Component::Normal(segment) => Some(segment.to_string_lossy()),
            _ => None,
        })
        .collect();
    Some(segments.join("/"))
}

/// Per-invocation overrides on top of configuration.
#[derive(Debug, Clone, Default)]
pub struct PermalinkOptions {
    pub lines: LineRange,
    pub remote: Option<String>,
    pub branch: Option<String>,
}

/// Everything that went into a generated URL.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Permalink {
    pub url: String,
    pub remote: RemoteInfo,
    pub branch: String,
    pub path: String,
    pub lines: LineRange,
}

/// Builds permalinks from git state and configuration.
#[derive(Debug, Default, Clone)]
pub struct PermalinkService<G = SystemGit> {
    git: GitClient<G>,
}

impl PermalinkService<SystemGit> {
    pub fn new() -> Self {
        Self::with_git(GitClient::new())
    }
}

impl<G: GitCommand> PermalinkService<G> {
    pub fn with_git(git: GitClient<G>) -> Self {
        Self { git }
    }

    pub fn permalink(
        &self,
        workspace: &Workspace,
        config: &Config,
        options: &PermalinkOptions,
    ) -> Result<Permalink, PermalinkError> {
        let remote_name = options
            .remote
            .as_deref()
            .unwrap_or(&config.defaults.remote);
        let remote = self
            .git
            .remote_info(workspace.root(), remote_name)
            .ok_or_else(|| PermalinkError::RemoteUnavailable {
                remote: remote_name.to_owned(),
            })?;

        let branch = match &options.branch {
            Some(branch) => branch.clone(),
            None => self
                .git
                .current_branch(workspace.root(), &config.defaults.default_branch),
        };

        let path = workspace.relative_path();
        let registry = config.provider_registry();
        let url = build_url(&registry, &remote, &path, &branch, options.lines)?;
        info!(%url, "built permalink");

        Ok(Permalink {
            url,
            remote,
            branch,
            path,
            lines: options.lines,
        })
    }
}
