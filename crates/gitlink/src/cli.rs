//! Command-line surface.

use std::env;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{ArgAction, Args, CommandFactory, Parser, Subcommand};
use clap_complete::Shell;

use crate::app::permalink::{Permalink, PermalinkOptions, PermalinkService, Workspace};
use crate::domain::model::LineRange;
use crate::domain::provider::ProviderSource;
use crate::infra::browser::{SystemBrowser, UrlOpener};
use crate::infra::clipboard::{SystemClipboard, UrlCopier};
use crate::infra::config::Config;
use crate::infra::{git, logging};

#[derive(Debug, Parser)]
#[command(
    name = "gitlink",
    author,
    version,
    about = "Open local files and line ranges on their Git hosting provider"
)]
pub struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,
    /// Extra config file layered over the global and workspace ones
    #[arg(long, value_name = "FILE", global = true)]
    pub config: Option<PathBuf>,
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Open a file in the browser
    File {
        #[command(flatten)]
        target: TargetArgs,
    },
    /// Open a line range of a file in the browser
    Selection {
        #[command(flatten)]
        target: TargetArgs,
        /// Line or inclusive range, 1-based: `12` or `12-30`
        #[arg(short, long, value_name = "N[-M]")]
        lines: LineRange,
    },
    /// List known hosting providers in lookup order
    Providers {
        /// Workspace whose `.gitlink/config.toml` should be included
        #[arg(long, value_name = "DIR")]
        workspace: Option<PathBuf>,
        /// Emit JSON instead of a table
        #[arg(long)]
        json: bool,
    },
    /// Generate shell completions
    Completions {
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Debug, Args)]
pub struct TargetArgs {
    /// File to link to
    pub path: Option<PathBuf>,
    /// Workspace root (defaults to the git work tree containing the file)
    #[arg(long, value_name = "DIR")]
    pub workspace: Option<PathBuf>,
    /// Remote to read the hosting URL from (defaults to config, then `origin`)
    #[arg(long)]
    pub remote: Option<String>,
    /// Branch to link to instead of the checked-out one
    #[arg(long)]
    pub branch: Option<String>,
    /// Print the URL without launching a browser
    #[arg(long)]
    pub print: bool,
    /// Print a JSON description of the permalink; implies --print
    #[arg(long)]
    pub json: bool,
    /// Copy the URL to the clipboard
    #[arg(long)]
    pub copy: bool,
}

/// Execute a parsed command line.
pub fn run(cli: Cli) -> Result<()> {
    logging::init(cli.verbose);
    let config_path = cli.config.as_deref();

    match cli.command {
        Commands::File { target } => open(target, LineRange::single(1), config_path)
            .context("failed to open in browser"),
        Commands::Selection { target, lines } => {
            open(target, lines, config_path).context("failed to open selection in browser")
        }
        Commands::Providers { workspace, json } => {
            list_providers(workspace.as_deref(), config_path, json)
        }
        Commands::Completions { shell } => {
            clap_complete::generate(shell, &mut Cli::command(), "gitlink", &mut io::stdout());
            Ok(())
        }
    }
}

fn open(target: TargetArgs, lines: LineRange, config_path: Option<&Path>) -> Result<()> {
    let workspace = Workspace::locate(target.path.as_deref(), target.workspace.as_deref())?;
    let config = Config::load(Some(workspace.root()), config_path)?;
    let options = PermalinkOptions {
        lines,
        remote: target.remote.clone(),
        branch: target.branch.clone(),
    };

    let link = PermalinkService::new().permalink(&workspace, &config, &options)?;
    deliver(
        &link,
        &target,
        &SystemBrowser,
        &SystemClipboard,
        &mut io::stdout(),
    )
}

fn deliver(
    link: &Permalink,
    target: &TargetArgs,
    opener: &dyn UrlOpener,
    copier: &dyn UrlCopier,
    out: &mut dyn Write,
) -> Result<()> {
    if target.json {
        writeln!(out, "{}", serde_json::to_string_pretty(link)?)?;
    } else {
        writeln!(out, "{}", link.url)?;
    }

    if target.copy {
        copier
            .copy_url(&link.url)
            .context("failed to copy URL to clipboard")?;
        eprintln!("Copied to clipboard");
    }

    if !(target.print || target.json) {
        opener.open(&link.url)?;
        eprintln!("Opened in browser: {}", link.url);
    }
    Ok(())
}

fn list_providers(workspace: Option<&Path>, config_path: Option<&Path>, json: bool) -> Result<()> {
    let workspace = match workspace {
        Some(dir) => Some(dir.to_path_buf()),
        None => env::current_dir()
            .ok()
            .and_then(|cwd| git::discover_work_dir(&cwd)),
    };
    let config = Config::load(workspace.as_deref(), config_path)?;
    let entries = config.provider_registry().providers();

    let mut stdout = io::stdout().lock();
    if json {
        writeln!(stdout, "{}", serde_json::to_string_pretty(&entries)?)?;
        return Ok(());
    }

    for entry in entries {
        let source = match entry.source {
            ProviderSource::Builtin => "built-in",
            ProviderSource::Custom => "custom",
        };
        let shadowed = if entry.shadowed { " (shadowed)" } else { "" };
        writeln!(
            stdout,
            "{:<14} {:<20} {source}{shadowed}\n    {}",
            entry.template.name, entry.template.domain, entry.template.url_template
        )?;
    }
    Ok(())
}
