//! Copying permalinks to the clipboard.

use std::env;
use std::io::Write;
use std::process::{Command, Stdio};

use anyhow::{Context, Result, anyhow};
use tracing::debug;

type CopyTool = &'static [&'static str];

const MACOS_TOOLS: &[CopyTool] = &[&["pbcopy"]];
const UNIX_TOOLS: &[CopyTool] = &[
    &["wl-copy"],
    &["xclip", "-selection", "clipboard"],
    &["xsel", "--clipboard", "--input"],
];
const WINDOWS_TOOLS: &[CopyTool] = &[&["clip.exe"]];

/// Something that can put a URL where the user can paste it.
pub trait UrlCopier {
    fn copy_url(&self, url: &str) -> Result<()>;
}

/// Desktop clipboard.
///
/// Command-line tools are tried before `arboard`: an `arboard` selection on
/// X11 and Wayland is dropped as soon as this process exits.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClipboard;

impl UrlCopier for SystemClipboard {
    fn copy_url(&self, url: &str) -> Result<()> {
        for &tool in copy_tools_for(env::consts::OS) {
            match pipe_to(tool, url) {
                Ok(()) => return Ok(()),
                Err(err) => debug!(tool = tool[0], error = %err, "clipboard tool failed"),
            }
        }

        arboard::Clipboard::new()
            .and_then(|mut clipboard| clipboard.set_text(url.to_owned()))
            .map_err(|err| anyhow!("no clipboard backend accepted the URL: {err}"))
    }
}

/// Clipboard tools to try, in order, for a `std::env::consts::OS` value.
fn copy_tools_for(os: &str) -> &'static [CopyTool] {
    match os {
        "macos" => MACOS_TOOLS,
        "windows" => WINDOWS_TOOLS,
        "linux" | "freebsd" | "openbsd" | "netbsd" | "dragonfly" | "solaris" | "illumos" => {
            UNIX_TOOLS
        }
        _ => &[],
    }
}

/// Run `tool` with `text` on its stdin.
fn pipe_to(tool: &[&str], text: &str) -> Result<()> {
    let (program, args) = tool.split_first().context("clipboard tool missing program")?;

    let mut child = Command::new(program)
        .args(args)
        .stdin(Stdio::piped())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()
        .with_context(|| format!("failed to spawn {program}"))?;

    // Dropping stdin closes the pipe so the tool sees EOF.
    if let Some(mut stdin) = child.stdin.take() {
        stdin
            .write_all(text.as_bytes())
            .with_context(|| format!("failed to write to {program}"))?;
    }

    let status = child.wait()?;
    if status.success() {
        Ok(())
    } else {
        Err(anyhow!("{program} exited with status {status}"))
    }
}
