//! Opening URLs with the platform's default handler.

use std::env;
use std::process::{Command, Stdio};

use anyhow::{Context, Result, anyhow};
use tracing::debug;

type Opener = &'static [&'static str];

const MACOS_OPENERS: &[Opener] = &[&["open"]];
const UNIX_OPENERS: &[Opener] = &[&["xdg-open"], &["gio", "open"]];
// `cmd /C start` would split provider URLs at `&`; rundll32 receives the URL as one argument.
const WINDOWS_OPENERS: &[Opener] = &[
    &["rundll32", "url.dll,FileProtocolHandler"],
    &["explorer"],
];

/// Something that can show a URL to the user.
pub trait UrlOpener {
    fn open(&self, url: &str) -> Result<()>;
}

/// Launches the desktop's default browser.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemBrowser;

impl UrlOpener for SystemBrowser {
    fn open(&self, url: &str) -> Result<()> {
        let mut last_error = None;
        for &opener in openers_for(env::consts::OS) {
            match launch(&opener_argv(opener, url)) {
                Ok(()) => return Ok(()),
                Err(err) => {
                    debug!(opener = opener[0], error = %err, "opener failed");
                    last_error = Some(err);
                }
            }
        }
        Err(last_error.unwrap_or_else(|| anyhow!("no URL opener available on this platform")))
    }
}

/// Opener commands to try, in order, for a `std::env::consts::OS` value.
fn openers_for(os: &str) -> &'static [Opener] {
    match os {
        "macos" | "ios" => MACOS_OPENERS,
        "windows" => WINDOWS_OPENERS,
        "linux" | "freebsd" | "openbsd" | "netbsd" | "dragonfly" | "solaris" | "illumos" => {
            UNIX_OPENERS
        }
        _ => &[],
    }
}

/// Full argv for one opener. The URL is always the last, unsplit argument.
fn opener_argv(opener: Opener, url: &str) -> Vec<String> {
    opener
        .iter()
        .map(|part| (*part).to_owned())
        .chain(std::iter::once(url.to_owned()))
        .collect()
}

fn launch(argv: &[String]) -> Result<()> {
    let (program, args) = argv.split_first().context("opener command missing program")?;

    let status = Command::new(program)
        .args(args)
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .with_context(|| format!("failed to spawn {program}"))?;

    if status.success() {
        Ok(())
    } else {
        Err(anyhow!("{program} exited with status {status}"))
    }
}
