//! Open a URL in the user's default browser.

use std::io;
use std::process::{Command, Stdio};
use tracing::debug;

/// Hand `url` to the platform's URL opener. Does not wait for the browser.
pub fn open(url: &str) -> io::Result<()> {
    let mut command = opener_command(url);
    debug!("launching {:?}", command);
    command
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()?;
    Ok(())
}

#[cfg(target_os = "macos")]
fn opener_command(url: &str) -> Command {
    let mut command = Command::new("open");
    command.arg(url);
    command
}

#[cfg(target_os = "windows")]
fn opener_command(url: &str) -> Command {
    let mut command = Command::new("cmd");
    command.args(["/C", "start", "", url]);
    command
}

#[cfg(not(any(target_os = "macos", target_os = "windows")))]
fn opener_command(url: &str) -> Command {
    let mut command = Command::new("xdg-open");
    command.arg(url);
    command
}
