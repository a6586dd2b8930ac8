//! Opening produced documents with the platform's default application.

use std::io;
use std::path::Path;
use std::process::{Command, Stdio};

use tracing::debug;

fn opener_command(path: &Path) -> Command {
    let target = path.as_os_str();
    if cfg!(target_os = "macos") {
        let mut cmd = Command::new("open");
        cmd.arg(target);
        cmd
    } else if cfg!(windows) {
        let mut cmd = Command::new("cmd");
        cmd.args(["/C", "start", ""]).arg(target);
        cmd
    } else {
        let mut cmd = Command::new("xdg-open");
        cmd.arg(target);
        cmd
    }
}

/// Hand `path` to the platform opener.
pub fn open_path(path: &Path) -> io::Result<()> {
    let path = path.canonicalize()?;
    let mut cmd = opener_command(&path);
    debug!("Opening {:?} with {:?}", path, cmd.get_program());

    let status = cmd
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()?;
    if status.success() {
        Ok(())
    } else {
        Err(io::Error::new(
            io::ErrorKind::Other,
            format!("{:?} exited with {}", cmd.get_program(), status),
        ))
    }
}
