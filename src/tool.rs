//! Running the external documentation tool in a package directory

use std::io;
use std::path::{Path, PathBuf};
use std::process::{Command, Output, Stdio};
use std::sync::mpsc;
use std::time::Duration;

use thiserror::Error;
use tracing::debug;

use crate::config::ToolConfig;

#[derive(Debug, Error)]
pub enum ToolError {
    #[error("failed to start `{command}` in {}: {source}", .dir.display())]
    Spawn {
        command: String,
        dir: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("`{command}` {} in {}", exit_description(.code), .dir.display())]
    Failed {
        command: String,
        dir: PathBuf,
        code: Option<i32>,
    },

    #[error("`{command}` timed out after {timeout:?} in {}", .dir.display())]
    TimedOut {
        command: String,
        dir: PathBuf,
        timeout: Duration,
    },

    #[error("failed waiting for `{command}` in {}: {source}", .dir.display())]
    Wait {
        command: String,
        dir: PathBuf,
        #[source]
        source: io::Error,
    },
}

fn exit_description(code: &Option<i32>) -> String {
    match code {
        Some(code) => format!("exited with status {}", code),
        None => "was terminated by a signal".to_string(),
    }
}

/// Produces the documentation text for one package directory.
pub trait Renderer {
    fn render(&self, dir: &Path) -> Result<Vec<u8>, ToolError>;

    /// Human-readable name of what runs, for logs.
    fn describe(&self) -> String;
}

/// Runs the configured program with `dir` as its working directory and
/// captures stdout. stderr is passed through to the user.
pub struct CommandRenderer {
    config: ToolConfig,
}

impl CommandRenderer {
    pub fn new(config: ToolConfig) -> Self {
        Self { config }
    }

    /// Whether the program can be started at all.
    pub fn is_available(&self) -> bool {
        Command::new(&self.config.program)
            .arg("--version")
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .is_ok()
    }

    fn command(&self, dir: &Path) -> Command {
        let mut cmd = Command::new(&self.config.program);
        cmd.args(&self.config.args)
            .current_dir(dir)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::inherit());

        // A timeout kills the whole group, so helpers the tool spawns
        // (`cargo` -> `cargo-readme`) go down with it. Without a timeout the
        // tool stays in our group and receives terminal signals as usual.
        #[cfg(unix)]
        if self.config.timeout_secs.is_some() {
            use std::os::unix::process::CommandExt;
            cmd.process_group(0);
        }
        cmd
    }
}

impl Renderer for CommandRenderer {
    fn render(&self, dir: &Path) -> Result<Vec<u8>, ToolError> {
        let command = self.describe();
        debug!("Running `{}` in {}", command, dir.display());

        let output = run_cmd(self.command(dir), self.config.timeout()).map_err(|e| match e {
            RunError::Spawn(source) => ToolError::Spawn {
                command: command.clone(),
                dir: dir.to_path_buf(),
                source,
            },
            RunError::Wait(source) => ToolError::Wait {
                command: command.clone(),
                dir: dir.to_path_buf(),
                source,
            },
            RunError::TimedOut(timeout) => ToolError::TimedOut {
                command: command.clone(),
                dir: dir.to_path_buf(),
                timeout,
            },
        })?;

        if !output.status.success() {
            return Err(ToolError::Failed {
                command,
                dir: dir.to_path_buf(),
                code: output.status.code(),
            });
        }

        debug!("`{}` produced {} bytes", command, output.stdout.len());
        Ok(output.stdout)
    }

    fn describe(&self) -> String {
        self.config.display_command()
    }
}

enum RunError {
    Spawn(io::Error),
    Wait(io::Error),
    TimedOut(Duration),
}

/// Kill the process tree rooted at `pid`. On Unix `pid` leads its own
/// process group, which receives SIGKILL.
#[cfg(unix)]
fn kill_process_tree(pid: u32) {
    let _ = Command::new("kill")
        .args(["-9", "--", &format!("-{}", pid)])
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status();
}

#[cfg(not(unix))]
fn kill_process_tree(pid: u32) {
    let _ = Command::new("taskkill")
        .args(["/F", "/T", "/PID", &pid.to_string()])
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status();
}

/// Spawn `cmd` and wait for it, killing the child if `timeout` expires first.
fn run_cmd(mut cmd: Command, timeout: Option<Duration>) -> Result<Output, RunError> {
    let child = cmd.spawn().map_err(RunError::Spawn)?;

    let Some(timeout) = timeout else {
        return child.wait_with_output().map_err(RunError::Wait);
    };

    let pid = child.id();
    let (sender, receiver) = mpsc::channel();
    std::thread::spawn(move || {
        let _ = sender.send(child.wait_with_output());
    });

    match receiver.recv_timeout(timeout) {
        Ok(result) => result.map_err(RunError::Wait),
        Err(_) => {
            kill_process_tree(pid);
            Err(RunError::TimedOut(timeout))
        }
    }
}
