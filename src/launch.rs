//! Hand-offs to the outside world: the file opener and child windows.

use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::{Child, Command, Stdio};

use crate::config::AppConfig;
use crate::error::{AppError, Result};

/// Message sent to the external opener for a non-directory entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OpenRequest {
    pub src: String,
    /// Destination port; empty lets the opener pick.
    pub dst: String,
    pub wdir: PathBuf,
    pub kind: String,
    pub data: Vec<u8>,
}

impl OpenRequest {
    pub fn for_path(src: &str, path: &Path) -> Self {
        Self {
            src: src.to_string(),
            dst: String::new(),
            wdir: PathBuf::from("/"),
            kind: "text".to_string(),
            data: path.to_string_lossy().into_owned().into_bytes(),
        }
    }

    /// Command-line arguments for `plumb`.
    pub fn to_args(&self) -> Vec<OsString> {
        vec![
            "-s".into(),
            self.src.clone().into(),
            "-d".into(),
            self.dst.clone().into(),
            "-w".into(),
            self.wdir.clone().into_os_string(),
            "-t".into(),
            self.kind.clone().into(),
            String::from_utf8_lossy(&self.data).into_owned().into(),
        ]
    }
}

/// Programs that can be started in a directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LaunchTarget {
    /// A shell window.
    Shell,
    /// Another instance of this explorer.
    Explorer,
}

impl LaunchTarget {
    /// Whether the program draws on the terminal it was started from.
    ///
    /// Such a program runs in the foreground while this one steps aside;
    /// the rest open their own window and run in the background.
    pub fn shares_terminal(self) -> bool {
        matches!(self, LaunchTarget::Explorer)
    }

    pub fn name(self) -> &'static str {
        match self {
            LaunchTarget::Shell => "win",
            LaunchTarget::Explorer => "dirfold",
        }
    }
}

/// Side effects that leave the process.
pub trait Launcher {
    /// Ask the external opener to show `path`.
    fn open(&mut self, path: &Path) -> Result<()>;

    /// Start `target` in the background with `cwd` as its working
    /// directory.
    fn spawn(&mut self, target: LaunchTarget, cwd: &Path) -> Result<()>;

    /// Run `target` in `cwd` on the current terminal and wait for it.
    fn run(&mut self, target: LaunchTarget, cwd: &Path) -> Result<()>;

    /// Collect background children that have exited.
    fn reap(&mut self) {}
}

/// The real launcher: `plumb` for files, child processes for windows.
#[derive(Debug)]
pub struct SystemLauncher {
    opener: String,
    source: String,
    win_command: Option<PathBuf>,
    children: Vec<Child>,
}

impl SystemLauncher {
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            opener: config.opener_command().to_string(),
            source: config.opener_source().to_string(),
            win_command: config.win_command(),
            children: Vec::new(),
        }
    }

    fn command(&self, target: LaunchTarget, cwd: &Path) -> Result<(PathBuf, Command)> {
        let program = self.program(target)?;
        let mut command = Command::new(&program);
        command.current_dir(cwd);
        Ok((program, command))
    }

    fn program(&self, target: LaunchTarget) -> Result<PathBuf> {
        match target {
            LaunchTarget::Shell => self
                .win_command
                .clone()
                .ok_or_else(|| AppError::Launch("no shell window command; set PLAN9".into())),
            LaunchTarget::Explorer => Ok(std::env::current_exe()?),
        }
    }
}

impl Launcher for SystemLauncher {
    fn open(&mut self, path: &Path) -> Result<()> {
        let request = OpenRequest::for_path(&self.source, path);
        let status = Command::new(&self.opener)
            .args(request.to_args())
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .map_err(|e| AppError::Open(format!("{}: {}", self.opener, e)))?;
        if !status.success() {
            return Err(AppError::Open(format!(
                "{} exited with {}",
                self.opener, status
            )));
        }
        Ok(())
    }

    fn spawn(&mut self, target: LaunchTarget, cwd: &Path) -> Result<()> {
        let (program, mut command) = self.command(target, cwd)?;
        log::info!("starting {} in {}", program.display(), cwd.display());
        let child = command
            .stdin(Stdio::inherit())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .spawn()
            .map_err(|e| AppError::Launch(format!("{}: {}", program.display(), e)))?;
        self.children.push(child);
        Ok(())
    }

    fn run(&mut self, target: LaunchTarget, cwd: &Path) -> Result<()> {
        let (program, mut command) = self.command(target, cwd)?;
        log::info!("running {} in {}", program.display(), cwd.display());
        let status = command
            .status()
            .map_err(|e| AppError::Launch(format!("{}: {}", program.display(), e)))?;
        if !status.success() {
            return Err(AppError::Launch(format!(
                "{} exited with {}",
                program.display(),
                status
            )));
        }
        Ok(())
    }

    fn reap(&mut self) {
        self.children.retain_mut(|child| match child.try_wait() {
            Ok(Some(status)) => {
                log::debug!("child {} exited with {}", child.id(), status);
                false
            }
            Ok(None) => true,
            Err(e) => {
                log::warn!("waiting for child {}: {}", child.id(), e);
                false
            }
        });
    }
}

/// Launcher that records requests instead of acting on them.
#[cfg(test)]
#[derive(Debug, Default)]
pub struct RecordingLauncher {
    pub opened: Vec<PathBuf>,
    pub spawned: Vec<(LaunchTarget, PathBuf)>,
    pub ran: Vec<(LaunchTarget, PathBuf)>,
    pub reaped: usize,
}

#[cfg(test)]
impl Launcher for RecordingLauncher {
    fn open(&mut self, path: &Path) -> Result<()> {
        self.opened.push(path.to_path_buf());
        Ok(())
    }

    fn spawn(&mut self, target: LaunchTarget, cwd: &Path) -> Result<()> {
        self.spawned.push((target, cwd.to_path_buf()));
        Ok(())
    }

    fn run(&mut self, target: LaunchTarget, cwd: &Path) -> Result<()> {
        self.ran.push((target, cwd.to_path_buf()));
        Ok(())
    }

    fn reap(&mut self) {
        self.reaped += 1;
    }
}
