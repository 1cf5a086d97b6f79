//! Owns the collector child process and turns its pipes into a stream of events.
//!
//! There is no restart: once stdout and stderr both close the supervisor reaps the
//! child, reports `Exited` once, and yields nothing after that.

use std::{ffi::OsString, io, path::PathBuf, process::Stdio};

use tokio::io::{AsyncRead, AsyncReadExt};
use tokio::process::{Child, ChildStderr, ChildStdout, Command};
use tracing::{debug, info};

use crate::error::{PanelError, Result};
use crate::settings::Settings;

pub const PROMETHEUS_FLAG: &str = "--prometheus";
// One pipe read; records longer than this arrive split and are lost.
const CHUNK: usize = 64 * 1024;

/// `<program> <script> [--prometheus]`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollectorCommand {
    pub program: String,
    pub script: PathBuf,
    pub prometheus: bool,
}

impl CollectorCommand {
    pub fn from_settings(s: &Settings) -> Self {
        Self {
            program: s.python.clone(),
            script: s.script_path(),
            prometheus: s.enable_prometheus,
        }
    }

    pub fn args(&self) -> Vec<OsString> {
        let mut args = vec![self.script.clone().into_os_string()];
        if self.prometheus {
            args.push(PROMETHEUS_FLAG.into());
        }
        args
    }

    pub fn display(&self) -> String {
        let mut s = self.program.clone();
        for a in self.args() {
            s.push(' ');
            s.push_str(&a.to_string_lossy());
        }
        s
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CollectorEvent {
    Stdout(Vec<u8>),
    Stderr(Vec<u8>),
    /// Both pipes closed and the child was reaped. Exit code if it exited normally.
    Exited(Option<i32>),
}

pub struct Supervisor {
    child: Child,
    stdout: Option<ChildStdout>,
    stderr: Option<ChildStderr>,
    out_buf: Vec<u8>,
    err_buf: Vec<u8>,
    ended: bool,
}

// Reads from a pipe that may already be closed; a closed pipe never resolves.
async fn read_some<R: AsyncRead + Unpin>(pipe: &mut Option<R>, buf: &mut [u8]) -> io::Result<usize> {
    match pipe {
        Some(r) => r.read(buf).await,
        None => std::future::pending().await,
    }
}

enum Pipe {
    Out(io::Result<usize>),
    Err(io::Result<usize>),
}

impl Supervisor {
    pub fn start(cmd: &CollectorCommand) -> Result<Self> {
        let mut child = Command::new(&cmd.program)
            .args(cmd.args())
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|source| PanelError::Spawn {
                program: cmd.program.clone(),
                source,
            })?;
        info!(pid = ?child.id(), "started collector: {}", cmd.display());

        let stdout = child.stdout.take().ok_or(PanelError::Pipes)?;
        let stderr = child.stderr.take().ok_or(PanelError::Pipes)?;
        Ok(Self {
            child,
            stdout: Some(stdout),
            stderr: Some(stderr),
            out_buf: vec![0; CHUNK],
            err_buf: vec![0; CHUNK],
            ended: false,
        })
    }

    pub fn pid(&self) -> Option<u32> {
        self.child.id()
    }

    pub fn has_ended(&self) -> bool {
        self.ended
    }

    /// Next chunk from either pipe, then `Exited` once, then `None` forever.
    pub async fn next_event(&mut self) -> Option<CollectorEvent> {
        if self.ended {
            return None;
        }
        loop {
            if self.stdout.is_none() && self.stderr.is_none() {
                let code = match self.child.wait().await {
                    Ok(status) => status.code(),
                    Err(e) => {
                        debug!("wait on collector failed: {e}");
                        None
                    }
                };
                self.ended = true;
                return Some(CollectorEvent::Exited(code));
            }

            let read = tokio::select! {
                r = read_some(&mut self.stdout, &mut self.out_buf) => Pipe::Out(r),
                r = read_some(&mut self.stderr, &mut self.err_buf) => Pipe::Err(r),
            };

            match read {
                Pipe::Out(Ok(n)) if n > 0 => {
                    return Some(CollectorEvent::Stdout(self.out_buf[..n].to_vec()))
                }
                Pipe::Out(r) => {
                    if let Err(e) = r {
                        debug!("collector stdout read failed: {e}");
                    }
                    self.stdout = None;
                }
                Pipe::Err(Ok(n)) if n > 0 => {
                    return Some(CollectorEvent::Stderr(self.err_buf[..n].to_vec()))
                }
                Pipe::Err(r) => {
                    if let Err(e) = r {
                        debug!("collector stderr read failed: {e}");
                    }
                    self.stderr = None;
                }
            }
        }
    }

    /// Kills the collector and reaps it. Further `next_event` calls return `None`.
    pub async fn stop(&mut self) -> Result<()> {
        if self.ended {
            return Ok(());
        }
        self.ended = true;
        self.stdout = None;
        self.stderr = None;
        match self.child.kill().await {
            Ok(()) => Ok(()),
            // already exited and reaped
            Err(e) if e.kind() == io::ErrorKind::InvalidInput => Ok(()),
            Err(e) => Err(PanelError::Kill(e)),
        }
    }
}
