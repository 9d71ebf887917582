/// The supervised n8n server process
///
/// The server runs with inherited stdio so its logs land in the container
/// output. SIGINT, SIGTERM and SIGHUP sent to the entrypoint are relayed to the
/// server; the entrypoint itself only exits once the server has.

use anyhow::{Context, Result};
use std::{
    os::unix::process::ExitStatusExt,
    process::{ExitStatus, Stdio},
};
use tokio::{
    process::{Child, Command},
    signal::unix::{signal, Signal, SignalKind},
    task::JoinHandle,
};

/// Handle on the running server
#[derive(Debug)]
pub struct ServerProcess {
    child: Child,
}

impl ServerProcess {
    /// Start the server binary with no arguments
    pub fn spawn(binary: &str) -> Result<Self> {
        Self::spawn_with_args(binary, &[])
    }

    /// Start `binary` with explicit arguments
    pub fn spawn_with_args(binary: &str, args: &[&str]) -> Result<Self> {
        tracing::info!("🚀 Starting {} process", binary);

        let child = Command::new(binary)
            .args(args)
            .stdin(Stdio::inherit())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .spawn()
            .with_context(|| format!("Failed to start {}", binary))?;

        Ok(Self { child })
    }

    /// OS process id, `None` once the process has been reaped
    pub fn id(&self) -> Option<u32> {
        self.child.id()
    }

    /// Wait for the server to exit and return the code the entrypoint should exit with
    pub async fn wait(mut self) -> Result<i32> {
        let status = self
            .child
            .wait()
            .await
            .context("Failed to wait for server process")?;

        tracing::info!(
            "⏹️ Server exited (code: {:?}, signal: {:?})",
            status.code(),
            status.signal()
        );

        Ok(exit_code(&status))
    }
}

/// Child's exit code; 0 when it was terminated by a signal
pub fn exit_code(status: &ExitStatus) -> i32 {
    status.code().unwrap_or(0)
}

/// SIGINT, SIGTERM and SIGHUP handlers, installed ahead of the server
///
/// Once installed, these signals no longer terminate the entrypoint; they are
/// queued until `forward_to` starts relaying them.
pub struct SignalForwarder {
    interrupt: Signal,
    terminate: Signal,
    hangup: Signal,
}

impl SignalForwarder {
    pub fn install() -> Result<Self> {
        Ok(Self {
            interrupt: signal(SignalKind::interrupt()).context("Failed to install SIGINT handler")?,
            terminate: signal(SignalKind::terminate()).context("Failed to install SIGTERM handler")?,
            hangup: signal(SignalKind::hangup()).context("Failed to install SIGHUP handler")?,
        })
    }

    /// Relay received signals to `pid` for the rest of the process lifetime
    pub fn forward_to(self, pid: u32) -> JoinHandle<()> {
        let Self {
            mut interrupt,
            mut terminate,
            mut hangup,
        } = self;

        tokio::spawn(async move {
            loop {
                let signo = tokio::select! {
                    Some(()) = interrupt.recv() => libc::SIGINT,
                    Some(()) = terminate.recv() => libc::SIGTERM,
                    Some(()) = hangup.recv() => libc::SIGHUP,
                    else => break,
                };
                tracing::info!("📶 Forwarding signal {} to server (pid {})", signo, pid);
                send_signal(pid, signo);
            }
        })
    }
}

/// Install handlers and relay termination signals to `pid`
pub fn forward_signals(pid: u32) -> Result<JoinHandle<()>> {
    Ok(SignalForwarder::install()?.forward_to(pid))
}

/// Deliver `signo` to `pid`; a process that already exited is not an error
pub fn send_signal(pid: u32, signo: libc::c_int) {
    let Ok(pid) = libc::pid_t::try_from(pid) else {
        tracing::warn!("⚠️ Pid {} out of range, not signalling", pid);
        return;
    };

    // SAFETY: kill(2) has no memory-safety preconditions
    let rc = unsafe { libc::kill(pid, signo) };
    if rc != 0 {
        tracing::debug!(
            "Could not signal pid {}: {}",
            pid,
            std::io::Error::last_os_error()
        );
    }
}
