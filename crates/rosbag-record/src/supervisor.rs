// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Recorder child process supervision.
//!
//! The recorder is spawned as a child and waited on. Ctrl+C in the parent is
//! relayed to the child as SIGINT so the recorder can flush its cache and
//! close the bag; the parent itself keeps waiting until the child exits.

use std::process::{Child, Command, ExitStatus};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use thiserror::Error;
use tracing::{debug, info, warn};

/// Supervisor errors.
#[derive(Debug, Error)]
pub enum SupervisorError {
    #[error("Failed to launch {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed waiting for recorder: {0}")]
    Wait(#[source] std::io::Error),

    #[error("Failed to install signal handler: {0}")]
    Handler(#[from] ctrlc::Error),
}

/// Where the supervised child is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
enum ChildState {
    /// Not spawned yet. Signals received now are held until it is.
    #[default]
    Pending,
    Running(i32),
    Exited,
}

#[derive(Debug, Default)]
struct ChildSlot {
    state: ChildState,
    queued: Option<libc::c_int>,
}

/// Relays interrupt signals to the currently supervised child.
///
/// Clones share the same child slot, so a clone moved into the signal
/// handler sees the pid bound by [`supervise`]. A signal that arrives before
/// the child is spawned is queued and delivered as soon as it is bound.
#[derive(Debug, Clone, Default)]
pub struct SignalForwarder {
    slot: Arc<Mutex<ChildSlot>>,
}

impl SignalForwarder {
    /// Create a forwarder with no child bound.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the process-wide Ctrl+C handler.
    ///
    /// Can only succeed once per process.
    pub fn install(&self) -> Result<(), SupervisorError> {
        let forwarder = self.clone();
        ctrlc::set_handler(move || {
            info!("Caught Ctrl+C, stopping ros2 bag record...");
            if forwarder.forward(libc::SIGINT) {
                info!("Waiting for ros2 bag record to flush cache and exit...");
            }
        })?;
        Ok(())
    }

    /// Send `signal` to the bound child.
    ///
    /// Returns `true` only if the signal was delivered now. Before the child
    /// is spawned the signal is queued instead; after it has exited the
    /// signal is dropped.
    pub fn forward(&self, signal: libc::c_int) -> bool {
        let mut slot = self.slot();
        match slot.state {
            ChildState::Running(pid) => send_signal(pid, signal),
            ChildState::Pending => {
                warn!(
                    "ros2 bag record not started yet, signal {} will be forwarded once it is",
                    signal
                );
                slot.queued = Some(signal);
                false
            }
            ChildState::Exited => {
                debug!("ros2 bag record already exited, signal {} not forwarded", signal);
                false
            }
        }
    }

    /// Whether a child is currently bound.
    pub fn is_bound(&self) -> bool {
        matches!(self.slot().state, ChildState::Running(_))
    }

    fn slot(&self) -> MutexGuard<'_, ChildSlot> {
        self.slot.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn bind(&self, pid: u32) -> ChildBinding<'_> {
        let mut slot = self.slot();
        // pid_t is i32; real pids always fit.
        match i32::try_from(pid) {
            Ok(pid) => {
                slot.state = ChildState::Running(pid);
                if let Some(signal) = slot.queued.take() {
                    info!("Forwarding signal {} received before launch", signal);
                    send_signal(pid, signal);
                }
            }
            Err(_) => warn!("pid {} out of range, signals will not be forwarded", pid),
        }
        ChildBinding { forwarder: self }
    }
}

/// Keeps a child pid bound to its forwarder until dropped.
///
/// The binding must be dropped before the child is reaped: the slot lock
/// guarantees no `kill` is in flight once the drop returns, and an unreaped
/// pid cannot be recycled by the kernel.
struct ChildBinding<'a> {
    forwarder: &'a SignalForwarder,
}

impl Drop for ChildBinding<'_> {
    fn drop(&mut self) {
        self.forwarder.slot().state = ChildState::Exited;
    }
}

#[cfg(unix)]
fn send_signal(pid: i32, signal: libc::c_int) -> bool {
    // SAFETY: kill(2) has no memory-safety preconditions.
    let ret = unsafe { libc::kill(pid, signal) };
    if ret != 0 {
        warn!(
            "Failed to forward signal {} to pid {}: {}",
            signal,
            pid,
            std::io::Error::last_os_error()
        );
        return false;
    }
    true
}

#[cfg(not(unix))]
fn send_signal(pid: i32, signal: libc::c_int) -> bool {
    warn!(
        "Signal forwarding unsupported on this platform (signal {}, pid {})",
        signal, pid
    );
    false
}

/// Block until `child` has exited, leaving it unreaped.
#[cfg(unix)]
fn wait_exited(child: &mut Child) -> std::io::Result<()> {
    let pid = child.id() as libc::id_t;
    loop {
        // SAFETY: siginfo_t is plain data; waitid only writes into it.
        let mut info: libc::siginfo_t = unsafe { std::mem::zeroed() };
        let ret =
            unsafe { libc::waitid(libc::P_PID, pid, &mut info, libc::WEXITED | libc::WNOWAIT) };
        if ret == 0 {
            return Ok(());
        }
        let err = std::io::Error::last_os_error();
        if err.kind() != std::io::ErrorKind::Interrupted {
            return Err(err);
        }
    }
}

#[cfg(not(unix))]
fn wait_exited(child: &mut Child) -> std::io::Result<()> {
    child.wait().map(|_| ())
}

/// Spawn `command` and block until it exits, relaying signals through `forwarder`.
///
/// The child is bound to `forwarder` only for the duration of the wait. The
/// child's exit status is returned as-is; interpreting it is left to the caller.
pub fn supervise(
    mut command: Command,
    forwarder: &SignalForwarder,
) -> Result<ExitStatus, SupervisorError> {
    let program = command.get_program().to_string_lossy().into_owned();

    let mut child = command.spawn().map_err(|source| SupervisorError::Spawn {
        program: program.clone(),
        source,
    })?;
    debug!("Started {} (pid {})", program, child.id());

    let binding = forwarder.bind(child.id());
    // Reaping before unbinding would leave a window where Ctrl+C kills a
    // recycled pid, so wait without reaping, unbind, then reap.
    wait_exited(&mut child).map_err(SupervisorError::Wait)?;
    drop(binding);
    let status = child.wait().map_err(SupervisorError::Wait)?;
    debug!("{} exited: {}", program, status);

    Ok(status)
}
