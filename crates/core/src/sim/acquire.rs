//! Trace Acquisition.
//!
//! Runs the external pipeline simulator once and captures the trace it prints. It provides:
//! 1. **Bounded Wait:** The child is polled against a deadline and killed when it overruns.
//! 2. **Output Draining:** A reader thread drains stdout so a full pipe never blocks the child.
//!    Its result is awaited against the same deadline, so a descendant that keeps the pipe open
//!    cannot stretch the run past the timeout.
//! 3. **Cleanup:** The `b'...'` quoting some simulator builds wrap their output in is removed.
//!
//! Acquisition is never retried and a partial trace is never returned.

use std::ffi::OsStr;
use std::io::{self, Read};
use std::process::{Child, ChildStdout, Command, ExitStatus, Stdio};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError};
use std::thread;
use std::time::{Duration, Instant};

use tracing::{debug, warn};

use crate::common::error::{Result, TraceError};
use crate::trace::loader::normalize;

/// Interval between child status polls.
const POLL_INTERVAL: Duration = Duration::from_millis(10);

/// One invocation of the simulator.
#[derive(Debug)]
pub struct Acquisition {
    command: String,
    child: Child,
    output: Receiver<io::Result<String>>,
}

impl Acquisition {
    /// Runs `program` with `args` and returns its complete stdout.
    ///
    /// # Arguments
    ///
    /// * `program` - Simulator executable.
    /// * `args` - Arguments passed verbatim.
    /// * `timeout` - Upper bound on the simulator's run time.
    ///
    /// # Errors
    ///
    /// * [`TraceError::AcquisitionTimeout`] if the simulator is still running at the deadline;
    ///   the child is killed first.
    /// * [`TraceError::Acquisition`] if the simulator cannot be started or its output read.
    /// * [`TraceError::SimulatorFailed`] if it exits with a non-zero status.
    pub fn run<S: AsRef<OsStr>>(program: &str, args: &[S], timeout: Duration) -> Result<String> {
        debug!(program, ?timeout, "starting simulator");
        let acquisition = Self::spawn(program, args)?;
        acquisition.finish(timeout)
    }

    fn spawn<S: AsRef<OsStr>>(program: &str, args: &[S]) -> Result<Self> {
        let io_err = |source| TraceError::Acquisition {
            command: program.to_owned(),
            source,
        };

        let mut child = Command::new(program)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .spawn()
            .map_err(io_err)?;

        let Some(stdout) = child.stdout.take() else {
            let _ = child.kill();
            let _ = child.wait();
            return Err(io_err(io::Error::other("simulator stdout was not captured")));
        };

        let (tx, output) = mpsc::channel();
        let _ = thread::spawn(move || {
            let _ = tx.send(drain(stdout));
        });

        Ok(Self {
            command: program.to_owned(),
            child,
            output,
        })
    }

    fn finish(self, timeout: Duration) -> Result<String> {
        let Self {
            command,
            mut child,
            output,
        } = self;
        let io_err = |source| TraceError::Acquisition {
            command: command.clone(),
            source,
        };

        let deadline = Instant::now() + timeout;
        let status = match wait_until(&mut child, deadline) {
            Ok(Some(status)) => status,
            Ok(None) => {
                warn!(%command, ?timeout, "simulator timed out, killing it");
                let _ = child.kill();
                let _ = child.wait();
                return Err(TraceError::AcquisitionTimeout { timeout });
            }
            Err(source) => {
                let _ = child.kill();
                let _ = child.wait();
                return Err(io_err(source));
            }
        };

        // The pipe stays open while any descendant of the simulator still holds it.
        let remaining = deadline.saturating_duration_since(Instant::now());
        let output = match output.recv_timeout(remaining) {
            Ok(Ok(output)) => output,
            Ok(Err(source)) => return Err(io_err(source)),
            Err(RecvTimeoutError::Timeout) => {
                warn!(%command, ?timeout, "simulator output still open at the deadline");
                return Err(TraceError::AcquisitionTimeout { timeout });
            }
            Err(RecvTimeoutError::Disconnected) => {
                return Err(io_err(io::Error::other("stdout reader stopped without a result")));
            }
        };

        if !status.success() {
            return Err(TraceError::SimulatorFailed { command, status });
        }

        debug!(bytes = output.len(), "simulator output captured");
        Ok(normalize(&output).into_owned())
    }
}

/// Polls `child` until it exits or `deadline` passes.
fn wait_until(child: &mut Child, deadline: Instant) -> io::Result<Option<ExitStatus>> {
    loop {
        if let Some(status) = child.try_wait()? {
            return Ok(Some(status));
        }
        if Instant::now() >= deadline {
            return Ok(None);
        }
        thread::sleep(POLL_INTERVAL);
    }
}

fn drain(mut stdout: ChildStdout) -> io::Result<String> {
    let mut output = String::new();
    let _ = stdout.read_to_string(&mut output)?;
    Ok(output)
}
