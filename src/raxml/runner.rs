//! # Process Runner
//!
//! Runs one [`InvocationSpec`](crate::raxml::InvocationSpec) as a child
//! process, captures its output as text, and classifies failure:
//!
//! - spawn failure → [`PythiaError::Environment`] (misconfiguration)
//! - nonzero exit → [`PythiaError::ExternalTool`] (tool-reported failure)
//! - caller-supplied deadline or cancellation flag fired → the child is
//!   killed and [`PythiaError::Cancelled`] propagates
//!
//! There are no retries: parsimony inference is seeded, so an identical
//! rerun reproduces the same outcome.

use std::io::Read;
use std::process::{Child, Command, ExitStatus, Stdio};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use tracing::debug;

use crate::error::{PythiaError, Result};
use crate::raxml::command::InvocationSpec;

/// How often the runner polls a live child for exit/cancellation.
const POLL_INTERVAL: Duration = Duration::from_millis(25);

/// Caller-supplied run limits. `Default` means unbounded and uncancellable.
///
/// The cancellation flag is shared: setting it from any thread makes every
/// runner holding a clone kill its child at the next poll.
#[derive(Debug, Clone, Default)]
pub struct RunControl {
    /// Kill the child once this much wall-clock time has elapsed.
    pub timeout: Option<Duration>,
    /// Kill the child once this flag is set.
    pub cancel: Option<Arc<AtomicBool>>,
}

impl RunControl {
    fn cancelled(&self) -> bool {
        self.cancel
            .as_ref()
            .is_some_and(|flag| flag.load(Ordering::Relaxed))
    }
}

/// Outcome of one completed child process. Consumed immediately by the
/// caller; never persisted.
#[derive(Debug)]
pub struct ProcessResult {
    /// Exit status as reported by the OS
    pub status: ExitStatus,
    /// Captured stdout and stderr, stdout first
    pub output: String,
    /// Wall-clock duration of the child process
    pub duration: Duration,
}

/// Run `spec` to completion, enforcing `control`.
///
/// Returns the captured output on success (exit status zero). The spec's
/// argument vector is passed through verbatim.
pub fn run(spec: &InvocationSpec, control: &RunControl) -> Result<ProcessResult> {
    let args = spec.to_args();
    debug!(?args, "invoking RAxML-NG");

    let start = Instant::now();
    let mut child = Command::new(&args[0])
        .args(&args[1..])
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .map_err(|e| PythiaError::environment(spec.executable(), e.to_string()))?;

    // Drain both pipes on background threads so the child never blocks on a
    // full pipe while this thread polls for exit.
    let stdout = drain(child.stdout.take());
    let stderr = drain(child.stderr.take());

    let deadline = control.timeout.map(|t| start + t);
    let status = loop {
        if let Some(status) = child.try_wait()? {
            break status;
        }
        if control.cancelled() {
            return Err(kill_cancelled(&mut child, "cancellation flag set"));
        }
        if deadline.is_some_and(|d| Instant::now() >= d) {
            return Err(kill_cancelled(&mut child, "timeout elapsed"));
        }
        thread::sleep(POLL_INTERVAL);
    };
    let duration = start.elapsed();

    let mut output = stdout.join().unwrap_or_default();
    let err_text = stderr.join().unwrap_or_default();
    if !err_text.is_empty() {
        if !output.is_empty() && !output.ends_with('\n') {
            output.push('\n');
        }
        output.push_str(&err_text);
    }

    if !status.success() {
        return Err(PythiaError::ExternalTool {
            status: status.code().unwrap_or(-1),
            output,
        });
    }

    Ok(ProcessResult {
        status,
        output,
        duration,
    })
}

fn drain(pipe: Option<impl Read + Send + 'static>) -> thread::JoinHandle<String> {
    thread::spawn(move || {
        let mut text = String::new();
        if let Some(mut pipe) = pipe {
            // Tool output is ASCII in practice; replace anything else.
            let mut bytes = Vec::new();
            if pipe.read_to_end(&mut bytes).is_ok() {
                text = String::from_utf8_lossy(&bytes).into_owned();
            }
        }
        text
    })
}

fn kill_cancelled(child: &mut Child, reason: &str) -> PythiaError {
    // Best effort: the child may have exited between the poll and the kill.
    let _ = child.kill();
    let _ = child.wait();
    PythiaError::cancelled(reason)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::raxml::command::InvocationSpec;
    use std::io::Write;
    use std::os::unix::fs::PermissionsExt;

    fn stub_tool(dir: &std::path::Path, script: &str) -> std::path::PathBuf {
        let path = dir.join("stub-raxml");
        let mut f = std::fs::File::create(&path).unwrap();
        writeln!(f, "#!/bin/sh\n{script}").unwrap();
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
        path
    }

    #[test]
    fn test_zero_exit_yields_captured_output() {
        let dir = tempfile::tempdir().unwrap();
        let exe = stub_tool(dir.path(), "echo analysis done");
        let spec = InvocationSpec::parse(&exe, "a", "GTR+G", dir.path().join("p"));

        let result = run(&spec, &RunControl::default()).unwrap();
        assert!(result.status.success());
        assert!(result.output.contains("analysis done"));
    }

    #[test]
    fn test_nonzero_exit_is_external_tool_error() {
        let dir = tempfile::tempdir().unwrap();
        let exe = stub_tool(dir.path(), "echo ERROR bad alignment >&2; exit 1");
        let spec = InvocationSpec::parse(&exe, "a", "GTR+G", dir.path().join("p"));

        match run(&spec, &RunControl::default()) {
            Err(PythiaError::ExternalTool { status, output }) => {
                assert_eq!(status, 1);
                assert!(output.contains("bad alignment"));
            }
            other => panic!("expected ExternalTool error, got {other:?}"),
        }
    }

    #[test]
    fn test_missing_binary_is_environment_error() {
        let spec = InvocationSpec::parse("/no/such/binary", "a", "GTR+G", "p");
        match run(&spec, &RunControl::default()) {
            Err(PythiaError::Environment { exe, .. }) => {
                assert_eq!(exe, std::path::PathBuf::from("/no/such/binary"));
            }
            other => panic!("expected Environment error, got {other:?}"),
        }
    }

    #[test]
    fn test_timeout_kills_child() {
        let dir = tempfile::tempdir().unwrap();
        let exe = stub_tool(dir.path(), "sleep 30");
        let spec = InvocationSpec::parse(&exe, "a", "GTR+G", dir.path().join("p"));

        let control = RunControl {
            timeout: Some(Duration::from_millis(100)),
            cancel: None,
        };
        let start = Instant::now();
        match run(&spec, &control) {
            Err(PythiaError::Cancelled { .. }) => {}
            other => panic!("expected Cancelled error, got {other:?}"),
        }
        assert!(start.elapsed() < Duration::from_secs(5));
    }

    #[test]
    fn test_cancellation_flag_kills_child() {
        let dir = tempfile::tempdir().unwrap();
        let exe = stub_tool(dir.path(), "sleep 30");
        let spec = InvocationSpec::parse(&exe, "a", "GTR+G", dir.path().join("p"));

        let flag = Arc::new(AtomicBool::new(false));
        let control = RunControl {
            timeout: None,
            cancel: Some(Arc::clone(&flag)),
        };
        let setter = {
            let flag = Arc::clone(&flag);
            thread::spawn(move || {
                thread::sleep(Duration::from_millis(100));
                flag.store(true, Ordering::Relaxed);
            })
        };
        match run(&spec, &control) {
            Err(PythiaError::Cancelled { .. }) => {}
            other => panic!("expected Cancelled error, got {other:?}"),
        }
        setter.join().unwrap();
    }
}
