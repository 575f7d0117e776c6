use std::io::{Read, Write};
use std::path::PathBuf;
use std::process::{Child, Command, Stdio};
use std::sync::{Arc, Mutex};
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::thread;

pub(crate) const DEFAULT_PYTHON: &str = "python3";

/// Captured streams of one interpreter invocation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct Execution {
    pub(crate) stdout: String,
    pub(crate) stderr: String,
}

impl Execution {
    pub(crate) fn failed(message: String) -> Self {
        Self {
            stdout: String::new(),
            stderr: message,
        }
    }
}

/// What the Output pane shows: the last run's streams, or that one is in flight.
#[derive(Debug, Clone, Default)]
pub(crate) struct ExecutionResult {
    pub(crate) stdout: String,
    pub(crate) stderr: String,
    pub(crate) running: bool,
}

/// Runs a complete program text and reports what it printed. Failures of the
/// program or of the interpreter itself come back as stderr text.
pub(crate) trait Interpreter: Send + Sync {
    fn execute(&self, source: &str) -> Execution;

    /// Stops a program started by `execute`, if one is still running.
    fn cancel(&self) {}
}

pub(crate) struct PythonInterpreter {
    program: PathBuf,
    child: Mutex<Option<Child>>,
}

impl PythonInterpreter {
    pub(crate) fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            child: Mutex::new(None),
        }
    }

    #[cfg(test)]
    fn has_child(&self) -> bool {
        self.child.lock().is_ok_and(|child| child.is_some())
    }
}

fn read_all(stream: Option<impl Read>) -> String {
    let mut bytes = Vec::new();
    if let Some(mut stream) = stream {
        let _ = stream.read_to_end(&mut bytes);
    }
    String::from_utf8_lossy(&bytes).to_string()
}

impl Interpreter for PythonInterpreter {
    fn execute(&self, source: &str) -> Execution {
        let child = Command::new(&self.program)
            .arg("-")
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn();
        let mut child = match child {
            Ok(child) => child,
            Err(err) => {
                tracing::warn!(program = %self.program.display(), error = %err, "interpreter spawn failed");
                return Execution::failed(format!(
                    "Failed to start {}: {err}",
                    self.program.display()
                ));
            }
        };
        let stdin = child.stdin.take();
        let stdout = child.stdout.take();
        let stderr = child.stderr.take();
        if let Ok(mut slot) = self.child.lock() {
            *slot = Some(child);
        }

        // The script is read to EOF before it runs, so the pipe must close here.
        if let Some(mut stdin) = stdin
            && let Err(err) = stdin.write_all(source.as_bytes())
        {
            tracing::warn!(error = %err, "writing program to interpreter failed");
        }
        let stderr_reader = thread::spawn(move || read_all(stderr));
        let stdout = read_all(stdout);
        let mut stderr = stderr_reader.join().unwrap_or_default();

        let child = self.child.lock().ok().and_then(|mut slot| slot.take());
        let Some(mut child) = child else {
            return Execution::failed("Interpreter process was lost".to_string());
        };
        let status = match child.wait() {
            Ok(status) => status,
            Err(err) => return Execution::failed(format!("Interpreter failed: {err}")),
        };
        if !status.success() && stderr.trim().is_empty() {
            stderr = format!("Interpreter exited with {status}");
        }
        tracing::debug!(%status, "run finished");
        Execution { stdout, stderr }
    }

    fn cancel(&self) {
        let Ok(mut slot) = self.child.lock() else {
            return;
        };
        if let Some(child) = slot.as_mut() {
            tracing::info!(pid = child.id(), "killing interpreter");
            if let Err(err) = child.kill() {
                tracing::warn!(error = %err, "killing interpreter failed");
            }
        }
    }
}

/// Dispatches runs to the interpreter on a worker thread, one at a time.
pub(crate) struct Runner {
    interpreter: Arc<dyn Interpreter>,
    in_flight: Option<Receiver<Execution>>,
    result: ExecutionResult,
}

impl Runner {
    pub(crate) fn new(interpreter: Arc<dyn Interpreter>) -> Self {
        Self {
            interpreter,
            in_flight: None,
            result: ExecutionResult::default(),
        }
    }

    pub(crate) fn is_running(&self) -> bool {
        self.in_flight.is_some()
    }

    pub(crate) fn result(&self) -> &ExecutionResult {
        &self.result
    }

    /// Starts a run of `source`. Returns `false` without doing anything while
    /// a previous run is still in flight.
    pub(crate) fn run(&mut self, source: &str) -> bool {
        if self.is_running() {
            return false;
        }
        let (tx, rx) = mpsc::channel();
        let interpreter = Arc::clone(&self.interpreter);
        let source = source.to_string();
        thread::spawn(move || {
            let _ = tx.send(interpreter.execute(&source));
        });
        self.in_flight = Some(rx);
        self.result = ExecutionResult {
            running: true,
            ..ExecutionResult::default()
        };
        true
    }

    /// Applies a finished run. Returns `true` exactly once per run.
    pub(crate) fn poll(&mut self) -> bool {
        let Some(rx) = self.in_flight.as_ref() else {
            return false;
        };
        let execution = match rx.try_recv() {
            Ok(execution) => execution,
            Err(TryRecvError::Empty) => return false,
            Err(TryRecvError::Disconnected) => {
                Execution::failed("Interpreter worker stopped unexpectedly".to_string())
            }
        };
        self.in_flight = None;
        self.result = ExecutionResult {
            stdout: execution.stdout,
            stderr: execution.stderr,
            running: false,
        };
        true
    }

    /// Kills the program in flight. The worker still reports it through `poll`.
    pub(crate) fn cancel(&self) {
        if self.is_running() {
            self.interpreter.cancel();
        }
    }
}

impl Drop for Runner {
    fn drop(&mut self) {
        self.cancel();
    }
}
