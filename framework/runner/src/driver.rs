//! Subprocess-backed implementations of the executor interfaces.
//!
//! The driver is a user-supplied shell command launched once per script. It
//! receives the script text on stdin and reports progress on stdout, one
//! directive per line:
//!
//! ```text
//! !checkpoint A            the A marker's statements just completed
//! !checkpoint B            the B marker's statements just completed
//! !error <offset> <msg>    the statement at byte <offset> failed
//! ```
//!
//! Checkpoint lines are stamped against the harness's own monotonic clock as
//! they arrive, which keeps A and B comparable even when a benchmark phase
//! spreads them across separate driver invocations. Drivers must flush
//! stdout after a checkpoint line or the stamp will lag.
//!
//! Generator and restart commands receive their parameters through `GEN_*`
//! and `RESTART_TARGET` environment variables; the commands themselves are
//! opaque shell strings.

use std::io::{BufRead, BufReader, Write};
use std::process::{Command, Stdio};
use std::time::Instant;

use time_trial_core::prelude::{Checkpoint, GeneratorRequest, KeySpec, Script};

use crate::executor::{Executor, ExecutorError, ScriptOutcome, ServiceControl};

/// Exit status used by shells for "command not found".
const EXIT_NOT_FOUND: i32 = 127;

pub struct PipeExecutor {
    driver: String,
    generator: Option<String>,
    origin: Instant,
}

impl PipeExecutor {
    pub fn new(driver: impl Into<String>, generator: Option<&str>) -> Self {
        Self {
            driver: driver.into(),
            generator: generator.map(str::to_string),
            origin: Instant::now(),
        }
    }
}

impl Executor for PipeExecutor {
    fn run_script(&mut self, script: &Script) -> Result<ScriptOutcome, ExecutorError> {
        let mut child = Command::new("sh")
            .arg("-c")
            .arg(&self.driver)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .spawn()
            .map_err(|e| ExecutorError::Unavailable {
                message: format!("failed to launch driver: {e}"),
            })?;

        // The driver may exit before consuming the whole script; writing from
        // a separate thread keeps checkpoint stamping live on this one.
        let mut stdin = child.stdin.take().expect("driver stdin was piped");
        let text = script.text().to_owned();
        let writer = std::thread::Builder::new()
            .name("driver-stdin".to_string())
            .spawn(move || {
                let _ = stdin.write_all(text.as_bytes());
            })
            .map_err(|e| ExecutorError::Unavailable {
                message: format!("failed to feed driver: {e}"),
            })?;

        let stdout = child.stdout.take().expect("driver stdout was piped");
        let mut outcome = ScriptOutcome::new();
        let mut reported_error: Option<(usize, String)> = None;

        for line in BufReader::new(stdout).lines() {
            let line = line.map_err(|e| ExecutorError::Unavailable {
                message: format!("lost driver stdout: {e}"),
            })?;
            let line = line.trim();

            if let Some(which) = line.strip_prefix("!checkpoint ") {
                match parse_checkpoint(which) {
                    Some(checkpoint) => outcome.record(checkpoint, self.origin.elapsed()),
                    None => log::warn!("Driver reported unknown checkpoint: {line}"),
                }
            } else if let Some(rest) = line.strip_prefix("!error ") {
                reported_error = Some(parse_error(rest));
            } else if !line.is_empty() {
                log::debug!("driver: {line}");
            }
        }

        let _ = writer.join();
        let status = child.wait().map_err(|e| ExecutorError::Unavailable {
            message: format!("failed to reap driver: {e}"),
        })?;

        if status.code() == Some(EXIT_NOT_FOUND) {
            return Err(ExecutorError::Unavailable {
                message: format!("driver command not found: {}", self.driver),
            });
        }
        if let Some((offset, message)) = reported_error {
            return Err(ExecutorError::Statement { offset, message });
        }
        if !status.success() {
            return Err(ExecutorError::Statement {
                offset: 0,
                message: format!("driver exited with {status}"),
            });
        }

        Ok(outcome)
    }

    fn generate(&mut self, request: &GeneratorRequest) -> Result<(), ExecutorError> {
        let Some(generator) = &self.generator else {
            return Err(ExecutorError::Generator {
                message: "no generator command configured".to_string(),
            });
        };

        let keys = match request.keys {
            KeySpec::Sequential => "sequential".to_string(),
            KeySpec::Random { min, max } => format!("random:{min}:{max}"),
        };

        let output = Command::new("sh")
            .arg("-c")
            .arg(generator)
            .env("GEN_TARGET", &request.target)
            .env("GEN_KEYS", keys)
            .env("GEN_COUNT", request.count.to_string())
            .env("GEN_MIN_BYTES", request.payload.min_bytes.to_string())
            .env("GEN_MAX_BYTES", request.payload.max_bytes.to_string())
            .output()
            .map_err(|e| ExecutorError::Unavailable {
                message: format!("failed to launch generator: {e}"),
            })?;

        if output.status.code() == Some(EXIT_NOT_FOUND) {
            return Err(ExecutorError::Unavailable {
                message: format!("generator command not found: {generator}"),
            });
        }
        if !output.status.success() {
            return Err(ExecutorError::Generator {
                message: format!(
                    "generator exited with {}: {}",
                    output.status,
                    String::from_utf8_lossy(&output.stderr).trim()
                ),
            });
        }

        Ok(())
    }
}

pub struct ShellServiceControl {
    restart: Option<String>,
}

impl ShellServiceControl {
    pub fn new(restart: Option<&str>) -> Self {
        Self {
            restart: restart.map(str::to_string),
        }
    }
}

impl ServiceControl for ShellServiceControl {
    fn restart(&mut self, target: &str) -> Result<(), ExecutorError> {
        let Some(restart) = &self.restart else {
            return Err(ExecutorError::Restart {
                message: "no restart command configured".to_string(),
            });
        };

        let output = Command::new("sh")
            .arg("-c")
            .arg(restart)
            .env("RESTART_TARGET", target)
            .output()
            .map_err(|e| ExecutorError::Unavailable {
                message: format!("failed to launch restart command: {e}"),
            })?;

        if output.status.code() == Some(EXIT_NOT_FOUND) {
            return Err(ExecutorError::Unavailable {
                message: format!("restart command not found: {restart}"),
            });
        }
        if !output.status.success() {
            return Err(ExecutorError::Restart {
                message: format!(
                    "restart of '{target}' exited with {}: {}",
                    output.status,
                    String::from_utf8_lossy(&output.stderr).trim()
                ),
            });
        }

        Ok(())
    }
}

fn parse_checkpoint(token: &str) -> Option<Checkpoint> {
    match token.trim() {
        "A" => Some(Checkpoint::A),
        "B" => Some(Checkpoint::B),
        _ => None,
    }
}

fn parse_error(rest: &str) -> (usize, String) {
    let mut parts = rest.splitn(2, ' ');
    match parts.next().and_then(|raw| raw.parse::<usize>().ok()) {
        Some(offset) => (offset, parts.next().unwrap_or("").trim().to_string()),
        None => (0, rest.trim().to_string()),
    }
}
