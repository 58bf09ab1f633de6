use std::collections::VecDeque;
use std::time::Duration;

use time_trial_runner::prelude::{
    Checkpoint, Executor, ExecutorError, GeneratorRequest, Script, ScriptOutcome, ServiceControl,
};

/// An executor double that records everything it is asked to do.
///
/// By default every script succeeds; the markers it contains are stamped on a
/// clock that advances one millisecond per checkpoint, so engine code sees
/// plausible, strictly increasing offsets. Individual calls can be overridden
/// by queueing explicit results with [FakeExecutor::enqueue_script_result].
pub struct FakeExecutor {
    /// First line of every executed script, plus a record per generator call.
    pub log: Vec<String>,
    scripted: VecDeque<Result<ScriptOutcome, ExecutorError>>,
    clock: Duration,
}

impl FakeExecutor {
    pub fn new() -> Self {
        Self {
            log: Vec::new(),
            scripted: VecDeque::new(),
            clock: Duration::ZERO,
        }
    }

    pub fn enqueue_script_result(&mut self, result: Result<ScriptOutcome, ExecutorError>) {
        self.scripted.push_back(result);
    }

    pub fn executed_scripts(&self) -> usize {
        self.log.iter().filter(|entry| entry.starts_with("script:")).count()
    }
}

impl Executor for FakeExecutor {
    fn run_script(&mut self, script: &Script) -> Result<ScriptOutcome, ExecutorError> {
        let first_line = script.text().lines().next().unwrap_or("").to_string();
        self.log.push(format!("script:{first_line}"));

        if let Some(result) = self.scripted.pop_front() {
            return result;
        }

        let mut outcome = ScriptOutcome::new();
        for (checkpoint, _) in script.markers() {
            self.clock += Duration::from_millis(1);
            outcome.record(checkpoint, self.clock);
        }
        Ok(outcome)
    }

    fn generate(&mut self, request: &GeneratorRequest) -> Result<(), ExecutorError> {
        self.log
            .push(format!("generate:{}:{}", request.target, request.count));
        Ok(())
    }
}

/// A service-control double recording restart requests.
pub struct FakeServices {
    pub restarts: Vec<String>,
    pub fail_with: Option<String>,
}

impl FakeServices {
    pub fn new() -> Self {
        Self {
            restarts: Vec::new(),
            fail_with: None,
        }
    }
}

impl ServiceControl for FakeServices {
    fn restart(&mut self, target: &str) -> Result<(), ExecutorError> {
        self.restarts.push(target.to_string());
        match &self.fail_with {
            Some(message) => Err(ExecutorError::Restart {
                message: message.clone(),
            }),
            None => Ok(()),
        }
    }
}

/// Convenience for building outcomes with explicit checkpoint stamps.
pub fn outcome(stamps: &[(Checkpoint, u64)]) -> ScriptOutcome {
    let mut outcome = ScriptOutcome::new();
    for (checkpoint, millis) in stamps {
        outcome.record(*checkpoint, Duration::from_millis(*millis));
    }
    outcome
}
