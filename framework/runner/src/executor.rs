use std::time::Duration;

use time_trial_core::prelude::{Checkpoint, GeneratorRequest, Script};

/// The statement-submission side of the system under test.
///
/// An implementation owns a single monotonic clock and reports checkpoint
/// completions as offsets on it. Offsets from different calls within one
/// scenario activation must be comparable, since a benchmark phase may spread
/// its A and B markers across several scripts.
///
/// The harness issues one request at a time and blocks until it completes; an
/// implementation does not need to be reentrant.
pub trait Executor {
    fn run_script(&mut self, script: &Script) -> Result<ScriptOutcome, ExecutorError>;

    /// Fire-and-forget bulk data production. Returns once the generator has
    /// accepted (not necessarily ingested) the full request.
    fn generate(&mut self, request: &GeneratorRequest) -> Result<(), ExecutorError>;
}

/// Host-side control over the services of the system under test.
///
/// Kept separate from [Executor] so tests can substitute it independently and
/// so restarting is an explicit capability rather than an arbitrary closure.
pub trait ServiceControl {
    /// Restart the named service, blocking until the restart call returns.
    /// The underlying effect may still be settling when this resolves; a
    /// scenario that cares must follow up with a script that observes
    /// recovery.
    fn restart(&mut self, target: &str) -> Result<(), ExecutorError>;
}

/// What the executor observed while running one script.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScriptOutcome {
    checkpoints: Vec<(Checkpoint, Duration)>,
}

impl ScriptOutcome {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_checkpoint(mut self, checkpoint: Checkpoint, at: Duration) -> Self {
        self.record(checkpoint, at);
        self
    }

    pub fn record(&mut self, checkpoint: Checkpoint, at: Duration) {
        self.checkpoints.push((checkpoint, at));
    }

    /// Completion offset of the first observation of `checkpoint`.
    pub fn observed(&self, checkpoint: Checkpoint) -> Option<Duration> {
        self.checkpoints
            .iter()
            .find(|(c, _)| *c == checkpoint)
            .map(|(_, at)| *at)
    }

    pub fn checkpoints(&self) -> &[(Checkpoint, Duration)] {
        &self.checkpoints
    }
}

/// Failures surfaced by the executor or service-control boundary.
#[derive(Debug, thiserror::Error)]
pub enum ExecutorError {
    /// A statement failed; `offset` is the byte offset of the failing
    /// statement within the script text.
    #[error("statement at offset {offset} failed: {message}")]
    Statement { offset: usize, message: String },

    #[error("generator invocation failed: {message}")]
    Generator { message: String },

    #[error("service restart failed: {message}")]
    Restart { message: String },

    /// The script completed without the executor ever observing this marker.
    #[error("checkpoint {checkpoint} was never observed")]
    CheckpointMissing { checkpoint: Checkpoint },

    /// The executor reported B completing before A; the interval is
    /// meaningless and the measurement is discarded.
    #[error("checkpoint B was observed before checkpoint A")]
    CheckpointRegression,

    /// The external system cannot be reached at all. Fatal for the whole run,
    /// not just the current scenario.
    #[error("external system unavailable: {message}")]
    Unavailable { message: String },
}
