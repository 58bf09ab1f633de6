use std::time::Duration;

use time_trial_core::prelude::{Action, Checkpoint, DefinitionError, Phase};

use crate::context::ScenarioContext;
use crate::definition::ScenarioDefinition;
use crate::executor::{Executor, ExecutorError, ScriptOutcome, ServiceControl};

/// Why a scenario stopped short of a measurement.
#[derive(Debug, thiserror::Error)]
pub enum ScenarioError {
    #[error("invalid definition: {0}")]
    Definition(#[from] DefinitionError),

    /// A `shared` or `init` action failed. Shared failures are fatal for the
    /// scenario; init failures abort the current iteration.
    #[error("setup failed in the {phase} phase at action {index}: {source}")]
    Setup {
        phase: Phase,
        index: usize,
        source: ExecutorError,
    },

    /// A benchmark action failed or a checkpoint never materialized; the
    /// iteration's measurement is discarded, never recorded as zero.
    #[error("measurement discarded, {phase} action {index} failed: {source}")]
    Measurement {
        phase: Phase,
        index: usize,
        source: ExecutorError,
    },

    /// The external system cannot be reached; no further measurement in this
    /// run is possible.
    #[error("external system unavailable: {message}")]
    Unavailable { message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LifecycleState {
    Created,
    SharedReady,
    PerIterationSetup,
    Benchmarking,
    Done,
}

/// Where the single A/B pair lives within the benchmark phase's action list.
#[derive(Debug, Clone, Copy)]
struct CheckpointPlan {
    a_action: usize,
    b_action: usize,
}

/// One run of a scenario: shared setup, then a caller-driven loop of
/// measurement iterations.
///
/// Construction resolves the scenario's size and validates its checkpoint
/// markers, so a definition that could never measure the right interval is
/// rejected before anything reaches the executor. Phase hooks are
/// materialized once here; they are required to be deterministic, so the
/// engine replays the same actions every iteration.
pub struct Activation<'d> {
    definition: &'d ScenarioDefinition,
    ctx: ScenarioContext,
    shared: Vec<Action>,
    init: Vec<Action>,
    benchmark: Vec<Action>,
    plan: CheckpointPlan,
    state: LifecycleState,
    iterations: u32,
}

impl<'d> Activation<'d> {
    pub fn prepare(
        definition: &'d ScenarioDefinition,
        global_scale: Option<f64>,
        seed: u64,
    ) -> Result<Self, DefinitionError> {
        let sizing = definition.scale_model().resolve(global_scale)?;
        let ctx = definition.context(sizing, seed);

        let shared = definition.shared_actions(&ctx);
        let init = definition.init_actions(&ctx);
        let benchmark = definition.benchmark_actions(&ctx);

        reject_markers(definition.name(), Phase::Shared, &shared)?;
        reject_markers(definition.name(), Phase::Init, &init)?;
        let plan = checkpoint_plan(definition.name(), &benchmark)?;

        Ok(Self {
            definition,
            ctx,
            shared,
            init,
            benchmark,
            plan,
            state: LifecycleState::Created,
            iterations: 0,
        })
    }

    pub fn context(&self) -> &ScenarioContext {
        &self.ctx
    }

    /// Measurement iterations completed so far.
    pub fn iterations(&self) -> u32 {
        self.iterations
    }

    /// Execute the shared fixture actions. Runs at most once per activation;
    /// a failure leaves the scenario unable to measure.
    pub fn setup_shared<E: Executor, S: ServiceControl>(
        &mut self,
        executor: &mut E,
        services: &mut S,
    ) -> Result<(), ScenarioError> {
        assert_eq!(
            self.state,
            LifecycleState::Created,
            "shared fixture for '{}' was already set up",
            self.definition.name()
        );

        execute_phase(Phase::Shared, &self.shared, executor, services)?;
        self.state = LifecycleState::SharedReady;
        Ok(())
    }

    /// Run one measurement iteration: per-iteration setup, then the
    /// benchmark phase, returning the wall-clock span between the A and B
    /// checkpoints exactly as the executor observed them.
    pub fn measure<E: Executor, S: ServiceControl>(
        &mut self,
        executor: &mut E,
        services: &mut S,
    ) -> Result<Duration, ScenarioError> {
        assert!(
            !matches!(self.state, LifecycleState::Created | LifecycleState::Done),
            "scenario '{}' must run its shared phase before measuring",
            self.definition.name()
        );

        self.state = LifecycleState::PerIterationSetup;
        execute_phase(Phase::Init, &self.init, executor, services)?;

        self.state = LifecycleState::Benchmarking;
        let outcomes = execute_phase(Phase::Benchmark, &self.benchmark, executor, services)?;

        let observed = |action: usize, checkpoint: Checkpoint| {
            outcomes[action]
                .as_ref()
                .and_then(|outcome| outcome.observed(checkpoint))
                .ok_or(ScenarioError::Measurement {
                    phase: Phase::Benchmark,
                    index: action,
                    source: ExecutorError::CheckpointMissing { checkpoint },
                })
        };
        let started = observed(self.plan.a_action, Checkpoint::A)?;
        let finished = observed(self.plan.b_action, Checkpoint::B)?;

        let duration =
            finished
                .checked_sub(started)
                .ok_or(ScenarioError::Measurement {
                    phase: Phase::Benchmark,
                    index: self.plan.b_action,
                    source: ExecutorError::CheckpointRegression,
                })?;

        self.iterations += 1;
        Ok(duration)
    }

    /// End the activation. Further `measure` calls are a programming error.
    pub fn finish(&mut self) {
        self.state = LifecycleState::Done;
    }
}

fn execute_phase<E: Executor, S: ServiceControl>(
    phase: Phase,
    actions: &[Action],
    executor: &mut E,
    services: &mut S,
) -> Result<Vec<Option<ScriptOutcome>>, ScenarioError> {
    let mut outcomes = Vec::with_capacity(actions.len());

    for (index, action) in actions.iter().enumerate() {
        let result = match action {
            Action::Script(script) => executor.run_script(script).map(Some),
            Action::Generate(request) => executor.generate(request).map(|()| None),
            Action::Restart { target } => services.restart(target).map(|()| None),
        };

        match result {
            Ok(outcome) => outcomes.push(outcome),
            Err(ExecutorError::Unavailable { message }) => {
                return Err(ScenarioError::Unavailable { message })
            }
            Err(source) => {
                return Err(match phase {
                    Phase::Benchmark => ScenarioError::Measurement {
                        phase,
                        index,
                        source,
                    },
                    Phase::Shared | Phase::Init => ScenarioError::Setup {
                        phase,
                        index,
                        source,
                    },
                })
            }
        }
    }

    Ok(outcomes)
}

fn reject_markers(
    scenario: &str,
    phase: Phase,
    actions: &[Action],
) -> Result<(), DefinitionError> {
    if actions.iter().any(|action| !action.markers().is_empty()) {
        return Err(DefinitionError::MarkerOutsideBenchmark {
            scenario: scenario.to_string(),
            phase,
        });
    }
    Ok(())
}

fn checkpoint_plan(scenario: &str, actions: &[Action]) -> Result<CheckpointPlan, DefinitionError> {
    let mut a_hits = Vec::new();
    let mut b_hits = Vec::new();

    for (index, action) in actions.iter().enumerate() {
        for (checkpoint, offset) in action.markers() {
            match checkpoint {
                Checkpoint::A => a_hits.push((index, offset)),
                Checkpoint::B => b_hits.push((index, offset)),
            }
        }
    }

    let expect_one = |checkpoint: Checkpoint, hits: &[(usize, usize)]| match hits {
        [only] => Ok(*only),
        _ => Err(DefinitionError::MarkerCount {
            scenario: scenario.to_string(),
            checkpoint,
            found: hits.len(),
        }),
    };
    let a = expect_one(Checkpoint::A, &a_hits)?;
    let b = expect_one(Checkpoint::B, &b_hits)?;

    if a >= b {
        return Err(DefinitionError::MarkerOrder {
            scenario: scenario.to_string(),
        });
    }

    Ok(CheckpointPlan {
        a_action: a.0,
        b_action: b.0,
    })
}
