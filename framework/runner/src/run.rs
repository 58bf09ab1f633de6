use crate::engine::{Activation, ScenarioError};
use crate::executor::{Executor, ServiceControl};
use crate::registry::{ScenarioRegistry, Selection, SelectionError};
use crate::report::{Measurement, RunReport, ScenarioResult};

/// Caller policy for one harness invocation.
#[derive(Debug, Clone)]
pub struct RunConfig {
    pub selection: Selection,
    /// Measurement iterations per scenario activation.
    pub iterations: u32,
    /// Global scale override; ignored by fixed-scale scenarios.
    pub scale_override: Option<f64>,
    /// Seed for pseudo-random statement content. Never affects sizing.
    pub seed: u64,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            selection: Selection::All,
            iterations: 6,
            scale_override: None,
            seed: 1,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum RunError {
    #[error(transparent)]
    Selection(#[from] SelectionError),

    /// The external system became unreachable; the run cannot continue.
    #[error("run aborted during scenario '{scenario}': {source}")]
    Aborted {
        scenario: String,
        source: ScenarioError,
    },
}

/// Activate every selected scenario in order and collect its measurements.
///
/// Error policy per the harness taxonomy: definition and setup failures are
/// scenario-local (recorded, remaining scenarios continue); a discarded
/// measurement moves on to the next iteration; an unavailable executor aborts
/// the whole run.
pub fn run_benchmarks<E: Executor, S: ServiceControl>(
    registry: &ScenarioRegistry,
    config: &RunConfig,
    executor: &mut E,
    services: &mut S,
) -> Result<RunReport, RunError> {
    let selected = registry.select(&config.selection)?;
    let mut report = RunReport::new();

    for definition in selected {
        log::info!("Running scenario: {}", definition.name());
        let mut result = ScenarioResult::new(definition);

        let mut activation =
            match Activation::prepare(definition, config.scale_override, config.seed) {
                Ok(activation) => activation,
                Err(e) => {
                    log::error!("Scenario {} rejected: {}", definition.name(), e);
                    result.error = Some(e.to_string());
                    report.results.push(result);
                    continue;
                }
            };
        result.scale = activation.context().scale();
        result.count = activation.context().n();

        match activation.setup_shared(executor, services) {
            Ok(()) => {}
            Err(e @ ScenarioError::Unavailable { .. }) => {
                return Err(RunError::Aborted {
                    scenario: definition.name().to_string(),
                    source: e,
                });
            }
            Err(e) => {
                log::error!("Scenario {} setup failed: {}", definition.name(), e);
                result.error = Some(e.to_string());
                report.results.push(result);
                continue;
            }
        }

        for iteration in 0..config.iterations {
            match activation.measure(executor, services) {
                Ok(duration) => result.measurements.push(Measurement {
                    iteration,
                    duration,
                }),
                Err(e @ ScenarioError::Unavailable { .. }) => {
                    return Err(RunError::Aborted {
                        scenario: definition.name().to_string(),
                        source: e,
                    });
                }
                Err(e) => {
                    log::warn!(
                        "Scenario {} iteration {} discarded: {}",
                        definition.name(),
                        iteration,
                        e
                    );
                    result.discarded.push(e.to_string());
                }
            }
        }

        activation.finish();
        report.results.push(result);
    }

    Ok(report)
}
