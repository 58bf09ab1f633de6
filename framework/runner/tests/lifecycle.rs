mod common;

use std::time::Duration;

use common::{outcome, FakeExecutor, FakeServices};
use pretty_assertions::assert_eq;
use time_trial_runner::prelude::{
    run_benchmarks, Action, Activation, Checkpoint, DefinitionError, ExecutorError, Phase,
    RunConfig, RunError, ScenarioContext, ScenarioDefinition, ScenarioDefinitionBuilder,
    ScenarioError, ScenarioRegistry,
};

fn fixture_shared(ctx: &ScenarioContext) -> Vec<Action> {
    vec![ctx.table_fixture()]
}

fn reset_init(_ctx: &ScenarioContext) -> Vec<Action> {
    vec![Action::script("> DROP TABLE IF EXISTS t1;\n> CREATE TABLE t1 (f1 INTEGER);\n")]
}

fn marked_benchmark(_ctx: &ScenarioContext) -> Vec<Action> {
    vec![Action::script(
        "> SELECT 1\n  /* A */\n1\n\n> SELECT COUNT(*) FROM t1\n  /* B */\n0\n",
    )]
}

fn unmarked_benchmark(_ctx: &ScenarioContext) -> Vec<Action> {
    vec![Action::script("> SELECT 1\n1\n")]
}

fn double_a_benchmark(_ctx: &ScenarioContext) -> Vec<Action> {
    vec![Action::script(
        "> SELECT 1\n  /* A */\n1\n> SELECT 2\n  /* A */\n2\n> SELECT 3\n  /* B */\n3\n",
    )]
}

fn reversed_benchmark(_ctx: &ScenarioContext) -> Vec<Action> {
    vec![Action::script(
        "> SELECT 1\n  /* B */\n1\n\n> SELECT 2\n  /* A */\n2\n",
    )]
}

fn marked_init(_ctx: &ScenarioContext) -> Vec<Action> {
    vec![Action::script("> SELECT 1\n  /* A */\n1\n")]
}

fn split_restart_benchmark(_ctx: &ScenarioContext) -> Vec<Action> {
    vec![
        Action::script("> SELECT 1\n  /* A */\n1\n"),
        Action::restart("server"),
        Action::script("> SELECT 1\n  /* B */\n1\n"),
    ]
}

fn scenario(name: &str, benchmark: fn(&ScenarioContext) -> Vec<Action>) -> ScenarioDefinition {
    ScenarioDefinitionBuilder::new(name)
        .with_scale(1.0)
        .use_shared(fixture_shared)
        .use_init(reset_init)
        .use_benchmark(benchmark)
        .build()
        .unwrap()
}

fn single_scenario_registry(def: ScenarioDefinition) -> ScenarioRegistry {
    let mut registry = ScenarioRegistry::default();
    registry.register(def);
    registry
}

#[test]
fn missing_markers_are_rejected_before_any_execution() {
    let def = scenario("unmarked", unmarked_benchmark);
    let result = Activation::prepare(&def, None, 1);
    assert!(matches!(
        result,
        Err(DefinitionError::MarkerCount {
            checkpoint: Checkpoint::A,
            found: 0,
            ..
        })
    ));
}

#[test]
fn duplicate_markers_are_rejected() {
    let def = scenario("double_a", double_a_benchmark);
    assert!(matches!(
        Activation::prepare(&def, None, 1),
        Err(DefinitionError::MarkerCount {
            checkpoint: Checkpoint::A,
            found: 2,
            ..
        })
    ));
}

#[test]
fn reversed_markers_are_rejected() {
    let def = scenario("reversed", reversed_benchmark);
    assert!(matches!(
        Activation::prepare(&def, None, 1),
        Err(DefinitionError::MarkerOrder { .. })
    ));
}

#[test]
fn markers_outside_the_benchmark_phase_are_rejected() {
    let def = ScenarioDefinitionBuilder::new("marked_init")
        .with_scale(1.0)
        .use_init(marked_init)
        .use_benchmark(marked_benchmark)
        .build()
        .unwrap();
    assert!(matches!(
        Activation::prepare(&def, None, 1),
        Err(DefinitionError::MarkerOutsideBenchmark {
            phase: Phase::Init,
            ..
        })
    ));
}

#[test]
fn rejected_definitions_never_reach_the_executor() {
    let def = scenario("unmarked", unmarked_benchmark);
    let registry = single_scenario_registry(def);
    let mut executor = FakeExecutor::new();
    let mut services = FakeServices::new();

    let report = run_benchmarks(
        &registry,
        &RunConfig::default(),
        &mut executor,
        &mut services,
    )
    .unwrap();

    assert_eq!(executor.log, Vec::<String>::new());
    assert!(report.results[0].error.is_some());
    assert_eq!(report.results[0].measurements.len(), 0);
}

#[test]
fn duration_is_exactly_b_minus_a() {
    let def = scenario("exact", marked_benchmark);
    let mut activation = Activation::prepare(&def, None, 1).unwrap();
    let mut executor = FakeExecutor::new();
    let mut services = FakeServices::new();

    activation.setup_shared(&mut executor, &mut services).unwrap();

    // Shared ran, init has not: queue outcomes for init then benchmark.
    executor.enqueue_script_result(Ok(outcome(&[])));
    executor.enqueue_script_result(Ok(outcome(&[
        (Checkpoint::A, 2_000),
        (Checkpoint::B, 2_750),
    ])));

    let duration = activation.measure(&mut executor, &mut services).unwrap();
    assert_eq!(duration, Duration::from_millis(750));
}

#[test]
fn shared_runs_once_while_init_and_benchmark_repeat() {
    let def = scenario("repeat", marked_benchmark);
    let registry = single_scenario_registry(def);
    let mut executor = FakeExecutor::new();
    let mut services = FakeServices::new();

    let config = RunConfig {
        iterations: 3,
        ..RunConfig::default()
    };
    let report = run_benchmarks(&registry, &config, &mut executor, &mut services).unwrap();

    let shared_runs = executor
        .log
        .iter()
        .filter(|entry| entry.contains("CREATE TABLE ten"))
        .count();
    let init_runs = executor
        .log
        .iter()
        .filter(|entry| entry.contains("DROP TABLE IF EXISTS t1"))
        .count();
    assert_eq!(shared_runs, 1);
    assert_eq!(init_runs, 3);
    assert_eq!(report.results[0].measurements.len(), 3);
}

#[test]
fn shared_failure_is_scenario_fatal_with_zero_measurements() {
    let def = scenario("shared_fails", marked_benchmark);
    let registry = single_scenario_registry(def);
    let mut executor = FakeExecutor::new();
    let mut services = FakeServices::new();

    executor.enqueue_script_result(Err(ExecutorError::Statement {
        offset: 2,
        message: "table already exists".to_string(),
    }));

    let report = run_benchmarks(
        &registry,
        &RunConfig::default(),
        &mut executor,
        &mut services,
    )
    .unwrap();

    let result = &report.results[0];
    assert_eq!(result.measurements.len(), 0);
    assert_eq!(result.discarded.len(), 0);
    let error = result.error.as_deref().unwrap();
    assert!(error.contains("shared"), "error must name the phase: {error}");
    // Only the failing shared script ran; no iteration was attempted.
    assert_eq!(executor.executed_scripts(), 1);
}

#[test]
fn discarded_iterations_are_reported_but_never_recorded() {
    let def = scenario("flaky", marked_benchmark);
    let registry = single_scenario_registry(def);
    let mut executor = FakeExecutor::new();
    let mut services = FakeServices::new();

    // First iteration: init succeeds, benchmark fails.
    executor.enqueue_script_result(Ok(outcome(&[]))); // shared
    executor.enqueue_script_result(Ok(outcome(&[]))); // init 0
    executor.enqueue_script_result(Err(ExecutorError::Statement {
        offset: 40,
        message: "division by zero".to_string(),
    }));

    let config = RunConfig {
        iterations: 3,
        ..RunConfig::default()
    };
    let report = run_benchmarks(&registry, &config, &mut executor, &mut services).unwrap();

    let result = &report.results[0];
    assert_eq!(result.measurements.len(), 2);
    assert_eq!(result.discarded.len(), 1);
    assert!(result.discarded[0].contains("benchmark"));
    assert!(result.error.is_none());
    // A discarded iteration never shows up as a zero-length measurement.
    assert!(result
        .measurements
        .iter()
        .all(|m| m.duration > Duration::ZERO));
}

#[test]
fn missing_checkpoint_discards_the_measurement() {
    let def = scenario("half_observed", marked_benchmark);
    let mut activation = Activation::prepare(&def, None, 1).unwrap();
    let mut executor = FakeExecutor::new();
    let mut services = FakeServices::new();

    activation.setup_shared(&mut executor, &mut services).unwrap();
    executor.enqueue_script_result(Ok(outcome(&[]))); // init
    executor.enqueue_script_result(Ok(outcome(&[(Checkpoint::A, 10)])));

    let result = activation.measure(&mut executor, &mut services);
    assert!(matches!(
        result,
        Err(ScenarioError::Measurement {
            source: ExecutorError::CheckpointMissing {
                checkpoint: Checkpoint::B
            },
            ..
        })
    ));
}

#[test]
fn regressed_checkpoints_discard_the_measurement() {
    let def = scenario("regressed", marked_benchmark);
    let mut activation = Activation::prepare(&def, None, 1).unwrap();
    let mut executor = FakeExecutor::new();
    let mut services = FakeServices::new();

    activation.setup_shared(&mut executor, &mut services).unwrap();
    executor.enqueue_script_result(Ok(outcome(&[]))); // init
    executor.enqueue_script_result(Ok(outcome(&[
        (Checkpoint::A, 500),
        (Checkpoint::B, 100),
    ])));

    assert!(matches!(
        activation.measure(&mut executor, &mut services),
        Err(ScenarioError::Measurement {
            source: ExecutorError::CheckpointRegression,
            ..
        })
    ));
}

#[test]
fn unavailable_executor_aborts_the_whole_run() {
    let mut registry = ScenarioRegistry::default();
    registry.register(scenario("first", marked_benchmark));
    registry.register(scenario("second", marked_benchmark));
    let mut executor = FakeExecutor::new();
    let mut services = FakeServices::new();

    executor.enqueue_script_result(Ok(outcome(&[]))); // first: shared
    executor.enqueue_script_result(Err(ExecutorError::Unavailable {
        message: "connection refused".to_string(),
    }));

    let result = run_benchmarks(
        &registry,
        &RunConfig {
            iterations: 1,
            ..RunConfig::default()
        },
        &mut executor,
        &mut services,
    );

    assert!(matches!(
        result,
        Err(RunError::Aborted { scenario, .. }) if scenario == "first"
    ));
    // Only the first scenario's shared and init scripts ran; the second
    // scenario never started.
    assert_eq!(executor.executed_scripts(), 2);
}

#[test]
fn markers_may_straddle_a_restart_callback() {
    let def = ScenarioDefinitionBuilder::new("restart_split")
        .with_scale(1.0)
        .use_benchmark(split_restart_benchmark)
        .build()
        .unwrap();
    let mut activation = Activation::prepare(&def, None, 1).unwrap();
    let mut executor = FakeExecutor::new();
    let mut services = FakeServices::new();

    activation.setup_shared(&mut executor, &mut services).unwrap();
    executor.enqueue_script_result(Ok(outcome(&[(Checkpoint::A, 1_000)])));
    executor.enqueue_script_result(Ok(outcome(&[(Checkpoint::B, 9_500)])));

    let duration = activation.measure(&mut executor, &mut services).unwrap();
    assert_eq!(duration, Duration::from_millis(8_500));
    assert_eq!(services.restarts, vec!["server".to_string()]);
}

#[test]
fn failed_restart_surfaces_with_its_action_index() {
    let def = ScenarioDefinitionBuilder::new("restart_fails")
        .with_scale(1.0)
        .use_benchmark(split_restart_benchmark)
        .build()
        .unwrap();
    let mut activation = Activation::prepare(&def, None, 1).unwrap();
    let mut executor = FakeExecutor::new();
    let mut services = FakeServices::new();
    services.fail_with = Some("no such container".to_string());

    activation.setup_shared(&mut executor, &mut services).unwrap();

    let result = activation.measure(&mut executor, &mut services);
    assert!(matches!(
        result,
        Err(ScenarioError::Measurement {
            phase: Phase::Benchmark,
            index: 1,
            source: ExecutorError::Restart { .. },
        })
    ));
}

#[test]
fn fixed_scale_scenarios_ignore_the_global_override() {
    fn sized_benchmark(ctx: &ScenarioContext) -> Vec<Action> {
        vec![Action::script(format!(
            "> SELECT {}\n  /* A */\n\n> SELECT 1\n  /* B */\n1\n",
            ctx.n()
        ))]
    }

    let fixed = ScenarioDefinitionBuilder::new("fixed")
        .with_fixed_scale(2.0)
        .use_benchmark(sized_benchmark)
        .build()
        .unwrap();
    let activation = Activation::prepare(&fixed, Some(4.0), 1).unwrap();
    assert_eq!(activation.context().n(), 100);

    let unfixed = ScenarioDefinitionBuilder::new("unfixed")
        .with_scale(2.0)
        .use_benchmark(sized_benchmark)
        .build()
        .unwrap();
    let activation = Activation::prepare(&unfixed, Some(4.0), 1).unwrap();
    assert_eq!(activation.context().n(), 10_000);
}

#[test]
fn non_positive_resolved_counts_fail_at_preparation() {
    let def = ScenarioDefinitionBuilder::new("undersized")
        .with_scale(-2.0)
        .use_benchmark(marked_benchmark)
        .build()
        .unwrap();
    assert!(matches!(
        Activation::prepare(&def, None, 1),
        Err(DefinitionError::NonPositiveCount { .. })
    ));
}
