use time_trial_core::prelude::{
    Action, DefinitionError, ScaleModel, ScenarioVersion, Sizing,
};

use crate::context::ScenarioContext;

/// A phase hook: given the activation context, emit the phase's actions.
///
/// Hooks must be deterministic in the context — the engine is free to
/// materialize a phase once and replay its actions each iteration.
pub type PhaseHook = fn(&ScenarioContext) -> Vec<Action>;

/// The builder for a scenario definition.
///
/// This is the authoring surface: a scenario is a name, a scale declaration,
/// advisory version metadata, and up to three phase hooks. Only the benchmark
/// hook is required; the others default to no-op phases.
pub struct ScenarioDefinitionBuilder {
    name: String,
    scale: ScaleModel,
    version: ScenarioVersion,
    enabled: bool,
    shared_fn: Option<PhaseHook>,
    init_fn: Option<PhaseHook>,
    benchmark_fn: Option<PhaseHook>,
}

impl ScenarioDefinitionBuilder {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            scale: ScaleModel::default(),
            version: ScenarioVersion::default(),
            enabled: true,
            shared_fn: None,
            init_fn: None,
            benchmark_fn: None,
        }
    }

    /// Declare the scenario's scale. Still subject to a global override.
    pub fn with_scale(mut self, scale: f64) -> Self {
        self.scale = ScaleModel::new(scale);
        self
    }

    /// Declare a scale that a global override must not touch, for scenarios
    /// that cannot survive being scaled up.
    pub fn with_fixed_scale(mut self, scale: f64) -> Self {
        self.scale = ScaleModel::fixed(scale);
        self
    }

    pub fn with_version(mut self, major: u32, minor: u32, patch: u32) -> Self {
        self.version = ScenarioVersion::create(major, minor, patch);
        self
    }

    /// Exclude this scenario from "run everything" selections. It stays
    /// registered and can still be run by naming it explicitly.
    pub fn disabled(mut self) -> Self {
        self.enabled = false;
        self
    }

    /// Set the shared fixture hook, run once per activation.
    pub fn use_shared(mut self, hook: PhaseHook) -> Self {
        self.shared_fn = Some(hook);
        self
    }

    /// Set the per-iteration setup hook, run before every measurement. This
    /// is the place for destructive resets when results are sensitive to
    /// state left over from the previous iteration.
    pub fn use_init(mut self, hook: PhaseHook) -> Self {
        self.init_fn = Some(hook);
        self
    }

    /// Set the measured hook. Its scripts must carry exactly one ordered
    /// A/B checkpoint pair between them.
    pub fn use_benchmark(mut self, hook: PhaseHook) -> Self {
        self.benchmark_fn = Some(hook);
        self
    }

    pub fn build(self) -> Result<ScenarioDefinition, DefinitionError> {
        let benchmark_fn = self
            .benchmark_fn
            .ok_or(DefinitionError::MissingBenchmark {
                scenario: self.name.clone(),
            })?;

        Ok(ScenarioDefinition {
            name: self.name,
            scale: self.scale,
            version: self.version,
            enabled: self.enabled,
            shared_fn: self.shared_fn,
            init_fn: self.init_fn,
            benchmark_fn,
        })
    }
}

/// A fully-formed scenario as held by the registry.
#[derive(Debug, Clone)]
pub struct ScenarioDefinition {
    name: String,
    scale: ScaleModel,
    version: ScenarioVersion,
    enabled: bool,
    shared_fn: Option<PhaseHook>,
    init_fn: Option<PhaseHook>,
    benchmark_fn: PhaseHook,
}

impl ScenarioDefinition {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn scale_model(&self) -> ScaleModel {
        self.scale
    }

    pub fn version(&self) -> ScenarioVersion {
        self.version
    }

    pub fn enabled(&self) -> bool {
        self.enabled
    }

    pub(crate) fn context(&self, sizing: Sizing, seed: u64) -> ScenarioContext {
        ScenarioContext::new(&self.name, sizing, seed)
    }

    pub(crate) fn shared_actions(&self, ctx: &ScenarioContext) -> Vec<Action> {
        self.shared_fn.map(|hook| hook(ctx)).unwrap_or_default()
    }

    pub(crate) fn init_actions(&self, ctx: &ScenarioContext) -> Vec<Action> {
        self.init_fn.map(|hook| hook(ctx)).unwrap_or_default()
    }

    pub(crate) fn benchmark_actions(&self, ctx: &ScenarioContext) -> Vec<Action> {
        (self.benchmark_fn)(ctx)
    }
}

/// Expand a scale sweep into one independently named definition per scale.
///
/// Each entry is named `{base_name}_scale_{scale}` and registered on its own,
/// so a single member of the family can be selected or disabled without
/// touching its siblings.
pub fn sweep(
    base_name: &str,
    scales: &[f64],
    configure: fn(ScenarioDefinitionBuilder) -> ScenarioDefinitionBuilder,
) -> Result<Vec<ScenarioDefinition>, DefinitionError> {
    scales
        .iter()
        .map(|scale| {
            let name = format!("{base_name}_scale_{}", scale_suffix(*scale));
            configure(ScenarioDefinitionBuilder::new(&name).with_scale(*scale)).build()
        })
        .collect()
}

fn scale_suffix(scale: f64) -> String {
    if scale.fract() == 0.0 {
        format!("{}", scale as i64)
    } else {
        format!("{scale}").replace('.', "_")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn marked(_ctx: &ScenarioContext) -> Vec<Action> {
        vec![Action::script("> SELECT 1\n  /* A */\n1\n  /* B */\n")]
    }

    #[test]
    fn a_benchmark_hook_is_required() {
        let result = ScenarioDefinitionBuilder::new("incomplete").build();
        assert!(matches!(
            result,
            Err(DefinitionError::MissingBenchmark { scenario }) if scenario == "incomplete"
        ));
    }

    #[test]
    fn defaults_are_enabled_version_one_scale_six() {
        let def = ScenarioDefinitionBuilder::new("plain")
            .use_benchmark(marked)
            .build()
            .unwrap();
        assert!(def.enabled());
        assert_eq!(def.version().to_string(), "1.0.0");
        assert_eq!(def.scale_model().declared(), 6.0);
        assert!(!def.scale_model().is_fixed());
    }

    #[test]
    fn sweep_names_each_scale_independently() {
        let family = sweep("ingest_bytes", &[5.0, 6.0, 1.5], |builder| {
            builder.use_benchmark(marked)
        })
        .unwrap();
        let names: Vec<&str> = family.iter().map(|def| def.name()).collect();
        assert_eq!(
            names,
            vec![
                "ingest_bytes_scale_5",
                "ingest_bytes_scale_6",
                "ingest_bytes_scale_1_5"
            ]
        );
        assert_eq!(family[0].scale_model().declared(), 5.0);
        assert_eq!(family[2].scale_model().declared(), 1.5);
    }
}
