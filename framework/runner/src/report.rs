use std::path::Path;
use std::time::Duration;

use serde::Serialize;
use tabled::settings::Style;
use tabled::{Table, Tabled};

use time_trial_core::prelude::ScenarioVersion;

use crate::definition::ScenarioDefinition;

/// One retained measurement: the wall-clock span between the A and B
/// checkpoints of one benchmark iteration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Measurement {
    pub iteration: u32,
    pub duration: Duration,
}

/// Everything one scenario produced in a run.
#[derive(Debug, Clone, Serialize)]
pub struct ScenarioResult {
    pub scenario: String,
    pub version: ScenarioVersion,
    pub scale: f64,
    pub count: u64,
    pub measurements: Vec<Measurement>,
    /// Diagnostics for iterations whose measurement was discarded.
    pub discarded: Vec<String>,
    /// A scenario-fatal diagnostic: definition rejected or shared setup
    /// failed. `Some` implies `measurements` is empty.
    pub error: Option<String>,
}

impl ScenarioResult {
    pub(crate) fn new(definition: &ScenarioDefinition) -> Self {
        Self {
            scenario: definition.name().to_string(),
            version: definition.version(),
            scale: definition.scale_model().declared(),
            count: 0,
            measurements: Vec::new(),
            discarded: Vec::new(),
            error: None,
        }
    }

    /// The headline aggregate: the fastest retained iteration.
    pub fn min_duration(&self) -> Option<Duration> {
        self.measurements.iter().map(|m| m.duration).min()
    }

    pub fn max_duration(&self) -> Option<Duration> {
        self.measurements.iter().map(|m| m.duration).max()
    }
}

/// The collected output of one harness invocation.
#[derive(Debug, Serialize)]
pub struct RunReport {
    /// Unique id for this run, chosen by the runner.
    pub run_id: String,
    /// Unix timestamp in seconds.
    pub started_at: i64,
    pub results: Vec<ScenarioResult>,
}

impl RunReport {
    pub(crate) fn new() -> Self {
        Self {
            run_id: nanoid::nanoid!(),
            started_at: chrono::Utc::now().timestamp(),
            results: Vec::new(),
        }
    }

    /// Print the per-scenario summary table to stdout.
    pub fn print_summary(&self) {
        println!("\nRun {} summary", self.run_id);
        let rows: Vec<SummaryRow> = self.results.iter().map(SummaryRow::from).collect();
        let mut table = Table::new(&rows);
        table.with(Style::modern());
        println!("{}", table);
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    pub fn save(&self, path: impl AsRef<Path>) -> anyhow::Result<()> {
        let json = self.to_json()?;
        std::fs::write(path.as_ref(), json)?;
        Ok(())
    }
}

#[derive(Tabled)]
struct SummaryRow {
    scenario: String,
    version: String,
    scale: f64,
    n: u64,
    measured: String,
    min_ms: String,
    max_ms: String,
    status: String,
}

impl From<&ScenarioResult> for SummaryRow {
    fn from(result: &ScenarioResult) -> Self {
        let requested = result.measurements.len() + result.discarded.len();
        Self {
            scenario: result.scenario.clone(),
            version: result.version.to_string(),
            scale: result.scale,
            n: result.count,
            measured: format!("{}/{}", result.measurements.len(), requested),
            min_ms: float2(millis(result.min_duration())),
            max_ms: float2(millis(result.max_duration())),
            status: result.error.clone().unwrap_or_else(|| "ok".to_string()),
        }
    }
}

fn millis(duration: Option<Duration>) -> f64 {
    duration.map(|d| d.as_micros() as f64 / 1000.0).unwrap_or(0.0)
}

fn float2(n: f64) -> String {
    format!("{:.2}", n)
}
