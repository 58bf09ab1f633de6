use std::path::PathBuf;

use clap::Parser;

use crate::registry::Selection;

#[derive(Parser, Debug)]
#[command(about, long_about = None)]
pub struct HarnessCli {
    /// A scenario name to run. Repeat the flag to run several, in the given
    /// order. Every enabled scenario runs when no name is given.
    ///
    /// Naming a disabled scenario explicitly runs it anyway, which is the
    /// intended way to debug one.
    #[clap(long, short)]
    pub scenario: Vec<String>,

    /// Measurement iterations per scenario.
    #[clap(long, default_value = "6")]
    pub iterations: u32,

    /// Override the declared scale of every scenario that is not fixed-scale.
    #[clap(long)]
    pub scale: Option<f64>,

    /// Seed for pseudo-random statement content. Sizing never depends on it.
    #[clap(long, default_value = "1")]
    pub seed: u64,

    /// Shell command launched once per script; receives the script on stdin
    /// and reports `!checkpoint` / `!error` lines on stdout. Required unless
    /// only listing scenarios.
    #[clap(long)]
    pub driver: Option<String>,

    /// Shell command for bulk data generation; parameters arrive in `GEN_*`
    /// environment variables.
    #[clap(long)]
    pub generator: Option<String>,

    /// Shell command for restarting a service; the target name arrives in
    /// `RESTART_TARGET`.
    #[clap(long)]
    pub restart: Option<String>,

    /// List registered scenarios and exit without running anything.
    #[clap(long, default_value = "false")]
    pub list: bool,

    /// Write the run report as JSON to this path.
    #[clap(long)]
    pub report: Option<PathBuf>,
}

impl HarnessCli {
    pub fn selection(&self) -> Selection {
        if self.scenario.is_empty() {
            Selection::All
        } else {
            Selection::Names(self.scenario.clone())
        }
    }
}
