mod cli;
mod context;
mod definition;
mod driver;
mod engine;
mod executor;
mod init;
mod registry;
mod report;
mod run;

pub mod prelude {
    pub use crate::cli::HarnessCli;
    pub use crate::context::ScenarioContext;
    pub use crate::definition::{sweep, PhaseHook, ScenarioDefinition, ScenarioDefinitionBuilder};
    pub use crate::driver::{PipeExecutor, ShellServiceControl};
    pub use crate::engine::{Activation, ScenarioError};
    pub use crate::executor::{Executor, ExecutorError, ScriptOutcome, ServiceControl};
    pub use crate::init::init;
    pub use crate::registry::{ScenarioRegistry, Selection, SelectionError};
    pub use crate::report::{Measurement, RunReport, ScenarioResult};
    pub use crate::run::{run_benchmarks, RunConfig, RunError};

    pub use time_trial_core::prelude::*;
}
