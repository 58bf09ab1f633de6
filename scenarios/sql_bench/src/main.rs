use anyhow::Context;
use time_trial_runner::prelude::*;

mod dataflow;
mod dml;
mod fast_path;
mod ingest;
mod restart;

fn main() -> anyhow::Result<()> {
    let cli = init();

    let mut registry = ScenarioRegistry::default();
    registry.register_all(fast_path::scenarios()?);
    registry.register_all(dml::scenarios()?);
    registry.register_all(dataflow::scenarios()?);
    registry.register_all(ingest::scenarios()?);
    registry.register_all(restart::scenarios()?);

    if cli.list {
        for def in registry.entries() {
            println!(
                "{} v{} (scale {}{}{})",
                def.name(),
                def.version(),
                def.scale_model().declared(),
                if def.scale_model().is_fixed() {
                    ", fixed"
                } else {
                    ""
                },
                if def.enabled() { "" } else { ", disabled" },
            );
        }
        return Ok(());
    }

    let driver = cli
        .driver
        .as_deref()
        .context("--driver is required to run scenarios")?;
    let mut executor = PipeExecutor::new(driver, cli.generator.as_deref());
    let mut services = ShellServiceControl::new(cli.restart.as_deref());

    let config = RunConfig {
        selection: cli.selection(),
        iterations: cli.iterations,
        scale_override: cli.scale,
        seed: cli.seed,
    };

    let report = run_benchmarks(&registry, &config, &mut executor, &mut services)?;
    report.print_summary();

    if let Some(path) = &cli.report {
        report
            .save(path)
            .with_context(|| format!("failed to write report to {}", path.display()))?;
        log::info!("Report written to {}", path.display());
    }

    Ok(())
}
