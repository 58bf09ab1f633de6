//! Benchmarks that measure recovery after a service restart.

use time_trial_runner::prelude::*;

/// End-of-stream markers ingested after the primary data; recovery is
/// complete once all of them are visible again. The count is high enough to
/// land one in every partition even if the partition count grows.
const EOF_MARKERS: u64 = 256;

pub fn scenarios() -> anyhow::Result<Vec<ScenarioDefinition>> {
    Ok(vec![
        ScenarioDefinitionBuilder::new("restart_empty")
            .use_benchmark(restart_empty_benchmark)
            .build()?,
        // With persistent sources nothing is re-ingested on restart, which
        // leaves this measuring little beyond COUNT(*) speed with extreme
        // variability. Kept selectable by name for manual investigation.
        ScenarioDefinitionBuilder::new("restart_with_source")
            .with_scale(5.0)
            .with_version(1, 1, 0)
            .disabled()
            .use_shared(restart_with_source_shared)
            .use_init(restart_with_source_init)
            .use_benchmark(restart_with_source_benchmark)
            .build()?,
    ])
}

fn restart_empty_benchmark(_ctx: &ScenarioContext) -> Vec<Action> {
    vec![
        Action::script(
            "> SELECT 1
  /* A */
1
",
        ),
        Action::restart("server"),
        Action::script(
            "> SELECT 1
  /* B */
1
",
        ),
    ]
}

fn restart_with_source_shared(ctx: &ScenarioContext) -> Vec<Action> {
    vec![
        Action::script(format!(
            "$ stream-create name={target} partitions=8\n",
            target = ctx.name(),
        )),
        Action::Generate(GeneratorRequest {
            target: ctx.name().to_string(),
            keys: KeySpec::Random {
                min: EOF_MARKERS,
                max: EOF_MARKERS + ctx.n().saturating_mul(ctx.n()),
            },
            payload: PayloadBounds::exact(32),
            count: ctx.n(),
        }),
        // EOF markers with keys below every data key.
        Action::Generate(GeneratorRequest {
            target: ctx.name().to_string(),
            keys: KeySpec::Sequential,
            payload: PayloadBounds::exact(32),
            count: EOF_MARKERS,
        }),
    ]
}

fn restart_with_source_init(ctx: &ScenarioContext) -> Vec<Action> {
    vec![Action::script(format!(
        "> DROP SOURCE IF EXISTS s1 CASCADE;

> CREATE SOURCE s1 FROM STREAM '{target}'
  KEY FORMAT BYTES
  VALUE FORMAT BYTES
  ENVELOPE UPSERT;

# Recovery is observed through the EOF markers, not the full record count,
# so no dataflow has to hold the whole topic in memory.
> CREATE MATERIALIZED VIEW s1_is_complete AS
  SELECT COUNT(*) = {eof} FROM s1 WHERE key <= '\\x00000000000000ff';

> SELECT * FROM s1_is_complete;
true
",
        target = ctx.name(),
        eof = EOF_MARKERS,
    ))]
}

fn restart_with_source_benchmark(_ctx: &ScenarioContext) -> Vec<Action> {
    vec![
        Action::script(
            "> SELECT * FROM s1_is_complete
  /* A */
true
",
        ),
        Action::restart("server"),
        Action::script(
            "> SELECT * FROM s1_is_complete
  /* B */
true
",
        ),
    ]
}
