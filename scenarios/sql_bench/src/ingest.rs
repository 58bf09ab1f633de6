//! Ingestion benchmarks fed by the external bulk-data generator.

use time_trial_runner::prelude::*;

pub fn scenarios() -> anyhow::Result<Vec<ScenarioDefinition>> {
    let mut defs = vec![ScenarioDefinitionBuilder::new("ingest_upsert_unique")
        .use_shared(upsert_unique_shared)
        .use_benchmark(upsert_unique_benchmark)
        .build()?];

    // The same workload across several decades of record counts. Only a
    // constant-memory view is maintained over the source, so the large family
    // members stay ingestion-bound rather than memory-bound.
    defs.extend(sweep(
        "ingest_bytes",
        &[5.0, 6.0, 7.0, 8.0],
        |builder| {
            builder
                .use_shared(ingest_bytes_shared)
                .use_benchmark(ingest_bytes_benchmark)
        },
    )?);

    Ok(defs)
}

fn ingest_bytes_shared(ctx: &ScenarioContext) -> Vec<Action> {
    vec![
        Action::script(format!(
            "$ stream-create name={target} partitions=8\n",
            target = ctx.name(),
        )),
        Action::Generate(GeneratorRequest {
            target: ctx.name().to_string(),
            keys: KeySpec::Sequential,
            payload: PayloadBounds::exact(100),
            count: ctx.n(),
        }),
    ]
}

fn ingest_bytes_benchmark(ctx: &ScenarioContext) -> Vec<Action> {
    vec![Action::script(format!(
        "> DROP SOURCE IF EXISTS s1 CASCADE;

> CREATE SOURCE s1 FROM STREAM '{target}' FORMAT BYTES ENVELOPE NONE
  /* A */

> CREATE MATERIALIZED VIEW v1 AS SELECT COUNT(*) AS c FROM s1;

> SELECT c = {n} FROM v1
  /* B */
true
",
        target = ctx.name(),
        n = ctx.n(),
    ))]
}

fn upsert_unique_shared(ctx: &ScenarioContext) -> Vec<Action> {
    vec![
        Action::script(format!(
            "$ stream-create name={target} partitions=16\n",
            target = ctx.name(),
        )),
        Action::Generate(GeneratorRequest {
            target: ctx.name().to_string(),
            keys: KeySpec::Sequential,
            payload: PayloadBounds::exact(32),
            count: ctx.n(),
        }),
    ]
}

fn upsert_unique_benchmark(ctx: &ScenarioContext) -> Vec<Action> {
    vec![Action::script(format!(
        "> DROP SOURCE IF EXISTS s1 CASCADE;

> CREATE SOURCE s1 FROM STREAM '{target}'
  KEY FORMAT BYTES
  VALUE FORMAT BYTES
  ENVELOPE UPSERT
  /* A */

> SELECT COUNT(*) FROM s1;
  /* B */
{n}
",
        target = ctx.name(),
        n = ctx.n(),
    ))]
}
