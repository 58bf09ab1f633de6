//! Benchmarks around the performance of DML statements.

use rand::Rng;
use time_trial_runner::prelude::*;

pub fn scenarios() -> anyhow::Result<Vec<ScenarioDefinition>> {
    Ok(vec![
        ScenarioDefinitionBuilder::new("insert")
            .use_shared(fixture_only_shared)
            .use_benchmark(insert_benchmark)
            .build()?,
        ScenarioDefinitionBuilder::new("insert_and_select")
            .use_shared(fixture_only_shared)
            .use_benchmark(insert_and_select_benchmark)
            .build()?,
        ScenarioDefinitionBuilder::new("insert_batch")
            .with_scale(4.0)
            .use_benchmark(insert_batch_benchmark)
            .build()?,
        // Goes out of memory at the default scale.
        ScenarioDefinitionBuilder::new("many_small_inserts")
            .with_scale(3.0)
            .with_version(1, 2, 0)
            .use_shared(fixture_only_shared)
            .use_benchmark(many_small_inserts_benchmark)
            .build()?,
        ScenarioDefinitionBuilder::new("update")
            .use_shared(update_shared)
            .use_benchmark(update_benchmark)
            .build()?,
        ScenarioDefinitionBuilder::new("update_multi_no_index")
            .use_init(update_multi_init)
            .use_benchmark(update_multi_benchmark)
            .build()?,
    ])
}

fn fixture_only_shared(ctx: &ScenarioContext) -> Vec<Action> {
    vec![ctx.table_fixture()]
}

fn insert_benchmark(ctx: &ScenarioContext) -> Vec<Action> {
    vec![Action::script(format!(
        "> DROP TABLE IF EXISTS t1;

> CREATE TABLE t1 (f1 INTEGER)
  /* A */

> INSERT INTO t1 SELECT {values} FROM {join}
  /* B */
",
        values = ctx.unique_values(),
        join = ctx.join(),
    ))]
}

/// Measures the INSERT plus the time for a follow-up read to return, i.e. for
/// the dataflow to be completely caught up.
fn insert_and_select_benchmark(ctx: &ScenarioContext) -> Vec<Action> {
    vec![Action::script(format!(
        "> DROP TABLE IF EXISTS t1;

> CREATE TABLE t1 (f1 INTEGER)
  /* A */

> INSERT INTO t1 SELECT {values} FROM {join};

> SELECT 1 FROM t1 WHERE f1 = 1
  /* B */
1
",
        values = ctx.unique_values(),
        join = ctx.join(),
    ))]
}

fn insert_batch_benchmark(ctx: &ScenarioContext) -> Vec<Action> {
    let inserts = (0..ctx.n())
        .map(|value| format!("> INSERT INTO t1 VALUES ({value});\n"))
        .collect::<String>();

    vec![Action::script(format!(
        "> DROP TABLE IF EXISTS t1;

> CREATE TABLE t1 (f1 INTEGER)
  /* A */

> BEGIN

{inserts}
> COMMIT
  /* B */
",
    ))]
}

fn many_small_inserts_benchmark(ctx: &ScenarioContext) -> Vec<Action> {
    let mut rng = ctx.rng();
    let inserts = (0..ctx.n())
        .map(|_| format!("> INSERT INTO t1 VALUES ({})\n", rng.gen_range(0..100_000)))
        .collect::<String>();

    vec![Action::script(format!(
        "> DROP TABLE IF EXISTS t1;

> CREATE TABLE t1 (f1 INTEGER)
  /* A */

{inserts}  /* B */
",
    ))]
}

fn update_shared(ctx: &ScenarioContext) -> Vec<Action> {
    vec![
        ctx.table_fixture(),
        Action::script(format!(
            "> CREATE TABLE t1 (f1 BIGINT);

> CREATE DEFAULT INDEX ON t1;

> INSERT INTO t1 SELECT {values} FROM {join};
",
            values = ctx.unique_values(),
            join = ctx.join(),
        )),
    ]
}

fn update_benchmark(ctx: &ScenarioContext) -> Vec<Action> {
    vec![Action::script(format!(
        "> SELECT 1
  /* A */
1

> UPDATE t1 SET f1 = f1 + {n}
  /* B */
",
        n = ctx.n(),
    ))]
}

// Results for repeated updates over an unindexed table are extremely
// sensitive to leftover state, so the table is rebuilt before every
// measurement.
fn update_multi_init(ctx: &ScenarioContext) -> Vec<Action> {
    vec![Action::script(format!(
        "> DROP TABLE IF EXISTS t1;

> CREATE TABLE t1 (f1 BIGINT);

> INSERT INTO t1 SELECT * FROM generate_series(0, {n})
",
        n = ctx.n(),
    ))]
}

fn update_multi_benchmark(ctx: &ScenarioContext) -> Vec<Action> {
    vec![Action::script(format!(
        "> SELECT 1
  /* A */
1

> UPDATE t1 SET f1 = f1 + {n}

> SELECT COUNT(*) FROM t1 WHERE f1 > {n}
  /* B */
{n}
",
        n = ctx.n(),
    ))]
}
