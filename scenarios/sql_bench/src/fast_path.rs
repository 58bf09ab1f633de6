//! Benchmarks for queries that should be answered from an index without
//! rendering a dataflow.

use time_trial_runner::prelude::*;

pub fn scenarios() -> anyhow::Result<Vec<ScenarioDefinition>> {
    Ok(vec![
        // Larger scales exhaust memory on the test host.
        ScenarioDefinitionBuilder::new("fast_path_filter_no_index")
            .with_fixed_scale(7.0)
            .use_shared(filter_shared)
            .use_benchmark(filter_benchmark)
            .build()?,
        ScenarioDefinitionBuilder::new("fast_path_order_by_limit")
            .use_shared(order_by_limit_shared)
            .use_benchmark(order_by_limit_benchmark)
            .build()?,
        ScenarioDefinitionBuilder::new("query_latency")
            .with_scale(3.0)
            .use_benchmark(query_latency_benchmark)
            .build()?,
    ])
}

fn filter_shared(ctx: &ScenarioContext) -> Vec<Action> {
    vec![
        ctx.table_fixture(),
        Action::script(format!(
            "> CREATE MATERIALIZED VIEW v1 (f1, f2) AS SELECT {values} AS f1, 1 AS f2 FROM {join};

> CREATE DEFAULT INDEX ON v1;

> SELECT COUNT(*) = {n} FROM v1;
true
",
            values = ctx.unique_values(),
            join = ctx.join(),
            n = ctx.n(),
        )),
    ]
}

fn filter_benchmark(_ctx: &ScenarioContext) -> Vec<Action> {
    vec![Action::script(
        "> SELECT 1
  /* A */
1

> SELECT * FROM v1 WHERE f2 < 0
  /* B */
",
    )]
}

fn order_by_limit_shared(ctx: &ScenarioContext) -> Vec<Action> {
    vec![
        ctx.table_fixture(),
        Action::script(format!(
            "> CREATE MATERIALIZED VIEW v1 AS SELECT {values} AS f1 FROM {join};

> CREATE DEFAULT INDEX ON v1;

> SELECT COUNT(*) = {n} FROM v1;
true
",
            values = ctx.unique_values(),
            join = ctx.join(),
            n = ctx.n(),
        )),
    ]
}

fn order_by_limit_benchmark(ctx: &ScenarioContext) -> Vec<Action> {
    let expected = (ctx.n().saturating_sub(100)..ctx.n())
        .rev()
        .map(|value| value.to_string())
        .collect::<Vec<_>>()
        .join("\n");

    vec![Action::script(format!(
        "> SELECT 1
  /* A */
1

> SELECT f1 FROM v1 ORDER BY f1 DESC LIMIT 100
  /* B */
{expected}
",
    ))]
}

// An individual query here takes around a millisecond, which drowns in noise;
// the whole batch between the markers is the measured unit.
fn query_latency_benchmark(ctx: &ScenarioContext) -> Vec<Action> {
    let selects: String = (0..ctx.n()).map(|_| "> SELECT 1\n1\n").collect();

    vec![Action::script(format!(
        "> SELECT 1
  /* A */
1

{selects}
> SELECT 1
  /* B */
1
",
    ))]
}
