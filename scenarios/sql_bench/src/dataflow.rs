//! Benchmarks around individual dataflow patterns and operators.

use time_trial_runner::prelude::*;

pub fn scenarios() -> anyhow::Result<Vec<ScenarioDefinition>> {
    Ok(vec![
        ScenarioDefinitionBuilder::new("count_distinct")
            .use_shared(two_column_view_shared)
            .use_benchmark(count_distinct_benchmark)
            .build()?,
        ScenarioDefinitionBuilder::new("min_max")
            .use_shared(one_column_view_shared)
            .use_benchmark(min_max_benchmark)
            .build()?,
        ScenarioDefinitionBuilder::new("group_by")
            .use_shared(two_column_view_shared)
            .use_benchmark(group_by_benchmark)
            .build()?,
        ScenarioDefinitionBuilder::new("cross_join")
            .use_shared(fixture_view_shared)
            .use_benchmark(cross_join_benchmark)
            .build()?,
        ScenarioDefinitionBuilder::new("retraction")
            .use_init(retraction_init)
            .use_benchmark(retraction_benchmark)
            .build()?,
        ScenarioDefinitionBuilder::new("create_index")
            .use_shared(create_index_shared)
            .use_benchmark(create_index_benchmark)
            .build()?,
        ScenarioDefinitionBuilder::new("delta_join")
            .use_shared(one_column_view_shared)
            .use_benchmark(delta_join_benchmark)
            .build()?,
        ScenarioDefinitionBuilder::new("full_outer_join")
            .use_shared(fixture_view_shared)
            .use_benchmark(full_outer_join_benchmark)
            .build()?,
        ScenarioDefinitionBuilder::new("finish_order_by_limit")
            .use_shared(two_column_view_shared)
            .use_benchmark(finish_order_by_limit_benchmark)
            .build()?,
    ])
}

fn fixture_view_shared(ctx: &ScenarioContext) -> Vec<Action> {
    vec![ctx.view_fixture()]
}

fn one_column_view_shared(ctx: &ScenarioContext) -> Vec<Action> {
    vec![
        ctx.view_fixture(),
        Action::script(format!(
            "> CREATE MATERIALIZED VIEW v1 AS SELECT {values} AS f1 FROM {join};

> SELECT COUNT(*) = {n} FROM v1;
true
",
            values = ctx.unique_values(),
            join = ctx.join(),
            n = ctx.n(),
        )),
    ]
}

fn two_column_view_shared(ctx: &ScenarioContext) -> Vec<Action> {
    vec![
        ctx.view_fixture(),
        Action::script(format!(
            "> CREATE MATERIALIZED VIEW v1 AS SELECT {values} AS f1, {values} AS f2 FROM {join};

> SELECT COUNT(*) = {n} FROM v1;
true
",
            values = ctx.unique_values(),
            join = ctx.join(),
            n = ctx.n(),
        )),
    ]
}

fn count_distinct_benchmark(ctx: &ScenarioContext) -> Vec<Action> {
    vec![Action::script(format!(
        "> SELECT 1
  /* A */
1

> SELECT COUNT(DISTINCT f1) AS f1 FROM v1
  /* B */
{n}
",
        n = ctx.n(),
    ))]
}

fn min_max_benchmark(ctx: &ScenarioContext) -> Vec<Action> {
    vec![Action::script(format!(
        "> SELECT 1
  /* A */
1

> SELECT MIN(f1), MAX(f1) AS f1 FROM v1
  /* B */
0 {max}
",
        max = ctx.n() - 1,
    ))]
}

fn group_by_benchmark(ctx: &ScenarioContext) -> Vec<Action> {
    vec![Action::script(format!(
        "> SELECT 1
  /* A */
1

> SELECT COUNT(*), MIN(f1_min), MAX(f1_max) FROM (SELECT f2, MIN(f1) AS f1_min, MAX(f1) AS f1_max FROM v1 GROUP BY f2)
  /* B */
{n} 0 {max}
",
        n = ctx.n(),
        max = ctx.n() - 1,
    ))]
}

fn cross_join_benchmark(ctx: &ScenarioContext) -> Vec<Action> {
    vec![Action::script(format!(
        "> DROP MATERIALIZED VIEW IF EXISTS v1;

> CREATE MATERIALIZED VIEW v1 AS SELECT {values} FROM {join}
  /* A */

> SELECT COUNT(*) = {n} AS f1 FROM v1
  /* B */
true
",
        values = ctx.unique_values(),
        join = ctx.join(),
        n = ctx.n(),
    ))]
}

// The whole dataset is rebuilt before each measurement so that every
// iteration retracts from the same starting point.
fn retraction_init(ctx: &ScenarioContext) -> Vec<Action> {
    vec![Action::script(format!(
        "> DROP TABLE IF EXISTS ten CASCADE;

> CREATE TABLE ten (f1 INTEGER);

> INSERT INTO ten VALUES (0),(1),(2),(3),(4),(5),(6),(7),(8),(9);

> CREATE MATERIALIZED VIEW v1 AS SELECT {values} FROM {join};

> SELECT COUNT(*) = {n} AS f1 FROM v1;
true
",
        values = ctx.unique_values(),
        join = ctx.join(),
        n = ctx.n(),
    ))]
}

fn retraction_benchmark(_ctx: &ScenarioContext) -> Vec<Action> {
    vec![Action::script(
        "> SELECT 1
  /* A */
1

> DELETE FROM ten;

> SELECT COUNT(*) FROM v1
  /* B */
0
",
    )]
}

fn create_index_shared(ctx: &ScenarioContext) -> Vec<Action> {
    vec![
        ctx.table_fixture(),
        Action::script(format!(
            "> CREATE TABLE t1 (f1 INTEGER, f2 INTEGER);
> INSERT INTO t1 (f1) SELECT {values} FROM {join};

# Make sure the dataflow is fully hydrated
> SELECT 1 FROM t1 WHERE f1 = 0;
1
",
            values = ctx.unique_values(),
            join = ctx.join(),
        )),
    ]
}

/// Measures CREATE INDEX plus the time for a SELECT that would use the index
/// to return rows.
fn create_index_benchmark(_ctx: &ScenarioContext) -> Vec<Action> {
    vec![Action::script(
        "> DROP INDEX IF EXISTS i1;
  /* A */

> CREATE INDEX i1 ON t1(f1);

> SELECT COUNT(*)
  FROM t1 AS a1, t1 AS a2
  WHERE a1.f1 = a2.f1
  AND a1.f1 = 0
  AND a2.f1 = 0
  /* B */
1
",
    )]
}

fn delta_join_benchmark(ctx: &ScenarioContext) -> Vec<Action> {
    vec![Action::script(format!(
        "> SELECT 1
  /* A */
1

# Delta joins require 3+ inputs
> SELECT COUNT(*) FROM v1 AS a1, v1 AS a2, v1 AS a3 WHERE a1.f1 = a2.f1 AND a2.f1 = a3.f1
  /* B */
{n}
",
        n = ctx.n(),
    ))]
}

// The join width follows the scale linearly rather than exponentially: one
// digit column per whole unit of scale.
fn full_outer_join_benchmark(ctx: &ScenarioContext) -> Vec<Action> {
    let width = ctx.sizing().floor().max(1);
    let columns_select = (1..=width)
        .map(|i| format!("ten{i}.f1 AS f{i}"))
        .collect::<Vec<_>>()
        .join(", ");
    let columns_using = (1..=width)
        .map(|i| format!("f{i}"))
        .collect::<Vec<_>>()
        .join(", ");

    vec![Action::script(format!(
        "> DROP MATERIALIZED VIEW IF EXISTS v2;

> DROP MATERIALIZED VIEW IF EXISTS v1;

> CREATE MATERIALIZED VIEW v1 AS SELECT {columns_select} FROM {join}
  /* A */

> CREATE MATERIALIZED VIEW v2 AS
  SELECT COUNT(a1.f1) AS c1, COUNT(a2.f1) AS c2
  FROM v1 AS a1
  FULL OUTER JOIN v1 AS a2 USING ({columns_using});

> SELECT * FROM v2
  /* B */
{n} {n}
",
        join = ctx.join(),
        n = ctx.n(),
    ))]
}

/// ORDER BY + LIMIT without the benefit of an index, exercising the final
/// ordering step of query processing rather than a dataflow.
fn finish_order_by_limit_benchmark(ctx: &ScenarioContext) -> Vec<Action> {
    vec![Action::script(format!(
        "> SELECT 1
  /* A */
1

> SELECT f2 FROM v1 ORDER BY 1 DESC LIMIT 1
  /* B */
{max}
",
        max = ctx.n() - 1,
    ))]
}
