use rand::rngs::StdRng;
use rand::SeedableRng;

use time_trial_core::prelude::{Action, SelfJoin, Sizing, DEFAULT_BASE};

/// Name of the base fixture every synthesized dataset is joined from.
pub(crate) const FIXTURE_TABLE: &str = "ten";
/// The fixture's single column.
pub(crate) const FIXTURE_COLUMN: &str = "f1";

/// What a scenario's phase hooks get to see: the resolved size of this
/// activation plus helpers for building fixtures of that size.
///
/// The context is handed out by reference and hooks are expected to be pure
/// functions of it; anything pseudo-random must come from [ScenarioContext::rng]
/// so that repeated materializations of a phase produce identical actions.
#[derive(Debug, Clone)]
pub struct ScenarioContext {
    name: String,
    sizing: Sizing,
    seed: u64,
    base: u64,
}

impl ScenarioContext {
    pub(crate) fn new(name: impl Into<String>, sizing: Sizing, seed: u64) -> Self {
        Self {
            name: name.into(),
            sizing,
            seed,
            base: DEFAULT_BASE,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// The resolved element count `n` for this activation.
    pub fn n(&self) -> u64 {
        self.sizing.count()
    }

    pub fn scale(&self) -> f64 {
        self.sizing.scale()
    }

    pub fn sizing(&self) -> Sizing {
        self.sizing
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// A deterministic generator for statement content. Each call re-seeds,
    /// so a hook materialized twice emits the same statements twice.
    pub fn rng(&self) -> StdRng {
        StdRng::seed_from_u64(self.seed)
    }

    /// The minimal self-join of the base fixture covering `n` rows.
    pub fn self_join(&self) -> SelfJoin {
        SelfJoin::covering(self.base, self.n())
    }

    /// FROM-list joining enough copies of the base fixture to cover `n` rows.
    pub fn join(&self) -> String {
        self.self_join().join_clause(FIXTURE_TABLE)
    }

    /// Positional value expression enumerating `0..n` over [ScenarioContext::join].
    ///
    /// Exact when `n` is a power of the fixture size; otherwise the join
    /// overproduces and callers needing an exact count must also apply
    /// [ScenarioContext::bound_predicate].
    pub fn unique_values(&self) -> String {
        self.self_join().value_expr(FIXTURE_TABLE, FIXTURE_COLUMN)
    }

    /// Predicate limiting the join output to exactly `n` rows, when needed.
    pub fn bound_predicate(&self) -> Option<String> {
        self.self_join()
            .bound_predicate(FIXTURE_TABLE, FIXTURE_COLUMN, self.n())
    }

    /// The base fixture as a table, for scenarios that mutate it.
    pub fn table_fixture(&self) -> Action {
        Action::script(format!(
            "> CREATE TABLE {FIXTURE_TABLE} ({FIXTURE_COLUMN} INTEGER);\n\n\
             > INSERT INTO {FIXTURE_TABLE} VALUES {};\n",
            self.fixture_values()
        ))
    }

    /// The base fixture as a constant view, for read-only scenarios.
    pub fn view_fixture(&self) -> Action {
        Action::script(format!(
            "> CREATE VIEW {FIXTURE_TABLE} ({FIXTURE_COLUMN}) AS VALUES {};\n",
            self.fixture_values()
        ))
    }

    fn fixture_values(&self) -> String {
        (0..self.base)
            .map(|value| format!("({value})"))
            .collect::<Vec<_>>()
            .join(",")
    }
}
