use crate::script::{Checkpoint, Script};

/// The three stages of a scenario activation.
///
/// `Shared` runs once per activation, `Init` once per measurement iteration,
/// and `Benchmark` is the only phase that produces a measurement. A phase with
/// no actions is a valid no-op.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display, serde::Serialize)]
pub enum Phase {
    #[display("shared")]
    Shared,
    #[display("init")]
    Init,
    #[display("benchmark")]
    Benchmark,
}

/// One instruction emitted by a scenario phase.
///
/// The set is closed on purpose: the engine dispatches each variant to the
/// matching capability of its injected executor, and adding a variant is a
/// deliberate extension of the executor contract rather than an open-ended
/// callback surface.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    /// A block of statements interpreted by the external executor. The only
    /// variant that may carry checkpoint markers.
    Script(Script),
    /// Bulk data production by the external generator, used where feeding the
    /// system through individual statements would dwarf the measurement.
    Generate(GeneratorRequest),
    /// Restart a service of the system under test. No textual payload; the
    /// engine blocks until the restart call returns.
    Restart { target: String },
}

impl Action {
    pub fn script(text: impl Into<String>) -> Self {
        Action::Script(Script::new(text))
    }

    pub fn restart(target: impl Into<String>) -> Self {
        Action::Restart {
            target: target.into(),
        }
    }

    /// Checkpoint markers carried by this action. Empty for anything that is
    /// not a script.
    pub fn markers(&self) -> Vec<(Checkpoint, usize)> {
        match self {
            Action::Script(script) => script.markers(),
            Action::Generate(_) | Action::Restart { .. } => Vec::new(),
        }
    }
}

/// A request to the external bulk-data generator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratorRequest {
    pub target: String,
    pub keys: KeySpec,
    pub payload: PayloadBounds,
    pub count: u64,
}

/// Key shape of generated records.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeySpec {
    /// Keys `0, 1, 2, ...` in record order.
    Sequential,
    /// Uniformly random keys within `[min, max]`.
    Random { min: u64, max: u64 },
}

/// Size bounds of generated record payloads, in bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PayloadBounds {
    pub min_bytes: u32,
    pub max_bytes: u32,
}

impl PayloadBounds {
    /// Fixed-size payloads of exactly `bytes` bytes.
    pub fn exact(bytes: u32) -> Self {
        Self {
            min_bytes: bytes,
            max_bytes: bytes,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn only_scripts_carry_markers() {
        let script = Action::script("> SELECT 1\n  /* A */\n1\n  /* B */\n");
        assert_eq!(script.markers().len(), 2);

        let generate = Action::Generate(GeneratorRequest {
            target: "ingest-bytes".into(),
            keys: KeySpec::Sequential,
            payload: PayloadBounds::exact(100),
            count: 1_000,
        });
        assert_eq!(generate.markers(), vec![]);
        assert_eq!(Action::restart("server").markers(), vec![]);
    }
}
