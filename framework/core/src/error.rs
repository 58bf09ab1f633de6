use crate::action::Phase;
use crate::script::Checkpoint;

/// A scenario definition that can never produce a valid measurement.
///
/// All of these are detected while constructing an activation, before any
/// action reaches the external executor. They are fatal for the offending
/// scenario only; the rest of a run proceeds.
#[derive(Debug, thiserror::Error)]
pub enum DefinitionError {
    #[error("scale {scale} resolves to a non-positive element count")]
    NonPositiveCount { scale: f64 },

    #[error("scale {scale} is out of range; counts beyond 10^15 are not addressable")]
    ScaleOutOfRange { scale: f64 },

    #[error("scenario '{scenario}' declares no benchmark phase")]
    MissingBenchmark { scenario: String },

    #[error("the {phase} phase of '{scenario}' must not contain checkpoint markers")]
    MarkerOutsideBenchmark { scenario: String, phase: Phase },

    #[error(
        "the benchmark phase of '{scenario}' must contain exactly one {checkpoint} marker, \
         found {found}"
    )]
    MarkerCount {
        scenario: String,
        checkpoint: Checkpoint,
        found: usize,
    },

    #[error("the benchmark phase of '{scenario}' places marker B before marker A")]
    MarkerOrder { scenario: String },
}
