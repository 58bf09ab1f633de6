use crate::error::DefinitionError;

/// Declared scale used when a scenario does not pick its own.
pub const DEFAULT_SCALE: f64 = 6.0;

/// Counts above this are not addressable by the harness; `10^15` still fits a
/// `u64` with room for the join span to overshoot by one base factor.
const MAX_SCALE: f64 = 15.0;

/// How a scenario sizes itself: a declared scale plus an optional fixed-scale
/// marker.
///
/// A fixed-scale scenario ignores any global scale override, typically because
/// a larger size would exhaust memory on the test host.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScaleModel {
    declared: f64,
    fixed: bool,
}

impl ScaleModel {
    pub fn new(declared: f64) -> Self {
        Self {
            declared,
            fixed: false,
        }
    }

    pub fn fixed(declared: f64) -> Self {
        Self {
            declared,
            fixed: true,
        }
    }

    pub fn declared(&self) -> f64 {
        self.declared
    }

    pub fn is_fixed(&self) -> bool {
        self.fixed
    }

    /// Resolve the effective sizing for one activation.
    ///
    /// The override wins over the declared scale unless the scenario is
    /// fixed-scale. Resolution is pure: the same inputs always produce the
    /// same [Sizing], and a scale whose element count would round to zero (or
    /// fall beyond `10^15`) is rejected here, before anything executes.
    pub fn resolve(&self, global_override: Option<f64>) -> Result<Sizing, DefinitionError> {
        let scale = if self.fixed {
            self.declared
        } else {
            global_override.unwrap_or(self.declared)
        };

        if !scale.is_finite() || scale > MAX_SCALE {
            return Err(DefinitionError::ScaleOutOfRange { scale });
        }

        let count = 10f64.powf(scale).round();
        if count < 1.0 {
            return Err(DefinitionError::NonPositiveCount { scale });
        }

        Ok(Sizing {
            scale,
            count: count as u64,
        })
    }
}

impl Default for ScaleModel {
    fn default() -> Self {
        Self::new(DEFAULT_SCALE)
    }
}

/// The resolved size of one scenario activation.
///
/// The same scale value is read two ways, chosen per call site: [Sizing::count]
/// is the exponential interpretation (an element count, `round(10^scale)`),
/// while [Sizing::floor] and [Sizing::ceil] read the scale itself as a small
/// linear parameter such as a column count or join fan-out.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sizing {
    scale: f64,
    count: u64,
}

impl Sizing {
    pub fn scale(&self) -> f64 {
        self.scale
    }

    /// The element count `n = round(10^scale)`.
    pub fn count(&self) -> u64 {
        self.count
    }

    /// The scale read as a linear parameter, rounded down.
    pub fn floor(&self) -> u64 {
        self.scale.max(0.0).floor() as u64
    }

    /// The scale read as a linear parameter, rounded up.
    pub fn ceil(&self) -> u64 {
        self.scale.max(0.0).ceil() as u64
    }
}
