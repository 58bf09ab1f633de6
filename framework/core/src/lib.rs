mod action;
mod error;
mod scale;
mod script;
mod synth;
mod version;

pub mod prelude {
    pub use crate::action::{Action, GeneratorRequest, KeySpec, PayloadBounds, Phase};
    pub use crate::error::DefinitionError;
    pub use crate::scale::{ScaleModel, Sizing, DEFAULT_SCALE};
    pub use crate::script::{Checkpoint, Script, CHECKPOINT_A, CHECKPOINT_B};
    pub use crate::synth::{SelfJoin, DEFAULT_BASE};
    pub use crate::version::ScenarioVersion;
}
