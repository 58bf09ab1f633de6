/// Sentinel marking the start of the measured interval.
pub const CHECKPOINT_A: &str = "/* A */";
/// Sentinel marking the end of the measured interval.
pub const CHECKPOINT_B: &str = "/* B */";

/// One of the two checkpoint markers bounding a measurement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, derive_more::Display, serde::Serialize)]
pub enum Checkpoint {
    #[display("A")]
    A,
    #[display("B")]
    B,
}

impl Checkpoint {
    pub fn token(&self) -> &'static str {
        match self {
            Checkpoint::A => CHECKPOINT_A,
            Checkpoint::B => CHECKPOINT_B,
        }
    }
}

/// An opaque block of statements for the external executor.
///
/// The harness never interprets the statements themselves; the only lexical
/// structure it knows about is the two checkpoint sentinels, which it scans
/// for when validating a scenario definition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Script {
    text: String,
}

impl Script {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// Every checkpoint marker in the script with its byte offset, in text
    /// order.
    pub fn markers(&self) -> Vec<(Checkpoint, usize)> {
        let mut markers: Vec<(Checkpoint, usize)> = self
            .text
            .match_indices(CHECKPOINT_A)
            .map(|(offset, _)| (Checkpoint::A, offset))
            .chain(
                self.text
                    .match_indices(CHECKPOINT_B)
                    .map(|(offset, _)| (Checkpoint::B, offset)),
            )
            .collect();
        markers.sort_by_key(|(_, offset)| *offset);
        markers
    }
}
