use glam::DVec3;
use serde::{Deserialize, Serialize};

pub type CheckpointIndex = u32;

/// Reserved index for the checkpoint that doubles as the start/finish line.
/// It is the numerically greatest index, so reaching it counts as being
/// furthest around the circuit when standings are compared.
pub const FINISH_LINE: CheckpointIndex = CheckpointIndex::MAX;

// Markers come from the track editing surface in whatever order it stores
// them; the order hint alone decides a marker's place in the built circuit.
#[derive(Serialize, Deserialize, Clone, Copy, Debug)]
pub struct CheckpointMarker {
    pub order_hint: u32,
    pub position: DVec3,
}
