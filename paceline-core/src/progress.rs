use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::checkpoint::CheckpointIndex;

pub type LapNumber = u32;
pub type Placement = u8;

/// Live progress snapshot for one racer. The movement subsystem overwrites
/// the fields in place every tick; the rank engine only ever reads them.
/// `finish_time` is meaningful only while `finished` is set.
#[derive(Serialize, Deserialize, Clone, Copy, Debug)]
pub struct RacerProgress {
    pub lap: LapNumber,
    pub checkpoint: CheckpointIndex,
    pub distance_to_next: f64,
    pub finished: bool,
    #[serde(with = "serde_millis")]
    pub finish_time: Duration,
}

impl RacerProgress {
    pub fn new() -> Self {
        RacerProgress {
            lap: 0,
            checkpoint: 0,
            distance_to_next: 0.0,
            finished: false,
            finish_time: Duration::ZERO,
        }
    }
}
