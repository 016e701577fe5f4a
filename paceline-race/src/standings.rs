use std::cmp::Ordering;

use paceline_core::progress::RacerProgress;
use paceline_core::RacerID;

/// Total order over racer snapshots, best standing first. Finished racers
/// beat everyone else and sort among themselves by finish time; the rest
/// sort by lap, then by last checkpoint crossed, then by how close they are
/// to the next one. A racer sitting on the finish line of its final lap
/// carries the sentinel index and therefore counts as furthest around.
pub fn standing_order(a: &RacerProgress, b: &RacerProgress) -> Ordering {
    match (a.finished, b.finished) {
        (true, true) => a.finish_time.cmp(&b.finish_time),
        (true, false) => Ordering::Less,
        (false, true) => Ordering::Greater,
        (false, false) => b
            .lap
            .cmp(&a.lap)
            .then(b.checkpoint.cmp(&a.checkpoint))
            .then(a.distance_to_next.total_cmp(&b.distance_to_next)),
    }
}

/// Rank a roster without touching it: returns the ids `0..roster.len()` as a
/// fresh permutation, best standing first. The sort is stable, so ids whose
/// snapshots compare equal keep their roster order.
pub fn rank(roster: &[RacerProgress]) -> Vec<RacerID> {
    let mut order: Vec<RacerID> = (0..roster.len()).collect();
    order.sort_by(|&a, &b| standing_order(&roster[a], &roster[b]));
    order
}
