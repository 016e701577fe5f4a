use glam::DVec3;
use thiserror::Error;
use tracing::debug;

use paceline_core::checkpoint::{CheckpointIndex, CheckpointMarker, FINISH_LINE};

#[derive(Error, Debug)]
pub enum TopologyError {
    #[error("at least 2 checkpoints are needed, got {0}")]
    InsufficientCheckpoints(usize),
}

/// One waypoint of the built circuit. `index` is the final 0-based position
/// in lap order, except for the last checkpoint, which carries `FINISH_LINE`
/// instead. The successor slot is private; follow it through
/// `Circuit::next_of`.
pub struct Checkpoint {
    pub index: CheckpointIndex,
    pub name: String,
    pub position: DVec3,
    next: usize,
}

/// The closed, cyclic sequence of checkpoints defining one lap. Owns its
/// checkpoints in lap order; the successor chain is a single cycle covering
/// every checkpoint.
pub struct Circuit {
    checkpoints: Vec<Checkpoint>,
}

impl Circuit {
    /// Order the markers by their hints and wire them into a cycle. Building
    /// is pure: the same markers with the same hints always produce the same
    /// circuit.
    pub fn build(mut markers: Vec<CheckpointMarker>) -> Result<Circuit, TopologyError> {
        if markers.len() < 2 {
            return Err(TopologyError::InsufficientCheckpoints(markers.len()));
        }

        // Stable sort: markers sharing an order hint keep the caller's order.
        markers.sort_by_key(|marker| marker.order_hint);

        let size = markers.len();
        let checkpoints = markers
            .iter()
            .enumerate()
            .map(|(i, marker)| {
                let index = if i + 1 < size {
                    i as CheckpointIndex
                } else {
                    FINISH_LINE
                };

                Checkpoint {
                    index,
                    name: format!("Checkpoint {:02}", index),
                    position: marker.position,
                    next: if i + 1 < size { i + 1 } else { 0 },
                }
            })
            .collect();

        debug!(checkpoints = size, "built circuit");

        Ok(Circuit { checkpoints })
    }

    /// Re-entry point for track editing: after markers are inserted or
    /// removed their hints are stale, so renumber by the markers' current
    /// physical order before rebuilding.
    pub fn renumber_and_build(
        mut markers: Vec<CheckpointMarker>,
    ) -> Result<Circuit, TopologyError> {
        for (i, marker) in markers.iter_mut().enumerate() {
            marker.order_hint = i as u32;
        }

        Circuit::build(markers)
    }

    pub fn len(&self) -> usize {
        self.checkpoints.len()
    }

    /// Checkpoints in lap order, with positions, for trajectory rendering.
    pub fn checkpoints(&self) -> &[Checkpoint] {
        &self.checkpoints
    }

    pub fn start(&self) -> &Checkpoint {
        &self.checkpoints[0]
    }

    pub fn finish(&self) -> &Checkpoint {
        &self.checkpoints[self.checkpoints.len() - 1]
    }

    pub fn next_of(&self, checkpoint: &Checkpoint) -> &Checkpoint {
        &self.checkpoints[checkpoint.next]
    }
}

#[cfg(test)]
mod tests {
    use glam::DVec3;

    use paceline_core::checkpoint::{CheckpointMarker, FINISH_LINE};

    use crate::circuit::{Circuit, TopologyError};

    fn marker(order_hint: u32, x: f64) -> CheckpointMarker {
        CheckpointMarker {
            order_hint,
            position: DVec3::new(x, 0.0, 0.0),
        }
    }

    fn square_markers() -> Vec<CheckpointMarker> {
        vec![
            marker(30, 3.0),
            marker(10, 1.0),
            marker(40, 4.0),
            marker(20, 2.0),
        ]
    }

    #[test]
    fn test_insufficient_checkpoints() {
        assert!(matches!(
            Circuit::build(Vec::new()),
            Err(TopologyError::InsufficientCheckpoints(0))
        ));
        assert!(matches!(
            Circuit::build(vec![marker(0, 0.0)]),
            Err(TopologyError::InsufficientCheckpoints(1))
        ));

        // two checkpoints is the smallest circuit that can run a race
        assert!(Circuit::build(vec![marker(0, 0.0), marker(1, 1.0)]).is_ok());
    }

    #[test]
    fn test_markers_ordered_by_hint() {
        let circuit = Circuit::build(square_markers()).unwrap();

        let xs: Vec<f64> = circuit
            .checkpoints()
            .iter()
            .map(|checkpoint| checkpoint.position.x)
            .collect();
        assert_eq!(xs, vec![1.0, 2.0, 3.0, 4.0]);
    }

    #[test]
    fn test_hints_need_not_be_contiguous() {
        let circuit = Circuit::build(vec![marker(7, 2.0), marker(900, 3.0), marker(0, 1.0)]).unwrap();

        let xs: Vec<f64> = circuit
            .checkpoints()
            .iter()
            .map(|checkpoint| checkpoint.position.x)
            .collect();
        assert_eq!(xs, vec![1.0, 2.0, 3.0]);
    }

    #[test]
    fn test_finish_sentinel_unique_and_last() {
        let circuit = Circuit::build(square_markers()).unwrap();

        let sentinels = circuit
            .checkpoints()
            .iter()
            .filter(|checkpoint| checkpoint.index == FINISH_LINE)
            .count();
        assert_eq!(sentinels, 1);
        assert_eq!(circuit.finish().index, FINISH_LINE);
        assert_eq!(circuit.finish().position.x, 4.0);

        // everything before the finish is numbered positionally
        for (i, checkpoint) in circuit.checkpoints().iter().enumerate() {
            if i + 1 < circuit.len() {
                assert_eq!(checkpoint.index, i as u32);
            }
        }
    }

    #[test]
    fn test_cycle_closure() {
        let circuit = Circuit::build(square_markers()).unwrap();

        // following the successor chain visits every checkpoint exactly once
        // before landing back on the start; no shorter cycle exists
        let mut current = circuit.start();
        for step in 1..=circuit.len() {
            current = circuit.next_of(current);
            if step < circuit.len() {
                assert!(!std::ptr::eq(current, circuit.start()));
            }
        }
        assert!(std::ptr::eq(current, circuit.start()));
    }

    #[test]
    fn test_build_is_idempotent() {
        let first = Circuit::build(square_markers()).unwrap();
        let second = Circuit::build(square_markers()).unwrap();

        assert_eq!(first.len(), second.len());
        for (a, b) in first.checkpoints().iter().zip(second.checkpoints()) {
            assert_eq!(a.index, b.index);
            assert_eq!(a.name, b.name);
            assert_eq!(a.position, b.position);
            assert_eq!(first.next_of(a).position, second.next_of(b).position);
        }
    }

    #[test]
    fn test_names_are_zero_padded() {
        let circuit = Circuit::build(square_markers()).unwrap();

        let names: Vec<&str> = circuit
            .checkpoints()
            .iter()
            .map(|checkpoint| checkpoint.name.as_str())
            .collect();
        assert_eq!(
            names,
            vec![
                "Checkpoint 00",
                "Checkpoint 01",
                "Checkpoint 02",
                // the finish line shows the sentinel's own numeral
                "Checkpoint 4294967295",
            ]
        );
    }

    #[test]
    fn test_equal_hints_keep_caller_order() {
        let circuit = Circuit::build(vec![
            marker(5, 1.0),
            marker(5, 2.0),
            marker(5, 3.0),
            marker(1, 0.0),
        ])
        .unwrap();

        let xs: Vec<f64> = circuit
            .checkpoints()
            .iter()
            .map(|checkpoint| checkpoint.position.x)
            .collect();
        assert_eq!(xs, vec![0.0, 1.0, 2.0, 3.0]);
    }

    #[test]
    fn test_renumber_ignores_stale_hints() {
        // hints are backwards; physical order wins after a renumber
        let markers = vec![marker(99, 1.0), marker(50, 2.0), marker(3, 3.0)];

        let circuit = Circuit::renumber_and_build(markers).unwrap();

        let xs: Vec<f64> = circuit
            .checkpoints()
            .iter()
            .map(|checkpoint| checkpoint.position.x)
            .collect();
        assert_eq!(xs, vec![1.0, 2.0, 3.0]);
        assert_eq!(circuit.finish().position.x, 3.0);
    }
}
