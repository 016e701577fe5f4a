use std::time::Duration;

use tracing::{debug, info};

use paceline_core::progress::{Placement, RacerProgress};
use paceline_core::{RacerID, GLOBAL_CONFIG};

use crate::circuit::Circuit;
use crate::standings::standing_order;


/// One race over one circuit. Owns the racer roster, the canonical standings
/// buffer, and the elapsed race clock. All race state lives here; callers
/// hold a reference to the session, nothing is ambient.
pub struct RaceSession {
    circuit: Circuit,
    lap_count: u32,
    roster: Vec<RacerProgress>,
    standings: Vec<RacerID>,
    elapsed: Duration,
    started: bool,
    first_finished: bool,
}

impl RaceSession {
    pub fn new(circuit: Circuit) -> RaceSession {
        RaceSession {
            circuit,
            lap_count: GLOBAL_CONFIG.lap_count,
            roster: Vec::new(),
            standings: Vec::new(),
            elapsed: Duration::ZERO,
            started: false,
            first_finished: false,
        }
    }

    /// Add a racer to the roster. Racers register once, before the race
    /// starts; the roster never shrinks while the race runs.
    pub fn register(&mut self) -> RacerID {
        let id = self.roster.len();
        self.roster.push(RacerProgress::new());
        self.standings.push(id);
        debug!(racer = id, "racer registered");
        id
    }

    pub fn racer_count(&self) -> usize {
        self.roster.len()
    }

    pub fn progress(&self, id: RacerID) -> &RacerProgress {
        &self.roster[id]
    }

    /// Mutation point for the movement subsystem, the single writer of
    /// snapshot fields.
    pub fn progress_mut(&mut self, id: RacerID) -> &mut RacerProgress {
        &mut self.roster[id]
    }

    /// Called once the external countdown / intro sequencing is done. Until
    /// then the clock stands still and no rank ticks are admitted.
    pub fn start(&mut self) {
        self.started = true;
        info!(racers = self.roster.len(), "race started");
    }

    pub fn started(&self) -> bool {
        self.started
    }

    /// Feed one frame's delta time into the race clock.
    pub fn advance(&mut self, dt: Duration) {
        if self.started {
            self.elapsed += dt;
        }
    }

    pub fn elapsed(&self) -> Duration {
        self.elapsed
    }

    /// One rank tick: resort the canonical standings buffer in place. The
    /// sort is stable, so racers whose snapshots compare equal keep their
    /// current relative order from tick to tick.
    pub fn update_standings(&mut self) {
        let roster = &self.roster;
        self.standings
            .sort_by(|&a, &b| standing_order(&roster[a], &roster[b]));

        if !self.first_finished && self.roster.iter().any(|racer| racer.finished) {
            self.first_finished = true;
            info!(elapsed_ms = self.elapsed.as_millis() as u64, "first racer finished");
        }
    }

    /// Current total ranking, best standing first.
    pub fn standings(&self) -> &[RacerID] {
        &self.standings
    }

    pub fn leader(&self) -> Option<RacerID> {
        self.standings.first().copied()
    }

    /// 1-based position of a racer in the current standings.
    pub fn placement(&self, id: RacerID) -> Option<Placement> {
        self.standings
            .iter()
            .position(|&racer| racer == id)
            .map(|place| (place + 1) as Placement)
    }

    /// Latched by the first rank tick that sees a finished racer; never reset
    /// while the race runs.
    pub fn first_finished(&self) -> bool {
        self.first_finished
    }

    pub fn circuit(&self) -> &Circuit {
        &self.circuit
    }

    /// Consumed by the movement subsystem to decide when a racer's
    /// `finished` flag flips; the rank engine never looks at it.
    pub fn lap_count(&self) -> u32 {
        self.lap_count
    }
}

/// Fixed-cadence driver for rank ticks. The host feeds it delta time every
/// frame; it resorts the standings once per elapsed interval, and only once
/// the session has started.
pub struct StandingsTicker {
    interval: Duration,
    accumulator: Duration,
}

impl StandingsTicker {
    pub fn new() -> StandingsTicker {
        StandingsTicker::with_interval(Duration::from_millis(GLOBAL_CONFIG.standings_tick_ms))
    }

    pub fn with_interval(interval: Duration) -> StandingsTicker {
        assert!(!interval.is_zero(), "standings tick interval must be nonzero");

        StandingsTicker {
            interval,
            accumulator: Duration::ZERO,
        }
    }

    pub fn advance(&mut self, session: &mut RaceSession, dt: Duration) {
        session.advance(dt);

        if !session.started() {
            return;
        }

        self.accumulator += dt;
        while self.accumulator >= self.interval {
            self.accumulator -= self.interval;
            session.update_standings();
        }
    }
}
