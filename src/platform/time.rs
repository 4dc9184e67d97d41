//! Wall clock to fixed tick conversion
//!
//! Each frame the host asks how many fixed ticks are owed. Simulated time
//! advances in whole ticks until it reaches the wall clock. Bursts larger than
//! the cap (e.g. after a suspended tab) are cut short and the clock resyncs.

/// Ticks owed for one frame
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct CatchUp {
    pub ticks: u32,
    /// Owed time discarded by the burst cap
    pub dropped_ms: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TickClock {
    sim_time_ms: f64,
    mspt: f64,
    max_catch_up: u32,
}

impl TickClock {
    pub fn start(now_ms: f64, mspt: u32, max_catch_up: u32) -> Self {
        Self {
            sim_time_ms: now_ms,
            mspt: f64::from(mspt.max(1)),
            max_catch_up: max_catch_up.max(1),
        }
    }

    /// Restart at `now_ms` with nothing owed
    pub fn reset(&mut self, now_ms: f64) {
        self.sim_time_ms = now_ms;
    }

    pub fn sim_time_ms(&self) -> f64 {
        self.sim_time_ms
    }

    /// Ticks to run so that simulated time is no longer behind `now_ms`
    pub fn due(&mut self, now_ms: f64) -> CatchUp {
        if now_ms.is_nan() || self.sim_time_ms >= now_ms {
            return CatchUp::default();
        }

        let owed = ((now_ms - self.sim_time_ms) / self.mspt).ceil();
        if owed > f64::from(self.max_catch_up) {
            let run = f64::from(self.max_catch_up) * self.mspt;
            let dropped_ms = now_ms - self.sim_time_ms - run;
            log::warn!(
                "Catch-up burst of {owed} ticks capped at {}, dropping {dropped_ms:.1}ms",
                self.max_catch_up
            );
            self.sim_time_ms = now_ms;
            return CatchUp {
                ticks: self.max_catch_up,
                dropped_ms,
            };
        }

        self.sim_time_ms += owed * self.mspt;
        CatchUp {
            ticks: owed as u32,
            dropped_ms: 0.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ticks_until_caught_up() {
        let mut clock = TickClock::start(1000.0, 5, 11);
        assert_eq!(clock.due(1000.0).ticks, 0);
        assert_eq!(clock.due(1012.0).ticks, 3);
        assert_eq!(clock.sim_time_ms(), 1015.0);
        // Already ahead of the wall clock
        assert_eq!(clock.due(1014.0).ticks, 0);
        assert_eq!(clock.due(1016.0).ticks, 1);
    }

    #[test]
    fn test_burst_is_capped_and_resynced() {
        let mut clock = TickClock::start(0.0, 5, 11);
        let burst = clock.due(10_000.0);
        assert_eq!(burst.ticks, 11);
        assert_eq!(burst.dropped_ms, 10_000.0 - 55.0);
        assert_eq!(clock.sim_time_ms(), 10_000.0);
        assert_eq!(clock.due(10_005.0).ticks, 1);
    }

    #[test]
    fn test_reset() {
        let mut clock = TickClock::start(0.0, 5, 11);
        clock.reset(500.0);
        assert_eq!(clock.due(500.0).ticks, 0);
    }
}
