//! Time management: turn `go` parameters into search limits and a
//! [`SearchControl`].

use std::sync::Arc;
use std::sync::atomic::AtomicBool;
use std::time::Duration;

use ochre_core::Color;

use crate::search::control::SearchControl;

/// Moves the remaining clock is spread over.
const MOVES_PER_ALLOTMENT: u64 = 40;

/// Safety margin kept back when the allotment would eat the whole clock.
const OVERHEAD_MS: i64 = 500;

/// Allotment used when the clock is nearly empty.
const PANIC_MS: i64 = 100;

/// Deepest iteration the search will start.
pub const MAX_DEPTH: i32 = 64;

/// What a `go` command asked for.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchLimits {
    pub depth: Option<i32>,
    pub movetime: Option<Duration>,
    pub wtime: Option<Duration>,
    pub btime: Option<Duration>,
    pub winc: Option<Duration>,
    pub binc: Option<Duration>,
    pub infinite: bool,
    pub ponder: bool,
}

impl SearchLimits {
    /// A fixed-depth search with no clock.
    pub fn depth(depth: i32) -> Self {
        Self {
            depth: Some(depth),
            ..Self::default()
        }
    }

    /// Iteration ceiling, clamped to `1..=MAX_DEPTH`.
    pub fn max_depth(&self) -> i32 {
        self.depth.unwrap_or(MAX_DEPTH).clamp(1, MAX_DEPTH)
    }

    /// Clock and increment of `side`, if a clock was given.
    fn clock(&self, side: Color) -> Option<(Duration, Duration)> {
        let (left, inc) = match side {
            Color::White => (self.wtime, self.winc),
            Color::Black => (self.btime, self.binc),
        };
        left.map(|left| (left, inc.unwrap_or(Duration::ZERO)))
    }

    /// Build the control for a search by `side`.
    ///
    /// Priority order:
    /// 1. `infinite` -> no limits
    /// 2. `movetime` -> the full move time for both limits
    /// 3. clock -> [`allotment`], iterations stop at 90 %
    /// 4. depth only / bare `go` -> no limits
    ///
    /// With `ponder` set the clock stays inactive until
    /// [`SearchControl::activate`].
    pub fn control(&self, side: Color, stopped: Arc<AtomicBool>) -> SearchControl {
        if self.infinite {
            return SearchControl::new_infinite(stopped);
        }

        let limits = if let Some(movetime) = self.movetime {
            Some((movetime, movetime))
        } else {
            self.clock(side).map(|(left, inc)| {
                let hard = allotment(left, inc);
                (hard.mul_f64(0.9), hard)
            })
        };

        match limits {
            Some((soft, hard)) if self.ponder => SearchControl::new_ponder(stopped, soft, hard),
            Some((soft, hard)) => SearchControl::new_timed(stopped, soft, hard),
            None => SearchControl::new_infinite(stopped),
        }
    }
}

/// Time to spend on this move: a fortieth of the clock plus the increment,
/// held back from the full clock.
pub fn allotment(time_left: Duration, increment: Duration) -> Duration {
    let left = time_left.as_millis() as i64;
    let mut time = left / MOVES_PER_ALLOTMENT as i64 + increment.as_millis() as i64;
    if time >= left {
        time = left - OVERHEAD_MS;
    }
    if time < 0 {
        time = PANIC_MS;
    }
    Duration::from_millis(time as u64)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn allotment_spreads_clock_over_forty_moves() {
        assert_eq!(allotment(Duration::from_secs(40), Duration::ZERO), Duration::from_secs(1));
        assert_eq!(
            allotment(Duration::from_secs(40), Duration::from_millis(250)),
            Duration::from_millis(1250)
        );
    }

    #[test]
    fn allotment_never_exceeds_the_clock() {
        // Increment larger than the clock: keep a margin.
        assert_eq!(
            allotment(Duration::from_secs(2), Duration::from_secs(5)),
            Duration::from_millis(1500)
        );
        // Not even the margin is left.
        assert_eq!(
            allotment(Duration::from_millis(300), Duration::from_secs(1)),
            Duration::from_millis(100)
        );
    }

    #[test]
    fn max_depth_clamped() {
        assert_eq!(SearchLimits::default().max_depth(), MAX_DEPTH);
        assert_eq!(SearchLimits::depth(0).max_depth(), 1);
        assert_eq!(SearchLimits::depth(500).max_depth(), MAX_DEPTH);
        assert_eq!(SearchLimits::depth(7).max_depth(), 7);
    }

    #[test]
    fn infinite_never_stops_by_itself() {
        let limits = SearchLimits {
            infinite: true,
            movetime: Some(Duration::ZERO),
            ..SearchLimits::default()
        };
        let control = limits.control(Color::White, Arc::new(AtomicBool::new(false)));
        assert!(!control.should_stop(0));
        assert!(!control.should_stop_iterating());
    }

    #[test]
    fn movetime_is_hard_and_soft() {
        let limits = SearchLimits {
            movetime: Some(Duration::ZERO),
            ..SearchLimits::default()
        };
        let control = limits.control(Color::White, Arc::new(AtomicBool::new(false)));
        assert!(control.should_stop_iterating());
        assert!(control.should_stop(0));
    }

    #[test]
    fn clock_of_the_side_to_move_is_used() {
        let limits = SearchLimits {
            wtime: Some(Duration::from_secs(300)),
            btime: Some(Duration::ZERO),
            ..SearchLimits::default()
        };
        let white = limits.control(Color::White, Arc::new(AtomicBool::new(false)));
        assert!(!white.should_stop_iterating());
        assert!(!white.should_stop(0));
    }

    #[test]
    fn ponder_waits_for_ponderhit() {
        let limits = SearchLimits {
            movetime: Some(Duration::ZERO),
            ponder: true,
            ..SearchLimits::default()
        };
        let control = limits.control(Color::Black, Arc::new(AtomicBool::new(false)));
        assert!(!control.should_stop_iterating());
        control.activate();
        assert!(control.should_stop_iterating());
    }
}
