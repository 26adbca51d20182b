//! Turning raw key state into at most one move per tick.

use std::time::{Duration, Instant};

use mazeviz_core::Direction;

/// Which arrow keys are currently held down.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct HeldArrows {
    pub left: bool,
    pub right: bool,
    pub up: bool,
    pub down: bool,
}

impl HeldArrows {
    /// The single direction to move in. When several arrows are held the
    /// horizontal ones win: left, then right, then up, then down.
    pub fn intent(self) -> Option<Direction> {
        if self.left {
            Some(Direction::Left)
        } else if self.right {
            Some(Direction::Right)
        } else if self.up {
            Some(Direction::Up)
        } else if self.down {
            Some(Direction::Down)
        } else {
            None
        }
    }
}

/// Rate limiter for manual moves: at most one move per `interval`, so a held
/// key walks at a steady pace instead of once per frame.
#[derive(Clone, Debug)]
pub struct MovePacer {
    interval: Duration,
    last: Option<Instant>,
}

impl MovePacer {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            last: None,
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Whether a move may happen at `now`. Does not consume the slot.
    pub fn ready(&self, now: Instant) -> bool {
        self.last
            .is_none_or(|last| now.saturating_duration_since(last) >= self.interval)
    }

    /// Note that a move happened at `now`.
    pub fn record(&mut self, now: Instant) {
        self.last = Some(now);
    }

    /// [`ready`](Self::ready) followed by [`record`](Self::record) when it
    /// answers `true`.
    pub fn allow(&mut self, now: Instant) -> bool {
        let ok = self.ready(now);
        if ok {
            self.record(now);
        }
        ok
    }

    /// Forget the last move, so the next one is allowed immediately.
    pub fn reset(&mut self) {
        self.last = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn horizontal_arrows_take_priority() {
        let all = HeldArrows {
            left: true,
            right: true,
            up: true,
            down: true,
        };
        assert_eq!(all.intent(), Some(Direction::Left));
        let ud = HeldArrows {
            up: true,
            down: true,
            ..Default::default()
        };
        assert_eq!(ud.intent(), Some(Direction::Up));
        let rd = HeldArrows {
            right: true,
            down: true,
            ..Default::default()
        };
        assert_eq!(rd.intent(), Some(Direction::Right));
        assert_eq!(HeldArrows::default().intent(), None);
    }

    #[test]
    fn pacer_spaces_moves() {
        let t0 = Instant::now();
        let mut pacer = MovePacer::new(Duration::from_millis(100));
        assert!(pacer.allow(t0));
        assert!(!pacer.allow(t0 + Duration::from_millis(50)));
        assert!(pacer.allow(t0 + Duration::from_millis(100)));
        pacer.reset();
        assert!(pacer.allow(t0 + Duration::from_millis(101)));
    }

    #[test]
    fn ready_does_not_consume() {
        let t0 = Instant::now();
        let mut pacer = MovePacer::new(Duration::from_millis(100));
        assert!(pacer.ready(t0));
        assert!(pacer.ready(t0));
        pacer.record(t0);
        assert!(!pacer.ready(t0 + Duration::from_millis(99)));
        assert!(pacer.ready(t0 + Duration::from_millis(100)));
    }
}
