//! The [`SolveSession`] state machine.
//!
//! ```text
//!  Idle --start()--> Running --tick() reaching End / stop()--> Finished
//!    ^                  |                                         |
//!    +----reset()-------+-------------reset()---------------------+
//! ```

use std::time::{Duration, Instant};

use mazeviz_core::{CellKind, Direction, Grid, Pos};

use crate::clock::{Clock, SystemClock};
use crate::error::SolveError;

/// Where a session is in its lifecycle.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Phase {
    #[default]
    Idle,
    Running,
    Finished,
}

/// A timed attempt to walk from Start to End by hand.
///
/// The session owns the walker's position; the grid only shows it through
/// the UserToken marker. Start and End keep their own markers while the
/// walker stands on them.
#[derive(Debug)]
pub struct SolveSession<C: Clock = SystemClock> {
    clock: C,
    phase: Phase,
    position: Option<Pos>,
    started_at: Option<Instant>,
    elapsed: Duration,
    moves: u32,
}

impl SolveSession<SystemClock> {
    pub fn new() -> Self {
        Self::with_clock(SystemClock)
    }
}

impl Default for SolveSession<SystemClock> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: Clock> SolveSession<C> {
    pub fn with_clock(clock: C) -> Self {
        Self {
            clock,
            phase: Phase::Idle,
            position: None,
            started_at: None,
            elapsed: Duration::ZERO,
            moves: 0,
        }
    }

    #[inline]
    pub fn phase(&self) -> Phase {
        self.phase
    }

    #[inline]
    pub fn is_running(&self) -> bool {
        self.phase == Phase::Running
    }

    /// The walker's position, `None` while Idle.
    #[inline]
    pub fn position(&self) -> Option<Pos> {
        self.position
    }

    /// Number of successful moves in the current (or last) run.
    #[inline]
    pub fn moves(&self) -> u32 {
        self.moves
    }

    /// Begin a run from the grid's Start.
    ///
    /// Fails with [`SolveError::PreconditionNotMet`] unless both Start and
    /// End are placed, and with [`SolveError::AlreadyRunning`] during a run.
    /// Starting again after a finished run discards that run.
    pub fn start(&mut self, grid: &mut Grid) -> Result<(), SolveError> {
        if self.phase == Phase::Running {
            return Err(SolveError::AlreadyRunning);
        }
        let (Some(start), Some(_)) = (grid.start(), grid.end()) else {
            let err = SolveError::PreconditionNotMet {
                missing_start: grid.start().is_none(),
                missing_end: grid.end().is_none(),
            };
            log::warn!("{err}");
            return Err(err);
        };

        self.clear_token(grid);
        self.phase = Phase::Running;
        self.position = Some(start);
        self.started_at = Some(self.clock.now());
        self.elapsed = Duration::ZERO;
        self.moves = 0;
        log::info!("solve: started at {start}");
        Ok(())
    }

    /// Advance one tick with at most one intended move.
    ///
    /// A move into a Wall or off the grid is ignored. Reaching the End
    /// finishes the run and freezes the timer. Outside of Running this does
    /// nothing. Returns the phase after the tick.
    pub fn tick(&mut self, grid: &mut Grid, intent: Option<Direction>) -> Phase {
        if self.phase != Phase::Running {
            return self.phase;
        }
        let (Some(dir), Some(current)) = (intent, self.position) else {
            return self.phase;
        };

        let candidate = current.step(dir);
        if !grid.at(candidate).is_some_and(CellKind::is_passable) {
            return self.phase;
        }

        if grid.at(current) == Some(CellKind::UserToken) {
            grid.unmark(current);
        }
        grid.mark(candidate, CellKind::UserToken);
        self.position = Some(candidate);
        self.moves += 1;

        if grid.end() == Some(candidate) {
            self.finish();
        }
        self.phase
    }

    /// End the run now, wherever the walker is. Only meaningful while
    /// Running; returns the resulting phase.
    pub fn stop(&mut self) -> Phase {
        if self.phase == Phase::Running {
            self.finish();
        }
        self.phase
    }

    /// Time spent so far: live while Running, frozen once Finished, zero
    /// while Idle.
    pub fn elapsed(&self) -> Duration {
        match (self.phase, self.started_at) {
            (Phase::Running, Some(t0)) => self.clock.now().saturating_duration_since(t0),
            (Phase::Finished, _) => self.elapsed,
            _ => Duration::ZERO,
        }
    }

    /// Back to Idle, removing the walker's marker from the grid.
    pub fn reset(&mut self, grid: &mut Grid) {
        self.clear_token(grid);
        self.phase = Phase::Idle;
        self.position = None;
        self.started_at = None;
        self.elapsed = Duration::ZERO;
        self.moves = 0;
    }

    fn clear_token(&self, grid: &mut Grid) {
        if let Some(p) = self.position {
            if grid.at(p) == Some(CellKind::UserToken) {
                grid.unmark(p);
            }
        }
    }

    fn finish(&mut self) {
        if let Some(t0) = self.started_at {
            self.elapsed = self.clock.now().saturating_duration_since(t0);
        }
        self.phase = Phase::Finished;
        log::info!(
            "solve: finished after {} moves in {:.2}s",
            self.moves,
            self.elapsed.as_secs_f64()
        );
    }
}
