use std::time::Duration;

use mazeviz_core::{CellKind, Direction, Grid, Pos};
use mazeviz_gen::MazeGen;
use mazeviz_paths::{PathSearch, Search, SearchKind, SearchOutcome, Step, Visit};
use mazeviz_solve::{Clock, HeldArrows, MovePacer, Phase, SolveError, SolveSession, SystemClock};
use rand::Rng;
use rand::rngs::ThreadRng;

use crate::config::{ConfigError, VisualizerConfig};

/// Callback invoked once per search visitation, after the grid has been
/// updated for that visit.
pub type OnStep<'a> = &'a mut dyn FnMut(Visit, &Grid);

/// The engine behind a maze visualiser: one grid plus everything that acts
/// on it.
///
/// Every user command of the presentation layer maps to one method here.
/// Searches and the solve session take turns on the grid: starting a search
/// ends any solve session, and starting a session clears leftover search
/// markers.
pub struct Visualizer<R: Rng = ThreadRng, C: Clock + Clone = SystemClock> {
    config: VisualizerConfig,
    grid: Grid,
    maze: MazeGen<R>,
    clock: C,
    session: SolveSession<C>,
    pacer: MovePacer,
    last_path: Option<Vec<Pos>>,
}

impl Visualizer {
    /// A visualiser on an empty grid sized from `config`, using the thread
    /// RNG and the wall clock.
    pub fn new(config: VisualizerConfig) -> Result<Self, ConfigError> {
        Self::with_parts(config, rand::rng(), SystemClock)
    }
}

impl<R: Rng, C: Clock + Clone> Visualizer<R, C> {
    /// A visualiser with an explicit random source and clock.
    pub fn with_parts(config: VisualizerConfig, rng: R, clock: C) -> Result<Self, ConfigError> {
        config.validate()?;
        log::debug!(
            "visualizer: {}x{} grid, wall probability {}",
            config.rows,
            config.columns,
            config.wall_probability
        );
        Ok(Self {
            grid: Grid::new(config.rows, config.columns),
            maze: MazeGen::new(rng),
            session: SolveSession::with_clock(clock.clone()),
            clock,
            pacer: MovePacer::new(config.move_delay),
            last_path: None,
            config,
        })
    }

    // -----------------------------------------------------------------
    // Queries
    // -----------------------------------------------------------------

    #[inline]
    pub fn config(&self) -> &VisualizerConfig {
        &self.config
    }

    #[inline]
    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    /// What the cell at `p` holds, `None` off the grid.
    #[inline]
    pub fn cell(&self, p: Pos) -> Option<CellKind> {
        self.grid.at(p)
    }

    #[inline]
    pub fn rows(&self) -> i32 {
        self.grid.rows()
    }

    #[inline]
    pub fn columns(&self) -> i32 {
        self.grid.columns()
    }

    #[inline]
    pub fn start(&self) -> Option<Pos> {
        self.grid.start()
    }

    #[inline]
    pub fn end(&self) -> Option<Pos> {
        self.grid.end()
    }

    /// Path found by the most recent completed search, if it found one.
    pub fn last_path(&self) -> Option<&[Pos]> {
        self.last_path.as_deref()
    }

    #[inline]
    pub fn solve_phase(&self) -> Phase {
        self.session.phase()
    }

    /// Position of the solve walker, `None` while Idle.
    #[inline]
    pub fn walker(&self) -> Option<Pos> {
        self.session.position()
    }

    /// Solve timer: live while Running, frozen once Finished.
    #[inline]
    pub fn elapsed(&self) -> Duration {
        self.session.elapsed()
    }

    // -----------------------------------------------------------------
    // Editing
    // -----------------------------------------------------------------

    /// Place a Start, End or Wall. Returns whether the grid changed.
    pub fn place(&mut self, kind: CellKind, p: Pos) -> bool {
        self.grid.place(kind, p)
    }

    /// Empty the cell at `p`, returning what it held.
    pub fn erase(&mut self, p: Pos) -> Option<CellKind> {
        self.grid.erase(p)
    }

    /// Scatter walls over free cells with the configured probability.
    pub fn randomize_walls(&mut self) -> usize {
        self.randomize_walls_with(self.config.wall_probability)
    }

    /// Scatter walls over free cells with the given probability.
    pub fn randomize_walls_with(&mut self, probability: f64) -> usize {
        let added = self.grid.randomize_walls(probability, &mut self.maze.rng);
        log::info!("added {added} random walls (p = {probability})");
        added
    }

    /// Back to an all-Empty grid with no solve session and no path.
    pub fn reset(&mut self) {
        self.session.reset(&mut self.grid);
        self.grid.reset();
        self.pacer.reset();
        self.last_path = None;
        log::info!("grid reset");
    }

    /// Remove search and solve markers. Returns the number of cells
    /// cleared.
    pub fn clear_transient_markers(&mut self) -> usize {
        self.grid.clear_transient_markers()
    }

    /// Replace the grid contents with a fresh maze. Start and End are
    /// dropped and any solve session is discarded. Returns the number of
    /// cells carved open.
    pub fn generate_maze(&mut self) -> usize {
        self.session.reset(&mut self.grid);
        self.last_path = None;
        let carved = self.maze.generate(&mut self.grid);
        log::info!(
            "generated a {}x{} maze, {carved} cells open",
            self.grid.rows(),
            self.grid.columns()
        );
        carved
    }

    // -----------------------------------------------------------------
    // Searches
    // -----------------------------------------------------------------

    /// Run BFS from `start` to `end` to completion, calling `on_step` after
    /// every visitation. Returns the path, or `None` if there is none.
    pub fn run_bfs(
        &mut self,
        start: Pos,
        end: Pos,
        on_step: Option<OnStep<'_>>,
    ) -> Option<Vec<Pos>> {
        self.run(SearchKind::Bfs, start, end, on_step)
    }

    /// Like [`run_bfs`](Self::run_bfs), with uniform-cost search.
    pub fn run_search(
        &mut self,
        start: Pos,
        end: Pos,
        on_step: Option<OnStep<'_>>,
    ) -> Option<Vec<Pos>> {
        self.run(SearchKind::Dijkstra, start, end, on_step)
    }

    /// Run `kind` between the placed Start and End.
    ///
    /// Returns `None` without touching the grid when either endpoint is
    /// missing; otherwise the outcome of the search.
    pub fn run_placed(
        &mut self,
        kind: SearchKind,
        on_step: Option<OnStep<'_>>,
    ) -> Option<SearchOutcome> {
        let (Some(start), Some(end)) = (self.grid.start(), self.grid.end()) else {
            log::warn!("{kind:?}: place both Start and End first");
            return None;
        };
        let path = self.run(kind, start, end, on_step);
        Some(path.map_or(SearchOutcome::NoPath, SearchOutcome::Found))
    }

    fn run(
        &mut self,
        kind: SearchKind,
        start: Pos,
        end: Pos,
        on_step: Option<OnStep<'_>>,
    ) -> Option<Vec<Pos>> {
        let mut search = self.begin_search(kind, start, end);
        let outcome = match on_step {
            Some(f) => search.run(&mut self.grid, f),
            None => search.run_to_end(&mut self.grid),
        };
        self.record(kind, &search, outcome)
    }

    /// Prepare a search for a driver that steps it itself, one frame at a
    /// time, through [`step_search`](Self::step_search).
    ///
    /// Ends any solve session and clears earlier markers. A search dropped
    /// before it finishes leaves its markers behind until the next
    /// [`clear_transient_markers`](Self::clear_transient_markers).
    pub fn begin_search(&mut self, kind: SearchKind, start: Pos, end: Pos) -> PathSearch {
        if self.session.phase() != Phase::Idle {
            log::debug!("search requested, ending solve session");
            self.session.reset(&mut self.grid);
        }
        self.grid.clear_transient_markers();
        self.last_path = None;
        log::info!("{kind:?}: searching from {start} to {end}");
        PathSearch::new(kind, &self.grid, start, end)
    }

    /// Advance `search` by one visitation. The final step records the
    /// path as [`last_path`](Self::last_path).
    pub fn step_search(&mut self, search: &mut PathSearch) -> Step {
        let finished_before = search.is_finished();
        let step = search.step(&mut self.grid);
        if let (Step::Finished(outcome), false) = (&step, finished_before) {
            self.record(search.kind(), search, outcome.clone());
        }
        step
    }

    fn record(
        &mut self,
        kind: SearchKind,
        search: &PathSearch,
        outcome: SearchOutcome,
    ) -> Option<Vec<Pos>> {
        match &outcome {
            SearchOutcome::Found(path) => log::info!(
                "{kind:?}: path of {} cells, {} cells visited",
                path.len(),
                search.trace().len()
            ),
            SearchOutcome::NoPath => log::info!(
                "{kind:?}: no path, {} cells visited",
                search.trace().len()
            ),
        }
        self.last_path = outcome.into_path();
        self.last_path.clone()
    }

    // -----------------------------------------------------------------
    // Solve session
    // -----------------------------------------------------------------

    /// Start a timed manual run from Start to End.
    pub fn start_solve(&mut self) -> Result<(), SolveError> {
        // A refused start leaves the grid as it was.
        self.session.start(&mut self.grid)?;
        self.grid.clear_transient_markers();
        self.last_path = None;
        self.pacer.reset();
        Ok(())
    }

    /// One tick of the solve loop. A move is attempted only if the move
    /// delay has passed since the last move that went through; otherwise
    /// the tick just keeps the timer running. Blocked moves do not start a
    /// new delay.
    pub fn tick_solve(&mut self, intent: Option<Direction>) -> Phase {
        if !self.session.is_running() {
            return self.session.phase();
        }
        let now = self.clock.now();
        let intent = intent.filter(|_| self.pacer.ready(now));
        let moves = self.session.moves();
        let phase = self.session.tick(&mut self.grid, intent);
        if self.session.moves() != moves {
            self.pacer.record(now);
        }
        phase
    }

    /// [`tick_solve`](Self::tick_solve) driven by raw arrow-key state.
    pub fn tick_solve_keys(&mut self, held: HeldArrows) -> Phase {
        self.tick_solve(held.intent())
    }

    pub fn stop_solve(&mut self) -> Phase {
        self.session.stop()
    }

    /// Discard the solve session and its marker.
    pub fn reset_solve(&mut self) {
        self.session.reset(&mut self.grid);
        self.pacer.reset();
    }
}

#[cfg(test)]
mod tests {
    use mazeviz_solve::ManualClock;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    use super::*;

    fn vis(rows: i32, columns: i32) -> (Visualizer<StdRng, ManualClock>, ManualClock) {
        let clock = ManualClock::new();
        let config = VisualizerConfig {
            rows,
            columns,
            ..Default::default()
        };
        let v = Visualizer::with_parts(config, StdRng::seed_from_u64(3), clock.clone()).unwrap();
        (v, clock)
    }

    #[test]
    fn rejects_invalid_config() {
        let config = VisualizerConfig {
            columns: -1,
            ..Default::default()
        };
        assert!(Visualizer::new(config).is_err());
    }

    #[test]
    fn run_placed_needs_both_endpoints() {
        let (mut v, _) = vis(3, 3);
        v.place(CellKind::Start, Pos::new(0, 0));
        assert_eq!(v.run_placed(SearchKind::Bfs, None), None);
        assert_eq!(v.grid().count(CellKind::Visited), 0);

        v.place(CellKind::End, Pos::new(2, 2));
        let outcome = v.run_placed(SearchKind::Bfs, None).unwrap();
        assert_eq!(outcome.path().map(<[Pos]>::len), Some(5));
        assert_eq!(v.last_path().map(<[Pos]>::len), Some(5));
    }

    #[test]
    fn step_callback_sees_every_visit() {
        let (mut v, _) = vis(4, 4);
        let mut seen = Vec::new();
        let mut cb = |visit: Visit, g: &Grid| {
            assert_ne!(g.at(visit.cell), Some(CellKind::Empty));
            seen.push(visit.cell);
        };
        let path = v.run_bfs(Pos::new(0, 0), Pos::new(3, 3), Some(&mut cb));
        assert_eq!(path.map(|p| p.len()), Some(7));
        assert!(!seen.is_empty());
    }

    #[test]
    fn stepping_records_path_once_finished() {
        let (mut v, _) = vis(1, 4);
        let mut search = v.begin_search(SearchKind::Dijkstra, Pos::new(0, 0), Pos::new(0, 3));
        let mut steps = 0;
        while let Step::Visited(_) = v.step_search(&mut search) {
            steps += 1;
            assert_eq!(v.last_path(), None);
        }
        assert_eq!(steps, 3);
        assert_eq!(v.last_path().map(<[Pos]>::len), Some(4));
    }

    #[test]
    fn search_ends_solve_session() {
        let (mut v, _) = vis(1, 3);
        v.place(CellKind::Start, Pos::new(0, 0));
        v.place(CellKind::End, Pos::new(0, 2));
        v.start_solve().unwrap();
        v.tick_solve(Some(Direction::Right));
        assert_eq!(v.cell(Pos::new(0, 1)), Some(CellKind::UserToken));

        v.run_placed(SearchKind::Bfs, None);
        assert_eq!(v.solve_phase(), Phase::Idle);
        assert_eq!(v.grid().count(CellKind::UserToken), 0);
    }

    #[test]
    fn moves_are_paced() {
        let (mut v, clock) = vis(1, 5);
        v.place(CellKind::Start, Pos::new(0, 0));
        v.place(CellKind::End, Pos::new(0, 4));
        v.start_solve().unwrap();

        v.tick_solve(Some(Direction::Right));
        v.tick_solve(Some(Direction::Right));
        assert_eq!(v.walker(), Some(Pos::new(0, 1)));

        clock.advance(v.config().move_delay);
        v.tick_solve(Some(Direction::Right));
        assert_eq!(v.walker(), Some(Pos::new(0, 2)));
    }

    #[test]
    fn blocked_move_does_not_delay_next_move() {
        let (mut v, _) = vis(2, 3);
        v.place(CellKind::Start, Pos::new(0, 0));
        v.place(CellKind::Wall, Pos::new(0, 1));
        v.place(CellKind::End, Pos::new(1, 2));
        v.start_solve().unwrap();

        v.tick_solve(Some(Direction::Right));
        assert_eq!(v.walker(), Some(Pos::new(0, 0)));
        v.tick_solve(Some(Direction::Down));
        assert_eq!(v.walker(), Some(Pos::new(1, 0)));
        // The successful move does start a delay.
        v.tick_solve(Some(Direction::Right));
        assert_eq!(v.walker(), Some(Pos::new(1, 0)));
    }

    #[test]
    fn refused_solve_keeps_search_markers() {
        let (mut v, _) = vis(3, 3);
        v.place(CellKind::Start, Pos::new(0, 0));
        v.run_bfs(Pos::new(0, 0), Pos::new(2, 2), None);
        let visited = v.grid().count(CellKind::Visited);
        assert!(visited > 0);

        assert!(v.start_solve().is_err());
        assert_eq!(v.grid().count(CellKind::Visited), visited);
        assert!(v.last_path().is_some());
    }

    #[test]
    fn generate_maze_drops_endpoints_and_session() {
        let (mut v, _) = vis(7, 7);
        v.place(CellKind::Start, Pos::new(0, 0));
        v.place(CellKind::End, Pos::new(6, 6));
        v.start_solve().unwrap();
        let carved = v.generate_maze();
        assert_eq!(carved, v.grid().count(CellKind::Empty));
        assert_eq!(v.start(), None);
        assert_eq!(v.end(), None);
        assert_eq!(v.solve_phase(), Phase::Idle);
    }

    #[test]
    fn reset_clears_everything() {
        let (mut v, _) = vis(3, 3);
        v.place(CellKind::Wall, Pos::new(1, 1));
        v.run_bfs(Pos::new(0, 0), Pos::new(2, 2), None);
        assert!(v.last_path().is_some());
        v.reset();
        assert_eq!(v.last_path(), None);
        assert_eq!(v.grid().count(CellKind::Empty), 9);
    }
}
