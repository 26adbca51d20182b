//! Headless driver for the mazeviz engine.
//!
//! Generates a maze, animates BFS and uniform-cost search on it in the
//! terminal, then replays the BFS path as a timed solve run.
//!
//! Usage: `mazeviz-demo [config.json]`. Set `RUST_LOG=debug` for more.

use std::error::Error;
use std::io::{self, Write};
use std::thread;
use std::time::Duration;

use crossterm::{
    cursor, queue,
    terminal::{self, ClearType},
};

use mazeviz::{
    CellKind, Direction, Grid, Phase, Pos, SearchKind, SearchOutcome, Visit, Visualizer,
    VisualizerConfig,
};

fn load_config() -> Result<VisualizerConfig, Box<dyn Error>> {
    match std::env::args().nth(1) {
        Some(path) => {
            let text = std::fs::read_to_string(&path)?;
            let config = serde_json::from_str(&text)?;
            log::info!("loaded config from {path}");
            Ok(config)
        }
        None => Ok(VisualizerConfig::default()),
    }
}

/// Redraw the grid in place.
fn draw(grid: &Grid) -> io::Result<()> {
    let mut out = io::stdout().lock();
    queue!(
        out,
        cursor::MoveTo(0, 0),
        terminal::Clear(ClearType::FromCursorDown)
    )?;
    writeln!(out, "{grid}")?;
    out.flush()
}

fn animate(vis: &mut Visualizer, kind: SearchKind) -> io::Result<Option<SearchOutcome>> {
    let delay = vis.config().animation_delay;
    // The first failed frame stops further drawing and is reported once the
    // search returns.
    let mut failed: Option<io::Error> = None;
    let mut on_step = |_: Visit, grid: &Grid| {
        if failed.is_some() {
            return;
        }
        match draw(grid) {
            Ok(()) => thread::sleep(delay),
            Err(e) => failed = Some(e),
        }
    };
    let outcome = vis.run_placed(kind, Some(&mut on_step));
    if let Some(e) = failed {
        return Err(e);
    }
    draw(vis.grid())?;
    Ok(outcome)
}

fn direction_between(a: Pos, b: Pos) -> Option<Direction> {
    Direction::ALL.into_iter().find(|&d| a.step(d) == b)
}

fn walk(vis: &mut Visualizer, path: &[Pos]) -> Result<(), Box<dyn Error>> {
    vis.start_solve()?;
    let pace = vis.config().move_delay + Duration::from_millis(1);
    for w in path.windows(2) {
        let Some(dir) = direction_between(w[0], w[1]) else {
            break;
        };
        thread::sleep(pace);
        let phase = vis.tick_solve(Some(dir));
        draw(vis.grid())?;
        if phase == Phase::Finished {
            break;
        }
    }
    if vis.solve_phase() == Phase::Running {
        vis.stop_solve();
    }
    Ok(())
}

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = load_config()?;
    let mut vis = Visualizer::new(config)?;

    vis.generate_maze();
    // The bottom-right lattice room is always carved.
    let end = Pos::new((vis.rows() - 1) / 2 * 2, (vis.columns() - 1) / 2 * 2);
    vis.place(CellKind::Start, Pos::ORIGIN);
    vis.place(CellKind::End, end);

    let mut lengths = Vec::new();
    for kind in [SearchKind::Bfs, SearchKind::Dijkstra] {
        let outcome = animate(&mut vis, kind)?;
        lengths.push((kind, outcome.and_then(|o| o.path().map(<[Pos]>::len))));
        thread::sleep(Duration::from_millis(500));
    }

    let path = vis.last_path().map(<[Pos]>::to_vec);
    if let Some(path) = path {
        walk(&mut vis, &path)?;
    }

    for (kind, len) in lengths {
        match len {
            Some(n) => println!("{kind:?}: {n} cells"),
            None => println!("{kind:?}: no path"),
        }
    }
    println!(
        "solve run: {:?} after {} ms",
        vis.solve_phase(),
        vis.elapsed().as_millis()
    );
    Ok(())
}
