//! Headless match-3 simulation.
//!
//! Plays scripted swaps against a seeded board, checking grid invariants after
//! every tick, and prints a summary. Useful for soak-testing cascades.
//!
//! Environment: the board variables of the terminal binary, plus
//! `MATCH3_SEED` (default 1) and `MATCH3_TURNS` (default 50).

use anyhow::{bail, Context, Result};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use match3::core::config::seed_from_env;
use match3::core::{
    matches_for_pieces, BoardConfig, CascadeReport, Coordinator, Grid, NullSink, PieceSet, SimpleRng,
};
use match3::types::{Coord, InputEvent, TICK_MS};

/// Ticks allowed for one turn before the cascade counts as stalled.
const MAX_TICKS_PER_TURN: u32 = 100_000;

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let config = BoardConfig::from_env().context("loading board config")?;
    let seed = seed_from_env().unwrap_or(1);
    let turns: u32 = match std::env::var("MATCH3_TURNS") {
        Ok(v) => v
            .trim()
            .parse()
            .with_context(|| format!("invalid MATCH3_TURNS {v:?}"))?,
        Err(_) => 50,
    };

    let mut game = Coordinator::new(config, seed)?;
    // Nothing renders here; the outbox would otherwise grow every turn.
    game.drain_visual_requests(&mut NullSink);
    let mut rng = SimpleRng::new(seed.rotate_left(16) ^ 0x9e37_79b9);
    let mut pairs = adjacent_pairs(game.grid());

    let mut totals = CascadeReport::default();
    let mut cascades = 0u32;
    let mut reverted = 0u32;
    let mut ticks = 0u64;

    for turn in 0..turns {
        rng.shuffle(&mut pairs);
        let Some(&(a, b)) = pairs
            .iter()
            .find(|(a, b)| swap_makes_match(game.grid(), *a, *b))
            .or_else(|| pairs.first())
        else {
            bail!("board has no adjacent pairs");
        };

        game.handle_input(InputEvent::TileTapped(a));
        game.handle_input(InputEvent::TileDraggedOnto(b));
        if !game.handle_input(InputEvent::Released) {
            debug!(turn, %a, %b, "swap not started");
            continue;
        }

        let mut turn_ticks = 0;
        loop {
            game.tick(TICK_MS);
            game.drain_visual_requests(&mut NullSink);
            turn_ticks += 1;
            game.grid().verify()?;
            if game.is_stable() {
                break;
            }
            if turn_ticks >= MAX_TICKS_PER_TURN {
                bail!("turn {turn} stalled in phase {}", game.phase().as_str());
            }
        }
        ticks += turn_ticks as u64;

        match game.take_report() {
            Some(report) => {
                info!(turn, waves = report.waves, cleared = report.pieces_cleared, "cascade");
                cascades += 1;
                totals.waves += report.waves;
                totals.refills += report.refills;
                totals.pieces_cleared += report.pieces_cleared;
            }
            None => reverted += 1,
        }
    }

    println!("seed            {seed}");
    println!("turns           {turns}");
    println!("cascades        {cascades}");
    println!("reverted swaps  {reverted}");
    println!("waves           {}", totals.waves);
    println!("refills         {}", totals.refills);
    println!("pieces cleared  {}", totals.pieces_cleared);
    println!("simulated ms    {}", ticks * TICK_MS as u64);
    Ok(())
}

fn adjacent_pairs(grid: &Grid) -> Vec<(Coord, Coord)> {
    let mut pairs = Vec::new();
    for x in 0..grid.width() {
        for y in 0..grid.height() {
            let at = Coord::new(x, y);
            for next in [at.offset(1, 0), at.offset(0, 1)] {
                if grid.is_within_bounds(next) {
                    pairs.push((at, next));
                }
            }
        }
    }
    pairs
}

/// Try the swap on a scratch copy of the grid.
fn swap_makes_match(grid: &Grid, a: Coord, b: Coord) -> bool {
    let (Some(pa), Some(pb)) = (grid.get(a), grid.get(b)) else {
        return false;
    };
    let mut scratch = grid.clone();
    scratch.move_piece(pa, b, 0);
    scratch.move_piece(pb, a, 0);
    let swapped: PieceSet = [pa, pb].into_iter().collect();
    !matches_for_pieces(&scratch, &swapped).is_empty()
}
