//! Terminal match-3 runner (default binary).
//!
//! Plays the board with the mouse: press on a piece, drag onto a neighbour,
//! release. Uses crossterm for input and a framebuffer-based renderer.
//!
//! Environment:
//! - `MATCH3_CONFIG`, `MATCH3_WIDTH`, `MATCH3_HEIGHT`, `MATCH3_PALETTE`: board config
//! - `MATCH3_SEED`: RNG seed (defaults to the clock)
//! - `MATCH3_LOG_PATH`: log file; logging is off when unset so the screen stays clean

use std::sync::Mutex;
use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};

use anyhow::{Context, Result};
use crossterm::event::{self, Event, KeyEventKind};
use tracing::info;
use tracing_subscriber::EnvFilter;

use match3::core::config::{log_path_from_env, seed_from_env};
use match3::core::{BoardConfig, Coordinator};
use match3::input::{handle_key_event, KeyCommand, PointerTracker};
use match3::term::{BoardView, FrameBuffer, HighlightLayer, StatusView, TerminalRenderer, Viewport};
use match3::types::TICK_MS;

fn main() -> Result<()> {
    init_logging()?;
    let config = BoardConfig::from_env().context("loading board config")?;
    let seed = seed_from_env().unwrap_or_else(clock_seed);

    let mut term = TerminalRenderer::new();
    term.enter()?;

    let result = run(&mut term, config, seed);

    // Always try to restore terminal state.
    let _ = term.exit();
    result
}

fn init_logging() -> Result<()> {
    let Some(path) = log_path_from_env() else {
        return Ok(());
    };
    let file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .with_context(|| format!("opening log file {path}"))?;
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();
    Ok(())
}

fn clock_seed() -> u32 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs() as u32)
        .unwrap_or(1)
}

fn run(term: &mut TerminalRenderer, config: BoardConfig, mut seed: u32) -> Result<()> {
    let mut game = Coordinator::new(config.clone(), seed)?;
    info!(seed, "game started");

    let view = BoardView::new();
    let mut highlights = HighlightLayer::new();
    let mut pointer = PointerTracker::new();
    let mut status = StatusView {
        seed,
        ..Default::default()
    };
    let mut fb = FrameBuffer::new(0, 0);

    let mut last_tick = Instant::now();
    let tick_duration = Duration::from_millis(TICK_MS as u64);

    loop {
        game.drain_visual_requests(&mut highlights);
        if let Some(report) = game.take_report() {
            status.last_cascade = Some(report);
            status.cascades += 1;
        }

        // Render.
        let (w, h) = crossterm::terminal::size().unwrap_or((80, 24));
        let layout = view.render_into(&game, &highlights, &status, Viewport::new(w, h), &mut fb);
        term.draw_swap(&mut fb)?;

        // Input with timeout until next tick.
        let timeout = tick_duration
            .checked_sub(last_tick.elapsed())
            .unwrap_or(Duration::ZERO);

        if event::poll(timeout)? {
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => match handle_key_event(key) {
                    Some(KeyCommand::Quit) => return Ok(()),
                    Some(KeyCommand::Restart) => {
                        seed = seed.wrapping_add(1);
                        game = Coordinator::new(config.clone(), seed)?;
                        highlights.clear();
                        pointer.reset();
                        status = StatusView {
                            seed,
                            ..Default::default()
                        };
                        info!(seed, "game restarted");
                    }
                    Some(KeyCommand::ShowMatches) => {
                        game.board_mut().highlight_all_matches();
                    }
                    None => {}
                },
                Event::Mouse(mouse) => {
                    for ev in pointer.handle(&mouse, &layout) {
                        game.handle_input(ev);
                    }
                }
                Event::Resize(..) => term.invalidate(),
                _ => {}
            }
        }

        // Tick.
        if last_tick.elapsed() >= tick_duration {
            last_tick = Instant::now();
            game.tick(TICK_MS);
        }
    }
}
