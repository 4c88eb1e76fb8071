//! Board context - grid, input gate, RNG and configuration in one place
//!
//! Every component receives the board explicitly; there is no global state.

use tracing::{debug, info};

use crate::config::{BoardConfig, ConfigError};
use crate::fill::{fill_board, FillReport};
use crate::grid::Grid;
use crate::matcher::all_matches;
use crate::piece_set::PieceSet;
use crate::rng::SimpleRng;

/// Whether swap proposals are accepted.
///
/// Closed for the duration of a cascade, open otherwise.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InputGate {
    open: bool,
}

impl InputGate {
    pub fn new() -> Self {
        Self { open: true }
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn open(&mut self) {
        self.open = true;
    }

    pub fn close(&mut self) {
        self.open = false;
    }
}

impl Default for InputGate {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Clone)]
pub struct Board {
    grid: Grid,
    gate: InputGate,
    rng: SimpleRng,
    config: BoardConfig,
}

impl Board {
    /// Validate `config`, lay out the tiles and fill the board.
    pub fn new(config: BoardConfig, seed: u32) -> Result<Self, ConfigError> {
        config.validate()?;
        let grid = Grid::with_tiles(config.width, config.height, &config.starting_tiles);
        let mut board = Self {
            grid,
            gate: InputGate::new(),
            rng: SimpleRng::new(seed),
            config,
        };
        let report = board.fill();
        info!(
            width = board.config.width,
            height = board.config.height,
            seed,
            filled = report.filled,
            "board ready"
        );
        Ok(board)
    }

    /// Wrap a prepared grid without filling it.
    ///
    /// The config's dimensions are replaced by the grid's. The palette is not
    /// validated, so tests can use degenerate palettes.
    pub fn from_grid(grid: Grid, mut config: BoardConfig, seed: u32) -> Self {
        config.width = grid.width() as u16;
        config.height = grid.height() as u16;
        Self {
            grid,
            gate: InputGate::new(),
            rng: SimpleRng::new(seed),
            config,
        }
    }

    /// Fill every empty cell using the configured drop-in.
    pub fn fill(&mut self) -> FillReport {
        fill_board(
            &mut self.grid,
            &mut self.rng,
            self.config.palette_size,
            self.config.fill_fall_offset,
            self.config.fill_move_ms,
        )
    }

    /// Highlight every run currently on the board. Debug aid.
    ///
    /// Every normal tile is reset first, so highlights left over from an
    /// earlier call disappear.
    pub fn highlight_all_matches(&mut self) -> PieceSet {
        let normal: Vec<_> = self
            .grid
            .tiles()
            .filter(|t| !t.is_obstacle())
            .map(|t| t.coord)
            .collect();
        for at in normal {
            self.grid.highlight(at, None);
        }

        let found = all_matches(&self.grid);
        debug!(pieces = found.len(), "highlighting all matches");
        self.grid.highlight_pieces(&found);
        found
    }

    /// Destroy every piece.
    pub fn clear_board(&mut self) {
        self.grid.clear_all();
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn grid_mut(&mut self) -> &mut Grid {
        &mut self.grid
    }

    pub fn gate(&self) -> InputGate {
        self.gate
    }

    pub fn gate_mut(&mut self) -> &mut InputGate {
        &mut self.gate
    }

    pub fn config(&self) -> &BoardConfig {
        &self.config
    }
}
