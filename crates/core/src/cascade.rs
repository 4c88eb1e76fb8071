//! Cascade coordinator - turn resolution state machine
//!
//! The coordinator owns the [`Board`] and turns input events plus fixed ticks
//! into swaps, match waves, collapses and refills.
//!
//! # Selection
//!
//! ```text
//! Idle --tap--> AwaitingSecondTap --drag--> AwaitingRelease --release--> Idle
//! ```
//!
//! Adjacency is only checked on release. Taps while a selection exists are
//! ignored.
//!
//! # Phases
//!
//! ```text
//! Idle -> Swapping -+-> Reverting -> Idle                  (no match)
//!                   +-> Highlighting -> Clearing -> Collapsing -> CollapseSettle
//!                          ^                                        |
//!                          +------------- chain match --------------+
//!                          |                                        | no match
//!                          +------ match after refill -- Settling <- Refilling
//!                                                           | no match
//!                                                           v
//!                                                          Idle (gate reopens)
//! ```
//!
//! Every timed phase counts down with `tick(elapsed_ms)`; `Collapsing` instead
//! polls until every moved piece has settled and has no timeout.

use arrayvec::ArrayVec;
use tracing::{debug, info, instrument, warn};

use crate::board::Board;
use crate::collapse::collapse_columns;
use crate::config::{BoardConfig, ConfigError};
use crate::grid::Grid;
use crate::matcher::{all_matches, matches_for_pieces};
use crate::piece_set::PieceSet;
use crate::types::{Coord, InputEvent, PieceId};
use crate::visual::VisualSink;

/// Pointer selection progress.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Selection {
    #[default]
    Idle,
    AwaitingSecondTap { first: Coord },
    AwaitingRelease { first: Coord, target: Coord },
}

/// Observable phase of the coordinator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PhaseKind {
    Idle,
    Swapping,
    Reverting,
    Highlighting,
    Clearing,
    Collapsing,
    CollapseSettle,
    Refilling,
    Settling,
}

impl PhaseKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            PhaseKind::Idle => "idle",
            PhaseKind::Swapping => "swapping",
            PhaseKind::Reverting => "reverting",
            PhaseKind::Highlighting => "highlighting",
            PhaseKind::Clearing => "clearing",
            PhaseKind::Collapsing => "collapsing",
            PhaseKind::CollapseSettle => "collapseSettle",
            PhaseKind::Refilling => "refilling",
            PhaseKind::Settling => "settling",
        }
    }
}

#[derive(Debug, Clone)]
enum Phase {
    Idle,
    Swapping {
        remaining_ms: u32,
        pair: ArrayVec<PieceId, 2>,
    },
    Reverting {
        remaining_ms: u32,
    },
    Highlighting {
        remaining_ms: u32,
        pending: PieceSet,
    },
    Clearing {
        remaining_ms: u32,
        cleared: Vec<Coord>,
    },
    Collapsing {
        moved: PieceSet,
    },
    CollapseSettle {
        remaining_ms: u32,
        moved: PieceSet,
    },
    Refilling,
    Settling {
        remaining_ms: u32,
        pending: PieceSet,
    },
}

impl Phase {
    fn kind(&self) -> PhaseKind {
        match self {
            Phase::Idle => PhaseKind::Idle,
            Phase::Swapping { .. } => PhaseKind::Swapping,
            Phase::Reverting { .. } => PhaseKind::Reverting,
            Phase::Highlighting { .. } => PhaseKind::Highlighting,
            Phase::Clearing { .. } => PhaseKind::Clearing,
            Phase::Collapsing { .. } => PhaseKind::Collapsing,
            Phase::CollapseSettle { .. } => PhaseKind::CollapseSettle,
            Phase::Refilling => PhaseKind::Refilling,
            Phase::Settling { .. } => PhaseKind::Settling,
        }
    }
}

/// Summary of one resolved cascade (consumed by observers).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CascadeReport {
    /// Highlight/clear/collapse passes, including chains
    pub waves: u32,
    /// Board refills
    pub refills: u32,
    pub pieces_cleared: u32,
}

pub struct Coordinator {
    board: Board,
    selection: Selection,
    phase: Phase,
    /// Counters for the cascade in flight.
    running: CascadeReport,
    /// Last completed cascade (consumed by observers).
    last_report: Option<CascadeReport>,
}

impl Coordinator {
    /// Build and fill a fresh board.
    pub fn new(config: BoardConfig, seed: u32) -> Result<Self, ConfigError> {
        Ok(Self::from_board(Board::new(config, seed)?))
    }

    pub fn from_board(board: Board) -> Self {
        Self {
            board,
            selection: Selection::Idle,
            phase: Phase::Idle,
            running: CascadeReport::default(),
            last_report: None,
        }
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn board_mut(&mut self) -> &mut Board {
        &mut self.board
    }

    pub fn grid(&self) -> &Grid {
        self.board.grid()
    }

    pub fn phase(&self) -> PhaseKind {
        self.phase.kind()
    }

    pub fn selection(&self) -> Selection {
        self.selection
    }

    pub fn input_enabled(&self) -> bool {
        self.board.gate().is_open()
    }

    /// Idle with an open gate: the next swap will be accepted.
    pub fn is_stable(&self) -> bool {
        matches!(self.phase, Phase::Idle) && self.input_enabled()
    }

    /// Take the report of the last completed cascade.
    pub fn take_report(&mut self) -> Option<CascadeReport> {
        self.last_report.take()
    }

    /// Peek at the last completed cascade without consuming it.
    pub fn last_report(&self) -> Option<&CascadeReport> {
        self.last_report.as_ref()
    }

    /// Deliver queued visual requests to `sink`.
    pub fn drain_visual_requests(&mut self, sink: &mut impl VisualSink) {
        self.board.grid_mut().drain_requests(sink);
    }

    /// Feed one pointer event. Returns true when it started a swap.
    #[instrument(level = "debug", skip(self))]
    pub fn handle_input(&mut self, event: InputEvent) -> bool {
        if let Some(at) = event.coord() {
            if !self.grid().is_within_bounds(at) {
                warn!(%at, event = event.as_str(), "input outside the board, ignored");
                return false;
            }
        }

        match (event, self.selection) {
            (InputEvent::TileTapped(at), Selection::Idle) => {
                self.selection = Selection::AwaitingSecondTap { first: at };
                false
            }
            (InputEvent::TileTapped(_), _) => false,
            (InputEvent::TileDraggedOnto(target), Selection::AwaitingSecondTap { first })
            | (InputEvent::TileDraggedOnto(target), Selection::AwaitingRelease { first, .. }) => {
                self.selection = Selection::AwaitingRelease { first, target };
                false
            }
            (InputEvent::TileDraggedOnto(_), Selection::Idle) => false,
            (InputEvent::Released, Selection::AwaitingRelease { first, target }) => {
                self.selection = Selection::Idle;
                self.try_swap(first, target)
            }
            (InputEvent::Released, _) => {
                self.selection = Selection::Idle;
                false
            }
        }
    }

    fn try_swap(&mut self, first: Coord, target: Coord) -> bool {
        if !first.is_adjacent(target) {
            debug!(%first, %target, "selection not adjacent, discarded");
            return false;
        }
        if !self.input_enabled() {
            warn!(%first, %target, "input gate closed, swap rejected");
            return false;
        }
        if !matches!(self.phase, Phase::Idle) {
            warn!(%first, %target, phase = self.phase().as_str(), "turn in progress, swap rejected");
            return false;
        }
        let grid = self.board.grid();
        let (Some(a), Some(b)) = (grid.get(first), grid.get(target)) else {
            debug!(%first, %target, "swap needs two pieces, discarded");
            return false;
        };

        let swap_ms = self.board.config().swap_ms;
        let grid = self.board.grid_mut();
        grid.move_piece(a, target, swap_ms);
        grid.move_piece(b, first, swap_ms);

        let mut pair = ArrayVec::new();
        pair.push(a);
        pair.push(b);
        debug!(%first, %target, "swap started");
        self.phase = Phase::Swapping {
            remaining_ms: swap_ms,
            pair,
        };
        true
    }

    /// Advance piece motion, then the phase machine, by `elapsed_ms`.
    #[instrument(level = "trace", skip(self))]
    pub fn tick(&mut self, elapsed_ms: u32) {
        self.board.grid_mut().advance_motion(elapsed_ms);

        let phase = std::mem::replace(&mut self.phase, Phase::Idle);
        let before = phase.kind();
        self.phase = self.step(phase, elapsed_ms);
        let after = self.phase.kind();
        if before != after {
            debug!(from = before.as_str(), to = after.as_str(), "phase");
        }
    }

    fn step(&mut self, phase: Phase, elapsed_ms: u32) -> Phase {
        match phase {
            Phase::Idle => Phase::Idle,
            Phase::Swapping { remaining_ms, pair } => {
                let remaining_ms = remaining_ms.saturating_sub(elapsed_ms);
                if remaining_ms > 0 {
                    return Phase::Swapping { remaining_ms, pair };
                }
                self.resolve_swap(&pair)
            }
            Phase::Reverting { remaining_ms } => {
                let remaining_ms = remaining_ms.saturating_sub(elapsed_ms);
                if remaining_ms > 0 {
                    return Phase::Reverting { remaining_ms };
                }
                Phase::Idle
            }
            Phase::Highlighting {
                remaining_ms,
                pending,
            } => {
                let remaining_ms = remaining_ms.saturating_sub(elapsed_ms);
                if remaining_ms > 0 {
                    return Phase::Highlighting {
                        remaining_ms,
                        pending,
                    };
                }
                let cleared = self.board.grid_mut().clear_pieces(&pending);
                self.running.waves += 1;
                self.running.pieces_cleared += cleared.len() as u32;
                Phase::Clearing {
                    remaining_ms: self.board.config().clear_delay_ms,
                    cleared,
                }
            }
            Phase::Clearing {
                remaining_ms,
                cleared,
            } => {
                let remaining_ms = remaining_ms.saturating_sub(elapsed_ms);
                if remaining_ms > 0 {
                    return Phase::Clearing {
                        remaining_ms,
                        cleared,
                    };
                }
                let base_ms = self.board.config().collapse_base_ms;
                let moved = collapse_columns(self.board.grid_mut(), &cleared, base_ms);
                Phase::Collapsing { moved }
            }
            Phase::Collapsing { moved } => {
                if !self.board.grid().is_settled(&moved) {
                    return Phase::Collapsing { moved };
                }
                Phase::CollapseSettle {
                    remaining_ms: self.board.config().collapse_settle_ms,
                    moved,
                }
            }
            Phase::CollapseSettle {
                remaining_ms,
                moved,
            } => {
                let remaining_ms = remaining_ms.saturating_sub(elapsed_ms);
                if remaining_ms > 0 {
                    return Phase::CollapseSettle {
                        remaining_ms,
                        moved,
                    };
                }
                let chained = matches_for_pieces(self.board.grid(), &moved);
                if chained.is_empty() {
                    Phase::Refilling
                } else {
                    debug!(pieces = chained.len(), "chain");
                    self.start_wave(chained)
                }
            }
            Phase::Refilling => {
                self.board.fill();
                self.running.refills += 1;
                Phase::Settling {
                    remaining_ms: self.board.config().refill_settle_ms,
                    pending: all_matches(self.board.grid()),
                }
            }
            Phase::Settling {
                remaining_ms,
                pending,
            } => {
                let remaining_ms = remaining_ms.saturating_sub(elapsed_ms);
                if remaining_ms > 0 {
                    return Phase::Settling {
                        remaining_ms,
                        pending,
                    };
                }
                if pending.is_empty() {
                    self.finish_cascade();
                    Phase::Idle
                } else {
                    self.start_wave(pending)
                }
            }
        }
    }

    fn resolve_swap(&mut self, pair: &[PieceId]) -> Phase {
        let grid = self.board.grid();
        let mut pending = PieceSet::new();
        for &id in pair {
            let single: PieceSet = [id].into_iter().collect();
            pending.union_with(&matches_for_pieces(grid, &single));
        }

        if pending.is_empty() {
            let coords: ArrayVec<(PieceId, Coord), 2> = pair
                .iter()
                .filter_map(|&id| grid.piece(id).map(|p| (id, p.coord())))
                .collect();
            let swap_ms = self.board.config().swap_ms;
            if let [(a, at_a), (b, at_b)] = coords.as_slice() {
                let (a, at_a, b, at_b) = (*a, *at_a, *b, *at_b);
                let grid = self.board.grid_mut();
                grid.move_piece(a, at_b, swap_ms);
                grid.move_piece(b, at_a, swap_ms);
            }
            debug!("no match, reverting swap");
            return Phase::Reverting {
                remaining_ms: swap_ms,
            };
        }

        self.board.gate_mut().close();
        self.running = CascadeReport::default();
        self.start_wave(pending)
    }

    fn start_wave(&mut self, pending: PieceSet) -> Phase {
        self.board.grid_mut().highlight_pieces(&pending);
        Phase::Highlighting {
            remaining_ms: self.board.config().highlight_ms,
            pending,
        }
    }

    fn finish_cascade(&mut self) {
        self.board.gate_mut().open();
        let report = std::mem::take(&mut self.running);
        info!(
            waves = report.waves,
            refills = report.refills,
            pieces_cleared = report.pieces_cleared,
            "cascade complete"
        );
        self.last_report = Some(report);
    }
}
