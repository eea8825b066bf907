//! Game session: board, floating piece, home slots, score.
//!
//! One input event is handled to completion before the next; the session is
//! the only place that sequences pickup, drag, drop, clear and refill.

use crate::GameConfig;
use crate::area::{Area, BLOCK_CELL_SIZE, Pixel};
use crate::generator::PieceGenerator;
use crate::home::{HomeAreaPool, PoolError};
use crate::matcher::ClearRule;
use crate::matrix::CellIndex;
use rand::SeedableRng;
use rand::rngs::StdRng;

/// Screen anchors of the board and of the first home slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Placement {
    pub board: Pixel,
    pub home: Pixel,
}

/// Result of releasing the floating piece.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropOutcome {
    /// Nothing was picked up.
    NoPiece,
    /// Piece did not fit and went back to its slot.
    Rejected,
    /// Piece committed; `cleared` blocks were removed.
    Placed { cleared: usize },
    /// Piece committed, and no remaining piece fits anywhere.
    GameOver { cleared: usize },
}

/// The picked-up piece and where the pointer grabbed it.
#[derive(Debug, Clone)]
struct Drag {
    piece: Area,
    /// Pointer position minus piece position.
    grab: Pixel,
}

#[derive(Debug)]
pub struct GameSession {
    pub config: GameConfig,
    rule: ClearRule,
    generator: PieceGenerator,
    rng: StdRng,
    pub seed: u64,
    pub board: Area,
    pub pool: HomeAreaPool,
    drag: Option<Drag>,
    pub score: u32,
    /// Pieces committed this game.
    pub placed: u32,
    /// Blocks removed by the last drop, for the clear animation.
    pub last_cleared: Vec<CellIndex>,
    pub game_over: bool,
}

impl GameSession {
    pub fn new(config: &GameConfig, placement: Placement) -> Self {
        let seed = config.seed.unwrap_or_else(rand::random);
        let mut rng = StdRng::seed_from_u64(seed);
        let generator = config.mode.generator();
        let board = Area::new(config.board.rows, config.board.cols, placement.board, BLOCK_CELL_SIZE);
        let pool = HomeAreaPool::new(
            config.slots,
            config.template,
            placement.home,
            BLOCK_CELL_SIZE,
            &generator,
            &mut rng,
        );
        Self {
            config: config.clone(),
            rule: config.mode.rule(),
            generator,
            rng,
            seed,
            board,
            pool,
            drag: None,
            score: 0,
            placed: 0,
            last_cleared: Vec::new(),
            game_over: false,
        }
    }

    /// Fresh board and pieces, same configuration and placement.
    pub fn restart(&mut self) {
        self.board.clear();
        self.pool.refill(&self.generator, &mut self.rng, true);
        self.drag = None;
        self.score = 0;
        self.placed = 0;
        self.last_cleared.clear();
        self.game_over = false;
    }

    /// Move everything to new screen anchors (terminal resized).
    pub fn relayout(&mut self, placement: Placement) {
        let delta = placement.board - self.board.pos;
        self.board.pos = placement.board;
        self.pool.layout(placement.home);
        if let Some(drag) = &mut self.drag {
            drag.piece.pos = drag.piece.pos + delta;
        }
    }

    /// The piece currently being dragged.
    pub fn floating(&self) -> Option<&Area> {
        self.drag.as_ref().map(|d| &d.piece)
    }

    /// Board cell the floating piece would land on if released now.
    pub fn drop_target(&self) -> Option<CellIndex> {
        let piece = self.floating()?;
        self.board
            .align_snap(piece)
            .filter(|at| piece.can_place(&self.board, *at))
    }

    /// Pointer pressed: pick up the piece under `px`. Returns whether a piece was picked up.
    pub fn press(&mut self, px: Pixel) -> Result<bool, PoolError> {
        if self.game_over || self.drag.is_some() {
            return Ok(false);
        }
        let Some(piece) = self.pool.pick_up(px)? else {
            return Ok(false);
        };
        self.drag = Some(Drag {
            grab: px - piece.pos,
            piece,
        });
        Ok(true)
    }

    /// Keyboard pickup of slot `index`; the piece starts at the board's top-left.
    pub fn pick_slot(&mut self, index: usize) -> Result<bool, PoolError> {
        if self.game_over || self.drag.is_some() {
            return Ok(false);
        }
        let Some(mut piece) = self.pool.pick_slot(index)? else {
            return Ok(false);
        };
        piece.pos = self.board.pos;
        self.drag = Some(Drag {
            piece,
            grab: Pixel::default(),
        });
        Ok(true)
    }

    /// Pointer moved while dragging.
    pub fn drag_to(&mut self, px: Pixel) {
        if let Some(drag) = &mut self.drag {
            drag.piece.pos = px - drag.grab;
        }
    }

    /// Move the floating piece by whole cells.
    pub fn nudge(&mut self, rows: i32, cols: i32) {
        if let Some(drag) = &mut self.drag {
            let size = drag.piece.cell_size();
            drag.piece.pos = drag
                .piece
                .pos
                .offset(rows * size.rows as i32, cols * size.cols as i32);
        }
    }

    /// Put the floating piece back in its slot.
    pub fn cancel(&mut self) -> Result<bool, PoolError> {
        if self.drag.take().is_none() {
            return Ok(false);
        }
        self.pool.undo_pickup()?;
        Ok(true)
    }

    /// Drop the floating piece where it is: snap, validate, commit, clear,
    /// refill, then check whether the game can go on.
    pub fn release(&mut self) -> Result<DropOutcome, PoolError> {
        let Some(Drag { piece, .. }) = self.drag.take() else {
            return Ok(DropOutcome::NoPiece);
        };
        let target = self
            .board
            .align_snap(&piece)
            .filter(|at| piece.can_place(&self.board, *at));
        let Some(at) = target else {
            self.pool.undo_pickup()?;
            return Ok(DropOutcome::Rejected);
        };

        piece.place(&mut self.board, at);
        let covered: Vec<CellIndex> = piece
            .filled_cells()
            .map(|(r, c, _)| CellIndex::new(at.row + r, at.col + c))
            .collect();
        let report = self.rule.apply(&mut self.board, &covered);
        self.score += report.removed as u32;
        self.placed += 1;
        self.last_cleared = report.cells;

        self.pool.mark_dropped()?;
        self.pool.refill(&self.generator, &mut self.rng, false);

        let cleared = report.removed;
        if self.pool.can_drop_anywhere(&self.board) {
            Ok(DropOutcome::Placed { cleared })
        } else {
            self.game_over = true;
            Ok(DropOutcome::GameOver { cleared })
        }
    }
}
