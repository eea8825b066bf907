//! Home slots: the pool of pieces the player picks from.
//!
//! Each slot is `Available`, `PickedUp` (its blocks are out on the floating
//! piece and kept as a backup), or `Dropped`. The pool refills all slots at
//! once, and only when every slot has been dropped.

use crate::area::{Area, Pixel};
use crate::generator::PieceGenerator;
use crate::matrix::{BlockMatrix, Dim};
use rand::Rng;
use thiserror::Error;

/// Horizontal gap between slots, in pixels.
pub const SLOT_GAP: i32 = 2;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum PoolError {
    #[error("home slot {0} is already picked up")]
    PickupInProgress(usize),
    #[error("no home slot is picked up")]
    NoActivePickup,
}

#[derive(Debug, Clone)]
pub struct HomeSlot {
    pub area: Area,
    /// Piece committed to the board; slot is empty until the next refill.
    pub dropped: bool,
}

#[derive(Debug, Clone)]
pub struct HomeAreaPool {
    slots: Vec<HomeSlot>,
    template: Dim,
    /// Slot whose piece is currently floating.
    active: Option<usize>,
    /// Untouched blocks of the active slot.
    backup: BlockMatrix,
}

impl HomeAreaPool {
    /// `count` slots of `template` size laid out left to right from `origin`, filled by `generator`.
    pub fn new<R: Rng>(
        count: usize,
        template: Dim,
        origin: Pixel,
        cell_size: Dim,
        generator: &PieceGenerator,
        rng: &mut R,
    ) -> Self {
        let slots = (0..count)
            .map(|_| HomeSlot {
                area: Area::new(template.rows, template.cols, origin, cell_size),
                dropped: true,
            })
            .collect();
        let mut pool = Self {
            slots,
            template,
            active: None,
            backup: BlockMatrix::new(template.rows, template.cols),
        };
        pool.layout(origin);
        pool.refill(generator, rng, true);
        pool
    }

    /// Re-anchor every slot, left to right from `origin`.
    pub fn layout(&mut self, origin: Pixel) {
        let stride = self.slot_pixel_width() + SLOT_GAP;
        for (i, slot) in self.slots.iter_mut().enumerate() {
            slot.area.pos = origin.offset(0, i as i32 * stride);
        }
    }

    fn slot_pixel_width(&self) -> i32 {
        self.slots
            .first()
            .map(|s| (self.template.cols * s.area.cell_size().cols) as i32)
            .unwrap_or(0)
    }

    /// Height and width of the whole pool on screen.
    pub fn pixel_size(&self) -> (i32, i32) {
        let Some(first) = self.slots.first() else {
            return (0, 0);
        };
        let n = self.slots.len() as i32;
        let w = n * self.slot_pixel_width() + (n - 1) * SLOT_GAP;
        let h = (self.template.rows * first.area.cell_size().rows) as i32;
        (h, w)
    }

    pub fn slots(&self) -> &[HomeSlot] {
        &self.slots
    }

    pub fn active(&self) -> Option<usize> {
        self.active
    }

    /// Index of the slot under `px`, dropped or not.
    pub fn slot_at(&self, px: Pixel) -> Option<usize> {
        self.slots.iter().position(|s| s.area.contains(px))
    }

    /// Pick up the piece in the slot under `px`. `Ok(None)` when no slot is
    /// there or that slot has been dropped.
    pub fn pick_up(&mut self, px: Pixel) -> Result<Option<Area>, PoolError> {
        if let Some(active) = self.active {
            return Err(PoolError::PickupInProgress(active));
        }
        match self.slot_at(px) {
            Some(index) => self.pick_slot(index),
            None => Ok(None),
        }
    }

    /// Pick up the piece in slot `index`. `Ok(None)` when there is no such
    /// slot or it has been dropped.
    ///
    /// The returned piece is normalized and positioned where its blocks were
    /// drawn in the slot.
    pub fn pick_slot(&mut self, index: usize) -> Result<Option<Area>, PoolError> {
        if let Some(active) = self.active {
            return Err(PoolError::PickupInProgress(active));
        }
        let Some(slot) = self.slots.get_mut(index) else {
            return Ok(None);
        };
        if slot.dropped {
            return Ok(None);
        }
        let Some(region) = slot.area.used_region() else {
            return Ok(None);
        };
        let mut piece = slot.area.clone();
        piece.normalize();
        piece.pos = slot.area.cell_origin(region.index);

        self.backup = slot.area.matrix().clone();
        slot.area.clear();
        self.active = Some(index);
        Ok(Some(piece))
    }

    /// Put the active slot's blocks back exactly as they were.
    pub fn undo_pickup(&mut self) -> Result<usize, PoolError> {
        let index = self.active.take().ok_or(PoolError::NoActivePickup)?;
        self.slots[index].area.load_blocks(&self.backup);
        Ok(index)
    }

    /// The active piece was committed to the board.
    pub fn mark_dropped(&mut self) -> Result<usize, PoolError> {
        let index = self.active.take().ok_or(PoolError::NoActivePickup)?;
        let slot = &mut self.slots[index];
        slot.area.clear();
        slot.dropped = true;
        Ok(index)
    }

    pub fn needs_refill(&self) -> bool {
        self.slots.iter().all(|s| s.dropped)
    }

    /// Generate a fresh piece for every slot when all are dropped, or always
    /// when `force`. Returns whether a refill happened.
    pub fn refill<R: Rng>(&mut self, generator: &PieceGenerator, rng: &mut R, force: bool) -> bool {
        if !force && !self.needs_refill() {
            return false;
        }
        self.active = None;
        for slot in &mut self.slots {
            let blocks = generator.generate(self.template, rng);
            slot.area.load_blocks(&blocks);
            slot.dropped = false;
        }
        true
    }

    #[cfg(test)]
    pub(crate) fn set_slot_blocks(&mut self, index: usize, blocks: &BlockMatrix) {
        self.slots[index].area.load_blocks(blocks);
    }

    /// Whether any remaining piece fits somewhere on `board`.
    pub fn can_drop_anywhere(&self, board: &Area) -> bool {
        self.slots.iter().filter(|s| !s.dropped).any(|s| {
            let mut piece = s.area.clone();
            piece.normalize();
            piece.can_place_anywhere(board)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::area::BLOCK_CELL_SIZE;
    use crate::matrix::{BlockColor, CellIndex};
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    const GENERATOR: PieceGenerator = PieceGenerator::Polyomino { min_cells: 1, max_cells: 5 };
    const TEMPLATE: Dim = Dim::new(5, 5);
    const ORIGIN: Pixel = Pixel::new(20, 4);

    fn pool(count: usize) -> (HomeAreaPool, StdRng) {
        let mut rng = StdRng::seed_from_u64(1);
        let pool = HomeAreaPool::new(count, TEMPLATE, ORIGIN, BLOCK_CELL_SIZE, &GENERATOR, &mut rng);
        (pool, rng)
    }

    /// A pixel on a coloured block of slot `index`.
    fn block_pixel(pool: &HomeAreaPool, index: usize) -> Pixel {
        let area = &pool.slots()[index].area;
        let (r, c, _) = area.filled_cells().next().unwrap();
        area.cell_origin(CellIndex::new(r, c))
    }

    #[test]
    fn test_new_pool_is_full() {
        let (pool, _) = pool(3);
        assert_eq!(pool.slots().len(), 3);
        assert!(pool.slots().iter().all(|s| !s.dropped && s.area.filled_count() > 0));
        assert!(!pool.needs_refill());
        assert_eq!(pool.active(), None);
    }

    #[test]
    fn test_layout_left_to_right() {
        let (pool, _) = pool(3);
        assert_eq!(pool.slots()[0].area.pos, ORIGIN);
        assert_eq!(pool.slots()[1].area.pos, Pixel::new(20, 4 + 10 + SLOT_GAP));
        assert_eq!(pool.slot_at(Pixel::new(24, 4 + 9)), Some(0));
        assert_eq!(pool.slot_at(Pixel::new(24, 4 + 10)), None);
        assert_eq!(pool.slot_at(Pixel::new(20, 4 + 2 * (10 + SLOT_GAP))), Some(2));
        assert_eq!(pool.pixel_size(), (5, 3 * 10 + 2 * SLOT_GAP));
    }

    #[test]
    fn test_pick_up_and_undo_restores_blocks() {
        let (mut pool, _) = pool(3);
        let before = pool.slots()[1].area.clone();
        let piece = pool.pick_up(block_pixel(&pool, 1)).unwrap().unwrap();
        assert_eq!(pool.active(), Some(1));
        assert_eq!(pool.slots()[1].area.filled_count(), 0);
        assert_eq!(piece.filled_count(), before.filled_count());
        assert_eq!(piece.used_region().unwrap().index, CellIndex::ORIGIN);

        assert_eq!(pool.undo_pickup(), Ok(1));
        assert_eq!(pool.slots()[1].area, before);
        assert_eq!(pool.active(), None);
    }

    #[test]
    fn test_piece_starts_over_its_home_blocks() {
        let (mut pool, _) = pool(1);
        let home = pool.slots()[0].area.clone();
        let region = home.used_region().unwrap();
        let piece = pool.pick_slot(0).unwrap().unwrap();
        assert_eq!(piece.pos, home.cell_origin(region.index));
        for (r, c, color) in piece.filled_cells() {
            let at = CellIndex::new(region.index.row + r, region.index.col + c);
            assert_eq!(home.get(at.row, at.col), color);
        }
    }

    #[test]
    fn test_pick_up_outside_slots() {
        let (mut pool, _) = pool(2);
        assert_eq!(pool.pick_up(Pixel::new(0, 0)), Ok(None));
        assert_eq!(pool.pick_slot(5), Ok(None));
        assert_eq!(pool.active(), None);
    }

    #[test]
    fn test_single_pickup_at_a_time() {
        let (mut pool, _) = pool(2);
        assert!(pool.pick_slot(0).unwrap().is_some());
        assert_eq!(pool.pick_slot(1), Err(PoolError::PickupInProgress(0)));
        assert_eq!(
            pool.pick_up(block_pixel(&pool, 1)),
            Err(PoolError::PickupInProgress(0))
        );
    }

    #[test]
    fn test_undo_and_drop_need_active_pickup() {
        let (mut pool, _) = pool(2);
        assert_eq!(pool.undo_pickup(), Err(PoolError::NoActivePickup));
        assert_eq!(pool.mark_dropped(), Err(PoolError::NoActivePickup));
    }

    #[test]
    fn test_dropped_slot_cannot_be_picked() {
        let (mut pool, _) = pool(2);
        pool.pick_slot(0).unwrap();
        assert_eq!(pool.mark_dropped(), Ok(0));
        assert!(pool.slots()[0].dropped);
        assert_eq!(pool.pick_slot(0), Ok(None));
    }

    #[test]
    fn test_refill_only_when_all_dropped() {
        let (mut pool, mut rng) = pool(3);
        for i in 0..2 {
            pool.pick_slot(i).unwrap();
            pool.mark_dropped().unwrap();
            assert!(!pool.needs_refill());
            assert!(!pool.refill(&GENERATOR, &mut rng, false));
            assert!(pool.slots()[i].dropped);
        }
        pool.pick_slot(2).unwrap();
        pool.mark_dropped().unwrap();
        assert!(pool.needs_refill());
        assert!(pool.refill(&GENERATOR, &mut rng, false));
        assert!(pool.slots().iter().all(|s| !s.dropped && s.area.filled_count() > 0));
    }

    #[test]
    fn test_forced_refill() {
        let (mut pool, mut rng) = pool(2);
        pool.pick_slot(0).unwrap();
        pool.mark_dropped().unwrap();
        assert!(pool.refill(&GENERATOR, &mut rng, true));
        assert!(pool.slots().iter().all(|s| !s.dropped));
    }

    #[test]
    fn test_can_drop_anywhere_does_not_touch_slots() {
        let (pool, _) = pool(3);
        let before: Vec<Area> = pool.slots().iter().map(|s| s.area.clone()).collect();
        let board = Area::new(10, 10, Pixel::default(), BLOCK_CELL_SIZE);
        assert!(pool.can_drop_anywhere(&board));
        let after: Vec<Area> = pool.slots().iter().map(|s| s.area.clone()).collect();
        assert_eq!(before, after);
    }

    #[test]
    fn test_can_drop_anywhere_full_board() {
        let (mut pool, _) = pool(3);
        let mut board = Area::new(4, 4, Pixel::default(), BLOCK_CELL_SIZE);
        for r in 0..4 {
            for c in 0..4 {
                board.set(r, c, BlockColor::Red);
            }
        }
        assert!(!pool.can_drop_anywhere(&board));
        board.set(1, 1, BlockColor::None);
        // Only a single-block piece would fit; swap one in.
        let mut single = BlockMatrix::new(5, 5);
        single.set(2, 2, BlockColor::Green);
        pool.slots[0].area.load_blocks(&single);
        assert!(pool.can_drop_anywhere(&board));
        pool.slots[0].dropped = true;
        let others_fit = pool.slots()[1..].iter().any(|s| s.area.filled_count() == 1);
        assert_eq!(pool.can_drop_anywhere(&board), others_fit);
    }
}
