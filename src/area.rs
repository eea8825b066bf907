//! Area: a block matrix placed on screen, with placement geometry.
//!
//! Three coordinate spaces meet here: the piece's own cells, the target
//! area's cells, and terminal pixels. A pixel is one terminal cell; a block
//! occupies `cell_size` pixels.

use crate::matrix::{BlockColor, BlockMatrix, CellIndex, Dim, UsedRegion};

/// Screen position in terminal cells. Signed so a dragged piece can hang off the edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub struct Pixel {
    pub row: i32,
    pub col: i32,
}

impl Pixel {
    pub const fn new(row: i32, col: i32) -> Self {
        Self { row, col }
    }

    #[inline]
    pub fn offset(self, rows: i32, cols: i32) -> Self {
        Self::new(self.row + rows, self.col + cols)
    }
}

impl std::ops::Sub for Pixel {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        Self::new(self.row - rhs.row, self.col - rhs.col)
    }
}

impl std::ops::Add for Pixel {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self::new(self.row + rhs.row, self.col + rhs.col)
    }
}

/// Default block size on screen: one row, two columns (roughly square in a terminal).
pub const BLOCK_CELL_SIZE: Dim = Dim::new(1, 2);

/// A block matrix with logical size and screen placement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Area {
    matrix: BlockMatrix,
    /// Logical size; never larger than the matrix.
    dim: Dim,
    /// Screen anchor of cell (0, 0).
    pub pos: Pixel,
    /// Pixels per cell.
    cell_size: Dim,
}

impl Area {
    pub fn new(rows: usize, cols: usize, pos: Pixel, cell_size: Dim) -> Self {
        assert!(
            cell_size.rows > 0 && cell_size.cols > 0,
            "cell size must be non-zero"
        );
        Self {
            matrix: BlockMatrix::new(rows, cols),
            dim: Dim::new(rows, cols),
            pos,
            cell_size,
        }
    }

    /// Wrap an existing matrix; logical size is the full matrix.
    #[cfg(test)]
    pub fn from_matrix(matrix: BlockMatrix, pos: Pixel, cell_size: Dim) -> Self {
        let dim = matrix.dim();
        let mut area = Self::new(0, 0, pos, cell_size);
        area.matrix = matrix;
        area.dim = dim;
        area
    }

    #[inline]
    pub fn dim(&self) -> Dim {
        self.dim
    }

    #[inline]
    pub fn cell_size(&self) -> Dim {
        self.cell_size
    }

    #[inline]
    pub fn matrix(&self) -> &BlockMatrix {
        &self.matrix
    }

    /// Colour at a logical cell. Panics outside `dim`.
    pub fn get(&self, row: usize, col: usize) -> BlockColor {
        assert!(
            row < self.dim.rows && col < self.dim.cols,
            "cell ({row}, {col}) outside {}x{} area",
            self.dim.rows,
            self.dim.cols
        );
        self.matrix.get(row, col)
    }

    pub fn set(&mut self, row: usize, col: usize, color: BlockColor) {
        assert!(
            row < self.dim.rows && col < self.dim.cols,
            "cell ({row}, {col}) outside {}x{} area",
            self.dim.rows,
            self.dim.cols
        );
        self.matrix.set(row, col, color);
    }

    /// Empty every cell and restore the logical size to the full matrix.
    pub fn clear(&mut self) {
        self.matrix.fill(BlockColor::None);
        self.dim = self.matrix.dim();
    }

    /// Replace the blocks with a copy of `blocks` (same or smaller size), resetting `dim`.
    pub fn load_blocks(&mut self, blocks: &BlockMatrix) {
        self.matrix.fill(BlockColor::None);
        self.matrix.copy_from(blocks);
        self.dim = self.matrix.dim();
    }

    /// `(row, col, color)` for every logical cell, empty ones included.
    pub fn cells(&self) -> impl Iterator<Item = (usize, usize, BlockColor)> + '_ {
        let Dim { rows, cols } = self.dim;
        (0..rows).flat_map(move |r| (0..cols).map(move |c| (r, c, self.matrix.get(r, c))))
    }

    /// Non-empty logical cells only.
    pub fn filled_cells(&self) -> impl Iterator<Item = (usize, usize, BlockColor)> + '_ {
        self.cells().filter(|(_, _, color)| !color.is_empty())
    }

    pub fn filled_count(&self) -> usize {
        self.filled_cells().count()
    }

    /// Bounding box of coloured cells within the logical size; `None` when empty.
    pub fn used_region(&self) -> Option<UsedRegion> {
        self.matrix.bounding_box(self.dim)
    }

    /// Total size on screen, in pixels.
    pub fn pixel_size(&self) -> (i32, i32) {
        (
            (self.dim.rows * self.cell_size.rows) as i32,
            (self.dim.cols * self.cell_size.cols) as i32,
        )
    }

    /// Point-in-area test over `[pos, pos + dim * cell_size)`.
    pub fn contains(&self, px: Pixel) -> bool {
        let (h, w) = self.pixel_size();
        px.row >= self.pos.row
            && px.row < self.pos.row + h
            && px.col >= self.pos.col
            && px.col < self.pos.col + w
    }

    /// True when `px` sits on a cell corner of this area's lattice.
    pub fn is_aligned(&self, px: Pixel) -> bool {
        (px.row - self.pos.row).rem_euclid(self.cell_size.rows as i32) == 0
            && (px.col - self.pos.col).rem_euclid(self.cell_size.cols as i32) == 0
    }

    /// Pixel to logical cell. Only meaningful when `contains(px)` holds.
    pub fn to_cell(&self, px: Pixel) -> CellIndex {
        debug_assert!(self.contains(px), "pixel {px:?} outside area");
        CellIndex::new(
            ((px.row - self.pos.row) / self.cell_size.rows as i32) as usize,
            ((px.col - self.pos.col) / self.cell_size.cols as i32) as usize,
        )
    }

    /// Top-left pixel of a logical cell; inverse of `to_cell`.
    pub fn cell_origin(&self, index: CellIndex) -> Pixel {
        self.pos.offset(
            (index.row * self.cell_size.rows) as i32,
            (index.col * self.cell_size.cols) as i32,
        )
    }

    /// Whether this piece, with its cell (0, 0) laid on `target` cell `at`,
    /// fits inside `target` without covering any coloured cell. Pure query.
    pub fn can_place(&self, target: &Self, at: CellIndex) -> bool {
        if at.row + self.dim.rows > target.dim.rows || at.col + self.dim.cols > target.dim.cols {
            return false;
        }
        self.filled_cells()
            .all(|(r, c, _)| target.get(at.row + r, at.col + c).is_empty())
    }

    /// Write this piece's coloured cells into `target` at `at`.
    /// Callers must have had `can_place` return true for the same arguments.
    pub fn place(&self, target: &mut Self, at: CellIndex) {
        assert!(
            at.row + self.dim.rows <= target.dim.rows && at.col + self.dim.cols <= target.dim.cols,
            "piece {:?} at {at:?} does not fit {:?} target",
            self.dim,
            target.dim
        );
        for (r, c, color) in self.filled_cells() {
            debug_assert!(target.get(at.row + r, at.col + c).is_empty(), "overlap at ({r}, {c})");
            target.set(at.row + r, at.col + c, color);
        }
    }

    /// Target cell for the top-left of the piece's used region at the first
    /// fitting offset, scanning row-major over every offset that keeps the
    /// used region inside `target`.
    pub fn first_fit(&self, target: &Self) -> Option<CellIndex> {
        let region = self.used_region()?;
        // Offsets are for the used region; the piece's own origin sits `region.index` before it.
        let max_row = target.dim.rows.checked_sub(region.dim.rows)?;
        let max_col = target.dim.cols.checked_sub(region.dim.cols)?;
        for row in 0..=max_row {
            for col in 0..=max_col {
                let fits = self.filled_cells().all(|(r, c, _)| {
                    target
                        .get(row + r - region.index.row, col + c - region.index.col)
                        .is_empty()
                });
                if fits {
                    return Some(CellIndex::new(row, col));
                }
            }
        }
        None
    }

    /// Whether this piece fits anywhere on `target`. An empty piece never fits.
    pub fn can_place_anywhere(&self, target: &Self) -> bool {
        self.first_fit(target).is_some()
    }

    /// Shift the used region to the matrix origin and shrink `dim` to it.
    /// An area with no coloured cells ends up `0x0`. Never reallocates.
    pub fn normalize(&mut self) {
        let Some(region) = self.used_region() else {
            self.dim = Dim::default();
            return;
        };
        if region.index != CellIndex::ORIGIN {
            // Row-major forward copy is safe: every source cell lies at or after its destination.
            for r in 0..region.dim.rows {
                for c in 0..region.dim.cols {
                    let color = self.matrix.get(region.index.row + r, region.index.col + c);
                    self.matrix.set(r, c, color);
                }
            }
            for r in 0..self.dim.rows {
                for c in 0..self.dim.cols {
                    if r >= region.dim.rows || c >= region.dim.cols {
                        self.matrix.set(r, c, BlockColor::None);
                    }
                }
            }
        }
        self.dim = region.dim;
    }

    /// Snap a dragged piece onto this area's lattice. Returns the board cell
    /// under the piece's (0, 0), or `None` when the piece cannot be snapped.
    ///
    /// A misaligned column is forgiven by exactly one pixel either way; rows
    /// must already be on the lattice.
    pub fn align_snap(&self, piece: &Self) -> Option<CellIndex> {
        [0, -1, 1]
            .into_iter()
            .map(|dc| piece.pos.offset(0, dc))
            .find(|px| self.contains(*px) && self.is_aligned(*px))
            .map(|px| self.to_cell(px))
    }
}
