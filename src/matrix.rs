//! Block matrix: a flat row-major grid of block colours.

use rand::Rng;

/// Colour of one block cell. `None` is the empty cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub enum BlockColor {
    #[default]
    None,
    Red,
    Green,
    Blue,
    Yellow,
    /// Paint used while a piece shape is being grown; never left on a finished piece.
    Marker,
}

impl BlockColor {
    /// The four colours a finished piece can carry.
    pub const NORMAL: [Self; 4] = [Self::Red, Self::Green, Self::Blue, Self::Yellow];

    #[inline]
    pub fn is_empty(self) -> bool {
        self == Self::None
    }

    /// Index 0..4 into the theme's block palette; `None` for empty and marker.
    pub fn palette_index(self) -> Option<usize> {
        match self {
            Self::Red => Some(0),
            Self::Green => Some(1),
            Self::Blue => Some(2),
            Self::Yellow => Some(3),
            Self::None | Self::Marker => None,
        }
    }

    pub fn random<R: Rng>(rng: &mut R) -> Self {
        Self::NORMAL[rng.random_range(0..Self::NORMAL.len())]
    }
}

/// Logical (row, col) position of a cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub struct CellIndex {
    pub row: usize,
    pub col: usize,
}

impl CellIndex {
    pub const ORIGIN: Self = Self { row: 0, col: 0 };

    pub const fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }
}

/// Row/column extent, in cells (or pixels per cell for `Area::cell_size`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub struct Dim {
    pub rows: usize,
    pub cols: usize,
}

impl Dim {
    pub const fn new(rows: usize, cols: usize) -> Self {
        Self { rows, cols }
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.rows == 0 || self.cols == 0
    }

    #[inline]
    pub fn cell_count(&self) -> usize {
        self.rows * self.cols
    }
}

/// Minimal bounding box of the non-empty cells of a matrix.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UsedRegion {
    pub index: CellIndex,
    pub dim: Dim,
}

/// Rectangular grid of block colours, fixed size, row-major.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlockMatrix {
    rows: usize,
    cols: usize,
    cells: Vec<BlockColor>,
}

impl BlockMatrix {
    /// All-empty matrix.
    pub fn new(rows: usize, cols: usize) -> Self {
        Self {
            rows,
            cols,
            cells: vec![BlockColor::None; rows * cols],
        }
    }

    #[cfg(test)]
    /// Build from text rows, one char per cell: `.` empty, `R`/`G`/`B`/`Y` colours, `#` marker.
    /// Rows shorter than the longest one are padded with empty cells.
    pub fn from_rows(rows: &[&str]) -> Self {
        let cols = rows.iter().map(|r| r.chars().count()).max().unwrap_or(0);
        let mut m = Self::new(rows.len(), cols);
        for (r, line) in rows.iter().enumerate() {
            for (c, ch) in line.chars().enumerate() {
                let color = match ch {
                    'R' | 'r' => BlockColor::Red,
                    'G' | 'g' => BlockColor::Green,
                    'B' | 'b' => BlockColor::Blue,
                    'Y' | 'y' => BlockColor::Yellow,
                    '#' => BlockColor::Marker,
                    _ => BlockColor::None,
                };
                m.set(r, c, color);
            }
        }
        m
    }

    #[inline]
    pub fn rows(&self) -> usize {
        self.rows
    }

    #[inline]
    pub fn cols(&self) -> usize {
        self.cols
    }

    #[inline]
    pub fn dim(&self) -> Dim {
        Dim::new(self.rows, self.cols)
    }

    #[inline]
    fn offset(&self, row: usize, col: usize) -> usize {
        assert!(
            row < self.rows && col < self.cols,
            "block index ({row}, {col}) outside {}x{} matrix",
            self.rows,
            self.cols
        );
        row * self.cols + col
    }

    /// Colour at (row, col). Panics when out of range.
    #[inline]
    pub fn get(&self, row: usize, col: usize) -> BlockColor {
        self.cells[self.offset(row, col)]
    }

    #[inline]
    pub fn try_get(&self, row: usize, col: usize) -> Option<BlockColor> {
        (row < self.rows && col < self.cols).then(|| self.cells[row * self.cols + col])
    }

    /// Set colour at (row, col). Panics when out of range.
    #[inline]
    pub fn set(&mut self, row: usize, col: usize, color: BlockColor) {
        let i = self.offset(row, col);
        self.cells[i] = color;
    }

    pub fn fill(&mut self, color: BlockColor) {
        self.cells.fill(color);
    }

    /// Copy the whole of `src` into the top-left corner of `self`.
    /// `self` must be at least as large as `src` in both directions.
    pub fn copy_from(&mut self, src: &Self) {
        assert!(
            src.rows <= self.rows && src.cols <= self.cols,
            "cannot copy {}x{} matrix into {}x{}",
            src.rows,
            src.cols,
            self.rows,
            self.cols
        );
        for r in 0..src.rows {
            let from = r * src.cols;
            let to = r * self.cols;
            self.cells[to..to + src.cols].copy_from_slice(&src.cells[from..from + src.cols]);
        }
    }

    /// Number of non-empty cells.
    #[cfg(test)]
    pub fn filled_count(&self) -> usize {
        self.cells.iter().filter(|c| !c.is_empty()).count()
    }

    /// Replace every cell of colour `from` with `to`.
    pub fn recolor(&mut self, from: BlockColor, to: BlockColor) {
        for cell in self.cells.iter_mut().filter(|c| **c == from) {
            *cell = to;
        }
    }

    /// Bounding box of non-empty cells inside the top-left `within` window.
    /// `None` when no cell in the window is coloured.
    pub fn bounding_box(&self, within: Dim) -> Option<UsedRegion> {
        let rows = within.rows.min(self.rows);
        let cols = within.cols.min(self.cols);
        // No max corner after the scan means no coloured cells.
        let (mut min_r, mut min_c) = (rows, cols);
        let mut max: Option<(usize, usize)> = None;
        for r in 0..rows {
            for c in 0..cols {
                if self.get(r, c).is_empty() {
                    continue;
                }
                min_r = min_r.min(r);
                min_c = min_c.min(c);
                let (max_r, max_c) = max.get_or_insert((r, c));
                *max_r = (*max_r).max(r);
                *max_c = (*max_c).max(c);
            }
        }
        let (max_r, max_c) = max?;
        Some(UsedRegion {
            index: CellIndex::new(min_r, min_c),
            dim: Dim::new(max_r - min_r + 1, max_c - min_c + 1),
        })
    }
}
