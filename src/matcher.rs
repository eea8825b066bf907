//! Clearing rules: connected same-colour clusters, or full rows/columns/squares.

use crate::area::Area;
use crate::matrix::{BlockColor, CellIndex, Dim};

/// Smallest connected cluster the four-colours rule removes.
pub const MIN_CLUSTER: usize = 4;

/// Edge of the aligned squares checked by the squares-lines rule.
pub const SQUARE_SIZE: usize = 3;

/// Clearing rule of a game mode; chosen once when the session is built.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClearRule {
    /// Full rows and columns.
    Lines,
    /// Full rows, columns, and aligned 3x3 squares.
    SquaresLines,
    /// Connected same-colour clusters of at least `MIN_CLUSTER` touching the placed piece.
    FourColors,
}

/// Cells removed by one clearing pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClearReport {
    pub removed: usize,
    pub cells: Vec<CellIndex>,
}

impl ClearRule {
    /// Run the rule on `board` after a piece was committed covering `placed`
    /// (board coordinates of its coloured cells).
    pub fn apply(self, board: &mut Area, placed: &[CellIndex]) -> ClearReport {
        match self {
            Self::FourColors => clear_clusters(board, placed),
            Self::Lines => clear_complete(board, false),
            Self::SquaresLines => clear_complete(board, true),
        }
    }
}

/// Parallel grid recording which board cells a pass selected.
/// Zero is unmarked; a positive value is the visit order (or a flat marker).
#[derive(Debug, Clone)]
struct Marks {
    cols: usize,
    marks: Vec<u32>,
    count: u32,
}

impl Marks {
    fn new(dim: Dim) -> Self {
        Self {
            cols: dim.cols,
            marks: vec![0; dim.cell_count()],
            count: 0,
        }
    }

    /// Mark a cell; returns false if it was already marked.
    fn mark(&mut self, row: usize, col: usize) -> bool {
        let slot = &mut self.marks[row * self.cols + col];
        if *slot != 0 {
            return false;
        }
        self.count += 1;
        *slot = self.count;
        true
    }

    fn reset(&mut self) {
        self.marks.fill(0);
        self.count = 0;
    }

    fn marked(&self) -> impl Iterator<Item = CellIndex> + '_ {
        self.marks
            .iter()
            .enumerate()
            .filter(|(_, m)| **m != 0)
            .map(|(i, _)| CellIndex::new(i / self.cols, i % self.cols))
    }
}

/// Mark the 4-connected cluster of same-coloured cells around `seed`.
/// Cells are marked before being pushed, so each is visited once.
fn flood_fill(board: &Area, seed: CellIndex, marks: &mut Marks) -> usize {
    let color = board.get(seed.row, seed.col);
    if color.is_empty() || !marks.mark(seed.row, seed.col) {
        return 0;
    }
    let Dim { rows, cols } = board.dim();
    let mut size = 1;
    let mut stack = vec![seed];
    while let Some(CellIndex { row, col }) = stack.pop() {
        let neighbours = [
            (row > 0).then(|| (row - 1, col)),
            (row + 1 < rows).then_some((row + 1, col)),
            (col > 0).then(|| (row, col - 1)),
            (col + 1 < cols).then_some((row, col + 1)),
        ];
        for (r, c) in neighbours.into_iter().flatten() {
            if board.get(r, c) == color && marks.mark(r, c) {
                size += 1;
                stack.push(CellIndex::new(r, c));
            }
        }
    }
    size
}

/// Size of the same-colour cluster containing `seed`; 0 for an empty cell.
#[cfg(test)]
pub fn cluster_size(board: &Area, seed: CellIndex) -> usize {
    let mut marks = Marks::new(board.dim());
    flood_fill(board, seed, &mut marks)
}

fn clear_clusters(board: &mut Area, placed: &[CellIndex]) -> ClearReport {
    let mut marks = Marks::new(board.dim());
    let mut report = ClearReport::default();
    for &seed in placed {
        marks.reset();
        // An earlier seed may already have removed this cell.
        if flood_fill(board, seed, &mut marks) < MIN_CLUSTER {
            continue;
        }
        for cell in marks.marked() {
            board.set(cell.row, cell.col, BlockColor::None);
            report.cells.push(cell);
        }
        report.removed += marks.count as usize;
    }
    report
}

fn clear_complete(board: &mut Area, squares: bool) -> ClearReport {
    let Dim { rows, cols } = board.dim();
    let mut marks = Marks::new(board.dim());
    let filled = |r: usize, c: usize| !board.get(r, c).is_empty();

    for r in (0..rows).filter(|&r| (0..cols).all(|c| filled(r, c))) {
        for c in 0..cols {
            marks.mark(r, c);
        }
    }
    for c in (0..cols).filter(|&c| (0..rows).all(|r| filled(r, c))) {
        for r in 0..rows {
            marks.mark(r, c);
        }
    }
    if squares {
        // Only whole tiles; a trailing partial tile never clears.
        for top in (0..rows / SQUARE_SIZE).map(|i| i * SQUARE_SIZE) {
            for left in (0..cols / SQUARE_SIZE).map(|i| i * SQUARE_SIZE) {
                let tile = move || {
                    (top..top + SQUARE_SIZE)
                        .flat_map(move |r| (left..left + SQUARE_SIZE).map(move |c| (r, c)))
                };
                if tile().all(|(r, c)| filled(r, c)) {
                    for (r, c) in tile() {
                        marks.mark(r, c);
                    }
                }
            }
        }
    }

    let cells: Vec<CellIndex> = marks.marked().collect();
    for cell in &cells {
        board.set(cell.row, cell.col, BlockColor::None);
    }
    ClearReport {
        removed: cells.len(),
        cells,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::area::Pixel;
    use crate::matrix::BlockMatrix;

    fn board(rows: &[&str]) -> Area {
        Area::from_matrix(BlockMatrix::from_rows(rows), Pixel::default(), Dim::new(1, 1))
    }

    fn filled(area: &Area) -> Vec<CellIndex> {
        area.filled_cells()
            .map(|(r, c, _)| CellIndex::new(r, c))
            .collect()
    }

    #[test]
    fn test_two_adjacent_squares_clear() {
        let mut b = board(&["......"; 6]);
        let piece = board(&["YYY"; 3]);
        piece.place(&mut b, CellIndex::new(0, 0));
        piece.place(&mut b, CellIndex::new(0, 3));
        let report = ClearRule::SquaresLines.apply(&mut b, &[]);
        assert_eq!(report.removed, 18);
        assert_eq!(b.filled_count(), 0);
    }

    #[test]
    fn test_overlapping_row_and_column_counted_once() {
        let mut b = board(&["..G...", "RRRRRR", "..G...", "..G...", "..G...", "..G..."]);
        let report = ClearRule::SquaresLines.apply(&mut b, &[]);
        assert_eq!(report.removed, 11);
        assert_eq!(report.cells.len(), 11);
        assert_eq!(b.filled_count(), 0);
    }

    #[test]
    fn test_lines_rule_ignores_squares() {
        let mut b = board(&["BBB...", "BBB...", "BBB...", "......", "......", "......"]);
        assert_eq!(ClearRule::Lines.apply(&mut b, &[]).removed, 0);
        assert_eq!(b.filled_count(), 9);
        let report = ClearRule::SquaresLines.apply(&mut b, &[]);
        assert_eq!(report.removed, 9);
    }

    #[test]
    fn test_square_must_be_aligned() {
        let mut b = board(&[".BBB..", ".BBB..", ".BBB..", "......", "......", "......"]);
        assert_eq!(ClearRule::SquaresLines.apply(&mut b, &[]).removed, 0);
        assert_eq!(b.filled_count(), 9);
    }

    #[test]
    fn test_partial_trailing_tile_never_clears() {
        let mut b = board(&["...RR", "...RR", "....."]);
        assert_eq!(ClearRule::SquaresLines.apply(&mut b, &[]).removed, 0);
    }

    #[test]
    fn test_line_and_square_together() {
        let mut b = board(&["RRR...", "RRR...", "GGGGGG", "......", "......", "......"]);
        let report = ClearRule::SquaresLines.apply(&mut b, &[]);
        // Square (9) plus the rest of row 2 (3).
        assert_eq!(report.removed, 12);
        assert_eq!(b.filled_count(), 0);
    }

    #[test]
    fn test_cluster_of_five_cleared_three_kept() {
        let mut b = board(&["R.....", "R.....", "RRR...", "...RRR", "......"]);
        let placed = [CellIndex::new(2, 2), CellIndex::new(3, 3)];
        let report = ClearRule::FourColors.apply(&mut b, &placed);
        assert_eq!(report.removed, 5);
        assert_eq!(
            filled(&b),
            vec![CellIndex::new(3, 3), CellIndex::new(3, 4), CellIndex::new(3, 5)]
        );
    }

    #[test]
    fn test_cluster_below_threshold_untouched() {
        let mut b = board(&["GGG.", "....", "BBBB"]);
        let report = ClearRule::FourColors.apply(&mut b, &[CellIndex::new(0, 0)]);
        assert_eq!(report.removed, 0);
        assert_eq!(b.filled_count(), 7);
    }

    #[test]
    fn test_cluster_only_around_placed_cells() {
        let mut b = board(&["GGGG", "....", "BBBB"]);
        let report = ClearRule::FourColors.apply(&mut b, &[CellIndex::new(2, 1)]);
        assert_eq!(report.removed, 4);
        assert_eq!(b.filled_count(), 4);
        assert_eq!(b.get(0, 0), BlockColor::Green);
    }

    #[test]
    fn test_same_cluster_from_two_seeds_counted_once() {
        let mut b = board(&["YYY", "Y..", "..."]);
        let placed = [CellIndex::new(0, 0), CellIndex::new(0, 1), CellIndex::new(1, 0)];
        let report = ClearRule::FourColors.apply(&mut b, &placed);
        assert_eq!(report.removed, 4);
        assert_eq!(b.filled_count(), 0);
    }

    #[test]
    fn test_diagonal_is_not_connected() {
        let b = board(&["R.R", ".R.", "R.R"]);
        assert_eq!(cluster_size(&b, CellIndex::new(1, 1)), 1);
    }

    #[test]
    fn test_cluster_size_same_from_any_seed() {
        let b = board(&["BB..B", ".B.BB", ".BBB.", "G...."]);
        let members: Vec<CellIndex> = filled(&b)
            .into_iter()
            .filter(|c| b.get(c.row, c.col) == BlockColor::Blue)
            .collect();
        for seed in &members {
            assert_eq!(cluster_size(&b, *seed), members.len());
        }
        assert_eq!(cluster_size(&b, CellIndex::new(3, 0)), 1);
        assert_eq!(cluster_size(&b, CellIndex::new(3, 4)), 0);
    }

    #[test]
    fn test_flood_fill_terminates_on_cycles() {
        let b = board(&["RRRR", "R..R", "RRRR"]);
        assert_eq!(cluster_size(&b, CellIndex::new(0, 0)), 10);
    }
}
