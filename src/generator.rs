//! Piece generation: grow a random shape inside the template, then colour it.

use crate::matrix::{BlockColor, BlockMatrix, Dim};
use rand::Rng;

/// How a game mode fills a home slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PieceGenerator {
    /// Connected shape in one colour.
    Polyomino { min_cells: usize, max_cells: usize },
    /// Connected shape with every block coloured independently.
    Splatter { min_cells: usize, max_cells: usize },
}

impl PieceGenerator {
    /// Fresh piece blocks of size `template`.
    pub fn generate<R: Rng>(&self, template: Dim, rng: &mut R) -> BlockMatrix {
        let (min_cells, max_cells) = match *self {
            Self::Polyomino { min_cells, max_cells } | Self::Splatter { min_cells, max_cells } => {
                (min_cells, max_cells)
            }
        };
        let mut blocks = BlockMatrix::new(template.rows, template.cols);
        if template.is_empty() {
            return blocks;
        }
        let max_cells = max_cells.clamp(1, template.cell_count());
        let min_cells = min_cells.clamp(1, max_cells);
        let target = rng.random_range(min_cells..=max_cells);
        grow_marker_shape(&mut blocks, target, rng);

        match self {
            Self::Polyomino { .. } => {
                blocks.recolor(BlockColor::Marker, BlockColor::random(rng));
            }
            Self::Splatter { .. } => {
                for r in 0..blocks.rows() {
                    for c in 0..blocks.cols() {
                        if blocks.get(r, c) == BlockColor::Marker {
                            blocks.set(r, c, BlockColor::random(rng));
                        }
                    }
                }
            }
        }
        blocks
    }
}

/// Paint `target` 4-connected marker cells, starting from the template centre
/// and adding one random empty neighbour of the shape at a time.
fn grow_marker_shape<R: Rng>(blocks: &mut BlockMatrix, target: usize, rng: &mut R) {
    let (rows, cols) = (blocks.rows(), blocks.cols());
    blocks.set(rows / 2, cols / 2, BlockColor::Marker);
    let mut painted = 1;
    while painted < target {
        let mut frontier = Vec::new();
        for r in 0..rows {
            for c in 0..cols {
                if blocks.get(r, c) != BlockColor::None {
                    continue;
                }
                let touches = [
                    r.checked_sub(1).map(|r| (r, c)),
                    Some((r + 1, c)),
                    c.checked_sub(1).map(|c| (r, c)),
                    Some((r, c + 1)),
                ]
                .into_iter()
                .flatten()
                .any(|(nr, nc)| blocks.try_get(nr, nc) == Some(BlockColor::Marker));
                if touches {
                    frontier.push((r, c));
                }
            }
        }
        if frontier.is_empty() {
            break;
        }
        let (r, c) = frontier[rng.random_range(0..frontier.len())];
        blocks.set(r, c, BlockColor::Marker);
        painted += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::area::{Area, Pixel};
    use crate::matcher::cluster_size;
    use crate::matrix::CellIndex;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    const TEMPLATE: Dim = Dim::new(5, 5);

    #[test]
    fn test_polyomino_is_connected_single_colour() {
        let mut rng = StdRng::seed_from_u64(7);
        let generator = PieceGenerator::Polyomino { min_cells: 1, max_cells: 5 };
        for _ in 0..50 {
            let blocks = generator.generate(TEMPLATE, &mut rng);
            let count = blocks.filled_count();
            assert!((1..=5).contains(&count), "got {count} cells");
            let area = Area::from_matrix(blocks.clone(), Pixel::default(), Dim::new(1, 1));
            let (r, c, color) = area.filled_cells().next().unwrap();
            assert_ne!(color, BlockColor::Marker);
            assert!(area.filled_cells().all(|(_, _, col)| col == color));
            assert_eq!(cluster_size(&area, CellIndex::new(r, c)), count);
        }
    }

    #[test]
    fn test_splatter_leaves_no_marker() {
        let mut rng = StdRng::seed_from_u64(11);
        let generator = PieceGenerator::Splatter { min_cells: 2, max_cells: 4 };
        for _ in 0..50 {
            let blocks = generator.generate(Dim::new(3, 3), &mut rng);
            let count = blocks.filled_count();
            assert!((2..=4).contains(&count), "got {count} cells");
            for r in 0..3 {
                for c in 0..3 {
                    assert_ne!(blocks.get(r, c), BlockColor::Marker);
                }
            }
        }
    }

    #[test]
    fn test_cell_count_clamped_to_template() {
        let mut rng = StdRng::seed_from_u64(3);
        let generator = PieceGenerator::Polyomino { min_cells: 10, max_cells: 40 };
        let blocks = generator.generate(Dim::new(2, 2), &mut rng);
        assert_eq!(blocks.filled_count(), 4);
    }

    #[test]
    fn test_same_seed_same_piece() {
        let generator = PieceGenerator::Splatter { min_cells: 1, max_cells: 9 };
        let a = generator.generate(TEMPLATE, &mut StdRng::seed_from_u64(42));
        let b = generator.generate(TEMPLATE, &mut StdRng::seed_from_u64(42));
        assert_eq!(a, b);
    }
}
