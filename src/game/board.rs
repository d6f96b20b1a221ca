use std::collections::HashMap;

use rand::Rng;
use rand::seq::IndexedRandom;
use tracing::debug;

use super::assets::{AssetCatalog, ImageId};
use crate::error::GameError;

pub const GRID_SIDE: usize = 4;
pub const TILE_SIZE: u32 = 128;
pub const TILE_MARGIN: u32 = 8;
pub const BOARD_PIXELS: u32 = TILE_SIZE * GRID_SIDE as u32;
/// Copies of each identity dealt onto the board.
const PAIR: u8 = 2;

#[derive(Clone, Debug)]
pub struct Tile {
    pub index: usize,
    pub row: usize,
    pub col: usize,
    pub identity: ImageId,
    pub matched: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Cell {
    pub row: usize,
    pub col: usize,
    pub index: usize,
}

/// Maps a pointer position onto the grid. Positions past the board are not filtered.
pub fn locate(x: u32, y: u32, tile_size: u32, grid_side: usize) -> Cell {
    let row = (y / tile_size) as usize;
    let col = (x / tile_size) as usize;
    Cell {
        row,
        col,
        index: row * grid_side + col,
    }
}

#[derive(Clone, Debug)]
pub struct Board {
    side: usize,
    tiles: Vec<Tile>,
}

impl Board {
    /// Deals `side * side` tiles, every identity exactly twice.
    pub fn build<R: Rng + ?Sized>(
        side: usize,
        catalog: &AssetCatalog,
        rng: &mut R,
    ) -> Result<Self, GameError> {
        let total = side * side;
        let chosen: Vec<&ImageId> = catalog
            .images()
            .choose_multiple(rng, total / PAIR as usize)
            .collect();
        let mut usage: HashMap<&ImageId, u8> = chosen.iter().map(|id| (*id, 0)).collect();

        let mut tiles = Vec::with_capacity(total);
        for index in 0..total {
            let available: Vec<&ImageId> = chosen
                .iter()
                .copied()
                .filter(|id| usage[id] < PAIR)
                .collect();
            let Some(&identity) = available.choose(rng) else {
                return Err(GameError::NoAvailableIdentities { index });
            };
            if let Some(count) = usage.get_mut(identity) {
                *count += 1;
            }
            tiles.push(Tile {
                index,
                row: index / side,
                col: index % side,
                identity: identity.clone(),
                matched: false,
            });
        }

        debug!(side, tiles = tiles.len(), "board dealt");
        Ok(Board { side, tiles })
    }

    #[cfg(test)]
    pub(crate) fn from_identities(side: usize, names: &[&str]) -> Self {
        let tiles = names
            .iter()
            .enumerate()
            .map(|(index, name)| Tile {
                index,
                row: index / side,
                col: index % side,
                identity: ImageId::new(name),
                matched: false,
            })
            .collect();
        Board { side, tiles }
    }

    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    pub fn tiles(&self) -> &[Tile] {
        &self.tiles
    }

    pub fn is_matched(&self, index: usize) -> bool {
        self.tiles.get(index).is_some_and(|tile| tile.matched)
    }

    pub fn same_identity(&self, a: usize, b: usize) -> bool {
        match (self.tiles.get(a), self.tiles.get(b)) {
            (Some(first), Some(second)) => first.identity == second.identity,
            _ => false,
        }
    }

    pub fn mark_matched(&mut self, indices: &[usize]) {
        for &idx in indices {
            if let Some(tile) = self.tiles.get_mut(idx) {
                tile.matched = true;
            }
        }
    }

    pub fn all_matched(&self) -> bool {
        self.tiles.iter().all(|tile| tile.matched)
    }

    pub fn unmatched_indices(&self) -> impl Iterator<Item = usize> + '_ {
        self.tiles
            .iter()
            .filter(|tile| !tile.matched)
            .map(|tile| tile.index)
    }

    /// Bounds-checked pointer lookup in board pixels.
    pub fn cell_at(&self, x: f64, y: f64, tile_size: u32) -> Option<Cell> {
        if !x.is_finite() || !y.is_finite() || x < 0.0 || y < 0.0 {
            return None;
        }
        let cell = locate(x as u32, y as u32, tile_size, self.side);
        (cell.row < self.side && cell.col < self.side && cell.index < self.tiles.len())
            .then_some(cell)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn catalog(count: usize) -> AssetCatalog {
        let names: Vec<String> = (0..count).map(|i| format!("animal{i:02}.png")).collect();
        let refs: Vec<&str> = names.iter().map(String::as_str).collect();
        AssetCatalog::from_names(&refs)
    }

    #[test]
    fn locate_maps_pointer_to_cells() {
        assert_eq!(locate(5, 5, 128, 4), Cell { row: 0, col: 0, index: 0 });
        assert_eq!(locate(130, 5, 128, 4), Cell { row: 0, col: 1, index: 1 });
        assert_eq!(locate(5, 130, 128, 4), Cell { row: 1, col: 0, index: 4 });
        assert_eq!(locate(500, 500, 128, 4), Cell { row: 3, col: 3, index: 15 });
    }

    #[test]
    fn cell_at_rejects_points_off_the_board() {
        let board = Board::build(GRID_SIDE, &catalog(8), &mut StdRng::seed_from_u64(1)).unwrap();
        assert_eq!(board.cell_at(511.9, 0.0, TILE_SIZE).map(|c| c.index), Some(3));
        assert_eq!(board.cell_at(512.0, 10.0, TILE_SIZE), None);
        assert_eq!(board.cell_at(10.0, 600.0, TILE_SIZE), None);
        assert_eq!(board.cell_at(-1.0, 10.0, TILE_SIZE), None);
        assert_eq!(board.cell_at(f64::NAN, 10.0, TILE_SIZE), None);
    }

    #[test]
    fn every_board_uses_eight_identities_twice() {
        for catalog_size in [8, 9, 12, 30] {
            let catalog = catalog(catalog_size);
            for seed in 0..50 {
                let mut rng = StdRng::seed_from_u64(seed);
                let board = Board::build(GRID_SIDE, &catalog, &mut rng).unwrap();
                assert_eq!(board.len(), 16);

                let mut counts: HashMap<&ImageId, usize> = HashMap::new();
                for tile in board.tiles() {
                    *counts.entry(&tile.identity).or_default() += 1;
                }
                assert_eq!(counts.len(), 8, "seed {seed}, catalog {catalog_size}");
                assert!(counts.values().all(|&count| count == 2));
            }
        }
    }

    #[test]
    fn tiles_know_their_position_and_start_hidden() {
        let board = Board::build(GRID_SIDE, &catalog(10), &mut StdRng::seed_from_u64(7)).unwrap();
        for (i, tile) in board.tiles().iter().enumerate() {
            assert_eq!(tile.index, i);
            assert_eq!(tile.row, i / 4);
            assert_eq!(tile.col, i % 4);
            assert!(!tile.matched);
        }
        assert!(!board.all_matched());
    }

    #[test]
    fn same_seed_deals_the_same_board() {
        let catalog = catalog(20);
        let a = Board::build(GRID_SIDE, &catalog, &mut StdRng::seed_from_u64(42)).unwrap();
        let b = Board::build(GRID_SIDE, &catalog, &mut StdRng::seed_from_u64(42)).unwrap();
        let ids = |board: &Board| -> Vec<String> {
            board.tiles().iter().map(|t| t.identity.to_string()).collect()
        };
        assert_eq!(ids(&a), ids(&b));
    }

    #[test]
    fn odd_board_runs_out_of_identities() {
        let err = Board::build(3, &catalog(8), &mut StdRng::seed_from_u64(3)).unwrap_err();
        assert!(matches!(err, GameError::NoAvailableIdentities { index: 8 }));
    }

    #[test]
    fn identity_comparison_is_symmetric_and_reflexive() {
        let board = Board::from_identities(2, &["cat", "dog", "dog", "cat"]);
        assert!(board.same_identity(0, 3));
        assert!(board.same_identity(3, 0));
        assert!(board.same_identity(1, 1));
        assert!(!board.same_identity(0, 1));
        assert!(!board.same_identity(1, 0));
        assert!(!board.same_identity(0, 9));
    }

    #[test]
    fn unmatched_indices_skip_matched_tiles() {
        let mut board = Board::from_identities(2, &["cat", "dog", "dog", "cat"]);
        board.mark_matched(&[1, 2]);
        assert_eq!(board.unmatched_indices().collect::<Vec<_>>(), vec![0, 3]);
        board.mark_matched(&[0, 3]);
        assert!(board.all_matched());
    }
}
