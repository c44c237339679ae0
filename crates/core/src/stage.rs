//! Stage module - the fixed 10x20 grid of cells
//!
//! Uses a flat array for cache locality and zero allocation.
//! Coordinates: (x, y) where x ranges 0..9 (left to right), y ranges 0..19 (top to bottom).
//!
//! Cells are either empty, stamped by the falling piece (`Falling`), or locked
//! (`Merged`). The falling piece is re-stamped after every mutation: stale
//! `Falling` cells are swept first, then the piece is drawn at its current
//! placement. `Merged` cells are only ever touched by row removal.

use arrayvec::ArrayVec;

use crate::player::Player;
use crate::types::{Cell, STAGE_HEIGHT, STAGE_WIDTH};

/// Total number of cells on the stage
const STAGE_SIZE: usize = (STAGE_WIDTH as usize) * (STAGE_HEIGHT as usize);

/// Row indices, top to bottom, e.g. the rows captured for a line clear
pub type RowSet = ArrayVec<u8, { STAGE_HEIGHT as usize }>;

#[derive(Debug, Clone, PartialEq)]
pub struct Stage {
    /// Flat array of cells, row-major order (y * WIDTH + x)
    cells: [Cell; STAGE_SIZE],
}

impl Stage {
    /// Create a new empty stage
    pub fn new() -> Self {
        Self {
            cells: [Cell::Empty; STAGE_SIZE],
        }
    }

    /// Calculate flat index from (x, y) coordinates
    #[inline(always)]
    fn index(x: i8, y: i8) -> Option<usize> {
        if x < 0 || x >= STAGE_WIDTH as i8 || y < 0 || y >= STAGE_HEIGHT as i8 {
            return None;
        }
        Some((y as usize) * (STAGE_WIDTH as usize) + (x as usize))
    }

    pub fn width(&self) -> u8 {
        STAGE_WIDTH
    }

    pub fn height(&self) -> u8 {
        STAGE_HEIGHT
    }

    /// Get cell at position (x, y)
    /// Returns None if out of bounds
    pub fn get(&self, x: i8, y: i8) -> Option<Cell> {
        Self::index(x, y).map(|idx| self.cells[idx])
    }

    /// Set cell at position (x, y)
    /// Returns false if out of bounds
    pub fn set(&mut self, x: i8, y: i8, cell: Cell) -> bool {
        match Self::index(x, y) {
            Some(idx) => {
                self.cells[idx] = cell;
                true
            }
            None => false,
        }
    }

    /// Check if position holds a locked cell
    pub fn is_merged(&self, x: i8, y: i8) -> bool {
        matches!(self.get(x, y), Some(Cell::Merged(_)))
    }

    /// Check if a row has no empty cell
    pub fn is_row_full(&self, y: usize) -> bool {
        self.row(y)
            .map(|row| row.iter().all(|cell| !cell.is_empty()))
            .unwrap_or(false)
    }

    /// One row of cells, or None past the floor
    pub fn row(&self, y: usize) -> Option<&[Cell]> {
        if y >= STAGE_HEIGHT as usize {
            return None;
        }
        let width = STAGE_WIDTH as usize;
        Some(&self.cells[y * width..(y + 1) * width])
    }

    /// Iterate rows from top to bottom
    pub fn rows(&self) -> impl Iterator<Item = &[Cell]> {
        self.cells.chunks_exact(STAGE_WIDTH as usize)
    }

    /// Indices of every full row, top to bottom
    pub fn full_rows(&self) -> RowSet {
        (0..STAGE_HEIGHT)
            .filter(|&y| self.is_row_full(y as usize))
            .collect()
    }

    /// Remove the given rows; everything above shifts down and the same number
    /// of empty rows appear at the top. Out-of-range indices are ignored.
    ///
    /// Returns how many rows were removed.
    pub fn remove_rows(&mut self, rows: &[u8]) -> usize {
        let width = STAGE_WIDTH as usize;
        let mut write_y = STAGE_HEIGHT as usize;
        let mut removed = 0;

        // Scan from bottom to top, compacting kept rows toward the floor
        for read_y in (0..STAGE_HEIGHT as usize).rev() {
            if rows.contains(&(read_y as u8)) {
                removed += 1;
                continue;
            }
            write_y -= 1;
            if write_y != read_y {
                let src_start = read_y * width;
                let dst_start = write_y * width;
                self.cells
                    .copy_within(src_start..src_start + width, dst_start);
            }
        }

        self.cells[..write_y * width].fill(Cell::Empty);
        removed
    }

    /// Reset every `Falling` cell to empty
    pub fn sweep_falling(&mut self) {
        for cell in &mut self.cells {
            if matches!(cell, Cell::Falling(_)) {
                *cell = Cell::Empty;
            }
        }
    }

    /// Draw the player's visible cells: `Merged` once collided, `Falling` before.
    /// Cells above the top row are skipped.
    pub fn stamp(&mut self, player: &Player) {
        let cell = if player.collided {
            Cell::Merged(player.kind)
        } else {
            Cell::Falling(player.kind)
        };
        for (x, y) in player.cells() {
            self.set(x, y, cell);
        }
    }

    /// Sweep the previous placement, then stamp the player's current one
    pub fn restamp(&mut self, player: &Player) {
        self.sweep_falling();
        self.stamp(player);
    }

    /// Number of locked cells
    pub fn merged_count(&self) -> usize {
        self.cells.iter().filter(|cell| cell.is_merged()).count()
    }

    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// Clear the entire stage
    pub fn clear(&mut self) {
        self.cells.fill(Cell::Empty);
    }

    /// Copy into a 2D grid for snapshots
    pub fn write_grid(&self, out: &mut [[Cell; STAGE_WIDTH as usize]; STAGE_HEIGHT as usize]) {
        for (dst, src) in out.iter_mut().zip(self.rows()) {
            dst.copy_from_slice(src);
        }
    }
}

impl Default for Stage {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::PieceKind;

    fn fill_row(stage: &mut Stage, y: i8) {
        for x in 0..STAGE_WIDTH as i8 {
            stage.set(x, y, Cell::Merged(PieceKind::I));
        }
    }

    #[test]
    fn test_stage_index_calculation() {
        assert_eq!(Stage::index(0, 0), Some(0));
        assert_eq!(Stage::index(9, 0), Some(9));
        assert_eq!(Stage::index(0, 1), Some(10));
        assert_eq!(Stage::index(9, 19), Some(199));
        assert_eq!(Stage::index(-1, 0), None);
        assert_eq!(Stage::index(10, 0), None);
        assert_eq!(Stage::index(0, 20), None);
    }

    #[test]
    fn test_full_rows_counts_falling_cells() {
        let mut stage = Stage::new();
        for x in 0..9 {
            stage.set(x, 19, Cell::Merged(PieceKind::T));
        }
        assert!(stage.full_rows().is_empty());

        stage.set(9, 19, Cell::Falling(PieceKind::I));
        assert_eq!(stage.full_rows().as_slice(), &[19]);
    }

    #[test]
    fn test_remove_rows_shifts_down_and_inserts_at_top() {
        let mut stage = Stage::new();
        fill_row(&mut stage, 19);
        fill_row(&mut stage, 17);
        stage.set(0, 18, Cell::Merged(PieceKind::J));
        stage.set(4, 16, Cell::Merged(PieceKind::L));

        assert_eq!(stage.remove_rows(&[17, 19]), 2);

        // Row 18 drops by one (one removed row below it), row 16 by two.
        assert_eq!(stage.get(0, 19), Some(Cell::Merged(PieceKind::J)));
        assert_eq!(stage.get(4, 18), Some(Cell::Merged(PieceKind::L)));
        assert_eq!(stage.merged_count(), 2);
        assert!(stage.row(0).unwrap().iter().all(Cell::is_empty));
        assert!(stage.row(1).unwrap().iter().all(Cell::is_empty));
    }

    #[test]
    fn test_remove_rows_ignores_out_of_range() {
        let mut stage = Stage::new();
        fill_row(&mut stage, 19);
        assert_eq!(stage.remove_rows(&[25]), 0);
        assert_eq!(stage.merged_count(), 10);
    }

    #[test]
    fn test_sweep_falling_keeps_merged() {
        let mut stage = Stage::new();
        stage.set(1, 1, Cell::Falling(PieceKind::S));
        stage.set(2, 2, Cell::Merged(PieceKind::Z));
        stage.sweep_falling();
        assert_eq!(stage.get(1, 1), Some(Cell::Empty));
        assert_eq!(stage.get(2, 2), Some(Cell::Merged(PieceKind::Z)));
    }

    #[test]
    fn test_write_grid_matches_cells() {
        let mut stage = Stage::new();
        stage.set(3, 7, Cell::Merged(PieceKind::O));
        let mut grid = [[Cell::Empty; STAGE_WIDTH as usize]; STAGE_HEIGHT as usize];
        stage.write_grid(&mut grid);
        assert_eq!(grid[7][3], Cell::Merged(PieceKind::O));
        assert_eq!(grid[0][0], Cell::Empty);
    }
}
