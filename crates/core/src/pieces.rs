//! Pieces module - the tetromino catalog
//!
//! Every piece is a small square matrix (2x2 for O, 4x4 for I, 3x3 for the
//! rest). Rotation states are derived from the base matrix by quarter-turn
//! transforms rather than stored tables.

use crate::types::{PieceKind, Rgb, Rotation};

/// Largest matrix side in the catalog (the I piece)
pub const MAX_SHAPE_SIZE: usize = 4;

/// Offset of a single mino relative to the shape's top-left corner (col, row)
pub type MinoOffset = (i8, i8);

/// One rotation state of a piece: a square occupancy matrix
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Shape {
    size: u8,
    /// Row-major; only the top-left `size x size` block is meaningful
    cells: [[bool; MAX_SHAPE_SIZE]; MAX_SHAPE_SIZE],
}

impl Shape {
    /// Build a shape from a 0/1 matrix, reading the top-left `size x size` block
    pub fn from_matrix(size: u8, matrix: &[[u8; MAX_SHAPE_SIZE]; MAX_SHAPE_SIZE]) -> Self {
        let size = size.min(MAX_SHAPE_SIZE as u8);
        let mut cells = [[false; MAX_SHAPE_SIZE]; MAX_SHAPE_SIZE];
        for row in 0..size as usize {
            for col in 0..size as usize {
                cells[row][col] = matrix[row][col] != 0;
            }
        }
        Self { size, cells }
    }

    pub fn size(&self) -> u8 {
        self.size
    }

    pub fn is_filled(&self, col: usize, row: usize) -> bool {
        col < self.size as usize && row < self.size as usize && self.cells[row][col]
    }

    /// Offsets of the occupied cells, row by row
    pub fn minos(&self) -> impl Iterator<Item = MinoOffset> + '_ {
        let n = self.size as usize;
        (0..n).flat_map(move |row| {
            (0..n)
                .filter(move |&col| self.cells[row][col])
                .map(move |col| (col as i8, row as i8))
        })
    }

    /// Index of the first row holding a mino
    pub fn top_row(&self) -> u8 {
        let n = self.size as usize;
        (0..n)
            .find(|&row| self.cells[row][..n].iter().any(|&c| c))
            .unwrap_or(0) as u8
    }

    /// Quarter turn clockwise: transpose, then reverse each row
    pub fn rotated_cw(&self) -> Self {
        let n = self.size as usize;
        let mut cells = [[false; MAX_SHAPE_SIZE]; MAX_SHAPE_SIZE];
        for row in 0..n {
            for col in 0..n {
                cells[row][col] = self.cells[n - 1 - col][row];
            }
        }
        Self { size: self.size, cells }
    }

    /// Quarter turn counter-clockwise: transpose, then reverse the row order
    pub fn rotated_ccw(&self) -> Self {
        let n = self.size as usize;
        let mut cells = [[false; MAX_SHAPE_SIZE]; MAX_SHAPE_SIZE];
        for row in 0..n {
            for col in 0..n {
                cells[row][col] = self.cells[col][n - 1 - row];
            }
        }
        Self { size: self.size, cells }
    }

    /// Rotate by a direction: `1` is clockwise, `-1` counter-clockwise
    pub fn rotated(&self, direction: i8) -> Self {
        if direction < 0 {
            self.rotated_ccw()
        } else {
            self.rotated_cw()
        }
    }
}

/// Immutable definition of a piece: base shape and display color
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PieceDef {
    pub kind: PieceKind,
    pub size: u8,
    pub matrix: [[u8; MAX_SHAPE_SIZE]; MAX_SHAPE_SIZE],
    pub color: Rgb,
}

impl PieceDef {
    pub fn shape(&self) -> Shape {
        Shape::from_matrix(self.size, &self.matrix)
    }
}

static CATALOG: [PieceDef; 7] = [
    PieceDef {
        kind: PieceKind::I,
        size: 4,
        matrix: [[0, 1, 0, 0], [0, 1, 0, 0], [0, 1, 0, 0], [0, 1, 0, 0]],
        color: Rgb::new(80, 227, 230),
    },
    PieceDef {
        kind: PieceKind::J,
        size: 3,
        matrix: [[0, 1, 0, 0], [0, 1, 0, 0], [1, 1, 0, 0], [0, 0, 0, 0]],
        color: Rgb::new(36, 95, 223),
    },
    PieceDef {
        kind: PieceKind::L,
        size: 3,
        matrix: [[0, 1, 0, 0], [0, 1, 0, 0], [0, 1, 1, 0], [0, 0, 0, 0]],
        color: Rgb::new(223, 173, 36),
    },
    PieceDef {
        kind: PieceKind::O,
        size: 2,
        matrix: [[1, 1, 0, 0], [1, 1, 0, 0], [0, 0, 0, 0], [0, 0, 0, 0]],
        color: Rgb::new(223, 217, 36),
    },
    PieceDef {
        kind: PieceKind::S,
        size: 3,
        matrix: [[0, 1, 1, 0], [1, 1, 0, 0], [0, 0, 0, 0], [0, 0, 0, 0]],
        color: Rgb::new(48, 211, 56),
    },
    PieceDef {
        kind: PieceKind::T,
        size: 3,
        matrix: [[0, 0, 0, 0], [1, 1, 1, 0], [0, 1, 0, 0], [0, 0, 0, 0]],
        color: Rgb::new(132, 61, 198),
    },
    PieceDef {
        kind: PieceKind::Z,
        size: 3,
        matrix: [[1, 1, 0, 0], [0, 1, 1, 0], [0, 0, 0, 0], [0, 0, 0, 0]],
        color: Rgb::new(227, 78, 78),
    },
];

/// Catalog entry for a piece kind
pub fn definition(kind: PieceKind) -> &'static PieceDef {
    &CATALOG[kind.index()]
}

/// Display color for a piece kind
pub fn color(kind: PieceKind) -> Rgb {
    definition(kind).color
}

/// Get the shape for a piece kind and rotation state
pub fn get_shape(kind: PieceKind, rotation: Rotation) -> Shape {
    let mut shape = definition(kind).shape();
    for _ in 0..rotation.quarter_turns() {
        shape = shape.rotated_cw();
    }
    shape
}

/// Get initial shape for a new piece at spawn
pub fn get_spawn_shape(kind: PieceKind) -> Shape {
    get_shape(kind, Rotation::North)
}
