//! Player module - the active (falling) piece
//!
//! A `Player` is created at spawn, moved and rotated while it falls, and frozen
//! the moment `collided` becomes true. The session replaces it with a fresh
//! spawn once lock processing is done.

use crate::collision::{check_collision, check_collision_with};
use crate::pieces::{get_spawn_shape, Shape};
use crate::stage::Stage;
use crate::types::{PieceKind, Rotation, STAGE_WIDTH};

/// Column of the shape's top-left corner at spawn
pub const SPAWN_X: i8 = (STAGE_WIDTH / 2) as i8 - 2;

/// Active falling piece
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Player {
    pub kind: PieceKind,
    pub rotation: Rotation,
    /// Current rotation's matrix
    pub shape: Shape,
    /// Top-left of the shape's bounding box, in stage coordinates
    pub x: i8,
    pub y: i8,
    pub collided: bool,
}

impl Player {
    /// A fresh piece at the spawn location.
    ///
    /// The piece is centered horizontally and raised so its topmost mino sits on
    /// row 0; empty leading rows of the matrix hang above the stage.
    pub fn spawn(kind: PieceKind) -> Self {
        let shape = get_spawn_shape(kind);
        Self {
            kind,
            rotation: Rotation::North,
            shape,
            x: SPAWN_X,
            y: -(shape.top_row() as i8),
            collided: false,
        }
    }

    /// Stage coordinates of each mino (may include rows above the top)
    pub fn cells(&self) -> impl Iterator<Item = (i8, i8)> + '_ {
        self.shape.minos().map(|(dx, dy)| (self.x + dx, self.y + dy))
    }

    /// Is any mino above row 0?
    pub fn is_above_top(&self) -> bool {
        self.cells().any(|(_, y)| y < 0)
    }

    /// Shift horizontally by `dx` unless that would collide
    pub fn try_move(&mut self, stage: &Stage, dx: i8) -> bool {
        if self.collided || check_collision(self, stage, (dx, 0)) {
            return false;
        }
        self.x += dx;
        true
    }

    /// Rotate one quarter turn (`1` clockwise, `-1` counter-clockwise).
    ///
    /// No wall kicks: a rotation that would collide in place is rejected.
    pub fn try_rotate(&mut self, stage: &Stage, direction: i8) -> bool {
        if self.collided {
            return false;
        }
        let candidate = self.shape.rotated(direction);
        if check_collision_with(self, stage, &candidate, (0, 0)) {
            return false;
        }
        self.shape = candidate;
        self.rotation = if direction < 0 {
            self.rotation.rotate_ccw()
        } else {
            self.rotation.rotate_cw()
        };
        true
    }

    /// Step down one row. When the row below is blocked the piece is marked
    /// `collided` instead; the return value says whether it moved.
    pub fn step_down(&mut self, stage: &Stage) -> bool {
        if self.collided {
            return false;
        }
        if check_collision(self, stage, (0, 1)) {
            self.collided = true;
            return false;
        }
        self.y += 1;
        true
    }

    /// Drop until the first collision. Returns the number of rows fallen.
    pub fn drop_to_floor(&mut self, stage: &Stage) -> u32 {
        let mut distance = 0;
        while self.step_down(stage) {
            distance += 1;
        }
        distance
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Cell;

    #[test]
    fn spawn_is_centered_with_top_mino_on_row_zero() {
        for kind in PieceKind::ALL {
            let player = Player::spawn(kind);
            assert_eq!(player.x, 3);
            assert_eq!(player.cells().map(|(_, y)| y).min(), Some(0), "{kind:?}");
            assert!(!player.collided);
        }
    }

    #[test]
    fn t_spawns_with_its_empty_row_above_the_stage() {
        let player = Player::spawn(PieceKind::T);
        assert_eq!(player.y, -1);
        assert!(!player.is_above_top());
    }

    #[test]
    fn rejected_move_leaves_position_unchanged() {
        let stage = Stage::new();
        let mut player = Player::spawn(PieceKind::O);
        player.x = 0;
        let before = player;
        assert!(!player.try_move(&stage, -1));
        assert_eq!(player, before);
    }

    #[test]
    fn rejected_rotation_leaves_shape_unchanged() {
        let mut stage = Stage::new();
        let mut player = Player::spawn(PieceKind::I);
        player.y = 10;
        // Block the row a horizontal I would occupy.
        stage.set(player.x, player.y + 1, Cell::Merged(PieceKind::O));
        let before = player;
        assert!(!player.try_rotate(&stage, 1));
        assert_eq!(player, before);
    }

    #[test]
    fn rotation_cycles_through_states() {
        let stage = Stage::new();
        let mut player = Player::spawn(PieceKind::T);
        player.y = 5;
        let start = player.shape;
        for expected in [Rotation::East, Rotation::South, Rotation::West, Rotation::North] {
            assert!(player.try_rotate(&stage, 1));
            assert_eq!(player.rotation, expected);
        }
        assert_eq!(player.shape, start);

        assert!(player.try_rotate(&stage, -1));
        assert_eq!(player.rotation, Rotation::West);
    }

    #[test]
    fn step_down_marks_collided_at_floor() {
        let stage = Stage::new();
        let mut player = Player::spawn(PieceKind::O);
        assert_eq!(player.drop_to_floor(&stage), 18);
        assert!(player.collided);
        assert_eq!(player.y, 18);

        // Frozen once collided.
        assert!(!player.try_move(&stage, 1));
        assert!(!player.try_rotate(&stage, 1));
        assert!(!player.step_down(&stage));
    }
}
