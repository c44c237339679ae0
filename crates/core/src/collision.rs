//! Collision detection
//!
//! A placement collides when any mino lands outside the side walls, below the
//! floor, or on a `Merged` cell. Rows above the top are open so pieces can hang
//! off the top edge, and the player's own `Falling` cells never block it.

use crate::pieces::Shape;
use crate::player::Player;
use crate::stage::Stage;

/// Would `shape` collide at position (x, y)?
pub fn collides_at(stage: &Stage, shape: &Shape, x: i8, y: i8) -> bool {
    shape.minos().any(|(dx, dy)| {
        let px = x + dx;
        let py = y + dy;
        if px < 0 || px >= stage.width() as i8 || py >= stage.height() as i8 {
            return true;
        }
        // py < 0 is above the ceiling: open space
        py >= 0 && stage.is_merged(px, py)
    })
}

/// Would the player collide after moving by `offset`?
pub fn check_collision(player: &Player, stage: &Stage, offset: (i8, i8)) -> bool {
    collides_at(stage, &player.shape, player.x + offset.0, player.y + offset.1)
}

/// Would the player collide if its shape were replaced by `candidate`?
pub fn check_collision_with(player: &Player, stage: &Stage, candidate: &Shape, offset: (i8, i8)) -> bool {
    collides_at(stage, candidate, player.x + offset.0, player.y + offset.1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Cell, PieceKind};

    #[test]
    fn own_falling_cells_never_collide() {
        let mut stage = Stage::new();
        let player = Player::spawn(PieceKind::T);
        stage.stamp(&player);
        assert!(!check_collision(&player, &stage, (0, 0)));
    }

    #[test]
    fn walls_and_floor_collide() {
        let stage = Stage::new();
        let mut player = Player::spawn(PieceKind::O);
        player.x = 0;
        assert!(check_collision(&player, &stage, (-1, 0)));
        player.x = 8;
        assert!(check_collision(&player, &stage, (1, 0)));
        player.y = 18;
        assert!(check_collision(&player, &stage, (0, 1)));
        assert!(!check_collision(&player, &stage, (0, 0)));
    }

    #[test]
    fn space_above_the_top_is_open() {
        let stage = Stage::new();
        let player = Player::spawn(PieceKind::O);
        assert!(!check_collision(&player, &stage, (0, -5)));
    }

    #[test]
    fn merged_cells_collide() {
        let mut stage = Stage::new();
        let player = Player::spawn(PieceKind::O);
        let (x, y) = player.cells().next().unwrap();
        stage.set(x, y + 1, Cell::Merged(PieceKind::Z));
        assert!(check_collision(&player, &stage, (0, 1)));
    }

    #[test]
    fn candidate_shape_is_checked_instead_of_current() {
        let stage = Stage::new();
        let mut player = Player::spawn(PieceKind::I);
        // Vertical I hugging the left wall: column 1 of its matrix sits on x=0.
        player.x = -1;
        assert!(!check_collision(&player, &stage, (0, 0)));
        let flat = player.shape.rotated(1);
        assert!(check_collision_with(&player, &stage, &flat, (0, 0)));
    }
}
