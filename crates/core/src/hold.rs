//! Hold slot - bank one piece, swap it back later
//!
//! Holding is allowed once per spawned piece: the session re-arms the slot on
//! every spawn from the generator, never on a hold swap.

use crate::types::PieceKind;

/// What a hold request did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HoldOutcome {
    /// Hold used up for this piece; nothing changed
    Unavailable,
    /// Slot was empty: the active kind was banked, spawn the next piece
    Stored,
    /// Slot had a piece: bring this kind into play
    Swapped(PieceKind),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HoldSlot {
    held: Option<PieceKind>,
    can_hold: bool,
}

impl HoldSlot {
    pub fn new() -> Self {
        Self {
            held: None,
            can_hold: true,
        }
    }

    pub fn held(&self) -> Option<PieceKind> {
        self.held
    }

    pub fn can_hold(&self) -> bool {
        self.can_hold
    }

    /// Bank `active`. On success the slot is spent until [`HoldSlot::rearm`].
    pub fn hold(&mut self, active: PieceKind) -> HoldOutcome {
        if !self.can_hold {
            return HoldOutcome::Unavailable;
        }
        self.can_hold = false;
        match self.held.replace(active) {
            Some(previous) => HoldOutcome::Swapped(previous),
            None => HoldOutcome::Stored,
        }
    }

    /// Called on every spawn from the generator
    pub fn rearm(&mut self) {
        self.can_hold = true;
    }

    /// Mark the slot as spent without changing its content
    pub fn spend(&mut self) {
        self.can_hold = false;
    }
}

impl Default for HoldSlot {
    fn default() -> Self {
        Self::new()
    }
}
