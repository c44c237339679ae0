//! RNG module - random piece generation
//!
//! Two policies are available, both exposed as infinite iterators of
//! [`PieceKind`]:
//!
//! - [`UniformRandomizer`]: an independent uniform draw among the 7 kinds for
//!   every piece. Immediate repeats are possible. This is the default.
//! - [`BagRandomizer`]: the "7-bag" algorithm. Each bag holds one of each
//!   kind, shuffled; every run of 7 pieces starting on a bag boundary
//!   contains all 7 kinds exactly once.
//!
//! Both are driven by a small LCG so a seed reproduces the whole sequence.

use crate::types::PieceKind;

/// Simple LCG (Linear Congruential Generator) RNG
/// Uses constants from Numerical Recipes
#[derive(Debug, Clone)]
pub struct SimpleRng {
    state: u32,
}

impl SimpleRng {
    /// Create a new RNG with the given seed
    pub fn new(seed: u32) -> Self {
        // Avoid 0 seed which would produce all zeros
        let state = if seed == 0 { 1 } else { seed };
        Self { state }
    }

    /// Generate next random u32
    pub fn next_u32(&mut self) -> u32 {
        // LCG formula: (a * state + c) mod m
        // Using Numerical Recipes constants: a=1664525, c=1013904223, m=2^32
        self.state = self.state.wrapping_mul(1664525).wrapping_add(1013904223);
        self.state
    }

    /// Generate random value in range [0, max)
    pub fn next_range(&mut self, max: u32) -> u32 {
        // The low bits of a power-of-two LCG cycle quickly; use the high half.
        (self.next_u32() >> 16) % max.max(1)
    }

    /// Shuffle a slice using Fisher-Yates
    pub fn shuffle<T>(&mut self, slice: &mut [T]) {
        for i in (1..slice.len()).rev() {
            let j = self.next_range((i + 1) as u32) as usize;
            slice.swap(i, j);
        }
    }
}

/// Independent uniform draw for every piece
#[derive(Debug, Clone)]
pub struct UniformRandomizer {
    rng: SimpleRng,
}

impl UniformRandomizer {
    pub fn new(seed: u32) -> Self {
        Self {
            rng: SimpleRng::new(seed),
        }
    }
}

impl Iterator for UniformRandomizer {
    type Item = PieceKind;

    fn next(&mut self) -> Option<PieceKind> {
        let idx = self.rng.next_range(PieceKind::ALL.len() as u32) as usize;
        PieceKind::from_index(idx)
    }
}

/// 7-bag piece generator
#[derive(Debug, Clone)]
pub struct BagRandomizer {
    /// Current bag of pieces
    bag: [PieceKind; 7],
    /// Index into current bag
    bag_index: usize,
    /// RNG for shuffling
    rng: SimpleRng,
}

impl BagRandomizer {
    pub fn new(seed: u32) -> Self {
        Self {
            bag: PieceKind::ALL,
            // Exhausted, so the first draw shuffles a fresh bag.
            bag_index: PieceKind::ALL.len(),
            rng: SimpleRng::new(seed),
        }
    }

    fn refill_bag(&mut self) {
        self.bag = PieceKind::ALL;
        self.rng.shuffle(&mut self.bag);
        self.bag_index = 0;
    }
}

impl Iterator for BagRandomizer {
    type Item = PieceKind;

    fn next(&mut self) -> Option<PieceKind> {
        if self.bag_index >= self.bag.len() {
            self.refill_bag();
        }
        let piece = self.bag[self.bag_index];
        self.bag_index += 1;
        Some(piece)
    }
}

/// Which randomizer policy a session uses
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RandomizerKind {
    #[default]
    Uniform,
    Bag,
}

impl RandomizerKind {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "uniform" => Some(RandomizerKind::Uniform),
            "bag" | "7bag" | "7-bag" => Some(RandomizerKind::Bag),
            _ => None,
        }
    }
}

/// The session's default piece source
#[derive(Debug, Clone)]
pub enum Randomizer {
    Uniform(UniformRandomizer),
    Bag(BagRandomizer),
}

impl Randomizer {
    pub fn new(kind: RandomizerKind, seed: u32) -> Self {
        match kind {
            RandomizerKind::Uniform => Randomizer::Uniform(UniformRandomizer::new(seed)),
            RandomizerKind::Bag => Randomizer::Bag(BagRandomizer::new(seed)),
        }
    }
}

impl Iterator for Randomizer {
    type Item = PieceKind;

    fn next(&mut self) -> Option<PieceKind> {
        match self {
            Randomizer::Uniform(r) => r.next(),
            Randomizer::Bag(r) => r.next(),
        }
    }
}
