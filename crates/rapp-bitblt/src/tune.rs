//! Kernel tuning scores
//!
//! A score is a nominal throughput figure for one (raster operation, kernel
//! tier) pair, measured offline. Scores are only ever compared with each
//! other; a score of 0 marks a kernel as unavailable.
//!
//! The built-in table ranks the portable kernels by the width of the unit
//! they move per iteration and by how much shifting they do: `va` over `vm`
//! over `wa` over `wm`, the same for every operation.

use crate::kernel::Tier;
use crate::rop::Rop;

const DEFAULT_SCORES: [u32; Tier::COUNT] = [400, 200, 300, 100];

/// Per-operation, per-tier score table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScoreTable {
    scores: [[u32; Tier::COUNT]; Rop::COUNT],
}

impl Default for ScoreTable {
    fn default() -> Self {
        ScoreTable {
            scores: [DEFAULT_SCORES; Rop::COUNT],
        }
    }
}

impl ScoreTable {
    /// Table with every score 0. The variant table then falls back to the
    /// second candidate of every class.
    pub fn empty() -> Self {
        ScoreTable {
            scores: [[0; Tier::COUNT]; Rop::COUNT],
        }
    }

    /// Default table with the vector tiers marked unavailable.
    pub fn word_only() -> Self {
        let mut table = Self::default();
        for rop in Rop::ALL {
            table.set(rop, Tier::VectorAligned, 0);
            table.set(rop, Tier::VectorMisaligned, 0);
        }
        table
    }

    /// Score of `tier` for `rop`.
    pub fn get(&self, rop: Rop, tier: Tier) -> u32 {
        self.scores[rop.index()][tier.index()]
    }

    /// Set the score of `tier` for `rop`.
    pub fn set(&mut self, rop: Rop, tier: Tier, score: u32) {
        self.scores[rop.index()][tier.index()] = score;
    }

    /// Exchange the scores of two tiers for `rop`.
    pub fn swap(&mut self, rop: Rop, a: Tier, b: Tier) {
        self.scores[rop.index()].swap(a.index(), b.index());
    }
}
