//! Raster-op variant table
//!
//! For every raster operation and alignment class the table names the
//! kernel tier to run. Each class has a fixed candidate pair, resolved once
//! by comparing tuning scores; the second candidate wins ties, so a class
//! always has a kernel even when both scores are 0.
//!
//! | class  | candidates |
//! |--------|------------|
//! | vector | `va`, `wa` |
//! | word   | `vm`, `wa` |
//! | byte   | `vm`, `wm` |
//! | bit    | `wm`       |
//!
//! # See also
//!
//! `rapp_bitblt.c` (`rapp_bitblt_tab`, `RAPP_BITBLT_BEST`)

use crate::align::AlignClass;
use crate::kernel::Tier;
use crate::rop::Rop;
use crate::tune::ScoreTable;
use rapp_core::platform::{ALIGNMENT, NATIVE_SIZE};

/// Selected tiers of one raster operation, one per alignment class.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Variants {
    pub vector: Tier,
    pub word: Tier,
    pub byte: Tier,
    pub bit: Tier,
}

impl Variants {
    /// Tier for `class`.
    pub fn get(&self, class: AlignClass) -> Tier {
        match class {
            AlignClass::Vector => self.vector,
            AlignClass::Word => self.word,
            AlignClass::Byte => self.byte,
            AlignClass::Bit => self.bit,
        }
    }
}

/// Variant table indexed by raster operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VariantTable {
    entries: [Variants; Rop::COUNT],
}

impl Default for VariantTable {
    fn default() -> Self {
        Self::build(&ScoreTable::default())
    }
}

fn best(scores: &ScoreTable, rop: Rop, first: Tier, second: Tier) -> Tier {
    if scores.get(rop, first) > scores.get(rop, second) {
        first
    } else {
        second
    }
}

impl VariantTable {
    /// Resolve every class of every operation from `scores`.
    pub fn build(scores: &ScoreTable) -> Self {
        let entries = Rop::ALL.map(|rop| {
            let word = if ALIGNMENT > NATIVE_SIZE {
                best(scores, rop, Tier::VectorMisaligned, Tier::WordAligned)
            } else {
                Tier::WordAligned
            };
            let variants = Variants {
                vector: best(scores, rop, Tier::VectorAligned, Tier::WordAligned),
                word,
                byte: best(scores, rop, Tier::VectorMisaligned, Tier::WordMisaligned),
                bit: Tier::WordMisaligned,
            };
            log::debug!(
                "bitblt {rop}: vector={} word={} byte={} bit={}",
                variants.vector,
                variants.word,
                variants.byte,
                variants.bit
            );
            variants
        });
        VariantTable { entries }
    }

    /// Tier selected for `rop` at `class`.
    pub fn variant(&self, rop: Rop, class: AlignClass) -> Tier {
        self.entries[rop.index()].get(class)
    }

    /// All selections for `rop`.
    pub fn entry(&self, rop: Rop) -> &Variants {
        &self.entries[rop.index()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_selection() {
        let table = VariantTable::default();
        for rop in Rop::ALL {
            assert_eq!(
                *table.entry(rop),
                Variants {
                    vector: Tier::VectorAligned,
                    word: Tier::VectorMisaligned,
                    byte: Tier::VectorMisaligned,
                    bit: Tier::WordMisaligned,
                }
            );
        }
    }

    #[test]
    fn test_swapped_scores_flip_selection() {
        let mut scores = ScoreTable::default();
        scores.swap(Rop::And, Tier::VectorAligned, Tier::WordAligned);
        scores.swap(Rop::And, Tier::VectorMisaligned, Tier::WordMisaligned);
        let table = VariantTable::build(&scores);
        assert_eq!(table.variant(Rop::And, AlignClass::Vector), Tier::WordAligned);
        assert_eq!(table.variant(Rop::And, AlignClass::Byte), Tier::WordMisaligned);
        // Other operations keep their selection
        assert_eq!(table.variant(Rop::Or, AlignClass::Vector), Tier::VectorAligned);
    }

    #[test]
    fn test_ties_pick_second_candidate() {
        let table = VariantTable::build(&ScoreTable::empty());
        for rop in Rop::ALL {
            assert_eq!(table.variant(rop, AlignClass::Vector), Tier::WordAligned);
            assert_eq!(table.variant(rop, AlignClass::Word), Tier::WordAligned);
            assert_eq!(table.variant(rop, AlignClass::Byte), Tier::WordMisaligned);
            assert_eq!(table.variant(rop, AlignClass::Bit), Tier::WordMisaligned);
        }
    }

    #[test]
    fn test_word_only_selects_word_tiers() {
        let table = VariantTable::build(&ScoreTable::word_only());
        for rop in Rop::ALL {
            for class in AlignClass::ALL {
                assert!(table.variant(rop, class).is_word());
            }
        }
    }
}
