//! Alignment classifier
//!
//! The relative bit alignment of source and destination decides which
//! kernel tier can service a blit. The class depends only on the difference
//! of the two normalized bit offsets modulo one alignment block.

use rapp_core::platform::{BLOCK_BITS, WORD_BITS};
use std::fmt;

/// Relative alignment of a source/destination pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AlignClass {
    /// Same offset within an alignment block
    Vector,
    /// Offsets differ by whole machine words
    Word,
    /// Offsets differ by whole bytes
    Byte,
    /// Any other difference
    Bit,
}

impl AlignClass {
    /// All classes, finest alignment first.
    pub const ALL: [AlignClass; 4] = [
        AlignClass::Vector,
        AlignClass::Word,
        AlignClass::Byte,
        AlignClass::Bit,
    ];

    /// Class of a signed bit alignment difference.
    pub fn of_delta(delta: isize) -> AlignClass {
        let delta = delta.rem_euclid(BLOCK_BITS as isize) as usize;
        if delta == 0 {
            AlignClass::Vector
        } else if delta % WORD_BITS == 0 {
            AlignClass::Word
        } else if delta % 8 == 0 {
            AlignClass::Byte
        } else {
            AlignClass::Bit
        }
    }
}

impl fmt::Display for AlignClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            AlignClass::Vector => "vector",
            AlignClass::Word => "word",
            AlignClass::Byte => "byte",
            AlignClass::Bit => "bit",
        };
        f.write_str(name)
    }
}

/// Classify a pair of block-relative bit offsets.
///
/// # Arguments
///
/// * `src_off` - Source bit offset from its enclosing alignment boundary
/// * `dst_off` - Destination bit offset from its enclosing alignment boundary
pub fn classify(src_off: usize, dst_off: usize) -> AlignClass {
    AlignClass::of_delta(src_off as isize - dst_off as isize)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classes() {
        assert_eq!(classify(0, 0), AlignClass::Vector);
        assert_eq!(classify(BLOCK_BITS + 3, 3), AlignClass::Vector);
        assert_eq!(classify(64, 0), AlignClass::Word);
        assert_eq!(classify(0, 64), AlignClass::Word);
        assert_eq!(classify(24, 0), AlignClass::Byte);
        assert_eq!(classify(5, 13), AlignClass::Byte);
        assert_eq!(classify(1, 0), AlignClass::Bit);
        assert_eq!(classify(70, 3), AlignClass::Bit);
    }

    #[test]
    fn test_every_delta_has_one_class() {
        let mut counts = [0usize; 4];
        for delta in 0..BLOCK_BITS {
            let class = classify(delta, 0);
            assert_eq!(class, classify(0, BLOCK_BITS - delta));
            counts[AlignClass::ALL.iter().position(|&c| c == class).unwrap()] += 1;
        }
        let words = BLOCK_BITS / WORD_BITS;
        assert_eq!(counts, [1, words - 1, BLOCK_BITS / 8 - words, BLOCK_BITS - BLOCK_BITS / 8]);
    }
}
