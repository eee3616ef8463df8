//! Boolean raster operations
//!
//! Each operation combines a destination value `d` with a source value `s`
//! and writes the result back to the destination. The same definition is
//! applied lane-wise on vectors and machine words by the kernels, and
//! pixel-wise by the reference implementation used in tests.
//!
//! # See also
//!
//! `rc_bitblt_rop.h` (`RC_BITBLT_ROP_*`)

use rapp_core::Vector;
use std::fmt;

/// Raster operation
///
/// The discriminant is the index into the variant table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Rop {
    /// `s`
    Copy = 0,
    /// `!s`
    Not = 1,
    /// `d & s`
    And = 2,
    /// `d | s`
    Or = 3,
    /// `d ^ s`
    Xor = 4,
    /// `!(d & s)`
    Nand = 5,
    /// `!(d | s)`
    Nor = 6,
    /// `!(d ^ s)`
    Xnor = 7,
    /// `d & !s`
    Andn = 8,
    /// `d | !s`
    Orn = 9,
    /// `!d | s`
    Nandn = 10,
    /// `!d & s`
    Norn = 11,
}

impl Rop {
    /// Number of raster operations.
    pub const COUNT: usize = 12;

    /// All operations in table order.
    pub const ALL: [Rop; Rop::COUNT] = [
        Rop::Copy,
        Rop::Not,
        Rop::And,
        Rop::Or,
        Rop::Xor,
        Rop::Nand,
        Rop::Nor,
        Rop::Xnor,
        Rop::Andn,
        Rop::Orn,
        Rop::Nandn,
        Rop::Norn,
    ];

    /// Table index.
    pub fn index(self) -> usize {
        self as usize
    }

    /// Lower-case name, as used in the exported symbol names.
    pub fn name(self) -> &'static str {
        match self {
            Rop::Copy => "copy",
            Rop::Not => "not",
            Rop::And => "and",
            Rop::Or => "or",
            Rop::Xor => "xor",
            Rop::Nand => "nand",
            Rop::Nor => "nor",
            Rop::Xnor => "xnor",
            Rop::Andn => "andn",
            Rop::Orn => "orn",
            Rop::Nandn => "nandn",
            Rop::Norn => "norn",
        }
    }

    /// Whether the result depends on the destination value.
    pub fn reads_dst(self) -> bool {
        !matches!(self, Rop::Copy | Rop::Not)
    }

    /// Combine destination and source vectors.
    #[inline]
    pub fn apply<V: Vector>(self, d: V, s: V) -> V {
        match self {
            Rop::Copy => s,
            Rop::Not => s.not(),
            Rop::And => d.and(s),
            Rop::Or => d.or(s),
            Rop::Xor => d.xor(s),
            Rop::Nand => d.and(s).not(),
            Rop::Nor => d.or(s).not(),
            Rop::Xnor => d.xornot(s),
            Rop::Andn => d.andnot(s),
            Rop::Orn => d.ornot(s),
            Rop::Nandn => s.ornot(d),
            Rop::Norn => s.andnot(d),
        }
    }

    /// Combine a destination and a source pixel.
    pub fn pixel(self, d: bool, s: bool) -> bool {
        match self {
            Rop::Copy => s,
            Rop::Not => !s,
            Rop::And => d & s,
            Rop::Or => d | s,
            Rop::Xor => d ^ s,
            Rop::Nand => !(d & s),
            Rop::Nor => !(d | s),
            Rop::Xnor => !(d ^ s),
            Rop::Andn => d & !s,
            Rop::Orn => d | !s,
            Rop::Nandn => !d | s,
            Rop::Norn => !d & s,
        }
    }
}

impl fmt::Display for Rop {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rapp_core::{Swar, Wide};

    #[test]
    fn test_table_order() {
        for (i, rop) in Rop::ALL.iter().enumerate() {
            assert_eq!(rop.index(), i);
        }
        assert_eq!(Rop::Nandn.to_string(), "nandn");
    }

    #[test]
    fn test_vector_matches_pixel_truth_table() {
        // Lanes 0b1100 (d) and 0b1010 (s) cover all four input pairs
        let d = 0b1100u8;
        let s = 0b1010u8;
        for rop in Rop::ALL {
            let mut expect = 0u8;
            for bit in 0..8 {
                let out = rop.pixel(d >> bit & 1 == 1, s >> bit & 1 == 1);
                expect |= (out as u8) << bit;
            }
            assert_eq!(rop.apply(Swar::splat(d), Swar::splat(s)), Swar::splat(expect), "{rop}");
            assert_eq!(rop.apply(Wide::splat(d), Wide::splat(s)), Wide::splat(expect), "{rop}");
        }
    }

    #[test]
    fn test_reads_dst() {
        assert!(!Rop::Copy.reads_dst());
        assert!(!Rop::Not.reads_dst());
        assert!(Rop::Norn.reads_dst());
    }
}
