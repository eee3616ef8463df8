//! Bitblt kernel tiers
//!
//! Four kernel families implement every raster operation:
//!
//! | tier | source alignment it needs | unit |
//! |------|---------------------------|------|
//! | `va` | same block offset as dst  | vector |
//! | `wa` | same word offset as dst   | word |
//! | `vm` | same bit offset as dst    | vector, unaligned loads |
//! | `wm` | any                       | word, bit shifts |
//!
//! Destination rows always start on an alignment boundary and are written
//! in whole units covering `width` bits. Source reads go through clipped
//! loads, so bytes outside the source slice read as zero and are never
//! touched.
//!
//! # See also
//!
//! `rc_bitblt_wa.c`, `rc_bitblt_wm.c`, `rc_bitblt_vm.c`

use crate::rop::Rop;
use rapp_core::platform::{NATIVE_SIZE, WORD_BITS};
use rapp_core::{Swar, UnalignedLoads, VecScope, Vector, Wide};
use rapp_core::vector::load_clipped;
use std::fmt;

/// Source rows: slice, index of the first byte of row 0 (may lie outside
/// the slice), row dimension.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Rows<'a> {
    pub data: &'a [u8],
    pub pos: isize,
    pub dim: usize,
}

impl<'a> Rows<'a> {
    fn row(&self, y: usize) -> isize {
        self.pos + (y * self.dim) as isize
    }

    /// Same rows, starting `bytes` further on.
    pub fn advance(self, bytes: isize) -> Rows<'a> {
        Rows {
            pos: self.pos + bytes,
            ..self
        }
    }
}

/// Destination rows. Every accessed unit lies inside the slice.
#[derive(Debug)]
pub(crate) struct RowsMut<'a> {
    pub data: &'a mut [u8],
    pub pos: usize,
    pub dim: usize,
}

impl RowsMut<'_> {
    fn row(&self, y: usize) -> usize {
        self.pos + y * self.dim
    }

    /// Shorter-lived rows starting `bytes` further on.
    pub fn advance(&mut self, bytes: usize) -> RowsMut<'_> {
        RowsMut {
            data: &mut *self.data,
            pos: self.pos + bytes,
            dim: self.dim,
        }
    }
}

/// Kernel tier.
///
/// The discriminant is the column index in the score table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Tier {
    /// Vector aligned (`va`)
    VectorAligned = 0,
    /// Word aligned (`wa`)
    WordAligned = 1,
    /// Vector misaligned (`vm`)
    VectorMisaligned = 2,
    /// Word misaligned with a bit shift (`wm`)
    WordMisaligned = 3,
}

impl Tier {
    /// Number of tiers.
    pub const COUNT: usize = 4;

    /// All tiers in table order.
    pub const ALL: [Tier; Tier::COUNT] = [
        Tier::VectorAligned,
        Tier::WordAligned,
        Tier::VectorMisaligned,
        Tier::WordMisaligned,
    ];

    /// Table index.
    pub fn index(self) -> usize {
        self as usize
    }

    /// Short name, as used in the compute-layer symbol names.
    pub fn name(self) -> &'static str {
        match self {
            Tier::VectorAligned => "va",
            Tier::WordAligned => "wa",
            Tier::VectorMisaligned => "vm",
            Tier::WordMisaligned => "wm",
        }
    }

    /// Whether the tier works on machine words rather than vectors.
    pub fn is_word(self) -> bool {
        matches!(self, Tier::WordAligned | Tier::WordMisaligned)
    }

    /// Run the kernel over `height` rows of `width` bits.
    ///
    /// `offset` is the residual bit shift of the source, understood only by
    /// [`Tier::WordMisaligned`]; the other tiers require it to be zero.
    pub(crate) fn run(
        self,
        rop: Rop,
        dst: &mut RowsMut<'_>,
        src: Rows<'_>,
        width: usize,
        height: usize,
        offset: usize,
    ) {
        debug_assert!(offset == 0 || self == Tier::WordMisaligned);
        match self {
            Tier::VectorAligned => aligned::<Wide>(rop, dst, src, width, height),
            Tier::WordAligned => aligned::<Swar>(rop, dst, src, width, height),
            Tier::VectorMisaligned => misaligned::<Wide>(rop, dst, src, width, height),
            Tier::WordMisaligned => shifted(rop, dst, src, width, height, offset),
        }
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Source and destination units start at the same offset.
fn aligned<V: Vector>(rop: Rop, dst: &mut RowsMut<'_>, src: Rows<'_>, width: usize, height: usize) {
    let _scope = VecScope::<V>::enter();
    let tot = width.div_ceil(8 * V::SIZE);
    for y in 0..height {
        let mut i = src.row(y);
        let mut j = dst.row(y);
        for _ in 0..tot {
            let sv = load_clipped::<V>(src.data, i);
            let dv = V::load(&dst.data[j..]);
            rop.apply(dv, sv).store(&mut dst.data[j..]);
            i += V::SIZE as isize;
            j += V::SIZE;
        }
    }
}

/// Source misaligned by whole bytes, read through the unaligned cursor.
fn misaligned<V: Vector>(
    rop: Rop,
    dst: &mut RowsMut<'_>,
    src: Rows<'_>,
    width: usize,
    height: usize,
) {
    let _scope = VecScope::<V>::enter();
    let tot = width.div_ceil(8 * V::SIZE);
    for y in 0..height {
        let mut loads = UnalignedLoads::<V>::new(src.data, src.row(y));
        let mut j = dst.row(y);
        for _ in 0..tot {
            let sv = loads.load();
            let dv = V::load(&dst.data[j..]);
            rop.apply(dv, sv).store(&mut dst.data[j..]);
            j += V::SIZE;
        }
    }
}

/// Source misaligned by an arbitrary number of bits. Each destination word
/// is assembled from two consecutive aligned source words.
fn shifted(
    rop: Rop,
    dst: &mut RowsMut<'_>,
    src: Rows<'_>,
    width: usize,
    height: usize,
    offset: usize,
) {
    let tot = width.div_ceil(WORD_BITS);
    let word = NATIVE_SIZE as isize;
    let mis = (src.data.as_ptr() as isize + src.pos).rem_euclid(word);
    let sh1 = (8 * mis as usize + offset) as u32;
    let sh2 = WORD_BITS as u32 - sh1;
    let base = src.advance(-mis);

    for y in 0..height {
        let mut i = base.row(y);
        let mut j = dst.row(y);
        let mut prev = load_clipped::<Swar>(src.data, i).0;
        i += word;
        for _ in 0..tot {
            let sw = load_clipped::<Swar>(src.data, i).0;
            // Pixel order is LSB first, so earlier pixels sit in lower bits
            let aw = prev.checked_shr(sh1).unwrap_or(0) | sw.checked_shl(sh2).unwrap_or(0);
            let dw = Swar::load(&dst.data[j..]);
            rop.apply(dw, Swar(aw)).store(&mut dst.data[j..]);
            prev = sw;
            i += word;
            j += NATIVE_SIZE;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rapp_core::AlignedBuf;

    fn bit(data: &[u8], i: usize) -> bool {
        data[i / 8] >> (i % 8) & 1 == 1
    }

    #[test]
    fn test_aligned_tiers_agree() {
        let mut src = AlignedBuf::new(64);
        for (i, b) in src.as_mut_slice().iter_mut().enumerate() {
            *b = (i as u8).wrapping_mul(37) ^ 0x5a;
        }
        for tier in [Tier::VectorAligned, Tier::WordAligned] {
            let mut dst = AlignedBuf::new(64);
            dst.as_mut_slice().fill(0xf0);
            let mut rows = RowsMut {
                data: dst.as_mut_slice(),
                pos: 0,
                dim: 32,
            };
            let s = Rows {
                data: src.as_slice(),
                pos: 0,
                dim: 32,
            };
            tier.run(Rop::Xor, &mut rows, s, 256, 2, 0);
            for (k, (&d, &s)) in dst.as_slice().iter().zip(src.as_slice()).enumerate() {
                assert_eq!(d, 0xf0 ^ s, "{tier} byte {k}");
            }
        }
    }

    #[test]
    fn test_misaligned_tiers_shift_source() {
        let mut src = AlignedBuf::new(64);
        for (i, b) in src.as_mut_slice().iter_mut().enumerate() {
            *b = (i as u8).wrapping_mul(113).rotate_left(3);
        }
        // Source starts 3 bytes into the buffer; `wm` also takes 5 bits
        for (tier, offset) in [(Tier::VectorMisaligned, 0), (Tier::WordMisaligned, 0), (Tier::WordMisaligned, 5)] {
            let mut dst = AlignedBuf::new(32);
            let mut rows = RowsMut {
                data: dst.as_mut_slice(),
                pos: 0,
                dim: 0,
            };
            let s = Rows {
                data: src.as_slice(),
                pos: 3,
                dim: 0,
            };
            tier.run(Rop::Copy, &mut rows, s, 256, 1, offset);
            for x in 0..256 {
                let want = bit(src.as_slice(), 24 + offset + x);
                assert_eq!(bit(dst.as_slice(), x), want, "{tier} pixel {x}");
            }
        }
    }

    #[test]
    fn test_reads_past_source_are_zero() {
        let src = [0xffu8; 5];
        let mut dst = [0x00u8; 16];
        let mut rows = RowsMut {
            data: &mut dst,
            pos: 0,
            dim: 0,
        };
        let s = Rows {
            data: &src,
            pos: 1,
            dim: 0,
        };
        Tier::WordMisaligned.run(Rop::Copy, &mut rows, s, 128, 1, 2);
        // 4 bytes from index 1, minus the 2 skipped bits
        assert_eq!(&dst[..5], &[0xff, 0xff, 0xff, 0x3f, 0x00]);
        assert!(dst[5..].iter().all(|&b| b == 0));
    }

    #[test]
    fn test_tier_names() {
        let names: Vec<_> = Tier::ALL.iter().map(|t| t.name()).collect();
        assert_eq!(names, ["va", "wa", "vm", "wm"]);
        assert!(Tier::WordMisaligned.is_word());
        assert!(!Tier::VectorMisaligned.is_word());
    }
}
