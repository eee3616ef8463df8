//! Atom kernels
//!
//! One generic word kernel applies any atom: every output word is the AND
//! (erosion) or OR (dilation) of the source words found at the atom
//! offsets. Source words are gathered at arbitrary bit positions from two
//! clipped word loads, so reads that leave the source slice see zeros
//! instead of faulting.
//!
//! Whole words are written, which covers up to 63 pixels past the image
//! width. Those pixels are scratch; the next step pads over them before
//! reading.

use crate::atom::Offset;
use rapp_core::vector::load_clipped;
use rapp_core::{Raster, RasterMut, Swar};

/// Morphological operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Morph {
    Erode,
    Dilate,
}

impl Morph {
    /// Lower-case operation name.
    pub fn name(self) -> &'static str {
        match self {
            Morph::Erode => "erode",
            Morph::Dilate => "dilate",
        }
    }
}

impl std::fmt::Display for Morph {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

const WORD_BITS: usize = 64;

/// 64 pixels starting at absolute bit `bit` of `data`.
#[inline]
fn load_bits(data: &[u8], bit: isize) -> u64 {
    let byte = bit.div_euclid(8);
    let shift = bit.rem_euclid(8) as u32;
    let lo = load_clipped::<Swar>(data, byte).0;
    if shift == 0 {
        return lo;
    }
    let hi = load_clipped::<Swar>(data, byte + 8).0;
    (lo >> shift) | (hi << (64 - shift))
}

/// Apply `op` with the offsets of one atom to a `width` x `height` image.
///
/// `dst` and `src` must be aligned views; `src` supplies the padding the
/// atom reaches into.
pub(crate) fn apply(
    op: Morph,
    offsets: &[Offset],
    dst: &mut RasterMut<'_>,
    src: &Raster<'_>,
    width: usize,
    height: usize,
) {
    let words = width.div_ceil(WORD_BITS);
    let sdim = src.dim() as isize;
    let sbase = 8 * src.start() as isize;
    let (dstart, ddim) = (dst.start(), dst.dim());
    let sdata = src.data();
    let ddata = dst.data_mut();

    for y in 0..height {
        let row = sbase + 8 * sdim * y as isize;
        let out = &mut ddata[dstart + y * ddim..];
        for k in 0..words {
            let x = (k * WORD_BITS) as isize;
            let acc = match op {
                Morph::Erode => offsets.iter().fold(!0u64, |acc, &(dx, dy)| {
                    acc & load_bits(sdata, row + 8 * sdim * dy + x + dx)
                }),
                Morph::Dilate => offsets.iter().fold(0u64, |acc, &(dx, dy)| {
                    acc | load_bits(sdata, row - 8 * sdim * dy + x - dx)
                }),
            };
            out[8 * k..8 * k + 8].copy_from_slice(&acc.to_le_bytes());
        }
    }
}

/// 2x2 square with the anchor at its top-left pixel.
pub(crate) const SQUARE_2X2: [Offset; 4] = [(0, 0), (1, 0), (0, 1), (1, 1)];
