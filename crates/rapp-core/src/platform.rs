//! Platform constants
//!
//! `ALIGNMENT` is the width in bytes of the widest vector backend used by
//! the dispatcher. Every "aligned" buffer start and every row dimension must
//! be a multiple of it. `NATIVE_SIZE` is the machine word used by the word
//! kernels.

/// Buffer alignment in bytes (the vector width `A`).
pub const ALIGNMENT: usize = 16;

/// Native machine word size in bytes.
pub const NATIVE_SIZE: usize = 8;

/// Number of bits in one alignment block.
pub const BLOCK_BITS: usize = 8 * ALIGNMENT;

/// Number of bits in one native word.
pub const WORD_BITS: usize = 8 * NATIVE_SIZE;

const _: () = assert!(ALIGNMENT.is_power_of_two() && ALIGNMENT % NATIVE_SIZE == 0);

/// Round `n` up to the next multiple of [`ALIGNMENT`].
#[inline]
pub const fn align(n: usize) -> usize {
    (n + ALIGNMENT - 1) & !(ALIGNMENT - 1)
}

/// Check whether `n` is a multiple of [`ALIGNMENT`].
#[inline]
pub const fn is_aligned(n: usize) -> bool {
    n % ALIGNMENT == 0
}

/// Number of bytes needed for `width` binary pixels.
#[inline]
pub const fn bin_bytes(width: usize) -> usize {
    width.div_ceil(8)
}

/// Number of alignment blocks covered by a row of `width` pixels starting
/// at bit `offset` of an aligned block.
#[inline]
pub const fn blocks(width: usize, offset: usize) -> usize {
    (width + offset).div_ceil(BLOCK_BITS)
}
