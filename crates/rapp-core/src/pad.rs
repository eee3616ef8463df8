//! Binary image padding
//!
//! Morphological kernels read pixels outside the image. Padding writes
//! `size` pixels on every side of the image, either a constant value or a
//! replica of the nearest edge pixel.
//!
//! The left and right padding of every image row is written first. The top
//! and bottom padding rows are then written over the whole vector-aligned
//! span of a padded row, so the corners follow the side padding. Bytes
//! between the padding and the enclosing alignment boundaries may be
//! overwritten.
//!
//! # See also
//!
//! `rapp_pad_bin.c` (`rapp_pad_const_bin`, `rapp_pad_clamp_bin`)

use crate::error::Result;
use crate::platform::{ALIGNMENT, align};
use crate::raster::RasterMut;

/// Byte span `[lo, hi)` of a padded row relative to the first pixel byte,
/// widened to alignment boundaries.
fn padded_span(addr: usize, offset: usize, width: usize, size: usize) -> (isize, isize) {
    let left_bit = offset as isize - size as isize;
    let lo_byte = left_bit.div_euclid(8);
    let mis = (addr as isize + lo_byte).rem_euclid(ALIGNMENT as isize);
    let lo = lo_byte - mis;
    let hi_byte = (offset + width + size).div_ceil(8) as isize;
    let hi = lo + align((hi_byte - lo) as usize) as isize;
    (lo, hi)
}

/// Bytes `[lo, hi)` around the first pixel byte at `addr` that padding a
/// `width` x `height` image by `size` pixels may touch.
pub fn pad_window(
    addr: usize,
    offset: usize,
    dim: usize,
    width: usize,
    height: usize,
    size: usize,
) -> (isize, isize) {
    let (lo, hi) = padded_span(addr, offset, width, size);
    let (dim, rows) = (dim as isize, size as isize);
    (lo - rows * dim, (height as isize - 1 + rows) * dim + hi)
}

/// Validate and bounds-check a padding request. Returns the padded span.
fn prepare(
    buf: &RasterMut<'_>,
    width: usize,
    height: usize,
    size: usize,
) -> Result<(isize, isize)> {
    buf.validate_noalign_bin(width + 2 * size, height)?;
    let (lo, hi) = pad_window(buf.addr(), buf.offset(), buf.dim(), width, height, size);
    buf.check_window(lo, hi)?;
    Ok(padded_span(buf.addr(), buf.offset(), width, size))
}

/// Set `count` bits starting at absolute bit index `first` of `data`.
pub(crate) fn fill_bits(data: &mut [u8], first: usize, count: usize, value: bool) {
    let mut bit = first;
    let end = first + count;
    while bit < end {
        let byte = bit / 8;
        let lo = bit % 8;
        let hi = (end - byte * 8).min(8);
        if lo == 0 && hi == 8 {
            // Whole bytes
            let nbytes = (end - bit) / 8;
            data[byte..byte + nbytes].fill(if value { 0xff } else { 0 });
            bit += nbytes * 8;
            continue;
        }
        let mask = (((1u16 << hi) - 1) & !((1u16 << lo) - 1)) as u8;
        if value {
            data[byte] |= mask;
        } else {
            data[byte] &= !mask;
        }
        bit = byte * 8 + hi;
    }
}

/// Absolute bit index of pixel 0 of row `y`.
fn row_bit(buf: &RasterMut<'_>, y: usize) -> usize {
    (buf.start() + y * buf.dim()) * 8 + buf.offset()
}

/// Pad with a constant value.
///
/// # Arguments
///
/// * `buf` - Image view; the slice must hold `size` padding pixels around it
/// * `width`, `height` - Image size in pixels
/// * `size` - Padding size in pixels on every side
/// * `value` - Padding pixel value
pub fn pad_const(
    buf: &mut RasterMut<'_>,
    width: usize,
    height: usize,
    size: usize,
    value: bool,
) -> Result<()> {
    let (lo, hi) = prepare(buf, width, height, size)?;
    if size == 0 {
        return Ok(());
    }
    let fill = if value { 0xff } else { 0 };
    let dim = buf.dim() as isize;
    let start = buf.start() as isize;
    let last = height as isize - 1;

    for r in 1..=size as isize {
        let top = start - r * dim;
        buf.data_mut()[(top + lo) as usize..(top + hi) as usize].fill(fill);
    }
    for y in 0..height {
        let bit = row_bit(buf, y);
        fill_bits(buf.data_mut(), bit - size, size, value);
        fill_bits(buf.data_mut(), bit + width, size, value);
    }
    for r in 1..=size as isize {
        let bottom = start + (last + r) * dim;
        buf.data_mut()[(bottom + lo) as usize..(bottom + hi) as usize].fill(fill);
    }
    Ok(())
}

/// Pad by replicating the nearest edge pixel.
///
/// # Arguments
///
/// * `buf` - Image view; the slice must hold `size` padding pixels around it
/// * `width`, `height` - Image size in pixels
/// * `size` - Padding size in pixels on every side
pub fn pad_clamp(buf: &mut RasterMut<'_>, width: usize, height: usize, size: usize) -> Result<()> {
    let (lo, hi) = prepare(buf, width, height, size)?;
    if size == 0 {
        return Ok(());
    }
    let dim = buf.dim() as isize;
    let start = buf.start() as isize;
    let last = height as isize - 1;

    for y in 0..height {
        let first = buf.pixel(0, y as isize);
        let end = buf.pixel(width as isize - 1, y as isize);
        let bit = row_bit(buf, y);
        fill_bits(buf.data_mut(), bit - size, size, first);
        fill_bits(buf.data_mut(), bit + width, size, end);
    }

    let span = (hi - lo) as usize;
    let top_src = (start + lo) as usize;
    let bottom_src = (start + last * dim + lo) as usize;
    for r in 1..=size as isize {
        let top = (start - r * dim + lo) as usize;
        buf.data_mut().copy_within(top_src..top_src + span, top);
        let bottom = (start + (last + r) * dim + lo) as usize;
        buf.data_mut().copy_within(bottom_src..bottom_src + span, bottom);
    }
    Ok(())
}
