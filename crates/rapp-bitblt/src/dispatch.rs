//! Bitblt driver
//!
//! A blit is validated, normalized so that both buffers start on an
//! alignment boundary with a block-relative bit offset, optionally
//! collapsed into a single row, classified, and handed to the tier the
//! variant table selects for that class.
//!
//! Destination rows are written in whole alignment blocks, so bytes between
//! the image and the enclosing alignment boundaries of the first and last
//! block of every row may be overwritten. The source is never read outside
//! its slice; missing bytes read as zero.
//!
//! # Misaligned blits
//!
//! With `align = src_off - dst_off`:
//!
//! - `align > 0`: the source lags the destination. If the source row spans
//!   more blocks than the destination row, one call covers everything.
//!   Otherwise all rows but the last go in one call, the last row minus its
//!   last block in a second, and the last block is blitted from a copy of
//!   the last source block held in a local two-block buffer.
//! - `align < 0`: the first destination block needs source bytes before
//!   the source start. That block is blitted from a local buffer holding
//!   the first source block after a zero block, then the rest of row 0,
//!   then all remaining rows.
//!
//! # See also
//!
//! `rapp_bitblt.c` (`rapp_bitblt_driver`, `rapp_bitblt_misaligned`)

use crate::align::AlignClass;
use crate::kernel::{Rows, RowsMut, Tier};
use crate::rop::Rop;
use crate::table::VariantTable;
use rapp_core::platform::{ALIGNMENT, BLOCK_BITS, align, bin_bytes, blocks};
use rapp_core::vector::load_clipped;
use rapp_core::{Raster, RasterMut, Result, Vector, Wide};

/// Two alignment blocks on an alignment boundary.
#[repr(C, align(16))]
struct Block([u8; 2 * ALIGNMENT]);

const _: () = assert!(std::mem::align_of::<Block>() == ALIGNMENT);

/// Blit `src` onto `dst` with raster operation `rop`.
///
/// # Arguments
///
/// * `table` - Kernel selection
/// * `rop` - Raster operation
/// * `dst` - Destination view; start and bit offset are arbitrary
/// * `src` - Source view; start and bit offset are arbitrary
/// * `width`, `height` - Region size in pixels
///
/// # Errors
///
/// The destination is validated before the source. `BufSize` is returned
/// when the destination slice does not cover every block the kernels
/// write, or the source slice does not cover the source image.
pub fn bitblt(
    table: &VariantTable,
    rop: Rop,
    dst: &mut RasterMut<'_>,
    src: &Raster<'_>,
    width: usize,
    height: usize,
) -> Result<()> {
    dst.validate_noalign_bin(width, height)?;
    src.validate_noalign_bin(width, height)?;

    // Block-relative bit offsets
    let dst_mis = dst.addr() % ALIGNMENT;
    let src_mis = src.addr() % ALIGNMENT;
    let dst_off = dst.offset() + 8 * dst_mis;
    let src_off = src.offset() + 8 * src_mis;
    let mut dst_len = blocks(width, dst_off);

    let (ddim, sdim) = (dst.dim(), src.dim());
    let last_row = (height - 1) * ddim + dst_len * ALIGNMENT;
    dst.check_window(-(dst_mis as isize), (last_row - dst_mis) as isize)?;
    src.check_window(0, ((height - 1) * sdim + bin_bytes(width + src.offset())) as isize)?;

    let (mut width, mut height) = (width, height);
    if ddim == sdim && dst_len == ddim / ALIGNMENT {
        // Rows are contiguous: blit as one long row
        width += BLOCK_BITS * dst_len * (height - 1);
        dst_len *= height;
        height = 1;
    }

    let align = src_off as isize - dst_off as isize;
    let class = AlignClass::of_delta(align);
    let tier = table.variant(rop, class);
    log::trace!("bitblt {rop}: class={class} tier={tier} align={align} blocks={dst_len} rows={height}");

    let start = dst.start() - dst_mis;
    let mut d = RowsMut {
        data: dst.data_mut(),
        pos: start,
        dim: ddim,
    };
    let s = Rows {
        data: src.data(),
        pos: src.start() as isize - src_mis as isize,
        dim: sdim,
    };

    if class == AlignClass::Vector {
        tier.run(rop, &mut d, s, BLOCK_BITS * dst_len, height, 0);
    } else {
        let src_len = blocks(width, src_off);
        misaligned(tier, rop, &mut d, s, dst_len, src_len, height, align);
    }
    Ok(())
}

#[allow(clippy::too_many_arguments)]
fn misaligned(
    tier: Tier,
    rop: Rop,
    dst: &mut RowsMut<'_>,
    src: Rows<'_>,
    dst_len: usize,
    src_len: usize,
    height: usize,
    align: isize,
) {
    let mut buf = Block([0; 2 * ALIGNMENT]);
    let (ddim, sdim) = (dst.dim, src.dim);
    let last = height - 1;

    if align > 0 {
        let (bytes, bits) = (align / 8, (align % 8) as usize);
        let src = src.advance(bytes);
        if src_len > dst_len {
            tier.run(rop, dst, src, BLOCK_BITS * dst_len, height, bits);
            return;
        }
        if height > 1 {
            tier.run(rop, dst, src, BLOCK_BITS * dst_len, last, bits);
        }
        let src_last = src.advance((last * sdim) as isize);
        tier.run(rop, &mut dst.advance(last * ddim), src_last, BLOCK_BITS * (dst_len - 1), 1, bits);

        let tail = (last * sdim + (dst_len - 1) * ALIGNMENT) as isize;
        load_clipped::<Wide>(src.data, src.pos - bytes + tail).store(&mut buf.0[..ALIGNMENT]);
        let local = Rows {
            data: &buf.0,
            pos: bytes,
            dim: 0,
        };
        let at = last * ddim + (dst_len - 1) * ALIGNMENT;
        tier.run(rop, &mut dst.advance(at), local, BLOCK_BITS, 1, bits);
    } else {
        let align = align + BLOCK_BITS as isize;
        let (bytes, bits) = (align / 8, (align % 8) as usize);

        load_clipped::<Wide>(src.data, src.pos).store(&mut buf.0[ALIGNMENT..]);
        let local = Rows {
            data: &buf.0,
            pos: bytes,
            dim: 0,
        };
        tier.run(rop, dst, local, BLOCK_BITS, 1, bits);

        let src = src.advance(bytes);
        tier.run(rop, &mut dst.advance(ALIGNMENT), src, BLOCK_BITS * (dst_len - 1), 1, bits);
        if height > 1 {
            let next = src.advance(sdim as isize - ALIGNMENT as isize);
            tier.run(rop, &mut dst.advance(ddim), next, BLOCK_BITS * dst_len, last, bits);
        }
    }
}

/// Copy between two aligned binary buffers with the vector-aligned kernel.
///
/// Whole blocks are copied, so `dst` bytes up to the next alignment
/// boundary after each row are overwritten.
pub fn copy_aligned(
    dst: &mut RasterMut<'_>,
    src: &Raster<'_>,
    width: usize,
    height: usize,
) -> Result<()> {
    dst.validate_bin(width, height)?;
    src.validate_bin(width, height)?;
    let len = align(bin_bytes(width));
    dst.check_window(0, ((height - 1) * dst.dim() + len) as isize)?;
    src.check_window(0, ((height - 1) * src.dim() + len) as isize)?;

    let (pos, dim) = (dst.start(), dst.dim());
    let mut d = RowsMut {
        data: dst.data_mut(),
        pos,
        dim,
    };
    let s = Rows {
        data: src.data(),
        pos: src.start() as isize,
        dim: src.dim(),
    };
    Tier::VectorAligned.run(Rop::Copy, &mut d, s, 8 * len, height, 0);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rapp_core::{Bitmap, Error};

    fn pattern(width: usize, height: usize, margin: usize) -> Bitmap {
        let mut bmp = Bitmap::with_margin(width, height, margin).unwrap();
        for y in 0..height {
            for x in 0..width {
                bmp.set(x, y, (x * 7 + y * 3) % 5 < 2);
            }
        }
        bmp
    }

    #[test]
    fn test_every_class_matches_reference() {
        let table = VariantTable::default();
        let src = pattern(200, 4, 8);
        // dst x offsets hitting vector, word, byte and bit alignment
        for dx in [0, 64, 8, 3, 77] {
            let mut dst = Bitmap::with_margin(200 + dx, 4, 8).unwrap();
            let mut view = dst.view_at_mut(dx, 0);
            bitblt(&table, Rop::Copy, &mut view, &src.raster(), 200, 4).unwrap();
            for y in 0..4 {
                for x in 0..200 {
                    assert_eq!(dst.get(dx + x, y), src.get(x, y), "dx={dx} ({x},{y})");
                }
            }
        }
    }

    #[test]
    fn test_source_lags_destination() {
        let table = VariantTable::default();
        for sx in [5, 16, 64, 100] {
            let src = pattern(300, 3, 8);
            let mut dst = Bitmap::with_margin(120, 3, 8).unwrap();
            dst.fill(true);
            let s = src.view_at(sx, 0);
            bitblt(&table, Rop::And, &mut dst.raster_mut(), &s, 120, 3).unwrap();
            for y in 0..3 {
                for x in 0..120 {
                    assert_eq!(dst.get(x, y), src.get(sx + x, y), "sx={sx} ({x},{y})");
                }
            }
        }
    }

    #[test]
    fn test_validation_order() {
        let table = VariantTable::default();
        let src = pattern(16, 2, 0);
        let mut dst = Bitmap::new(16, 2).unwrap();
        let mut view = dst.raster_mut().with_offset(8);
        assert_eq!(
            bitblt(&table, Rop::Copy, &mut view, &src.raster().with_offset(9), 16, 0),
            Err(Error::BufOffset)
        );
        let mut view = dst.raster_mut();
        assert_eq!(
            bitblt(&table, Rop::Copy, &mut view, &src.raster().with_offset(9), 16, 2),
            Err(Error::BufOffset)
        );
        assert_eq!(
            bitblt(&table, Rop::Copy, &mut view, &src.raster(), 0, 2),
            Err(Error::ImgSize)
        );
    }

    #[test]
    fn test_short_destination_slice() {
        let table = VariantTable::default();
        let src = pattern(16, 1, 0);
        let mut data = [0u8; 4];
        let mut view = RasterMut::new(&mut data, 16);
        assert_eq!(
            bitblt(&table, Rop::Copy, &mut view, &src.raster(), 16, 1),
            Err(Error::BufSize)
        );
    }

    #[test]
    fn test_copy_aligned() {
        let src = pattern(40, 3, 0);
        let mut dst = Bitmap::new(40, 3).unwrap();
        copy_aligned(&mut dst.raster_mut(), &src.raster(), 40, 3).unwrap();
        assert!(dst.same_pixels(&src));
        let mut view = dst.view_at_mut(8, 0);
        assert_eq!(
            copy_aligned(&mut view, &src.raster(), 8, 1),
            Err(Error::BufAlign)
        );
    }
}
