//! Brute-force reference operators
//!
//! Every operator here works pixel by pixel through the raster accessors,
//! so it shares no code path with the vector kernels it is compared to.

use crate::error::TestResult;
use rapp_core::{Bitmap, Raster, RasterMut};

/// Apply `f(dst, src)` to every pixel of a `width` x `height` region.
pub fn ref_bitblt(
    dst: &mut RasterMut<'_>,
    src: &Raster<'_>,
    width: usize,
    height: usize,
    f: impl Fn(bool, bool) -> bool,
) {
    for y in 0..height as isize {
        for x in 0..width as isize {
            let value = f(dst.pixel(x, y), src.pixel(x, y));
            dst.set_pixel(x, y, value);
        }
    }
}

/// Erosion with an arbitrary offset set: `dst(p) = AND src(p + o)`.
///
/// Pixels outside the image are read from the margin of `src`, which must
/// be wide enough for the offsets.
pub fn ref_erode(src: &Bitmap, offsets: &[(isize, isize)]) -> TestResult<Bitmap> {
    let mut dst = Bitmap::new(src.width(), src.height())?;
    for y in 0..src.height() {
        for x in 0..src.width() {
            let (px, py) = (x as isize, y as isize);
            let hit = offsets
                .iter()
                .all(|&(dx, dy)| src.get_padded(px + dx, py + dy));
            dst.set(x, y, hit);
        }
    }
    Ok(dst)
}

/// Dilation with an arbitrary offset set: `dst(p) = OR src(p - o)`.
pub fn ref_dilate(src: &Bitmap, offsets: &[(isize, isize)]) -> TestResult<Bitmap> {
    let mut dst = Bitmap::new(src.width(), src.height())?;
    for y in 0..src.height() {
        for x in 0..src.width() {
            let (px, py) = (x as isize, y as isize);
            let hit = offsets
                .iter()
                .any(|&(dx, dy)| src.get_padded(px - dx, py - dy));
            dst.set(x, y, hit);
        }
    }
    Ok(dst)
}

/// Offsets of a `width` x `height` rectangle. Odd sizes are centred; even
/// sizes extend one pixel further right (down).
pub fn rect_offsets(width: usize, height: usize) -> Vec<(isize, isize)> {
    let span = |n: usize| -(((n as isize) - 1) / 2)..=(n as isize) / 2;
    span(height)
        .flat_map(|dy| span(width).map(move |dx| (dx, dy)))
        .collect()
}

/// Offsets of the diamond of radius `radius`: `|dx| + |dy| < radius`.
pub fn diamond_offsets(radius: usize) -> Vec<(isize, isize)> {
    let r = radius as isize - 1;
    (-r..=r)
        .flat_map(|dy| (-r..=r).map(move |dx| (dx, dy)))
        .filter(|&(dx, dy)| dx.abs() + dy.abs() <= r)
        .collect()
}
