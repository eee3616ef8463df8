//! Owned binary images
//!
//! [`Bitmap`] stores a 1-bit-per-pixel image in an aligned buffer with an
//! optional margin of padding pixels on every side. The first image pixel
//! always sits at bit 0 of an aligned byte, and the row dimension is a
//! multiple of the alignment, so a bitmap view satisfies every aligned
//! entry point.
//!
//! The horizontal margin is rounded up to whole alignment blocks; the
//! vertical margin is exactly `margin` rows.

use crate::buffer::AlignedBuf;
use crate::error::{Error, Result};
use crate::platform::{align, bin_bytes};
use crate::raster::{Raster, RasterMut};
use crate::vector::{Wide, popcount};
use std::fmt;

/// Binary image with padding margins.
#[derive(Debug, Clone)]
pub struct Bitmap {
    buf: AlignedBuf,
    width: usize,
    height: usize,
    dim: usize,
    margin: usize,
    xpad: usize,
}

impl Bitmap {
    /// Create a cleared bitmap without margins.
    pub fn new(width: usize, height: usize) -> Result<Self> {
        Self::with_margin(width, height, 0)
    }

    /// Create a cleared bitmap with `margin` padding pixels on every side.
    pub fn with_margin(width: usize, height: usize, margin: usize) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(Error::ImgSize);
        }
        let xpad = align(bin_bytes(margin));
        let dim = align(bin_bytes(width)) + 2 * xpad;
        let buf = AlignedBuf::new(dim * (height + 2 * margin));
        Ok(Bitmap {
            buf,
            width,
            height,
            dim,
            margin,
            xpad,
        })
    }

    /// Build a bitmap from text rows; `'1'`, `'x'` and `'#'` are set pixels.
    pub fn from_rows(rows: &[&str], margin: usize) -> Result<Self> {
        let width = rows.iter().map(|r| r.chars().count()).max().unwrap_or(0);
        let mut bmp = Self::with_margin(width, rows.len(), margin)?;
        for (y, row) in rows.iter().enumerate() {
            for (x, c) in row.chars().enumerate() {
                bmp.set(x, y, matches!(c, '1' | 'x' | '#'));
            }
        }
        Ok(bmp)
    }

    /// Image width in pixels.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Image height in pixels.
    pub fn height(&self) -> usize {
        self.height
    }

    /// Row dimension in bytes.
    pub fn dim(&self) -> usize {
        self.dim
    }

    /// Vertical margin in rows.
    pub fn margin(&self) -> usize {
        self.margin
    }

    /// Byte index of the first image pixel.
    pub fn origin(&self) -> usize {
        self.margin * self.dim + self.xpad
    }

    fn bit_index(&self, x: isize, y: isize) -> (usize, u8) {
        let row = (self.origin() as isize + y * self.dim as isize) as usize;
        let byte = (row as isize + x.div_euclid(8)) as usize;
        (byte, 1 << x.rem_euclid(8))
    }

    /// Read pixel `(x, y)`.
    pub fn get(&self, x: usize, y: usize) -> bool {
        self.get_padded(x as isize, y as isize)
    }

    /// Write pixel `(x, y)`.
    pub fn set(&mut self, x: usize, y: usize, value: bool) {
        self.set_padded(x as isize, y as isize, value)
    }

    /// Read a pixel that may lie in the margin.
    pub fn get_padded(&self, x: isize, y: isize) -> bool {
        let (byte, mask) = self.bit_index(x, y);
        self.buf.as_slice()[byte] & mask != 0
    }

    /// Write a pixel that may lie in the margin.
    pub fn set_padded(&mut self, x: isize, y: isize, value: bool) {
        let (byte, mask) = self.bit_index(x, y);
        let data = self.buf.as_mut_slice();
        if value {
            data[byte] |= mask;
        } else {
            data[byte] &= !mask;
        }
    }

    /// Set every byte of the buffer, margins included.
    pub fn fill(&mut self, value: bool) {
        self.buf.as_mut_slice().fill(if value { 0xff } else { 0 });
    }

    /// Set every margin pixel to `value`, leaving the image untouched.
    pub fn fill_margin(&mut self, value: bool) {
        let xpix = 8 * self.xpad as isize;
        let right = 8 * (self.dim - self.xpad) as isize;
        let (w, h, m) = (self.width as isize, self.height as isize, self.margin as isize);
        for y in -m..h + m {
            for x in -xpix..right {
                if !(0..w).contains(&x) || !(0..h).contains(&y) {
                    self.set_padded(x, y, value);
                }
            }
        }
    }

    /// Horizontal margin in pixels.
    pub fn xmargin(&self) -> usize {
        8 * self.xpad
    }

    /// Whole buffer, margins included.
    pub fn data(&self) -> &[u8] {
        self.buf.as_slice()
    }

    /// Whole buffer, margins included, mutable.
    pub fn data_mut(&mut self) -> &mut [u8] {
        self.buf.as_mut_slice()
    }

    /// Aligned view of the image.
    pub fn raster(&self) -> Raster<'_> {
        let origin = self.origin();
        Raster::new(self.buf.as_slice(), self.dim).at(origin)
    }

    /// Aligned mutable view of the image.
    pub fn raster_mut(&mut self) -> RasterMut<'_> {
        let origin = self.origin();
        RasterMut::new(self.buf.as_mut_slice(), self.dim).at(origin)
    }

    /// View whose first pixel is `(x, y)`.
    pub fn view_at(&self, x: usize, y: usize) -> Raster<'_> {
        self.raster().sub(x, y)
    }

    /// Mutable view whose first pixel is `(x, y)`.
    pub fn view_at_mut(&mut self, x: usize, y: usize) -> RasterMut<'_> {
        self.raster_mut().sub(x, y)
    }

    /// Number of set image pixels.
    pub fn count(&self) -> u64 {
        let full = self.width / 8;
        let rem = self.width % 8;
        let data = self.buf.as_slice();
        let mut total = 0;
        for y in 0..self.height {
            let row = self.origin() + y * self.dim;
            total += popcount::<Wide>(&data[row..row + full]);
            if rem != 0 {
                let tail = data[row + full] & ((1u8 << rem) - 1);
                total += tail.count_ones() as u64;
            }
        }
        total
    }

    /// Whether both bitmaps have the same size and image pixels. Margins are
    /// ignored.
    pub fn same_pixels(&self, other: &Bitmap) -> bool {
        self.first_difference(other).is_none()
    }

    /// First image pixel where the bitmaps differ, scanning rows top-down.
    /// Bitmaps of different size differ at `(0, 0)`.
    pub fn first_difference(&self, other: &Bitmap) -> Option<(usize, usize)> {
        if self.width != other.width || self.height != other.height {
            return Some((0, 0));
        }
        for y in 0..self.height {
            for x in 0..self.width {
                if self.get(x, y) != other.get(x, y) {
                    return Some((x, y));
                }
            }
        }
        None
    }
}

impl fmt::Display for Bitmap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for y in 0..self.height {
            for x in 0..self.width {
                f.write_str(if self.get(x, y) { "1" } else { "." })?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
