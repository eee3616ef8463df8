//! Binary raster views
//!
//! A raster view describes a 1-bit-per-pixel image stored inside a caller
//! byte slice: the index of the byte holding the first pixel (`start`), the
//! row stride in bytes (`dim`) and the bit offset of the first pixel within
//! that byte (`offset`, 0..=7). Pixel `x` of a row lives in bit
//! `(offset + x) % 8` of byte `(offset + x) / 8`, least significant bit
//! first.
//!
//! The slice may extend before `start` (left and top padding) and after the
//! last row. Alignment is judged on the absolute address of `start`.
//!
//! # Validation order
//!
//! Checks run in the same order as the C entry points so that the first
//! failing precondition decides the error code:
//!
//! - aligned buffers: empty slice, start alignment, `dim` alignment, size
//! - unaligned buffers: empty slice, `dim` alignment, bit offset, size
//!
//! A final [`Error::BufSize`] check makes sure the access window of the
//! operation lies inside the slice.

use crate::error::{Error, Result};
use crate::platform::{ALIGNMENT, bin_bytes, is_aligned};

/// Immutable binary raster view.
#[derive(Debug, Clone, Copy)]
pub struct Raster<'a> {
    data: &'a [u8],
    start: usize,
    dim: usize,
    offset: usize,
}

/// Mutable binary raster view.
#[derive(Debug)]
pub struct RasterMut<'a> {
    data: &'a mut [u8],
    start: usize,
    dim: usize,
    offset: usize,
}

fn check_size(dim: usize, width: usize, height: usize) -> Result<()> {
    if width == 0 || height == 0 || bin_bytes(width) > dim {
        return Err(Error::ImgSize);
    }
    Ok(())
}

fn check_aligned(len: usize, addr: usize, dim: usize, offset: usize) -> Result<()> {
    if len == 0 {
        return Err(Error::BufNull);
    }
    if addr % ALIGNMENT != 0 {
        return Err(Error::BufAlign);
    }
    if !is_aligned(dim) {
        return Err(Error::DimAlign);
    }
    if offset != 0 {
        return Err(Error::BufOffset);
    }
    Ok(())
}

fn check_unaligned(len: usize, dim: usize, offset: usize) -> Result<()> {
    if len == 0 {
        return Err(Error::BufNull);
    }
    if !is_aligned(dim) {
        return Err(Error::DimAlign);
    }
    if offset > 7 {
        return Err(Error::BufOffset);
    }
    Ok(())
}

fn check_window(len: usize, start: usize, lo: isize, hi: isize) -> Result<()> {
    let first = start as isize + lo;
    let end = start as isize + hi;
    if first < 0 || end > len as isize || first > end {
        return Err(Error::BufSize);
    }
    Ok(())
}

macro_rules! raster_common {
    ($ty:ident) => {
        impl<'a> $ty<'a> {
            /// Index of the byte holding the first pixel.
            pub fn start(&self) -> usize {
                self.start
            }

            /// Row stride in bytes.
            pub fn dim(&self) -> usize {
                self.dim
            }

            /// Bit offset of the first pixel.
            pub fn offset(&self) -> usize {
                self.offset
            }

            /// Absolute address of the first pixel byte.
            pub fn addr(&self) -> usize {
                self.data.as_ptr() as usize + self.start
            }

            /// Validate as an aligned binary buffer of `width` x `height`.
            pub fn validate_bin(&self, width: usize, height: usize) -> Result<()> {
                check_aligned(self.data.len(), self.addr(), self.dim, self.offset)?;
                check_size(self.dim, width, height)
            }

            /// Validate as an unaligned binary buffer of `width` x `height`.
            pub fn validate_noalign_bin(&self, width: usize, height: usize) -> Result<()> {
                check_unaligned(self.data.len(), self.dim, self.offset)?;
                check_size(self.dim, width, height)
            }

            /// Check that bytes `start + lo .. start + hi` lie inside the
            /// slice.
            pub fn check_window(&self, lo: isize, hi: isize) -> Result<()> {
                check_window(self.data.len(), self.start, lo, hi)
            }

            /// Read pixel `(x, y)` relative to the first pixel. Negative
            /// coordinates address the padding.
            pub fn pixel(&self, x: isize, y: isize) -> bool {
                let bit = self.offset as isize + x;
                let idx = self.start as isize + y * self.dim as isize + bit.div_euclid(8);
                (self.data[idx as usize] >> bit.rem_euclid(8)) & 1 == 1
            }
        }
    };
}

raster_common!(Raster);
raster_common!(RasterMut);

impl<'a> Raster<'a> {
    /// View over `data` with the first pixel at byte 0, bit 0.
    pub fn new(data: &'a [u8], dim: usize) -> Self {
        Raster {
            data,
            start: 0,
            dim,
            offset: 0,
        }
    }

    /// Move the first pixel to byte `start`.
    pub fn at(self, start: usize) -> Self {
        Raster { start, ..self }
    }

    /// Set the bit offset of the first pixel.
    pub fn with_offset(self, offset: usize) -> Self {
        Raster { offset, ..self }
    }

    /// Underlying slice.
    pub fn data(&self) -> &'a [u8] {
        self.data
    }

    /// View whose first pixel is pixel `(x, y)` of this one.
    pub fn sub(self, x: usize, y: usize) -> Self {
        let bit = self.offset + x;
        Raster {
            start: self.start + y * self.dim + bit / 8,
            offset: bit % 8,
            ..self
        }
    }
}

impl<'a> RasterMut<'a> {
    /// View over `data` with the first pixel at byte 0, bit 0.
    pub fn new(data: &'a mut [u8], dim: usize) -> Self {
        RasterMut {
            data,
            start: 0,
            dim,
            offset: 0,
        }
    }

    /// Move the first pixel to byte `start`.
    pub fn at(self, start: usize) -> Self {
        RasterMut { start, ..self }
    }

    /// Set the bit offset of the first pixel.
    pub fn with_offset(self, offset: usize) -> Self {
        RasterMut { offset, ..self }
    }

    /// Underlying slice.
    pub fn data(&self) -> &[u8] {
        &*self.data
    }

    /// Underlying slice, mutable.
    pub fn data_mut(&mut self) -> &mut [u8] {
        &mut *self.data
    }

    /// Shorter-lived mutable view of the same pixels.
    pub fn reborrow(&mut self) -> RasterMut<'_> {
        RasterMut {
            data: &mut *self.data,
            start: self.start,
            dim: self.dim,
            offset: self.offset,
        }
    }

    /// Immutable view of the same pixels.
    pub fn as_raster(&self) -> Raster<'_> {
        Raster {
            data: &*self.data,
            start: self.start,
            dim: self.dim,
            offset: self.offset,
        }
    }

    /// View whose first pixel is pixel `(x, y)` of this one.
    pub fn sub(self, x: usize, y: usize) -> Self {
        let bit = self.offset + x;
        RasterMut {
            start: self.start + y * self.dim + bit / 8,
            offset: bit % 8,
            ..self
        }
    }

    /// Write pixel `(x, y)` relative to the first pixel. Negative
    /// coordinates address the padding.
    pub fn set_pixel(&mut self, x: isize, y: isize, value: bool) {
        let bit = self.offset as isize + x;
        let idx = (self.start as isize + y * self.dim as isize + bit.div_euclid(8)) as usize;
        let mask = 1u8 << bit.rem_euclid(8);
        if value {
            self.data[idx] |= mask;
        } else {
            self.data[idx] &= !mask;
        }
    }
}
