//! C ABI
//!
//! Every entry point returns 0 on success or a negative status code, see
//! [`rapp_error`]. Checks run in a fixed order: initialization, buffer
//! overlap, buffer validation, then parameter ranges. Raw arguments are
//! checked before any slice is formed over caller memory, and every slice
//! covers exactly the access window of the operation.
//!
//! The overlap windows are the access windows themselves. For bitblt the
//! destination window is widened to the alignment blocks the kernels write.
//!
//! # Safety
//!
//! Callers must pass buffers that cover the documented access windows.
//! Passing dangling pointers is undefined behavior, as it is for the C
//! library.

use crate::context::Rapp;
use rapp_bitblt::Rop;
use rapp_core::platform::{ALIGNMENT, align, bin_bytes, blocks};
use rapp_core::{Error, Raster, RasterMut, Result, Window, disjoint};
use rapp_morph::{Morph, Shape};
use std::ffi::{CString, c_char, c_int, c_uint, c_void};
use std::sync::OnceLock;
use std::sync::atomic::{AtomicBool, Ordering};

/// Buffer alignment in bytes.
#[allow(non_upper_case_globals)]
#[unsafe(no_mangle)]
pub static rapp_alignment: c_uint = ALIGNMENT as c_uint;

static INITIALIZED: AtomicBool = AtomicBool::new(false);
static CONTEXT: OnceLock<Rapp> = OnceLock::new();

/// Initialize the library. Not thread-safe; call once before any other
/// entry point.
#[unsafe(no_mangle)]
pub extern "C" fn rapp_initialize() {
    CONTEXT.get_or_init(Rapp::new);
    INITIALIZED.store(true, Ordering::Release);
}

/// Mark the library as uninitialized.
#[unsafe(no_mangle)]
pub extern "C" fn rapp_terminate() {
    INITIALIZED.store(false, Ordering::Release);
}

/// Static message for a status code. Never returns NULL.
#[unsafe(no_mangle)]
pub extern "C" fn rapp_error(code: c_int) -> *const c_char {
    static MESSAGES: OnceLock<Vec<CString>> = OnceLock::new();
    let messages = MESSAGES.get_or_init(|| {
        (-10..=1)
            .map(|c| CString::new(rapp_core::error_string(c)).unwrap_or_default())
            .collect()
    });
    // Index 11 holds the message for an unknown code
    let idx = if (-10..=0).contains(&code) { code + 10 } else { 11 };
    messages[idx as usize].as_ptr()
}

fn context() -> Result<&'static Rapp> {
    if !INITIALIZED.load(Ordering::Acquire) {
        return Err(Error::Uninitialized);
    }
    CONTEXT.get().ok_or(Error::Uninitialized)
}

/// Convert a result to a status code, logging rejections.
fn status(name: &str, result: Result<()>) -> c_int {
    match result {
        Ok(()) => 0,
        Err(e) => {
            log::warn!("{name}: {e} ({})", e.code());
            if cfg!(feature = "abort-on-error") {
                std::process::abort();
            }
            e.code()
        }
    }
}

/// Image geometry after the raw checks.
#[derive(Debug, Clone, Copy)]
struct Geometry {
    dim: usize,
    width: usize,
    height: usize,
}

/// Checks of an unaligned buffer, in C order. `width` may include padding.
fn check_noalign(ptr: *const u8, dim: c_int, off: c_int, width: c_int, height: c_int) -> Result<Geometry> {
    if ptr.is_null() {
        return Err(Error::BufNull);
    }
    if dim % ALIGNMENT as c_int != 0 {
        return Err(Error::DimAlign);
    }
    if !(0..8).contains(&off) {
        return Err(Error::BufOffset);
    }
    geometry(dim, width, height)
}

/// Checks of an aligned buffer, in C order.
fn check_aligned(ptr: *const u8, dim: c_int, width: c_int, height: c_int) -> Result<Geometry> {
    if ptr.is_null() {
        return Err(Error::BufNull);
    }
    if ptr as usize % ALIGNMENT != 0 {
        return Err(Error::BufAlign);
    }
    if dim % ALIGNMENT as c_int != 0 {
        return Err(Error::DimAlign);
    }
    geometry(dim, width, height)
}

fn geometry(dim: c_int, width: c_int, height: c_int) -> Result<Geometry> {
    let size = |v: c_int| usize::try_from(v).ok().filter(|&v| v > 0);
    match (usize::try_from(dim), size(width), size(height)) {
        (Ok(dim), Some(width), Some(height)) if bin_bytes(width) <= dim => {
            Ok(Geometry { dim, width, height })
        }
        _ => Err(Error::ImgSize),
    }
}

/// Non-negative geometry for the overlap checks, which run before
/// validation. `None` lets validation report the problem.
fn rows(dims: &[c_int], height: c_int) -> Option<(Vec<usize>, usize)> {
    let dims = dims.iter().map(|&d| usize::try_from(d).ok()).collect::<Option<Vec<_>>>()?;
    let height = usize::try_from(height).ok().filter(|&h| h > 0)?;
    Some((dims, height))
}

/// Byte range `[lo, hi)` around the first pixel of a bitblt destination.
fn bitblt_dst_window(dst: *const u8, dim: usize, off: usize, width: usize, height: usize) -> (isize, isize) {
    let mis = dst as usize % ALIGNMENT;
    let len = (height - 1) * dim + blocks(width, off + 8 * mis) * ALIGNMENT;
    (-(mis as isize), (len - mis) as isize)
}

fn bitblt_src_len(dim: usize, off: usize, width: usize, height: usize) -> usize {
    (height - 1) * dim + bin_bytes(width + off)
}

/// # Safety
///
/// The caller guarantees the window lies inside one allocation.
unsafe fn view_mut<'a>(ptr: *mut u8, dim: usize, lo: isize, hi: isize) -> RasterMut<'a> {
    // SAFETY: the window lies inside the caller buffer
    let data = unsafe { std::slice::from_raw_parts_mut(ptr.offset(lo), (hi - lo) as usize) };
    RasterMut::new(data, dim).at((-lo) as usize)
}

/// # Safety
///
/// The caller guarantees the window lies inside one allocation.
unsafe fn view<'a>(ptr: *const u8, dim: usize, lo: isize, hi: isize) -> Raster<'a> {
    // SAFETY: the window lies inside the caller buffer
    let data = unsafe { std::slice::from_raw_parts(ptr.offset(lo), (hi - lo) as usize) };
    Raster::new(data, dim).at((-lo) as usize)
}

#[allow(clippy::too_many_arguments)]
unsafe fn bitblt(
    rop: Rop,
    dst: *mut u8,
    dst_dim: c_int,
    dst_off: c_int,
    src: *const u8,
    src_dim: c_int,
    src_off: c_int,
    width: c_int,
    height: c_int,
) -> Result<()> {
    let ctx = context()?;

    if let (Some((dims, h)), Ok(w), Ok(doff), Ok(soff)) = (
        rows(&[dst_dim, src_dim], height),
        usize::try_from(width),
        usize::try_from(dst_off),
        usize::try_from(src_off),
    ) && !dst.is_null()
        && !src.is_null()
        && w > 0
    {
        let (lo, hi) = bitblt_dst_window(dst, dims[0], doff, w, h);
        let d = Window::new(dst as usize, dims[0], lo, hi - ((h - 1) * dims[0]) as isize);
        let s = Window::plus(src as usize, dims[1], bin_bytes(w + soff));
        if !disjoint(d, s, h) {
            return Err(Error::Overlap);
        }
    }

    let dg = check_noalign(dst, dst_dim, dst_off, width, height)?;
    let sg = check_noalign(src, src_dim, src_off, width, height)?;
    let (doff, soff) = (dst_off as usize, src_off as usize);

    let (lo, hi) = bitblt_dst_window(dst, dg.dim, doff, dg.width, dg.height);
    // SAFETY: both windows are inside the caller buffers and disjoint
    let mut d = unsafe { view_mut(dst, dg.dim, lo, hi) }.with_offset(doff);
    let s = unsafe { view(src, sg.dim, 0, bitblt_src_len(sg.dim, soff, sg.width, sg.height) as isize) }
        .with_offset(soff);
    rapp_bitblt::bitblt(ctx.table(), rop, &mut d, &s, dg.width, dg.height)
}

macro_rules! bitblt_entry {
    ($($name:ident => $rop:ident),* $(,)?) => {
        $(
            /// Blit with one raster operation.
            ///
            /// # Safety
            ///
            /// `dst` and `src` must cover `height` rows of their row
            /// dimension starting at the first pixel.
            #[unsafe(no_mangle)]
            #[allow(clippy::too_many_arguments)]
            pub unsafe extern "C" fn $name(
                dst: *mut u8,
                dst_dim: c_int,
                dst_off: c_int,
                src: *const u8,
                src_dim: c_int,
                src_off: c_int,
                width: c_int,
                height: c_int,
            ) -> c_int {
                // SAFETY: forwarded caller contract
                let result = unsafe {
                    bitblt(Rop::$rop, dst, dst_dim, dst_off, src, src_dim, src_off, width, height)
                };
                status(stringify!($name), result)
            }
        )*
    };
}

bitblt_entry! {
    rapp_bitblt_copy_bin => Copy,
    rapp_bitblt_not_bin => Not,
    rapp_bitblt_and_bin => And,
    rapp_bitblt_or_bin => Or,
    rapp_bitblt_xor_bin => Xor,
    rapp_bitblt_nand_bin => Nand,
    rapp_bitblt_nor_bin => Nor,
    rapp_bitblt_xnor_bin => Xnor,
    rapp_bitblt_andn_bin => Andn,
    rapp_bitblt_orn_bin => Orn,
    rapp_bitblt_nandn_bin => Nandn,
    rapp_bitblt_norn_bin => Norn,
}

/// Pad arguments after the raw checks.
unsafe fn pad_view<'a>(
    buf: *mut u8,
    dim: c_int,
    off: c_int,
    width: c_int,
    height: c_int,
    size: c_int,
) -> Result<(RasterMut<'a>, usize, usize, usize)> {
    context()?;
    let padded = width.saturating_add(size.saturating_mul(2));
    let g = check_noalign(buf, dim, off, padded, height)?;
    let Ok(width) = usize::try_from(width) else {
        return Err(Error::ImgSize);
    };
    let Ok(size) = usize::try_from(size) else {
        return Err(Error::ParmRange);
    };
    let off = off as usize;
    let (lo, hi) = rapp_core::pad_window(buf as usize, off, g.dim, width, g.height, size);
    // SAFETY: the padding window is inside the caller buffer
    let view = unsafe { view_mut(buf, g.dim, lo, hi) }.with_offset(off);
    Ok((view, width, g.height, size))
}

/// Pad a binary image with a constant value.
///
/// # Safety
///
/// `buf` must cover the image and `size` pixels of padding on every side,
/// widened to alignment boundaries.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn rapp_pad_const_bin(
    buf: *mut u8,
    dim: c_int,
    off: c_int,
    width: c_int,
    height: c_int,
    size: c_int,
    set: c_int,
) -> c_int {
    // SAFETY: forwarded caller contract
    let result = unsafe { pad_view(buf, dim, off, width, height, size) }
        .and_then(|(mut v, w, h, s)| rapp_core::pad_const(&mut v, w, h, s, set != 0));
    status("rapp_pad_const_bin", result)
}

/// Pad a binary image by replicating its edge pixels.
///
/// # Safety
///
/// As for [`rapp_pad_const_bin`].
#[unsafe(no_mangle)]
pub unsafe extern "C" fn rapp_pad_clamp_bin(
    buf: *mut u8,
    dim: c_int,
    off: c_int,
    width: c_int,
    height: c_int,
    size: c_int,
) -> c_int {
    // SAFETY: forwarded caller contract
    let result = unsafe { pad_view(buf, dim, off, width, height, size) }
        .and_then(|(mut v, w, h, s)| rapp_core::pad_clamp(&mut v, w, h, s));
    status("rapp_pad_clamp_bin", result)
}

/// Working buffer size in bytes for morphology, or a negative status code.
#[unsafe(no_mangle)]
pub extern "C" fn rapp_morph_worksize_bin(width: c_int, height: c_int) -> c_int {
    let result = context().and_then(|_| geometry(c_int::MAX, width, height));
    match result {
        Ok(g) => c_int::try_from(rapp_morph::worksize(g.width, g.height)).unwrap_or(c_int::MAX),
        Err(e) => status("rapp_morph_worksize_bin", Err(e)),
    }
}

/// Byte ranges of the morphology buffers: source window around its first
/// pixel, destination length, working buffer length.
fn morph_windows(shape: Shape, sdim: usize, ddim: usize, width: usize, height: usize) -> ((isize, isize), usize, usize) {
    let len = align(bin_bytes(width));
    let (px, py) = shape.min_padding();
    let pad = (py * sdim + px) as isize;
    let last = height - 1;
    let src = (-pad, ((last * sdim + len) as isize) + pad);
    (src, last * ddim + len, rapp_morph::worksize(width, height))
}

#[allow(clippy::too_many_arguments)]
unsafe fn morph(
    op: Morph,
    dst: *mut u8,
    dst_dim: c_int,
    src: *const u8,
    src_dim: c_int,
    width: c_int,
    height: c_int,
    shape: Shape,
    work: *mut c_void,
) -> Result<()> {
    context()?;
    let work = work.cast::<u8>();

    if let (Some((dims, h)), Ok(w)) = (rows(&[dst_dim, src_dim], height), usize::try_from(width))
        && !dst.is_null()
        && !src.is_null()
        && w > 0
    {
        let ((slo, shi), dlen, wlen) = morph_windows(shape, dims[1], dims[0], w, h);
        let s = Window::new(src as usize, dims[1], slo, shi - ((h - 1) * dims[1]) as isize);
        let d = Window::plus(dst as usize, dims[0], dlen - (h - 1) * dims[0]);
        let wk = Window::plus(work as usize, 0, wlen);
        if !disjoint(s, d, h) || (!work.is_null() && (!disjoint(s, wk, h) || !disjoint(d, wk, h))) {
            return Err(Error::Overlap);
        }
    }

    let dg = check_aligned(dst, dst_dim, width, height)?;
    let wide = width.saturating_add(2 * ALIGNMENT as c_int);
    let sg = check_aligned(src, src_dim, wide, height)?;
    if !shape.is_valid() {
        return Err(Error::ParmRange);
    }
    if work.is_null() {
        return Err(Error::ParmNull);
    }

    let (w, h) = (dg.width, dg.height);
    let ((slo, shi), dlen, wlen) = morph_windows(shape, sg.dim, dg.dim, w, h);
    // SAFETY: the windows are inside the caller buffers and pairwise
    // disjoint
    let mut d = unsafe { view_mut(dst, dg.dim, 0, dlen as isize) };
    let s = unsafe { view(src, sg.dim, slo, shi) };
    let work = unsafe { std::slice::from_raw_parts_mut(work, wlen) };
    rapp_morph::morph(op, &mut d, &s, w, h, shape, work)
}

/// Clamp a C size argument into the shape parameter domain; negative
/// values map to zero, which every shape rejects as out of range.
fn side(v: c_int) -> usize {
    usize::try_from(v).unwrap_or(0)
}

macro_rules! morph_rect_entry {
    ($($name:ident => $op:ident),* $(,)?) => {
        $(
            /// Rectangular erosion or dilation.
            ///
            /// # Safety
            ///
            /// `src` must cover its padding window, `dst` the image and
            /// `work` [`rapp_morph_worksize_bin`] bytes.
            #[unsafe(no_mangle)]
            #[allow(clippy::too_many_arguments)]
            pub unsafe extern "C" fn $name(
                dst: *mut u8,
                dst_dim: c_int,
                src: *const u8,
                src_dim: c_int,
                width: c_int,
                height: c_int,
                wrect: c_int,
                hrect: c_int,
                work: *mut c_void,
            ) -> c_int {
                let shape = Shape::Rect { width: side(wrect), height: side(hrect) };
                // SAFETY: forwarded caller contract
                let result = unsafe {
                    morph(Morph::$op, dst, dst_dim, src, src_dim, width, height, shape, work)
                };
                status(stringify!($name), result)
            }
        )*
    };
}

macro_rules! morph_radius_entry {
    ($($name:ident => $op:ident, $shape:ident),* $(,)?) => {
        $(
            /// Isotropic erosion or dilation.
            ///
            /// # Safety
            ///
            /// `src` must cover its padding window, `dst` the image and
            /// `work` [`rapp_morph_worksize_bin`] bytes.
            #[unsafe(no_mangle)]
            #[allow(clippy::too_many_arguments)]
            pub unsafe extern "C" fn $name(
                dst: *mut u8,
                dst_dim: c_int,
                src: *const u8,
                src_dim: c_int,
                width: c_int,
                height: c_int,
                radius: c_int,
                work: *mut c_void,
            ) -> c_int {
                let shape = Shape::$shape(side(radius));
                // SAFETY: forwarded caller contract
                let result = unsafe {
                    morph(Morph::$op, dst, dst_dim, src, src_dim, width, height, shape, work)
                };
                status(stringify!($name), result)
            }
        )*
    };
}

morph_rect_entry! {
    rapp_morph_erode_rect_bin => Erode,
    rapp_morph_dilate_rect_bin => Dilate,
}

morph_radius_entry! {
    rapp_morph_erode_diamond_bin => Erode, Diamond,
    rapp_morph_dilate_diamond_bin => Dilate, Diamond,
    rapp_morph_erode_octagon_bin => Erode, Octagon,
    rapp_morph_dilate_octagon_bin => Dilate, Octagon,
    rapp_morph_erode_disc_bin => Erode, Disc,
    rapp_morph_dilate_disc_bin => Dilate, Disc,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::ffi::CStr;

    #[test]
    fn test_error_strings() {
        let msg = |code| unsafe { CStr::from_ptr(rapp_error(code)) }.to_str().unwrap().to_owned();
        assert_eq!(msg(0), "No error");
        assert_eq!(msg(-9), "Buffer parameters overlap");
        assert_eq!(msg(-1), "Pixel buffer pointer is NULL");
        assert_eq!(msg(5), "Invalid error code");
        assert_eq!(msg(-11), "Invalid error code");
    }

    #[test]
    fn test_raw_checks() {
        let buf = rapp_core::AlignedBuf::new(64);
        let p = buf.as_slice().as_ptr();
        assert_eq!(check_noalign(std::ptr::null(), 16, 0, 8, 1).err(), Some(Error::BufNull));
        assert_eq!(check_noalign(p, 17, 0, 8, 1).err(), Some(Error::DimAlign));
        assert_eq!(check_noalign(p, 16, 8, 8, 1).err(), Some(Error::BufOffset));
        assert_eq!(check_noalign(p, 16, -1, 8, 1).err(), Some(Error::BufOffset));
        assert_eq!(check_noalign(p, 16, 0, 0, 1).err(), Some(Error::ImgSize));
        assert_eq!(check_noalign(p, -16, 0, 8, 1).err(), Some(Error::ImgSize));
        assert_eq!(check_aligned(p.wrapping_add(1), 16, 8, 1).err(), Some(Error::BufAlign));
        assert!(check_aligned(p, 16, 128, 2).is_ok());
    }

    #[test]
    fn test_bitblt_window_covers_blocks() {
        let buf = rapp_core::AlignedBuf::new(64);
        let p = buf.as_slice().as_ptr().wrapping_add(3);
        let (lo, hi) = bitblt_dst_window(p, 32, 5, 99, 2);
        assert_eq!(lo, -3);
        // 24 + 5 + 99 bits fill one block; two rows
        assert_eq!(hi, 32 + 16 - 3);
    }
}
