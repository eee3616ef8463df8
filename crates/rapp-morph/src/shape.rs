//! Structuring elements and the morphology entry point
//!
//! A [`Shape`] names a structuring element. [`plan`] decides how a shape is
//! applied:
//!
//! - 1x1 rectangles are a plain copy
//! - 2x2 squares run one direct kernel
//! - 1xN and Nx1 rectangles run a single line sequence
//! - other rectangles run a horizontal then a vertical line sequence
//! - diamonds, octagons and discs run one isotropic sequence
//!
//! Even rectangle sides place the anchor left of (above) the centre: a
//! side of size `n` covers offsets `-(n-1)/2 ..= n/2`.
//!
//! # See also
//!
//! `rapp_morph_bin.c` (`rapp_morph_rect_template`,
//! `rapp_morph_isotropic_template`)

use crate::atom::{Family, Offset, minkowski};
use crate::engine::{Frame, Input, Output, Temp};
use crate::kernel::{self, Morph, SQUARE_2X2};
use crate::scratch::{Layout, worksize};
use crate::tables::{MAX_RADIUS, MAX_SIDE, MIN_RADIUS, Sequence};
use rapp_core::platform::{ALIGNMENT, align, bin_bytes};
use rapp_core::{Error, Raster, RasterMut, Result};
use std::collections::BTreeSet;
use std::fmt;

/// Structuring element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Shape {
    /// Rectangle, each side 1..=63
    Rect { width: usize, height: usize },
    /// Diamond `|dx| + |dy| < radius`, radius 2..=32
    Diamond(usize),
    /// Octagon of side `2 * radius - 1`, radius 2..=32
    Octagon(usize),
    /// Disc of side `2 * radius - 1`, radius 2..=32
    Disc(usize),
}

impl Shape {
    /// Whether the size parameters are in range.
    pub fn is_valid(&self) -> bool {
        let side = 1..=MAX_SIDE;
        match *self {
            Shape::Rect { width, height } => side.contains(&width) && side.contains(&height),
            Shape::Diamond(r) | Shape::Octagon(r) | Shape::Disc(r) => {
                (MIN_RADIUS..=MAX_RADIUS).contains(&r)
            }
        }
    }

    /// Padding the source must provide, as (bytes left and right, rows
    /// above and below).
    pub fn min_padding(&self) -> (usize, usize) {
        let (x, y) = match *self {
            Shape::Rect { width, height } => ((width + 1) / 2, (height + 1) / 2),
            Shape::Diamond(r) | Shape::Octagon(r) | Shape::Disc(r) => (r, r),
        };
        let x = x.min(16);
        (align(x.div_ceil(8)), y.min(16))
    }
}

impl fmt::Display for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Shape::Rect { width, height } => write!(f, "rect {width}x{height}"),
            Shape::Diamond(r) => write!(f, "diamond r={r}"),
            Shape::Octagon(r) => write!(f, "octagon r={r}"),
            Shape::Disc(r) => write!(f, "disc r={r}"),
        }
    }
}

/// How a shape is applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Plan {
    /// Copy the source
    Copy,
    /// One 2x2 kernel
    Square,
    /// One atom sequence
    Single(Sequence),
    /// Horizontal sequence, then vertical sequence
    Separable { horz: Sequence, vert: Sequence },
}

/// Decomposition plan of `shape`.
pub fn plan(shape: Shape) -> Result<Plan> {
    if !shape.is_valid() {
        return Err(Error::ParmRange);
    }
    let plan = match shape {
        Shape::Rect { width: 1, height: 1 } => Plan::Copy,
        Shape::Rect { width: 2, height: 2 } => Plan::Square,
        Shape::Rect { width, height: 1 } => {
            Plan::Single(Sequence::line(Family::Horizontal, width))
        }
        Shape::Rect { width: 1, height } => Plan::Single(Sequence::line(Family::Vertical, height)),
        Shape::Rect { width, height } => Plan::Separable {
            horz: Sequence::line(Family::Horizontal, width),
            vert: Sequence::line(Family::Vertical, height),
        },
        Shape::Diamond(r) => Plan::Single(Sequence::diamond(r)),
        Shape::Octagon(r) => Plan::Single(Sequence::octagon(r)),
        Shape::Disc(r) => Plan::Single(Sequence::disc(r)),
    };
    Ok(plan)
}

fn composed(seq: &Sequence) -> BTreeSet<Offset> {
    let atoms = seq.family().atoms();
    seq.steps()
        .iter()
        .fold(BTreeSet::from([(0, 0)]), |acc, &idx| {
            let full = atoms[idx as usize].full().iter().copied().collect();
            minkowski(&acc, &full)
        })
}

/// Offsets covered by `shape`, sorted by `(dx, dy)`.
///
/// This is the composition of the full atoms of its plan, so it is the
/// footprint the decomposition actually implements.
pub fn footprint(shape: Shape) -> Result<Vec<Offset>> {
    let set = match plan(shape)? {
        Plan::Copy => BTreeSet::from([(0, 0)]),
        Plan::Square => SQUARE_2X2.into_iter().collect(),
        Plan::Single(seq) => composed(&seq),
        Plan::Separable { horz, vert } => minkowski(&composed(&horz), &composed(&vert)),
    };
    Ok(set.into_iter().collect())
}

/// Erode or dilate a binary image.
///
/// # Arguments
///
/// * `dst` - Aligned destination view
/// * `src` - Aligned source view; the slice must hold the padding given by
///   [`Shape::min_padding`] and the caller must have padded it
/// * `width`, `height` - Image size in pixels
/// * `shape` - Structuring element
/// * `work` - Aligned working buffer of at least [`worksize`] bytes
///
/// # Errors
///
/// Buffer errors as for every aligned entry point (destination first, then
/// the source, whose row must hold `width + 2 * ALIGNMENT` pixels),
/// then [`Error::ParmRange`] for an out-of-range shape, [`Error::ParmNull`]
/// for an empty working buffer, [`Error::BufAlign`] or [`Error::BufSize`]
/// for a misplaced or short working buffer, and [`Error::BufSize`] when a
/// view slice is shorter than the access window.
pub fn morph(
    op: Morph,
    dst: &mut RasterMut<'_>,
    src: &Raster<'_>,
    width: usize,
    height: usize,
    shape: Shape,
    work: &mut [u8],
) -> Result<()> {
    dst.validate_bin(width, height)?;
    src.validate_bin(width + 2 * ALIGNMENT, height)?;
    let plan = plan(shape)?;
    if work.is_empty() {
        return Err(Error::ParmNull);
    }
    if work.as_ptr() as usize % ALIGNMENT != 0 {
        return Err(Error::BufAlign);
    }
    if work.len() < worksize(width, height) {
        return Err(Error::BufSize);
    }

    let len = align(bin_bytes(width)) as isize;
    let last = height as isize - 1;
    dst.check_window(0, last * dst.dim() as isize + len)?;
    let (px, py) = shape.min_padding();
    let (px, py) = (px as isize, py as isize);
    let sdim = src.dim() as isize;
    src.check_window(-(py * sdim + px), (last + py) * sdim + len + px)?;

    log::trace!("{op} {shape} on {width}x{height}: {plan:?}");
    match plan {
        Plan::Copy => rapp_bitblt::copy_aligned(dst, src, width, height),
        Plan::Square => {
            kernel::apply(op, &SQUARE_2X2, dst, src, width, height);
            Ok(())
        }
        Plan::Single(seq) => {
            let mut frame = Frame {
                src: *src,
                dst,
                work,
                layout: Layout::new(width, height),
                width,
                height,
            };
            frame.run(op, &seq, Input::Src, Output::Dst, [Temp::Tmp1, Temp::Tmp2])
        }
        Plan::Separable { horz, vert } => {
            let mut frame = Frame {
                src: *src,
                dst,
                work,
                layout: Layout::new(width, height),
                width,
                height,
            };
            frame.separable(op, &horz, &vert)
        }
    }
}

macro_rules! shape_wrappers {
    ($($(#[$meta:meta])* $name:ident => $op:ident, $shape:ident;)*) => {
        $(
            $(#[$meta])*
            pub fn $name(
                dst: &mut RasterMut<'_>,
                src: &Raster<'_>,
                width: usize,
                height: usize,
                radius: usize,
                work: &mut [u8],
            ) -> Result<()> {
                morph(Morph::$op, dst, src, width, height, Shape::$shape(radius), work)
            }
        )*
    };
}

/// Erode with a `rect_width` x `rect_height` rectangle.
pub fn erode_rect(
    dst: &mut RasterMut<'_>,
    src: &Raster<'_>,
    width: usize,
    height: usize,
    rect_width: usize,
    rect_height: usize,
    work: &mut [u8],
) -> Result<()> {
    let shape = Shape::Rect {
        width: rect_width,
        height: rect_height,
    };
    morph(Morph::Erode, dst, src, width, height, shape, work)
}

/// Dilate with a `rect_width` x `rect_height` rectangle.
pub fn dilate_rect(
    dst: &mut RasterMut<'_>,
    src: &Raster<'_>,
    width: usize,
    height: usize,
    rect_width: usize,
    rect_height: usize,
    work: &mut [u8],
) -> Result<()> {
    let shape = Shape::Rect {
        width: rect_width,
        height: rect_height,
    };
    morph(Morph::Dilate, dst, src, width, height, shape, work)
}

shape_wrappers! {
    /// Erode with a diamond.
    erode_diamond => Erode, Diamond;
    /// Dilate with a diamond.
    dilate_diamond => Dilate, Diamond;
    /// Erode with an octagon.
    erode_octagon => Erode, Octagon;
    /// Dilate with an octagon.
    dilate_octagon => Dilate, Octagon;
    /// Erode with a disc.
    erode_disc => Erode, Disc;
    /// Dilate with a disc.
    dilate_disc => Dilate, Disc;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tables::{DISC_AREA, OCTAGON_AREA};
    use rapp_core::{AlignedBuf, Bitmap};

    #[test]
    fn test_plan_dispatch() {
        let rect = |width, height| Shape::Rect { width, height };
        assert_eq!(plan(rect(1, 1)), Ok(Plan::Copy));
        assert_eq!(plan(rect(2, 2)), Ok(Plan::Square));
        assert!(matches!(plan(rect(5, 1)), Ok(Plan::Single(s)) if s.family() == Family::Horizontal));
        assert!(matches!(plan(rect(1, 5)), Ok(Plan::Single(s)) if s.family() == Family::Vertical));
        assert!(matches!(plan(rect(2, 3)), Ok(Plan::Separable { .. })));
        assert_eq!(plan(rect(0, 3)), Err(Error::ParmRange));
        assert_eq!(plan(rect(3, 64)), Err(Error::ParmRange));
        assert_eq!(plan(Shape::Disc(1)), Err(Error::ParmRange));
        assert_eq!(plan(Shape::Octagon(33)), Err(Error::ParmRange));
        assert!(plan(Shape::Diamond(32)).is_ok());
    }

    #[test]
    fn test_footprint_areas() {
        for r in MIN_RADIUS..OCTAGON_AREA.len() {
            assert_eq!(footprint(Shape::Octagon(r)).unwrap().len(), OCTAGON_AREA[r], "octagon {r}");
            assert_eq!(footprint(Shape::Disc(r)).unwrap().len(), DISC_AREA[r], "disc {r}");
            assert_eq!(footprint(Shape::Diamond(r)).unwrap().len(), 2 * r * (r - 1) + 1);
        }
        let rect = footprint(Shape::Rect { width: 4, height: 3 }).unwrap();
        assert_eq!(rect.len(), 12);
        assert_eq!(rect.first(), Some(&(-1, -1)));
        assert_eq!(rect.last(), Some(&(2, 1)));
    }

    #[test]
    fn test_min_padding() {
        assert_eq!(Shape::Rect { width: 3, height: 5 }.min_padding(), (16, 3));
        assert_eq!(Shape::Disc(32).min_padding(), (16, 16));
    }

    #[test]
    fn test_closing_restores_single_pixel() {
        let mut src = Bitmap::with_margin(5, 5, 16).unwrap();
        src.set(2, 2, true);
        let mut mid = Bitmap::with_margin(5, 5, 16).unwrap();
        let mut out = Bitmap::with_margin(5, 5, 16).unwrap();
        let mut work = AlignedBuf::new(worksize(5, 5));
        let square = Shape::Rect { width: 2, height: 2 };

        morph(Morph::Dilate, &mut mid.raster_mut(), &src.raster(), 5, 5, square, work.as_mut_slice())
            .unwrap();
        assert_eq!(mid.to_string(), ".....\n.....\n..11.\n..11.\n.....\n");

        mid.fill_margin(true);
        morph(Morph::Erode, &mut out.raster_mut(), &mid.raster(), 5, 5, square, work.as_mut_slice())
            .unwrap();
        assert_eq!(out.count(), 1);
        assert!(out.get(2, 2));
    }

    #[test]
    fn test_rect_1x1_copies() {
        let src = Bitmap::from_rows(&["1.1", ".1."], 16).unwrap();
        let mut dst = Bitmap::with_margin(3, 2, 16).unwrap();
        let mut work = AlignedBuf::new(worksize(3, 2));
        erode_rect(&mut dst.raster_mut(), &src.raster(), 3, 2, 1, 1, work.as_mut_slice()).unwrap();
        assert!(dst.same_pixels(&src));
    }

    fn erode(dst: &mut Bitmap, src: &Raster<'_>, shape: Shape, work: &mut [u8]) -> Result<()> {
        let (w, h) = (dst.width(), dst.height());
        morph(Morph::Erode, &mut dst.raster_mut(), src, w, h, shape, work)
    }

    #[test]
    fn test_validation_order() {
        let src = Bitmap::with_margin(8, 4, 16).unwrap();
        let mut dst = Bitmap::with_margin(8, 4, 16).unwrap();
        let mut work = AlignedBuf::new(worksize(8, 4) + ALIGNMENT);
        let diamond = Shape::Diamond(3);

        assert_eq!(erode(&mut dst, &src.raster(), Shape::Diamond(1), &mut []), Err(Error::ParmRange));
        assert_eq!(erode(&mut dst, &src.raster(), diamond, &mut []), Err(Error::ParmNull));
        let unaligned = &mut work.as_mut_slice()[1..];
        assert_eq!(erode(&mut dst, &src.raster(), diamond, unaligned), Err(Error::BufAlign));
        let short = &mut work.as_mut_slice()[..worksize(8, 4) - 1];
        assert_eq!(erode(&mut dst, &src.raster(), diamond, short), Err(Error::BufSize));

        // A source without padding rows fails the window check
        let padded = Bitmap::with_margin(8, 4, 1).unwrap();
        assert_eq!(
            erode(&mut dst, &padded.raster(), diamond, work.as_mut_slice()),
            Err(Error::BufSize)
        );
    }

    #[test]
    fn test_source_row_must_exceed_image() {
        // 100 pixels fit a 16-byte row, 132 do not
        let src = Bitmap::with_margin(100, 4, 0).unwrap();
        let mut dst = Bitmap::with_margin(100, 4, 16).unwrap();
        let mut work = AlignedBuf::new(worksize(100, 4));
        let diamond = Shape::Diamond(2);
        assert_eq!(
            erode(&mut dst, &src.raster(), diamond, work.as_mut_slice()),
            Err(Error::ImgSize)
        );
        let mut tiny = Bitmap::with_margin(100, 4, 0).unwrap();
        let padded = Bitmap::with_margin(100, 4, 16).unwrap();
        assert_eq!(
            erode(&mut tiny, &padded.raster(), diamond, work.as_mut_slice()),
            Ok(())
        );
    }
}
