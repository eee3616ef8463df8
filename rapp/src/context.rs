//! Library context
//!
//! A [`Rapp`] value owns the kernel selection for raster operations. The
//! safe API has no global initialization step: constructing a context is
//! initializing the library.

use rapp_bitblt::{Rop, ScoreTable, VariantTable};
use rapp_core::{Error, Raster, RasterMut, Result};
use rapp_morph::{Morph, Shape};

/// Environment variable that restricts kernel selection to word tiers.
pub const FORCE_WORD_ENV: &str = "RAPP_FORCE_WORD";

/// Log a rejected call and pass the result through.
pub(crate) fn checked<T>(name: &str, result: Result<T>) -> Result<T> {
    if let Err(e) = &result {
        log::warn!("{name}: {e} ({})", e.code());
    }
    result
}

/// Kernel selection and entry points.
#[derive(Debug, Clone)]
pub struct Rapp {
    scores: ScoreTable,
    table: VariantTable,
}

impl Rapp {
    /// Context with the built-in scores, or word tiers only when
    /// `RAPP_FORCE_WORD=1`.
    pub fn new() -> Self {
        let force = std::env::var(FORCE_WORD_ENV).is_ok_and(|v| v == "1");
        if force {
            log::info!("{FORCE_WORD_ENV}=1: using word kernels only");
            Self::with_scores(ScoreTable::word_only())
        } else {
            Self::with_scores(ScoreTable::default())
        }
    }

    /// Context selecting kernels by `scores`.
    pub fn with_scores(scores: ScoreTable) -> Self {
        let table = VariantTable::build(&scores);
        Rapp { scores, table }
    }

    /// Scores the context was built from.
    pub fn scores(&self) -> &ScoreTable {
        &self.scores
    }

    /// Selected kernel tiers.
    pub fn table(&self) -> &VariantTable {
        &self.table
    }

    /// Blit `src` onto `dst` with raster operation `rop`.
    pub fn bitblt(
        &self,
        rop: Rop,
        dst: &mut RasterMut<'_>,
        src: &Raster<'_>,
        width: usize,
        height: usize,
    ) -> Result<()> {
        let result = rapp_bitblt::bitblt(&self.table, rop, dst, src, width, height);
        checked("bitblt", result)
    }

    /// Erode or dilate `src` into `dst`.
    #[allow(clippy::too_many_arguments)]
    pub fn morph(
        &self,
        op: Morph,
        dst: &mut RasterMut<'_>,
        src: &Raster<'_>,
        width: usize,
        height: usize,
        shape: Shape,
        work: &mut [u8],
    ) -> Result<()> {
        let result = rapp_morph::morph(op, dst, src, width, height, shape, work);
        checked(op.name(), result)
    }

    /// Erode `src` into `dst`.
    pub fn erode(
        &self,
        dst: &mut RasterMut<'_>,
        src: &Raster<'_>,
        width: usize,
        height: usize,
        shape: Shape,
        work: &mut [u8],
    ) -> Result<()> {
        self.morph(Morph::Erode, dst, src, width, height, shape, work)
    }

    /// Dilate `src` into `dst`.
    pub fn dilate(
        &self,
        dst: &mut RasterMut<'_>,
        src: &Raster<'_>,
        width: usize,
        height: usize,
        shape: Shape,
        work: &mut [u8],
    ) -> Result<()> {
        self.morph(Morph::Dilate, dst, src, width, height, shape, work)
    }

    /// Pad with a constant value.
    pub fn pad_const(
        &self,
        buf: &mut RasterMut<'_>,
        width: usize,
        height: usize,
        size: usize,
        value: bool,
    ) -> Result<()> {
        checked("pad_const", rapp_core::pad_const(buf, width, height, size, value))
    }

    /// Pad by replicating edge pixels.
    pub fn pad_clamp(
        &self,
        buf: &mut RasterMut<'_>,
        width: usize,
        height: usize,
        size: usize,
    ) -> Result<()> {
        checked("pad_clamp", rapp_core::pad_clamp(buf, width, height, size))
    }

    /// Working buffer size for morphology on a `width` x `height` image.
    ///
    /// Zero sizes are rejected like every other entry point does.
    pub fn worksize(&self, width: usize, height: usize) -> Result<usize> {
        if width == 0 || height == 0 {
            return checked("worksize", Err(Error::ImgSize));
        }
        Ok(rapp_morph::worksize(width, height))
    }
}

impl Default for Rapp {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rapp_bitblt::{AlignClass, Tier};
    use rapp_core::{AlignedBuf, Bitmap};

    #[test]
    fn test_with_scores_selects_tiers() {
        let ctx = Rapp::with_scores(ScoreTable::word_only());
        for rop in Rop::ALL {
            for class in AlignClass::ALL {
                assert!(ctx.table().variant(rop, class).is_word());
            }
        }
        let ctx = Rapp::with_scores(ScoreTable::default());
        assert_eq!(ctx.table().variant(Rop::Copy, AlignClass::Vector), Tier::VectorAligned);
    }

    #[test]
    fn test_worksize() {
        let ctx = Rapp::with_scores(ScoreTable::default());
        assert_eq!(ctx.worksize(100, 10), Ok(rapp_morph::worksize(100, 10)));
        assert_eq!(ctx.worksize(0, 10), Err(Error::ImgSize));
    }

    #[test]
    fn test_pad_then_erode() {
        let ctx = Rapp::with_scores(ScoreTable::default());
        let mut src = Bitmap::with_margin(12, 6, 16).unwrap();
        src.fill(true);
        src.fill_margin(false);
        ctx.pad_const(&mut src.raster_mut(), 12, 6, 16, true).unwrap();

        let mut dst = Bitmap::with_margin(12, 6, 16).unwrap();
        let mut work = AlignedBuf::new(ctx.worksize(12, 6).unwrap());
        let shape = Shape::Rect { width: 5, height: 5 };
        ctx.erode(&mut dst.raster_mut(), &src.raster(), 12, 6, shape, work.as_mut_slice())
            .unwrap();
        assert_eq!(dst.count(), 72);
    }
}
