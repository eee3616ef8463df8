//! Sequence engine
//!
//! Runs atom sequences between the caller buffers and the two temporaries
//! of the working buffer. Intermediate results ping-pong between `tmp1`
//! (even steps) and `tmp2` (odd steps); the last step writes the requested
//! destination. Before every step but the first, the step source is padded
//! by clamping with the padding of the atom about to run.
//!
//! All buffers are validated by the caller; nothing here fails once the
//! windows have been checked, apart from padding errors that are passed
//! through for completeness.
//!
//! # See also
//!
//! `rapp_morph_bin.c` (`rapp_morph_seq_driver`, `rapp_morph_separable`)

use crate::atom::Atom;
use crate::kernel::{self, Morph};
use crate::scratch::Layout;
use crate::tables::Sequence;
use rapp_core::{Raster, RasterMut, Result, pad_clamp};

/// Temporary image of the working buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Temp {
    Tmp1,
    Tmp2,
}

impl Temp {
    fn other(self) -> Temp {
        match self {
            Temp::Tmp1 => Temp::Tmp2,
            Temp::Tmp2 => Temp::Tmp1,
        }
    }
}

/// Plane a step reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Input {
    Src,
    Tmp(Temp),
}

/// Plane a step writes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Output {
    Dst,
    Tmp(Temp),
}

/// One atom application. A step between temporaries always writes the
/// other temporary, so it only names the one it reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Step {
    SrcToDst,
    SrcToTmp(Temp),
    TmpToDst(Temp),
    TmpToOther(Temp),
}

impl Step {
    fn new(read: Input, write: Output) -> Step {
        match (read, write) {
            (Input::Src, Output::Dst) => Step::SrcToDst,
            (Input::Src, Output::Tmp(t)) => Step::SrcToTmp(t),
            (Input::Tmp(t), Output::Dst) => Step::TmpToDst(t),
            (Input::Tmp(t), Output::Tmp(_)) => Step::TmpToOther(t),
        }
    }
}

/// Buffers of one morphology call.
pub(crate) struct Frame<'f, 's, 'd> {
    pub src: Raster<'s>,
    pub dst: &'f mut RasterMut<'d>,
    pub work: &'f mut [u8],
    pub layout: Layout,
    pub width: usize,
    pub height: usize,
}

impl Frame<'_, '_, '_> {
    fn tmp_pos(&self, plane: Temp) -> usize {
        match plane {
            Temp::Tmp1 => self.layout.tmp1,
            Temp::Tmp2 => self.layout.tmp2,
        }
    }

    fn tmp_mut(&mut self, plane: Temp) -> RasterMut<'_> {
        let pos = self.tmp_pos(plane);
        RasterMut::new(self.work, self.layout.dim).at(pos)
    }

    /// Apply one atom.
    fn apply(&mut self, op: Morph, offsets: &[(isize, isize)], step: Step) {
        let (w, h) = (self.width, self.height);
        let dim = self.layout.dim;
        match step {
            Step::SrcToDst => {
                kernel::apply(op, offsets, &mut self.dst.reborrow(), &self.src, w, h);
            }
            Step::SrcToTmp(t) => {
                let src = self.src;
                kernel::apply(op, offsets, &mut self.tmp_mut(t), &src, w, h);
            }
            Step::TmpToDst(t) => {
                let src = Raster::new(self.work, dim).at(self.tmp_pos(t));
                kernel::apply(op, offsets, &mut self.dst.reborrow(), &src, w, h);
            }
            Step::TmpToOther(Temp::Tmp1) => {
                let at = self.layout.tmp2;
                let (lo, hi) = self.work.split_at_mut(at);
                let src = Raster::new(lo, dim).at(self.layout.tmp1);
                kernel::apply(op, offsets, &mut RasterMut::new(hi, dim), &src, w, h);
            }
            Step::TmpToOther(Temp::Tmp2) => {
                let at = self.layout.split();
                let (lo, hi) = self.work.split_at_mut(at);
                let src = Raster::new(hi, dim).at(self.layout.tmp2 - at);
                let mut dst = RasterMut::new(lo, dim).at(self.layout.tmp1);
                kernel::apply(op, offsets, &mut dst, &src, w, h);
            }
        }
    }

    /// Copy the source rows just above and below the image into the same
    /// rows of a temporary.
    pub(crate) fn copy_padding(&mut self, plane: Temp) -> Result<()> {
        let (w, h) = (self.width, self.height);
        let src = self.src;
        let sdim = src.dim();
        let pos = self.tmp_pos(plane);
        let dim = self.layout.dim;
        for (srow, trow) in [
            (src.start() - sdim, pos - dim),
            (src.start() + h * sdim, pos + h * dim),
        ] {
            let from = Raster::new(src.data(), sdim).at(srow);
            let mut to = RasterMut::new(self.work, dim).at(trow);
            rapp_bitblt::copy_aligned(&mut to, &from, w, 1)?;
        }
        Ok(())
    }

    /// Run `seq` from `src` into `dst`, using `tmp[0]` after even steps and
    /// `tmp[1]` after odd steps. The two temporaries must differ.
    pub(crate) fn run(
        &mut self,
        op: Morph,
        seq: &Sequence,
        src: Input,
        dst: Output,
        tmp: [Temp; 2],
    ) -> Result<()> {
        let atoms = seq.family().atoms();
        let steps = seq.steps();
        let mut read = src;
        for (k, &idx) in steps.iter().enumerate() {
            let atom: &Atom = &atoms[idx as usize];
            let write = if k + 1 == steps.len() { dst } else { Output::Tmp(tmp[k & 1]) };
            if k > 0
                && let Input::Tmp(t) = read
            {
                if k == 1 && seq.copies_padding() {
                    self.copy_padding(t)?;
                } else {
                    let (w, h) = (self.width, self.height);
                    pad_clamp(&mut self.tmp_mut(t), w, h, atom.pad())?;
                }
            }
            let step = Step::new(read, write);
            log::trace!("{op} step {k}: {atom} {step:?}");
            self.apply(op, atom.offsets(), step);
            if let Output::Tmp(t) = write {
                read = Input::Tmp(t);
            }
        }
        Ok(())
    }

    /// Horizontal sequence into a temporary, then the vertical sequence
    /// into the destination.
    pub(crate) fn separable(&mut self, op: Morph, horz: &Sequence, vert: &Sequence) -> Result<()> {
        // Pick the temporary the horizontal pass ends in
        let buf = if horz.len() % 2 == 1 { Temp::Tmp1 } else { Temp::Tmp2 };
        self.run(op, horz, Input::Src, Output::Tmp(buf), [Temp::Tmp1, Temp::Tmp2])?;
        self.copy_padding(buf)?;
        self.run(op, vert, Input::Tmp(buf), Output::Dst, [buf.other(), buf])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::atom::Family;
    use crate::scratch::worksize;
    use rapp_core::{AlignedBuf, Bitmap};

    fn frame_run(
        op: Morph,
        src: &Bitmap,
        seq: &Sequence,
        dst: &mut Bitmap,
    ) -> Result<()> {
        let (w, h) = (src.width(), src.height());
        let mut work = AlignedBuf::new(worksize(w, h));
        let mut view = dst.raster_mut();
        let mut frame = Frame {
            src: src.raster(),
            dst: &mut view,
            work: work.as_mut_slice(),
            layout: Layout::new(w, h),
            width: w,
            height: h,
        };
        frame.run(op, seq, Input::Src, Output::Dst, [Temp::Tmp1, Temp::Tmp2])
    }

    #[test]
    fn test_line_sequence_through_temporaries() {
        let src = Bitmap::from_rows(&["......1........"], 16).unwrap();
        let mut dst = Bitmap::with_margin(15, 1, 16).unwrap();
        // 1x3, 1x3 endpoints, 1x5 endpoints, 1x2: a 1x10 line
        let seq = Sequence::line(Family::Horizontal, 10);
        assert_eq!(seq.steps(), &[1, 2, 3, 0]);
        frame_run(Morph::Dilate, &src, &seq, &mut dst).unwrap();
        assert_eq!(dst.to_string(), "..1111111111...\n");
    }

    #[test]
    fn test_separable_square() {
        let mut src = Bitmap::with_margin(9, 9, 16).unwrap();
        src.set(4, 4, true);
        let mut dst = Bitmap::with_margin(9, 9, 16).unwrap();
        let mut work = AlignedBuf::new(worksize(9, 9));
        let mut view = dst.raster_mut();
        let mut frame = Frame {
            src: src.raster(),
            dst: &mut view,
            work: work.as_mut_slice(),
            layout: Layout::new(9, 9),
            width: 9,
            height: 9,
        };
        let horz = Sequence::line(Family::Horizontal, 5);
        let vert = Sequence::line(Family::Vertical, 5);
        frame.separable(Morph::Dilate, &horz, &vert).unwrap();
        assert_eq!(dst.count(), 25);
        assert!(dst.get(2, 2) && dst.get(6, 6) && !dst.get(7, 4));
    }

    #[test]
    fn test_steps_between_temporaries() {
        let t1 = Input::Tmp(Temp::Tmp1);
        assert_eq!(Step::new(Input::Src, Output::Dst), Step::SrcToDst);
        assert_eq!(Step::new(Input::Src, Output::Tmp(Temp::Tmp2)), Step::SrcToTmp(Temp::Tmp2));
        assert_eq!(Step::new(t1, Output::Dst), Step::TmpToDst(Temp::Tmp1));
        assert_eq!(Step::new(t1, Output::Tmp(Temp::Tmp2)), Step::TmpToOther(Temp::Tmp1));
        // A step never reads and writes the same temporary
        assert_eq!(Step::new(t1, Output::Tmp(Temp::Tmp1)), Step::TmpToOther(Temp::Tmp1));
        assert_eq!(Temp::Tmp2.other(), Temp::Tmp1);
    }
}
