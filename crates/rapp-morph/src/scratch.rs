//! Working buffer layout
//!
//! The working buffer holds two temporary images, `tmp1` and `tmp2`, with
//! the same row dimension: the aligned image row plus one alignment block
//! of padding on each side. Each image is preceded by 16 padding rows.
//!
//! ```text
//! row  0 .. 16        top padding of tmp1
//! row 16 .. 16+h      tmp1
//! row 16+h .. 32+h    bottom padding of tmp1, top padding of tmp2
//! row 32+h .. 32+2h   tmp2
//! row 32+2h .. 48+2h  bottom padding of tmp2
//! ```
//!
//! The bottom padding rows of `tmp1` are shared with the top padding rows of
//! `tmp2`. That is harmless: a temporary is padded right before it is read,
//! and no step reads one temporary while padding the other.

use rapp_core::platform::{ALIGNMENT, align, bin_bytes};

/// Padding rows above and below each temporary image.
pub const PADDING: usize = 16;

/// Working buffer size in bytes for morphology on a `width` x `height`
/// image.
pub fn worksize(width: usize, height: usize) -> usize {
    (2 * height + 3 * PADDING) * dim(width)
}

fn dim(width: usize) -> usize {
    align(bin_bytes(width)) + 2 * ALIGNMENT
}

/// Positions of the two temporaries inside the working buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Layout {
    /// Row dimension of both temporaries
    pub dim: usize,
    /// Byte index of the first pixel of `tmp1`
    pub tmp1: usize,
    /// Byte index of the first pixel of `tmp2`
    pub tmp2: usize,
    /// Image height
    pub height: usize,
}

impl Layout {
    pub(crate) fn new(width: usize, height: usize) -> Self {
        let dim = dim(width);
        let tmp1 = PADDING * dim + ALIGNMENT;
        Layout {
            dim,
            tmp1,
            tmp2: tmp1 + dim * (height + PADDING),
            height,
        }
    }

    /// Byte index that splits the buffer into a part holding all `tmp1`
    /// image rows and a part holding every row of `tmp2` a step may read,
    /// padding included.
    pub(crate) fn split(&self) -> usize {
        self.tmp1 + self.height * self.dim
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_worksize() {
        // 100 pixels: 13 bytes, one block, plus a block on each side
        assert_eq!(worksize(100, 10), (20 + 48) * 48);
        assert_eq!(worksize(128, 1), 50 * 48);
        assert_eq!(worksize(129, 1), 50 * 64);
    }

    #[test]
    fn test_layout_fits_worksize() {
        for (w, h) in [(1, 1), (100, 10), (640, 48)] {
            let layout = Layout::new(w, h);
            let size = worksize(w, h);
            // Last byte of the deepest padding row of tmp2
            let last_row = layout.tmp2 + (h + PADDING - 1) * layout.dim;
            assert_eq!(last_row + layout.dim - ALIGNMENT, size);
            assert_eq!(layout.tmp1 - PADDING * layout.dim, ALIGNMENT);
            assert!(layout.split() < layout.tmp2 - (PADDING - 1) * layout.dim);
        }
    }
}
