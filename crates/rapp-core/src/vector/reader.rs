//! Unaligned load cursor (`LDINIT` / `LOADU`)
//!
//! The cursor only ever loads whole vectors that start on a `SIZE`-aligned
//! address and combines two consecutive aligned vectors to produce the
//! misaligned one. Aligned vectors that straddle either end of the slice are
//! loaded with the bytes outside the slice read as zero, so the cursor
//! never touches memory outside the slice it was given.

use super::{MAX_SIZE, Vector};

/// Sequential misaligned reader over a byte slice.
#[derive(Debug)]
pub struct UnalignedLoads<'a, V: Vector> {
    src: &'a [u8],
    /// Slice index of the current aligned vector (may be negative)
    block: isize,
    /// Misalignment in bytes
    shift: usize,
    /// Current aligned vector
    cur: V,
}

impl<'a, V: Vector> UnalignedLoads<'a, V> {
    /// Start reading at `src[pos]`. `pos` may lie outside the slice.
    pub fn new(src: &'a [u8], pos: isize) -> Self {
        let shift = (src.as_ptr() as isize + pos).rem_euclid(V::SIZE as isize) as usize;
        let block = pos - shift as isize;
        let cur = load_clipped::<V>(src, block);
        UnalignedLoads {
            src,
            block,
            shift,
            cur,
        }
    }

    /// Load the next `SIZE` bytes and advance by `SIZE`.
    pub fn load(&mut self) -> V {
        if self.shift == 0 {
            let out = self.cur;
            self.block += V::SIZE as isize;
            self.cur = load_clipped::<V>(self.src, self.block);
            return out;
        }
        let next = load_clipped::<V>(self.src, self.block + V::SIZE as isize);
        let out = self.cur.alignc(next, self.shift);
        self.cur = next;
        self.block += V::SIZE as isize;
        out
    }
}

/// Load the vector at `src[at..at + SIZE]`, reading bytes outside `src` as
/// zero.
pub fn load_clipped<V: Vector>(src: &[u8], at: isize) -> V {
    let size = V::SIZE as isize;
    let len = src.len() as isize;
    if at >= 0 && at + size <= len {
        return V::load(&src[at as usize..]);
    }
    let mut buf = [0u8; MAX_SIZE];
    let lo = at.max(0);
    let hi = (at + size).min(len);
    if lo < hi {
        let dst = (lo - at) as usize;
        buf[dst..dst + (hi - lo) as usize].copy_from_slice(&src[lo as usize..hi as usize]);
    }
    V::load(&buf)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vector::{Swar, Wide, lanes};

    fn check<V: Vector>(data: &[u8]) {
        for pos in 0..V::SIZE * 2 {
            let mut rd = UnalignedLoads::<V>::new(data, pos as isize);
            let mut at = pos;
            while at < data.len() {
                let v = lanes(rd.load());
                for k in 0..V::SIZE {
                    let expect = data.get(at + k).copied().unwrap_or(0);
                    assert_eq!(v[k], expect, "pos {pos} at {at} lane {k}");
                }
                at += V::SIZE;
            }
        }
    }

    #[test]
    fn test_unaligned_reads_match_bytes() {
        let data: Vec<u8> = (1..=100u8).collect();
        check::<Swar>(&data);
        check::<Wide>(&data);
        // Sub-slices start at arbitrary addresses
        check::<Wide>(&data[3..97]);
        check::<Swar>(&data[5..]);
    }

    #[test]
    fn test_start_before_slice() {
        let data: Vec<u8> = (1..=40u8).collect();
        let mut rd = UnalignedLoads::<Swar>::new(&data, -3);
        let v = lanes(rd.load());
        assert_eq!(&v[..8], &[0, 0, 0, 1, 2, 3, 4, 5]);
        let v = lanes(rd.load());
        assert_eq!(&v[..8], &[6, 7, 8, 9, 10, 11, 12, 13]);
    }

    #[test]
    fn test_clipped_load() {
        let data = [1u8, 2, 3];
        let v = lanes(load_clipped::<Swar>(&data, -2));
        assert_eq!(&v[..8], &[0, 0, 1, 2, 3, 0, 0, 0]);
        let v = lanes(load_clipped::<Swar>(&data, 10));
        assert_eq!(&v[..8], &[0; 8]);
    }
}
