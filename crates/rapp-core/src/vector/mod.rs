//! Portable vector contract
//!
//! A [`Vector`] is a fixed-size register of `SIZE` independent 8-bit lanes.
//! Generic kernels are written once against this trait and instantiated for
//! every backend. A backend must provide the mandatory operations (load,
//! store, zero, splat and the bitwise set); every other operation has a
//! lane-wise provided implementation that a backend overrides when it has a
//! faster formulation.
//!
//! Lane `k` is byte `k` in memory order. Byte shifts move data between
//! lanes: `shl(n)` moves lane `k + n` into lane `k` (towards lower
//! addresses), `shr(n)` moves lane `k` into lane `k + n`. Vacated lanes are
//! zero.
//!
//! Comparison results are `0xff`/`0x00` per lane from the portable
//! backends, but generic code may only rely on the most significant bit of
//! each lane.
//!
//! Reductions are split into an accumulation step (`cntv`, `sumv`, `macv`)
//! and a reduction step (`cntr`, `sumr`, `macr`). The accumulation step may
//! be iterated at most `CNTN`, `SUMN` or `MACN` times on one accumulator
//! before it can overflow. Each bound is 1 or a multiple of 4.
//!
//! # See also
//!
//! `rc_vec_api.h` (operation contract), `rc_vec_swar.h` (SWAR formulas)

mod caps;
mod reader;
mod scope;
mod swar;

pub use caps::{Caps, Pair};
pub use reader::{UnalignedLoads, load_clipped};
pub use scope::VecScope;
pub use swar::{Swar, Wide};

use std::fmt::Debug;

/// Largest vector size any backend may declare.
pub const MAX_SIZE: usize = 32;

/// Fixed-width lane-parallel register.
pub trait Vector: Copy + Debug + PartialEq {
    /// Vector width in bytes.
    const SIZE: usize;
    /// Capability descriptor.
    const CAPS: Caps;
    /// Maximum accumulation steps for `cntv`.
    const CNTN: usize;
    /// Maximum accumulation steps for `sumv`.
    const SUMN: usize;
    /// Maximum accumulation steps for `macv`.
    const MACN: usize;

    /// Reduction accumulator.
    type Acc: Copy + Debug;

    // ------------------------------------------------------------------
    // Mandatory operations
    // ------------------------------------------------------------------

    /// Load `SIZE` bytes from the front of `src`.
    ///
    /// `src` must hold at least `SIZE` bytes.
    fn load(src: &[u8]) -> Self;

    /// Store `SIZE` bytes to the front of `dst`.
    ///
    /// `dst` must hold at least `SIZE` bytes.
    fn store(self, dst: &mut [u8]);

    /// All lanes zero.
    fn zero() -> Self;

    /// All lanes set to `value`.
    fn splat(value: u8) -> Self;

    /// Bitwise NOT.
    fn not(self) -> Self;

    /// Bitwise AND.
    fn and(self, other: Self) -> Self;

    /// Bitwise OR.
    fn or(self, other: Self) -> Self;

    /// Bitwise XOR.
    fn xor(self, other: Self) -> Self;

    /// Bitwise `self & !other`.
    fn andnot(self, other: Self) -> Self {
        self.and(other.not())
    }

    /// Bitwise `self | !other`.
    fn ornot(self, other: Self) -> Self {
        self.or(other.not())
    }

    /// Bitwise `self ^ !other`.
    fn xornot(self, other: Self) -> Self {
        self.xor(other.not())
    }

    // ------------------------------------------------------------------
    // Loads and byte shifts
    // ------------------------------------------------------------------

    /// Load up to `SIZE` bytes, zero-filling lanes past the end of `src`.
    fn load_partial(src: &[u8]) -> Self {
        if src.len() >= Self::SIZE {
            return Self::load(src);
        }
        let mut buf = [0u8; MAX_SIZE];
        buf[..src.len()].copy_from_slice(src);
        Self::load(&buf)
    }

    /// Shift lanes towards lower addresses by `bytes` lanes.
    fn shl(self, bytes: usize) -> Self {
        let src = lanes(self);
        let mut out = [0u8; MAX_SIZE];
        for k in 0..Self::SIZE.saturating_sub(bytes) {
            out[k] = src[k + bytes];
        }
        Self::load(&out)
    }

    /// Shift lanes towards higher addresses by `bytes` lanes.
    fn shr(self, bytes: usize) -> Self {
        let src = lanes(self);
        let mut out = [0u8; MAX_SIZE];
        for k in bytes..Self::SIZE {
            out[k] = src[k - bytes];
        }
        Self::load(&out)
    }

    /// Combine the tail of `self` and the head of `next`:
    /// `shl(self, bytes) | shr(next, SIZE - bytes)`.
    fn alignc(self, next: Self, bytes: usize) -> Self {
        self.shl(bytes).or(next.shr(Self::SIZE - bytes))
    }

    /// Even lanes of `self` into the low half, even lanes of `other` into
    /// the high half.
    fn pack(self, other: Self) -> Self {
        let a = lanes(self);
        let b = lanes(other);
        let half = Self::SIZE / 2;
        let mut out = [0u8; MAX_SIZE];
        for k in 0..half {
            out[k] = a[2 * k];
            out[k + half] = b[2 * k];
        }
        Self::load(&out)
    }

    // ------------------------------------------------------------------
    // Lane arithmetic
    // ------------------------------------------------------------------

    /// Saturating add.
    fn adds(self, other: Self) -> Self {
        map2(self, other, |a, b| a.saturating_add(b))
    }

    /// Average rounded down.
    fn avgt(self, other: Self) -> Self {
        map2(self, other, |a, b| ((a as u16 + b as u16) >> 1) as u8)
    }

    /// Average rounded up.
    fn avgr(self, other: Self) -> Self {
        map2(self, other, |a, b| ((a as u16 + b as u16 + 1) >> 1) as u8)
    }

    /// Average rounded towards `self`.
    fn avgz(self, other: Self) -> Self {
        map2(self, other, |a, b| {
            ((a as u16 + b as u16 + (a > b) as u16) >> 1) as u8
        })
    }

    /// Saturating subtract.
    fn subs(self, other: Self) -> Self {
        map2(self, other, |a, b| a.saturating_sub(b))
    }

    /// Absolute difference.
    fn suba(self, other: Self) -> Self {
        map2(self, other, |a, b| a.abs_diff(b))
    }

    /// Half difference rounded down, biased by 0x80.
    fn subht(self, other: Self) -> Self {
        map2(self, other, |a, b| ((a as i32 - b as i32 + 0xff) >> 1) as u8)
    }

    /// Half difference rounded up, biased by 0x80.
    fn subhr(self, other: Self) -> Self {
        map2(self, other, |a, b| ((a as i32 - b as i32 + 0x100) >> 1) as u8)
    }

    /// Saturated doubled distance from 0x80.
    fn abs(self) -> Self {
        map2(self, self, |a, _| (2 * (a as i32 - 0x80).abs()).min(0xff) as u8)
    }

    /// Per-lane `self > other` mask.
    fn cmpgt(self, other: Self) -> Self {
        if Self::CAPS.cmp.second {
            return other.cmpge(self).not();
        }
        map2(self, other, |a, b| if a > b { 0xff } else { 0 })
    }

    /// Per-lane `self >= other` mask.
    fn cmpge(self, other: Self) -> Self {
        if Self::CAPS.cmp.first {
            return other.cmpgt(self).not();
        }
        map2(self, other, |a, b| if a >= b { 0xff } else { 0 })
    }

    /// Per-lane minimum.
    fn min(self, other: Self) -> Self {
        map2(self, other, |a, b| a.min(b))
    }

    /// Per-lane maximum.
    fn max(self, other: Self) -> Self {
        map2(self, other, |a, b| a.max(b))
    }

    /// Linear interpolation with Q.8 factor `blend8` in [0,0x7f], rounded
    /// to nearest: `a + ((blend8*(b - a) + 0x80) >> 8)`.
    fn lerp(self, other: Self, blend8: u8) -> Self {
        let blend = blend8 as i32;
        map2(self, other, |a, b| {
            let upd = (blend * (b as i32 - a as i32) + 0x80) >> 8;
            (a as i32 + upd) as u8
        })
    }

    /// Linear interpolation with the update rounded towards zero.
    fn lerpz(self, other: Self, blend8: u8) -> Self {
        let blend = blend8 as i32;
        map2(self, other, |a, b| {
            let diff = b as i32 - a as i32;
            let upd = (blend * diff + if diff < 0 { 0xff } else { 0 }) >> 8;
            (a as i32 + upd) as u8
        })
    }

    /// Linear interpolation with the update rounded away from zero.
    fn lerpn(self, other: Self, blend8: u8) -> Self {
        let blend = blend8 as i32;
        map2(self, other, |a, b| {
            let diff = b as i32 - a as i32;
            let upd = (blend * diff + if diff > 0 { 0xff } else { 0 }) >> 8;
            (a as i32 + upd) as u8
        })
    }

    // ------------------------------------------------------------------
    // Binary masks
    // ------------------------------------------------------------------

    /// Word mask: bit `k` is the most significant bit of lane `k`.
    fn getmaskw(self) -> u32 {
        let src = lanes(self);
        (0..Self::SIZE).fold(0, |mask, k| mask | ((src[k] >> 7) as u32) << k)
    }

    /// Vector mask: byte `k` holds the mask bits of lanes `8k..8k+8`,
    /// remaining lanes are zero.
    fn getmaskv(self) -> Self {
        let bytes = self.getmaskw().to_le_bytes();
        let mut out = [0u8; MAX_SIZE];
        let n = Self::SIZE / 8;
        out[..n].copy_from_slice(&bytes[..n]);
        Self::load(&out)
    }

    // ------------------------------------------------------------------
    // Reductions
    // ------------------------------------------------------------------

    /// Empty accumulator.
    fn acc_zero() -> Self::Acc;

    /// Population count accumulation step.
    fn cntv(acc: Self::Acc, v: Self) -> Self::Acc;

    /// Population count reduction step.
    fn cntr(acc: Self::Acc) -> u32;

    /// Lane sum accumulation step.
    fn sumv(acc: Self::Acc, v: Self) -> Self::Acc;

    /// Lane sum reduction step.
    fn sumr(acc: Self::Acc) -> u32;

    /// Sum of lane products accumulation step.
    fn macv(acc: Self::Acc, a: Self, b: Self) -> Self::Acc;

    /// Sum of lane products reduction step.
    fn macr(acc: Self::Acc) -> u32;

    // ------------------------------------------------------------------
    // Scope hooks
    // ------------------------------------------------------------------

    /// Acquire backend state needed before the first operation of a call.
    fn declare() {}

    /// Release backend state acquired by [`Vector::declare`].
    fn cleanup() {}
}

/// Copy the lanes of a vector into a scratch array.
pub fn lanes<V: Vector>(v: V) -> [u8; MAX_SIZE] {
    let mut out = [0u8; MAX_SIZE];
    v.store(&mut out);
    out
}

/// Apply `f` lane by lane.
pub fn map2<V: Vector>(a: V, b: V, f: impl Fn(u8, u8) -> u8) -> V {
    let la = lanes(a);
    let lb = lanes(b);
    let mut out = [0u8; MAX_SIZE];
    for k in 0..V::SIZE {
        out[k] = f(la[k], lb[k]);
    }
    V::load(&out)
}

/// Count set bits in `data` using the vector reductions of `V`.
pub fn popcount<V: Vector>(data: &[u8]) -> u64 {
    let mut total = 0u64;
    let mut acc = V::acc_zero();
    let mut steps = 0;
    for chunk in data.chunks(V::SIZE) {
        acc = V::cntv(acc, V::load_partial(chunk));
        steps += 1;
        if steps == V::CNTN {
            total += V::cntr(acc) as u64;
            acc = V::acc_zero();
            steps = 0;
        }
    }
    total + V::cntr(acc) as u64
}
