//! SIMD-within-a-register backends
//!
//! Both backends keep all lanes in one native integer and use carry-free
//! formulations of the lane arithmetic. [`Swar`] is one machine word wide
//! and is used by the word kernels; [`Wide`] is one alignment block wide
//! and is used by the vector kernels.

use super::{Caps, Pair, Vector};

macro_rules! swar_backend {
    (
        $(#[$meta:meta])*
        $name:ident, $int:ty, $size:expr,
        caps: $caps:expr,
        macn: $macn:expr
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
        pub struct $name(pub $int);

        impl $name {
            /// High bit of every lane.
            const H: $int = <$int>::from_le_bytes([0x80; $size]);
            /// Low seven bits of every lane.
            const L: $int = <$int>::from_le_bytes([0x7f; $size]);
            /// Even-byte mask for 16-bit accumulation lanes.
            const EVEN: $int = {
                let mut b = [0u8; $size];
                let mut k = 0;
                while k < $size {
                    b[k] = 0xff;
                    k += 2;
                }
                <$int>::from_le_bytes(b)
            };

            /// Expand the high bit of every lane to a full-lane mask.
            #[inline]
            fn spread(h: $int) -> $int {
                (h >> 7).wrapping_mul(0xff)
            }
        }

        impl Vector for $name {
            const SIZE: usize = $size;
            const CAPS: Caps = $caps;
            const CNTN: usize = 28;
            const SUMN: usize = 128;
            const MACN: usize = $macn;

            type Acc = $int;

            #[inline]
            fn load(src: &[u8]) -> Self {
                let mut b = [0u8; $size];
                b.copy_from_slice(&src[..$size]);
                $name(<$int>::from_le_bytes(b))
            }

            #[inline]
            fn store(self, dst: &mut [u8]) {
                dst[..$size].copy_from_slice(&self.0.to_le_bytes());
            }

            #[inline]
            fn zero() -> Self {
                $name(0)
            }

            #[inline]
            fn splat(value: u8) -> Self {
                $name(<$int>::from_le_bytes([value; $size]))
            }

            #[inline]
            fn not(self) -> Self {
                $name(!self.0)
            }

            #[inline]
            fn and(self, other: Self) -> Self {
                $name(self.0 & other.0)
            }

            #[inline]
            fn or(self, other: Self) -> Self {
                $name(self.0 | other.0)
            }

            #[inline]
            fn xor(self, other: Self) -> Self {
                $name(self.0 ^ other.0)
            }

            #[inline]
            fn andnot(self, other: Self) -> Self {
                $name(self.0 & !other.0)
            }

            #[inline]
            fn shl(self, bytes: usize) -> Self {
                if bytes >= $size {
                    $name(0)
                } else {
                    // Little-endian: lower addresses are less significant
                    $name(self.0 >> (8 * bytes))
                }
            }

            #[inline]
            fn shr(self, bytes: usize) -> Self {
                if bytes >= $size {
                    $name(0)
                } else {
                    $name(self.0 << (8 * bytes))
                }
            }

            #[inline]
            fn adds(self, other: Self) -> Self {
                let (a, b) = (self.0, other.0);
                let s = ((a & Self::L) + (b & Self::L)) ^ ((a ^ b) & Self::H);
                let c = ((a & b) | ((a | b) & !s)) & Self::H;
                $name(s | Self::spread(c))
            }

            #[inline]
            fn subs(self, other: Self) -> Self {
                let (a, b) = (self.0, other.0);
                let d = ((a | Self::H) - (b & Self::L)) ^ ((a ^ !b) & Self::H);
                let borrow = ((!a & b) | (!(a ^ b) & d)) & Self::H;
                $name(d & !Self::spread(borrow))
            }

            #[inline]
            fn avgt(self, other: Self) -> Self {
                let (a, b) = (self.0, other.0);
                $name((a & b) + (((a ^ b) >> 1) & Self::L))
            }

            #[inline]
            fn avgr(self, other: Self) -> Self {
                let (a, b) = (self.0, other.0);
                $name((a | b) - (((a ^ b) >> 1) & Self::L))
            }

            #[inline]
            fn min(self, other: Self) -> Self {
                $name(self.0.wrapping_sub(self.subs(other).0))
            }

            #[inline]
            fn max(self, other: Self) -> Self {
                $name(other.0.wrapping_add(self.subs(other).0))
            }

            #[inline]
            fn cmpgt(self, other: Self) -> Self {
                let x = self.subs(other).0;
                let nz = (((x & Self::L) + Self::L) | x) & Self::H;
                $name(Self::spread(nz))
            }

            #[inline]
            fn cmpge(self, other: Self) -> Self {
                other.cmpgt(self).not()
            }

            fn getmaskw(self) -> u32 {
                let bits = self.0.to_le_bytes();
                let mut mask = 0u32;
                for (i, chunk) in bits.chunks(8).enumerate() {
                    let mut w = [0u8; 8];
                    w.copy_from_slice(chunk);
                    let m = (u64::from_le_bytes(w) & 0x8080_8080_8080_8080) >> 7;
                    let packed = (m.wrapping_mul(0x0102_0408_1020_4080) >> 56) as u32;
                    mask |= packed << (8 * i);
                }
                mask
            }

            #[inline]
            fn acc_zero() -> $int {
                0
            }

            #[inline]
            fn cntv(acc: $int, v: Self) -> $int {
                // Per-lane population count
                let m1 = <$int>::from_le_bytes([0x55; $size]);
                let m2 = <$int>::from_le_bytes([0x33; $size]);
                let m4 = <$int>::from_le_bytes([0x0f; $size]);
                let mut x = v.0;
                x -= (x >> 1) & m1;
                x = (x & m2) + ((x >> 2) & m2);
                x = (x + (x >> 4)) & m4;
                acc + x
            }

            fn cntr(acc: $int) -> u32 {
                acc.to_le_bytes().iter().map(|&b| b as u32).sum()
            }

            #[inline]
            fn sumv(acc: $int, v: Self) -> $int {
                acc + (v.0 & Self::EVEN) + ((v.0 >> 8) & Self::EVEN)
            }

            fn sumr(acc: $int) -> u32 {
                acc.to_le_bytes()
                    .chunks(2)
                    .map(|c| u16::from_le_bytes([c[0], c[1]]) as u32)
                    .sum()
            }

            fn macv(acc: $int, a: Self, b: Self) -> $int {
                let (la, lb) = (a.0.to_le_bytes(), b.0.to_le_bytes());
                let mut lanes = acc.to_le_bytes();
                for (j, lane) in lanes.chunks_mut(4).enumerate() {
                    let mut sum = u32::from_le_bytes([lane[0], lane[1], lane[2], lane[3]]);
                    for k in 4 * j..4 * j + 4 {
                        sum += la[k] as u32 * lb[k] as u32;
                    }
                    lane.copy_from_slice(&sum.to_le_bytes());
                }
                <$int>::from_le_bytes(lanes)
            }

            fn macr(acc: $int) -> u32 {
                acc.to_le_bytes()
                    .chunks(4)
                    .map(|c| u32::from_le_bytes([c[0], c[1], c[2], c[3]]))
                    .sum()
            }
        }

        const _: () = assert!(<$name as Vector>::CAPS.is_valid());
    };
}

swar_backend! {
    /// One machine word of lanes.
    Swar, u64, 8,
    caps: Caps {
        loadu: true,
        cmp: Pair::BOTH_PREFER_FIRST,
        avg: Pair::BOTH_PREFER_FIRST,
        getmask: Pair::FIRST,
    },
    macn: 8192
}

swar_backend! {
    /// One alignment block of lanes.
    Wide, u128, 16,
    caps: Caps {
        loadu: true,
        cmp: Pair::BOTH_PREFER_SECOND,
        avg: Pair::BOTH_PREFER_SECOND,
        getmask: Pair::FIRST,
    },
    macn: 4096
}

const _: () = assert!(Wide::SIZE == crate::platform::ALIGNMENT);
const _: () = assert!(Swar::SIZE == crate::platform::NATIVE_SIZE);
