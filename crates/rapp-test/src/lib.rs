//! rapp-test - Regression test framework for RAPP
//!
//! This crate provides the regression harness shared by the integration
//! tests of every RAPP crate, together with seeded random bitmap generation
//! and slow, obviously-correct reference operators that the vectorized
//! implementations are checked against.
//!
//! # Usage
//!
//! ```ignore
//! use rapp_test::{RegParams, ref_erode, rect_offsets};
//!
//! let mut rp = RegParams::new("morph");
//! rp.compare_bitmaps(&ref_erode(&src, &rect_offsets(5, 3))?, &dst);
//! assert!(rp.cleanup());
//! ```
//!
//! # Environment Variables
//!
//! - `REGTEST_MODE`: Set to "compare" or "display"

mod error;
mod params;
mod reference;

pub use error::{TestError, TestResult};
pub use params::{RegParams, RegTestMode};
pub use reference::{diamond_offsets, rect_offsets, ref_bitblt, ref_dilate, ref_erode};

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rapp_core::Bitmap;

/// Deterministic random number generator for a test.
pub fn seeded_rng(seed: u64) -> StdRng {
    StdRng::seed_from_u64(seed)
}

/// Fill a byte slice with random bytes.
pub fn random_fill(rng: &mut StdRng, data: &mut [u8]) {
    rng.fill(data);
}

/// Bitmap whose whole buffer, margins included, holds random bits.
///
/// # Arguments
///
/// * `width`, `height` - Image size in pixels
/// * `margin` - Padding pixels on every side
pub fn random_bitmap(
    rng: &mut StdRng,
    width: usize,
    height: usize,
    margin: usize,
) -> TestResult<Bitmap> {
    let mut bmp = Bitmap::with_margin(width, height, margin)?;
    random_fill(rng, bmp.data_mut());
    Ok(bmp)
}

/// Random bitmap with roughly `density` of its image pixels set and the
/// margin filled with `margin_value`.
pub fn random_sparse_bitmap(
    rng: &mut StdRng,
    width: usize,
    height: usize,
    margin: usize,
    density: f64,
    margin_value: bool,
) -> TestResult<Bitmap> {
    let mut bmp = Bitmap::with_margin(width, height, margin)?;
    bmp.fill_margin(margin_value);
    for y in 0..height {
        for x in 0..width {
            bmp.set(x, y, rng.random_bool(density));
        }
    }
    Ok(bmp)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seeded_rng_is_reproducible() {
        let a = random_bitmap(&mut seeded_rng(7), 40, 3, 0).unwrap();
        let b = random_bitmap(&mut seeded_rng(7), 40, 3, 0).unwrap();
        assert_eq!(a.data(), b.data());
    }

    #[test]
    fn test_sparse_bitmap_margin() {
        let bmp = random_sparse_bitmap(&mut seeded_rng(1), 30, 10, 4, 0.0, true).unwrap();
        assert_eq!(bmp.count(), 0);
        assert!(bmp.get_padded(-1, -1));
        assert!(bmp.get_padded(30, 13));
    }
}
