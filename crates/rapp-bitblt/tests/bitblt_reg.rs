//! Bitblt regression test
//!
//! Places source and destination images at random byte and bit positions
//! inside padded buffers, blits with every raster operation and compares
//! the image region with a pixel-by-pixel reference. Bytes outside the
//! image are not compared: the kernels may overwrite them up to the next
//! alignment boundary.
//!
//! Run with:
//! ```
//! cargo test -p rapp-bitblt --test bitblt_reg
//! ```

use rand::Rng;
use rapp_bitblt::{AlignClass, Rop, ScoreTable, VariantTable, bitblt, classify};
use rapp_core::platform::ALIGNMENT;
use rapp_core::{Bitmap, Raster};
use rapp_test::{RegParams, random_bitmap, ref_bitblt, seeded_rng};

const ITERATIONS: usize = 200;
const MAX_WIDTH: usize = 300;
const MAX_HEIGHT: usize = 5;

/// Destination x offsets that land in each class against an aligned source.
const CLASS_OFFSETS: [(usize, AlignClass); 4] = [
    (128, AlignClass::Vector),
    (64, AlignClass::Word),
    (40, AlignClass::Byte),
    (13, AlignClass::Bit),
];

/// Blit with `table` and with the reference, return whether the image
/// regions agree.
fn check_blit(
    table: &VariantTable,
    rop: Rop,
    dst: &Bitmap,
    dx: usize,
    src: &Raster<'_>,
    width: usize,
    height: usize,
) -> bool {
    let mut got = dst.clone();
    bitblt(table, rop, &mut got.view_at_mut(dx, 0), src, width, height)
        .expect("bitblt rejected valid input");
    let mut want = dst.clone();
    ref_bitblt(&mut want.view_at_mut(dx, 0), src, width, height, |d, s| rop.pixel(d, s));
    (0..height).all(|y| (0..width).all(|x| got.get(dx + x, y) == want.get(dx + x, y)))
}

#[test]
fn bitblt_reg() {
    let mut rp = RegParams::new("bitblt");
    let mut rng = seeded_rng(0x0b17);
    let table = VariantTable::default();

    // Random placement of both images
    eprintln!("  Testing random placements");
    for rop in Rop::ALL {
        let mut ok = true;
        for _ in 0..ITERATIONS {
            let width = rng.random_range(1..=MAX_WIDTH);
            let height = rng.random_range(1..=MAX_HEIGHT);
            let sx = rng.random_range(0..8 * ALIGNMENT * 2);
            let dx = rng.random_range(0..8 * ALIGNMENT * 2);
            let src = random_bitmap(&mut rng, sx + width, height, 8).unwrap();
            let dst = random_bitmap(&mut rng, dx + width, height, 8).unwrap();
            ok &= check_blit(&table, rop, &dst, dx, &src.view_at(sx, 0), width, height);
        }
        rp.compare_values(1.0, if ok { 1.0 } else { 0.0 }, 0.0);
    }

    // Same dims and full rows collapse to a one-row blit
    eprintln!("  Testing contiguous rows");
    let src = random_bitmap(&mut rng, 8 * 4 * ALIGNMENT, 6, 0).unwrap();
    let dst = random_bitmap(&mut rng, 8 * 4 * ALIGNMENT, 6, 0).unwrap();
    assert_eq!(src.dim(), dst.dim());
    for rop in [Rop::Copy, Rop::Xor, Rop::Nandn] {
        let ok = check_blit(&table, rop, &dst, 0, &src.raster(), src.width(), 6);
        rp.compare_values(1.0, if ok { 1.0 } else { 0.0 }, 0.0);
    }

    assert!(rp.cleanup());
}

#[test]
fn bitblt_alignment_invariance_reg() {
    let mut rp = RegParams::new("bitblt_alignment");
    let mut rng = seeded_rng(0xa119);
    let table = VariantTable::default();
    let (width, height) = (250, 4);
    let src = random_bitmap(&mut rng, width, height, 8).unwrap();
    let base = random_bitmap(&mut rng, 128 + width, height, 8).unwrap();

    for rop in Rop::ALL {
        let mut results = Vec::new();
        for (dx, class) in CLASS_OFFSETS {
            assert_eq!(classify(0, dx % 128), class);
            let mut dst = Bitmap::with_margin(width, height, 8).unwrap();
            // Same logical destination content at every placement
            let mut placed = Bitmap::with_margin(dx + width, height, 8).unwrap();
            for y in 0..height {
                for x in 0..width {
                    placed.set(dx + x, y, base.get(x, y));
                }
            }
            bitblt(&table, rop, &mut placed.view_at_mut(dx, 0), &src.raster(), width, height)
                .unwrap();
            for y in 0..height {
                for x in 0..width {
                    dst.set(x, y, placed.get(dx + x, y));
                }
            }
            results.push(dst);
        }
        for other in &results[1..] {
            rp.compare_bitmaps(&results[0], other);
        }
    }

    assert!(rp.cleanup());
}

#[test]
fn bitblt_score_table_reg() {
    let mut rp = RegParams::new("bitblt_scores");
    let mut rng = seeded_rng(0x5c0e);

    // Every selectable kernel must give the same pixels
    let tables = [
        VariantTable::default(),
        VariantTable::build(&ScoreTable::word_only()),
        VariantTable::build(&ScoreTable::empty()),
    ];
    for _ in 0..40 {
        let width = rng.random_range(1..=MAX_WIDTH);
        let height = rng.random_range(1..=MAX_HEIGHT);
        let sx = rng.random_range(0..256);
        let dx = rng.random_range(0..256);
        let rop = Rop::ALL[rng.random_range(0..Rop::COUNT)];
        let src = random_bitmap(&mut rng, sx + width, height, 8).unwrap();
        let dst = random_bitmap(&mut rng, dx + width, height, 8).unwrap();
        for table in &tables {
            let ok = check_blit(table, rop, &dst, dx, &src.view_at(sx, 0), width, height);
            rp.compare_values(1.0, if ok { 1.0 } else { 0.0 }, 0.0);
        }
    }

    assert!(rp.cleanup());
}
