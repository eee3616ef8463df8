//! Initialization regression test
//!
//! The initialization flag is process-wide, so this file holds a single
//! test and runs in its own process.
//!
//! Run with:
//! ```
//! cargo test -p rapp --test uninit_reg
//! ```

use rapp::AlignedBuf;
use rapp::ffi::*;
use rapp_test::RegParams;

#[test]
fn uninit_reg() {
    let mut rp = RegParams::new("uninit");
    let mut a = AlignedBuf::new(64);
    let b = AlignedBuf::new(64);
    let ap = a.as_mut_slice().as_mut_ptr();
    let bp = b.as_slice().as_ptr();

    // Rejected before any argument check, even the overlap check
    let code = unsafe { rapp_bitblt_xor_bin(ap, 16, 0, ap, 16, 0, 8, 1) };
    rp.compare_values(-8.0, code as f64, 0.0);
    rp.compare_values(-8.0, rapp_morph_worksize_bin(8, 8) as f64, 0.0);
    let code = unsafe { rapp_pad_const_bin(std::ptr::null_mut(), 16, 0, 8, 1, 1, 0) };
    rp.compare_values(-8.0, code as f64, 0.0);

    rapp_initialize();
    let code = unsafe { rapp_bitblt_xor_bin(ap, 16, 0, bp, 16, 0, 8, 1) };
    rp.compare_values(0.0, code as f64, 0.0);

    rapp_terminate();
    let code = unsafe { rapp_bitblt_xor_bin(ap, 16, 0, bp, 16, 0, 8, 1) };
    rp.compare_values(-8.0, code as f64, 0.0);

    assert!(rp.cleanup(), "uninit regression test failed");
}
