//! RAPP - Raster processing primitives for binary images
//!
//! This crate gathers the workspace behind one context type and exports the
//! C ABI of the library.
//!
//! # Overview
//!
//! - Bitblt with twelve raster operations at any bit alignment
//! - Constant and clamped border padding
//! - Erosion and dilation with rectangles, diamonds, octagons and discs
//!
//! # Example
//!
//! ```
//! use rapp::{AlignedBuf, Bitmap, Rapp, Shape};
//!
//! let rapp = Rapp::new();
//! let mut src = Bitmap::with_margin(40, 10, 16).unwrap();
//! src.set(20, 5, true);
//! let mut dst = Bitmap::with_margin(40, 10, 16).unwrap();
//! let mut work = AlignedBuf::new(rapp.worksize(40, 10).unwrap());
//! rapp.dilate(&mut dst.raster_mut(), &src.raster(), 40, 10, Shape::Diamond(3), work.as_mut_slice())
//!     .unwrap();
//! assert_eq!(dst.count(), 13);
//! ```

pub mod context;
pub mod ffi;

pub use context::{FORCE_WORD_ENV, Rapp};

// Re-export core types
pub use rapp_core::{
    ALIGNMENT, AlignedBuf, Bitmap, Error, Raster, RasterMut, Result, error_string,
};

// Re-export domain crates as modules to avoid name conflicts
pub use rapp_bitblt as bitblt;
pub use rapp_morph as morph;

pub use rapp_bitblt::{Rop, ScoreTable, VariantTable};
pub use rapp_morph::{Morph, Shape};
