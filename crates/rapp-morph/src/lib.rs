//! rapp-morph - Binary morphology by structuring-element decomposition
//!
//! Erosion and dilation with large structuring elements are computed as a
//! sequence of small atoms. Logarithmic decomposition keeps the number of
//! steps at most seven for elements up to 63x63 pixels, and perimeter-only
//! atoms keep each step cheap.
//!
//! # Supported Operations
//!
//! - Rectangles 1x1 to 63x63 ([`erode_rect`], [`dilate_rect`])
//! - Diamonds, octagons and discs of radius 2 to 32 ([`erode_diamond`],
//!   [`erode_octagon`], [`erode_disc`] and the dilations)
//! - Generic entry point ([`morph`]) and working buffer size ([`worksize`])
//! - Introspection ([`plan`], [`footprint`])
//!
//! The caller pads the source before the call; the engine only reads the
//! padding and never writes it.
//!
//! # Example
//!
//! ```
//! use rapp_core::{AlignedBuf, Bitmap};
//! use rapp_morph::{Morph, Shape, morph, worksize};
//!
//! let mut src = Bitmap::with_margin(32, 8, 16).unwrap();
//! src.set(10, 4, true);
//! let mut dst = Bitmap::with_margin(32, 8, 16).unwrap();
//! let mut work = AlignedBuf::new(worksize(32, 8));
//! let shape = Shape::Rect { width: 3, height: 3 };
//! morph(Morph::Dilate, &mut dst.raster_mut(), &src.raster(), 32, 8, shape, work.as_mut_slice())
//!     .unwrap();
//! assert_eq!(dst.count(), 9);
//! ```

pub mod atom;
mod engine;
pub mod kernel;
pub mod scratch;
pub mod shape;
pub mod tables;

pub use atom::{Atom, Family, Offset};
pub use kernel::Morph;
pub use scratch::worksize;
pub use shape::{
    Plan, Shape, dilate_diamond, dilate_disc, dilate_octagon, dilate_rect, erode_diamond,
    erode_disc, erode_octagon, erode_rect, footprint, morph, plan,
};
pub use tables::{DISC_AREA, OCTAGON_AREA, Sequence};
