//! RAPP Core - Buffers, errors and the vector abstraction
//!
//! This crate provides the building blocks shared by the raster-operation
//! dispatcher and the morphology engine:
//!
//! - [`Error`] / [`Result`] - Status codes shared with the C ABI
//! - [`platform`] - Alignment constants and helpers
//! - [`AlignedBuf`] - Heap buffer with an aligned first byte
//! - [`Raster`] / [`RasterMut`] - Binary image views over caller slices
//! - [`Bitmap`] - Owned binary image with padding margins
//! - [`pad_const`] / [`pad_clamp`] - Border padding
//! - [`overlap`] - Access-window overlap checks for raw buffers
//! - [`vector`] - Portable vector contract and SWAR backends
//!
//! # See also
//!
//! `rappcompute.h`, `rc_platform.h`, `rapp_error.h`

pub mod bitmap;
pub mod buffer;
pub mod error;
pub mod overlap;
pub mod pad;
pub mod platform;
pub mod raster;
pub mod vector;

pub use bitmap::Bitmap;
pub use buffer::AlignedBuf;
pub use error::{Error, Result, error_string, status};
pub use overlap::{Window, disjoint};
pub use pad::{pad_clamp, pad_const, pad_window};
pub use platform::{ALIGNMENT, NATIVE_SIZE, align, is_aligned};
pub use raster::{Raster, RasterMut};
pub use vector::{Caps, Swar, UnalignedLoads, VecScope, Vector, Wide};
