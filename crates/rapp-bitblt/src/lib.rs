//! rapp-bitblt - Raster operation dispatcher for RAPP
//!
//! This crate blits one binary image onto another with any of twelve
//! boolean raster operations. Both buffers may start at any byte and bit
//! position; the dispatcher classifies their relative alignment and picks a
//! kernel tier per class from a score-driven variant table.
//!
//! # Supported Operations
//!
//! - Raster operations: copy, not, and, or, xor, nand, nor, xnor, andn,
//!   orn, nandn, norn ([`Rop`])
//! - Alignment classification ([`classify`], [`AlignClass`])
//! - Kernel tiers and tuning scores ([`Tier`], [`ScoreTable`])
//! - Variant selection ([`VariantTable`])
//! - Blitting ([`bitblt`]) and the aligned copy used by morphology
//!   ([`copy_aligned`])
//!
//! # Example
//!
//! ```
//! use rapp_bitblt::{Rop, VariantTable, bitblt};
//! use rapp_core::Bitmap;
//!
//! let table = VariantTable::default();
//! let src = Bitmap::from_rows(&["1101"], 1).unwrap();
//! let mut dst = Bitmap::with_margin(8, 1, 1).unwrap();
//! let mut view = dst.view_at_mut(3, 0);
//! bitblt(&table, Rop::Copy, &mut view, &src.raster(), 4, 1).unwrap();
//! assert!(dst.get(3, 0) && dst.get(4, 0) && !dst.get(5, 0));
//! ```

pub mod align;
pub mod dispatch;
pub mod kernel;
pub mod rop;
pub mod table;
pub mod tune;

pub use align::{AlignClass, classify};
pub use dispatch::{bitblt, copy_aligned};
pub use kernel::Tier;
pub use rop::Rop;
pub use table::{VariantTable, Variants};
pub use tune::ScoreTable;
