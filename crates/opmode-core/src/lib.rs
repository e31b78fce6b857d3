//! Core types and primitives for operating-mode discovery
//!
//! This crate holds the pieces every stage of the segmentation pipeline
//! shares:
//!
//! - **Errors**: a single [`Error`] type with a [`Result`] alias
//! - **Statistics**: mean, population standard deviation, least-squares
//!   slope and the difference-based noise ratio, all total functions
//! - **Segments**: inclusive `[start, end]` intervals and boolean masks
//! - **Regions**: extraction of maximal `true` runs from a mask
//!
//! # Example
//!
//! ```rust
//! use opmode_core::{extract_contiguous_regions, stats, Segment};
//!
//! let flat = vec![4.2; 40];
//! assert_eq!(stats::linear_slope(&flat), 0.0);
//!
//! let mask = vec![true; 40];
//! assert_eq!(extract_contiguous_regions(&mask, 20), vec![Segment::new(0, 39)]);
//! ```

pub mod error;
pub mod regions;
pub mod segment;
pub mod stats;

// Re-export core types
pub use error::{Error, Result};
pub use regions::{extract_contiguous_regions, split_at_flags};
pub use segment::{intersect_mask, mask_from_segments, total_length, Segment};

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
