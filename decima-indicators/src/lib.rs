#![deny(missing_docs)]
#![doc = include_str!("../README.md")]

//! Composable technical indicators evaluated over fixed decimal windows.

/// The closed set of indicator kinds.
pub mod any;
/// Tagged JSON encoding and decoding.
pub mod codec;
/// Foundational traits and shared abstractions.
pub mod core;
/// Built-in indicator implementations.
pub mod indicators;
/// Dispersion statistics.
pub mod stats;
/// Trailing-window extraction.
pub mod window;

/// Re-export of the indicator sum type.
pub use crate::any::AnyIndicator;
/// Re-export of the codec entry points.
pub use crate::codec::{decode, decode_value, encode, encode_value, registered_tags, Codec};
/// Re-export of the core trait and error type to make the crate easy to consume.
pub use crate::core::{Indicator, IndicatorError, IndicatorResult};
/// Re-export of the window utility.
pub use crate::window::resize;
