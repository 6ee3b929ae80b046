//! Binary pixel masks and the string codec used for bitmap labels.
//!
//! The wire format is base64 over a zlib-compressed grayscale PNG; any
//! non-zero pixel counts as set. Encoding is byte-stable: the same mask
//! always produces the same string, so rewriting an unchanged label is
//! a no-op on disk.

pub mod codec;
pub mod mask;

pub use codec::{decode, encode, CodecError};
pub use mask::{Mask, MaskBounds};
