//! Common utilities shared by the SEI decoders.
//!
//! The [`bits::BitReader`] is the sequential cursor every decoder parses
//! through: fixed-width reads, exp-Golomb codes, and a bits-remaining query
//! over an in-memory payload.

/// Bit-level reading over byte buffers
pub mod bits;

pub use bits::BitReader;
