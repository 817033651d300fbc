#![doc(html_root_url = "https://docs.rs/h264-sei/0.1.0")]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![deny(missing_docs)]
#![deny(rustdoc::missing_crate_level_docs)]

//! # h264-sei - H.264 SEI message decoding
//!
//! `h264-sei` decodes the Supplemental Enhancement Information messages an
//! H.264 stream interleaves with its coded pictures: display and removal
//! timing, stereo frame packing, display orientation, HDR mastering and
//! light-level metadata, closed captions, film grain synthesis parameters,
//! recovery points, and vendor user data.
//!
//! The crate sits between a NAL demuxer and the picture pipeline: the caller
//! hands it one clean SEI payload at a time (start codes and emulation
//! prevention already removed) together with a snapshot of the active
//! parameter set, and reads the typed records off a [`SeiContext`] it owns.
//!
//! ## Quick start
//!
//! ```
//! use h264_sei::{ParameterContext, SeiContext};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let mut ctx = SeiContext::new();
//!
//! // normally parsed out of the active SPS by the caller
//! let params = ParameterContext::default();
//!
//! // one SEI NAL payload: a recovery point message
//! let payload = [0x06, 0x01, 0x80, 0x80];
//! ctx.decode(&payload, &params)?;
//!
//! assert_eq!(ctx.recovery_point.recovery_frame_cnt(), 0);
//! # Ok(())
//! # }
//! ```
//!
//! ## Lifecycle
//!
//! One `SeiContext` per decoding context, owned by the caller. Call
//! [`SeiContext::decode`] for every SEI NAL and [`SeiContext::reset`] once
//! per picture boundary; the reset clears transient records while keeping
//! the stream-level ones (previous timecode values, the frame packing cancel
//! history, the detected encoder build, HDR and film grain metadata).
//!
//! Picture timing is decoded in two phases because its delay field widths
//! live in the SPS rather than the message: decode captures the raw bits,
//! and [`sei::process_picture_timing`] derives the final
//! `cpb_removal_delay` / `dpb_output_delay` once the output-time parameter
//! set is known.
//!
//! ## Module overview
//!
//! - `sei`: the message dispatcher, per-type decoders, and record types
//! - `params`: the [`ParameterContext`] snapshot of the active SPS
//! - `utils`: the [`BitReader`](utils::BitReader) bitstream cursor
//! - `error`: error types and the crate [`Result`] alias

/// Error types and utilities
pub mod error;

/// Active parameter set snapshot consumed by the decoders
pub mod params;

/// SEI message decoding: dispatcher, decoders, record types
pub mod sei;

/// Bitstream reading utilities
pub mod utils;

pub use error::{Result, SeiError};
pub use params::ParameterContext;
pub use sei::{process_picture_timing, SeiContext};
