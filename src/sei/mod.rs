//! # H.264 SEI message decoding
//!
//! Supplemental Enhancement Information NAL units carry auxiliary metadata
//! alongside coded pictures: display timing, stereo packing hints, HDR colour
//! volume, closed captions, film grain synthesis parameters. This module
//! walks one SEI NAL payload at a time, decoding each message into a typed
//! record on a caller-owned [`SeiContext`].
//!
//! ## Example
//!
//! ```
//! use h264_sei::{ParameterContext, SeiContext};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let mut ctx = SeiContext::new();
//! let params = ParameterContext::default();
//!
//! // recovery point message: type 6, 1 byte, recovery_frame_cnt = 0
//! let payload = [0x06, 0x01, 0x80, 0x80];
//! ctx.decode(&payload, &params)?;
//!
//! assert_eq!(ctx.recovery_point.recovery_frame_cnt(), 0);
//!
//! // call once per picture boundary, not once per NAL
//! ctx.reset();
//! assert_eq!(ctx.recovery_point.recovery_frame_cnt(), -1);
//! # Ok(())
//! # }
//! ```
//!
//! Decoding is synchronous and single-threaded per context. Concurrent
//! streams each get their own `SeiContext`; sharing one across decoding
//! contexts is a correctness violation.

/// Dispatcher and fixed-layout message decoders
pub mod parser;

/// Record types for every decoded message
pub mod types;

/// Film grain characteristics decoder
mod film_grain;

/// Picture timing decoding and post-processing
mod timing;

/// Registered and unregistered user data decoders
mod user_data;

pub use timing::process_picture_timing;
pub use types::*;

/// Aggregate of the most recently decoded instance of every SEI message
/// type, plus the fields that deliberately carry over between pictures.
///
/// One instance per decoding context, owned by the caller and passed by
/// reference into every decode call.
#[derive(Debug, Clone, Default)]
pub struct SeiContext {
    /// Picture timing record, including the retained raw payload.
    pub picture_timing: PictureTiming,
    /// Active format description.
    pub afd: Afd,
    /// A/53 closed caption buffer.
    pub a53_caption: A53Caption,
    /// Unregistered user data payloads and encoder detection.
    pub unregistered: Unregistered,
    /// Recovery point record.
    pub recovery_point: RecoveryPoint,
    /// Buffering period record.
    pub buffering_period: BufferingPeriod,
    /// Frame packing arrangement record.
    pub frame_packing: FramePacking,
    /// Display orientation record.
    pub display_orientation: DisplayOrientation,
    /// Green metadata record.
    pub green_metadata: GreenMetadata,
    /// Alternative transfer characteristics record.
    pub alternative_transfer: AlternativeTransfer,
    /// Film grain characteristics record.
    pub film_grain_characteristics: FilmGrainCharacteristics,
    /// Mastering display colour volume record.
    pub mastering_display: MasteringDisplay,
    /// Content light level record.
    pub content_light: ContentLight,
}

impl SeiContext {
    /// Creates an empty context: every record absent, every sentinel at its
    /// never-received value.
    pub fn new() -> Self {
        SeiContext::default()
    }

    /// Per-picture reset. Call once at each picture boundary, not once per
    /// NAL: an access unit may carry several SEI NALs whose effects
    /// accumulate.
    ///
    /// Clears the transient per-picture fields and releases this context's
    /// buffer references. Stream-level records survive: the previous timecode
    /// values (timecode tracks may omit unchanged fields), the frame packing
    /// cancel history, the detected x264 build, the alternative transfer
    /// hint, and the HDR and film grain metadata (in force until replaced or
    /// canceled, not re-sent per picture).
    pub fn reset(&mut self) {
        self.recovery_point.frame_cnt = None;
        self.picture_timing.present = false;
        self.picture_timing.dpb_output_delay = 0;
        self.picture_timing.cpb_removal_delay = 0;
        self.picture_timing.timecode_cnt = 0;
        self.buffering_period.present = false;
        self.frame_packing.present = false;
        self.display_orientation.present = false;
        self.afd.present = false;
        self.a53_caption.buf = None;
        // Drops this context's references; a consumer holding clones keeps
        // the buffers alive.
        self.unregistered.buffers.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::Bytes;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_reset_clears_transient_fields() {
        let mut ctx = SeiContext::new();
        ctx.recovery_point.frame_cnt = Some(3);
        ctx.picture_timing.present = true;
        ctx.picture_timing.timecode_cnt = 2;
        ctx.buffering_period.present = true;
        ctx.frame_packing.present = true;
        ctx.afd.present = true;
        ctx.a53_caption.buf = Some(Bytes::from_static(b"cc"));
        ctx.unregistered.buffers.push(Bytes::from_static(b"data"));

        ctx.reset();

        assert_eq!(ctx.recovery_point.recovery_frame_cnt(), -1);
        assert!(!ctx.picture_timing.present);
        assert_eq!(ctx.picture_timing.timecode_cnt, 0);
        assert!(!ctx.buffering_period.present);
        assert!(!ctx.frame_packing.present);
        assert!(!ctx.afd.present);
        assert!(ctx.a53_caption.buf.is_none());
        assert!(ctx.unregistered.buffers.is_empty());
    }

    #[test]
    fn test_reset_preserves_carryover_fields() {
        let mut ctx = SeiContext::new();
        ctx.picture_timing.timecode[0].hours = 10;
        ctx.picture_timing.timecode[0].minutes = 30;
        ctx.frame_packing.cancel = ArrangementCancel::Active;
        ctx.unregistered.x264_build = Some(164);
        ctx.alternative_transfer.present = true;
        ctx.alternative_transfer.preferred_transfer_characteristics = 18;
        ctx.mastering_display.present = true;
        ctx.mastering_display.max_luminance = 10_000_000;
        ctx.content_light.present = true;
        ctx.content_light.max_content_light_level = 1000;
        ctx.film_grain_characteristics.present = true;
        ctx.film_grain_characteristics.log2_scale_factor = 4;

        ctx.reset();

        assert_eq!(ctx.picture_timing.timecode[0].hours, 10);
        assert_eq!(ctx.picture_timing.timecode[0].minutes, 30);
        assert_eq!(ctx.frame_packing.cancel_flag(), 0);
        assert_eq!(ctx.unregistered.x264_build, Some(164));
        assert!(ctx.alternative_transfer.present);
        // HDR and grain metadata stay in force until replaced or canceled
        assert!(ctx.mastering_display.present);
        assert_eq!(ctx.mastering_display.max_luminance, 10_000_000);
        assert!(ctx.content_light.present);
        assert_eq!(ctx.content_light.max_content_light_level, 1000);
        assert!(ctx.film_grain_characteristics.present);
        assert_eq!(ctx.film_grain_characteristics.log2_scale_factor, 4);
    }

    #[test]
    fn test_caption_buffer_outlives_reset() {
        let mut ctx = SeiContext::new();
        ctx.a53_caption.buf = Some(Bytes::from_static(b"caption data"));

        // a frame attached to this buffer keeps its own reference
        let held = ctx.a53_caption.buf.clone().unwrap();
        ctx.reset();

        assert!(ctx.a53_caption.buf.is_none());
        assert_eq!(&held[..], b"caption data");
    }
}
