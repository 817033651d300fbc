use bytes::Bytes;

/// Largest picture timing payload the raw capture keeps: the standard bounds
/// pic_timing to under 320 bits.
pub const MAX_PIC_TIMING_BYTES: usize = 40;

/// SEI payload types this crate decodes. Ids follow the H.264 message
/// catalog (Annex D).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeiPayloadType {
    /// HRD initial removal delays (type 0)
    BufferingPeriod,
    /// Picture structure, delays and clock timestamps (type 1)
    PicTiming,
    /// ITU-T T.35 registered user data (type 4)
    UserDataRegistered,
    /// UUID-prefixed vendor user data (type 5)
    UserDataUnregistered,
    /// Random access recovery point (type 6)
    RecoveryPoint,
    /// Film grain synthesis parameters (type 19)
    FilmGrainCharacteristics,
    /// Stereo 3D packing layout (type 45)
    FramePackingArrangement,
    /// Rotation and flip hints (type 47)
    DisplayOrientation,
    /// Encoder complexity statistics (type 56)
    GreenMetadata,
    /// HDR mastering display colour volume (type 137)
    MasteringDisplayColourVolume,
    /// HDR content light levels (type 144)
    ContentLightLevel,
    /// Preferred transfer function override (type 147)
    AlternativeTransferCharacteristics,
}

impl SeiPayloadType {
    /// Maps a payload type id to a known message type, `None` for the many
    /// catalog entries this crate skips.
    pub fn from_id(id: u32) -> Option<SeiPayloadType> {
        match id {
            0 => Some(SeiPayloadType::BufferingPeriod),
            1 => Some(SeiPayloadType::PicTiming),
            4 => Some(SeiPayloadType::UserDataRegistered),
            5 => Some(SeiPayloadType::UserDataUnregistered),
            6 => Some(SeiPayloadType::RecoveryPoint),
            19 => Some(SeiPayloadType::FilmGrainCharacteristics),
            45 => Some(SeiPayloadType::FramePackingArrangement),
            47 => Some(SeiPayloadType::DisplayOrientation),
            56 => Some(SeiPayloadType::GreenMetadata),
            137 => Some(SeiPayloadType::MasteringDisplayColourVolume),
            144 => Some(SeiPayloadType::ContentLightLevel),
            147 => Some(SeiPayloadType::AlternativeTransferCharacteristics),
            _ => None,
        }
    }
}

/// pic_struct in the picture timing SEI message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PicStructType {
    /// Progressive frame
    #[default]
    Frame = 0,
    /// Top field only
    TopField = 1,
    /// Bottom field only
    BottomField = 2,
    /// Top field, bottom field, in that order
    TopBottom = 3,
    /// Bottom field, top field, in that order
    BottomTop = 4,
    /// Top field, bottom field, top field repeated
    TopBottomTop = 5,
    /// Bottom field, top field, bottom field repeated
    BottomTopBottom = 6,
    /// Frame doubling
    FrameDoubling = 7,
    /// Frame tripling
    FrameTripling = 8,
}

impl PicStructType {
    /// Maps the 4-bit pic_struct field; values 9..15 are reserved.
    pub fn from_value(value: u32) -> Option<PicStructType> {
        match value {
            0 => Some(PicStructType::Frame),
            1 => Some(PicStructType::TopField),
            2 => Some(PicStructType::BottomField),
            3 => Some(PicStructType::TopBottom),
            4 => Some(PicStructType::BottomTop),
            5 => Some(PicStructType::TopBottomTop),
            6 => Some(PicStructType::BottomTopBottom),
            7 => Some(PicStructType::FrameDoubling),
            8 => Some(PicStructType::FrameTripling),
            _ => None,
        }
    }

    /// NumClockTS: how many clock timestamps this picture structure carries
    /// (Table D-1).
    pub fn num_clock_ts(self) -> usize {
        match self {
            PicStructType::Frame | PicStructType::TopField | PicStructType::BottomField => 1,
            PicStructType::TopBottom
            | PicStructType::BottomTop
            | PicStructType::FrameDoubling => 2,
            PicStructType::TopBottomTop
            | PicStructType::BottomTopBottom
            | PicStructType::FrameTripling => 3,
        }
    }
}

/// frame_packing_arrangement_type values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FpaType {
    /// Checkerboard interleaving
    #[default]
    Checkerboard = 0,
    /// Column interleaving
    ColumnInterleave = 1,
    /// Row interleaving
    RowInterleave = 2,
    /// Side-by-side packing
    SideBySide = 3,
    /// Top-bottom packing
    TopBottom = 4,
    /// Temporal (frame-alternating) interleaving
    TemporalInterleave = 5,
    /// Plain 2D, no packing
    TwoDimensional = 6,
}

impl FpaType {
    /// Maps the 7-bit arrangement type field; values above 6 are reserved.
    pub fn from_value(value: u32) -> Option<FpaType> {
        match value {
            0 => Some(FpaType::Checkerboard),
            1 => Some(FpaType::ColumnInterleave),
            2 => Some(FpaType::RowInterleave),
            3 => Some(FpaType::SideBySide),
            4 => Some(FpaType::TopBottom),
            5 => Some(FpaType::TemporalInterleave),
            6 => Some(FpaType::TwoDimensional),
            _ => None,
        }
    }
}

/// History of the frame packing arrangement cancel flag. An explicit cancel
/// and a never-received arrangement both mean "no active packing", but
/// downstream stereo handling treats them differently.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ArrangementCancel {
    /// No frame packing message seen on this stream yet.
    #[default]
    NeverReceived,
    /// An arrangement is in force (last message had cancel = 0).
    Active,
    /// The last message explicitly canceled the arrangement.
    Canceled,
}

impl ArrangementCancel {
    /// The FFmpeg-compatible sentinel form: -1 never received, 0 active,
    /// 1 canceled.
    pub fn flag(self) -> i32 {
        match self {
            ArrangementCancel::NeverReceived => -1,
            ArrangementCancel::Active => 0,
            ArrangementCancel::Canceled => 1,
        }
    }
}

/// One Annex D clock timestamp from a picture timing message.
///
/// When a message omits the high-order fields (no seconds_flag and below),
/// the previous timestamp's values deliberately remain in place: a timecode
/// track may skip unchanged fields across messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TimeCode {
    /// full_timestamp_flag of the message that last wrote this slot.
    pub full: bool,
    /// n_frames
    pub frame: u32,
    /// seconds_value, 0..=59
    pub seconds: u32,
    /// minutes_value, 0..=59
    pub minutes: u32,
    /// hours_value, 0..=23
    pub hours: u32,
    /// Derived from cnt_dropped_flag for drop-frame counting types.
    pub dropframe: bool,
}

/// Picture timing SEI record.
///
/// The raw payload is retained verbatim because the delay field widths come
/// from the SPS active at *output* time, which may differ from the one
/// active when the message was decoded. [`process_picture_timing`] re-parses
/// it on demand.
///
/// [`process_picture_timing`]: crate::sei::process_picture_timing
#[derive(Debug, Clone, Default)]
pub struct PictureTiming {
    /// Raw message bytes, at most [`MAX_PIC_TIMING_BYTES`].
    pub payload: Vec<u8>,
    /// Bit length of the raw payload.
    pub payload_size_bits: usize,
    /// A picture timing message was decoded for the current picture.
    pub present: bool,
    /// Picture structure; keeps the last valid value on reserved input.
    pub pic_struct: PicStructType,
    /// Bit set of ct_type values seen across the clock timestamps.
    pub ct_type: u32,
    /// dpb_output_delay, valid after post-processing (H.264 C.2.2).
    pub dpb_output_delay: u32,
    /// cpb_removal_delay, valid after post-processing (H.264 C.1.2).
    pub cpb_removal_delay: u32,
    /// Up to three timecodes; slots persist across pictures for carryover.
    pub timecode: [TimeCode; 3],
    /// Number of timecodes the current message carried.
    pub timecode_cnt: usize,
}

/// Active format description, delivered via registered user data (DTG1).
#[derive(Debug, Clone, Copy, Default)]
pub struct Afd {
    /// An AFD code was decoded for the current picture.
    pub present: bool,
    /// The 4-bit active_format code.
    pub active_format_description: u8,
}

/// A/53 closed caption payload from registered user data (GA94).
#[derive(Debug, Clone, Default)]
pub struct A53Caption {
    /// The caption bytes; replaced wholesale by each new caption message.
    /// `Bytes` is reference counted, so a consumer's clone outlives the
    /// replacement here.
    pub buf: Option<Bytes>,
}

/// Unregistered (vendor-specific) user data payloads.
#[derive(Debug, Clone, Default)]
pub struct Unregistered {
    /// x264 build number detected in a payload banner, if any. Survives the
    /// per-picture reset; it is a property of the stream's encoder.
    pub x264_build: Option<u32>,
    /// Payloads in arrival order; one access unit may carry several.
    pub buffers: Vec<Bytes>,
}

/// Recovery point SEI record.
#[derive(Debug, Clone, Copy, Default)]
pub struct RecoveryPoint {
    /// Frames until playback synchronizes after joining at this picture.
    pub frame_cnt: Option<u32>,
}

impl RecoveryPoint {
    /// Sentinel form: -1 when no recovery point message was seen.
    pub fn recovery_frame_cnt(&self) -> i32 {
        self.frame_cnt.map_or(-1, |v| v as i32)
    }
}

/// Buffering period SEI record.
#[derive(Debug, Clone, Copy)]
pub struct BufferingPeriod {
    /// A buffering period message was decoded.
    pub present: bool,
    /// initial_cpb_removal_delay per coded picture buffer; the standard
    /// allows at most 32 CPBs.
    pub initial_cpb_removal_delay: [u32; 32],
}

impl Default for BufferingPeriod {
    fn default() -> Self {
        BufferingPeriod {
            present: false,
            initial_cpb_removal_delay: [0; 32],
        }
    }
}

/// Frame packing arrangement (stereo 3D) SEI record.
#[derive(Debug, Clone, Copy, Default)]
pub struct FramePacking {
    /// An arrangement is active for the current picture.
    pub present: bool,
    /// frame_packing_arrangement_id
    pub arrangement_id: u32,
    /// Cancel history; see [`ArrangementCancel`].
    pub cancel: ArrangementCancel,
    /// Packing layout; keeps the last valid value on reserved input.
    pub arrangement_type: FpaType,
    /// frame_packing_arrangement_repetition_period
    pub arrangement_repetition_period: u32,
    /// content_interpretation_type (2 means right-view-first)
    pub content_interpretation_type: u32,
    /// quincunx_sampling_flag
    pub quincunx_sampling_flag: bool,
    /// current_frame_is_frame0_flag
    pub current_frame_is_frame0_flag: bool,
}

impl FramePacking {
    /// Sentinel form of the cancel flag: -1 never received, 0 active,
    /// 1 canceled.
    pub fn cancel_flag(&self) -> i32 {
        self.cancel.flag()
    }

    /// Human-readable stereo mode label for the decoded arrangement,
    /// matching the names FFmpeg attaches to Matroska StereoMode.
    ///
    /// Returns `None` when no arrangement was ever received; an explicit
    /// cancel yields `"mono"`.
    pub fn stereo_mode(&self) -> Option<&'static str> {
        match self.cancel {
            ArrangementCancel::NeverReceived => None,
            ArrangementCancel::Canceled => Some("mono"),
            ArrangementCancel::Active => {
                let rl = self.content_interpretation_type == 2;
                Some(match self.arrangement_type {
                    FpaType::Checkerboard if rl => "checkerboard_rl",
                    FpaType::Checkerboard => "checkerboard_lr",
                    FpaType::ColumnInterleave if rl => "col_interleaved_rl",
                    FpaType::ColumnInterleave => "col_interleaved_lr",
                    FpaType::RowInterleave if rl => "row_interleaved_rl",
                    FpaType::RowInterleave => "row_interleaved_lr",
                    FpaType::SideBySide if self.quincunx_sampling_flag && rl => {
                        "side_by_side_quincunx_rl"
                    }
                    FpaType::SideBySide if self.quincunx_sampling_flag => {
                        "side_by_side_quincunx_lr"
                    }
                    FpaType::SideBySide if rl => "side_by_side_rl",
                    FpaType::SideBySide => "side_by_side_lr",
                    FpaType::TopBottom if rl => "top_bottom_rl",
                    FpaType::TopBottom => "top_bottom_lr",
                    FpaType::TemporalInterleave if rl => "block_rl",
                    FpaType::TemporalInterleave => "block_lr",
                    FpaType::TwoDimensional => "mono",
                })
            }
        }
    }
}

/// Display orientation SEI record.
#[derive(Debug, Clone, Copy, Default)]
pub struct DisplayOrientation {
    /// An orientation hint is active.
    pub present: bool,
    /// Rotation in units of 2^-16 turns, anticlockwise.
    pub anticlockwise_rotation: u32,
    /// hor_flip
    pub hflip: bool,
    /// ver_flip
    pub vflip: bool,
}

/// Green metadata SEI record (encoder complexity statistics).
///
/// Percentages are conceptually 0..=100 but the wire format is a plain byte;
/// values are stored as received.
#[derive(Debug, Clone, Copy, Default)]
pub struct GreenMetadata {
    /// 0 = complexity metrics, 1 = XSD metric.
    pub green_metadata_type: u8,
    /// Granularity of the statistics period.
    pub period_type: u8,
    /// Period in seconds when period_type is 2.
    pub num_seconds: u16,
    /// Period in pictures when period_type is 3.
    pub num_pictures: u16,
    /// percent_non_zero_macroblocks
    pub percent_non_zero_macroblocks: u8,
    /// percent_intra_coded_macroblocks
    pub percent_intra_coded_macroblocks: u8,
    /// percent_six_tap_filtering
    pub percent_six_tap_filtering: u8,
    /// percent_alpha_point_deblocking_instance
    pub percent_alpha_point_deblocking_instance: u8,
    /// Quality metric kind when green_metadata_type is 1 (0 = PSNR).
    pub xsd_metric_type: u8,
    /// Metric value in the XSD representation.
    pub xsd_metric_value: u16,
}

/// Alternative transfer characteristics SEI record.
#[derive(Debug, Clone, Copy, Default)]
pub struct AlternativeTransfer {
    /// A preferred transfer function was signalled.
    pub present: bool,
    /// preferred_transfer_characteristics code.
    pub preferred_transfer_characteristics: u8,
}

/// One intensity interval of a film grain component model.
#[derive(Debug, Clone, Default)]
pub struct IntensityInterval {
    /// intensity_interval_lower_bound
    pub lower_bound: u8,
    /// intensity_interval_upper_bound
    pub upper_bound: u8,
    /// comp_model_value, up to 6 signed coefficients.
    pub model_values: Vec<i16>,
}

/// Per-component film grain model.
#[derive(Debug, Clone, Default)]
pub struct FilmGrainComponent {
    /// comp_model_present_flag; when false the interval list stays empty.
    pub present: bool,
    /// num_model_values, 1..=6, shared by every interval of this component.
    pub num_model_values: u8,
    /// Up to 256 intensity intervals.
    pub intervals: Vec<IntensityInterval>,
}

/// Film grain characteristics SEI record.
#[derive(Debug, Clone, Default)]
pub struct FilmGrainCharacteristics {
    /// A grain model is active (cancel flag was 0).
    pub present: bool,
    /// film_grain_model_id
    pub model_id: u8,
    /// separate_colour_description_present_flag
    pub separate_colour_description_present: bool,
    /// film_grain_bit_depth_luma (already +8)
    pub bit_depth_luma: u8,
    /// film_grain_bit_depth_chroma (already +8)
    pub bit_depth_chroma: u8,
    /// film_grain_full_range_flag
    pub full_range: bool,
    /// film_grain_colour_primaries
    pub color_primaries: u8,
    /// film_grain_transfer_characteristics
    pub transfer_characteristics: u8,
    /// film_grain_matrix_coefficients
    pub matrix_coeffs: u8,
    /// blending_mode_id
    pub blending_mode_id: u8,
    /// log2_scale_factor
    pub log2_scale_factor: u8,
    /// Per colour component models; interval counts are independent.
    pub components: [FilmGrainComponent; 3],
    /// film_grain_characteristics_repetition_period
    pub repetition_period: u32,
}

/// Mastering display colour volume SEI record.
#[derive(Debug, Clone, Copy, Default)]
pub struct MasteringDisplay {
    /// HDR mastering metadata was decoded.
    pub present: bool,
    /// Chromaticity of the three primaries, (x, y) in 0.00002 units.
    pub display_primaries: [[u16; 2]; 3],
    /// White point chromaticity, same units.
    pub white_point: [u16; 2],
    /// Max luminance in 0.0001 cd/m^2 units.
    pub max_luminance: u32,
    /// Min luminance in 0.0001 cd/m^2 units.
    pub min_luminance: u32,
}

/// Content light level SEI record.
#[derive(Debug, Clone, Copy, Default)]
pub struct ContentLight {
    /// Light level metadata was decoded.
    pub present: bool,
    /// max_content_light_level in cd/m^2.
    pub max_content_light_level: u16,
    /// max_pic_average_light_level in cd/m^2.
    pub max_pic_average_light_level: u16,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_payload_type_catalog() {
        assert_eq!(SeiPayloadType::from_id(0), Some(SeiPayloadType::BufferingPeriod));
        assert_eq!(SeiPayloadType::from_id(1), Some(SeiPayloadType::PicTiming));
        assert_eq!(SeiPayloadType::from_id(5), Some(SeiPayloadType::UserDataUnregistered));
        assert_eq!(SeiPayloadType::from_id(19), Some(SeiPayloadType::FilmGrainCharacteristics));
        assert_eq!(SeiPayloadType::from_id(144), Some(SeiPayloadType::ContentLightLevel));
        // pan-scan rect is in the catalog but not decoded here
        assert_eq!(SeiPayloadType::from_id(2), None);
        assert_eq!(SeiPayloadType::from_id(1000), None);
    }

    #[test]
    fn test_num_clock_ts_table() {
        let expected = [1, 1, 1, 2, 2, 3, 3, 2, 3];
        for (value, want) in expected.into_iter().enumerate() {
            let ps = PicStructType::from_value(value as u32).unwrap();
            assert_eq!(ps.num_clock_ts(), want, "pic_struct {}", value);
        }
        assert_eq!(PicStructType::from_value(9), None);
        assert_eq!(PicStructType::from_value(15), None);
    }

    #[test]
    fn test_cancel_sentinels() {
        assert_eq!(ArrangementCancel::NeverReceived.flag(), -1);
        assert_eq!(ArrangementCancel::Active.flag(), 0);
        assert_eq!(ArrangementCancel::Canceled.flag(), 1);

        let rp = RecoveryPoint::default();
        assert_eq!(rp.recovery_frame_cnt(), -1);
        let rp = RecoveryPoint { frame_cnt: Some(12) };
        assert_eq!(rp.recovery_frame_cnt(), 12);
    }

    #[test]
    fn test_stereo_mode_labels() {
        let mut fp = FramePacking::default();
        assert_eq!(fp.stereo_mode(), None);

        fp.cancel = ArrangementCancel::Active;
        fp.arrangement_type = FpaType::SideBySide;
        assert_eq!(fp.stereo_mode(), Some("side_by_side_lr"));

        fp.content_interpretation_type = 2;
        assert_eq!(fp.stereo_mode(), Some("side_by_side_rl"));

        fp.quincunx_sampling_flag = true;
        assert_eq!(fp.stereo_mode(), Some("side_by_side_quincunx_rl"));

        fp.arrangement_type = FpaType::TwoDimensional;
        assert_eq!(fp.stereo_mode(), Some("mono"));

        fp.cancel = ArrangementCancel::Canceled;
        assert_eq!(fp.stereo_mode(), Some("mono"));
    }
}
