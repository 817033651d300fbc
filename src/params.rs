//! Active parameter set snapshot.
//!
//! SEI message layouts are not self-describing: the picture timing and
//! buffering period messages read fields whose widths and presence were
//! negotiated in the active SPS (VUI/HRD blocks). The [`ParameterContext`]
//! is a read-only snapshot of exactly those fields, supplied by whatever
//! parses the parameter sets.

/// Fields from the active SPS that SEI decoding depends on.
///
/// One instance describes the parameter set in force for a single picture.
/// Field widths are in bits; the standard bounds them to 1..=32.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParameterContext {
    /// nal_hrd_parameters_present_flag from the VUI.
    pub nal_hrd_parameters_present: bool,
    /// vcl_hrd_parameters_present_flag from the VUI.
    pub vcl_hrd_parameters_present: bool,
    /// pic_struct_present_flag from the VUI.
    pub pic_struct_present: bool,
    /// Number of alternative CPBs (cpb_cnt_minus1 + 1), at most 32.
    pub cpb_cnt: u32,
    /// Width of initial_cpb_removal_delay and its offset, in bits.
    pub initial_cpb_removal_delay_length: u8,
    /// Width of cpb_removal_delay in picture timing messages, in bits.
    pub cpb_removal_delay_length: u8,
    /// Width of dpb_output_delay in picture timing messages, in bits.
    pub dpb_output_delay_length: u8,
    /// Width of the per-timestamp time_offset field, in bits (0 skips it).
    pub time_offset_length: u8,
}

impl ParameterContext {
    /// Whether picture timing messages carry the CPB removal / DPB output
    /// delay pair (CpbDpbDelaysPresentFlag).
    pub fn cpb_dpb_delays_present(&self) -> bool {
        self.nal_hrd_parameters_present || self.vcl_hrd_parameters_present
    }
}

impl Default for ParameterContext {
    /// The inferred values the standard assigns when no HRD block is coded.
    fn default() -> Self {
        ParameterContext {
            nal_hrd_parameters_present: false,
            vcl_hrd_parameters_present: false,
            pic_struct_present: false,
            cpb_cnt: 1,
            initial_cpb_removal_delay_length: 24,
            cpb_removal_delay_length: 24,
            dpb_output_delay_length: 24,
            time_offset_length: 24,
        }
    }
}
