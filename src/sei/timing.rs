//! Picture timing decoding and the second-pass delay derivation.
//!
//! Picture timing is the one message whose layout is not self-describing:
//! the widths of cpb_removal_delay and dpb_output_delay come from the HRD
//! block of the active SPS, and the SPS in force at output time may differ
//! from the one in force when the message was decoded. Decode therefore
//! captures the raw payload verbatim and parses it best-effort; callers
//! re-derive the delays later via [`process_picture_timing`] against the
//! then-active parameter set.

use crate::error::{Result, SeiError};
use crate::params::ParameterContext;
use crate::utils::BitReader;

use super::types::{PicStructType, PictureTiming, MAX_PIC_TIMING_BYTES};
use super::SeiContext;

impl SeiContext {
    pub(super) fn decode_picture_timing(
        &mut self,
        data: &[u8],
        params: &ParameterContext,
    ) -> Result<()> {
        let pt = &mut self.picture_timing;

        if data.len() > MAX_PIC_TIMING_BYTES {
            return Err(SeiError::InvalidData(format!(
                "picture timing payload of {} bytes exceeds the {}-byte cap",
                data.len(),
                MAX_PIC_TIMING_BYTES
            )));
        }

        pt.payload = data.to_vec();
        pt.payload_size_bits = data.len() * 8;
        pt.present = true;

        parse_timing_fields(pt, params)
    }
}

/// Derives the usable cpb_removal_delay and dpb_output_delay of a previously
/// decoded picture timing record by re-parsing its retained raw payload with
/// the field widths of the parameter set active at output time.
///
/// Fails with [`SeiError::MissingDependency`] when the parameter set carries
/// no HRD timing info: the delay widths are then unknown and the fields
/// cannot be interpreted.
pub fn process_picture_timing(
    pt: &mut PictureTiming,
    params: &ParameterContext,
) -> Result<()> {
    if !params.cpb_dpb_delays_present() {
        return Err(SeiError::MissingDependency(
            "parameter set has no HRD timing info for the picture timing message".into(),
        ));
    }

    parse_timing_fields(pt, params)
}

/// Parses the delay pair, picture structure and clock timestamps out of the
/// retained payload, gated by the parameter set's presence flags.
fn parse_timing_fields(pt: &mut PictureTiming, params: &ParameterContext) -> Result<()> {
    // Cheap copy (at most 40 bytes) so the record stays mutable while read.
    let payload = pt.payload.clone();
    let mut reader = BitReader::new(&payload);

    if params.cpb_dpb_delays_present() {
        pt.cpb_removal_delay = reader.read_bits(u32::from(params.cpb_removal_delay_length))?;
        pt.dpb_output_delay = reader.read_bits(u32::from(params.dpb_output_delay_length))?;
    }

    if !params.pic_struct_present {
        return Ok(());
    }

    let raw = reader.read_bits(4)?;
    match PicStructType::from_value(raw) {
        Some(ps) => pt.pic_struct = ps,
        // Reserved value: keep the last valid pic_struct and read the clock
        // timestamp count that layout implies.
        None => log::warn!("reserved pic_struct value {}", raw),
    }

    pt.ct_type = 0;
    pt.timecode_cnt = 0;
    for _ in 0..pt.pic_struct.num_clock_ts() {
        if !reader.read_bit()? {
            // clock_timestamp_flag unset for this ts
            continue;
        }

        let slot = pt.timecode_cnt;
        pt.timecode_cnt += 1;

        pt.ct_type |= 1 << reader.read_bits(2)?;
        reader.skip_bits(1)?; // nuit_field_based_flag
        let counting_type = reader.read_bits(5)?;
        let full_timestamp = reader.read_bit()?;
        reader.skip_bits(1)?; // discontinuity_flag
        let cnt_dropped = reader.read_bit()?;

        let tc = &mut pt.timecode[slot];
        if cnt_dropped && (2..7).contains(&counting_type) {
            tc.dropframe = true;
        }
        tc.frame = reader.read_bits(8)?;
        tc.full = full_timestamp;

        if full_timestamp {
            tc.seconds = reader.read_bits(6)?;
            tc.minutes = reader.read_bits(6)?;
            tc.hours = reader.read_bits(5)?;
        } else if reader.read_bit()? {
            // seconds_flag; omitted fields keep the previous timestamp's
            // values so a track can send only what changed
            tc.seconds = reader.read_bits(6)?;
            if reader.read_bit()? {
                tc.minutes = reader.read_bits(6)?;
                if reader.read_bit()? {
                    tc.hours = reader.read_bits(5)?;
                }
            }
        }

        if params.time_offset_length > 0 {
            reader.skip_bits(u32::from(params.time_offset_length))?;
        }
    }

    Ok(())
}
