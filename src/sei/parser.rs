//! SEI message dispatch and the fixed-layout decoders.
//!
//! The dispatcher walks the byte-extended (type, size) header pairs of one
//! SEI NAL payload, hands each message to the matching decoder as a bounded
//! slice, and then seeks to the declared message end no matter how much the
//! decoder consumed. That forced advance is the single point of recovery
//! enforcement: a decoder that under- or over-reads can corrupt its own
//! record but never desynchronize the rest of the NAL.

use crate::error::{Result, SeiError};
use crate::params::ParameterContext;
use crate::utils::BitReader;

use super::types::{ArrangementCancel, FpaType, SeiPayloadType};
use super::SeiContext;

/// Reads one byte-extended value: each 0xFF continuation byte adds 255, the
/// first non-0xFF byte is added as-is and terminates the field.
fn read_extensible(payload: &[u8], pos: &mut usize) -> Result<u32> {
    let mut value = 0u32;
    loop {
        let Some(&b) = payload.get(*pos) else {
            return Err(SeiError::TruncatedPayload(
                "SEI payload ends inside a type/size header".into(),
            ));
        };
        *pos += 1;
        if b != 0xFF {
            return Ok(value + u32::from(b));
        }
        value += 255;
    }
}

impl SeiContext {
    /// Decodes one SEI NAL payload (NAL header and emulation prevention
    /// bytes already stripped) against the parameter set active for the
    /// current picture.
    ///
    /// Unknown message types are skipped silently; a message that fails to
    /// decode is logged and its record left absent, and decoding continues
    /// with the next message. The only fatal condition is a header claiming
    /// more bytes than the payload holds, which aborts the whole NAL.
    ///
    /// Returns the number of messages walked.
    pub fn decode(&mut self, payload: &[u8], params: &ParameterContext) -> Result<usize> {
        let mut pos = 0usize;
        let mut count = 0usize;

        // A type/size pair needs at least two bytes; 0x80 is the
        // rbsp_trailing_bits byte terminating the payload.
        while payload.len() - pos >= 2 && payload[pos] != 0x80 {
            let payload_type = read_extensible(payload, &mut pos)?;
            let size = read_extensible(payload, &mut pos)? as usize;

            if size > payload.len() - pos {
                return Err(SeiError::TruncatedPayload(format!(
                    "SEI message type {} claims {} bytes, {} remain",
                    payload_type,
                    size,
                    payload.len() - pos
                )));
            }

            let end = pos + size;
            let msg = &payload[pos..end];

            let res = match SeiPayloadType::from_id(payload_type) {
                Some(SeiPayloadType::BufferingPeriod) => {
                    self.decode_buffering_period(msg, params)
                }
                Some(SeiPayloadType::PicTiming) => self.decode_picture_timing(msg, params),
                Some(SeiPayloadType::UserDataRegistered) => {
                    self.decode_registered_user_data(msg)
                }
                Some(SeiPayloadType::UserDataUnregistered) => {
                    self.decode_unregistered_user_data(msg)
                }
                Some(SeiPayloadType::RecoveryPoint) => self.decode_recovery_point(msg),
                Some(SeiPayloadType::FilmGrainCharacteristics) => self.decode_film_grain(msg),
                Some(SeiPayloadType::FramePackingArrangement) => self.decode_frame_packing(msg),
                Some(SeiPayloadType::DisplayOrientation) => {
                    self.decode_display_orientation(msg)
                }
                Some(SeiPayloadType::GreenMetadata) => self.decode_green_metadata(msg),
                Some(SeiPayloadType::MasteringDisplayColourVolume) => {
                    self.decode_mastering_display(msg)
                }
                Some(SeiPayloadType::ContentLightLevel) => self.decode_content_light(msg),
                Some(SeiPayloadType::AlternativeTransferCharacteristics) => {
                    self.decode_alternative_transfer(msg)
                }
                None => {
                    log::debug!(
                        "skipping SEI message type {} ({} bytes)",
                        payload_type,
                        size
                    );
                    Ok(())
                }
            };

            if let Err(e) = res {
                log::warn!("SEI message type {} not decoded: {}", payload_type, e);
            }

            // Forward progress never depends on how much the decoder read.
            pos = end;
            count += 1;
        }

        Ok(count)
    }

    fn decode_buffering_period(
        &mut self,
        data: &[u8],
        params: &ParameterContext,
    ) -> Result<()> {
        let mut reader = BitReader::new(data);

        // seq_parameter_set_id names the SPS in force; the caller already
        // resolved it into `params`.
        reader.read_golomb()?;

        let cpb_cnt = params.cpb_cnt.min(32) as usize;
        let len = u32::from(params.initial_cpb_removal_delay_length);

        let bp = &mut self.buffering_period;
        // NAL and VCL HRD blocks carry the same layout, one after the other.
        if params.nal_hrd_parameters_present {
            for delay in bp.initial_cpb_removal_delay.iter_mut().take(cpb_cnt) {
                *delay = reader.read_bits(len)?;
                // initial_cpb_removal_delay_offset
                reader.skip_bits(len)?;
            }
        }
        if params.vcl_hrd_parameters_present {
            for delay in bp.initial_cpb_removal_delay.iter_mut().take(cpb_cnt) {
                *delay = reader.read_bits(len)?;
                reader.skip_bits(len)?;
            }
        }

        bp.present = true;
        Ok(())
    }

    fn decode_recovery_point(&mut self, data: &[u8]) -> Result<()> {
        let mut reader = BitReader::new(data);

        let frame_cnt = reader.read_golomb()?;
        // exact_match_flag, broken_link_flag, changing_slice_group_idc
        reader.skip_bits(4)?;

        self.recovery_point.frame_cnt = Some(frame_cnt);
        Ok(())
    }

    fn decode_frame_packing(&mut self, data: &[u8]) -> Result<()> {
        let mut reader = BitReader::new(data);
        let fp = &mut self.frame_packing;

        fp.arrangement_id = reader.read_golomb()?;
        if reader.read_bit()? {
            fp.cancel = ArrangementCancel::Canceled;
            fp.present = false;
            // frame_packing_arrangement_extension_flag
            reader.skip_bits(1)?;
            return Ok(());
        }

        let arrangement_type = reader.read_bits(7)?;
        match FpaType::from_value(arrangement_type) {
            Some(t) => fp.arrangement_type = t,
            // reserved value: keep the last valid layout
            None => log::warn!(
                "reserved frame_packing_arrangement_type {}",
                arrangement_type
            ),
        }
        fp.quincunx_sampling_flag = reader.read_bit()?;
        fp.content_interpretation_type = reader.read_bits(6)?;
        // spatial_flipping_flag, frame0_flipped_flag, field_views_flag
        reader.skip_bits(3)?;
        fp.current_frame_is_frame0_flag = reader.read_bit()?;
        // frame0_self_contained_flag, frame1_self_contained_flag
        reader.skip_bits(2)?;
        if !fp.quincunx_sampling_flag && fp.arrangement_type != FpaType::TemporalInterleave {
            // frame0/frame1 grid position x and y, 4 bits each
            reader.skip_bits(16)?;
        }
        // frame_packing_arrangement_reserved_byte
        reader.skip_bits(8)?;
        fp.arrangement_repetition_period = reader.read_golomb()?;
        // frame_packing_arrangement_extension_flag
        reader.skip_bits(1)?;

        // committed only once the whole message parsed; a truncated message
        // leaves the record in its previous state
        fp.cancel = ArrangementCancel::Active;
        fp.present = true;
        Ok(())
    }

    fn decode_display_orientation(&mut self, data: &[u8]) -> Result<()> {
        let mut reader = BitReader::new(data);
        let orientation = &mut self.display_orientation;

        if reader.read_bit()? {
            orientation.present = false;
            return Ok(());
        }

        orientation.hflip = reader.read_bit()?;
        orientation.vflip = reader.read_bit()?;
        orientation.anticlockwise_rotation = reader.read_bits(16)?;
        // display_orientation_repetition_period
        reader.read_golomb()?;
        // display_orientation_extension_flag
        reader.skip_bits(1)?;

        orientation.present = true;
        Ok(())
    }

    fn decode_green_metadata(&mut self, data: &[u8]) -> Result<()> {
        let mut reader = BitReader::new(data);
        let gm = &mut self.green_metadata;

        gm.green_metadata_type = reader.read_bits(8)? as u8;
        match gm.green_metadata_type {
            0 => {
                gm.period_type = reader.read_bits(8)? as u8;
                if gm.period_type == 2 {
                    gm.num_seconds = reader.read_bits(16)? as u16;
                } else if gm.period_type == 3 {
                    gm.num_pictures = reader.read_bits(16)? as u16;
                }
                gm.percent_non_zero_macroblocks = reader.read_bits(8)? as u8;
                gm.percent_intra_coded_macroblocks = reader.read_bits(8)? as u8;
                gm.percent_six_tap_filtering = reader.read_bits(8)? as u8;
                gm.percent_alpha_point_deblocking_instance = reader.read_bits(8)? as u8;
            }
            1 => {
                gm.xsd_metric_type = reader.read_bits(8)? as u8;
                gm.xsd_metric_value = reader.read_bits(16)? as u16;
            }
            other => {
                log::debug!("unknown green_metadata_type {}", other);
            }
        }

        Ok(())
    }

    fn decode_alternative_transfer(&mut self, data: &[u8]) -> Result<()> {
        let mut reader = BitReader::new(data);

        self.alternative_transfer.preferred_transfer_characteristics =
            reader.read_bits(8)? as u8;
        self.alternative_transfer.present = true;
        Ok(())
    }

    fn decode_mastering_display(&mut self, data: &[u8]) -> Result<()> {
        let mut reader = BitReader::new(data);
        let md = &mut self.mastering_display;

        for primary in md.display_primaries.iter_mut() {
            for coord in primary.iter_mut() {
                *coord = reader.read_bits(16)? as u16;
            }
        }
        for coord in md.white_point.iter_mut() {
            *coord = reader.read_bits(16)? as u16;
        }
        md.max_luminance = reader.read_bits(32)?;
        md.min_luminance = reader.read_bits(32)?;

        md.present = true;
        Ok(())
    }

    fn decode_content_light(&mut self, data: &[u8]) -> Result<()> {
        let mut reader = BitReader::new(data);

        let cl = &mut self.content_light;
        cl.max_content_light_level = reader.read_bits(16)? as u16;
        cl.max_pic_average_light_level = reader.read_bits(16)? as u16;
        cl.present = true;
        Ok(())
    }
}
