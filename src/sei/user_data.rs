//! Registered (ITU-T T.35) and unregistered user data decoders.
//!
//! Registered user data routes on country / provider / user-identifier
//! codes: `GA94` carries A/53 closed captions, `DTG1` carries the active
//! format description. Unregistered user data is an opaque 16-byte UUID plus
//! vendor payload; a best-effort matcher looks for an x264 version banner in
//! the text.

use bytes::Bytes;

use crate::error::{Result, SeiError};
use crate::utils::BitReader;

use super::SeiContext;

// itu_t_t35_country_code for the United States
const COUNTRY_CODE_USA: u8 = 0xB5;
// ATSC provider code under T.35
const PROVIDER_CODE_ATSC: u16 = 0x0031;

impl SeiContext {
    pub(super) fn decode_registered_user_data(&mut self, data: &[u8]) -> Result<()> {
        let mut pos = 0usize;

        let mut country = *data.get(pos).ok_or_else(too_short)?;
        pos += 1;
        if country == 0xFF {
            // itu_t_t35_country_code_extension_byte
            country = *data.get(pos).ok_or_else(too_short)?;
            pos += 1;
        }
        if country != COUNTRY_CODE_USA {
            log::debug!("ignoring registered user data for country code {:#x}", country);
            return Ok(());
        }

        if data.len() < pos + 2 {
            return Err(too_short());
        }
        let provider = u16::from_be_bytes([data[pos], data[pos + 1]]);
        pos += 2;
        if provider != PROVIDER_CODE_ATSC {
            return Ok(());
        }

        if data.len() < pos + 4 {
            return Err(too_short());
        }
        let user_identifier = &data[pos..pos + 4];
        pos += 4;

        match user_identifier {
            b"GA94" => {
                // The whole remaining payload is the caption chunk; the old
                // buffer reference is dropped, not mutated.
                self.a53_caption.buf = Some(Bytes::copy_from_slice(&data[pos..]));
                Ok(())
            }
            b"DTG1" => self.decode_afd(&data[pos..]),
            _ => Ok(()),
        }
    }

    fn decode_afd(&mut self, data: &[u8]) -> Result<()> {
        let mut reader = BitReader::new(data);

        reader.skip_bits(1)?; // zero bit
        let active_format_flag = reader.read_bit()?;
        reader.skip_bits(6)?; // reserved

        if active_format_flag {
            reader.skip_bits(4)?; // reserved
            self.afd.active_format_description = reader.read_bits(4)? as u8;
            self.afd.present = true;
        }
        Ok(())
    }

    pub(super) fn decode_unregistered_user_data(&mut self, data: &[u8]) -> Result<()> {
        // uuid_iso_iec_11578 prefix
        if data.len() < 16 {
            return Err(SeiError::InvalidData(format!(
                "unregistered user data of {} bytes is shorter than its 16-byte UUID",
                data.len()
            )));
        }

        if let Some(build) = detect_x264_build(&data[16..]) {
            self.unregistered.x264_build = Some(build);
        }

        // Payloads accumulate in arrival order; one access unit may carry
        // several unregistered messages.
        self.unregistered.buffers.push(Bytes::copy_from_slice(data));
        Ok(())
    }
}

fn too_short() -> SeiError {
    SeiError::Bitstream("registered user data ends inside its T.35 header".into())
}

/// Best-effort scan for an x264 version banner at the start of the post-UUID
/// payload text. The banner is vendor convention, not protocol; no match
/// simply means the build stays unknown.
fn detect_x264_build(text: &[u8]) -> Option<u32> {
    let rest = text.strip_prefix(b"x264 - core ".as_slice())?;
    let digits: &[u8] = &rest[..rest.iter().take_while(|b| b.is_ascii_digit()).count()];
    if digits.is_empty() {
        return None;
    }
    std::str::from_utf8(digits).ok()?.parse().ok()
}
