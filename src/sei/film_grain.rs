//! Film grain characteristics decoder.
//!
//! The most state-heavy message: after a handful of global fields it carries
//! up to 256 intensity intervals per colour component, each with up to 6
//! signed model coefficients. Interval counts are independent per component;
//! a component whose presence flag is unset keeps an empty interval list.

use crate::error::{Result, SeiError};
use crate::utils::BitReader;

use super::types::{FilmGrainCharacteristics, IntensityInterval};
use super::SeiContext;

impl SeiContext {
    pub(super) fn decode_film_grain(&mut self, data: &[u8]) -> Result<()> {
        let mut reader = BitReader::new(data);
        let fg = &mut self.film_grain_characteristics;

        // film_grain_characteristics_cancel_flag; a new model always starts
        // from a clean record
        let canceled = reader.read_bit()?;
        *fg = FilmGrainCharacteristics::default();
        if canceled {
            return Ok(());
        }

        fg.model_id = reader.read_bits(2)? as u8;
        fg.separate_colour_description_present = reader.read_bit()?;
        if fg.separate_colour_description_present {
            fg.bit_depth_luma = reader.read_bits(3)? as u8 + 8;
            fg.bit_depth_chroma = reader.read_bits(3)? as u8 + 8;
            fg.full_range = reader.read_bit()?;
            fg.color_primaries = reader.read_bits(8)? as u8;
            fg.transfer_characteristics = reader.read_bits(8)? as u8;
            fg.matrix_coeffs = reader.read_bits(8)? as u8;
        }
        fg.blending_mode_id = reader.read_bits(2)? as u8;
        fg.log2_scale_factor = reader.read_bits(4)? as u8;

        for component in fg.components.iter_mut() {
            component.present = reader.read_bit()?;
        }

        for (c, component) in fg.components.iter_mut().enumerate() {
            if !component.present {
                continue;
            }

            let num_intervals = reader.read_bits(8)? as usize + 1;
            let num_model_values = reader.read_bits(3)? as u8 + 1;
            if num_model_values > 6 {
                // record stays absent; the dispatcher seeks past the message
                return Err(SeiError::InvalidData(format!(
                    "film grain component {} declares {} model values, at most 6 allowed",
                    c, num_model_values
                )));
            }
            component.num_model_values = num_model_values;

            component.intervals.reserve_exact(num_intervals);
            for _ in 0..num_intervals {
                let lower_bound = reader.read_bits(8)? as u8;
                let upper_bound = reader.read_bits(8)? as u8;
                let mut model_values = Vec::with_capacity(num_model_values as usize);
                for _ in 0..num_model_values {
                    let v = reader.read_signed_golomb()?;
                    model_values.push(v.clamp(i32::from(i16::MIN), i32::from(i16::MAX)) as i16);
                }
                component.intervals.push(IntensityInterval {
                    lower_bound,
                    upper_bound,
                    model_values,
                });
            }
        }

        fg.repetition_period = reader.read_golomb()?;
        fg.present = true;
        Ok(())
    }
}
