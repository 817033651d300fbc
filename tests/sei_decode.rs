//! End-to-end SEI NAL decoding scenarios against the public API.

use bytes::Bytes;
use h264_sei::sei::process_picture_timing;
use h264_sei::{ParameterContext, SeiContext, SeiError};

/// Wraps a message body in its (type, size) header, using the byte-extended
/// encoding for values of 255 and above.
fn message(payload_type: u32, body: &[u8]) -> Vec<u8> {
    let mut out = Vec::new();
    let mut t = payload_type;
    while t >= 255 {
        out.push(0xFF);
        t -= 255;
    }
    out.push(t as u8);
    let mut s = body.len();
    while s >= 255 {
        out.push(0xFF);
        s -= 255;
    }
    out.push(s as u8);
    out.extend_from_slice(body);
    out
}

fn unregistered_body(text: &[u8]) -> Vec<u8> {
    let mut body = vec![0xAB; 16]; // opaque UUID
    body.extend_from_slice(text);
    body
}

#[test]
fn decodes_several_messages_from_one_nal() {
    let mut nal = Vec::new();
    // recovery point: recovery_frame_cnt = 0, flags zero
    nal.extend_from_slice(&message(6, &[0b1100_0000]));
    // content light level: 1000 / 400
    nal.extend_from_slice(&message(144, &[0x03, 0xE8, 0x01, 0x90]));
    // alternative transfer characteristics: HLG
    nal.extend_from_slice(&message(147, &[18]));
    nal.push(0x80); // rbsp_trailing_bits

    let mut ctx = SeiContext::new();
    let decoded = ctx.decode(&nal, &ParameterContext::default()).unwrap();

    assert_eq!(decoded, 3);
    assert_eq!(ctx.recovery_point.recovery_frame_cnt(), 0);
    assert!(ctx.content_light.present);
    assert_eq!(ctx.content_light.max_content_light_level, 1000);
    assert!(ctx.alternative_transfer.present);
    assert_eq!(ctx.alternative_transfer.preferred_transfer_characteristics, 18);
}

#[test]
fn later_message_of_same_type_wins_within_a_nal() {
    let mut nal = Vec::new();
    nal.extend_from_slice(&message(6, &[0b1100_0000])); // recovery_frame_cnt = 0
    nal.extend_from_slice(&message(6, &[0b0100_0000])); // recovery_frame_cnt = 1

    let mut ctx = SeiContext::new();
    ctx.decode(&nal, &ParameterContext::default()).unwrap();

    assert_eq!(ctx.recovery_point.recovery_frame_cnt(), 1);
}

#[test]
fn unknown_type_is_skipped_and_following_message_decodes() {
    let mut nal = Vec::new();
    // pan-scan rect (type 2) is not decoded by this crate
    nal.extend_from_slice(&message(2, &[0x11, 0x22, 0x33, 0x44, 0x55]));
    nal.extend_from_slice(&message(144, &[0x00, 0x64, 0x00, 0x32]));

    let mut ctx = SeiContext::new();
    let decoded = ctx.decode(&nal, &ParameterContext::default()).unwrap();

    assert_eq!(decoded, 2);
    assert!(ctx.content_light.present);
    assert_eq!(ctx.content_light.max_content_light_level, 100);
    assert_eq!(ctx.content_light.max_pic_average_light_level, 50);
}

#[test]
fn byte_extended_headers_sum_per_continuation_byte() {
    // type 400 = 255 + 145 (unknown, skipped), size 300 = 255 + 45
    let mut nal = vec![0xFF, 145, 0xFF, 45];
    nal.extend_from_slice(&[0u8; 300]);
    nal.extend_from_slice(&message(147, &[1]));

    let mut ctx = SeiContext::new();
    let decoded = ctx.decode(&nal, &ParameterContext::default()).unwrap();

    assert_eq!(decoded, 2);
    assert!(ctx.alternative_transfer.present);
}

#[test]
fn oversized_claim_is_fatal_and_mutates_nothing() {
    let mut nal = vec![0x06, 100]; // claims 100 bytes
    nal.extend_from_slice(&[0u8; 40]); // only 40 remain

    let mut ctx = SeiContext::new();
    let err = ctx.decode(&nal, &ParameterContext::default()).unwrap_err();

    assert!(matches!(err, SeiError::TruncatedPayload(_)));
    assert_eq!(ctx.recovery_point.recovery_frame_cnt(), -1);
}

#[test]
fn unregistered_payloads_accumulate_across_one_access_unit() {
    let mut nal = Vec::new();
    nal.extend_from_slice(&message(5, &unregistered_body(b"first")));
    nal.extend_from_slice(&message(5, &unregistered_body(b"second")));

    let mut ctx = SeiContext::new();
    ctx.decode(&nal, &ParameterContext::default()).unwrap();

    assert_eq!(ctx.unregistered.buffers.len(), 2);
    assert_eq!(&ctx.unregistered.buffers[0][16..], b"first");
    assert_eq!(&ctx.unregistered.buffers[1][16..], b"second");

    // buffers survive for consumers that cloned them before the reset
    let held: Vec<Bytes> = ctx.unregistered.buffers.clone();
    ctx.reset();
    assert!(ctx.unregistered.buffers.is_empty());
    assert_eq!(&held[1][16..], b"second");
}

#[test]
fn x264_banner_detection_survives_picture_resets() {
    let nal = message(
        5,
        &unregistered_body(b"x264 - core 164 - H.264/MPEG-4 AVC codec"),
    );

    let mut ctx = SeiContext::new();
    ctx.decode(&nal, &ParameterContext::default()).unwrap();
    assert_eq!(ctx.unregistered.x264_build, Some(164));

    ctx.reset();
    assert_eq!(ctx.unregistered.x264_build, Some(164));
}

#[test]
fn picture_timing_two_phase_delay_derivation() {
    // decode-time parameter set knows nothing about HRD widths
    let decode_params = ParameterContext::default();
    // output-time parameter set: both delays 8 bits wide
    let output_params = ParameterContext {
        nal_hrd_parameters_present: true,
        cpb_removal_delay_length: 8,
        dpb_output_delay_length: 8,
        ..Default::default()
    };

    let nal = message(1, &[3, 5]); // raw payload: cpb = 3, dpb = 5 at 8 bits

    let mut ctx = SeiContext::new();
    ctx.decode(&nal, &decode_params).unwrap();
    assert!(ctx.picture_timing.present);
    // not derived yet: the decode-time parameter set had no widths
    assert_eq!(ctx.picture_timing.cpb_removal_delay, 0);

    process_picture_timing(&mut ctx.picture_timing, &output_params).unwrap();
    assert_eq!(ctx.picture_timing.cpb_removal_delay, 3);
    assert_eq!(ctx.picture_timing.dpb_output_delay, 5);

    // a parameter set without HRD info cannot interpret the payload
    let err = process_picture_timing(&mut ctx.picture_timing, &decode_params).unwrap_err();
    assert!(matches!(err, SeiError::MissingDependency(_)));
}

#[test]
fn frame_packing_cancel_state_is_sticky_across_pictures() {
    // arrangement_id ue(v) = 0, cancel = 1, extension = 0
    let nal = message(45, &[0b1100_0000]);

    let mut ctx = SeiContext::new();
    assert_eq!(ctx.frame_packing.cancel_flag(), -1);

    ctx.decode(&nal, &ParameterContext::default()).unwrap();
    assert_eq!(ctx.frame_packing.cancel_flag(), 1);
    assert_eq!(ctx.frame_packing.stereo_mode(), Some("mono"));

    // picture boundaries and unrelated messages never resurrect -1
    ctx.reset();
    let unrelated = message(144, &[0, 0, 0, 0]);
    ctx.decode(&unrelated, &ParameterContext::default()).unwrap();
    assert_eq!(ctx.frame_packing.cancel_flag(), 1);
}

#[test]
fn caption_buffer_is_replaced_not_mutated() {
    fn ga94(body: &[u8]) -> Vec<u8> {
        let mut data = vec![0xB5, 0x00, 0x31];
        data.extend_from_slice(b"GA94");
        data.extend_from_slice(body);
        message(4, &data)
    }

    let mut ctx = SeiContext::new();
    ctx.decode(&ga94(&[0x03, 0x01]), &ParameterContext::default())
        .unwrap();
    let first = ctx.a53_caption.buf.clone().unwrap();

    ctx.decode(&ga94(&[0x03, 0x02]), &ParameterContext::default())
        .unwrap();

    assert_eq!(&ctx.a53_caption.buf.as_ref().unwrap()[..], &[0x03, 0x02]);
    assert_eq!(&first[..], &[0x03, 0x01]);
}
