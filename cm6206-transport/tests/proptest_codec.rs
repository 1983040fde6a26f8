//! Property-based tests for the register report codec.

use cm6206_transport::protocol::{
    decode_read_response, encode_read, encode_write, has_read_marker, try_parse_request,
    MarkerPolicy, ParsedRequest, REPORT_SIZE,
};
use cm6206_transport::TransportError;
use proptest::prelude::*;

proptest! {
    #![proptest_config(proptest::test_runner::Config::with_cases(500))]

    /// A reply carrying (value & 0xFF, value >> 8) decodes back to value.
    #[test]
    fn prop_reply_round_trip(value: u16, low_status in 0u8..0x20) {
        let reply = [0x20 | low_status, (value & 0xFF) as u8, (value >> 8) as u8];
        let decoded = decode_read_response(&reply, MarkerPolicy::Strict);
        prop_assert_eq!(decoded.ok(), Some(value));
    }

    /// Read and write requests for one register differ only in opcode and data.
    #[test]
    fn prop_read_write_frames_share_index(register: u8, value: u16) {
        let read = encode_read(register);
        let write = encode_write(register, value);
        prop_assert_eq!(read.len(), REPORT_SIZE);
        prop_assert_eq!(read[0], write[0]);
        prop_assert_eq!(read[4], write[4]);
        prop_assert_eq!(read[4], register);
        prop_assert_ne!(read[1], write[1]);
        prop_assert_eq!(&read[2..4], &[0u8, 0u8]);
        prop_assert_eq!(&write[2..4], &value.to_le_bytes());
    }

    /// Write frames parse back to the same request.
    #[test]
    fn prop_write_frame_parses(register: u8, value: u16) {
        prop_assert_eq!(
            try_parse_request(&encode_write(register, value)),
            Some(ParsedRequest::Write { register, value })
        );
    }

    /// Strict decoding accepts exactly the statuses with 0x20 under mask 0xE0.
    #[test]
    fn prop_strict_marker(status: u8, lo: u8, hi: u8) {
        let result = decode_read_response(&[status, lo, hi], MarkerPolicy::Strict);
        if status & 0xE0 == 0x20 {
            prop_assert!(result.is_ok());
        } else {
            let is_framing = matches!(result, Err(TransportError::Framing { .. }));
            prop_assert!(is_framing);
        }
        prop_assert_eq!(has_read_marker(status), status & 0xE0 == 0x20);
    }

    /// Lenient decoding never rejects a reply of sufficient length.
    #[test]
    fn prop_lenient_accepts_any_status(status: u8, value: u16) {
        let [lo, hi] = value.to_le_bytes();
        let decoded = decode_read_response(&[status, lo, hi], MarkerPolicy::Lenient);
        prop_assert_eq!(decoded.ok(), Some(value));
    }

    /// Replies shorter than three bytes are always short reads.
    #[test]
    fn prop_short_replies_rejected(bytes in proptest::collection::vec(any::<u8>(), 0..3)) {
        let result = decode_read_response(&bytes, MarkerPolicy::Lenient);
        let is_short = matches!(result, Err(TransportError::ReadShort { .. }));
        prop_assert!(is_short);
    }
}
