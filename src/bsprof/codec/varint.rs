//! LEB128 variable-length integer decoding.
//!
//! Every integer field in a capture uses this encoding. Fields the format
//! documents as 32-bit and 64-bit share the same bit layout, so there is a
//! single decoder here and the cursor narrows the result per call site.

use crate::bsprof::types::error::{BsprofError, Result};

const VARINT_MSB: u8 = 0x80;
const VARINT_REST: u8 = 0x7F;

/// Decodes an unsigned LEB128 integer from `buf` starting at `*pos`.
///
/// Advances `*pos` past the consumed bytes. On error `*pos` is left
/// wherever decoding stopped.
pub fn decode_varint(buf: &[u8], pos: &mut usize) -> Result<u64> {
    let start = *pos;
    let mut value: u64 = 0;
    let mut shift: u32 = 0;
    loop {
        let Some(&byte) = buf.get(*pos) else {
            return Err(BsprofError::UnexpectedEof {
                offset: *pos,
                needed: 1,
                available: 0,
            });
        };
        *pos += 1;

        let payload = (byte & VARINT_REST) as u64;
        // Bits past the 64th must be zero; zero padding groups are accepted.
        if shift >= 64 {
            if payload != 0 {
                return Err(BsprofError::VarintOverflow { offset: start });
            }
        } else if shift == 63 && payload > 1 {
            return Err(BsprofError::VarintOverflow { offset: start });
        } else {
            value |= payload << shift;
        }
        if byte & VARINT_MSB == 0 {
            return Ok(value);
        }
        shift = shift.saturating_add(7);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn encode_varint(mut value: u64, buf: &mut Vec<u8>) {
        loop {
            let mut byte = (value & 0x7F) as u8;
            value >>= 7;
            if value != 0 {
                byte |= 0x80;
            }
            buf.push(byte);
            if value == 0 {
                break;
            }
        }
    }

    fn round_trip(value: u64) {
        let mut buf = Vec::new();
        encode_varint(value, &mut buf);
        let mut pos = 0;
        assert_eq!(decode_varint(&buf, &mut pos).unwrap(), value);
        assert_eq!(pos, buf.len());
    }

    #[test]
    fn edge_values_round_trip() {
        for value in [0, 1, 127, 128, 255, 16_383, 16_384, u32::MAX as u64, 1 << 32, u64::MAX] {
            round_trip(value);
        }
    }

    #[test]
    fn single_byte_boundary() {
        let mut buf = Vec::new();
        encode_varint(127, &mut buf);
        assert_eq!(buf, [0x7F]);
        buf.clear();
        encode_varint(128, &mut buf);
        assert_eq!(buf, [0x80, 0x01]);
    }

    #[test]
    fn high_bits_are_not_truncated() {
        // 2^40 + 5
        let buf = [0x85, 0x80, 0x80, 0x80, 0x80, 0x20];
        let mut pos = 0;
        assert_eq!(decode_varint(&buf, &mut pos).unwrap(), (1u64 << 40) + 5);
    }

    #[test]
    fn redundant_continuation_bytes_are_accepted() {
        let buf = [0x81, 0x80, 0x00];
        let mut pos = 0;
        assert_eq!(decode_varint(&buf, &mut pos).unwrap(), 1);
        assert_eq!(pos, 3);
    }

    #[test]
    fn truncated_varint_is_eof() {
        let buf = [0x80, 0x80];
        let mut pos = 0;
        assert!(matches!(
            decode_varint(&buf, &mut pos),
            Err(BsprofError::UnexpectedEof { offset: 2, .. })
        ));
    }

    #[test]
    fn empty_buffer_is_eof() {
        let mut pos = 0;
        assert!(decode_varint(&[], &mut pos).is_err());
    }

    #[test]
    fn eleven_byte_varint_overflows() {
        let mut buf = vec![0xFF; 10];
        buf.push(0x01);
        let mut pos = 0;
        assert!(matches!(
            decode_varint(&buf, &mut pos),
            Err(BsprofError::VarintOverflow { offset: 0 })
        ));
    }

    #[test]
    fn zero_padding_past_64_bits_is_accepted() {
        // u64::MAX followed by two empty continuation groups.
        let mut buf = vec![0xFF; 9];
        buf.extend_from_slice(&[0x81, 0x80, 0x00]);
        let mut pos = 0;
        assert_eq!(decode_varint(&buf, &mut pos).unwrap(), u64::MAX);
        assert_eq!(pos, buf.len());
    }

    #[test]
    fn set_bits_past_64_bits_overflow() {
        let mut buf = vec![0xFF; 9];
        buf.extend_from_slice(&[0x81, 0x01]);
        let mut pos = 0;
        assert!(matches!(
            decode_varint(&buf, &mut pos),
            Err(BsprofError::VarintOverflow { offset: 0 })
        ));
    }

    #[test]
    fn tenth_byte_above_one_overflows() {
        let mut buf = vec![0xFF; 9];
        buf.push(0x02);
        let mut pos = 0;
        assert!(matches!(
            decode_varint(&buf, &mut pos),
            Err(BsprofError::VarintOverflow { .. })
        ));
    }

    proptest! {
        #[test]
        fn any_u64_round_trips(value in any::<u64>()) {
            let mut buf = Vec::new();
            encode_varint(value, &mut buf);
            let mut pos = 0;
            prop_assert_eq!(decode_varint(&buf, &mut pos).unwrap(), value);
            prop_assert_eq!(pos, buf.len());
        }
    }
}
