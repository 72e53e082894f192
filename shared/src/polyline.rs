//! Encoded polyline codec (5 decimal digits of precision).
//!
//! Each coordinate is stored as the zig-zag encoded delta from the previous one,
//! split into 5-bit chunks, least significant first, offset by 63 into printable
//! ASCII. Bit `0x20` on a chunk means another chunk follows.

use thiserror::Error;

use crate::Coordinate;

const PRECISION: f64 = 1e5;
const CHUNK_BITS: u32 = 5;
const CHUNK_MASK: i64 = 0x1f;
const CONTINUATION: i64 = 0x20;
const ASCII_OFFSET: u8 = 63;
/// Beyond this shift a chunk no longer fits in an `i64`.
const MAX_SHIFT: u32 = 55;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    #[error("encoded path ends in the middle of a value starting at byte {offset}")]
    Truncated { offset: usize },
    #[error("byte {byte:#04x} at offset {offset} is outside the polyline alphabet")]
    InvalidByte { offset: usize, byte: u8 },
    #[error("value starting at byte {offset} does not fit in 64 bits")]
    Overflow { offset: usize },
}

pub fn decode(encoded: &str) -> Result<Vec<Coordinate>, DecodeError> {
    let bytes = encoded.as_bytes();
    let mut path = Vec::with_capacity(bytes.len() / 4);
    let mut offset = 0;
    let (mut lat, mut lon) = (0_i64, 0_i64);

    while offset < bytes.len() {
        lat = accumulate(lat, bytes, &mut offset)?;
        lon = accumulate(lon, bytes, &mut offset)?;
        path.push(Coordinate {
            lat: lat as f64 / PRECISION,
            lon: lon as f64 / PRECISION,
        });
    }

    Ok(path)
}

/// Decodes for display: a malformed string yields an empty path instead of an error.
pub fn decode_lossy(encoded: &str) -> Vec<Coordinate> {
    decode(encoded).unwrap_or_else(|err| {
        tracing::warn!("discarding malformed encoded path ({} bytes): {err}", encoded.len());
        Vec::new()
    })
}

pub fn encode(path: &[Coordinate]) -> String {
    let mut out = String::with_capacity(path.len() * 8);
    let (mut prev_lat, mut prev_lon) = (0_i64, 0_i64);

    for coord in path {
        let lat = scale(coord.lat);
        let lon = scale(coord.lon);
        push_value(lat - prev_lat, &mut out);
        push_value(lon - prev_lon, &mut out);
        prev_lat = lat;
        prev_lon = lon;
    }

    out
}

fn scale(degrees: f64) -> i64 {
    (degrees * PRECISION).round() as i64
}

/// Adds the next delta to a running total, which must itself stay within `i64`.
fn accumulate(total: i64, bytes: &[u8], offset: &mut usize) -> Result<i64, DecodeError> {
    let start = *offset;
    total
        .checked_add(next_value(bytes, offset)?)
        .ok_or(DecodeError::Overflow { offset: start })
}

fn next_value(bytes: &[u8], offset: &mut usize) -> Result<i64, DecodeError> {
    let start = *offset;
    let mut result = 0_i64;
    let mut shift = 0_u32;

    loop {
        let Some(&byte) = bytes.get(*offset) else {
            return Err(DecodeError::Truncated { offset: start });
        };
        if !(ASCII_OFFSET..=ASCII_OFFSET + 63).contains(&byte) {
            return Err(DecodeError::InvalidByte {
                offset: *offset,
                byte,
            });
        }
        if shift > MAX_SHIFT {
            return Err(DecodeError::Overflow { offset: start });
        }

        let chunk = i64::from(byte - ASCII_OFFSET);
        result |= (chunk & CHUNK_MASK) << shift;
        shift += CHUNK_BITS;
        *offset += 1;

        if chunk & CONTINUATION == 0 {
            break;
        }
    }

    Ok(if result & 1 == 1 {
        !(result >> 1)
    } else {
        result >> 1
    })
}

fn push_value(value: i64, out: &mut String) {
    let mut rest = if value < 0 {
        !(value << 1)
    } else {
        value << 1
    };

    while rest >= CONTINUATION {
        out.push(char::from(
            ((CONTINUATION | (rest & CHUNK_MASK)) as u8) + ASCII_OFFSET,
        ));
        rest >>= CHUNK_BITS;
    }
    out.push(char::from(rest as u8 + ASCII_OFFSET));
}

#[cfg(test)]
mod tests {
    use super::*;

    // Reference string from the published polyline format description.
    const REFERENCE: &str = "_p~iF~ps|U_ulLnnqC_mqNvxq`@";

    fn reference_path() -> Vec<Coordinate> {
        vec![
            Coordinate { lat: 38.5, lon: -120.2 },
            Coordinate { lat: 40.7, lon: -120.95 },
            Coordinate { lat: 43.252, lon: -126.453 },
        ]
    }

    fn assert_close(actual: &[Coordinate], expected: &[Coordinate]) {
        assert_eq!(actual.len(), expected.len());
        for (a, e) in actual.iter().zip(expected) {
            assert!((a.lat - e.lat).abs() < 1e-9, "{a:?} != {e:?}");
            assert!((a.lon - e.lon).abs() < 1e-9, "{a:?} != {e:?}");
        }
    }

    #[test]
    fn decodes_reference_string() {
        let path = decode(REFERENCE).unwrap();
        assert_close(&path, &reference_path());
    }

    #[test]
    fn encodes_reference_path() {
        assert_eq!(encode(&reference_path()), REFERENCE);
    }

    #[test]
    fn empty_string_is_empty_path() {
        assert_eq!(decode(""), Ok(Vec::new()));
        assert_eq!(encode(&[]), "");
    }

    #[test]
    fn missing_longitude_is_truncated() {
        // "_p~iF" holds a latitude only.
        assert_eq!(decode("_p~iF"), Err(DecodeError::Truncated { offset: 5 }));
    }

    #[test]
    fn dangling_continuation_chunk_is_truncated() {
        // '_' (0x5f) carries the continuation bit and nothing follows.
        assert_eq!(decode("_"), Err(DecodeError::Truncated { offset: 0 }));
    }

    #[test]
    fn rejects_bytes_outside_alphabet() {
        assert_eq!(
            decode("_p~iF ps|U"),
            Err(DecodeError::InvalidByte {
                offset: 5,
                byte: b' '
            })
        );
    }

    #[test]
    fn rejects_runaway_continuation() {
        let encoded = "~".repeat(20);
        assert_eq!(decode(&encoded), Err(DecodeError::Overflow { offset: 0 }));
    }

    #[test]
    fn rejects_running_total_past_i64() {
        // Every value is 12 chunks decoding to -2^59; the 17th latitude leaves i64.
        let encoded = format!("{}^", "~".repeat(11)).repeat(40);
        assert_eq!(decode(&encoded), Err(DecodeError::Overflow { offset: 384 }));
        assert!(decode_lossy(&encoded).is_empty());
    }

    #[test]
    fn lossy_decode_swallows_errors() {
        assert!(decode_lossy("_p~iF").is_empty());
        assert_eq!(decode_lossy(REFERENCE).len(), 3);
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        fn valid_coord() -> impl Strategy<Value = Coordinate> {
            (-90.0..=90.0, -180.0..=180.0).prop_map(|(lat, lon)| Coordinate { lat, lon })
        }

        proptest! {
            #[test]
            fn prop_round_trip_within_precision(path in prop::collection::vec(valid_coord(), 0..40)) {
                let decoded = decode(&encode(&path)).unwrap();
                prop_assert_eq!(decoded.len(), path.len());
                for (got, want) in decoded.iter().zip(&path) {
                    prop_assert!((got.lat - want.lat).abs() <= 0.5e-5 + 1e-9);
                    prop_assert!((got.lon - want.lon).abs() <= 0.5e-5 + 1e-9);
                }
            }

            #[test]
            fn prop_encoding_is_printable(path in prop::collection::vec(valid_coord(), 1..10)) {
                let encoded = encode(&path);
                prop_assert!(encoded.bytes().all(|b| (63..=126).contains(&b)));
            }
        }
    }
}
