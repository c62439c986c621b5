use crate::types::Reading;

/// Pending input past this size is discarded wholesale; a legitimate record is
/// a few dozen bytes, anything larger is wrong-baud noise that never frames.
const MAX_PENDING: usize = 1024;

/// Incremental decoder for the device's line protocol: ASCII records of two
/// comma-separated decimal numbers terminated by `\r\n`.
///
/// Partial lines persist across `feed` calls, so records split over arbitrary
/// read boundaries reassemble. Malformed records are dropped without surfacing
/// an error, leaving the previous reading in effect.
#[derive(Default)]
pub struct LineCodec {
    pending: Vec<u8>,
}

impl LineCodec {
    pub fn new() -> Self {
        Self::default()
    }

    /// Consumes a chunk of raw bytes and returns every record completed by it,
    /// in arrival order.
    pub fn feed(&mut self, chunk: &[u8]) -> Vec<Reading> {
        self.pending.extend_from_slice(chunk);
        let mut decoded = Vec::new();
        while let Some(pos) = find_crlf(&self.pending) {
            let line: Vec<u8> = self.pending.drain(..pos + 2).collect();
            if let Ok(text) = std::str::from_utf8(&line[..pos]) {
                if let Some(reading) = parse_record(text) {
                    decoded.push(reading);
                }
            }
        }
        if self.pending.len() > MAX_PENDING {
            self.pending.clear();
        }
        decoded
    }
}

// The terminator is the exact two-byte sequence; a lone '\n' does not end a record.
fn find_crlf(buf: &[u8]) -> Option<usize> {
    buf.windows(2).position(|pair| pair == b"\r\n")
}

/// Parses one record body: exactly two comma-separated numeric fields, both
/// finite, or nothing. Both channels update together or not at all.
pub fn parse_record(line: &str) -> Option<Reading> {
    let fields: Vec<&str> = line.split(',').collect();
    if fields.len() != 2 {
        return None;
    }
    let sensor1: f64 = fields[0].trim().parse().ok()?;
    let sensor2: f64 = fields[1].trim().parse().ok()?;
    if !sensor1.is_finite() || !sensor2.is_finite() {
        return None;
    }
    Some(Reading { sensor1, sensor2 })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_a_plain_record() {
        assert_eq!(parse_record("1.234,5.678"), Some(Reading::new(1.234, 5.678)));
        assert_eq!(parse_record("-0.5, 2"), Some(Reading::new(-0.5, 2.0)));
    }

    #[test]
    fn rejects_wrong_field_count() {
        assert_eq!(parse_record("1.0"), None);
        assert_eq!(parse_record("1.0,2.0,3.0"), None);
        assert_eq!(parse_record(""), None);
    }

    #[test]
    fn rejects_non_numeric_and_empty_fields() {
        assert_eq!(parse_record("a,b"), None);
        assert_eq!(parse_record("1.0,"), None);
        assert_eq!(parse_record(",2.0"), None);
        assert_eq!(parse_record("1.0,two"), None);
    }

    #[test]
    fn rejects_non_finite_values() {
        assert_eq!(parse_record("NaN,1.0"), None);
        assert_eq!(parse_record("1.0,inf"), None);
    }

    #[test]
    fn decodes_complete_lines() {
        let mut codec = LineCodec::new();
        let out = codec.feed(b"1.000,2.000\r\n3.000,4.000\r\n");
        assert_eq!(
            out,
            vec![Reading::new(1.0, 2.0), Reading::new(3.0, 4.0)]
        );
    }

    #[test]
    fn reassembles_across_chunk_boundaries() {
        let mut codec = LineCodec::new();
        assert!(codec.feed(b"1.2").is_empty());
        assert!(codec.feed(b"34,5.6").is_empty());
        let out = codec.feed(b"78\r\n");
        assert_eq!(out, vec![Reading::new(1.234, 5.678)]);
    }

    #[test]
    fn split_terminator_still_frames() {
        let mut codec = LineCodec::new();
        assert!(codec.feed(b"1.0,2.0\r").is_empty());
        assert_eq!(codec.feed(b"\n"), vec![Reading::new(1.0, 2.0)]);
    }

    #[test]
    fn lone_newline_does_not_terminate() {
        let mut codec = LineCodec::new();
        assert!(codec.feed(b"1.0,2.0\n").is_empty());
        // The stray line stays pending and poisons the next record, which is
        // then dropped as malformed once a real terminator arrives.
        assert!(codec.feed(b"3.0,4.0\r\n").is_empty());
        assert_eq!(codec.feed(b"5.0,6.0\r\n"), vec![Reading::new(5.0, 6.0)]);
    }

    #[test]
    fn malformed_lines_are_dropped_between_valid_ones() {
        let mut codec = LineCodec::new();
        let out = codec.feed(b"1.0,2.0\r\ngarbage\r\n3.0,4.0\r\n");
        assert_eq!(out, vec![Reading::new(1.0, 2.0), Reading::new(3.0, 4.0)]);
    }

    #[test]
    fn oversized_unframed_noise_is_discarded() {
        let mut codec = LineCodec::new();
        assert!(codec.feed(&[b'x'; 2048]).is_empty());
        // Pending garbage was cleared, so a fresh record decodes cleanly.
        assert_eq!(codec.feed(b"1.0,2.0\r\n"), vec![Reading::new(1.0, 2.0)]);
    }
}
