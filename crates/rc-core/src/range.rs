//! `Range` header parsing.
//!
//! Only the single-range form `bytes=START-END` (with `END` optional) is
//! accepted. Anything else is a [`Error::MalformedRange`], which is distinct
//! from the header being absent.

use std::fmt;
use std::str::FromStr;

use crate::error::{Error, Result};

/// A single inclusive, 0-indexed byte range requested by a client.
///
/// `end == None` means "through the end of the file".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RangeRequest {
    pub start: u64,
    pub end: Option<u64>,
}

impl RangeRequest {
    /// Parse a raw header value such as `bytes=500-999` or `bytes=500-`.
    pub fn parse(value: &str) -> Result<Self> {
        let value = value.trim();

        let spec = value
            .split_once('=')
            .filter(|(unit, _)| unit.trim().eq_ignore_ascii_case("bytes"))
            .map(|(_, spec)| spec.trim())
            .ok_or_else(|| Error::malformed_range(format!("expected bytes= unit: {value}")))?;

        if spec.contains(',') {
            return Err(Error::malformed_range(format!(
                "multiple ranges are not supported: {value}"
            )));
        }

        let (start_str, end_str) = spec
            .split_once('-')
            .ok_or_else(|| Error::malformed_range(format!("missing '-' separator: {value}")))?;

        let start_str = start_str.trim();
        let end_str = end_str.trim();

        if start_str.is_empty() {
            return Err(Error::malformed_range(format!(
                "suffix ranges are not supported: {value}"
            )));
        }

        let start = parse_offset(start_str, value)?;
        let end = if end_str.is_empty() {
            None
        } else {
            Some(parse_offset(end_str, value)?)
        };

        if let Some(end) = end {
            if start > end {
                return Err(Error::malformed_range(format!(
                    "start {start} is after end {end}"
                )));
            }
        }

        Ok(Self { start, end })
    }
}

impl FromStr for RangeRequest {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl fmt::Display for RangeRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.end {
            Some(end) => write!(f, "bytes={}-{}", self.start, end),
            None => write!(f, "bytes={}-", self.start),
        }
    }
}

/// Parse an optional header value.
///
/// `Ok(None)` means no range was sent and the whole file should be served.
pub fn parse_range(header: Option<&str>) -> Result<Option<RangeRequest>> {
    header.map(RangeRequest::parse).transpose()
}

fn parse_offset(digits: &str, header: &str) -> Result<u64> {
    // `u64::from_str` accepts a leading '+', which is not valid here.
    if !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err(Error::malformed_range(format!(
            "non-numeric offset '{digits}' in {header}"
        )));
    }
    digits
        .parse()
        .map_err(|_| Error::malformed_range(format!("offset '{digits}' out of range in {header}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_closed_range() {
        let r = RangeRequest::parse("bytes=10-20").unwrap();
        assert_eq!(r.start, 10);
        assert_eq!(r.end, Some(20));
    }

    #[test]
    fn parse_open_end() {
        let r = RangeRequest::parse("bytes=500-").unwrap();
        assert_eq!(r, RangeRequest { start: 500, end: None });
    }

    #[test]
    fn parse_single_byte() {
        let r = RangeRequest::parse("bytes=0-0").unwrap();
        assert_eq!(r, RangeRequest { start: 0, end: Some(0) });
    }

    #[test]
    fn parse_tolerates_whitespace_and_unit_case() {
        let r = RangeRequest::parse("  Bytes = 5 - 9 ").unwrap();
        assert_eq!(r, RangeRequest { start: 5, end: Some(9) });
    }

    #[test]
    fn absent_header_is_not_an_error() {
        assert_eq!(parse_range(None).unwrap(), None);
    }

    #[test]
    fn present_header_is_parsed() {
        let r = parse_range(Some("bytes=0-999999")).unwrap().unwrap();
        assert_eq!(r.end, Some(999_999));
    }

    #[test]
    fn malformed_prefix() {
        for raw in ["0-10", "items=0-10", "bytes 0-10", ""] {
            let err = RangeRequest::parse(raw).unwrap_err();
            assert!(matches!(err, Error::MalformedRange(_)), "{raw:?}");
        }
    }

    #[test]
    fn non_numeric_bounds() {
        for raw in ["bytes=abc-def", "bytes=1x-5", "bytes=5-z", "bytes=+5-9", "bytes=-"] {
            assert!(RangeRequest::parse(raw).is_err(), "{raw:?}");
        }
    }

    #[test]
    fn suffix_and_multi_ranges_rejected() {
        assert!(RangeRequest::parse("bytes=-500").is_err());
        assert!(RangeRequest::parse("bytes=0-1,4-5").is_err());
    }

    #[test]
    fn missing_separator() {
        assert!(RangeRequest::parse("bytes=100").is_err());
    }

    #[test]
    fn inverted_range_rejected() {
        let err = RangeRequest::parse("bytes=20-10").unwrap_err();
        assert!(err.to_string().contains("after end"));
    }

    #[test]
    fn overflowing_offset_rejected() {
        assert!(RangeRequest::parse("bytes=99999999999999999999999-").is_err());
    }

    #[test]
    fn display_round_trips_the_header_form() {
        assert_eq!(
            RangeRequest { start: 1, end: Some(2) }.to_string(),
            "bytes=1-2"
        );
        assert_eq!(RangeRequest { start: 7, end: None }.to_string(), "bytes=7-");
    }
}
