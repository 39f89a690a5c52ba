//! Record parsing for whois country tables.
//!
//! Each line has the shape
//! `"1.0.0.0","1.0.0.255","16777216","16777471","AU","Australia"`:
//! two dotted addresses, their numeric forms, a two-letter code and the
//! country name, all double quoted. Only the numeric bounds and the code are
//! used.

use std::sync::LazyLock;

use regex::Regex;

use crate::ip::{CountryCode, Range, RangeError};

/// Captures the numeric bounds and the raw code field of a record
static RECORD_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"^\s*"[^"]*","[^"]*","(\d+)","(\d+)","([^"]*)""#)
        .expect("Invalid whois record regex")
});

/// Why a line was rejected
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RecordError {
    #[error("line does not match the whois record layout")]
    Malformed,
    #[error("numeric bound {0:?} is not a valid IPv4 address number")]
    BadBound(String),
    #[error("country code field {0:?} is not two characters")]
    BadCountryCode(String),
    #[error(transparent)]
    Inverted(#[from] RangeError),
}

/// A parsed whois line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WhoisRecord<'a> {
    pub range: Range,
    /// Raw two-character code field, before normalization
    pub raw_code: &'a str,
}

impl WhoisRecord<'_> {
    pub fn country(&self) -> CountryCode {
        CountryCode::normalize(self.raw_code)
    }
}

/// Parse one whois line.
pub fn parse_line(line: &str) -> Result<WhoisRecord<'_>, RecordError> {
    let caps = RECORD_PATTERN.captures(line).ok_or(RecordError::Malformed)?;
    let (Some(start), Some(end), Some(code)) = (caps.get(1), caps.get(2), caps.get(3)) else {
        return Err(RecordError::Malformed);
    };

    let start = parse_bound(start.as_str())?;
    let end = parse_bound(end.as_str())?;

    let raw_code = code.as_str();
    if raw_code.len() != 2 {
        return Err(RecordError::BadCountryCode(raw_code.to_string()));
    }

    let range = Range::new(start, end)?;
    Ok(WhoisRecord { range, raw_code })
}

fn parse_bound(digits: &str) -> Result<u32, RecordError> {
    digits
        .parse::<u32>()
        .map_err(|_| RecordError::BadBound(digits.to_string()))
}
