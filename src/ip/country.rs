//! Canonical country codes.
//!
//! Whois tables carry a raw two-letter code per record. Only codes found in
//! [`KNOWN_CODES`] are kept as-is; everything else is attributed to
//! [`CountryCode::UNKNOWN`].

use std::borrow::Borrow;
use std::fmt;

use serde::Serialize;

/// Sentinel used for records whose code is not in the known table
pub const UNKNOWN_CODE: &str = "unknown";

/// Every two-letter code the legacy GeoIP country database can emit,
/// including its non-ISO entries (`--`, `AP`, `EU`, `A1`, `A2`, `O1`).
pub const KNOWN_CODES: &[&str] = &[
    "--", "AP", "EU", "AD", "AE", "AF", "AG", "AI", "AL", "AM", "CW", "AO", "AQ", "AR", "AS",
    "AT", "AU", "AW", "AZ", "BA", "BB", "BD", "BE", "BF", "BG", "BH", "BI", "BJ", "BM", "BN",
    "BO", "BR", "BS", "BT", "BV", "BW", "BY", "BZ", "CA", "CC", "CD", "CF", "CG", "CH", "CI",
    "CK", "CL", "CM", "CN", "CO", "CR", "CU", "CV", "CX", "CY", "CZ", "DE", "DJ", "DK", "DM",
    "DO", "DZ", "EC", "EE", "EG", "EH", "ER", "ES", "ET", "FI", "FJ", "FK", "FM", "FO", "FR",
    "SX", "GA", "GB", "GD", "GE", "GF", "GH", "GI", "GL", "GM", "GN", "GP", "GQ", "GR", "GS",
    "GT", "GU", "GW", "GY", "HK", "HM", "HN", "HR", "HT", "HU", "ID", "IE", "IL", "IN", "IO",
    "IQ", "IR", "IS", "IT", "JM", "JO", "JP", "KE", "KG", "KH", "KI", "KM", "KN", "KP", "KR",
    "KW", "KY", "KZ", "LA", "LB", "LC", "LI", "LK", "LR", "LS", "LT", "LU", "LV", "LY", "MA",
    "MC", "MD", "MG", "MH", "MK", "ML", "MM", "MN", "MO", "MP", "MQ", "MR", "MS", "MT", "MU",
    "MV", "MW", "MX", "MY", "MZ", "NA", "NC", "NE", "NF", "NG", "NI", "NL", "NO", "NP", "NR",
    "NU", "NZ", "OM", "PA", "PE", "PF", "PG", "PH", "PK", "PL", "PM", "PN", "PR", "PS", "PT",
    "PW", "PY", "QA", "RE", "RO", "RU", "RW", "SA", "SB", "SC", "SD", "SE", "SG", "SH", "SI",
    "SJ", "SK", "SL", "SM", "SN", "SO", "SR", "ST", "SV", "SY", "SZ", "TC", "TD", "TF", "TG",
    "TH", "TJ", "TK", "TM", "TN", "TO", "TL", "TR", "TT", "TV", "TW", "TZ", "UA", "UG", "UM",
    "US", "UY", "UZ", "VA", "VC", "VE", "VG", "VI", "VN", "VU", "WF", "WS", "YE", "YT", "RS",
    "ZA", "ZM", "ME", "ZW", "A1", "A2", "O1", "AX", "GG", "IM", "JE", "BL", "MF", "BQ", "SS",
];

/// A normalized country code: either an entry of [`KNOWN_CODES`] or
/// [`UNKNOWN_CODE`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct CountryCode(&'static str);

impl CountryCode {
    pub const UNKNOWN: CountryCode = CountryCode(UNKNOWN_CODE);

    /// Map a raw code field to its canonical form.
    ///
    /// Matching is exact and case-sensitive; a field that is not exactly two
    /// bytes long, or is not in the table, becomes [`CountryCode::UNKNOWN`].
    pub fn normalize(raw: &str) -> Self {
        if raw.len() != 2 {
            return Self::UNKNOWN;
        }
        KNOWN_CODES
            .iter()
            .find(|code| **code == raw)
            .copied()
            .map(CountryCode)
            .unwrap_or(Self::UNKNOWN)
    }

    pub fn as_str(&self) -> &'static str {
        self.0
    }

    pub fn is_unknown(&self) -> bool {
        self.0 == UNKNOWN_CODE
    }
}

impl Borrow<str> for CountryCode {
    fn borrow(&self) -> &str {
        self.0
    }
}

impl fmt::Display for CountryCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0)
    }
}
