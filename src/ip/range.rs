//! Inclusive IPv4 address intervals.
//!
//! Bounds are kept in host-numeric form. Conversion to network byte order
//! happens only at the raw lookup boundary (see `crate::utils::ip_utils`).

use std::net::Ipv4Addr;

use serde::Serialize;

/// Errors raised when constructing a [`Range`]
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RangeError {
    #[error("inverted address range: end {end} is below start {start}")]
    Inverted { start: u32, end: u32 },
}

/// An inclusive address interval `start..=end`.
///
/// Width is always the inclusive address count, so a range whose start and
/// end are equal holds exactly one address.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Range {
    start: u32,
    end: u32,
}

impl Range {
    /// Create a range, rejecting `end < start`.
    pub fn new(start: u32, end: u32) -> Result<Self, RangeError> {
        if end < start {
            return Err(RangeError::Inverted { start, end });
        }
        Ok(Self { start, end })
    }

    pub fn start(&self) -> u32 {
        self.start
    }

    pub fn end(&self) -> u32 {
        self.end
    }

    /// Number of addresses covered, both endpoints included.
    pub fn width(&self) -> u64 {
        u64::from(self.end) - u64::from(self.start) + 1
    }

    pub fn contains(&self, addr: u32) -> bool {
        addr >= self.start && addr <= self.end
    }

    pub fn first_addr(&self) -> Ipv4Addr {
        Ipv4Addr::from(self.start)
    }

    pub fn last_addr(&self) -> Ipv4Addr {
        Ipv4Addr::from(self.end)
    }
}
