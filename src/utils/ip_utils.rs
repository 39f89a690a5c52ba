use std::net::Ipv4Addr;

// IPv4 helpers for the raw (network byte order) lookup boundary

/// Raw value meaning "no substitute available"
pub const NO_ADDRESS: u32 = 0;

/// Encode an optional address as a raw network-byte-order value,
/// using [`NO_ADDRESS`] for `None`
pub fn to_network_order(addr: Option<Ipv4Addr>) -> u32 {
    addr.map_or(NO_ADDRESS, |addr| u32::from(addr).to_be())
}

/// Decode a raw network-byte-order value
pub fn from_network_order(raw: u32) -> Ipv4Addr {
    Ipv4Addr::from(u32::from_be(raw))
}

/// Parse a dotted-quad IPv4 address
pub fn parse_ipv4(value: &str) -> Result<Ipv4Addr, String> {
    value
        .trim()
        .parse::<Ipv4Addr>()
        .map_err(|_| format!("Invalid IPv4 address: {}", value))
}
