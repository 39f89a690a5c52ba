//! Shared utilities: network byte order conversion and address parsing.

pub mod ip_utils;

pub use ip_utils::{from_network_order, parse_ipv4, to_network_order, NO_ADDRESS};
