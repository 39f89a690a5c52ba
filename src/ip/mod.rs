//! Address ranges, per-country pools and substitute address selection.
//!
//! The [`Registry`] maps canonical country codes to [`Pool`]s of [`Range`]s.
//! The allocator draws substitute addresses from those pools.

pub mod allocator;
pub mod country;
pub mod pool;
pub mod range;
pub mod registry;

pub use allocator::{substitute, substitute_with_rng, ContainmentViolation};
pub use country::{CountryCode, KNOWN_CODES, UNKNOWN_CODE};
pub use pool::{AddressMode, Pool, MAX_POOL_SIZE};
pub use range::{Range, RangeError};
pub use registry::Registry;
