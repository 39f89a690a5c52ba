//! # privext - country-preserving address substitution for game servers
//!
//! This library hides the real IPv4 address of players reported by a game
//! server. Each address is replaced by a plausible one from the same
//! country's address space, so country-level geolocation survives while the
//! identifying detail does not.
//!
//! ## Overview
//!
//! At startup a whois country table (`GeoIPCountryWhois.csv` by default) is
//! loaded into a [`Registry`](ip::Registry): one pool of address ranges per
//! country. Small blocks (4096 addresses or fewer) are skipped and pools are
//! capped. Lookups then draw substitutes from those pools:
//!
//! - **Fixed** (default): one range per country, every lookup returns its
//!   start address.
//! - **Randomized**: up to 100 ranges per country, every lookup draws a fresh
//!   random address from a random range.
//!
//! This is best-effort obfuscation. It carries no cryptographic anonymity
//! guarantee.
//!
//! ## Architecture
//!
//! - `ip`: ranges, country codes, pools, registry and the allocator
//! - `whois`: whois table parsing and registry loading
//! - `geo`: by-address country lookup
//! - `verify`: offline audit of the registry against the lookup
//! - `config` / `config_loader`: startup configuration
//! - `orchestrator`: [`initialize`] / [`shutdown`] and the lookup API
//! - `utils`: network byte order helpers
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use privext::{config_loader, initialize, shutdown};
//!
//! let config = config_loader::resolve_config(None)?;
//! let anonymizer = initialize(&config);
//!
//! // network byte order, 0 when there is nothing to substitute
//! let substitute = anonymizer.get_ip_for_country(Some("US"));
//! # let _ = substitute;
//!
//! shutdown(anonymizer);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! ## Configuration
//!
//! ```yaml
//! whois_path: "GeoIPCountryWhois.csv"
//! geoip_path: "GeoIPCountryWhois.csv"  # optional
//! randomize: false
//! verify: false
//! ```
//!
//! Setting `PRIVEXT_ENABLE_IP_RANDOMIZATION` or `PRIVEXT_VERIFY_IPS` in the
//! environment turns the matching toggle on.
//!
//! ## Error Handling
//!
//! Lookups never fail: a miss is `None` (typed API) or `0` (raw API). Bad
//! whois records are skipped and counted. Data files that cannot be opened
//! are logged and leave the service degraded. The only fatal condition is a
//! drawn address escaping its own range while verification is enabled.

pub mod config;
pub mod config_loader;
pub mod geo;
pub mod ip;
pub mod orchestrator;
pub mod utils;
pub mod verify;
pub mod whois;

pub use config::Config;
pub use geo::{CountryLookup, WhoisCountryLookup};
pub use orchestrator::{initialize, shutdown, Anonymizer};
pub use verify::VerifyReport;
pub use whois::LoadStats;
