//! Startup and shutdown of the substitution service.
//!
//! [`initialize`] opens the geolocation table, builds and compacts the
//! registry, and runs the verification pass when asked to. The returned
//! [`Anonymizer`] answers lookups until it is handed to [`shutdown`].

use std::net::Ipv4Addr;

use log::{error, info, warn};

use crate::config::Config;
use crate::geo::{CountryLookup, WhoisCountryLookup};
use crate::ip::{substitute, Registry};
use crate::utils::ip_utils::{from_network_order, to_network_order};
use crate::verify::{verify_registry, VerifyReport};
use crate::whois::{load_registry_file, LoadStats};

/// Registry plus the optional geolocation database it is queried through
pub struct Anonymizer {
    registry: Registry,
    geo: Option<Box<dyn CountryLookup>>,
    stats: LoadStats,
}

impl Anonymizer {
    /// Wrap an already built registry together with the statistics of the
    /// load that produced it. `geo` is `None` when no geolocation database is
    /// available, which disables by-address lookups.
    pub fn new(registry: Registry, geo: Option<Box<dyn CountryLookup>>, stats: LoadStats) -> Self {
        Self {
            registry,
            geo,
            stats,
        }
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn load_stats(&self) -> LoadStats {
        self.stats
    }

    pub fn has_geolocation(&self) -> bool {
        self.geo.is_some()
    }

    /// Substitute address for a country code.
    pub fn substitute_country(&self, code: &str) -> Option<Ipv4Addr> {
        substitute(&self.registry, code, false)
    }

    /// Substitute address for a real peer address, via its country.
    pub fn substitute_address(&self, addr: Ipv4Addr) -> Option<Ipv4Addr> {
        let geo = self.geo.as_deref()?;
        let code = geo.lookup_country(addr)?;
        self.substitute_country(code)
    }

    /// Raw form of [`Anonymizer::substitute_country`]: network byte order,
    /// `0` when there is nothing to substitute.
    pub fn get_ip_for_country(&self, code: Option<&str>) -> u32 {
        to_network_order(code.and_then(|code| self.substitute_country(code)))
    }

    /// Raw form of [`Anonymizer::substitute_address`]. Both `raw` and the
    /// result are in network byte order; `0` means no substitute.
    pub fn get_ip_for_address(&self, raw: u32) -> u32 {
        to_network_order(self.substitute_address(from_network_order(raw)))
    }

    /// Run the verification pass. Returns `None` without a geolocation
    /// database to verify against.
    pub fn verify(&self) -> Option<VerifyReport> {
        let Some(geo) = self.geo.as_deref() else {
            warn!("privext: no geolocation database loaded, skipping verification");
            return None;
        };
        Some(verify_registry(&self.registry, geo))
    }
}

/// Build the substitution service described by `config`.
///
/// Missing data files are logged and leave the service degraded (no
/// substitutions, or no by-address lookups), never failed.
pub fn initialize(config: &Config) -> Anonymizer {
    let geo: Option<Box<dyn CountryLookup>> = match WhoisCountryLookup::open(config.geoip_path()) {
        Ok(lookup) => Some(Box::new(lookup)),
        Err(e) => {
            warn!("privext: geolocation unavailable: {}", e);
            None
        }
    };

    let mode = config.address_mode();
    let (mut registry, stats) = match load_registry_file(&config.whois_path, mode) {
        Ok(loaded) => loaded,
        Err(e) => {
            error!("privext: {}", e);
            (Registry::new(mode), LoadStats::default())
        }
    };

    info!(
        "privext:  countries: {}  ranges: {}  added ranges: {}",
        stats.countries, stats.ranges, stats.added
    );

    registry.compact();

    let anonymizer = Anonymizer {
        registry,
        geo,
        stats,
    };

    if config.verify {
        anonymizer.verify();
    }

    anonymizer
}

/// Release the registry, then close the geolocation database.
pub fn shutdown(anonymizer: Anonymizer) {
    let Anonymizer { registry, geo, .. } = anonymizer;
    info!(
        "privext: releasing {} countries, {} ranges",
        registry.country_count(),
        registry.range_count()
    );
    drop(registry);
    drop(geo);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ip::{AddressMode, CountryCode, Range};
    use std::path::PathBuf;

    struct FixedLookup(&'static str);

    impl CountryLookup for FixedLookup {
        fn lookup_country(&self, _addr: Ipv4Addr) -> Option<&str> {
            Some(self.0)
        }
    }

    fn us_registry() -> Registry {
        let mut registry = Registry::new(AddressMode::Fixed);
        registry.add_range(
            CountryCode::normalize("US"),
            Range::new(1_000_000, 20_000_000).unwrap(),
        );
        registry
    }

    #[test]
    fn test_country_lookup_raw() {
        let anonymizer = Anonymizer::new(us_registry(), None, LoadStats::default());
        assert_eq!(anonymizer.get_ip_for_country(Some("US")), 1_000_000u32.to_be());
        assert_eq!(anonymizer.get_ip_for_country(Some("")), 0);
        assert_eq!(anonymizer.get_ip_for_country(None), 0);
        assert_eq!(anonymizer.get_ip_for_country(Some("CA")), 0);
    }

    #[test]
    fn test_address_lookup_without_geolocation() {
        let anonymizer = Anonymizer::new(us_registry(), None, LoadStats::default());
        assert!(!anonymizer.has_geolocation());
        assert_eq!(anonymizer.get_ip_for_address(Ipv4Addr::new(8, 8, 8, 8).into()), 0);
        assert!(anonymizer.verify().is_none());
    }

    #[test]
    fn test_address_lookup_through_geolocation() {
        let anonymizer = Anonymizer::new(
            us_registry(),
            Some(Box::new(FixedLookup("US"))),
            LoadStats::default(),
        );
        let raw = u32::from(Ipv4Addr::new(8, 8, 8, 8)).to_be();
        assert_eq!(anonymizer.get_ip_for_address(raw), 1_000_000u32.to_be());

        let anonymizer = Anonymizer::new(
            us_registry(),
            Some(Box::new(FixedLookup("GB"))),
            LoadStats::default(),
        );
        assert_eq!(anonymizer.get_ip_for_address(raw), 0);
    }

    #[test]
    fn test_initialize_without_data_files() {
        let config = Config {
            whois_path: PathBuf::from("/nonexistent/GeoIPCountryWhois.csv"),
            verify: true,
            ..Config::default()
        };
        let anonymizer = initialize(&config);
        assert!(anonymizer.registry().is_empty());
        assert!(!anonymizer.has_geolocation());
        assert_eq!(anonymizer.get_ip_for_country(Some("US")), 0);
        shutdown(anonymizer);
    }

    #[test]
    fn test_new_keeps_given_stats() {
        let stats = LoadStats {
            lines: 12,
            undersized: 3,
            ranges: 9,
            added: 1,
            countries: 1,
            ..LoadStats::default()
        };
        let anonymizer = Anonymizer::new(us_registry(), None, stats);
        assert_eq!(anonymizer.load_stats(), stats);

        let anonymizer = Anonymizer::new(us_registry(), None, LoadStats::default());
        assert_eq!(anonymizer.load_stats().ranges, 0);
        assert_eq!(anonymizer.load_stats().lines, 0);
    }

    #[test]
    fn test_initialize_with_unreadable_tables() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config {
            whois_path: dir.path().to_path_buf(),
            ..Config::default()
        };
        let anonymizer = initialize(&config);
        assert!(anonymizer.registry().is_empty());
        assert!(!anonymizer.has_geolocation());
        assert_eq!(anonymizer.load_stats(), LoadStats::default());
        assert!(anonymizer.verify().is_none());
        shutdown(anonymizer);
    }
}
