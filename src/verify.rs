//! Offline audit of the registry against the geolocation database.
//!
//! Every address of every retained range is resolved through the
//! [`CountryLookup`] and compared with the code of the pool holding it. The
//! cost is linear in the total number of retained addresses, so this is a
//! data-quality tool and is off by default.

use std::net::Ipv4Addr;

use log::{info, warn};
use rayon::prelude::*;
use serde::Serialize;

use crate::geo::CountryLookup;
use crate::ip::{substitute, Range, Registry, UNKNOWN_CODE};

/// Outcome of a verification pass
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct VerifyReport {
    pub countries: usize,
    /// Addresses resolved, the sum of inclusive range widths
    pub checked: u64,
    /// Addresses whose resolved country differs from their pool's
    pub failed: u64,
}

/// Audit every pool of `registry` against `geo`.
///
/// Each country also gets one substitution with the containment check
/// enabled, which aborts the process if the drawn address escapes its range.
pub fn verify_registry(registry: &Registry, geo: &dyn CountryLookup) -> VerifyReport {
    let mut report = VerifyReport::default();

    for (code, pool) in registry.pools() {
        info!("verifying {}", code);
        substitute(registry, code.as_str(), true);

        for range in pool.ranges() {
            report.checked += range.width();
            report.failed += count_mismatches(range, code.as_str(), geo);
        }
        report.countries += 1;
    }

    info!(
        "checked {} ip addresses, fail count: {}",
        report.checked, report.failed
    );
    report
}

fn count_mismatches(range: &Range, expected: &str, geo: &dyn CountryLookup) -> u64 {
    (range.start()..=range.end())
        .into_par_iter()
        .filter(|addr| {
            let addr = Ipv4Addr::from(*addr);
            let found = geo.lookup_country(addr).unwrap_or(UNKNOWN_CODE);
            if found == expected {
                return false;
            }
            warn!("privext: country does not match: {} != {} ({})", expected, found, addr);
            true
        })
        .count() as u64
}
