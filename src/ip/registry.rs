//! Country → pool registry.
//!
//! Built once at startup by the whois loader, then only read. Pools are keyed
//! by canonical [`CountryCode`], so lookups by raw string only match codes the
//! loader could have produced.

use std::collections::BTreeMap;

use log::debug;

use super::country::CountryCode;
use super::pool::{AddressMode, Pool};
use super::range::Range;

/// Registry of substitution pools for every country seen in the whois table
#[derive(Debug, Clone, Default)]
pub struct Registry {
    mode: AddressMode,
    pools: BTreeMap<CountryCode, Pool>,
}

impl Registry {
    pub fn new(mode: AddressMode) -> Self {
        Self {
            mode,
            pools: BTreeMap::new(),
        }
    }

    pub fn mode(&self) -> AddressMode {
        self.mode
    }

    /// Offer a range to the pool of `code`, creating the pool on first use.
    ///
    /// Returns whether the pool kept the range.
    pub fn add_range(&mut self, code: CountryCode, range: Range) -> bool {
        let mode = self.mode;
        self.pools
            .entry(code)
            .or_insert_with(|| Pool::new(mode))
            .add_range(range)
    }

    /// Pool for an exact canonical code (including `"unknown"`).
    pub fn pool(&self, code: &str) -> Option<&Pool> {
        self.pools.get(code)
    }

    pub fn pools(&self) -> impl Iterator<Item = (CountryCode, &Pool)> {
        self.pools.iter().map(|(code, pool)| (*code, pool))
    }

    pub fn country_count(&self) -> usize {
        self.pools.len()
    }

    pub fn range_count(&self) -> usize {
        self.pools.values().map(Pool::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.pools.is_empty()
    }

    /// Release spare pool capacity left over from the build.
    pub fn compact(&mut self) {
        for pool in self.pools.values_mut() {
            pool.shrink_to_fit();
        }
        debug!(
            "Compacted registry: {} countries, {} ranges",
            self.country_count(),
            self.range_count()
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn range(start: u32, end: u32) -> Range {
        Range::new(start, end).unwrap()
    }

    #[test]
    fn test_pools_created_lazily() {
        let mut registry = Registry::new(AddressMode::Fixed);
        assert!(registry.is_empty());
        assert!(registry.pool("US").is_none());

        assert!(registry.add_range(CountryCode::normalize("US"), range(1_000_000, 20_000_000)));
        assert_eq!(registry.country_count(), 1);
        assert_eq!(registry.pool("US").unwrap().len(), 1);
    }

    #[test]
    fn test_capacity_follows_mode() {
        let mut fixed = Registry::new(AddressMode::Fixed);
        let mut randomized = Registry::new(AddressMode::Randomized);
        let us = CountryCode::normalize("US");
        for i in 0..5u32 {
            fixed.add_range(us, range(i * 100_000, i * 100_000 + 50_000));
            randomized.add_range(us, range(i * 100_000, i * 100_000 + 50_000));
        }
        assert_eq!(fixed.pool("US").unwrap().len(), 1);
        assert_eq!(randomized.pool("US").unwrap().len(), 5);
        assert_eq!(randomized.range_count(), 5);
    }

    #[test]
    fn test_unknown_codes_share_one_pool() {
        let mut registry = Registry::new(AddressMode::Randomized);
        registry.add_range(CountryCode::normalize("XX"), range(0, 10_000));
        registry.add_range(CountryCode::normalize("zz"), range(20_000, 30_000));
        assert_eq!(registry.country_count(), 1);
        assert_eq!(registry.pool("unknown").unwrap().len(), 2);
        assert!(registry.pool("XX").is_none());
    }

    #[test]
    fn test_compact_keeps_contents() {
        let mut registry = Registry::new(AddressMode::Randomized);
        registry.add_range(CountryCode::normalize("DE"), range(0, 10_000));
        registry.compact();
        assert_eq!(registry.pool("DE").unwrap().ranges(), &[range(0, 10_000)]);
    }
}
