//! Per-country range pools and their capacity policy.

use rand::Rng;
use serde::Serialize;

use super::range::Range;

/// Upper bound on ranges kept per country when randomization is enabled
pub const MAX_POOL_SIZE: usize = 100;

/// How substitute addresses are produced for a country
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AddressMode {
    /// One range per country; every lookup yields its start address
    #[default]
    Fixed,
    /// Up to [`MAX_POOL_SIZE`] ranges; every lookup draws a fresh address
    Randomized,
}

impl AddressMode {
    pub fn from_flag(randomize: bool) -> Self {
        if randomize {
            AddressMode::Randomized
        } else {
            AddressMode::Fixed
        }
    }

    /// Maximum number of ranges a pool may hold under this mode.
    pub fn pool_capacity(self) -> usize {
        match self {
            AddressMode::Fixed => 1,
            AddressMode::Randomized => MAX_POOL_SIZE,
        }
    }
}

/// The ranges registered for one country, in file order.
#[derive(Debug, Clone, Serialize)]
pub struct Pool {
    ranges: Vec<Range>,
    #[serde(skip)]
    capacity: usize,
}

impl Pool {
    pub fn new(mode: AddressMode) -> Self {
        Self {
            ranges: Vec::new(),
            capacity: mode.pool_capacity(),
        }
    }

    pub fn ranges(&self) -> &[Range] {
        &self.ranges
    }

    pub fn len(&self) -> usize {
        self.ranges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ranges.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.ranges.len() >= self.capacity
    }

    /// Append a range unless the pool is already full.
    ///
    /// Returns whether the range was kept. The first ranges offered win;
    /// later ones are dropped regardless of their size.
    pub fn add_range(&mut self, range: Range) -> bool {
        if self.is_full() {
            return false;
        }
        self.ranges.push(range);
        true
    }

    /// Sum of the inclusive widths of all retained ranges.
    pub fn address_count(&self) -> u64 {
        self.ranges.iter().map(Range::width).sum()
    }

    /// The representative range used in [`AddressMode::Fixed`].
    pub fn first(&self) -> Option<&Range> {
        self.ranges.first()
    }

    /// Pick a range uniformly, then an address uniformly inside it.
    pub fn pick<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<(Range, u32)> {
        if self.ranges.is_empty() {
            return None;
        }
        let range = self.ranges[rng.gen_range(0..self.ranges.len())];
        let addr = rng.gen_range(range.start()..=range.end());
        Some((range, addr))
    }

    pub(crate) fn shrink_to_fit(&mut self) {
        self.ranges.shrink_to_fit();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn range(start: u32, end: u32) -> Range {
        Range::new(start, end).unwrap()
    }

    #[test]
    fn test_fixed_pool_keeps_first_range_only() {
        let mut pool = Pool::new(AddressMode::Fixed);
        assert!(pool.add_range(range(1000, 9000)));
        assert!(!pool.add_range(range(20000, 90000)));
        assert_eq!(pool.len(), 1);
        assert_eq!(pool.first(), Some(&range(1000, 9000)));
    }

    #[test]
    fn test_randomized_pool_caps_at_max() {
        let mut pool = Pool::new(AddressMode::Randomized);
        let mut added = 0;
        for i in 0..250u32 {
            if pool.add_range(range(i * 10_000, i * 10_000 + 5_000)) {
                added += 1;
            }
        }
        assert_eq!(added, MAX_POOL_SIZE);
        assert_eq!(pool.len(), MAX_POOL_SIZE);
        assert_eq!(pool.ranges()[0], range(0, 5_000));
        assert_eq!(pool.ranges()[99], range(990_000, 995_000));
    }

    #[test]
    fn test_pick_stays_inside_chosen_range() {
        let mut pool = Pool::new(AddressMode::Randomized);
        pool.add_range(range(10, 10));
        pool.add_range(range(5_000, 10_000));
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..1_000 {
            let (chosen, addr) = pool.pick(&mut rng).unwrap();
            assert!(chosen.contains(addr));
        }
    }

    #[test]
    fn test_pick_on_empty_pool() {
        let pool = Pool::new(AddressMode::Randomized);
        let mut rng = StdRng::seed_from_u64(1);
        assert!(pool.pick(&mut rng).is_none());
    }

    #[test]
    fn test_address_count_sums_inclusive_widths() {
        let mut pool = Pool::new(AddressMode::Randomized);
        pool.add_range(range(0, 9));
        pool.add_range(range(100, 100));
        assert_eq!(pool.address_count(), 11);
    }
}
