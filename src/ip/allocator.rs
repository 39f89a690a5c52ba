//! Substitute address selection.
//!
//! In [`AddressMode::Fixed`] a country always maps to the start of its single
//! range. In [`AddressMode::Randomized`] every call builds a new generator from
//! a fresh seed, so successive substitutions share no generator state.

use std::net::Ipv4Addr;
use std::sync::LazyLock;
use std::time::Instant;

use chrono::Utc;
use log::error;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::pool::{AddressMode, Pool};
use super::range::Range;
use super::registry::Registry;

/// Reference point for the monotonic half of the seed
static CLOCK_ANCHOR: LazyLock<Instant> = LazyLock::new(Instant::now);

/// A drawn address that falls outside the range it was drawn from
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("address {addr} drawn outside of range {}-{}", .range.first_addr(), .range.last_addr())]
pub struct ContainmentViolation {
    pub range: Range,
    pub addr: Ipv4Addr,
}

/// Seed for a single randomized lookup.
///
/// Mixes a high-resolution monotonic reading with the wall clock so that
/// neither source alone determines the generator state.
pub fn fresh_seed() -> u64 {
    let ticks = CLOCK_ANCHOR.elapsed().as_nanos() as u64;
    let wall = Utc::now().timestamp_nanos_opt().unwrap_or_default() as u64;
    ticks.rotate_left(29) ^ wall ^ u64::from(std::process::id()).rotate_left(48)
}

/// Check that `addr` lies within `range`.
pub fn check_containment(range: &Range, addr: u32) -> Result<(), ContainmentViolation> {
    if range.contains(addr) {
        Ok(())
    } else {
        Err(ContainmentViolation {
            range: *range,
            addr: Ipv4Addr::from(addr),
        })
    }
}

/// Substitute address for a canonical country code.
///
/// Returns `None` when the registry has no pool for `code`. A generator is
/// only seeded in [`AddressMode::Randomized`]. With `verify` set, a drawn
/// address outside its range aborts the process.
pub fn substitute(registry: &Registry, code: &str, verify: bool) -> Option<Ipv4Addr> {
    let pool = registry.pool(code)?;
    match registry.mode() {
        AddressMode::Fixed => pool.first().map(Range::first_addr),
        AddressMode::Randomized => {
            let mut rng = StdRng::seed_from_u64(fresh_seed());
            draw(pool, &mut rng, verify)
        }
    }
}

/// [`substitute`] with a caller-provided generator, left untouched in
/// [`AddressMode::Fixed`].
pub fn substitute_with_rng<R: Rng + ?Sized>(
    registry: &Registry,
    code: &str,
    rng: &mut R,
    verify: bool,
) -> Option<Ipv4Addr> {
    let pool = registry.pool(code)?;
    match registry.mode() {
        AddressMode::Fixed => pool.first().map(Range::first_addr),
        AddressMode::Randomized => draw(pool, rng, verify),
    }
}

fn draw<R: Rng + ?Sized>(pool: &Pool, rng: &mut R, verify: bool) -> Option<Ipv4Addr> {
    let (range, addr) = pool.pick(rng)?;
    if verify {
        if let Err(violation) = check_containment(&range, addr) {
            error!("privext: internal invariant violated: {violation}");
            std::process::abort();
        }
    }
    Some(Ipv4Addr::from(addr))
}
