//! By-address country lookup.
//!
//! Substitution by real address and the verification pass both need to ask
//! "which country does this address belong to". That question is answered by
//! a [`CountryLookup`] implementation. [`WhoisCountryLookup`] answers it from
//! a whois-format table kept whole: every valid record, with no size filter
//! and no per-country cap.

use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::net::Ipv4Addr;
use std::path::Path;

use log::{info, warn};

use crate::ip::CountryCode;
use crate::whois::{parse_line, LoadError};

/// Resolves an address to the two-letter code of its country
pub trait CountryLookup: Send + Sync {
    /// Country of `addr`, or `None` when the database has no answer.
    fn lookup_country(&self, addr: Ipv4Addr) -> Option<&str>;
}

#[derive(Debug, Clone, Copy)]
struct Entry {
    start: u32,
    end: u32,
    country: CountryCode,
}

/// Interval table answering lookups by binary search.
///
/// Rows are kept disjoint: after sorting by start address, a row that
/// overlaps an earlier kept row is dropped, so the enclosing row of a nested
/// pair is the one that answers.
#[derive(Debug, Clone, Default)]
pub struct WhoisCountryLookup {
    entries: Vec<Entry>,
}

impl WhoisCountryLookup {
    /// Build from a whois table. Lines that do not parse are ignored, and so
    /// are records whose code is not a known country. An I/O error from
    /// `reader` fails the whole build.
    pub fn from_reader<R: BufRead>(reader: R) -> io::Result<Self> {
        let mut entries = Vec::new();
        for line in reader.split(b'\n') {
            let line = line?;
            let Ok(text) = std::str::from_utf8(&line) else {
                continue;
            };
            let Ok(record) = parse_line(text) else {
                continue;
            };
            let country = record.country();
            if country.is_unknown() {
                continue;
            }
            entries.push(Entry {
                start: record.range.start(),
                end: record.range.end(),
                country,
            });
        }
        entries.sort_by_key(|entry| entry.start);

        let total = entries.len();
        let mut disjoint: Vec<Entry> = Vec::with_capacity(total);
        for entry in entries {
            let overlaps = disjoint.last().is_some_and(|prev| entry.start <= prev.end);
            if !overlaps {
                disjoint.push(entry);
            }
        }
        if disjoint.len() < total {
            warn!(
                "Dropped {} overlapping geolocation ranges",
                total - disjoint.len()
            );
        }
        disjoint.shrink_to_fit();
        Ok(Self { entries: disjoint })
    }

    pub fn open(path: &Path) -> Result<Self, LoadError> {
        let file = File::open(path).map_err(|source| LoadError::Open {
            path: path.to_path_buf(),
            source,
        })?;
        let lookup = Self::from_reader(BufReader::new(file)).map_err(|source| LoadError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        info!("Loaded {} geolocation ranges from {:?}", lookup.len(), path);
        Ok(lookup)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl CountryLookup for WhoisCountryLookup {
    fn lookup_country(&self, addr: Ipv4Addr) -> Option<&str> {
        let addr = u32::from(addr);
        let idx = self.entries.partition_point(|entry| entry.start <= addr);
        let entry = self.entries.get(idx.checked_sub(1)?)?;
        (addr <= entry.end).then(|| entry.country.as_str())
    }
}
