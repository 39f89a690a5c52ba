//! Builds a [`Registry`] from a whois table.
//!
//! Bad records never abort the load: each is skipped and tallied in
//! [`LoadStats`]. Only failing to open or read the table is reported as an
//! error, and a table that fails partway through yields no registry at all.

use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::{Path, PathBuf};

use log::info;
use serde::Serialize;

use super::parser::{parse_line, RecordError};
use crate::ip::{AddressMode, Registry};

/// Ranges of this many addresses or fewer are not worth substituting from
pub const MIN_RANGE_WIDTH: u64 = 4096;

/// Default whois table file name
pub const DEFAULT_WHOIS_DB: &str = "GeoIPCountryWhois.csv";

/// Errors opening a whois table
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("cannot open {}: {source}", path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("cannot read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Counters collected while loading a whois table
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct LoadStats {
    /// Lines read, including rejected ones
    pub lines: usize,
    /// Lines not matching the record layout, with bad bounds or a bad code field
    pub malformed: usize,
    /// Records with `end < start`
    pub inverted: usize,
    /// Records no wider than [`MIN_RANGE_WIDTH`]
    pub undersized: usize,
    /// Valid records wide enough to be offered to a pool
    pub ranges: usize,
    /// Ranges actually kept by their pool
    pub added: usize,
    /// Distinct canonical countries in the resulting registry
    pub countries: usize,
}

impl LoadStats {
    fn reject(&mut self, err: &RecordError) {
        match err {
            RecordError::Inverted(_) => self.inverted += 1,
            RecordError::Malformed | RecordError::BadBound(_) | RecordError::BadCountryCode(_) => {
                self.malformed += 1
            }
        }
    }
}

/// Load a registry from any buffered reader.
///
/// An I/O error from `reader` aborts the load.
pub fn load_registry<R: BufRead>(reader: R, mode: AddressMode) -> io::Result<(Registry, LoadStats)> {
    let mut registry = Registry::new(mode);
    let mut stats = LoadStats::default();

    for line in reader.split(b'\n') {
        let line = line?;
        stats.lines += 1;

        let Ok(text) = std::str::from_utf8(&line) else {
            stats.malformed += 1;
            continue;
        };

        let record = match parse_line(text) {
            Ok(record) => record,
            Err(e) => {
                stats.reject(&e);
                continue;
            }
        };

        if record.range.width() <= MIN_RANGE_WIDTH {
            stats.undersized += 1;
            continue;
        }

        stats.ranges += 1;
        if registry.add_range(record.country(), record.range) {
            stats.added += 1;
        }
    }

    stats.countries = registry.country_count();
    Ok((registry, stats))
}

/// Open `path` and load a registry from it.
pub fn load_registry_file(path: &Path, mode: AddressMode) -> Result<(Registry, LoadStats), LoadError> {
    info!("Loading whois table from: {:?}", path);
    let file = File::open(path).map_err(|source| LoadError::Open {
        path: path.to_path_buf(),
        source,
    })?;
    load_registry(BufReader::new(file), mode).map_err(|source| LoadError::Read {
        path: path.to_path_buf(),
        source,
    })
}
