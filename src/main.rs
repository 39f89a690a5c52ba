use clap::{Parser, Subcommand};
use color_eyre::eyre::{bail, WrapErr};
use color_eyre::Result;
use env_logger::Env;
use log::info;
use serde::Serialize;
use std::net::Ipv4Addr;
use std::path::PathBuf;

use privext::utils::parse_ipv4;
use privext::{config_loader, initialize, shutdown, Anonymizer, Config};

/// Country-preserving IPv4 address substitution
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to a YAML configuration file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Whois table to build substitution pools from
    #[arg(long, global = true)]
    whois: Option<PathBuf>,

    /// Table used for by-address country lookups (default: the whois table)
    #[arg(long, global = true)]
    geoip: Option<PathBuf>,

    /// Draw a random address per lookup
    #[arg(long, global = true)]
    randomize: bool,

    /// Run the verification pass at startup
    #[arg(long, global = true)]
    verify: bool,

    /// Print results as JSON
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Load the tables and print load statistics (default)
    Summary,
    /// Print substitutes for country codes and addresses
    Lookup {
        /// Two-letter country code
        #[arg(long = "country")]
        countries: Vec<String>,
        /// Real IPv4 address
        #[arg(long = "address", value_parser = parse_ipv4)]
        addresses: Vec<Ipv4Addr>,
    },
    /// Audit every retained address against the geolocation table
    Verify,
}

#[derive(Serialize, Debug)]
struct LookupResult {
    query: String,
    substitute: Option<Ipv4Addr>,
}

impl Args {
    fn resolve_config(&self) -> Result<Config> {
        let mut config = config_loader::resolve_config(self.config.as_deref())?;
        if let Some(whois) = &self.whois {
            config.whois_path = whois.clone();
        }
        if let Some(geoip) = &self.geoip {
            config.geoip_path = Some(geoip.clone());
        }
        config.randomize |= self.randomize;
        config.verify |= self.verify;
        config.validate()?;
        Ok(config)
    }
}

fn lookup(anonymizer: &Anonymizer, countries: &[String], addresses: &[Ipv4Addr]) -> Vec<LookupResult> {
    let by_country = countries.iter().map(|code| LookupResult {
        query: code.clone(),
        substitute: anonymizer.substitute_country(code),
    });
    let by_address = addresses.iter().map(|addr| LookupResult {
        query: addr.to_string(),
        substitute: anonymizer.substitute_address(*addr),
    });
    by_country.chain(by_address).collect()
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let out = serde_json::to_string_pretty(value).wrap_err("Failed to serialize output")?;
    println!("{}", out);
    Ok(())
}

fn main() -> Result<()> {
    color_eyre::install()?;

    let args = Args::parse();

    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    let mut config = args.resolve_config()?;
    let command = args.command.unwrap_or(Command::Summary);

    // the verify command runs the pass itself
    let explicit_verify = matches!(command, Command::Verify);
    if explicit_verify {
        config.verify = false;
    }

    info!("Whois table: {:?}", config.whois_path);
    info!("Address mode: {:?}", config.address_mode());

    let anonymizer = initialize(&config);

    match command {
        Command::Summary => {
            let stats = anonymizer.load_stats();
            if args.json {
                print_json(&stats)?;
            } else {
                println!(
                    "lines: {}  malformed: {}  inverted: {}  undersized: {}",
                    stats.lines, stats.malformed, stats.inverted, stats.undersized
                );
                println!(
                    "countries: {}  ranges: {}  added ranges: {}",
                    stats.countries, stats.ranges, stats.added
                );
            }
        }
        Command::Lookup { countries, addresses } => {
            let results = lookup(&anonymizer, &countries, &addresses);
            if args.json {
                print_json(&results)?;
            } else {
                for result in &results {
                    match result.substitute {
                        Some(addr) => println!("{} -> {}", result.query, addr),
                        None => println!("{} -> (none)", result.query),
                    }
                }
            }
        }
        Command::Verify => {
            let Some(report) = anonymizer.verify() else {
                bail!("No geolocation table loaded from {:?}", config.geoip_path());
            };
            if args.json {
                print_json(&report)?;
            } else {
                println!(
                    "countries: {}  checked: {}  failed: {}",
                    report.countries, report.checked, report.failed
                );
            }
        }
    }

    shutdown(anonymizer);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parsing() {
        let args = Args::parse_from(["privext", "--whois", "table.csv", "--randomize"]);
        assert_eq!(args.whois, Some(PathBuf::from("table.csv")));
        assert!(args.randomize);
        assert!(args.command.is_none());
    }

    #[test]
    fn test_lookup_args() {
        let args = Args::parse_from([
            "privext",
            "lookup",
            "--country",
            "US",
            "--country",
            "DE",
            "--address",
            "8.8.8.8",
            "--json",
        ]);
        assert!(args.json);
        match args.command {
            Some(Command::Lookup { countries, addresses }) => {
                assert_eq!(countries, vec!["US".to_string(), "DE".to_string()]);
                assert_eq!(addresses, vec![Ipv4Addr::new(8, 8, 8, 8)]);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_bad_address_rejected() {
        assert!(Args::try_parse_from(["privext", "lookup", "--address", "8.8.8"]).is_err());
    }
}
