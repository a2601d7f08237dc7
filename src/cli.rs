//! Command-line argument parsing.

use std::env;
use std::path::PathBuf;

/// Parsed CLI arguments.
#[derive(Debug, Default)]
pub struct CliOptions {
    pub config: Option<PathBuf>,
    pub bind: Option<String>,
    pub seed: Option<u64>,
    pub readings_csv: Option<PathBuf>,
    pub help: bool,
}

/// Parses the process arguments.
///
/// # Errors
///
/// Returns a message describing the first invalid argument.
pub fn parse_args() -> Result<CliOptions, String> {
    let args: Vec<String> = env::args().skip(1).collect();
    parse_args_from(&args)
}

/// Parses an argument list (without the program name).
///
/// # Errors
///
/// Returns a message describing the first invalid argument.
pub fn parse_args_from(args: &[String]) -> Result<CliOptions, String> {
    let mut i = 0usize;
    let mut opts = CliOptions::default();

    while i < args.len() {
        match args[i].as_str() {
            "--config" => {
                i += 1;
                let path = args.next_or_err(
                    i,
                    "missing value for --config (expected a TOML file path)",
                )?;
                if opts.config.replace(PathBuf::from(path)).is_some() {
                    return Err("--config provided more than once".to_string());
                }
            }
            "--bind" => {
                i += 1;
                let addr = args.next_or_err(i, "missing value for --bind (expected host:port)")?;
                if opts.bind.replace(addr.to_string()).is_some() {
                    return Err("--bind provided more than once".to_string());
                }
            }
            "--seed" => {
                i += 1;
                let raw = args.next_or_err(i, "missing value for --seed (expected a u64)")?;
                let seed = raw
                    .parse::<u64>()
                    .map_err(|_| format!("--seed value \"{raw}\" is not a valid u64"))?;
                opts.seed = Some(seed);
            }
            "--readings-csv" => {
                i += 1;
                let path = args.next_or_err(
                    i,
                    "missing value for --readings-csv (expected a file path)",
                )?;
                if opts.readings_csv.replace(PathBuf::from(path)).is_some() {
                    return Err("--readings-csv provided more than once".to_string());
                }
            }
            "--help" | "-h" => opts.help = true,
            other => return Err(format!("unknown argument: {other}")),
        }
        i += 1;
    }

    Ok(opts)
}

trait SliceArgExt {
    fn next_or_err(&self, index: usize, err: &str) -> Result<&str, String>;
}

impl SliceArgExt for [String] {
    fn next_or_err(&self, index: usize, err: &str) -> Result<&str, String> {
        self.get(index)
            .map(String::as_str)
            .ok_or_else(|| err.to_string())
    }
}

pub fn print_usage() {
    eprintln!("tariff-compare: smart meter price plan comparison API");
    eprintln!();
    eprintln!("Usage: tariff-compare [OPTIONS]");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  --config <path>         Load configuration from a TOML file");
    eprintln!("  --bind <host:port>      Override server.bind_addr");
    eprintln!("  --seed <u64>            Override the demo readings seed");
    eprintln!("  --readings-csv <path>   Import readings from CSV at startup");
    eprintln!("  --help                  Show this help message");
    eprintln!();
    eprintln!("Without --config the built-in demo plans and meters are used.");
}
