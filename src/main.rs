//! tariff-compare entry point: CLI wiring, config loading and store seeding.

use std::path::Path;
use std::process;
use std::sync::Arc;

use chrono::Utc;
use tracing::{error, info};

use tariff_compare::api::{self, AppState};
use tariff_compare::cli::{parse_args, print_usage};
use tariff_compare::config::ServiceConfig;
use tariff_compare::io::{ReadingsGenerator, load_readings};
use tariff_compare::observability;
use tariff_compare::pricing::SystemClock;
use tariff_compare::store::ReadingStore;

fn main() {
    observability::init_tracing();

    let cli = match parse_args() {
        Ok(cli) => cli,
        Err(e) => {
            eprintln!("error: {e}");
            print_usage();
            process::exit(1);
        }
    };
    if cli.help {
        print_usage();
        return;
    }

    // --config takes priority over the built-in demo data set
    let mut config = if let Some(ref path) = cli.config {
        match ServiceConfig::from_toml_file(path) {
            Ok(cfg) => cfg,
            Err(e) => {
                eprintln!("{e}");
                process::exit(1);
            }
        }
    } else {
        ServiceConfig::demo()
    };

    if let Some(bind) = cli.bind {
        config.server.bind_addr = bind;
    }
    if let Some(seed) = cli.seed {
        config.readings.seed = seed;
    }
    if let Some(path) = cli.readings_csv {
        config.readings.csv_path = Some(path);
    }

    let errors = config.validate();
    if !errors.is_empty() {
        for e in &errors {
            eprintln!("{e}");
        }
        process::exit(1);
    }

    let (calendar, addr) = match (config.calendar(), config.bind_addr()) {
        (Ok(calendar), Ok(addr)) => (calendar, addr),
        (Err(e), _) | (_, Err(e)) => {
            eprintln!("{e}");
            process::exit(1);
        }
    };

    let accounts = config.account_directory();
    let readings = ReadingStore::new();

    if config.readings.per_meter > 0 {
        let r = &config.readings;
        let mut generator = ReadingsGenerator::new(r.per_meter, r.interval_secs, r.seed);
        if let Err(e) = generator.seed_store(&readings, accounts.meter_ids(), Utc::now()) {
            eprintln!("error: failed to generate demo readings: {e}");
            process::exit(1);
        }
    }
    if let Some(ref path) = config.readings.csv_path {
        if let Err(e) = import_csv(&readings, path) {
            eprintln!("error: failed to import readings: {e}");
            process::exit(1);
        }
    }

    let catalog = config.catalog();
    info!(
        plans = catalog.len(),
        accounts = accounts.len(),
        readings = readings.total_readings(),
        "loaded service data"
    );

    let state = Arc::new(AppState::new(
        Arc::new(catalog),
        Arc::new(accounts),
        Arc::new(readings),
        calendar,
        Arc::new(SystemClock),
    ));

    let rt = tokio::runtime::Runtime::new().unwrap_or_else(|e| {
        eprintln!("error: failed to create tokio runtime: {e}");
        process::exit(1);
    });
    if let Err(e) = rt.block_on(api::serve(state, addr)) {
        error!(error = %e, %addr, "server error");
        process::exit(1);
    }
}

fn import_csv(store: &ReadingStore, path: &Path) -> Result<(), tariff_compare::io::ImportError> {
    let by_meter = load_readings(path)?;
    for (meter_id, readings) in by_meter {
        info!(%meter_id, readings = readings.len(), path = %path.display(), "imported readings");
        store.store(&meter_id, readings);
    }
    Ok(())
}
