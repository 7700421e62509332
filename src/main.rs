use chrono::Datelike;
use clap::{Parser, Subcommand};
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use tera_dispatch::config::DispatchConfig;
use tera_dispatch::dispatch::{render_ascii_distribution, Dispatcher};
use tera_dispatch::geo::{Coordinate, RawDegrees};
use tera_dispatch::logging::init_tracing;
use tera_dispatch::report::IncidentReport;
use tera_dispatch::server::{self, AppState};
use tera_dispatch::stats;
use tera_dispatch::zones::MatchRule;

/// Tera: emergency dispatch helper for Tigbauan, Iloilo
///
/// Estimates responder arrival times from the municipal plaza, buckets
/// free-text report locations into barangays, and builds dashboard stats.
///
/// Examples:
///   tera eta --lat 10.7746 --lng 122.3765
///   tera zone "Purok 3, Alupidian, Tigbauan"
///   tera stats reports.json --year 2025
///   tera dispatch reports.json --id 42 --response-type fire --notes "bring ladder"
///   tera serve --port 8080
#[derive(Parser)]
#[command(name = "tera", version, about, long_about = None)]
struct Cli {
    /// Config file. Defaults to ~/.tera/config.json.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Zone catalog JSON replacing the built-in barangay roster.
    #[arg(long, global = true)]
    zones: Option<PathBuf>,

    /// Zone match rule: "name-or-first-token" (loose) or "name-only" (strict).
    #[arg(long, global = true, value_parser = parse_rule)]
    rule: Option<MatchRule>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Estimate arrival time to a point.
    Eta {
        /// Destination latitude. Accepts text as stored by the portal.
        #[arg(long, allow_hyphen_values = true)]
        lat: Option<String>,

        /// Destination longitude.
        #[arg(long, allow_hyphen_values = true)]
        lng: Option<String>,

        /// Average responder speed in km/h.
        #[arg(long)]
        speed: Option<f64>,
    },

    /// Bucket a free-text location into a barangay.
    Zone {
        text: String,
    },

    /// List the zone catalog.
    Zones,

    /// Dashboard stats for a JSON array of reports.
    Stats {
        reports: PathBuf,

        /// Year for the monthly charts. Defaults to the current year.
        #[arg(long)]
        year: Option<i32>,
    },

    /// Dispatch responders to one report and print the updated record.
    Dispatch {
        reports: PathBuf,

        #[arg(long)]
        id: u64,

        /// fire, medical, police, rescue, ...
        #[arg(long)]
        response_type: String,

        #[arg(long)]
        notes: Option<String>,
    },

    /// Serve the JSON API.
    Serve {
        #[arg(long, default_value = "127.0.0.1")]
        host: String,

        #[arg(long, default_value_t = 8080)]
        port: u16,
    },
}

fn parse_rule(s: &str) -> Result<MatchRule, String> {
    s.parse()
}

fn fail(msg: impl std::fmt::Display) -> ! {
    eprintln!("Error: {}", msg);
    std::process::exit(1);
}

fn print_json<T: Serialize>(value: &T) {
    match serde_json::to_string_pretty(value) {
        Ok(s) => println!("{}", s),
        Err(e) => fail(e),
    }
}

fn load_reports(path: &Path) -> Vec<IncidentReport> {
    let data = fs::read_to_string(path)
        .unwrap_or_else(|e| fail(format!("Cannot read {}: {}", path.display(), e)));
    serde_json::from_str(&data)
        .unwrap_or_else(|e| fail(format!("Invalid reports file {}: {}", path.display(), e)))
}

fn load_config(cli: &Cli) -> DispatchConfig {
    let loaded = match &cli.config {
        Some(path) => DispatchConfig::load_from(path),
        None => DispatchConfig::load(),
    };
    let mut config = loaded.unwrap_or_else(|e| fail(e));

    // ── CLI overrides ───────────────────────────────────────────
    if let Some(ref zones) = cli.zones {
        config.zones_file = Some(zones.clone());
    }
    if let Some(rule) = cli.rule {
        config.match_rule = rule;
    }
    if let Command::Eta { speed: Some(speed), .. } = cli.command {
        config.average_speed_kmh = speed;
    }
    config
}

#[tokio::main]
async fn main() {
    init_tracing("info");
    let cli = Cli::parse();
    let config = load_config(&cli);
    let dispatcher = Dispatcher::from_config(&config).unwrap_or_else(|e| fail(e));

    match cli.command {
        Command::Eta { lat, lng, .. } => {
            let lat = lat.as_deref().map(RawDegrees::from);
            let lng = lng.as_deref().map(RawDegrees::from);
            let estimator = dispatcher.estimator();
            let estimate = estimator.estimate_raw(lat.as_ref(), lng.as_ref());

            eprintln!("  From {} at {} km/h", estimator.origin, estimator.average_speed_kmh);
            eprintln!("  ETA: {}", estimate);
            print_json(&estimate);
        }

        Command::Zone { text } => {
            let name = dispatcher.zone_of(Some(&text));
            eprintln!("  {} -> {}", text, name.unwrap_or("(no barangay)"));
            print_json(&serde_json::json!({
                "location": text,
                "barangay": name,
                "rule": dispatcher.rule(),
            }));
        }

        Command::Zones => {
            let catalog = dispatcher.catalog();
            let rows: Vec<serde_json::Value> = catalog
                .zones()
                .iter()
                .map(|z| {
                    let point: Coordinate = catalog.zone_coordinates(&z.name);
                    serde_json::json!({
                        "name": z.name,
                        "aliases": z.aliases,
                        "latitude": point.lat,
                        "longitude": point.lng,
                    })
                })
                .collect();
            eprintln!("  {} zones", rows.len());
            print_json(&rows);
        }

        Command::Stats { reports, year } => {
            let reports = load_reports(&reports);
            let year = year.unwrap_or_else(|| dispatcher.now_local().year());
            let catalog = dispatcher.catalog();

            let distribution = stats::zone_distribution(&reports, catalog, dispatcher.rule());
            eprint!("{}", render_ascii_distribution(&distribution, 30));

            let charts = stats::dashboard_charts(&reports, year, catalog, dispatcher.rule());
            let summary = stats::heatmap_summary(&reports, dispatcher.now_local());
            print_json(&serde_json::json!({
                "charts": charts,
                "summary": summary,
            }));
        }

        Command::Dispatch { reports, id, response_type, notes } => {
            let reports = load_reports(&reports);
            let report = reports
                .iter()
                .find(|r| r.id == id)
                .unwrap_or_else(|| fail(format!("No report with id {}", id)));

            let outcome = dispatcher.dispatch(report, &response_type, notes.as_deref(), dispatcher.now_local());
            eprintln!("  {}", outcome.message);
            print_json(&outcome);
        }

        Command::Serve { host, port } => {
            let state = AppState::new(dispatcher);
            if let Err(e) = server::start(state, &host, port).await {
                fail(format!("Cannot serve on {}:{}: {}", host, port, e));
            }
        }
    }
}
