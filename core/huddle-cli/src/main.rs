//! `huddle`: operations CLI for the Family Huddle local database.
//!
//! 데이터 초기화/시드, 테이블 점검, 쿼리 실행, 순위 출력.

#![forbid(unsafe_code)]

use chrono::{Datelike, Local, NaiveDate};
use clap::{ArgAction, Parser, Subcommand};
use huddle_core::config::{ConfigResolver, HuddleConfig};
use huddle_core::services::{SeedOptions, SeedOutcome, SeedReport, StandingRow};
use huddle_core::{Database, HuddleError, HuddleResult, logging};
use serde_json::{Value, json};
use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::debug;

#[derive(Parser, Debug)]
#[command(name = "huddle")]
#[command(about = "Family Huddle local database operations")]
struct Cli {
    /// Table directory (overrides HUDDLE_DATA_DIR)
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,
    /// Flat JSON secrets file consulted before the environment
    #[arg(long, global = true)]
    secrets: Option<PathBuf>,
    /// Machine-readable output
    #[arg(long, global = true, default_value_t = false)]
    json: bool,
    /// Repeat for more log output (-v info, -vv debug, -vvv trace)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    verbose: u8,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Seed NFL reference data and sample accounts
    Init {
        /// Clear all tables first when data already exists
        #[arg(long, default_value_t = false)]
        force: bool,
        /// Season year (defaults to the current year)
        #[arg(long)]
        year: Option<i32>,
        /// RNG seed for reproducible data
        #[arg(long)]
        seed: Option<u64>,
    },
    /// Row count of every table
    Tables,
    /// Run an equality query and print matching rows as JSON
    Query {
        table: String,
        /// Comma-separated columns, or `*`
        #[arg(long, default_value = "*")]
        select: String,
        /// `field=value` predicate; repeatable
        #[arg(long = "eq", value_name = "FIELD=VALUE")]
        eq: Vec<String>,
        #[arg(long)]
        limit: Option<usize>,
    },
    /// Overall standings of a pool
    Standings {
        #[arg(long)]
        pool: String,
    },
}

// 종료 코드
const EXIT_FAILURE: u8 = 1;
const EXIT_USAGE: u8 = 2;

fn main() -> ExitCode {
    let cli = Cli::parse();
    logging::init_with_level(logging::level_for_verbosity(cli.verbose));

    let stdout = io::stdout();
    let mut out = stdout.lock();
    match run(cli, &mut out, Local::now().date_naive()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err}");
            match err {
                HuddleError::InvalidArguments(_)
                | HuddleError::Validation(_)
                | HuddleError::Config { .. } => ExitCode::from(EXIT_USAGE),
                _ => ExitCode::from(EXIT_FAILURE),
            }
        }
    }
}

fn open_database(cli: &Cli) -> HuddleResult<Database> {
    let resolver = ConfigResolver::standard(cli.secrets.as_deref())?;
    let mut config = HuddleConfig::resolve(&resolver)?;
    if let Some(dir) = &cli.data_dir {
        config.data_dir = dir.clone();
    }
    debug!(?config, "resolved configuration");
    Database::from_config(&config)
}

fn run(cli: Cli, out: &mut dyn Write, today: NaiveDate) -> HuddleResult<()> {
    let db = open_database(&cli)?;

    match &cli.command {
        Commands::Init { force, year, seed } => {
            let options = SeedOptions {
                year: year.unwrap_or_else(|| today.year()),
                today,
                force: *force,
                rng_seed: *seed,
            };
            let outcome = db.initialize(options)?;
            print_seed_outcome(out, &outcome, cli.json)
        }
        Commands::Tables => {
            let counts = db.table_counts()?;
            if cli.json {
                let map: serde_json::Map<String, Value> =
                    counts.into_iter().map(|(t, n)| (t, json!(n))).collect();
                writeln!(out, "{}", serde_json::to_string_pretty(&map)?)?;
            } else {
                for (table, count) in counts {
                    writeln!(out, "{table:<20} {count:>6}")?;
                }
            }
            Ok(())
        }
        Commands::Query {
            table,
            select,
            eq,
            limit,
        } => {
            let mut query = db.table(table).select(select);
            for predicate in eq {
                let (field, value) = parse_predicate(predicate)?;
                query = query.eq(&field, value);
            }
            if let Some(n) = limit {
                query = query.limit(*n);
            }
            let result = query.execute()?;
            writeln!(out, "{}", serde_json::to_string_pretty(&result.data)?)?;
            Ok(())
        }
        Commands::Standings { pool } => {
            let pool = db.pool(pool)?;
            let rows = db.standings(pool.id())?;
            print_standings(out, &pool.label(), &rows, cli.json)
        }
    }
}

/// `field=value`; numbers, booleans and `null` keep their JSON type.
fn parse_predicate(text: &str) -> HuddleResult<(String, Value)> {
    let (field, raw) = text.split_once('=').ok_or_else(|| {
        HuddleError::InvalidArguments(format!("expected FIELD=VALUE, got '{text}'"))
    })?;
    let field = field.trim();
    if field.is_empty() {
        return Err(HuddleError::InvalidArguments(format!(
            "missing field name in '{text}'"
        )));
    }
    let value = match serde_json::from_str::<Value>(raw) {
        Ok(v @ (Value::Number(_) | Value::Bool(_) | Value::Null)) => v,
        _ => Value::String(raw.to_string()),
    };
    Ok((field.to_string(), value))
}

fn print_seed_outcome(out: &mut dyn Write, outcome: &SeedOutcome, as_json: bool) -> HuddleResult<()> {
    match outcome {
        SeedOutcome::AlreadyInitialized => {
            if as_json {
                writeln!(out, "{}", json!({"status": "already_initialized"}))?;
            } else {
                writeln!(out, "Data already exists. Use --force to reinitialize.")?;
            }
        }
        SeedOutcome::Seeded(report) => {
            if as_json {
                writeln!(out, "{}", serde_json::to_string_pretty(&seed_report_json(report))?)?;
            } else {
                writeln!(out, "Loaded {} NFL teams", report.teams)?;
                writeln!(out, "Created season with {} weeks", report.weeks)?;
                writeln!(out, "Generated performance for {} teams", report.team_performance)?;
                writeln!(out, "Scheduled {} games", report.games)?;
                writeln!(out, "Created {} sample users (password: 'password')", report.users)?;
                writeln!(out, "Created {} sample pool", report.pools)?;
                writeln!(out, "Initialization complete.")?;
            }
        }
    }
    Ok(())
}

fn seed_report_json(report: &SeedReport) -> Value {
    json!({
        "status": "seeded",
        "season_id": report.season_id,
        "teams": report.teams,
        "weeks": report.weeks,
        "team_performance": report.team_performance,
        "games": report.games,
        "users": report.users,
        "profiles": report.profiles,
        "pools": report.pools,
    })
}

fn print_standings(
    out: &mut dyn Write,
    label: &str,
    rows: &[StandingRow],
    as_json: bool,
) -> HuddleResult<()> {
    if as_json {
        let rows: Vec<Value> = rows
            .iter()
            .map(|r| {
                json!({
                    "rank": r.rank,
                    "profile_id": r.profile_id,
                    "name": r.display_name,
                    "teams": r.teams,
                    "total_points": r.total_points,
                    "selections_complete": r.selections_complete,
                })
            })
            .collect();
        writeln!(out, "{}", serde_json::to_string_pretty(&rows)?)?;
        return Ok(());
    }

    writeln!(out, "{label}")?;
    if rows.is_empty() {
        writeln!(out, "No participants in this pool yet.")?;
        return Ok(());
    }
    for r in rows {
        let teams = if r.teams.is_empty() {
            "No teams selected".to_string()
        } else {
            r.teams.join(", ")
        };
        let status = if r.selections_complete { "complete" } else { "incomplete" };
        writeln!(
            out,
            "{:>3}. {:<24} {:>6}  {:<24} {}",
            r.rank, r.display_name, r.total_points, teams, status
        )?;
    }
    Ok(())
}
