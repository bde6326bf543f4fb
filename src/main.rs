//! SmartSplit Settle CLI
//!
//! Reads one CSV file per group and prints suggested settlements as CSV.
//!
//! # Usage
//!
//! ```bash
//! cargo run -- trip.csv flat.csv > settlements.csv
//! cargo run -- --balances trip.csv
//! cargo run -- --member alice --members members.csv trip.csv flat.csv
//! ```
//!
//! # Environment Variables
//!
//! - `RUST_LOG`: Set to `debug` or `warn` to control logging verbosity
//! - `SMARTSPLIT_TOLERANCE`: Default for `--tolerance`
//! - `SMARTSPLIT_CURRENCY`: Default for `--currency`

use clap::Parser;
use log::info;
use smartsplit_settle::report::{self, GroupReport, Names};
use smartsplit_settle::{
    load_expenses, MemberDirectory, MemberId, MemberSummary, Money, Result, SettlementConfig,
    SettlementEngine, SettlementResult,
};
use std::fs::File;
use std::io::{self, BufReader};
use std::path::{Path, PathBuf};
use std::process;

#[derive(Parser, Debug)]
#[command(name = "smartsplit-settle", version, about = "Suggest settlements for shared group expenses")]
struct Cli {
    /// Group expense files (columns: type,expense,member,amount,currency)
    #[arg(required = true)]
    groups: Vec<PathBuf>,

    /// Balances within this amount of zero count as settled
    #[arg(long, env = "SMARTSPLIT_TOLERANCE", default_value = "0.01")]
    tolerance: Money,

    /// Currency for expenses that do not name one
    #[arg(long, env = "SMARTSPLIT_CURRENCY", default_value = SettlementConfig::DEFAULT_CURRENCY)]
    currency: String,

    /// Member directory (columns: id,name,email) used to add display names
    #[arg(long, value_name = "CSV")]
    members: Option<PathBuf>,

    /// Write net balances instead of settlements
    #[arg(long, conflicts_with = "member")]
    balances: bool,

    /// Write only the settlements involving this member, across all groups
    #[arg(long, value_name = "ID")]
    member: Option<String>,

    /// Net each currency of a group separately
    #[arg(long)]
    by_currency: bool,

    /// Reject expenses whose splits do not add up to their amount
    #[arg(long)]
    strict: bool,
}

fn main() {
    env_logger::init();

    let cli = Cli::parse();
    if let Err(e) = run(cli) {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    let config = SettlementConfig::new(cli.tolerance, cli.currency.trim().to_uppercase())?;
    let dp = config.minor_unit_dp();
    let engine = SettlementEngine::new(config);

    let directory = match &cli.members {
        Some(path) => Some(MemberDirectory::from_csv(BufReader::new(File::open(path)?))?),
        None => None,
    };
    let names = Names::new(directory.as_ref());

    let mut results: Vec<(String, SettlementResult)> = Vec::new();
    for path in &cli.groups {
        let group = group_name(path);
        let file = File::open(path)?;
        let expenses = load_expenses(BufReader::new(file), engine.config(), cli.strict)?;
        info!("Group {}: loaded {} expenses", group, expenses.len());

        if cli.by_currency {
            for (_, result) in engine.compute_by_currency(&expenses) {
                results.push((group.clone(), result));
            }
        } else {
            results.push((group, engine.compute(&expenses)));
        }
    }

    let stdout = io::stdout();
    let handle = stdout.lock();

    if let Some(member) = cli.member {
        let summary = MemberSummary::collect(
            MemberId::new(member),
            results.iter().map(|(group, result)| (group.as_str(), result)),
        );
        for (currency, totals) in &summary.totals {
            info!(
                "{}: you owe {} {}, you are owed {} {}",
                summary.member,
                totals.owed.format_dp(dp),
                currency,
                totals.owed_to_you.format_dp(dp),
                currency
            );
        }
        return report::write_member_view(handle, &summary, &names, dp);
    }

    let reports: Vec<GroupReport<'_>> = results
        .iter()
        .map(|(group, result)| GroupReport {
            group: group.as_str(),
            result,
        })
        .collect();

    if cli.balances {
        report::write_balances(handle, &reports, &names, dp)
    } else {
        report::write_settlements(handle, &reports, &names, dp)
    }
}

/// Group name shown in output: the file name without its extension.
fn group_name(path: &Path) -> String {
    path.file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
