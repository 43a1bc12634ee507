use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use std::path::{Path, PathBuf};

use statement_analyzer::analytics::{self, Period};
use statement_analyzer::{loader, report, session, Ledger};

/// Default session slot, one per working directory.
const DEFAULT_SESSION_PATH: &str = "analyzer_session.db";

/// Analyze bank statements: load a CSV/JSON ledger once, then run
/// summaries, rankings and trends against the stored session.
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to the session database.
    #[arg(long, global = true, default_value = DEFAULT_SESSION_PATH)]
    session: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse a CSV or JSON statement and store it as the active session.
    Load {
        /// Statement file (.csv or .json).
        file: PathBuf,
    },

    /// Show the first rows of the loaded ledger.
    Show {
        /// Number of rows to display.
        #[arg(long, default_value_t = 5)]
        rows: usize,
    },

    /// Display count, inflow, outflow and net balance.
    Summary,

    /// Show transaction frequency by description.
    Frequency,

    /// Calculate net inflow and outflow.
    NetFlow,

    /// Display the top k transactions by amount or frequency.
    TopK {
        /// Number of entries to display.
        #[arg(long, default_value_t = 5)]
        k: usize,

        /// Ranking key.
        #[arg(long, value_enum, default_value = "amount")]
        by: RankBy,
    },

    /// Draw a histogram of transaction amounts.
    Histogram {
        /// Number of bins.
        #[arg(long, default_value_t = 20)]
        bins: usize,
    },

    /// Draw the transaction trend over time.
    Trend {
        /// Bucket width: daily or monthly.
        #[arg(long, default_value = "daily")]
        period: Period,
    },

    /// Discard the active session.
    Clear,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum RankBy {
    Amount,
    Frequency,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Load { file } => {
            let ledger = loader::load_file(&file)?;
            let conn = session::open(&cli.session)?;
            session::save(&conn, &ledger)?;
            println!("✓ Loaded {} transactions from {}", ledger.len(), file.display());
            println!("✓ Session saved to {}", cli.session.display());
        }
        Commands::Clear => {
            let conn = session::open(&cli.session)?;
            session::clear(&conn)?;
            println!("✓ Session cleared");
        }
        command => {
            let ledger = load_session_ledger(&cli.session)?;
            run_analysis(command, &ledger);
        }
    }

    Ok(())
}

/// Fetch the active ledger; every analytics command starts here.
fn load_session_ledger(path: &Path) -> Result<Ledger> {
    let conn = session::open(path)?;
    Ok(session::load(&conn)?)
}

fn run_analysis(command: Commands, ledger: &Ledger) {
    match command {
        Commands::Show { rows } => {
            println!("{}", report::render_preview(ledger, rows));
        }
        Commands::Summary => {
            println!("{}", report::render_summary(&analytics::summary(ledger)));
        }
        Commands::Frequency => {
            println!("{}", report::render_frequency(&analytics::frequency(ledger)));
        }
        Commands::NetFlow => {
            println!("{}", report::render_net_flow(&analytics::net_flow(ledger)));
        }
        Commands::TopK { k, by } => match by {
            RankBy::Amount => {
                let top = analytics::top_by_amount(ledger, k);
                println!("{}", report::render_top_by_amount(&top, k));
            }
            RankBy::Frequency => {
                let top = analytics::top_by_frequency(ledger, k);
                println!("{}", report::render_top_by_frequency(&top, k));
            }
        },
        Commands::Histogram { bins } => {
            let amounts: Vec<f64> = ledger.iter().map(|tx| tx.amount).collect();
            println!("{}", report::render_histogram(&amounts, bins));
        }
        Commands::Trend { period } => {
            let points = analytics::trend(ledger, period);
            println!("{}", report::render_trend(&points, period));
        }
        // Load and Clear are handled before the session is read.
        Commands::Load { .. } | Commands::Clear => unreachable!(),
    }
}
