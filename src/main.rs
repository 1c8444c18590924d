use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::{Days, Local, NaiveDate};
use clap::Parser;
use colored::Colorize;
use library_lending::{
    LibraryConfig, LibraryReport, LoanLogger, OverdueNotice, Snapshot, catalog::DemoCatalog,
};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Command-line arguments for the lending simulation
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// TOML file with the fine policy (defaults: 7 grace days, 1000 per day)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// How many days ago the first loan started
    #[arg(long, default_value_t = 10)]
    overdue_days: u64,

    /// Date to run the simulation on (YYYY-MM-DD), defaults to the local date
    #[arg(long)]
    today: Option<NaiveDate>,

    /// Print a JSON snapshot instead of the text reports
    #[arg(long)]
    json: bool,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,
}

/// Install the console subscriber; `RUST_LOG` overrides the default filter
fn init_logger(verbose: bool) {
    let default_filter =
        if verbose { "library_lending=debug,info" } else { "library_lending=info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr)
                .compact(),
        )
        .init();
}

/// Print a section heading
fn heading(title: &str) {
    println!("\n{}", format!("==== {title} ====").green().bold());
}

/// Seed the demo catalog, simulate an overdue loan and print the reports
fn main() -> Result<()> {
    let args = Args::parse();
    init_logger(args.verbose);

    let config = match &args.config {
        Some(path) => LibraryConfig::from_file(path)
            .with_context(|| format!("loading config from {}", path.display()))?,
        None => LibraryConfig::default(),
    };
    let today = args.today.unwrap_or_else(|| Local::now().date_naive());
    let loan_start = today
        .checked_sub_days(Days::new(args.overdue_days))
        .context("--overdue-days reaches before the supported calendar")?;

    let DemoCatalog { mut library, laskar_pelangi, java_ebook, raffi, asti, .. } =
        DemoCatalog::build(&config).context("seeding the demo catalog")?;
    library.register_observer(Box::new(LoanLogger));
    library.register_observer(Box::new(OverdueNotice));

    library.borrow_item(raffi, laskar_pelangi, loan_start).context("lending Laskar Pelangi")?;
    library.borrow_item(asti, java_ebook, today).context("lending Ebook Pemrograman Java")?;

    if args.json {
        let snapshot = Snapshot::capture(&library, today)?;
        println!("{}", snapshot.to_json()?);
        return Ok(());
    }

    heading("CATALOG");
    print!("{}", LibraryReport::catalog(&library));

    heading("LOAN ACTIVITY");
    print!("{}", LibraryReport::loan_activity(&library));

    heading("MEMBER FINES");
    print!("{}", LibraryReport::member_fines(&library, today)?);

    heading("MEMBER TRANSACTIONS");
    print!("{}", LibraryReport::member_transactions(&library, raffi)?);

    heading("SEARCH \"laskar\"");
    for (_, item) in library.find_items_by_title("laskar") {
        println!("{}", item.detail());
    }

    heading("BY PUBLICATION YEAR");
    for (_, item) in library.items_sorted_by_year() {
        println!("{} ({})", item.title(), item.year());
    }

    heading("COLLECTION STATISTICS");
    print!("{}", LibraryReport::category_statistics(&library));

    heading("RETURNS");
    for (member, item) in [(raffi, laskar_pelangi), (asti, java_ebook)] {
        let closed = library.return_item(member, item, today)?;
        if let Some(tx) = library.transaction(closed) {
            println!("{}", LibraryReport::describe_transaction(&library, tx));
        }
    }

    println!("\n{}", "Simulation complete!".green().bold());
    Ok(())
}
