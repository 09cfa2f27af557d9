use anyhow::Context;
use chrono::Local;
use clap::{Parser, Subcommand};
use comfy_table::Table;
use configuration::{LoggingSettings, Overrides};
use dashboard::DashboardContext;
use dashboard::ranking::{sales_ranking, visits_ranking};
use std::path::PathBuf;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// The main entry point for the marketplace dashboard.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // A missing .env file is fine; it only supplies optional overrides.
    dotenvy::dotenv().ok();

    // Parse command-line arguments
    let cli = Cli::parse();

    let mut settings = configuration::load_config(&cli.config)
        .with_context(|| format!("Failed to load configuration from {:?}", cli.config))?;

    match &cli.command {
        Commands::Serve(args) => settings.apply_overrides(&args.overrides),
        Commands::Report(args) => settings.apply_overrides(&Overrides {
            seed: args.seed,
            days: args.days,
            ..Overrides::default()
        }),
    }

    // Keep the guard alive so buffered file logs are flushed on exit.
    let _log_guard = init_tracing(&settings.logging)?;

    let today = Local::now().date_naive();
    let context = DashboardContext::bootstrap(&settings, today)
        .context("Failed to build the dashboard context")?;

    // Execute the appropriate command
    match cli.command {
        Commands::Serve(_) => {
            let addr = settings.server.bind_address();
            tracing::info!(
                %addr,
                seed = ?settings.data.seed,
                days = settings.data.days,
                "Starting dashboard server..."
            );
            web_server::run_server(context, &addr).await?;
        }
        Commands::Report(args) => {
            tracing::info!(
                seed = ?settings.data.seed,
                days = settings.data.days,
                json = args.json,
                "Printing marketplace report..."
            );
            print_report(&context, args.json)?;
        }
    }

    Ok(())
}

// ==============================================================================
// CLI Structure
// ==============================================================================

/// Synthetic marketplace traffic and sales dashboard.
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to the TOML configuration file.
    #[arg(long, short, global = true, default_value = "config.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Serve the interactive dashboard page.
    Serve(ServeArgs),
    /// Print the KPIs, rankings, and forecast diagnostics, then exit.
    Report(ReportArgs),
}

#[derive(Parser)]
struct ServeArgs {
    #[command(flatten)]
    overrides: Overrides,
}

#[derive(Parser)]
struct ReportArgs {
    /// Seed for reproducible synthetic data.
    #[arg(long)]
    seed: Option<u64>,

    /// Length of the trailing window, in days.
    #[arg(long)]
    days: Option<u32>,

    /// Print the summary as JSON instead of tables.
    #[arg(long)]
    json: bool,
}

// ==============================================================================
// Logging
// ==============================================================================

/// Installs the global subscriber: stderr always, plus a daily rolling file
/// when a log directory is configured. `RUST_LOG` overrides the configured level.
fn init_tracing(logging: &LoggingSettings) -> anyhow::Result<Option<WorkerGuard>> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&logging.level))
        .with_context(|| format!("Invalid log level '{}'", logging.level))?;
    let console = fmt::layer().with_writer(std::io::stderr);

    match &logging.directory {
        Some(directory) => {
            let appender = tracing_appender::rolling::daily(directory, &logging.file_prefix);
            let (writer, guard) = tracing_appender::non_blocking(appender);
            tracing_subscriber::registry()
                .with(filter)
                .with(console)
                .with(fmt::layer().with_writer(writer).with_ansi(false))
                .try_init()?;
            Ok(Some(guard))
        }
        None => {
            tracing_subscriber::registry()
                .with(filter)
                .with(console)
                .try_init()?;
            Ok(None)
        }
    }
}

// ==============================================================================
// Report Command
// ==============================================================================

fn print_report(context: &DashboardContext, json: bool) -> anyhow::Result<()> {
    let summaries = context.summaries();
    let training = context.training();

    if json {
        let output = serde_json::json!({
            "generated_on": context.generated_on(),
            "training": training,
            "marketplaces": summaries,
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    let mut kpis = Table::new();
    kpis.set_header(vec![
        "Marketplace",
        "Avg Time on Page (min)",
        "Bounce Rate (%)",
        "Conversion Rate (%)",
        "Total Visits",
        "Units Sold",
    ]);
    for summary in &summaries {
        let report = &summary.kpis;
        kpis.add_row(vec![
            summary.marketplace.to_string(),
            format!("{:.2}", report.average_time_on_page_minutes),
            format!("{:.2}", report.bounce_rate_pct),
            format!("{:.2}", report.conversion_rate_pct),
            report.total_visits.to_string(),
            report.total_units_sold.to_string(),
        ]);
    }
    println!(
        "KPIs for the {} days ending {}:",
        summaries.first().map(|s| s.kpis.days).unwrap_or(0),
        context.generated_on()
    );
    println!("{kpis}");

    let mut rankings = Table::new();
    rankings.set_header(vec!["Sales Ranking", "Visits Ranking"]);
    let sales = sales_ranking(context.data());
    let visits = visits_ranking(context.data());
    for (by_sales, by_visits) in sales.lines.iter().zip(&visits.lines) {
        rankings.add_row(vec![by_sales.as_str(), by_visits.as_str()]);
    }
    println!("{rankings}");

    let model = &training.model;
    println!(
        "Sales forecast: units = {:.4} + {:.6} * visits (fitted on {} samples, {} held out)",
        model.intercept(),
        model.slope(),
        training.train_samples,
        training.test_samples
    );
    match training.holdout_mse {
        Some(mse) => println!("Holdout mean squared error: {:.4}", mse),
        None => println!("Holdout mean squared error: n/a (too few samples)"),
    }

    Ok(())
}
