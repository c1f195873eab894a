use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{anyhow, Result};
use chrono::{Local, NaiveDate};
use clap::{Args, Parser, Subcommand, ValueEnum};
use sales_advisor::advisor::{advise, RecommendationResult, SalesTarget};
use sales_advisor::analysis::aggregate;
use sales_advisor::analysis::breakdown::{breakdown, SalesBreakdown};
use sales_advisor::analysis::segment::{rank_city_trends, segment, Segments};
use sales_advisor::analysis::CityGrowth;
use sales_advisor::config::{Config, ConfigOverrides, SourceKind};
use sales_advisor::error::AdvisorError;
use sales_advisor::output::csv::{city_trends_to_csv, rankings_to_csv, recommendations_to_csv};
use sales_advisor::output::json::render_json;
use sales_advisor::output::table::{
    render_breakdown_table, render_city_trends_table, render_rankings_table,
    render_recommendations_table, render_summary_table,
};
use sales_advisor::source::{CsvSource, FactFilter, SaleSource};
use sales_advisor::store::SaleStore;
use sales_advisor::types::SaleWindow;
use serde::Serialize;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Clone, Copy, ValueEnum)]
enum OutputFormat {
    Table,
    Json,
    Csv,
}

#[derive(Debug, Parser)]
#[command(
    name = "sales-advisor",
    about = "Strategic recommendations from trailing vehicle sales"
)]
struct Cli {
    #[arg(short, long)]
    config: Option<PathBuf>,
    /// Read sale facts from this CSV file instead of the SQLite store.
    #[arg(long)]
    csv: Option<String>,
    #[arg(long)]
    db: Option<String>,
    /// Reference date (YYYY-MM-DD) the trailing window ends on; defaults to today.
    #[arg(long = "as-of")]
    as_of: Option<NaiveDate>,
    #[arg(long = "window-months")]
    window_months: Option<u32>,
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Table)]
    output: OutputFormat,
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    Recommend {
        #[arg(long = "target-sales")]
        target_sales: Option<u64>,
        #[arg(long = "target-months")]
        target_months: Option<u32>,
    },
    Rankings {
        #[command(flatten)]
        filter: FilterArgs,
    },
    Trends {
        #[command(flatten)]
        filter: FilterArgs,
    },
    Import {
        #[arg(long)]
        csv: PathBuf,
    },
    Config {
        #[arg(long)]
        init: bool,
        #[arg(long)]
        show: bool,
    },
}

#[derive(Debug, Clone, Default, Args)]
struct FilterArgs {
    #[arg(long = "fuel-type")]
    fuel_type: Option<String>,
    #[arg(long = "body-type")]
    body_type: Option<String>,
    #[arg(long)]
    region: Option<String>,
    #[arg(long)]
    year: Option<i32>,
}

impl FilterArgs {
    fn to_filter(&self) -> FactFilter {
        FactFilter::new(
            self.fuel_type.clone(),
            self.body_type.clone(),
            self.region.clone(),
            self.year,
        )
    }
}

#[derive(Serialize)]
struct RankingsReport<'a> {
    #[serde(flatten)]
    segments: &'a Segments,
    breakdown: &'a SalesBreakdown,
}

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err:#}");
            let client_error = err
                .downcast_ref::<AdvisorError>()
                .is_some_and(AdvisorError::is_client_error);
            if client_error {
                ExitCode::from(2)
            } else {
                ExitCode::FAILURE
            }
        }
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config_path = cli.config.clone().unwrap_or_else(Config::default_path);
    let mut config = Config::load(Some(&config_path))?;
    config.apply_overrides(ConfigOverrides {
        csv_path: cli.csv.clone(),
        db_path: cli.db.clone(),
        window_months: cli.window_months,
    });

    let reference = cli.as_of.unwrap_or_else(|| Local::now().date_naive());
    let window = SaleWindow::trailing(reference, config.analysis.window_months);

    match &cli.command {
        Commands::Config { init, show } => {
            handle_config_command(*init, *show, &config, &config_path)?;
        }
        Commands::Import { csv } => {
            let source = CsvSource::new(csv);
            let facts = source.read_all()?;
            info!(path = %source.path().display(), rows = facts.len(), "read sales CSV");
            let mut store = SaleStore::open(&config.resolved_db_path())?;
            let imported = store.import_facts(&facts)?;
            info!(total = store.count_facts()?, "store updated");
            println!(
                "Imported {imported} sales into {}",
                config.resolved_db_path().display()
            );
        }
        Commands::Recommend {
            target_sales,
            target_months,
        } => {
            let target = SalesTarget::new(
                target_sales.or(config.analysis.target_sales),
                target_months.unwrap_or(config.analysis.target_months),
            );
            let source = open_source(&config)?;
            let result = advise(source.as_ref(), &window, &target)?;
            if result.recommendations.is_empty() {
                warn!("no recommendation rule fired for this window");
            }
            print_recommendations(&result, cli.output)?;
        }
        Commands::Rankings { filter } => {
            let source = open_source(&config)?;
            let facts = source.fetch_filtered(&window, &filter.to_filter())?;
            let aggregates = aggregate(&facts);
            print_rankings(&segment(&aggregates), &breakdown(&aggregates), cli.output)?;
        }
        Commands::Trends { filter } => {
            let source = open_source(&config)?;
            let facts = source.fetch_filtered(&window, &filter.to_filter())?;
            let trends = rank_city_trends(&aggregate(&facts));
            print_trends(&trends, cli.output)?;
        }
    }

    Ok(())
}

fn init_logging(verbosity: u8) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| match verbosity {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        _ => EnvFilter::new("debug"),
    });
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn open_source(config: &Config) -> Result<Box<dyn SaleSource>> {
    match config.data.source {
        SourceKind::Csv => {
            if config.data.csv_path.trim().is_empty() {
                return Err(anyhow!("data.source is csv but no csv_path is configured"));
            }
            Ok(Box::new(CsvSource::new(config.resolved_csv_path())))
        }
        SourceKind::Sqlite => Ok(Box::new(SaleStore::open(&config.resolved_db_path())?)),
    }
}

fn handle_config_command(init: bool, show: bool, config: &Config, config_path: &Path) -> Result<()> {
    if init {
        Config::write_template(config_path)?;
        println!("Wrote config template to {}", config_path.display());
    }
    if show || !init {
        println!("{}", render_json(config)?);
    }
    Ok(())
}

fn print_recommendations(result: &RecommendationResult, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Table => {
            println!("{}", render_summary_table(&result.analysis));
            println!("{}", render_recommendations_table(&result.recommendations));
            if !result.potential_cities.is_empty() {
                println!("{}", render_city_trends_table(&result.potential_cities));
            }
        }
        OutputFormat::Json => println!("{}", render_json(result)?),
        OutputFormat::Csv => print!("{}", recommendations_to_csv(&result.recommendations)?),
    }
    Ok(())
}

fn print_rankings(
    segments: &Segments,
    breakdown: &SalesBreakdown,
    format: OutputFormat,
) -> Result<()> {
    match format {
        OutputFormat::Table => {
            println!("{}", render_rankings_table(segments));
            println!("{}", render_breakdown_table(breakdown));
        }
        OutputFormat::Json => println!(
            "{}",
            render_json(&RankingsReport {
                segments,
                breakdown
            })?
        ),
        OutputFormat::Csv => print!("{}", rankings_to_csv(segments, breakdown)?),
    }
    Ok(())
}

fn print_trends(trends: &[CityGrowth], format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Table => println!("{}", render_city_trends_table(trends)),
        OutputFormat::Json => println!("{}", render_json(trends)?),
        OutputFormat::Csv => print!("{}", city_trends_to_csv(trends)?),
    }
    Ok(())
}
