//! redshift-unload CLI - Export Redshift tables to S3 with UNLOAD.

use clap::{Parser, Subcommand};
use redshift_unload::{
    ColumnCatalog, Config, RedshiftPool, RedshiftUnloader, UnloadError, UnloadOptions,
};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{info, Level};
use tracing_subscriber::fmt::format::FmtSpan;

#[derive(Parser)]
#[command(name = "redshift-unload")]
#[command(about = "Export Amazon Redshift tables to S3 with UNLOAD")]
#[command(version)]
struct Cli {
    /// Path to YAML configuration file
    #[arg(short, long, default_value = "config.yaml")]
    config: PathBuf,

    /// Output JSON result to stdout
    #[arg(long)]
    output_json: bool,

    /// Log format: text or json
    #[arg(long, default_value = "text")]
    log_format: String,

    /// Log verbosity: debug, info, warn, error
    #[arg(long, default_value = "info")]
    verbosity: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Unload a table to an S3 prefix
    Unload {
        /// Table to unload
        #[arg(short, long)]
        table: String,

        /// Destination S3 prefix, e.g. s3://bucket/path/
        #[arg(short, long)]
        destination: String,

        /// Overwrite objects already under the destination prefix
        #[arg(long)]
        allow_overwrite: bool,

        /// Dry run: print the UNLOAD command (credentials redacted) without running it
        #[arg(long)]
        dry_run: bool,
    },

    /// Show the columns of a table as the catalog reports them
    Describe {
        /// Table to describe
        #[arg(short, long)]
        table: String,
    },

    /// Test the Redshift connection
    HealthCheck,
}

#[tokio::main]
async fn main() -> ExitCode {
    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{}", e.format_detailed());
            ExitCode::from(e.exit_code())
        }
    }
}

async fn run() -> Result<(), UnloadError> {
    let cli = Cli::parse();

    setup_logging(&cli.verbosity, &cli.log_format);

    let config = Config::load(&cli.config)?;
    info!("Loaded configuration from {:?}", cli.config);

    let pool = RedshiftPool::connect(&config.warehouse).await?;
    let outcome = execute(&cli, &config, &pool).await;
    pool.close();
    outcome
}

async fn execute(cli: &Cli, config: &Config, pool: &RedshiftPool) -> Result<(), UnloadError> {
    match &cli.command {
        Commands::Unload {
            table,
            destination,
            allow_overwrite,
            dry_run,
        } => {
            let options = UnloadOptions {
                allow_overwrite: *allow_overwrite || config.unload.allow_overwrite,
            };
            let conn = pool.get().await?;
            let unloader = RedshiftUnloader::new(&conn, config.credentials()?);

            if *dry_run {
                let command = unloader.plan(table, destination, &options).await?;
                println!("{}", command.redacted_sql());
                return Ok(());
            }

            let report = unloader.unload_to(table, destination, &options).await?;

            if cli.output_json {
                println!("{}", report.to_json()?);
            } else {
                println!("\nUnload completed!");
                println!("  Table: {}", report.table);
                println!("  Destination: {}", report.destination);
                println!("  Columns: {}", report.columns);
                println!("  Overwrite: {}", report.allow_overwrite);
                println!("  Duration: {:.2}s", report.duration_seconds);
            }
        }

        Commands::Describe { table } => {
            let conn = pool.get().await?;
            let columns = ColumnCatalog::new(&conn).describe(table).await?;
            if columns.is_empty() {
                return Err(UnloadError::EmptyTable(table.clone()));
            }

            if cli.output_json {
                println!("{}", serde_json::to_string_pretty(&columns)?);
            } else {
                println!("Columns of {}:", table);
                for column in &columns {
                    println!(
                        "  {} {}{}",
                        column.name,
                        column.declared_type,
                        if column.nullable { "" } else { " NOT NULL" }
                    );
                }
            }
        }

        Commands::HealthCheck => {
            let result = pool.health_check().await;

            if cli.output_json {
                println!("{}", serde_json::to_string_pretty(&result)?);
            } else {
                println!("Health Check Results:");
                println!(
                    "  Redshift ({}): {} ({}ms)",
                    result.endpoint,
                    if result.connected { "OK" } else { "FAILED" },
                    result.latency_ms
                );
                if let Some(ref err) = result.error {
                    println!("    Error: {}", err);
                }
            }

            if !result.connected {
                return Err(UnloadError::Connection("Health check failed".to_string()));
            }
        }
    }

    Ok(())
}

fn setup_logging(verbosity: &str, format: &str) {
    let level = match verbosity.to_lowercase().as_str() {
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let subscriber = tracing_subscriber::fmt()
        .with_max_level(level)
        .with_span_events(FmtSpan::CLOSE)
        .with_writer(std::io::stderr)
        .with_target(false);

    if format == "json" {
        subscriber.json().init();
    } else {
        subscriber.init();
    }
}
