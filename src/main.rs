use anyhow::Result;
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use rmcp::ServiceExt;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use agribot::config::Settings;
use agribot::crops::DEFAULT_CROP;
use agribot::formatters::format_history_summary;
use agribot::history::{download_history, PowerClient};
use agribot::http::HttpClient;
use agribot::models::{Coordinate, DateRange};
use agribot::resilience::RetryPolicy;
use agribot::service::AgriBot;
use agribot::storage::DataDirs;

/// Agricultural chatbot action server and weather data collector
#[derive(Parser)]
#[command(name = "agribot", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Serve the chatbot actions over MCP on stdio (default)
    Serve,
    /// Download historical weather, compute GDD/AGDD and save a spreadsheet
    History {
        #[arg(long, allow_hyphen_values = true)]
        lon: f64,
        #[arg(long, allow_hyphen_values = true)]
        lat: f64,
        /// First day, YYYY-MM-DD
        #[arg(long)]
        start: NaiveDate,
        /// Last day, YYYY-MM-DD
        #[arg(long)]
        end: NaiveDate,
        #[arg(long, default_value = DEFAULT_CROP)]
        crop: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "agribot=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    let settings = Settings::from_env()?;
    let dirs = DataDirs::init(&settings.data_dir)?;
    tracing::info!(
        "Writing data under {} and {}",
        dirs.data_dir().display(),
        dirs.weather_dir().display()
    );

    match cli.command.unwrap_or(Command::Serve) {
        Command::Serve => {
            tracing::info!("Starting agribot action server");

            let bot = AgriBot::new(settings, dirs)?;
            let server = bot.serve(rmcp::transport::stdio()).await?;
            server.waiting().await?;

            tracing::info!("Server shutdown complete");
        }
        Command::History {
            lon,
            lat,
            start,
            end,
            crop,
        } => {
            let http = HttpClient::new(settings.http_timeout)?;
            let power = PowerClient::new(http, settings.power_api_base.clone());
            let processed = download_history(
                &power,
                &dirs,
                Coordinate::new(lon, lat),
                DateRange::new(start, end)?,
                &crop,
                &RetryPolicy::pipeline(),
            )
            .await?;

            println!("{}", format_history_summary(&crop, &processed));
        }
    }

    Ok(())
}
