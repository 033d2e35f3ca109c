use anyhow::{Context, Result};
use chrono::{Datelike, Utc};
use clap::{Parser, Subcommand};
use dotenv::dotenv;
use std::path::PathBuf;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use pisa_ical_scraper::{
    client::HttpFetcher,
    config::ScraperConfig,
    index::write_index,
    records::Pairing,
    runner::ScheduleRunner,
    season::SeasonResolver,
};

#[derive(Debug, Parser)]
#[command(author, version, about = "Generate team calendars from the Plainville Arena schedules", long_about = None)]
struct Cli {
    /// JSON configuration file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Directory for the .ics files and index.html
    #[arg(short, long, global = true)]
    output_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Scrape schedules, write team calendars and rebuild the index page
    Generate {
        /// Use this season ID instead of looking one up
        #[arg(short, long)]
        season: Option<String>,
    },
    /// Rebuild index.html from the calendars already in the output directory
    Index,
    /// List the seasons available around the current year
    Seasons,
}

fn main() -> Result<()> {
    dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();
    let mut config = ScraperConfig::load(cli.config.as_deref())?;
    if let Some(dir) = cli.output_dir {
        config.publish.output_dir = dir;
    }

    match cli.command {
        Commands::Generate { season } => {
            std::fs::create_dir_all(&config.publish.output_dir).with_context(|| {
                format!("Failed to create {}", config.publish.output_dir.display())
            })?;
            let fetcher = HttpFetcher::new(&config)?;
            let timezone = config.arena.tz()?;
            let runner = ScheduleRunner::new(&fetcher, &config, timezone, Utc::now());

            let summary = runner.run(season)?;
            info!(
                "Done! Generated {} calendars ({} games) for season {}",
                summary.written.len(),
                summary.events,
                summary.season_id
            );
            for failure in &summary.failures {
                error!("{} {}: {}", failure.division, failure.team, failure.error);
            }
        }
        Commands::Index => {
            let path = write_index(&config.publish.output_dir, &config.publish.base_url)
                .context("Failed to write index page")?;
            info!("Wrote {}", path.display());
        }
        Commands::Seasons => {
            let fetcher = HttpFetcher::new(&config)?;
            let pairing = Pairing::from_strict(config.scraping.strict_pairing);
            let resolver = SeasonResolver::new(&fetcher, &config.site, pairing);
            let current_year = Utc::now().year();

            for year in [current_year - 1, current_year, current_year + 1] {
                match resolver.seasons_for_year(year) {
                    Ok(seasons) if seasons.is_empty() => warn!("{}: no seasons available", year),
                    Ok(seasons) => {
                        for season in seasons {
                            let marker = if config.site.is_valid_season(&season.name) { "valid" } else { "ignored" };
                            info!("{}: {} (ID: {}) [{}]", year, season.name, season.id, marker);
                        }
                    }
                    Err(e) => error!("{}: {}", year, e),
                }
            }

            info!("Would use season ID: {}", resolver.resolve(current_year).id());
        }
    }

    Ok(())
}
