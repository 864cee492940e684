use std::path::PathBuf;

use anyhow::Context;
use chrono::Utc;
use clap::{Parser, Subcommand};
use sqlx::postgres::PgPoolOptions;

mod care;
mod db;
mod models;
mod report;

use models::{CareAction, WeatherSnapshot};

#[derive(Parser)]
#[command(name = "garden-care")]
#[command(about = "Plant catalog and garden care status tracker", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create or upgrade the database schema
    InitDb,
    /// Load a small plant catalog and garden
    Seed,
    /// Import catalog plants from a CSV file
    ImportPlants {
        #[arg(long)]
        csv: PathBuf,
    },
    /// Add a catalog plant to the garden
    Add {
        /// Scientific name of the catalog plant
        #[arg(long)]
        plant: String,
        #[arg(long)]
        nickname: String,
    },
    /// Remove a garden item
    Remove {
        #[arg(long)]
        nickname: String,
    },
    /// Log a care action: water, sun-start, or sun-end
    Log {
        #[arg(long)]
        nickname: String,
        #[arg(long)]
        action: String,
    },
    /// Evaluate care status against a weather reading
    Status {
        /// Limit to one garden item
        #[arg(long)]
        nickname: Option<String>,
        /// Current temperature in Celsius
        #[arg(long)]
        temp: f64,
        /// Current relative humidity percent
        #[arg(long)]
        humidity: f64,
        #[arg(long, default_value = "Clear")]
        conditions: String,
        #[arg(long)]
        json: bool,
    },
    /// Generate a markdown garden report
    Report {
        #[arg(long)]
        temp: Option<f64>,
        #[arg(long)]
        humidity: Option<f64>,
        #[arg(long, default_value = "Clear")]
        conditions: String,
        #[arg(long, default_value = "garden-report.md")]
        out: PathBuf,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let database_url = std::env::var("DATABASE_URL")
        .context("DATABASE_URL must be set to a Postgres instance")?;

    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(&database_url)
        .await
        .context("failed to connect to Postgres")?;

    match cli.command {
        Commands::InitDb => {
            db::init_db(&pool).await?;
            println!("Schema ready.");
        }
        Commands::Seed => {
            db::seed(&pool).await?;
            println!("Seed data inserted.");
        }
        Commands::ImportPlants { csv } => {
            let inserted = db::import_csv(&pool, &csv).await?;
            println!("Inserted {inserted} plants from {}.", csv.display());
        }
        Commands::Add { plant, nickname } => {
            db::add_to_garden(&pool, &plant, &nickname).await?;
            println!("Added {plant} to the garden as {nickname}.");
        }
        Commands::Remove { nickname } => {
            db::remove_from_garden(&pool, &nickname).await?;
            println!("Removed {nickname} from the garden.");
        }
        Commands::Log { nickname, action } => {
            let action = CareAction::parse(&action)
                .with_context(|| format!("unknown action {action} (water, sun-start, sun-end)"))?;
            db::log_action(&pool, &nickname, action).await?;
            println!("Logged {nickname}.");
        }
        Commands::Status {
            nickname,
            temp,
            humidity,
            conditions,
            json,
        } => {
            let now = Utc::now();
            let weather = WeatherSnapshot {
                temperature: temp,
                humidity,
                conditions,
            };
            let entries = db::fetch_garden(&pool, nickname.as_deref()).await?;

            if entries.is_empty() {
                println!("No matching garden items.");
                return Ok(());
            }

            if json {
                let rows: Vec<serde_json::Value> = entries
                    .iter()
                    .map(|entry| {
                        let status =
                            care::evaluate(&entry.plant, &weather, Some(&entry.history), now);
                        serde_json::json!({
                            "nickname": entry.nickname,
                            "plant": entry.plant.scientific_name,
                            "status": status,
                        })
                    })
                    .collect();
                println!("{}", serde_json::to_string_pretty(&rows)?);
                return Ok(());
            }

            for entry in entries.iter() {
                let status = care::evaluate(&entry.plant, &weather, Some(&entry.history), now);
                let water_in = status
                    .next_actions
                    .water_in
                    .as_deref()
                    .unwrap_or("unscheduled");
                println!(
                    "- {} ({}) health {}, water in: {}",
                    entry.nickname, entry.plant.scientific_name, status.health, water_in
                );
                for alert in status.alerts.iter() {
                    println!("    * {alert}");
                }
            }
        }
        Commands::Report {
            temp,
            humidity,
            conditions,
            out,
        } => {
            let now = Utc::now();
            let weather = match (temp, humidity) {
                (Some(temperature), Some(humidity)) => Some(WeatherSnapshot {
                    temperature,
                    humidity,
                    conditions,
                }),
                _ => None,
            };
            let entries = db::fetch_garden(&pool, None).await?;
            let report = report::build_report(&entries, weather.as_ref(), now);
            std::fs::write(&out, report)?;
            println!("Report written to {}.", out.display());
        }
    }

    Ok(())
}
