use anyhow::Context;
use chrono::{Duration, Utc};
use sqlx::{PgPool, Row};
use uuid::Uuid;

use crate::models::{CareAction, CareHistory, GardenEntry, PlantRequirements};

pub async fn init_db(pool: &PgPool) -> anyhow::Result<()> {
    sqlx::migrate!("./migrations").run(pool).await?;
    Ok(())
}

pub async fn seed(pool: &PgPool) -> anyhow::Result<()> {
    let plants = vec![
        (
            Uuid::parse_str("7b4e6c9a-1f52-4f6e-9d3a-2c8b5e7f0a41")?,
            "Monstera deliciosa",
            "Araceae",
            vec!["Swiss Cheese Plant", "Split-leaf Philodendron"],
            "18-27°C",
            "High",
            "Weekly",
        ),
        (
            Uuid::parse_str("c2a9f8d1-63b7-4a05-8e92-f14d0b6c3e78")?,
            "Dracaena trifasciata",
            "Asparagaceae",
            vec!["Snake Plant", "Mother-in-law's Tongue"],
            "15-29°C",
            "Low",
            "Bi-weekly",
        ),
        (
            Uuid::parse_str("5e1d3b72-90c4-48af-b6d8-a7f2c93e0154")?,
            "Ocimum basilicum",
            "Lamiaceae",
            vec!["Basil"],
            "18-30°C",
            "Moderate",
            "Daily",
        ),
    ];

    for (id, scientific, family, common, temp_range, humidity, frequency) in plants {
        let common: Vec<String> = common.into_iter().map(String::from).collect();
        sqlx::query(
            r#"
            INSERT INTO garden_tracker.plants
            (id, scientific_name, family, common_names, temperature_range, humidity_level, water_frequency)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            ON CONFLICT (scientific_name) DO UPDATE
            SET family = EXCLUDED.family,
                common_names = EXCLUDED.common_names,
                temperature_range = EXCLUDED.temperature_range,
                humidity_level = EXCLUDED.humidity_level,
                water_frequency = EXCLUDED.water_frequency
            "#,
        )
        .bind(id)
        .bind(scientific)
        .bind(family)
        .bind(common)
        .bind(temp_range)
        .bind(humidity)
        .bind(frequency)
        .execute(pool)
        .await?;
    }

    let now = Utc::now();
    let items = vec![
        ("Office Monstera", "Monstera deliciosa", now - Duration::days(2), false),
        ("Kitchen basil", "Ocimum basilicum", now - Duration::days(3), true),
    ];

    for (nickname, scientific, last_watered, is_in_sun) in items {
        let plant_id: Uuid = sqlx::query(
            "SELECT id FROM garden_tracker.plants WHERE scientific_name = $1",
        )
        .bind(scientific)
        .fetch_one(pool)
        .await?
        .get("id");

        sqlx::query(
            r#"
            INSERT INTO garden_tracker.garden_items
            (id, plant_id, nickname, last_watered, is_in_sun)
            VALUES ($1, $2, $3, $4, $5)
            ON CONFLICT (nickname) DO NOTHING
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(plant_id)
        .bind(nickname)
        .bind(last_watered)
        .bind(is_in_sun)
        .execute(pool)
        .await?;
    }

    Ok(())
}

pub async fn import_csv(pool: &PgPool, csv_path: &std::path::Path) -> anyhow::Result<usize> {
    #[derive(serde::Deserialize)]
    struct CsvRow {
        scientific_name: String,
        family: String,
        /// Pipe-separated list, first entry is the display name.
        common_names: String,
        temperature_range: String,
        humidity_level: String,
        water_frequency: String,
    }

    let mut reader = csv::Reader::from_path(csv_path)?;
    let mut inserted = 0usize;

    for result in reader.deserialize::<CsvRow>() {
        let row = result?;
        let common_names: Vec<String> = row
            .common_names
            .split('|')
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .map(String::from)
            .collect();

        let result = sqlx::query(
            r#"
            INSERT INTO garden_tracker.plants
            (id, scientific_name, family, common_names, temperature_range, humidity_level, water_frequency)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            ON CONFLICT (scientific_name) DO NOTHING
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(&row.scientific_name)
        .bind(&row.family)
        .bind(common_names)
        .bind(&row.temperature_range)
        .bind(&row.humidity_level)
        .bind(&row.water_frequency)
        .execute(pool)
        .await?;

        if result.rows_affected() > 0 {
            inserted += 1;
        }
    }

    Ok(inserted)
}

pub async fn fetch_garden(
    pool: &PgPool,
    nickname: Option<&str>,
) -> anyhow::Result<Vec<GardenEntry>> {
    let mut query = String::from(
        "SELECT g.id, g.nickname, g.last_watered, g.is_in_sun, \
         p.scientific_name, p.family, p.common_names, \
         p.temperature_range, p.humidity_level, p.water_frequency \
         FROM garden_tracker.garden_items g \
         JOIN garden_tracker.plants p ON p.id = g.plant_id",
    );

    if nickname.is_some() {
        query.push_str(" WHERE g.nickname = $1");
    }
    query.push_str(" ORDER BY g.created_at DESC");

    let mut rows = sqlx::query(&query);
    if let Some(value) = nickname {
        rows = rows.bind(value);
    }

    let records = rows.fetch_all(pool).await?;
    let mut entries = Vec::new();

    for row in records {
        entries.push(GardenEntry {
            id: row.get("id"),
            nickname: row.get("nickname"),
            plant: PlantRequirements {
                scientific_name: row.get("scientific_name"),
                family: row.get("family"),
                common_names: row.get("common_names"),
                temperature_range: row.get("temperature_range"),
                humidity_level: row.get("humidity_level"),
                water_frequency: row.get("water_frequency"),
            },
            history: CareHistory {
                last_watered: row.get("last_watered"),
                is_in_sun: row.get("is_in_sun"),
            },
        });
    }

    Ok(entries)
}

pub async fn add_to_garden(
    pool: &PgPool,
    scientific_name: &str,
    nickname: &str,
) -> anyhow::Result<()> {
    let plant_id: Uuid = sqlx::query(
        "SELECT id FROM garden_tracker.plants WHERE scientific_name = $1",
    )
    .bind(scientific_name)
    .fetch_optional(pool)
    .await?
    .with_context(|| format!("no plant in the catalog named {scientific_name}"))?
    .get("id");

    let result = sqlx::query(
        r#"
        INSERT INTO garden_tracker.garden_items
        (id, plant_id, nickname, last_watered, is_in_sun)
        VALUES ($1, $2, $3, $4, FALSE)
        ON CONFLICT (nickname) DO NOTHING
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(plant_id)
    .bind(nickname)
    .bind(Utc::now())
    .execute(pool)
    .await?;

    if result.rows_affected() == 0 {
        anyhow::bail!("a garden item named {nickname} already exists");
    }
    Ok(())
}

pub async fn remove_from_garden(pool: &PgPool, nickname: &str) -> anyhow::Result<()> {
    let result = sqlx::query("DELETE FROM garden_tracker.garden_items WHERE nickname = $1")
        .bind(nickname)
        .execute(pool)
        .await?;

    if result.rows_affected() == 0 {
        anyhow::bail!("no garden item named {nickname}");
    }
    Ok(())
}

pub async fn log_action(pool: &PgPool, nickname: &str, action: CareAction) -> anyhow::Result<()> {
    let query = match action {
        CareAction::Water => {
            "UPDATE garden_tracker.garden_items \
             SET last_watered = now() WHERE nickname = $1"
        }
        CareAction::SunStart => {
            "UPDATE garden_tracker.garden_items \
             SET is_in_sun = TRUE, sun_start_time = now() WHERE nickname = $1"
        }
        CareAction::SunEnd => {
            "UPDATE garden_tracker.garden_items \
             SET is_in_sun = FALSE, last_sun_exposure = now() WHERE nickname = $1"
        }
    };

    let result = sqlx::query(query).bind(nickname).execute(pool).await?;

    if result.rows_affected() == 0 {
        anyhow::bail!("no garden item named {nickname}");
    }
    Ok(())
}
