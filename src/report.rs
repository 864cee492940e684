use std::fmt::Write;

use chrono::{DateTime, Utc};

use crate::care;
use crate::models::{CareStatus, GardenEntry, Health, WeatherSnapshot};

/// Counts statuses per health tier, worst first. Empty tiers are omitted.
pub fn summarize_health(statuses: &[CareStatus]) -> Vec<(Health, usize)> {
    let tiers = [
        Health::Thirsty,
        Health::NeedsAttention,
        Health::Optimal,
        Health::Unknown,
    ];

    tiers
        .into_iter()
        .map(|tier| (tier, statuses.iter().filter(|s| s.health == tier).count()))
        .filter(|(_, count)| *count > 0)
        .collect()
}

pub fn build_report(
    entries: &[GardenEntry],
    weather: Option<&WeatherSnapshot>,
    now: DateTime<Utc>,
) -> String {
    let statuses: Vec<CareStatus> = entries
        .iter()
        .map(|entry| care::evaluate_or_pending(&entry.plant, weather, Some(&entry.history), now))
        .collect();
    let summary = summarize_health(&statuses);

    let mut output = String::new();
    let _ = writeln!(output, "# Garden Care Report");
    let _ = writeln!(output, "Generated {}", now.format("%Y-%m-%d %H:%M UTC"));

    match weather {
        Some(weather) => {
            let _ = writeln!(
                output,
                "Weather: {:.1}°C, {:.0}% humidity, {}",
                weather.temperature, weather.humidity, weather.conditions
            );
        }
        None => {
            let _ = writeln!(
                output,
                "No weather reading supplied; statuses are shown as Unknown."
            );
        }
    }

    let _ = writeln!(output);
    let _ = writeln!(output, "## Garden Summary");

    if entries.is_empty() {
        let _ = writeln!(output, "The garden is empty.");
    } else {
        for (health, count) in summary.iter() {
            let _ = writeln!(output, "- {}: {}", health, count);
        }
    }

    for (entry, status) in entries.iter().zip(statuses.iter()) {
        let _ = writeln!(output);
        let _ = writeln!(
            output,
            "## {} ({})",
            entry.nickname, entry.plant.scientific_name
        );
        let _ = writeln!(output, "Health: {}", status.health);

        if let Some(water_in) = &status.next_actions.water_in {
            let _ = writeln!(output, "Water in: {}", water_in);
        }

        if status.alerts.is_empty() {
            let _ = writeln!(output, "No alerts.");
        } else {
            for alert in status.alerts.iter() {
                let _ = writeln!(output, "- {}", alert);
            }
        }
    }

    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{CareHistory, PlantRequirements};
    use chrono::Duration;
    use uuid::Uuid;

    fn sample_entry(nickname: &str, watered_days_ago: i64, now: DateTime<Utc>) -> GardenEntry {
        GardenEntry {
            id: Uuid::new_v4(),
            nickname: nickname.to_string(),
            plant: PlantRequirements {
                scientific_name: "Ocimum basilicum".to_string(),
                family: "Lamiaceae".to_string(),
                common_names: vec!["Basil".to_string()],
                temperature_range: "15-30°C".to_string(),
                humidity_level: "Moderate".to_string(),
                water_frequency: "Daily".to_string(),
            },
            history: CareHistory {
                last_watered: Some(now - Duration::days(watered_days_ago)),
                is_in_sun: false,
            },
        }
    }

    #[test]
    fn summary_counts_worst_tiers_first() {
        let now = Utc::now();
        let weather = WeatherSnapshot {
            temperature: 20.0,
            humidity: 50.0,
            conditions: "Clear".to_string(),
        };
        let entries = vec![
            sample_entry("Kitchen basil", 3, now),
            sample_entry("Balcony basil", 0, now),
        ];
        let report = build_report(&entries, Some(&weather), now);

        assert!(report.contains("- Thirsty: 1"));
        assert!(report.contains("- Optimal: 1"));
        assert!(report.contains("## Kitchen basil (Ocimum basilicum)"));
        assert!(report.contains("Water in: Now"));
    }

    #[test]
    fn missing_weather_renders_unknown_statuses() {
        let now = Utc::now();
        let entries = vec![sample_entry("Kitchen basil", 1, now)];
        let report = build_report(&entries, None, now);

        assert!(report.contains("No weather reading supplied"));
        assert!(report.contains("- Unknown: 1"));
        assert!(report.contains("Health: Unknown"));
    }

    #[test]
    fn empty_garden_is_stated() {
        let report = build_report(&[], None, Utc::now());
        assert!(report.contains("The garden is empty."));
    }
}
