use chrono::{DateTime, Utc};

use crate::models::{
    CareHistory, CareStatus, Health, NextActions, PlantRequirements, WeatherSnapshot,
};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TempRange {
    pub min: f64,
    pub max: f64,
}

/// Parses legacy free-text ranges like "18-25°C" or "60-80%".
///
/// Everything except digits and hyphens is stripped before splitting, so a
/// range with a negative bound ("-5-10") splits into three parts and yields
/// no range at all. Catalog data never uses negative bounds today; if it
/// ever does, the column should move to structured min/max instead.
pub fn parse_range(raw: &str) -> Option<TempRange> {
    let cleaned: String = raw
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '-')
        .collect();
    let parts: Vec<&str> = cleaned.split('-').collect();

    if parts.len() == 2 {
        let min = parts[0].parse::<f64>().ok()?;
        let max = parts[1].parse::<f64>().ok()?;
        return Some(TempRange { min, max });
    }
    None
}

/// Absolute distance between two instants in fractional days.
pub fn days_between(a: DateTime<Utc>, b: DateTime<Utc>) -> f64 {
    (a - b).num_milliseconds().abs() as f64 / 86_400_000.0
}

/// Watering interval in days implied by the catalog's frequency text.
/// Bi-weekly must be tested before weekly since the latter is a substring.
pub fn required_days(frequency: &str) -> f64 {
    let freq = frequency.to_lowercase();
    if freq.contains("daily") {
        1.0
    } else if freq.contains("bi-weekly") || freq.contains("2 weeks") {
        14.0
    } else if freq.contains("weekly") {
        7.0
    } else {
        7.0
    }
}

/// Evaluates one garden plant against the current weather and its care
/// history. Pure: the result depends only on the arguments, including `now`,
/// which the caller reads once so day-counts stay consistent across a run.
///
/// Checks run in a fixed order (temperature, humidity, watering, sun) and
/// that order is the order of the alert list. Only the watering check can
/// set `Thirsty`; it is never downgraded. Any other alert raises an
/// otherwise-optimal plant to `NeedsAttention`.
pub fn evaluate(
    plant: &PlantRequirements,
    weather: &WeatherSnapshot,
    history: Option<&CareHistory>,
    now: DateTime<Utc>,
) -> CareStatus {
    let mut alerts: Vec<String> = Vec::new();
    let mut health = Health::Optimal;
    let mut next_actions = NextActions::default();
    let name = plant.display_name();

    if let Some(range) = parse_range(&plant.temperature_range) {
        if weather.temperature < range.min {
            alerts.push(format!(
                "Too cold! Current temp is {}°C. {} needs at least {}°C.",
                weather.temperature.round(),
                name,
                range.min
            ));
        } else if weather.temperature > range.max {
            alerts.push(format!(
                "Too hot! Current temp is {}°C. {} prefers below {}°C.",
                weather.temperature.round(),
                name,
                range.max
            ));
        }
    }

    if plant.humidity_level.to_lowercase().contains("high") && weather.humidity < 40.0 {
        alerts.push(format!(
            "Air is dry ({}%). Mist {}.",
            weather.humidity.round(),
            name
        ));
    }

    if let Some(history) = history {
        if let Some(last_watered) = history.last_watered {
            let days_since = days_between(now, last_watered);
            let mut required = required_days(&plant.water_frequency);

            if weather.conditions.to_lowercase().contains("rain") {
                required += 2.0;
                alerts.push("It's raining! Watering pushed back 2 days.".to_string());
            }

            let due_in = required - days_since;
            if due_in <= 0.0 {
                health = Health::Thirsty;
                next_actions.water_in = Some("Now".to_string());
                alerts.push("Time to water!".to_string());
            } else {
                next_actions.water_in = Some(format!("{} days", due_in.round()));
            }
        }

        if history.is_in_sun {
            alerts.push(format!("{} is currently under sun exposure.", name));
        }
    }

    if !alerts.is_empty() && health == Health::Optimal {
        health = Health::NeedsAttention;
    }

    CareStatus {
        health,
        alerts,
        next_actions,
    }
}

/// Defensive entry point for call sites where the weather reading may be
/// absent: returns a pending status instead of evaluating partial data.
pub fn evaluate_or_pending(
    plant: &PlantRequirements,
    weather: Option<&WeatherSnapshot>,
    history: Option<&CareHistory>,
    now: DateTime<Utc>,
) -> CareStatus {
    match weather {
        Some(weather) => evaluate(plant, weather, history, now),
        None => CareStatus::pending(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn sample_plant() -> PlantRequirements {
        PlantRequirements {
            scientific_name: "Monstera deliciosa".to_string(),
            family: "Araceae".to_string(),
            common_names: vec!["Swiss Cheese Plant".to_string()],
            temperature_range: "18-25°C".to_string(),
            humidity_level: "High".to_string(),
            water_frequency: "Weekly".to_string(),
        }
    }

    fn sample_weather(temperature: f64, humidity: f64, conditions: &str) -> WeatherSnapshot {
        WeatherSnapshot {
            temperature,
            humidity,
            conditions: conditions.to_string(),
        }
    }

    fn watered_days_ago(now: DateTime<Utc>, days: i64) -> CareHistory {
        CareHistory {
            last_watered: Some(now - Duration::days(days)),
            is_in_sun: false,
        }
    }

    #[test]
    fn parses_celsius_range() {
        let range = parse_range("18-25°C").unwrap();
        assert_eq!(range.min, 18.0);
        assert_eq!(range.max, 25.0);
    }

    #[test]
    fn malformed_ranges_yield_none() {
        assert_eq!(parse_range(""), None);
        assert_eq!(parse_range("abc"), None);
        assert_eq!(parse_range("-5-10"), None);
        assert_eq!(parse_range("18-"), None);
    }

    #[test]
    fn days_between_is_symmetric_and_fractional() {
        let now = Utc::now();
        let earlier = now - Duration::hours(36);
        assert_eq!(days_between(now, earlier), 1.5);
        assert_eq!(days_between(earlier, now), 1.5);
    }

    #[test]
    fn frequency_text_maps_to_intervals() {
        assert_eq!(required_days("Daily misting"), 1.0);
        assert_eq!(required_days("Bi-weekly"), 14.0);
        assert_eq!(required_days("every 2 weeks"), 14.0);
        assert_eq!(required_days("Weekly"), 7.0);
        assert_eq!(required_days("whenever dry"), 7.0);
    }

    #[test]
    fn identical_inputs_produce_identical_status() {
        let now = Utc::now();
        let plant = sample_plant();
        let weather = sample_weather(30.0, 35.0, "Rain");
        let history = watered_days_ago(now, 3);

        let first = evaluate(&plant, &weather, Some(&history), now);
        let second = evaluate(&plant, &weather, Some(&history), now);
        assert_eq!(first, second);
    }

    #[test]
    fn cold_weather_fires_too_cold_alert() {
        let status = evaluate(
            &sample_plant(),
            &sample_weather(17.9, 50.0, "Clear"),
            None,
            Utc::now(),
        );
        assert_eq!(status.health, Health::NeedsAttention);
        assert_eq!(status.alerts.len(), 1);
        assert!(status.alerts[0].contains("Too cold"));
    }

    #[test]
    fn hot_weather_fires_too_hot_alert() {
        let status = evaluate(
            &sample_plant(),
            &sample_weather(25.1, 50.0, "Clear"),
            None,
            Utc::now(),
        );
        assert!(status.alerts[0].contains("Too hot"));
    }

    #[test]
    fn range_bounds_are_inclusive() {
        for temp in [18.0, 25.0] {
            let status = evaluate(
                &sample_plant(),
                &sample_weather(temp, 50.0, "Clear"),
                None,
                Utc::now(),
            );
            assert!(status.alerts.is_empty(), "no alert expected at {temp}°C");
        }
    }

    #[test]
    fn dry_air_alert_respects_boundary() {
        let dry = evaluate(
            &sample_plant(),
            &sample_weather(20.0, 39.0, "Clear"),
            None,
            Utc::now(),
        );
        assert!(dry.alerts.iter().any(|a| a.contains("dry")));

        let borderline = evaluate(
            &sample_plant(),
            &sample_weather(20.0, 40.0, "Clear"),
            None,
            Utc::now(),
        );
        assert!(borderline.alerts.is_empty());
    }

    #[test]
    fn overdue_watering_sets_thirsty() {
        let now = Utc::now();
        let history = watered_days_ago(now, 8);
        let status = evaluate(
            &sample_plant(),
            &sample_weather(20.0, 50.0, "Clear"),
            Some(&history),
            now,
        );
        assert_eq!(status.health, Health::Thirsty);
        assert_eq!(status.next_actions.water_in.as_deref(), Some("Now"));
        assert!(status.alerts.iter().any(|a| a.contains("Time to water")));
    }

    #[test]
    fn rain_pushes_watering_back() {
        let now = Utc::now();
        let history = watered_days_ago(now, 8);
        let status = evaluate(
            &sample_plant(),
            &sample_weather(20.0, 50.0, "Light rain"),
            Some(&history),
            now,
        );
        assert_ne!(status.health, Health::Thirsty);
        assert!(status.alerts.iter().any(|a| a.contains("raining")));
        assert_eq!(status.next_actions.water_in.as_deref(), Some("1 days"));
    }

    #[test]
    fn thirsty_wins_over_other_alerts() {
        let now = Utc::now();
        let history = watered_days_ago(now, 9);
        let status = evaluate(
            &sample_plant(),
            &sample_weather(30.0, 50.0, "Clear"),
            Some(&history),
            now,
        );
        assert_eq!(status.health, Health::Thirsty);
        assert!(status.alerts[0].contains("Too hot"));
        assert!(status.alerts.iter().any(|a| a.contains("Time to water")));
    }

    #[test]
    fn sun_exposure_is_informational() {
        let now = Utc::now();
        let history = CareHistory {
            last_watered: Some(now - Duration::days(2)),
            is_in_sun: true,
        };
        let status = evaluate(
            &sample_plant(),
            &sample_weather(20.0, 50.0, "Clear"),
            Some(&history),
            now,
        );
        assert_eq!(status.health, Health::NeedsAttention);
        assert!(status.alerts.iter().any(|a| a.contains("sun exposure")));
        assert_eq!(status.next_actions.water_in.as_deref(), Some("5 days"));
    }

    #[test]
    fn quiet_garden_stays_optimal() {
        let now = Utc::now();
        let history = watered_days_ago(now, 2);
        let status = evaluate(
            &sample_plant(),
            &sample_weather(21.0, 55.0, "Clear"),
            Some(&history),
            now,
        );
        assert_eq!(status.health, Health::Optimal);
        assert!(status.alerts.is_empty());
        assert_eq!(status.next_actions.water_in.as_deref(), Some("5 days"));
    }

    #[test]
    fn missing_history_skips_watering_and_sun_checks() {
        let status = evaluate(
            &sample_plant(),
            &sample_weather(21.0, 55.0, "Clear"),
            None,
            Utc::now(),
        );
        assert_eq!(status.health, Health::Optimal);
        assert_eq!(status.next_actions.water_in, None);
    }

    #[test]
    fn missing_weather_yields_pending_status() {
        let status = evaluate_or_pending(&sample_plant(), None, None, Utc::now());
        assert_eq!(status.health, Health::Unknown);
        assert!(status.alerts.is_empty());
    }
}
