use crate::crops::{base_temperature, supported_crops};
use crate::indices::ProcessedWeather;

/// Formats the current-weather utterance
pub fn format_current_weather(location: &str, temperature: f64, description: &str) -> String {
    format!(
        "It's {}\u{00b0}C and {} in {} right now.",
        temperature, description, location
    )
}

/// Formats a processed historical download into a human-readable summary
pub fn format_history_summary(crop: &str, processed: &ProcessedWeather) -> String {
    let table = &processed.table;
    let (Some(first), Some(last)) = (table.records.first(), table.records.last()) else {
        return format!("No historical weather data available for {}.", crop);
    };

    let mut output = format!(
        "Historical Weather ({})\nDays: {}\nPeriod: {} to {}\n",
        crop,
        table.len(),
        first.date_label(),
        last.date_label()
    );
    if let Some(indices) = last.derived {
        output.push_str(&format!(
            "Accumulated GDD: {:.1}\nAccumulated Precipitation: {:.1} mm\n",
            indices.agdd, indices.accumulated_precipitation
        ));
    }
    if let Some(path) = &processed.path {
        output.push_str(&format!("Saved to: {}\n", path.display()));
    }
    output
}

/// Lists supported crops with their base temperatures
pub fn format_supported_crops() -> String {
    let mut output = String::from("Supported Crops:\n\n");
    for name in supported_crops() {
        output.push_str(&format!("  {}: base {}\u{00b0}C\n", name, base_temperature(name)));
    }
    output
}
