use chrono::NaiveDate;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

// ============================================================================
// Domain Models
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub longitude: f64,
    pub latitude: f64,
}

impl Coordinate {
    pub fn new(longitude: f64, latitude: f64) -> Self {
        Self { longitude, latitude }
    }
}

/// Inclusive calendar date range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DateRange {
    start: NaiveDate,
    end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self> {
        if end < start {
            return Err(Error::InvalidDateRange { start, end });
        }
        Ok(Self { start, end })
    }

    pub fn start(&self) -> NaiveDate {
        self.start
    }

    pub fn end(&self) -> NaiveDate {
        self.end
    }
}

/// Agronomic indices attached to a record by the index processor.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DerivedIndices {
    pub gdd: f64,
    pub agdd: f64,
    pub accumulated_precipitation: f64,
}

/// One day of NASA POWER data.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeatherRecord {
    pub date: NaiveDate,
    pub max_temp: f64,
    pub min_temp: f64,
    pub precipitation: f64,
    pub relative_humidity: f64,
    pub wind_speed: f64,
    pub derived: Option<DerivedIndices>,
}

impl WeatherRecord {
    pub fn date_label(&self) -> String {
        self.date.format("%Y-%m-%d").to_string()
    }
}

/// Daily records in upstream (ascending date) order.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct WeatherTable {
    pub records: Vec<WeatherRecord>,
}

impl WeatherTable {
    pub fn new(records: Vec<WeatherRecord>) -> Self {
        Self { records }
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn last_indices(&self) -> Option<DerivedIndices> {
        self.records.last().and_then(|r| r.derived)
    }
}

// ============================================================================
// NASA POWER API Models
// ============================================================================

/// Row of the POWER daily point CSV after the metadata preamble.
#[derive(Debug, Deserialize)]
pub struct PowerCsvRow {
    #[serde(rename = "YEAR")]
    pub year: i32,
    #[serde(rename = "MO")]
    pub month: u32,
    #[serde(rename = "DY")]
    pub day: u32,
    #[serde(rename = "T2M_MAX")]
    pub max_temp: f64,
    #[serde(rename = "T2M_MIN")]
    pub min_temp: f64,
    #[serde(rename = "PRECTOTCORR")]
    pub precipitation: f64,
    #[serde(rename = "RH2M")]
    pub relative_humidity: f64,
    #[serde(rename = "WS10M")]
    pub wind_speed: f64,
}

impl TryFrom<PowerCsvRow> for WeatherRecord {
    type Error = Error;

    fn try_from(row: PowerCsvRow) -> Result<Self> {
        let date = NaiveDate::from_ymd_opt(row.year, row.month, row.day).ok_or_else(|| {
            Error::Parse(format!(
                "invalid date {}-{}-{} in weather data",
                row.year, row.month, row.day
            ))
        })?;

        Ok(Self {
            date,
            max_temp: row.max_temp,
            min_temp: row.min_temp,
            precipitation: row.precipitation,
            relative_humidity: row.relative_humidity,
            wind_speed: row.wind_speed,
            derived: None,
        })
    }
}

// ============================================================================
// OpenWeatherMap API Models
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct CurrentWeatherResponse {
    pub weather: Vec<WeatherCondition>,
    pub main: MainReadings,
}

#[derive(Debug, Deserialize)]
pub struct WeatherCondition {
    pub description: String,
}

#[derive(Debug, Deserialize)]
pub struct MainReadings {
    pub temp: f64,
}

// ============================================================================
// Gooey AI API Models
// ============================================================================

#[derive(Debug, Serialize)]
pub struct GooeyRequest<'a> {
    pub input_prompt: &'a str,
}

#[derive(Debug, Deserialize)]
pub struct GooeyResponse {
    #[serde(rename = "Response")]
    pub response: String,
}

// ============================================================================
// MCP Tool Request Models
// ============================================================================

#[derive(Debug, Deserialize, Serialize, JsonSchema)]
pub struct GetWeatherRequest {
    /// City or place name, as extracted into the `location` slot
    pub location: String,
}

#[derive(Debug, Deserialize, Serialize, JsonSchema)]
pub struct DownloadHistoryRequest {
    pub longitude: f64,
    pub latitude: f64,
    /// First day, `YYYY-MM-DD`
    pub start_date: String,
    /// Last day, `YYYY-MM-DD`
    pub end_date: String,
    /// One of the supported crop names; defaults to Wheat
    pub crop: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_date_range_rejects_reversed_dates() {
        let start = NaiveDate::from_ymd_opt(2023, 1, 3).unwrap();
        let end = NaiveDate::from_ymd_opt(2023, 1, 1).unwrap();
        assert!(matches!(
            DateRange::new(start, end),
            Err(Error::InvalidDateRange { .. })
        ));
        assert!(DateRange::new(end, start).is_ok());
        assert!(DateRange::new(start, start).is_ok());
    }

    #[test]
    fn test_csv_row_with_impossible_date_fails() {
        let row = PowerCsvRow {
            year: 2023,
            month: 2,
            day: 30,
            max_temp: 1.0,
            min_temp: 0.0,
            precipitation: 0.0,
            relative_humidity: 50.0,
            wind_speed: 2.0,
        };
        assert!(matches!(WeatherRecord::try_from(row), Err(Error::Parse(_))));
    }

    #[test]
    fn test_date_label_is_iso() {
        let row = PowerCsvRow {
            year: 2023,
            month: 1,
            day: 5,
            max_temp: 1.0,
            min_temp: 0.0,
            precipitation: 0.0,
            relative_humidity: 50.0,
            wind_speed: 2.0,
        };
        let record = WeatherRecord::try_from(row).unwrap();
        assert_eq!(record.date_label(), "2023-01-05");
    }

    #[test]
    fn test_current_weather_response_parses() {
        let json = r#"{"weather":[{"description":"clear sky","main":"Clear"}],"main":{"temp":21.5,"humidity":40}}"#;
        let parsed: CurrentWeatherResponse = serde_json::from_str(json).unwrap();
        assert_eq!(parsed.weather[0].description, "clear sky");
        assert_eq!(parsed.main.temp, 21.5);
    }
}
