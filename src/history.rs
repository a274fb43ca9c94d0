//! Historical daily weather from NASA POWER.

use tracing::{info, warn};

use crate::constants::{POWER_CSV_PREAMBLE_LINES, POWER_PARAMETERS};
use crate::crops::is_supported;
use crate::error::Result;
use crate::http::HttpClient;
use crate::indices::{process, ProcessedWeather};
use crate::models::{Coordinate, DateRange, PowerCsvRow, WeatherRecord, WeatherTable};
use crate::resilience::{retry, timed, RetryPolicy};
use crate::storage::DataDirs;

#[derive(Clone)]
pub struct PowerClient {
    http: HttpClient,
    base_url: String,
    retry_policy: RetryPolicy,
}

impl PowerClient {
    pub fn new(http: HttpClient, base_url: impl Into<String>) -> Self {
        Self {
            http,
            base_url: base_url.into(),
            retry_policy: RetryPolicy::weather_download(),
        }
    }

    pub fn with_retry_policy(mut self, policy: RetryPolicy) -> Self {
        self.retry_policy = policy;
        self
    }

    pub fn query_url(&self, coordinate: Coordinate, range: DateRange) -> String {
        format!(
            "{}/api/temporal/daily/point?parameters={}&community=RE&format=CSV&longitude={}&latitude={}&start={}&end={}",
            self.base_url.trim_end_matches('/'),
            POWER_PARAMETERS,
            coordinate.longitude,
            coordinate.latitude,
            range.start().format("%Y%m%d"),
            range.end().format("%Y%m%d"),
        )
    }

    /// Downloads and parses daily records for `coordinate` over `range`.
    ///
    /// Every failure is retried under the client's policy. If the last attempt
    /// failed at the transport level the result is an empty table; status and
    /// parse errors are returned.
    pub async fn fetch(&self, coordinate: Coordinate, range: DateRange) -> Result<WeatherTable> {
        let url = self.query_url(coordinate, range);
        info!(
            "Fetching historical weather for {}, {} from {} to {}",
            coordinate.longitude,
            coordinate.latitude,
            range.start(),
            range.end()
        );

        let http = &self.http;
        let url = url.as_str();
        let outcome = retry(&self.retry_policy, "fetch_hist_weather_data", || async move {
            let body = http.get_text(url).await?;
            parse_power_csv(&body)
        })
        .await;

        match outcome {
            Err(e) if e.is_transport() => {
                warn!("Error fetching weather data: {}", e);
                Ok(WeatherTable::default())
            }
            other => other,
        }
    }
}

/// Parses a POWER daily CSV body, skipping its metadata preamble.
pub fn parse_power_csv(body: &str) -> Result<WeatherTable> {
    let data = body
        .lines()
        .skip(POWER_CSV_PREAMBLE_LINES)
        .collect::<Vec<_>>()
        .join("\n");

    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(data.as_bytes());

    let mut records = Vec::new();
    for row in reader.deserialize::<PowerCsvRow>() {
        records.push(WeatherRecord::try_from(row?)?);
    }

    Ok(WeatherTable::new(records))
}

/// Fetches, processes and saves historical weather for `crop`.
///
/// The whole pipeline runs under `policy` and is timed. Index computation and
/// the workbook write run on the blocking pool.
pub async fn download_history(
    client: &PowerClient,
    dirs: &DataDirs,
    coordinate: Coordinate,
    range: DateRange,
    crop: &str,
    policy: &RetryPolicy,
) -> Result<ProcessedWeather> {
    if !is_supported(crop) {
        warn!("Unknown crop {}, using a base temperature of 0", crop);
    }

    timed(
        "download_hist_weather_data",
        retry(policy, "download_hist_weather_data", || {
            let dirs = dirs.clone();
            let crop = crop.to_string();
            async move {
                let table = client.fetch(coordinate, range).await?;
                tokio::task::spawn_blocking(move || process(table, &crop, &dirs)).await?
            }
        }),
    )
    .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use chrono::NaiveDate;
    use std::time::Duration;

    fn sample_body() -> String {
        let mut body = String::new();
        body.push_str("-BEGIN HEADER-\n");
        for i in 0..11 {
            body.push_str(&format!("metadata line {}\n", i));
        }
        body.push_str("-END HEADER-\n");
        body.push_str("YEAR,MO,DY,T2M_MAX,T2M_MIN,PRECTOTCORR,RH2M,WS10M\n");
        body.push_str("2023,1,1,20.0,10.0,0.5,70.1,3.2\n");
        body.push_str("2023,1,2,22.0,12.0,0.0,65.0,2.9\n");
        body.push_str("2023,1,3,18.0,8.0,1.25,80.4,4.0\n");
        body
    }

    #[test]
    fn test_parse_skips_preamble_and_builds_dates() {
        let table = parse_power_csv(&sample_body()).unwrap();
        assert_eq!(table.len(), 3);
        assert_eq!(table.records[0].date, NaiveDate::from_ymd_opt(2023, 1, 1).unwrap());
        assert_eq!(table.records[2].max_temp, 18.0);
        assert_eq!(table.records[2].precipitation, 1.25);
        assert!(table.records.iter().all(|r| r.derived.is_none()));
    }

    #[test]
    fn test_parse_body_without_rows_is_empty() {
        let table = parse_power_csv("only\na\nfew\nlines\n").unwrap();
        assert!(table.is_empty());
    }

    #[test]
    fn test_parse_bad_number_is_csv_error() {
        let body = sample_body().replace("22.0,12.0", "hot,12.0");
        assert!(matches!(parse_power_csv(&body), Err(Error::Csv(_))));
    }

    #[test]
    fn test_query_url_uses_compact_dates() {
        let http = HttpClient::new(Duration::from_secs(1)).unwrap();
        let client = PowerClient::new(http, "https://power.example/");
        let range = DateRange::new(
            NaiveDate::from_ymd_opt(2023, 1, 1).unwrap(),
            NaiveDate::from_ymd_opt(2023, 1, 3).unwrap(),
        )
        .unwrap();

        let url = client.query_url(Coordinate::new(10.0, 36.0), range);
        assert!(url.starts_with("https://power.example/api/temporal/daily/point?"));
        assert!(url.contains("parameters=T2M_MAX,T2M_MIN,PRECTOTCORR,RH2M,WS10M"));
        assert!(url.contains("format=CSV"));
        assert!(url.contains("longitude=10&latitude=36"));
        assert!(url.ends_with("start=20230101&end=20230103"));
    }
}
