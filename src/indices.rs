//! Growing Degree Days, their running total, and accumulated precipitation.

use std::path::{Path, PathBuf};

use rust_xlsxwriter::Workbook;
use serde::Serialize;
use tracing::info;

use crate::crops::base_temperature;
use crate::error::Result;
use crate::models::{DerivedIndices, WeatherTable};
use crate::storage::DataDirs;

const COLUMNS: [&str; 9] = [
    "T2M_MAX",
    "T2M_MIN",
    "PRECTOTCORR",
    "RH2M",
    "WS10M",
    "Date",
    "GDD",
    "AGDD",
    "APRECTOTCORR",
];

/// Enriched table plus the spreadsheet it was written to.
///
/// `path` is `None` only when the input table was empty.
#[derive(Debug, Clone, Serialize)]
pub struct ProcessedWeather {
    pub table: WeatherTable,
    pub path: Option<PathBuf>,
}

/// Daily GDD, clamped at zero.
pub fn daily_gdd(max_temp: f64, min_temp: f64, base: f64) -> f64 {
    ((max_temp + min_temp) / 2.0 - base).max(0.0)
}

/// Fills `derived` on every record, accumulating in table order.
pub fn compute_indices(table: &mut WeatherTable, base: f64) {
    let mut agdd = 0.0;
    let mut precipitation = 0.0;

    for record in &mut table.records {
        let gdd = daily_gdd(record.max_temp, record.min_temp, base);
        agdd += gdd;
        precipitation += record.precipitation;
        record.derived = Some(DerivedIndices {
            gdd,
            agdd,
            accumulated_precipitation: precipitation,
        });
    }
}

/// Computes the indices for `crop` and writes the result to a new workbook.
///
/// An empty table is handed back untouched and nothing is written.
pub fn process(mut table: WeatherTable, crop: &str, dirs: &DataDirs) -> Result<ProcessedWeather> {
    if table.is_empty() {
        return Ok(ProcessedWeather { table, path: None });
    }

    info!("Computing GDD and AGDD for {}...", crop);
    compute_indices(&mut table, f64::from(base_temperature(crop)));
    info!("Computed GDD and AGDD for {}", crop);

    let path = dirs.new_weather_file(crop)?;
    write_workbook(&table, &path)?;
    info!("Saved weather data to {}", path.display());

    Ok(ProcessedWeather {
        table,
        path: Some(path),
    })
}

pub fn write_workbook(table: &WeatherTable, path: &Path) -> Result<()> {
    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet();

    for (col, name) in COLUMNS.iter().enumerate() {
        sheet.write_string(0, col as u16, *name)?;
    }

    for (i, record) in table.records.iter().enumerate() {
        let row = (i + 1) as u32;
        sheet.write_number(row, 0, record.max_temp)?;
        sheet.write_number(row, 1, record.min_temp)?;
        sheet.write_number(row, 2, record.precipitation)?;
        sheet.write_number(row, 3, record.relative_humidity)?;
        sheet.write_number(row, 4, record.wind_speed)?;
        sheet.write_string(row, 5, record.date_label())?;
        if let Some(d) = record.derived {
            sheet.write_number(row, 6, d.gdd)?;
            sheet.write_number(row, 7, d.agdd)?;
            sheet.write_number(row, 8, d.accumulated_precipitation)?;
        }
    }

    workbook.save(path)?;
    Ok(())
}
