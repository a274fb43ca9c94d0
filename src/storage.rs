//! Output directories, created once at startup and handed to writers.

use std::fs;
use std::path::{Path, PathBuf};

use uuid::Uuid;

use crate::constants::{DATA_DIR_NAME, WEATHER_DATA_DIR_NAME};
use crate::error::Result;

#[derive(Debug, Clone)]
pub struct DataDirs {
    data: PathBuf,
    weather: PathBuf,
}

impl DataDirs {
    /// Creates `<base>/data_v2` and `<base>/weather_data` if missing.
    pub fn init(base: impl AsRef<Path>) -> Result<Self> {
        let base = base.as_ref();
        let dirs = Self {
            data: base.join(DATA_DIR_NAME),
            weather: base.join(WEATHER_DATA_DIR_NAME),
        };
        fs::create_dir_all(&dirs.data)?;
        fs::create_dir_all(&dirs.weather)?;
        tracing::debug!("Data directories ready under {}", base.display());
        Ok(dirs)
    }

    pub fn data_dir(&self) -> &Path {
        &self.data
    }

    pub fn weather_dir(&self) -> &Path {
        &self.weather
    }

    /// Fresh `{crop}_weather_data_{uuid}.xlsx` path inside the weather directory.
    ///
    /// Recreates the directory if it disappeared since startup.
    pub fn new_weather_file(&self, crop: &str) -> Result<PathBuf> {
        fs::create_dir_all(&self.weather)?;
        Ok(self
            .weather
            .join(format!("{}_weather_data_{}.xlsx", crop, Uuid::new_v4())))
    }
}
