/// User agent string for HTTP requests
pub const USER_AGENT: &str = "agribot/0.1.0";

/// NASA POWER API base URL
pub const POWER_API_BASE: &str = "https://power.larc.nasa.gov";

/// OpenWeatherMap API base URL
pub const OPENWEATHER_API_BASE: &str = "http://api.openweathermap.org";

/// Gooey AI API base URL
pub const GOOEY_API_BASE: &str = "https://api.gooey.ai";

/// Daily point parameters requested from NASA POWER
pub const POWER_PARAMETERS: &str = "T2M_MAX,T2M_MIN,PRECTOTCORR,RH2M,WS10M";

/// Metadata lines preceding the column header in NASA POWER CSV bodies
pub const POWER_CSV_PREAMBLE_LINES: usize = 13;

/// Directory names created under the data root
pub const DATA_DIR_NAME: &str = "data_v2";
pub const WEATHER_DATA_DIR_NAME: &str = "weather_data";

pub const WEATHER_APOLOGY: &str = "Sorry, I couldn't fetch the weather data.";
pub const RESPONSE_APOLOGY: &str = "Sorry, I couldn't fetch the response.";
