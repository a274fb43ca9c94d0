use std::sync::Arc;

use anyhow::Result;
use chrono::NaiveDate;
use rmcp::{
    handler::server::{wrapper::Parameters, ServerHandler, tool::ToolRouter},
    model::{CallToolResult, Content, Implementation, ProtocolVersion, ServerCapabilities, ServerInfo},
    tool, tool_handler, tool_router,
    ErrorData as McpError,
};

use crate::actions::{
    ActionRegistry, Tracker, GET_WEATHER, PEST_CONTROL, PROVIDE_IRRIGATION_FERTILIZATION,
    PROVIDE_MARKET_INFORMATION, PROVIDE_YIELD_INFOS,
};
use crate::config::Settings;
use crate::crops::DEFAULT_CROP;
use crate::error::Error;
use crate::formatters::{format_history_summary, format_supported_crops};
use crate::history::{download_history, PowerClient};
use crate::http::HttpClient;
use crate::models::{Coordinate, DateRange, DownloadHistoryRequest, GetWeatherRequest};
use crate::resilience::RetryPolicy;
use crate::storage::DataDirs;

/// Action server exposing the chatbot actions as MCP tools
#[derive(Clone)]
pub struct AgriBot {
    actions: Arc<ActionRegistry>,
    power: PowerClient,
    dirs: DataDirs,
    tool_router: ToolRouter<Self>,
}

impl AgriBot {
    /// Creates the server from settings and already-initialized data directories
    pub fn new(settings: Settings, dirs: DataDirs) -> Result<Self> {
        let http = HttpClient::new(settings.http_timeout)?;
        let power = PowerClient::new(http.clone(), settings.power_api_base.clone());
        let actions = ActionRegistry::standard(http, Arc::new(settings));
        tracing::info!("Registered actions: {}", actions.names().join(", "));

        Ok(Self {
            actions: Arc::new(actions),
            power,
            dirs,
            tool_router: Self::tool_router(),
        })
    }

    /// Runs a registered action and returns its utterances as text content
    async fn run_action(&self, name: &str, tracker: Tracker) -> Result<CallToolResult, McpError> {
        let messages = self
            .actions
            .run(name, &tracker)
            .await
            .map_err(|e| to_mcp_error(name, e))?;

        Ok(CallToolResult::success(
            messages.into_iter().map(Content::text).collect(),
        ))
    }
}

fn to_mcp_error(context: &str, error: Error) -> McpError {
    match error {
        Error::InvalidDateRange { .. } | Error::Parse(_) => {
            McpError::invalid_params(format!("{}: {}", context, error), None)
        }
        other => McpError::internal_error(format!("{} failed: {}", context, other), None),
    }
}

fn parse_date(field: &str, raw: &str) -> Result<NaiveDate, McpError> {
    raw.parse::<NaiveDate>().map_err(|e| {
        McpError::invalid_params(format!("{} must be YYYY-MM-DD: {}", field, e), None)
    })
}

#[tool_handler]
impl ServerHandler for AgriBot {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: ProtocolVersion::V_2024_11_05,
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation {
                name: "agribot".to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
                icons: None,
                title: None,
                website_url: None,
            },
            instructions: Some(
                "Agricultural assistant actions: current weather by location, agronomy answers \
                from an AI bot, and historical weather with growing degree days for a crop."
                    .to_string(),
            ),
        }
    }
}

#[tool_router]
impl AgriBot {
    /// Current weather for the location slot
    #[tool(description = "Get the current weather for a location (city or place name, e.g. 'Rabat').")]
    async fn get_weather(
        &self,
        Parameters(request): Parameters<GetWeatherRequest>,
    ) -> Result<CallToolResult, McpError> {
        tracing::info!("Getting weather for location: {}", request.location);
        let tracker = Tracker::new().with_slot("location", request.location);
        self.run_action(GET_WEATHER, tracker).await
    }

    #[tool(description = "Explain why potatoes can be small after harvest and how to improve yield.")]
    async fn provide_yield_infos(&self) -> Result<CallToolResult, McpError> {
        self.run_action(PROVIDE_YIELD_INFOS, Tracker::new()).await
    }

    #[tool(description = "Market information: which seeds are best for red potatoes.")]
    async fn provide_market_information(&self) -> Result<CallToolResult, McpError> {
        self.run_action(PROVIDE_MARKET_INFORMATION, Tracker::new()).await
    }

    #[tool(description = "Pest control advice: pest-resistant wheat varieties for planting.")]
    async fn pest_control(&self) -> Result<CallToolResult, McpError> {
        self.run_action(PEST_CONTROL, Tracker::new()).await
    }

    #[tool(description = "Irrigation and fertilization techniques suitable for arid regions.")]
    async fn provide_irrigation_fertilization(&self) -> Result<CallToolResult, McpError> {
        self.run_action(PROVIDE_IRRIGATION_FERTILIZATION, Tracker::new()).await
    }

    /// Downloads NASA POWER history, computes GDD/AGDD and saves a spreadsheet
    #[tool(description = "Download daily historical weather (NASA POWER) for a longitude/latitude between start_date and end_date (YYYY-MM-DD), compute growing degree days for a crop, and save the table as an .xlsx file.")]
    async fn download_historical_weather(
        &self,
        Parameters(request): Parameters<DownloadHistoryRequest>,
    ) -> Result<CallToolResult, McpError> {
        let start = parse_date("start_date", &request.start_date)?;
        let end = parse_date("end_date", &request.end_date)?;
        let range = DateRange::new(start, end)
            .map_err(|e| to_mcp_error("download_historical_weather", e))?;
        let coordinate = Coordinate::new(request.longitude, request.latitude);
        let crop = request.crop.as_deref().unwrap_or(DEFAULT_CROP);

        tracing::info!(
            "Downloading historical weather for {} at {}, {}",
            crop,
            coordinate.longitude,
            coordinate.latitude
        );

        let processed = download_history(
            &self.power,
            &self.dirs,
            coordinate,
            range,
            crop,
            &RetryPolicy::pipeline(),
        )
        .await
        .map_err(|e| to_mcp_error("download_historical_weather", e))?;

        Ok(CallToolResult::success(vec![Content::text(
            format_history_summary(crop, &processed),
        )]))
    }

    #[tool(description = "List the crops with known base temperatures for growing degree days.")]
    async fn list_supported_crops(&self) -> Result<CallToolResult, McpError> {
        Ok(CallToolResult::success(vec![Content::text(
            format_supported_crops(),
        )]))
    }
}
