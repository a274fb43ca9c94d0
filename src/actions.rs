//! Chatbot actions invoked by the dialogue manager.
//!
//! Each action reads slots from a [`Tracker`], talks to one upstream API and
//! utters exactly one message through the [`Dispatcher`]. Upstream failures are
//! logged and replaced by a fixed apology; a missing credential is an error
//! raised before any request is sent.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tracing::{info, warn};

use crate::config::Settings;
use crate::constants::{RESPONSE_APOLOGY, WEATHER_APOLOGY};
use crate::error::{Error, Result};
use crate::formatters::format_current_weather;
use crate::http::HttpClient;
use crate::models::{CurrentWeatherResponse, GooeyRequest, GooeyResponse};

pub const GET_WEATHER: &str = "action_get_weather";
pub const PROVIDE_YIELD_INFOS: &str = "action_provide_yield_infos";
pub const PROVIDE_MARKET_INFORMATION: &str = "action_provide_market_information";
pub const PEST_CONTROL: &str = "action_Pest_control";
pub const PROVIDE_IRRIGATION_FERTILIZATION: &str = "action_provide_irrigation_fertilization";

/// AI-bot actions and the fixed prompt each one sends.
pub const PROMPT_ACTIONS: [(&str, &str); 4] = [
    (PROVIDE_YIELD_INFOS, "Why are my potatoes small after harvest?"),
    (PROVIDE_MARKET_INFORMATION, "Which seeds are the best for red potatoes?"),
    (
        PEST_CONTROL,
        "Can you recommend a pest-resistant variety of wheat for planting?",
    ),
    (
        PROVIDE_IRRIGATION_FERTILIZATION,
        "What irrigation techniques are suitable for arid regions?",
    ),
];

/// Slots extracted by the dialogue manager.
#[derive(Debug, Clone, Default)]
pub struct Tracker {
    slots: HashMap<String, String>,
}

impl Tracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_slot(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.slots.insert(name.into(), value.into());
        self
    }

    pub fn get_slot(&self, name: &str) -> Option<&str> {
        self.slots.get(name).map(String::as_str)
    }
}

/// Collects the utterances an action emits.
#[derive(Debug, Default)]
pub struct Dispatcher {
    messages: Vec<String>,
}

impl Dispatcher {
    pub fn utter_message(&mut self, text: impl Into<String>) {
        self.messages.push(text.into());
    }

    pub fn messages(&self) -> &[String] {
        &self.messages
    }

    pub fn into_messages(self) -> Vec<String> {
        self.messages
    }
}

#[async_trait]
pub trait Action: Send + Sync {
    fn name(&self) -> &'static str;

    async fn run(&self, dispatcher: &mut Dispatcher, tracker: &Tracker) -> Result<()>;
}

/// Current conditions for the `location` slot from OpenWeatherMap.
pub struct GetWeatherAction {
    http: HttpClient,
    settings: Arc<Settings>,
}

impl GetWeatherAction {
    pub fn new(http: HttpClient, settings: Arc<Settings>) -> Self {
        Self { http, settings }
    }

    async fn current_weather(&self, location: &str, api_key: &str) -> Result<(f64, String)> {
        let url = format!(
            "{}/data/2.5/weather",
            self.settings.openweather_api_base.trim_end_matches('/')
        );
        let response: CurrentWeatherResponse = self
            .http
            .get_json(&url, &[("q", location), ("appid", api_key), ("units", "metric")])
            .await?;

        let description = response
            .weather
            .into_iter()
            .next()
            .map(|w| w.description)
            .ok_or_else(|| Error::Parse("weather response has no conditions".into()))?;

        Ok((response.main.temp, description))
    }
}

#[async_trait]
impl Action for GetWeatherAction {
    fn name(&self) -> &'static str {
        GET_WEATHER
    }

    async fn run(&self, dispatcher: &mut Dispatcher, tracker: &Tracker) -> Result<()> {
        let api_key = self.settings.require_openweather_api_key()?;

        let Some(location) = tracker.get_slot("location") else {
            warn!("No location slot set, cannot fetch weather");
            dispatcher.utter_message(WEATHER_APOLOGY);
            return Ok(());
        };

        let message = match self.current_weather(location, api_key).await {
            Ok((temperature, description)) => {
                format_current_weather(location, temperature, &description)
            }
            Err(e) => {
                warn!("Failed to fetch weather for {}: {}", location, e);
                WEATHER_APOLOGY.to_string()
            }
        };

        dispatcher.utter_message(message);
        Ok(())
    }
}

/// Sends a fixed prompt to the Gooey AI video-bots endpoint.
pub struct AskBotAction {
    name: &'static str,
    prompt: &'static str,
    http: HttpClient,
    settings: Arc<Settings>,
}

impl AskBotAction {
    pub fn new(
        name: &'static str,
        prompt: &'static str,
        http: HttpClient,
        settings: Arc<Settings>,
    ) -> Self {
        Self {
            name,
            prompt,
            http,
            settings,
        }
    }

    async fn fetch_response(&self, api_key: &str) -> Result<String> {
        let url = format!(
            "{}/v2/video-bots/",
            self.settings.gooey_api_base.trim_end_matches('/')
        );
        let response: GooeyResponse = self
            .http
            .post_json(&url, api_key, &GooeyRequest {
                input_prompt: self.prompt,
            })
            .await?;
        Ok(response.response)
    }
}

#[async_trait]
impl Action for AskBotAction {
    fn name(&self) -> &'static str {
        self.name
    }

    async fn run(&self, dispatcher: &mut Dispatcher, _tracker: &Tracker) -> Result<()> {
        let api_key = self.settings.require_gooey_api_key()?;

        let message = match self.fetch_response(api_key).await {
            Ok(text) => text,
            Err(e) => {
                warn!("An error occurred while making the API request: {}", e);
                RESPONSE_APOLOGY.to_string()
            }
        };

        dispatcher.utter_message(message);
        Ok(())
    }
}

/// Actions by name.
#[derive(Default)]
pub struct ActionRegistry {
    actions: HashMap<&'static str, Arc<dyn Action>>,
}

impl ActionRegistry {
    /// Registry holding the weather action and every prompt action.
    pub fn standard(http: HttpClient, settings: Arc<Settings>) -> Self {
        let mut registry = Self::default();
        registry.register(GetWeatherAction::new(http.clone(), settings.clone()));
        for (name, prompt) in PROMPT_ACTIONS {
            registry.register(AskBotAction::new(name, prompt, http.clone(), settings.clone()));
        }
        registry
    }

    pub fn register(&mut self, action: impl Action + 'static) {
        self.actions.insert(action.name(), Arc::new(action));
    }

    pub fn names(&self) -> Vec<&'static str> {
        let mut names: Vec<_> = self.actions.keys().copied().collect();
        names.sort_unstable();
        names
    }

    /// Runs the named action and returns what it uttered.
    pub async fn run(&self, name: &str, tracker: &Tracker) -> Result<Vec<String>> {
        let action = self
            .actions
            .get(name)
            .ok_or_else(|| Error::UnknownAction(name.to_string()))?;

        info!("Running action {}", name);
        let mut dispatcher = Dispatcher::default();
        action.run(&mut dispatcher, tracker).await?;
        Ok(dispatcher.into_messages())
    }
}
