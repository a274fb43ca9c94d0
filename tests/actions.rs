//! Chatbot actions against mock OpenWeatherMap and Gooey AI servers.

use std::sync::Arc;
use std::time::Duration;

use agribot::actions::{
    ActionRegistry, Tracker, GET_WEATHER, PEST_CONTROL, PROVIDE_YIELD_INFOS,
};
use agribot::config::Settings;
use agribot::constants::{RESPONSE_APOLOGY, WEATHER_APOLOGY};
use agribot::http::HttpClient;
use agribot::Error;
use serde_json::json;
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn registry(server: &MockServer, gooey_key: Option<&str>, weather_key: Option<&str>) -> ActionRegistry {
    let settings = Settings {
        gooey_api_key: gooey_key.map(str::to_string),
        openweather_api_key: weather_key.map(str::to_string),
        gooey_api_base: server.uri(),
        openweather_api_base: server.uri(),
        ..Settings::default()
    };
    let http = HttpClient::new(Duration::from_secs(5)).unwrap();
    ActionRegistry::standard(http, Arc::new(settings))
}

#[tokio::test]
async fn test_missing_gooey_key_fails_before_any_request() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let result = registry(&server, None, None)
        .run(PROVIDE_YIELD_INFOS, &Tracker::new())
        .await;

    assert!(matches!(result, Err(Error::Config(_))));
}

#[tokio::test]
async fn test_prompt_action_utters_bot_response() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v2/video-bots/"))
        .and(header("authorization", "Bearer gooey-key"))
        .and(body_json(json!({
            "input_prompt": "Can you recommend a pest-resistant variety of wheat for planting?"
        })))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"Response": "Try a rust-resistant cultivar."})),
        )
        .expect(1)
        .mount(&server)
        .await;

    let messages = registry(&server, Some("gooey-key"), None)
        .run(PEST_CONTROL, &Tracker::new())
        .await
        .unwrap();

    assert_eq!(messages, vec!["Try a rust-resistant cultivar.".to_string()]);
}

#[tokio::test]
async fn test_prompt_action_apologizes_on_upstream_failure() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(502))
        .mount(&server)
        .await;

    let messages = registry(&server, Some("gooey-key"), None)
        .run(PROVIDE_YIELD_INFOS, &Tracker::new())
        .await
        .unwrap();

    assert_eq!(messages, vec![RESPONSE_APOLOGY.to_string()]);
}

#[tokio::test]
async fn test_weather_action_reports_current_conditions() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/data/2.5/weather"))
        .and(query_param("q", "Meknes"))
        .and(query_param("appid", "owm-key"))
        .and(query_param("units", "metric"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "weather": [{"main": "Clouds", "description": "scattered clouds"}],
            "main": {"temp": 17.4, "humidity": 55}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let tracker = Tracker::new().with_slot("location", "Meknes");
    let messages = registry(&server, None, Some("owm-key"))
        .run(GET_WEATHER, &tracker)
        .await
        .unwrap();

    assert_eq!(
        messages,
        vec!["It's 17.4°C and scattered clouds in Meknes right now.".to_string()]
    );
}

#[tokio::test]
async fn test_weather_action_apologizes_on_bad_status() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({"message": "city not found"})))
        .mount(&server)
        .await;

    let tracker = Tracker::new().with_slot("location", "Atlantis");
    let messages = registry(&server, None, Some("owm-key"))
        .run(GET_WEATHER, &tracker)
        .await
        .unwrap();

    assert_eq!(messages, vec![WEATHER_APOLOGY.to_string()]);
}

#[tokio::test]
async fn test_missing_weather_key_fails_before_any_request() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let tracker = Tracker::new().with_slot("location", "Fes");
    let result = registry(&server, Some("gooey-key"), None)
        .run(GET_WEATHER, &tracker)
        .await;

    assert!(matches!(result, Err(Error::Config(_))));
}
