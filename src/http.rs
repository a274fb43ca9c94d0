//! Thin wrapper over `reqwest` shared by every outbound call.
//!
//! No retries happen here; callers compose [`crate::resilience::retry`] around
//! the methods when a call site wants them.

use std::sync::Arc;
use std::time::Duration;

use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::constants::USER_AGENT;
use crate::error::{Error, Result};

#[derive(Clone)]
pub struct HttpClient {
    client: Arc<Client>,
}

impl HttpClient {
    pub fn new(timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(timeout)
            .build()?;

        Ok(Self {
            client: Arc::new(client),
        })
    }

    /// GET returning the raw body, for CSV endpoints
    pub async fn get_text(&self, url: &str) -> Result<String> {
        tracing::debug!("GET {}", url);
        let response = self.client.get(url).send().await?;
        let response = ensure_success(response).await?;
        Ok(response.text().await?)
    }

    /// GET with query parameters, deserializing the JSON body
    pub async fn get_json<T, Q>(&self, url: &str, query: &Q) -> Result<T>
    where
        T: DeserializeOwned,
        Q: Serialize + ?Sized,
    {
        tracing::debug!("GET {}", url);
        let response = self.client.get(url).query(query).send().await?;
        let response = ensure_success(response).await?;
        let body = response.text().await?;
        Ok(serde_json::from_str(&body)?)
    }

    /// POST a JSON payload with a bearer token, deserializing the JSON body
    pub async fn post_json<T, B>(&self, url: &str, bearer: &str, payload: &B) -> Result<T>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        tracing::debug!("POST {}", url);
        let response = self
            .client
            .post(url)
            .bearer_auth(bearer)
            .json(payload)
            .send()
            .await?;
        let response = ensure_success(response).await?;
        let body = response.text().await?;
        Ok(serde_json::from_str(&body)?)
    }
}

async fn ensure_success(response: Response) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    Err(Error::HttpStatus {
        status: status.as_u16(),
        body,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};
    use wiremock::matchers::{body_json, header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client() -> HttpClient {
        HttpClient::new(Duration::from_secs(5)).unwrap()
    }

    #[tokio::test]
    async fn test_get_text_returns_body() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/data.csv"))
            .respond_with(ResponseTemplate::new(200).set_body_string("a,b\n1,2\n"))
            .mount(&server)
            .await;

        let body = client()
            .get_text(&format!("{}/data.csv", server.uri()))
            .await
            .unwrap();
        assert_eq!(body, "a,b\n1,2\n");
    }

    #[tokio::test]
    async fn test_non_success_status_is_status_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(404).set_body_string("missing"))
            .mount(&server)
            .await;

        let err = client()
            .get_text(&format!("{}/nope", server.uri()))
            .await
            .unwrap_err();
        match err {
            Error::HttpStatus { status, body } => {
                assert_eq!(status, 404);
                assert_eq!(body, "missing");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn test_get_json_sends_query() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(query_param("q", "Rabat"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"ok": true})))
            .mount(&server)
            .await;

        let value: Value = client()
            .get_json(&server.uri(), &[("q", "Rabat")])
            .await
            .unwrap();
        assert_eq!(value["ok"], true);
    }

    #[tokio::test]
    async fn test_post_json_sends_bearer_and_payload() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(header("authorization", "Bearer token-1"))
            .and(body_json(json!({"input_prompt": "Hi"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"Response": "Hello"})))
            .expect(1)
            .mount(&server)
            .await;

        let value: Value = client()
            .post_json(&server.uri(), "token-1", &json!({"input_prompt": "Hi"}))
            .await
            .unwrap();
        assert_eq!(value["Response"], "Hello");
    }

    #[tokio::test]
    async fn test_unreachable_host_is_transport_error() {
        // Port 9 (discard) on localhost is not expected to accept HTTP.
        let err = client().get_text("http://127.0.0.1:9/").await.unwrap_err();
        assert!(err.is_transport());
    }
}
