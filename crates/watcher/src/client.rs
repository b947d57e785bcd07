use std::future::Future;
use std::time::Duration;

use reqwest::StatusCode;
use serde_json::Value;

use herald_common::config::AppConfig;
use herald_common::error::WatchError;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Source of homework status snapshots.
pub trait StatusSource {
    /// Fetch every status change reported since `from_date` (unix seconds).
    fn fetch(&self, from_date: i64) -> impl Future<Output = Result<Value, WatchError>> + Send;
}

/// HTTP client for the homework status endpoint.
///
/// Returns the decoded JSON body as-is; shape checks belong to the validator.
#[derive(Debug, Clone)]
pub struct StatusApiClient {
    client: reqwest::Client,
    endpoint: String,
    token: String,
}

impl StatusApiClient {
    pub fn new(endpoint: impl Into<String>, token: impl Into<String>) -> Result<Self, WatchError> {
        let client = reqwest::Client::builder().timeout(REQUEST_TIMEOUT).build()?;

        Ok(Self {
            client,
            endpoint: endpoint.into(),
            token: token.into(),
        })
    }

    pub fn from_config(config: &AppConfig) -> Result<Self, WatchError> {
        Self::new(config.practicum_endpoint.clone(), config.practicum_token.clone())
    }
}

impl StatusSource for StatusApiClient {
    fn fetch(&self, from_date: i64) -> impl Future<Output = Result<Value, WatchError>> + Send {
        async move {
            tracing::debug!(from_date, endpoint = %self.endpoint, "Requesting homework statuses");

            let response = self
                .client
                .get(&self.endpoint)
                .header(reqwest::header::AUTHORIZATION, format!("OAuth {}", self.token))
                .query(&[("from_date", from_date)])
                .send()
                .await?;

            let status = response.status();
            if status != StatusCode::OK {
                return Err(WatchError::StatusCode(status.as_u16()));
            }

            Ok(response.json::<Value>().await?)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client_for(server: &MockServer) -> StatusApiClient {
        StatusApiClient::new(format!("{}/homework_statuses/", server.uri()), "secret").unwrap()
    }

    #[tokio::test]
    async fn test_fetch_sends_cursor_and_oauth_header() {
        let server = MockServer::start().await;
        let body = json!({"homeworks": [], "current_date": 1700000000});
        Mock::given(method("GET"))
            .and(path("/homework_statuses/"))
            .and(query_param("from_date", "1699999000"))
            .and(header("Authorization", "OAuth secret"))
            .respond_with(ResponseTemplate::new(200).set_body_json(body.clone()))
            .expect(1)
            .mount(&server)
            .await;

        let payload = client_for(&server).fetch(1699999000).await.unwrap();
        assert_eq!(payload, body);
    }

    #[tokio::test]
    async fn test_fetch_returns_body_without_schema_checks() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!(["unexpected"])))
            .mount(&server)
            .await;

        let payload = client_for(&server).fetch(0).await.unwrap();
        assert_eq!(payload, json!(["unexpected"]));
    }

    #[tokio::test]
    async fn test_non_200_maps_to_status_code_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        let err = client_for(&server).fetch(0).await.unwrap_err();
        assert!(matches!(err, WatchError::StatusCode(503)));
    }

    #[tokio::test]
    async fn test_other_success_codes_are_still_errors() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(204))
            .mount(&server)
            .await;

        let err = client_for(&server).fetch(0).await.unwrap_err();
        assert!(matches!(err, WatchError::StatusCode(204)));
    }

    #[tokio::test]
    async fn test_connection_failure_maps_to_fetch_error() {
        let client = StatusApiClient::new("http://127.0.0.1:9/homework_statuses/", "secret").unwrap();
        let err = client.fetch(0).await.unwrap_err();
        assert!(matches!(err, WatchError::Fetch(_)));
        assert!(!err.is_fatal());
    }

    #[tokio::test]
    async fn test_undecodable_body_maps_to_fetch_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>maintenance</html>"))
            .mount(&server)
            .await;

        let err = client_for(&server).fetch(0).await.unwrap_err();
        assert!(matches!(err, WatchError::Fetch(_)));
    }
}
