//! Aggregate count sources.
//!
//! The coordinator talks to an [`AggregateSource`]; the production source is
//! the HTTP comparison endpoint.

use crate::models::AggregateCounts;
use crate::week::WeekWindow;
use async_trait::async_trait;
use reqwest::Url;
use tracing::{debug, info};

/// Default path of the weekly comparison endpoint.
pub const DEFAULT_ENDPOINT: &str = "/api/weekly-comparison";

/// Ways a fetch can fail.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FetchError {
    /// The request could not be sent or no response arrived.
    #[error("Request failed: {0}")]
    Transport(String),
    /// The server answered with a non-success status.
    #[error("Comparison API error {status}: {body}")]
    Response { status: u16, body: String },
    /// The body was not a valid comparison payload.
    #[error("Failed to parse comparison response: {0}")]
    Parse(String),
}

/// Something that can produce aggregate counts for a week window.
#[async_trait]
pub trait AggregateSource: Send + Sync {
    /// Fetch the counts for `window`. Issues exactly one read request.
    async fn fetch_counts(&self, window: &WeekWindow) -> Result<AggregateCounts, FetchError>;
}

/// Reads aggregate counts from the HTTP comparison endpoint.
pub struct HttpAggregateSource {
    url: Url,
    http_client: reqwest::Client,
}

impl HttpAggregateSource {
    /// Create a source for `{base_url}{endpoint}`.
    pub fn new(base_url: &str, endpoint: &str) -> Result<Self, FetchError> {
        let joined = format!("{}{}", base_url.trim_end_matches('/'), endpoint);
        let url = Url::parse(&joined)
            .map_err(|e| FetchError::Transport(format!("Invalid endpoint URL {}: {}", joined, e)))?;

        let http_client = reqwest::Client::builder()
            .build()
            .map_err(|e| FetchError::Transport(format!("Failed to create HTTP client: {}", e)))?;

        info!("Using comparison endpoint: {}", url);

        Ok(Self { url, http_client })
    }

    /// Full request URL for `window`, with `start_date` and `end_date` query parameters.
    pub fn endpoint_url(&self, window: &WeekWindow) -> Url {
        let mut url = self.url.clone();
        url.query_pairs_mut()
            .append_pair("start_date", &window.start_param())
            .append_pair("end_date", &window.end_param());
        url
    }
}

#[async_trait]
impl AggregateSource for HttpAggregateSource {
    async fn fetch_counts(&self, window: &WeekWindow) -> Result<AggregateCounts, FetchError> {
        let url = self.endpoint_url(window);
        debug!("GET {}", url);

        let response = self.http_client.get(url).send().await.map_err(|e| {
            if e.is_connect() {
                FetchError::Transport(format!("Cannot connect to {}", self.url))
            } else {
                FetchError::Transport(e.to_string())
            }
        })?;

        let status = response.status();
        debug!("Comparison endpoint answered {}", status);

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(FetchError::Response {
                status: status.as_u16(),
                body,
            });
        }

        let body = response
            .text()
            .await
            .map_err(|e| FetchError::Transport(format!("Failed to read response body: {}", e)))?;

        serde_json::from_str(&body).map_err(|e| FetchError::Parse(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::week::window::next_week;
    use chrono::NaiveDate;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    fn window() -> WeekWindow {
        next_week(NaiveDate::from_ymd_opt(2025, 9, 3).unwrap())
    }

    /// Serve one canned HTTP response on a local port and return the base URL.
    /// The join handle yields the request line the server received.
    async fn serve_once(status: &str, body: &str) -> (String, tokio::task::JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let base_url = format!("http://{}", listener.local_addr().unwrap());
        let response = format!(
            "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
            status,
            body.len(),
            body
        );

        let handle = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut request = Vec::new();
            let mut buf = [0u8; 1024];
            while !request.windows(4).any(|w| w == b"\r\n\r\n") {
                let n = socket.read(&mut buf).await.unwrap();
                if n == 0 {
                    break;
                }
                request.extend_from_slice(&buf[..n]);
            }
            socket.write_all(response.as_bytes()).await.unwrap();
            socket.shutdown().await.unwrap();

            let request = String::from_utf8_lossy(&request).to_string();
            request.lines().next().unwrap_or_default().to_string()
        });

        (base_url, handle)
    }

    #[test]
    fn test_endpoint_url_carries_window() {
        let source = HttpAggregateSource::new("http://localhost:5000/", DEFAULT_ENDPOINT).unwrap();
        let url = source.endpoint_url(&window());

        assert_eq!(
            url.as_str(),
            "http://localhost:5000/api/weekly-comparison?start_date=2025-09-08&end_date=2025-09-14"
        );
    }

    #[test]
    fn test_endpoint_keeps_base_path() {
        let source = HttpAggregateSource::new("https://ops.example.com/dash", DEFAULT_ENDPOINT).unwrap();
        let url = source.endpoint_url(&window());
        assert_eq!(url.path(), "/dash/api/weekly-comparison");
    }

    #[test]
    fn test_invalid_base_url() {
        let result = HttpAggregateSource::new("not a url", DEFAULT_ENDPOINT);
        assert!(matches!(result, Err(FetchError::Transport(_))));
    }

    #[test]
    fn test_error_messages() {
        let err = FetchError::Response {
            status: 500,
            body: "boom".to_string(),
        };
        assert_eq!(err.to_string(), "Comparison API error 500: boom");
        assert!(FetchError::Parse("eof".to_string())
            .to_string()
            .contains("parse"));
    }

    #[tokio::test]
    async fn test_unreachable_endpoint_is_transport_failure() {
        let source = HttpAggregateSource::new("http://127.0.0.1:9", DEFAULT_ENDPOINT).unwrap();
        let result = source.fetch_counts(&window()).await;
        // A proxy in the environment may answer with a gateway error instead.
        assert!(matches!(
            result,
            Err(FetchError::Transport(_)) | Err(FetchError::Response { .. })
        ));
    }

    #[tokio::test]
    async fn test_server_error_is_response_failure() {
        let (base_url, server) = serve_once("500 Internal Server Error", "boom").await;
        let source = HttpAggregateSource::new(&base_url, DEFAULT_ENDPOINT).unwrap();

        let result = source.fetch_counts(&window()).await;
        assert_eq!(
            result,
            Err(FetchError::Response {
                status: 500,
                body: "boom".to_string()
            })
        );
        server.await.unwrap();
    }

    #[tokio::test]
    async fn test_malformed_body_is_parse_failure() {
        let (base_url, server) = serve_once("200 OK", "{bad}").await;
        let source = HttpAggregateSource::new(&base_url, DEFAULT_ENDPOINT).unwrap();

        let result = source.fetch_counts(&window()).await;
        assert!(matches!(result, Err(FetchError::Parse(_))));
        server.await.unwrap();
    }

    #[tokio::test]
    async fn test_valid_body_is_parsed() {
        let body = r#"{
            "week_range": {"start_date": "2025-09-08", "end_date": "2025-09-14"},
            "summary": {"total_booked": 10, "total_form_submissions": 10},
            "by_brand": {"A": {"booked": 2, "form_submissions": 2}}
        }"#;
        let (base_url, server) = serve_once("200 OK", body).await;
        let source = HttpAggregateSource::new(&base_url, DEFAULT_ENDPOINT).unwrap();

        let counts = source.fetch_counts(&window()).await.unwrap();
        assert_eq!(counts.summary.total_booked, 10);
        assert_eq!(counts.by_brand["A"].form_submissions, 2);

        let request_line = server.await.unwrap();
        assert!(request_line.starts_with(
            "GET /api/weekly-comparison?start_date=2025-09-08&end_date=2025-09-14 "
        ));
    }
}
