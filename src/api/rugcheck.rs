use anyhow::{Context, Result};
use reqwest::Client;
use std::time::Duration;
use tracing::{debug, warn};

use crate::error::ScanError;
use crate::models::TokenReport;

/// Client for the token risk-report service (`GET {base}/tokens/{mint}/report`).
#[derive(Debug, Clone)]
pub struct RugcheckClient {
    base_url: String,
    client: Client,
}

impl RugcheckClient {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client: Client::builder()
                .timeout(timeout)
                .build()
                .context("Failed to create HTTP client for the report service")?,
        })
    }

    /// Fetches the report for `mint`. A single attempt, no retries.
    pub async fn fetch_report(&self, mint: &str) -> Result<TokenReport, ScanError> {
        let url = format!("{}/tokens/{}/report", self.base_url, mint);
        debug!("Fetching token report for {}: {}", mint, url);

        let response = self.client.get(&url).send().await.map_err(|e| {
            warn!("Report request for {} failed: {}", mint, e);
            ScanError::NetworkError(e.to_string())
        })?;

        let status = response.status();
        if !status.is_success() {
            warn!("Report service error for token {}: {}", mint, status);
            return Err(ScanError::RemoteError {
                status: status.as_u16(),
            });
        }

        response.json::<TokenReport>().await.map_err(|e| {
            warn!("Failed to parse report for {}: {:?}", mint, e);
            ScanError::DecodeError(e.to_string())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client_for(url: &str) -> RugcheckClient {
        RugcheckClient::new(url, Duration::from_secs(5)).unwrap()
    }

    #[tokio::test]
    async fn test_fetch_report_success() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/tokens/ABC/report")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"mint": "ABC", "tokenMeta": {"name": "Test"}, "totalHolders": 42}"#)
            .expect(1)
            .create_async()
            .await;

        let report = client_for(&server.url()).fetch_report("ABC").await.unwrap();
        assert_eq!(report.mint, "ABC");
        assert_eq!(report.total_holders, Some(42));
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_fetch_report_non_success_status() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/tokens/ABC/report")
            .with_status(500)
            .create_async()
            .await;

        let err = client_for(&server.url()).fetch_report("ABC").await.unwrap_err();
        assert_eq!(err, ScanError::RemoteError { status: 500 });
    }

    #[tokio::test]
    async fn test_fetch_report_unreadable_body() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/tokens/ABC/report")
            .with_status(200)
            .with_body("<html>maintenance</html>")
            .create_async()
            .await;

        let err = client_for(&server.url()).fetch_report("ABC").await.unwrap_err();
        assert!(matches!(err, ScanError::DecodeError(_)));
    }

    #[tokio::test]
    async fn test_fetch_report_transport_failure() {
        // Nothing listens on port 1.
        let err = client_for("http://127.0.0.1:1").fetch_report("ABC").await.unwrap_err();
        assert!(matches!(err, ScanError::NetworkError(_)));
    }

    #[test]
    fn test_trailing_slash_is_trimmed() {
        let client = client_for("http://localhost:8080/v1/");
        assert_eq!(client.base_url, "http://localhost:8080/v1");
    }
}
