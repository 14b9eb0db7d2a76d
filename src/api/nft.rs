use anyhow::{Context, Result};
use reqwest::Client;
use std::time::Duration;
use tracing::debug;

use crate::models::NftMetadata;

/// Best-effort client for the NFT/metadata service (`GET {base}/nfts/{mint}`).
///
/// Lookups never fail: a non-success status, a transport error or an
/// unreadable body all mean "no metadata available".
#[derive(Debug, Clone)]
pub struct NftClient {
    base_url: String,
    client: Client,
}

impl NftClient {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client: Client::builder()
                .timeout(timeout)
                .build()
                .context("Failed to create HTTP client for the metadata service")?,
        })
    }

    pub async fn fetch_metadata(&self, mint: &str) -> Option<NftMetadata> {
        let url = format!("{}/nfts/{}", self.base_url, mint);

        let response = match self.client.get(&url).send().await {
            Ok(response) => response,
            Err(e) => {
                debug!("NFT data not available for {}: {}", mint, e);
                return None;
            }
        };

        if !response.status().is_success() {
            debug!("NFT data not available for {}: status {}", mint, response.status());
            return None;
        }

        match response.json::<NftMetadata>().await {
            Ok(meta) => Some(meta),
            Err(e) => {
                debug!("Ignoring unreadable NFT data for {}: {:?}", mint, e);
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client_for(url: &str) -> NftClient {
        NftClient::new(url, Duration::from_secs(5)).unwrap()
    }

    #[tokio::test]
    async fn test_fetch_metadata_success() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/nfts/ABC")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"name": "Foo", "symbol": "FOO", "imageUri": "https://cdn/foo.png"}"#)
            .create_async()
            .await;

        let meta = client_for(&server.url()).fetch_metadata("ABC").await.unwrap();
        assert_eq!(meta.name.as_deref(), Some("Foo"));
        assert_eq!(meta.symbol.as_deref(), Some("FOO"));
    }

    #[tokio::test]
    async fn test_fetch_metadata_not_found_is_absent() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server.mock("GET", "/nfts/ABC").with_status(404).create_async().await;

        assert!(client_for(&server.url()).fetch_metadata("ABC").await.is_none());
    }

    #[tokio::test]
    async fn test_fetch_metadata_transport_failure_is_absent() {
        assert!(client_for("http://127.0.0.1:1").fetch_metadata("ABC").await.is_none());
    }
}
