use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Partial metadata record from the NFT/metadata service. Any field may be missing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NftMetadata {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub symbol: Option<String>,
    #[serde(default)]
    pub image_uri: Option<String>,
    #[serde(default)]
    pub decimals: Option<u8>,
}

/// Metadata keyed by mint. Mints whose lookup yielded nothing are simply absent.
pub type EnrichmentMap = HashMap<String, NftMetadata>;
