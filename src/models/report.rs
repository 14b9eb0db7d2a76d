//! Risk report payload returned by the report service for a single mint.
//!
//! Every field except the mint is optional on the wire. Lists and maps read a
//! missing key or an explicit `null` as empty, so a sparse report still parses.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::HashMap;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenReport {
    pub mint: String,
    #[serde(default)]
    pub token_meta: Option<TokenMeta>,
    #[serde(default)]
    pub token: Option<TokenInfo>,
    #[serde(default)]
    pub file_meta: Option<FileMeta>,

    // Market data
    #[serde(default)]
    pub price: Option<f64>,
    #[serde(default)]
    pub total_market_liquidity: Option<f64>,
    #[serde(default)]
    pub market_cap: Option<f64>,
    #[serde(default, rename = "volume24h")]
    pub volume_24h: Option<f64>,
    #[serde(default, rename = "txCount24h")]
    pub tx_count_24h: Option<u64>,
    #[serde(default)]
    pub volume_change_24h: Option<f64>,
    #[serde(default)]
    pub price_change_24h: Option<f64>,
    #[serde(default)]
    pub total_holders: Option<u64>,
    #[serde(default, rename = "totalLPProviders")]
    pub total_lp_providers: Option<u64>,

    #[serde(default, deserialize_with = "null_as_default")]
    pub risks: Vec<RiskFinding>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub top_holders: Vec<HolderEntry>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub known_accounts: HashMap<String, KnownAccountLabel>,

    #[serde(default)]
    pub creator: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub creator_tokens: Vec<CreatorToken>,
    #[serde(default)]
    pub created_at: Option<String>,
}

/// On-chain metadata embedded in the report
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenMeta {
    pub name: Option<String>,
    pub symbol: Option<String>,
    pub decimals: Option<u8>,
}

/// Mint account state
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenInfo {
    pub supply: Option<u64>,
    pub decimals: Option<u8>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FileMeta {
    pub image: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RiskFinding {
    pub name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub description: String,
    #[serde(default)]
    pub level: RiskLevel,
}

/// Severity tag as reported by the provider. Unrecognised tags read as `Info`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskLevel {
    Danger,
    Warning,
    #[default]
    #[serde(other)]
    Info,
}

impl RiskLevel {
    pub fn label(&self) -> &'static str {
        match self {
            RiskLevel::Danger => "High Risk",
            RiskLevel::Warning => "Medium Risk",
            RiskLevel::Info => "Low Risk",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HolderEntry {
    pub address: String,
    #[serde(default)]
    pub ui_amount: Option<f64>,
    #[serde(default)]
    pub pct: Option<f64>,
    /// Wallet owning the token account, when `address` is a token account
    #[serde(default)]
    pub owner: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KnownAccountLabel {
    pub name: String,
    #[serde(default, rename = "type")]
    pub kind: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatorToken {
    pub mint: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub symbol: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub market_cap: Option<f64>,
}

/// Reads `null` the same as a missing key.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

impl TokenReport {
    /// Decimals according to the report itself: mint account first, embedded metadata second.
    pub fn primary_decimals(&self) -> Option<u8> {
        self.token
            .as_ref()
            .and_then(|t| t.decimals)
            .or_else(|| self.token_meta.as_ref().and_then(|m| m.decimals))
    }

    pub fn creator_mints(&self) -> Vec<String> {
        self.creator_tokens.iter().map(|t| t.mint.clone()).collect()
    }

    pub fn known_label(&self, address: &str) -> Option<&KnownAccountLabel> {
        self.known_accounts.get(address)
    }

    /// Label for a holder row: its own address first, then the owning wallet.
    pub fn holder_label(&self, holder: &HolderEntry) -> Option<&KnownAccountLabel> {
        self.known_label(&holder.address)
            .or_else(|| holder.owner.as_deref().and_then(|o| self.known_label(o)))
    }
}

/// Parses an RFC 3339 timestamp as sent by the report service.
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}
