//! Read-only projection of the current query state.
//!
//! The view is rebuilt from [`ScanState`] on every read and never mutated.
//! Display fields drawn from more than one source go through the `resolve_*`
//! functions, each of which walks its sources in a fixed order.

use serde::Serialize;

use super::formatter::{
    format_change_arrow, format_count, format_number, format_pct, format_price,
    format_signed_pct, shorten_address,
};
use super::state::{Phase, ScanState};
use crate::models::report::parse_timestamp;
use crate::models::{CreatorToken, HolderEntry, NftMetadata, RiskFinding, RiskLevel, TokenReport};

pub const UNKNOWN_NAME: &str = "Unknown Token";
pub const UNKNOWN_SYMBOL: &str = "???";
const UNKNOWN: &str = "Unknown";

#[derive(Debug, Clone, Copy)]
pub struct ViewOptions {
    /// How many creator tokens to project
    pub creator_tokens_preview: usize,
}

impl Default for ViewOptions {
    fn default() -> Self {
        Self {
            creator_tokens_preview: 6,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ViewModel {
    pub phase: Phase,
    pub mint: Option<String>,
    pub error: Option<String>,
    pub metadata_pending: bool,
    pub creator_tokens_pending: bool,
    pub token: Option<TokenView>,
}

#[derive(Debug, Clone, Serialize)]
pub struct TokenView {
    pub mint: String,
    pub short_mint: String,
    pub name: String,
    pub symbol: String,
    pub image: Option<String>,
    pub avatar_initial: String,
    pub decimals: u8,

    pub supply: String,
    pub price: String,
    pub total_liquidity: String,
    pub market_cap: String,
    pub holders: String,
    pub lp_providers: String,
    pub volume_24h: String,
    pub tx_count_24h: String,
    pub price_change_24h: String,
    pub volume_change_24h: String,

    pub risk_badge: Option<RiskBadge>,
    pub risks: Vec<RiskView>,
    pub top_holders: Vec<HolderView>,

    pub creator: String,
    pub created_at: String,
    pub creator_tokens: Vec<CreatorTokenView>,
    /// Creator tokens beyond the preview
    pub more_creator_tokens: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct RiskBadge {
    pub level: RiskLevel,
    pub label: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct RiskView {
    pub name: String,
    pub description: String,
    pub level: RiskLevel,
    pub severity: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct HolderView {
    pub rank: usize,
    pub address: String,
    pub short_address: String,
    pub label: Option<String>,
    pub amount: String,
    pub share: String,
    /// Share clamped to 0..=100 for bar rendering
    pub bar_width: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct CreatorTokenView {
    pub mint: String,
    pub short_mint: String,
    pub name: String,
    pub symbol: String,
    pub image: Option<String>,
    pub avatar_initial: String,
    pub market_cap: String,
    pub created: String,
    pub enriched: bool,
}

fn first_present<'a>(candidates: impl IntoIterator<Item = Option<&'a str>>) -> Option<&'a str> {
    candidates
        .into_iter()
        .flatten()
        .find(|value| !value.trim().is_empty())
}

pub fn resolve_name(metadata: Option<&NftMetadata>, report: &TokenReport) -> String {
    first_present([
        metadata.and_then(|m| m.name.as_deref()),
        report.token_meta.as_ref().and_then(|m| m.name.as_deref()),
    ])
    .unwrap_or(UNKNOWN_NAME)
    .to_string()
}

pub fn resolve_symbol(metadata: Option<&NftMetadata>, report: &TokenReport) -> String {
    first_present([
        metadata.and_then(|m| m.symbol.as_deref()),
        report.token_meta.as_ref().and_then(|m| m.symbol.as_deref()),
    ])
    .unwrap_or(UNKNOWN_SYMBOL)
    .to_string()
}

pub fn resolve_image(metadata: Option<&NftMetadata>, report: &TokenReport) -> Option<String> {
    first_present([
        metadata.and_then(|m| m.image_uri.as_deref()),
        report.file_meta.as_ref().and_then(|f| f.image.as_deref()),
    ])
    .map(str::to_string)
}

/// Report decimals win over enrichment decimals.
pub fn resolve_decimals(metadata: Option<&NftMetadata>, report: &TokenReport) -> u8 {
    report
        .primary_decimals()
        .or_else(|| metadata.and_then(|m| m.decimals))
        .unwrap_or(0)
}

/// Name and symbol for a creator token: enrichment, then its own record.
pub fn resolve_creator_token(token: &CreatorToken, metadata: Option<&NftMetadata>) -> (String, String) {
    let name = first_present([
        metadata.and_then(|m| m.name.as_deref()),
        token.name.as_deref(),
    ])
    .unwrap_or(UNKNOWN_NAME);
    let symbol = first_present([
        metadata.and_then(|m| m.symbol.as_deref()),
        token.symbol.as_deref(),
    ])
    .unwrap_or("");
    (name.to_string(), symbol.to_string())
}

fn avatar_initial(symbol: &str) -> String {
    symbol
        .chars()
        .next()
        .map(|c| c.to_uppercase().collect())
        .unwrap_or_else(|| "?".to_string())
}

fn scaled_supply(report: &TokenReport, decimals: u8) -> Option<f64> {
    let raw = report.token.as_ref().and_then(|t| t.supply)?;
    Some(raw as f64 / 10f64.powi(decimals as i32))
}

fn format_date(raw: Option<&str>, pattern: &str) -> String {
    match raw {
        Some(raw) => parse_timestamp(raw)
            .map(|ts| ts.format(pattern).to_string())
            .unwrap_or_else(|| raw.to_string()),
        None => UNKNOWN.to_string(),
    }
}

fn risk_view(finding: &RiskFinding) -> RiskView {
    RiskView {
        name: finding.name.clone(),
        description: finding.description.clone(),
        level: finding.level,
        severity: finding.level.label().to_string(),
    }
}

fn holder_view(rank: usize, holder: &HolderEntry, report: &TokenReport) -> HolderView {
    HolderView {
        rank,
        address: holder.address.clone(),
        short_address: shorten_address(&holder.address),
        label: report.holder_label(holder).map(|l| l.name.clone()),
        amount: format_number(holder.ui_amount),
        share: format_pct(holder.pct),
        bar_width: holder.pct.unwrap_or(0.0).clamp(0.0, 100.0),
    }
}

fn creator_token_view(token: &CreatorToken, metadata: Option<&NftMetadata>) -> CreatorTokenView {
    let (name, symbol) = resolve_creator_token(token, metadata);
    CreatorTokenView {
        mint: token.mint.clone(),
        short_mint: shorten_address(&token.mint),
        avatar_initial: avatar_initial(&symbol),
        name,
        symbol,
        image: metadata.and_then(|m| m.image_uri.clone()),
        market_cap: format_number(token.market_cap),
        created: format_date(token.created_at.as_deref(), "%Y-%m-%d"),
        enriched: metadata.is_some(),
    }
}

fn token_view(state: &ScanState, report: &TokenReport, options: &ViewOptions) -> TokenView {
    let metadata = state.metadata.as_ref();
    let symbol = resolve_symbol(metadata, report);
    let decimals = resolve_decimals(metadata, report);

    let preview = options.creator_tokens_preview;
    let creator_tokens = report
        .creator_tokens
        .iter()
        .take(preview)
        .map(|t| creator_token_view(t, state.creator_metadata.get(&t.mint)))
        .collect();

    TokenView {
        mint: report.mint.clone(),
        short_mint: shorten_address(&report.mint),
        name: resolve_name(metadata, report),
        image: resolve_image(metadata, report),
        avatar_initial: avatar_initial(&symbol),
        symbol,
        decimals,

        supply: format_number(scaled_supply(report, decimals)),
        price: format_price(report.price),
        total_liquidity: format_number(report.total_market_liquidity),
        market_cap: format_number(report.market_cap),
        holders: format_count(report.total_holders),
        lp_providers: format_count(report.total_lp_providers),
        volume_24h: format_number(report.volume_24h),
        tx_count_24h: format_count(report.tx_count_24h),
        price_change_24h: format_signed_pct(report.price_change_24h),
        volume_change_24h: format_change_arrow(report.volume_change_24h),

        risk_badge: report.risks.first().map(|r| RiskBadge {
            level: r.level,
            label: r.level.label().to_string(),
        }),
        risks: report.risks.iter().map(risk_view).collect(),
        top_holders: report
            .top_holders
            .iter()
            .enumerate()
            .map(|(i, h)| holder_view(i + 1, h, report))
            .collect(),

        creator: report.creator.clone().unwrap_or_else(|| UNKNOWN.to_string()),
        created_at: format_date(report.created_at.as_deref(), "%Y-%m-%d %H:%M:%S UTC"),
        creator_tokens,
        more_creator_tokens: report.creator_tokens.len().saturating_sub(preview),
    }
}

pub fn build_view(state: &ScanState, options: &ViewOptions) -> ViewModel {
    ViewModel {
        phase: state.phase,
        mint: state.current().map(|t| t.mint.clone()),
        error: state.error.clone(),
        metadata_pending: state.metadata_pending,
        creator_tokens_pending: state.creator_tokens_pending,
        token: state
            .report
            .as_ref()
            .map(|report| token_view(state, report, options)),
    }
}
