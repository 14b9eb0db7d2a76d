pub mod nft;
pub mod report;

// Re-export commonly used types
pub use nft::{EnrichmentMap, NftMetadata};
pub use report::{
    CreatorToken, FileMeta, HolderEntry, KnownAccountLabel, RiskFinding, RiskLevel, TokenInfo,
    TokenMeta, TokenReport,
};
