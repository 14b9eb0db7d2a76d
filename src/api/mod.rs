pub mod nft;
pub mod rugcheck;

pub use nft::NftClient;
pub use rugcheck::RugcheckClient;
