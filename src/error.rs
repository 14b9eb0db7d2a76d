use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScanError {
    #[error("Empty token identifier")]
    EmptyInput,

    #[error("Network error: {0}")]
    NetworkError(String),

    #[error("Remote error: status {status}")]
    RemoteError { status: u16 },

    #[error("Decode error: {0}")]
    DecodeError(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

impl ScanError {
    /// Message shown to the user when a query ends in the error state.
    pub fn user_message(&self) -> String {
        match self {
            ScanError::EmptyInput => "Enter a token mint address".to_string(),
            ScanError::NetworkError(_) => "Failed to fetch token data".to_string(),
            ScanError::RemoteError { status } => {
                format!("Report service responded with status {}", status)
            }
            ScanError::DecodeError(_) => "Report service returned an unreadable report".to_string(),
            ScanError::ConfigError(detail) => format!("Misconfigured scanner: {}", detail),
        }
    }
}
