//! Page-Lens: a single-page web analyzer
//!
//! This crate fetches one web page, parses it into an immutable document tree
//! and runs a set of independent analysis strategies against it in parallel:
//! markup version, title, heading histogram, link reachability and login form
//! detection. The analyzer can be used as a library, from the command line or
//! behind the HTTP service in [`server`].

pub mod analyzer;
pub mod config;
pub mod document;
pub mod output;
pub mod server;

use thiserror::Error;

/// Main error type for Page-Lens operations
#[derive(Debug, Error)]
pub enum AnalyzerError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("Request timeout for {url}")]
    Timeout { url: String },

    #[error("URL is unreachable: {url} ({message})")]
    Unreachable { url: String, message: String },

    #[error("Upstream HTTP error for {url}: status {status}")]
    Upstream { url: String, status: u16 },

    #[error("HTML parse error: {0}")]
    HtmlParse(String),

    #[error("Strategy '{strategy}' failed: {source}")]
    Strategy {
        strategy: String,
        source: Box<AnalyzerError>,
    },

    #[error("Analysis cancelled")]
    Cancelled,

    #[error("Strategy task failed to complete: {0}")]
    Join(#[from] tokio::task::JoinError),

    #[error("HTTP client error: {0}")]
    Client(#[from] reqwest::Error),

    #[error("Server error: {0}")]
    Server(#[from] std::io::Error),
}

impl AnalyzerError {
    /// Returns true if the error was caused by the caller's input rather
    /// than by the target page or the network
    pub fn is_client_error(&self) -> bool {
        match self {
            Self::InvalidUrl(_) | Self::Config(_) => true,
            Self::Strategy { source, .. } => source.is_client_error(),
            _ => false,
        }
    }
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),
}

/// Result type alias for Page-Lens operations
pub type Result<T> = std::result::Result<T, AnalyzerError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

// Re-export commonly used types
pub use analyzer::{analyze_page, AnalyzeResult, HeadingCount, LinkStats};
pub use config::Config;
pub use document::Document;
