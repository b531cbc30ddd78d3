//! Configuration module for Page-Lens
//!
//! This module handles loading, parsing, and validating TOML configuration files.
//! Every section is optional; missing values fall back to the defaults used by
//! [`Config::default`].
//!
//! # Example
//!
//! ```no_run
//! use page_lens::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("page-lens.toml")).unwrap();
//! println!("Probe workers: {}", config.prober.max_workers);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{AnalysisConfig, Config, FetcherConfig, ProberConfig, ServerConfig};

// Re-export parser functions
pub use parser::{load_config, parse_config};
pub use validation::validate;
