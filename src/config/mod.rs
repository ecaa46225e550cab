//! Configuration module for site-corpus
//!
//! This module handles loading, parsing, and validating TOML configuration files.
//!
//! # Example
//!
//! ```no_run
//! use site_corpus::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("config.toml")).unwrap();
//! println!("Crawler will visit at most {} pages", config.crawler.page_budget);
//! ```

mod parser;
mod types;
mod validation;

pub use types::{
    BoilerplatePattern, Config, CrawlerConfig, NormalizerConfig, OutputConfig, UserAgentConfig,
};

pub use parser::{compute_config_hash, load_config, load_config_with_hash, parse_config};
pub use validation::{validate, MAX_DELAY_MS, MAX_WORKERS};
