//! Compilation of configured boilerplate patterns

use crate::config::BoilerplatePattern;
use crate::ConfigError;
use regex::Regex;

impl BoilerplatePattern {
    /// The pattern text as written in the configuration
    pub fn source(&self) -> &str {
        match self {
            Self::Literal(s) | Self::Regex(s) => s,
        }
    }

    /// Compiles the pattern; literals are escaped first
    ///
    /// # Returns
    ///
    /// * `Ok(Regex)` - The compiled pattern
    /// * `Err(ConfigError::InvalidPattern)` - Empty pattern or invalid regex
    pub fn compile(&self) -> Result<Regex, ConfigError> {
        if self.source().is_empty() {
            return Err(ConfigError::InvalidPattern(
                "boilerplate pattern must not be empty".to_string(),
            ));
        }

        let expression = match self {
            Self::Literal(s) => regex::escape(s),
            Self::Regex(s) => s.clone(),
        };

        Regex::new(&expression)
            .map_err(|e| ConfigError::InvalidPattern(format!("'{}': {}", self.source(), e)))
    }
}

/// Compiles an ordered pattern list, stopping at the first invalid entry
pub fn compile_patterns(patterns: &[BoilerplatePattern]) -> Result<Vec<Regex>, ConfigError> {
    patterns.iter().map(BoilerplatePattern::compile).collect()
}
