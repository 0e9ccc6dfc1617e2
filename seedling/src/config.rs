//! Engine configuration and per-call generation overrides.

use thiserror::Error;

use crate::context::Cache;

/// Configuration validation errors
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    /// The default locale must be a non-empty code
    #[error("Invalid default locale (must be non-empty)")]
    EmptyLocale,
    /// Uniqueness attempt factor must be > 0
    #[error("Invalid unique attempt factor: {0} (must be > 0)")]
    InvalidAttemptFactor(usize),
    /// Filter attempts must be > 0
    #[error("Invalid filter attempts: {0} (must be > 0)")]
    InvalidFilterAttempts(usize),
}

/// Engine-wide defaults applied when a call does not override them
#[derive(Debug, Clone, PartialEq)]
pub struct EngineConfig {
    /// Retry budget used by `Schema::filter` when none is given
    pub default_retries: usize,
    /// Locale used when a call does not name one
    pub default_locale: String,
    /// Seed used when a call does not supply one; `None` means entropy
    pub default_seed: Option<u64>,
    /// Composites try at most `len * factor` draws when collecting distinct values
    pub unique_attempt_factor: usize,
    /// Maximum redraws for value filters such as excluded characters or weekdays
    pub filter_attempts: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            default_retries: 10,
            default_locale: "en".to_string(),
            default_seed: None,
            unique_attempt_factor: 10,
            filter_attempts: 100,
        }
    }
}

impl EngineConfig {
    /// Create a new engine configuration with validation
    pub fn new(
        default_retries: usize,
        default_locale: impl Into<String>,
        default_seed: Option<u64>,
        unique_attempt_factor: usize,
        filter_attempts: usize,
    ) -> Result<Self, ConfigError> {
        let config = Self {
            default_retries,
            default_locale: default_locale.into(),
            default_seed,
            unique_attempt_factor,
            filter_attempts,
        };
        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.default_locale.trim().is_empty() {
            return Err(ConfigError::EmptyLocale);
        }
        if self.unique_attempt_factor == 0 {
            return Err(ConfigError::InvalidAttemptFactor(self.unique_attempt_factor));
        }
        if self.filter_attempts == 0 {
            return Err(ConfigError::InvalidFilterAttempts(self.filter_attempts));
        }
        Ok(())
    }
}

/// Per-call overrides for a root `generate`/`generate_many` call
#[derive(Debug, Default)]
pub struct GenerateOptions<'c> {
    /// Seed for the run; determinism holds only when this (or a global default) is set
    pub seed: Option<u64>,
    /// Locale code for the run
    pub locale: Option<String>,
    /// Cache to use instead of a fresh one, shared with the caller
    pub cache: Option<&'c mut Cache>,
    /// Path prefix for the root node
    pub path: Option<String>,
    /// Key of the root node; also used as the path when no path is given
    pub key: Option<String>,
}

impl<'c> GenerateOptions<'c> {
    /// Options with only a seed set
    pub fn seeded(seed: u64) -> Self {
        Self {
            seed: Some(seed),
            ..Self::default()
        }
    }

    /// Set the seed
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Set the locale
    pub fn with_locale(mut self, locale: impl Into<String>) -> Self {
        self.locale = Some(locale.into());
        self
    }

    /// Share an existing cache with the run
    pub fn with_cache(mut self, cache: &'c mut Cache) -> Self {
        self.cache = Some(cache);
        self
    }

    /// Set the root path
    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.path = Some(path.into());
        self
    }

    /// Set the root key
    pub fn with_key(mut self, key: impl Into<String>) -> Self {
        self.key = Some(key.into());
        self
    }
}

/// Holder for the engine configuration of the current thread
#[derive(Debug, Default)]
pub struct ConfigManager {
    config: EngineConfig,
}

impl ConfigManager {
    /// Create a manager with default configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a manager with a validated configuration
    pub fn with_config(config: EngineConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self { config })
    }

    /// Current configuration
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Replace the configuration after validating it
    pub fn set_config(&mut self, config: EngineConfig) -> Result<(), ConfigError> {
        config.validate()?;
        self.config = config;
        Ok(())
    }
}

thread_local! {
    static CONFIG_MANAGER: std::cell::RefCell<ConfigManager> = std::cell::RefCell::new(ConfigManager::new());
}

/// Engine configuration for the current thread
pub fn get_global_config() -> EngineConfig {
    CONFIG_MANAGER.with(|manager| manager.borrow().config().clone())
}

/// Replace the engine configuration for the current thread
pub fn set_global_config(config: EngineConfig) -> Result<(), ConfigError> {
    CONFIG_MANAGER.with(|manager| manager.borrow_mut().set_config(config))
}

/// Restore the default engine configuration for the current thread
pub fn reset_global_config() {
    CONFIG_MANAGER.with(|manager| *manager.borrow_mut() = ConfigManager::new());
}
