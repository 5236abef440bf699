use config::{Config, ConfigError, Environment, File};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;
use thiserror::Error;
use tracing::{debug, info};

#[derive(Error, Debug)]
pub enum ConfigurationError {
    #[error("Configuration loading error: {0}")]
    ConfigLoad(#[from] ConfigError),
    #[error("Invalid configuration value: {0}")]
    InvalidValue(String),
}

pub type Result<T> = std::result::Result<T, ConfigurationError>;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SystemConfig {
    /// General system settings
    pub system: SystemSettings,

    /// ESPN upstream API configuration
    pub espn: EspnConfig,

    /// API server configuration
    pub api: ApiConfig,

    /// Fan-out behaviour for multi-call entrypoints
    pub orchestrator: OrchestratorConfig,

    /// Upstream response cache
    pub cache: CacheConfig,

    /// League leaders entrypoint settings
    pub leaders: LeadersConfig,

    /// Price per tier in USD
    pub pricing: PricingConfig,

    /// Entity resolver settings
    #[serde(default)]
    pub resolver: ResolverConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SystemSettings {
    /// Enable debug mode
    pub debug_mode: bool,

    /// Emit logs as JSON lines instead of the human readable format
    pub json_logs: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EspnConfig {
    /// Base URL for the site API (scoreboard, teams, rosters, schedules)
    pub site_api_base_url: String,

    /// Base URL for the common v3 web API (athletes, statistics)
    pub web_api_base_url: String,

    /// Base URL for the v2 standings API
    pub standings_base_url: String,

    /// Sport/league path segment appended to every base URL
    pub sport_path: String,

    /// Request timeout in seconds
    pub request_timeout_seconds: u64,

    /// Connect timeout in seconds
    pub connect_timeout_seconds: u64,

    /// User agent sent upstream
    pub user_agent: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// API server host
    pub host: String,

    /// API server port
    pub port: u16,

    /// Upper bound for a single entrypoint invocation; in-flight upstream calls
    /// are cancelled when it elapses
    pub request_timeout_seconds: u64,
}

/// How a multi-call entrypoint reacts to a failed upstream call
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AggregationPolicy {
    /// Any failed call fails the whole request
    FailFast,
    /// Only failed required calls fail the request; optional sections degrade
    BestEffort,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrchestratorConfig {
    pub aggregation_policy: AggregationPolicy,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheConfig {
    /// Enable the single-flight response cache
    pub enabled: bool,

    /// How long a successful upstream payload is served from cache
    pub ttl_seconds: u64,
}

/// How leaderboard ranks relate to the order the upstream returned
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RankingPolicy {
    /// Rank is the 1-based position in the upstream sequence
    Positional,
    /// Positional, but the sequence must be sorted by the requested stat
    Verify,
    /// Re-sort by the requested stat (descending, absent last) and re-rank
    Resort,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LeadersConfig {
    pub ranking_policy: RankingPolicy,

    /// Leaderboard size when the caller does not pass a limit
    pub default_limit: u32,

    /// Largest limit a caller may request
    pub max_limit: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PricingConfig {
    #[serde(with = "rust_decimal::serde::str")]
    pub basic_usd: Decimal,

    #[serde(with = "rust_decimal::serde::str")]
    pub standard_usd: Decimal,

    #[serde(with = "rust_decimal::serde::str")]
    pub premium_usd: Decimal,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ResolverConfig {
    /// Additional team aliases (alias -> canonical team id) merged into the
    /// built-in table at startup
    #[serde(default)]
    pub extra_team_aliases: HashMap<String, u32>,
}

impl Default for SystemConfig {
    fn default() -> Self {
        Self {
            system: SystemSettings {
                debug_mode: false,
                json_logs: false,
            },
            espn: EspnConfig {
                site_api_base_url: "https://site.api.espn.com/apis/site/v2".to_string(),
                web_api_base_url: "https://site.web.api.espn.com/apis/common/v3".to_string(),
                standings_base_url: "https://site.api.espn.com/apis/v2".to_string(),
                sport_path: "sports/basketball/nba".to_string(),
                request_timeout_seconds: 10,
                connect_timeout_seconds: 5,
                user_agent: concat!("courtside/", env!("CARGO_PKG_VERSION")).to_string(),
            },
            api: ApiConfig {
                host: "0.0.0.0".to_string(),
                port: 8080,
                request_timeout_seconds: 30,
            },
            orchestrator: OrchestratorConfig {
                aggregation_policy: AggregationPolicy::FailFast,
            },
            cache: CacheConfig {
                enabled: false, // No cross-request cache unless asked for
                ttl_seconds: 30,
            },
            leaders: LeadersConfig {
                ranking_policy: RankingPolicy::Resort,
                default_limit: 10,
                max_limit: 50,
            },
            pricing: PricingConfig {
                basic_usd: Decimal::new(1, 3),    // $0.001
                standard_usd: Decimal::new(2, 3), // $0.002
                premium_usd: Decimal::new(5, 3),  // $0.005
            },
            resolver: ResolverConfig::default(),
        }
    }
}

impl EspnConfig {
    /// Validate ESPN upstream configuration
    pub fn validate(&self) -> Result<()> {
        for (field, url) in [
            ("espn.site_api_base_url", &self.site_api_base_url),
            ("espn.web_api_base_url", &self.web_api_base_url),
            ("espn.standings_base_url", &self.standings_base_url),
        ] {
            if !(url.starts_with("http://") || url.starts_with("https://")) {
                return Err(ConfigurationError::InvalidValue(format!(
                    "{} must be an http(s) URL, got '{}'",
                    field, url
                )));
            }
        }

        if self.sport_path.trim_matches('/').is_empty() {
            return Err(ConfigurationError::InvalidValue(
                "espn.sport_path cannot be empty".to_string(),
            ));
        }

        if self.request_timeout_seconds == 0 || self.connect_timeout_seconds == 0 {
            return Err(ConfigurationError::InvalidValue(
                "Request timeout must be greater than 0".to_string(),
            ));
        }

        Ok(())
    }
}

impl LeadersConfig {
    pub fn validate(&self) -> Result<()> {
        if self.max_limit == 0 {
            return Err(ConfigurationError::InvalidValue(
                "leaders.max_limit must be at least 1".to_string(),
            ));
        }

        if self.default_limit == 0 || self.default_limit > self.max_limit {
            return Err(ConfigurationError::InvalidValue(format!(
                "leaders.default_limit must be between 1 and {}",
                self.max_limit
            )));
        }

        Ok(())
    }
}

impl PricingConfig {
    pub fn validate(&self) -> Result<()> {
        for (tier, amount) in [
            ("basic", self.basic_usd),
            ("standard", self.standard_usd),
            ("premium", self.premium_usd),
        ] {
            if amount.is_sign_negative() {
                return Err(ConfigurationError::InvalidValue(format!(
                    "pricing.{}_usd cannot be negative",
                    tier
                )));
            }
        }

        Ok(())
    }
}

impl SystemConfig {
    /// Load configuration from file and environment variables
    pub fn load() -> Result<Self> {
        Self::load_from_path("config.toml")
    }

    /// Load configuration from a specific file path
    pub fn load_from_path<P: AsRef<Path>>(config_path: P) -> Result<Self> {
        let mut config_builder = Config::builder()
            // Start with defaults
            .add_source(Config::try_from(&SystemConfig::default())?);

        if config_path.as_ref().exists() {
            info!(
                "Loading configuration from: {}",
                config_path.as_ref().display()
            );
            config_builder = config_builder.add_source(File::from(config_path.as_ref()));
        } else {
            debug!("Config file not found, using defaults and environment variables");
        }

        config_builder = config_builder.add_source(
            Environment::with_prefix("COURTSIDE")
                .try_parsing(true)
                .separator("__")
                .list_separator(","),
        );

        let system_config: SystemConfig = config_builder.build()?.try_deserialize()?;

        system_config.validate()?;

        Ok(system_config)
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<()> {
        self.espn.validate()?;
        self.leaders.validate()?;
        self.pricing.validate()?;

        if self.api.port == 0 {
            return Err(ConfigurationError::InvalidValue(
                "API port cannot be 0".to_string(),
            ));
        }

        if self.api.request_timeout_seconds == 0 {
            return Err(ConfigurationError::InvalidValue(
                "api.request_timeout_seconds must be greater than 0".to_string(),
            ));
        }

        if self.cache.enabled && self.cache.ttl_seconds == 0 {
            return Err(ConfigurationError::InvalidValue(
                "cache.ttl_seconds must be greater than 0 when the cache is enabled".to_string(),
            ));
        }

        Ok(())
    }
}
