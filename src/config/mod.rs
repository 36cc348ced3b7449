//! Configuration loading for the storefront client.
//!
//! Loads layered `.env` files and environment variables prefixed with
//! `STOREFRONT_`, producing a typed [`AppConfig`].

use std::{collections::BTreeMap, env, path::PathBuf, time::Duration};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use url::Url;
use zeroize::Zeroizing;

use crate::paging::CollectionKeys;

const ENV_PREFIX: &str = "STOREFRONT_";

/// Application configuration derived from `STOREFRONT_*` environment variables.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub struct AppConfig {
    #[serde(default = "default_profile")]
    pub profile: String,
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_token: Option<String>,
    #[serde(default = "default_log_level")]
    pub log_level: String,
    #[serde(default = "default_log_format")]
    pub log_format: String,
    #[serde(default = "default_page_size")]
    pub page_size: u32,
    #[serde(default = "default_request_timeout_ms")]
    pub request_timeout_ms: u64,
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
    #[serde(default)]
    pub collection_keys: CollectionKeysConfig,
}

/// Candidate list field names per entity, in precedence order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub struct CollectionKeysConfig {
    /// Environment variable: `STOREFRONT_COLLECTION_KEYS_ORDERS`
    #[serde(default = "default_order_keys")]
    pub orders: CollectionKeys,
    /// Environment variable: `STOREFRONT_COLLECTION_KEYS_PRODUCTS`
    #[serde(default = "default_product_keys")]
    pub products: CollectionKeys,
    /// Environment variable: `STOREFRONT_COLLECTION_KEYS_CATEGORIES`
    #[serde(default = "default_category_keys")]
    pub categories: CollectionKeys,
    /// Environment variable: `STOREFRONT_COLLECTION_KEYS_REVIEWS`
    #[serde(default = "default_review_keys")]
    pub reviews: CollectionKeys,
}

impl Default for CollectionKeysConfig {
    fn default() -> Self {
        Self {
            orders: default_order_keys(),
            products: default_product_keys(),
            categories: default_category_keys(),
            reviews: default_review_keys(),
        }
    }
}

impl CollectionKeysConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (entity, keys) in [
            ("orders", &self.orders),
            ("products", &self.products),
            ("categories", &self.categories),
            ("reviews", &self.reviews),
        ] {
            if keys.is_empty() {
                return Err(ConfigError::EmptyCollectionKeys {
                    entity: entity.to_string(),
                });
            }
        }
        Ok(())
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            profile: default_profile(),
            api_base_url: default_api_base_url(),
            api_token: None,
            log_level: default_log_level(),
            log_format: default_log_format(),
            page_size: default_page_size(),
            request_timeout_ms: default_request_timeout_ms(),
            user_agent: default_user_agent(),
            collection_keys: CollectionKeysConfig::default(),
        }
    }
}

impl AppConfig {
    /// Returns the API base URL, parsed.
    pub fn base_url(&self) -> Result<Url, ConfigError> {
        let url = Url::parse(&self.api_base_url).map_err(|source| ConfigError::InvalidBaseUrl {
            value: self.api_base_url.clone(),
            source,
        })?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(ConfigError::UnsupportedScheme {
                scheme: url.scheme().to_string(),
            });
        }
        Ok(url)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }

    /// Returns a redacted JSON representation (secrets are redacted).
    pub fn redacted_json(&self) -> serde_json::Result<String> {
        let mut config = self.clone();
        if config.api_token.is_some() {
            config.api_token = Some("[REDACTED]".to_string());
        }
        serde_json::to_string_pretty(&config)
    }

    /// Validates the configuration bounds.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.base_url()?;

        if self.page_size == 0 || self.page_size > 200 {
            return Err(ConfigError::InvalidPageSize {
                value: self.page_size,
            });
        }

        if self.request_timeout_ms < 100 || self.request_timeout_ms > 120_000 {
            return Err(ConfigError::InvalidRequestTimeout {
                value: self.request_timeout_ms,
            });
        }

        if !matches!(self.log_format.as_str(), "json" | "pretty") {
            return Err(ConfigError::InvalidLogFormat {
                value: self.log_format.clone(),
            });
        }

        self.collection_keys.validate()
    }
}

fn default_profile() -> String {
    "local".to_string()
}

fn default_api_base_url() -> String {
    "http://localhost:8080/api".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "json".to_string()
}

fn default_page_size() -> u32 {
    15
}

fn default_request_timeout_ms() -> u64 {
    10_000
}

fn default_user_agent() -> String {
    format!("storefront-client/{}", env!("CARGO_PKG_VERSION"))
}

fn default_order_keys() -> CollectionKeys {
    CollectionKeys::new(["orders", "orderList", "content"])
}

fn default_product_keys() -> CollectionKeys {
    CollectionKeys::new(["products", "productList", "content"])
}

fn default_category_keys() -> CollectionKeys {
    CollectionKeys::new(["categories", "categoryList", "content"])
}

fn default_review_keys() -> CollectionKeys {
    CollectionKeys::new(["reviews", "reviewList", "content"])
}

/// Errors that can occur while loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to load environment file {path}: {source}")]
    EnvFile {
        path: PathBuf,
        source: dotenvy::Error,
    },
    #[error("invalid api base url '{value}': {source}")]
    InvalidBaseUrl {
        value: String,
        source: url::ParseError,
    },
    #[error("api base url must use http or https, got '{scheme}'")]
    UnsupportedScheme { scheme: String },
    #[error("page size must be between 1 and 200, got {value}")]
    InvalidPageSize { value: u32 },
    #[error("request timeout must be between 100 and 120000 ms, got {value}")]
    InvalidRequestTimeout { value: u64 },
    #[error("log format must be 'json' or 'pretty', got '{value}'")]
    InvalidLogFormat { value: String },
    #[error("collection keys for {entity} cannot be empty")]
    EmptyCollectionKeys { entity: String },
}

/// Loads configuration using layered `.env` files and `STOREFRONT_*` env vars.
pub struct ConfigLoader {
    base_dir: PathBuf,
}

impl ConfigLoader {
    /// Creates a new loader rooted at the current working directory.
    pub fn new() -> Self {
        Self {
            base_dir: env::current_dir().unwrap_or_else(|_| PathBuf::from(".")),
        }
    }

    /// Creates a loader rooted at the provided directory (useful for tests).
    pub fn with_base_dir(base_dir: PathBuf) -> Self {
        Self { base_dir }
    }

    pub fn load(&self) -> Result<AppConfig, ConfigError> {
        let (mut layered, profile_hint) = self.collect_layered_env()?;

        // Overlay process environment last so it wins.
        for (key, value) in env::vars() {
            if let Some(stripped) = key.strip_prefix(ENV_PREFIX) {
                layered.insert(stripped.to_string(), value);
            }
        }

        let profile = layered
            .remove("PROFILE")
            .filter(|v| !v.is_empty())
            .unwrap_or(profile_hint);
        let api_base_url = layered
            .remove("API_BASE_URL")
            .filter(|v| !v.is_empty())
            .unwrap_or_else(default_api_base_url);
        let api_token = layered.remove("API_TOKEN").map(Zeroizing::new).and_then(|val| {
            let trimmed = val.trim();
            if trimmed.is_empty() {
                None
            } else {
                Some(trimmed.to_string())
            }
        });
        let log_level = layered
            .remove("LOG_LEVEL")
            .filter(|v| !v.is_empty())
            .unwrap_or_else(default_log_level);
        let log_format = layered
            .remove("LOG_FORMAT")
            .filter(|v| !v.is_empty())
            .unwrap_or_else(default_log_format);
        let page_size = layered
            .remove("PAGE_SIZE")
            .and_then(|v| v.parse().ok())
            .unwrap_or_else(default_page_size);
        let request_timeout_ms = layered
            .remove("REQUEST_TIMEOUT_MS")
            .and_then(|v| v.parse().ok())
            .unwrap_or_else(default_request_timeout_ms);
        let user_agent = layered
            .remove("USER_AGENT")
            .filter(|v| !v.is_empty())
            .unwrap_or_else(default_user_agent);

        let keys = |layered: &mut BTreeMap<String, String>, name: &str, default: CollectionKeys| {
            layered
                .remove(&format!("COLLECTION_KEYS_{}", name))
                .map(|v| CollectionKeys::parse_list(&v))
                .unwrap_or(default)
        };
        let collection_keys = CollectionKeysConfig {
            orders: keys(&mut layered, "ORDERS", default_order_keys()),
            products: keys(&mut layered, "PRODUCTS", default_product_keys()),
            categories: keys(&mut layered, "CATEGORIES", default_category_keys()),
            reviews: keys(&mut layered, "REVIEWS", default_review_keys()),
        };

        let config = AppConfig {
            profile,
            api_base_url,
            api_token,
            log_level,
            log_format,
            page_size,
            request_timeout_ms,
            user_agent,
            collection_keys,
        };

        config.validate()?;
        Ok(config)
    }

    fn collect_layered_env(&self) -> Result<(BTreeMap<String, String>, String), ConfigError> {
        let mut values = BTreeMap::new();

        self.merge_dotenv(self.base_dir.join(".env"), &mut values)?;
        self.merge_dotenv(self.base_dir.join(".env.local"), &mut values)?;

        let profile = env::var(format!("{}PROFILE", ENV_PREFIX))
            .ok()
            .or_else(|| values.get("PROFILE").cloned())
            .unwrap_or_else(default_profile);

        self.merge_dotenv(
            self.base_dir.join(format!(".env.{}", &profile)),
            &mut values,
        )?;
        self.merge_dotenv(
            self.base_dir.join(format!(".env.{}.local", &profile)),
            &mut values,
        )?;

        Ok((values, profile))
    }

    fn merge_dotenv(
        &self,
        path: PathBuf,
        values: &mut BTreeMap<String, String>,
    ) -> Result<(), ConfigError> {
        match dotenvy::from_path_iter(&path) {
            Ok(iter) => {
                for item in iter {
                    let (key, value) = item.map_err(|source| ConfigError::EnvFile {
                        path: path.clone(),
                        source,
                    })?;
                    if let Some(stripped) = key.strip_prefix(ENV_PREFIX) {
                        values.insert(stripped.to_string(), value);
                    }
                }
                Ok(())
            }
            Err(dotenvy::Error::Io(ref io_err))
                if io_err.kind() == std::io::ErrorKind::NotFound =>
            {
                Ok(())
            }
            Err(err) => Err(ConfigError::EnvFile { path, source: err }),
        }
    }
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}
