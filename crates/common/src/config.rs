use crate::Result;
use anyhow::{Context, anyhow};
use once_cell::sync::Lazy;
use serde::Deserialize;
use std::collections::HashMap;
use std::fmt::Display;
use std::fs;
use std::path::Path;
use std::str::FromStr;
use std::sync::{Arc, Mutex};

// TOML configuration structure
#[derive(Debug, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub model: ModelConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub web: WebConfig,
    #[serde(default)]
    pub market: MarketConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Deserialize)]
pub struct ModelConfig {
    #[serde(default = "default_model_path")]
    pub path: String,
}

#[derive(Debug, Deserialize)]
pub struct DatabaseConfig {
    #[serde(default)]
    pub dsn: String,
    #[serde(default = "default_pool_size")]
    pub pool_size: u32,
}

#[derive(Debug, Deserialize)]
pub struct WebConfig {
    #[serde(default = "default_bind_addr")]
    pub bind_addr: String,
    #[serde(default = "default_cache_max_age_seconds")]
    pub cache_max_age_seconds: u32,
    #[serde(default = "default_stale_while_revalidate_seconds")]
    pub stale_while_revalidate_seconds: u32,
}

#[derive(Debug, Deserialize)]
pub struct MarketConfig {
    #[serde(default = "default_summary_limit")]
    pub summary_limit: u32,
    #[serde(default = "default_deals_page_size")]
    pub deals_page_size: u32,
    #[serde(default = "default_trend_days")]
    pub trend_days: u32,
    #[serde(default = "default_fallback_active_sources")]
    pub fallback_active_sources: u32,
}

#[derive(Debug, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_rust_log_format")]
    pub rust_log_format: String,
}

// Default values
fn default_model_path() -> String {
    "model/model.json".to_string()
}
fn default_pool_size() -> u32 {
    16
}
fn default_bind_addr() -> String {
    "0.0.0.0:8080".to_string()
}
fn default_cache_max_age_seconds() -> u32 {
    3600 // 1時間
}
fn default_stale_while_revalidate_seconds() -> u32 {
    7200
}
fn default_summary_limit() -> u32 {
    200
}
fn default_deals_page_size() -> u32 {
    20
}
fn default_trend_days() -> u32 {
    30
}
fn default_fallback_active_sources() -> u32 {
    4
}
fn default_rust_log_format() -> String {
    "json".to_string()
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            path: default_model_path(),
        }
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            dsn: String::new(),
            pool_size: default_pool_size(),
        }
    }
}

impl Default for WebConfig {
    fn default() -> Self {
        Self {
            bind_addr: default_bind_addr(),
            cache_max_age_seconds: default_cache_max_age_seconds(),
            stale_while_revalidate_seconds: default_stale_while_revalidate_seconds(),
        }
    }
}

impl Default for MarketConfig {
    fn default() -> Self {
        Self {
            summary_limit: default_summary_limit(),
            deals_page_size: default_deals_page_size(),
            trend_days: default_trend_days(),
            fallback_active_sources: default_fallback_active_sources(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            rust_log_format: default_rust_log_format(),
        }
    }
}

static CONFIG: Lazy<Config> = Lazy::new(|| {
    load_config().unwrap_or_else(|e| {
        eprintln!(
            "Warning: Failed to load config files: {}. Using defaults.",
            e
        );
        Config::default()
    })
});

static CONFIG_STORE: Lazy<Arc<Mutex<HashMap<String, String>>>> =
    Lazy::new(|| Arc::new(Mutex::new(HashMap::new())));

pub fn get(name: &str) -> Result<String> {
    // Priority 1: CONFIG_STORE (runtime overrides)
    if let Some(value) = get_from_store(name) {
        if value.is_empty() {
            return Err(anyhow!("{} is empty", name));
        }
        return Ok(value);
    }

    // Priority 2: Environment variables
    if let Ok(val) = std::env::var(name)
        && !val.is_empty()
    {
        return Ok(val);
    }

    // Priority 3: TOML config
    let toml_value = match name {
        "MODEL_PATH" => Some(CONFIG.model.path.clone()),
        "PG_DSN" => {
            if !CONFIG.database.dsn.is_empty() {
                Some(CONFIG.database.dsn.clone())
            } else {
                None
            }
        }
        "PG_POOL_SIZE" => Some(CONFIG.database.pool_size.to_string()),
        "WEB_BIND_ADDR" => Some(CONFIG.web.bind_addr.clone()),
        "WEB_CACHE_MAX_AGE_SECONDS" => Some(CONFIG.web.cache_max_age_seconds.to_string()),
        "WEB_STALE_WHILE_REVALIDATE_SECONDS" => {
            Some(CONFIG.web.stale_while_revalidate_seconds.to_string())
        }
        "MARKET_SUMMARY_LIMIT" => Some(CONFIG.market.summary_limit.to_string()),
        "MARKET_DEALS_PAGE_SIZE" => Some(CONFIG.market.deals_page_size.to_string()),
        "MARKET_TREND_DAYS" => Some(CONFIG.market.trend_days.to_string()),
        "MARKET_FALLBACK_ACTIVE_SOURCES" => {
            Some(CONFIG.market.fallback_active_sources.to_string())
        }
        "RUST_LOG_FORMAT" => Some(CONFIG.logging.rust_log_format.clone()),
        _ => None,
    };

    if let Some(value) = toml_value
        && !value.is_empty()
    {
        return Ok(value);
    }

    Err(anyhow!("Configuration key not found: {}", name))
}

/// `get` の値を `FromStr` で変換する
pub fn get_parsed<T>(name: &str) -> Result<T>
where
    T: FromStr,
    T::Err: Display,
{
    let raw = get(name)?;
    raw.parse::<T>()
        .map_err(|e| anyhow!("{e}"))
        .with_context(|| format!("Invalid value for {}: {:?}", name, raw))
}

/// テスト用: 設定値を上書きする
///
/// 注: `#[cfg(test)]` にすると他クレート(web等)のテストから参照できないため
/// `#[doc(hidden)]` で公開している
#[doc(hidden)]
pub fn set(name: &str, value: &str) {
    if let Ok(mut store) = CONFIG_STORE.lock() {
        store.insert(name.to_string(), value.to_string());
    }
}

/// テスト用: 設定値を CONFIG_STORE から削除する
#[doc(hidden)]
pub fn remove(name: &str) {
    if let Ok(mut store) = CONFIG_STORE.lock() {
        store.remove(name);
    }
}

/// テスト用: CONFIG_STORE に値をセットし、Drop 時に自動で元に戻す RAII ガード。
///
/// テストが途中で panic しても確実にクリーンアップされる。
#[doc(hidden)]
pub struct ConfigGuard {
    key: String,
    previous: Option<String>,
}

impl ConfigGuard {
    pub fn new(key: &str, value: &str) -> Self {
        let previous = get_from_store(key);
        set(key, value);
        Self {
            key: key.to_string(),
            previous,
        }
    }
}

impl Drop for ConfigGuard {
    fn drop(&mut self) {
        match &self.previous {
            Some(prev) => set(&self.key, prev),
            None => remove(&self.key),
        }
    }
}

fn get_from_store(name: &str) -> Option<String> {
    if let Ok(store) = CONFIG_STORE.lock() {
        store.get(name).cloned()
    } else {
        None
    }
}

/// Load configuration from TOML files with priority:
/// 1. config/config.local.toml (git-ignored, for local overrides)
/// 2. config/config.toml (git-managed template)
/// 3. Default values
fn load_config() -> Result<Config> {
    let mut config = Config::default();

    let base_path = "config/config.toml";
    if Path::new(base_path).exists() {
        let content = fs::read_to_string(base_path)?;
        config = toml::from_str(&content)?;
    }

    let local_path = "config/config.local.toml";
    if Path::new(local_path).exists() {
        let content = fs::read_to_string(local_path)?;
        let local_config: Config = toml::from_str(&content)?;
        merge_config(&mut config, local_config);
    }

    Ok(config)
}

/// Merge local config into base config (local values override base values)
fn merge_config(base: &mut Config, local: Config) {
    // Model
    if local.model.path != default_model_path() {
        base.model.path = local.model.path;
    }

    // Database
    if !local.database.dsn.is_empty() {
        base.database.dsn = local.database.dsn;
    }
    if local.database.pool_size != default_pool_size() {
        base.database.pool_size = local.database.pool_size;
    }

    // Web
    if local.web.bind_addr != default_bind_addr() {
        base.web.bind_addr = local.web.bind_addr;
    }
    if local.web.cache_max_age_seconds != default_cache_max_age_seconds() {
        base.web.cache_max_age_seconds = local.web.cache_max_age_seconds;
    }
    if local.web.stale_while_revalidate_seconds != default_stale_while_revalidate_seconds() {
        base.web.stale_while_revalidate_seconds = local.web.stale_while_revalidate_seconds;
    }

    // Market
    if local.market.summary_limit != default_summary_limit() {
        base.market.summary_limit = local.market.summary_limit;
    }
    if local.market.deals_page_size != default_deals_page_size() {
        base.market.deals_page_size = local.market.deals_page_size;
    }
    if local.market.trend_days != default_trend_days() {
        base.market.trend_days = local.market.trend_days;
    }
    if local.market.fallback_active_sources != default_fallback_active_sources() {
        base.market.fallback_active_sources = local.market.fallback_active_sources;
    }

    // Logging
    if local.logging.rust_log_format != default_rust_log_format() {
        base.logging.rust_log_format = local.logging.rust_log_format;
    }
}

/// Get TOML-based configuration
pub fn config() -> &'static Config {
    &CONFIG
}
