#![deny(warnings)]

mod basic;
mod calculator;
mod error;
mod listings;
mod predict;
mod summaries;

pub use error::ApiError;

use anyhow::Context;
use axum::Router;
use common::config;
use common::model::PriceModel;
use common::store::ListingStore;
use logging::*;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};

type Result<T> = anyhow::Result<T>;

/// HTTP 層で使う設定値。起動時に一度だけ読む
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub cache_max_age_seconds: u32,
    pub stale_while_revalidate_seconds: u32,
    pub summary_limit: i64,
    pub deals_page_size: u32,
    pub trend_days: u32,
    pub fallback_active_sources: i64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            cache_max_age_seconds: 3600,
            stale_while_revalidate_seconds: 7200,
            summary_limit: common::market::DEFAULT_SUMMARY_LIMIT,
            deals_page_size: common::types::Page::DEFAULT_SIZE,
            trend_days: 30,
            fallback_active_sources: common::market::DEFAULT_FALLBACK_SOURCES,
        }
    }
}

impl Settings {
    pub fn from_config() -> Result<Self> {
        Ok(Self {
            cache_max_age_seconds: config::get_parsed("WEB_CACHE_MAX_AGE_SECONDS")?,
            stale_while_revalidate_seconds: config::get_parsed(
                "WEB_STALE_WHILE_REVALIDATE_SECONDS",
            )?,
            summary_limit: config::get_parsed("MARKET_SUMMARY_LIMIT")?,
            deals_page_size: config::get_parsed("MARKET_DEALS_PAGE_SIZE")?,
            trend_days: config::get_parsed("MARKET_TREND_DAYS")?,
            fallback_active_sources: config::get_parsed("MARKET_FALLBACK_ACTIVE_SOURCES")?,
        })
    }

    pub fn cache_control(&self) -> String {
        format!(
            "public, s-maxage={}, stale-while-revalidate={}",
            self.cache_max_age_seconds, self.stale_while_revalidate_seconds
        )
    }
}

pub struct AppState {
    pub model: Arc<PriceModel>,
    pub store: Arc<dyn ListingStore>,
    pub settings: Settings,
}

pub fn router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    add_routes(
        Router::new(),
        &[
            basic::add_route,
            summaries::add_route,
            predict::add_route,
            listings::add_route,
            calculator::add_route,
        ],
    )
    .with_state(state)
    .layer(cors)
}

pub async fn serve(addr: &str, state: Arc<AppState>) -> Result<()> {
    let log = DEFAULT.new(o!("function" => "web::serve"));

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    info!(log, "listening"; "addr" => addr);

    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("HTTP server failed")?;

    info!(log, "stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        let log = DEFAULT.new(o!("function" => "web::shutdown_signal"));
        error!(log, "failed to listen for ctrl-c"; "error" => %e);
    }
}

fn add_routes<T>(app: Router<T>, funcs: &[fn(Router<T>) -> Router<T>]) -> Router<T> {
    let mut app = app;
    for func in funcs {
        app = func(app);
    }
    app
}

#[cfg(test)]
pub(crate) mod test_support;
