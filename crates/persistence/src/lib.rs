#![deny(warnings)]

pub mod connection_pool;
pub mod geocode;
pub mod listing;
pub mod location_summary;
pub mod schema;
pub mod scrape_run;
pub mod store;

pub use store::PgStore;

type Result<T> = anyhow::Result<T>;
