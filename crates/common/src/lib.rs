pub mod affordability;
pub mod config;
pub mod format;
pub mod geo;
pub mod market;
pub mod model;
pub mod prediction;
pub mod store;
pub mod types;

type Result<T> = anyhow::Result<T>;
