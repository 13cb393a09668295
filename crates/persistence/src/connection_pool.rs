use crate::Result;
use anyhow::Context;
use deadpool_diesel::postgres::Pool;
use deadpool_diesel::{Manager, ManagerConfig, RecyclingMethod};

pub type Client = deadpool_diesel::postgres::Connection;

pub const DEFAULT_POOL_SIZE: usize = 16;

pub fn new_pool(dsn: &str, max_size: usize) -> Result<Pool> {
    let mgr_config = ManagerConfig {
        recycling_method: RecyclingMethod::Fast,
    };
    let mgr = Manager::from_config(dsn, deadpool_diesel::Runtime::Tokio1, mgr_config);
    Pool::builder(mgr)
        .max_size(max_size)
        .build()
        .context("Failed to build connection pool")
}

/// `PG_DSN` は必須、`PG_POOL_SIZE` は省略時 16
pub fn from_config() -> Result<Pool> {
    let dsn = common::config::get("PG_DSN")?;
    let max_size = common::config::get_parsed::<usize>("PG_POOL_SIZE").unwrap_or(DEFAULT_POOL_SIZE);
    new_pool(&dsn, max_size)
}

#[cfg(test)]
mod tests {
    use super::*;
    use common::config::ConfigGuard;
    use serial_test::serial;

    #[test]
    fn test_new_pool_does_not_connect() {
        // 接続は最初の get まで行われない
        let pool = new_pool("postgres://nobody@127.0.0.1:1/none", 4).unwrap();
        assert_eq!(pool.status().max_size, 4);
        assert_eq!(pool.status().size, 0);
    }

    #[test]
    #[serial]
    fn test_from_config_requires_dsn() {
        let _dsn = ConfigGuard::new("PG_DSN", "");
        assert!(from_config().is_err());
    }

    #[test]
    #[serial]
    fn test_from_config_pool_size() {
        let _dsn = ConfigGuard::new("PG_DSN", "postgres://nobody@127.0.0.1:1/none");
        let _size = ConfigGuard::new("PG_POOL_SIZE", "3");
        assert_eq!(from_config().unwrap().status().max_size, 3);
    }
}
