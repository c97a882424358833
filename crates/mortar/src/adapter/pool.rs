//! Connection pooling for database connections.

pub use deadpool::managed::Timeouts;

use mortar_core::{
    async_trait,
    driver::{Capability, Connection, ConnectionProvider, Driver, NativeError, Response},
    Error, Result, Value,
};

/// Get the default maximum size of a pool, which is `cpu_core_count * 2`
/// including logical cores (Hyper-Threading).
fn get_default_pool_max_size() -> usize {
    deadpool::managed::PoolConfig::default().max_size
}

/// Configuration for connection pool behavior.
#[derive(Debug, Clone)]
pub struct PoolConfig {
    pub max_size: usize,
    pub timeouts: Timeouts,
}

impl PoolConfig {
    /// Creates a new pool configuration with default settings.
    pub fn new() -> Self {
        Self {
            max_size: get_default_pool_max_size(),
            timeouts: Default::default(),
        }
    }
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// A [`ConnectionProvider`] that keeps driver connections in a pool.
#[derive(Debug)]
pub struct Pool {
    inner: deadpool::managed::Pool<Manager>,
    capability: &'static Capability,
}

impl Pool {
    /// Creates a new connection pool from the given driver.
    ///
    /// No connection is opened until the first acquire.
    pub fn new(driver: impl Driver, config: &PoolConfig) -> Result<Self> {
        let capability = driver.capability();

        let max_size = match driver.max_connections() {
            Some(max_connections) => config.max_size.min(max_connections),
            None => config.max_size,
        };

        let inner = deadpool::managed::Pool::builder(Manager {
            driver: Box::new(driver),
        })
        .runtime(deadpool::Runtime::Tokio1)
        .max_size(max_size)
        .timeouts(config.timeouts)
        .build()
        .map_err(Error::connection_pool)?;

        Ok(Self { inner, capability })
    }
}

#[async_trait]
impl ConnectionProvider for Pool {
    fn capability(&self) -> &'static Capability {
        self.capability
    }

    async fn acquire(&self) -> Result<Box<dyn Connection>> {
        let connection = self.inner.get().await.map_err(Error::connection_pool)?;
        Ok(Box::new(PoolConnection { inner: connection }))
    }

    fn release(&self, connection: Box<dyn Connection>) {
        // Dropping the pooled object hands it back to the pool
        drop(connection);
    }
}

#[derive(Debug)]
struct Manager {
    driver: Box<dyn Driver>,
}

impl deadpool::managed::Manager for Manager {
    type Type = Box<dyn Connection>;
    type Error = Error;

    async fn create(&self) -> std::result::Result<Self::Type, Self::Error> {
        self.driver.connect().await
    }

    async fn recycle(
        &self,
        _obj: &mut Self::Type,
        _metrics: &deadpool::managed::Metrics,
    ) -> deadpool::managed::RecycleResult<Self::Error> {
        Ok(())
    }
}

/// A connection retrieved from a pool.
///
/// When dropped, the connection is returned to the pool for reuse.
#[derive(Debug)]
struct PoolConnection {
    inner: deadpool::managed::Object<Manager>,
}

#[async_trait]
impl Connection for PoolConnection {
    fn capability(&self) -> &'static Capability {
        self.inner.capability()
    }

    async fn exec(
        &mut self,
        sql: &str,
        params: &[Value],
    ) -> std::result::Result<Response, NativeError> {
        self.inner.exec(sql, params).await
    }
}
