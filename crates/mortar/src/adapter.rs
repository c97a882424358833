mod builder;
pub use builder::Builder;

mod lease;
use lease::Lease;

mod pool;
pub use pool::{Pool, PoolConfig, Timeouts};

mod session;
pub use session::{Affected, Inserted, Meta, Session};

use crate::engine::Engine;

use mortar_core::{
    driver::{Connection, ConnectionProvider},
    Schema,
};

use std::sync::Arc;

/// Entry point for running operations against one datastore.
///
/// Cloning is cheap; clones share the model registry and the connection
/// provider.
#[derive(Debug, Clone)]
pub struct Adapter {
    shared: Arc<Shared>,
}

#[derive(Debug)]
struct Shared {
    engine: Engine,
    provider: Arc<dyn ConnectionProvider>,
}

impl Adapter {
    pub fn builder() -> Builder {
        Builder::default()
    }

    pub fn schema(&self) -> &Schema {
        &self.shared.engine.schema
    }

    /// A session whose operations each acquire a connection from the
    /// provider and release it when done.
    pub fn session(&self) -> Session<'_> {
        Session::new(self, None)
    }

    /// A session running every operation on `connection`, for example
    /// inside a transaction the caller manages.
    ///
    /// The connection is never released by the adapter.
    pub fn leased<'a>(&'a self, connection: &'a mut dyn Connection) -> Session<'a> {
        Session::new(self, Some(connection))
    }

    fn engine(&self) -> &Engine {
        &self.shared.engine
    }

    fn provider(&self) -> &dyn ConnectionProvider {
        &*self.shared.provider
    }
}
