use super::{Adapter, Pool, PoolConfig, Shared};
use crate::engine::Engine;

use mortar_core::{
    driver::{ConnectionProvider, Driver},
    schema::{self, Model},
    Error, Result,
};

use std::sync::Arc;

#[derive(Debug, Default)]
pub struct Builder {
    /// Model registry builder
    schema: schema::Builder,

    /// Used when the adapter owns its pool
    pool: PoolConfig,
}

impl Builder {
    pub fn register(&mut self, model: Model) -> &mut Self {
        self.schema.model(model);
        self
    }

    /// Registers a model from its JSON descriptor.
    pub fn register_json(&mut self, descriptor: serde_json::Value) -> Result<&mut Self> {
        let model: Model = serde_json::from_value(descriptor)
            .map_err(|err| Error::invalid_schema(err.to_string()))?;

        Ok(self.register(model))
    }

    pub fn pool_config(&mut self, config: PoolConfig) -> &mut Self {
        self.pool = config;
        self
    }

    /// Builds an adapter that pools connections opened by `driver`.
    pub fn build(&self, driver: impl Driver) -> Result<Adapter> {
        let pool = Pool::new(driver, &self.pool)?;
        self.build_with_provider(pool)
    }

    /// Builds an adapter over a caller-supplied provider.
    pub fn build_with_provider(&self, provider: impl ConnectionProvider) -> Result<Adapter> {
        let schema = self.schema.build()?;
        let engine = Engine::new(schema, provider.capability());

        tracing::debug!(
            models = engine.schema.models().count(),
            dialect = ?provider.capability().dialect,
            "adapter ready"
        );

        Ok(Adapter {
            shared: Arc::new(Shared {
                engine,
                provider: Arc::new(provider),
            }),
        })
    }
}
