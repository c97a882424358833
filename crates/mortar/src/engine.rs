mod exec;
pub(crate) use exec::exec;
pub use exec::{QueryKind, QueryReport};

mod footprint;

pub(crate) mod join;

pub(crate) mod normalize;

use mortar_core::{
    driver::{Capability, Connection},
    schema::Model,
    Result, Schema,
};
use mortar_sql::{CompiledQuery, Serializer, Statement};

/// Compiles statements for one dialect and runs them on a connection.
#[derive(Debug)]
pub(crate) struct Engine {
    /// Model registry, fixed for the adapter's lifetime
    pub(crate) schema: Schema,

    capability: &'static Capability,
}

impl Engine {
    pub(crate) fn new(schema: Schema, capability: &'static Capability) -> Engine {
        Engine { schema, capability }
    }

    pub(crate) fn model(&self, identity: &str) -> Result<&Model> {
        self.schema.expect_model(identity)
    }

    pub(crate) fn capability(&self) -> &'static Capability {
        self.capability
    }

    pub(crate) fn compile(&self, stmt: &Statement) -> Result<CompiledQuery> {
        let compiled = Serializer::new(&self.schema, self.capability).compile(stmt)?;

        tracing::debug!(
            dialect = ?self.capability.dialect,
            sql = %compiled.text,
            params = compiled.params.len(),
            "compiled statement"
        );

        Ok(compiled)
    }

    /// Runs a select and maps its rows back to the model's attributes.
    pub(crate) async fn fetch(
        &self,
        connection: &mut dyn Connection,
        stmt: &Statement,
    ) -> Result<Vec<mortar_core::Record>> {
        let compiled = self.compile(stmt)?;
        self.fetch_compiled(connection, stmt, &compiled).await
    }

    pub(crate) async fn fetch_compiled(
        &self,
        connection: &mut dyn Connection,
        stmt: &Statement,
        compiled: &CompiledQuery,
    ) -> Result<Vec<mortar_core::Record>> {
        let model = match stmt.model() {
            Some(identity) => self.model(identity)?,
            None => mortar_core::bail!("statement does not name a model"),
        };

        exec::exec(connection, compiled, QueryKind::Select)
            .await?
            .into_rows()?
            .into_iter()
            .map(|row| normalize::outgoing(model, row))
            .collect()
    }
}
