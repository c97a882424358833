//! Model descriptors supplied by the host ORM.
//!
//! The registry is built once, when the adapter is constructed, and is
//! read-only afterwards.

mod attribute;
pub use attribute::{Attribute, Type};

mod builder;
pub use builder::Builder;

mod model;
pub use model::Model;

use crate::{Error, Result};

use indexmap::IndexMap;

/// Read-only registry of model descriptors, keyed by model identity.
#[derive(Debug, Clone, Default)]
pub struct Schema {
    models: IndexMap<String, Model>,
}

impl Schema {
    pub fn builder() -> Builder {
        Builder::default()
    }

    /// Returns the model with the given identity.
    pub fn model(&self, identity: &str) -> Option<&Model> {
        self.models.get(identity)
    }

    /// Returns the model or an `InvalidSchema` error naming it.
    pub fn expect_model(&self, identity: &str) -> Result<&Model> {
        self.models
            .get(identity)
            .ok_or_else(|| Error::invalid_schema(format!("unknown model `{identity}`")))
    }

    pub fn models(&self) -> impl Iterator<Item = &Model> {
        self.models.values()
    }
}
