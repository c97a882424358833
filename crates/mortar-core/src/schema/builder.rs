use super::{Model, Schema};
use crate::{Error, Result};

/// Collects model descriptors and verifies them into a [`Schema`].
#[derive(Debug, Default)]
pub struct Builder {
    models: Vec<Model>,
}

impl Builder {
    pub fn model(&mut self, model: Model) -> &mut Self {
        self.models.push(model);
        self
    }

    pub fn build(&self) -> Result<Schema> {
        let mut schema = Schema::default();

        for model in &self.models {
            model.verify()?;

            if schema.models.contains_key(&model.identity) {
                return Err(Error::invalid_schema(format!(
                    "model `{}` registered twice",
                    model.identity
                )));
            }

            schema.models.insert(model.identity.clone(), model.clone());
        }

        Ok(schema)
    }
}
