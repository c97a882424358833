use super::{Attribute, Type};
use crate::{Error, Result};

use indexmap::IndexMap;
use serde::Deserialize;

/// Descriptor of one model: its table, primary key and attributes.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(try_from = "ModelDef")]
pub struct Model {
    /// Logical identity used to reference the model
    pub identity: String,

    pub table_name: String,

    /// Name of the primary key attribute
    pub primary_key: String,

    /// Attributes in declaration order
    attributes: IndexMap<String, Attribute>,
}

/// Serialized form of a model, as hosts hand it over in JSON.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ModelDef {
    identity: String,
    table_name: Option<String>,
    #[serde(default = "default_primary_key")]
    primary_key: String,
    attributes: IndexMap<String, AttributeDef>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct AttributeDef {
    #[serde(rename = "type")]
    ty: Type,
    column_name: Option<String>,
    #[serde(default)]
    auto_increment: bool,
}

fn default_primary_key() -> String {
    "id".to_string()
}

impl Model {
    /// Creates an empty model whose primary key attribute is `id`.
    pub fn new(identity: impl Into<String>, table_name: impl Into<String>) -> Model {
        Model {
            identity: identity.into(),
            table_name: table_name.into(),
            primary_key: default_primary_key(),
            attributes: IndexMap::new(),
        }
    }

    pub fn primary_key(mut self, attribute: impl Into<String>) -> Model {
        self.primary_key = attribute.into();
        self.mark_primary_key();
        self
    }

    pub fn attribute(mut self, attribute: Attribute) -> Model {
        self.attributes.insert(attribute.name.clone(), attribute);
        self.mark_primary_key();
        self
    }

    fn mark_primary_key(&mut self) {
        for attribute in self.attributes.values_mut() {
            attribute.primary_key = attribute.name == self.primary_key;
        }
    }

    /// Returns the attribute with the given logical name.
    pub fn get_attribute(&self, name: &str) -> Option<&Attribute> {
        self.attributes.get(name)
    }

    /// Returns the attribute or an `UnresolvableAttribute` error.
    pub fn resolve(&self, name: &str) -> Result<&Attribute> {
        self.attributes
            .get(name)
            .ok_or_else(|| Error::unresolvable_attribute(&self.identity, name))
    }

    /// Returns the attribute stored in the given column.
    pub fn attribute_by_column(&self, column: &str) -> Option<&Attribute> {
        self.attributes
            .values()
            .find(|attribute| attribute.column_name == column)
    }

    pub fn attributes(&self) -> impl ExactSizeIterator<Item = &Attribute> {
        self.attributes.values()
    }

    /// The primary key attribute, if the descriptor declares it.
    pub fn primary_key_attribute(&self) -> Option<&Attribute> {
        self.attributes.get(&self.primary_key)
    }

    /// True when the database assigns the primary key on insert.
    pub fn generates_key(&self) -> bool {
        self.primary_key_attribute()
            .is_some_and(|attribute| attribute.auto_increment)
    }

    pub(super) fn verify(&self) -> Result<()> {
        let Some(pk) = self.primary_key_attribute() else {
            return Err(Error::invalid_schema(format!(
                "model `{}` declares primary key `{}` but has no such attribute",
                self.identity, self.primary_key
            )));
        };

        if pk.ty == Type::Json || pk.ty == Type::Ref {
            return Err(Error::invalid_schema(format!(
                "model `{}` uses a {:?} attribute as its primary key",
                self.identity, pk.ty
            )));
        }

        for (i, attribute) in self.attributes.values().enumerate() {
            let dup = self
                .attributes
                .values()
                .skip(i + 1)
                .find(|other| other.column_name == attribute.column_name);

            if let Some(other) = dup {
                return Err(Error::invalid_schema(format!(
                    "model `{}` maps both `{}` and `{}` to column `{}`",
                    self.identity, attribute.name, other.name, attribute.column_name
                )));
            }
        }

        Ok(())
    }
}

impl TryFrom<ModelDef> for Model {
    type Error = Error;

    fn try_from(def: ModelDef) -> Result<Model> {
        let mut model = Model::new(
            def.identity.clone(),
            def.table_name.unwrap_or(def.identity),
        );
        model.primary_key = def.primary_key;

        for (name, def) in def.attributes {
            let mut attribute = Attribute::new(name, def.ty);
            if let Some(column_name) = def.column_name {
                attribute = attribute.column(column_name);
            }
            attribute.auto_increment = def.auto_increment;
            model = model.attribute(attribute);
        }

        model.verify()?;
        Ok(model)
    }
}
