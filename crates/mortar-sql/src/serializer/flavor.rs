use super::Serializer;

use mortar_core::{
    driver::{Capability, Dialect},
    Schema,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum Flavor {
    Postgresql,
    Sqlite,
    Mysql,
}

impl<'a> Serializer<'a> {
    /// Creates a serializer speaking the dialect described by `capability`.
    pub fn new(schema: &'a Schema, capability: &Capability) -> Serializer<'a> {
        match capability.dialect {
            Dialect::Mysql => Serializer::mysql(schema),
            Dialect::Postgresql => Serializer::postgresql(schema),
            Dialect::Sqlite => Serializer::sqlite(schema),
        }
    }

    pub fn sqlite(schema: &'a Schema) -> Serializer<'a> {
        Serializer {
            schema,
            flavor: Flavor::Sqlite,
        }
    }

    pub fn postgresql(schema: &'a Schema) -> Serializer<'a> {
        Serializer {
            schema,
            flavor: Flavor::Postgresql,
        }
    }

    pub fn mysql(schema: &'a Schema) -> Serializer<'a> {
        Serializer {
            schema,
            flavor: Flavor::Mysql,
        }
    }

    pub(super) fn is_mysql(&self) -> bool {
        matches!(self.flavor, Flavor::Mysql)
    }

    pub(super) fn is_sqlite(&self) -> bool {
        matches!(self.flavor, Flavor::Sqlite)
    }

    /// Literal used as `LIMIT` when only an offset was requested, for
    /// engines that reject a bare `OFFSET`.
    pub(super) fn unbounded_limit(&self) -> Option<&'static str> {
        match self.flavor {
            Flavor::Mysql => Some("18446744073709551615"),
            Flavor::Sqlite => Some("-1"),
            Flavor::Postgresql => None,
        }
    }
}
