#[macro_use]
mod fmt;
use fmt::ToSql;

mod column;
use column::Column;

mod compiled;
pub use compiled::CompiledQuery;

mod delim;
use delim::{Comma, Delimited};

mod flavor;
use flavor::Flavor;

mod ident;
use ident::Ident;

mod params;
pub use params::{Params, Placeholder};

// Fragment serializers
mod predicate;
mod statement;
mod value;

use crate::stmt::Statement;

use mortar_core::{schema::Model, Result, Schema};

/// Serialize a statement to a SQL string
#[derive(Debug)]
pub struct Serializer<'a> {
    /// Schema against which attribute names are resolved
    schema: &'a Schema,

    /// The database flavor handles the differences between SQL dialects and
    /// supported features.
    flavor: Flavor,
}

struct Formatter<'a, T> {
    /// Handle to the serializer
    serializer: &'a Serializer<'a>,

    /// Where to write the serialized SQL
    dst: &'a mut String,

    /// Where to store parameters
    params: &'a mut T,

    /// Model that attribute references resolve against
    scope: Option<Scope<'a>>,
}

#[derive(Debug, Clone, Copy)]
struct Scope<'a> {
    model: &'a Model,

    /// Table name to qualify columns with. Set when the statement joins
    /// other tables.
    qualifier: Option<&'a str>,
}

impl<'a> Serializer<'a> {
    /// Serializes `stmt`, pushing bound values onto `params` in placeholder
    /// order.
    pub fn serialize(&self, stmt: &Statement, params: &mut impl Params) -> Result<String> {
        let mut ret = String::new();

        let mut fmt = Formatter {
            serializer: self,
            dst: &mut ret,
            params,
            scope: None,
        };

        stmt.to_sql(&mut fmt)?;

        Ok(ret)
    }

    /// Serializes `stmt` into SQL text plus its bound values.
    pub fn compile(&self, stmt: &Statement) -> Result<CompiledQuery> {
        let mut params = vec![];
        let text = self.serialize(stmt, &mut params)?;
        Ok(CompiledQuery { text, params })
    }

    fn model(&self, identity: &str) -> Result<&'a Model> {
        self.schema.expect_model(identity)
    }
}

impl<'a, T> Formatter<'a, T> {
    fn scope(&self) -> Result<Scope<'a>> {
        self.scope
            .ok_or_else(|| mortar_core::err!("attribute reference outside of a statement"))
    }

    /// Resolves an attribute of the model in scope to its column.
    fn column(&self, attribute: &str) -> Result<Column<'a>> {
        let scope = self.scope()?;
        let attribute = scope.model.resolve(attribute)?;
        Ok(Column {
            table: scope.qualifier,
            name: &attribute.column_name,
        })
    }
}
