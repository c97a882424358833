use super::{Flavor, Formatter, ToSql};

use mortar_core::{Result, Value};

pub trait Params {
    fn push(&mut self, param: &Value) -> Placeholder;
}

/// 1-based position of a bound parameter.
pub struct Placeholder(pub usize);

impl Params for Vec<Value> {
    fn push(&mut self, value: &Value) -> Placeholder {
        self.push(value.clone());
        Placeholder(self.len())
    }
}

impl ToSql for Placeholder {
    fn to_sql<P: Params>(self, f: &mut Formatter<'_, P>) -> Result<()> {
        use std::fmt::Write;

        match f.serializer.flavor {
            Flavor::Mysql => write!(&mut f.dst, "?"),
            Flavor::Postgresql => write!(&mut f.dst, "${}", self.0),
            Flavor::Sqlite => write!(&mut f.dst, "?{}", self.0),
        }
        .map_err(|err| mortar_core::err!("{err}"))
    }
}
