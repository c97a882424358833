use super::{Formatter, Ident, Params, ToSql};
use mortar_core::Result;

/// A column reference, optionally qualified with its table.
#[derive(Debug, Clone, Copy)]
pub(super) struct Column<'a> {
    pub(super) table: Option<&'a str>,
    pub(super) name: &'a str,
}

impl ToSql for Column<'_> {
    fn to_sql<T: Params>(self, f: &mut Formatter<'_, T>) -> Result<()> {
        if let Some(table) = self.table {
            fmt!(f, Ident(table) ".");
        }
        fmt!(f, Ident(self.name));
        Ok(())
    }
}
