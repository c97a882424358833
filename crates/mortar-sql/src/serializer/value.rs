use super::{Formatter, Params, ToSql};

use mortar_core::{Result, Value};

/// Values are never written into the SQL text; each one becomes a bound
/// parameter.
impl ToSql for &Value {
    fn to_sql<P: Params>(self, f: &mut Formatter<'_, P>) -> Result<()> {
        let placeholder = f.params.push(self);
        fmt!(f, placeholder);
        Ok(())
    }
}
