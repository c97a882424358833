use super::{Column, Delimited, Formatter, Params, ToSql};

use crate::stmt::{Comparison, Op, Predicate};
use mortar_core::{Error, Result, Value};

impl ToSql for &Predicate {
    fn to_sql<T: Params>(self, f: &mut Formatter<'_, T>) -> Result<()> {
        match self {
            Predicate::And(operands) => conjunction(f, operands, " AND ", "1=1"),
            Predicate::Or(operands) => conjunction(f, operands, " OR ", "1=0"),
            Predicate::Not(_) => Err(Error::malformed_criteria("`not` is not supported")),
            Predicate::Comparison(comparison) => comparison.to_sql(f),
        }
    }
}

/// Multi-operand conjunctions are always parenthesized so that nesting an
/// `OR` under an `AND` (or the reverse) keeps its meaning.
fn conjunction<T: Params>(
    f: &mut Formatter<'_, T>,
    operands: &[Predicate],
    separator: &'static str,
    identity: &'static str,
) -> Result<()> {
    match operands {
        [] => fmt!(f, identity),
        [operand] => fmt!(f, operand),
        operands => fmt!(f, "(" Delimited(operands, separator) ")"),
    }
    Ok(())
}

impl ToSql for &Comparison {
    fn to_sql<T: Params>(self, f: &mut Formatter<'_, T>) -> Result<()> {
        let column = f.column(&self.attribute)?;
        let value = &self.value;

        match self.op {
            Op::IsNull => fmt!(f, column " IS NULL"),
            Op::IsNotNull => fmt!(f, column " IS NOT NULL"),
            Op::Eq if value.is_null() => fmt!(f, column " IS NULL"),
            Op::Ne if value.is_null() => fmt!(f, column " IS NOT NULL"),
            Op::In | Op::NotIn => {
                let Value::List(items) = value else {
                    return Err(Error::malformed_criteria(format!(
                        "`{}` expects a list of values, found {}",
                        self.attribute,
                        value.kind_name()
                    )));
                };
                in_list(f, column, items, self.op == Op::NotIn)?;
            }
            Op::Like | Op::StartsWith | Op::EndsWith => {
                let Some(pattern) = value.as_str() else {
                    return Err(Error::malformed_criteria(format!(
                        "`{}` expects a string pattern, found {}",
                        self.attribute,
                        value.kind_name()
                    )));
                };
                let pattern = &Value::String(like_pattern(pattern, self.op));
                fmt!(f, column " LIKE " pattern);
                if f.serializer.is_sqlite() {
                    fmt!(f, " ESCAPE '\\'");
                }
            }
            op => {
                if value.is_null() || value.is_list() {
                    return Err(Error::malformed_criteria(format!(
                        "`{}` cannot be compared to {}",
                        self.attribute,
                        value.kind_name()
                    )));
                }
                let operator = match op {
                    Op::Eq => " = ",
                    Op::Ne => " <> ",
                    Op::Lt => " < ",
                    Op::Le => " <= ",
                    Op::Gt => " > ",
                    Op::Ge => " >= ",
                    _ => unreachable!(),
                };
                fmt!(f, column operator value);
            }
        }

        Ok(())
    }
}

/// Writes `col IN (..)`. Nulls in the list cannot match through `IN`, so
/// they become a separate `IS NULL` test. An empty list never reaches the
/// SQL text.
pub(super) fn in_list<T: Params>(
    f: &mut Formatter<'_, T>,
    column: Column<'_>,
    items: &[Value],
    negate: bool,
) -> Result<()> {
    let has_null = items.iter().any(Value::is_null);
    let values: Vec<&Value> = items.iter().filter(|item| !item.is_null()).collect();

    match (values.is_empty(), has_null, negate) {
        (true, false, false) => fmt!(f, "1=0"),
        (true, false, true) => fmt!(f, "1=1"),
        (true, true, false) => fmt!(f, column " IS NULL"),
        (true, true, true) => fmt!(f, column " IS NOT NULL"),
        (false, false, false) => fmt!(f, column " IN (" Delimited(values, ", ") ")"),
        (false, false, true) => fmt!(f, column " NOT IN (" Delimited(values, ", ") ")"),
        (false, true, false) => {
            fmt!(f, "(" column " IN (" Delimited(values, ", ") ") OR " column " IS NULL)")
        }
        (false, true, true) => {
            fmt!(f, "(" column " NOT IN (" Delimited(values, ", ") ") AND " column " IS NOT NULL)")
        }
    }

    Ok(())
}

fn like_pattern(value: &str, op: Op) -> String {
    let mut escaped = String::with_capacity(value.len() + 2);
    for ch in value.chars() {
        if matches!(ch, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(ch);
    }

    match op {
        Op::StartsWith => format!("{escaped}%"),
        Op::EndsWith => format!("%{escaped}"),
        _ => format!("%{escaped}%"),
    }
}
