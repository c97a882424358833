use super::{predicate::in_list, Column, Comma, Formatter, Ident, Params, Scope, ToSql};

use crate::stmt::{
    self, Aggregate, Returning, Statement, ALIAS_SEPARATOR, JUNCTION_PARENT_KEY,
};
use mortar_core::{criteria::Direction, schema::Model, Error, Result, Value};

impl ToSql for &Statement {
    fn to_sql<T: Params>(self, f: &mut Formatter<'_, T>) -> Result<()> {
        match self {
            Statement::Delete(stmt) => stmt.to_sql(f),
            Statement::Insert(stmt) => stmt.to_sql(f),
            Statement::Query(stmt) => stmt.to_sql(f),
            Statement::Union(stmts) => union(f, stmts),
            Statement::Update(stmt) => stmt.to_sql(f),
        }
    }
}

/// Each select is wrapped in a derived table so it keeps its own
/// `ORDER BY` and `LIMIT`.
fn union<T: Params>(f: &mut Formatter<'_, T>, stmts: &[stmt::Select]) -> Result<()> {
    match stmts {
        [] => mortar_core::bail!("union of zero selects"),
        [stmt] => stmt.to_sql(f),
        stmts => {
            for (i, stmt) in stmts.iter().enumerate() {
                if i > 0 {
                    fmt!(f, " UNION ALL ");
                }
                let alias = format!("u{i}");
                fmt!(f, "SELECT * FROM (" stmt ") AS " Ident(alias));
            }
            Ok(())
        }
    }
}

impl ToSql for &stmt::Select {
    fn to_sql<T: Params>(self, f: &mut Formatter<'_, T>) -> Result<()> {
        let model = f.serializer.model(&self.model)?;
        let table = &model.table_name[..];
        let qualifier = (!self.joins.is_empty() || self.junction.is_some()).then_some(table);
        f.scope = Some(Scope { model, qualifier });

        fmt!(f, "SELECT ");

        match &self.returning {
            Returning::Aggregate(aggregate) => {
                match aggregate {
                    Aggregate::Count => fmt!(f, "COUNT(*)"),
                    Aggregate::Sum(attribute) => {
                        let column = f.column(attribute)?;
                        fmt!(f, "SUM(" column ")");
                    }
                    Aggregate::Avg(attribute) => {
                        let column = f.column(attribute)?;
                        fmt!(f, "AVG(" column ")");
                    }
                }
                fmt!(f, " AS " Ident(aggregate.column_alias()));
            }
            Returning::Attributes(attributes) => {
                let columns = project(model, qualifier, attributes)?;
                fmt!(f, Comma(columns));

                for join in &self.joins {
                    let joined = f.serializer.model(&join.model)?;
                    for column in project(joined, Some(join.alias.as_str()), &join.attributes)? {
                        let alias = format!("{}{ALIAS_SEPARATOR}{}", join.alias, column.name);
                        fmt!(f, ", " column " AS " Ident(alias));
                    }
                }

                if let Some(junction) = &self.junction {
                    let column = junction_column(f, junction, &junction.parent_key)?;
                    fmt!(f, ", " column " AS " Ident(JUNCTION_PARENT_KEY));
                }
            }
        }

        fmt!(f, " FROM " Ident(table));

        for join in &self.joins {
            let joined = f.serializer.model(&join.model)?;
            let child = Column {
                table: Some(join.alias.as_str()),
                name: &joined.resolve(&join.child_key)?.column_name,
            };
            let parent = f.column(&join.parent_key)?;
            fmt!(
                f,
                " LEFT OUTER JOIN " Ident(&joined.table_name) " AS " Ident(&join.alias)
                " ON " child " = " parent
            );
        }

        if let Some(junction) = &self.junction {
            let junction_model = f.serializer.model(&junction.model)?;
            let child = junction_column(f, junction, &junction.child_key)?;
            let target = f.column(&junction.target_key)?;
            fmt!(f, " INNER JOIN " Ident(&junction_model.table_name) " ON " child " = " target);

            let parent = junction_column(f, junction, &junction.parent_key)?;
            fmt!(f, " WHERE ");
            in_list(f, parent, &junction.parent_keys, false)?;
            if let Some(filter) = &self.filter {
                fmt!(f, " AND " filter);
            }
        } else if let Some(filter) = &self.filter {
            fmt!(f, " WHERE " filter);
        }

        for (i, sort) in self.order_by.iter().enumerate() {
            let column = f.column(&sort.attribute)?;
            let direction = match sort.direction {
                Direction::Asc => " ASC",
                Direction::Desc => " DESC",
            };
            let prefix = if i == 0 { " ORDER BY " } else { ", " };
            fmt!(f, prefix column direction);
        }

        match (self.limit, self.offset) {
            (Some(limit), offset) => {
                fmt!(f, " LIMIT " limit);
                if let Some(offset) = offset {
                    fmt!(f, " OFFSET " offset);
                }
            }
            (None, Some(offset)) => {
                if let Some(unbounded) = f.serializer.unbounded_limit() {
                    fmt!(f, " LIMIT " unbounded);
                }
                fmt!(f, " OFFSET " offset);
            }
            (None, None) => {}
        }

        Ok(())
    }
}

/// Columns for a projection. An empty attribute list selects every
/// attribute of the model.
fn project<'a>(
    model: &'a Model,
    table: Option<&'a str>,
    attributes: &[String],
) -> Result<Vec<Column<'a>>> {
    if attributes.is_empty() {
        return Ok(model
            .attributes()
            .map(|attribute| Column {
                table,
                name: &attribute.column_name,
            })
            .collect());
    }

    attributes
        .iter()
        .map(|name| {
            Ok(Column {
                table,
                name: &model.resolve(name)?.column_name,
            })
        })
        .collect()
}

fn junction_column<'a, T>(
    f: &Formatter<'a, T>,
    junction: &stmt::Junction,
    attribute: &str,
) -> Result<Column<'a>> {
    let model = f.serializer.model(&junction.model)?;
    Ok(Column {
        table: Some(model.table_name.as_str()),
        name: &model.resolve(attribute)?.column_name,
    })
}

struct Row<'a>(Vec<&'a Value>);

impl ToSql for Row<'_> {
    fn to_sql<T: Params>(self, f: &mut Formatter<'_, T>) -> Result<()> {
        fmt!(f, "(" Comma(self.0) ")");
        Ok(())
    }
}

impl ToSql for &stmt::Insert {
    fn to_sql<T: Params>(self, f: &mut Formatter<'_, T>) -> Result<()> {
        let model = f.serializer.model(&self.model)?;
        f.scope = Some(Scope {
            model,
            qualifier: None,
        });

        let Some(first) = self.records.first() else {
            mortar_core::bail!("insert into `{}` without records", self.model);
        };

        // A null primary key is left for the database to assign
        let inserted = |(name, value): &(&String, &Value)| {
            !(name.as_str() == model.primary_key && value.is_null())
        };

        let names: Vec<&String> = first
            .iter()
            .filter(inserted)
            .map(|(name, _)| name)
            .collect();

        let mut rows = Vec::with_capacity(self.records.len());
        for record in &self.records {
            if record.iter().filter(inserted).count() != names.len() {
                mortar_core::bail!(
                    "records inserted into `{}` together must set the same attributes",
                    self.model
                );
            }

            let mut row = Vec::with_capacity(names.len());
            for name in &names {
                match record.get(name.as_str()) {
                    Some(value) => row.push(value),
                    None => mortar_core::bail!(
                        "records inserted into `{}` together must set the same attributes",
                        self.model
                    ),
                }
            }
            rows.push(Row(row));
        }

        fmt!(f, "INSERT INTO " Ident(&model.table_name));

        if names.is_empty() {
            if f.serializer.is_mysql() {
                fmt!(f, " () VALUES " Comma(rows.iter().map(|_| "()")));
            } else if rows.len() == 1 {
                fmt!(f, " DEFAULT VALUES");
            } else {
                mortar_core::bail!(
                    "cannot insert several records into `{}` without any values",
                    self.model
                );
            }
            return Ok(());
        }

        let columns = names
            .iter()
            .map(|name| f.column(name))
            .collect::<Result<Vec<_>>>()?;

        fmt!(f, " (" Comma(columns) ") VALUES " Comma(rows));

        Ok(())
    }
}

struct Assignment<'a>(Column<'a>, &'a Value);

impl ToSql for Assignment<'_> {
    fn to_sql<T: Params>(self, f: &mut Formatter<'_, T>) -> Result<()> {
        fmt!(f, self.0 " = " self.1);
        Ok(())
    }
}

impl ToSql for &stmt::Update {
    fn to_sql<T: Params>(self, f: &mut Formatter<'_, T>) -> Result<()> {
        let model = f.serializer.model(&self.model)?;
        f.scope = Some(Scope {
            model,
            qualifier: None,
        });

        if self.assignments.is_empty() {
            return Err(Error::malformed_criteria(format!(
                "update of `{}` without any values",
                self.model
            )));
        }

        let assignments = self
            .assignments
            .iter()
            .map(|(name, value)| Ok(Assignment(f.column(name)?, value)))
            .collect::<Result<Vec<_>>>()?;

        fmt!(f, "UPDATE " Ident(&model.table_name) " SET " Comma(assignments));

        if let Some(filter) = &self.filter {
            fmt!(f, " WHERE " filter);
        }

        Ok(())
    }
}

impl ToSql for &stmt::Delete {
    fn to_sql<T: Params>(self, f: &mut Formatter<'_, T>) -> Result<()> {
        let model = f.serializer.model(&self.model)?;
        f.scope = Some(Scope {
            model,
            qualifier: None,
        });

        fmt!(f, "DELETE FROM " Ident(&model.table_name));

        if let Some(filter) = &self.filter {
            fmt!(f, " WHERE " filter);
        }

        Ok(())
    }
}
