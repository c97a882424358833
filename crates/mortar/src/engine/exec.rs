use super::footprint;

use mortar_core::{
    driver::{Connection, NativeError, Rows},
    Error, Record, Result, Value,
};
use mortar_sql::CompiledQuery;

/// What the caller expects a statement to produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryKind {
    Insert,
    Update,
    Select,
    Destroy,
}

/// Normalized result of one executed statement.
#[derive(Debug, Clone, PartialEq)]
pub enum QueryReport {
    /// The id the engine generated for the first inserted row, if any.
    Inserted { id: Option<Value>, count: u64 },

    /// Rows changed by an update or removed by a destroy.
    Affected { count: u64 },

    /// Rows returned by a select, keyed by column name.
    Rows(Vec<Record>),
}

impl QueryReport {
    pub fn into_rows(self) -> Result<Vec<Record>> {
        match self {
            QueryReport::Rows(rows) => Ok(rows),
            _ => Err(Error::parse("expected rows, found an affected count")),
        }
    }

    pub fn affected(&self) -> u64 {
        match self {
            QueryReport::Inserted { count, .. } | QueryReport::Affected { count } => *count,
            QueryReport::Rows(rows) => rows.len() as u64,
        }
    }

    /// The generated id. A key supplied by the caller takes precedence: the
    /// engine's counter does not reflect it.
    pub fn inserted_id(&self, supplied: Option<&Value>) -> Value {
        match (supplied, self) {
            (Some(supplied), _) if !supplied.is_null() => supplied.clone(),
            (_, QueryReport::Inserted { id: Some(id), .. }) => id.clone(),
            _ => Value::Null,
        }
    }
}

/// Executes `query` on `connection` and shapes the response for `kind`.
///
/// The connection is left open on failure; releasing it is up to the
/// caller.
pub(crate) async fn exec(
    connection: &mut dyn Connection,
    query: &CompiledQuery,
    kind: QueryKind,
) -> Result<QueryReport> {
    tracing::debug!(?kind, sql = %query.text, params = query.params.len(), "executing statement");

    let response = connection
        .exec(&query.text, &query.params)
        .await
        .map_err(|err| translate(err, kind))?;

    match (kind, response.rows) {
        (QueryKind::Select, Rows::Values(rows)) => Ok(QueryReport::Rows(rows)),
        (QueryKind::Insert, Rows::Count(count)) => {
            let id = match response.last_insert_id {
                Some(0) | None => None,
                Some(id) => Some(Value::I64(i64::try_from(id).map_err(|_| {
                    Error::parse(format!("inserted id {id} does not fit in a signed integer"))
                })?)),
            };
            Ok(QueryReport::Inserted { id, count })
        }
        (QueryKind::Update | QueryKind::Destroy, Rows::Count(count)) => {
            Ok(QueryReport::Affected { count })
        }
        (kind, Rows::Values(_)) => Err(Error::parse(format!(
            "{kind:?} statement returned rows instead of an affected count"
        ))),
        (kind, Rows::Count(_)) => Err(Error::parse(format!(
            "{kind:?} statement returned an affected count instead of rows"
        ))),
    }
}

fn translate(err: NativeError, kind: QueryKind) -> Error {
    if err.is_transport() {
        tracing::warn!(?kind, error = %err, "connection failed while executing statement");
        return Error::connection_from(err);
    }

    let footprint = footprint::parse(&err);
    tracing::warn!(?kind, %footprint, code = ?err.code, "statement failed");
    Error::query_failed(footprint, err.message)
}
