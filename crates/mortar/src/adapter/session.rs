use super::{Adapter, Lease};
use crate::engine::{exec, join::JoinPlan, normalize, Engine, QueryKind};
use crate::JoinInstruction;

use mortar_core::{
    criteria::Predicate,
    driver::Connection,
    schema::{Model, Type},
    Criteria, Error, Key, Record, Result, Value,
};
use mortar_sql::{
    stmt::{Aggregate, Delete, Insert, Returning, Select, Update},
    CompiledQuery, Statement,
};

use indexmap::IndexMap;

/// Options for write operations.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Meta {
    /// Return the records affected by the operation. Costs an extra select.
    pub fetch: bool,
}

impl Meta {
    pub fn fetch() -> Meta {
        Meta { fetch: true }
    }
}

/// Result of inserting one record.
#[derive(Debug, Clone, PartialEq)]
pub struct Inserted {
    /// Primary key of the new record: the caller's value when one was
    /// supplied, the generated one otherwise. Null when the engine reported
    /// none.
    pub id: Value,

    /// The stored record, when [`Meta::fetch`] was requested.
    pub record: Option<Record>,
}

/// Result of an update or destroy.
#[derive(Debug, Clone, PartialEq)]
pub struct Affected {
    pub count: u64,

    /// The updated or destroyed records, when [`Meta::fetch`] was
    /// requested.
    pub records: Option<Vec<Record>>,
}

/// Runs operations for an [`Adapter`].
///
/// Statements are compiled before a connection is acquired, so criteria
/// that do not compile never touch the provider. Each operation holds its
/// connection until it completes and then releases it, on success and on
/// failure alike.
#[derive(Debug)]
pub struct Session<'a> {
    adapter: &'a Adapter,

    /// Caller-owned connection, used instead of the provider
    leased: Option<&'a mut dyn Connection>,
}

impl<'a> Session<'a> {
    pub(super) fn new(adapter: &'a Adapter, leased: Option<&'a mut dyn Connection>) -> Self {
        Session { adapter, leased }
    }

    /// Inserts one record.
    pub async fn create(&mut self, model: &str, record: Record, meta: Meta) -> Result<Inserted> {
        let adapter = self.adapter;
        let engine = adapter.engine();
        let model = engine.model(model)?;

        let mut record = record;
        normalize::incoming(model, &mut record)?;
        let supplied = record.get(&model.primary_key).cloned();

        let insert = engine.compile(&Insert::new(&model.identity, vec![record]).into())?;

        let mut connection = self.lease().await?;
        let report = exec(&mut *connection, &insert, QueryKind::Insert).await?;
        let id = if model.generates_key() {
            report.inserted_id(supplied.as_ref())
        } else {
            supplied.unwrap_or_default()
        };

        let record = if meta.fetch {
            select_by_keys(engine, &mut *connection, model, vec![id.clone()])
                .await?
                .into_iter()
                .next()
        } else {
            None
        };

        Ok(Inserted { id, record })
    }

    /// Inserts several records.
    ///
    /// Consecutive records setting the same attributes share one multi-row
    /// `INSERT`. All statements run on one connection.
    pub async fn create_each(
        &mut self,
        model: &str,
        records: Vec<Record>,
        meta: Meta,
    ) -> Result<Vec<Inserted>> {
        let adapter = self.adapter;
        let engine = adapter.engine();
        let model = engine.model(model)?;

        let mut supplied = Vec::with_capacity(records.len());
        let mut batches: Vec<Vec<Record>> = vec![];

        for mut record in records {
            normalize::incoming(model, &mut record)?;
            let key = record
                .get(&model.primary_key)
                .filter(|value| !value.is_null())
                .cloned();

            let joins_last = batches.last().is_some_and(|batch| {
                engine.capability().multi_row_insert
                    && batch
                        .first()
                        .is_some_and(|first| same_columns(model, first, &record))
            });

            supplied.push(key);
            match batches.last_mut() {
                Some(batch) if joins_last => batch.push(record),
                _ => batches.push(vec![record]),
            }
        }

        let statements = batches
            .into_iter()
            .map(|batch| {
                let len = batch.len();
                let compiled = engine.compile(&Insert::new(&model.identity, batch).into())?;
                Ok((len, compiled))
            })
            .collect::<Result<Vec<(usize, CompiledQuery)>>>()?;

        if statements.is_empty() {
            return Ok(vec![]);
        }

        let mut connection = self.lease().await?;
        let mut ids = Vec::with_capacity(supplied.len());
        let mut supplied = supplied.into_iter();

        for (len, insert) in &statements {
            let report = exec(&mut *connection, insert, QueryKind::Insert).await?;
            let first = if model.generates_key() {
                report.inserted_id(None)
            } else {
                Value::Null
            };

            for offset in 0..*len {
                let id = match supplied.next().flatten() {
                    Some(id) => id,
                    None => match first {
                        // Rows of one statement get consecutive ids
                        Value::I64(first) => Value::I64(first + offset as i64),
                        _ => Value::Null,
                    },
                };
                ids.push(id);
            }
        }

        let mut fetched: IndexMap<Key, Record> = IndexMap::new();
        if meta.fetch {
            let keys = ids.iter().filter(|id| !id.is_null()).cloned().collect();
            for record in select_by_keys(engine, &mut *connection, model, keys).await? {
                if let Some(key) = record.get(&model.primary_key).and_then(Value::to_key) {
                    fetched.insert(key, record);
                }
            }
        }

        Ok(ids
            .into_iter()
            .map(|id| {
                let record = id.to_key().and_then(|key| fetched.get(&key).cloned());
                Inserted { id, record }
            })
            .collect())
    }

    /// Returns the records matching `criteria`.
    pub async fn find(&mut self, model: &str, criteria: &Criteria) -> Result<Vec<Record>> {
        let adapter = self.adapter;
        let engine = adapter.engine();
        let stmt: Statement = Select::from_criteria(model, criteria).into();
        let compiled = engine.compile(&stmt)?;

        let mut connection = self.lease().await?;
        engine
            .fetch_compiled(&mut *connection, &stmt, &compiled)
            .await
    }

    /// Returns the records matching `criteria` with their associations
    /// populated.
    ///
    /// Every association is validated before anything runs. Child
    /// statements run after the parent statement, on the same connection.
    pub async fn join(
        &mut self,
        model: &str,
        criteria: &Criteria,
        joins: &[JoinInstruction],
    ) -> Result<Vec<Record>> {
        let adapter = self.adapter;
        let plan = JoinPlan::new(adapter.engine(), model, criteria, joins)?;

        let mut connection = self.lease().await?;
        plan.run(&mut *connection).await
    }

    /// Sets `values` on every record matching the criteria's filter.
    ///
    /// With [`Meta::fetch`], the matching keys are selected first and the
    /// records re-selected after the update. If the update assigns the
    /// primary key, the record is re-selected under its new key.
    pub async fn update(
        &mut self,
        model: &str,
        criteria: &Criteria,
        values: Record,
        meta: Meta,
    ) -> Result<Affected> {
        let adapter = self.adapter;
        let engine = adapter.engine();
        let model = engine.model(model)?;

        let mut values = values;
        normalize::incoming(model, &mut values)?;
        let new_key = values
            .get(&model.primary_key)
            .filter(|value| !value.is_null())
            .cloned();

        let update = engine.compile(
            &Update::new(&model.identity, values, criteria.filter.clone()).into(),
        )?;

        let key_select = if meta.fetch {
            let mut select = Select::new(&model.identity);
            select.returning = Returning::Attributes(vec![model.primary_key.clone()]);
            select.filter = criteria.filter.clone();
            let stmt: Statement = select.into();
            let compiled = engine.compile(&stmt)?;
            Some((stmt, compiled))
        } else {
            None
        };

        let mut connection = self.lease().await?;

        let keys = match &key_select {
            Some((stmt, compiled)) => Some(
                engine
                    .fetch_compiled(&mut *connection, stmt, compiled)
                    .await?
                    .into_iter()
                    .filter_map(|mut record| record.shift_remove(&model.primary_key))
                    .collect::<Vec<_>>(),
            ),
            None => None,
        };

        let count = exec(&mut *connection, &update, QueryKind::Update)
            .await?
            .affected();

        let records = match keys {
            Some(keys) => {
                let keys = match new_key {
                    Some(new_key) if !keys.is_empty() => vec![new_key],
                    _ => keys,
                };
                Some(select_by_keys(engine, &mut *connection, model, keys).await?)
            }
            None => None,
        };

        Ok(Affected { count, records })
    }

    /// Deletes every record matching the criteria's filter.
    ///
    /// With [`Meta::fetch`], the records are selected before they are
    /// deleted.
    pub async fn destroy(
        &mut self,
        model: &str,
        criteria: &Criteria,
        meta: Meta,
    ) -> Result<Affected> {
        let adapter = self.adapter;
        let engine = adapter.engine();
        let model = engine.model(model)?;

        let delete =
            engine.compile(&Delete::new(&model.identity, criteria.filter.clone()).into())?;

        let doomed = if meta.fetch {
            let mut select = Select::new(&model.identity);
            select.filter = criteria.filter.clone();
            let stmt: Statement = select.into();
            let compiled = engine.compile(&stmt)?;
            Some((stmt, compiled))
        } else {
            None
        };

        let mut connection = self.lease().await?;

        let records = match &doomed {
            Some((stmt, compiled)) => Some(
                engine
                    .fetch_compiled(&mut *connection, stmt, compiled)
                    .await?,
            ),
            None => None,
        };

        let count = exec(&mut *connection, &delete, QueryKind::Destroy)
            .await?
            .affected();

        Ok(Affected { count, records })
    }

    /// Number of records matching the criteria's filter.
    pub async fn count(&mut self, model: &str, criteria: &Criteria) -> Result<u64> {
        let total = self.aggregate(model, criteria, Aggregate::Count).await?;
        Ok(total as u64)
    }

    /// Sum of a numeric attribute over the matching records. Zero when
    /// nothing matches.
    pub async fn sum(&mut self, model: &str, criteria: &Criteria, attribute: &str) -> Result<f64> {
        self.aggregate(model, criteria, Aggregate::Sum(attribute.to_string()))
            .await
    }

    /// Average of a numeric attribute over the matching records. Zero when
    /// nothing matches.
    pub async fn avg(&mut self, model: &str, criteria: &Criteria, attribute: &str) -> Result<f64> {
        self.aggregate(model, criteria, Aggregate::Avg(attribute.to_string()))
            .await
    }

    async fn aggregate(
        &mut self,
        model: &str,
        criteria: &Criteria,
        aggregate: Aggregate,
    ) -> Result<f64> {
        let adapter = self.adapter;
        let engine = adapter.engine();
        let model = engine.model(model)?;

        if let Aggregate::Sum(attribute) | Aggregate::Avg(attribute) = &aggregate {
            if model.resolve(attribute)?.ty != Type::Number {
                return Err(Error::malformed_criteria(format!(
                    "cannot {} non-numeric attribute `{attribute}`",
                    aggregate.column_alias()
                )));
            }
        }

        let alias = aggregate.column_alias();
        let stmt = Select::aggregate(&model.identity, aggregate, criteria.filter.clone());
        let compiled = engine.compile(&stmt.into())?;

        let mut connection = self.lease().await?;
        let rows = exec(&mut *connection, &compiled, QueryKind::Select)
            .await?
            .into_rows()?;

        let value = rows
            .into_iter()
            .next()
            .and_then(|row| {
                let mut row = row.into_inner();
                row.shift_remove(alias).or_else(|| row.into_values().next())
            })
            .unwrap_or_default();

        match value {
            Value::Null => Ok(0.0),
            value => value.to_f64().ok_or_else(|| {
                Error::parse(format!(
                    "`{alias}` returned a non-numeric {}",
                    value.kind_name()
                ))
            }),
        }
    }

    async fn lease(&mut self) -> Result<Lease<'_>> {
        if let Some(connection) = self.leased.as_deref_mut() {
            return Ok(Lease::Leased(connection));
        }

        let provider = self.adapter.provider();
        let connection = provider.acquire().await?;
        Ok(Lease::acquired(provider, connection))
    }
}

/// True when both records insert the same set of columns.
fn same_columns(model: &Model, a: &Record, b: &Record) -> bool {
    inserted(model, a) == inserted(model, b)
}

/// Sorted names of the columns an insert of `record` sets. A null primary
/// key is left out.
fn inserted<'r>(model: &Model, record: &'r Record) -> Vec<&'r str> {
    let mut names: Vec<&str> = record
        .iter()
        .filter(|(name, value)| !(**name == model.primary_key && value.is_null()))
        .map(|(name, _)| name.as_str())
        .collect();
    names.sort_unstable();
    names
}

/// Re-selects records by primary key.
async fn select_by_keys(
    engine: &Engine,
    connection: &mut dyn Connection,
    model: &Model,
    keys: Vec<Value>,
) -> Result<Vec<Record>> {
    let keys: Vec<Value> = keys.into_iter().filter(|key| !key.is_null()).collect();
    if keys.is_empty() {
        return Ok(vec![]);
    }

    let mut select = Select::new(&model.identity);
    select.filter = Some(match <[Value; 1]>::try_from(keys) {
        Ok([key]) => Predicate::eq(&model.primary_key, key),
        Err(keys) => Predicate::in_list(&model.primary_key, keys),
    });

    engine.fetch(connection, &select.into()).await
}
