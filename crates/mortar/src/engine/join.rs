//! Loading associations alongside a query.
//!
//! To-one associations whose foreign key lives on the parent are embedded in
//! the parent select. Every other association is loaded with one batched
//! child statement per association, constrained to the keys gathered from
//! the parent rows, and the results are recombined through a
//! [`QueryCache`].

mod cache;
use cache::QueryCache;

use super::{exec, normalize, Engine, QueryKind};

use indexmap::IndexMap;
use mortar_core::{
    criteria::Predicate, driver::Connection, schema::Model, Criteria, Error, Key, Record, Result,
    Value,
};
use mortar_sql::{
    stmt::{self, Returning, Select, ALIAS_SEPARATOR, JUNCTION_PARENT_KEY},
    CompiledQuery, Statement,
};

/// One association to populate.
#[derive(Debug, Clone, PartialEq)]
pub struct JoinInstruction {
    /// Field of the output record that receives the associated value
    pub alias: String,

    /// Model being queried
    pub parent_model: String,

    /// Attribute of the parent used for matching. The foreign key for
    /// [`Strategy::DirectFk`], usually the primary key otherwise.
    pub parent_key: String,

    /// Associated model
    pub child_model: String,

    /// Attribute of the child used for matching. The child's primary key for
    /// [`Strategy::DirectFk`], the referenced key for
    /// [`Strategy::ManyToMany`], the foreign key
    /// for [`Strategy::ReverseFk`].
    pub child_key: String,

    pub strategy: Strategy,

    /// Criteria applied to the associated records. Only the projection
    /// applies to [`Strategy::DirectFk`].
    pub criteria: Criteria,
}

/// How an association is resolved.
#[derive(Debug, Clone, PartialEq)]
pub enum Strategy {
    /// The parent holds the foreign key. Yields a single record or null.
    DirectFk,

    /// The child holds the foreign key. Yields a list.
    ReverseFk,

    /// Parent and child are linked through a junction model. Yields a
    /// list.
    ManyToMany(JunctionSpec),
}

#[derive(Debug, Clone, PartialEq)]
pub struct JunctionSpec {
    /// Identity of the junction model
    pub model: String,

    /// Junction attribute holding the parent's `parent_key`
    pub parent_key: String,

    /// Junction attribute holding the child's `child_key`
    pub child_key: String,
}

impl JunctionSpec {
    pub fn new(
        model: impl Into<String>,
        parent_key: impl Into<String>,
        child_key: impl Into<String>,
    ) -> JunctionSpec {
        JunctionSpec {
            model: model.into(),
            parent_key: parent_key.into(),
            child_key: child_key.into(),
        }
    }
}

impl JoinInstruction {
    /// A to-one association through a foreign key held by the parent.
    pub fn direct_fk(
        alias: impl Into<String>,
        parent: (&str, &str),
        child: (&str, &str),
    ) -> JoinInstruction {
        JoinInstruction::new(alias, parent, child, Strategy::DirectFk)
    }

    /// A to-many association through a foreign key held by the child.
    pub fn reverse_fk(
        alias: impl Into<String>,
        parent: (&str, &str),
        child: (&str, &str),
    ) -> JoinInstruction {
        JoinInstruction::new(alias, parent, child, Strategy::ReverseFk)
    }

    /// A to-many association through a junction model.
    pub fn many_to_many(
        alias: impl Into<String>,
        parent: (&str, &str),
        child: (&str, &str),
        junction: JunctionSpec,
    ) -> JoinInstruction {
        JoinInstruction::new(alias, parent, child, Strategy::ManyToMany(junction))
    }

    fn new(
        alias: impl Into<String>,
        (parent_model, parent_key): (&str, &str),
        (child_model, child_key): (&str, &str),
        strategy: Strategy,
    ) -> JoinInstruction {
        JoinInstruction {
            alias: alias.into(),
            parent_model: parent_model.to_string(),
            parent_key: parent_key.to_string(),
            child_model: child_model.to_string(),
            child_key: child_key.to_string(),
            strategy,
            criteria: Criteria::default(),
        }
    }

    pub fn criteria(mut self, criteria: Criteria) -> JoinInstruction {
        self.criteria = criteria;
        self
    }

    fn is_single(&self) -> bool {
        matches!(self.strategy, Strategy::DirectFk)
    }
}

/// A validated join, with its parent statement compiled.
#[derive(Debug)]
pub(crate) struct JoinPlan<'a> {
    engine: &'a Engine,
    model: &'a Model,
    parent: CompiledQuery,
    associations: Vec<Association<'a>>,
}

#[derive(Debug)]
struct Association<'a> {
    instruction: &'a JoinInstruction,
    child: &'a Model,
}

impl<'a> JoinPlan<'a> {
    /// Validates every instruction and compiles the parent statement.
    ///
    /// Nothing is executed: an invalid association fails here, before a
    /// connection is needed.
    pub(crate) fn new(
        engine: &'a Engine,
        model: &str,
        criteria: &Criteria,
        joins: &'a [JoinInstruction],
    ) -> Result<JoinPlan<'a>> {
        let model = engine.model(model)?;

        let mut associations = Vec::with_capacity(joins.len());
        for instruction in joins {
            let association = Association::validate(engine, model, instruction)?;
            if associations
                .iter()
                .any(|other: &Association<'_>| other.instruction.alias == instruction.alias)
            {
                return Err(Error::invalid_join_criteria(format!(
                    "alias `{}` is used by more than one association",
                    instruction.alias
                )));
            }
            associations.push(association);
        }

        let mut parent = Select::from_criteria(&model.identity, criteria);
        let mut required = vec![model.primary_key.as_str()];
        required.extend(associations.iter().map(|a| a.instruction.parent_key.as_str()));
        ensure_selected(&mut parent, &required);

        for association in &associations {
            if let Strategy::DirectFk = association.instruction.strategy {
                parent.joins.push(association.embedded());
            }
        }

        let parent = engine.compile(&parent.into())?;

        // Compiling each child statement once surfaces unresolvable
        // attributes before anything runs.
        for association in &associations {
            if !association.instruction.is_single() {
                engine.compile(&association.child_statement(vec![Value::Null]))?;
            }
        }

        Ok(JoinPlan {
            engine,
            model,
            parent,
            associations,
        })
    }

    /// Runs the parent statement, then one child statement per to-many
    /// association, and nests the children under their parents.
    ///
    /// Statements run one after the other on `connection`. Any failure
    /// discards everything gathered so far.
    pub(crate) async fn run(self, connection: &mut dyn Connection) -> Result<Vec<Record>> {
        let rows = exec(connection, &self.parent, QueryKind::Select)
            .await?
            .into_rows()?;

        let mut cache = QueryCache::default();
        let mut parents = Vec::with_capacity(rows.len());

        for row in rows {
            let (row, embedded) = self.split(row)?;
            let record = normalize::outgoing(self.model, row)?;

            let Some(key) = record.get(&self.model.primary_key).and_then(Value::to_key) else {
                return Err(Error::parse(format!(
                    "`{}` row has no primary key value",
                    self.model.identity
                )));
            };

            for association in &self.associations {
                let instruction = association.instruction;
                cache.init(&key, &instruction.alias, instruction.is_single());
            }

            for (alias, child) in embedded {
                cache.set(&key, alias, child);
            }

            parents.push((key, record));
        }

        if parents.is_empty() || self.associations.is_empty() {
            return Ok(parents.into_iter().map(|(_, record)| record).collect());
        }

        for association in &self.associations {
            if association.instruction.is_single() {
                continue;
            }
            association
                .load(self.engine, connection, &parents, &mut cache)
                .await?;
        }

        Ok(parents
            .into_iter()
            .map(|(key, mut record)| {
                for association in &self.associations {
                    let alias = &association.instruction.alias;
                    record.insert(alias.clone(), cache.get(&key, alias));
                }
                record
            })
            .collect())
    }

    /// Separates embedded to-one columns (`<alias>__<column>`) from the
    /// parent's own columns.
    fn split(&self, row: Record) -> Result<(Record, Vec<(&'a str, Record)>)> {
        let mut parent = Record::with_capacity(row.len());
        let mut embedded: Vec<(&Association<'a>, Record)> = vec![];

        'columns: for (column, value) in row {
            for association in &self.associations {
                if !association.instruction.is_single() {
                    continue;
                }

                let alias = &association.instruction.alias;
                let Some(child_column) = column
                    .strip_prefix(alias.as_str())
                    .and_then(|rest| rest.strip_prefix(ALIAS_SEPARATOR))
                else {
                    continue;
                };

                let child_column = child_column.to_string();
                match embedded
                    .iter_mut()
                    .find(|(other, _)| std::ptr::eq(*other, association))
                {
                    Some((_, record)) => {
                        record.insert(child_column, value);
                    }
                    None => {
                        let mut record = Record::new();
                        record.insert(child_column, value);
                        embedded.push((association, record));
                    }
                }
                continue 'columns;
            }

            parent.insert(column, value);
        }

        let mut matched = Vec::with_capacity(embedded.len());
        for (association, child) in embedded {
            let instruction = association.instruction;
            let child = normalize::outgoing(association.child, child)?;

            // A LEFT OUTER JOIN without a match yields nulls
            let child_key = child.get(&instruction.child_key).and_then(Value::to_key);
            let parent_key = resolve_value(self.model, &parent, &instruction.parent_key)
                .and_then(Value::to_key);

            if child_key.is_some() && child_key == parent_key {
                matched.push((instruction.alias.as_str(), child));
            }
        }

        Ok((parent, matched))
    }
}

impl<'a> Association<'a> {
    fn validate(
        engine: &'a Engine,
        parent: &Model,
        instruction: &'a JoinInstruction,
    ) -> Result<Association<'a>> {
        let alias = &instruction.alias;
        let invalid = |message: String| Error::invalid_join_criteria(message);

        if alias.is_empty() {
            return Err(invalid("association alias is empty".to_string()));
        }

        if instruction.parent_model != parent.identity {
            return Err(invalid(format!(
                "association `{alias}` starts from `{}`, but the query is on `{}`",
                instruction.parent_model, parent.identity
            )));
        }

        let child = engine.schema.model(&instruction.child_model).ok_or_else(|| {
            invalid(format!(
                "association `{alias}` targets unknown model `{}`",
                instruction.child_model
            ))
        })?;

        if child.primary_key_attribute().is_none() {
            return Err(invalid(format!(
                "model `{}` targeted by `{alias}` has no primary key",
                child.identity
            )));
        }

        if parent.get_attribute(&instruction.parent_key).is_none() {
            return Err(invalid(format!(
                "association `{alias}`: `{}` has no attribute `{}`",
                parent.identity, instruction.parent_key
            )));
        }

        if child.get_attribute(&instruction.child_key).is_none() {
            return Err(invalid(format!(
                "association `{alias}`: `{}` has no attribute `{}`",
                child.identity, instruction.child_key
            )));
        }

        match &instruction.strategy {
            Strategy::DirectFk => {
                // Matching on anything but the primary key could join
                // several rows to one parent
                if instruction.child_key != child.primary_key {
                    return Err(invalid(format!(
                        "to-one association `{alias}` must reference the primary key of `{}`",
                        child.identity
                    )));
                }

                let criteria = &instruction.criteria;
                if criteria.filter.is_some()
                    || !criteria.sort.is_empty()
                    || criteria.is_paginated()
                {
                    return Err(invalid(format!(
                        "to-one association `{alias}` accepts a projection only"
                    )));
                }
            }
            Strategy::ReverseFk => {}
            Strategy::ManyToMany(junction) => {
                let Some(through) = engine.schema.model(&junction.model) else {
                    return Err(invalid(format!(
                        "association `{alias}` goes through unknown model `{}`",
                        junction.model
                    )));
                };

                for key in [&junction.parent_key, &junction.child_key] {
                    if through.get_attribute(key).is_none() {
                        return Err(invalid(format!(
                            "association `{alias}`: junction `{}` has no attribute `{key}`",
                            through.identity
                        )));
                    }
                }
            }
        }

        Ok(Association { instruction, child })
    }

    /// The to-one join embedded in the parent select.
    fn embedded(&self) -> stmt::Join {
        let instruction = self.instruction;
        let mut attributes = instruction.criteria.select.clone();
        if !attributes.is_empty() && !attributes.contains(&instruction.child_key) {
            attributes.push(instruction.child_key.clone());
        }

        stmt::Join {
            model: self.child.identity.clone(),
            alias: instruction.alias.clone(),
            parent_key: instruction.parent_key.clone(),
            child_key: instruction.child_key.clone(),
            attributes,
        }
    }

    /// Selects the children of every parent in `keys`.
    ///
    /// Paginated criteria apply per parent, so each parent gets its own
    /// sub-select and the results are combined with `UNION ALL`.
    fn child_statement(&self, keys: Vec<Value>) -> Statement {
        let criteria = &self.instruction.criteria;

        if criteria.is_paginated() && keys.len() > 1 {
            Statement::Union(keys.into_iter().map(|key| self.child_select(vec![key])).collect())
        } else {
            self.child_select(keys).into()
        }
    }

    fn child_select(&self, keys: Vec<Value>) -> Select {
        let instruction = self.instruction;
        let mut select = Select::from_criteria(&self.child.identity, &instruction.criteria);
        ensure_selected(
            &mut select,
            &[
                self.child.primary_key.as_str(),
                instruction.child_key.as_str(),
            ],
        );

        match &instruction.strategy {
            Strategy::ManyToMany(junction) => {
                select.junction = Some(stmt::Junction {
                    model: junction.model.clone(),
                    parent_key: junction.parent_key.clone(),
                    child_key: junction.child_key.clone(),
                    target_key: instruction.child_key.clone(),
                    parent_keys: keys,
                });
            }
            Strategy::ReverseFk | Strategy::DirectFk => {
                select.and_filter(Predicate::in_list(&instruction.child_key, keys));
            }
        }

        select
    }

    /// Runs the child statement and files each child under its parents.
    async fn load(
        &self,
        engine: &Engine,
        connection: &mut dyn Connection,
        parents: &[(Key, Record)],
        cache: &mut QueryCache,
    ) -> Result<()> {
        let instruction = self.instruction;

        // Distinct join values, in parent order, and the parents sharing each
        let mut linked: IndexMap<Key, (Value, Vec<&Key>)> = IndexMap::new();
        for (key, record) in parents {
            let Some(value) = record.get(&instruction.parent_key) else {
                continue;
            };
            let Some(link) = value.to_key() else {
                continue;
            };
            linked
                .entry(link)
                .or_insert_with(|| (value.clone(), vec![]))
                .1
                .push(key);
        }

        if linked.is_empty() {
            return Ok(());
        }

        let keys = linked.values().map(|(value, _)| value.clone()).collect();
        let compiled = engine.compile(&self.child_statement(keys))?;
        let rows = exec(connection, &compiled, QueryKind::Select)
            .await?
            .into_rows()?;

        for mut row in rows {
            let junction_key = match instruction.strategy {
                Strategy::ManyToMany(_) => Some(row.shift_remove(JUNCTION_PARENT_KEY).ok_or_else(
                    || Error::parse(format!("`{}` rows lack the junction key", instruction.alias)),
                )?),
                Strategy::ReverseFk | Strategy::DirectFk => None,
            };

            let child = normalize::outgoing(self.child, row)?;

            let link = match &junction_key {
                Some(value) => value.to_key(),
                None => child.get(&instruction.child_key).and_then(Value::to_key),
            };

            let Some((_, owners)) = link.and_then(|link| linked.get(&link)) else {
                continue;
            };

            for parent in owners {
                cache.push(parent, &instruction.alias, child.clone());
            }
        }

        Ok(())
    }
}

/// Adds `attributes` to an explicit projection. An empty projection already
/// selects everything.
fn ensure_selected(select: &mut Select, attributes: &[&str]) {
    if let Returning::Attributes(selected) = &mut select.returning {
        if selected.is_empty() {
            return;
        }
        for attribute in attributes {
            if !selected.iter().any(|name| name == attribute) {
                selected.push(attribute.to_string());
            }
        }
    }
}

/// Looks up an attribute in a row that may still be keyed by column.
fn resolve_value<'r>(model: &Model, record: &'r Record, attribute: &str) -> Option<&'r Value> {
    record.get(attribute).or_else(|| {
        model
            .get_attribute(attribute)
            .and_then(|attribute| record.get(&attribute.column_name))
    })
}
