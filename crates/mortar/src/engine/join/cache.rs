use indexmap::IndexMap;
use mortar_core::{Key, Record, Value};

/// Associated records gathered for one join, keyed by alias and then by
/// parent primary key.
///
/// Every parent gets an entry for every alias as soon as it is seen, so a
/// parent without children ends up with an empty list (or null) rather than
/// a missing field.
#[derive(Debug, Default)]
pub(super) struct QueryCache {
    aliases: IndexMap<String, IndexMap<Key, Entry>>,
}

#[derive(Debug, Clone)]
enum Entry {
    /// To-one association
    One(Option<Record>),

    /// To-many association
    Many(Vec<Record>),
}

impl QueryCache {
    /// Registers `parent` under `alias` with no associated records yet.
    pub(super) fn init(&mut self, parent: &Key, alias: &str, single: bool) {
        self.entries(alias).entry(parent.clone()).or_insert_with(|| {
            if single {
                Entry::One(None)
            } else {
                Entry::Many(vec![])
            }
        });
    }

    /// Sets the single record of a to-one association.
    pub(super) fn set(&mut self, parent: &Key, alias: &str, record: Record) {
        self.entries(alias)
            .insert(parent.clone(), Entry::One(Some(record)));
    }

    /// Appends a record to a to-many association.
    pub(super) fn push(&mut self, parent: &Key, alias: &str, record: Record) {
        let entry = self
            .entries(alias)
            .entry(parent.clone())
            .or_insert(Entry::Many(vec![]));

        match entry {
            Entry::Many(records) => records.push(record),
            Entry::One(one) => *one = Some(record),
        }
    }

    /// The association value for `parent`, ready to be attached to its
    /// record.
    pub(super) fn get(&self, parent: &Key, alias: &str) -> Value {
        match self.aliases.get(alias).and_then(|entries| entries.get(parent)) {
            Some(Entry::One(Some(record))) => Value::Record(record.clone()),
            Some(Entry::One(None)) => Value::Null,
            Some(Entry::Many(records)) => {
                Value::List(records.iter().cloned().map(Value::Record).collect())
            }
            None => Value::List(vec![]),
        }
    }

    fn entries(&mut self, alias: &str) -> &mut IndexMap<Key, Entry> {
        if !self.aliases.contains_key(alias) {
            self.aliases.insert(alias.to_string(), IndexMap::new());
        }
        &mut self.aliases[alias]
    }
}
