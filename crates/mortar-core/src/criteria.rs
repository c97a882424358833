//! Declarative, database-agnostic query criteria.

mod from_json;

mod predicate;
pub use predicate::{Comparison, Op, Predicate};

mod sort;
pub use sort::{Direction, Sort};

/// Caller-supplied query: filter, sort, pagination and projection.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Criteria {
    /// The where-clause. `None` matches every record.
    pub filter: Option<Predicate>,

    /// Sort keys, applied in order
    pub sort: Vec<Sort>,

    pub limit: Option<u64>,

    pub skip: Option<u64>,

    /// Attributes to return. Empty means all attributes.
    pub select: Vec<String>,
}

impl Criteria {
    pub fn new() -> Criteria {
        Criteria::default()
    }

    pub fn filter(mut self, predicate: Predicate) -> Criteria {
        self.filter = Some(predicate);
        self
    }

    pub fn sort(mut self, attribute: impl Into<String>, direction: Direction) -> Criteria {
        self.sort.push(Sort {
            attribute: attribute.into(),
            direction,
        });
        self
    }

    pub fn limit(mut self, limit: u64) -> Criteria {
        self.limit = Some(limit);
        self
    }

    pub fn skip(mut self, skip: u64) -> Criteria {
        self.skip = Some(skip);
        self
    }

    pub fn select<I, S>(mut self, attributes: I) -> Criteria
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.select = attributes.into_iter().map(Into::into).collect();
        self
    }

    /// True when the criteria paginates its results.
    pub fn is_paginated(&self) -> bool {
        self.limit.is_some() || self.skip.is_some_and(|skip| skip > 0)
    }
}
