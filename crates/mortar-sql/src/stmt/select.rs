use super::{Aggregate, Join, Junction, Predicate, Returning, Sort};
use mortar_core::Criteria;

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Select {
    /// Identity of the selected model
    pub model: String,

    pub returning: Returning,

    /// Embedded to-one joins
    pub joins: Vec<Join>,

    pub junction: Option<Junction>,

    pub filter: Option<Predicate>,

    pub order_by: Vec<Sort>,

    pub limit: Option<u64>,

    pub offset: Option<u64>,
}

impl Select {
    pub fn new(model: impl Into<String>) -> Select {
        Select {
            model: model.into(),
            ..Default::default()
        }
    }

    /// Builds a select from query criteria.
    pub fn from_criteria(model: impl Into<String>, criteria: &Criteria) -> Select {
        Select {
            model: model.into(),
            returning: Returning::Attributes(criteria.select.clone()),
            joins: vec![],
            junction: None,
            filter: criteria.filter.clone(),
            order_by: criteria.sort.clone(),
            limit: criteria.limit,
            offset: criteria.skip,
        }
    }

    /// Builds an aggregate select. Sort and pagination do not apply.
    pub fn aggregate(
        model: impl Into<String>,
        aggregate: Aggregate,
        filter: Option<Predicate>,
    ) -> Select {
        Select {
            model: model.into(),
            returning: Returning::Aggregate(aggregate),
            filter,
            ..Default::default()
        }
    }

    /// ANDs `predicate` onto the existing filter.
    pub fn and_filter(&mut self, predicate: Predicate) {
        self.filter = Some(match self.filter.take() {
            Some(existing) => Predicate::And(vec![predicate, existing]),
            None => predicate,
        });
    }
}
