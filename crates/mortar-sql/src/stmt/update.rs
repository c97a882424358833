use super::Predicate;
use mortar_core::Record;

#[derive(Debug, Clone, PartialEq)]
pub struct Update {
    pub model: String,

    /// New values, keyed by attribute name
    pub assignments: Record,

    pub filter: Option<Predicate>,
}

impl Update {
    pub fn new(
        model: impl Into<String>,
        assignments: Record,
        filter: Option<Predicate>,
    ) -> Update {
        Update {
            model: model.into(),
            assignments,
            filter,
        }
    }
}
