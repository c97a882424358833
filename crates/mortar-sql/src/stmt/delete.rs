use super::Predicate;

#[derive(Debug, Clone, PartialEq)]
pub struct Delete {
    pub model: String,
    pub filter: Option<Predicate>,
}

impl Delete {
    pub fn new(model: impl Into<String>, filter: Option<Predicate>) -> Delete {
        Delete {
            model: model.into(),
            filter,
        }
    }
}
