use mortar_core::Record;

/// Inserts one or more records.
///
/// Records are keyed by attribute name. A null primary key is dropped when
/// the statement is serialized so the database assigns one. All records of
/// one statement must end up with the same set of columns.
#[derive(Debug, Clone, PartialEq)]
pub struct Insert {
    pub model: String,
    pub records: Vec<Record>,
}

impl Insert {
    pub fn new(model: impl Into<String>, records: Vec<Record>) -> Insert {
        Insert {
            model: model.into(),
            records,
        }
    }
}
