use crate::Record;

/// Raw result of one statement, as returned by the transport.
#[derive(Debug, Clone, PartialEq)]
pub struct Response {
    pub rows: Rows,

    /// Identifier generated by an auto-increment column, when the statement
    /// was an insert and the engine reports one.
    pub last_insert_id: Option<u64>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Rows {
    /// Number of rows impacted by the operation
    Count(u64),

    /// Rows produced by the statement, keyed by column name
    Values(Vec<Record>),
}

impl Response {
    pub fn count(count: u64) -> Self {
        Self {
            rows: Rows::Count(count),
            last_insert_id: None,
        }
    }

    pub fn inserted(count: u64, last_insert_id: Option<u64>) -> Self {
        Self {
            rows: Rows::Count(count),
            last_insert_id,
        }
    }

    pub fn values(rows: Vec<Record>) -> Self {
        Self {
            rows: Rows::Values(rows),
            last_insert_id: None,
        }
    }
}

impl Rows {
    pub fn is_count(&self) -> bool {
        matches!(self, Self::Count(_))
    }

    pub fn is_values(&self) -> bool {
        matches!(self, Self::Values(_))
    }
}
