use super::Error;

/// Engine-independent classification of a rejected statement.
///
/// Callers branch on the footprint instead of on native error codes, which
/// differ between database engines.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Footprint {
    /// A uniqueness constraint was violated. `keys` names the offending
    /// columns (or index) when the engine reports them.
    NotUnique { keys: Vec<String> },

    /// The statement referenced a table that does not exist.
    NoSuchTable,

    /// The statement referenced a column that does not exist.
    NoSuchColumn,

    /// A NOT NULL column was given a null value.
    NotNull,

    /// A foreign key constraint rejected the write.
    ForeignKey,

    /// Anything the parser does not recognize.
    Catchall,
}

impl Footprint {
    /// The stable identity string, e.g. `notUnique`.
    pub fn identity(&self) -> &'static str {
        match self {
            Footprint::NotUnique { .. } => "notUnique",
            Footprint::NoSuchTable => "noSuchTable",
            Footprint::NoSuchColumn => "noSuchColumn",
            Footprint::NotNull => "notNull",
            Footprint::ForeignKey => "foreignKey",
            Footprint::Catchall => "catchall",
        }
    }
}

impl core::fmt::Display for Footprint {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        f.write_str(self.identity())
    }
}

#[derive(Debug)]
pub(super) struct QueryFailedError {
    footprint: Footprint,
    message: Box<str>,
}

impl std::error::Error for QueryFailedError {}

impl core::fmt::Display for QueryFailedError {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(f, "query failed ({}): {}", self.footprint, self.message)
    }
}

impl Error {
    /// Creates an error for a statement the database engine rejected.
    pub fn query_failed(footprint: Footprint, message: impl Into<String>) -> Error {
        Error::from(super::ErrorKind::QueryFailed(QueryFailedError {
            footprint,
            message: message.into().into(),
        }))
    }

    pub fn is_query_failed(&self) -> bool {
        self.footprint().is_some()
    }

    /// Returns the footprint of the first `QueryFailed` error in the chain.
    pub fn footprint(&self) -> Option<&Footprint> {
        self.find_kind(|kind| match kind {
            super::ErrorKind::QueryFailed(err) => Some(&err.footprint),
            _ => None,
        })
    }
}
