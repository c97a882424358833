mod delete;
pub use delete::Delete;

mod insert;
pub use insert::Insert;

mod join;
pub use join::{Join, Junction};

mod returning;
pub use returning::{Aggregate, Returning};

mod select;
pub use select::Select;

mod update;
pub use update::Update;

pub use mortar_core::criteria::{Comparison, Direction, Op, Predicate, Sort};

/// Separates a joined alias from the column name in embedded-join result
/// columns, e.g. `owner__id`.
pub const ALIAS_SEPARATOR: &str = "__";

/// Result column carrying the junction's parent-side key in a
/// many-to-many child statement. Stripped before rows reach the caller.
pub const JUNCTION_PARENT_KEY: &str = "__junction_parent_key";

/// Engine-agnostic representation of a single SQL operation.
///
/// Statements reference models and attributes by their logical names; the
/// serializer resolves them to tables and columns.
#[derive(Debug, Clone, PartialEq)]
pub enum Statement {
    Delete(Delete),
    Insert(Insert),
    Query(Select),
    /// `UNION ALL` of independent selects sharing one projection
    Union(Vec<Select>),
    Update(Update),
}

impl Statement {
    pub fn is_query(&self) -> bool {
        matches!(self, Statement::Query(_) | Statement::Union(_))
    }

    /// Identity of the model the statement operates on.
    pub fn model(&self) -> Option<&str> {
        match self {
            Statement::Delete(stmt) => Some(&stmt.model),
            Statement::Insert(stmt) => Some(&stmt.model),
            Statement::Query(stmt) => Some(&stmt.model),
            Statement::Union(selects) => selects.first().map(|stmt| &stmt.model[..]),
            Statement::Update(stmt) => Some(&stmt.model),
        }
    }
}

impl From<Delete> for Statement {
    fn from(value: Delete) -> Self {
        Statement::Delete(value)
    }
}

impl From<Insert> for Statement {
    fn from(value: Insert) -> Self {
        Statement::Insert(value)
    }
}

impl From<Select> for Statement {
    fn from(value: Select) -> Self {
        Statement::Query(value)
    }
}

impl From<Update> for Statement {
    fn from(value: Update) -> Self {
        Statement::Update(value)
    }
}
