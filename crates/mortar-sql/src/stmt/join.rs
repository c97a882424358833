use mortar_core::Value;

/// A to-one association embedded in the parent select with a
/// `LEFT OUTER JOIN`.
///
/// The joined model's columns come back as `<alias>__<column>`.
#[derive(Debug, Clone, PartialEq)]
pub struct Join {
    /// Identity of the joined model
    pub model: String,

    /// Name of the association; also the SQL alias of the joined table
    pub alias: String,

    /// Attribute of the selecting model holding the foreign key
    pub parent_key: String,

    /// Attribute of the joined model the foreign key references
    pub child_key: String,

    /// Attributes of the joined model to return. Empty returns all.
    pub attributes: Vec<String>,
}

/// Restricts a select to rows linked, through a junction table, to a set of
/// parent keys.
///
/// The selected model is joined to the junction on
/// `junction.child_key = model.target_key` and rows are limited to
/// `junction.parent_key IN (parent_keys)`. The junction's parent key is
/// returned in the [`JUNCTION_PARENT_KEY`](super::JUNCTION_PARENT_KEY)
/// column.
#[derive(Debug, Clone, PartialEq)]
pub struct Junction {
    /// Identity of the junction model
    pub model: String,

    /// Junction attribute referencing the parent model
    pub parent_key: String,

    /// Junction attribute referencing the selected model
    pub child_key: String,

    /// Attribute of the selected model referenced by `child_key`
    pub target_key: String,

    pub parent_keys: Vec<Value>,
}
