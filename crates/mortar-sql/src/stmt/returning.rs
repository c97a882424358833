#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Returning {
    /// The listed attributes; an empty list selects every attribute.
    Attributes(Vec<String>),

    /// A single aggregate, returned in a column named after the function
    /// (`count`, `sum` or `avg`).
    Aggregate(Aggregate),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Aggregate {
    Count,
    Sum(String),
    Avg(String),
}

impl Aggregate {
    pub fn column_alias(&self) -> &'static str {
        match self {
            Aggregate::Count => "count",
            Aggregate::Sum(_) => "sum",
            Aggregate::Avg(_) => "avg",
        }
    }
}

impl Default for Returning {
    fn default() -> Self {
        Returning::Attributes(vec![])
    }
}
