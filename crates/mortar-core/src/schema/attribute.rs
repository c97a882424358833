use serde::Deserialize;

/// Logical type of an attribute, which drives value normalization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Type {
    String,
    Number,
    Boolean,
    /// Stored as text, exposed as structured JSON.
    Json,
    /// Raw binary data.
    Ref,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute {
    /// Logical attribute name used in criteria and records
    pub name: String,

    /// Physical column name
    pub column_name: String,

    pub ty: Type,

    /// True when this attribute is the model's primary key. Set by the
    /// schema builder.
    pub primary_key: bool,

    /// True when the database assigns the value on insert.
    pub auto_increment: bool,
}

impl Attribute {
    /// Creates an attribute whose column has the same name.
    pub fn new(name: impl Into<String>, ty: Type) -> Attribute {
        let name = name.into();
        Attribute {
            column_name: name.clone(),
            name,
            ty,
            primary_key: false,
            auto_increment: false,
        }
    }

    pub fn column(mut self, column_name: impl Into<String>) -> Attribute {
        self.column_name = column_name.into();
        self
    }

    pub fn auto_increment(mut self) -> Attribute {
        self.auto_increment = true;
        self
    }
}
