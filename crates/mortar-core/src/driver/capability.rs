/// SQL dialect spoken by a connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dialect {
    Mysql,
    Postgresql,
    Sqlite,
}

#[derive(Debug)]
pub struct Capability {
    pub dialect: Dialect,

    /// Multi-row `INSERT ... VALUES (..), (..)` is supported.
    pub multi_row_insert: bool,
}

impl Capability {
    /// SQLite capabilities.
    pub const SQLITE: Self = Self {
        dialect: Dialect::Sqlite,
        multi_row_insert: true,
    };

    /// PostgreSQL capabilities
    pub const POSTGRESQL: Self = Self {
        dialect: Dialect::Postgresql,
        ..Self::SQLITE
    };

    /// MySQL capabilities
    pub const MYSQL: Self = Self {
        dialect: Dialect::Mysql,
        ..Self::SQLITE
    };
}
