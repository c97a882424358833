mod adapter;
pub use adapter::{
    Adapter, Affected, Builder, Inserted, Meta, Pool, PoolConfig, Session, Timeouts,
};

mod engine;
pub use engine::join::{JoinInstruction, JunctionSpec, Strategy};
pub use engine::{QueryKind, QueryReport};

pub use mortar_core::{
    criteria, driver, record, schema, Criteria, Error, Footprint, Key, Record, Result, Schema,
    Value,
};

pub use mortar_sql as sql;
