#[macro_use]
mod macros;

pub mod criteria;
pub use criteria::Criteria;

pub mod driver;
pub use driver::Connection;

mod error;
pub use error::{Error, Footprint, IntoError};

pub mod schema;
pub use schema::Schema;

mod value;
pub use value::{Key, Record, Value};

/// A Result type alias that uses Mortar's [`Error`] type.
pub type Result<T> = core::result::Result<T, Error>;

pub use async_trait::async_trait;
