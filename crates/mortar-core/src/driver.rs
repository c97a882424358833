mod capability;
pub use capability::{Capability, Dialect};

mod native_error;
pub use native_error::{NativeError, NativeErrorKind};

mod response;
pub use response::{Response, Rows};

use crate::{async_trait, Result, Value};

use std::fmt::Debug;

/// Opens connections to a database.
#[async_trait]
pub trait Driver: Debug + Send + Sync + 'static {
    /// Describes the driver's capability, which informs the statement
    /// serializer.
    fn capability(&self) -> &'static Capability;

    /// Opens a new connection.
    async fn connect(&self) -> Result<Box<dyn Connection>>;

    /// Upper bound on concurrent connections the driver supports, if any.
    fn max_connections(&self) -> Option<usize> {
        None
    }
}

/// The native SQL execution transport.
///
/// A connection runs one statement at a time; the next statement is issued
/// only after the previous response has been received.
#[async_trait]
pub trait Connection: Debug + Send + 'static {
    fn capability(&self) -> &'static Capability;

    /// Executes `sql`, binding `params` positionally.
    async fn exec(
        &mut self,
        sql: &str,
        params: &[Value],
    ) -> std::result::Result<Response, NativeError>;
}

/// Hands out connections and takes them back.
///
/// Every connection obtained through [`acquire`](Self::acquire) is handed
/// back through exactly one [`release`](Self::release) call.
#[async_trait]
pub trait ConnectionProvider: Debug + Send + Sync + 'static {
    fn capability(&self) -> &'static Capability;

    async fn acquire(&self) -> Result<Box<dyn Connection>>;

    fn release(&self, connection: Box<dyn Connection>);
}
