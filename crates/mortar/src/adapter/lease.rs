use mortar_core::driver::{Connection, ConnectionProvider};

use std::ops::{Deref, DerefMut};

/// A connection held for the duration of one operation.
///
/// A connection acquired from the provider is released exactly once, when
/// the lease drops, whatever path the operation took. A connection leased
/// by the caller is only borrowed and is never released.
#[derive(Debug)]
pub(super) enum Lease<'a> {
    Acquired {
        provider: &'a dyn ConnectionProvider,
        connection: Option<Box<dyn Connection>>,
    },
    Leased(&'a mut dyn Connection),
}

impl<'a> Lease<'a> {
    pub(super) fn acquired(
        provider: &'a dyn ConnectionProvider,
        connection: Box<dyn Connection>,
    ) -> Lease<'a> {
        tracing::trace!("acquired connection");
        Lease::Acquired {
            provider,
            connection: Some(connection),
        }
    }
}

impl Deref for Lease<'_> {
    type Target = dyn Connection;

    fn deref(&self) -> &Self::Target {
        match self {
            Lease::Acquired {
                connection: Some(connection),
                ..
            } => &**connection,
            Lease::Acquired {
                connection: None, ..
            } => unreachable!("connection used after release"),
            Lease::Leased(connection) => &**connection,
        }
    }
}

impl DerefMut for Lease<'_> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        match self {
            Lease::Acquired {
                connection: Some(connection),
                ..
            } => &mut **connection,
            Lease::Acquired {
                connection: None, ..
            } => unreachable!("connection used after release"),
            Lease::Leased(connection) => &mut **connection,
        }
    }
}

impl Drop for Lease<'_> {
    fn drop(&mut self) {
        if let Lease::Acquired {
            provider,
            connection,
        } = self
        {
            if let Some(connection) = connection.take() {
                tracing::trace!("releasing connection");
                provider.release(connection);
            }
        }
    }
}
