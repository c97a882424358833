use super::Error;

/// Transport-level failure: a connection could not be acquired or was lost
/// while a statement was in flight.
#[derive(Debug)]
pub(super) struct ConnectionError {
    message: Box<str>,
    inner: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl ConnectionError {
    pub(super) fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.inner
            .as_deref()
            .map(|err| err as &(dyn std::error::Error + 'static))
    }
}

impl core::fmt::Display for ConnectionError {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(f, "connection error: {}", self.message)
    }
}

impl Error {
    /// Creates a connection error with a message.
    pub fn connection(message: impl Into<String>) -> Error {
        Error::from(super::ErrorKind::Connection(ConnectionError {
            message: message.into().into(),
            inner: None,
        }))
    }

    /// Creates a connection error wrapping the transport's own error.
    pub fn connection_from(err: impl std::error::Error + Send + Sync + 'static) -> Error {
        Error::from(super::ErrorKind::Connection(ConnectionError {
            message: err.to_string().into(),
            inner: Some(Box::new(err)),
        }))
    }

    /// Returns `true` if this error, or any error in its chain, is a connection error.
    pub fn is_connection(&self) -> bool {
        self.find_kind(|kind| match kind {
            super::ErrorKind::Connection(err) => Some(err),
            _ => None,
        })
        .is_some()
    }
}
