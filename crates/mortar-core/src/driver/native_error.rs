/// Error as reported by the database engine or its client library.
///
/// The execution engine turns this into a [`crate::Error`]: transport
/// failures become connection errors, rejected statements are classified
/// into a [`crate::Footprint`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NativeError {
    pub kind: NativeErrorKind,

    /// Engine-specific code, either a symbolic name (`ER_DUP_ENTRY`) or a
    /// SQLSTATE (`23505`).
    pub code: Option<String>,

    pub message: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NativeErrorKind {
    /// The connection failed or was lost.
    Transport,

    /// The engine rejected the statement.
    Statement,
}

impl NativeError {
    pub fn transport(message: impl Into<String>) -> NativeError {
        NativeError {
            kind: NativeErrorKind::Transport,
            code: None,
            message: message.into(),
        }
    }

    pub fn statement(code: Option<String>, message: impl Into<String>) -> NativeError {
        NativeError {
            kind: NativeErrorKind::Statement,
            code,
            message: message.into(),
        }
    }

    pub fn is_transport(&self) -> bool {
        self.kind == NativeErrorKind::Transport
    }
}

impl std::error::Error for NativeError {}

impl core::fmt::Display for NativeError {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        match &self.code {
            Some(code) => write!(f, "{code}: {}", self.message),
            None => f.write_str(&self.message),
        }
    }
}
