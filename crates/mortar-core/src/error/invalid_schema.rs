use super::Error;

/// A model descriptor handed to the registry is inconsistent.
#[derive(Debug)]
pub(super) struct InvalidSchemaError {
    message: Box<str>,
}

impl std::error::Error for InvalidSchemaError {}

impl core::fmt::Display for InvalidSchemaError {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(f, "invalid schema: {}", self.message)
    }
}

impl Error {
    pub fn invalid_schema(message: impl Into<String>) -> Error {
        Error::from(super::ErrorKind::InvalidSchema(InvalidSchemaError {
            message: message.into().into(),
        }))
    }

    pub fn is_invalid_schema(&self) -> bool {
        self.find_kind(|kind| match kind {
            super::ErrorKind::InvalidSchema(err) => Some(err),
            _ => None,
        })
        .is_some()
    }
}
