use super::Error;

/// The driver's result did not have the shape the query kind expects.
#[derive(Debug)]
pub(super) struct ParseError {
    message: Box<str>,
}

impl std::error::Error for ParseError {}

impl core::fmt::Display for ParseError {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(f, "could not parse query result: {}", self.message)
    }
}

impl Error {
    pub fn parse(message: impl Into<String>) -> Error {
        Error::from(super::ErrorKind::Parse(ParseError {
            message: message.into().into(),
        }))
    }

    pub fn is_parse(&self) -> bool {
        self.find_kind(|kind| match kind {
            super::ErrorKind::Parse(err) => Some(err),
            _ => None,
        })
        .is_some()
    }
}
