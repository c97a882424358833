use super::Error;

/// An association references a model or key the registry does not know.
#[derive(Debug)]
pub(super) struct InvalidJoinCriteriaError {
    message: Box<str>,
}

impl std::error::Error for InvalidJoinCriteriaError {}

impl core::fmt::Display for InvalidJoinCriteriaError {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(f, "invalid join criteria: {}", self.message)
    }
}

impl Error {
    pub fn invalid_join_criteria(message: impl Into<String>) -> Error {
        Error::from(super::ErrorKind::InvalidJoinCriteria(
            InvalidJoinCriteriaError {
                message: message.into().into(),
            },
        ))
    }

    pub fn is_invalid_join_criteria(&self) -> bool {
        self.find_kind(|kind| match kind {
            super::ErrorKind::InvalidJoinCriteria(err) => Some(err),
            _ => None,
        })
        .is_some()
    }
}
