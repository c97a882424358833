use super::Error;

/// The criteria is structurally invalid or uses an unsupported operator.
///
/// Raised before any connection is acquired; never retried.
#[derive(Debug)]
pub(super) struct MalformedCriteriaError {
    message: Box<str>,
}

impl std::error::Error for MalformedCriteriaError {}

impl core::fmt::Display for MalformedCriteriaError {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(f, "malformed criteria: {}", self.message)
    }
}

impl Error {
    pub fn malformed_criteria(message: impl Into<String>) -> Error {
        Error::from(super::ErrorKind::MalformedCriteria(MalformedCriteriaError {
            message: message.into().into(),
        }))
    }

    pub fn is_malformed_criteria(&self) -> bool {
        self.find_kind(|kind| match kind {
            super::ErrorKind::MalformedCriteria(err) => Some(err),
            _ => None,
        })
        .is_some()
    }
}
