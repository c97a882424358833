use super::Error;

/// A `ref` (binary) attribute was given something other than a byte buffer.
#[derive(Debug)]
pub(super) struct UnsupportedRefValueError {
    attribute: Box<str>,
    found: &'static str,
}

impl std::error::Error for UnsupportedRefValueError {}

impl core::fmt::Display for UnsupportedRefValueError {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(
            f,
            "unsupported ref value: attribute `{}` expects a byte buffer, found {}",
            self.attribute, self.found
        )
    }
}

impl Error {
    pub fn unsupported_ref_value(attribute: &str, found: &'static str) -> Error {
        Error::from(super::ErrorKind::UnsupportedRefValue(
            UnsupportedRefValueError {
                attribute: attribute.into(),
                found,
            },
        ))
    }

    pub fn is_unsupported_ref_value(&self) -> bool {
        self.find_kind(|kind| match kind {
            super::ErrorKind::UnsupportedRefValue(err) => Some(err),
            _ => None,
        })
        .is_some()
    }
}
