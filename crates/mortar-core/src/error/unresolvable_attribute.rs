use super::Error;

/// A statement references an attribute absent from the model descriptor.
#[derive(Debug)]
pub(super) struct UnresolvableAttributeError {
    model: Box<str>,
    attribute: Box<str>,
}

impl std::error::Error for UnresolvableAttributeError {}

impl core::fmt::Display for UnresolvableAttributeError {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(
            f,
            "unresolvable attribute: model `{}` has no attribute `{}`",
            self.model, self.attribute
        )
    }
}

impl Error {
    pub fn unresolvable_attribute(model: &str, attribute: &str) -> Error {
        Error::from(super::ErrorKind::UnresolvableAttribute(
            UnresolvableAttributeError {
                model: model.into(),
                attribute: attribute.into(),
            },
        ))
    }

    pub fn is_unresolvable_attribute(&self) -> bool {
        self.find_kind(|kind| match kind {
            super::ErrorKind::UnresolvableAttribute(err) => Some(err),
            _ => None,
        })
        .is_some()
    }
}
