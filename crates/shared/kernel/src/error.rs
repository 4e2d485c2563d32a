use std::borrow::Cow;

/// Failure raised by a DTO's own hydration engine ([`crate::Dto::construct`]).
///
/// Porter never raises these itself; it forwards whatever the engine reports.
#[derive(Debug, thiserror::Error)]
pub enum HydrationError {
    /// A required property is absent and the call was not `PARTIAL`.
    #[error("Missing property{}: {property}", format_context(.context))]
    MissingProperty { property: Cow<'static, str>, context: Option<Cow<'static, str>> },

    /// The source carries a key the DTO does not declare and unknown keys are not ignored.
    #[error("Unknown property{}: {property}", format_context(.context))]
    UnknownProperty { property: Cow<'static, str>, context: Option<Cow<'static, str>> },

    /// A value could not be cast to the declared type.
    #[error("Cannot cast property '{property}' to {expected}{}", format_context(.context))]
    Cast {
        property: Cow<'static, str>,
        expected: Cow<'static, str>,
        context: Option<Cow<'static, str>>,
    },

    /// Internal fallback for unexpected engine faults.
    #[error("Internal hydration error{}: {message}", format_context(.context))]
    Internal { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
}

impl HydrationError {
    pub fn missing(property: impl Into<Cow<'static, str>>) -> Self {
        Self::MissingProperty { property: property.into(), context: None }
    }

    pub fn unknown(property: impl Into<Cow<'static, str>>) -> Self {
        Self::UnknownProperty { property: property.into(), context: None }
    }

    pub fn cast(
        property: impl Into<Cow<'static, str>>,
        expected: impl Into<Cow<'static, str>>,
    ) -> Self {
        Self::Cast { property: property.into(), expected: expected.into(), context: None }
    }
}

impl From<&'static str> for HydrationError {
    #[inline]
    fn from(s: &'static str) -> Self {
        Self::Internal { message: Cow::Borrowed(s), context: None }
    }
}

impl From<String> for HydrationError {
    #[inline]
    fn from(s: String) -> Self {
        Self::Internal { message: Cow::Owned(s), context: None }
    }
}

pub trait HydrationErrorExt<T> {
    fn context(self, context: impl Into<Cow<'static, str>>) -> Result<T, HydrationError>;
}

impl<T> HydrationErrorExt<T> for Result<T, HydrationError> {
    #[inline]
    fn context(self, context: impl Into<Cow<'static, str>>) -> Self {
        self.map_err(|mut e| {
            match &mut e {
                HydrationError::MissingProperty { context: c, .. }
                | HydrationError::UnknownProperty { context: c, .. }
                | HydrationError::Cast { context: c, .. }
                | HydrationError::Internal { context: c, .. } => *c = Some(context.into()),
            }
            e
        })
    }
}

/// Errors surfaced by the construction entry points.
///
/// Normalization itself only fails on a malformed JSON export; every other failure comes from
/// the hydration engine and is passed through untouched.
#[derive(Debug, thiserror::Error)]
pub enum DtoError {
    #[error("Malformed JSON source{}: {source}", format_context(.context))]
    MalformedJson { source: serde_json::Error, context: Option<Cow<'static, str>> },

    #[error("Hydration failed{}: {source}", format_context(.context))]
    Hydration { source: HydrationError, context: Option<Cow<'static, str>> },
}

impl DtoError {
    #[must_use]
    pub const fn is_malformed_json(&self) -> bool {
        matches!(self, Self::MalformedJson { .. })
    }

    #[must_use]
    pub const fn is_hydration(&self) -> bool {
        matches!(self, Self::Hydration { .. })
    }
}

impl From<serde_json::Error> for DtoError {
    #[inline]
    fn from(source: serde_json::Error) -> Self {
        Self::MalformedJson { source, context: None }
    }
}

impl From<HydrationError> for DtoError {
    #[inline]
    fn from(source: HydrationError) -> Self {
        Self::Hydration { source, context: None }
    }
}

pub trait DtoErrorExt<T> {
    fn context(self, context: impl Into<Cow<'static, str>>) -> Result<T, DtoError>;
}

impl<T> DtoErrorExt<T> for Result<T, DtoError> {
    #[inline]
    fn context(self, context: impl Into<Cow<'static, str>>) -> Self {
        self.map_err(|mut e| {
            match &mut e {
                DtoError::MalformedJson { context: c, .. }
                | DtoError::Hydration { context: c, .. } => *c = Some(context.into()),
            }
            e
        })
    }
}

impl<T> DtoErrorExt<T> for Result<T, serde_json::Error> {
    #[inline]
    fn context(self, context: impl Into<Cow<'static, str>>) -> Result<T, DtoError> {
        self.map_err(|source| DtoError::MalformedJson { source, context: Some(context.into()) })
    }
}

#[allow(clippy::ref_option)]
pub(crate) fn format_context(context: &Option<Cow<'static, str>>) -> Cow<'static, str> {
    context.as_ref().map_or(Cow::Borrowed(""), |c| Cow::Owned(format!(" ({c})")))
}
