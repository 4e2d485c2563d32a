//! Construction dispatch.
//!
//! Takes a normalized source, composes the effective flags and hands both to the DTO's
//! hydration engine exactly once. The map is passed through untouched.

use crate::composer::compose;
use crate::config;
use crate::dto::Dto;
use crate::error::DtoError;
use crate::hydration::Hydration;
use crate::normalizer::Normalized;
use crate::registry;
use porter_domain::flags::Flags;
use std::any::type_name;
use tracing::debug;

/// Default flags of `D`: process defaults merged with the type's own.
///
/// Reads the process configuration on every call, so a changed `dto.flags` applies to the
/// next construction.
#[must_use]
pub fn default_flags<D: Dto>() -> Flags {
    config::flags() | D::DEFAULT_FLAGS
}

/// Builds `D` from a normalized source.
///
/// # Errors
/// Propagates the hydration engine's failure unchanged as [`DtoError::Hydration`].
pub fn construct<D: Dto>(normalized: Normalized, call_site: Flags) -> Result<D, DtoError> {
    let Normalized { source, forced } = normalized;
    let flags = compose(call_site, forced, D::DEFAULT_FLAGS, config::flags());
    let hydration = Hydration::new(flags).with_listener(registry::listener_for::<D>());

    debug!(
        dto = type_name::<D>(),
        %flags,
        keys = source.len(),
        listener = hydration.listener().is_some(),
        "Constructing DTO"
    );

    D::construct(source, &hydration).map_err(DtoError::from)
}
