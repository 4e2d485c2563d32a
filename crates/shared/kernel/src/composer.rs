//! Flag composition.
//!
//! The effective flags of a construction call are the union of the process defaults, the DTO
//! type's defaults, the call-site flags and the flags forced by the entry point. Union is
//! associative, commutative and idempotent, so no argument order can change the result and
//! no entry point can take a flag away.

use porter_domain::flags::Flags;

#[must_use]
pub const fn compose(
    call_site: Flags,
    forced: Flags,
    type_default: Flags,
    process_default: Flags,
) -> Flags {
    process_default.union(type_default).union(call_site).union(forced)
}

/// Folds any number of flag sets into one.
pub fn compose_all<I>(sets: I) -> Flags
where
    I: IntoIterator<Item = Flags>,
{
    sets.into_iter().fold(Flags::NONE, Flags::union)
}
