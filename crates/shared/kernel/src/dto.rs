use crate::collection::Collection;
use crate::dispatch;
use crate::error::{DtoError, HydrationError};
use crate::hydration::Hydration;
use crate::normalizer;
use crate::source::{Record, Request, SourceMap, SourceShape};
use porter_domain::flags::Flags;

/// A data transfer object Porter can build.
///
/// Implementors provide the hydration engine ([`Dto::construct`]); every other method is an
/// entry point that normalizes its input, composes the effective flags and calls it once.
///
/// ```rust
/// use porter_kernel::prelude::*;
///
/// #[derive(Debug, PartialEq)]
/// struct Greeting {
///     name: String,
/// }
///
/// impl Dto for Greeting {
///     const DEFAULT_FLAGS: Flags = Flags::IGNORE_UNKNOWN_PROPERTIES;
///
///     fn construct(mut source: SourceMap, hydration: &Hydration) -> Result<Self, HydrationError> {
///         let name = source.remove("name").ok_or_else(|| HydrationError::missing("name"))?;
///         let name = hydration.resolve("name", name);
///         let name = name.as_str().ok_or_else(|| HydrationError::cast("name", "string"))?;
///         Ok(Self { name: name.to_owned() })
///     }
/// }
///
/// let mut source = SourceMap::new();
/// source.insert("name".into(), "Porter".into());
/// let greeting = Greeting::from_source(&source, Flags::NONE).unwrap();
/// assert_eq!(greeting.name, "Porter");
/// ```
pub trait Dto: Sized + 'static {
    /// Flags this type always hydrates with.
    const DEFAULT_FLAGS: Flags = Flags::NONE;

    /// The hydration engine: validates `source` under `hydration` and builds the value.
    ///
    /// # Errors
    /// Any [`HydrationError`]; entry points forward it unchanged.
    fn construct(source: SourceMap, hydration: &Hydration) -> Result<Self, HydrationError>;

    /// Process defaults merged with [`Dto::DEFAULT_FLAGS`].
    #[must_use]
    fn default_flags() -> Flags {
        dispatch::default_flags::<Self>()
    }

    /// Builds from a map that is already canonical.
    ///
    /// # Errors
    /// Forwards the hydration failure.
    fn make(source: SourceMap, flags: Flags) -> Result<Self, DtoError> {
        dispatch::construct(normalizer::Normalized::plain(source), flags)
    }

    /// Builds from every field of `request`, forcing `PARTIAL | IGNORE_UNKNOWN_PROPERTIES`.
    ///
    /// # Errors
    /// Forwards the hydration failure.
    fn from_request<R: Request + ?Sized>(request: &R, flags: Flags) -> Result<Self, DtoError> {
        dispatch::construct(normalizer::from_request(request), flags)
    }

    /// Builds from the request installed for the current task.
    ///
    /// Without one, hydrates an empty map under the request flags.
    ///
    /// # Errors
    /// Forwards the hydration failure.
    fn from_current_request(flags: Flags) -> Result<Self, DtoError> {
        dispatch::construct(normalizer::from_current_request(), flags)
    }

    /// Builds from a record's attributes, forcing
    /// `PARTIAL | IGNORE_UNKNOWN_PROPERTIES | CAST_PRIMITIVES`.
    ///
    /// # Errors
    /// Forwards the hydration failure.
    fn from_model<M: Record + ?Sized>(record: &M, flags: Flags) -> Result<Self, DtoError> {
        dispatch::construct(normalizer::from_model(record), flags)
    }

    /// Builds from any source shape, picking its first supported capability.
    ///
    /// # Errors
    /// [`DtoError::MalformedJson`] for an unparsable JSON export, otherwise the hydration
    /// failure.
    fn from_source<S: SourceShape + ?Sized>(source: &S, flags: Flags) -> Result<Self, DtoError> {
        dispatch::construct(normalizer::from_generic(source)?, flags)
    }

    /// Builds from one collection item: records take the model path, the rest [`Dto::from_source`].
    ///
    /// # Errors
    /// See [`Dto::from_model`] and [`Dto::from_source`].
    fn from_item<S: SourceShape + ?Sized>(item: &S, flags: Flags) -> Result<Self, DtoError> {
        dispatch::construct(normalizer::from_item(item)?, flags)
    }

    /// Builds one DTO per item, keeping keys, order and cardinality.
    ///
    /// # Errors
    /// Stops at the first item that fails.
    fn from_collection<T: SourceShape>(
        collection: &Collection<T>,
        flags: Flags,
    ) -> Result<Collection<Self>, DtoError> {
        collection.try_map(|item| Self::from_item(item, flags))
    }
}
