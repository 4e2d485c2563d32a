use crate::constants::FLAG_SEPARATOR;
use bitflags::bitflags;
use serde::de::{self, SeqAccess, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

bitflags! {
    /// Behavior switches handed to a DTO's hydration engine.
    ///
    /// Bit values follow the base DTO vocabulary so they can be persisted or passed
    /// across process boundaries as plain integers. Every integer conversion (`From<u32>`,
    /// [`Flags::parse`], deserialization) keeps bits this crate does not name, so engine
    /// specific switches survive a round trip.
    #[derive(Debug, Default, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
    pub struct Flags: u32 {
        /// No special behavior.
        const NONE = 0;
        /// Extraneous input keys are silently dropped.
        const IGNORE_UNKNOWN_PROPERTIES = 1 << 0;
        /// Properties may be reassigned after construction.
        const MUTABLE = 1 << 1;
        /// Missing properties are tolerated.
        const PARTIAL = 1 << 2;
        /// Scalars are coerced to the declared primitive types.
        const CAST_PRIMITIVES = 1 << 3;
        const BOOL_DEFAULT_TO_FALSE = 1 << 4;
        const NULLABLE_DEFAULT_TO_NULL = 1 << 5;
        const ARRAY_DEFAULT_TO_EMPTY_ARRAY = 1 << 6;
    }
}

impl Flags {
    /// Parses a textual flag set.
    ///
    /// Accepts raw bits (`"6"`), a single name (`"partial"`, `"PARTIAL"`) or names joined
    /// with `|` (`"partial | mutable"`). Names are case-insensitive and `-` is treated as `_`.
    /// Returns `None` if any segment is neither a number nor a known flag name.
    #[must_use]
    pub fn parse(text: &str) -> Option<Self> {
        let text = text.trim();
        if text.is_empty() {
            return Some(Self::NONE);
        }
        if let Ok(bits) = text.parse::<u32>() {
            return Some(Self::from_bits_retain(bits));
        }

        text.split(FLAG_SEPARATOR).try_fold(Self::NONE, |acc, segment| {
            Self::from_flag_name(segment).map(|flag| acc | flag)
        })
    }

    fn from_flag_name(name: &str) -> Option<Self> {
        let normalized = name.trim().replace('-', "_").to_ascii_uppercase();
        Self::from_name(&normalized)
    }
}

impl From<u32> for Flags {
    fn from(bits: u32) -> Self {
        Self::from_bits_retain(bits)
    }
}

impl fmt::Display for Flags {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return f.write_str("NONE");
        }
        bitflags::parser::to_writer(self, f)
    }
}

impl Serialize for Flags {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_u32(self.bits())
    }
}

impl<'de> Deserialize<'de> for Flags {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_any(FlagsVisitor)
    }
}

struct FlagsVisitor;

impl<'de> Visitor<'de> for FlagsVisitor {
    type Value = Flags;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("flag bits, a flag name, a `|`-separated list of names, or a list of names")
    }

    fn visit_u64<E: de::Error>(self, value: u64) -> Result<Self::Value, E> {
        u32::try_from(value)
            .map(Flags::from_bits_retain)
            .map_err(|_| E::invalid_value(de::Unexpected::Unsigned(value), &self))
    }

    fn visit_i64<E: de::Error>(self, value: i64) -> Result<Self::Value, E> {
        u32::try_from(value)
            .map(Flags::from_bits_retain)
            .map_err(|_| E::invalid_value(de::Unexpected::Signed(value), &self))
    }

    fn visit_str<E: de::Error>(self, value: &str) -> Result<Self::Value, E> {
        Flags::parse(value).ok_or_else(|| E::invalid_value(de::Unexpected::Str(value), &self))
    }

    fn visit_unit<E: de::Error>(self) -> Result<Self::Value, E> {
        Ok(Flags::NONE)
    }

    fn visit_seq<A>(self, mut seq: A) -> Result<Self::Value, A::Error>
    where
        A: SeqAccess<'de>,
    {
        let mut flags = Flags::NONE;
        while let Some(item) = seq.next_element::<Flags>()? {
            flags |= item;
        }
        Ok(flags)
    }
}
