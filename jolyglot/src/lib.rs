#![warn(missing_docs)]
#![forbid(unsafe_code)]
#![doc = include_str!("../README.md")]

pub use jolyglot_core::*;

#[cfg(feature = "serde-json")]
pub use jolyglot_serde_json::SerdeJsonSpeaker;

#[cfg(feature = "simd-json")]
pub use jolyglot_simd_json::SimdJsonSpeaker;

#[cfg(feature = "facet-json")]
pub use jolyglot_facet_json::FacetJsonSpeaker;

/// The speaker used when the caller has no preference.
#[cfg(feature = "serde-json")]
pub type DefaultSpeaker = SerdeJsonSpeaker;
