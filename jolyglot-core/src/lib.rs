#![warn(missing_docs)]
#![warn(clippy::std_instead_of_core)]
#![forbid(unsafe_code)]
#![doc = include_str!("../README.md")]

/// Trace-level logging macro that forwards to `tracing::trace!` when the `tracing` feature is enabled.
#[cfg(feature = "tracing")]
#[allow(unused_macros)]
macro_rules! trace {
    ($($arg:tt)*) => {
        ::tracing::trace!($($arg)*)
    };
}

/// Trace-level logging macro (no-op when `tracing` feature is disabled).
#[cfg(not(feature = "tracing"))]
#[allow(unused_macros)]
macro_rules! trace {
    ($($arg:tt)*) => {};
}

/// Debug-level logging macro that forwards to `tracing::debug!` when the `tracing` feature is enabled.
#[cfg(feature = "tracing")]
#[allow(unused_macros)]
macro_rules! debug {
    ($($arg:tt)*) => {
        ::tracing::debug!($($arg)*)
    };
}

/// Debug-level logging macro (no-op when `tracing` feature is disabled).
#[cfg(not(feature = "tracing"))]
#[allow(unused_macros)]
macro_rules! debug {
    ($($arg:tt)*) => {};
}

#[allow(unused_imports)]
pub(crate) use debug;
#[allow(unused_imports)]
pub(crate) use trace;

mod conform;
mod contract;
mod desc;
mod described;
mod error;
mod options;

pub use conform::{Conformer, DocPath, MismatchKind, PathSegment, ShapeMismatch};
pub use contract::{Jolyglot, JolyglotGenerics, TypeFactory};
pub use desc::{ArrayType, Class, ClassBuilder, ClassKind, Field, ParameterizedType, TypeDesc};
pub use described::Described;
pub use error::{Cause, Error, ErrorKind, Result, Stage, TypeShapeError};
pub use options::{SpeakerOptions, UnknownFields};

/// The document tree descriptors are checked against.
pub use serde_json::Value;
