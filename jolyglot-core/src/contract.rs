//! The contracts speakers implement.
//!
//! Both traits are parameterized by the value type rather than having
//! generic methods, so a backend can require whatever bound its engine
//! needs (`serde::Serialize`, `facet::Facet`, ...) and callers can still
//! hold a `&dyn JolyglotGenerics<Wrapper<Mock>>`.

use std::path::Path;
use std::sync::Arc;

use crate::desc::{Class, TypeDesc};
use crate::error::Result;

/// Encode and decode values of `T` using their own shape.
pub trait Jolyglot<T> {
    /// Serialize `src` into its JSON representation.
    fn to_json(&self, src: &T) -> Result<String>;

    /// Deserialize a `T` from JSON text.
    ///
    /// Undeclared object keys are handled by `T` itself; derived serde
    /// implementations ignore them unless the type opts out.
    fn from_json(&self, json: &str) -> Result<T>;

    /// Deserialize a `T` from the JSON file at `path`.
    ///
    /// A file that cannot be opened or read is an
    /// [`ErrorKind::Io`](crate::ErrorKind::Io) error, never a decoding one.
    fn from_json_file(&self, path: &Path) -> Result<T>;
}

/// Builds descriptors. Every generic-aware speaker is one.
pub trait TypeFactory {
    /// An array type whose elements are all `component_type`.
    fn array_of(&self, component_type: TypeDesc) -> TypeDesc {
        TypeDesc::array_of(component_type)
    }

    /// Apply `raw_type` to `type_arguments`.
    ///
    /// Fails with [`ErrorKind::InvalidTypeShape`](crate::ErrorKind::InvalidTypeShape)
    /// when the number of arguments does not match the class arity.
    fn new_parameterized_type(
        &self,
        raw_type: &Arc<Class>,
        type_arguments: Vec<TypeDesc>,
    ) -> Result<TypeDesc> {
        Ok(TypeDesc::parameterized(raw_type, type_arguments)?)
    }
}

/// Encode and decode values of `T` following an explicit descriptor.
///
/// The descriptor decides which fields are written and read, so a
/// `serde_json::Value` can be decoded as `MockParameterized<Any>` and
/// still be checked for its `s1` field.
pub trait JolyglotGenerics<T>: Jolyglot<T> + TypeFactory {
    /// Serialize `src` with the shape described by `type_of_src`.
    fn to_json_typed(&self, src: &T, type_of_src: &TypeDesc) -> Result<String>;

    /// Deserialize JSON text guided by `type_of_t`.
    fn from_json_typed(&self, json: &str, type_of_t: &TypeDesc) -> Result<T>;

    /// Deserialize the JSON file at `path` guided by `type_of_t`.
    fn from_json_file_typed(&self, path: &Path, type_of_t: &TypeDesc) -> Result<T>;
}
