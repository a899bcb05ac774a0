//! Fixture types and the canonical documents they encode to.

use std::sync::{Arc, LazyLock};

use facet::Facet;
use jolyglot_core::{Class, Described, TypeDesc};
use serde::{Deserialize, Serialize};

/// `{"s1":"s1"}`
pub const MOCK: &str = r#"{"s1":"s1"}"#;
/// Two mocks in an array.
pub const MOCK_ARRAY: &str = r#"[{"s1":"s1"},{"s1":"s1"}]"#;
/// One mock in a list.
pub const MOCK_LIST: &str = r#"[{"s1":"s1"}]"#;
/// One mock keyed by `1`.
pub const MOCK_MAP: &str = r#"{"1":{"s1":"s1"}}"#;
/// A mock wrapped in [`Wrapper`].
pub const WRAPPER: &str = r#"{"t":{"s1":"s1"}}"#;

/// A mock wrapped in [`MockParameterized`], in declaration order.
pub const MOCK_PARAMETERIZED: &str = r#"{"t":{"s1":"s1"},"s1":"s1"}"#;
/// [`MOCK_PARAMETERIZED`] with its keys swapped.
pub const MOCK_PARAMETERIZED_REVERSE: &str = r#"{"s1":"s1","t":{"s1":"s1"}}"#;
/// A mock list wrapped in [`MockParameterized`].
pub const MOCK_PARAMETERIZED_LIST: &str = r#"{"t":[{"s1":"s1"}],"s1":"s1"}"#;
/// [`MOCK_PARAMETERIZED_LIST`] with its keys swapped.
pub const MOCK_PARAMETERIZED_LIST_REVERSE: &str = r#"{"s1":"s1","t":[{"s1":"s1"}]}"#;
/// A mock map wrapped in [`MockParameterized`].
pub const MOCK_PARAMETERIZED_MAP: &str = r#"{"t":{"1":{"s1":"s1"}},"s1":"s1"}"#;
/// [`MOCK_PARAMETERIZED_MAP`] with its keys swapped.
pub const MOCK_PARAMETERIZED_MAP_REVERSE: &str = r#"{"s1":"s1","t":{"1":{"s1":"s1"}}}"#;

/// The simplest object: one string field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Facet)]
pub struct Mock {
    /// Always `"s1"` in the canonical documents
    pub s1: String,
}

impl Mock {
    /// A mock holding `s1`.
    pub fn new(s1: impl Into<String>) -> Self {
        Mock { s1: s1.into() }
    }
}

impl Default for Mock {
    fn default() -> Self {
        Mock::new("s1")
    }
}

/// A generic value next to a plain sibling field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Facet)]
pub struct MockParameterized<T> {
    /// The generic part
    pub t: T,
    /// The plain sibling
    pub s1: String,
}

impl<T> MockParameterized<T> {
    /// Wrap `t`, with the sibling set to `"s1"`.
    pub fn new(t: T) -> Self {
        MockParameterized {
            t,
            s1: "s1".to_owned(),
        }
    }
}

/// A generic value on its own.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Facet)]
pub struct Wrapper<T> {
    /// The wrapped value
    pub t: T,
}

/// `Mock { s1: String }`, with `s1` required.
pub fn mock_class() -> Arc<Class> {
    static CLASS: LazyLock<Arc<Class>> = LazyLock::new(|| {
        Class::builder("Mock")
            .required_field("s1", TypeDesc::string())
            .build()
    });
    Arc::clone(&CLASS)
}

/// `MockParameterized<T> { t: T, s1: String }`
pub fn mock_parameterized_class() -> Arc<Class> {
    static CLASS: LazyLock<Arc<Class>> = LazyLock::new(|| {
        Class::builder("MockParameterized")
            .type_param("T")
            .field("t", TypeDesc::var("T"))
            .field("s1", TypeDesc::string())
            .build()
    });
    Arc::clone(&CLASS)
}

/// `Wrapper<T> { t: T }`
pub fn wrapper_class() -> Arc<Class> {
    static CLASS: LazyLock<Arc<Class>> = LazyLock::new(|| {
        Class::builder("Wrapper")
            .type_param("T")
            .field("t", TypeDesc::var("T"))
            .build()
    });
    Arc::clone(&CLASS)
}

impl Described for Mock {
    fn type_desc() -> TypeDesc {
        TypeDesc::class(mock_class())
    }
}

impl<T: Described> Described for MockParameterized<T> {
    fn type_desc() -> TypeDesc {
        TypeDesc::parameterized(&mock_parameterized_class(), [T::type_desc()])
            .expect("MockParameterized declares one type parameter")
    }
}

impl<T: Described> Described for Wrapper<T> {
    fn type_desc() -> TypeDesc {
        TypeDesc::parameterized(&wrapper_class(), [T::type_desc()])
            .expect("Wrapper declares one type parameter")
    }
}
