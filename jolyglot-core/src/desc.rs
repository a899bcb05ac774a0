//! Type descriptors.
//!
//! A [`TypeDesc`] carries the shape of a type, never a value of it. Generic
//! classes declare type parameters by name; their fields refer to those
//! parameters through [`TypeDesc::Variable`], and applying the class to
//! arguments with [`TypeDesc::parameterized`] binds them.

use core::fmt;
use std::borrow::Cow;
use std::sync::{Arc, LazyLock};

use crate::error::TypeShapeError;

/// What a [`Class`] accepts once its type variables are bound.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ClassKind {
    /// Any JSON value, including `null`.
    Any,
    /// A JSON string.
    String,
    /// A JSON boolean.
    Boolean,
    /// A JSON number without a fractional part.
    Integer,
    /// Any JSON number.
    Number,
    /// A JSON array whose elements all have the class's single type argument.
    List,
    /// A JSON object keyed by the first type argument, with values of the second.
    Map,
    /// A JSON object with declared fields.
    Struct(Vec<Field>),
}

/// A declared field of a struct class.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Field {
    name: Cow<'static, str>,
    ty: TypeDesc,
    required: bool,
}

impl Field {
    /// The key this field is stored under in a JSON object.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The descriptor of the field's value. May refer to the type
    /// parameters of the declaring class.
    pub fn ty(&self) -> &TypeDesc {
        &self.ty
    }

    /// Whether a document must carry a non-null value for this field.
    pub fn is_required(&self) -> bool {
        self.required
    }
}

/// A named raw type: a built-in scalar or collection, or a user struct.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Class {
    name: Cow<'static, str>,
    type_params: Vec<Cow<'static, str>>,
    kind: ClassKind,
}

macro_rules! builtin_class {
    ($(#[$meta:meta])* $fn_name:ident, $name:literal, $kind:expr, [$($param:literal),*]) => {
        $(#[$meta])*
        pub fn $fn_name() -> Arc<Class> {
            static CLASS: LazyLock<Arc<Class>> = LazyLock::new(|| {
                Arc::new(Class {
                    name: Cow::Borrowed($name),
                    type_params: vec![$(Cow::Borrowed($param)),*],
                    kind: $kind,
                })
            });
            Arc::clone(&CLASS)
        }
    };
}

impl Class {
    builtin_class!(
        /// `Any`: accepts every JSON value.
        any, "Any", ClassKind::Any, []
    );
    builtin_class!(
        /// `String`
        string, "String", ClassKind::String, []
    );
    builtin_class!(
        /// `Boolean`
        boolean, "Boolean", ClassKind::Boolean, []
    );
    builtin_class!(
        /// `Integer`: JSON numbers that fit an `i64` or `u64`.
        integer, "Integer", ClassKind::Integer, []
    );
    builtin_class!(
        /// `Number`
        number, "Number", ClassKind::Number, []
    );
    builtin_class!(
        /// `List<E>`
        list, "List", ClassKind::List, ["E"]
    );
    builtin_class!(
        /// `Map<K, V>`. Keys must be `String`, `Integer` or `Any`.
        map, "Map", ClassKind::Map, ["K", "V"]
    );

    /// Start declaring a struct class.
    pub fn builder(name: impl Into<Cow<'static, str>>) -> ClassBuilder {
        ClassBuilder {
            name: name.into(),
            type_params: Vec::new(),
            fields: Vec::new(),
        }
    }

    /// The class name, without type arguments.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Names of the declared type parameters, in order.
    pub fn type_params(&self) -> &[Cow<'static, str>] {
        &self.type_params
    }

    /// Number of type arguments the class must be applied to.
    pub fn arity(&self) -> usize {
        self.type_params.len()
    }

    /// Whether the class declares type parameters.
    pub fn is_generic(&self) -> bool {
        !self.type_params.is_empty()
    }

    /// What the class accepts.
    pub fn kind(&self) -> &ClassKind {
        &self.kind
    }

    /// Declared fields; empty unless the class is a struct.
    pub fn fields(&self) -> &[Field] {
        match &self.kind {
            ClassKind::Struct(fields) => fields,
            _ => &[],
        }
    }

    /// Look a declared field up by name.
    pub fn field(&self, name: &str) -> Option<&Field> {
        self.fields().iter().find(|f| f.name == name)
    }
}

/// Builder for struct classes, returned by [`Class::builder`].
#[derive(Debug)]
#[must_use]
pub struct ClassBuilder {
    name: Cow<'static, str>,
    type_params: Vec<Cow<'static, str>>,
    fields: Vec<Field>,
}

impl ClassBuilder {
    /// Declare a type parameter. Fields refer to it with [`TypeDesc::var`].
    pub fn type_param(mut self, name: impl Into<Cow<'static, str>>) -> Self {
        self.type_params.push(name.into());
        self
    }

    /// Declare an optional field.
    pub fn field(mut self, name: impl Into<Cow<'static, str>>, ty: TypeDesc) -> Self {
        self.fields.push(Field {
            name: name.into(),
            ty,
            required: false,
        });
        self
    }

    /// Declare a field that must be present and non-null.
    pub fn required_field(mut self, name: impl Into<Cow<'static, str>>, ty: TypeDesc) -> Self {
        self.fields.push(Field {
            name: name.into(),
            ty,
            required: true,
        });
        self
    }

    /// Finish the declaration.
    pub fn build(self) -> Arc<Class> {
        Arc::new(Class {
            name: self.name,
            type_params: self.type_params,
            kind: ClassKind::Struct(self.fields),
        })
    }
}

/// A raw class applied to type arguments, e.g. `List<Mock>`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ParameterizedType {
    raw: Arc<Class>,
    args: Vec<TypeDesc>,
    owner: Option<Box<TypeDesc>>,
}

impl ParameterizedType {
    /// Apply `raw` to `args`. The number of arguments must equal the class
    /// arity, so applying a non-generic class always fails.
    pub fn new(raw: Arc<Class>, args: Vec<TypeDesc>) -> Result<Self, TypeShapeError> {
        if raw.arity() != args.len() || args.is_empty() {
            return Err(TypeShapeError::ArityMismatch {
                raw: raw.name().to_owned(),
                expected: raw.arity(),
                got: args.len(),
            });
        }
        Ok(Self {
            raw,
            args,
            owner: None,
        })
    }

    /// Record the enclosing type this one is nested in. The owner only
    /// affects how the descriptor is printed.
    pub fn with_owner(mut self, owner: TypeDesc) -> Self {
        self.owner = Some(Box::new(owner));
        self
    }

    /// The class being applied.
    pub fn raw(&self) -> &Arc<Class> {
        &self.raw
    }

    /// The type arguments, in declaration order of the class parameters.
    pub fn args(&self) -> &[TypeDesc] {
        &self.args
    }

    /// The enclosing type, if any.
    pub fn owner(&self) -> Option<&TypeDesc> {
        self.owner.as_deref()
    }
}

/// An array of some component type, e.g. `Mock[]`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ArrayType {
    component: Box<TypeDesc>,
}

impl ArrayType {
    /// Describe an array of `component`.
    pub fn new(component: TypeDesc) -> Self {
        Self {
            component: Box::new(component),
        }
    }

    /// The element descriptor.
    pub fn component(&self) -> &TypeDesc {
        &self.component
    }
}

/// The shape of a possibly generic type.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TypeDesc {
    /// A class used as-is. A generic class used this way is a raw use, and
    /// its type variables resolve to `Any`.
    Class(Arc<Class>),
    /// A generic class applied to type arguments.
    Parameterized(ParameterizedType),
    /// An array of a component type.
    Array(ArrayType),
    /// A type parameter of the enclosing class declaration.
    Variable(Cow<'static, str>),
}

impl TypeDesc {
    /// The descriptor of a Rust type, see [`Described`](crate::Described).
    pub fn of<T: crate::Described + ?Sized>() -> Self {
        T::type_desc()
    }

    /// Use `class` as-is.
    pub fn class(class: Arc<Class>) -> Self {
        TypeDesc::Class(class)
    }

    /// `Any`
    pub fn any() -> Self {
        TypeDesc::Class(Class::any())
    }

    /// `String`
    pub fn string() -> Self {
        TypeDesc::Class(Class::string())
    }

    /// `Boolean`
    pub fn boolean() -> Self {
        TypeDesc::Class(Class::boolean())
    }

    /// `Integer`
    pub fn integer() -> Self {
        TypeDesc::Class(Class::integer())
    }

    /// `Number`
    pub fn number() -> Self {
        TypeDesc::Class(Class::number())
    }

    /// `List<element>`
    pub fn list_of(element: TypeDesc) -> Self {
        TypeDesc::Parameterized(ParameterizedType {
            raw: Class::list(),
            args: vec![element],
            owner: None,
        })
    }

    /// `Map<key, value>`
    pub fn map_of(key: TypeDesc, value: TypeDesc) -> Self {
        TypeDesc::Parameterized(ParameterizedType {
            raw: Class::map(),
            args: vec![key, value],
            owner: None,
        })
    }

    /// `component[]`
    pub fn array_of(component: TypeDesc) -> Self {
        TypeDesc::Array(ArrayType::new(component))
    }

    /// Apply `raw` to `args`, checking the arity.
    pub fn parameterized(
        raw: &Arc<Class>,
        args: impl IntoIterator<Item = TypeDesc>,
    ) -> Result<Self, TypeShapeError> {
        ParameterizedType::new(Arc::clone(raw), args.into_iter().collect())
            .map(TypeDesc::Parameterized)
    }

    /// Refer to a type parameter of the enclosing class.
    pub fn var(name: impl Into<Cow<'static, str>>) -> Self {
        TypeDesc::Variable(name.into())
    }

    /// The class behind a class or parameterized descriptor.
    pub fn raw_class(&self) -> Option<&Arc<Class>> {
        match self {
            TypeDesc::Class(class) => Some(class),
            TypeDesc::Parameterized(p) => Some(p.raw()),
            TypeDesc::Array(_) | TypeDesc::Variable(_) => None,
        }
    }

    /// Whether the descriptor mentions a type variable anywhere.
    pub fn has_variables(&self) -> bool {
        match self {
            TypeDesc::Class(_) => false,
            TypeDesc::Parameterized(p) => {
                p.args.iter().any(TypeDesc::has_variables)
                    || p.owner().is_some_and(TypeDesc::has_variables)
            }
            TypeDesc::Array(a) => a.component.has_variables(),
            TypeDesc::Variable(_) => true,
        }
    }
}

impl From<Arc<Class>> for TypeDesc {
    fn from(class: Arc<Class>) -> Self {
        TypeDesc::Class(class)
    }
}

impl From<ParameterizedType> for TypeDesc {
    fn from(p: ParameterizedType) -> Self {
        TypeDesc::Parameterized(p)
    }
}

impl From<ArrayType> for TypeDesc {
    fn from(a: ArrayType) -> Self {
        TypeDesc::Array(a)
    }
}

impl fmt::Display for TypeDesc {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeDesc::Class(class) => f.write_str(class.name()),
            TypeDesc::Parameterized(p) => {
                if let Some(owner) = p.owner() {
                    write!(f, "{owner}::")?;
                }
                write!(f, "{}<", p.raw.name())?;
                for (i, arg) in p.args.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{arg}")?;
                }
                f.write_str(">")
            }
            TypeDesc::Array(a) => write!(f, "{}[]", a.component),
            TypeDesc::Variable(name) => f.write_str(name),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use insta::assert_snapshot;
    use jolyglot_testhelpers::test;

    fn mock() -> Arc<Class> {
        Class::builder("Mock").field("s1", TypeDesc::string()).build()
    }

    fn wrapper() -> Arc<Class> {
        Class::builder("Wrapper")
            .type_param("T")
            .field("t", TypeDesc::var("T"))
            .build()
    }

    #[test]
    fn display_nested_shapes() {
        let map = TypeDesc::map_of(TypeDesc::integer(), TypeDesc::class(mock()));
        let wrapped = TypeDesc::parameterized(&wrapper(), [map]).unwrap();
        assert_snapshot!(wrapped, @"Wrapper<Map<Integer, Mock>>");

        let array = TypeDesc::array_of(TypeDesc::list_of(TypeDesc::class(mock())));
        assert_snapshot!(array, @"List<Mock>[]");
    }

    #[test]
    fn display_owner_prefix() {
        let outer = TypeDesc::class(Class::builder("Outer").build());
        let inner = Class::builder("Entry").type_param("V").build();
        let owned = ParameterizedType::new(inner, vec![TypeDesc::string()])
            .unwrap()
            .with_owner(outer);
        assert_snapshot!(TypeDesc::from(owned), @"Outer::Entry<String>");
    }

    #[test]
    fn arity_must_match() {
        let err = TypeDesc::parameterized(
            &Class::list(),
            [TypeDesc::class(mock()), TypeDesc::string()],
        )
        .unwrap_err();
        assert_eq!(
            err,
            TypeShapeError::ArityMismatch {
                raw: "List".into(),
                expected: 1,
                got: 2
            }
        );
    }

    #[test]
    fn non_generic_class_cannot_be_applied() {
        let err = TypeDesc::parameterized(&mock(), [TypeDesc::string()]).unwrap_err();
        assert_snapshot!(err, @"Mock expects 0 type arguments, got 1");
    }

    #[test]
    fn generic_class_needs_arguments() {
        assert!(TypeDesc::parameterized(&wrapper(), []).is_err());
    }

    #[test]
    fn builtin_classes_are_shared() {
        assert!(Arc::ptr_eq(&Class::list(), &Class::list()));
        assert_eq!(Class::map().arity(), 2);
        assert!(Class::string().fields().is_empty());
    }

    #[test]
    fn variables_are_detected() {
        let w = wrapper();
        assert!(w.field("t").unwrap().ty().has_variables());
        assert!(!TypeDesc::list_of(TypeDesc::string()).has_variables());
        assert!(TypeDesc::array_of(TypeDesc::var("T")).has_variables());
    }
}
