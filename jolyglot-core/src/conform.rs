//! Checking JSON documents against type descriptors.
//!
//! Backends that go through a serde document tree hand it to a
//! [`Conformer`] together with the caller's [`TypeDesc`]. The conformer
//! binds type variables as it descends, checks every value against the
//! class it lands on, and rebuilds objects from the fields their class
//! declares.

use core::fmt;
use std::borrow::Cow;

use serde_json::{Map, Value};

use crate::desc::{Class, ClassKind, Field, TypeDesc};
use crate::error::{Cause, Error, Stage, TypeShapeError};
use crate::options::UnknownFields;
use crate::{debug, trace};

/// One step from the document root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathSegment {
    /// An object key.
    Key(String),
    /// An array index.
    Index(usize),
}

/// Location of a value inside a document, printed as `$.t[0].s1`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DocPath(Vec<PathSegment>);

impl DocPath {
    /// The document root, `$`.
    pub fn root() -> Self {
        DocPath(Vec::new())
    }

    /// Steps from the root, outermost first.
    pub fn segments(&self) -> &[PathSegment] {
        &self.0
    }

    fn push(&mut self, segment: PathSegment) {
        self.0.push(segment);
    }

    fn pop(&mut self) {
        self.0.pop();
    }
}

impl fmt::Display for DocPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("$")?;
        for segment in &self.0 {
            match segment {
                PathSegment::Key(key) => write!(f, ".{key}")?,
                PathSegment::Index(index) => write!(f, "[{index}]")?,
            }
        }
        Ok(())
    }
}

/// What was wrong at the failing location.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MismatchKind {
    /// The value has the wrong JSON type.
    UnexpectedType {
        /// The descriptor the value had to satisfy, printed
        expected: String,
        /// The JSON type that was found
        found: &'static str,
    },
    /// A required field is absent or `null`.
    MissingField {
        /// The declared field name
        field: String,
    },
    /// An object key the class does not declare, under [`UnknownFields::Deny`].
    UnknownField {
        /// The undeclared key
        field: String,
        /// A declared field with a similar name
        suggestion: Option<String>,
    },
    /// A map key that does not parse as the key descriptor.
    InvalidMapKey {
        /// The offending key
        key: String,
        /// The key descriptor, printed
        expected: String,
    },
}

/// A document that does not have the shape its descriptor asks for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShapeMismatch {
    /// Where in the document
    pub path: DocPath,
    /// What went wrong there
    pub kind: MismatchKind,
}

impl fmt::Display for ShapeMismatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "at {}: ", self.path)?;
        match &self.kind {
            MismatchKind::UnexpectedType { expected, found } => {
                write!(f, "expected {expected}, found {found}")
            }
            MismatchKind::MissingField { field } => {
                write!(f, "missing required field `{field}`")
            }
            MismatchKind::UnknownField { field, suggestion } => {
                write!(f, "unknown field `{field}`")?;
                if let Some(suggestion) = suggestion {
                    write!(f, " (did you mean `{suggestion}`?)")?;
                }
                Ok(())
            }
            MismatchKind::InvalidMapKey { key, expected } => {
                write!(f, "map key `{key}` is not a valid {expected}")
            }
        }
    }
}

/// Checks and projects document trees against descriptors.
#[derive(Debug, Clone, Copy)]
pub struct Conformer {
    unknown_fields: UnknownFields,
}

impl Conformer {
    /// A conformer with the given policy for undeclared object keys.
    pub const fn new(unknown_fields: UnknownFields) -> Self {
        Self { unknown_fields }
    }

    /// Check `value` against `desc`.
    ///
    /// Objects of struct classes come back holding only their declared
    /// fields, in declaration order as far as the tree's map preserves it.
    /// Failures are reported as encoding or decoding errors according to
    /// `stage`; undeclared keys are only ever rejected while decoding.
    pub fn conform(&self, value: Value, desc: &TypeDesc, stage: Stage) -> Result<Value, Error> {
        debug!(%desc, ?stage, "conforming document");
        let mut walk = Walk {
            unknown_fields: self.unknown_fields,
            stage,
            path: DocPath::root(),
        };
        walk.desc(value, desc, None)
            .map_err(|failure| match failure {
                Failure::Mismatch(mismatch) => {
                    debug!(%mismatch, "document does not conform");
                    Error::at(stage, Cause::Shape(mismatch))
                }
                Failure::Shape(err) => Error::from(err),
            })
    }
}

impl Default for Conformer {
    fn default() -> Self {
        Conformer::new(UnknownFields::Ignore)
    }
}

enum Failure {
    Mismatch(ShapeMismatch),
    Shape(TypeShapeError),
}

/// Type variable bindings of the class currently being walked.
#[derive(Clone, Copy)]
struct Scope<'s> {
    params: &'s [Cow<'static, str>],
    args: &'s [TypeDesc],
    /// Where `args` were written, so variables inside them resolve there.
    outer: Option<&'s Scope<'s>>,
}

type Binding<'s> = (&'s TypeDesc, Option<&'s Scope<'s>>);

impl<'s> Scope<'s> {
    fn arg(&self, index: usize) -> Option<Binding<'s>> {
        self.args.get(index).map(|arg| (arg, self.outer))
    }

    fn lookup(&self, name: &str) -> Option<Binding<'s>> {
        let index = self.params.iter().position(|p| p == name)?;
        self.arg(index)
    }
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum KeyCheck {
    Free,
    Integer,
}

struct Walk {
    unknown_fields: UnknownFields,
    stage: Stage,
    path: DocPath,
}

impl Walk {
    fn desc<'s>(
        &mut self,
        value: Value,
        desc: &'s TypeDesc,
        scope: Option<&'s Scope<'s>>,
    ) -> Result<Value, Failure> {
        match desc {
            TypeDesc::Variable(name) => match scope.and_then(|s| s.lookup(name)) {
                Some((bound, outer)) => self.desc(value, bound, outer),
                None => {
                    trace!(variable = %name, path = %self.path, "unbound type variable, accepting any value");
                    Ok(value)
                }
            },
            TypeDesc::Class(class) => {
                let raw = Scope {
                    params: class.type_params(),
                    args: &[],
                    outer: None,
                };
                self.class(value, class, &raw, desc)
            }
            TypeDesc::Parameterized(p) => {
                let applied = Scope {
                    params: p.raw().type_params(),
                    args: p.args(),
                    outer: scope,
                };
                self.class(value, p.raw(), &applied, desc)
            }
            TypeDesc::Array(array) => self.elements(value, Some((array.component(), scope)), desc),
        }
    }

    fn class<'s>(
        &mut self,
        value: Value,
        class: &'s Class,
        scope: &'s Scope<'s>,
        label: &TypeDesc,
    ) -> Result<Value, Failure> {
        if value.is_null() {
            return Ok(value);
        }
        match class.kind() {
            ClassKind::Any => Ok(value),
            ClassKind::String => self.expect(value, Value::is_string, label),
            ClassKind::Boolean => self.expect(value, Value::is_boolean, label),
            ClassKind::Integer => self.expect(value, |v| v.is_i64() || v.is_u64(), label),
            ClassKind::Number => self.expect(value, Value::is_number, label),
            ClassKind::List => self.elements(value, scope.arg(0), label),
            ClassKind::Map => self.map(value, scope, label),
            ClassKind::Struct(fields) => self.object(value, class, fields, scope, label),
        }
    }

    fn expect(
        &self,
        value: Value,
        accepts: impl FnOnce(&Value) -> bool,
        label: &TypeDesc,
    ) -> Result<Value, Failure> {
        if accepts(&value) {
            Ok(value)
        } else {
            Err(self.unexpected(label, &value))
        }
    }

    fn elements<'s>(
        &mut self,
        value: Value,
        element: Option<Binding<'s>>,
        label: &TypeDesc,
    ) -> Result<Value, Failure> {
        if value.is_null() {
            return Ok(value);
        }
        let Value::Array(items) = value else {
            return Err(self.unexpected(label, &value));
        };
        let Some((element, scope)) = element else {
            return Ok(Value::Array(items));
        };
        let mut out = Vec::with_capacity(items.len());
        for (index, item) in items.into_iter().enumerate() {
            self.path.push(PathSegment::Index(index));
            out.push(self.desc(item, element, scope)?);
            self.path.pop();
        }
        Ok(Value::Array(out))
    }

    fn map<'s>(
        &mut self,
        value: Value,
        scope: &'s Scope<'s>,
        label: &TypeDesc,
    ) -> Result<Value, Failure> {
        let Value::Object(entries) = value else {
            return Err(self.unexpected(label, &value));
        };
        let key_check = key_check(scope.arg(0))?;
        let value_binding = scope.arg(1);
        let mut out = Map::new();
        for (key, item) in entries {
            if key_check == KeyCheck::Integer && !is_integer_key(&key) {
                return Err(self.mismatch(MismatchKind::InvalidMapKey {
                    key,
                    expected: "Integer".to_owned(),
                }));
            }
            self.path.push(PathSegment::Key(key.clone()));
            let item = match value_binding {
                Some((desc, outer)) => self.desc(item, desc, outer)?,
                None => item,
            };
            self.path.pop();
            out.insert(key, item);
        }
        Ok(Value::Object(out))
    }

    fn object<'s>(
        &mut self,
        value: Value,
        class: &'s Class,
        fields: &'s [Field],
        scope: &'s Scope<'s>,
        label: &TypeDesc,
    ) -> Result<Value, Failure> {
        let Value::Object(mut entries) = value else {
            return Err(self.unexpected(label, &value));
        };
        trace!(class = class.name(), path = %self.path, "conforming object");
        let mut out = Map::new();
        for field in fields {
            match entries.remove(field.name()) {
                Some(Value::Null) | None if field.is_required() => {
                    return Err(self.mismatch(MismatchKind::MissingField {
                        field: field.name().to_owned(),
                    }));
                }
                Some(item) => {
                    self.path.push(PathSegment::Key(field.name().to_owned()));
                    let item = self.desc(item, field.ty(), Some(scope))?;
                    self.path.pop();
                    out.insert(field.name().to_owned(), item);
                }
                None => {}
            }
        }
        if let Some(unknown) = entries.keys().next() {
            if self.stage == Stage::Decode && self.unknown_fields == UnknownFields::Deny {
                return Err(self.mismatch(MismatchKind::UnknownField {
                    field: unknown.clone(),
                    suggestion: closest_field(unknown, fields).map(str::to_owned),
                }));
            }
            trace!(
                class = class.name(),
                dropped = entries.len(),
                "dropping undeclared keys"
            );
        }
        Ok(Value::Object(out))
    }

    fn unexpected(&self, expected: &TypeDesc, found: &Value) -> Failure {
        self.mismatch(MismatchKind::UnexpectedType {
            expected: expected.to_string(),
            found: json_kind(found),
        })
    }

    fn mismatch(&self, kind: MismatchKind) -> Failure {
        Failure::Mismatch(ShapeMismatch {
            path: self.path.clone(),
            kind,
        })
    }
}

/// Follow variables until the key descriptor lands on a class.
fn key_check(binding: Option<Binding<'_>>) -> Result<KeyCheck, Failure> {
    let Some((mut desc, mut scope)) = binding else {
        return Ok(KeyCheck::Free);
    };
    loop {
        match desc {
            TypeDesc::Variable(name) => match scope.and_then(|s| s.lookup(name)) {
                Some((bound, outer)) => {
                    desc = bound;
                    scope = outer;
                }
                None => return Ok(KeyCheck::Free),
            },
            TypeDesc::Class(class) => match class.kind() {
                ClassKind::Any | ClassKind::String => return Ok(KeyCheck::Free),
                ClassKind::Integer => return Ok(KeyCheck::Integer),
                _ => break,
            },
            TypeDesc::Parameterized(_) | TypeDesc::Array(_) => break,
        }
    }
    Err(Failure::Shape(TypeShapeError::UnsupportedMapKey {
        key: desc.to_string(),
    }))
}

/// Integer keys follow integer values: anything fitting `i64` or `u64`.
fn is_integer_key(key: &str) -> bool {
    key.parse::<i64>().is_ok() || key.parse::<u64>().is_ok()
}

fn closest_field<'a>(target: &str, fields: &'a [Field]) -> Option<&'a str> {
    fields
        .iter()
        .filter_map(|f| {
            let dist = strsim::levenshtein(target, f.name());
            if dist <= 3 {
                Some((f.name(), dist))
            } else {
                None
            }
        })
        .min_by_key(|(_, d)| *d)
        .map(|(s, _)| s)
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::sync::Arc;

    use super::*;
    use indoc::indoc;
    use insta::assert_snapshot;
    use jolyglot_testhelpers::test;
    use serde_json::json;

    fn mock() -> Arc<Class> {
        Class::builder("Mock").field("s1", TypeDesc::string()).build()
    }

    fn mock_parameterized() -> Arc<Class> {
        Class::builder("MockParameterized")
            .type_param("T")
            .field("t", TypeDesc::var("T"))
            .field("s1", TypeDesc::string())
            .build()
    }

    fn lenient() -> Conformer {
        Conformer::default()
    }

    fn parse(text: &str) -> Value {
        serde_json::from_str(text).unwrap()
    }

    #[test]
    fn undeclared_keys_are_dropped() {
        let out = lenient()
            .conform(
                json!({"s1": "s1", "extra": 42}),
                &TypeDesc::class(mock()),
                Stage::Decode,
            )
            .unwrap();
        assert_eq!(out, json!({"s1": "s1"}));
    }

    #[test]
    fn undeclared_keys_are_rejected_when_denied() {
        let err = Conformer::new(UnknownFields::Deny)
            .conform(
                json!({"s1": "s1", "s2": "s2"}),
                &TypeDesc::class(mock()),
                Stage::Decode,
            )
            .unwrap_err();
        assert!(err.is_decoding());
        assert_snapshot!(
            err.shape_mismatch().unwrap(),
            @"at $: unknown field `s2` (did you mean `s1`?)"
        );
    }

    #[test]
    fn encoding_always_projects() {
        let out = Conformer::new(UnknownFields::Deny)
            .conform(
                json!({"s1": "s1", "s2": "s2"}),
                &TypeDesc::class(mock()),
                Stage::Encode,
            )
            .unwrap();
        assert_eq!(out, json!({"s1": "s1"}));
    }

    #[test]
    fn type_arguments_bind_nested_fields() {
        let desc = TypeDesc::parameterized(
            &mock_parameterized(),
            [TypeDesc::list_of(TypeDesc::class(mock()))],
        )
        .unwrap();
        let doc = parse(indoc! {r#"
            {
                "t": [{"s1": "s1"}, {"s1": 7}],
                "s1": "s1"
            }
        "#});
        let err = lenient().conform(doc, &desc, Stage::Decode).unwrap_err();
        assert_snapshot!(
            err.shape_mismatch().unwrap(),
            @"at $.t[1].s1: expected String, found number"
        );
    }

    #[test]
    fn variables_in_arguments_resolve_in_the_outer_scope() {
        // Pair<U> { first: U, rest: MockParameterized<U> }
        let pair = Class::builder("Pair")
            .type_param("U")
            .field("first", TypeDesc::var("U"))
            .field(
                "rest",
                TypeDesc::parameterized(&mock_parameterized(), [TypeDesc::var("U")]).unwrap(),
            )
            .build();
        let desc = TypeDesc::parameterized(&pair, [TypeDesc::integer()]).unwrap();

        let ok = json!({"first": 1, "rest": {"t": 2, "s1": "s1"}});
        assert_eq!(
            lenient().conform(ok.clone(), &desc, Stage::Decode).unwrap(),
            ok
        );

        let bad = json!({"first": 1, "rest": {"t": "two", "s1": "s1"}});
        let err = lenient().conform(bad, &desc, Stage::Decode).unwrap_err();
        assert_snapshot!(
            err.shape_mismatch().unwrap(),
            @"at $.rest.t: expected Integer, found string"
        );
    }

    #[test]
    fn raw_use_accepts_anything_for_variables() {
        let doc = json!({"t": [1, "two", {"three": 3}], "s1": "s1"});
        let out = lenient()
            .conform(doc.clone(), &TypeDesc::class(mock_parameterized()), Stage::Decode)
            .unwrap();
        assert_eq!(out, doc);
    }

    #[test]
    fn integer_map_keys_are_checked() {
        let desc = TypeDesc::map_of(TypeDesc::integer(), TypeDesc::class(mock()));
        assert!(
            lenient()
                .conform(json!({"1": {"s1": "s1"}}), &desc, Stage::Decode)
                .is_ok()
        );

        let err = lenient()
            .conform(json!({"one": {"s1": "s1"}}), &desc, Stage::Decode)
            .unwrap_err();
        assert_snapshot!(err.shape_mismatch().unwrap(), @"at $: map key `one` is not a valid Integer");
    }

    #[test]
    fn integer_map_keys_span_the_unsigned_range() {
        let desc = TypeDesc::of::<HashMap<u64, String>>();
        let doc = json!({"18446744073709551615": "x", "-1": "y"});
        for stage in [Stage::Encode, Stage::Decode] {
            let out = lenient().conform(doc.clone(), &desc, stage).unwrap();
            assert_eq!(out, doc);
        }

        let err = lenient()
            .conform(json!({"18446744073709551616": "x"}), &desc, Stage::Encode)
            .unwrap_err();
        assert!(err.is_encoding());
        assert_snapshot!(err.shape_mismatch().unwrap(), @"at $: map key `18446744073709551616` is not a valid Integer");
    }

    #[test]
    fn unsupported_map_keys_are_a_shape_error() {
        let desc = TypeDesc::map_of(TypeDesc::list_of(TypeDesc::string()), TypeDesc::any());
        let err = lenient()
            .conform(json!({}), &desc, Stage::Decode)
            .unwrap_err();
        assert!(err.is_invalid_type_shape());
        assert_snapshot!(err, @"invalid type shape: map keys must be String, Integer or Any, not List<String>");
    }

    #[test]
    fn required_fields_must_be_present() {
        let strict_mock = Class::builder("Mock")
            .required_field("s1", TypeDesc::string())
            .build();
        let desc = TypeDesc::class(strict_mock);

        let err = lenient()
            .conform(json!({}), &desc, Stage::Decode)
            .unwrap_err();
        assert_snapshot!(err.shape_mismatch().unwrap(), @"at $: missing required field `s1`");

        let err = lenient()
            .conform(json!({"s1": null}), &desc, Stage::Decode)
            .unwrap_err();
        assert_snapshot!(err.shape_mismatch().unwrap(), @"at $: missing required field `s1`");
    }

    #[test]
    fn null_is_accepted_for_optional_values() {
        let desc = TypeDesc::list_of(TypeDesc::class(mock()));
        let out = lenient()
            .conform(json!([null, {"s1": null}]), &desc, Stage::Decode)
            .unwrap();
        assert_eq!(out, json!([null, {"s1": null}]));
    }

    #[test]
    fn arrays_check_their_component() {
        let desc = TypeDesc::array_of(TypeDesc::integer());
        let err = lenient()
            .conform(json!([1, 2.5]), &desc, Stage::Encode)
            .unwrap_err();
        assert!(err.is_encoding());
        assert_snapshot!(err.shape_mismatch().unwrap(), @"at $[1]: expected Integer, found number");
    }

    #[test]
    fn scalars_reject_containers() {
        let err = lenient()
            .conform(json!({"s1": ["s1"]}), &TypeDesc::class(mock()), Stage::Decode)
            .unwrap_err();
        assert_snapshot!(err, @"decoding failed: at $.s1: expected String, found array");
    }
}
