#![forbid(unsafe_code)]
#![doc = include_str!("../README.md")]

use core::fmt::{self, Debug, Display};
use std::collections::HashMap;
use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;

use jolyglot_core::{
    Class, ErrorKind, Jolyglot, JolyglotGenerics, MismatchKind, SpeakerOptions,
    TypeDesc, TypeFactory, Value,
};
use tempfile::{NamedTempFile, TempDir};

pub mod fixtures;

pub use fixtures::*;

/// Result of running one case.
#[derive(Debug)]
pub enum CaseOutcome {
    /// Every check held.
    Passed,
    /// A check failed, with a message describing it.
    Failed(String),
}

/// A case failure. Speaker errors convert into it, so cases use `?`.
#[derive(Debug)]
pub struct CaseError(String);

impl Display for CaseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<jolyglot_core::Error> for CaseError {
    fn from(err: jolyglot_core::Error) -> Self {
        CaseError(format!("unexpected speaker error: {err}"))
    }
}

impl From<std::io::Error> for CaseError {
    fn from(err: std::io::Error) -> Self {
        CaseError(format!("fixture I/O failed: {err}"))
    }
}

type CaseResult = Result<(), CaseError>;

macro_rules! ensure {
    ($cond:expr, $($msg:tt)+) => {
        if !$cond {
            return Err(CaseError(format!($($msg)+)));
        }
    };
}

macro_rules! ensure_eq {
    ($left:expr, $right:expr $(,)?) => {{
        let (left, right) = (&$left, &$right);
        ensure!(
            left == right,
            "{} != {}\n  left: {:?}\n right: {:?}",
            stringify!($left),
            stringify!($right),
            left,
            right
        );
    }};
}

/// Accept either key order for documents with a generic field next to a
/// plain one; backends disagree on it.
fn ensure_either(actual: &str, sample: &str, reverse: &str) -> CaseResult {
    ensure!(
        actual == sample || actual == reverse,
        "unexpected document\n  actual: {actual}\nexpected: {sample}\n      or: {reverse}"
    );
    Ok(())
}

fn expect_err<T: Debug>(
    result: jolyglot_core::Result<T>,
) -> Result<jolyglot_core::Error, CaseError> {
    match result {
        Ok(value) => Err(CaseError(format!("expected an error, got {value:?}"))),
        Err(err) => {
            tracing::debug!(%err, "got expected error");
            Ok(err)
        }
    }
}

/// A JSON file living in its own temporary directory.
struct JsonFile {
    _dir: TempDir,
    path: PathBuf,
}

fn json_file(contents: &str) -> Result<JsonFile, CaseError> {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("test.json");
    let mut file = NamedTempFile::new_in(dir.path())?;
    file.write_all(contents.as_bytes())?;
    file.persist(&path).map_err(|e| e.error)?;
    Ok(JsonFile { _dir: dir, path })
}

/// One registered case.
pub struct SuiteCase {
    /// Stable identifier, used as the test name
    pub id: &'static str,
    /// What the case checks, repeated in its failure message
    pub description: &'static str,
    runner: Box<dyn Fn() -> CaseOutcome + Send + Sync + 'static>,
}

impl SuiteCase {
    fn new<J: Send + Sync + 'static>(
        id: &'static str,
        description: &'static str,
        speaker: &Arc<J>,
        case: fn(&J) -> CaseResult,
    ) -> Self {
        let speaker = Arc::clone(speaker);
        Self {
            id,
            description,
            runner: Box::new(move || match case(&speaker) {
                Ok(()) => CaseOutcome::Passed,
                Err(err) => CaseOutcome::Failed(format!("{description}: {}", err.0)),
            }),
        }
    }

    /// Run the case.
    pub fn run(&self) -> CaseOutcome {
        (self.runner)()
    }
}

/// Everything a speaker implementing only the base contract must handle.
pub trait BaseSpeaker:
    Jolyglot<Mock> + Jolyglot<Vec<Mock>> + Jolyglot<MockParameterized<Mock>> + Send + Sync + 'static
{
}

impl<J> BaseSpeaker for J where
    J: Jolyglot<Mock>
        + Jolyglot<Vec<Mock>>
        + Jolyglot<MockParameterized<Mock>>
        + Send
        + Sync
        + 'static
{
}

/// Everything a generic-aware speaker must handle.
pub trait GenericSpeaker:
    BaseSpeaker
    + JolyglotGenerics<Mock>
    + JolyglotGenerics<Vec<Mock>>
    + JolyglotGenerics<[Mock; 2]>
    + JolyglotGenerics<HashMap<i64, Mock>>
    + JolyglotGenerics<HashMap<u64, String>>
    + JolyglotGenerics<MockParameterized<Mock>>
    + JolyglotGenerics<MockParameterized<Value>>
    + JolyglotGenerics<MockParameterized<Vec<Mock>>>
    + JolyglotGenerics<MockParameterized<HashMap<i64, Mock>>>
    + JolyglotGenerics<Wrapper<Mock>>
    + JolyglotGenerics<Value>
    + Jolyglot<HashMap<(i32, i32), String>>
{
}

impl<J> GenericSpeaker for J where
    J: BaseSpeaker
        + JolyglotGenerics<Mock>
        + JolyglotGenerics<Vec<Mock>>
        + JolyglotGenerics<[Mock; 2]>
        + JolyglotGenerics<HashMap<i64, Mock>>
        + JolyglotGenerics<HashMap<u64, String>>
        + JolyglotGenerics<MockParameterized<Mock>>
        + JolyglotGenerics<MockParameterized<Value>>
        + JolyglotGenerics<MockParameterized<Vec<Mock>>>
        + JolyglotGenerics<MockParameterized<HashMap<i64, Mock>>>
        + JolyglotGenerics<Wrapper<Mock>>
        + JolyglotGenerics<Value>
        + Jolyglot<HashMap<(i32, i32), String>>
{
}

/// Cases for the base contract.
pub fn base_cases<J: BaseSpeaker>(make: fn(SpeakerOptions) -> J) -> Vec<SuiteCase> {
    let speaker = Arc::new(make(SpeakerOptions::new()));
    let pretty = Arc::new(make(SpeakerOptions::new().pretty()));
    let case = |id, description, run: fn(&J) -> CaseResult| {
        SuiteCase::new(id, description, &speaker, run)
    };
    vec![
        case("to_json", "a plain object encodes to its literal text", base::to_json),
        case(
            "from_string_json_class",
            "decoding then re-encoding is stable",
            base::from_string_json_class,
        ),
        case(
            "from_file_json_class",
            "decoding a file matches decoding its text",
            base::from_file_json_class,
        ),
        case(
            "from_string_generic_field",
            "a struct with a generic field round-trips",
            base::from_string_generic_field,
        ),
        case(
            "array_round_trip",
            "an array of mocks decodes to two elements",
            base::array_round_trip,
        ),
        case("missing_file_is_io", "a missing file is an I/O error", base::missing_file_is_io),
        case(
            "malformed_is_decoding",
            "malformed JSON is a decoding error",
            base::malformed_is_decoding,
        ),
        case(
            "missing_field_is_decoding",
            "an absent field is a decoding error",
            base::missing_field_is_decoding,
        ),
        case(
            "malformed_file_is_decoding",
            "a readable file with bad JSON is a decoding error",
            base::malformed_file_is_decoding,
        ),
        case("concurrent_use", "one speaker serves several threads", base::concurrent_use),
        SuiteCase::new(
            "pretty_output",
            "pretty output decodes to the same value",
            &pretty,
            base::pretty_output,
        ),
    ]
}

/// Cases for the extended contract.
pub fn generic_cases<J: GenericSpeaker>(make: fn(SpeakerOptions) -> J) -> Vec<SuiteCase> {
    let speaker = Arc::new(make(SpeakerOptions::new()));
    let strict = Arc::new(make(SpeakerOptions::new().deny_unknown_fields()));
    let case = |id, description, run: fn(&J) -> CaseResult| {
        SuiteCase::new(id, description, &speaker, run)
    };
    vec![
        case(
            "to_json_not_parameterized",
            "a plain descriptor encodes the literal text",
            generic::to_json_not_parameterized,
        ),
        case(
            "from_string_not_parameterized",
            "a plain descriptor decodes",
            generic::from_string_not_parameterized,
        ),
        case("to_json_type", "a parameterized descriptor encodes", generic::to_json_type),
        case(
            "from_string_json_type",
            "a parameterized descriptor round-trips",
            generic::from_string_json_type,
        ),
        case(
            "from_string_partial_json_type",
            "an Any argument keeps the generic part dynamic",
            generic::from_string_partial_json_type,
        ),
        case(
            "from_file_json_type",
            "a parameterized descriptor decodes a file",
            generic::from_file_json_type,
        ),
        case(
            "from_file_partial_json_type",
            "an Any argument decodes a file",
            generic::from_file_partial_json_type,
        ),
        case("array_of", "an array descriptor decodes two elements", generic::array_of),
        case("parameterized_list", "List<Mock> decodes a mock array", generic::parameterized_list),
        case("list_to_json", "List<Mock> encodes", generic::list_to_json),
        case("json_to_list", "List<Mock> round-trips", generic::json_to_list),
        case(
            "parameterized_list_to_json",
            "MockParameterized<List<Mock>> encodes",
            generic::parameterized_list_to_json,
        ),
        case(
            "json_to_parameterized_list",
            "MockParameterized<List<Mock>> round-trips",
            generic::json_to_parameterized_list,
        ),
        case("map_to_json", "Map<Integer, Mock> encodes", generic::map_to_json),
        case("json_to_map", "Map<Integer, Mock> round-trips", generic::json_to_map),
        case(
            "parameterized_map_to_json",
            "MockParameterized<Map<Integer, Mock>> encodes",
            generic::parameterized_map_to_json,
        ),
        case(
            "json_to_parameterized_map",
            "MockParameterized<Map<Integer, Mock>> round-trips",
            generic::json_to_parameterized_map,
        ),
        case("generic_wrapper", "Wrapper<Mock> encodes and decodes", generic::generic_wrapper),
        case(
            "arity_validation",
            "List applied to two arguments is rejected",
            generic::arity_validation,
        ),
        case(
            "unknown_fields_ignored",
            "undeclared keys are dropped by default",
            generic::unknown_fields_ignored,
        ),
        SuiteCase::new(
            "unknown_fields_denied",
            "undeclared keys are rejected when configured",
            &strict,
            generic::unknown_fields_denied,
        ),
        case(
            "shape_mismatch_on_decode",
            "a wrongly typed field reports its path",
            generic::shape_mismatch_on_decode,
        ),
        case(
            "shape_mismatch_on_encode",
            "a value unlike its descriptor does not encode",
            generic::shape_mismatch_on_encode,
        ),
        case(
            "missing_file_typed_is_io",
            "a missing file is an I/O error on the typed path too",
            generic::missing_file_typed_is_io,
        ),
        case(
            "unsupported_value_is_encoding",
            "tuple map keys fail to encode",
            generic::unsupported_value_is_encoding,
        ),
        case(
            "unsigned_map_keys",
            "integer keys up to u64::MAX round-trip",
            generic::unsigned_map_keys,
        ),
    ]
}

mod base {
    use super::*;

    pub fn to_json<J: BaseSpeaker>(j: &J) -> CaseResult {
        ensure_eq!(j.to_json(&Mock::default())?, MOCK);
        Ok(())
    }

    pub fn from_string_json_class<J: BaseSpeaker>(j: &J) -> CaseResult {
        let mock: Mock = j.from_json(MOCK)?;
        ensure_eq!(mock, Mock::default());
        ensure_eq!(j.to_json(&mock)?, MOCK);
        Ok(())
    }

    pub fn from_file_json_class<J: BaseSpeaker>(j: &J) -> CaseResult {
        let file = json_file(MOCK)?;
        let from_file: Mock = j.from_json_file(&file.path)?;
        let from_text: Mock = j.from_json(MOCK)?;
        ensure_eq!(from_file, from_text);
        ensure_eq!(j.to_json(&from_file)?, MOCK);
        Ok(())
    }

    pub fn from_string_generic_field<J: BaseSpeaker>(j: &J) -> CaseResult {
        let value: MockParameterized<Mock> = j.from_json(MOCK_PARAMETERIZED)?;
        ensure_eq!(value, MockParameterized::new(Mock::default()));
        ensure_either(
            &j.to_json(&value)?,
            MOCK_PARAMETERIZED,
            MOCK_PARAMETERIZED_REVERSE,
        )
    }

    pub fn array_round_trip<J: BaseSpeaker>(j: &J) -> CaseResult {
        let mocks = vec![Mock::default(), Mock::default()];
        ensure_eq!(j.to_json(&mocks)?, MOCK_ARRAY);
        let decoded: Vec<Mock> = j.from_json(MOCK_ARRAY)?;
        ensure_eq!(decoded.len(), 2);
        ensure_eq!(j.to_json(&decoded)?, MOCK_ARRAY);
        Ok(())
    }

    pub fn missing_file_is_io<J: BaseSpeaker>(j: &J) -> CaseResult {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("does-not-exist.json");
        let err = expect_err(Jolyglot::<Mock>::from_json_file(j, &path))?;
        match err.kind() {
            ErrorKind::Io { path: reported, source } => {
                ensure_eq!(reported, &path);
                ensure_eq!(source.kind(), std::io::ErrorKind::NotFound);
            }
            other => return Err(CaseError(format!("expected an I/O error, got {other:?}"))),
        }
        Ok(())
    }

    pub fn malformed_is_decoding<J: BaseSpeaker>(j: &J) -> CaseResult {
        for text in ["{", "", r#"{"s1":}"#, "[1, 2"] {
            let err = expect_err(Jolyglot::<Mock>::from_json(j, text))?;
            ensure!(err.is_decoding(), "{text:?} gave {err}");
        }
        Ok(())
    }

    pub fn missing_field_is_decoding<J: BaseSpeaker>(j: &J) -> CaseResult {
        let err = expect_err(Jolyglot::<Mock>::from_json(j, "{}"))?;
        ensure!(err.is_decoding(), "got {err}");
        Ok(())
    }

    pub fn malformed_file_is_decoding<J: BaseSpeaker>(j: &J) -> CaseResult {
        let file = json_file(r#"{"s1":"#)?;
        let err = expect_err(Jolyglot::<Mock>::from_json_file(j, &file.path))?;
        ensure!(err.is_decoding(), "got {err}");
        Ok(())
    }

    pub fn concurrent_use<J: BaseSpeaker>(j: &J) -> CaseResult {
        let outcomes: Vec<CaseResult> = std::thread::scope(|scope| {
            let handles: Vec<_> = (0..4)
                .map(|_| {
                    scope.spawn(|| -> CaseResult {
                        for _ in 0..32 {
                            let value: MockParameterized<Mock> = j.from_json(MOCK_PARAMETERIZED)?;
                            ensure_eq!(value.t, Mock::default());
                            ensure_eq!(j.to_json(&value.t)?, MOCK);
                        }
                        Ok(())
                    })
                })
                .collect();
            handles
                .into_iter()
                .map(|h| {
                    h.join()
                        .unwrap_or_else(|_| Err(CaseError("worker panicked".to_owned())))
                })
                .collect()
        });
        outcomes.into_iter().collect()
    }

    pub fn pretty_output<J: BaseSpeaker>(j: &J) -> CaseResult {
        let value = MockParameterized::new(Mock::default());
        let pretty = j.to_json(&value)?;
        ensure!(pretty.contains('\n'), "expected indented output, got {pretty}");
        let decoded: MockParameterized<Mock> = j.from_json(&pretty)?;
        ensure_eq!(decoded, value);
        Ok(())
    }
}

mod generic {
    use super::*;

    fn mock_parameterized_of(j: &impl TypeFactory, arg: TypeDesc) -> Result<TypeDesc, CaseError> {
        Ok(j.new_parameterized_type(&mock_parameterized_class(), vec![arg])?)
    }

    pub fn to_json_not_parameterized<J: GenericSpeaker>(j: &J) -> CaseResult {
        let ty = TypeDesc::of::<Mock>();
        ensure_eq!(j.to_json_typed(&Mock::default(), &ty)?, MOCK);
        Ok(())
    }

    pub fn from_string_not_parameterized<J: GenericSpeaker>(j: &J) -> CaseResult {
        let ty = TypeDesc::of::<Mock>();
        let mock: Mock = j.from_json_typed(MOCK, &ty)?;
        ensure_eq!(j.to_json_typed(&mock, &ty)?, MOCK);
        Ok(())
    }

    pub fn to_json_type<J: GenericSpeaker>(j: &J) -> CaseResult {
        let ty = TypeDesc::of::<MockParameterized<Mock>>();
        let value = MockParameterized::new(Mock::default());
        ensure_either(
            &j.to_json_typed(&value, &ty)?,
            MOCK_PARAMETERIZED,
            MOCK_PARAMETERIZED_REVERSE,
        )
    }

    pub fn from_string_json_type<J: GenericSpeaker>(j: &J) -> CaseResult {
        let ty = TypeDesc::of::<MockParameterized<Mock>>();
        let value: MockParameterized<Mock> = j.from_json_typed(MOCK_PARAMETERIZED, &ty)?;
        ensure_eq!(value.t, Mock::default());
        ensure_either(
            &j.to_json_typed(&value, &ty)?,
            MOCK_PARAMETERIZED,
            MOCK_PARAMETERIZED_REVERSE,
        )
    }

    pub fn from_string_partial_json_type<J: GenericSpeaker>(j: &J) -> CaseResult {
        let ty = mock_parameterized_of(j, TypeDesc::any())?;
        let value: MockParameterized<Value> = j.from_json_typed(MOCK_PARAMETERIZED, &ty)?;
        ensure!(value.t.is_object(), "t should stay an object, got {}", value.t);
        ensure_either(
            &j.to_json_typed(&value, &ty)?,
            MOCK_PARAMETERIZED,
            MOCK_PARAMETERIZED_REVERSE,
        )
    }

    pub fn from_file_json_type<J: GenericSpeaker>(j: &J) -> CaseResult {
        let file = json_file(MOCK_PARAMETERIZED)?;
        let ty = TypeDesc::of::<MockParameterized<Mock>>();
        let from_file: MockParameterized<Mock> = j.from_json_file_typed(&file.path, &ty)?;
        let from_text: MockParameterized<Mock> = j.from_json_typed(MOCK_PARAMETERIZED, &ty)?;
        ensure_eq!(from_file, from_text);
        ensure_either(
            &j.to_json_typed(&from_file, &ty)?,
            MOCK_PARAMETERIZED,
            MOCK_PARAMETERIZED_REVERSE,
        )
    }

    pub fn from_file_partial_json_type<J: GenericSpeaker>(j: &J) -> CaseResult {
        let file = json_file(MOCK_PARAMETERIZED)?;
        let ty = mock_parameterized_of(j, TypeDesc::any())?;
        let value: MockParameterized<Value> = j.from_json_file_typed(&file.path, &ty)?;
        ensure_either(
            &j.to_json_typed(&value, &ty)?,
            MOCK_PARAMETERIZED,
            MOCK_PARAMETERIZED_REVERSE,
        )
    }

    pub fn array_of<J: GenericSpeaker>(j: &J) -> CaseResult {
        let ty = j.array_of(TypeDesc::of::<Mock>());
        ensure_eq!(ty, TypeDesc::of::<[Mock; 2]>());
        let mocks: [Mock; 2] = j.from_json_typed(MOCK_ARRAY, &ty)?;
        ensure_eq!(mocks[0], Mock::default());
        ensure_eq!(mocks[1], Mock::default());
        ensure_eq!(j.to_json_typed(&mocks, &ty)?, MOCK_ARRAY);
        Ok(())
    }

    pub fn parameterized_list<J: GenericSpeaker>(j: &J) -> CaseResult {
        let ty = j.new_parameterized_type(&Class::list(), vec![TypeDesc::of::<Mock>()])?;
        let mocks: Vec<Mock> = j.from_json_typed(MOCK_ARRAY, &ty)?;
        ensure_eq!(j.to_json(&mocks)?, MOCK_ARRAY);
        Ok(())
    }

    pub fn list_to_json<J: GenericSpeaker>(j: &J) -> CaseResult {
        let ty = TypeDesc::of::<Vec<Mock>>();
        ensure_eq!(j.to_json_typed(&vec![Mock::default()], &ty)?, MOCK_LIST);
        Ok(())
    }

    pub fn json_to_list<J: GenericSpeaker>(j: &J) -> CaseResult {
        let ty = TypeDesc::of::<Vec<Mock>>();
        let mocks: Vec<Mock> = j.from_json_typed(MOCK_LIST, &ty)?;
        ensure_eq!(j.to_json_typed(&mocks, &ty)?, MOCK_LIST);
        Ok(())
    }

    pub fn parameterized_list_to_json<J: GenericSpeaker>(j: &J) -> CaseResult {
        let ty = TypeDesc::of::<MockParameterized<Vec<Mock>>>();
        let value = MockParameterized::new(vec![Mock::default()]);
        ensure_either(
            &j.to_json_typed(&value, &ty)?,
            MOCK_PARAMETERIZED_LIST,
            MOCK_PARAMETERIZED_LIST_REVERSE,
        )
    }

    pub fn json_to_parameterized_list<J: GenericSpeaker>(j: &J) -> CaseResult {
        let ty = TypeDesc::of::<MockParameterized<Vec<Mock>>>();
        let value: MockParameterized<Vec<Mock>> =
            j.from_json_typed(MOCK_PARAMETERIZED_LIST, &ty)?;
        ensure_eq!(value.t.len(), 1);
        ensure_either(
            &j.to_json_typed(&value, &ty)?,
            MOCK_PARAMETERIZED_LIST,
            MOCK_PARAMETERIZED_LIST_REVERSE,
        )
    }

    pub fn map_to_json<J: GenericSpeaker>(j: &J) -> CaseResult {
        let ty = TypeDesc::of::<HashMap<i64, Mock>>();
        let mocks = HashMap::from([(1, Mock::default())]);
        ensure_eq!(j.to_json_typed(&mocks, &ty)?, MOCK_MAP);
        Ok(())
    }

    pub fn json_to_map<J: GenericSpeaker>(j: &J) -> CaseResult {
        let ty = TypeDesc::of::<HashMap<i64, Mock>>();
        let mocks: HashMap<i64, Mock> = j.from_json_typed(MOCK_MAP, &ty)?;
        ensure_eq!(mocks.get(&1), Some(&Mock::default()));
        ensure_eq!(j.to_json_typed(&mocks, &ty)?, MOCK_MAP);
        Ok(())
    }

    pub fn parameterized_map_to_json<J: GenericSpeaker>(j: &J) -> CaseResult {
        let ty = TypeDesc::of::<MockParameterized<HashMap<i64, Mock>>>();
        let value = MockParameterized::new(HashMap::from([(1, Mock::default())]));
        ensure_either(
            &j.to_json_typed(&value, &ty)?,
            MOCK_PARAMETERIZED_MAP,
            MOCK_PARAMETERIZED_MAP_REVERSE,
        )
    }

    pub fn json_to_parameterized_map<J: GenericSpeaker>(j: &J) -> CaseResult {
        let ty = TypeDesc::of::<MockParameterized<HashMap<i64, Mock>>>();
        let value: MockParameterized<HashMap<i64, Mock>> =
            j.from_json_typed(MOCK_PARAMETERIZED_MAP, &ty)?;
        ensure_eq!(value.t.len(), 1);
        ensure_either(
            &j.to_json_typed(&value, &ty)?,
            MOCK_PARAMETERIZED_MAP,
            MOCK_PARAMETERIZED_MAP_REVERSE,
        )
    }

    pub fn unsigned_map_keys<J: GenericSpeaker>(j: &J) -> CaseResult {
        let ty = TypeDesc::of::<HashMap<u64, String>>();
        let map = HashMap::from([(u64::MAX, "x".to_owned())]);
        let text = j.to_json_typed(&map, &ty)?;
        ensure_eq!(text, j.to_json(&map)?);
        ensure_eq!(text, r#"{"18446744073709551615":"x"}"#);
        let back: HashMap<u64, String> = j.from_json_typed(&text, &ty)?;
        ensure_eq!(back, map);
        Ok(())
    }

    pub fn generic_wrapper<J: GenericSpeaker>(j: &J) -> CaseResult {
        let ty = j.new_parameterized_type(&wrapper_class(), vec![TypeDesc::of::<Mock>()])?;
        ensure_eq!(ty, TypeDesc::of::<Wrapper<Mock>>());
        let wrapper = Wrapper { t: Mock::default() };
        ensure_eq!(j.to_json_typed(&wrapper, &ty)?, WRAPPER);
        let decoded: Wrapper<Mock> = j.from_json_typed(WRAPPER, &ty)?;
        ensure_eq!(decoded, wrapper);
        Ok(())
    }

    pub fn arity_validation<J: GenericSpeaker>(j: &J) -> CaseResult {
        let err = expect_err(j.new_parameterized_type(
            &Class::list(),
            vec![TypeDesc::of::<Mock>(), TypeDesc::string()],
        ))?;
        ensure!(err.is_invalid_type_shape(), "got {err}");
        let err = expect_err(j.new_parameterized_type(&mock_class(), vec![TypeDesc::string()]))?;
        ensure!(err.is_invalid_type_shape(), "got {err}");
        Ok(())
    }

    pub fn unknown_fields_ignored<J: GenericSpeaker>(j: &J) -> CaseResult {
        let text = r#"{"s1":"s1","s2":"extra"}"#;
        let mock: Mock = j.from_json_typed(text, &TypeDesc::of::<Mock>())?;
        ensure_eq!(mock, Mock::default());
        let mock: Mock = j.from_json(text)?;
        ensure_eq!(mock, Mock::default());
        let tree: Value = j.from_json_typed(text, &TypeDesc::of::<Mock>())?;
        ensure_eq!(j.to_json(&tree)?, MOCK);
        Ok(())
    }

    pub fn unknown_fields_denied<J: GenericSpeaker>(j: &J) -> CaseResult {
        let text = r#"{"s1":"s1","s2":"extra"}"#;
        let err = expect_err(JolyglotGenerics::<Mock>::from_json_typed(
            j,
            text,
            &TypeDesc::of::<Mock>(),
        ))?;
        ensure!(err.is_decoding(), "got {err}");
        let mismatch = err
            .shape_mismatch()
            .ok_or_else(|| CaseError(format!("expected a shape mismatch, got {err}")))?;
        ensure_eq!(
            mismatch.kind,
            MismatchKind::UnknownField {
                field: "s2".to_owned(),
                suggestion: Some("s1".to_owned()),
            }
        );
        let mock: Mock = j.from_json_typed(MOCK, &TypeDesc::of::<Mock>())?;
        ensure_eq!(mock, Mock::default());
        Ok(())
    }

    pub fn shape_mismatch_on_decode<J: GenericSpeaker>(j: &J) -> CaseResult {
        let ty = TypeDesc::of::<MockParameterized<Vec<Mock>>>();
        let err = expect_err(JolyglotGenerics::<MockParameterized<Vec<Mock>>>::from_json_typed(
            j,
            r#"{"t":[{"s1":"s1"},{"s1":7}],"s1":"s1"}"#,
            &ty,
        ))?;
        ensure!(err.is_decoding(), "got {err}");
        let mismatch = err
            .shape_mismatch()
            .ok_or_else(|| CaseError(format!("expected a shape mismatch, got {err}")))?;
        ensure_eq!(mismatch.path.to_string(), "$.t[1].s1");
        Ok(())
    }

    pub fn shape_mismatch_on_encode<J: GenericSpeaker>(j: &J) -> CaseResult {
        let err = expect_err(j.to_json_typed(&Mock::default(), &TypeDesc::of::<Vec<Mock>>()))?;
        ensure!(err.is_encoding(), "got {err}");
        Ok(())
    }

    pub fn missing_file_typed_is_io<J: GenericSpeaker>(j: &J) -> CaseResult {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("does-not-exist.json");
        let err = expect_err(JolyglotGenerics::<Mock>::from_json_file_typed(
            j,
            &path,
            &TypeDesc::of::<Mock>(),
        ))?;
        ensure!(err.is_io(), "got {err}");
        Ok(())
    }

    pub fn unsupported_value_is_encoding<J: GenericSpeaker>(j: &J) -> CaseResult {
        let value = HashMap::from([((1, 2), "pair".to_owned())]);
        let err = expect_err(j.to_json(&value))?;
        ensure!(err.is_encoding(), "got {err}");
        Ok(())
    }
}
