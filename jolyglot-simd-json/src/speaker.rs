use std::path::Path;

use jolyglot_core::{
    Error, Jolyglot, JolyglotGenerics, Result, SpeakerOptions, Stage, TypeDesc, TypeFactory, Value,
};
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::BACKEND;
use crate::error::translate;

/// Speaks JSON through `simd_json`.
#[derive(Debug, Clone, Copy, Default)]
pub struct SimdJsonSpeaker {
    options: SpeakerOptions,
}

impl SimdJsonSpeaker {
    /// A speaker with default options.
    pub const fn new() -> Self {
        Self::with_options(SpeakerOptions::new())
    }

    /// A speaker with the given options.
    pub const fn with_options(options: SpeakerOptions) -> Self {
        SimdJsonSpeaker { options }
    }

    /// The options this speaker was built with.
    pub const fn options(&self) -> SpeakerOptions {
        self.options
    }

    fn emit<S: Serialize>(&self, value: &S) -> Result<String> {
        let text = if self.options.pretty {
            simd_json::to_string_pretty(value)
        } else {
            simd_json::to_string(value)
        };
        text.map_err(|err| translate(Stage::Encode, err))
    }

    /// simd-json rewrites its input while parsing, so it gets a copy.
    fn parse<T: DeserializeOwned>(mut bytes: Vec<u8>) -> Result<T> {
        crate::trace!(len = bytes.len(), "parsing");
        simd_json::serde::from_slice(&mut bytes).map_err(|err| translate(Stage::Decode, err))
    }

    fn read(path: &Path) -> Result<Vec<u8>> {
        crate::trace!(path = %path.display(), "reading JSON file");
        fs_err::read(path).map_err(|err| Error::io(path, err).with_backend(BACKEND))
    }

    fn conform(&self, tree: Value, desc: &TypeDesc, stage: Stage) -> Result<Value> {
        self.options
            .conformer()
            .conform(tree, desc, stage)
            .map_err(|err| err.with_backend(BACKEND))
    }

    fn settle<T: DeserializeOwned>(&self, tree: Value, desc: &TypeDesc) -> Result<T> {
        let tree = self.conform(tree, desc, Stage::Decode)?;
        serde_json::from_value(tree).map_err(|err| translate(Stage::Decode, err))
    }
}

impl<T> Jolyglot<T> for SimdJsonSpeaker
where
    T: Serialize + DeserializeOwned,
{
    fn to_json(&self, src: &T) -> Result<String> {
        crate::trace!(ty = core::any::type_name::<T>(), "to_json");
        self.emit(src)
    }

    fn from_json(&self, json: &str) -> Result<T> {
        crate::trace!(ty = core::any::type_name::<T>(), "from_json");
        Self::parse(json.as_bytes().to_vec())
    }

    fn from_json_file(&self, path: &Path) -> Result<T> {
        Self::parse(Self::read(path)?)
    }
}

impl TypeFactory for SimdJsonSpeaker {}

impl<T> JolyglotGenerics<T> for SimdJsonSpeaker
where
    T: Serialize + DeserializeOwned,
{
    fn to_json_typed(&self, src: &T, type_of_src: &TypeDesc) -> Result<String> {
        crate::trace!(%type_of_src, "to_json_typed");
        let tree = serde_json::to_value(src).map_err(|err| translate(Stage::Encode, err))?;
        let tree = self.conform(tree, type_of_src, Stage::Encode)?;
        self.emit(&tree)
    }

    fn from_json_typed(&self, json: &str, type_of_t: &TypeDesc) -> Result<T> {
        crate::trace!(%type_of_t, "from_json_typed");
        let tree: Value = Self::parse(json.as_bytes().to_vec())?;
        self.settle(tree, type_of_t)
    }

    fn from_json_file_typed(&self, path: &Path, type_of_t: &TypeDesc) -> Result<T> {
        let tree: Value = Self::parse(Self::read(path)?)?;
        self.settle(tree, type_of_t)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jolyglot_suite::{MOCK_ARRAY, Mock, MockParameterized, Wrapper};
    use jolyglot_testhelpers::test;

    #[test]
    fn input_is_left_untouched() {
        let speaker = SimdJsonSpeaker::new();
        let text = String::from(MOCK_ARRAY);
        let mocks: Vec<Mock> = speaker.from_json(&text).unwrap();
        assert_eq!(mocks.len(), 2);
        assert_eq!(text, MOCK_ARRAY);
    }

    #[test]
    fn malformed_text_names_the_backend() {
        let err = Jolyglot::<Mock>::from_json(&SimdJsonSpeaker::new(), r#"{"s1":"#).unwrap_err();
        assert!(err.is_decoding());
        assert_eq!(err.backend, Some("simd_json"));
        assert!(err.to_string().starts_with("simd_json: decoding failed: "));
    }

    #[test]
    fn typed_decode_projects_partial_generics() {
        let speaker = SimdJsonSpeaker::new();
        let ty = TypeDesc::of::<MockParameterized<Value>>();
        let value: MockParameterized<Value> = speaker
            .from_json_typed(r#"{"t":[1,"two",null],"s1":"s1","extra":true}"#, &ty)
            .unwrap();
        insta::assert_snapshot!(speaker.to_json_typed(&value, &ty).unwrap(), @r#"{"s1":"s1","t":[1,"two",null]}"#);
    }

    #[test]
    fn strict_speaker_rejects_unknown_keys() {
        let speaker = SimdJsonSpeaker::with_options(SpeakerOptions::new().deny_unknown_fields());
        let ty = TypeDesc::of::<Wrapper<Mock>>();
        let err = JolyglotGenerics::<Wrapper<Mock>>::from_json_typed(
            &speaker,
            r#"{"t":{"s1":"s1","s":"x"}}"#,
            &ty,
        )
        .unwrap_err();
        insta::assert_snapshot!(err, @"simd_json: decoding failed: at $.t: unknown field `s` (did you mean `s1`?)");
    }

    #[test]
    fn missing_file_is_io() {
        let dir = tempfile::tempdir().unwrap();
        let err = Jolyglot::<Mock>::from_json_file(
            &SimdJsonSpeaker::new(),
            &dir.path().join("absent.json"),
        )
        .unwrap_err();
        assert!(err.is_io());
        assert_eq!(err.backend, Some("simd_json"));
    }
}
