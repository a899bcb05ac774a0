use std::io::BufReader;
use std::path::Path;

use jolyglot_core::{
    Error, Jolyglot, JolyglotGenerics, Result, SpeakerOptions, Stage, TypeDesc, TypeFactory, Value,
};
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::BACKEND;
use crate::error::{translate, translate_read};

/// Speaks JSON through `serde_json`.
///
/// Holds nothing but its options, so one speaker can be shared freely
/// between threads.
#[derive(Debug, Clone, Copy, Default)]
pub struct SerdeJsonSpeaker {
    options: SpeakerOptions,
}

impl SerdeJsonSpeaker {
    /// A speaker with default options.
    pub const fn new() -> Self {
        Self::with_options(SpeakerOptions::new())
    }

    /// A speaker with the given options.
    pub const fn with_options(options: SpeakerOptions) -> Self {
        SerdeJsonSpeaker { options }
    }

    /// The options this speaker was built with.
    pub const fn options(&self) -> SpeakerOptions {
        self.options
    }

    fn emit<S: Serialize + ?Sized>(&self, value: &S) -> Result<String> {
        let text = if self.options.pretty {
            serde_json::to_string_pretty(value)
        } else {
            serde_json::to_string(value)
        };
        text.map_err(|err| translate(Stage::Encode, err))
    }

    fn open(path: &Path) -> Result<BufReader<fs_err::File>> {
        crate::trace!(path = %path.display(), "opening JSON file");
        fs_err::File::open(path)
            .map(BufReader::new)
            .map_err(|err| Error::io(path, err).with_backend(BACKEND))
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

impl<T> Jolyglot<T> for SerdeJsonSpeaker
where
    T: Serialize + DeserializeOwned,
{
    fn to_json(&self, src: &T) -> Result<String> {
        crate::trace!(ty = core::any::type_name::<T>(), "to_json");
        self.emit(src)
    }

    fn from_json(&self, json: &str) -> Result<T> {
        crate::trace!(ty = core::any::type_name::<T>(), len = json.len(), "from_json");
        serde_json::from_str(json).map_err(|err| translate(Stage::Decode, err))
    }

    fn from_json_file(&self, path: &Path) -> Result<T> {
        let reader = Self::open(path)?;
        serde_json::from_reader(reader).map_err(|err| translate_read(path, err))
    }
}

impl TypeFactory for SerdeJsonSpeaker {}

impl<T> JolyglotGenerics<T> for SerdeJsonSpeaker
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
        crate::trace!(%type_of_t, len = json.len(), "from_json_typed");
        let tree: Value =
            serde_json::from_str(json).map_err(|err| translate(Stage::Decode, err))?;
        self.settle(tree, type_of_t)
    }

    fn from_json_file_typed(&self, path: &Path, type_of_t: &TypeDesc) -> Result<T> {
        let reader = Self::open(path)?;
        let tree: Value =
            serde_json::from_reader(reader).map_err(|err| translate_read(path, err))?;
        self.settle(tree, type_of_t)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use indoc::indoc;
    use jolyglot_core::ErrorKind;
    use jolyglot_suite::{MOCK, Mock, MockParameterized};
    use jolyglot_testhelpers::test;

    #[test]
    fn malformed_text_names_the_backend() {
        let err = Jolyglot::<Mock>::from_json(&SerdeJsonSpeaker::new(), "{").unwrap_err();
        assert!(err.is_decoding());
        assert_eq!(err.backend, Some("serde_json"));
        insta::assert_snapshot!(err, @"serde_json: decoding failed: EOF while parsing an object at line 1 column 1");
    }

    #[test]
    fn trailing_text_is_rejected() {
        let speaker = SerdeJsonSpeaker::new();
        let err = Jolyglot::<Mock>::from_json(&speaker, r#"{"s1":"s1"} tail"#).unwrap_err();
        insta::assert_snapshot!(err, @"serde_json: decoding failed: trailing characters at line 1 column 13");
    }

    #[test]
    fn missing_field_is_reported_by_serde() {
        let err = Jolyglot::<Mock>::from_json(&SerdeJsonSpeaker::new(), "{}").unwrap_err();
        insta::assert_snapshot!(err, @"serde_json: decoding failed: missing field `s1` at line 1 column 2");
    }

    #[test]
    fn typed_mismatch_is_reported_by_the_conformer() {
        let speaker = SerdeJsonSpeaker::new();
        let ty = TypeDesc::of::<Mock>();
        let text = r#"{"s1":1}"#;
        let err = JolyglotGenerics::<Mock>::from_json_typed(&speaker, text, &ty).unwrap_err();
        insta::assert_snapshot!(err, @"serde_json: decoding failed: at $.s1: expected String, found number");
    }

    #[test]
    fn typed_output_sorts_keys() {
        let speaker = SerdeJsonSpeaker::new();
        let value = MockParameterized::new(Mock::default());
        let ty = TypeDesc::of::<MockParameterized<Mock>>();
        insta::assert_snapshot!(speaker.to_json_typed(&value, &ty).unwrap(), @r#"{"s1":"s1","t":{"s1":"s1"}}"#);
        insta::assert_snapshot!(speaker.to_json(&value).unwrap(), @r#"{"t":{"s1":"s1"},"s1":"s1"}"#);
    }

    #[test]
    fn pretty_output_is_indented() {
        let speaker = SerdeJsonSpeaker::with_options(SpeakerOptions::new().pretty());
        let text = speaker.to_json(&Mock::default()).unwrap();
        assert_eq!(
            text,
            indoc! {r#"
                {
                  "s1": "s1"
                }"#}
        );
        let typed = speaker
            .to_json_typed(&Mock::default(), &TypeDesc::of::<Mock>())
            .unwrap();
        assert_eq!(typed, text);
    }

    #[test]
    fn directory_path_is_io() {
        let dir = tempfile::tempdir().unwrap();
        let speaker = SerdeJsonSpeaker::new();
        let err = Jolyglot::<Mock>::from_json_file(&speaker, dir.path()).unwrap_err();
        match err.kind() {
            ErrorKind::Io { path, .. } => assert_eq!(path, dir.path()),
            other => panic!("expected an I/O error, got {other:?}"),
        }
    }

    #[test]
    fn file_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("mock.json");
        std::fs::write(&path, MOCK).unwrap();
        let speaker = SerdeJsonSpeaker::new();
        let mock: Mock = speaker.from_json_file(&path).unwrap();
        assert_eq!(speaker.to_json(&mock).unwrap(), MOCK);
    }

    #[test]
    fn usable_as_trait_object() {
        let speaker: &dyn JolyglotGenerics<Vec<Mock>> = &SerdeJsonSpeaker::new();
        let ty = speaker.array_of(TypeDesc::of::<Mock>());
        let mocks = speaker.from_json_typed(r#"[{"s1":"a"},{"s1":"b"}]"#, &ty).unwrap();
        assert_eq!(mocks, vec![Mock::new("a"), Mock::new("b")]);
    }
}
