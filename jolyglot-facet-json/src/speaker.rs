use core::fmt::Display;
use std::path::Path;

use facet::Facet;
use jolyglot_core::{Error, Jolyglot, Result, SpeakerOptions, Stage};

use crate::BACKEND;

/// Speaks JSON through `facet_json`.
///
/// Only [`SpeakerOptions::pretty`] has an effect here; the unknown-field
/// policy belongs to descriptor-guided decoding, which this speaker does
/// not offer. Undeclared keys follow the target type's own facet
/// attributes.
#[derive(Debug, Clone, Copy, Default)]
pub struct FacetJsonSpeaker {
    options: SpeakerOptions,
}

impl FacetJsonSpeaker {
    /// A speaker with default options.
    pub const fn new() -> Self {
        Self::with_options(SpeakerOptions::new())
    }

    /// A speaker with the given options.
    pub const fn with_options(options: SpeakerOptions) -> Self {
        FacetJsonSpeaker { options }
    }

    /// The options this speaker was built with.
    pub const fn options(&self) -> SpeakerOptions {
        self.options
    }
}

fn translate(stage: Stage, err: impl Display) -> Error {
    crate::debug!(?stage, %err, "facet_json failed");
    Error::backend_message(stage, err).with_backend(BACKEND)
}

impl<T> Jolyglot<T> for FacetJsonSpeaker
where
    T: Facet<'static>,
{
    fn to_json(&self, src: &T) -> Result<String> {
        crate::trace!(shape = %T::SHAPE, "to_json");
        let text = if self.options.pretty {
            facet_json::to_string_pretty(src)
        } else {
            facet_json::to_string(src)
        };
        text.map_err(|err| translate(Stage::Encode, err))
    }

    fn from_json(&self, json: &str) -> Result<T> {
        crate::trace!(shape = %T::SHAPE, len = json.len(), "from_json");
        facet_json::from_str(json).map_err(|err| translate(Stage::Decode, err))
    }

    fn from_json_file(&self, path: &Path) -> Result<T> {
        crate::trace!(shape = %T::SHAPE, path = %path.display(), "from_json_file");
        let bytes = fs_err::read(path).map_err(|err| Error::io(path, err).with_backend(BACKEND))?;
        facet_json::from_slice(&bytes).map_err(|err| translate(Stage::Decode, err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jolyglot_suite::{MOCK, MOCK_PARAMETERIZED, Mock, MockParameterized};
    use jolyglot_testhelpers::test;

    #[test]
    fn keeps_declaration_order() {
        let speaker = FacetJsonSpeaker::new();
        let value: MockParameterized<Mock> = speaker.from_json(MOCK_PARAMETERIZED).unwrap();
        insta::assert_snapshot!(speaker.to_json(&value).unwrap(), @r#"{"t":{"s1":"s1"},"s1":"s1"}"#);
    }

    #[test]
    fn errors_name_the_backend() {
        let err = Jolyglot::<Mock>::from_json(&FacetJsonSpeaker::new(), "[").unwrap_err();
        assert!(err.is_decoding());
        assert!(err.to_string().starts_with("facet_json: decoding failed: "));
    }

    #[test]
    fn file_matches_text() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("mock.json");
        std::fs::write(&path, MOCK).unwrap();
        let speaker = FacetJsonSpeaker::new();
        let from_file: Mock = speaker.from_json_file(&path).unwrap();
        let from_text: Mock = speaker.from_json(MOCK).unwrap();
        assert_eq!(from_file, from_text);
    }

    #[test]
    fn missing_file_keeps_the_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nope.json");
        let err = Jolyglot::<Mock>::from_json_file(&FacetJsonSpeaker::new(), &path).unwrap_err();
        assert!(err.is_io());
        assert!(err.to_string().contains("nope.json"), "{err}");
    }
}
