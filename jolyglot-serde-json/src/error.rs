use std::path::Path;

use jolyglot_core::{Error, Stage};
use serde_json::error::Category;

use crate::BACKEND;

/// Map a `serde_json` failure onto the shared taxonomy.
pub(crate) fn translate(stage: Stage, err: serde_json::Error) -> Error {
    crate::debug!(?stage, category = ?err.classify(), %err, "serde_json failed");
    Error::backend_message(stage, err).with_backend(BACKEND)
}

/// Like [`translate`], for failures while reading `path`. A read error
/// from the underlying file stays an I/O error.
pub(crate) fn translate_read(path: &Path, err: serde_json::Error) -> Error {
    match err.classify() {
        Category::Io => Error::io(path, err.into()).with_backend(BACKEND),
        _ => translate(Stage::Decode, err),
    }
}
