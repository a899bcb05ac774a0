use core::fmt::Display;

use jolyglot_core::{Error, Stage};

use crate::BACKEND;

/// Map a `simd_json` failure, or one from the `serde_json` tree conversion
/// used on the typed path, onto the shared taxonomy.
pub(crate) fn translate(stage: Stage, err: impl Display) -> Error {
    crate::debug!(?stage, %err, "simd_json failed");
    Error::backend_message(stage, err).with_backend(BACKEND)
}
