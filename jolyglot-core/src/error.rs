//! The failure taxonomy every speaker reports through.

use core::fmt::{self, Display};
use std::path::{Path, PathBuf};

use crate::conform::ShapeMismatch;

/// Result type returned by every contract operation.
pub type Result<T, E = Error> = core::result::Result<T, E>;

/// Which direction an operation was going when it failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    /// Producing JSON text from a value.
    Encode,
    /// Producing a value from JSON text.
    Decode,
}

/// Why an encode or decode failed.
#[derive(Debug, Clone, PartialEq)]
pub enum Cause {
    /// The backend's own diagnostic.
    Backend(String),
    /// The document did not have the shape its descriptor asks for.
    Shape(ShapeMismatch),
}

impl Display for Cause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cause::Backend(msg) => f.write_str(msg),
            Cause::Shape(mismatch) => write!(f, "{mismatch}"),
        }
    }
}

/// A descriptor that cannot describe any JSON document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeShapeError {
    /// A class was applied to the wrong number of type arguments.
    ArityMismatch {
        /// Name of the class being applied
        raw: String,
        /// Number of type parameters the class declares
        expected: usize,
        /// Number of type arguments supplied
        got: usize,
    },
    /// A map key descriptor JSON object keys can never satisfy.
    UnsupportedMapKey {
        /// The offending key descriptor, printed
        key: String,
    },
}

impl Display for TypeShapeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeShapeError::ArityMismatch { raw, expected, got } => {
                let plural = if *expected == 1 { "" } else { "s" };
                write!(f, "{raw} expects {expected} type argument{plural}, got {got}")
            }
            TypeShapeError::UnsupportedMapKey { key } => {
                write!(f, "map keys must be String, Integer or Any, not {key}")
            }
        }
    }
}

impl std::error::Error for TypeShapeError {}

/// Specific error kinds.
#[derive(Debug)]
pub enum ErrorKind {
    /// No JSON text could be produced for the value.
    Encoding(Cause),
    /// The JSON text could not be mapped onto the requested type.
    Decoding(Cause),
    /// The input file could not be opened or read.
    Io {
        /// The path the caller asked for
        path: PathBuf,
        /// What the file system said
        source: std::io::Error,
    },
    /// The descriptor itself is malformed.
    InvalidTypeShape(TypeShapeError),
}

impl Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorKind::Encoding(cause) => write!(f, "encoding failed: {cause}"),
            ErrorKind::Decoding(cause) => write!(f, "decoding failed: {cause}"),
            ErrorKind::Io { source, .. } => write!(f, "I/O error: {source}"),
            ErrorKind::InvalidTypeShape(err) => write!(f, "invalid type shape: {err}"),
        }
    }
}

/// The error every speaker returns, whichever backend it wraps.
#[derive(Debug)]
pub struct Error {
    /// The specific kind of error
    pub kind: ErrorKind,
    /// Name of the backend that reported it, when one did
    pub backend: Option<&'static str>,
}

impl Error {
    /// Wrap a kind with no backend attached.
    pub const fn new(kind: ErrorKind) -> Self {
        Error {
            kind,
            backend: None,
        }
    }

    /// An encode or decode failure, depending on `stage`.
    pub fn at(stage: Stage, cause: Cause) -> Self {
        match stage {
            Stage::Encode => Error::new(ErrorKind::Encoding(cause)),
            Stage::Decode => Error::new(ErrorKind::Decoding(cause)),
        }
    }

    /// A backend diagnostic, encoding or decoding depending on `stage`.
    pub fn backend_message(stage: Stage, message: impl Display) -> Self {
        Error::at(stage, Cause::Backend(message.to_string()))
    }

    /// An I/O failure on `path`.
    pub fn io(path: &Path, source: std::io::Error) -> Self {
        Error::new(ErrorKind::Io {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Attach the name of the backend that produced this error.
    pub fn with_backend(mut self, backend: &'static str) -> Self {
        self.backend = Some(backend);
        self
    }

    /// The specific kind of error.
    pub fn kind(&self) -> &ErrorKind {
        &self.kind
    }

    /// Whether this is an [`ErrorKind::Encoding`] error.
    pub fn is_encoding(&self) -> bool {
        matches!(self.kind, ErrorKind::Encoding(_))
    }

    /// Whether this is an [`ErrorKind::Decoding`] error.
    pub fn is_decoding(&self) -> bool {
        matches!(self.kind, ErrorKind::Decoding(_))
    }

    /// Whether this is an [`ErrorKind::Io`] error.
    pub fn is_io(&self) -> bool {
        matches!(self.kind, ErrorKind::Io { .. })
    }

    /// Whether this is an [`ErrorKind::InvalidTypeShape`] error.
    pub fn is_invalid_type_shape(&self) -> bool {
        matches!(self.kind, ErrorKind::InvalidTypeShape(_))
    }

    /// The conformance failure behind this error, if that is what it was.
    pub fn shape_mismatch(&self) -> Option<&ShapeMismatch> {
        match &self.kind {
            ErrorKind::Encoding(Cause::Shape(m)) | ErrorKind::Decoding(Cause::Shape(m)) => Some(m),
            _ => None,
        }
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(backend) = self.backend {
            write!(f, "{backend}: ")?;
        }
        write!(f, "{}", self.kind)
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match &self.kind {
            ErrorKind::Io { source, .. } => Some(source),
            ErrorKind::InvalidTypeShape(err) => Some(err),
            _ => None,
        }
    }
}

impl From<TypeShapeError> for Error {
    fn from(err: TypeShapeError) -> Self {
        Error::new(ErrorKind::InvalidTypeShape(err))
    }
}
