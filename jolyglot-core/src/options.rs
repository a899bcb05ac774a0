use crate::conform::Conformer;

/// What descriptor-guided decoding does with object keys a struct class
/// does not declare.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum UnknownFields {
    /// Drop them (default).
    #[default]
    Ignore,
    /// Fail with a decoding error.
    Deny,
}

/// Configuration shared by every speaker.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SpeakerOptions {
    /// Policy for undeclared object keys in descriptor-guided operations
    /// (default: ignore)
    pub unknown_fields: UnknownFields,

    /// Whether to pretty-print output with indentation (default: false)
    pub pretty: bool,
}

impl SpeakerOptions {
    /// Create new default options: lenient decoding, compact output.
    pub const fn new() -> Self {
        Self {
            unknown_fields: UnknownFields::Ignore,
            pretty: false,
        }
    }

    /// Enable pretty-printing.
    pub const fn pretty(mut self) -> Self {
        self.pretty = true;
        self
    }

    /// Reject undeclared object keys instead of dropping them.
    pub const fn deny_unknown_fields(mut self) -> Self {
        self.unknown_fields = UnknownFields::Deny;
        self
    }

    /// A conformer applying these options.
    pub const fn conformer(&self) -> Conformer {
        Conformer::new(self.unknown_fields)
    }
}
