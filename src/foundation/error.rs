use std::fmt;

/// Convenience result type used across the playback engine.
pub type PlaybackResult<T> = Result<T, PlaybackError>;

/// Top-level error taxonomy used by engine APIs.
#[derive(thiserror::Error, Debug)]
pub enum PlaybackError {
    /// A playlist failed structural validation; the previous playlist stays assigned.
    #[error("validation error: {0}")]
    Validation(ValidationError),

    /// A segment declared a type no media factory can instantiate.
    #[error("unsupported segment type '{type_tag}' for segment '{id}'")]
    UnsupportedSegmentType {
        /// Offending segment id.
        id: String,
        /// Raw type tag as written in the playlist.
        type_tag: String,
    },

    /// A shader stage failed to compile.
    #[error("shader compile error ({stage}): {log}")]
    ShaderCompile {
        /// Stage that failed.
        stage: ShaderStage,
        /// Compiler log reported by the renderer.
        log: String,
    },

    /// Compiled shader stages failed to link into a program.
    #[error("shader link error: {0}")]
    ShaderLink(String),

    /// Invalid compositor configuration.
    #[error("config error: {0}")]
    InvalidConfig(String),

    /// Errors when serializing or deserializing playlist data.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Wrapped lower-level error from collaborators.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl PlaybackError {
    /// Build a [`PlaybackError::InvalidConfig`] value.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::InvalidConfig(msg.into())
    }

    /// Build a [`PlaybackError::Serde`] value.
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }

    /// Build a [`PlaybackError::ShaderLink`] value.
    pub fn shader_link(msg: impl Into<String>) -> Self {
        Self::ShaderLink(msg.into())
    }

    /// Build a [`PlaybackError::ShaderCompile`] value.
    pub fn shader_compile(stage: ShaderStage, log: impl Into<String>) -> Self {
        Self::ShaderCompile {
            stage,
            log: log.into(),
        }
    }

    /// Build a [`PlaybackError::UnsupportedSegmentType`] value.
    pub fn unsupported_type(id: impl Into<String>, type_tag: impl Into<String>) -> Self {
        Self::UnsupportedSegmentType {
            id: id.into(),
            type_tag: type_tag.into(),
        }
    }

    /// Validation payload, if this is a validation failure.
    pub fn as_validation(&self) -> Option<&ValidationError> {
        match self {
            Self::Validation(v) => Some(v),
            _ => None,
        }
    }
}

impl From<ValidationError> for PlaybackError {
    fn from(value: ValidationError) -> Self {
        Self::Validation(value)
    }
}

/// Shader pipeline stage.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ShaderStage {
    /// Vertex stage.
    Vertex,
    /// Fragment stage.
    Fragment,
}

impl fmt::Display for ShaderStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Vertex => f.write_str("vertex"),
            Self::Fragment => f.write_str("fragment"),
        }
    }
}

/// Closed set of playlist validation failures, in the order they are checked.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ValidationCode {
    /// Two segments share an id.
    DuplicateId,
    /// A required field is missing, or the source is missing/conflicting.
    MissingField,
    /// A segment starts before the previous one in the same track.
    NonMonotonicStart,
    /// A segment starts before the previous one in the same track has ended.
    Overlap,
}

impl ValidationCode {
    /// Stable numeric code (1..=4).
    pub fn code(self) -> u8 {
        match self {
            Self::DuplicateId => 1,
            Self::MissingField => 2,
            Self::NonMonotonicStart => 3,
            Self::Overlap => 4,
        }
    }
}

/// Structured validation failure with the offending segment and track.
#[derive(Clone, Debug, PartialEq)]
pub struct ValidationError {
    /// Failure kind.
    pub code: ValidationCode,
    /// Offending segment id, when the segment has one.
    pub segment_id: Option<String>,
    /// Track index containing the offending segment.
    pub track_index: usize,
    /// Human-readable description.
    pub message: String,
}

impl ValidationError {
    pub(crate) fn new(
        code: ValidationCode,
        segment_id: Option<&str>,
        track_index: usize,
        message: impl Into<String>,
    ) -> Self {
        Self {
            code,
            segment_id: segment_id.map(str::to_owned),
            track_index,
            message: message.into(),
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "(code {}) {}", self.code.code(), self.message)
    }
}

impl std::error::Error for ValidationError {}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
