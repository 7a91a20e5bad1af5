use std::fmt;
use std::path::PathBuf;

/// Every failure aborts the run; there is no per-file recovery.
#[derive(Debug)]
pub enum ConvertError {
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    Pattern(glob::PatternError),
    MalformedAnnotation {
        path: PathBuf,
        reason: String,
    },
    DegenerateGeometry {
        filename: String,
        reason: String,
    },
    UnknownLabel(String),
    MissingImage(PathBuf),
}

pub type Result<T> = std::result::Result<T, ConvertError>;

impl ConvertError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ConvertError::Io {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn malformed(path: impl Into<PathBuf>, reason: impl fmt::Display) -> Self {
        ConvertError::MalformedAnnotation {
            path: path.into(),
            reason: reason.to_string(),
        }
    }
}

impl fmt::Display for ConvertError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConvertError::Io { path, source } => write!(f, "{}: {}", path.display(), source),
            ConvertError::Pattern(e) => write!(f, "invalid annotation glob pattern: {}", e),
            ConvertError::MalformedAnnotation { path, reason } => {
                write!(f, "malformed annotation {}: {}", path.display(), reason)
            }
            ConvertError::DegenerateGeometry { filename, reason } => {
                write!(f, "degenerate bounding box in {}: {}", filename, reason)
            }
            ConvertError::UnknownLabel(name) => write!(f, "unknown class label {:?}", name),
            ConvertError::MissingImage(path) => {
                write!(f, "source image not found: {}", path.display())
            }
        }
    }
}

impl std::error::Error for ConvertError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConvertError::Io { source, .. } => Some(source),
            ConvertError::Pattern(e) => Some(e),
            _ => None,
        }
    }
}

impl From<glob::PatternError> for ConvertError {
    fn from(e: glob::PatternError) -> Self {
        ConvertError::Pattern(e)
    }
}
