use crate::encoding::Charset;
use std::fmt;
use std::io;
use std::path::{Path, PathBuf};

#[derive(Debug)]
pub enum ConvertError {
    FileNotFound(PathBuf),
    MalformedRow {
        path: PathBuf,
        line: usize,
        content: String,
    },
    EncodingMismatch {
        path: PathBuf,
        charset: Charset,
        detail: String,
    },
    Io {
        path: PathBuf,
        source: io::Error,
    },
    InvalidArguments(String),
    Config(serde_yaml::Error),
    Pattern(regex::Error),
}

impl ConvertError {
    /// Attaches the offending path to an I/O error. A missing file becomes `FileNotFound`.
    pub fn io(path: &Path, err: io::Error) -> ConvertError {
        match err.kind() {
            io::ErrorKind::NotFound => ConvertError::FileNotFound(path.to_path_buf()),
            _ => ConvertError::Io {
                path: path.to_path_buf(),
                source: err,
            },
        }
    }
}

impl fmt::Display for ConvertError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConvertError::FileNotFound(path) => write!(f, "file not found: {}", path.display()),
            ConvertError::MalformedRow {
                path,
                line,
                content,
            } => write!(
                f,
                "malformed row at {}:{}: expected 2 fields, got {content:?}",
                path.display(),
                line
            ),
            ConvertError::EncodingMismatch {
                path,
                charset,
                detail,
            } => write!(
                f,
                "{} cannot be handled as {}: {detail}",
                path.display(),
                charset.name()
            ),
            ConvertError::Io { path, source } => {
                write!(f, "I/O error on {}: {source}", path.display())
            }
            ConvertError::InvalidArguments(msg) => write!(f, "invalid arguments: {msg}"),
            ConvertError::Config(err) => write!(f, "YAML error: {err}"),
            ConvertError::Pattern(err) => write!(f, "pattern error: {err}"),
        }
    }
}

impl std::error::Error for ConvertError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConvertError::Io { source, .. } => Some(source),
            ConvertError::Config(err) => Some(err),
            ConvertError::Pattern(err) => Some(err),
            _ => None,
        }
    }
}

impl From<serde_yaml::Error> for ConvertError {
    fn from(err: serde_yaml::Error) -> ConvertError {
        ConvertError::Config(err)
    }
}

impl From<regex::Error> for ConvertError {
    fn from(err: regex::Error) -> ConvertError {
        ConvertError::Pattern(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_becomes_file_not_found() {
        let err = ConvertError::io(
            Path::new("emoji.csv"),
            io::Error::new(io::ErrorKind::NotFound, "gone"),
        );
        assert!(matches!(err, ConvertError::FileNotFound(ref p) if p == Path::new("emoji.csv")));
        assert_eq!(err.to_string(), "file not found: emoji.csv");
    }

    #[test]
    fn test_other_io_keeps_path() {
        let err = ConvertError::io(
            Path::new("out.txt"),
            io::Error::new(io::ErrorKind::PermissionDenied, "denied"),
        );
        assert!(matches!(err, ConvertError::Io { .. }));
        assert_eq!(err.to_string(), "I/O error on out.txt: denied");
    }

    #[test]
    fn test_malformed_row_message() {
        let err = ConvertError::MalformedRow {
            path: PathBuf::from("standard.csv"),
            line: 3,
            content: "lonely".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "malformed row at standard.csv:3: expected 2 fields, got \"lonely\""
        );
    }
}
