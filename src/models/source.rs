use crate::utils::constants::GZIP_SUFFIX;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Compression {
    None,
    Gzip,
}

impl Compression {
    /// Gzip when the name ends in `.gz`
    pub fn from_name(name: &str) -> Self {
        if name.to_ascii_lowercase().ends_with(GZIP_SUFFIX) {
            Compression::Gzip
        } else {
            Compression::None
        }
    }
}

impl fmt::Display for Compression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Compression::None => write!(f, "none"),
            Compression::Gzip => write!(f, "gzip"),
        }
    }
}

/// A downloaded file on local disk
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceFile {
    pub path: PathBuf,
    pub compression: Compression,
}

impl SourceFile {
    pub fn new(path: PathBuf, compression: Compression) -> Self {
        Self { path, compression }
    }

    /// Infer compression from the file name
    pub fn from_path(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref().to_path_buf();
        let compression = path
            .file_name()
            .and_then(|n| n.to_str())
            .map(Compression::from_name)
            .unwrap_or(Compression::None);
        Self { path, compression }
    }
}
