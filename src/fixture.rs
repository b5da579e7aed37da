//! Loading fixtures from disk.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use t262_syntax::frontmatter::{self, FixtureMetadata};
use thiserror::Error;

/// Fixtures larger than this are refused before reading.
pub const MAX_FIXTURE_SIZE: u64 = 100 * 1024 * 1024;

/// A loaded fixture: its path, source text and header metadata. Immutable once created.
#[derive(Debug, Clone, PartialEq)]
pub struct Fixture {
    path: PathBuf,
    source: String,
    metadata: FixtureMetadata,
}

impl Fixture {
    /// Build a fixture from in-memory source; the header is parsed immediately.
    pub fn from_source(path: impl Into<PathBuf>, source: impl Into<String>) -> Self {
        let source = source.into();
        let metadata = frontmatter::parse_header(&source);
        Self {
            path: path.into(),
            source,
            metadata,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn metadata(&self) -> &FixtureMetadata {
        &self.metadata
    }

    /// `@description`, if the header had one.
    pub fn description(&self) -> Option<&str> {
        self.metadata.description.as_deref()
    }

    /// Name used in reports: the header's `@path` when present, otherwise the file path.
    pub fn display_name(&self) -> String {
        match &self.metadata.path {
            Some(path) => path.clone(),
            None => self.path.display().to_string(),
        }
    }
}

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("fixture not found: {}", path.display())]
    NotFound { path: PathBuf },
    #[error("fixture '{}' is too large ({size} bytes, max {max} bytes)", path.display(), max = MAX_FIXTURE_SIZE)]
    TooLarge { path: PathBuf, size: u64 },
    #[error("error reading fixture '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl LoadError {
    pub fn path(&self) -> &Path {
        match self {
            LoadError::NotFound { path } | LoadError::TooLarge { path, .. } | LoadError::Io { path, .. } => path,
        }
    }
}

/// Read the fixture at `path` and parse its header.
#[tracing::instrument(skip_all, fields(path = %path.as_ref().display()))]
pub fn load(path: impl AsRef<Path>) -> Result<Fixture, LoadError> {
    let path = path.as_ref();
    let io_error = |source: io::Error| {
        if source.kind() == io::ErrorKind::NotFound {
            LoadError::NotFound { path: path.to_path_buf() }
        } else {
            LoadError::Io {
                path: path.to_path_buf(),
                source,
            }
        }
    };

    let metadata = fs::metadata(path).map_err(io_error)?;
    if metadata.len() > MAX_FIXTURE_SIZE {
        return Err(LoadError::TooLarge {
            path: path.to_path_buf(),
            size: metadata.len(),
        });
    }
    let source = fs::read_to_string(path).map_err(io_error)?;
    tracing::debug!(bytes = source.len(), "loaded fixture");
    Ok(Fixture::from_source(path, source))
}
