use std::{
    io,
    path::{Path, PathBuf},
    process::ExitStatus,
};

#[derive(Debug, thiserror::Error)]
pub(crate) enum Error {
    #[error("{path:?}: {source}")]
    FileSystem {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("directory tree operation failed: {0}")]
    Tree(#[from] fs_extra::error::Error),
    #[error("{path:?}: {reason}")]
    Parse { path: PathBuf, reason: String },
    #[error("invalid selection {input:?}: {reason}")]
    InvalidSelection { input: String, reason: String },
    #[error("terminal i/o failed: {0}")]
    Terminal(#[source] io::Error),
    #[error("post {0:?} does not exist")]
    NotFound(String),
    #[error("could not create post {slug:?}: {source}")]
    Create {
        slug: String,
        #[source]
        source: io::Error,
    },
    #[error("failed to start {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: io::Error,
    },
    #[error("{program} exited with {status}")]
    Subprocess { program: String, status: ExitStatus },
}

pub(crate) type Result<T, E = Error> = std::result::Result<T, E>;

/// Attaches the offending path to a bare `io::Error`.
pub(crate) trait PathContext<T> {
    fn at(self, path: &Path) -> Result<T>;
}

impl<T> PathContext<T> for io::Result<T> {
    fn at(self, path: &Path) -> Result<T> {
        self.map_err(|source| Error::FileSystem {
            path: path.to_owned(),
            source,
        })
    }
}
