//! Error type shared by the whole crate.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    /// The folder itself could not be opened or enumerated.
    #[error("cannot read folder {}: {source}", path.display())]
    ReadDir {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("cannot read metadata of {}: {source}", path.display())]
    Metadata {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("there is no previous folder to go back to")]
    NoPreviousFolder,
    #[error("no folder has been opened yet")]
    NoCurrentFolder,
    #[error("failed to launch `{program}` for {}: {source}", path.display())]
    Open {
        program: &'static str,
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl Error {
    /// True for errors a caller can always avoid by checking state first
    /// (`can_go_back`, or opening a folder before asking for the current one).
    pub fn is_precondition(&self) -> bool {
        matches!(self, Error::NoPreviousFolder | Error::NoCurrentFolder)
    }
}
