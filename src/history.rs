//! Back stack of the folders visited so far.

use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

/// Folders visited so far, oldest first. The last one is on screen.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NavigationHistory {
    stack: Vec<PathBuf>,
}

impl NavigationHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make `path` the current folder. Pushing the current folder again does nothing.
    pub fn push<P: Into<PathBuf>>(&mut self, path: P) {
        let path = path.into();
        if self.stack.last() == Some(&path) {
            return;
        }
        self.stack.push(path);
    }

    /// Drop the current folder and return the one before it.
    ///
    /// Fails with [`Error::NoPreviousFolder`] unless [`can_go_back`](Self::can_go_back)
    /// holds; the history is left untouched in that case.
    pub fn go_back(&mut self) -> Result<&Path> {
        if !self.can_go_back() {
            return Err(Error::NoPreviousFolder);
        }
        self.stack.pop();
        self.current()
    }

    pub fn can_go_back(&self) -> bool {
        self.stack.len() > 1
    }

    pub fn current(&self) -> Result<&Path> {
        self.stack
            .last()
            .map(PathBuf::as_path)
            .ok_or(Error::NoCurrentFolder)
    }

    pub fn len(&self) -> usize {
        self.stack.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stack.is_empty()
    }

    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &Path> {
        self.stack.iter().map(PathBuf::as_path)
    }
}
