// SPDX-FileCopyrightText: 2025 Jason Pena <jasonpena@awkless.com>
// SPDX-License-Identifier: MIT

//! Repository view persistence.
//!
//! The __repository view__ is a file-backed listing of local clones cartwheel
//! has been asked to keep track of. Importing an application with the
//! repo-view flag set records the fresh clone here so other tooling (and the
//! user) can find every managed clone in one place without walking the file
//! system.
//!
//! The listing lives at `$XDG_DATA_HOME/cartwheel/repositories.toml` by
//! default, but callers own the path and may point the view anywhere.

use crate::config::{ConfigError, RepoViewEntry, RepoViewList};

use mkdirp::mkdirp;
use std::{
    fs::{read_to_string, write},
    path::{Path, PathBuf},
};
use tracing::{debug, info};

/// File-backed listing of known local clones.
#[derive(Debug, Clone)]
pub struct RepoView {
    file_path: PathBuf,
    list: RepoViewList,
}

impl RepoView {
    /// Open repository view at target file path.
    ///
    /// Creates parent directories if needed. A missing file is treated as an
    /// empty listing.
    ///
    /// # Errors
    ///
    /// - Return [`RepoViewError::CreateDir`] if parent directories cannot be
    ///   created.
    /// - Return [`RepoViewError::Read`] if an existing file cannot be read.
    /// - Return [`RepoViewError::Config`] if an existing file cannot be
    ///   parsed.
    pub fn open(file_path: impl Into<PathBuf>) -> Result<Self> {
        let file_path = file_path.into();
        debug!("open repository view at {:?}", file_path.display());

        if let Some(parent) = file_path.parent() {
            mkdirp(parent).map_err(|err| RepoViewError::CreateDir {
                source: err,
                path: parent.to_path_buf(),
            })?;
        }

        let list = if file_path.exists() {
            read_to_string(&file_path)
                .map_err(|err| RepoViewError::Read {
                    source: err,
                    path: file_path.clone(),
                })?
                .parse()?
        } else {
            RepoViewList::default()
        };

        Ok(Self { file_path, list })
    }

    /// Record a local clone in the view.
    ///
    /// Registration is idempotent by clone path. Returns true if the entry
    /// was actually added, in which case the listing is written back to disk.
    ///
    /// # Errors
    ///
    /// - Return [`RepoViewError::Write`] if the listing cannot be written
    ///   back.
    pub fn register(
        &mut self,
        name: impl Into<String>,
        path: impl Into<PathBuf>,
        url: impl Into<String>,
    ) -> Result<bool> {
        let path = path.into();
        if self.is_registered(&path) {
            return Ok(false);
        }

        let entry = RepoViewEntry {
            name: name.into(),
            path,
            url: url.into(),
        };
        info!("add {:?} to repository view", entry.path.display());
        self.list.repositories.push(entry);

        write(&self.file_path, self.list.to_string().as_bytes()).map_err(|err| {
            RepoViewError::Write {
                source: err,
                path: self.file_path.clone(),
            }
        })?;

        Ok(true)
    }

    /// Check if a clone path is already recorded.
    pub fn is_registered(&self, path: impl AsRef<Path>) -> bool {
        self.list
            .repositories
            .iter()
            .any(|entry| entry.path == path.as_ref())
    }

    /// Currently recorded clones.
    pub fn entries(&self) -> &[RepoViewEntry] {
        &self.list.repositories
    }
}

/// Repository view error types.
#[derive(Debug, thiserror::Error)]
pub enum RepoViewError {
    /// Parent directories cannot be created.
    #[error("failed to create repository view directory at {:?}", path.display())]
    CreateDir {
        #[source]
        source: std::io::Error,
        path: PathBuf,
    },

    /// Repository view file cannot be read from.
    #[error("failed to read repository view at {:?}", path.display())]
    Read {
        #[source]
        source: std::io::Error,
        path: PathBuf,
    },

    /// Repository view file cannot be written to.
    #[error("failed to write repository view at {:?}", path.display())]
    Write {
        #[source]
        source: std::io::Error,
        path: PathBuf,
    },

    /// Repository view file cannot be parsed or serialized.
    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Friendly result alias :3
pub type Result<T, E = RepoViewError> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    #[test]
    fn register_is_idempotent_by_path() -> anyhow::Result<()> {
        let dir = TempDir::new()?;
        let file = dir.path().join("view/repositories.toml");

        let mut view = RepoView::open(&file)?;
        assert!(view.register("demo1", "/srv/demo1", "https://blah.org/demo1.git")?);
        assert!(!view.register("demo1", "/srv/demo1", "https://blah.org/demo1.git")?);
        assert_eq!(view.entries().len(), 1);

        // Reopening sees the persisted entry.
        let view = RepoView::open(&file)?;
        assert!(view.is_registered("/srv/demo1"));
        assert_eq!(view.entries()[0].name, "demo1");

        Ok(())
    }

    #[test]
    fn missing_file_is_empty_listing() -> anyhow::Result<()> {
        let dir = TempDir::new()?;
        let view = RepoView::open(dir.path().join("repositories.toml"))?;
        assert!(view.entries().is_empty());

        Ok(())
    }
}
