// SPDX-FileCopyrightText: 2025 Jason Pena <jasonpena@awkless.com>
// SPDX-License-Identifier: MIT

//! Workspace model.
//!
//! A __workspace__ is a directory whose immediate subdirectories are
//! __projects__. Each project groups the files of one imported application
//! into a single unit that can be looked up by name. The workspace is an
//! explicitly constructed value owned by the caller, so nothing in this crate
//! reaches for ambient global state to find it.
//!
//! # Workspace Layout
//!
//! The workspace can generally be placed anywhere on the user's file system.
//! However, the default location is `$HOME/cartwheel`. Cartwheel only
//! evaluates the top-level of the workspace. Thus, it is not possible to nest
//! one project inside another.

use mkdirp::mkdirp;
use std::path::{Path, PathBuf};
use tracing::debug;

/// A workspace of imported projects.
#[derive(Debug, Clone)]
pub struct Workspace {
    root: PathBuf,
}

impl Workspace {
    /// Open workspace at target root directory.
    ///
    /// Creates the root directory if it does not exist yet.
    ///
    /// # Errors
    ///
    /// - Return [`WorkspaceError::CreateRoot`] if the root directory cannot
    ///   be created when missing.
    pub fn open(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();
        debug!("open workspace at {:?}", root.display());
        mkdirp(&root).map_err(|err| WorkspaceError::CreateRoot {
            source: err,
            root: root.clone(),
        })?;

        Ok(Self { root })
    }

    /// Root directory of the workspace.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Path a project with the given name would occupy.
    ///
    /// Does not check if the path returned actually exists. Use this to pick
    /// a clone destination for a project that does not exist yet.
    pub fn project_path(&self, name: impl AsRef<str>) -> PathBuf {
        self.root.join(name.as_ref())
    }

    /// Resolve the workspace project with the given name.
    ///
    /// A missing project is a precondition violation on the caller's part,
    /// not a recoverable condition.
    ///
    /// # Errors
    ///
    /// - Return [`WorkspaceError::ProjectNotFound`] naming the offending
    ///   project if no directory with the given name exists at the top-level
    ///   of the workspace.
    pub fn project(&self, name: impl AsRef<str>) -> Result<Project> {
        let name = name.as_ref();
        let path = self.root.join(name);
        if !path.is_dir() {
            return Err(WorkspaceError::ProjectNotFound {
                name: name.to_owned(),
                root: self.root.clone(),
            });
        }

        Ok(Project {
            name: name.to_owned(),
            path,
        })
    }
}

/// A resolved workspace project.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Project {
    name: String,
    path: PathBuf,
}

impl Project {
    /// Name of the project.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Absolute path to the project root.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Absolute path to a file relative to the project root.
    pub fn file(&self, relative: impl AsRef<Path>) -> PathBuf {
        self.path.join(relative.as_ref())
    }
}

/// Workspace interaction error types.
#[derive(Debug, thiserror::Error)]
pub enum WorkspaceError {
    /// Workspace root cannot be created when missing.
    #[error("failed to create workspace root at {:?}", root.display())]
    CreateRoot {
        #[source]
        source: std::io::Error,
        root: PathBuf,
    },

    /// Named project does not exist at the top-level of the workspace.
    #[error("could not find project {name:?} in workspace {:?}", root.display())]
    ProjectNotFound { name: String, root: PathBuf },
}

/// Friendly result alias :3
pub type Result<T, E = WorkspaceError> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    #[test]
    fn open_creates_missing_root() -> anyhow::Result<()> {
        let dir = TempDir::new()?;
        let root = dir.path().join("workspace");

        let workspace = Workspace::open(&root)?;
        assert!(root.is_dir());
        assert_eq!(workspace.root(), root.as_path());

        Ok(())
    }

    #[test]
    fn project_resolves_existing_directory() -> anyhow::Result<()> {
        let dir = TempDir::new()?;
        let workspace = Workspace::open(dir.path())?;
        std::fs::create_dir(workspace.project_path("demo1"))?;

        let project = workspace.project("demo1")?;
        assert_eq!(project.name(), "demo1");
        assert_eq!(project.path(), dir.path().join("demo1"));
        assert_eq!(project.file("pom.xml"), dir.path().join("demo1/pom.xml"));

        Ok(())
    }

    #[test]
    fn project_lookup_names_missing_project() -> anyhow::Result<()> {
        let dir = TempDir::new()?;
        let workspace = Workspace::open(dir.path())?;

        let result = workspace.project("ghost");
        match result {
            Err(WorkspaceError::ProjectNotFound { name, .. }) => assert_eq!(name, "ghost"),
            other => panic!("expected ProjectNotFound, got {other:?}"),
        }

        Ok(())
    }
}
