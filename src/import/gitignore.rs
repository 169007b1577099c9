// SPDX-FileCopyrightText: 2025 Jason Pena <jasonpena@awkless.com>
// SPDX-License-Identifier: MIT

//! Gitignore file editing.
//!
//! Freshly imported projects pick up IDE metadata and build output that has
//! no business in the application's history. Cartwheel guarantees a fixed
//! entry set is present in the project's `.gitignore`, creating the file if
//! it does not exist yet and extending it otherwise.
//!
//! The editor is duplicate-free and order-preserving. Unlike sparse checkout
//! rule files, gitignore line order is user-visible and often hand-curated,
//! so existing lines (comments and blanks included) are kept exactly where
//! they were and new entries only ever append.

use std::{
    fmt::{Display, Formatter, Result as FmtResult},
    fs::{read_to_string, write},
    path::{Path, PathBuf},
};
use tracing::debug;

/// Entries every imported project must ignore.
pub const REQUIRED_ENTRIES: [&str; 5] =
    ["target", ".settings", ".project", ".classpath", ".factorypath"];

/// Gitignore file editor.
///
/// # Invariant
///
/// - No duplicate entries.
/// - Entry insertion never reorders existing lines.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GitIgnore {
    path: PathBuf,
    lines: Vec<String>,
    changed: bool,
}

impl GitIgnore {
    /// Load the gitignore file at the root of target project directory.
    ///
    /// A missing file is treated as empty content.
    ///
    /// # Errors
    ///
    /// - Return [`GitIgnoreError::Read`] if an existing file cannot be read.
    pub fn load(project_root: impl AsRef<Path>) -> Result<Self> {
        let path = project_root.as_ref().join(".gitignore");
        let lines = if path.exists() {
            read_to_string(&path)
                .map_err(|err| GitIgnoreError::Read {
                    source: err,
                    path: path.clone(),
                })?
                .lines()
                .map(str::to_owned)
                .collect()
        } else {
            Vec::new()
        };

        Ok(Self {
            path,
            lines,
            changed: false,
        })
    }

    /// Add an entry unless it is already present.
    pub fn add(&mut self, entry: impl Into<String>) -> &mut Self {
        let entry = entry.into();
        if !self.contains(&entry) {
            debug!("add {entry:?} to {:?}", self.path.display());
            self.lines.push(entry);
            self.changed = true;
        }

        self
    }

    /// Add a listing of entries, skipping the ones already present.
    pub fn add_all(&mut self, entries: impl IntoIterator<Item = impl Into<String>>) -> &mut Self {
        for entry in entries {
            self.add(entry);
        }

        self
    }

    /// Check if an entry is already present.
    pub fn contains(&self, entry: impl AsRef<str>) -> bool {
        self.lines.iter().any(|line| line == entry.as_ref())
    }

    /// Check if the editor holds unwritten changes.
    pub fn changed(&self) -> bool {
        self.changed
    }

    /// Write the gitignore file back to disk.
    ///
    /// The file is only touched when entries were actually added, or when it
    /// does not exist yet. Returns the path of the gitignore file either way.
    ///
    /// # Errors
    ///
    /// - Return [`GitIgnoreError::Write`] if the file cannot be written to.
    pub fn write(&self) -> Result<PathBuf> {
        if self.changed || !self.path.exists() {
            write(&self.path, self.to_string().as_bytes()).map_err(|err| {
                GitIgnoreError::Write {
                    source: err,
                    path: self.path.clone(),
                }
            })?;
        }

        Ok(self.path.clone())
    }
}

impl Display for GitIgnore {
    fn fmt(&self, fmt: &mut Formatter<'_>) -> FmtResult {
        for line in &self.lines {
            writeln!(fmt, "{line}")?;
        }

        Ok(())
    }
}

/// Gitignore editing error types.
#[derive(Debug, thiserror::Error)]
pub enum GitIgnoreError {
    /// Gitignore file cannot be read from.
    #[error("failed to read gitignore at {:?}", path.display())]
    Read {
        #[source]
        source: std::io::Error,
        path: PathBuf,
    },

    /// Gitignore file cannot be written to.
    #[error("failed to write gitignore at {:?}", path.display())]
    Write {
        #[source]
        source: std::io::Error,
        path: PathBuf,
    },
}

/// Friendly result alias :3
pub type Result<T, E = GitIgnoreError> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;
    use indoc::indoc;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    #[test]
    fn add_preserves_existing_lines() -> anyhow::Result<()> {
        let dir = TempDir::new()?;
        std::fs::write(
            dir.path().join(".gitignore"),
            indoc! {r#"
                # build output
                target

                *.log
            "#},
        )?;

        let mut ignore = GitIgnore::load(dir.path())?;
        ignore.add_all(REQUIRED_ENTRIES);
        let result = ignore.to_string();
        let expect = indoc! {r#"
            # build output
            target

            *.log
            .settings
            .project
            .classpath
            .factorypath
        "#};
        assert_eq!(result, expect);

        Ok(())
    }

    #[test]
    fn add_skips_present_entries() -> anyhow::Result<()> {
        let dir = TempDir::new()?;
        let mut ignore = GitIgnore::load(dir.path())?;

        ignore.add_all(REQUIRED_ENTRIES);
        assert!(ignore.changed());
        let before = ignore.to_string();

        ignore.add_all(REQUIRED_ENTRIES);
        assert_eq!(ignore.to_string(), before);

        Ok(())
    }

    #[test]
    fn write_creates_missing_file() -> anyhow::Result<()> {
        let dir = TempDir::new()?;
        let mut ignore = GitIgnore::load(dir.path())?;
        ignore.add("target");

        let path = ignore.write()?;
        assert_eq!(path, dir.path().join(".gitignore"));
        assert_eq!(std::fs::read_to_string(&path)?, "target\n");

        Ok(())
    }

    #[test]
    fn unchanged_existing_file_is_left_alone() -> anyhow::Result<()> {
        let dir = TempDir::new()?;
        std::fs::write(dir.path().join(".gitignore"), "target\n")?;

        let mut ignore = GitIgnore::load(dir.path())?;
        ignore.add("target");
        assert!(!ignore.changed());
        ignore.write()?;

        assert_eq!(
            std::fs::read_to_string(dir.path().join(".gitignore"))?,
            "target\n"
        );

        Ok(())
    }
}
