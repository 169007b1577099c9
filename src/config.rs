// SPDX-FileCopyrightText: 2025 Jason Pena <jasonpena@awkless.com>
// SPDX-License-Identifier: MIT

//! Configuration layout.
//!
//! Specify the layout for configuration files that Cartwheel uses to simplify
//! the process of serialization and deserialization. File I/O is left to the
//! caller to figure out.

use serde::{Deserialize, Serialize};
use std::{
    fmt::{Display, Error as FmtError, Formatter, Result as FmtResult},
    path::PathBuf,
    str::FromStr,
};

/// Repository view file layout.
///
/// The repository view is a plain TOML listing of local clones the user asked
/// cartwheel to keep track of. Each entry records the application the clone
/// came from, where the clone lives, and the remote URL it was cloned from.
#[derive(Default, Debug, PartialEq, Eq, Clone, Deserialize, Serialize)]
pub struct RepoViewList {
    /// Known local clones.
    #[serde(rename = "repository", default)]
    pub repositories: Vec<RepoViewEntry>,
}

impl FromStr for RepoViewList {
    type Err = ConfigError;

    fn from_str(data: &str) -> Result<Self, Self::Err> {
        let mut list: RepoViewList = toml::de::from_str(data).map_err(ConfigError::Deserialize)?;

        // INVARIANT: Perform shell expansion on stored clone paths.
        for entry in &mut list.repositories {
            entry.path = PathBuf::from(
                shellexpand::full(entry.path.to_string_lossy().as_ref())
                    .map_err(ConfigError::ShellExpansion)?
                    .into_owned(),
            );
        }

        Ok(list)
    }
}

impl Display for RepoViewList {
    fn fmt(&self, fmt: &mut Formatter<'_>) -> FmtResult {
        fmt.write_str(
            toml::ser::to_string_pretty(self)
                .map_err(ConfigError::Serialize)?
                .as_str(),
        )
    }
}

/// One known local clone.
#[derive(Default, Debug, PartialEq, Eq, Clone, Deserialize, Serialize)]
pub struct RepoViewEntry {
    /// Name of the application the clone came from.
    pub name: String,

    /// Absolute path to the local clone.
    pub path: PathBuf,

    /// Remote URL the clone was created from.
    pub url: String,
}

/// Configuration error types.
#[derive(Clone, Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to deserialize configuration.
    #[error(transparent)]
    Deserialize(#[from] toml::de::Error),

    /// Failed to serialize configuration.
    #[error(transparent)]
    Serialize(#[from] toml::ser::Error),

    /// Failed to perform shell expansion on configuration.
    #[error(transparent)]
    ShellExpansion(#[from] shellexpand::LookupError<std::env::VarError>),
}

impl From<ConfigError> for FmtError {
    fn from(_: ConfigError) -> Self {
        FmtError
    }
}

/// Friendly result alias :3
pub type Result<T, E = ConfigError> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;
    use indoc::indoc;
    use pretty_assertions::assert_eq;
    use sealed_test::prelude::*;

    #[sealed_test(env = [("CLONES", "/home/blah/clones")])]
    fn deserialize_repo_view_list() -> anyhow::Result<()> {
        let result: RepoViewList = r#"
            [[repository]]
            name = "demo1"
            path = "$CLONES/demo1"
            url = "https://blah.org/demo1.git"

            [[repository]]
            name = "demo2"
            path = "/srv/demo2"
            url = "https://blah.org/demo2.git"
        "#
        .parse()?;

        let expect = RepoViewList {
            repositories: vec![
                RepoViewEntry {
                    name: "demo1".into(),
                    path: "/home/blah/clones/demo1".into(),
                    url: "https://blah.org/demo1.git".into(),
                },
                RepoViewEntry {
                    name: "demo2".into(),
                    path: "/srv/demo2".into(),
                    url: "https://blah.org/demo2.git".into(),
                },
            ],
        };

        assert_eq!(result, expect);

        Ok(())
    }

    #[test]
    fn serialize_repo_view_list() {
        let result = RepoViewList {
            repositories: vec![RepoViewEntry {
                name: "demo1".into(),
                path: "/home/blah/clones/demo1".into(),
                url: "https://blah.org/demo1.git".into(),
            }],
        }
        .to_string();

        let expect = indoc! {r#"
            [[repository]]
            name = "demo1"
            path = "/home/blah/clones/demo1"
            url = "https://blah.org/demo1.git"
        "#};

        assert_eq!(result, expect);
    }
}
