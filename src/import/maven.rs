// SPDX-FileCopyrightText: 2025 Jason Pena <jasonpena@awkless.com>
// SPDX-License-Identifier: MIT

//! Maven deployment profile injection.
//!
//! Applications built on the platform are compiled server-side by invoking
//! Maven with a dedicated `openshift` profile. Imported projects that carry a
//! `pom.xml` get that profile injected once, so a plain `mvn package
//! -Popenshift` produces a war in the `deployments` directory the platform
//! picks up.
//!
//! The pom is inspected with a real XML parser, but the injection itself is a
//! text splice. Rewriting the whole document through a serializer would
//! clobber the user's formatting and comments for no gain.

use std::{
    fs::{read_to_string, write},
    path::{Path, PathBuf},
};
use tracing::{debug, info};

/// Identifier of the injected profile.
pub const PROFILE_ID: &str = "openshift";

/// Deployment profile editor for a project's `pom.xml`.
#[derive(Debug, Clone)]
pub struct MavenProfile {
    pom_path: PathBuf,
    content: String,
}

impl MavenProfile {
    /// Check if target project directory is a Maven project.
    ///
    /// A project is a Maven project if it carries a `pom.xml` at its root.
    pub fn is_maven_project(project_root: impl AsRef<Path>) -> bool {
        project_root.as_ref().join("pom.xml").is_file()
    }

    /// Load the pom at the root of target project directory.
    ///
    /// # Errors
    ///
    /// - Return [`MavenError::ReadPom`] if the pom cannot be read.
    pub fn load(project_root: impl AsRef<Path>) -> Result<Self> {
        let pom_path = project_root.as_ref().join("pom.xml");
        let content = read_to_string(&pom_path).map_err(|err| MavenError::ReadPom {
            source: err,
            pom_path: pom_path.clone(),
        })?;

        Ok(Self { pom_path, content })
    }

    /// Check if the pom already carries the deployment profile.
    ///
    /// Matches on local element names so poms with or without the usual
    /// default namespace are treated the same.
    ///
    /// # Errors
    ///
    /// - Return [`MavenError::ParsePom`] if the pom is not valid XML.
    pub fn exists_in_pom(&self) -> Result<bool> {
        let document = roxmltree::Document::parse(&self.content).map_err(MavenError::ParsePom)?;
        let found = document
            .descendants()
            .filter(|node| node.tag_name().name() == "profile")
            .any(|profile| {
                profile
                    .children()
                    .find(|child| child.tag_name().name() == "id")
                    .and_then(|id| id.text())
                    .map(str::trim)
                    == Some(PROFILE_ID)
            });

        Ok(found)
    }

    /// Inject the deployment profile keyed by target project name.
    ///
    /// Splices the profile into an existing `<profiles>` block when the pom
    /// has one, otherwise appends a fresh block right before `</project>`.
    ///
    /// # Errors
    ///
    /// - Return [`MavenError::MalformedPom`] if the pom carries no closing
    ///   `</project>` tag to anchor the splice on.
    pub fn add_to_pom(&mut self, project_name: impl AsRef<str>) -> Result<()> {
        let profile = profile_snippet(project_name.as_ref());

        if let Some(index) = self.content.rfind("</profiles>") {
            debug!("splice profile into existing <profiles> block");
            self.content.insert_str(index, &profile);
        } else if let Some(index) = self.content.rfind("</project>") {
            debug!("append fresh <profiles> block");
            let block = format!("  <profiles>\n{profile}  </profiles>\n");
            self.content.insert_str(index, &block);
        } else {
            return Err(MavenError::MalformedPom {
                pom_path: self.pom_path.clone(),
            });
        }

        Ok(())
    }

    /// Write the pom back to disk.
    ///
    /// Returns the path of the modified pom.
    ///
    /// # Errors
    ///
    /// - Return [`MavenError::WritePom`] if the pom cannot be written to.
    pub fn save_pom(&self) -> Result<PathBuf> {
        info!("save deployment profile to {:?}", self.pom_path.display());
        write(&self.pom_path, self.content.as_bytes()).map_err(|err| MavenError::WritePom {
            source: err,
            pom_path: self.pom_path.clone(),
        })?;

        Ok(self.pom_path.clone())
    }
}

fn profile_snippet(project_name: &str) -> String {
    format!(
        r#"    <profile>
      <!-- Used when the application is built on the platform. -->
      <id>{PROFILE_ID}</id>
      <build>
        <plugins>
          <plugin>
            <artifactId>maven-war-plugin</artifactId>
            <configuration>
              <outputDirectory>deployments</outputDirectory>
              <warName>{project_name}</warName>
            </configuration>
          </plugin>
        </plugins>
      </build>
    </profile>
"#
    )
}

/// Maven profile editing error types.
#[derive(Debug, thiserror::Error)]
pub enum MavenError {
    /// Pom cannot be read from.
    #[error("failed to read pom at {:?}", pom_path.display())]
    ReadPom {
        #[source]
        source: std::io::Error,
        pom_path: PathBuf,
    },

    /// Pom cannot be written to.
    #[error("failed to write pom at {:?}", pom_path.display())]
    WritePom {
        #[source]
        source: std::io::Error,
        pom_path: PathBuf,
    },

    /// Pom is not valid XML.
    #[error(transparent)]
    ParsePom(#[from] roxmltree::Error),

    /// Pom carries no closing project tag to splice into.
    #[error("pom at {:?} has no closing </project> tag", pom_path.display())]
    MalformedPom { pom_path: PathBuf },
}

/// Friendly result alias :3
pub type Result<T, E = MavenError> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;
    use indoc::indoc;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    const BARE_POM: &str = indoc! {r#"
        <?xml version="1.0" encoding="UTF-8"?>
        <project xmlns="http://maven.apache.org/POM/4.0.0">
          <modelVersion>4.0.0</modelVersion>
          <groupId>org.blah</groupId>
          <artifactId>demo1</artifactId>
          <version>1.0</version>
        </project>
    "#};

    fn project_with_pom(pom: &str) -> anyhow::Result<TempDir> {
        let dir = TempDir::new()?;
        std::fs::write(dir.path().join("pom.xml"), pom)?;
        Ok(dir)
    }

    #[test]
    fn detects_maven_projects() -> anyhow::Result<()> {
        let with = project_with_pom(BARE_POM)?;
        let without = TempDir::new()?;

        assert!(MavenProfile::is_maven_project(with.path()));
        assert!(!MavenProfile::is_maven_project(without.path()));

        Ok(())
    }

    #[test]
    fn injects_profile_into_bare_pom() -> anyhow::Result<()> {
        let dir = project_with_pom(BARE_POM)?;
        let mut profile = MavenProfile::load(dir.path())?;

        assert!(!profile.exists_in_pom()?);
        profile.add_to_pom("demo1")?;
        assert!(profile.exists_in_pom()?);

        let saved = profile.save_pom()?;
        let content = std::fs::read_to_string(&saved)?;
        assert!(content.contains("<id>openshift</id>"));
        assert!(content.contains("<warName>demo1</warName>"));
        assert!(content.contains("<outputDirectory>deployments</outputDirectory>"));

        Ok(())
    }

    #[test]
    fn splices_into_existing_profiles_block() -> anyhow::Result<()> {
        let pom = indoc! {r#"
            <project>
              <artifactId>demo1</artifactId>
              <profiles>
                <profile>
                  <id>fast</id>
                </profile>
              </profiles>
            </project>
        "#};
        let dir = project_with_pom(pom)?;
        let mut profile = MavenProfile::load(dir.path())?;

        profile.add_to_pom("demo1")?;
        profile.save_pom()?;
        let content = std::fs::read_to_string(dir.path().join("pom.xml"))?;

        // No second <profiles> block was opened.
        assert_eq!(content.matches("<profiles>").count(), 1);
        assert!(content.contains("<id>fast</id>"));
        assert!(content.contains("<id>openshift</id>"));

        Ok(())
    }

    #[test]
    fn existing_profile_is_detected() -> anyhow::Result<()> {
        let pom = indoc! {r#"
            <project>
              <profiles>
                <profile>
                  <id>openshift</id>
                </profile>
              </profiles>
            </project>
        "#};
        let dir = project_with_pom(pom)?;
        let profile = MavenProfile::load(dir.path())?;

        assert!(profile.exists_in_pom()?);

        Ok(())
    }

    #[test]
    fn pom_without_project_tag_is_malformed() -> anyhow::Result<()> {
        let dir = project_with_pom("<!-- not a pom -->")?;
        let mut profile = MavenProfile::load(dir.path())?;

        let result = profile.add_to_pom("demo1");
        assert!(matches!(result, Err(MavenError::MalformedPom { .. })));

        Ok(())
    }
}
