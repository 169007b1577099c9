// SPDX-FileCopyrightText: 2025 Jason Pena <jasonpena@awkless.com>
// SPDX-License-Identifier: MIT

//! Application import operations.
//!
//! An __application__ is a remote PaaS-hosted application exposing a
//! git-accessible source repository. Importing one materializes it as a
//! local, git-tracked workspace project through an ordered sequence of
//! steps: clone the application's repository, attach a named remote, ensure
//! the project ignores IDE metadata, inject the Maven deployment profile
//! when the project warrants one, and commit whatever the import itself
//! modified as a single changeset.
//!
//! # Failure Model
//!
//! No step retries and no step rolls back. A partially completed import
//! (cloned but not committed, say) is left as-is for the caller to inspect
//! or throw away. Cancellation through the monitor is its own outcome,
//! reported as [`ImportError::Cancelled`] and never conflated with a failed
//! clone or commit.

pub mod gitignore;
pub mod maven;

use crate::{
    import::{gitignore::GitIgnore, maven::MavenProfile},
    progress::ProgressMonitor,
    repoview::{RepoView, RepoViewError},
    workspace::{Project, Workspace, WorkspaceError},
};

use auth_git2::GitAuthenticator;
use git2::{build::RepoBuilder, Config, FetchOptions, RemoteCallbacks, Repository, Signature};
use mkdirp::mkdirp;
use std::{
    path::{Path, PathBuf},
    time,
};
use tracing::{debug, info, instrument};

/// Remote name every clone already carries.
pub const DEFAULT_REMOTE_NAME: &str = "origin";

/// A remote application that can be imported.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Application {
    name: String,
    git_url: String,
}

impl Application {
    /// Construct new application handle.
    pub fn new(name: impl Into<String>, git_url: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            git_url: git_url.into(),
        }
    }

    /// Display name of the application.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Git URL the application's source repository is reachable at.
    pub fn git_url(&self) -> &str {
        &self.git_url
    }
}

/// One application import.
///
/// An operation instance belongs to a single import flow. The set of
/// modified paths only grows during the operation's lifetime and is consumed
/// by one final commit.
#[derive(Debug)]
pub struct ImportOperation {
    project_name: String,
    application: Application,
    remote_name: String,
    modified: Vec<PathBuf>,
}

impl ImportOperation {
    /// Construct new import operation.
    pub fn new(
        project_name: impl Into<String>,
        application: Application,
        remote_name: impl Into<String>,
    ) -> Self {
        Self {
            project_name: project_name.into(),
            application,
            remote_name: remote_name.into(),
            modified: Vec::new(),
        }
    }

    /// Name of the workspace project being imported into.
    pub fn project_name(&self) -> &str {
        &self.project_name
    }

    /// Application being imported.
    pub fn application(&self) -> &Application {
        &self.application
    }

    /// Name the application's remote will be stored under.
    pub fn remote_name(&self) -> &str {
        &self.remote_name
    }

    /// Paths accumulated for the final commit, relative to the project root.
    pub fn modified(&self) -> &[PathBuf] {
        &self.modified
    }

    /// Clone the application's repository to target destination.
    ///
    /// Returns exactly `destination` on success. When a repository view is
    /// supplied, the fresh clone is recorded in it. Credentials are resolved
    /// through the monitor acting as prompter, and transfer progress is
    /// reported back to it.
    ///
    /// # Errors
    ///
    /// - Return [`ImportError::Cancelled`] if the monitor requested
    ///   cancellation before or during the clone.
    /// - Return [`ImportError::Clone`] if the clone itself fails (network,
    ///   auth, filesystem).
    #[instrument(skip(self, destination, repo_view, monitor), level = "debug")]
    pub fn clone_repository<M>(
        &self,
        destination: &Path,
        repo_view: Option<&mut RepoView>,
        monitor: &M,
    ) -> Result<PathBuf>
    where
        M: ProgressMonitor,
    {
        monitor.subtask(&format!(
            "Cloning repository for application {}...",
            self.application.name()
        ));
        if monitor.is_cancelled() {
            return Err(ImportError::Cancelled);
        }

        if let Some(parent) = destination.parent() {
            mkdirp(parent).map_err(|err| ImportError::CreateDestination {
                source: err,
                path: parent.to_path_buf(),
            })?;
        }

        let authenticator = GitAuthenticator::default().set_prompter(monitor.clone());
        let config = Config::open_default()?;

        let mut throttle = time::Instant::now();
        let mut rc = RemoteCallbacks::new();
        rc.credentials(authenticator.credentials(&config));
        rc.transfer_progress(move |progress| {
            let stats = progress.to_owned();
            if throttle.elapsed() > time::Duration::from_millis(10) {
                throttle = time::Instant::now();
                monitor.transfer(stats.received_objects() as u64, stats.total_objects() as u64);
            }
            !monitor.is_cancelled()
        });

        let mut fo = FetchOptions::new();
        fo.remote_callbacks(rc);
        RepoBuilder::new()
            .fetch_options(fo)
            .clone(self.application.git_url(), destination)
            .map_err(|err| {
                if monitor.is_cancelled() {
                    ImportError::Cancelled
                } else {
                    ImportError::Clone {
                        source: err,
                        url: self.application.git_url().to_owned(),
                    }
                }
            })?;
        info!(
            "cloned {} into {:?}",
            self.application.git_url(),
            destination.display()
        );

        if let Some(view) = repo_view {
            view.register(
                self.application.name(),
                destination,
                self.application.git_url(),
            )?;
        }

        Ok(destination.to_path_buf())
    }

    /// Add a named remote reaching target git URL to target repository.
    ///
    /// The remote is not added when the name to use equals
    /// [`DEFAULT_REMOTE_NAME`], since every clone already carries that one.
    /// The comparison is by value.
    ///
    /// # Errors
    ///
    /// - Return [`ImportError::Git2`] if the remote cannot be configured.
    pub fn add_remote(
        &self,
        remote_name: &str,
        git_url: &str,
        repository: &Repository,
    ) -> Result<()> {
        if remote_name == DEFAULT_REMOTE_NAME {
            debug!("skip adding remote named {DEFAULT_REMOTE_NAME:?}");
            return Ok(());
        }

        info!("add remote {remote_name:?} at {git_url}");
        repository.remote(remote_name, git_url)?;

        Ok(())
    }

    /// Mark project-relative paths as modified.
    ///
    /// Marked paths are staged and committed together by
    /// [`add_and_commit_modified`](Self::add_and_commit_modified). An empty
    /// listing is a no-op.
    pub fn add_to_modified(&mut self, paths: impl IntoIterator<Item = impl Into<PathBuf>>) {
        self.modified.extend(paths.into_iter().map(Into::into));
    }

    /// Stage and commit all marked paths in target project as one changeset.
    ///
    /// # Errors
    ///
    /// - Return [`ImportError::Cancelled`] if the monitor requested
    ///   cancellation.
    /// - Return [`ImportError::NotAttached`] naming the project if it is not
    ///   connected to a git repository. Nothing is staged in that case.
    /// - Return [`ImportError::Git2`] if staging or committing fails.
    #[instrument(skip(self, project, monitor), level = "debug")]
    pub fn add_and_commit_modified<M>(
        &self,
        project: &Project,
        monitor: &M,
    ) -> Result<git2::Oid>
    where
        M: ProgressMonitor,
    {
        monitor.subtask(&format!(
            "Committing changes to project {}...",
            project.name()
        ));
        if monitor.is_cancelled() {
            return Err(ImportError::Cancelled);
        }

        let repository = Repository::open(project.path()).map_err(|_| ImportError::NotAttached {
            project: project.name().to_owned(),
        })?;

        let mut index = repository.index()?;
        for path in &self.modified {
            debug!("stage {:?}", path.display());
            index.add_path(path)?;
        }
        index.write()?;
        let tree = repository.find_tree(index.write_tree()?)?;

        // INVARIANT: Fall back to a fixed identity when the repository's
        // config carries none, so imports work in bare environments.
        let signature = repository
            .signature()
            .or_else(|_| Signature::now("cartwheel", "cartwheel@localhost"))?;

        let mut parents = Vec::new();
        if let Ok(head) = repository.head() {
            parents.push(head.peel_to_commit()?);
        }
        let parents = parents.iter().collect::<Vec<_>>();

        let oid = repository.commit(
            Some("HEAD"),
            &signature,
            &signature,
            &format!("chore: import application {}", self.application.name()),
            &tree,
            &parents,
        )?;
        info!("committed import changeset {oid}");

        Ok(oid)
    }

    /// Ensure target project ignores IDE metadata and build output.
    ///
    /// Guarantees each entry of [`gitignore::REQUIRED_ENTRIES`] is present
    /// in the project's gitignore file, creating the file if absent and
    /// extending it otherwise. Idempotent. Returns the path of the gitignore
    /// file.
    ///
    /// # Errors
    ///
    /// - Return [`ImportError::GitIgnore`] if the file cannot be read or
    ///   written.
    pub fn setup_git_ignore<M>(&self, project: &Project, monitor: &M) -> Result<PathBuf>
    where
        M: ProgressMonitor,
    {
        monitor.subtask(&format!(
            "Configuring .gitignore for project {}...",
            project.name()
        ));

        let mut ignore = GitIgnore::load(project.path())?;
        ignore.add_all(gitignore::REQUIRED_ENTRIES);

        Ok(ignore.write()?)
    }

    /// Inject the Maven deployment profile into target project.
    ///
    /// Returns `None` for a project that is not a Maven project, and for a
    /// pom that already carries the profile. Returns the path of the
    /// modified pom on first injection.
    ///
    /// # Errors
    ///
    /// - Return [`ImportError::Maven`] if pom inspection or editing fails.
    pub fn setup_maven_profile<M>(&self, project: &Project, monitor: &M) -> Result<Option<PathBuf>>
    where
        M: ProgressMonitor,
    {
        if !MavenProfile::is_maven_project(project.path()) {
            return Ok(None);
        }

        monitor.subtask(&format!(
            "Configuring deployment profile for project {}...",
            project.name()
        ));
        let mut profile = MavenProfile::load(project.path())?;
        if profile.exists_in_pom()? {
            debug!("pom of {:?} already carries the profile", project.name());
            return Ok(None);
        }
        profile.add_to_pom(project.name())?;

        Ok(Some(profile.save_pom()?))
    }

    /// Run the full import sequence.
    ///
    /// Clone, attach the named remote, configure the gitignore, inject the
    /// deployment profile when the project warrants one, and commit the
    /// files the import touched as a single changeset. Returns the project's
    /// destination path.
    ///
    /// # Errors
    ///
    /// Propagates the first failing step. See the individual step methods
    /// for their error conditions.
    #[instrument(skip_all, fields(project = %self.project_name), level = "debug")]
    pub fn run<M>(
        &mut self,
        workspace: &Workspace,
        mut repo_view: Option<&mut RepoView>,
        monitor: &M,
    ) -> Result<PathBuf>
    where
        M: ProgressMonitor,
    {
        let destination = workspace.project_path(&self.project_name);
        self.clone_repository(&destination, repo_view.as_deref_mut(), monitor)?;

        let repository = Repository::open(&destination)?;
        self.add_remote(self.remote_name(), self.application.git_url(), &repository)?;

        let project = workspace.project(&self.project_name)?;
        self.setup_git_ignore(&project, monitor)?;
        self.add_to_modified([".gitignore"]);
        if self.setup_maven_profile(&project, monitor)?.is_some() {
            self.add_to_modified(["pom.xml"]);
        }
        self.add_and_commit_modified(&project, monitor)?;

        Ok(destination)
    }
}

/// Application import error types.
#[derive(Debug, thiserror::Error)]
pub enum ImportError {
    /// Caller requested cancellation through the monitor.
    #[error("import cancelled")]
    Cancelled,

    /// Clone destination directories cannot be created.
    #[error("failed to create destination directory {:?}", path.display())]
    CreateDestination {
        #[source]
        source: std::io::Error,
        path: PathBuf,
    },

    /// Application repository cannot be cloned.
    #[error("failed to clone repository at {url:?}")]
    Clone {
        #[source]
        source: git2::Error,
        url: String,
    },

    /// Project to commit is not connected to a git repository.
    #[error("project {project:?} is not connected to a git repository")]
    NotAttached { project: String },

    /// Workspace lookup fails.
    #[error(transparent)]
    Workspace(#[from] WorkspaceError),

    /// Gitignore editing fails.
    #[error(transparent)]
    GitIgnore(#[from] gitignore::GitIgnoreError),

    /// Maven profile editing fails.
    #[error(transparent)]
    Maven(#[from] maven::MavenError),

    /// Repository view recording fails.
    #[error(transparent)]
    RepoView(#[from] RepoViewError),

    /// Operations from libgit2 fail.
    #[error(transparent)]
    Git2(#[from] git2::Error),
}

/// Friendly result alias :3
pub type Result<T, E = ImportError> = std::result::Result<T, E>;
