// SPDX-FileCopyrightText: 2025 Jason Pena <jasonpena@awkless.com>
// SPDX-License-Identifier: MIT

//! Progress reporting and cooperative cancellation.
//!
//! Long-running import steps (cloning, committing) are expected to run on a
//! background worker thread, reporting sub-task text through a caller
//! supplied monitor and checking for cancellation at step boundaries. A
//! monitor also acts as the credential prompter for authenticated clones, so
//! any prompt can suspend the progress display instead of fighting it for
//! the terminal.
//!
//! Cancellation is cooperative. Whoever owns the monitor flips its flag, and
//! the running operation notices at the next boundary or transfer callback.
//! The operation surfaces this as its own error variant so callers never
//! mistake a cancelled import for a failed one.

use auth_git2::Prompter;
use indicatif::{ProgressBar, ProgressStyle};
use inquire::{Password, Text};
use std::{
    path::Path,
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc,
    },
    time::Duration,
};
use tracing::{debug, info, instrument};

/// Caller-supplied progress monitor.
///
/// Models the monitor object long-running operations report to. The
/// [`Prompter`] supertrait lets the same value answer credential prompts
/// raised mid-clone.
pub trait ProgressMonitor: Prompter + Clone + Send + Sync + 'static {
    /// Report the sub-task currently being worked on.
    fn subtask(&self, text: &str);

    /// Report object transfer progress for a running clone.
    fn transfer(&self, received: u64, total: u64);

    /// Check whether the caller requested cancellation.
    fn is_cancelled(&self) -> bool;
}

/// Progress monitor backed by an indicatif progress bar.
#[derive(Debug, Clone)]
pub struct IndicatifMonitor {
    bar: ProgressBar,
    cancelled: Arc<AtomicBool>,
}

impl IndicatifMonitor {
    /// Construct new progress bar monitor.
    ///
    /// # Errors
    ///
    /// - Return [`ProgressError::Template`] if the style template cannot be
    ///   set for the progress bar.
    pub fn new() -> Result<Self> {
        let style = ProgressStyle::with_template(
            "{elapsed_precise:.green}  {msg:<50}  [{wide_bar:.yellow/blue}]",
        )?
        .progress_chars("-Cco.");
        let bar = ProgressBar::no_length();
        bar.set_style(style);
        bar.enable_steady_tick(Duration::from_millis(100));

        Ok(Self {
            bar,
            cancelled: Arc::new(AtomicBool::new(false)),
        })
    }

    /// Request cancellation of whatever operation holds this monitor.
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Relaxed);
    }

    /// Clear the progress bar once the operation finishes.
    pub fn finish(&self) {
        self.bar.finish_and_clear();
    }
}

impl ProgressMonitor for IndicatifMonitor {
    fn subtask(&self, text: &str) {
        self.bar.set_message(text.to_owned());
    }

    fn transfer(&self, received: u64, total: u64) {
        self.bar.set_length(total);
        self.bar.set_position(received);
    }

    fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Relaxed)
    }
}

impl Prompter for IndicatifMonitor {
    #[instrument(skip(self, url, _config), level = "debug")]
    fn prompt_username_password(
        &mut self,
        url: &str,
        _config: &git2::Config,
    ) -> Option<(String, String)> {
        info!("authentication required at {url}");
        self.bar.suspend(|| -> Option<(String, String)> {
            let username = Text::new("username").prompt().ok()?;
            let password = Password::new("password")
                .without_confirmation()
                .prompt()
                .ok()?;
            Some((username, password))
        })
    }

    #[instrument(skip(self, username, url, _config), level = "debug")]
    fn prompt_password(
        &mut self,
        username: &str,
        url: &str,
        _config: &git2::Config,
    ) -> Option<String> {
        info!("authentication required at {url} for user {username}");
        self.bar.suspend(|| -> Option<String> {
            Password::new("password")
                .without_confirmation()
                .prompt()
                .ok()
        })
    }

    #[instrument(skip(self, ssh_key_path, _config), level = "debug")]
    fn prompt_ssh_key_passphrase(
        &mut self,
        ssh_key_path: &Path,
        _config: &git2::Config,
    ) -> Option<String> {
        info!(
            "authentication required with ssh key at {}",
            ssh_key_path.display()
        );
        self.bar.suspend(|| -> Option<String> {
            Password::new("password")
                .without_confirmation()
                .prompt()
                .ok()
        })
    }
}

/// Progress monitor that only logs sub-tasks.
///
/// Never answers credential prompts, so clones through it stay strictly
/// non-interactive. Cancellation is still supported for callers that hold a
/// clone of the monitor.
#[derive(Debug, Clone, Default)]
pub struct SilentMonitor {
    cancelled: Arc<AtomicBool>,
}

impl SilentMonitor {
    /// Construct new silent monitor.
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation of whatever operation holds this monitor.
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Relaxed);
    }
}

impl ProgressMonitor for SilentMonitor {
    fn subtask(&self, text: &str) {
        debug!("{text}");
    }

    fn transfer(&self, _received: u64, _total: u64) {}

    fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Relaxed)
    }
}

impl Prompter for SilentMonitor {
    fn prompt_username_password(
        &mut self,
        _url: &str,
        _config: &git2::Config,
    ) -> Option<(String, String)> {
        None
    }

    fn prompt_password(
        &mut self,
        _username: &str,
        _url: &str,
        _config: &git2::Config,
    ) -> Option<String> {
        None
    }

    fn prompt_ssh_key_passphrase(
        &mut self,
        _ssh_key_path: &Path,
        _config: &git2::Config,
    ) -> Option<String> {
        None
    }
}

/// Progress reporting error types.
#[derive(Debug, thiserror::Error)]
pub enum ProgressError {
    /// Style template cannot be set for progress bars.
    #[error(transparent)]
    Template(#[from] indicatif::style::TemplateError),
}

/// Friendly result alias :3
pub type Result<T, E = ProgressError> = std::result::Result<T, E>;
