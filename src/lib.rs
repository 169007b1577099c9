// SPDX-FileCopyrightText: 2025 Jason Pena <jasonpena@awkless.com>
// SPDX-License-Identifier: MIT

//! Import PaaS-hosted applications into a local Git workspace.
//!
//! Cartwheel materializes a remote application as a local, git-tracked
//! workspace project: it clones the application's source repository, attaches
//! a named remote, makes sure IDE metadata stays out of history, injects the
//! Maven deployment profile when the project warrants one, and commits what
//! the import touched as a single changeset. Host startup code can also
//! populate a [`registry::ConnectionRegistry`] with the default server
//! endpoints.
//!
//! Everything here is explicit: the workspace, the connection registry, and
//! the repository view are values constructed and owned by the caller. The
//! crate keeps no global state.

pub mod config;
pub mod import;
pub mod path;
pub mod progress;
pub mod registry;
pub mod repoview;
pub mod workspace;
