// SPDX-FileCopyrightText: 2025 Jason Pena <jasonpena@awkless.com>
// SPDX-License-Identifier: MIT

use cartwheel::{
    import::{Application, ImportOperation},
    path::{default_repo_view_file, default_workspace_dir},
    progress::IndicatifMonitor,
    registry::{register_default_connections, Connection, ConnectionRegistry},
    repoview::RepoView,
    workspace::Workspace,
};

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::{path::PathBuf, process::exit};
use tokio::task;
use tracing::{error, info};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Debug, Clone, Parser)]
#[command(
    about,
    override_usage = "\n  cartwheel [options] <command>",
    subcommand_help_heading = "Commands",
    version
)]
struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

impl Cli {
    async fn run(self) -> Result<()> {
        match self.command {
            Command::Import(opts) => run_import(opts).await,
            Command::Connections(opts) => run_connections(opts),
        }
    }
}

#[derive(Debug, Clone, Subcommand)]
enum Command {
    /// Import a remote application into the workspace.
    #[command(override_usage = "cartwheel import [options] <application_name>")]
    Import(ImportOptions),

    /// List registered server connections.
    #[command(override_usage = "cartwheel connections [options]")]
    Connections(ConnectionsOptions),
}

#[derive(Parser, Clone, Debug)]
#[command(author, about, long_about)]
struct ImportOptions {
    /// Name of the application to import.
    #[arg(value_name = "application_name")]
    pub application_name: String,

    /// Git URL the application's source repository is reachable at.
    #[arg(short, long, required = true, value_name = "url")]
    pub url: String,

    /// Workspace project name. Defaults to the application name.
    #[arg(short, long, value_name = "name")]
    pub project: Option<String>,

    /// Name to store the application's remote under.
    #[arg(short, long, value_name = "name", default_value = "openshift")]
    pub remote: String,

    /// Workspace root directory.
    #[arg(short, long, value_name = "path")]
    pub workspace: Option<PathBuf>,

    /// Record the clone in the repository view.
    #[arg(long)]
    pub repo_view: bool,
}

#[derive(Parser, Clone, Debug)]
#[command(author, about, long_about)]
struct ConnectionsOptions {
    /// Register an extra connection for this listing.
    #[arg(short, long, value_name = "url")]
    pub add: Option<String>,
}

#[tokio::main]
async fn main() {
    let layer = fmt::layer().compact().with_target(false).without_time();
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new("info"))
        .unwrap();
    tracing_subscriber::registry()
        .with(layer)
        .with(filter)
        .init();

    if let Err(error) = run().await {
        error!("{error:?}");
        exit(1);
    }

    exit(0)
}

async fn run() -> Result<()> {
    Cli::parse().run().await
}

async fn run_import(opts: ImportOptions) -> Result<()> {
    let workspace_root = match opts.workspace {
        Some(path) => path,
        None => default_workspace_dir()?,
    };
    let workspace = Workspace::open(workspace_root)?;

    let application = Application::new(opts.application_name.clone(), opts.url);
    let project_name = opts.project.unwrap_or(opts.application_name);
    let mut operation = ImportOperation::new(project_name, application, opts.remote);

    let mut repo_view = if opts.repo_view {
        Some(RepoView::open(default_repo_view_file()?)?)
    } else {
        None
    };

    let monitor = IndicatifMonitor::new()?;
    let handle = monitor.clone();
    let destination = task::spawn_blocking(move || {
        operation.run(&workspace, repo_view.as_mut(), &monitor)
    })
    .await??;
    handle.finish();
    info!("imported into {:?}", destination.display());

    Ok(())
}

fn run_connections(opts: ConnectionsOptions) -> Result<()> {
    let mut registry = ConnectionRegistry::new();
    register_default_connections(&mut registry)?;
    if let Some(url) = opts.add {
        registry.add(Connection::new(url)?);
    }

    for connection in registry.iter() {
        println!("{connection}");
    }

    Ok(())
}
