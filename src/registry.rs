// SPDX-FileCopyrightText: 2025 Jason Pena <jasonpena@awkless.com>
// SPDX-License-Identifier: MIT

//! Server connection registry.
//!
//! A __connection__ is a record identifying a reachable server endpoint URL
//! that applications can be imported from. The registry collecting them is an
//! explicitly constructed value whose lifetime is owned by the caller. Host
//! startup code is expected to build one registry, run
//! [`register_default_connections`] on it, and pass it by reference to
//! whoever needs it. There is no hidden global instance.

use std::fmt::{Display, Formatter, Result as FmtResult};
use tracing::debug;
use url::Url;

/// Default endpoints registered at startup.
pub const DEFAULT_SERVER_URLS: [&str; 2] = ["http://localhost:8080", "https://localhost:8443"];

/// A reachable server endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Connection {
    url: Url,
}

impl Connection {
    /// Construct new connection from a raw URL string.
    ///
    /// # Errors
    ///
    /// - Return [`RegistryError::MalformedUrl`] if the URL cannot be parsed.
    pub fn new(url: impl AsRef<str>) -> Result<Self> {
        let url = Url::parse(url.as_ref()).map_err(|err| RegistryError::MalformedUrl {
            source: err,
            url: url.as_ref().to_owned(),
        })?;

        Ok(Self { url })
    }

    /// Endpoint URL of the connection.
    pub fn url(&self) -> &Url {
        &self.url
    }
}

impl Display for Connection {
    fn fmt(&self, fmt: &mut Formatter<'_>) -> FmtResult {
        write!(fmt, "{}", self.url)
    }
}

/// Collection of known server connections.
#[derive(Debug, Clone, Default)]
pub struct ConnectionRegistry {
    connections: Vec<Connection>,
}

impl ConnectionRegistry {
    /// Construct new empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a connection to the registry.
    ///
    /// Connections are deduplicated by URL. Returns true if the connection
    /// was actually added.
    pub fn add(&mut self, connection: Connection) -> bool {
        if self.connections.contains(&connection) {
            return false;
        }

        debug!("register connection {connection}");
        self.connections.push(connection);
        true
    }

    /// Iterate over registered connections in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &Connection> {
        self.connections.iter()
    }

    /// Number of registered connections.
    pub fn len(&self) -> usize {
        self.connections.len()
    }

    /// Check if the registry holds no connections.
    pub fn is_empty(&self) -> bool {
        self.connections.is_empty()
    }
}

/// Register the default server connections.
///
/// Host startup code runs this once on a freshly constructed registry.
///
/// # Errors
///
/// - Return [`RegistryError::MalformedUrl`] if a default endpoint cannot be
///   parsed. The defaults are literal constants, so this failure path is a
///   fatal startup configuration error rather than something to recover
///   from.
pub fn register_default_connections(registry: &mut ConnectionRegistry) -> Result<()> {
    for raw in DEFAULT_SERVER_URLS {
        registry.add(Connection::new(raw)?);
    }

    Ok(())
}

/// Connection registry error types.
#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    /// Connection URL cannot be parsed.
    #[error("malformed connection url {url:?}")]
    MalformedUrl {
        #[source]
        source: url::ParseError,
        url: String,
    },
}

/// Friendly result alias :3
pub type Result<T, E = RegistryError> = std::result::Result<T, E>;
