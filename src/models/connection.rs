//! Connection-related data models.
//!
//! This module defines the resolved connection descriptor and its
//! log-safe summary.

use serde::Serialize;
use std::fmt;

/// SQL Server's default TCP port.
pub const DEFAULT_PORT: u16 = 1433;

/// How the gateway authenticates against SQL Server.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AuthMode {
    /// SQL Server login with user name and password
    Sql,
    /// Windows / Kerberos integrated security
    Integrated,
}

impl AuthMode {
    /// Get the display name for this authentication mode.
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Sql => "SQL Authentication",
            Self::Integrated => "Windows Authentication",
        }
    }
}

impl fmt::Display for AuthMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

/// Everything needed to open a connection, produced by the resolver.
///
/// The password is private and is left out of `Debug`, of the connection
/// string and of [`ConnectionSummary`].
#[derive(Clone)]
pub struct ConnectionDescriptor {
    connection_string: String,
    pub host: String,
    pub port: u16,
    pub database: String,
    pub auth_mode: AuthMode,
    /// None for integrated authentication
    pub user: Option<String>,
    password: Option<String>,
    pub encrypt: bool,
    pub trust_server_certificate: bool,
    /// True when `host` names a local instance; port is then ignored
    pub local_instance: bool,
    /// Name of the selected driver registration
    pub driver: String,
}

/// Field set used by the resolver to build a descriptor.
pub(crate) struct DescriptorParts {
    pub connection_string: String,
    pub host: String,
    pub port: u16,
    pub database: String,
    pub auth_mode: AuthMode,
    pub user: Option<String>,
    pub password: Option<String>,
    pub encrypt: bool,
    pub trust_server_certificate: bool,
    pub local_instance: bool,
    pub driver: String,
}

impl ConnectionDescriptor {
    pub(crate) fn from_parts(parts: DescriptorParts) -> Self {
        Self {
            connection_string: parts.connection_string,
            host: parts.host,
            port: parts.port,
            database: parts.database,
            auth_mode: parts.auth_mode,
            user: parts.user,
            password: parts.password,
            encrypt: parts.encrypt,
            trust_server_certificate: parts.trust_server_certificate,
            local_instance: parts.local_instance,
            driver: parts.driver,
        }
    }

    /// ADO.NET-style connection string, without the password.
    pub fn connection_string(&self) -> &str {
        &self.connection_string
    }

    /// Whether a credential is attached (SQL authentication).
    pub fn has_password(&self) -> bool {
        self.password.is_some()
    }

    pub(crate) fn password(&self) -> Option<&str> {
        self.password.as_deref()
    }

    /// Address shown in logs: the port only appears when it is not the default.
    pub fn display_server(&self) -> String {
        if self.port != DEFAULT_PORT && !self.local_instance {
            format!("{}:{}", self.host, self.port)
        } else {
            self.host.clone()
        }
    }

    /// Non-sensitive metadata for logging and display.
    pub fn summary(&self) -> ConnectionSummary {
        ConnectionSummary {
            server: self.display_server(),
            database: self.database.clone(),
            user: match self.auth_mode {
                AuthMode::Integrated => "Windows Auth".to_string(),
                AuthMode::Sql => self.user.clone().unwrap_or_default(),
            },
            auth_mode: self.auth_mode,
            driver: self.driver.clone(),
            encrypt: self.encrypt,
            trust_server_certificate: self.trust_server_certificate,
        }
    }
}

impl fmt::Debug for ConnectionDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConnectionDescriptor")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("database", &self.database)
            .field("auth_mode", &self.auth_mode)
            .field("user", &self.user)
            .field("password", &self.password.as_ref().map(|_| "***"))
            .field("encrypt", &self.encrypt)
            .field("trust_server_certificate", &self.trust_server_certificate)
            .field("local_instance", &self.local_instance)
            .field("driver", &self.driver)
            .finish()
    }
}

/// Log-safe view of a [`ConnectionDescriptor`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConnectionSummary {
    pub server: String,
    pub database: String,
    /// User name, or "Windows Auth" for integrated security
    pub user: String,
    pub auth_mode: AuthMode,
    pub driver: String,
    pub encrypt: bool,
    pub trust_server_certificate: bool,
}

impl fmt::Display for ConnectionSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{} as {}", self.server, self.database, self.user)
    }
}
