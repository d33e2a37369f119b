//! Connection descriptor resolution.
//!
//! Turns raw [`ConnectionSettings`] into a [`ConnectionDescriptor`]:
//! deployment variant detection (standard host, LocalDB instance, Azure SQL),
//! authentication mode, driver selection and encryption defaults.
//! Pure configuration assembly; nothing here touches the network.

use crate::config::ConnectionSettings;
use crate::db::driver::{
    DriverRegistry, NativeDriverRegistry, SQL_SERVER_MARKER, select_driver,
};
use crate::error::ConfigError;
use crate::models::connection::{DEFAULT_PORT, DescriptorParts};
use crate::models::{AuthMode, ConnectionDescriptor};
use tracing::{debug, info, warn};

/// Hosts of this form name a LocalDB instance: `(localdb)\<instance>`.
pub const LOCAL_INSTANCE_PREFIX: &str = "(localdb)\\";

/// Azure SQL hosts end with this domain.
pub const CLOUD_HOST_DOMAIN: &str = ".database.windows.net";

/// Whether the host names a LocalDB instance.
pub fn is_local_instance(host: &str) -> bool {
    host.strip_prefix(LOCAL_INSTANCE_PREFIX)
        .is_some_and(|instance| !instance.is_empty())
}

/// Whether the host is an Azure SQL endpoint.
pub fn is_cloud_host(host: &str) -> bool {
    host.to_ascii_lowercase().contains(CLOUD_HOST_DOMAIN)
}

/// Resolved encryption settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EncryptionPolicy {
    pub encrypt: bool,
    pub trust_server_certificate: bool,
}

/// Encryption defaults by deployment variant.
///
/// Azure SQL: encryption on unless explicitly disabled, certificate validated.
/// Other hosts: encryption off unless explicitly enabled, and when enabled the
/// server certificate is trusted without validation.
pub fn encryption_policy(host: &str, explicit: Option<bool>) -> EncryptionPolicy {
    if is_cloud_host(host) {
        EncryptionPolicy {
            encrypt: explicit.unwrap_or(true),
            trust_server_certificate: false,
        }
    } else {
        let encrypt = explicit.unwrap_or(false);
        EncryptionPolicy {
            encrypt,
            trust_server_certificate: encrypt,
        }
    }
}

/// Builds connection descriptors from settings.
#[derive(Debug, Clone, Default)]
pub struct ConfigResolver<R = NativeDriverRegistry> {
    registry: R,
}

impl<R: DriverRegistry> ConfigResolver<R> {
    /// Create a resolver that selects drivers from the given registry.
    pub fn new(registry: R) -> Self {
        Self { registry }
    }

    /// Resolve settings into a descriptor.
    ///
    /// # Errors
    ///
    /// - [`ConfigError::NoDriver`] if no registered driver mentions SQL Server
    /// - [`ConfigError::MissingDatabase`] if no database is configured
    /// - [`ConfigError::MissingCredentials`] if SQL authentication lacks a user or password
    pub fn resolve(
        &self,
        settings: &ConnectionSettings,
    ) -> Result<ConnectionDescriptor, ConfigError> {
        let host = settings.host.clone();
        let local_instance = is_local_instance(&host);
        if local_instance {
            info!(server = %host, "Detected LocalDB connection");
            warn!(
                server = %host,
                "LocalDB only listens on named pipes, which the TDS driver cannot open; \
                 connections will fail unless the instance also accepts TCP"
            );
        }

        let driver = select_driver(&self.registry).ok_or_else(|| ConfigError::NoDriver {
            marker: SQL_SERVER_MARKER.to_string(),
            searched: self.registry.driver_names().len(),
        })?;
        debug!(driver = %driver, "Using driver");

        let database = settings
            .database
            .clone()
            .filter(|db| !db.is_empty())
            .ok_or(ConfigError::MissingDatabase)?;

        let (auth_mode, user, password) = if settings.windows_auth {
            info!("Using Windows Authentication");
            (AuthMode::Integrated, None, None)
        } else {
            match (non_empty(&settings.user), non_empty(&settings.password)) {
                (Some(user), Some(password)) => (AuthMode::Sql, Some(user), Some(password)),
                _ => return Err(ConfigError::MissingCredentials),
            }
        };

        let encryption = encryption_policy(&host, settings.encrypt);

        let connection_string = build_connection_string(
            &host,
            settings.port,
            local_instance,
            &database,
            user.as_deref(),
            encryption,
        );

        Ok(ConnectionDescriptor::from_parts(DescriptorParts {
            connection_string,
            host,
            port: settings.port,
            database,
            auth_mode,
            user,
            password,
            encrypt: encryption.encrypt,
            trust_server_certificate: encryption.trust_server_certificate,
            local_instance,
            driver,
        }))
    }
}

fn non_empty(value: &Option<String>) -> Option<String> {
    value.as_ref().filter(|v| !v.is_empty()).cloned()
}

/// Build the descriptor's ADO.NET-style connection string.
///
/// Used for display only and never carries the password; the driver is
/// configured from the descriptor's fields. `user` is None for integrated
/// authentication.
fn build_connection_string(
    host: &str,
    port: u16,
    local_instance: bool,
    database: &str,
    user: Option<&str>,
    encryption: EncryptionPolicy,
) -> String {
    let mut parts: Vec<String> = Vec::with_capacity(6);

    if port != DEFAULT_PORT && !local_instance {
        parts.push(format!("server=tcp:{},{}", host, port));
    } else {
        parts.push(format!("server={}", host));
    }

    parts.push(format!("database={}", database));

    match user {
        Some(user) => parts.push(format!("user id={}", user)),
        None => parts.push("IntegratedSecurity=true".to_string()),
    }

    parts.push(format!("encrypt={}", encryption.encrypt));
    parts.push(format!(
        "TrustServerCertificate={}",
        encryption.trust_server_certificate
    ));

    parts.join(";")
}
