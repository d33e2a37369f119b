//! SQL Server sessions over TDS (tiberius).

use crate::db::connector::{Connector, Session};
use crate::db::types::row_to_strings;
use crate::error::{DbError, DbResult};
use crate::models::connection::DEFAULT_PORT;
use crate::models::{AuthMode, ConnectionDescriptor, TabularResult};
use futures_util::TryStreamExt;
use tiberius::{AuthMethod, Client, Config, EncryptionLevel, QueryItem, SqlBrowser};
use tokio::net::TcpStream;
use tokio_util::compat::{Compat, TokioAsyncWriteCompatExt};
use tracing::debug;

/// Client type used by every session.
pub type MssqlClient = Client<Compat<TcpStream>>;

/// Commits whatever transaction the statement left open.
const COMMIT_OPEN_TRANSACTION: &str = "IF @@TRANCOUNT > 0 COMMIT TRANSACTION";

/// Production connector: one TCP connection per session.
#[derive(Debug, Clone, Copy, Default)]
pub struct TiberiusConnector;

impl Connector for TiberiusConnector {
    type Session = TiberiusSession;

    async fn connect(&self, descriptor: &ConnectionDescriptor) -> DbResult<TiberiusSession> {
        let config = client_config(descriptor)?;

        let client = match open_client(config.clone()).await {
            // Azure SQL gateways may redirect to the node hosting the database
            Err(tiberius::error::Error::Routing { host, port }) => {
                debug!(host = %host, port, "Following server redirect");
                let mut config = config;
                config.host(&host);
                config.port(port);
                open_client(config).await?
            }
            other => other?,
        };

        debug!(
            server = %descriptor.display_server(),
            database = %descriptor.database,
            "Session opened"
        );
        Ok(TiberiusSession { client })
    }
}

/// Driver configuration built from the descriptor's fields.
///
/// `host\instance` hosts are split into host and named instance, which the
/// driver then resolves through SQL Browser.
pub fn client_config(descriptor: &ConnectionDescriptor) -> DbResult<Config> {
    let mut config = Config::new();

    match descriptor.host.split_once('\\') {
        Some((host, instance)) => {
            config.host(host);
            config.instance_name(instance);
        }
        None => config.host(&descriptor.host),
    }
    if descriptor.port != DEFAULT_PORT && !descriptor.local_instance {
        config.port(descriptor.port);
    }

    config.database(&descriptor.database);
    config.application_name(env!("CARGO_PKG_NAME"));
    config.authentication(auth_method(descriptor)?);

    config.encryption(encryption_level(descriptor.encrypt));
    // With encryption off the login packet is still TLS-wrapped; that
    // certificate is not checked.
    if descriptor.trust_server_certificate || !descriptor.encrypt {
        config.trust_cert();
    }

    Ok(config)
}

fn auth_method(descriptor: &ConnectionDescriptor) -> DbResult<AuthMethod> {
    match descriptor.auth_mode {
        AuthMode::Sql => match (descriptor.user.as_deref(), descriptor.password()) {
            (Some(user), Some(password)) => Ok(AuthMethod::sql_server(user, password)),
            _ => Err(DbError::internal(
                "SQL authentication descriptor without credentials",
            )),
        },
        AuthMode::Integrated => integrated_auth(),
    }
}

#[cfg(any(
    all(windows, feature = "winauth"),
    all(unix, feature = "integrated-auth-gssapi")
))]
fn integrated_auth() -> DbResult<AuthMethod> {
    Ok(AuthMethod::Integrated)
}

#[cfg(not(any(
    all(windows, feature = "winauth"),
    all(unix, feature = "integrated-auth-gssapi")
)))]
fn integrated_auth() -> DbResult<AuthMethod> {
    Err(DbError::execution(
        "Windows Authentication is not available in this build \
         (enable the integrated-auth-gssapi or winauth feature)",
    ))
}

fn encryption_level(encrypt: bool) -> EncryptionLevel {
    if !cfg!(any(feature = "tls-rustls", feature = "tls-native")) {
        EncryptionLevel::NotSupported
    } else if encrypt {
        EncryptionLevel::Required
    } else {
        EncryptionLevel::Off
    }
}

async fn open_client(config: Config) -> tiberius::Result<MssqlClient> {
    let tcp = TcpStream::connect_named(&config).await?;
    tcp.set_nodelay(true)?;
    Client::connect(config, tcp.compat_write()).await
}

/// An open tiberius client.
pub struct TiberiusSession {
    client: MssqlClient,
}

impl Session for TiberiusSession {
    async fn fetch_all(&mut self, sql: &str) -> DbResult<TabularResult> {
        let mut stream = self.client.simple_query(sql).await?;
        let mut result = TabularResult::default();

        // Only the first result set is returned; later ones are drained.
        while let Some(item) = stream.try_next().await? {
            match item {
                QueryItem::Metadata(meta) if meta.result_index() == 0 => {
                    result.columns = meta
                        .columns()
                        .iter()
                        .map(|col| col.name().to_string())
                        .collect();
                }
                QueryItem::Row(row) if row.result_index() == 0 => {
                    result.rows.push(row_to_strings(&row));
                }
                _ => {}
            }
        }

        Ok(result)
    }

    async fn execute_and_commit(&mut self, sql: &str) -> DbResult<u64> {
        let affected = self.client.execute(sql, &[]).await?.total();

        self.client
            .simple_query(COMMIT_OPEN_TRANSACTION)
            .await?
            .into_results()
            .await?;

        Ok(affected)
    }

    async fn close(self) -> DbResult<()> {
        self.client.close().await?;
        Ok(())
    }
}
