//! Integration tests for connection descriptor resolution.

use mssql_mcp_server::config::{Config, ConnectionSettings};
use mssql_mcp_server::db::{ConfigResolver, NativeDriverRegistry, StaticDriverRegistry};
use mssql_mcp_server::error::ConfigError;
use mssql_mcp_server::models::AuthMode;

fn resolver() -> ConfigResolver {
    ConfigResolver::new(NativeDriverRegistry)
}

fn settings(host: &str) -> ConnectionSettings {
    ConnectionSettings {
        database: Some("shop".to_string()),
        ..ConnectionSettings::for_host(host)
    }
}

#[test]
fn test_integrated_auth_never_requires_credentials() {
    for (user, password) in [
        (None, None),
        (Some("app"), None),
        (None, Some("pw")),
        (Some("app"), Some("pw")),
    ] {
        let settings = ConnectionSettings {
            windows_auth: true,
            user: user.map(str::to_string),
            password: password.map(str::to_string),
            ..settings("db.internal")
        };
        let descriptor = resolver().resolve(&settings).unwrap();
        assert_eq!(descriptor.auth_mode, AuthMode::Integrated);
        assert!(!descriptor.has_password());
        assert!(descriptor.user.is_none());
    }
}

#[test]
fn test_sql_auth_requires_both_credentials() {
    for (user, password) in [(None, None), (Some("app"), None), (None, Some("pw"))] {
        let settings = ConnectionSettings {
            user: user.map(str::to_string),
            password: password.map(str::to_string),
            ..settings("db.internal")
        };
        assert_eq!(
            resolver().resolve(&settings).unwrap_err(),
            ConfigError::MissingCredentials
        );
    }
}

#[test]
fn test_cloud_defaults_to_encryption_with_validation() {
    for host in [
        "acme.database.windows.net",
        "ACME.DATABASE.WINDOWS.NET",
        "tcp-acme.database.windows.net",
    ] {
        let settings = ConnectionSettings {
            windows_auth: true,
            ..settings(host)
        };
        let descriptor = resolver().resolve(&settings).unwrap();
        assert!(descriptor.encrypt, "{}", host);
        assert!(!descriptor.trust_server_certificate, "{}", host);
    }
}

#[test]
fn test_encryption_default_is_asymmetric() {
    let base = ConnectionSettings {
        windows_auth: true,
        ..settings("db.internal")
    };

    let default = resolver().resolve(&base).unwrap();
    assert!(!default.encrypt);

    let explicit = resolver()
        .resolve(&ConnectionSettings {
            encrypt: Some(true),
            ..base.clone()
        })
        .unwrap();
    assert!(explicit.encrypt);
    assert!(explicit.trust_server_certificate);

    let cloud_explicit = resolver()
        .resolve(&ConnectionSettings {
            encrypt: Some(true),
            ..ConnectionSettings {
                host: "acme.database.windows.net".to_string(),
                ..base
            }
        })
        .unwrap();
    assert!(cloud_explicit.encrypt);
    assert!(!cloud_explicit.trust_server_certificate);
}

#[test]
fn test_driver_check_comes_first() {
    let resolver = ConfigResolver::new(StaticDriverRegistry::default());
    let err = resolver
        .resolve(&ConnectionSettings::for_host("db"))
        .unwrap_err();
    assert!(matches!(err, ConfigError::NoDriver { .. }));
}

#[test]
fn test_database_check_precedes_credentials() {
    let err = resolver()
        .resolve(&ConnectionSettings::for_host("db"))
        .unwrap_err();
    assert_eq!(err, ConfigError::MissingDatabase);
}

#[test]
fn test_resolve_from_parsed_config() {
    let config = Config {
        server: "acme.database.windows.net".to_string(),
        database: Some("shop".to_string()),
        user: Some("app".to_string()),
        password: Some("s3cret".to_string()),
        ..Config::default()
    };
    let descriptor = resolver().resolve(&config.connection_settings()).unwrap();

    let summary = descriptor.summary();
    assert_eq!(summary.to_string(), "acme.database.windows.net/shop as app");
    assert!(!format!("{:?}", descriptor).contains("s3cret"));
    assert!(!format!("{:?}", summary).contains("s3cret"));
}

#[test]
fn test_resolution_is_deterministic() {
    let settings = ConnectionSettings {
        user: Some("app".to_string()),
        password: Some("pw".to_string()),
        port: 14330,
        ..settings("db.internal")
    };
    let a = resolver().resolve(&settings).unwrap();
    let b = resolver().resolve(&settings).unwrap();
    assert_eq!(a.connection_string(), b.connection_string());
}
