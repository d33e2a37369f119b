//! Driver registry.
//!
//! The resolver only needs the names of the installed drivers; it picks the
//! first one carrying the SQL Server product marker.

/// Substring a driver name must contain to be usable.
pub const SQL_SERVER_MARKER: &str = "SQL Server";

/// Name under which the built-in TDS driver registers itself.
pub const NATIVE_DRIVER_NAME: &str = "SQL Server (native TDS)";

/// Source of available database driver names.
pub trait DriverRegistry: Send + Sync {
    /// Names of all registered drivers, in registration order.
    fn driver_names(&self) -> Vec<String>;
}

/// Registry of drivers compiled into this binary.
#[derive(Debug, Clone, Copy, Default)]
pub struct NativeDriverRegistry;

impl DriverRegistry for NativeDriverRegistry {
    fn driver_names(&self) -> Vec<String> {
        vec![NATIVE_DRIVER_NAME.to_string()]
    }
}

/// Fixed list of driver names.
#[derive(Debug, Clone, Default)]
pub struct StaticDriverRegistry {
    names: Vec<String>,
}

impl StaticDriverRegistry {
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            names: names.into_iter().map(Into::into).collect(),
        }
    }
}

impl DriverRegistry for StaticDriverRegistry {
    fn driver_names(&self) -> Vec<String> {
        self.names.clone()
    }
}

/// Pick the driver to use: matching names sorted, first one wins.
pub fn select_driver(registry: &dyn DriverRegistry) -> Option<String> {
    let mut matching: Vec<String> = registry
        .driver_names()
        .into_iter()
        .filter(|name| name.contains(SQL_SERVER_MARKER))
        .collect();
    matching.sort();
    matching.into_iter().next()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_native_registry_has_sql_server_driver() {
        assert_eq!(
            select_driver(&NativeDriverRegistry).as_deref(),
            Some(NATIVE_DRIVER_NAME)
        );
    }

    #[test]
    fn test_select_skips_other_products() {
        let registry =
            StaticDriverRegistry::new(["PostgreSQL Unicode", "ODBC Driver 18 for SQL Server"]);
        assert_eq!(
            select_driver(&registry).as_deref(),
            Some("ODBC Driver 18 for SQL Server")
        );
    }

    #[test]
    fn test_select_is_deterministic_across_orderings() {
        let a = StaticDriverRegistry::new([
            "ODBC Driver 18 for SQL Server",
            "ODBC Driver 17 for SQL Server",
        ]);
        let b = StaticDriverRegistry::new([
            "ODBC Driver 17 for SQL Server",
            "ODBC Driver 18 for SQL Server",
        ]);
        assert_eq!(select_driver(&a), select_driver(&b));
        assert_eq!(
            select_driver(&a).as_deref(),
            Some("ODBC Driver 17 for SQL Server")
        );
    }

    #[test]
    fn test_select_none_when_no_match() {
        assert!(select_driver(&StaticDriverRegistry::new(["MySQL ODBC 8.0"])).is_none());
        assert!(select_driver(&StaticDriverRegistry::default()).is_none());
    }

    #[test]
    fn test_marker_is_case_sensitive() {
        assert!(select_driver(&StaticDriverRegistry::new(["sql server lite"])).is_none());
    }
}
