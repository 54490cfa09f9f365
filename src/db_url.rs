//! PostgreSQL connection strings for Cloud SQL unix sockets.
//!
//! Configuration is via environment variables:
//! - `DB_USER` - Database user
//! - `DB_PASS` - Password
//! - `DB_NAME` - Database name
//! - `CONN` - Instance connection name (`project:region:instance`)
//!
//! Unset variables are treated as empty strings.

use std::fmt;

pub const USER_VAR: &str = "DB_USER";
pub const PASSWORD_VAR: &str = "DB_PASS";
pub const DATABASE_VAR: &str = "DB_NAME";
pub const CONNECTION_VAR: &str = "CONN";

/// Directory Cloud SQL mounts instance sockets under.
const SOCKET_DIR: &str = "/cloudsql";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConnectionParams {
    pub user: String,
    pub password: String,
    pub database: String,
    /// Inserted into the socket path as-is.
    pub instance: String,
}

impl ConnectionParams {
    /// Read parameters from the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read parameters through `lookup`, defaulting missing keys to "".
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).unwrap_or_default();
        Self {
            user: get(USER_VAR),
            password: get(PASSWORD_VAR),
            database: get(DATABASE_VAR),
            instance: get(CONNECTION_VAR),
        }
    }

    pub fn to_url(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for ConnectionParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "postgres://{}:{}@/{}?host={}/{}",
            urlencoding::encode(&self.user),
            urlencoding::encode(&self.password),
            urlencoding::encode(&self.database),
            SOCKET_DIR,
            self.instance
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn params(vars: &[(&str, &str)]) -> ConnectionParams {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        ConnectionParams::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_encodes_credentials() {
        let params = params(&[
            (USER_VAR, "u@1"),
            (PASSWORD_VAR, "p/2"),
            (DATABASE_VAR, "mydb"),
            (CONNECTION_VAR, "proj:region:inst"),
        ]);
        assert_eq!(
            params.to_url(),
            "postgres://u%401:p%2F2@/mydb?host=/cloudsql/proj:region:inst"
        );
    }

    #[test]
    fn test_missing_vars_are_empty() {
        let params = params(&[]);
        assert_eq!(params, ConnectionParams::default());
        assert_eq!(params.to_url(), "postgres://:@/?host=/cloudsql/");
    }

    #[test]
    fn test_database_name_is_encoded() {
        let params = params(&[(DATABASE_VAR, "my db#1")]);
        assert_eq!(params.to_url(), "postgres://:@/my%20db%231?host=/cloudsql/");
    }

    #[test]
    fn test_unreserved_characters_pass_through() {
        let params = params(&[(USER_VAR, "a-b_c.d~e"), (PASSWORD_VAR, "Zz09")]);
        assert_eq!(params.to_url(), "postgres://a-b_c.d~e:Zz09@/?host=/cloudsql/");
    }

    #[test]
    fn test_instance_is_not_encoded() {
        let params = params(&[(CONNECTION_VAR, "p:r:i/x")]);
        assert!(params.to_url().ends_with("host=/cloudsql/p:r:i/x"));
    }
}
