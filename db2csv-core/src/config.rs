//! Export configuration.
//!
//! `ExportConfig` is built once at startup and shared by reference with every
//! stage of the export. It has no setters; the `with_*` builders consume and
//! return the value so a finished configuration cannot change.

use std::fmt;
use std::path::{Path, PathBuf};
use zeroize::Zeroizing;

/// Default SQL Server port.
pub const DEFAULT_PORT: u16 = 1433;

/// Default database type name.
pub const DEFAULT_DBTYPE: &str = "mssql";

/// Default output path.
pub const DEFAULT_OUTPUT: &str = "/tmp/export/output.csv";

/// Immutable description of one export run.
///
/// # Security
/// The password is held in a `Zeroizing` container and is never included in
/// `Debug` or `Display` output.
///
/// # Example
/// ```rust
/// use db2csv_core::ExportConfig;
///
/// let config = ExportConfig::default()
///     .with_server("db.internal")
///     .with_user("reporter")
///     .with_password("secret")
///     .with_query("SELECT id, name FROM customers");
///
/// assert_eq!(config.port(), 1433);
/// assert!(!format!("{config:?}").contains("secret"));
/// ```
#[derive(Clone)]
pub struct ExportConfig {
    server: String,
    user: String,
    password: Zeroizing<String>,
    port: u16,
    database: String,
    query: String,
    dbtype: String,
    output: PathBuf,
    debug: bool,
    trust_cert: bool,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            server: String::new(),
            user: String::new(),
            password: Zeroizing::new(String::new()),
            port: DEFAULT_PORT,
            database: String::new(),
            query: String::new(),
            dbtype: DEFAULT_DBTYPE.to_string(),
            output: PathBuf::from(DEFAULT_OUTPUT),
            debug: false,
            trust_cert: false,
        }
    }
}

impl ExportConfig {
    /// Sets the database server host name.
    #[must_use]
    pub fn with_server(mut self, server: impl Into<String>) -> Self {
        self.server = server.into();
        self
    }

    /// Sets the login user.
    #[must_use]
    pub fn with_user(mut self, user: impl Into<String>) -> Self {
        self.user = user.into();
        self
    }

    /// Sets the login password.
    #[must_use]
    pub fn with_password(mut self, password: impl Into<String>) -> Self {
        self.password = Zeroizing::new(password.into());
        self
    }

    /// Sets the server port.
    #[must_use]
    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    /// Sets the database to select after login.
    #[must_use]
    pub fn with_database(mut self, database: impl Into<String>) -> Self {
        self.database = database.into();
        self
    }

    /// Sets the query whose result set is exported.
    #[must_use]
    pub fn with_query(mut self, query: impl Into<String>) -> Self {
        self.query = query.into();
        self
    }

    /// Sets the database type name (`mssql`).
    #[must_use]
    pub fn with_dbtype(mut self, dbtype: impl Into<String>) -> Self {
        self.dbtype = dbtype.into();
        self
    }

    /// Sets the CSV output path.
    #[must_use]
    pub fn with_output(mut self, output: impl Into<PathBuf>) -> Self {
        self.output = output.into();
        self
    }

    /// Enables debug output.
    #[must_use]
    pub fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    /// Trusts the server certificate without validating it.
    #[must_use]
    pub fn with_trust_cert(mut self, trust_cert: bool) -> Self {
        self.trust_cert = trust_cert;
        self
    }

    /// Database server host name.
    pub fn server(&self) -> &str {
        &self.server
    }

    /// Login user.
    pub fn user(&self) -> &str {
        &self.user
    }

    /// Login password. Never log the returned value.
    pub fn password(&self) -> &str {
        &self.password
    }

    /// Server port.
    pub const fn port(&self) -> u16 {
        self.port
    }

    /// Database selected after login; empty means the login's default.
    pub fn database(&self) -> &str {
        &self.database
    }

    /// Query whose result set is exported.
    pub fn query(&self) -> &str {
        &self.query
    }

    /// Database type name as given on the command line.
    pub fn dbtype(&self) -> &str {
        &self.dbtype
    }

    /// CSV output path.
    pub fn output(&self) -> &Path {
        &self.output
    }

    /// Whether debug output was requested.
    pub const fn debug(&self) -> bool {
        self.debug
    }

    /// Whether the server certificate is trusted without validation.
    pub const fn trust_cert(&self) -> bool {
        self.trust_cert
    }
}

impl fmt::Debug for ExportConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExportConfig")
            .field("server", &self.server)
            .field("user", &self.user)
            .field("password", &"****")
            .field("port", &self.port)
            .field("database", &self.database)
            .field("query", &self.query)
            .field("dbtype", &self.dbtype)
            .field("output", &self.output)
            .field("debug", &self.debug)
            .field("trust_cert", &self.trust_cert)
            .finish()
    }
}

impl fmt::Display for ExportConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}://{}:{}", self.dbtype, self.server, self.port)?;
        if !self.database.is_empty() {
            write!(f, "/{}", self.database)?;
        }
        // Intentionally omit user and password
        write!(f, " -> {}", self.output.display())
    }
}
