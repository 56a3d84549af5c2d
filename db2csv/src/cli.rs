//! Command-line surface of db2csv.
//!
//! Flags are long options that may be written with one dash or two
//! (`-server db01` and `--server db01` are equivalent), optionally joined to
//! their value with `=`.

use clap::{ArgAction, Parser};
use db2csv_core::{
    ExportConfig,
    config::{DEFAULT_DBTYPE, DEFAULT_OUTPUT, DEFAULT_PORT},
};
use std::ffi::OsString;
use std::path::PathBuf;

/// Environment variable consulted when `-password` is not given.
pub const PASSWORD_ENV: &str = "DB2CSV_PASSWORD";

/// CLI argument structure
#[derive(Parser)]
#[command(name = "db2csv")]
#[command(about = "Export the result of a single SQL query to a CSV file")]
#[command(version)]
#[command(long_about = "
db2csv - one-shot query export

Connects to a database, runs one query and writes every row of the result
set to a CSV file (no header row). Any error aborts the export.

SUPPORTED DATABASES:
- SQL Server (-dbtype mssql or sqlserver)

EXAMPLES:
  db2csv -server sql01 -user reporter -database sales -query \"SELECT * FROM orders\"
  DB2CSV_PASSWORD=secret db2csv -server sql01 -user sa -query \"SELECT 1\" -output /tmp/one.csv
")]
pub struct Cli {
    /// Enable debugging
    #[arg(
        long,
        action = ArgAction::Set,
        num_args = 0..=1,
        default_value_t = false,
        default_missing_value = "true",
        help = "enable debugging"
    )]
    pub debug: bool,

    /// Database password
    #[arg(
        long,
        env = PASSWORD_ENV,
        hide_env_values = true,
        allow_hyphen_values = true,
        default_value = "",
        hide_default_value = true,
        help = "the database password"
    )]
    pub password: String,

    /// Database port
    #[arg(long, default_value_t = DEFAULT_PORT, help = "the database port")]
    pub port: u16,

    /// Database server
    #[arg(long, default_value = "", allow_hyphen_values = true, help = "the database server")]
    pub server: String,

    /// Database user
    #[arg(long, default_value = "", allow_hyphen_values = true, help = "the database user")]
    pub user: String,

    /// Database name
    #[arg(
        long,
        default_value = "",
        allow_hyphen_values = true,
        help = "the database schema"
    )]
    pub database: String,

    /// Query to export
    #[arg(long, default_value = "", allow_hyphen_values = true, help = "the query to run")]
    pub query: String,

    /// Database type
    #[arg(
        long,
        default_value = DEFAULT_DBTYPE,
        allow_hyphen_values = true,
        help = "databasetype: mssql"
    )]
    pub dbtype: String,

    /// Output file
    #[arg(
        long,
        default_value = DEFAULT_OUTPUT,
        allow_hyphen_values = true,
        help = "output file"
    )]
    pub output: PathBuf,

    /// Trust the server certificate
    #[arg(
        long,
        help = "trust the server TLS certificate without validation"
    )]
    pub trust_cert: bool,

    /// Suppress output
    #[arg(short, long, help = "Suppress all output except errors")]
    pub quiet: bool,
}

impl Cli {
    /// Parses process arguments, accepting single-dash long flags.
    ///
    /// Exits the process with a usage error on malformed arguments.
    pub fn parse_args<I, T>(args: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString>,
    {
        Self::parse_from(normalize_flag_syntax(args))
    }

    /// Like [`Cli::parse_args`] but returns the error instead of exiting.
    ///
    /// # Errors
    /// Returns the clap error for unknown flags or invalid values.
    pub fn try_parse_args<I, T>(args: I) -> Result<Self, clap::Error>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString>,
    {
        Self::try_parse_from(normalize_flag_syntax(args))
    }

    /// Converts the parsed flags into the immutable export configuration.
    pub fn into_config(self) -> ExportConfig {
        ExportConfig::default()
            .with_server(self.server)
            .with_user(self.user)
            .with_password(self.password)
            .with_port(self.port)
            .with_database(self.database)
            .with_query(self.query)
            .with_dbtype(self.dbtype)
            .with_output(self.output)
            .with_debug(self.debug)
            .with_trust_cert(self.trust_cert)
    }
}

/// Long flags that take a separate value (`-server sql01`).
const VALUE_FLAGS: &[&str] = &[
    "password", "port", "server", "user", "database", "query", "dbtype", "output",
];

/// Rewrites `-name` and `-name=value` into `--name` forms.
///
/// Single-letter short flags (`-q`), values that look like negative
/// numbers, and everything after a literal `--` are left untouched. The
/// argument following a value-taking flag is its value and is passed through
/// whatever it starts with, so `-password -Secret1` keeps the password. The
/// first element is the program name and is passed through.
pub fn normalize_flag_syntax<I, T>(args: I) -> Vec<OsString>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString>,
{
    let mut args = args.into_iter().map(Into::into);
    let mut normalized: Vec<OsString> = args.next().into_iter().collect();
    let mut options_ended = false;
    let mut value_expected = false;

    for arg in args {
        if options_ended || std::mem::take(&mut value_expected) {
            normalized.push(arg);
            continue;
        }
        let Some(text) = arg.to_str() else {
            normalized.push(arg);
            continue;
        };
        if text == "--" {
            options_ended = true;
            normalized.push(arg);
            continue;
        }

        let mut chars = text.chars();
        let single_dash_long = chars.next() == Some('-')
            && chars.next().is_some_and(|c| c.is_ascii_alphabetic())
            && chars.next().is_some_and(|c| c != '=');

        let name = text.trim_start_matches('-');
        value_expected = text.starts_with('-') && VALUE_FLAGS.contains(&name);

        if single_dash_long {
            let mut long = OsString::from("-");
            long.push(&arg);
            normalized.push(long);
        } else {
            normalized.push(arg);
        }
    }

    normalized
}

#[cfg(test)]
mod tests {
    use super::*;

    fn normalized(args: &[&str]) -> Vec<String> {
        normalize_flag_syntax(args.iter().copied())
            .into_iter()
            .map(|a| a.to_string_lossy().into_owned())
            .collect()
    }

    #[test]
    fn test_single_dash_long_flags_are_rewritten() {
        assert_eq!(
            normalized(&["db2csv", "-server", "sql01", "-port=1444", "--user", "sa"]),
            ["db2csv", "--server", "sql01", "--port=1444", "--user", "sa"]
        );
    }

    #[test]
    fn test_short_flags_and_values_are_untouched() {
        assert_eq!(
            normalized(&["db2csv", "-q", "-query", "SELECT -1", "-1", "-"]),
            ["db2csv", "-q", "--query", "SELECT -1", "-1", "-"]
        );
    }

    #[test]
    fn test_flag_values_starting_with_dash_untouched() {
        assert_eq!(
            normalized(&["db2csv", "-password", "-Secret1", "--user", "-sa", "-port=1444"]),
            ["db2csv", "--password", "-Secret1", "--user", "-sa", "--port=1444"]
        );
        assert_eq!(
            normalized(&["db2csv", "-query", "-- nightly\nSELECT 1", "-debug"]),
            ["db2csv", "--query", "-- nightly\nSELECT 1", "--debug"]
        );
    }

    #[test]
    fn test_joined_value_does_not_consume_next_argument() {
        assert_eq!(
            normalized(&["db2csv", "-server=sql01", "-user", "sa"]),
            ["db2csv", "--server=sql01", "--user", "sa"]
        );
    }

    #[test]
    fn test_program_name_and_after_double_dash_untouched() {
        assert_eq!(
            normalized(&["-weird-name", "--", "-server"]),
            ["-weird-name", "--", "-server"]
        );
    }

    #[test]
    fn test_command_definition_is_valid() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
