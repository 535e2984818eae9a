//! CLI argument definitions using clap
//!
//! Every flag can also be supplied through the environment.

use clap::{Args, Parser, Subcommand};

use crate::config::CrmConfig;
use crate::http_server::HttpServerConfig;
use crate::observability::Severity;

/// SimpleCRM - contacts, companies, deals and activities over a document store
#[derive(Parser, Debug)]
#[command(name = "simplecrm")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run the HTTP API
    Serve {
        #[command(flatten)]
        config: ConfigArgs,
    },

    /// Check store connectivity and print the diagnostic report
    Check {
        #[command(flatten)]
        config: ConfigArgs,
    },
}

/// Settings shared by all commands
#[derive(Args, Debug, Clone)]
pub struct ConfigArgs {
    /// Address to bind to
    #[arg(long, env = "HOST", default_value = "0.0.0.0")]
    pub host: String,

    /// Port to listen on
    #[arg(long, env = "PORT", default_value_t = 8000)]
    pub port: u16,

    /// Store connection string: memory://, sqlite://<path> or sqlite::memory:
    #[arg(long, env = "DATABASE_URL")]
    pub database_url: Option<String>,

    /// Database name shown in diagnostics
    #[arg(long, env = "DATABASE_NAME")]
    pub database_name: Option<String>,

    /// Allowed CORS origins, comma separated. Empty allows any origin.
    #[arg(long, env = "CORS_ORIGINS", value_delimiter = ',')]
    pub cors_origins: Vec<String>,

    /// Minimum log severity: trace, info, warn, error
    #[arg(long, env = "LOG_LEVEL", default_value = "info")]
    pub log_level: Severity,
}

impl ConfigArgs {
    pub fn to_config(&self) -> CrmConfig {
        CrmConfig {
            server: HttpServerConfig {
                host: self.host.clone(),
                port: self.port,
                cors_origins: self
                    .cors_origins
                    .iter()
                    .map(|o| o.trim().to_string())
                    .filter(|o| !o.is_empty())
                    .collect(),
            },
            database_url: self.database_url.clone(),
            database_name: self.database_name.clone(),
        }
    }
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serve_flags() {
        let cli = Cli::try_parse_from([
            "simplecrm",
            "serve",
            "--port",
            "9001",
            "--database-url",
            "memory://",
            "--cors-origins",
            "http://a.test, http://b.test",
        ])
        .unwrap();

        let Command::Serve { config } = cli.command else {
            panic!("expected serve");
        };
        let resolved = config.to_config();
        assert_eq!(resolved.server.port, 9001);
        assert_eq!(resolved.database_url.as_deref(), Some("memory://"));
        assert_eq!(
            resolved.server.cors_origins,
            vec!["http://a.test".to_string(), "http://b.test".to_string()]
        );
    }

    #[test]
    fn test_log_level_parsed() {
        let cli = Cli::try_parse_from(["simplecrm", "check", "--log-level", "warn"]).unwrap();
        let Command::Check { config } = cli.command else {
            panic!("expected check");
        };
        assert_eq!(config.log_level, Severity::Warn);
    }

    #[test]
    fn test_unknown_log_level_rejected() {
        assert!(Cli::try_parse_from(["simplecrm", "serve", "--log-level", "loud"]).is_err());
    }
}
