//! 命令行参数

use std::path::PathBuf;

use clap::Parser;

use crate::utils::logs::LogLevel;

pub const DEFAULT_SSH_HOST: &str = "starbug.cs.rit.edu";

#[derive(Parser, Debug)]
#[command(name = "game-tracker")]
#[command(about = "Track your video game collections, play sessions and friends", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Path to the three-line config file (account, secret, database name)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Connect to this database URL directly instead of opening a tunnel
    #[arg(long, env = "TRACKER_DATABASE_URL", conflicts_with = "local")]
    pub database_url: Option<String>,

    /// Use a local SQLite database in the data directory
    #[arg(long)]
    pub local: bool,

    /// Host to tunnel the database connection through
    #[arg(long, env = "TRACKER_SSH_HOST", default_value = DEFAULT_SSH_HOST)]
    pub ssh_host: String,

    /// SSH port on the tunnel host
    #[arg(long, default_value_t = 22)]
    pub ssh_port: u16,

    /// Database port as seen from the tunnel host
    #[arg(long, default_value_t = 5432)]
    pub remote_port: u16,

    /// Create or upgrade the schema before starting (always done for SQLite)
    #[arg(long)]
    pub migrate: bool,

    /// Log level (error, warn, info, debug, trace, off); RUST_LOG takes precedence
    #[arg(long, default_value = "warn")]
    pub log_level: LogLevel,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let cli = Cli::try_parse_from(["game-tracker"]).unwrap();
        assert_eq!(cli.ssh_port, 22);
        assert_eq!(cli.remote_port, 5432);
        assert_eq!(cli.log_level, LogLevel::Warn);
        assert!(!cli.local);
        assert!(!cli.migrate);
        if std::env::var_os("TRACKER_SSH_HOST").is_none() {
            assert_eq!(cli.ssh_host, DEFAULT_SSH_HOST);
        }
    }

    #[test]
    fn parses_tunnel_options() {
        let cli = Cli::try_parse_from([
            "game-tracker",
            "--config",
            "/tmp/config.txt",
            "--ssh-host",
            "db.example.edu",
            "--ssh-port",
            "2222",
            "--log-level",
            "debug",
        ])
        .unwrap();
        assert_eq!(cli.config, Some(PathBuf::from("/tmp/config.txt")));
        assert_eq!(cli.ssh_host, "db.example.edu");
        assert_eq!(cli.ssh_port, 2222);
        assert_eq!(cli.log_level, LogLevel::Debug);
    }

    #[test]
    fn local_and_database_url_conflict() {
        let result = Cli::try_parse_from([
            "game-tracker",
            "--local",
            "--database-url",
            "sqlite::memory:",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn rejects_unknown_log_level() {
        assert!(Cli::try_parse_from(["game-tracker", "--log-level", "loud"]).is_err());
    }
}
