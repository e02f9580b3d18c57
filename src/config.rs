use std::path::PathBuf;

use clap::Parser;
use serde::Deserialize;

use crate::cli::Command;
use crate::models::{Account, Role};

#[derive(Parser, Debug)]
#[command(name = "alinea", about = "Alinea - periodic division reports")]
pub struct CliArgs {
    /// Path to config file
    #[arg(short, long, default_value = "alinea.toml")]
    pub config: String,

    /// Path to the data file (overrides config file)
    #[arg(short, long)]
    pub data: Option<String>,

    /// Log level (overrides config file)
    #[arg(short, long)]
    pub log_level: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    #[serde(default)]
    pub storage: StorageConfig,

    #[serde(default = "default_logging")]
    pub logging: LoggingConfig,

    #[serde(default)]
    pub export: ExportConfig,

    /// Accounts the directory starts with when nothing has been stored yet.
    #[serde(default = "default_seed_accounts")]
    pub seed_accounts: Vec<Account>,
}

#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum BackendKind {
    #[default]
    Sqlite,
    Memory,
}

#[derive(Debug, Deserialize, Clone)]
pub struct StorageConfig {
    #[serde(default)]
    pub backend: BackendKind,

    #[serde(default = "default_data_path")]
    pub path: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,

    #[serde(default)]
    pub json: bool,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ExportConfig {
    /// Directory exported documents and backups are written to.
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,

    /// Column at which report content is wrapped.
    #[serde(default = "default_page_width")]
    pub page_width: usize,
}

impl Default for StorageConfig {
    fn default() -> Self {
        StorageConfig {
            backend: BackendKind::default(),
            path: default_data_path(),
        }
    }
}

impl Default for ExportConfig {
    fn default() -> Self {
        ExportConfig {
            output_dir: default_output_dir(),
            page_width: default_page_width(),
        }
    }
}

fn default_logging() -> LoggingConfig {
    LoggingConfig {
        level: default_log_level(),
        json: false,
    }
}

fn default_data_path() -> String {
    "alinea.db".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_output_dir() -> PathBuf {
    PathBuf::from(".")
}

fn default_page_width() -> usize {
    80
}

fn seed(id: &str, username: &str, password: &str, role: Role, display_name: &str, division: &str) -> Account {
    Account {
        id: id.to_string(),
        username: username.to_string(),
        password: password.to_string(),
        role,
        display_name: display_name.to_string(),
        division: division.to_string(),
    }
}

/// One account per role.
pub fn default_seed_accounts() -> Vec<Account> {
    vec![
        seed("1", "Superadminit", "Admin@10", Role::Admin, "Super Admin", "Admin"),
        seed("2", "ITAlinea", "TimitAliena2025", Role::It, "IT Team", "IT"),
        seed("3", "RstAlinea", "RstAlinea2025", Role::Riset, "Research Team", "Riset"),
        seed("4", "CwAliena", "CwAlinea2025", Role::Writer, "Writer Team", "Writer"),
        seed("5", "CnAliena", "CnAlinea2025", Role::Content, "Content Team", "Content"),
        seed("6", "DnAlinea", "DnAliena2025", Role::Desain, "Design Team", "Desain"),
    ]
}

impl Default for Config {
    fn default() -> Self {
        Config {
            storage: StorageConfig::default(),
            logging: default_logging(),
            export: ExportConfig::default(),
            seed_accounts: default_seed_accounts(),
        }
    }
}

impl Config {
    pub fn from_toml(contents: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(contents)
    }

    pub fn load(cli: &CliArgs) -> Self {
        let mut config = match std::fs::read_to_string(&cli.config) {
            Ok(contents) => Self::from_toml(&contents).unwrap_or_else(|e| {
                eprintln!("Warning: Failed to parse config file: {}", e);
                Config::default()
            }),
            Err(_) => Config::default(),
        };

        // CLI overrides
        if let Some(ref path) = cli.data {
            config.storage.path = path.clone();
        }
        if let Some(ref level) = cli.log_level {
            config.logging.level = level.clone();
        }

        config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_file_gives_defaults() {
        let config = Config::from_toml("").unwrap();
        assert_eq!(config.storage.backend, BackendKind::Sqlite);
        assert_eq!(config.storage.path, "alinea.db");
        assert_eq!(config.logging.level, "info");
        assert_eq!(config.export.page_width, 80);
        assert_eq!(config.seed_accounts.len(), 6);
    }

    #[test]
    fn test_seed_has_one_account_per_role() {
        let seeds = default_seed_accounts();
        for role in Role::ALL {
            assert_eq!(seeds.iter().filter(|a| a.role == *role).count(), 1, "{}", role);
        }
        let admin = &seeds[0];
        assert_eq!(admin.username, "Superadminit");
        assert_eq!(admin.password, "Admin@10");
        assert_eq!(admin.role, Role::Admin);
    }

    #[test]
    fn test_sections_override_defaults() {
        let config = Config::from_toml(
            r#"
            [storage]
            backend = "memory"

            [logging]
            level = "debug"
            json = true

            [export]
            output_dir = "out"
            page_width = 60

            [[seed_accounts]]
            id = "1"
            username = "root"
            password = "pw"
            role = "admin"
            displayName = "Root"
            division = "Admin"
            "#,
        )
        .unwrap();
        assert_eq!(config.storage.backend, BackendKind::Memory);
        assert_eq!(config.storage.path, "alinea.db");
        assert!(config.logging.json);
        assert_eq!(config.export.output_dir, PathBuf::from("out"));
        assert_eq!(config.export.page_width, 60);
        assert_eq!(config.seed_accounts.len(), 1);
        assert_eq!(config.seed_accounts[0].display_name, "Root");
    }

    #[test]
    fn test_cli_overrides() {
        let cli = CliArgs::parse_from([
            "alinea",
            "--config",
            "/nonexistent/alinea.toml",
            "--data",
            "other.db",
            "--log-level",
            "trace",
            "whoami",
        ]);
        let config = Config::load(&cli);
        assert_eq!(config.storage.path, "other.db");
        assert_eq!(config.logging.level, "trace");
    }
}
