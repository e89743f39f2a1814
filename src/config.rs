use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::domain::{BowlingStyle, MatchFormat, PitchCategory, RosterOverrides, TeamComposition};
use crate::error::{Result, XiError};
use crate::ml::PredictorKind;
use crate::selection::{CompositionTable, TeamSelector};

/// Main configuration structure
#[derive(Debug, Clone, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub data: DataConfig,
    /// PostgreSQL dataset store (optional; CSV-only deployments leave it out)
    #[serde(default)]
    pub database: Option<DatabaseConfig>,
    #[serde(default)]
    pub model: ModelConfig,
    #[serde(default)]
    pub roster: RosterConfig,
    #[serde(default)]
    pub selection: SelectionConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    5000
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum DataSourceKind {
    #[default]
    Csv,
    Postgres,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DataConfig {
    /// Where performance records are read from
    #[serde(default)]
    pub source: DataSourceKind,
    /// Directory holding the per-format CSV exports
    #[serde(default = "default_csv_dir")]
    pub csv_dir: PathBuf,
    /// File name per format, relative to `csv_dir`
    #[serde(default)]
    pub files: CsvFiles,
    /// Extra header aliases per canonical field (e.g. runs = ["Total_Runs"])
    #[serde(default)]
    pub column_aliases: HashMap<String, Vec<String>>,
}

fn default_csv_dir() -> PathBuf {
    PathBuf::from("data")
}

#[derive(Debug, Clone, Deserialize)]
pub struct CsvFiles {
    #[serde(default = "default_odi_file")]
    pub odi: String,
    #[serde(default = "default_t20_file")]
    pub t20: String,
    #[serde(default = "default_test_file")]
    pub test: String,
}

fn default_odi_file() -> String {
    "odi_performance.csv".to_string()
}

fn default_t20_file() -> String {
    "t20_performance.csv".to_string()
}

fn default_test_file() -> String {
    "test_performance.csv".to_string()
}

impl Default for CsvFiles {
    fn default() -> Self {
        Self {
            odi: default_odi_file(),
            t20: default_t20_file(),
            test: default_test_file(),
        }
    }
}

impl CsvFiles {
    pub fn get(&self, format: MatchFormat) -> &str {
        match format {
            MatchFormat::Odi => &self.odi,
            MatchFormat::T20 => &self.t20,
            MatchFormat::Test => &self.test,
        }
    }
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            source: DataSourceKind::Csv,
            csv_dir: default_csv_dir(),
            files: CsvFiles::default(),
            column_aliases: HashMap::new(),
        }
    }
}

impl DataConfig {
    /// Path of a format's export; `None` when its file name is left blank.
    pub fn csv_path(&self, format: MatchFormat) -> Option<PathBuf> {
        let name = self.files.get(format).trim();
        (!name.is_empty()).then(|| self.csv_dir.join(name))
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// PostgreSQL connection URL
    pub url: String,
    /// Maximum connections in pool
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    /// Run embedded migrations on startup
    #[serde(default)]
    pub migrate: bool,
}

fn default_max_connections() -> u32 {
    5
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct ModelConfig {
    #[serde(default)]
    pub kind: PredictorKind,
    /// JSON artifact for the dense predictor
    #[serde(default)]
    pub path: Option<PathBuf>,
}

/// Known players whose role is fixed regardless of the role column.
#[derive(Debug, Clone, Deserialize)]
pub struct RosterConfig {
    #[serde(default)]
    pub wicket_keepers: Vec<String>,
    #[serde(default)]
    pub all_rounders: Vec<String>,
}

impl Default for RosterConfig {
    fn default() -> Self {
        Self {
            wicket_keepers: vec!["Kusal Mendis".into(), "Sadeera Samarawickrama".into()],
            all_rounders: vec![
                "Wanindu Hasaranga".into(),
                "Dhananjaya de Silva".into(),
                "Dasun Shanaka".into(),
                "Dunith Wellalage".into(),
                "Chamika Karunaratne".into(),
                "Charith Asalanka".into(),
                "Janith Liyanage".into(),
            ],
        }
    }
}

impl RosterConfig {
    pub fn overrides(&self) -> RosterOverrides {
        RosterOverrides::new(self.wicket_keepers.clone(), self.all_rounders.clone())
    }
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct SelectionConfig {
    /// Entries replacing the built-in composition table
    #[serde(default)]
    pub compositions: Vec<CompositionOverride>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CompositionOverride {
    pub format: MatchFormat,
    pub pitch: PitchCategory,
    pub keepers: usize,
    pub batsmen: usize,
    pub all_rounders: usize,
    pub bowlers: usize,
    #[serde(default)]
    pub bias_style: Option<BowlingStyle>,
    #[serde(default)]
    pub bias_min: Option<usize>,
}

impl CompositionOverride {
    pub fn composition(&self) -> TeamComposition {
        let base = TeamComposition::new(self.keepers, self.batsmen, self.all_rounders, self.bowlers);
        match self.bias_style {
            Some(style) => base.with_bias(style, self.bias_min.unwrap_or(1)),
            None => base,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Enable JSON formatted logs
    #[serde(default)]
    pub json: bool,
    /// Directory for a daily rolling log file
    #[serde(default)]
    pub dir: Option<PathBuf>,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: false,
            dir: None,
        }
    }
}

impl AppConfig {
    /// Load configuration from files and environment
    pub fn load() -> std::result::Result<Self, ConfigError> {
        Self::load_from("config")
    }

    /// Load configuration from a specific directory
    pub fn load_from<P: AsRef<Path>>(config_dir: P) -> std::result::Result<Self, ConfigError> {
        let config_dir = config_dir.as_ref();

        let builder = Config::builder()
            // Start with default values
            .set_default("logging.level", "info")?
            .set_default("logging.json", false)?
            .set_default("server.port", 5000)?
            // Load default config file
            .add_source(File::from(config_dir.join("default.toml")).required(false))
            // Load environment-specific config (e.g., config/production.toml)
            .add_source(
                File::from(config_dir.join(
                    std::env::var("CRICKET_ENV").unwrap_or_else(|_| "development".to_string()),
                ))
                .required(false),
            )
            // Override with environment variables (CRICKET__SERVER__PORT, etc.)
            .add_source(
                Environment::with_prefix("CRICKET")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            );

        builder.build()?.try_deserialize()
    }

    /// Validate configuration values
    pub fn validate(&self) -> std::result::Result<(), Vec<String>> {
        let mut errors = Vec::new();

        if self.server.port == 0 {
            errors.push("server.port must be non-zero".to_string());
        }

        if self.data.source == DataSourceKind::Postgres && self.database.is_none() {
            errors.push("data.source = postgres requires a [database] section".to_string());
        }

        if self.model.kind == PredictorKind::Dense && self.model.path.is_none() {
            errors.push("model.kind = dense requires model.path".to_string());
        }

        for entry in &self.selection.compositions {
            if let Err(e) = entry.composition().validate() {
                errors.push(format!(
                    "selection.compositions {}/{}: {e}",
                    entry.format, entry.pitch
                ));
            }
        }

        if let Some(db) = &self.database {
            if db.max_connections == 0 {
                errors.push("database.max_connections must be positive".to_string());
            }
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    /// Composition table with configured overrides applied on top of the defaults.
    pub fn composition_table(&self) -> Result<CompositionTable> {
        let mut table = CompositionTable::default();
        for entry in &self.selection.compositions {
            table.set(entry.format, entry.pitch, entry.composition())?;
        }
        Ok(table)
    }

    pub fn build_selector(&self) -> Result<TeamSelector> {
        Ok(TeamSelector::new(
            self.composition_table()?,
            self.roster.overrides(),
        ))
    }

    pub fn bind_addr(&self) -> Result<std::net::SocketAddr> {
        format!("{}:{}", self.server.host, self.server.port)
            .parse()
            .map_err(|e| XiError::Validation(format!("invalid server address: {e}")))
    }
}
