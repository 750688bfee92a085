// Configuration management for the nxos-flat command
// Supports CLI arguments, config file (TOML), and environment variables

use clap::{Parser, ValueEnum};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::Level;

use crate::commands::CommandFamily;

/// Flatten NX-API "show" command responses into JSON records
#[derive(Parser, Debug, Clone)]
#[command(name = "nxos-flat")]
#[command(author, version, about, long_about = None)]
pub struct CliArgs {
    /// Command family of the payload (bgp-sessions, ip-arp, ip-route, or the device command)
    #[arg(short, long, env = "NXFLAT_FAMILY")]
    pub family: Option<CommandFamily>,

    /// Payload file to read (defaults to stdin)
    #[arg(short, long)]
    pub input: Option<PathBuf>,

    /// Output format
    #[arg(long, value_enum, env = "NXFLAT_FORMAT")]
    pub format: Option<OutputFormat>,

    /// Pretty-print JSON output
    #[arg(long)]
    pub pretty: bool,

    /// Fail when any field could not be normalized
    #[arg(long, env = "NXFLAT_STRICT")]
    pub strict: bool,

    /// Logging level (error, warn, info, debug, trace)
    #[arg(short, long, env = "NXFLAT_LOG")]
    pub log_level: Option<String>,

    /// Path to configuration file
    #[arg(short, long, env = "NXFLAT_CONFIG")]
    pub config: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// One JSON array holding every record
    Json,
    /// One JSON object per line
    #[default]
    Jsonl,
}

/// Configuration file structure (TOML format)
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ConfigFile {
    /// Decoding settings
    #[serde(default)]
    pub decode: DecodeConfig,

    /// Output settings
    #[serde(default)]
    pub output: OutputConfig,

    /// Logging settings
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct DecodeConfig {
    /// Default command family
    #[serde(default)]
    pub family: Option<CommandFamily>,

    /// Treat scalar warnings as errors
    #[serde(default)]
    pub strict: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct OutputConfig {
    #[serde(default)]
    pub format: OutputFormat,

    #[serde(default)]
    pub pretty: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (error, warn, info, debug, trace)
    #[serde(default = "default_log_level")]
    pub level: String,
}

fn default_log_level() -> String {
    "warn".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        LoggingConfig {
            level: default_log_level(),
        }
    }
}

/// Merged configuration from all sources
#[derive(Debug, Clone)]
pub struct Config {
    pub family: CommandFamily,
    pub input: Option<PathBuf>,
    pub format: OutputFormat,
    pub pretty: bool,
    pub strict: bool,
    pub log_level: Level,
}

impl Config {
    /// Load configuration from all sources (CLI args, config file, defaults)
    /// Priority: CLI args > Config file > Defaults
    pub fn load() -> anyhow::Result<Self> {
        Self::from_args(CliArgs::parse())
    }

    pub fn from_args(cli_args: CliArgs) -> anyhow::Result<Self> {
        let config_file = match &cli_args.config {
            Some(config_path) => read_config_file(config_path)?,
            None => {
                // Try loading from default locations
                let default_paths = [
                    PathBuf::from("nxos-flat.toml"),
                    PathBuf::from("config.toml"),
                ];

                let mut loaded_config = None;
                for path in default_paths {
                    if path.exists() {
                        loaded_config = Some(read_config_file(&path)?);
                        break;
                    }
                }

                loaded_config.unwrap_or_default()
            }
        };

        Self::merge(cli_args, config_file)
    }

    fn merge(cli_args: CliArgs, config_file: ConfigFile) -> anyhow::Result<Self> {
        let family = cli_args
            .family
            .or(config_file.decode.family)
            .ok_or_else(|| anyhow::anyhow!("No command family given; pass --family or set decode.family"))?;

        let log_level = parse_log_level(
            cli_args
                .log_level
                .as_deref()
                .unwrap_or(&config_file.logging.level),
        )?;

        Ok(Config {
            family,
            input: cli_args.input,
            format: cli_args.format.unwrap_or(config_file.output.format),
            pretty: cli_args.pretty || config_file.output.pretty,
            strict: cli_args.strict || config_file.decode.strict,
            log_level,
        })
    }
}

fn read_config_file(path: &Path) -> anyhow::Result<ConfigFile> {
    tracing::info!("Loading configuration from: {}", path.display());
    let config_content = std::fs::read_to_string(path)?;
    Ok(toml::from_str::<ConfigFile>(&config_content)?)
}

fn parse_log_level(level_str: &str) -> anyhow::Result<Level> {
    match level_str.to_lowercase().as_str() {
        "error" => Ok(Level::ERROR),
        "warn" => Ok(Level::WARN),
        "info" => Ok(Level::INFO),
        "debug" => Ok(Level::DEBUG),
        "trace" => Ok(Level::TRACE),
        _ => Err(anyhow::anyhow!("Invalid log level: {}", level_str)),
    }
}
