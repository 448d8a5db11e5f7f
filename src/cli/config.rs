use clap::{Parser, Subcommand};
use serde::{Deserialize, Serialize};

use crate::error::{DriverError, Result};
use crate::page::config::SessionConfig;

pub const DEFAULT_CONFIG_FILE: &str = "clickthrough.yaml";

// ============================================================================
// CLI Argument Parsing (clap derive)
// ============================================================================

#[derive(Parser, Debug)]
#[command(
    name = "clickthrough",
    version,
    about = "Drive a web application through its links, forms and confirm dialogs"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Path to config file (default: clickthrough.yaml in current dir)
    #[arg(long, global = true)]
    pub config: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run scripted sessions from YAML files
    Run {
        /// YAML file or directory of YAML files
        #[arg(long)]
        spec: String,

        /// Application root that script paths are relative to
        #[arg(long)]
        base_url: Option<String>,

        /// Output format: console, junit
        #[arg(long)]
        format: Option<String>,

        /// Output file (default: stdout)
        #[arg(short, long)]
        output: Option<String>,

        /// Ignore onclick handlers: every link is a plain GET
        #[arg(long)]
        no_javascript: bool,
    },

    /// Print the links of a page with the request each would make
    Links {
        /// Path of the page to inspect
        #[arg(long, default_value = "/")]
        url: String,

        #[arg(long)]
        base_url: Option<String>,
    },
}

// ============================================================================
// Config File Model (optional YAML)
// ============================================================================

/// Optional YAML config file: `clickthrough.yaml`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub session: SessionConfig,

    #[serde(default)]
    pub run: RunConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunConfig {
    #[serde(default = "default_console")]
    pub format: String,

    pub output: Option<String>,

    #[serde(default = "default_base_url")]
    pub base_url: String,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            format: default_console(),
            output: None,
            base_url: default_base_url(),
        }
    }
}

// Serde default helpers
fn default_console() -> String { "console".to_string() }
fn default_base_url() -> String { "http://localhost:3000".to_string() }

// ============================================================================
// Config File Loading
// ============================================================================

/// Load config from a YAML file. A missing file yields defaults; a file that
/// exists but does not parse is an error.
pub fn load_config(path: Option<&str>) -> Result<AppConfig> {
    let config_path = path.unwrap_or(DEFAULT_CONFIG_FILE);
    match std::fs::read_to_string(config_path) {
        Ok(content) => serde_yaml::from_str(&content)
            .map_err(|e| DriverError::Config(format!("{}: {}", config_path, e))),
        Err(_) if path.is_none() => Ok(AppConfig::default()),
        Err(e) => Err(DriverError::Config(format!("{}: {}", config_path, e))),
    }
}

/// Session settings for a run, with CLI flags applied over the file.
pub fn session_config(config: &AppConfig, no_javascript: bool) -> SessionConfig {
    let session = config.session.clone();
    if no_javascript {
        session.with_javascript(false)
    } else {
        session
    }
}
