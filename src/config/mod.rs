use crate::dialogs::ModalSize;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Prefix of every environment override
const ENV_PREFIX: &str = "ACTION_DIALOGS_";

/// Application configuration
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Titles and labels applied by the facade when a caller omits them
    #[serde(default)]
    pub defaults: DialogDefaults,

    /// Terminal presenter settings
    #[serde(default)]
    pub terminal: TerminalSettings,
}

/// Default titles and labels for each dialog kind
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DialogDefaults {
    pub alert_title: String,
    pub confirm_title: String,
    pub prompt_title: String,
    /// Affirmative label of an alert
    pub ok_label: String,
    /// Affirmative label of a confirmation
    pub yes_label: String,
    pub no_label: String,
    pub save_label: String,
    pub apply_label: String,
    pub modal_size: ModalSize,
    pub modal_close_button: bool,
}

impl Default for DialogDefaults {
    fn default() -> Self {
        Self {
            alert_title: "Alert".to_string(),
            confirm_title: "Confirmation".to_string(),
            prompt_title: "Prompt".to_string(),
            ok_label: "OK".to_string(),
            yes_label: "Yes".to_string(),
            no_label: "No".to_string(),
            save_label: "Save Changes".to_string(),
            apply_label: "Apply".to_string(),
            modal_size: ModalSize::Md,
            modal_close_button: true,
        }
    }
}

/// Settings of the terminal presenter
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TerminalSettings {
    /// How long to wait for input before redrawing
    pub tick_rate_ms: u64,
    /// Cells each stacked dialog is shifted down and right from the one below
    pub stack_offset: u16,
    /// Dim the screen behind the dialog stack
    pub dim_background: bool,
}

impl Default for TerminalSettings {
    fn default() -> Self {
        Self {
            tick_rate_ms: 100,
            stack_offset: 2,
            dim_background: true,
        }
    }
}

impl Config {
    /// Initialize configuration from various sources
    pub async fn init(explicit_path: Option<&Path>) -> Result<Self> {
        debug!("Initializing configuration");

        let mut config = match explicit_path {
            Some(path) => Self::load_file(path).await?,
            None => match Self::discover_file() {
                Some(path) => Self::load_file(&path).await?,
                None => Self::default(),
            },
        };

        config.load_from_env();
        config.validate()?;

        Ok(config)
    }

    /// Candidate configuration files, first match wins:
    /// 1. ./.action-dialogs.json
    /// 2. ./action-dialogs.json
    /// 3. $CONFIG_DIR/action-dialogs/config.json
    pub fn config_paths() -> Vec<PathBuf> {
        let mut config_paths = vec![
            PathBuf::from("./.action-dialogs.json"),
            PathBuf::from("./action-dialogs.json"),
        ];

        if let Some(config_dir) = dirs::config_dir() {
            config_paths.push(config_dir.join("action-dialogs").join("config.json"));
        }

        config_paths
    }

    fn discover_file() -> Option<PathBuf> {
        Self::config_paths().into_iter().find(|path| path.exists())
    }

    /// Load configuration from a JSON file
    pub async fn load_file(path: &Path) -> Result<Self> {
        debug!("Loading configuration from: {}", path.display());
        let content = tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read configuration file {}", path.display()))?;
        let config: Self = serde_json::from_str(&content)
            .with_context(|| format!("Invalid configuration file {}", path.display()))?;
        Ok(config)
    }

    /// Load overrides from `ACTION_DIALOGS_*` environment variables
    pub fn load_from_env(&mut self) {
        self.apply_overrides(|key| std::env::var(format!("{}{}", ENV_PREFIX, key)).ok());
    }

    /// Apply overrides from a lookup keyed by the variable name without prefix
    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        let defaults = &mut self.defaults;
        let labels: [(&str, &mut String); 8] = [
            ("ALERT_TITLE", &mut defaults.alert_title),
            ("CONFIRM_TITLE", &mut defaults.confirm_title),
            ("PROMPT_TITLE", &mut defaults.prompt_title),
            ("OK_LABEL", &mut defaults.ok_label),
            ("YES_LABEL", &mut defaults.yes_label),
            ("NO_LABEL", &mut defaults.no_label),
            ("SAVE_LABEL", &mut defaults.save_label),
            ("APPLY_LABEL", &mut defaults.apply_label),
        ];
        for (key, field) in labels {
            if let Some(value) = lookup(key) {
                *field = value;
            }
        }

        if let Some(size) = lookup("MODAL_SIZE") {
            match size.parse() {
                Ok(size) => defaults.modal_size = size,
                Err(e) => debug!("Ignoring {}MODAL_SIZE: {}", ENV_PREFIX, e),
            }
        }

        if let Some(show) = lookup("MODAL_CLOSE_BUTTON") {
            defaults.modal_close_button = show.to_lowercase() == "true";
        }

        if let Some(tick_rate) = lookup("TICK_RATE_MS").and_then(|value| value.parse().ok()) {
            self.terminal.tick_rate_ms = tick_rate;
        }

        if let Some(offset) = lookup("STACK_OFFSET").and_then(|value| value.parse().ok()) {
            self.terminal.stack_offset = offset;
        }

        if let Some(dim) = lookup("DIM_BACKGROUND") {
            self.terminal.dim_background = dim.to_lowercase() == "true";
        }
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        let defaults = &self.defaults;
        let labels = [
            ("alert_title", &defaults.alert_title),
            ("confirm_title", &defaults.confirm_title),
            ("prompt_title", &defaults.prompt_title),
            ("ok_label", &defaults.ok_label),
            ("yes_label", &defaults.yes_label),
            ("no_label", &defaults.no_label),
            ("save_label", &defaults.save_label),
            ("apply_label", &defaults.apply_label),
        ];

        for (name, value) in labels {
            if value.trim().is_empty() {
                return Err(anyhow::anyhow!("{} must not be empty", name));
            }
        }

        if self.terminal.tick_rate_ms == 0 {
            return Err(anyhow::anyhow!("tick_rate_ms must be greater than 0"));
        }

        Ok(())
    }
}
