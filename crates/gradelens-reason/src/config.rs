//! Configuration loading and the reason generator factory.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use gradelens_core::traits::{LocalReasonGenerator, ReasonGenerator};

use crate::http::HttpReasonGenerator;

/// Settings of the remote reason service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReasonConfig {
    /// Whether recommendations should ask the remote service at all.
    #[serde(default)]
    pub enabled: bool,
    /// Endpoint receiving the JSON reason request.
    #[serde(default = "default_proxy_url")]
    pub proxy_url: String,
    /// Prompt sent when a request carries no override.
    #[serde(default = "default_prompt")]
    pub prompt: String,
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_secs: u64,
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
}

fn default_proxy_url() -> String {
    "http://localhost:9000/reason".to_string()
}
fn default_prompt() -> String {
    "Write one short sentence explaining this study recommendation.".to_string()
}
fn default_connect_timeout() -> u64 {
    5
}
fn default_request_timeout() -> u64 {
    8
}

impl Default for ReasonConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            proxy_url: default_proxy_url(),
            prompt: default_prompt(),
            connect_timeout_secs: default_connect_timeout(),
            request_timeout_secs: default_request_timeout(),
        }
    }
}

impl ReasonConfig {
    /// The remote service is used only when enabled with a non-blank URL.
    pub fn is_active(&self) -> bool {
        self.enabled && !self.proxy_url.trim().is_empty()
    }
}

/// Top-level gradelens configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GradelensConfig {
    /// Dataset file or directory used when no `--dataset` is given.
    #[serde(default = "default_dataset")]
    pub dataset: PathBuf,
    #[serde(default)]
    pub reason: ReasonConfig,
}

fn default_dataset() -> PathBuf {
    PathBuf::from("datasets/demo-school.json")
}

impl Default for GradelensConfig {
    fn default() -> Self {
        Self {
            dataset: default_dataset(),
            reason: ReasonConfig::default(),
        }
    }
}

/// Resolve environment variable references like `${VAR_NAME}` in a string.
///
/// Substituted values are inserted verbatim and never rescanned.
pub fn resolve_env_vars(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    let mut rest = s;
    while let Some(start) = rest.find("${") {
        let Some(end) = rest[start..].find('}') else {
            break;
        };
        let var_name = &rest[start + 2..start + end];
        result.push_str(&rest[..start]);
        result.push_str(&std::env::var(var_name).unwrap_or_default());
        rest = &rest[start + end + 1..];
    }
    result.push_str(rest);
    result
}

/// Load configuration from well-known paths.
///
/// Search order:
/// 1. `gradelens.toml` in the current directory
/// 2. `~/.config/gradelens/config.toml`
///
/// Environment variable overrides: `GRADELENS_DATASET`,
/// `GRADELENS_REASON_URL` (also enables the remote service),
/// `GRADELENS_REASON_PROMPT`.
pub fn load_config() -> Result<GradelensConfig> {
    load_config_from(None)
}

/// Load config from an explicit path, or search the default locations.
pub fn load_config_from(path: Option<&Path>) -> Result<GradelensConfig> {
    let config_path = if let Some(p) = path {
        if p.exists() {
            Some(p.to_path_buf())
        } else {
            anyhow::bail!("config file not found: {}", p.display());
        }
    } else {
        let local = PathBuf::from("gradelens.toml");
        if local.exists() {
            Some(local)
        } else {
            dirs_path()
                .map(|home| home.join("config.toml"))
                .filter(|global| global.exists())
        }
    };

    let mut config = match config_path {
        Some(path) => {
            let content = std::fs::read_to_string(&path)
                .with_context(|| format!("failed to read config: {}", path.display()))?;
            tracing::debug!("using config {}", path.display());
            toml::from_str::<GradelensConfig>(&content)
                .with_context(|| format!("failed to parse config: {}", path.display()))?
        }
        None => GradelensConfig::default(),
    };

    apply_env_overrides(&mut config, |name| std::env::var(name).ok());
    resolve_config_env_vars(&mut config);

    Ok(config)
}

/// Apply `GRADELENS_*` overrides using `var` to look variables up.
pub fn apply_env_overrides(config: &mut GradelensConfig, var: impl Fn(&str) -> Option<String>) {
    if let Some(dataset) = var("GRADELENS_DATASET") {
        config.dataset = PathBuf::from(dataset);
    }
    if let Some(url) = var("GRADELENS_REASON_URL") {
        config.reason.proxy_url = url;
        config.reason.enabled = true;
    }
    if let Some(prompt) = var("GRADELENS_REASON_PROMPT") {
        config.reason.prompt = prompt;
    }
}

fn resolve_config_env_vars(config: &mut GradelensConfig) {
    if let Some(dataset) = config.dataset.to_str() {
        config.dataset = PathBuf::from(resolve_env_vars(dataset));
    }
    config.reason.proxy_url = resolve_env_vars(&config.reason.proxy_url);
    config.reason.prompt = resolve_env_vars(&config.reason.prompt);
}

fn dirs_path() -> Option<PathBuf> {
    std::env::var("HOME")
        .ok()
        .map(|h| PathBuf::from(h).join(".config").join("gradelens"))
}

/// Create the reason generator described by `config`.
///
/// An inactive configuration yields the local fallback generator.
pub fn create_generator(config: &ReasonConfig) -> Result<Arc<dyn ReasonGenerator>> {
    if config.is_active() {
        let generator = HttpReasonGenerator::new(config)
            .with_context(|| format!("failed to set up reason service at {}", config.proxy_url))?;
        Ok(Arc::new(generator))
    } else {
        Ok(Arc::new(LocalReasonGenerator))
    }
}

/// Starter configuration written by `gradelens init`.
pub const SAMPLE_CONFIG: &str = r#"# gradelens configuration

# Dataset file (.json / .toml) or a directory of dataset files.
dataset = "datasets/demo-school.json"

[reason]
# Ask a remote service to phrase recommendation reasons.
enabled = false
proxy_url = "http://localhost:9000/reason"
prompt = "Write one short sentence explaining this study recommendation."
connect_timeout_secs = 5
request_timeout_secs = 8
"#;

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn resolve_env_vars_basic() {
        std::env::set_var("_GRADELENS_TEST_VAR", "hello");
        assert_eq!(resolve_env_vars("${_GRADELENS_TEST_VAR}"), "hello");
        assert_eq!(
            resolve_env_vars("prefix_${_GRADELENS_TEST_VAR}_suffix"),
            "prefix_hello_suffix"
        );
        assert_eq!(resolve_env_vars("${_GRADELENS_UNSET_VAR_X}"), "");
        assert_eq!(resolve_env_vars("no ${closing"), "no ${closing");
        std::env::remove_var("_GRADELENS_TEST_VAR");
    }

    #[test]
    fn resolve_env_vars_does_not_rescan_values() {
        std::env::set_var("_GRADELENS_SELF_REF", "${_GRADELENS_SELF_REF}");
        assert_eq!(
            resolve_env_vars("url=${_GRADELENS_SELF_REF}/x"),
            "url=${_GRADELENS_SELF_REF}/x"
        );
        std::env::set_var("_GRADELENS_HOST", "example.org");
        assert_eq!(
            resolve_env_vars("${_GRADELENS_HOST}:${_GRADELENS_HOST}"),
            "example.org:example.org"
        );
        std::env::remove_var("_GRADELENS_SELF_REF");
        std::env::remove_var("_GRADELENS_HOST");
    }

    #[test]
    fn default_config() {
        let config = GradelensConfig::default();
        assert_eq!(config.dataset, PathBuf::from("datasets/demo-school.json"));
        assert!(!config.reason.enabled);
        assert_eq!(config.reason.connect_timeout_secs, 5);
        assert_eq!(config.reason.request_timeout_secs, 8);
        assert!(!config.reason.is_active());
    }

    #[test]
    fn parse_partial_config() {
        let config: GradelensConfig = toml::from_str(
            r#"
[reason]
enabled = true
proxy_url = "http://reason.internal/reason"
"#,
        )
        .unwrap();
        assert!(config.reason.is_active());
        assert_eq!(config.reason.request_timeout_secs, 8);
        assert_eq!(config.dataset, PathBuf::from("datasets/demo-school.json"));
    }

    #[test]
    fn sample_config_parses() {
        let config: GradelensConfig = toml::from_str(SAMPLE_CONFIG).unwrap();
        assert!(!config.reason.enabled);
        assert_eq!(config.reason.connect_timeout_secs, 5);
    }

    #[test]
    fn blank_url_is_inactive() {
        let config = ReasonConfig {
            enabled: true,
            proxy_url: "  ".into(),
            ..ReasonConfig::default()
        };
        assert!(!config.is_active());
    }

    #[test]
    fn env_overrides() {
        let vars: HashMap<&str, &str> = [
            ("GRADELENS_DATASET", "/data/school"),
            ("GRADELENS_REASON_URL", "http://localhost:9100/reason"),
            ("GRADELENS_REASON_PROMPT", "Be brief."),
        ]
        .into_iter()
        .collect();
        let mut config = GradelensConfig::default();
        apply_env_overrides(&mut config, |name| vars.get(name).map(|v| v.to_string()));

        assert_eq!(config.dataset, PathBuf::from("/data/school"));
        assert!(config.reason.enabled);
        assert_eq!(config.reason.proxy_url, "http://localhost:9100/reason");
        assert_eq!(config.reason.prompt, "Be brief.");
    }

    #[test]
    fn explicit_config_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("gradelens.toml");
        std::fs::write(&path, "dataset = \"school.toml\"\n").unwrap();
        let config = load_config_from(Some(&path)).unwrap();
        assert_eq!(config.dataset.file_name().unwrap(), "school.toml");

        let missing = load_config_from(Some(&dir.path().join("nope.toml")));
        assert!(missing.is_err());
    }

    #[test]
    fn malformed_config_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("gradelens.toml");
        std::fs::write(&path, "[reason\nenabled = ").unwrap();
        let err = load_config_from(Some(&path)).unwrap_err();
        assert!(format!("{err:#}").contains("failed to parse config"));
    }

    #[test]
    fn factory_picks_generator() {
        let local = create_generator(&ReasonConfig::default()).unwrap();
        assert_eq!(local.name(), "local");

        let remote = create_generator(&ReasonConfig {
            enabled: true,
            proxy_url: "http://localhost:9000/reason".into(),
            ..ReasonConfig::default()
        })
        .unwrap();
        assert_eq!(remote.name(), "http");
    }
}
