//! adaptiq configuration loading.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::session::{SessionConfig, DEFAULT_QUESTION_COUNT};

/// Environment variable that overrides the configured display name.
pub const DISPLAY_NAME_ENV: &str = "ADAPTIQ_DISPLAY_NAME";

/// Top-level adaptiq configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdaptiqConfig {
    /// Questions per session.
    #[serde(default = "default_question_count")]
    pub question_count: u32,
    /// Name recorded on reports and the leaderboard.
    #[serde(default = "default_display_name")]
    pub display_name: String,
    /// Directory for session reports and the leaderboard.
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,
    /// Bank used when `run` is given no `--bank`.
    #[serde(default)]
    pub question_bank: Option<PathBuf>,
}

fn default_question_count() -> u32 {
    DEFAULT_QUESTION_COUNT
}
fn default_display_name() -> String {
    "Anonymous".to_string()
}
fn default_output_dir() -> PathBuf {
    PathBuf::from("./adaptiq-results")
}

impl Default for AdaptiqConfig {
    fn default() -> Self {
        Self {
            question_count: default_question_count(),
            display_name: default_display_name(),
            output_dir: default_output_dir(),
            question_bank: None,
        }
    }
}

impl AdaptiqConfig {
    pub fn session_config(&self) -> SessionConfig {
        SessionConfig {
            question_count: self.question_count,
            display_name: self.display_name.clone(),
        }
    }
}

/// Resolve environment variable references like `${VAR_NAME}` in a string.
///
/// Substituted values are inserted verbatim and never rescanned. Unset
/// variables resolve to the empty string; an unclosed `${` is kept as-is.
fn resolve_env_vars(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    let mut rest = s;
    while let Some(start) = rest.find("${") {
        let Some(len) = rest[start + 2..].find('}') else {
            break;
        };
        result.push_str(&rest[..start]);
        let var_name = &rest[start + 2..start + 2 + len];
        result.push_str(&std::env::var(var_name).unwrap_or_default());
        rest = &rest[start + 2 + len + 1..];
    }
    result.push_str(rest);
    result
}

fn resolve_path(path: &Path) -> PathBuf {
    PathBuf::from(resolve_env_vars(&path.to_string_lossy()))
}

/// Load config from an explicit path, or search the default locations.
///
/// Search order without an explicit path:
/// 1. `adaptiq.toml` in the current directory
/// 2. `~/.config/adaptiq/config.toml`
///
/// `ADAPTIQ_DISPLAY_NAME` overrides the display name.
pub fn load_config_from(path: Option<&Path>) -> Result<AdaptiqConfig> {
    let config_path = if let Some(p) = path {
        if p.exists() {
            Some(p.to_path_buf())
        } else {
            anyhow::bail!("config file not found: {}", p.display());
        }
    } else {
        let local = PathBuf::from("adaptiq.toml");
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
            toml::from_str::<AdaptiqConfig>(&content)
                .with_context(|| format!("failed to parse config: {}", path.display()))?
        }
        None => AdaptiqConfig::default(),
    };

    if let Ok(name) = std::env::var(DISPLAY_NAME_ENV) {
        config.display_name = name;
    }

    config.display_name = resolve_env_vars(&config.display_name);
    config.output_dir = resolve_path(&config.output_dir);
    config.question_bank = config.question_bank.as_deref().map(resolve_path);

    anyhow::ensure!(
        config.question_count >= 1,
        "question_count must be at least 1"
    );

    Ok(config)
}

fn dirs_path() -> Option<PathBuf> {
    std::env::var("HOME")
        .ok()
        .map(|h| PathBuf::from(h).join(".config").join("adaptiq"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolve_env_vars_basic() {
        std::env::set_var("_ADAPTIQ_TEST_VAR", "hello");
        assert_eq!(resolve_env_vars("${_ADAPTIQ_TEST_VAR}"), "hello");
        assert_eq!(
            resolve_env_vars("prefix_${_ADAPTIQ_TEST_VAR}_suffix"),
            "prefix_hello_suffix"
        );
        assert_eq!(resolve_env_vars("no vars ${unclosed"), "no vars ${unclosed");
        std::env::remove_var("_ADAPTIQ_TEST_VAR");
    }

    #[test]
    fn resolved_values_are_not_rescanned() {
        std::env::set_var("_ADAPTIQ_SELF_REF", "${_ADAPTIQ_SELF_REF}");
        std::env::set_var("_ADAPTIQ_OUTER", "${_ADAPTIQ_INNER}");
        std::env::set_var("_ADAPTIQ_INNER", "inner");

        assert_eq!(resolve_env_vars("${_ADAPTIQ_SELF_REF}"), "${_ADAPTIQ_SELF_REF}");
        assert_eq!(
            resolve_env_vars("a ${_ADAPTIQ_SELF_REF} b ${_ADAPTIQ_OUTER}"),
            "a ${_ADAPTIQ_SELF_REF} b ${_ADAPTIQ_INNER}"
        );
        assert_eq!(resolve_env_vars("${_ADAPTIQ_UNSET_VAR}!"), "!");

        std::env::remove_var("_ADAPTIQ_SELF_REF");
        std::env::remove_var("_ADAPTIQ_OUTER");
        std::env::remove_var("_ADAPTIQ_INNER");
    }

    #[test]
    fn self_referencing_display_name_loads() {
        std::env::set_var("_ADAPTIQ_NAME_LOOP", "${_ADAPTIQ_NAME_LOOP}");
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("adaptiq.toml");
        std::fs::write(&path, "display_name = \"${_ADAPTIQ_NAME_LOOP}\"\n").unwrap();

        let config = load_config_from(Some(&path)).unwrap();
        std::env::remove_var("_ADAPTIQ_NAME_LOOP");
        if std::env::var(DISPLAY_NAME_ENV).is_err() {
            assert_eq!(config.display_name, "${_ADAPTIQ_NAME_LOOP}");
        }
    }

    #[test]
    fn default_config() {
        let config = AdaptiqConfig::default();
        assert_eq!(config.question_count, 15);
        assert_eq!(config.display_name, "Anonymous");
        assert!(config.question_bank.is_none());
        assert_eq!(config.session_config().question_count, 15);
    }

    #[test]
    fn parse_partial_config() {
        let config: AdaptiqConfig = toml::from_str(
            r#"
question_count = 10
question_bank = "question-banks/general-aptitude.toml"
"#,
        )
        .unwrap();
        assert_eq!(config.question_count, 10);
        assert_eq!(config.display_name, "Anonymous");
        assert_eq!(
            config.question_bank,
            Some(PathBuf::from("question-banks/general-aptitude.toml"))
        );
    }

    #[test]
    fn load_from_explicit_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("adaptiq.toml");
        std::fs::write(&path, "question_count = 5\noutput_dir = \"out\"\n").unwrap();

        let config = load_config_from(Some(&path)).unwrap();
        assert_eq!(config.question_count, 5);
        assert_eq!(config.output_dir, PathBuf::from("out"));
    }

    #[test]
    fn missing_explicit_path_is_an_error() {
        let err = load_config_from(Some(Path::new("does/not/exist.toml"))).unwrap_err();
        assert!(err.to_string().contains("config file not found"));
    }

    #[test]
    fn zero_questions_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("adaptiq.toml");
        std::fs::write(&path, "question_count = 0\n").unwrap();
        assert!(load_config_from(Some(&path)).is_err());
    }
}
