//! Effective bridge settings and on-disk layers

use std::path::PathBuf;

use serde::Deserialize;

use super::traits::{ConfigError, ConfigResult};

/// Executable invoked for every tool call
pub const DEFAULT_PROGRAM: &str = "codex";
/// Flag that keeps Codex non-interactive; always passed, never configurable
pub const QUIET_FLAG: &str = "-q";
/// Per-stream capture limit
pub const DEFAULT_MAX_OUTPUT_BYTES: usize = 10 * 1024 * 1024;
/// Project documentation handed to reviews when present
pub const DEFAULT_PROJECT_DOC: &str = "CLAUDE.md";
pub const DEFAULT_API_KEY_VAR: &str = "OPENAI_API_KEY";
/// Used when `HOME` is unset
pub const DEFAULT_HOME_FALLBACK: &str = "/root";

/// Effective settings for the bridge
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BridgeConfig {
    /// Program to execute (`codex`, or a launcher such as `npx`)
    pub program: String,
    /// Arguments placed between the program and the quiet flag
    pub launcher_args: Vec<String>,
    /// Capture limit applied to stdout and to stderr separately
    pub max_output_bytes: usize,
    pub project_doc: PathBuf,
    pub api_key_var: String,
    pub home_fallback: PathBuf,
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            program: DEFAULT_PROGRAM.to_string(),
            launcher_args: Vec::new(),
            max_output_bytes: DEFAULT_MAX_OUTPUT_BYTES,
            project_doc: PathBuf::from(DEFAULT_PROJECT_DOC),
            api_key_var: DEFAULT_API_KEY_VAR.to_string(),
            home_fallback: PathBuf::from(DEFAULT_HOME_FALLBACK),
        }
    }
}

impl BridgeConfig {
    /// Overlay every field the layer sets
    pub fn apply(&mut self, layer: &ConfigFile) {
        if let Some(program) = &layer.program {
            self.program = program.clone();
        }
        if let Some(args) = &layer.launcher_args {
            self.launcher_args = args.clone();
        }
        if let Some(limit) = layer.max_output_bytes {
            self.max_output_bytes = limit;
        }
        if let Some(doc) = &layer.project_doc {
            self.project_doc = doc.clone();
        }
        if let Some(var) = &layer.api_key_var {
            self.api_key_var = var.clone();
        }
        if let Some(home) = &layer.home_fallback {
            self.home_fallback = home.clone();
        }
    }
}

/// One configuration layer; unset fields leave lower layers alone
///
/// ```yaml
/// program: npx
/// launcher_args: ["--yes", "@openai/codex"]
/// max_output_bytes: 20971520
/// project_doc: docs/AGENTS.md
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ConfigFile {
    pub program: Option<String>,
    pub launcher_args: Option<Vec<String>>,
    pub max_output_bytes: Option<usize>,
    pub project_doc: Option<PathBuf>,
    pub api_key_var: Option<String>,
    pub home_fallback: Option<PathBuf>,
}

impl ConfigFile {
    pub fn validate(&self) -> ConfigResult<()> {
        if let Some(limit) = self.max_output_bytes {
            validate_output_limit("max_output_bytes", limit)?;
        }
        Ok(())
    }

    /// Keep only what a project checkout may choose
    ///
    /// The executable, its launcher, the credential variable and the home
    /// fallback decide what runs with the API key, so they come from user
    /// level or the environment only. Returns the names of dropped fields.
    pub fn restrict_to_workspace(self) -> (ConfigFile, Vec<&'static str>) {
        let mut dropped = Vec::new();
        if self.program.is_some() {
            dropped.push("program");
        }
        if self.launcher_args.is_some() {
            dropped.push("launcher_args");
        }
        if self.api_key_var.is_some() {
            dropped.push("api_key_var");
        }
        if self.home_fallback.is_some() {
            dropped.push("home_fallback");
        }

        let kept = ConfigFile {
            max_output_bytes: self.max_output_bytes,
            project_doc: self.project_doc,
            ..ConfigFile::default()
        };
        (kept, dropped)
    }
}

/// A capture limit of zero would fail every call
pub fn validate_output_limit(key: &str, limit: usize) -> ConfigResult<usize> {
    if limit == 0 {
        return Err(ConfigError::InvalidValue {
            key: key.to_string(),
            reason: "must be greater than zero".to_string(),
        });
    }
    Ok(limit)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = BridgeConfig::default();
        assert_eq!(config.program, "codex");
        assert!(config.launcher_args.is_empty());
        assert_eq!(config.max_output_bytes, 10 * 1024 * 1024);
        assert_eq!(config.project_doc, PathBuf::from("CLAUDE.md"));
        assert_eq!(config.api_key_var, "OPENAI_API_KEY");
        assert_eq!(config.home_fallback, PathBuf::from("/root"));
    }

    #[test]
    fn test_apply_only_set_fields() {
        let mut config = BridgeConfig::default();
        config.apply(&ConfigFile {
            program: Some("npx".to_string()),
            launcher_args: Some(vec!["@openai/codex".to_string()]),
            ..ConfigFile::default()
        });

        assert_eq!(config.program, "npx");
        assert_eq!(config.launcher_args, vec!["@openai/codex".to_string()]);
        assert_eq!(config.max_output_bytes, DEFAULT_MAX_OUTPUT_BYTES);
        assert_eq!(config.project_doc, PathBuf::from(DEFAULT_PROJECT_DOC));
    }

    #[test]
    fn test_config_file_yaml() {
        let layer: ConfigFile = serde_yaml::from_str("program: npx\nmax_output_bytes: 2048\n").unwrap();
        assert_eq!(layer.program.as_deref(), Some("npx"));
        assert_eq!(layer.max_output_bytes, Some(2048));
        assert_eq!(layer.launcher_args, None);

        assert!(serde_yaml::from_str::<ConfigFile>("quiet: false\n").is_err());
    }

    #[test]
    fn test_validate_rejects_zero_limit() {
        let layer = ConfigFile {
            max_output_bytes: Some(0),
            ..ConfigFile::default()
        };
        assert!(matches!(
            layer.validate(),
            Err(ConfigError::InvalidValue { ref key, .. }) if key == "max_output_bytes"
        ));
        assert!(ConfigFile::default().validate().is_ok());
    }

    #[test]
    fn test_restrict_to_workspace() {
        let layer = ConfigFile {
            program: Some("sh".to_string()),
            launcher_args: Some(vec!["-c".to_string(), "echo hi".to_string()]),
            max_output_bytes: Some(4096),
            project_doc: Some(PathBuf::from("docs/AGENTS.md")),
            api_key_var: Some("OTHER_KEY".to_string()),
            home_fallback: Some(PathBuf::from("/tmp")),
        };

        let (kept, dropped) = layer.restrict_to_workspace();
        assert_eq!(
            kept,
            ConfigFile {
                max_output_bytes: Some(4096),
                project_doc: Some(PathBuf::from("docs/AGENTS.md")),
                ..ConfigFile::default()
            }
        );
        assert_eq!(dropped, vec!["program", "launcher_args", "api_key_var", "home_fallback"]);
    }
}
