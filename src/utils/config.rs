use crate::errors::LowerResult;
use crate::filter::FileLowerCase;
use console::style;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

static DEFAULT_CONFIG_TOML: &str = include_str!("../../default-lowerfile.conf");

#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
#[serde(default)]
pub struct FilterConfig {
    /// Encoding label for multi-byte case folding. Unset means ASCII folding.
    pub encoding: Option<String>,
}

impl FilterConfig {
    pub fn build(&self) -> LowerResult<FileLowerCase> {
        match self.encoding.as_deref() {
            Some(label) => FileLowerCase::with_encoding(label),
            None => Ok(FileLowerCase::new()),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
#[serde(default)]
pub struct OutputConfig {
    /// Whether to skip the per-file report lines.
    pub quiet: bool,
}

#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
#[serde(default)]
pub struct Config {
    pub filter: FilterConfig,
    pub output: OutputConfig,
}

impl Config {
    /// Notes go to stderr; stdout carries command output such as the JSON
    /// printed by `lowerfile descriptor`.
    pub fn load(config_dir: &Path) -> LowerResult<Self> {
        let mut config = Config::default();

        let default_config_path = config_dir.join("lowerfile.conf");
        if !default_config_path.exists() {
            create_example_config(config_dir)?;
        }

        let user_config_path = config_dir.join("lowerfile.local");
        if user_config_path.exists() {
            let user_config_content = fs::read_to_string(&user_config_path)?;
            let user_config: Config = toml::from_str(&user_config_content)?;

            config = merge_configs(config, user_config);

            eprintln!(
                "{}: Loaded user config from: {}\n",
                style("note").green().bold(),
                style(user_config_path.display())
                    .underlined()
                    .white()
                    .bold()
            );
        } else {
            eprintln!(
                "{}: Using {} configuration.\n      Create file in '{}' to customize.\n",
                style("note").green().bold(),
                style("default").bold(),
                style(user_config_path.display())
                    .underlined()
                    .white()
                    .bold()
            );
        }

        Ok(config)
    }
}

fn create_example_config(config_dir: &Path) -> LowerResult<()> {
    let example_path = config_dir.join("lowerfile.conf");
    if !example_path.exists() {
        fs::write(&example_path, DEFAULT_CONFIG_TOML)?;
        tracing::debug!("Example config created at: {}", example_path.display());
    }
    Ok(())
}

/// Merge user config into default config. The user wins wherever a value
/// was supplied.
fn merge_configs(mut default: Config, user: Config) -> Config {
    default.filter.encoding = user.filter.encoding.or(default.filter.encoding);
    default.output.quiet = user.output.quiet;
    default
}

#[test]
fn merge_configs_keeps_default_encoding_when_user_has_none() {
    let mut default_cfg = Config::default();
    default_cfg.filter.encoding = Some("utf-8".into());

    let mut user_cfg = Config::default();
    user_cfg.output.quiet = true;

    let merged = merge_configs(default_cfg.clone(), user_cfg);
    assert_eq!(merged.filter.encoding.as_deref(), Some("utf-8"));
    assert!(merged.output.quiet);

    let mut user_cfg = Config::default();
    user_cfg.filter.encoding = Some("latin1".into());
    let merged = merge_configs(default_cfg, user_cfg);
    assert_eq!(merged.filter.encoding.as_deref(), Some("latin1"));
}

#[test]
fn bundled_example_config_parses() {
    let cfg: Config = toml::from_str(DEFAULT_CONFIG_TOML).expect("example config is valid TOML");
    assert_eq!(cfg, Config::default());
}

#[test]
fn load_creates_example_and_reads_user_overrides() {
    let cfg_dir = tempfile::tempdir().unwrap();
    let cfg_path = cfg_dir.path();

    let user_toml = r#"
        [filter]
        encoding = "windows-1252"

        [output]
        quiet = true
    "#;
    fs::write(cfg_path.join("lowerfile.local"), user_toml).unwrap();

    let cfg = Config::load(cfg_path).expect("Config::load should succeed");

    assert!(cfg_path.join("lowerfile.conf").is_file());
    assert_eq!(cfg.filter.encoding.as_deref(), Some("windows-1252"));
    assert!(cfg.output.quiet);
}

#[test]
fn load_rejects_malformed_user_config() {
    let cfg_dir = tempfile::tempdir().unwrap();
    fs::write(cfg_dir.path().join("lowerfile.local"), "[filter\nencoding = 1").unwrap();

    let err = Config::load(cfg_dir.path()).unwrap_err();
    assert!(matches!(err, crate::errors::LowerError::Config(_)));
}

#[test]
fn filter_config_builds_ascii_filter_by_default() {
    let filter = FilterConfig::default().build().unwrap();
    assert_eq!(filter.encoding(), None);
}

#[test]
fn load_without_user_config_uses_defaults() {
    let cfg_dir = tempfile::tempdir().unwrap();

    let cfg = Config::load(cfg_dir.path()).unwrap();

    assert_eq!(cfg, Config::default());
    assert!(cfg_dir.path().join("lowerfile.conf").is_file());
}
