use minutes_core::{Board, BoardMember, RuleError, TaskExtractionRule};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

const CONFIG_VERSION: u32 = 2;

#[cfg(unix)]
use std::os::unix::fs::PermissionsExt;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("home directory not found; set HOME or MINUTES_HOME")]
    HomeMissing,
    #[error("config io error: {0}")]
    Io(#[from] io::Error),
    #[error("config parse error: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("config serialize error: {0}")]
    Serialize(#[from] toml::ser::Error),
    #[error("config validation error: {0}")]
    Validation(String),
    #[error("config rule error: {0}")]
    Rule(#[from] RuleError),
}

#[derive(Debug, Clone)]
pub struct ConfigPaths {
    pub base_dir: PathBuf,
    pub config_path: PathBuf,
    pub analyses_dir: PathBuf,
}

impl ConfigPaths {
    /// `$MINUTES_HOME` when set, otherwise `~/.minutes`.
    pub fn from_env() -> Result<Self, ConfigError> {
        if let Ok(base) = std::env::var("MINUTES_HOME")
            && !base.trim().is_empty()
        {
            return Ok(Self::from_base(PathBuf::from(base)));
        }
        let home = std::env::var("HOME").map_err(|_| ConfigError::HomeMissing)?;
        Ok(Self::from_base(PathBuf::from(home).join(".minutes")))
    }

    pub fn from_base(base_dir: PathBuf) -> Self {
        let config_path = base_dir.join("config.toml");
        let analyses_dir = base_dir.join("analyses");
        Self {
            base_dir,
            config_path,
            analyses_dir,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub version: u32,
    pub board: BoardConfig,
    pub output: OutputConfig,
    pub rules: Vec<TaskExtractionRule>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            version: CONFIG_VERSION,
            board: BoardConfig::default(),
            output: OutputConfig::default(),
            rules: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BoardConfig {
    pub id: String,
    pub name: String,
    pub members: Vec<BoardMember>,
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self {
            id: "default".to_string(),
            name: "My board".to_string(),
            members: Vec::new(),
        }
    }
}

impl BoardConfig {
    pub fn to_board(&self) -> Board {
        Board {
            id: self.id.clone(),
            name: self.name.clone(),
            members: self.members.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub format: String,
    pub suggestions: bool,
    pub archive: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: "text".to_string(),
            suggestions: false,
            archive: false,
        }
    }
}

impl Config {
    pub fn load_or_create(paths: &ConfigPaths) -> Result<Self, ConfigError> {
        ensure_dirs(paths)?;
        if paths.config_path.exists() {
            let config = Self::load(paths)?;
            return Ok(config);
        }

        let config = Self::default();
        Self::write(paths, &config)?;
        Ok(config)
    }

    pub fn load(paths: &ConfigPaths) -> Result<Self, ConfigError> {
        ensure_dirs(paths)?;
        let content = fs::read_to_string(&paths.config_path)?;
        let raw: toml::Value = toml::from_str(&content)?;
        let file_version = raw
            .get("version")
            .and_then(|value| value.as_integer())
            .unwrap_or(0) as u32;

        let mut config: Config = toml::from_str(&content)?;
        let mut migrated = false;

        if file_version < CONFIG_VERSION {
            config.version = CONFIG_VERSION;
            migrated = true;
        } else if file_version > CONFIG_VERSION {
            tracing::warn!(
                file_version,
                supported = CONFIG_VERSION,
                "config version is newer than supported; proceeding"
            );
        }

        warn_if_loose_permissions(&paths.config_path)?;

        if migrated {
            tracing::info!(from = file_version, to = CONFIG_VERSION, "migrated config");
            Self::write(paths, &config)?;
        }

        Ok(config)
    }

    pub fn write(paths: &ConfigPaths, config: &Config) -> Result<(), ConfigError> {
        ensure_dirs(paths)?;
        let content = toml::to_string_pretty(config)?;
        write_atomic(&paths.config_path, content.as_bytes())?;
        Ok(())
    }

    /// Copy safe to print: member emails are masked.
    pub fn redacted(&self) -> Self {
        let mut redacted = self.clone();
        for member in &mut redacted.board.members {
            if !member.email.trim().is_empty() {
                member.email = "<redacted>".to_string();
            }
        }
        redacted
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_format("output.format", &self.output.format)?;

        for member in &self.board.members {
            if member.display_name.trim().is_empty() {
                return Err(ConfigError::Validation(
                    "board.members entries need a display_name".into(),
                ));
            }
        }

        let mut seen: Vec<&str> = Vec::new();
        for rule in &self.rules {
            if rule.id.trim().is_empty() {
                return Err(ConfigError::Validation("rules entries need an id".into()));
            }
            if seen.contains(&rule.id.as_str()) {
                return Err(ConfigError::Validation(format!(
                    "rules contains duplicate id {}",
                    rule.id
                )));
            }
            seen.push(rule.id.as_str());
            rule.compile()?;
        }

        Ok(())
    }
}

pub fn validate_format(field: &str, value: &str) -> Result<(), ConfigError> {
    match value {
        "text" | "json" => Ok(()),
        other => Err(ConfigError::Validation(format!(
            "{field} must be text or json (got {other})"
        ))),
    }
}

fn ensure_dirs(paths: &ConfigPaths) -> Result<(), ConfigError> {
    fs::create_dir_all(&paths.base_dir)?;
    fs::create_dir_all(&paths.analyses_dir)?;
    Ok(())
}

fn write_atomic(path: &Path, contents: &[u8]) -> Result<(), ConfigError> {
    let parent = path
        .parent()
        .ok_or_else(|| io::Error::other("config path missing parent directory"))?;
    let tmp_path = parent.join("config.toml.tmp");
    fs::write(&tmp_path, contents)?;
    set_strict_permissions(&tmp_path)?;
    fs::rename(&tmp_path, path)?;
    Ok(())
}

fn set_strict_permissions(path: &Path) -> Result<(), ConfigError> {
    #[cfg(unix)]
    {
        let perm = fs::Permissions::from_mode(0o600);
        fs::set_permissions(path, perm)?;
    }
    Ok(())
}

fn warn_if_loose_permissions(path: &Path) -> Result<(), ConfigError> {
    #[cfg(unix)]
    {
        let metadata = fs::metadata(path)?;
        let mode = metadata.permissions().mode() & 0o777;
        if mode & 0o077 != 0 {
            tracing::warn!(
                path = %path.display(),
                "config file is group/world readable; set permissions to 0600"
            );
        }
    }
    Ok(())
}
