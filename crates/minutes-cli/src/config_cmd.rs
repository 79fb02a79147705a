use crate::config::{Config, ConfigError, ConfigPaths, validate_format};
use clap::Args;
use minutes_core::BoardMember;
use std::process::Command;

#[derive(Args, Debug, Clone)]
pub struct ConfigArgs {
    /// Print config with member emails redacted
    #[arg(long)]
    pub print: bool,

    /// Edit config in $EDITOR
    #[arg(long)]
    pub edit: bool,

    /// Set a config value (dotted key=value)
    #[arg(long, value_name = "key=value")]
    pub set: Vec<String>,
}

pub fn run(args: &ConfigArgs, paths: &ConfigPaths) -> Result<(), ConfigError> {
    if args.edit && (!args.set.is_empty() || args.print) {
        return Err(ConfigError::Validation(
            "--edit cannot be combined with --set or --print".into(),
        ));
    }

    let mut config = Config::load_or_create(paths)?;

    if args.edit {
        edit_config(paths)?;
        config = Config::load(paths)?;
        config.validate()?;
        return Ok(());
    }

    if !args.set.is_empty() {
        for assignment in &args.set {
            apply_set(&mut config, assignment)?;
        }
        config.validate()?;
        Config::write(paths, &config)?;
    }

    if args.print || (args.set.is_empty() && !args.edit) {
        let redacted = config.redacted();
        let output = toml::to_string_pretty(&redacted)?;
        println!("{output}");
    }

    Ok(())
}

fn edit_config(paths: &ConfigPaths) -> Result<(), ConfigError> {
    let editor = std::env::var("EDITOR")
        .map_err(|_| ConfigError::Validation("$EDITOR not set; use --set or set EDITOR".into()))?;
    let parts = split_editor_command(&editor)?;
    let (program, args) = parts
        .split_first()
        .ok_or_else(|| ConfigError::Validation("$EDITOR is empty".into()))?;
    let status = Command::new(program)
        .args(args)
        .arg(&paths.config_path)
        .status()
        .map_err(ConfigError::Io)?;
    if !status.success() {
        return Err(ConfigError::Validation(
            "editor exited with a non-zero status".into(),
        ));
    }
    Ok(())
}

fn split_editor_command(editor: &str) -> Result<Vec<String>, ConfigError> {
    let mut parts = Vec::new();
    let mut current = String::new();
    let mut in_single = false;
    let mut in_double = false;
    let mut chars = editor.chars();

    while let Some(ch) = chars.next() {
        match ch {
            '\'' if !in_double => in_single = !in_single,
            '"' if !in_single => in_double = !in_double,
            '\\' if !in_single => {
                if let Some(next) = chars.next() {
                    current.push(next);
                }
            }
            ch if ch.is_whitespace() && !in_single && !in_double => {
                if !current.is_empty() {
                    parts.push(std::mem::take(&mut current));
                }
            }
            _ => current.push(ch),
        }
    }

    if in_single || in_double {
        return Err(ConfigError::Validation(
            "$EDITOR has unmatched quotes".into(),
        ));
    }
    if !current.is_empty() {
        parts.push(current);
    }
    if parts.is_empty() {
        return Err(ConfigError::Validation("$EDITOR is empty".into()));
    }

    Ok(parts)
}

fn apply_set(config: &mut Config, assignment: &str) -> Result<(), ConfigError> {
    let (key, value) = assignment
        .split_once('=')
        .ok_or_else(|| ConfigError::Validation("expected key=value for --set".into()))?;
    let key = key.trim();
    let value = value.trim();
    match key {
        "output.format" => {
            validate_format(key, value)?;
            config.output.format = value.to_string();
        }
        "output.suggestions" => {
            config.output.suggestions = parse_bool(value, key)?;
        }
        "output.archive" => {
            config.output.archive = parse_bool(value, key)?;
        }
        "board.id" => {
            config.board.id = value.to_string();
        }
        "board.name" => {
            config.board.name = value.to_string();
        }
        "board.members" => {
            config.board.members = parse_members(value)
                .into_iter()
                .map(|name| merge_member(&config.board.members, name))
                .collect();
        }
        "rules.enabled" => {
            let (id, enabled) = value.split_once(':').ok_or_else(|| {
                ConfigError::Validation("rules.enabled expects rule_id:true|false".into())
            })?;
            let enabled = parse_bool(enabled.trim(), key)?;
            let rule = config
                .rules
                .iter_mut()
                .find(|rule| rule.id == id.trim())
                .ok_or_else(|| {
                    ConfigError::Validation(format!("no configured rule with id {}", id.trim()))
                })?;
            rule.enabled = enabled;
        }
        _ => {
            return Err(ConfigError::Validation(format!(
                "unknown config key: {key}"
            )));
        }
    }
    Ok(())
}

/// Comma-separated display names; blanks are dropped.
pub fn parse_members(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(|item| item.trim().to_string())
        .filter(|item| !item.is_empty())
        .collect()
}

/// Keep the stored record (email, role) of a member that is listed again by name.
fn merge_member(existing: &[BoardMember], name: String) -> BoardMember {
    existing
        .iter()
        .find(|member| member.display_name == name)
        .cloned()
        .unwrap_or_else(|| BoardMember::named(&name))
}

fn parse_bool(value: &str, key: &str) -> Result<bool, ConfigError> {
    match value {
        "true" => Ok(true),
        "false" => Ok(false),
        _ => Err(ConfigError::Validation(format!(
            "{key} expects true or false"
        ))),
    }
}
