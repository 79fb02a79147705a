mod archive;
mod config;
mod config_cmd;
mod input;
mod report;

use clap::{Parser, Subcommand};
use config::{Config, ConfigPaths};
use input::{NoteFields, Source};
use minutes_core::{
    BoardMember, MeetingParser, SmartSuggestion, TaskExtractionRule, generate_smart_suggestions_at,
};
use report::OutputFormat;
use std::path::PathBuf;
use time::OffsetDateTime;

#[derive(Parser)]
#[command(
    name = "minutes",
    version,
    about = "turn meeting notes into tasks",
    args_conflicts_with_subcommands = true
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,

    #[command(flatten)]
    run: RunArgs,
}

#[derive(Subcommand)]
enum Command {
    Config(config_cmd::ConfigArgs),
    /// List the effective extraction rules
    Rules,
}

#[derive(Parser, Debug, Clone)]
struct RunArgs {
    /// Notes file; stdin when omitted or "-"
    file: Option<PathBuf>,

    /// Meeting title (default: file name)
    #[arg(long)]
    title: Option<String>,

    /// Attendee names (comma-separated)
    #[arg(long, value_delimiter = ',', value_name = "name,...")]
    attendees: Option<Vec<String>>,

    /// Board member names for assignee matching (comma-separated)
    #[arg(long, value_delimiter = ',', value_name = "name,...")]
    members: Option<Vec<String>>,

    /// standup, planning, retrospective, review, brainstorm or general
    #[arg(long)]
    meeting_type: Option<String>,

    /// Output format: text or json
    #[arg(long)]
    format: Option<String>,

    /// Generate assignee and due-date suggestions per task
    #[arg(long)]
    suggest: bool,

    /// Store the analysis under the analyses directory
    #[arg(long)]
    archive: bool,
}

#[derive(Debug, Clone)]
struct ResolvedRunArgs {
    source: Source,
    fields: NoteFields,
    members: Vec<BoardMember>,
    format: OutputFormat,
    suggest: bool,
    archive: bool,
}

impl RunArgs {
    fn resolve(self, config: &Config) -> Result<ResolvedRunArgs, String> {
        let mut format = config.output.format.clone();
        let mut members = config.board.members.clone();
        apply_env_overrides(&mut format, &mut members);

        let format = self.format.unwrap_or(format);
        let format = OutputFormat::parse(&format)
            .ok_or_else(|| format!("format must be text or json (got {format})"))?;

        if let Some(names) = self.members {
            members = clean_names(names)
                .into_iter()
                .map(|name| BoardMember::named(&name))
                .collect();
        }

        Ok(ResolvedRunArgs {
            source: Source::from_arg(self.file.as_deref()),
            fields: NoteFields {
                title: self.title,
                attendees: clean_names(self.attendees.unwrap_or_default()),
                meeting_type: self.meeting_type,
                board_id: config.board.id.clone(),
            },
            members,
            format,
            suggest: self.suggest || config.output.suggestions,
            archive: self.archive || config.output.archive,
        })
    }
}

fn clean_names(names: Vec<String>) -> Vec<String> {
    names
        .into_iter()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
        .collect()
}

fn env_override(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

fn apply_env_overrides(format: &mut String, members: &mut Vec<BoardMember>) {
    if let Some(value) = env_override("MINUTES_FORMAT") {
        *format = value;
    }
    if let Some(value) = env_override("MINUTES_MEMBERS") {
        *members = config_cmd::parse_members(&value)
            .into_iter()
            .map(|name| BoardMember::named(&name))
            .collect();
    }
}

fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_env("MINUTES_LOG")
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn"));
    if let Err(err) = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init()
    {
        eprintln!("failed to initialize logging: {err}");
    }
}

fn main() {
    dotenvy::dotenv().ok();
    init_tracing();
    let cli = Cli::parse();

    let paths = match ConfigPaths::from_env() {
        Ok(paths) => paths,
        Err(err) => {
            eprintln!("config paths error: {err}");
            std::process::exit(1);
        }
    };

    let config = match Config::load_or_create(&paths) {
        Ok(config) => config,
        Err(err) => {
            eprintln!("config load failed: {err}");
            std::process::exit(1);
        }
    };

    if let Some(command) = cli.command {
        match command {
            Command::Config(args) => {
                if let Err(e) = config_cmd::run(&args, &paths) {
                    eprintln!("config failed: {e}");
                    std::process::exit(1);
                }
            }
            Command::Rules => print_rules(&config.rules),
        }
        return;
    }

    if let Err(err) = config.validate() {
        eprintln!("config invalid: {err}");
        std::process::exit(1);
    }

    let run = match cli.run.resolve(&config) {
        Ok(run) => run,
        Err(err) => {
            eprintln!("run args error: {err}");
            std::process::exit(1);
        }
    };

    let content = match run.source.read() {
        Ok(content) => content,
        Err(err) => {
            eprintln!("input failed: {err}");
            std::process::exit(1);
        }
    };

    let now = OffsetDateTime::now_utc();
    let note = match input::build_note(&run.source, content, run.fields, now) {
        Ok(note) => note,
        Err(err) => {
            eprintln!("input failed: {err}");
            std::process::exit(1);
        }
    };

    let mut board = config.board.to_board();
    board.members = run.members;

    let parser = MeetingParser::new(config.rules.clone());
    let analysis = parser.parse_at(&note, &board, now);

    let suggestions: Vec<SmartSuggestion> = if run.suggest {
        analysis
            .extracted_tasks
            .iter()
            .flat_map(|task| {
                generate_smart_suggestions_at(
                    task,
                    &board.members,
                    &analysis.extracted_tasks,
                    now.date(),
                )
            })
            .collect()
    } else {
        Vec::new()
    };

    match report::render(run.format, &note, &analysis, &suggestions) {
        Ok(output) => print!("{output}"),
        Err(err) => {
            eprintln!("render failed: {err}");
            std::process::exit(1);
        }
    }

    if run.archive {
        match archive::write_archive(&paths, &note, &analysis, &suggestions, now) {
            Ok(dir) => eprintln!("archived to {}", dir.display()),
            Err(err) => {
                eprintln!("archive failed: {err}");
                std::process::exit(1);
            }
        }
    }
}

fn print_rules(custom: &[TaskExtractionRule]) {
    println!("default rules:");
    for rule in minutes_core::default_rules() {
        println!(
            "  {:<14} {:<10} boost {:>3}  {}",
            rule.id,
            rule.action_type.label(),
            rule.confidence_boost,
            rule.pattern
        );
    }

    if custom.is_empty() {
        println!("no custom rules configured");
        return;
    }
    println!("custom rules:");
    for rule in custom {
        let status = match rule.compile() {
            Ok(_) if rule.enabled => "active".to_string(),
            Ok(_) => "disabled".to_string(),
            Err(err) => format!("invalid: {err}"),
        };
        println!(
            "  {:<14} {:<10} boost {:>3}  {}  [{status}]",
            rule.id,
            rule.action_type.label(),
            rule.confidence_boost,
            rule.pattern
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args() -> RunArgs {
        RunArgs {
            file: None,
            title: None,
            attendees: None,
            members: None,
            meeting_type: None,
            format: None,
            suggest: false,
            archive: false,
        }
    }

    #[test]
    fn resolve_uses_config_defaults() {
        let mut config = Config::default();
        config.board.members = vec![BoardMember::named("Sarah")];
        config.output.suggestions = true;
        let run = args().resolve(&config).unwrap();
        assert_eq!(run.format, OutputFormat::Text);
        assert!(run.suggest);
        assert!(!run.archive);
        assert_eq!(run.source, Source::Stdin);
        assert_eq!(run.members[0].display_name, "Sarah");
    }

    #[test]
    fn resolve_flags_override_config() {
        let config = Config::default();
        let run = RunArgs {
            file: Some(PathBuf::from("notes.md")),
            format: Some("json".to_string()),
            members: Some(vec![" Ana ".to_string(), String::new()]),
            attendees: Some(vec!["Ana".to_string(), " ".to_string()]),
            archive: true,
            ..args()
        }
        .resolve(&config)
        .unwrap();
        assert_eq!(run.format, OutputFormat::Json);
        assert!(run.archive);
        assert_eq!(run.source, Source::File(PathBuf::from("notes.md")));
        assert_eq!(run.members.len(), 1);
        assert_eq!(run.members[0].display_name, "Ana");
        assert_eq!(run.fields.attendees, vec!["Ana"]);
    }

    #[test]
    fn resolve_rejects_unknown_format() {
        let run = RunArgs {
            format: Some("xml".to_string()),
            ..args()
        };
        assert!(run.resolve(&Config::default()).is_err());
    }

    #[test]
    fn cli_parses_run_and_subcommands() {
        let cli = Cli::try_parse_from([
            "minutes",
            "notes.md",
            "--attendees",
            "Ana,Ben",
            "--suggest",
        ])
        .unwrap();
        assert!(cli.command.is_none());
        assert_eq!(cli.run.file, Some(PathBuf::from("notes.md")));
        assert_eq!(
            cli.run.attendees,
            Some(vec!["Ana".to_string(), "Ben".to_string()])
        );
        assert!(cli.run.suggest);

        let cli = Cli::try_parse_from(["minutes", "rules"]).unwrap();
        assert!(matches!(cli.command, Some(Command::Rules)));
    }
}
