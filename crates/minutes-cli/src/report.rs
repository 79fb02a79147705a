use minutes_core::{MeetingAnalysis, MeetingNote, ParsedTask, SmartSuggestion};
use serde::Serialize;
use std::fmt::{self, Write};
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Text,
    Json,
}

impl OutputFormat {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "text" => Some(OutputFormat::Text),
            "json" => Some(OutputFormat::Json),
            _ => None,
        }
    }
}

#[derive(Debug, Error)]
pub enum ReportError {
    #[error("report encode error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("report format error")]
    Fmt(#[from] fmt::Error),
}

#[derive(Serialize)]
struct JsonReport<'a> {
    #[serde(flatten)]
    analysis: &'a MeetingAnalysis,
    #[serde(skip_serializing_if = "<[SmartSuggestion]>::is_empty")]
    suggestions: &'a [SmartSuggestion],
}

pub fn render(
    format: OutputFormat,
    note: &MeetingNote,
    analysis: &MeetingAnalysis,
    suggestions: &[SmartSuggestion],
) -> Result<String, ReportError> {
    match format {
        OutputFormat::Text => {
            let mut out = String::new();
            write_text(&mut out, note, analysis, suggestions)?;
            Ok(out)
        }
        OutputFormat::Json => Ok(serde_json::to_string_pretty(&JsonReport {
            analysis,
            suggestions,
        })?),
    }
}

fn write_text(
    out: &mut impl Write,
    note: &MeetingNote,
    analysis: &MeetingAnalysis,
    suggestions: &[SmartSuggestion],
) -> fmt::Result {
    writeln!(out, "# {}", note.title)?;
    writeln!(out, "{}", analysis.summary)?;
    writeln!(
        out,
        "sentiment: {}  urgency: {}",
        analysis.sentiment.label(),
        analysis.urgency_level.label()
    )?;

    if !analysis.extracted_tasks.is_empty() {
        writeln!(out, "\ntasks ({})", analysis.extracted_tasks.len())?;
        for (index, task) in analysis.extracted_tasks.iter().enumerate() {
            write_task(out, index + 1, task, &analysis.extracted_tasks)?;
        }
    }

    write_list(out, "decisions", &analysis.key_decisions)?;
    write_list(out, "action items", &analysis.action_items)?;
    write_list(out, "questions", &analysis.questions)?;
    write_list(out, "blockers", &analysis.blockers)?;
    write_list(out, "next steps", &analysis.next_steps)?;

    if !analysis.attendee_actions.is_empty() {
        writeln!(out, "\nattendees")?;
        for (attendee, actions) in &analysis.attendee_actions {
            if actions.is_empty() {
                writeln!(out, "  {attendee}: none")?;
            } else {
                writeln!(out, "  {attendee}: {}", actions.join("; "))?;
            }
        }
    }

    if !suggestions.is_empty() {
        writeln!(out, "\nsuggestions")?;
        for suggestion in suggestions {
            let kind = match suggestion.suggestion_type {
                minutes_core::SuggestionType::Assignee => "assignee",
                minutes_core::SuggestionType::DueDate => "due",
                minutes_core::SuggestionType::Priority => "priority",
            };
            writeln!(
                out,
                "  - {}: {kind} -> {} ({}%) {}",
                suggestion.context, suggestion.suggestion, suggestion.confidence, suggestion.reasoning
            )?;
        }
    }

    Ok(())
}

fn write_task(
    out: &mut impl Write,
    number: usize,
    task: &ParsedTask,
    all: &[ParsedTask],
) -> fmt::Result {
    writeln!(
        out,
        "  {number}. [{}/{} {}%] {}",
        task.action_type, task.priority, task.confidence, task.text
    )?;

    let mut details = Vec::new();
    if let Some(assignee) = &task.assignee {
        details.push(format!("assignee: {assignee}"));
    }
    if let Some(due) = &task.due_date {
        details.push(format!("due: {due}"));
    }
    if let Some(hours) = task.estimated_hours {
        details.push(format!("estimate: {hours}h"));
    }
    if !details.is_empty() {
        writeln!(out, "     {}", details.join("  "))?;
    }

    let depends: Vec<usize> = task
        .dependencies
        .iter()
        .filter_map(|id| all.iter().position(|other| &other.id == id))
        .map(|position| position + 1)
        .collect();
    if !depends.is_empty() {
        let numbers: Vec<String> = depends.iter().map(|n| format!("#{n}")).collect();
        writeln!(out, "     depends on: {}", numbers.join(", "))?;
    }
    Ok(())
}

fn write_list(out: &mut impl Write, heading: &str, items: &[String]) -> fmt::Result {
    if items.is_empty() {
        return Ok(());
    }
    writeln!(out, "\n{heading}")?;
    for item in items {
        writeln!(out, "  - {item}")?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use minutes_core::{Board, BoardMember, MeetingParser, SuggestionType};
    use time::macros::datetime;

    fn analyzed(content: &str) -> (MeetingNote, MeetingAnalysis) {
        let note = MeetingNote {
            id: "note-1".to_string(),
            title: "Standup".to_string(),
            content: content.to_string(),
            attendees: vec!["Sarah".to_string(), "Tom".to_string()],
            ..MeetingNote::default()
        };
        let board = Board {
            members: vec![BoardMember::named("Sarah")],
            ..Board::default()
        };
        let analysis =
            MeetingParser::default().parse_at(&note, &board, datetime!(2026-10-19 09:30 UTC));
        (note, analysis)
    }

    #[test]
    fn parse_format_labels() {
        assert_eq!(OutputFormat::parse("JSON"), Some(OutputFormat::Json));
        assert_eq!(OutputFormat::parse(" text "), Some(OutputFormat::Text));
        assert_eq!(OutputFormat::parse("yaml"), None);
    }

    #[test]
    fn text_report_lists_tasks_and_sections() {
        let (note, analysis) = analyzed(
            "Sarah will create wireframes for the new feature by tomorrow. \
             Blocked by missing database credentials from DevOps.",
        );
        let text = render(OutputFormat::Text, &note, &analysis, &[]).unwrap();
        assert!(text.starts_with("# Standup\n"));
        assert!(text.contains("urgency: medium"));
        assert!(text.contains("assignee: Sarah"));
        assert!(text.contains("due: 2026-10-20"));
        assert!(text.contains("\nblockers\n  - missing database credentials from DevOps\n"));
        assert!(text.contains("  Tom: none"));
        assert!(!text.contains("suggestions"));
    }

    #[test]
    fn json_report_embeds_suggestions_only_when_present() {
        let (note, analysis) = analyzed("TODO: Fix the login bug");
        let plain: serde_json::Value =
            serde_json::from_str(&render(OutputFormat::Json, &note, &analysis, &[]).unwrap())
                .unwrap();
        assert_eq!(plain["meeting_note_id"], "note-1");
        assert!(plain.get("suggestions").is_none());

        let suggestion = SmartSuggestion {
            id: "s-1".to_string(),
            suggestion_type: SuggestionType::DueDate,
            suggestion: "2026-10-26".to_string(),
            confidence: 60,
            reasoning: "Medium priority tasks fit within a week".to_string(),
            context: "Fix the login bug".to_string(),
        };
        let rendered = render(OutputFormat::Json, &note, &analysis, &[suggestion]).unwrap();
        let value: serde_json::Value = serde_json::from_str(&rendered).unwrap();
        assert_eq!(value["suggestions"][0]["type"], "due_date");
        assert_eq!(value["extracted_tasks"][0]["text"], "Fix the login bug");
    }

    struct FullSink;

    impl Write for FullSink {
        fn write_str(&mut self, _: &str) -> fmt::Result {
            Err(fmt::Error)
        }
    }

    #[test]
    fn text_writer_errors_propagate() {
        let (note, analysis) = analyzed("TODO: Fix the login bug");
        assert!(write_text(&mut FullSink, &note, &analysis, &[]).is_err());
        assert!(write_list(&mut FullSink, "blockers", &["db".to_string()]).is_err());
        assert!(write_list(&mut FullSink, "blockers", &[]).is_ok());
    }
}
