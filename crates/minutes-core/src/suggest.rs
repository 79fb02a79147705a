//! Per-task follow-up recommendations. Nothing here runs inside
//! [`MeetingParser::parse`](crate::MeetingParser::parse); callers ask for
//! suggestions one task at a time and decide whether to apply them.

use crate::extract::signals::iso_date;
use crate::text::tokenize;
use crate::types::{BoardMember, ParsedTask, Priority, SmartSuggestion, SuggestionType};
use time::{Date, Duration, OffsetDateTime};
use uuid::Uuid;

const ASSIGNEE_CONFIDENCE: u8 = 60;

const EXPERTISE: &[(&str, &[&str])] = &[
    ("frontend", &["ui", "frontend", "react", "css", "html", "component", "layout", "page"]),
    ("backend", &["api", "backend", "server", "database", "endpoint", "service", "migration"]),
    ("design", &["design", "mockup", "mockups", "wireframe", "wireframes", "prototype", "ux"]),
    ("testing", &["test", "tests", "testing", "qa", "bug", "bugs", "regression"]),
    ("devops", &["deploy", "deployment", "infrastructure", "pipeline", "ci", "cd", "docker", "release"]),
];

/// Suggestions for `task`, resolving relative due dates against today's UTC date.
pub fn generate_smart_suggestions(
    task: &ParsedTask,
    members: &[BoardMember],
    existing_tasks: &[ParsedTask],
) -> Vec<SmartSuggestion> {
    generate_smart_suggestions_at(task, members, existing_tasks, OffsetDateTime::now_utc().date())
}

/// At most one assignee and one due-date suggestion, in that order.
///
/// `_existing_tasks` is accepted so workload-aware heuristics can slot in
/// without changing callers; the current rules ignore it.
pub fn generate_smart_suggestions_at(
    task: &ParsedTask,
    members: &[BoardMember],
    _existing_tasks: &[ParsedTask],
    today: Date,
) -> Vec<SmartSuggestion> {
    let mut suggestions = Vec::new();

    if task.assignee.is_none()
        && let Some(suggestion) = suggest_assignee(task, members)
    {
        suggestions.push(suggestion);
    }
    if task.due_date.is_none()
        && let Some(suggestion) = suggest_due_date(task, today)
    {
        suggestions.push(suggestion);
    }

    tracing::trace!(task = %task.id, count = suggestions.len(), "generated suggestions");
    suggestions
}

fn suggest_assignee(task: &ParsedTask, members: &[BoardMember]) -> Option<SmartSuggestion> {
    let tokens = tokenize(&task.text);
    let (expertise, _) = EXPERTISE.iter().find(|(_, keywords)| {
        tokens
            .iter()
            .any(|token| keywords.contains(&token.as_str()))
    })?;
    let member = members
        .iter()
        .find(|member| !member.display_name.trim().is_empty())?;

    Some(SmartSuggestion {
        id: Uuid::now_v7().to_string(),
        suggestion_type: SuggestionType::Assignee,
        suggestion: member.display_name.clone(),
        confidence: ASSIGNEE_CONFIDENCE,
        reasoning: format!("Task involves {expertise} work"),
        context: task.text.clone(),
    })
}

fn suggest_due_date(task: &ParsedTask, today: Date) -> Option<SmartSuggestion> {
    let (days, confidence, reasoning) = match task.priority {
        Priority::Urgent => (0, 80, "Urgent tasks should be completed today"),
        Priority::High => (1, 70, "High priority tasks should be completed by tomorrow"),
        Priority::Medium => (7, 60, "Medium priority tasks fit within a week"),
        Priority::Low => return None,
    };
    let due = today.checked_add(Duration::days(days))?;

    Some(SmartSuggestion {
        id: Uuid::now_v7().to_string(),
        suggestion_type: SuggestionType::DueDate,
        suggestion: iso_date(due),
        confidence,
        reasoning: reasoning.to_string(),
        context: task.text.clone(),
    })
}

/// Apply `suggestion` to the first task whose text equals `suggestion.context`
/// exactly. Returns false when no task matches or the payload does not parse
/// (an unknown priority label, for instance).
pub fn apply_suggestion(tasks: &mut [ParsedTask], suggestion: &SmartSuggestion) -> bool {
    let Some(task) = tasks.iter_mut().find(|task| task.text == suggestion.context) else {
        tracing::debug!(context = %suggestion.context, "no task matches suggestion context");
        return false;
    };

    match suggestion.suggestion_type {
        SuggestionType::Assignee => task.assignee = Some(suggestion.suggestion.clone()),
        SuggestionType::DueDate => task.due_date = Some(suggestion.suggestion.clone()),
        SuggestionType::Priority => match Priority::from_label(&suggestion.suggestion) {
            Some(priority) => task.priority = priority,
            None => return false,
        },
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ActionType;
    use time::macros::date;

    const TODAY: Date = date!(2026 - 10 - 19);

    fn task(text: &str, priority: Priority) -> ParsedTask {
        ParsedTask {
            id: "t-1".to_string(),
            text: text.to_string(),
            context: text.to_string(),
            confidence: 80,
            keywords: Vec::new(),
            action_type: ActionType::Todo,
            priority,
            assignee: None,
            due_date: None,
            estimated_hours: None,
            dependencies: Vec::new(),
        }
    }

    fn roster() -> Vec<BoardMember> {
        vec![BoardMember::named("Ana"), BoardMember::named("Ben")]
    }

    #[test]
    fn assignee_goes_to_first_member_on_expertise_match() {
        let suggestions = generate_smart_suggestions_at(
            &task("Build the login page component", Priority::Low),
            &roster(),
            &[],
            TODAY,
        );
        assert_eq!(suggestions.len(), 1);
        let suggestion = &suggestions[0];
        assert_eq!(suggestion.suggestion_type, SuggestionType::Assignee);
        assert_eq!(suggestion.suggestion, "Ana");
        assert_eq!(suggestion.confidence, 60);
        assert_eq!(suggestion.reasoning, "Task involves frontend work");
        assert_eq!(suggestion.context, "Build the login page component");
    }

    #[test]
    fn no_assignee_without_expertise_or_roster() {
        let plain = task("Call the landlord about parking", Priority::Low);
        assert!(generate_smart_suggestions_at(&plain, &roster(), &[], TODAY).is_empty());

        let backend = task("Add an endpoint for invoices", Priority::Low);
        assert!(generate_smart_suggestions_at(&backend, &[], &[], TODAY).is_empty());
    }

    #[test]
    fn due_dates_follow_priority() {
        let cases = [
            (Priority::Urgent, "2026-10-19", 80),
            (Priority::High, "2026-10-20", 70),
            (Priority::Medium, "2026-10-26", 60),
        ];
        for (priority, expected, confidence) in cases {
            let suggestions = generate_smart_suggestions_at(
                &task("Call the landlord about parking", priority),
                &roster(),
                &[],
                TODAY,
            );
            assert_eq!(suggestions.len(), 1, "{priority}");
            assert_eq!(suggestions[0].suggestion_type, SuggestionType::DueDate);
            assert_eq!(suggestions[0].suggestion, expected);
            assert_eq!(suggestions[0].confidence, confidence);
        }
    }

    #[test]
    fn existing_fields_suppress_suggestions() {
        let mut assigned = task("Deploy the release pipeline", Priority::Urgent);
        assigned.assignee = Some("Ben".to_string());
        assigned.due_date = Some("2026-10-30".to_string());
        assert!(generate_smart_suggestions_at(&assigned, &roster(), &[], TODAY).is_empty());
    }

    #[test]
    fn assignee_suggestion_precedes_due_date() {
        let suggestions = generate_smart_suggestions_at(
            &task("Deploy the release pipeline", Priority::High),
            &roster(),
            &[],
            TODAY,
        );
        let kinds: Vec<_> = suggestions.iter().map(|s| s.suggestion_type).collect();
        assert_eq!(kinds, vec![SuggestionType::Assignee, SuggestionType::DueDate]);
        assert_eq!(suggestions[0].reasoning, "Task involves devops work");
    }

    #[test]
    fn apply_matches_exact_text() {
        let mut tasks = vec![
            task("Deploy the release pipeline", Priority::High),
            task("Write the changelog", Priority::Medium),
        ];
        let suggestions =
            generate_smart_suggestions_at(&tasks[0].clone(), &roster(), &tasks, TODAY);
        for suggestion in &suggestions {
            assert!(apply_suggestion(&mut tasks, suggestion));
        }
        assert_eq!(tasks[0].assignee.as_deref(), Some("Ana"));
        assert_eq!(tasks[0].due_date.as_deref(), Some("2026-10-20"));
        assert_eq!(tasks[1].assignee, None);
    }

    #[test]
    fn apply_fails_on_edited_text() {
        let mut tasks = vec![task("Deploy the release pipeline", Priority::High)];
        let suggestions = generate_smart_suggestions_at(&tasks[0].clone(), &roster(), &[], TODAY);
        tasks[0].text = "Deploy the release pipeline tonight".to_string();
        assert!(!apply_suggestion(&mut tasks, &suggestions[0]));
        assert_eq!(tasks[0].assignee, None);
    }

    #[test]
    fn apply_priority_suggestion() {
        let mut tasks = vec![task("Write the changelog", Priority::Medium)];
        let mut suggestion = SmartSuggestion {
            id: "s-1".to_string(),
            suggestion_type: SuggestionType::Priority,
            suggestion: "urgent".to_string(),
            confidence: 50,
            reasoning: "Release is tomorrow".to_string(),
            context: "Write the changelog".to_string(),
        };
        assert!(apply_suggestion(&mut tasks, &suggestion));
        assert_eq!(tasks[0].priority, Priority::Urgent);

        suggestion.suggestion = "whenever".to_string();
        assert!(!apply_suggestion(&mut tasks, &suggestion));
        assert_eq!(tasks[0].priority, Priority::Urgent);
    }
}
