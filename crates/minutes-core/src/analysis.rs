use crate::text::tokenize;
use crate::types::{MeetingNote, ParsedTask, Priority, Sentiment, UrgencyLevel};

const POSITIVE_WORDS: &[&str] = &[
    "great", "good", "excellent", "success", "successful", "progress", "happy", "resolved",
    "completed", "done", "improved", "awesome", "excited", "pleased", "win", "agreed",
];

const NEGATIVE_WORDS: &[&str] = &[
    "problem", "problems", "issue", "issues", "blocked", "blocker", "delay", "delayed",
    "concern", "concerns", "risk", "fail", "failed", "failure", "bug", "bugs", "broken",
    "worried", "behind", "frustrated",
];

/// One-paragraph recap. The attendee clause is fixed wording; the task and decision
/// clauses only appear when non-empty and are pluralised by count.
pub fn generate_summary(note: &MeetingNote, tasks: &[ParsedTask], decisions: &[String]) -> String {
    let attendees = note.attendees.len();
    let mut summary = format!("Meeting \"{}\" with {attendees} attendees.", note.title);

    if !tasks.is_empty() {
        let high = tasks
            .iter()
            .filter(|task| matches!(task.priority, Priority::Urgent | Priority::High))
            .count();
        summary.push_str(&format!(
            " Generated {} {} ({high} high priority).",
            tasks.len(),
            plural(tasks.len(), "action item")
        ));
    }

    if !decisions.is_empty() {
        summary.push_str(&format!(
            " Made {} key {}.",
            decisions.len(),
            plural(decisions.len(), "decision")
        ));
    }

    summary
}

fn plural(count: usize, noun: &str) -> String {
    if count == 1 {
        noun.to_string()
    } else {
        format!("{noun}s")
    }
}

/// Word-count sentiment; one side must lead by at least two.
pub fn analyze_sentiment(text: &str) -> Sentiment {
    let tokens = tokenize(text);
    let positive = tokens
        .iter()
        .filter(|token| POSITIVE_WORDS.contains(&token.as_str()))
        .count();
    let negative = tokens
        .iter()
        .filter(|token| NEGATIVE_WORDS.contains(&token.as_str()))
        .count();

    if positive > negative + 1 {
        Sentiment::Positive
    } else if negative > positive + 1 {
        Sentiment::Negative
    } else {
        Sentiment::Neutral
    }
}

pub fn assess_urgency(tasks: &[ParsedTask], blockers: &[String]) -> UrgencyLevel {
    let urgent = tasks.iter().any(|task| task.priority == Priority::Urgent);
    if urgent || blockers.len() > 2 {
        return UrgencyLevel::High;
    }

    let high = tasks
        .iter()
        .filter(|task| task.priority == Priority::High)
        .count();
    if high > 2 || !blockers.is_empty() {
        return UrgencyLevel::Medium;
    }

    UrgencyLevel::Low
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ActionType;

    fn task(priority: Priority) -> ParsedTask {
        ParsedTask {
            id: "t".to_string(),
            text: "Prepare the budget review".to_string(),
            context: "Prepare the budget review".to_string(),
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

    fn note(title: &str, attendees: &[&str]) -> MeetingNote {
        MeetingNote {
            title: title.to_string(),
            attendees: attendees.iter().map(|name| name.to_string()).collect(),
            ..MeetingNote::default()
        }
    }

    #[test]
    fn summary_omits_empty_clauses() {
        let summary = generate_summary(&note("Weekly sync", &["Ana", "Ben"]), &[], &[]);
        assert_eq!(summary, "Meeting \"Weekly sync\" with 2 attendees.");
    }

    #[test]
    fn summary_with_tasks_and_decisions() {
        let tasks = vec![task(Priority::Urgent), task(Priority::High), task(Priority::Low)];
        let decisions = vec!["decided to ship".to_string()];
        let summary = generate_summary(&note("Launch", &["Ana"]), &tasks, &decisions);
        assert_eq!(
            summary,
            "Meeting \"Launch\" with 1 attendees. Generated 3 action items (2 high priority). Made 1 key decision."
        );
    }

    #[test]
    fn sentiment_needs_margin_of_two() {
        assert_eq!(analyze_sentiment("great progress, good work"), Sentiment::Positive);
        assert_eq!(analyze_sentiment("great work but one bug"), Sentiment::Neutral);
        assert_eq!(
            analyze_sentiment("the deploy failed and we are blocked by a broken build"),
            Sentiment::Negative
        );
        assert_eq!(analyze_sentiment(""), Sentiment::Neutral);
    }

    #[test]
    fn urgency_levels() {
        assert_eq!(assess_urgency(&[], &[]), UrgencyLevel::Low);
        assert_eq!(
            assess_urgency(&[task(Priority::Urgent)], &[]),
            UrgencyLevel::High
        );
        let three_blockers = vec!["a".to_string(), "b".to_string(), "c".to_string()];
        assert_eq!(assess_urgency(&[], &three_blockers), UrgencyLevel::High);
        assert_eq!(
            assess_urgency(&[], &three_blockers[..1]),
            UrgencyLevel::Medium
        );
        let highs = vec![
            task(Priority::High),
            task(Priority::High),
            task(Priority::High),
        ];
        assert_eq!(assess_urgency(&highs, &[]), UrgencyLevel::Medium);
        assert_eq!(assess_urgency(&highs[..2], &[]), UrgencyLevel::Low);
    }
}
