//! Independent pattern passes over the sentence list: decisions, action items,
//! questions, blockers and next steps, plus the attendee-to-task mapping.
//!
//! None of these lists are deduplicated; a sentence matched by two patterns of the
//! same category shows up twice.

use crate::text::Sentence;
use crate::types::ParsedTask;
use regex::Regex;
use std::collections::BTreeMap;
use std::sync::LazyLock;

/// Which span of a match ends up in the output list.
#[derive(Clone, Copy)]
enum Keep {
    Capture,
    WholeMatch,
}

struct Section {
    patterns: Vec<Regex>,
    min_chars: usize,
    keep: Keep,
}

impl Section {
    fn new(patterns: &[&str], min_chars: usize, keep: Keep) -> Self {
        Self {
            patterns: patterns
                .iter()
                .map(|pattern| Regex::new(pattern).expect("built-in pattern must compile"))
                .collect(),
            min_chars,
            keep,
        }
    }

    fn collect_into(&self, sentence: &str, out: &mut Vec<String>) {
        for pattern in &self.patterns {
            let Some(caps) = pattern.captures(sentence) else {
                continue;
            };
            let Some(remainder) = caps.get(1) else {
                continue;
            };
            if remainder.as_str().trim().chars().count() <= self.min_chars {
                continue;
            }
            let kept = match self.keep {
                Keep::Capture => remainder.as_str(),
                Keep::WholeMatch => caps.get(0).map_or("", |whole| whole.as_str()),
            };
            out.push(kept.trim().to_string());
        }
    }

    fn collect(&self, sentences: &[String]) -> Vec<String> {
        let mut out = Vec::new();
        for sentence in sentences {
            self.collect_into(sentence, &mut out);
        }
        out
    }
}

static DECISIONS: LazyLock<Section> = LazyLock::new(|| {
    Section::new(
        &[
            r"(?i)\b(?:decided|agreed)\s+(?:to|that|on)\s+(.+)",
            r"(?i)\b(?:decision|resolution|conclusion)\s*:\s*(.+)",
        ],
        10,
        Keep::WholeMatch,
    )
});

static ACTION_ITEMS: LazyLock<Section> = LazyLock::new(|| {
    Section::new(
        &[
            r"(?i)\baction items?\s*:\s*(.+)",
            r"(?i)\b(?:will|must|needs? to|has to)\s+(.+)",
        ],
        5,
        Keep::Capture,
    )
});

static QUESTIONS: LazyLock<Section> = LazyLock::new(|| {
    Section::new(
        &[
            r"(?i)^(?:who|what|when|where|why|how|which|should we|can we|do we|is there|are there)\b(.+)",
            r"(?i)\b(?:question|unclear|open issue|tbd)\s*:?\s*(.+)",
        ],
        5,
        Keep::WholeMatch,
    )
});

static BLOCKERS: LazyLock<Section> = LazyLock::new(|| {
    Section::new(
        &[
            r"(?i)\b(?:blocked by|blocker\s*:|blocking)\s*(.+)",
            r"(?i)\b(?:waiting on|waiting for|stuck on|can't proceed without)\s+(.+)",
        ],
        5,
        Keep::Capture,
    )
});

static NEXT_STEPS: LazyLock<Section> = LazyLock::new(|| {
    Section::new(
        &[
            r"(?i)\bnext steps?\s*:?\s*(.+)",
            r"(?i)\b(?:going forward|moving forward|from now on)\s*,?\s*(.+)",
        ],
        5,
        Keep::Capture,
    )
});

pub fn extract_decisions(sentences: &[String]) -> Vec<String> {
    DECISIONS.collect(sentences)
}

pub fn extract_action_items(sentences: &[String]) -> Vec<String> {
    ACTION_ITEMS.collect(sentences)
}

/// Sentences that ended in `?` are taken verbatim and skip the pattern pass.
pub(crate) fn extract_questions(sentences: &[Sentence]) -> Vec<String> {
    let mut out = Vec::new();
    for sentence in sentences {
        if sentence.question {
            out.push(format!("{}?", sentence.text));
            continue;
        }
        QUESTIONS.collect_into(&sentence.text, &mut out);
    }
    out
}

pub fn extract_blockers(sentences: &[String]) -> Vec<String> {
    BLOCKERS.collect(sentences)
}

pub fn extract_next_steps(sentences: &[String]) -> Vec<String> {
    NEXT_STEPS.collect(sentences)
}

/// Every attendee maps to the texts of tasks assigned to exactly that name.
pub fn map_attendee_actions(
    tasks: &[ParsedTask],
    attendees: &[String],
) -> BTreeMap<String, Vec<String>> {
    attendees
        .iter()
        .map(|attendee| {
            let assigned = tasks
                .iter()
                .filter(|task| task.assignee.as_deref() == Some(attendee.as_str()))
                .map(|task| task.text.clone())
                .collect();
            (attendee.clone(), assigned)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::text::split_sentence_spans;
    use crate::types::{ActionType, Priority};

    fn sentences(values: &[&str]) -> Vec<String> {
        values.iter().map(|value| value.to_string()).collect()
    }

    fn assigned(text: &str, assignee: Option<&str>) -> ParsedTask {
        ParsedTask {
            id: text.to_string(),
            text: text.to_string(),
            context: text.to_string(),
            confidence: 80,
            keywords: Vec::new(),
            action_type: ActionType::Todo,
            priority: Priority::Medium,
            assignee: assignee.map(str::to_string),
            due_date: None,
            estimated_hours: None,
            dependencies: Vec::new(),
        }
    }

    #[test]
    fn decisions_keep_whole_match() {
        let found = extract_decisions(&sentences(&[
            "After a long debate we decided to use Postgres for billing",
            "Decision: freeze the API until launch",
            "We agreed on it",
        ]));
        assert_eq!(
            found,
            vec![
                "decided to use Postgres for billing",
                "Decision: freeze the API until launch",
            ]
        );
    }

    #[test]
    fn action_items_keep_capture() {
        let found = extract_action_items(&sentences(&[
            "Action item: send the recap to the team",
            "Tom will book the room",
        ]));
        assert_eq!(found, vec!["send the recap to the team", "book the room"]);
    }

    #[test]
    fn action_items_can_repeat_for_one_sentence() {
        let found = extract_action_items(&sentences(&["Action items: Dana will prepare slides"]));
        assert_eq!(found, vec!["Dana will prepare slides", "prepare slides"]);
    }

    #[test]
    fn questions_from_terminator_and_patterns() {
        let spans = split_sentence_spans(
            "Is the vendor contract signed? How we handle refunds is unclear. Open issue: data retention policy.",
        );
        let found = extract_questions(&spans);
        assert_eq!(
            found,
            vec![
                "Is the vendor contract signed?",
                "How we handle refunds is unclear",
                "Open issue: data retention policy",
            ]
        );
    }

    #[test]
    fn blockers_and_next_steps() {
        let input = sentences(&[
            "Blocked by missing database credentials from DevOps",
            "We are waiting on legal review",
            "Next steps: finalize the rollout plan",
            "Going forward, all releases need a changelog",
        ]);
        assert_eq!(
            extract_blockers(&input),
            vec!["missing database credentials from DevOps", "legal review"]
        );
        assert_eq!(
            extract_next_steps(&input),
            vec!["finalize the rollout plan", "all releases need a changelog"]
        );
    }

    #[test]
    fn short_remainders_skipped() {
        assert!(extract_blockers(&sentences(&["We are blocked by Tim"])).is_empty());
    }

    #[test]
    fn attendee_actions_exact_match() {
        let tasks = vec![
            assigned("Prepare the budget", Some("Sarah")),
            assigned("Call the vendor", Some("Tom")),
            assigned("Ship the docs", None),
            assigned("Review the slides", Some("sarah")),
        ];
        let attendees = sentences(&["Sarah", "Priya"]);
        let map = map_attendee_actions(&tasks, &attendees);
        assert_eq!(map.len(), 2);
        assert_eq!(map["Sarah"], vec!["Prepare the budget"]);
        assert!(map["Priya"].is_empty());
        assert!(!map.contains_key("Tom"));
    }
}
