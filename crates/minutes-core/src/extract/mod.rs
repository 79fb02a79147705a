pub mod dedup;
mod score;
pub(crate) mod signals;

use crate::rules::CompiledRule;
use crate::text::extract_keywords;
use crate::types::{BoardMember, ParsedTask};
use regex::Regex;
use score::score_confidence;
use signals::{
    detect_assignee, detect_priority, estimate_hours, find_dependencies, iso_date,
    resolve_due_date,
};
use std::sync::LazyLock;
use time::Date;
use uuid::Uuid;

pub const MIN_CONFIDENCE: u8 = 60;
const MIN_TASK_CHARS: usize = 10;

static LEADING_FILLER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)^(?:(?:todo|to-do|action items?|action|tasks?|next steps?)\s*:\s*|(?:need to|needs to|please|let's|lets)\s+)",
    )
    .expect("built-in pattern must compile")
});

/// Strip one leading filler phrase ("TODO:", "need to", "please", ...) and trim.
pub fn clean_task_text(raw: &str) -> String {
    LEADING_FILLER.replace(raw.trim(), "").trim().to_string()
}

/// Apply every enabled rule to every sentence and keep the candidates that clear
/// the confidence gate. Output is in discovery order; deduplication happens later.
pub(crate) fn extract_tasks(
    sentences: &[String],
    rules: &[CompiledRule],
    members: &[BoardMember],
    today: Date,
) -> Vec<ParsedTask> {
    let mut tasks: Vec<ParsedTask> = Vec::new();

    for sentence in sentences {
        for compiled in rules.iter().filter(|compiled| compiled.rule.enabled) {
            let Some(found) = compiled.regex.find(sentence) else {
                continue;
            };
            let text = clean_task_text(found.as_str());
            if text.chars().count() < MIN_TASK_CHARS {
                continue;
            }

            let confidence = score_confidence(&text, sentence, &compiled.rule);
            if confidence < MIN_CONFIDENCE {
                tracing::debug!(rule = %compiled.rule.id, confidence, text = %text, "candidate below confidence gate");
                continue;
            }

            let dependencies = find_dependencies(sentence, &tasks);
            tasks.push(ParsedTask {
                id: Uuid::now_v7().to_string(),
                keywords: extract_keywords(&text),
                action_type: compiled.rule.action_type,
                priority: detect_priority(sentence),
                assignee: detect_assignee(sentence, members),
                due_date: resolve_due_date(sentence, today).map(iso_date),
                estimated_hours: estimate_hours(&text),
                dependencies,
                confidence,
                context: sentence.clone(),
                text,
            });
        }
    }

    tasks
}
