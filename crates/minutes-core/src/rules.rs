use crate::RuleError;
use crate::types::{ActionType, TaskExtractionRule};
use regex::{Regex, RegexBuilder};
use std::sync::LazyLock;

static DEFAULT_COMPILED: LazyLock<Vec<CompiledRule>> = LazyLock::new(|| {
    default_rules()
        .iter()
        .filter_map(|rule| rule.compile().ok())
        .collect()
});

/// A rule whose pattern has been compiled case-insensitively.
#[derive(Debug, Clone)]
pub struct CompiledRule {
    pub rule: TaskExtractionRule,
    pub regex: Regex,
}

impl TaskExtractionRule {
    pub fn compile(&self) -> Result<CompiledRule, RuleError> {
        if self.pattern.trim().is_empty() {
            return Err(RuleError::EmptyPattern {
                id: self.id.clone(),
            });
        }
        let regex = RegexBuilder::new(&self.pattern)
            .case_insensitive(true)
            .build()
            .map_err(|source| RuleError::InvalidPattern {
                id: self.id.clone(),
                source,
            })?;
        Ok(CompiledRule {
            rule: self.clone(),
            regex,
        })
    }
}

/// The built-in rule table, in application order.
pub fn default_rules() -> Vec<TaskExtractionRule> {
    vec![
        rule(
            "todo_marker",
            "TODO marker",
            r"\b(?:todo|to-do|action item|task)s?\s*:\s*.+",
            10,
            ActionType::Todo,
            30,
            &["TODO: Fix the login bug", "Action item: send the recap"],
        ),
        rule(
            "assignment",
            "Explicit assignment",
            r"\b[a-z]+\s+(?:will|is going to|has to|needs to|should)\s+\w+.*",
            9,
            ActionType::Todo,
            25,
            &["Sarah will create wireframes for the new feature"],
        ),
        rule(
            "need_to",
            "Shared obligation",
            r"\b(?:we|i|you|they|someone|somebody)\s+(?:need to|must|have to|ought to)\s+.+",
            8,
            ActionType::Todo,
            20,
            &["We need to update the documentation"],
        ),
        rule(
            "follow_up",
            "Follow-up",
            r"\bfollow(?:\s|-)?up\s+(?:on|with)\s+.+",
            7,
            ActionType::FollowUp,
            20,
            &["Follow up with legal about the contract"],
        ),
        rule(
            "decision",
            "Decision",
            r"\b(?:decided|agreed)\s+(?:to|that|on)\s+.+",
            6,
            ActionType::Decision,
            15,
            &["We decided to move the launch to March"],
        ),
        rule(
            "question",
            "Open question",
            r"\b(?:find out|figure out|clarify|look into|investigate)\s+.+",
            5,
            ActionType::Question,
            10,
            &["Find out whether the vendor supports SSO"],
        ),
        rule(
            "blocker",
            "Blocker",
            r"\b(?:blocked by|blocker\s*:|waiting on|waiting for|stuck on)\s*.+",
            9,
            ActionType::Blocker,
            25,
            &["Blocked by missing database credentials from DevOps"],
        ),
    ]
}

fn rule(
    id: &str,
    name: &str,
    pattern: &str,
    priority: i32,
    action_type: ActionType,
    confidence_boost: i32,
    examples: &[&str],
) -> TaskExtractionRule {
    TaskExtractionRule {
        id: id.to_string(),
        name: name.to_string(),
        pattern: pattern.to_string(),
        priority,
        action_type,
        confidence_boost,
        examples: examples.iter().map(|value| value.to_string()).collect(),
        enabled: true,
    }
}

/// Enabled default rules followed by the enabled custom rules that compile.
/// A custom rule with a bad pattern is skipped for this run only.
pub(crate) fn merge_rules(custom_rules: &[TaskExtractionRule]) -> Vec<CompiledRule> {
    let mut rules: Vec<CompiledRule> = DEFAULT_COMPILED
        .iter()
        .filter(|compiled| compiled.rule.enabled)
        .cloned()
        .collect();

    for custom in custom_rules.iter().filter(|rule| rule.enabled) {
        match custom.compile() {
            Ok(compiled) => rules.push(compiled),
            Err(err) => {
                tracing::warn!(rule = %custom.id, error = %err, "skipping custom extraction rule");
            }
        }
    }

    rules
}
