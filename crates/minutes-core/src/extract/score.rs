use super::signals::{ASSIGNEE_PATTERNS, TIME_PATTERNS, all_priority_keywords};
use crate::text::{has_any_word, tokenize};
use crate::types::TaskExtractionRule;
use regex::Regex;
use std::sync::LazyLock;

const BASE_CONFIDENCE: i32 = 50;
const ACTION_VERB_BOOST: i32 = 15;
const LENGTH_BOOST: i32 = 10;
const LONG_LENGTH_BOOST: i32 = 5;
const SPECIFIC_DETAIL_BOOST: i32 = 10;
const TIME_REFERENCE_BOOST: i32 = 10;
const ASSIGNEE_BOOST: i32 = 10;
const PRIORITY_KEYWORD_BOOST: i32 = 5;
const VAGUE_PENALTY: i32 = 15;
/// Rule boosts are clamped to this magnitude before scoring.
const MAX_RULE_BOOST: i32 = 100;

const ACTION_VERBS: &[&str] = &[
    "create", "build", "implement", "fix", "update", "review", "write", "design", "test",
    "deploy", "send", "schedule", "prepare", "research", "analyze", "develop", "complete",
    "finish", "configure", "document", "investigate", "contact", "call", "email", "check",
    "verify", "draft", "organize", "plan", "migrate", "refactor", "add", "remove", "resolve",
    "share", "book", "confirm", "patch", "restore",
];

const VAGUE_MARKERS: &[&str] = &["maybe", "perhaps", "possibly", "might", "could be", "not sure"];

static SPECIFIC_DETAIL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(?:by|before|after|using|with|for|in|on)\s+\w+")
        .expect("built-in pattern must compile")
});

/// Additive confidence heuristic, clamped to 0..=100.
///
/// `text` is the cleaned candidate, `sentence` the sentence it came from.
pub(crate) fn score_confidence(text: &str, sentence: &str, rule: &TaskExtractionRule) -> u8 {
    let mut score =
        BASE_CONFIDENCE + rule.confidence_boost.clamp(-MAX_RULE_BOOST, MAX_RULE_BOOST);

    if has_any_word(&tokenize(text), ACTION_VERBS) {
        score += ACTION_VERB_BOOST;
    }

    let length = text.chars().count();
    if length > 30 {
        score += LENGTH_BOOST;
    }
    if length > 50 {
        score += LONG_LENGTH_BOOST;
    }

    if SPECIFIC_DETAIL.is_match(sentence) {
        score += SPECIFIC_DETAIL_BOOST;
    }
    if TIME_PATTERNS.iter().any(|pattern| pattern.is_match(sentence)) {
        score += TIME_REFERENCE_BOOST;
    }
    if ASSIGNEE_PATTERNS.iter().any(|pattern| pattern.is_match(sentence)) {
        score += ASSIGNEE_BOOST;
    }

    let lower_sentence = sentence.to_lowercase();
    if all_priority_keywords().any(|keyword| lower_sentence.contains(keyword)) {
        score += PRIORITY_KEYWORD_BOOST;
    }

    let lower_text = text.to_lowercase();
    if VAGUE_MARKERS.iter().any(|marker| lower_text.contains(marker)) {
        score -= VAGUE_PENALTY;
    }

    score.clamp(0, 100) as u8
}
