use std::collections::HashSet;

const MIN_SENTENCE_CHARS: usize = 6;
const MAX_KEYWORDS: usize = 5;

const STOP_WORDS: &[&str] = &[
    "the", "and", "for", "are", "but", "not", "you", "all", "any", "can", "had", "her", "was",
    "one", "our", "out", "has", "have", "his", "how", "its", "who", "did", "get", "got", "let",
    "this", "that", "with", "they", "will", "from", "been", "were", "what", "when", "which",
    "their", "there", "would", "could", "should", "about", "into", "than", "then", "them",
    "these", "those", "need", "needs", "also", "just", "some", "very", "each", "make", "todo",
];

/// A sentence plus whether its terminator run contained a `?`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Sentence {
    pub text: String,
    pub question: bool,
}

/// Collapse newlines and whitespace runs to single spaces and trim.
pub fn preprocess_text(content: &str) -> String {
    content.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Split normalized text on runs of `.`, `!` and `?`, dropping pieces shorter than
/// six characters. Order is preserved.
pub fn split_sentences(text: &str) -> Vec<String> {
    split_sentence_spans(text)
        .into_iter()
        .map(|sentence| sentence.text)
        .collect()
}

pub(crate) fn split_sentence_spans(text: &str) -> Vec<Sentence> {
    let mut sentences = Vec::new();
    let mut current = String::new();
    let mut question = false;
    let mut in_terminator = false;

    for ch in text.chars() {
        if matches!(ch, '.' | '!' | '?') {
            in_terminator = true;
            question |= ch == '?';
            continue;
        }
        if in_terminator {
            push_sentence(&mut sentences, &current, question);
            current.clear();
            question = false;
            in_terminator = false;
        }
        current.push(ch);
    }
    push_sentence(&mut sentences, &current, question);

    sentences
}

fn push_sentence(sentences: &mut Vec<Sentence>, raw: &str, question: bool) {
    let text = raw.trim();
    if text.chars().count() >= MIN_SENTENCE_CHARS {
        sentences.push(Sentence {
            text: text.to_string(),
            question,
        });
    }
}

/// Lowercase alphanumeric tokens in order of appearance.
pub(crate) fn tokenize(text: &str) -> Vec<String> {
    text.to_lowercase()
        .split(|ch: char| !ch.is_alphanumeric())
        .filter(|token| !token.is_empty())
        .map(str::to_string)
        .collect()
}

pub(crate) fn has_any_word(tokens: &[String], words: &[&str]) -> bool {
    tokens.iter().any(|token| words.contains(&token.as_str()))
}

/// First five content words of `text`: lowercase, longer than two characters and
/// not a stop word.
pub fn extract_keywords(text: &str) -> Vec<String> {
    tokenize(text)
        .into_iter()
        .filter(|token| token.chars().count() > 2 && !STOP_WORDS.contains(&token.as_str()))
        .take(MAX_KEYWORDS)
        .collect()
}

/// Jaccard similarity of the case-insensitive, whitespace-separated word sets.
pub fn text_similarity(a: &str, b: &str) -> f64 {
    let la = a.to_lowercase();
    let lb = b.to_lowercase();
    let wa: HashSet<&str> = la.split_whitespace().collect();
    let wb: HashSet<&str> = lb.split_whitespace().collect();
    let union = wa.union(&wb).count();
    if union == 0 {
        return 0.0;
    }
    let intersection = wa.intersection(&wb).count();
    intersection as f64 / union as f64
}
