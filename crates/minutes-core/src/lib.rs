pub mod analysis;
pub mod error;
pub mod extract;
pub mod parser;
pub mod rules;
pub mod sections;
pub mod suggest;
pub mod text;
pub mod types;

pub use error::*;
pub use extract::dedup::deduplicate_tasks;
pub use extract::signals::iso_date;
pub use parser::{MeetingParser, parse_meeting_notes};
pub use rules::{CompiledRule, default_rules};
pub use suggest::{apply_suggestion, generate_smart_suggestions, generate_smart_suggestions_at};
pub use text::{extract_keywords, preprocess_text, split_sentences, text_similarity};
pub use types::*;

pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn version_is_set() {
        assert!(!version().is_empty());
    }
}
