use crate::analysis::{analyze_sentiment, assess_urgency, generate_summary};
use crate::extract::dedup::deduplicate_tasks;
use crate::extract::extract_tasks;
use crate::rules::{CompiledRule, merge_rules};
use crate::sections::{
    extract_action_items, extract_blockers, extract_decisions, extract_next_steps,
    extract_questions, map_attendee_actions,
};
use crate::text::{preprocess_text, split_sentence_spans};
use crate::types::{Board, MeetingAnalysis, MeetingNote, TaskExtractionRule};
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;
use uuid::Uuid;

/// Turns meeting notes into a [`MeetingAnalysis`].
///
/// Holds only the caller's custom rules; every call builds fresh state, so one
/// parser can be shared freely across threads.
#[derive(Debug, Clone, Default)]
pub struct MeetingParser {
    custom_rules: Vec<TaskExtractionRule>,
}

impl MeetingParser {
    pub fn new(custom_rules: Vec<TaskExtractionRule>) -> Self {
        Self { custom_rules }
    }

    pub fn custom_rules(&self) -> &[TaskExtractionRule] {
        &self.custom_rules
    }

    /// Effective rule list for a run: enabled defaults, then enabled custom rules
    /// that compile.
    pub fn rules(&self) -> Vec<CompiledRule> {
        merge_rules(&self.custom_rules)
    }

    pub fn parse(&self, note: &MeetingNote, board: &Board) -> MeetingAnalysis {
        self.parse_at(note, board, OffsetDateTime::now_utc())
    }

    /// Same as [`parse`](Self::parse) with an explicit clock. Relative deadlines
    /// resolve against `now`'s date and `processed_at` is stamped with it.
    pub fn parse_at(
        &self,
        note: &MeetingNote,
        board: &Board,
        now: OffsetDateTime,
    ) -> MeetingAnalysis {
        let normalized = preprocess_text(&note.content);
        let spans = split_sentence_spans(&normalized);
        let sentences: Vec<String> = spans.iter().map(|span| span.text.clone()).collect();
        let rules = self.rules();

        let candidates = extract_tasks(&sentences, &rules, &board.members, now.date());
        let candidate_count = candidates.len();
        let extracted_tasks = deduplicate_tasks(candidates);

        let key_decisions = extract_decisions(&sentences);
        let action_items = extract_action_items(&sentences);
        let questions = extract_questions(&spans);
        let blockers = extract_blockers(&sentences);
        let next_steps = extract_next_steps(&sentences);
        let attendee_actions = map_attendee_actions(&extracted_tasks, &note.attendees);

        let summary = generate_summary(note, &extracted_tasks, &key_decisions);
        let sentiment = analyze_sentiment(&normalized);
        let urgency_level = assess_urgency(&extracted_tasks, &blockers);

        tracing::debug!(
            note = %note.id,
            sentences = sentences.len(),
            rules = rules.len(),
            candidates = candidate_count,
            tasks = extracted_tasks.len(),
            "parsed meeting notes"
        );

        MeetingAnalysis {
            id: Uuid::now_v7().to_string(),
            meeting_note_id: note.id.clone(),
            extracted_tasks,
            key_decisions,
            action_items,
            questions,
            blockers,
            next_steps,
            attendee_actions,
            summary,
            sentiment,
            urgency_level,
            processed_at: format_timestamp(now),
        }
    }
}

/// Parse `note` against the board roster with the default rules plus `custom_rules`.
pub fn parse_meeting_notes(
    note: &MeetingNote,
    board: &Board,
    custom_rules: &[TaskExtractionRule],
) -> MeetingAnalysis {
    MeetingParser::new(custom_rules.to_vec()).parse(note, board)
}

fn format_timestamp(now: OffsetDateTime) -> String {
    match now.format(&Rfc3339) {
        Ok(value) => value,
        Err(err) => {
            tracing::warn!(error = %err, "timestamp not representable as RFC 3339");
            now.unix_timestamp().to_string()
        }
    }
}
