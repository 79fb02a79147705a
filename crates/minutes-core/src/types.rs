use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Kind of meeting a note was taken in.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MeetingType {
    Standup,
    Planning,
    Retrospective,
    Review,
    Brainstorm,
    #[default]
    General,
}

impl MeetingType {
    pub fn label(self) -> &'static str {
        match self {
            MeetingType::Standup => "standup",
            MeetingType::Planning => "planning",
            MeetingType::Retrospective => "retrospective",
            MeetingType::Review => "review",
            MeetingType::Brainstorm => "brainstorm",
            MeetingType::General => "general",
        }
    }

    pub fn from_label(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "standup" => Some(MeetingType::Standup),
            "planning" => Some(MeetingType::Planning),
            "retrospective" | "retro" => Some(MeetingType::Retrospective),
            "review" => Some(MeetingType::Review),
            "brainstorm" => Some(MeetingType::Brainstorm),
            "general" => Some(MeetingType::General),
            _ => None,
        }
    }
}

/// Meeting notes as captured by the caller. The parser never mutates them.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct MeetingNote {
    pub id: String,
    pub title: String,
    pub content: String,
    pub date: String,
    pub attendees: Vec<String>,
    pub board_id: String,
    pub created_by: String,
    pub tags: Vec<String>,
    pub meeting_type: MeetingType,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MemberRole {
    Owner,
    Admin,
    #[default]
    Member,
    Viewer,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BoardMember {
    pub user_id: String,
    pub display_name: String,
    pub email: String,
    pub role: MemberRole,
}

impl BoardMember {
    pub fn named(display_name: &str) -> Self {
        Self {
            display_name: display_name.to_string(),
            ..Self::default()
        }
    }
}

/// The slice of a board the parser reads. A missing member list is an empty roster.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Board {
    pub id: String,
    pub name: String,
    pub members: Vec<BoardMember>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionType {
    Todo,
    FollowUp,
    Decision,
    Question,
    Blocker,
}

impl ActionType {
    pub fn label(self) -> &'static str {
        match self {
            ActionType::Todo => "todo",
            ActionType::FollowUp => "follow_up",
            ActionType::Decision => "decision",
            ActionType::Question => "question",
            ActionType::Blocker => "blocker",
        }
    }
}

impl fmt::Display for ActionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    Urgent,
    High,
    #[default]
    Medium,
    Low,
}

impl Priority {
    pub fn label(self) -> &'static str {
        match self {
            Priority::Urgent => "urgent",
            Priority::High => "high",
            Priority::Medium => "medium",
            Priority::Low => "low",
        }
    }

    pub fn from_label(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "urgent" => Some(Priority::Urgent),
            "high" => Some(Priority::High),
            "medium" => Some(Priority::Medium),
            "low" => Some(Priority::Low),
            _ => None,
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A pattern-to-action rule. Rules are plain data; compile them with
/// [`TaskExtractionRule::compile`](crate::rules).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskExtractionRule {
    pub id: String,
    pub name: String,
    pub pattern: String,
    #[serde(default)]
    pub priority: i32,
    pub action_type: ActionType,
    #[serde(default)]
    pub confidence_boost: i32,
    #[serde(default)]
    pub examples: Vec<String>,
    #[serde(default = "default_enabled")]
    pub enabled: bool,
}

fn default_enabled() -> bool {
    true
}

/// A candidate task pulled out of a single sentence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParsedTask {
    pub id: String,
    pub text: String,
    pub context: String,
    pub confidence: u8,
    pub keywords: Vec<String>,
    pub action_type: ActionType,
    pub priority: Priority,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assignee: Option<String>,
    /// ISO `YYYY-MM-DD`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub estimated_hours: Option<u32>,
    #[serde(default)]
    pub dependencies: Vec<String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Sentiment {
    Positive,
    #[default]
    Neutral,
    Negative,
}

impl Sentiment {
    pub fn label(self) -> &'static str {
        match self {
            Sentiment::Positive => "positive",
            Sentiment::Neutral => "neutral",
            Sentiment::Negative => "negative",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UrgencyLevel {
    #[default]
    Low,
    Medium,
    High,
}

impl UrgencyLevel {
    pub fn label(self) -> &'static str {
        match self {
            UrgencyLevel::Low => "low",
            UrgencyLevel::Medium => "medium",
            UrgencyLevel::High => "high",
        }
    }
}

/// Everything extracted from one meeting note in one parser run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MeetingAnalysis {
    pub id: String,
    pub meeting_note_id: String,
    pub extracted_tasks: Vec<ParsedTask>,
    pub key_decisions: Vec<String>,
    pub action_items: Vec<String>,
    pub questions: Vec<String>,
    pub blockers: Vec<String>,
    pub next_steps: Vec<String>,
    pub attendee_actions: BTreeMap<String, Vec<String>>,
    pub summary: String,
    pub sentiment: Sentiment,
    pub urgency_level: UrgencyLevel,
    /// RFC 3339.
    pub processed_at: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SuggestionType {
    Assignee,
    DueDate,
    Priority,
}

/// A recommendation for one task. `context` holds the task text it targets.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SmartSuggestion {
    pub id: String,
    #[serde(rename = "type")]
    pub suggestion_type: SuggestionType,
    pub suggestion: String,
    pub confidence: u8,
    pub reasoning: String,
    pub context: String,
}
