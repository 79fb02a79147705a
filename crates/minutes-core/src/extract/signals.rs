use crate::text::{text_similarity, tokenize};
use crate::types::{BoardMember, ParsedTask, Priority};
use regex::Regex;
use std::sync::LazyLock;
use time::{Date, Duration, Month, Weekday};

const DEPENDENCY_THRESHOLD: f64 = 0.6;

const URGENT_KEYWORDS: &[&str] = &[
    "urgent",
    "asap",
    "critical",
    "immediately",
    "emergency",
    "right away",
];
const HIGH_KEYWORDS: &[&str] = &["important", "high priority", "top priority", "soon", "must", "crucial"];
const MEDIUM_KEYWORDS: &[&str] = &["medium priority", "normal priority", "moderate"];
const LOW_KEYWORDS: &[&str] = &[
    "low priority",
    "nice to have",
    "eventually",
    "someday",
    "when possible",
    "optional",
    "if time permits",
];

const COMPLEX_VERBS: &[&str] = &[
    "implement",
    "build",
    "develop",
    "design",
    "architect",
    "migrate",
    "refactor",
    "integrate",
    "overhaul",
];
const MEDIUM_VERBS: &[&str] = &[
    "create",
    "update",
    "review",
    "test",
    "write",
    "configure",
    "investigate",
    "research",
    "analyze",
    "fix",
    "prepare",
    "document",
];
const SIMPLE_VERBS: &[&str] = &[
    "send", "email", "call", "schedule", "check", "notify", "share", "contact", "book",
    "remind", "ping", "confirm",
];

/// Relative deadline phrases. Shared with the confidence scorer.
pub(crate) static TIME_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    compile_static(&[
        r"(?i)\b(?:today|tonight|tomorrow|eod|eow)\b",
        r"(?i)\bend of (?:the )?(?:day|week|month|sprint)\b",
        r"(?i)\b(?:this|next)\s+(?:week|month|sprint|quarter|monday|tuesday|wednesday|thursday|friday)\b",
        r"(?i)\b(?:by|due|before|until)\s+(?:monday|tuesday|wednesday|thursday|friday|saturday|sunday|\d{1,2}/\d{1,2})\b",
        r"(?i)\bin\s+\d+\s+(?:days?|weeks?)\b",
    ])
});

/// Name-bearing phrases; group 1 is the candidate name. The `@mention` form is first.
pub(crate) static ASSIGNEE_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    compile_static(&[
        r"@(\w+)",
        r"(?i)\b([a-z]+)\s+(?:will|is going to|has to|needs to|should|can)\b",
        r"(?i)\bassign(?:ed)?\s+to\s+([a-z]+)",
        r"(?i)\b([a-z]+)\s+(?:to|will)\s+(?:handle|own|take care of|look into)\b",
        r"(?i)\b(?:owner|assignee)\s*:\s*([a-z]+)",
    ])
});

static DEPENDENCY_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    compile_static(&[
        r"(?i)\b(?:after|once|when)\s+(.+?)\s+(?:is|are|has been|have been|gets|get)\s+(?:done|complete|completed|finished|ready|merged|deployed|approved)\b",
        r"(?i)\b(?:depends on|dependent on|blocked by|waiting on|waiting for|requires)\s+(.+)",
    ])
});

static TODAY: LazyLock<Regex> = LazyLock::new(|| compile_one(r"(?i)\btoday\b"));
static TOMORROW: LazyLock<Regex> = LazyLock::new(|| compile_one(r"(?i)\btomorrow\b"));
static THIS_WEEK: LazyLock<Regex> = LazyLock::new(|| compile_one(r"(?i)\bthis\s+week\b"));
static NEXT_WEEK: LazyLock<Regex> = LazyLock::new(|| compile_one(r"(?i)\bnext\s+week\b"));
static EXPLICIT_DEADLINE: LazyLock<Regex> = LazyLock::new(|| {
    compile_one(
        r"(?i)\b(?:by|due(?:\s+on)?|before)\s+(monday|tuesday|wednesday|thursday|friday|saturday|sunday|(\d{1,2})/(\d{1,2}))\b",
    )
});

fn compile_one(pattern: &str) -> Regex {
    Regex::new(pattern).expect("built-in pattern must compile")
}

fn compile_static(patterns: &[&str]) -> Vec<Regex> {
    patterns.iter().map(|pattern| compile_one(pattern)).collect()
}

pub(crate) fn all_priority_keywords() -> impl Iterator<Item = &'static str> {
    URGENT_KEYWORDS
        .iter()
        .chain(HIGH_KEYWORDS)
        .chain(MEDIUM_KEYWORDS)
        .chain(LOW_KEYWORDS)
        .copied()
}

/// First keyword bucket that matches, checked urgent to low.
pub(crate) fn detect_priority(sentence: &str) -> Priority {
    let lower = sentence.to_lowercase();
    let buckets = [
        (Priority::Urgent, URGENT_KEYWORDS),
        (Priority::High, HIGH_KEYWORDS),
        (Priority::Medium, MEDIUM_KEYWORDS),
        (Priority::Low, LOW_KEYWORDS),
    ];
    buckets
        .iter()
        .find(|(_, keywords)| keywords.iter().any(|keyword| lower.contains(keyword)))
        .map(|(priority, _)| *priority)
        .unwrap_or_default()
}

/// Resolve the sentence to a board member: `@mention`, then name patterns, then a
/// plain mention of a member's display name anywhere in the sentence.
pub(crate) fn detect_assignee(sentence: &str, members: &[BoardMember]) -> Option<String> {
    if members.is_empty() {
        return None;
    }

    for pattern in ASSIGNEE_PATTERNS.iter() {
        for caps in pattern.captures_iter(sentence) {
            if let Some(name) = caps.get(1)
                && let Some(member) = find_member(members, name.as_str())
            {
                return Some(member.display_name.clone());
            }
        }
    }

    let lower = sentence.to_lowercase();
    members
        .iter()
        .find(|member| {
            let name = member.display_name.trim().to_lowercase();
            !name.is_empty() && lower.contains(&name)
        })
        .map(|member| member.display_name.clone())
}

fn find_member<'a>(members: &'a [BoardMember], candidate: &str) -> Option<&'a BoardMember> {
    let candidate = candidate.to_lowercase();
    members.iter().find(|member| {
        let name = member.display_name.trim().to_lowercase();
        if name.is_empty() {
            return false;
        }
        name == candidate || name.split_whitespace().next() == Some(candidate.as_str())
    })
}

pub(crate) fn resolve_due_date(sentence: &str, today: Date) -> Option<Date> {
    if TODAY.is_match(sentence) {
        return Some(today);
    }
    if TOMORROW.is_match(sentence) {
        return today.checked_add(Duration::days(1));
    }
    if THIS_WEEK.is_match(sentence) {
        return next_weekday(today, Weekday::Friday);
    }
    if NEXT_WEEK.is_match(sentence) {
        return today.checked_add(Duration::days(7));
    }

    let caps = EXPLICIT_DEADLINE.captures(sentence)?;
    if let (Some(month), Some(day)) = (caps.get(2), caps.get(3)) {
        let month = month.as_str().parse::<u8>().ok()?;
        let day = day.as_str().parse::<u8>().ok()?;
        let month = Month::try_from(month).ok()?;
        return Date::from_calendar_date(today.year(), month, day).ok();
    }
    let weekday = parse_weekday(caps.get(1)?.as_str())?;
    next_weekday(today, weekday)
}

/// The next date falling on `weekday`, strictly after `today`.
pub(crate) fn next_weekday(today: Date, weekday: Weekday) -> Option<Date> {
    let current = i64::from(today.weekday().number_days_from_monday());
    let target = i64::from(weekday.number_days_from_monday());
    let mut ahead = (target - current).rem_euclid(7);
    if ahead == 0 {
        ahead = 7;
    }
    today.checked_add(Duration::days(ahead))
}

fn parse_weekday(value: &str) -> Option<Weekday> {
    match value.to_lowercase().as_str() {
        "monday" => Some(Weekday::Monday),
        "tuesday" => Some(Weekday::Tuesday),
        "wednesday" => Some(Weekday::Wednesday),
        "thursday" => Some(Weekday::Thursday),
        "friday" => Some(Weekday::Friday),
        "saturday" => Some(Weekday::Saturday),
        "sunday" => Some(Weekday::Sunday),
        _ => None,
    }
}

/// ISO `YYYY-MM-DD`, the form due dates and suggestions carry.
pub fn iso_date(date: Date) -> String {
    date.to_string()
}

pub(crate) fn estimate_hours(text: &str) -> Option<u32> {
    let tokens = tokenize(text);
    let tiers = [(8, COMPLEX_VERBS), (4, MEDIUM_VERBS), (1, SIMPLE_VERBS)];
    tiers
        .iter()
        .find(|(_, verbs)| tokens.iter().any(|token| verbs.contains(&token.as_str())))
        .map(|(hours, _)| *hours)
}

/// Ids of earlier tasks that a dependency phrase in `sentence` refers to.
pub(crate) fn find_dependencies(sentence: &str, earlier: &[ParsedTask]) -> Vec<String> {
    let mut ids = Vec::new();
    for pattern in DEPENDENCY_PATTERNS.iter() {
        let Some(target) = pattern.captures(sentence).and_then(|caps| caps.get(1)) else {
            continue;
        };
        for task in earlier {
            if text_similarity(&task.text, target.as_str()) >= DEPENDENCY_THRESHOLD
                && !ids.contains(&task.id)
            {
                ids.push(task.id.clone());
            }
        }
    }
    ids
}
