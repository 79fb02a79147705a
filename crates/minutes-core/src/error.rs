use thiserror::Error;

/// Errors from compiling a task extraction rule.
#[derive(Debug, Error)]
pub enum RuleError {
    #[error("rule {id} has an empty pattern")]
    EmptyPattern { id: String },

    #[error("rule {id} has an invalid pattern: {source}")]
    InvalidPattern {
        id: String,
        #[source]
        source: regex::Error,
    },
}

impl RuleError {
    pub fn rule_id(&self) -> &str {
        match self {
            RuleError::EmptyPattern { id } | RuleError::InvalidPattern { id, .. } => id,
        }
    }
}
