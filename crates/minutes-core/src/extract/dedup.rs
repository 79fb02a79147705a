use crate::text::text_similarity;
use crate::types::ParsedTask;

const DUPLICATE_THRESHOLD: f64 = 0.8;

/// Greedy near-duplicate removal followed by a stable sort on confidence.
///
/// Each task is compared only against tasks already kept, so the first task of a
/// cluster in input order survives even when a later duplicate scores higher.
pub fn deduplicate_tasks(tasks: Vec<ParsedTask>) -> Vec<ParsedTask> {
    let mut kept: Vec<ParsedTask> = Vec::with_capacity(tasks.len());
    for task in tasks {
        let duplicate = kept
            .iter()
            .any(|existing| text_similarity(&existing.text, &task.text) > DUPLICATE_THRESHOLD);
        if duplicate {
            tracing::debug!(text = %task.text, "dropping near-duplicate task");
            continue;
        }
        kept.push(task);
    }
    kept.sort_by(|a, b| b.confidence.cmp(&a.confidence));
    kept
}
