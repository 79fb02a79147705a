use crate::config::ConfigPaths;
use minutes_core::{MeetingAnalysis, MeetingNote, SmartSuggestion};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;

const ANALYSIS_PREFIX: &str = "analysis";
const NOTE_PREFIX: &str = "note";
const SUGGESTIONS_PREFIX: &str = "suggestions";

#[derive(Debug, Error)]
pub enum ArchiveError {
    #[error("archive io error: {0}")]
    Io(#[from] io::Error),
    #[error("archive metadata error: {0}")]
    Metadata(#[from] toml::ser::Error),
    #[error("archive encode error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("archive time error: {0}")]
    Time(#[from] time::error::Format),
}

/// `metadata.toml` beside the archived files; enough to list past runs without
/// opening the JSON.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArchiveMetadata {
    pub id: String,
    pub archived_at: String,
    pub processed_at: String,
    pub meeting_note_id: String,
    pub title: String,
    pub meeting_type: String,
    pub attendees: Vec<String>,
    pub task_count: usize,
    pub urgency_level: String,
    pub sentiment: String,
    pub note_file: String,
    pub analysis_file: String,
    pub suggestions_file: Option<String>,
}

impl ArchiveMetadata {
    fn new(
        note: &MeetingNote,
        analysis: &MeetingAnalysis,
        with_suggestions: bool,
        now: OffsetDateTime,
    ) -> Result<Self, ArchiveError> {
        let id = analysis.id.clone();
        Ok(Self {
            archived_at: now.format(&Rfc3339)?,
            processed_at: analysis.processed_at.clone(),
            meeting_note_id: note.id.clone(),
            title: note.title.clone(),
            meeting_type: note.meeting_type.label().to_string(),
            attendees: note.attendees.clone(),
            task_count: analysis.extracted_tasks.len(),
            urgency_level: analysis.urgency_level.label().to_string(),
            sentiment: analysis.sentiment.label().to_string(),
            note_file: file_name(NOTE_PREFIX, "json", &id),
            analysis_file: file_name(ANALYSIS_PREFIX, "json", &id),
            suggestions_file: with_suggestions.then(|| file_name(SUGGESTIONS_PREFIX, "json", &id)),
            id,
        })
    }
}

/// Write one analysis run under `analyses/<analysis id>/` and return that directory.
pub fn write_archive(
    paths: &ConfigPaths,
    note: &MeetingNote,
    analysis: &MeetingAnalysis,
    suggestions: &[SmartSuggestion],
    now: OffsetDateTime,
) -> Result<PathBuf, ArchiveError> {
    let metadata = ArchiveMetadata::new(note, analysis, !suggestions.is_empty(), now)?;
    let dir = paths.analyses_dir.join(&metadata.id);
    fs::create_dir_all(&dir)?;

    write_json(&dir.join(&metadata.note_file), note)?;
    write_json(&dir.join(&metadata.analysis_file), analysis)?;
    if let Some(file) = &metadata.suggestions_file {
        write_json(&dir.join(file), suggestions)?;
    }
    let contents = toml::to_string_pretty(&metadata)?;
    write_atomic(&dir.join("metadata.toml"), contents.as_bytes())?;

    tracing::info!(id = %metadata.id, dir = %dir.display(), "archived analysis");
    Ok(dir)
}

fn file_name(prefix: &str, ext: &str, id: &str) -> String {
    format!("{prefix}-{id}.{ext}")
}

fn write_json<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<(), ArchiveError> {
    let contents = serde_json::to_vec_pretty(value)?;
    write_atomic(path, &contents)
}

fn write_atomic(path: &Path, contents: &[u8]) -> Result<(), ArchiveError> {
    let parent = path
        .parent()
        .ok_or_else(|| io::Error::other("archive path missing parent directory"))?;
    let tmp_path = parent.join(".tmp-write");
    fs::write(&tmp_path, contents)?;
    fs::rename(tmp_path, path)?;
    Ok(())
}
