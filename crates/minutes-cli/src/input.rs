use minutes_core::{MeetingNote, MeetingType, iso_date};
use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use thiserror::Error;
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;
use uuid::Uuid;

const UNTITLED: &str = "Untitled meeting";

#[derive(Debug, Error)]
pub enum InputError {
    #[error("failed to read {path}: {source}")]
    File {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to read stdin: {0}")]
    Stdin(#[source] io::Error),
    #[error("unknown meeting type {0}")]
    MeetingType(String),
    #[error("input time error: {0}")]
    Time(#[from] time::error::Format),
}

/// Where the note body comes from. `-` and no path both mean stdin.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Source {
    Stdin,
    File(PathBuf),
}

impl Source {
    pub fn from_arg(path: Option<&Path>) -> Self {
        match path {
            Some(path) if path != Path::new("-") => Source::File(path.to_path_buf()),
            _ => Source::Stdin,
        }
    }

    pub fn read(&self) -> Result<String, InputError> {
        match self {
            Source::File(path) => fs::read_to_string(path).map_err(|source| InputError::File {
                path: path.clone(),
                source,
            }),
            Source::Stdin => {
                let mut content = String::new();
                io::stdin()
                    .read_to_string(&mut content)
                    .map_err(InputError::Stdin)?;
                Ok(content)
            }
        }
    }

    fn default_title(&self) -> String {
        match self {
            Source::File(path) => path
                .file_stem()
                .map(|stem| stem.to_string_lossy().replace(['-', '_'], " "))
                .filter(|stem| !stem.trim().is_empty())
                .unwrap_or_else(|| UNTITLED.to_string()),
            Source::Stdin => UNTITLED.to_string(),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct NoteFields {
    pub title: Option<String>,
    pub attendees: Vec<String>,
    pub meeting_type: Option<String>,
    pub board_id: String,
}

/// Wrap `content` in a fresh [`MeetingNote`] stamped with `now`.
pub fn build_note(
    source: &Source,
    content: String,
    fields: NoteFields,
    now: OffsetDateTime,
) -> Result<MeetingNote, InputError> {
    let meeting_type = match fields.meeting_type.as_deref() {
        Some(label) => MeetingType::from_label(label)
            .ok_or_else(|| InputError::MeetingType(label.to_string()))?,
        None => MeetingType::default(),
    };
    let title = fields
        .title
        .map(|title| title.trim().to_string())
        .filter(|title| !title.is_empty())
        .unwrap_or_else(|| source.default_title());
    let stamp = now.format(&Rfc3339)?;

    Ok(MeetingNote {
        id: Uuid::now_v7().to_string(),
        title,
        content,
        date: iso_date(now.date()),
        attendees: fields.attendees,
        board_id: fields.board_id,
        meeting_type,
        created_at: stamp.clone(),
        updated_at: stamp,
        ..MeetingNote::default()
    })
}
